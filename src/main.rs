//! onestep - copy selected kinds of files from one directory tree into another.
//!
//! Usage:
//!   onestep [OPTIONS]                 Launch interactive TUI
//!   onestep backup -s SRC -d DST      Copy matching files without the TUI
//!   onestep scan -s SRC               List the files a backup would copy
//!   onestep categories                Show the built-in file type table
//!   onestep --help                    Show help

mod logging;

use std::path::{Path, PathBuf};
use std::time::Duration;

use clap::{Args, Parser, Subcommand, ValueEnum};
use color_eyre::eyre::{bail, eyre, Context, Result};
use indicatif::{ProgressBar, ProgressStyle};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use onestep_core::{BackupConfig, CategoryTable, Extension, ExtensionSet};
use onestep_ops::{BackupEvent, BackupOutcome};
use onestep_scan::{ExtensionScanner, ScanOptions};
use onestep_select::SelectionTree;

use crate::logging::LogTarget;

#[derive(Parser)]
#[command(
    name = "onestep",
    version,
    about = "Copy selected kinds of files from one directory tree into another",
    long_about = "onestep finds every photo, video, document or other file of the \
                  types you choose under a source directory and copies them into one \
                  destination directory, renaming on name clashes.\n\n\
                  Run `onestep` for the interactive TUI, or use the subcommands \
                  for scripted use. Set ONESTEP_LOG (e.g. `debug`) to control logging."
)]
struct Cli {
    #[command(flatten)]
    selection: SelectionArgs,

    /// Append log output to this file
    #[arg(long, global = true)]
    log_file: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Copy matching files from source to destination
    Backup {
        #[command(flatten)]
        selection: SelectionArgs,

        /// Don't show a progress bar
        #[arg(short, long)]
        quiet: bool,
    },

    /// List the files a backup would copy
    Scan {
        #[command(flatten)]
        selection: SelectionArgs,

        /// Output format
        #[arg(short, long, default_value = "text")]
        format: OutputFormat,
    },

    /// Show the built-in categories and which extensions are selected
    Categories {
        #[command(flatten)]
        selection: SelectionArgs,

        /// Output format
        #[arg(short, long, default_value = "text")]
        format: OutputFormat,
    },
}

#[derive(Debug, Clone, Copy, ValueEnum, Default)]
enum OutputFormat {
    #[default]
    Text,
    Json,
}

/// Directories, file types and scan options shared by every command.
#[derive(Args, Debug, Clone, Default)]
struct SelectionArgs {
    /// Directory to copy from
    #[arg(short, long)]
    source: Option<PathBuf>,

    /// Directory to copy into (created if missing)
    #[arg(short, long)]
    dest: Option<PathBuf>,

    /// Extension to include, e.g. `jpg` or `.PNG` (repeatable)
    #[arg(short, long = "ext", value_name = "EXT")]
    extensions: Vec<String>,

    /// Include every extension of a category, e.g. `Photos` (repeatable)
    #[arg(short, long = "category", value_name = "NAME")]
    categories: Vec<String>,

    /// Follow symbolic links while scanning
    #[arg(long)]
    follow_symlinks: bool,

    /// Skip hidden files and directories
    #[arg(long)]
    skip_hidden: bool,

    /// Scanner threads (0 = auto)
    #[arg(short, long, default_value = "0")]
    threads: usize,
}

impl SelectionArgs {
    /// Resolve the selected extensions against the category table.
    ///
    /// With no `--ext` or `--category`, the default media selection applies.
    fn extensions(&self, table: &CategoryTable) -> Result<ExtensionSet> {
        if self.extensions.is_empty() && self.categories.is_empty() {
            return Ok(CategoryTable::default_selection());
        }

        let mut selected: ExtensionSet = self
            .extensions
            .iter()
            .map(|raw| Extension::new(raw))
            .collect();
        for name in &self.categories {
            let exts = table.extensions_of(name).ok_or_else(|| {
                let known: Vec<_> = table.names().collect();
                eyre!("Unknown category '{}'. Known categories: {}", name, known.join(", "))
            })?;
            selected.extend_from(&exts);
        }
        Ok(selected)
    }

    fn to_config(&self, table: &CategoryTable) -> Result<BackupConfig> {
        let mut builder = BackupConfig::builder();
        builder
            .extensions(self.extensions(table)?)
            .follow_symlinks(self.follow_symlinks)
            .include_hidden(!self.skip_hidden)
            .threads(self.threads);
        if let Some(source) = &self.source {
            builder.source(source.clone());
        }
        if let Some(dest) = &self.dest {
            builder.destination(dest.clone());
        }
        builder.build().context("Invalid configuration")
    }
}

fn main() -> Result<()> {
    color_eyre::install()?;

    let cli = Cli::parse();
    let table = CategoryTable::builtin();

    let target = match cli.command {
        None => LogTarget::Silent,
        Some(_) => LogTarget::Stderr,
    };
    logging::init(target, cli.log_file.as_deref())?;

    match cli.command {
        Some(Command::Backup { selection, quiet }) => {
            run_backup(selection.to_config(&table)?, quiet)?;
        }
        Some(Command::Scan { selection, format }) => {
            run_scan(selection.to_config(&table)?, format)?;
        }
        Some(Command::Categories { selection, format }) => {
            run_categories(&table, &selection.extensions(&table)?, format)?;
        }
        None => {
            let config = cli.selection.to_config(&table)?;
            info!(extensions = %config.extensions, "starting TUI");
            onestep_tui::run(config, table)?;
        }
    }

    Ok(())
}

/// Run a backup with a progress bar on stderr.
fn run_backup(config: BackupConfig, quiet: bool) -> Result<()> {
    check_source(&config)?;

    let rt = tokio::runtime::Runtime::new()?;
    let outcome = rt.block_on(async move {
        let mut handle = onestep_ops::start_backup(config)?;

        let bar = if quiet {
            ProgressBar::hidden()
        } else {
            progress_bar()?
        };
        bar.enable_steady_tick(Duration::from_millis(100));

        let mut outcome = None;
        loop {
            tokio::select! {
                event = handle.recv() => match event {
                    Some(BackupEvent::StateChanged(state)) => {
                        debug!(%state, "backup state");
                        bar.set_prefix(state.to_string());
                    }
                    Some(BackupEvent::Progress { percent, message }) => {
                        bar.set_position(u64::from(percent));
                        bar.set_message(message);
                    }
                    Some(BackupEvent::Complete(done)) => outcome = Some(done),
                    None => break,
                },
                _ = tokio::signal::ctrl_c(), if !handle.is_cancelled() => {
                    bar.println("Cancelling after the current file...");
                    handle.cancel();
                }
            }
        }
        bar.finish_and_clear();

        let outcome =
            outcome.ok_or_else(|| eyre!("Backup worker stopped without reporting a result"))?;
        Ok::<_, color_eyre::Report>(outcome)
    })?;

    match outcome {
        BackupOutcome::Completed { bytes, .. } => {
            println!(
                "{} ({})",
                outcome.summary(),
                humansize::format_size(bytes, humansize::BINARY)
            );
            Ok(())
        }
        BackupOutcome::NoFilesFound { .. } => {
            println!("{}", outcome.summary());
            Ok(())
        }
        BackupOutcome::Failed(err) => Err(err).context("Backup failed"),
        BackupOutcome::Cancelled { .. } => bail!("{}", outcome.summary()),
    }
}

/// The source must name an existing directory before any headless run.
fn check_source(config: &BackupConfig) -> Result<&Path> {
    let Some(source) = config.source.as_deref() else {
        bail!("Please select a source directory (--source)");
    };
    if !source.is_dir() {
        bail!("Not a directory: {}", source.display());
    }
    Ok(source)
}

fn progress_bar() -> Result<ProgressBar> {
    let bar = ProgressBar::new(100);
    bar.set_style(
        ProgressStyle::with_template(
            "[{elapsed_precise}] {prefix:.bold} \u{2595}{bar:40.blue}\u{258f} {pos:>3}% {wide_msg}",
        )?
        .progress_chars("\u{2588}\u{2593}\u{2592}\u{2591} "),
    );
    Ok(bar)
}

/// List matching files without copying anything.
fn run_scan(config: BackupConfig, format: OutputFormat) -> Result<()> {
    let source = check_source(&config)?.to_path_buf();
    if config.extensions.is_empty() {
        bail!("Please select at least one file type");
    }

    eprintln!("Searching {} for {}...", source.display(), config.extensions);

    let scanner = ExtensionScanner::with_options(ScanOptions::from(&config));
    let result = scanner.scan_cancellable(&source, &config.extensions, &CancellationToken::new())?;

    match format {
        OutputFormat::Text => {
            if result.is_empty() {
                println!("No matching files found in the selected directory.");
            } else {
                println!("Found {} matching files:", result.len());
                for path in result.iter() {
                    println!("{}", path.display());
                }
            }
            if !result.warnings.is_empty() {
                eprintln!("{} entries could not be read", result.warnings.len());
            }
        }
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&result.files)?);
        }
    }

    Ok(())
}

/// Print the category tree with the current selection marked.
fn run_categories(table: &CategoryTable, selected: &ExtensionSet, format: OutputFormat) -> Result<()> {
    let tree = SelectionTree::new(table, selected);

    match format {
        OutputFormat::Text => {
            for row in tree.rows() {
                println!("{}{} {}", "    ".repeat(row.depth), row.state.marker(), row.label);
            }
            println!();
            println!("Selected: {}", tree.flatten());
        }
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&tree)?);
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parses() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }

    #[test]
    fn test_default_selection_applies() {
        let args = SelectionArgs::default();
        let exts = args.extensions(&CategoryTable::builtin()).unwrap();
        assert_eq!(exts, CategoryTable::default_selection());
    }

    #[test]
    fn test_ext_and_category_combine() {
        let args = SelectionArgs {
            extensions: vec!["PDF".into()],
            categories: vec!["audio".into()],
            ..Default::default()
        };
        let exts = args.extensions(&CategoryTable::builtin()).unwrap();
        assert!(exts.contains(&Extension::new(".pdf")));
        assert!(exts.contains(&Extension::new(".mp3")));
        assert!(!exts.contains(&Extension::new(".jpg")));
    }

    #[test]
    fn test_unknown_category_is_an_error() {
        let args = SelectionArgs {
            categories: vec!["Spreadsheets".into()],
            ..Default::default()
        };
        let err = args.extensions(&CategoryTable::builtin()).unwrap_err();
        assert!(err.to_string().contains("Spreadsheets"));
    }

    #[test]
    fn test_backup_rejects_missing_source() {
        let temp = tempfile::TempDir::new().unwrap();
        let missing = temp.path().join("typo");
        let dest = temp.path().join("out");
        let config = BackupConfig::new(&missing, &dest, CategoryTable::default_selection());

        let err = run_backup(config, true).unwrap_err();

        assert!(err.to_string().contains("Not a directory"));
        assert!(!dest.exists());
    }

    #[test]
    fn test_backup_subcommand_builds_config() {
        let cli = Cli::try_parse_from([
            "onestep", "backup", "-s", "/src", "-d", "/dst", "-e", "jpg", "--skip-hidden",
        ])
        .unwrap();
        let Some(Command::Backup { selection, quiet }) = cli.command else {
            panic!("expected backup subcommand");
        };
        let config = selection.to_config(&CategoryTable::builtin()).unwrap();
        assert!(!quiet);
        assert_eq!(config.source.as_deref(), Some(std::path::Path::new("/src")));
        assert_eq!(config.destination.as_deref(), Some(std::path::Path::new("/dst")));
        assert_eq!(config.extensions.to_string(), ".jpg");
        assert!(!config.include_hidden);
    }
}
