//! Terminal user interface for onestep.
//!
//! The main window holds the source and destination directories, the
//! accepted file types, a progress bar and a message list. The file type
//! dialog is a check box tree of categories and extensions. Backups and
//! preview scans run on background workers, so the window stays responsive
//! and a running backup can be cancelled.
//!
//! # Usage
//!
//! ```rust,no_run
//! use onestep_core::{BackupConfig, CategoryTable};
//!
//! let config = BackupConfig {
//!     extensions: CategoryTable::default_selection(),
//!     ..BackupConfig::default()
//! };
//! onestep_tui::run(config, CategoryTable::builtin()).unwrap();
//! ```
//!
//! # Keyboard
//!
//! - `s` / `d` - Set source / destination directory
//! - `t` - Choose file types
//! - `Enter` or `b` - Start backup
//! - `p` - Preview matching files
//! - `Esc` - Cancel a running backup
//! - `?` - Help
//! - `q` - Quit

pub mod app;
mod event;
mod theme;
mod ui;

pub use app::{App, AppResult};
pub use theme::Theme;

use onestep_core::{BackupConfig, CategoryTable};

/// Run the TUI application.
///
/// `config` seeds the window: any directories and extensions it carries are
/// shown as already chosen.
pub fn run(config: BackupConfig, table: CategoryTable) -> AppResult<()> {
    let rt = tokio::runtime::Runtime::new()?;

    let terminal = ratatui::init();
    let result = rt.block_on(App::new(config, table).run(terminal));
    ratatui::restore();

    // The backup has already stopped; only a cancelled preview scan may linger
    rt.shutdown_timeout(std::time::Duration::from_millis(500));

    result
}
