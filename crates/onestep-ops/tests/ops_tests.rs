use std::fs;
use std::path::{Path, PathBuf};

use onestep_core::{BackupConfig, BackupError, DirectoryRole, ExtensionSet};
use onestep_ops::{
    copy_files, run_backup, start_backup, BackupEvent, BackupOutcome, BackupState, CopyOptions,
    FileOutcome,
};
use tempfile::TempDir;
use tokio_util::sync::CancellationToken;

fn write_files(dir: &Path, names: &[&str]) -> Vec<PathBuf> {
    fs::create_dir_all(dir).unwrap();
    names
        .iter()
        .map(|name| {
            let path = dir.join(name);
            fs::write(&path, format!("content of {name}")).unwrap();
            path
        })
        .collect()
}

fn dir_names(dir: &Path) -> Vec<String> {
    let mut names: Vec<_> = fs::read_dir(dir)
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    names.sort();
    names
}

fn media() -> ExtensionSet {
    [".jpg", ".png"].into_iter().collect()
}

fn progress_percents(events: &[BackupEvent]) -> Vec<u8> {
    events
        .iter()
        .filter_map(|e| match e {
            BackupEvent::Progress { percent, message } if message.starts_with("Copying: ") => {
                Some(*percent)
            }
            _ => None,
        })
        .collect()
}

fn states(events: &[BackupEvent]) -> Vec<BackupState> {
    events
        .iter()
        .filter_map(|e| match e {
            BackupEvent::StateChanged(state) => Some(*state),
            _ => None,
        })
        .collect()
}

#[test]
fn test_copy_creates_nested_destination() {
    let temp = TempDir::new().unwrap();
    let files = write_files(&temp.path().join("src"), &["a.jpg", "b.jpg"]);
    let dest = temp.path().join("backup").join("2024").join("photos");

    let outcome = copy_files(&files, &dest, &CopyOptions::default(), &CancellationToken::new(), |_| {})
        .unwrap();

    assert!(outcome.is_success());
    assert_eq!(outcome.copied(), 2);
    assert_eq!(dir_names(&dest), ["a.jpg", "b.jpg"]);
}

#[test]
fn test_copy_renames_only_the_colliding_file() {
    let temp = TempDir::new().unwrap();
    let files = write_files(&temp.path().join("src"), &["a.jpg", "b.jpg", "c.jpg"]);
    let dest = temp.path().join("dst");
    write_files(&dest, &["b.jpg"]);
    fs::write(dest.join("b.jpg"), "already here").unwrap();

    let outcome = copy_files(&files, &dest, &CopyOptions::default(), &CancellationToken::new(), |_| {})
        .unwrap();

    assert!(outcome.is_success());
    assert_eq!(dir_names(&dest), ["a.jpg", "b.jpg", "b_1.jpg", "c.jpg"]);
    assert_eq!(fs::read_to_string(dest.join("b.jpg")).unwrap(), "already here");
    assert_eq!(fs::read_to_string(dest.join("b_1.jpg")).unwrap(), "content of b.jpg");

    let renamed: Vec<_> = outcome
        .files
        .iter()
        .filter_map(|f| match f {
            FileOutcome::Copied { source, destination, .. }
                if source.file_name() != destination.file_name() =>
            {
                Some(destination.clone())
            }
            _ => None,
        })
        .collect();
    assert_eq!(renamed, [dest.join("b_1.jpg")]);
}

#[test]
fn test_copy_same_name_from_different_folders() {
    let temp = TempDir::new().unwrap();
    let mut files = write_files(&temp.path().join("src/one"), &["IMG_0001.jpg"]);
    files.extend(write_files(&temp.path().join("src/two"), &["IMG_0001.jpg"]));
    files.extend(write_files(&temp.path().join("src/three"), &["IMG_0001.jpg"]));
    let dest = temp.path().join("dst");

    copy_files(&files, &dest, &CopyOptions::default(), &CancellationToken::new(), |_| {}).unwrap();

    assert_eq!(
        dir_names(&dest),
        ["IMG_0001.jpg", "IMG_0001_1.jpg", "IMG_0001_2.jpg"]
    );
}

#[test]
fn test_copy_aborts_on_first_failure() {
    let temp = TempDir::new().unwrap();
    let src = temp.path().join("src");
    let mut files = write_files(&src, &["1.jpg", "2.jpg"]);
    // File 3 of 5 vanished after the scan
    files.push(src.join("3.jpg"));
    files.extend(write_files(&src, &["4.jpg", "5.jpg"]));
    let dest = temp.path().join("dst");

    let mut attempted = Vec::new();
    let outcome = copy_files(&files, &dest, &CopyOptions::default(), &CancellationToken::new(), |p| {
        attempted.push(p.source.clone())
    })
    .unwrap();

    assert!(!outcome.is_success());
    assert_eq!(outcome.files.len(), 3);
    assert_eq!(outcome.copied(), 2);
    assert_eq!(outcome.failure().map(FileOutcome::source), Some(src.join("3.jpg").as_path()));
    assert_eq!(attempted, files[..2]);
    assert_eq!(dir_names(&dest), ["1.jpg", "2.jpg"]);

    assert!(matches!(
        outcome.into_result(),
        Err(BackupError::CopyFailed { path, .. }) if path == src.join("3.jpg")
    ));
}

#[test]
fn test_copy_progress_is_integer_percentage() {
    let temp = TempDir::new().unwrap();
    let files = write_files(&temp.path().join("src"), &["a.jpg", "b.jpg", "c.jpg"]);

    let mut percents = Vec::new();
    copy_files(
        &files,
        &temp.path().join("dst"),
        &CopyOptions::default(),
        &CancellationToken::new(),
        |p| percents.push(p.percentage()),
    )
    .unwrap();

    assert_eq!(percents, [33, 66, 100]);
}

#[test]
fn test_copy_cancellation_between_files() {
    let temp = TempDir::new().unwrap();
    let files = write_files(&temp.path().join("src"), &["a.jpg", "b.jpg", "c.jpg"]);
    let dest = temp.path().join("dst");
    let cancel = CancellationToken::new();

    let outcome = copy_files(&files, &dest, &CopyOptions::default(), &cancel, |_| cancel.cancel())
        .unwrap();

    assert!(outcome.cancelled);
    assert_eq!(outcome.copied(), 1);
    assert!(outcome.failure().is_none());
    assert_eq!(dir_names(&dest), ["a.jpg"]);
    assert!(matches!(outcome.into_result(), Err(BackupError::Cancelled)));
}

#[test]
fn test_copy_destination_create_failure() {
    let temp = TempDir::new().unwrap();
    let files = write_files(&temp.path().join("src"), &["a.jpg"]);
    let blocker = temp.path().join("not-a-dir");
    fs::write(&blocker, "file").unwrap();

    let result = copy_files(
        &files,
        &blocker.join("dst"),
        &CopyOptions::default(),
        &CancellationToken::new(),
        |_| {},
    );

    assert!(matches!(
        result,
        Err(BackupError::DestinationCreateFailed { .. })
    ));
}

#[test]
fn test_backup_end_to_end() {
    let temp = TempDir::new().unwrap();
    let src = temp.path().join("src");
    write_files(&src, &["a.jpg", "b.txt", "c.PNG"]);
    let dest = temp.path().join("dst");

    let mut events = Vec::new();
    let config = BackupConfig::new(&src, &dest, media());
    let outcome = run_backup(&config, &CancellationToken::new(), |e| events.push(e)).unwrap();

    assert!(matches!(outcome, BackupOutcome::Completed { copied: 2, .. }));
    assert_eq!(dir_names(&dest), ["a.jpg", "c.PNG"]);
    assert_eq!(progress_percents(&events), [50, 100]);
    assert_eq!(
        states(&events),
        [BackupState::Scanning, BackupState::Copying, BackupState::Completed]
    );
    assert!(matches!(
        &events[1],
        BackupEvent::Progress { percent: 0, message } if message == "Searching for matching files..."
    ));
    assert!(events.iter().any(|e| matches!(
        e,
        BackupEvent::Progress { message, .. } if message == "Found 2 matching files. Starting backup..."
    )));
}

#[test]
fn test_backup_collision_end_to_end() {
    let temp = TempDir::new().unwrap();
    let src = temp.path().join("src");
    write_files(&src, &["a.jpg"]);
    let dest = temp.path().join("dst");
    fs::create_dir_all(&dest).unwrap();
    fs::write(dest.join("a.jpg"), "original backup").unwrap();

    let config = BackupConfig::new(&src, &dest, media());
    let outcome = run_backup(&config, &CancellationToken::new(), |_| {}).unwrap();

    assert!(outcome.is_success());
    assert_eq!(dir_names(&dest), ["a.jpg", "a_1.jpg"]);
    assert_eq!(fs::read_to_string(dest.join("a.jpg")).unwrap(), "original backup");
    assert_eq!(fs::read_to_string(dest.join("a_1.jpg")).unwrap(), "content of a.jpg");
}

#[test]
fn test_backup_no_matching_files() {
    let temp = TempDir::new().unwrap();
    let src = temp.path().join("src");
    write_files(&src, &["notes.txt"]);
    let dest = temp.path().join("dst");

    let mut events = Vec::new();
    let config = BackupConfig::new(&src, &dest, media());
    let outcome = run_backup(&config, &CancellationToken::new(), |e| events.push(e)).unwrap();

    assert!(matches!(outcome, BackupOutcome::NoFilesFound { ref root } if root == &src));
    assert_eq!(states(&events), [BackupState::Scanning, BackupState::NoFilesFound]);
    assert!(!dest.exists());
}

#[test]
fn test_backup_reports_unreadable_source() {
    let temp = TempDir::new().unwrap();
    let missing = temp.path().join("no-such-dir");
    let dest = temp.path().join("dst");

    let mut events = Vec::new();
    let config = BackupConfig::new(&missing, &dest, media());
    let outcome = run_backup(&config, &CancellationToken::new(), |e| events.push(e)).unwrap();

    assert_eq!(outcome.state(), BackupState::NoFilesFound);
    let messages: Vec<_> = events
        .iter()
        .filter_map(|e| match e {
            BackupEvent::Progress { message, .. } => Some(message.as_str()),
            _ => None,
        })
        .collect();
    assert!(messages.iter().any(|m| m.contains("could not be read")), "{messages:?}");
    assert!(!dest.exists());
}

#[test]
fn test_backup_cancelled_before_scan() {
    let temp = TempDir::new().unwrap();
    let src = temp.path().join("src");
    write_files(&src, &["a.jpg"]);
    let cancel = CancellationToken::new();
    cancel.cancel();

    let mut events = Vec::new();
    let config = BackupConfig::new(&src, temp.path().join("dst"), media());
    let outcome = run_backup(&config, &cancel, |e| events.push(e)).unwrap();

    assert!(matches!(outcome, BackupOutcome::Cancelled { copied: 0, total: 0 }));
    assert_eq!(states(&events), [BackupState::Scanning, BackupState::Cancelled]);
}

#[test]
fn test_backup_copy_failure_reports_path() {
    let temp = TempDir::new().unwrap();
    let src = temp.path().join("src");
    write_files(&src, &["a.jpg"]);
    let blocker = temp.path().join("blocker");
    fs::write(&blocker, "file").unwrap();

    let config = BackupConfig::new(&src, blocker.join("dst"), media());
    let outcome = run_backup(&config, &CancellationToken::new(), |_| {}).unwrap();

    assert_eq!(outcome.state(), BackupState::Failed);
    assert!(matches!(
        outcome,
        BackupOutcome::Failed(BackupError::DestinationCreateFailed { .. })
    ));
}

#[tokio::test]
async fn test_start_backup_streams_events() {
    let temp = TempDir::new().unwrap();
    let src = temp.path().join("src");
    write_files(&src, &["a.jpg", "b.png", "c.gif"]);
    let dest = temp.path().join("dst");

    let mut handle = start_backup(BackupConfig::new(&src, &dest, media())).unwrap();

    let mut events = Vec::new();
    while let Some(event) = handle.recv().await {
        events.push(event);
    }

    assert_eq!(progress_percents(&events), [50, 100]);
    assert!(matches!(
        events.last(),
        Some(BackupEvent::Complete(BackupOutcome::Completed { copied: 2, .. }))
    ));
    assert_eq!(dir_names(&dest), ["a.jpg", "b.png"]);
}

#[tokio::test]
async fn test_start_backup_validates_immediately() {
    let config = BackupConfig::builder()
        .source("/somewhere")
        .extensions(media())
        .build()
        .unwrap();

    let result = start_backup(config);

    assert!(matches!(
        result,
        Err(BackupError::DirectoryNotSelected {
            role: DirectoryRole::Destination
        })
    ));
}
