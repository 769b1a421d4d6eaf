//! Drive the window through whole backups without a terminal.

use std::fs;
use std::time::Duration;

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyEventState, KeyModifiers};
use tempfile::TempDir;

use onestep_core::{BackupConfig, CategoryTable, DirectoryRole};
use onestep_ops::BackupState;
use onestep_tui::app::state::{AppMode, NoticeLevel};
use onestep_tui::App;

fn key(code: KeyCode) -> KeyEvent {
    KeyEvent {
        code,
        modifiers: KeyModifiers::NONE,
        kind: KeyEventKind::Press,
        state: KeyEventState::NONE,
    }
}

fn app_for(extensions: &[&str]) -> App {
    let config = BackupConfig {
        extensions: extensions.iter().copied().collect(),
        ..BackupConfig::default()
    };
    App::new(config, CategoryTable::builtin())
}

async fn settle_preview(app: &mut App) {
    tokio::time::timeout(Duration::from_secs(10), async {
        while app.is_previewing() {
            app.poll_workers().await;
        }
    })
    .await
    .unwrap();
}

async fn settle_backup(app: &mut App) {
    tokio::time::timeout(Duration::from_secs(10), async {
        while app.is_busy() {
            app.poll_workers().await;
        }
    })
    .await
    .unwrap();
}

#[tokio::test]
async fn test_preview_then_backup() {
    let temp = TempDir::new().unwrap();
    let src = temp.path().join("src");
    fs::create_dir_all(src.join("nested")).unwrap();
    fs::write(src.join("a.jpg"), "a").unwrap();
    fs::write(src.join("nested/c.PNG"), "c").unwrap();
    fs::write(src.join("b.txt"), "b").unwrap();
    let dest = temp.path().join("dst");

    let mut app = app_for(&[".jpg", ".png"]);
    app.set_directory(DirectoryRole::Destination, dest.clone());
    app.set_directory(DirectoryRole::Source, src.clone());
    settle_preview(&mut app).await;

    let listing: Vec<_> = app.log().visible(20).map(str::to_string).collect();
    assert!(listing.contains(&"Found 2 matching files:".to_string()));

    app.handle_key(key(KeyCode::Enter));
    assert!(app.is_busy());
    settle_backup(&mut app).await;

    assert_eq!(app.backup_view().state, BackupState::Completed);
    assert_eq!(app.backup_view().percent, 100);
    let notice = app.notice().unwrap();
    assert_eq!(notice.level, NoticeLevel::Success);
    assert_eq!(notice.text, "Backup completed successfully! 2 files copied");

    assert!(dest.join("a.jpg").exists());
    assert!(dest.join("c.PNG").exists());
    assert!(!dest.join("b.txt").exists());

    // The window is usable again after the notice is dismissed
    app.handle_key(key(KeyCode::Char('x')));
    assert!(app.notice().is_none());
    app.handle_key(key(KeyCode::Char('t')));
    assert_eq!(app.mode(), AppMode::SelectingTypes);
}

#[tokio::test]
async fn test_backup_with_no_matches_is_informational() {
    let temp = TempDir::new().unwrap();
    let src = temp.path().join("src");
    fs::create_dir_all(&src).unwrap();
    fs::write(src.join("notes.txt"), "n").unwrap();
    let dest = temp.path().join("dst");

    let mut app = app_for(&[".jpg"]);
    app.set_directory(DirectoryRole::Destination, dest.clone());
    app.set_directory(DirectoryRole::Source, src.clone());
    settle_preview(&mut app).await;
    assert_eq!(
        app.log().last(),
        Some("No matching files found in the selected directory.")
    );

    app.handle_key(key(KeyCode::Char('b')));
    settle_backup(&mut app).await;

    assert_eq!(app.backup_view().state, BackupState::NoFilesFound);
    assert_eq!(app.notice().map(|n| n.level), Some(NoticeLevel::Info));
    assert!(!dest.exists());
}

#[tokio::test]
async fn test_backup_collision_renames() {
    let temp = TempDir::new().unwrap();
    let src = temp.path().join("src");
    fs::create_dir_all(&src).unwrap();
    fs::write(src.join("a.jpg"), "new").unwrap();
    let dest = temp.path().join("dst");
    fs::create_dir_all(&dest).unwrap();
    fs::write(dest.join("a.jpg"), "old").unwrap();

    let mut app = app_for(&[".jpg"]);
    app.set_directory(DirectoryRole::Destination, dest.clone());
    app.set_directory(DirectoryRole::Source, src);
    settle_preview(&mut app).await;

    app.handle_key(key(KeyCode::Enter));
    settle_backup(&mut app).await;

    assert_eq!(fs::read_to_string(dest.join("a.jpg")).unwrap(), "old");
    assert_eq!(fs::read_to_string(dest.join("a_1.jpg")).unwrap(), "new");
}

#[tokio::test]
async fn test_editing_blocked_while_busy() {
    let temp = TempDir::new().unwrap();
    let src = temp.path().join("src");
    fs::create_dir_all(&src).unwrap();
    for i in 0..20 {
        fs::write(src.join(format!("{i}.jpg")), "x").unwrap();
    }

    let mut app = app_for(&[".jpg"]);
    app.set_directory(DirectoryRole::Destination, temp.path().join("dst"));
    app.set_directory(DirectoryRole::Source, src);
    settle_preview(&mut app).await;

    app.handle_key(key(KeyCode::Enter));
    assert!(app.is_busy());

    app.handle_key(key(KeyCode::Char('t')));
    assert_eq!(app.mode(), AppMode::Normal);
    assert_eq!(app.notice().map(|n| n.level), Some(NoticeLevel::Warning));

    settle_backup(&mut app).await;
    assert!(!app.is_busy());
}

#[tokio::test]
async fn test_shut_down_waits_for_backup() {
    let temp = TempDir::new().unwrap();
    let src = temp.path().join("src");
    fs::create_dir_all(&src).unwrap();
    for i in 0..50 {
        fs::write(src.join(format!("{i}.jpg")), vec![b'x'; 64 * 1024]).unwrap();
    }
    let dest = temp.path().join("dst");

    let mut app = app_for(&[".jpg"]);
    app.set_directory(DirectoryRole::Destination, dest.clone());
    app.set_directory(DirectoryRole::Source, src);
    settle_preview(&mut app).await;

    app.handle_key(key(KeyCode::Enter));
    assert!(app.is_busy());

    tokio::time::timeout(Duration::from_secs(10), app.shut_down())
        .await
        .unwrap();

    assert!(!app.is_busy());
    assert!(matches!(
        app.backup_view().state,
        BackupState::Cancelled | BackupState::Completed
    ));
    // Every file that made it across is whole
    if dest.exists() {
        for entry in fs::read_dir(&dest).unwrap() {
            assert_eq!(entry.unwrap().metadata().unwrap().len(), 64 * 1024);
        }
    }
}
