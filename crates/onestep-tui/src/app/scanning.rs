//! Background preview scan.

use std::path::PathBuf;

use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::debug;

use onestep_core::ExtensionSet;
use onestep_scan::{ExtensionScanner, ScanOptions};

use super::constants::PREVIEW_CHANNEL_SIZE;
use super::state::{PreviewMessage, PreviewResult};

/// Start listing the files a backup of `root` would copy.
///
/// Progress and the final list arrive on the returned receiver. A cancelled
/// scan sends nothing further, so a superseded preview never overwrites a
/// newer one.
pub fn start_preview(
    root: PathBuf,
    accepted: ExtensionSet,
    options: ScanOptions,
    cancel: CancellationToken,
) -> mpsc::Receiver<PreviewMessage> {
    let (tx, rx) = mpsc::channel(PREVIEW_CHANNEL_SIZE);

    tokio::spawn(async move {
        let scanner = ExtensionScanner::with_options(options);
        let mut progress_rx = scanner.subscribe();

        let tx_progress = tx.clone();
        let progress_task = tokio::spawn(async move {
            while let Ok(progress) = progress_rx.recv().await {
                if tx_progress.send(PreviewMessage::Progress(progress)).await.is_err() {
                    break;
                }
            }
        });

        // jwalk blocks, so keep it off the async workers
        let scan_root = root.clone();
        let result = tokio::task::spawn_blocking(move || {
            scanner.scan_cancellable(&scan_root, &accepted, &cancel)
        })
        .await;

        progress_task.abort();
        let message = match result {
            Ok(Ok(scan)) => PreviewMessage::Complete(PreviewResult {
                root,
                warnings: scan.warnings.len(),
                files: scan.into_files(),
            }),
            Ok(Err(err)) => {
                debug!(root = %root.display(), %err, "preview scan stopped");
                return;
            }
            Err(join_err) => PreviewMessage::Failed(join_err.to_string()),
        };
        let _ = tx.send(message).await;
    });

    rx
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    async fn collect(mut rx: mpsc::Receiver<PreviewMessage>) -> Option<PreviewResult> {
        while let Some(message) = rx.recv().await {
            if let PreviewMessage::Complete(result) = message {
                return Some(result);
            }
        }
        None
    }

    #[tokio::test]
    async fn test_preview_lists_matches() {
        let temp = TempDir::new().unwrap();
        std::fs::write(temp.path().join("a.jpg"), "a").unwrap();
        std::fs::write(temp.path().join("b.txt"), "b").unwrap();

        let accepted: ExtensionSet = [".jpg"].into_iter().collect();
        let rx = start_preview(
            temp.path().to_path_buf(),
            accepted,
            ScanOptions::default(),
            CancellationToken::new(),
        );

        let result = collect(rx).await.unwrap();
        assert_eq!(result.files.len(), 1);
        assert!(result.files[0].ends_with("a.jpg"));
        assert_eq!(result.root, temp.path());
    }

    #[tokio::test]
    async fn test_cancelled_preview_sends_no_result() {
        let temp = TempDir::new().unwrap();
        std::fs::write(temp.path().join("a.jpg"), "a").unwrap();
        let cancel = CancellationToken::new();
        cancel.cancel();

        let accepted: ExtensionSet = [".jpg"].into_iter().collect();
        let rx = start_preview(temp.path().to_path_buf(), accepted, ScanOptions::default(), cancel);

        assert!(collect(rx).await.is_none());
    }
}
