//! Directory scanning for onestep.
//!
//! This crate walks a directory tree with jwalk and collects every regular
//! file whose suffix is in an accepted [`ExtensionSet`].
//!
//! # Example
//!
//! ```rust,no_run
//! use std::path::Path;
//! use onestep_scan::{ExtensionScanner, ExtensionSet};
//!
//! let accepted: ExtensionSet = [".jpg", ".png"].into_iter().collect();
//! let scanner = ExtensionScanner::new();
//! let result = scanner.scan(Path::new("/path/to/photos"), &accepted);
//!
//! println!("Found {} matching files", result.len());
//! ```
//!
//! # Progress Monitoring
//!
//! Long scans publish [`ScanProgress`] snapshots on a broadcast channel:
//!
//! ```rust,no_run
//! use onestep_scan::ExtensionScanner;
//!
//! let scanner = ExtensionScanner::new();
//! let mut progress_rx = scanner.subscribe();
//!
//! tokio::spawn(async move {
//!     while let Ok(progress) = progress_rx.recv().await {
//!         println!("Matched {} of {} files", progress.files_matched, progress.files_seen);
//!     }
//! });
//! ```

mod progress;
mod scanner;

pub use progress::ScanProgress;
pub use scanner::{ExtensionScanner, ScanOptions, ScanResult};

// Re-export core types for convenience
pub use onestep_core::{BackupError, Extension, ExtensionSet, ScanWarning, WarningKind};
