//! Scan progress reporting.

use std::path::PathBuf;
use std::time::{Duration, Instant};

/// Progress information during a scan.
#[derive(Debug, Clone)]
pub struct ScanProgress {
    /// Regular files visited so far.
    pub files_seen: u64,
    /// Files whose extension was accepted.
    pub files_matched: u64,
    /// Most recently visited path.
    pub current_path: PathBuf,
    /// Entries skipped because of errors.
    pub errors_count: u64,
    /// Time elapsed since scan started.
    pub elapsed: Duration,
}

impl ScanProgress {
    /// Create initial progress state.
    pub fn new() -> Self {
        Self {
            files_seen: 0,
            files_matched: 0,
            current_path: PathBuf::new(),
            errors_count: 0,
            elapsed: Duration::ZERO,
        }
    }

    /// Calculate scan rate in files per second.
    pub fn files_per_second(&self) -> f64 {
        if self.elapsed.as_secs_f64() > 0.0 {
            self.files_seen as f64 / self.elapsed.as_secs_f64()
        } else {
            0.0
        }
    }
}

impl Default for ScanProgress {
    fn default() -> Self {
        Self::new()
    }
}

/// Internal progress tracker with timing.
#[derive(Debug)]
pub(crate) struct ProgressTracker {
    start_time: Instant,
    files_seen: u64,
    files_matched: u64,
    errors_count: u64,
    current_path: PathBuf,
}

impl ProgressTracker {
    pub fn new() -> Self {
        Self {
            start_time: Instant::now(),
            files_seen: 0,
            files_matched: 0,
            errors_count: 0,
            current_path: PathBuf::new(),
        }
    }

    pub fn record_file(&mut self, path: &std::path::Path, matched: bool) {
        self.files_seen += 1;
        if matched {
            self.files_matched += 1;
        }
        self.current_path = path.to_path_buf();
    }

    pub fn record_error(&mut self) {
        self.errors_count += 1;
    }

    pub fn files_seen(&self) -> u64 {
        self.files_seen
    }

    pub fn elapsed(&self) -> Duration {
        self.start_time.elapsed()
    }

    pub fn snapshot(&self) -> ScanProgress {
        ScanProgress {
            files_seen: self.files_seen,
            files_matched: self.files_matched,
            current_path: self.current_path.clone(),
            errors_count: self.errors_count,
            elapsed: self.start_time.elapsed(),
        }
    }
}
