//! Progress reporting types for the copy phase.

use std::path::PathBuf;

/// Integer percentage of `completed` out of `total`, truncated.
///
/// Reaches 100 only when `completed == total`. A zero total reports 0.
pub fn percent_complete(completed: usize, total: usize) -> u8 {
    if total == 0 {
        return 0;
    }
    ((completed.min(total) * 100) / total) as u8
}

/// Progress after one file has been copied.
#[derive(Debug, Clone)]
pub struct CopyProgress {
    /// Files copied so far, this one included.
    pub files_completed: usize,
    /// Files in the whole run.
    pub files_total: usize,
    /// Bytes copied so far.
    pub bytes_copied: u64,
    /// Source of the file just copied.
    pub source: PathBuf,
    /// Where it was written.
    pub destination: PathBuf,
}

impl CopyProgress {
    /// Progress as an integer percentage (0 to 100).
    pub fn percentage(&self) -> u8 {
        percent_complete(self.files_completed, self.files_total)
    }

    /// Human-readable line naming the file just copied.
    pub fn message(&self) -> String {
        let name = self
            .source
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| self.source.display().to_string());
        format!("Copying: {name}")
    }

    /// True if the destination name differs from the source name.
    pub fn was_renamed(&self) -> bool {
        self.source.file_name() != self.destination.file_name()
    }
}
