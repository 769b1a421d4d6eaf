//! Collision-free destination names.

use std::ffi::{OsStr, OsString};
use std::fs;
use std::path::{Path, PathBuf};

/// Pick a destination path for `file_name` inside `dir` that does not exist yet.
///
/// The plain name is used when free. Otherwise `_1`, `_2`, ... is inserted
/// before the extension, where the extension is everything after the first
/// dot of the name: `photo.jpg` → `photo_1.jpg`, `backup.tar.gz` →
/// `backup_1.tar.gz`, `README` → `README_1`.
///
/// Any directory entry counts as taken, including a dangling symlink. Names
/// that are not valid UTF-8 keep every original byte.
pub fn unique_destination(dir: &Path, file_name: &OsStr) -> PathBuf {
    let candidate = dir.join(file_name);
    if !is_taken(&candidate) {
        return candidate;
    }

    let (stem, suffixes) = split_name(file_name);

    let mut counter: u64 = 1;
    loop {
        let mut new_name: OsString = stem.to_os_string();
        new_name.push(format!("_{counter}"));
        for suffix in &suffixes {
            new_name.push(".");
            new_name.push(suffix);
        }
        let candidate = dir.join(new_name);
        if !is_taken(&candidate) {
            return candidate;
        }
        counter += 1;
    }
}

fn is_taken(path: &Path) -> bool {
    fs::symlink_metadata(path).is_ok()
}

/// Split at the first dot that is not the leading character.
///
/// Returns the stem and the dot-separated pieces after it, in order.
fn split_name(name: &OsStr) -> (&OsStr, Vec<&OsStr>) {
    let mut stem = name;
    let mut suffixes = Vec::new();
    loop {
        let path = Path::new(stem);
        match (path.file_stem(), path.extension()) {
            (Some(rest), Some(ext)) => {
                suffixes.push(ext);
                stem = rest;
            }
            _ => break,
        }
    }
    suffixes.reverse();
    (stem, suffixes)
}

/// Join split suffixes back with dots.
#[cfg(test)]
fn joined_suffix(suffixes: &[&OsStr]) -> Option<OsString> {
    let (first, rest) = suffixes.split_first()?;
    let mut joined = first.to_os_string();
    for suffix in rest {
        joined.push(".");
        joined.push(suffix);
    }
    Some(joined)
}
