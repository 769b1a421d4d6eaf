//! Normalized file extensions and extension sets.

use std::collections::BTreeSet;
use std::fmt;
use std::path::Path;

use compact_str::CompactString;
use serde::{Deserialize, Serialize};

/// Separator placed in front of every normalized extension.
pub const EXTENSION_SEPARATOR: char = '.';

/// A normalized file extension such as `.jpg`.
///
/// Always lower-case, trimmed, and prefixed with exactly one
/// [`EXTENSION_SEPARATOR`].
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub struct Extension(CompactString);

impl Extension {
    /// Normalize a raw extension string (`" JPG "`, `"jpg"`, `".Jpg"` all give `.jpg`).
    pub fn new(raw: &str) -> Self {
        let lowered = raw.trim().to_lowercase();
        if lowered.starts_with(EXTENSION_SEPARATOR) {
            Self(lowered.into())
        } else {
            let mut ext = CompactString::with_capacity(lowered.len() + 1);
            ext.push(EXTENSION_SEPARATOR);
            ext.push_str(&lowered);
            Self(ext)
        }
    }

    /// Extension of a file path, or `None` when the file name has no suffix.
    pub fn from_path(path: &Path) -> Option<Self> {
        path.extension()
            .and_then(|ext| ext.to_str())
            .filter(|ext| !ext.is_empty())
            .map(Self::new)
    }

    /// Get the extension as a string slice, separator included.
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for Extension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<&str> for Extension {
    fn from(raw: &str) -> Self {
        Self::new(raw)
    }
}

impl From<String> for Extension {
    fn from(raw: String) -> Self {
        Self::new(&raw)
    }
}

impl From<Extension> for String {
    fn from(ext: Extension) -> Self {
        ext.0.into()
    }
}

impl AsRef<str> for Extension {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

/// The set of extensions accepted for a backup.
///
/// Kept sorted so listings and logs are stable between runs.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ExtensionSet(BTreeSet<Extension>);

impl ExtensionSet {
    /// Create an empty set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an extension, normalizing it first. Returns false if already present.
    pub fn insert(&mut self, ext: impl Into<Extension>) -> bool {
        self.0.insert(ext.into())
    }

    /// Remove an extension. Returns true if it was present.
    pub fn remove(&mut self, ext: &Extension) -> bool {
        self.0.remove(ext)
    }

    /// Check membership of an already normalized extension.
    pub fn contains(&self, ext: &Extension) -> bool {
        self.0.contains(ext)
    }

    /// Check whether a file's suffix is in the set. Files without a suffix never match.
    pub fn matches(&self, path: &Path) -> bool {
        Extension::from_path(path).is_some_and(|ext| self.0.contains(&ext))
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Iterate extensions in sorted order.
    pub fn iter(&self) -> impl Iterator<Item = &Extension> {
        self.0.iter()
    }

    /// Add every extension of `other` to this set.
    pub fn extend_from(&mut self, other: &ExtensionSet) {
        self.0.extend(other.0.iter().cloned());
    }
}

impl fmt::Display for ExtensionSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.is_empty() {
            return f.write_str("(none)");
        }
        let mut first = true;
        for ext in &self.0 {
            if !first {
                f.write_str(", ")?;
            }
            f.write_str(ext.as_str())?;
            first = false;
        }
        Ok(())
    }
}

impl<E: Into<Extension>> FromIterator<E> for ExtensionSet {
    fn from_iter<I: IntoIterator<Item = E>>(iter: I) -> Self {
        Self(iter.into_iter().map(Into::into).collect())
    }
}

impl<E: Into<Extension>> Extend<E> for ExtensionSet {
    fn extend<I: IntoIterator<Item = E>>(&mut self, iter: I) {
        self.0.extend(iter.into_iter().map(Into::into));
    }
}

impl IntoIterator for ExtensionSet {
    type Item = Extension;
    type IntoIter = std::collections::btree_set::IntoIter<Extension>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl<'a> IntoIterator for &'a ExtensionSet {
    type Item = &'a Extension;
    type IntoIter = std::collections::btree_set::Iter<'a, Extension>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize() {
        assert_eq!(Extension::new("jpg").as_str(), ".jpg");
        assert_eq!(Extension::new(" .JPG ").as_str(), ".jpg");
        assert_eq!(Extension::new("Tar.GZ").as_str(), ".tar.gz");
        assert_eq!(Extension::new(".png"), Extension::new("PNG"));
    }

    #[test]
    fn test_from_path() {
        assert_eq!(
            Extension::from_path(Path::new("/a/b/photo.JPeG")),
            Some(Extension::new(".jpeg"))
        );
        assert_eq!(Extension::from_path(Path::new("/a/b/Makefile")), None);
        assert_eq!(Extension::from_path(Path::new("/a/b/.bashrc")), None);
        assert_eq!(Extension::from_path(Path::new("trailing.")), None);
    }

    #[test]
    fn test_set_matches_case_insensitive() {
        let set: ExtensionSet = [".jpg", "png"].into_iter().collect();

        assert!(set.matches(Path::new("a.jpg")));
        assert!(set.matches(Path::new("c.PNG")));
        assert!(!set.matches(Path::new("b.txt")));
        assert!(!set.matches(Path::new("jpg")));
    }

    #[test]
    fn test_set_display_sorted() {
        let set: ExtensionSet = ["png", "gif", "jpg"].into_iter().collect();
        assert_eq!(set.to_string(), ".gif, .jpg, .png");
        assert_eq!(ExtensionSet::new().to_string(), "(none)");
    }
}
