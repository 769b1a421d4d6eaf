//! File type categories and the built-in category table.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::extension::{Extension, ExtensionSet};

/// A named group of extensions, e.g. "Photos".
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    /// Display name.
    pub name: String,
    /// Raw extension strings in display order.
    pub extensions: Vec<String>,
}

impl Category {
    /// Create a category from raw extension strings.
    pub fn new(name: impl Into<String>, extensions: &[&str]) -> Self {
        Self {
            name: name.into(),
            extensions: extensions.iter().map(|e| (*e).to_string()).collect(),
        }
    }

    /// Normalized extensions in display order.
    pub fn normalized(&self) -> impl Iterator<Item = Extension> + '_ {
        self.extensions.iter().map(|raw| Extension::new(raw))
    }
}

/// Ordered mapping from category name to raw extension lists.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CategoryTable(IndexMap<String, Vec<String>>);

impl CategoryTable {
    /// Create an empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// The table compiled into the application.
    pub fn builtin() -> Self {
        [
            Category::new(
                "Photos",
                &[
                    ".jpg", ".jpeg", ".png", ".gif", ".bmp", ".tiff", ".webp", ".heic", ".raw",
                ],
            ),
            Category::new(
                "Videos",
                &[".mp4", ".avi", ".mov", ".wmv", ".flv", ".mkv", ".webm"],
            ),
            Category::new("Audio", &[".mp3", ".wav", ".flac", ".aac", ".ogg", ".m4a"]),
            Category::new(
                "Documents",
                &[
                    ".pdf", ".doc", ".docx", ".xls", ".xlsx", ".ppt", ".pptx", ".txt", ".odt",
                    ".rtf",
                ],
            ),
            Category::new("Archives", &[".zip", ".rar", ".7z", ".tar", ".gz"]),
        ]
        .into_iter()
        .collect()
    }

    /// Extensions selected when the user has not chosen any yet.
    pub fn default_selection() -> ExtensionSet {
        [
            // Image formats
            ".jpg", ".jpeg", ".png", ".gif", ".bmp", ".tiff", ".webp",
            // Video formats
            ".mp4", ".avi", ".mov", ".wmv", ".flv", ".mkv", ".webm",
        ]
        .into_iter()
        .collect()
    }

    /// Add or replace a category.
    pub fn insert(&mut self, category: Category) {
        self.0.insert(category.name, category.extensions);
    }

    /// Look up a category's raw extensions by name (case-insensitive).
    pub fn get(&self, name: &str) -> Option<&[String]> {
        self.0
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, exts)| exts.as_slice())
    }

    /// All normalized extensions of a category, or `None` if it does not exist.
    pub fn extensions_of(&self, name: &str) -> Option<ExtensionSet> {
        self.get(name)
            .map(|exts| exts.iter().map(|e| Extension::new(e)).collect())
    }

    /// Iterate `(name, raw extensions)` in table order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_slice()))
    }

    /// Category names in table order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl FromIterator<Category> for CategoryTable {
    fn from_iter<I: IntoIterator<Item = Category>>(iter: I) -> Self {
        let mut table = Self::new();
        for category in iter {
            table.insert(category);
        }
        table
    }
}
