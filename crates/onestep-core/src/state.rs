//! Tri-state selection values.

use serde::{Deserialize, Serialize};

/// Check state of a node in the selection tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum SelectionState {
    #[default]
    Unchecked,
    Checked,
    /// Some, but not all, children are checked.
    Partial,
}

impl SelectionState {
    /// Derive a parent state from how many of its children are checked.
    ///
    /// An empty parent is always unchecked.
    pub fn from_counts(checked: usize, total: usize) -> Self {
        if total == 0 || checked == 0 {
            Self::Unchecked
        } else if checked == total {
            Self::Checked
        } else {
            Self::Partial
        }
    }

    /// State after a user toggle. Partial toggles to checked.
    pub fn toggled(self) -> Self {
        match self {
            Self::Checked => Self::Unchecked,
            Self::Unchecked | Self::Partial => Self::Checked,
        }
    }

    pub fn is_checked(self) -> bool {
        self == Self::Checked
    }

    /// Checkbox marker used by text front-ends.
    pub fn marker(self) -> &'static str {
        match self {
            Self::Checked => "[x]",
            Self::Unchecked => "[ ]",
            Self::Partial => "[-]",
        }
    }
}

impl From<bool> for SelectionState {
    fn from(checked: bool) -> Self {
        if checked { Self::Checked } else { Self::Unchecked }
    }
}

impl std::fmt::Display for SelectionState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Unchecked => write!(f, "unchecked"),
            Self::Checked => write!(f, "checked"),
            Self::Partial => write!(f, "partial"),
        }
    }
}
