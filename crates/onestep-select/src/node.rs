//! Nodes of the selection tree.

use serde::Serialize;

use onestep_core::{Extension, SelectionState};

/// Position of a category in the tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct CategoryId(pub usize);

impl std::fmt::Display for CategoryId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A leaf: one extension with a two-state check box.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExtensionNode {
    pub(crate) extension: Extension,
    pub(crate) state: SelectionState,
}

impl ExtensionNode {
    pub(crate) fn new(extension: Extension, checked: bool) -> Self {
        Self {
            extension,
            state: SelectionState::from(checked),
        }
    }

    pub fn extension(&self) -> &Extension {
        &self.extension
    }

    pub fn state(&self) -> SelectionState {
        self.state
    }

    pub fn is_checked(&self) -> bool {
        self.state.is_checked()
    }
}

/// A category and the extensions it owns.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CategoryNode {
    pub(crate) name: String,
    pub(crate) extensions: Vec<ExtensionNode>,
    pub(crate) state: SelectionState,
}

impl CategoryNode {
    pub(crate) fn new(name: impl Into<String>, extensions: Vec<ExtensionNode>) -> Self {
        let mut node = Self {
            name: name.into(),
            extensions,
            state: SelectionState::Unchecked,
        };
        node.recompute_state();
        node
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Derived state; see [`SelectionState::from_counts`].
    pub fn state(&self) -> SelectionState {
        self.state
    }

    pub fn extensions(&self) -> &[ExtensionNode] {
        &self.extensions
    }

    pub fn checked_count(&self) -> usize {
        self.extensions.iter().filter(|e| e.is_checked()).count()
    }

    /// Recompute the category state by scanning every leaf.
    ///
    /// Always a full scan, never a running counter.
    pub(crate) fn recompute_state(&mut self) -> SelectionState {
        self.state = SelectionState::from_counts(self.checked_count(), self.extensions.len());
        self.state
    }

    /// Force every leaf to `state`. Partial leaves the leaves alone.
    pub(crate) fn apply_to_children(&mut self, state: SelectionState) {
        if state == SelectionState::Partial {
            return;
        }
        for leaf in &mut self.extensions {
            leaf.state = state;
        }
    }

    pub(crate) fn position_of(&self, extension: &Extension) -> Option<usize> {
        self.extensions.iter().position(|e| &e.extension == extension)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn leaves(states: &[bool]) -> Vec<ExtensionNode> {
        states
            .iter()
            .enumerate()
            .map(|(i, &checked)| ExtensionNode::new(Extension::new(&format!("e{i}")), checked))
            .collect()
    }

    #[test]
    fn test_new_derives_state() {
        assert_eq!(CategoryNode::new("a", leaves(&[])).state(), SelectionState::Unchecked);
        assert_eq!(
            CategoryNode::new("a", leaves(&[true, true])).state(),
            SelectionState::Checked
        );
        assert_eq!(
            CategoryNode::new("a", leaves(&[true, false])).state(),
            SelectionState::Partial
        );
    }

    #[test]
    fn test_apply_partial_is_noop() {
        let mut node = CategoryNode::new("a", leaves(&[true, false]));
        node.apply_to_children(SelectionState::Partial);
        assert_eq!(node.checked_count(), 1);
    }
}
