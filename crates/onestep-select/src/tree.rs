//! The two-level selection tree and its propagation rules.

use serde::Serialize;
use tracing::{debug, trace};

use onestep_core::{CategoryTable, Extension, ExtensionSet, SelectionState};

use crate::error::SelectionError;
use crate::node::{CategoryId, CategoryNode, ExtensionNode};

/// Reference to a single node, as used by front-ends that keep a cursor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum NodeRef {
    Category(CategoryId),
    Extension(CategoryId, usize),
}

/// One visible row of the tree in display order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TreeRow {
    pub node: NodeRef,
    /// 0 for categories, 1 for extensions.
    pub depth: usize,
    pub label: String,
    pub state: SelectionState,
}

/// Category → extension hierarchy with tri-state check boxes.
///
/// Every public mutation runs as one propagation pass. While a pass is in
/// flight all further propagation is suppressed, so a category → children
/// cascade never re-triggers a children → category recompute half way.
#[derive(Debug, Clone, Serialize)]
pub struct SelectionTree {
    categories: Vec<CategoryNode>,
    #[serde(skip)]
    updating: bool,
}

impl SelectionTree {
    /// Build the tree from a category table and an initial selection.
    ///
    /// A leaf starts checked iff its normalized extension is in `initial`;
    /// category states are derived bottom-up.
    pub fn new(table: &CategoryTable, initial: &ExtensionSet) -> Self {
        let categories = table
            .iter()
            .map(|(name, raw)| {
                let leaves = raw
                    .iter()
                    .map(|r| {
                        let ext = Extension::new(r);
                        let checked = initial.contains(&ext);
                        ExtensionNode::new(ext, checked)
                    })
                    .collect();
                CategoryNode::new(name, leaves)
            })
            .collect();

        Self {
            categories,
            updating: false,
        }
    }

    /// All categories in display order.
    pub fn categories(&self) -> &[CategoryNode] {
        &self.categories
    }

    /// Get a category by id.
    pub fn category(&self, id: CategoryId) -> Option<&CategoryNode> {
        self.categories.get(id.0)
    }

    /// Find a category by name (case-insensitive).
    pub fn find_category(&self, name: &str) -> Option<CategoryId> {
        self.categories
            .iter()
            .position(|c| c.name.eq_ignore_ascii_case(name))
            .map(CategoryId)
    }

    /// Ids of all categories in display order.
    pub fn category_ids(&self) -> impl Iterator<Item = CategoryId> + use<> {
        (0..self.categories.len()).map(CategoryId)
    }

    /// Set a category's state, forcing every extension below it to match.
    ///
    /// `Partial` has no well-defined distribution over children, so it leaves
    /// the children untouched and the category keeps its derived state.
    pub fn set_category_state(
        &mut self,
        id: CategoryId,
        state: SelectionState,
    ) -> Result<(), SelectionError> {
        if id.0 >= self.categories.len() {
            return Err(SelectionError::UnknownCategory { id });
        }

        self.propagate(|categories| {
            let category = &mut categories[id.0];
            category.apply_to_children(state);
            let derived = category.recompute_state();
            debug!(category = %category.name, requested = %state, derived = %derived, "category state set");
        });
        Ok(())
    }

    /// Set the first leaf matching `extension` in a category, then recompute the category.
    pub fn set_extension_state(
        &mut self,
        id: CategoryId,
        extension: impl Into<Extension>,
        state: SelectionState,
    ) -> Result<(), SelectionError> {
        let extension = extension.into();
        let category = self
            .categories
            .get(id.0)
            .ok_or(SelectionError::UnknownCategory { id })?;
        let index = category
            .position_of(&extension)
            .ok_or_else(|| SelectionError::UnknownExtension {
                category: category.name.clone(),
                extension: extension.clone(),
            })?;

        self.set_leaf_state(id, index, state)
    }

    /// Set the leaf at `index` in a category, then recompute the category.
    ///
    /// Duplicate extensions within a category are independent leaves; this
    /// addresses exactly one of them.
    pub fn set_leaf_state(
        &mut self,
        id: CategoryId,
        index: usize,
        state: SelectionState,
    ) -> Result<(), SelectionError> {
        let category = self
            .categories
            .get(id.0)
            .ok_or(SelectionError::UnknownCategory { id })?;
        let leaf = category.extensions.get(index).ok_or_else(|| {
            SelectionError::ExtensionIndexOutOfRange {
                category: category.name.clone(),
                index,
            }
        })?;
        if state == SelectionState::Partial {
            return Err(SelectionError::PartialLeaf {
                extension: leaf.extension.clone(),
            });
        }

        self.propagate(|categories| {
            let category = &mut categories[id.0];
            category.extensions[index].state = state;
            let derived = category.recompute_state();
            debug!(
                category = %category.name,
                extension = %category.extensions[index].extension,
                state = %state,
                derived = %derived,
                "extension state set"
            );
        });
        Ok(())
    }

    /// Toggle a category or extension the way a check box click would.
    pub fn toggle(&mut self, node: NodeRef) -> Result<(), SelectionError> {
        match node {
            NodeRef::Category(id) => {
                let current = self
                    .category(id)
                    .ok_or(SelectionError::UnknownCategory { id })?
                    .state;
                self.set_category_state(id, current.toggled())
            }
            NodeRef::Extension(id, index) => {
                let current = self
                    .category(id)
                    .and_then(|c| c.extensions.get(index))
                    .map(|leaf| leaf.state)
                    .unwrap_or_default();
                self.set_leaf_state(id, index, current.toggled())
            }
        }
    }

    /// State of a single node, if it exists.
    pub fn state_of(&self, node: NodeRef) -> Option<SelectionState> {
        match node {
            NodeRef::Category(id) => self.category(id).map(|c| c.state),
            NodeRef::Extension(id, index) => self
                .category(id)
                .and_then(|c| c.extensions.get(index))
                .map(|leaf| leaf.state),
        }
    }

    /// Set of every extension whose leaf is checked, across all categories.
    ///
    /// Only leaves are inspected; duplicates collapse naturally.
    pub fn flatten(&self) -> ExtensionSet {
        self.categories
            .iter()
            .flat_map(|c| c.extensions.iter())
            .filter(|leaf| leaf.is_checked())
            .map(|leaf| leaf.extension.clone())
            .collect()
    }

    /// Rows in display order, every category expanded.
    pub fn rows(&self) -> Vec<TreeRow> {
        let mut rows = Vec::new();
        for (ci, category) in self.categories.iter().enumerate() {
            let id = CategoryId(ci);
            rows.push(TreeRow {
                node: NodeRef::Category(id),
                depth: 0,
                label: category.name.clone(),
                state: category.state,
            });
            for (li, leaf) in category.extensions.iter().enumerate() {
                rows.push(TreeRow {
                    node: NodeRef::Extension(id, li),
                    depth: 1,
                    label: leaf.extension.to_string(),
                    state: leaf.state,
                });
            }
        }
        rows
    }

    /// Total number of rows `rows()` would return.
    pub fn row_count(&self) -> usize {
        self.categories.iter().map(|c| 1 + c.extensions.len()).sum()
    }

    /// Run one propagation pass unless another is already in flight.
    ///
    /// Returns false if the pass was suppressed.
    fn propagate(&mut self, pass: impl FnOnce(&mut [CategoryNode])) -> bool {
        if self.updating {
            trace!("propagation suppressed, update already in flight");
            return false;
        }
        self.updating = true;
        pass(&mut self.categories);
        self.updating = false;
        true
    }
}
