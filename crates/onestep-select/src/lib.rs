//! Tri-state selection model for onestep.
//!
//! A [`SelectionTree`] holds two levels of checkable nodes: categories and
//! the extensions they own. Checking or unchecking a category forces every
//! extension below it to the same state; changing an extension recomputes its
//! category from all siblings (all checked, none checked, or partial).
//!
//! # Example
//!
//! ```rust
//! use onestep_core::{CategoryTable, SelectionState};
//! use onestep_select::SelectionTree;
//!
//! let table = CategoryTable::builtin();
//! let mut tree = SelectionTree::new(&table, &CategoryTable::default_selection());
//!
//! let photos = tree.find_category("Photos").unwrap();
//! tree.set_category_state(photos, SelectionState::Unchecked).unwrap();
//! tree.set_extension_state(photos, ".jpg", SelectionState::Checked).unwrap();
//!
//! assert_eq!(tree.category(photos).unwrap().state(), SelectionState::Partial);
//! assert!(tree.flatten().contains(&".jpg".into()));
//! ```

mod error;
mod node;
mod tree;

pub use error::SelectionError;
pub use node::{CategoryId, CategoryNode, ExtensionNode};
pub use tree::{NodeRef, SelectionTree, TreeRow};

// Re-export core types for convenience
pub use onestep_core::{CategoryTable, Extension, ExtensionSet, SelectionState};
