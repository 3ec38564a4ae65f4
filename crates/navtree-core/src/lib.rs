//! Navigation tree model for documentation viewers.
//!
//! This crate provides:
//! - [`TreeSource`] / [`NavLiteral`]: the unvalidated source shape
//! - [`NavigationTree`]: the validated, immutable tree with its [`MenuIndex`]
//! - [`NavigationView`]: the read-only contract a renderer consumes
//!
//! # Quick Start
//!
//! ```
//! use navtree_core::{NavLiteral, NavigationTree, TreeSource};
//!
//! let source = TreeSource::from_literals([
//!     NavLiteral::new("Home", "index.html"),
//!     NavLiteral::new("Docs", "usergroup0.html")
//!         .with_children(vec![NavLiteral::new("Install", "saa_installation.html")]),
//! ]);
//! let tree = NavigationTree::load(&source)?;
//!
//! let visited: Vec<_> = tree
//!     .traverse()
//!     .map(|(node, depth)| (node.label(), depth))
//!     .collect();
//! assert_eq!(visited, [("Home", 0), ("Docs", 0), ("Install", 1)]);
//! # Ok::<(), navtree_core::LoadError>(())
//! ```

mod error;
mod node;
mod placeholder;
mod source;
mod tree;
mod view;

pub use error::{LoadError, NodePath, NotFound};
pub use node::{Forest, NavigationNode, NodeId, NodeRef, Traverse};
pub use placeholder::{DEFAULT_PLACEHOLDER_PATTERNS, PlaceholderPatterns};
pub use source::{
    DEFAULT_SYNC_OFF_MESSAGE, DEFAULT_SYNC_ON_MESSAGE, NavLiteral, SourceEntry, SourceId,
    SyncMessages, TreeSource,
};
pub use tree::{LoadOptions, MAX_DEPTH, MenuIndex, NavigationTree};
pub use view::{NavItem, NavigationView, build_navigation};
