//! Load, validate and traverse Doxygen navigation trees.
//!
//! This crate provides:
//! - [`Documentation`]: navigation tree and menu of one site, opened from a
//!   [`Config`]
//! - Re-exports of the tree model ([`navtree_core`]) and the Doxygen data
//!   file reader ([`navtree_doxygen`])
//!
//! # Quick Start
//!
//! ```no_run
//! # fn main() -> Result<(), navtree::Error> {
//! use navtree::{Config, Documentation, NavigationView};
//!
//! let config = Config::load(None, None)?;
//! let docs = Documentation::open(&config)?;
//!
//! for (node, depth) in docs.tree().traverse() {
//!     let expandable = !docs.tree().expand(node).is_empty();
//!     println!("{}{} {expandable}", "  ".repeat(depth), node.label());
//! }
//! # Ok(())
//! # }
//! ```

mod documentation;
mod error;

pub use documentation::{Documentation, loader_options};
pub use error::Error;

pub use navtree_config::{CONFIG_FILENAME, Config, ConfigError, Overrides};
pub use navtree_core::{
    Forest, LoadError, LoadOptions, MAX_DEPTH, MenuIndex, NavItem, NavLiteral, NavigationTree,
    NavigationView, NodeId, NodePath, NodeRef, NotFound, PlaceholderPatterns, SyncMessages,
    TreeSource, build_navigation,
};
pub use navtree_doxygen::{
    DataSource, DataSourceError, DoxygenBundle, DoxygenError, DoxygenLoader, FsDataSource,
    LoaderOptions, MemoryDataSource, write_fragment, write_navtree,
};
