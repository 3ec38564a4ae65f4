//! Reader and writer for Doxygen navigation data files.
//!
//! Doxygen's HTML viewer gets its navigation panel from `navtreedata.js`,
//! large subtrees from `<key>.js` fragment files, and its dropdown menu from
//! `menudata.js`. This crate parses those files into validated
//! [`NavigationTree`](navtree_core::NavigationTree)s and writes trees back
//! out in the same layout.
//!
//! # Example
//!
//! ```
//! use navtree_doxygen::{DoxygenLoader, MemoryDataSource};
//!
//! let data = MemoryDataSource::new().with_file(
//!     "navtreedata.js",
//!     r#"var NAVTREE = [ [ "Home", "index.html", null ] ];"#,
//! );
//!
//! let bundle = DoxygenLoader::default().load(&data)?;
//! assert_eq!(bundle.tree.roots()[0].label(), "Home");
//! # Ok::<(), navtree_doxygen::DoxygenError>(())
//! ```

mod error;
pub mod js;
mod loader;
mod menu;
mod navtree;
mod source;
mod writer;

pub use error::DoxygenError;
pub use js::ParseError;
pub use loader::{
    DEFAULT_MENU_FILE, DEFAULT_NAVTREE_FILE, DoxygenBundle, DoxygenLoader, LoaderOptions,
    fragment_file,
};
pub use menu::{MENUDATA_VAR, read_menu};
pub use navtree::{
    NAVTREE_VAR, NAVTREEINDEX_VAR, SYNCOFFMSG_VAR, SYNCONMSG_VAR, read_fragment, read_navtree,
};
pub use source::{DataSource, DataSourceError, FsDataSource, MemoryDataSource};
pub use writer::{write_fragment, write_navtree};
