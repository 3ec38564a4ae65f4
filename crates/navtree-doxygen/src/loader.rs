//! Loading a complete set of Doxygen navigation data files.
//!
//! [`DoxygenLoader`] reads `navtreedata.js`, follows fragment references to
//! their `<key>.js` files, reads the optional `menudata.js`, and validates
//! everything into [`NavigationTree`]s.

use std::collections::{HashSet, VecDeque};

use navtree_core::{LoadError, LoadOptions, NavigationTree, SyncMessages, TreeSource};

use crate::error::DoxygenError;
use crate::js::{Script, parse_script};
use crate::menu::read_menu;
use crate::navtree::{read_fragment, read_navtree};
use crate::source::{DataSource, DataSourceError};

/// Default name of the navigation tree file.
pub const DEFAULT_NAVTREE_FILE: &str = "navtreedata.js";

/// Default name of the dropdown menu file.
pub const DEFAULT_MENU_FILE: &str = "menudata.js";

/// File holding the fragment `key`.
#[must_use]
pub fn fragment_file(key: &str) -> String {
    format!("{key}.js")
}

/// Configuration for [`DoxygenLoader`].
#[derive(Clone, Debug)]
pub struct LoaderOptions {
    /// Navigation tree file name.
    pub navtree_file: String,
    /// Menu file name. `None` skips the menu.
    pub menu_file: Option<String>,
    /// Follow fragment references to their files.
    ///
    /// When disabled, every fragment lookup reports not found.
    pub load_fragments: bool,
    /// Validation options.
    pub load: LoadOptions,
    /// Replaces the file's "synchronisation on" message.
    pub sync_on_message: Option<String>,
    /// Replaces the file's "synchronisation off" message.
    pub sync_off_message: Option<String>,
}

impl Default for LoaderOptions {
    fn default() -> Self {
        Self {
            navtree_file: DEFAULT_NAVTREE_FILE.to_owned(),
            menu_file: Some(DEFAULT_MENU_FILE.to_owned()),
            load_fragments: true,
            load: LoadOptions::default(),
            sync_on_message: None,
            sync_off_message: None,
        }
    }
}

/// Validated navigation data of one documentation site.
#[derive(Clone, Debug)]
pub struct DoxygenBundle {
    /// Navigation tree with its fragment index.
    pub tree: NavigationTree,
    /// Dropdown menu, if a menu file was found.
    pub menu: Option<NavigationTree>,
}

/// Loads Doxygen navigation data from a [`DataSource`].
#[derive(Clone, Debug, Default)]
pub struct DoxygenLoader {
    options: LoaderOptions,
}

impl DoxygenLoader {
    /// Create a loader with the given options.
    #[must_use]
    pub fn new(options: LoaderOptions) -> Self {
        Self { options }
    }

    /// Loader options.
    #[must_use]
    pub fn options(&self) -> &LoaderOptions {
        &self.options
    }

    /// Read and validate all navigation data.
    ///
    /// A missing fragment file or menu file is not an error. A missing
    /// navigation tree file is.
    pub fn load(&self, data: &dyn DataSource) -> Result<DoxygenBundle, DoxygenError> {
        let navtree_file = self.options.navtree_file.as_str();
        let script = read_script(data, navtree_file)?;

        let mut source = TreeSource::new();
        let keys = read_navtree(&script, &mut source).map_err(|e| DoxygenError::Load {
            file: navtree_file.to_owned(),
            source: e,
        })?;

        if self.options.load_fragments {
            load_fragments(data, &mut source, keys)?;
        }
        self.apply_sync_overrides(&mut source);

        let tree = NavigationTree::load_with(&source, &self.options.load).map_err(|e| {
            let file = e
                .path()
                .fragment
                .as_deref()
                .map_or_else(|| navtree_file.to_owned(), fragment_file);
            DoxygenError::Load { file, source: e }
        })?;

        let menu = self.load_menu(data)?;

        tracing::info!(
            nodes = tree.len(),
            fragments = tree.menu_index().len(),
            menu_items = menu.as_ref().map_or(0, NavigationTree::len),
            "Loaded navigation data"
        );

        Ok(DoxygenBundle { tree, menu })
    }

    fn apply_sync_overrides(&self, source: &mut TreeSource) {
        if self.options.sync_on_message.is_none() && self.options.sync_off_message.is_none() {
            return;
        }
        let current = source.sync_messages();
        let sync = SyncMessages {
            on: self
                .options
                .sync_on_message
                .clone()
                .unwrap_or_else(|| current.on.clone()),
            off: self
                .options
                .sync_off_message
                .clone()
                .unwrap_or_else(|| current.off.clone()),
        };
        source.set_sync_messages(sync);
    }

    fn load_menu(&self, data: &dyn DataSource) -> Result<Option<NavigationTree>, DoxygenError> {
        let Some(file) = self.options.menu_file.as_deref() else {
            return Ok(None);
        };

        let script = match read_script(data, file) {
            Ok(script) => script,
            Err(DoxygenError::Source(e)) if e.is_not_found() => {
                tracing::debug!(file, "Menu file not found");
                return Ok(None);
            }
            Err(e) => return Err(e),
        };

        let menu = read_menu(&script)
            .and_then(|source| NavigationTree::load_with(&source, &self.options.load))
            .map_err(|e| load_error(file, e))?;
        Ok(Some(menu))
    }
}

/// Read fragment files breadth-first, starting from `keys`.
fn load_fragments(
    data: &dyn DataSource,
    source: &mut TreeSource,
    keys: Vec<String>,
) -> Result<(), DoxygenError> {
    let mut pending: VecDeque<String> = keys.into();
    let mut seen = HashSet::new();

    while let Some(key) = pending.pop_front() {
        if !seen.insert(key.clone()) {
            continue;
        }

        let file = fragment_file(&key);
        let script = match read_script(data, &file) {
            Ok(script) => script,
            Err(DoxygenError::Source(
                e @ (DataSourceError::NotFound(_) | DataSourceError::InvalidName(_)),
            )) => {
                tracing::warn!(fragment = %key, error = %e, "Skipping unreadable fragment");
                continue;
            }
            Err(e) => return Err(e),
        };

        let nested = read_fragment(&key, &script, source).map_err(|e| load_error(&file, e))?;
        pending.extend(nested);
    }

    Ok(())
}

fn read_script(data: &dyn DataSource, file: &str) -> Result<Script, DoxygenError> {
    let text = data.read(file)?;
    parse_script(&text).map_err(|e| DoxygenError::Parse {
        file: file.to_owned(),
        source: e,
    })
}

fn load_error(file: &str, source: LoadError) -> DoxygenError {
    DoxygenError::Load {
        file: file.to_owned(),
        source,
    }
}
