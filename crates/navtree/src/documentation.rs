//! Navigation data of one documentation site.

use navtree_config::Config;
use navtree_core::{LoadOptions, NavItem, NavigationTree, PlaceholderPatterns, build_navigation};
use navtree_doxygen::{DataSource, DoxygenBundle, DoxygenLoader, FsDataSource, LoaderOptions};

use crate::Error;

/// Validated navigation tree and menu of a documentation site.
///
/// Immutable once opened; share it by reference or `Arc`.
#[derive(Clone, Debug)]
pub struct Documentation {
    tree: NavigationTree,
    menu: Option<NavigationTree>,
}

impl Documentation {
    /// Load the data files in the configured source directory.
    pub fn open(config: &Config) -> Result<Self, Error> {
        let options = loader_options(config)?;
        let dir = &config.source_resolved.dir;
        tracing::debug!(dir = %dir.display(), "Opening navigation data");
        Self::from_source(&FsDataSource::new(dir), &options)
    }

    /// Load data files from any source.
    pub fn from_source(data: &dyn DataSource, options: &LoaderOptions) -> Result<Self, Error> {
        let bundle = DoxygenLoader::new(options.clone()).load(data)?;
        Ok(Self::from(bundle))
    }

    /// Navigation tree.
    #[must_use]
    pub fn tree(&self) -> &NavigationTree {
        &self.tree
    }

    /// Dropdown menu, if one was loaded.
    #[must_use]
    pub fn menu(&self) -> Option<&NavigationTree> {
        self.menu.as_ref()
    }

    /// Navigation tree as nested items, fragments spliced in.
    #[must_use]
    pub fn navigation(&self) -> Vec<NavItem> {
        build_navigation(&self.tree)
    }

    /// Menu as nested items. Empty when there is no menu.
    #[must_use]
    pub fn menu_navigation(&self) -> Vec<NavItem> {
        self.menu.as_ref().map(build_navigation).unwrap_or_default()
    }

    /// [`navigation`](Self::navigation) serialized as JSON.
    pub fn navigation_json(&self) -> Result<String, Error> {
        Ok(serde_json::to_string(&self.navigation())?)
    }
}

impl From<DoxygenBundle> for Documentation {
    fn from(bundle: DoxygenBundle) -> Self {
        Self {
            tree: bundle.tree,
            menu: bundle.menu,
        }
    }
}

/// Translate configuration into loader options.
pub fn loader_options(config: &Config) -> Result<LoaderOptions, Error> {
    let placeholders = match &config.placeholders.patterns {
        Some(patterns) => PlaceholderPatterns::new(patterns)?,
        None => PlaceholderPatterns::default(),
    };
    let source = &config.source_resolved;

    Ok(LoaderOptions {
        navtree_file: source.navtree.clone(),
        menu_file: source.menu.clone(),
        load_fragments: config.fragments.enabled,
        load: LoadOptions { placeholders },
        sync_on_message: config.sync.enabled_message.clone(),
        sync_off_message: config.sync.disabled_message.clone(),
    })
}
