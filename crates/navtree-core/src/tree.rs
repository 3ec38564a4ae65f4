//! Validated navigation tree.
//!
//! [`NavigationTree::load`] walks a [`TreeSource`] depth-first, validating
//! every entry and copying it into an immutable [`Forest`]. Fragments listed
//! in the source become the [`MenuIndex`]. Nothing is mutable after load, so a
//! tree can be shared freely between readers.

use std::collections::{BTreeMap, BTreeSet, HashSet};

use crate::error::{LoadError, NodePath, NotFound};
use crate::node::{Forest, NavigationNode, NodeId, NodeRef, Traverse};
use crate::placeholder::PlaceholderPatterns;
use crate::source::{NavLiteral, SourceId, SyncMessages, TreeSource};

/// Deepest nesting of nodes within one forest, counting top-level nodes as 1.
pub const MAX_DEPTH: usize = 128;

/// Options for [`NavigationTree::load_with`].
#[derive(Clone, Debug, Default)]
pub struct LoadOptions {
    /// Targets matching these patterns are stored as absent.
    pub placeholders: PlaceholderPatterns,
}

/// Mapping from fragment key to lazily loadable subtree.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct MenuIndex {
    fragments: BTreeMap<String, Forest>,
}

impl MenuIndex {
    /// Look up a fragment.
    pub fn get(&self, key: &str) -> Result<&Forest, NotFound> {
        self.fragments
            .get(key)
            .ok_or_else(|| NotFound(key.to_owned()))
    }

    /// Fragment keys in sorted order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.fragments.keys().map(String::as_str)
    }

    /// Fragments by key.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Forest)> {
        self.fragments.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Number of fragments.
    #[must_use]
    pub fn len(&self) -> usize {
        self.fragments.len()
    }

    /// Whether the index is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.fragments.is_empty()
    }
}

/// Immutable, validated navigation forest with its fragment index.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct NavigationTree {
    forest: Forest,
    index: MenuIndex,
    sync: SyncMessages,
    page_index: Vec<String>,
}

impl NavigationTree {
    /// Validate `source` with default options.
    ///
    /// # Errors
    ///
    /// Returns [`LoadError::MalformedTree`] for a missing or empty label, an
    /// empty target, a node with both children and a fragment key, an entry
    /// referenced from more than one place, or nesting deeper than
    /// [`MAX_DEPTH`].
    /// Returns [`LoadError::CyclicReference`] when an entry is its own
    /// ancestor or fragments reference each other in a loop.
    pub fn load(source: &TreeSource) -> Result<Self, LoadError> {
        Self::load_with(source, &LoadOptions::default())
    }

    /// Validate `source` with explicit options.
    pub fn load_with(source: &TreeSource, options: &LoadOptions) -> Result<Self, LoadError> {
        let mut seen = HashSet::new();
        let forest = ForestBuilder::new(source, options, &mut seen, NodePath::root())
            .build(source.roots())?;

        let mut fragments = BTreeMap::new();
        for (key, roots) in source.fragments() {
            let fragment =
                ForestBuilder::new(source, options, &mut seen, NodePath::in_fragment(key))
                    .build(roots)?;
            fragments.insert(key.clone(), fragment);
        }
        let index = MenuIndex { fragments };

        check_fragment_cycles(&index)?;
        warn_unindexed_fragments(&forest, &index);

        Ok(Self {
            forest,
            index,
            sync: source.sync_messages().clone(),
            page_index: source.page_index().to_vec(),
        })
    }

    /// Top-level nodes in display order.
    #[must_use]
    pub fn roots(&self) -> Vec<NodeRef<'_>> {
        self.forest.roots()
    }

    /// Look up a node of the main forest by id.
    #[must_use]
    pub fn node(&self, id: NodeId) -> Option<NodeRef<'_>> {
        self.forest.node(id)
    }

    /// Depth-first, pre-order walk of the main forest with node depths.
    ///
    /// Fragments are not entered; use [`NavigationTree::resolve`] for those.
    #[must_use]
    pub fn traverse(&self) -> Traverse<'_> {
        self.forest.traverse()
    }

    /// Look up a fragment by key.
    ///
    /// A miss is an expected condition: render the placeholder as a leaf.
    pub fn resolve(&self, key: &str) -> Result<&Forest, NotFound> {
        self.index.get(key)
    }

    /// All nodes of the main forest matching `predicate`, in traversal order.
    pub fn find<P>(&self, predicate: P) -> Vec<NodeRef<'_>>
    where
        P: FnMut(&NodeRef<'_>) -> bool,
    {
        self.forest.find(predicate)
    }

    /// Like [`find`](Self::find), then the same search in every fragment in
    /// key order.
    pub fn find_including_fragments<P>(&self, mut predicate: P) -> Vec<NodeRef<'_>>
    where
        P: FnMut(&NodeRef<'_>) -> bool,
    {
        std::iter::once(&self.forest)
            .chain(self.index.iter().map(|(_, fragment)| fragment))
            .flat_map(|forest| forest.find(&mut predicate))
            .collect()
    }

    /// Nodes linking to `url`, searching the main forest and then fragments.
    ///
    /// When `url` has no `#anchor`, nodes linking to anchors within that page
    /// match too.
    #[must_use]
    pub fn find_by_target(&self, url: &str) -> Vec<NodeRef<'_>> {
        let match_page = !url.contains('#');
        self.find_including_fragments(|node| {
            node.target().is_some_and(|target| {
                target == url
                    || (match_page && target.split_once('#').is_some_and(|(page, _)| page == url))
            })
        })
    }

    /// The main forest.
    #[must_use]
    pub fn forest(&self) -> &Forest {
        &self.forest
    }

    /// The fragment index.
    #[must_use]
    pub fn menu_index(&self) -> &MenuIndex {
        &self.index
    }

    /// Panel synchronisation messages.
    #[must_use]
    pub fn sync_messages(&self) -> &SyncMessages {
        &self.sync
    }

    /// First target of each navigation index page.
    #[must_use]
    pub fn page_index(&self) -> &[String] {
        &self.page_index
    }

    /// Number of nodes in the main forest.
    #[must_use]
    pub fn len(&self) -> usize {
        self.forest.len()
    }

    /// Whether the main forest is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.forest.is_empty()
    }

    /// Total number of nodes including all fragments.
    #[must_use]
    pub fn total_len(&self) -> usize {
        self.forest.len() + self.index.iter().map(|(_, f)| f.len()).sum::<usize>()
    }

    /// Path of a node for diagnostics.
    ///
    /// Nodes of a fragment are prefixed with the fragment key.
    #[must_use]
    pub fn path(&self, node: NodeRef<'_>) -> NodePath {
        let fragment = self
            .index
            .iter()
            .find(|(_, forest)| std::ptr::eq(*forest, node.forest()))
            .map(|(key, _)| key.to_owned());
        NodePath {
            fragment,
            segments: node.label_path().into_iter().map(str::to_owned).collect(),
        }
    }

    /// The main forest as nested literals.
    #[must_use]
    pub fn to_literals(&self) -> Vec<NavLiteral> {
        self.forest.to_literals()
    }

    /// Convert back to a source. Loading the result yields an equal tree.
    #[must_use]
    pub fn to_source(&self) -> TreeSource {
        let mut source = TreeSource::from_literals(self.forest.to_literals());
        for (key, fragment) in self.index.iter() {
            let roots = fragment
                .to_literals()
                .iter()
                .map(|literal| source.insert_literal(literal))
                .collect();
            source.add_fragment(key, roots);
        }
        source.set_sync_messages(self.sync.clone());
        source.set_page_index(self.page_index.clone());
        source
    }
}

/// Depth-first copy of source entries into a [`Forest`].
struct ForestBuilder<'s, 'v> {
    source: &'s TreeSource,
    options: &'s LoadOptions,
    /// Entries already placed in any forest of this load.
    seen: &'v mut HashSet<SourceId>,
    forest: Forest,
    /// Entries on the current root-to-node path.
    stack: Vec<SourceId>,
    path: NodePath,
}

impl<'s, 'v> ForestBuilder<'s, 'v> {
    fn new(
        source: &'s TreeSource,
        options: &'s LoadOptions,
        seen: &'v mut HashSet<SourceId>,
        path: NodePath,
    ) -> Self {
        Self {
            source,
            options,
            seen,
            forest: Forest::default(),
            stack: Vec::new(),
            path,
        }
    }

    fn build(mut self, roots: &[SourceId]) -> Result<Forest, LoadError> {
        for (position, &id) in roots.iter().enumerate() {
            self.add(id, None, position)?;
        }
        Ok(self.forest)
    }

    fn add(&mut self, id: SourceId, parent: Option<usize>, position: usize) -> Result<(), LoadError> {
        let source = self.source;
        let Some(entry) = source.entry(id) else {
            self.path.push(NodePath::segment_for(None, position));
            return Err(LoadError::malformed(
                self.path.clone(),
                "reference to an entry outside this source",
            ));
        };

        self.path
            .push(NodePath::segment_for(entry.label.as_deref(), position));

        if self.stack.contains(&id) {
            return Err(LoadError::CyclicReference {
                path: self.path.clone(),
            });
        }
        if !self.seen.insert(id) {
            return Err(LoadError::malformed(
                self.path.clone(),
                "entry is referenced from more than one place",
            ));
        }
        if self.stack.len() >= MAX_DEPTH {
            return Err(LoadError::malformed(
                self.path.clone(),
                format!("nesting exceeds maximum depth of {MAX_DEPTH}"),
            ));
        }

        let label = match entry.label.as_deref() {
            None => return Err(LoadError::malformed(self.path.clone(), "missing label")),
            Some(label) if label.trim().is_empty() => {
                return Err(LoadError::malformed(self.path.clone(), "empty label"));
            }
            Some(label) => label.to_owned(),
        };

        let target = match entry.target.as_deref() {
            Some(target) if target.trim().is_empty() => {
                return Err(LoadError::malformed(self.path.clone(), "empty target"));
            }
            Some(target) if self.options.placeholders.is_placeholder(target) => {
                tracing::debug!(
                    path = %self.path,
                    placeholder = target,
                    "Treating placeholder target as absent"
                );
                None
            }
            other => other.map(str::to_owned),
        };

        let fragment = match entry.fragment.as_deref() {
            Some("") => {
                return Err(LoadError::malformed(self.path.clone(), "empty fragment key"));
            }
            Some(_) if !entry.children.is_empty() => {
                return Err(LoadError::malformed(
                    self.path.clone(),
                    "node has both children and a fragment key",
                ));
            }
            other => other.map(str::to_owned),
        };

        let idx = self.forest.push(
            NavigationNode {
                label,
                target,
                fragment,
            },
            parent,
        );

        self.stack.push(id);
        for (child_position, &child) in entry.children.iter().enumerate() {
            self.add(child, Some(idx), child_position)?;
        }
        self.stack.pop();
        self.path.pop();

        Ok(())
    }
}

/// Fragment keys referenced by placeholders in `forest`, in traversal order.
fn referenced_fragments(forest: &Forest) -> Vec<&str> {
    forest
        .traverse()
        .filter_map(|(node, _)| node.fragment())
        .collect()
}

/// Reject fragments whose placeholders lead back to themselves.
fn check_fragment_cycles(index: &MenuIndex) -> Result<(), LoadError> {
    let mut done = BTreeSet::new();
    for start in index.keys() {
        // Fragments on the current path with their unvisited references.
        let mut on_path = Vec::new();
        enter_fragment(start, index, &mut on_path, &done)?;

        while let Some((key, pending)) = on_path.last_mut() {
            if let Some(next) = pending.next() {
                enter_fragment(next, index, &mut on_path, &done)?;
            } else {
                done.insert(*key);
                on_path.pop();
            }
        }
    }
    Ok(())
}

fn enter_fragment<'a>(
    key: &'a str,
    index: &'a MenuIndex,
    on_path: &mut Vec<(&'a str, std::vec::IntoIter<&'a str>)>,
    done: &BTreeSet<&'a str>,
) -> Result<(), LoadError> {
    if done.contains(key) {
        return Ok(());
    }
    if on_path.iter().any(|(step, _)| *step == key) {
        let mut path = NodePath::root();
        for (step, _) in on_path.iter() {
            path.push(format!("[{step}]"));
        }
        path.push(format!("[{key}]"));
        return Err(LoadError::CyclicReference { path });
    }
    let Ok(fragment) = index.get(key) else {
        return Ok(());
    };
    on_path.push((key, referenced_fragments(fragment).into_iter()));
    Ok(())
}

/// Log placeholders whose fragment is missing from the index.
fn warn_unindexed_fragments(forest: &Forest, index: &MenuIndex) {
    let referenced = std::iter::once(forest)
        .chain(index.iter().map(|(_, fragment)| fragment))
        .flat_map(referenced_fragments);
    let missing: BTreeSet<&str> = referenced
        .filter(|key| index.get(key).is_err())
        .collect();

    for key in missing {
        tracing::warn!(fragment = key, "Fragment referenced but not present in index");
    }
}
