//! Unvalidated navigation source.
//!
//! [`TreeSource`] is the literal shape handed to
//! [`NavigationTree::load`](crate::NavigationTree::load). Entries live in a
//! flat arena and reference their children by [`SourceId`], so one entry may
//! appear in several places, including below itself. Validation happens at
//! load time, not here.
//!
//! [`NavLiteral`] is the nested, serde-friendly form of the same data. It
//! cannot express sharing and converts into a `TreeSource` with
//! [`TreeSource::from_literals`].

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Default message shown while panel synchronisation is on.
pub const DEFAULT_SYNC_ON_MESSAGE: &str = "click to disable panel synchronisation";

/// Default message shown while panel synchronisation is off.
pub const DEFAULT_SYNC_OFF_MESSAGE: &str = "click to enable panel synchronisation";

/// Handle to an entry in a [`TreeSource`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct SourceId(usize);

/// One unvalidated node.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SourceEntry {
    /// Display text.
    pub label: Option<String>,
    /// Link target.
    pub target: Option<String>,
    /// Ordered children.
    pub children: Vec<SourceId>,
    /// Key of a lazily loaded subtree standing in for the children.
    pub fragment: Option<String>,
}

/// Panel synchronisation toggle messages, passed through to the renderer.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SyncMessages {
    /// Shown while synchronisation is enabled (clicking disables it).
    pub on: String,
    /// Shown while synchronisation is disabled (clicking enables it).
    pub off: String,
}

impl Default for SyncMessages {
    fn default() -> Self {
        Self {
            on: DEFAULT_SYNC_ON_MESSAGE.to_owned(),
            off: DEFAULT_SYNC_OFF_MESSAGE.to_owned(),
        }
    }
}

/// Arena of unvalidated navigation entries.
#[derive(Clone, Debug, Default)]
pub struct TreeSource {
    entries: Vec<SourceEntry>,
    roots: Vec<SourceId>,
    fragments: BTreeMap<String, Vec<SourceId>>,
    sync: SyncMessages,
    page_index: Vec<String>,
}

impl TreeSource {
    /// Create an empty source.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a source whose top-level forest is the given literals.
    #[must_use]
    pub fn from_literals(literals: impl IntoIterator<Item = NavLiteral>) -> Self {
        let mut source = Self::new();
        for literal in literals {
            let id = source.insert_literal(&literal);
            source.push_root(id);
        }
        source
    }

    /// Add an entry and return its id. The entry is not attached anywhere.
    pub fn add_entry(&mut self, entry: SourceEntry) -> SourceId {
        let id = SourceId(self.entries.len());
        self.entries.push(entry);
        id
    }

    /// Add a labelled entry with an optional target.
    pub fn add_node(&mut self, label: impl Into<String>, target: Option<&str>) -> SourceId {
        self.add_entry(SourceEntry {
            label: Some(label.into()),
            target: target.map(str::to_owned),
            ..SourceEntry::default()
        })
    }

    /// Append `child` to the children of `parent`.
    ///
    /// # Panics
    ///
    /// Panics if `parent` was not created by this source.
    pub fn push_child(&mut self, parent: SourceId, child: SourceId) {
        self.entries[parent.0].children.push(child);
    }

    /// Append an entry to the top-level forest.
    pub fn push_root(&mut self, id: SourceId) {
        self.roots.push(id);
    }

    /// Mark an entry as a placeholder for the fragment `key`.
    ///
    /// # Panics
    ///
    /// Panics if `id` was not created by this source.
    pub fn set_fragment_key(&mut self, id: SourceId, key: impl Into<String>) {
        self.entries[id.0].fragment = Some(key.into());
    }

    /// Register the top-level entries of a fragment, replacing any previous ones.
    pub fn add_fragment(&mut self, key: impl Into<String>, roots: Vec<SourceId>) {
        self.fragments.insert(key.into(), roots);
    }

    /// Whether a fragment is registered under `key`.
    #[must_use]
    pub fn has_fragment(&self, key: &str) -> bool {
        self.fragments.contains_key(key)
    }

    /// Recursively add a literal and return the id of its top entry.
    pub fn insert_literal(&mut self, literal: &NavLiteral) -> SourceId {
        let id = self.add_entry(SourceEntry {
            label: literal.label.clone(),
            target: literal.target.clone(),
            children: Vec::new(),
            fragment: literal.fragment.clone(),
        });
        for child in literal.children.iter().flatten() {
            let child_id = self.insert_literal(child);
            self.push_child(id, child_id);
        }
        id
    }

    /// Set the synchronisation messages.
    pub fn set_sync_messages(&mut self, sync: SyncMessages) {
        self.sync = sync;
    }

    /// Set the page index (first target of each index page).
    pub fn set_page_index(&mut self, page_index: Vec<String>) {
        self.page_index = page_index;
    }

    /// Look up an entry.
    #[must_use]
    pub fn entry(&self, id: SourceId) -> Option<&SourceEntry> {
        self.entries.get(id.0)
    }

    /// Top-level entries in display order.
    #[must_use]
    pub fn roots(&self) -> &[SourceId] {
        &self.roots
    }

    /// Registered fragments by key.
    #[must_use]
    pub fn fragments(&self) -> &BTreeMap<String, Vec<SourceId>> {
        &self.fragments
    }

    /// Synchronisation messages.
    #[must_use]
    pub fn sync_messages(&self) -> &SyncMessages {
        &self.sync
    }

    /// Page index entries.
    #[must_use]
    pub fn page_index(&self) -> &[String] {
        &self.page_index
    }

    /// Number of entries in the arena.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the arena holds no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Nested literal form of a navigation node.
///
/// `children: None` and `children: Some(vec![])` both describe a leaf.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NavLiteral {
    /// Display text.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    /// Link target.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target: Option<String>,
    /// Ordered children.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub children: Option<Vec<NavLiteral>>,
    /// Key of a lazily loaded subtree.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fragment: Option<String>,
}

impl NavLiteral {
    /// Create a linked leaf.
    #[must_use]
    pub fn new(label: impl Into<String>, target: impl Into<String>) -> Self {
        Self {
            label: Some(label.into()),
            target: Some(target.into()),
            ..Self::default()
        }
    }

    /// Create a grouping leaf with no target.
    #[must_use]
    pub fn group(label: impl Into<String>) -> Self {
        Self {
            label: Some(label.into()),
            ..Self::default()
        }
    }

    /// Set the children.
    #[must_use]
    pub fn with_children(mut self, children: Vec<NavLiteral>) -> Self {
        self.children = Some(children);
        self
    }

    /// Turn this literal into a placeholder for the fragment `key`.
    #[must_use]
    pub fn with_fragment(mut self, key: impl Into<String>) -> Self {
        self.fragment = Some(key.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_add_node_returns_sequential_ids() {
        let mut source = TreeSource::new();

        let a = source.add_node("A", None);
        let b = source.add_node("B", Some("b.html"));

        assert_ne!(a, b);
        assert_eq!(source.len(), 2);
        assert_eq!(source.entry(b).unwrap().target.as_deref(), Some("b.html"));
    }

    #[test]
    fn test_push_child_preserves_order() {
        let mut source = TreeSource::new();
        let parent = source.add_node("Parent", None);
        let first = source.add_node("First", None);
        let second = source.add_node("Second", None);

        source.push_child(parent, first);
        source.push_child(parent, second);

        assert_eq!(source.entry(parent).unwrap().children, vec![first, second]);
    }

    #[test]
    fn test_from_literals_flattens_nested_literals() {
        let source = TreeSource::from_literals([
            NavLiteral::new("Home", "index.html"),
            NavLiteral::new("Docs", "usergroup0.html")
                .with_children(vec![NavLiteral::new("Install", "saa_installation.html")]),
        ]);

        assert_eq!(source.len(), 3);
        assert_eq!(source.roots().len(), 2);
        let docs = source.entry(source.roots()[1]).unwrap();
        assert_eq!(docs.label.as_deref(), Some("Docs"));
        assert_eq!(docs.children.len(), 1);
    }

    #[test]
    fn test_insert_literal_keeps_fragment_key() {
        let mut source = TreeSource::new();

        let id = source.insert_literal(&NavLiteral::new("Classes", "annotated.html").with_fragment("annotated"));

        assert_eq!(source.entry(id).unwrap().fragment.as_deref(), Some("annotated"));
    }

    #[test]
    fn test_default_sync_messages() {
        let source = TreeSource::new();

        assert_eq!(source.sync_messages().on, "click to disable panel synchronisation");
        assert_eq!(source.sync_messages().off, "click to enable panel synchronisation");
    }

    #[test]
    fn test_literal_deserializes_without_optional_fields() {
        let literal: NavLiteral = serde_json::from_str(r#"{"label": "Home"}"#).unwrap();

        assert_eq!(literal, NavLiteral::group("Home"));
    }

    #[test]
    fn test_literal_serialization_skips_absent_fields() {
        let json = serde_json::to_value(NavLiteral::new("Home", "index.html")).unwrap();

        assert_eq!(json["label"], "Home");
        assert_eq!(json["target"], "index.html");
        assert!(json.get("children").is_none());
        assert!(json.get("fragment").is_none());
    }
}
