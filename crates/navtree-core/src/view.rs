//! Renderer-facing view of a navigation tree.

use serde::Serialize;

use crate::node::NodeRef;
use crate::tree::{MAX_DEPTH, NavigationTree};

/// Read-only contract a renderer lays out an expandable tree from.
pub trait NavigationView {
    /// Top-level nodes in display order.
    fn roots(&self) -> Vec<NodeRef<'_>>;

    /// Nodes to show when `node` is expanded.
    ///
    /// A fragment placeholder expands to the fragment's top-level nodes, or to
    /// nothing when the fragment is not indexed.
    fn expand<'a>(&'a self, node: NodeRef<'a>) -> Vec<NodeRef<'a>>;

    /// Stored children of `node` in display order.
    fn children<'a>(&'a self, node: NodeRef<'a>) -> Vec<NodeRef<'a>> {
        node.children()
    }

    /// Display text of `node`.
    fn label<'a>(&self, node: NodeRef<'a>) -> &'a str {
        node.label()
    }

    /// Link target of `node`, if any.
    fn target<'a>(&self, node: NodeRef<'a>) -> Option<&'a str> {
        node.target()
    }
}

impl NavigationView for NavigationTree {
    fn roots(&self) -> Vec<NodeRef<'_>> {
        NavigationTree::roots(self)
    }

    fn expand<'a>(&'a self, node: NodeRef<'a>) -> Vec<NodeRef<'a>> {
        let Some(key) = node.fragment() else {
            return node.children();
        };
        match self.resolve(key) {
            Ok(fragment) => fragment.roots(),
            Err(e) => {
                tracing::debug!(error = %e, label = node.label(), "Rendering placeholder as leaf");
                Vec::new()
            }
        }
    }
}

/// Navigation item with children for JSON consumers.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct NavItem {
    /// Display title.
    pub title: String,
    /// Link target.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
    /// Child navigation items, fragments spliced in.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<NavItem>,
}

/// Build [`NavItem`] trees for every top-level node of `view`.
///
/// Fragments are spliced in up to [`MAX_DEPTH`] levels in total; deeper nodes
/// are rendered as leaves.
pub fn build_navigation<V: NavigationView + ?Sized>(view: &V) -> Vec<NavItem> {
    let mut items = Vec::new();
    let mut roots = view.roots().into_iter();
    let mut stack: Vec<PendingItem<'_>> = Vec::new();

    loop {
        let next = match stack.last_mut() {
            Some(parent) => parent.children.next(),
            None => roots.next(),
        };

        if let Some(node) = next {
            let children = if stack.len() + 1 < MAX_DEPTH {
                view.expand(node)
            } else {
                if !view.expand(node).is_empty() {
                    tracing::warn!(
                        label = node.label(),
                        max_depth = MAX_DEPTH,
                        "Navigation too deep, rendering node as leaf"
                    );
                }
                Vec::new()
            };
            stack.push(PendingItem {
                item: NavItem {
                    title: view.label(node).to_owned(),
                    path: view.target(node).map(str::to_owned),
                    children: Vec::new(),
                },
                children: children.into_iter(),
            });
            continue;
        }

        let Some(done) = stack.pop() else {
            break;
        };
        match stack.last_mut() {
            Some(parent) => parent.item.children.push(done.item),
            None => items.push(done.item),
        }
    }

    items
}

/// Item whose children are still being built.
struct PendingItem<'a> {
    item: NavItem,
    children: std::vec::IntoIter<NodeRef<'a>>,
}
