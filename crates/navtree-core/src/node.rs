//! Validated navigation nodes.
//!
//! A [`Forest`] stores nodes in a flat `Vec` with parent/children
//! relationships tracked by indices. Readers get [`NodeRef`] handles, which
//! borrow the forest and are cheap to copy.

use std::fmt;

use crate::source::NavLiteral;

/// Index of a node within its [`Forest`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub(crate) usize);

impl NodeId {
    /// Position of the node in pre-order.
    #[must_use]
    pub fn index(self) -> usize {
        self.0
    }
}

/// One entry of the documentation table of contents.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NavigationNode {
    pub(crate) label: String,
    pub(crate) target: Option<String>,
    pub(crate) fragment: Option<String>,
}

impl NavigationNode {
    /// Display text. Never empty.
    #[must_use]
    pub fn label(&self) -> &str {
        &self.label
    }

    /// Link target, `None` for grouping nodes.
    #[must_use]
    pub fn target(&self) -> Option<&str> {
        self.target.as_deref()
    }

    /// Key of the fragment standing in for this node's children.
    #[must_use]
    pub fn fragment(&self) -> Option<&str> {
        self.fragment.as_deref()
    }
}

/// Ordered forest of validated nodes.
///
/// Nodes are stored in depth-first pre-order, so index order equals
/// traversal order.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Forest {
    nodes: Vec<NavigationNode>,
    children: Vec<Vec<usize>>,
    parents: Vec<Option<usize>>,
    roots: Vec<usize>,
}

impl Forest {
    /// Append a node under `parent` (or as a root) and return its index.
    pub(crate) fn push(&mut self, node: NavigationNode, parent: Option<usize>) -> usize {
        let idx = self.nodes.len();
        self.nodes.push(node);
        self.children.push(Vec::new());
        self.parents.push(parent);

        if let Some(parent) = parent {
            self.children[parent].push(idx);
        } else {
            self.roots.push(idx);
        }

        idx
    }

    /// Number of nodes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Whether the forest has no nodes.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Top-level nodes in display order.
    #[must_use]
    pub fn roots(&self) -> Vec<NodeRef<'_>> {
        self.roots.iter().map(|&idx| self.node_ref(idx)).collect()
    }

    /// Look up a node by id.
    #[must_use]
    pub fn node(&self, id: NodeId) -> Option<NodeRef<'_>> {
        (id.0 < self.nodes.len()).then(|| self.node_ref(id.0))
    }

    /// Depth-first, pre-order walk yielding each node with its depth.
    ///
    /// Top-level nodes have depth 0. Each call starts a fresh walk.
    #[must_use]
    pub fn traverse(&self) -> Traverse<'_> {
        Traverse {
            forest: self,
            stack: self.roots.iter().rev().map(|&idx| (idx, 0)).collect(),
        }
    }

    /// All nodes matching `predicate`, in traversal order.
    pub fn find<P>(&self, mut predicate: P) -> Vec<NodeRef<'_>>
    where
        P: FnMut(&NodeRef<'_>) -> bool,
    {
        self.traverse()
            .map(|(node, _)| node)
            .filter(|node| predicate(node))
            .collect()
    }

    /// Convert back to nested literals.
    #[must_use]
    pub fn to_literals(&self) -> Vec<NavLiteral> {
        self.roots().into_iter().map(NodeRef::to_literal).collect()
    }

    fn node_ref(&self, idx: usize) -> NodeRef<'_> {
        NodeRef { forest: self, idx }
    }
}

/// Borrowed handle to a node in a [`Forest`].
#[derive(Clone, Copy)]
pub struct NodeRef<'a> {
    forest: &'a Forest,
    idx: usize,
}

impl<'a> NodeRef<'a> {
    /// Id of the node within its forest.
    #[must_use]
    pub fn id(self) -> NodeId {
        NodeId(self.idx)
    }

    /// Forest this node belongs to.
    #[must_use]
    pub fn forest(self) -> &'a Forest {
        self.forest
    }

    /// The underlying node.
    #[must_use]
    pub fn node(self) -> &'a NavigationNode {
        &self.forest.nodes[self.idx]
    }

    /// Display text.
    #[must_use]
    pub fn label(self) -> &'a str {
        &self.node().label
    }

    /// Link target, `None` for grouping nodes.
    #[must_use]
    pub fn target(self) -> Option<&'a str> {
        self.node().target.as_deref()
    }

    /// Fragment key if this node is a placeholder for a lazily loaded subtree.
    #[must_use]
    pub fn fragment(self) -> Option<&'a str> {
        self.node().fragment.as_deref()
    }

    /// Children in display order.
    #[must_use]
    pub fn children(self) -> Vec<NodeRef<'a>> {
        self.forest.children[self.idx]
            .iter()
            .map(|&idx| self.forest.node_ref(idx))
            .collect()
    }

    /// Whether the node has no stored children.
    #[must_use]
    pub fn is_leaf(self) -> bool {
        self.forest.children[self.idx].is_empty()
    }

    /// Parent node, `None` for top-level nodes.
    #[must_use]
    pub fn parent(self) -> Option<NodeRef<'a>> {
        self.forest.parents[self.idx].map(|idx| self.forest.node_ref(idx))
    }

    /// Ancestors from the parent up to the top-level node.
    #[must_use]
    pub fn ancestors(self) -> Vec<NodeRef<'a>> {
        let mut ancestors = Vec::new();
        let mut current = self.parent();
        while let Some(node) = current {
            ancestors.push(node);
            current = node.parent();
        }
        ancestors
    }

    /// Number of ancestors (0 for top-level nodes).
    #[must_use]
    pub fn depth(self) -> usize {
        self.ancestors().len()
    }

    /// Labels from the top-level node down to this one.
    #[must_use]
    pub fn label_path(self) -> Vec<&'a str> {
        let mut labels: Vec<_> = self.ancestors().into_iter().map(NodeRef::label).collect();
        labels.reverse();
        labels.push(self.label());
        labels
    }

    /// Convert this node and its subtree back to a literal.
    #[must_use]
    pub fn to_literal(self) -> NavLiteral {
        let children = self.children();
        let node = self.node();
        NavLiteral {
            label: Some(node.label.clone()),
            target: node.target.clone(),
            children: (!children.is_empty())
                .then(|| children.into_iter().map(NodeRef::to_literal).collect()),
            fragment: node.fragment.clone(),
        }
    }
}

impl PartialEq for NodeRef<'_> {
    fn eq(&self, other: &Self) -> bool {
        std::ptr::eq(self.forest, other.forest) && self.idx == other.idx
    }
}

impl Eq for NodeRef<'_> {}

impl fmt::Debug for NodeRef<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NodeRef")
            .field("id", &self.idx)
            .field("label", &self.label())
            .field("target", &self.target())
            .finish()
    }
}

/// Lazy pre-order walk over a [`Forest`].
pub struct Traverse<'a> {
    forest: &'a Forest,
    stack: Vec<(usize, usize)>,
}

impl<'a> Iterator for Traverse<'a> {
    type Item = (NodeRef<'a>, usize);

    fn next(&mut self) -> Option<Self::Item> {
        let (idx, depth) = self.stack.pop()?;
        self.stack.extend(
            self.forest.children[idx]
                .iter()
                .rev()
                .map(|&child| (child, depth + 1)),
        );
        Some((self.forest.node_ref(idx), depth))
    }
}
