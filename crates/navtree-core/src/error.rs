//! Error types for tree loading and fragment lookup.

use std::fmt;

/// Location of a node inside a navigation source.
///
/// Segments are node labels from the top-level forest down to the offending
/// node. Nodes without a usable label are named by their position (`#2`).
/// Nodes inside a fragment carry the fragment key.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct NodePath {
    /// Fragment key when the node lives in a fragment rather than the main forest.
    pub fragment: Option<String>,
    /// Labels (or positions) from the root to the node.
    pub segments: Vec<String>,
}

impl NodePath {
    /// Create an empty path in the main forest.
    #[must_use]
    pub fn root() -> Self {
        Self::default()
    }

    /// Create an empty path inside the given fragment.
    #[must_use]
    pub fn in_fragment(key: impl Into<String>) -> Self {
        Self {
            fragment: Some(key.into()),
            segments: Vec::new(),
        }
    }

    /// Append a segment.
    pub fn push(&mut self, segment: impl Into<String>) {
        self.segments.push(segment.into());
    }

    /// Remove the last segment.
    pub fn pop(&mut self) {
        self.segments.pop();
    }

    /// Segment naming a node by label, or by position when the label is unusable.
    #[must_use]
    pub fn segment_for(label: Option<&str>, position: usize) -> String {
        match label {
            Some(label) if !label.trim().is_empty() => label.to_owned(),
            _ => format!("#{position}"),
        }
    }
}

impl fmt::Display for NodePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(fragment) = &self.fragment {
            write!(f, "[{fragment}] ")?;
        }
        if self.segments.is_empty() {
            return write!(f, "<root>");
        }
        write!(f, "{}", self.segments.join(" > "))
    }
}

/// Error returned when a navigation source fails validation.
///
/// Both variants are fatal: no tree is produced.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum LoadError {
    /// Structural violation: missing or empty label, empty target, wrong shape.
    #[error("Malformed navigation tree at {path}: {reason}")]
    MalformedTree {
        /// Path of the offending node.
        path: NodePath,
        /// What is wrong with it.
        reason: String,
    },
    /// A node is its own ancestor, or fragments reference each other in a loop.
    #[error("Cyclic reference at {path}")]
    CyclicReference {
        /// Path at which the cycle closes.
        path: NodePath,
    },
}

impl LoadError {
    /// Create a [`LoadError::MalformedTree`].
    #[must_use]
    pub fn malformed(path: NodePath, reason: impl Into<String>) -> Self {
        Self::MalformedTree {
            path,
            reason: reason.into(),
        }
    }

    /// Path of the offending node.
    #[must_use]
    pub fn path(&self) -> &NodePath {
        match self {
            Self::MalformedTree { path, .. } | Self::CyclicReference { path } => path,
        }
    }
}

/// A fragment key is absent from the menu index.
///
/// Expected at runtime; callers render the placeholder as a leaf.
#[derive(Debug, Clone, thiserror::Error, PartialEq, Eq)]
#[error("Fragment not found: {0}")]
pub struct NotFound(pub String);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_node_path_display_joins_segments() {
        let mut path = NodePath::root();
        path.push("Random Walks Emulator");
        path.push("Home page");

        assert_eq!(path.to_string(), "Random Walks Emulator > Home page");
    }

    #[test]
    fn test_node_path_display_empty_is_root() {
        assert_eq!(NodePath::root().to_string(), "<root>");
    }

    #[test]
    fn test_node_path_display_includes_fragment() {
        let mut path = NodePath::in_fragment("annotated");
        path.push("Graph");

        assert_eq!(path.to_string(), "[annotated] Graph");
    }

    #[test]
    fn test_segment_for_falls_back_to_position() {
        assert_eq!(NodePath::segment_for(Some("Docs"), 3), "Docs");
        assert_eq!(NodePath::segment_for(Some("  "), 3), "#3");
        assert_eq!(NodePath::segment_for(None, 0), "#0");
    }

    #[test]
    fn test_malformed_error_message_names_path() {
        let mut path = NodePath::root();
        path.push("Docs");
        path.push("#1");
        let err = LoadError::malformed(path, "missing label");

        assert_eq!(
            err.to_string(),
            "Malformed navigation tree at Docs > #1: missing label"
        );
        assert_eq!(err.path().segments.len(), 2);
    }

    #[test]
    fn test_not_found_message() {
        let err = NotFound("missing".to_owned());

        assert_eq!(err.to_string(), "Fragment not found: missing");
    }
}
