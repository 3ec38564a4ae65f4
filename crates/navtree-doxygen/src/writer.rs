//! Writer producing `navtreedata.js` and fragment files.
//!
//! Output follows Doxygen's layout, so reading it back yields a
//! structurally identical tree.

use std::fmt::Write as _;

use navtree_core::{Forest, NavigationTree, NodeRef};

use crate::navtree::{NAVTREE_VAR, NAVTREEINDEX_VAR, SYNCOFFMSG_VAR, SYNCONMSG_VAR};

/// Render the main forest, page index and sync messages as `navtreedata.js`.
#[must_use]
pub fn write_navtree(tree: &NavigationTree) -> String {
    let mut out = String::new();

    write_binding(&mut out, NAVTREE_VAR, &tree.roots());
    out.push('\n');

    let _ = writeln!(out, "var {NAVTREEINDEX_VAR} =\n[");
    let index: Vec<_> = tree
        .page_index()
        .iter()
        .map(|url| quote(url, '"'))
        .collect();
    if !index.is_empty() {
        out.push_str(&index.join(",\n"));
        out.push('\n');
    }
    out.push_str("];\n\n");

    let sync = tree.sync_messages();
    let _ = writeln!(out, "var {SYNCONMSG_VAR} = {};", quote(&sync.on, '\''));
    let _ = writeln!(out, "var {SYNCOFFMSG_VAR} = {};", quote(&sync.off, '\''));

    out
}

/// Render a fragment as the contents of `<key>.js`.
#[must_use]
pub fn write_fragment(key: &str, fragment: &Forest) -> String {
    let mut out = String::new();
    write_binding(&mut out, key, &fragment.roots());
    out
}

fn write_binding(out: &mut String, name: &str, roots: &[NodeRef<'_>]) {
    let _ = writeln!(out, "var {name} =\n[");
    if !roots.is_empty() {
        write_entries(out, roots, 0);
        out.push('\n');
    }
    out.push_str("];\n");
}

fn write_entries(out: &mut String, nodes: &[NodeRef<'_>], depth: usize) {
    for (i, &node) in nodes.iter().enumerate() {
        if i > 0 {
            out.push_str(",\n");
        }
        write_entry(out, node, depth);
    }
}

fn write_entry(out: &mut String, node: NodeRef<'_>, depth: usize) {
    let indent = "  ".repeat(depth + 1);
    let target = node.target().map_or_else(|| "null".to_owned(), |t| quote(t, '"'));
    let _ = write!(out, "{indent}[ {}, {target}, ", quote(node.label(), '"'));

    if let Some(key) = node.fragment() {
        let _ = write!(out, "{} ]", quote(key, '"'));
        return;
    }

    let children = node.children();
    if children.is_empty() {
        out.push_str("null ]");
    } else {
        out.push_str("[\n");
        write_entries(out, &children, depth + 1);
        let _ = write!(out, "\n{indent}] ]");
    }
}

/// Quote `s` as a JavaScript string literal using `delimiter`.
fn quote(s: &str, delimiter: char) -> String {
    let mut out = String::with_capacity(s.len() + 2);
    out.push(delimiter);
    for c in s.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            c if c == delimiter => {
                out.push('\\');
                out.push(c);
            }
            c if c.is_control() => {
                let _ = write!(out, "\\u{:04x}", u32::from(c));
            }
            c => out.push(c),
        }
    }
    out.push(delimiter);
    out
}
