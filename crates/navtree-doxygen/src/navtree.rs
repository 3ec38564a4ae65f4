//! Conversion of `navtreedata.js` and fragment files into a [`TreeSource`].
//!
//! Every entry is a `[label, target, children]` triple. `target` is a string
//! or `null`; `children` is an array of entries, `null`, or the key of a
//! fragment file holding the children.

use navtree_core::{LoadError, NodePath, SourceEntry, SourceId, SyncMessages, TreeSource};
use serde_json::Value;

use crate::js::Script;

/// Variable holding the top-level forest.
pub const NAVTREE_VAR: &str = "NAVTREE";
/// Variable holding the first target of each index page.
pub const NAVTREEINDEX_VAR: &str = "NAVTREEINDEX";
/// Variable holding the "synchronisation on" message.
pub const SYNCONMSG_VAR: &str = "SYNCONMSG";
/// Variable holding the "synchronisation off" message.
pub const SYNCOFFMSG_VAR: &str = "SYNCOFFMSG";

/// Read a parsed `navtreedata.js` into `source`.
///
/// Returns the fragment keys referenced by the forest, in source order.
pub fn read_navtree(script: &Script, source: &mut TreeSource) -> Result<Vec<String>, LoadError> {
    let value = script.get(NAVTREE_VAR).ok_or_else(|| {
        LoadError::malformed(NodePath::root(), format!("missing `{NAVTREE_VAR}` variable"))
    })?;

    let mut keys = Vec::new();
    let roots = read_entries(value, source, &mut NodePath::root(), &mut keys)?;
    for root in roots {
        source.push_root(root);
    }

    if let Some(index) = script.get(NAVTREEINDEX_VAR) {
        source.set_page_index(read_page_index(index)?);
    }

    let defaults = SyncMessages::default();
    source.set_sync_messages(SyncMessages {
        on: read_message(script, SYNCONMSG_VAR)?.unwrap_or(defaults.on),
        off: read_message(script, SYNCOFFMSG_VAR)?.unwrap_or(defaults.off),
    });

    Ok(keys)
}

/// Read a parsed fragment file into `source` under `key`.
///
/// The fragment is bound to a variable named after its key; a file with a
/// different variable name falls back to its first binding.
///
/// Returns the fragment keys referenced from inside this fragment.
pub fn read_fragment(
    key: &str,
    script: &Script,
    source: &mut TreeSource,
) -> Result<Vec<String>, LoadError> {
    let mut path = NodePath::in_fragment(key);
    let value = script
        .get(key)
        .or_else(|| script.first())
        .ok_or_else(|| LoadError::malformed(path.clone(), "fragment file binds no data"))?;

    let mut keys = Vec::new();
    let roots = read_entries(value, source, &mut path, &mut keys)?;
    source.add_fragment(key, roots);

    Ok(keys)
}

fn read_entries(
    value: &Value,
    source: &mut TreeSource,
    path: &mut NodePath,
    keys: &mut Vec<String>,
) -> Result<Vec<SourceId>, LoadError> {
    let Value::Array(items) = value else {
        return Err(LoadError::malformed(
            path.clone(),
            "expected an array of entries",
        ));
    };

    items
        .iter()
        .enumerate()
        .map(|(position, item)| read_entry(item, position, source, path, keys))
        .collect()
}

fn read_entry(
    item: &Value,
    position: usize,
    source: &mut TreeSource,
    path: &mut NodePath,
    keys: &mut Vec<String>,
) -> Result<SourceId, LoadError> {
    let Value::Array(fields) = item else {
        path.push(NodePath::segment_for(None, position));
        return Err(LoadError::malformed(
            path.clone(),
            "expected a [label, target, children] array",
        ));
    };

    let label = match fields.first() {
        None | Some(Value::Null) => None,
        Some(Value::String(label)) => Some(label.clone()),
        Some(_) => {
            path.push(NodePath::segment_for(None, position));
            return Err(LoadError::malformed(path.clone(), "label must be a string"));
        }
    };
    path.push(NodePath::segment_for(label.as_deref(), position));

    if fields.len() > 3 {
        return Err(LoadError::malformed(
            path.clone(),
            format!("expected at most 3 fields, found {}", fields.len()),
        ));
    }

    let target = match fields.get(1) {
        None | Some(Value::Null) => None,
        Some(Value::String(target)) => Some(target.clone()),
        Some(_) => {
            return Err(LoadError::malformed(
                path.clone(),
                "target must be a string or null",
            ));
        }
    };

    let id = source.add_entry(SourceEntry {
        label,
        target,
        ..SourceEntry::default()
    });

    match fields.get(2) {
        None | Some(Value::Null) => {}
        Some(Value::String(key)) => {
            source.set_fragment_key(id, key.as_str());
            keys.push(key.clone());
        }
        Some(children @ Value::Array(_)) => {
            for child in read_entries(children, source, path, keys)? {
                source.push_child(id, child);
            }
        }
        Some(_) => {
            return Err(LoadError::malformed(
                path.clone(),
                "children must be an array, a fragment key or null",
            ));
        }
    }

    path.pop();
    Ok(id)
}

fn read_page_index(value: &Value) -> Result<Vec<String>, LoadError> {
    let invalid = || {
        LoadError::malformed(
            NodePath::root(),
            format!("`{NAVTREEINDEX_VAR}` must be an array of strings"),
        )
    };
    let Value::Array(items) = value else {
        return Err(invalid());
    };
    items
        .iter()
        .map(|item| item.as_str().map(str::to_owned).ok_or_else(invalid))
        .collect()
}

fn read_message(script: &Script, name: &str) -> Result<Option<String>, LoadError> {
    match script.get(name) {
        None => Ok(None),
        Some(Value::String(message)) => Ok(Some(message.clone())),
        Some(_) => Err(LoadError::malformed(
            NodePath::root(),
            format!("`{name}` must be a string"),
        )),
    }
}
