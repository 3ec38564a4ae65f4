//! Conversion of `menudata.js` into a [`TreeSource`].
//!
//! The dropdown menu is an object `{children: [...]}` whose items are
//! `{text, url, children?}` objects.

use navtree_core::{LoadError, NodePath, SourceEntry, SourceId, TreeSource};
use serde_json::Value;

use crate::js::Script;

/// Variable holding the menu.
pub const MENUDATA_VAR: &str = "menudata";

/// Read a parsed `menudata.js` into a new source.
pub fn read_menu(script: &Script) -> Result<TreeSource, LoadError> {
    let mut path = NodePath::root();
    let value = script.get(MENUDATA_VAR).ok_or_else(|| {
        LoadError::malformed(path.clone(), format!("missing `{MENUDATA_VAR}` variable"))
    })?;
    let Value::Object(menu) = value else {
        return Err(LoadError::malformed(
            path,
            format!("`{MENUDATA_VAR}` must be an object"),
        ));
    };

    let mut source = TreeSource::new();
    if let Some(children) = menu.get("children") {
        for root in read_items(children, &mut source, &mut path)? {
            source.push_root(root);
        }
    }
    Ok(source)
}

fn read_items(
    value: &Value,
    source: &mut TreeSource,
    path: &mut NodePath,
) -> Result<Vec<SourceId>, LoadError> {
    match value {
        Value::Null => Ok(Vec::new()),
        Value::Array(items) => items
            .iter()
            .enumerate()
            .map(|(position, item)| read_item(item, position, source, path))
            .collect(),
        _ => Err(LoadError::malformed(
            path.clone(),
            "menu children must be an array",
        )),
    }
}

fn read_item(
    item: &Value,
    position: usize,
    source: &mut TreeSource,
    path: &mut NodePath,
) -> Result<SourceId, LoadError> {
    let Value::Object(fields) = item else {
        path.push(NodePath::segment_for(None, position));
        return Err(LoadError::malformed(path.clone(), "menu item must be an object"));
    };

    let label = optional_string(fields.get("text"));
    let target = optional_string(fields.get("url"));
    path.push(NodePath::segment_for(
        label.as_ref().ok().and_then(Option::as_deref),
        position,
    ));

    let label = label.map_err(|()| LoadError::malformed(path.clone(), "`text` must be a string"))?;
    let target = target.map_err(|()| LoadError::malformed(path.clone(), "`url` must be a string"))?;

    let id = source.add_entry(SourceEntry {
        label,
        target,
        ..SourceEntry::default()
    });
    if let Some(children) = fields.get("children") {
        for child in read_items(children, source, path)? {
            source.push_child(id, child);
        }
    }

    path.pop();
    Ok(id)
}

fn optional_string(value: Option<&Value>) -> Result<Option<String>, ()> {
    match value {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(s)) => Ok(Some(s.clone())),
        Some(_) => Err(()),
    }
}
