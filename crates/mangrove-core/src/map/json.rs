use crate::error::Result;

use super::tree::{MapTree, Node};

/// Parses a map from this crate's own JSON export.
///
/// Missing `id` fields get fresh identifiers and a missing `name` falls back
/// to the default label, so hand-written documents stay loadable.
pub fn parse_map_json(text: &str) -> Result<MapTree> {
    let root: Node = serde_json::from_str(text)?;
    let tree = MapTree::new(root);
    tracing::debug!(nodes = tree.node_count(), "parsed map JSON");
    Ok(tree)
}

/// Serializes the full hierarchy, hidden subtrees included. Re-importing the
/// output reconstructs an equivalent tree: same names and structure, same
/// collapse flags and manual offsets where set.
pub fn to_json_string(tree: &MapTree) -> Result<String> {
    Ok(serde_json::to_string(tree.root())?)
}

pub fn to_json_string_pretty(tree: &MapTree) -> Result<String> {
    Ok(serde_json::to_string_pretty(tree.root())?)
}
