use crate::error::{Error, Result};

use super::tree::{DEFAULT_NAME, MapTree, Node};

/// Parses a FreeMind `.mm` document.
///
/// The document must contain a `map` element whose first direct `node` child
/// becomes the tree root. Each `node` may carry a `TEXT` attribute (the label;
/// defaults to [`DEFAULT_NAME`]) and nested `node` children; any other element
/// is ignored. Every imported node gets a fresh id, since `.mm` files carry
/// no stable identity of their own.
pub fn parse_map_xml(text: &str) -> Result<MapTree> {
    let doc = roxmltree::Document::parse(text)?;
    let map = doc
        .descendants()
        .find(|n| n.has_tag_name("map"))
        .ok_or(Error::MissingMapElement)?;
    let root = map
        .children()
        .find(|c| c.is_element() && c.has_tag_name("node"))
        .ok_or(Error::MissingRootNode)?;

    let tree = MapTree::new(import_node(root));
    tracing::debug!(nodes = tree.node_count(), "parsed map document");
    Ok(tree)
}

fn import_node(el: roxmltree::Node<'_, '_>) -> Node {
    let mut node = Node::new(el.attribute("TEXT").unwrap_or(DEFAULT_NAME));
    for child in el.children().filter(|c| c.is_element() && c.has_tag_name("node")) {
        node.children.push(import_node(child));
    }
    node
}
