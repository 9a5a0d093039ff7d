mod demo;
mod json;
mod tree;
mod xml;

#[cfg(test)]
mod tests;

pub use demo::demo_tree;
pub use json::{parse_map_json, to_json_string, to_json_string_pretty};
pub use tree::{DEFAULT_NAME, MapTree, Node, Offset};
pub use xml::parse_map_xml;
