#![forbid(unsafe_code)]

//! Mind-map hierarchy model (headless).
//!
//! The crate owns the persistent side of a mind map: named nodes with stable
//! random identifiers, ordered children, a per-node collapse flag, and the
//! accumulated manual drag offsets. Documents arrive as FreeMind `.mm` XML or
//! as this crate's own JSON export, and every structural edit the UI surface
//! can request (add/delete/rename/collapse/drag) is a method on [`MapTree`].
//!
//! Layout, reconciliation, and rendering live in the sibling crates; nothing
//! here knows about coordinates beyond storing drag corrections.

pub mod error;
pub mod map;

pub use error::{Error, Result};
pub use map::{
    MapTree, Node, Offset, demo_tree, parse_map_json, parse_map_xml, to_json_string,
    to_json_string_pretty,
};
