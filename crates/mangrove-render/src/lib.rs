#![forbid(unsafe_code)]

//! Headless scene building and SVG rendering for mangrove mind maps.
//!
//! [`scene::build_scene`] projects the persistent hierarchy into the layout
//! crate's arena (collapsed subtrees become leaves), sizes the depth axis from
//! the widest label in the whole tree, runs the two-sided layout, and decorates
//! the placement with labels, node boxes, and branch colors. [`svg`] turns a
//! scene into a self-contained SVG document the raster/PDF exporters consume.

pub mod model;
pub mod scene;
pub mod svg;
pub mod text;


pub use model::{Bounds, FitTransform, MapScene, SceneLink, SceneNode};
pub use scene::{SceneOptions, build_scene, fit_transform};
pub use svg::{SvgRenderOptions, render_scene_svg};
pub use text::{DeterministicTextMeasurer, TextMeasurer};

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error(transparent)]
    Layout(#[from] mangrove_layout::Error),

    #[error("scene JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
