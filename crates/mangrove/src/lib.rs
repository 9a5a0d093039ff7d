#![forbid(unsafe_code)]

//! `mangrove` is a headless mind-map engine.
//!
//! The facade re-exports the model crate wholesale and scopes the layout and
//! render stacks under modules; [`Session`] ties them together into the
//! interactive surface a UI front end drives: one fully reconciled scene patch
//! per structural edit, zero-duration passes while dragging, and a busy guard
//! serializing loads and exports.

pub use mangrove_core::*;

pub mod layout {
    pub use mangrove_layout::{
        CurveEnds, LayoutOptions, LinkTransition, NodeTransition, Placed, PlacedLink, Placement,
        Point, PositionMemory, ScenePatch, Side, Tree, TreeNode, layout, partition, reconcile,
    };
}

pub mod render {
    pub use mangrove_render::{
        Bounds, DeterministicTextMeasurer, FitTransform, MapScene, SceneLink, SceneNode,
        SceneOptions, SvgRenderOptions, TextMeasurer, build_scene, fit_transform,
        render_scene_svg,
    };
}

pub mod session;

pub use session::{ExportGuard, Mode, Session, SessionError, SessionOptions};
