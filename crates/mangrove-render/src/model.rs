use mangrove_layout::{Placement, Point, Side};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Bounds {
    pub min_x: f64,
    pub min_y: f64,
    pub max_x: f64,
    pub max_y: f64,
}

impl Bounds {
    pub fn from_points(points: impl IntoIterator<Item = (f64, f64)>) -> Option<Self> {
        let mut it = points.into_iter();
        let (x0, y0) = it.next()?;
        let mut b = Self {
            min_x: x0,
            min_y: y0,
            max_x: x0,
            max_y: y0,
        };
        for (x, y) in it {
            b.min_x = b.min_x.min(x);
            b.min_y = b.min_y.min(y);
            b.max_x = b.max_x.max(x);
            b.max_y = b.max_y.max(y);
        }
        Some(b)
    }

    pub fn width(&self) -> f64 {
        self.max_x - self.min_x
    }

    pub fn height(&self) -> f64 {
        self.max_y - self.min_y
    }
}

/// One drawable node: placement geometry plus the label box and color the
/// SVG writer needs.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SceneNode {
    pub id: String,
    pub label: String,
    pub depth: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub side: Option<Side>,
    /// Node center in the shared visual frame.
    pub position: Point,
    pub width: f64,
    pub height: f64,
    /// Branch stroke color (the root uses it as its fill).
    pub color: String,
}

/// One drawable link, keyed by `target`; drawn as a single-bend cubic.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SceneLink {
    pub source: String,
    pub target: String,
    pub source_point: Point,
    pub target_point: Point,
    pub color: String,
}

/// One fully laid-out frame of the map.
///
/// `placement` is the raw layout output and feeds the reconciler; `nodes` and
/// `links` are its render decorations, index-aligned with it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MapScene {
    pub placement: Placement,
    pub nodes: Vec<SceneNode>,
    pub links: Vec<SceneLink>,
    pub bounds: Option<Bounds>,
}

/// Zoom/pan transform that fits content bounds into a viewport.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FitTransform {
    pub scale: f64,
    pub translate_x: f64,
    pub translate_y: f64,
}
