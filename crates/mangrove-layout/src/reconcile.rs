//! Id-keyed reconciliation between successive layout passes.
//!
//! The reconciler compares the ids rendered by the previous pass against a
//! fresh [`Placement`] and emits three plain sets (enter, update, exit) for
//! nodes and links, each transition carrying explicit `from`/`to` geometry.
//! Nothing here knows how the scene is drawn; any renderer that can animate a
//! translation and a curve can consume a [`ScenePatch`].

use rustc_hash::FxHashSet;
use serde::{Deserialize, Serialize};

use crate::tree::{Placement, Point};

/// Persistent id → last-rendered-position map, plus the id sets of the
/// previous pass. This is the sole animation-continuity mechanism: entries are
/// never dropped, so an element that exits and later re-enters (collapse, then
/// expand) still anchors to a sensible position instead of the origin.
#[derive(Debug, Clone, Default)]
pub struct PositionMemory {
    positions: rustc_hash::FxHashMap<String, Point>,
    rendered_nodes: Vec<String>,
    /// `(target, source)` pairs of the links drawn by the previous pass.
    rendered_links: Vec<(String, String)>,
}

impl PositionMemory {
    /// Last recorded position of `id`, from any earlier pass.
    pub fn position(&self, id: &str) -> Option<Point> {
        self.positions.get(id).copied()
    }

    /// Whether `id` was rendered by the immediately preceding pass.
    pub fn was_rendered(&self, id: &str) -> bool {
        self.rendered_nodes.iter().any(|n| n == id)
    }

    /// Number of ids that have ever been rendered.
    pub fn tracked(&self) -> usize {
        self.positions.len()
    }
}

/// One node moving from `from` to `to` over the pass duration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NodeTransition {
    pub id: String,
    pub from: Point,
    pub to: Point,
}

/// Endpoints of one rendered link curve.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct CurveEnds {
    pub source: Point,
    pub target: Point,
}

/// One link moving between endpoint pairs; keyed by `target`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LinkTransition {
    pub source: String,
    pub target: String,
    pub from: CurveEnds,
    pub to: CurveEnds,
}

/// The full output of one reconciliation pass.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScenePatch {
    /// Transition time in milliseconds; `0` means apply instantaneously
    /// (used during drag so animation never fights the pointer).
    pub duration: u32,
    pub enter: Vec<NodeTransition>,
    pub update: Vec<NodeTransition>,
    pub exit: Vec<NodeTransition>,
    pub link_enter: Vec<LinkTransition>,
    pub link_update: Vec<LinkTransition>,
    pub link_exit: Vec<LinkTransition>,
}

/// Diffs `placement` against the previous pass recorded in `memory`.
///
/// `source` is the id of the node that triggered the update (the toggled,
/// edited, or dragged node). Entering elements anchor at the previous position
/// of their parent when one is known, else at the source's previous position,
/// else at the root's last known position, else at the origin. Exiting
/// elements collapse toward the source's *new* position. The memory is updated
/// at the end of the pass for every rendered id.
pub fn reconcile(
    memory: &mut PositionMemory,
    placement: &Placement,
    source: Option<&str>,
    duration: u32,
) -> ScenePatch {
    let origin = Point::default();
    let root_id = placement.root().map(|r| r.id.clone());

    let exit_anchor = source
        .and_then(|s| placement.position_of(s))
        .or_else(|| source.and_then(|s| memory.position(s)))
        .or_else(|| root_id.as_deref().and_then(|r| placement.position_of(r)))
        .unwrap_or(origin);

    let enter_anchor = |parent: Option<&str>| -> Point {
        parent
            .and_then(|p| memory.position(p))
            .or_else(|| source.and_then(|s| memory.position(s)))
            .or_else(|| root_id.as_deref().and_then(|r| memory.position(r)))
            .unwrap_or(origin)
    };

    let mut enter = Vec::new();
    let mut update = Vec::new();
    for node in &placement.nodes {
        let to = node.position;
        if memory.was_rendered(&node.id) {
            update.push(NodeTransition {
                id: node.id.clone(),
                from: memory.position(&node.id).unwrap_or(to),
                to,
            });
        } else {
            enter.push(NodeTransition {
                id: node.id.clone(),
                from: enter_anchor(node.parent.as_deref()),
                to,
            });
        }
    }

    let new_ids: FxHashSet<&str> = placement.nodes.iter().map(|n| n.id.as_str()).collect();
    let mut exit = Vec::new();
    for id in &memory.rendered_nodes {
        if new_ids.contains(id.as_str()) {
            continue;
        }
        exit.push(NodeTransition {
            id: id.clone(),
            from: memory.position(id).unwrap_or(exit_anchor),
            to: exit_anchor,
        });
    }

    let mut link_enter = Vec::new();
    let mut link_update = Vec::new();
    let previously_linked: FxHashSet<&str> = memory
        .rendered_links
        .iter()
        .map(|(target, _)| target.as_str())
        .collect();
    for link in &placement.links {
        let to = CurveEnds {
            source: link.source_point,
            target: link.target_point,
        };
        if previously_linked.contains(link.target.as_str()) {
            let from = CurveEnds {
                source: memory.position(&link.source).unwrap_or(link.source_point),
                target: memory.position(&link.target).unwrap_or(link.target_point),
            };
            link_update.push(LinkTransition {
                source: link.source.clone(),
                target: link.target.clone(),
                from,
                to,
            });
        } else {
            let anchor = enter_anchor(Some(link.source.as_str()));
            link_enter.push(LinkTransition {
                source: link.source.clone(),
                target: link.target.clone(),
                from: CurveEnds {
                    source: anchor,
                    target: anchor,
                },
                to,
            });
        }
    }

    let new_link_targets: FxHashSet<&str> =
        placement.links.iter().map(|l| l.target.as_str()).collect();
    let mut link_exit = Vec::new();
    for (target, source_id) in &memory.rendered_links {
        if new_link_targets.contains(target.as_str()) {
            continue;
        }
        let from = CurveEnds {
            source: memory.position(source_id).unwrap_or(exit_anchor),
            target: memory.position(target).unwrap_or(exit_anchor),
        };
        link_exit.push(LinkTransition {
            source: source_id.clone(),
            target: target.clone(),
            from,
            to: CurveEnds {
                source: exit_anchor,
                target: exit_anchor,
            },
        });
    }

    // Record this pass. Exited ids keep their last positions so a later
    // re-entry still has an anchor.
    for node in &placement.nodes {
        memory.positions.insert(node.id.clone(), node.position);
    }
    memory.rendered_nodes = placement.nodes.iter().map(|n| n.id.clone()).collect();
    memory.rendered_links = placement
        .links
        .iter()
        .map(|l| (l.target.clone(), l.source.clone()))
        .collect();

    ScenePatch {
        duration,
        enter,
        update,
        exit,
        link_enter,
        link_update,
        link_exit,
    }
}
