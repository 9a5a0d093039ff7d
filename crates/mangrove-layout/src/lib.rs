#![forbid(unsafe_code)]

//! Headless layout algorithms for two-sided ("radial split") mind-map trees.
//!
//! The crate is deliberately model-agnostic: callers hand it an arena-allocated
//! [`Tree`] describing one visible projection of their hierarchy, and get back a
//! [`Placement`] with a visual position for every node plus the parent/child
//! links between them. Successive placements can then be diffed with
//! [`reconcile`], which produces enter/update/exit transitions keyed by stable
//! node id for animated front ends.

pub mod error;
pub mod reconcile;
pub mod split;
mod tidy;
pub mod tree;

pub use error::{Error, Result};
pub use reconcile::{
    CurveEnds, LinkTransition, NodeTransition, PositionMemory, ScenePatch, reconcile,
};
pub use split::partition;
pub use tree::{Placed, PlacedLink, Placement, Point, Side, Tree, TreeNode};

/// Spacing and separation parameters for one layout pass.
#[derive(Debug, Clone)]
pub struct LayoutOptions {
    /// Distance between adjacent breadth slots (the `nodeSize` height).
    pub breadth_spacing: f64,
    /// Distance between consecutive depth levels. Callers typically derive this
    /// from the widest label in the tree so long names never collide.
    pub depth_spacing: f64,
    /// Extra clearance between the root and the first depth level of each side.
    pub root_clearance: f64,
    /// Separation between adjacent siblings, in breadth-slot units.
    pub sibling_separation: f64,
    /// Separation between nodes of different subtrees, in breadth-slot units.
    pub subtree_separation: f64,
}

impl Default for LayoutOptions {
    fn default() -> Self {
        Self {
            breadth_spacing: 80.0,
            depth_spacing: 180.0,
            root_clearance: 60.0,
            sibling_separation: 1.0,
            subtree_separation: 2.0,
        }
    }
}

/// Headless layout entry point.
///
/// The root lands at visual `(0, 0)`. Its immediate children are partitioned by
/// sibling parity ([`partition`]), each side is laid out independently as a tidy
/// tree, the left side is mirrored, and every node's accumulated manual offset
/// is folded in last.
pub fn layout(tree: &Tree, options: &LayoutOptions) -> Result<Placement> {
    tree.validate()?;

    let mut x = vec![0.0f64; tree.nodes.len()];
    let mut y = vec![0.0f64; tree.nodes.len()];
    let mut depth = vec![0u32; tree.nodes.len()];
    let mut side = vec![None::<Side>; tree.nodes.len()];

    let (right, left) = partition(&tree.nodes[Tree::ROOT].children);
    for (branches, dir) in [(&right, Side::Right), (&left, Side::Left)] {
        if branches.is_empty() {
            continue;
        }
        let sign = match dir {
            Side::Right => 1.0,
            Side::Left => -1.0,
        };
        for slot in tidy::layout_side(tree, branches, options) {
            x[slot.index] = sign * (f64::from(slot.depth) * options.depth_spacing
                + options.root_clearance);
            y[slot.index] = slot.breadth * options.breadth_spacing;
            depth[slot.index] = slot.depth;
            side[slot.index] = Some(dir);
        }
    }

    // Manual drag corrections are stored in the tree's native frame: `dx` moves
    // a node along the breadth axis (visual Y), `dy` along the depth axis
    // (visual X). The root participates like any other node.
    for (index, node) in tree.nodes.iter().enumerate() {
        x[index] += node.offset.y;
        y[index] += node.offset.x;
    }

    let parents = tree.parents();

    let mut nodes = Vec::with_capacity(tree.nodes.len());
    for (index, node) in tree.nodes.iter().enumerate() {
        nodes.push(Placed {
            id: node.id.clone(),
            parent: parents[index].map(|p| tree.nodes[p].id.clone()),
            depth: depth[index],
            side: side[index],
            position: Point {
                x: x[index],
                y: y[index],
            },
        });
    }

    let mut links = Vec::with_capacity(tree.nodes.len().saturating_sub(1));
    for (index, node) in tree.nodes.iter().enumerate() {
        let Some(parent) = parents[index] else {
            continue;
        };
        links.push(PlacedLink {
            source: tree.nodes[parent].id.clone(),
            target: node.id.clone(),
            source_point: Point {
                x: x[parent],
                y: y[parent],
            },
            target_point: Point {
                x: x[index],
                y: y[index],
            },
        });
    }

    Ok(Placement { nodes, links })
}

#[cfg(test)]
mod tests;
