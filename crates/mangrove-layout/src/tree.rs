use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// A visual position, in the shared frame both sides are folded into.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

/// Which half-plane a branch is laid out in. The root itself has no side.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    Right,
    Left,
}

/// One node of the per-pass layout arena.
#[derive(Debug, Clone)]
pub struct TreeNode {
    /// Stable identity, unique within the tree. Used as the sole diffing key.
    pub id: String,
    /// Indices of this node's children, in sibling order.
    pub children: Vec<usize>,
    /// Accumulated manual drag correction, in the tree's native frame
    /// (`x` = breadth correction, `y` = depth correction).
    pub offset: Point,
}

/// Arena-allocated input tree for one layout pass.
///
/// Index [`Tree::ROOT`] is the root; every other index must be reachable from
/// it through exactly one `children` entry. The arena is rebuilt from the
/// caller's model on every pass and never outlives it.
#[derive(Debug, Clone, Default)]
pub struct Tree {
    pub nodes: Vec<TreeNode>,
}

impl Tree {
    pub const ROOT: usize = 0;

    /// Checks the arena is a well-formed tree rooted at index 0.
    pub fn validate(&self) -> Result<()> {
        if self.nodes.is_empty() {
            return Err(Error::EmptyTree);
        }
        let mut seen = vec![false; self.nodes.len()];
        for node in &self.nodes {
            for &child in &node.children {
                if child >= self.nodes.len() {
                    return Err(Error::ChildOutOfBounds { index: child });
                }
                if child == Self::ROOT || seen[child] {
                    return Err(Error::DuplicateChild { index: child });
                }
                seen[child] = true;
            }
        }
        if let Some(index) = seen.iter().skip(1).position(|s| !s) {
            return Err(Error::UnreachableNode { index: index + 1 });
        }
        Ok(())
    }

    /// Parent index per node (`None` for the root), derived from `children`.
    pub fn parents(&self) -> Vec<Option<usize>> {
        let mut parents = vec![None; self.nodes.len()];
        for (index, node) in self.nodes.iter().enumerate() {
            for &child in &node.children {
                if child < parents.len() {
                    parents[child] = Some(index);
                }
            }
        }
        parents
    }
}

/// One placed node of a finished layout pass.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Placed {
    pub id: String,
    /// Id of the parent node; `None` for the root. Depth-1 branches always
    /// point at the true root, never at a per-side synthetic root.
    pub parent: Option<String>,
    pub depth: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub side: Option<Side>,
    pub position: Point,
}

/// One parent→child link of a finished layout pass, keyed by `target`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlacedLink {
    pub source: String,
    pub target: String,
    pub source_point: Point,
    pub target_point: Point,
}

/// The flattened result of one layout pass, in arena order (root first).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Placement {
    pub nodes: Vec<Placed>,
    pub links: Vec<PlacedLink>,
}

impl Placement {
    /// The placed root, if the placement is non-empty.
    pub fn root(&self) -> Option<&Placed> {
        self.nodes.iter().find(|n| n.parent.is_none())
    }

    pub fn position_of(&self, id: &str) -> Option<Point> {
        self.nodes.iter().find(|n| n.id == id).map(|n| n.position)
    }
}
