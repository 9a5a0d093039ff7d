//! Tidy-tree breadth assignment (Buchheim, Jünger, Leipert, "Improving
//! Walker's Algorithm to Run in Linear Time", 2002), the same family of
//! layout d3's `tree()` implements.
//!
//! One side of the map is laid out per call. The side's top-level branches are
//! hung under a synthetic side root, the classic two-walk scheme assigns every
//! node a preliminary breadth plus a subtree modifier, and the final breadth is
//! normalized so the synthetic root sits at zero, which keeps both sides
//! centered on the shared true root once they are mirrored apart.

use crate::LayoutOptions;
use crate::tree::Tree;

/// Breadth/depth assignment for one arena node of a side forest.
pub(crate) struct SideSlot {
    /// Index into the caller's arena.
    pub index: usize,
    /// True depth in the whole map (top-level branches are depth 1).
    pub depth: u32,
    /// Breadth in slot units; the caller scales by `breadth_spacing`.
    pub breadth: f64,
}

struct WalkNode {
    /// Arena index; `None` for the synthetic side root.
    item: Option<usize>,
    depth: u32,
    parent: Option<usize>,
    children: Vec<usize>,
    prelim: f64,
    modifier: f64,
    thread_left: Option<usize>,
    thread_right: Option<usize>,
    ancestor: usize,
    shift: f64,
    change: f64,
    /// Left-to-right index among siblings.
    number: usize,
}

impl WalkNode {
    fn new(item: Option<usize>, depth: u32, parent: Option<usize>, slot: usize) -> Self {
        Self {
            item,
            depth,
            parent,
            children: Vec::new(),
            prelim: 0.0,
            modifier: 0.0,
            thread_left: None,
            thread_right: None,
            ancestor: slot,
            shift: 0.0,
            change: 0.0,
            number: 0,
        }
    }
}

/// Lays out one side's forest and returns a slot per real node.
pub(crate) fn layout_side(
    tree: &Tree,
    branches: &[usize],
    options: &LayoutOptions,
) -> Vec<SideSlot> {
    let mut walk = Walk {
        nodes: Vec::new(),
        sibling_separation: options.sibling_separation,
        subtree_separation: options.subtree_separation,
    };

    walk.nodes.push(WalkNode::new(None, 0, None, 0));
    for (number, &branch) in branches.iter().enumerate() {
        let child = walk.adopt(tree, branch, 0, 1);
        walk.nodes[child].number = number;
        walk.nodes[0].children.push(child);
    }

    walk.first_walk(0);

    let mut breadth = vec![0.0f64; walk.nodes.len()];
    walk.second_walk(0, 0.0, &mut breadth);

    // Center on the synthetic root so the side's branches spread around the
    // shared breadth axis.
    let origin = breadth[0];

    walk.nodes
        .iter()
        .zip(&breadth)
        .filter_map(|(node, &b)| {
            node.item.map(|index| SideSlot {
                index,
                depth: node.depth,
                breadth: b - origin,
            })
        })
        .collect()
}

struct Walk {
    nodes: Vec<WalkNode>,
    sibling_separation: f64,
    subtree_separation: f64,
}

impl Walk {
    /// Copies one arena subtree into the walk, preserving sibling order.
    fn adopt(&mut self, tree: &Tree, index: usize, parent: usize, depth: u32) -> usize {
        let slot = self.nodes.len();
        self.nodes.push(WalkNode::new(Some(index), depth, Some(parent), slot));
        for (number, &child) in tree.nodes[index].children.iter().enumerate() {
            let adopted = self.adopt(tree, child, slot, depth + 1);
            self.nodes[adopted].number = number;
            self.nodes[slot].children.push(adopted);
        }
        slot
    }

    /// Bottom-up walk assigning preliminary breadths and subtree modifiers.
    fn first_walk(&mut self, v: usize) {
        let children = self.nodes[v].children.clone();
        if children.is_empty() {
            self.nodes[v].prelim = 0.0;
            return;
        }

        for &child in &children {
            self.first_walk(child);
        }

        let mut default_ancestor = children[0];
        for (i, &child) in children.iter().enumerate() {
            if i > 0 {
                let shift = self.separation_shift(children[i - 1], child);
                self.nodes[child].prelim += shift;
                self.nodes[child].modifier += shift;
                default_ancestor = self.apportion(child, children[i - 1], default_ancestor);
            }
        }

        self.execute_shifts(v);

        let first = self.nodes[children[0]].prelim;
        let last = self.nodes[children[children.len() - 1]].prelim;
        self.nodes[v].prelim = (first + last) / 2.0;
    }

    /// Scans the facing contours of two sibling subtrees and returns the shift
    /// the right one needs to clear the left one.
    fn separation_shift(&self, left: usize, right: usize) -> f64 {
        let mut left_contour = left;
        let mut right_contour = right;
        let mut left_mod = 0.0f64;
        let mut right_mod = 0.0f64;
        let mut max_shift = 0.0f64;

        loop {
            let left_x = self.nodes[left_contour].prelim + left_mod;
            let right_x = self.nodes[right_contour].prelim + right_mod;
            let wanted = if self.are_siblings(left_contour, right_contour) {
                self.sibling_separation
            } else {
                self.subtree_separation
            };

            max_shift = max_shift.max(left_x + wanted - right_x);

            match (self.next_right(left_contour), self.next_left(right_contour)) {
                (Some(nl), Some(nr)) => {
                    left_mod += self.nodes[left_contour].modifier;
                    right_mod += self.nodes[right_contour].modifier;
                    left_contour = nl;
                    right_contour = nr;
                }
                _ => break,
            }
        }

        max_shift
    }

    fn are_siblings(&self, a: usize, b: usize) -> bool {
        self.nodes[a].parent.is_some() && self.nodes[a].parent == self.nodes[b].parent
    }

    /// Next node on a subtree's right contour, following threads past leaves.
    fn next_right(&self, v: usize) -> Option<usize> {
        self.nodes[v]
            .children
            .last()
            .copied()
            .or(self.nodes[v].thread_right)
    }

    /// Next node on a subtree's left contour, following threads past leaves.
    fn next_left(&self, v: usize) -> Option<usize> {
        self.nodes[v]
            .children
            .first()
            .copied()
            .or(self.nodes[v].thread_left)
    }

    /// Resolves overlap between `v`'s subtree and every subtree to its left,
    /// distributing the shift across the intermediate siblings. This is the
    /// linear-time improvement over Walker's original algorithm.
    fn apportion(&mut self, v: usize, left_sibling: usize, mut default_ancestor: usize) -> usize {
        let mut inner_right = left_sibling;
        let mut outer_right = left_sibling;
        let mut inner_left = v;
        let mut outer_left = match self.nodes[v].parent {
            Some(parent) => self.nodes[parent].children.first().copied().unwrap_or(v),
            None => v,
        };

        let mut s_inner_right = self.nodes[inner_right].modifier;
        let mut s_outer_right = self.nodes[outer_right].modifier;
        let mut s_inner_left = self.nodes[inner_left].modifier;
        let mut s_outer_left = self.nodes[outer_left].modifier;

        loop {
            match (self.next_right(inner_right), self.next_left(inner_left)) {
                (Some(ir), Some(il)) => {
                    inner_right = ir;
                    inner_left = il;
                }
                _ => break,
            }
            if let Some(next) = self.next_left(outer_left) {
                outer_left = next;
            }
            if let Some(next) = self.next_right(outer_right) {
                outer_right = next;
            }

            self.nodes[outer_right].ancestor = v;

            let shift = (self.nodes[inner_right].prelim + s_inner_right)
                - (self.nodes[inner_left].prelim + s_inner_left)
                + self.subtree_separation;
            if shift > 0.0 {
                let ancestor = self.nodes[inner_right].ancestor;
                let from = if self.shares_parent_level(ancestor, v) {
                    ancestor
                } else {
                    default_ancestor
                };
                self.move_subtree(from, v, shift);
                s_inner_left += shift;
                s_outer_left += shift;
            }

            s_inner_right += self.nodes[inner_right].modifier;
            s_inner_left += self.nodes[inner_left].modifier;
            s_outer_left += self.nodes[outer_left].modifier;
            s_outer_right += self.nodes[outer_right].modifier;
        }

        if self.next_right(inner_right).is_some() && self.next_right(outer_right).is_none() {
            self.nodes[outer_right].thread_right = self.next_right(inner_right);
            self.nodes[outer_right].modifier += s_inner_right - s_outer_right;
        }
        if self.next_left(inner_left).is_some() && self.next_left(outer_left).is_none() {
            self.nodes[outer_left].thread_left = self.next_left(inner_left);
            self.nodes[outer_left].modifier += s_inner_left - s_outer_left;
            default_ancestor = v;
        }

        default_ancestor
    }

    fn shares_parent_level(&self, ancestor: usize, v: usize) -> bool {
        self.nodes[ancestor].depth <= self.nodes[v].depth
    }

    fn move_subtree(&mut self, left: usize, right: usize, shift: f64) {
        let subtrees =
            (self.nodes[right].number as f64 - self.nodes[left].number as f64).max(1.0);
        let per_subtree = shift / subtrees;

        self.nodes[right].change -= per_subtree;
        self.nodes[right].shift += shift;
        self.nodes[left].change += per_subtree;
        self.nodes[right].prelim += shift;
        self.nodes[right].modifier += shift;
    }

    /// Applies the shift/change bookkeeping accumulated by `move_subtree` so
    /// intermediate siblings end up evenly spaced.
    fn execute_shifts(&mut self, v: usize) {
        let children = self.nodes[v].children.clone();
        let mut shift = 0.0f64;
        let mut change = 0.0f64;
        for &child in children.iter().rev() {
            self.nodes[child].prelim += shift;
            self.nodes[child].modifier += shift;
            change += self.nodes[child].change;
            shift += self.nodes[child].shift + change;
        }
    }

    /// Top-down walk folding modifiers into final breadths.
    fn second_walk(&self, v: usize, modifier_sum: f64, breadth: &mut [f64]) {
        breadth[v] = self.nodes[v].prelim + modifier_sum;
        for &child in &self.nodes[v].children {
            self.second_walk(child, modifier_sum + self.nodes[v].modifier, breadth);
        }
    }
}
