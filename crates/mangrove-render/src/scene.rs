use indexmap::IndexMap;
use mangrove_core::{MapTree, Node};
use mangrove_layout::{LayoutOptions, Point, Tree, TreeNode};

use crate::model::{Bounds, FitTransform, MapScene, SceneLink, SceneNode};
use crate::text::TextMeasurer;
use crate::Result;

/// Fill color of the root node; everything else takes its branch color.
pub const ROOT_COLOR: &str = "#2563eb";

/// Branch palette, assigned to the root's children in order.
pub const BRANCH_COLORS: [&str; 8] = [
    "#4285F4", "#EA4335", "#FBBC05", "#34A853", "#8E24AA", "#00ACC1", "#F4511E", "#7CB342",
];

#[derive(Debug, Clone)]
pub struct SceneOptions {
    /// Distance between adjacent breadth slots.
    pub breadth_spacing: f64,
    /// Floor for the depth step; the widest label can only grow it.
    pub min_depth_spacing: f64,
    /// Margin added to the widest label when sizing the depth step.
    pub label_margin: f64,
    /// Clearance between the root and the first depth level.
    pub root_clearance: f64,
    /// Node box height.
    pub node_height: f64,
    /// Horizontal padding added to a label when sizing its box.
    pub label_padding: f64,
}

impl Default for SceneOptions {
    fn default() -> Self {
        Self {
            breadth_spacing: 80.0,
            min_depth_spacing: 180.0,
            label_margin: 60.0,
            root_clearance: 60.0,
            node_height: 36.0,
            label_padding: 30.0,
        }
    }
}

/// Builds one drawable frame from the current hierarchy.
///
/// Collapsed nodes are projected as leaves: their subtrees stay in the data
/// model but contribute nothing to the shape. The depth step is derived from
/// the widest label anywhere in the whole tree (hidden nodes included), so
/// re-expanding a branch never introduces label collisions.
pub fn build_scene(
    tree: &MapTree,
    measurer: &dyn TextMeasurer,
    options: &SceneOptions,
) -> Result<MapScene> {
    let widest = widest_label(tree.root(), measurer);
    let layout_options = LayoutOptions {
        breadth_spacing: options.breadth_spacing,
        depth_spacing: options.min_depth_spacing.max(widest + options.label_margin),
        root_clearance: options.root_clearance,
        ..LayoutOptions::default()
    };

    // Visible projection: arena indices in preorder, branch = depth-1 ancestor.
    let mut arena = Tree::default();
    let mut labels: Vec<String> = Vec::new();
    let mut branches: Vec<Option<String>> = Vec::new();
    project(tree.root(), None, &mut arena, &mut labels, &mut branches);

    let placement = mangrove_layout::layout(&arena, &layout_options)?;

    // Branch colors follow the full child list (hidden branches included) so a
    // branch keeps its color across collapse/expand cycles.
    let mut branch_colors: IndexMap<&str, &str> = IndexMap::new();
    for (i, child) in tree.root().children.iter().enumerate() {
        branch_colors.insert(child.id.as_str(), BRANCH_COLORS[i % BRANCH_COLORS.len()]);
    }
    let color_of = |branch: Option<&String>| -> String {
        branch
            .and_then(|b| branch_colors.get(b.as_str()))
            .copied()
            .unwrap_or(ROOT_COLOR)
            .to_string()
    };

    let mut nodes = Vec::with_capacity(placement.nodes.len());
    for (index, placed) in placement.nodes.iter().enumerate() {
        let label = labels[index].clone();
        let width = measurer.measure(&label) + options.label_padding;
        nodes.push(SceneNode {
            id: placed.id.clone(),
            label,
            depth: placed.depth,
            side: placed.side,
            position: placed.position,
            width,
            height: options.node_height,
            color: color_of(branches[index].as_ref()),
        });
    }

    let branch_of: std::collections::HashMap<&str, &Option<String>> = placement
        .nodes
        .iter()
        .enumerate()
        .map(|(index, placed)| (placed.id.as_str(), &branches[index]))
        .collect();
    let links: Vec<SceneLink> = placement
        .links
        .iter()
        .map(|link| SceneLink {
            source: link.source.clone(),
            target: link.target.clone(),
            source_point: link.source_point,
            target_point: link.target_point,
            color: color_of(
                branch_of
                    .get(link.target.as_str())
                    .and_then(|b| b.as_ref()),
            ),
        })
        .collect();

    let bounds = scene_bounds(&nodes, &links);
    tracing::debug!(
        nodes = nodes.len(),
        depth_spacing = layout_options.depth_spacing,
        "built scene"
    );

    Ok(MapScene {
        placement,
        nodes,
        links,
        bounds,
    })
}

fn widest_label(node: &Node, measurer: &dyn TextMeasurer) -> f64 {
    let mut widest = measurer.measure(&node.name);
    for child in &node.children {
        widest = widest.max(widest_label(child, measurer));
    }
    widest
}

fn project(
    node: &Node,
    branch: Option<&str>,
    arena: &mut Tree,
    labels: &mut Vec<String>,
    branches: &mut Vec<Option<String>>,
) -> usize {
    let index = arena.nodes.len();
    arena.nodes.push(TreeNode {
        id: node.id.clone(),
        children: Vec::new(),
        offset: Point {
            x: node.offset.dx,
            y: node.offset.dy,
        },
    });
    labels.push(node.name.clone());
    branches.push(branch.map(str::to_string));

    if !node.collapsed {
        for child in &node.children {
            // Depth-1 nodes are their own branch ancestors.
            let child_branch = branch.unwrap_or(child.id.as_str());
            let child_index = project(child, Some(child_branch), arena, labels, branches);
            arena.nodes[index].children.push(child_index);
        }
    }
    index
}

fn scene_bounds(nodes: &[SceneNode], links: &[SceneLink]) -> Option<Bounds> {
    let mut points: Vec<(f64, f64)> = Vec::new();
    for n in nodes {
        points.push((n.position.x - n.width / 2.0, n.position.y - n.height / 2.0));
        points.push((n.position.x + n.width / 2.0, n.position.y + n.height / 2.0));
    }
    for l in links {
        points.push((l.source_point.x, l.source_point.y));
        points.push((l.target_point.x, l.target_point.y));
    }
    Bounds::from_points(points)
}

/// Transform that centers `bounds` in a viewport at 85% coverage.
pub fn fit_transform(bounds: &Bounds, viewport_width: f64, viewport_height: f64) -> Option<FitTransform> {
    if bounds.width() <= 0.0 || bounds.height() <= 0.0 {
        return None;
    }
    if viewport_width <= 0.0 || viewport_height <= 0.0 {
        return None;
    }
    let scale = 0.85
        / (bounds.width() / viewport_width).max(bounds.height() / viewport_height);
    let center_x = bounds.min_x + bounds.width() / 2.0;
    let center_y = bounds.min_y + bounds.height() / 2.0;
    Some(FitTransform {
        scale,
        translate_x: viewport_width / 2.0 - scale * center_x,
        translate_y: viewport_height / 2.0 - scale * center_y,
    })
}
