use serde::{Deserialize, Serialize};

/// Label used when an imported node carries no text of its own.
pub const DEFAULT_NAME: &str = "Untitled";

/// Accumulated manual drag correction, stored in the tree's native frame.
///
/// Drag deltas are captured in screen space, where horizontal motion moves a
/// node along the depth axis and vertical motion along the breadth axis. The
/// axes therefore swap when the gesture is folded in: `dx` is the breadth
/// (visual Y) correction, `dy` the depth (visual X) correction.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Offset {
    #[serde(default)]
    pub dx: f64,
    #[serde(default)]
    pub dy: f64,
}

impl Offset {
    pub fn is_zero(&self) -> bool {
        self.dx == 0.0 && self.dy == 0.0
    }
}

fn is_false(v: &bool) -> bool {
    !*v
}

fn fresh_id() -> String {
    // UUID v4 gives 122 bits of randomness; collisions are not checked because
    // the probability is negligible at mind-map scale.
    uuid::Uuid::new_v4().simple().to_string()
}

fn default_name() -> String {
    DEFAULT_NAME.to_string()
}

/// One node of the persisted hierarchy. This is also the JSON export shape:
/// view-state fields are skipped at their defaults so untouched documents stay
/// minimal.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Node {
    #[serde(default = "default_name")]
    pub name: String,
    #[serde(default = "fresh_id")]
    pub id: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<Node>,
    #[serde(default, skip_serializing_if = "is_false")]
    pub collapsed: bool,
    #[serde(default, skip_serializing_if = "Offset::is_zero")]
    pub offset: Offset,
}

impl Node {
    /// Creates a leaf with a freshly generated id.
    pub fn new(name: impl Into<String>) -> Self {
        Self::with_id(name, fresh_id())
    }

    /// Creates a leaf with a caller-chosen id (demo data, tests).
    pub fn with_id(name: impl Into<String>, id: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            id: id.into(),
            children: Vec::new(),
            collapsed: false,
            offset: Offset::default(),
        }
    }

    /// Structural fact, independent of the collapse view state.
    pub fn has_children(&self) -> bool {
        !self.children.is_empty()
    }

    fn find(&self, id: &str) -> Option<&Node> {
        if self.id == id {
            return Some(self);
        }
        self.children.iter().find_map(|c| c.find(id))
    }

    fn find_mut(&mut self, id: &str) -> Option<&mut Node> {
        if self.id == id {
            return Some(self);
        }
        self.children.iter_mut().find_map(|c| c.find_mut(id))
    }

    fn count(&self) -> usize {
        1 + self.children.iter().map(Node::count).sum::<usize>()
    }

    fn shift_subtree(&mut self, dx: f64, dy: f64) {
        self.offset.dx += dx;
        self.offset.dy += dy;
        for child in &mut self.children {
            child.shift_subtree(dx, dy);
        }
    }
}

/// The persistent hierarchy. The root is distinguished: depth 0, never
/// deleted, never assigned a side. It can still collapse its own children
/// and be dragged like any other node.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MapTree {
    root: Node,
}

impl MapTree {
    pub fn new(root: Node) -> Self {
        Self { root }
    }

    pub fn root(&self) -> &Node {
        &self.root
    }

    pub fn root_id(&self) -> &str {
        &self.root.id
    }

    pub fn get(&self, id: &str) -> Option<&Node> {
        self.root.find(id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.get(id).is_some()
    }

    /// Total node count, hidden subtrees included.
    pub fn node_count(&self) -> usize {
        self.root.count()
    }

    /// Id of `id`'s parent; `None` for the root or an unknown id.
    pub fn parent_id_of(&self, id: &str) -> Option<&str> {
        fn walk<'a>(node: &'a Node, id: &str) -> Option<&'a str> {
            if node.children.iter().any(|c| c.id == id) {
                return Some(&node.id);
            }
            node.children.iter().find_map(|c| walk(c, id))
        }
        walk(&self.root, id)
    }

    /// Appends a fresh child under `parent_id` and returns the new id.
    ///
    /// A collapsed parent is forced open so the new child is visible. Returns
    /// `None` (and changes nothing) when the parent cannot be resolved.
    pub fn add_child(&mut self, parent_id: &str, name: impl Into<String>) -> Option<String> {
        let parent = self.root.find_mut(parent_id)?;
        let child = Node::new(name);
        let id = child.id.clone();
        parent.collapsed = false;
        parent.children.push(child);
        Some(id)
    }

    /// Removes a non-root node (and its whole subtree) by identity.
    ///
    /// Returns `false` for the root or an unknown id; "nothing selected" is an
    /// expected state, not an error.
    pub fn delete(&mut self, id: &str) -> bool {
        if id == self.root.id {
            return false;
        }
        fn remove(node: &mut Node, id: &str) -> bool {
            if let Some(at) = node.children.iter().position(|c| c.id == id) {
                node.children.remove(at);
                return true;
            }
            node.children.iter_mut().any(|c| remove(c, id))
        }
        remove(&mut self.root, id)
    }

    /// Replaces a node's label with the trimmed `name`. An empty or
    /// whitespace-only value is silently discarded and the old name kept.
    pub fn rename(&mut self, id: &str, name: &str) -> bool {
        let trimmed = name.trim();
        if trimmed.is_empty() {
            return false;
        }
        let Some(node) = self.root.find_mut(id) else {
            return false;
        };
        node.name = trimmed.to_string();
        true
    }

    /// Flips a node's collapse flag. A node without children has nothing to
    /// hide, so the call is a no-op there.
    pub fn toggle_collapse(&mut self, id: &str) -> bool {
        let Some(node) = self.root.find_mut(id) else {
            return false;
        };
        if !node.has_children() {
            return false;
        }
        node.collapsed = !node.collapsed;
        true
    }

    /// Folds one drag increment into a subtree's offsets: the node itself and
    /// every descendant, including those currently hidden by collapse, so the
    /// whole branch keeps its shape when re-expanded.
    ///
    /// `d_visual_x`/`d_visual_y` are screen-space deltas; see [`Offset`] for
    /// the axis swap.
    pub fn apply_drag_offset(&mut self, id: &str, d_visual_x: f64, d_visual_y: f64) -> bool {
        let Some(node) = self.root.find_mut(id) else {
            return false;
        };
        node.shift_subtree(d_visual_y, d_visual_x);
        true
    }
}
