//! The interaction controller.
//!
//! A [`Session`] owns the application state the UI used to keep in an ambient
//! bag: the hierarchy, the position memory driving animation continuity, and
//! the current interaction mode. Every structural mutation schedules exactly
//! one layout+reconcile pass (no batching, no partial passes) and hands the
//! affected node to the reconciler as the animation source anchor.

use std::cell::Cell;
use std::rc::Rc;
use std::sync::Arc;

use mangrove_core::{
    MapTree, demo_tree, parse_map_json, parse_map_xml, to_json_string, to_json_string_pretty,
};
use mangrove_layout::{PositionMemory, ScenePatch, reconcile};
use mangrove_render::{
    DeterministicTextMeasurer, MapScene, SceneOptions, TextMeasurer, build_scene,
};

#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error(transparent)]
    Map(#[from] mangrove_core::Error),

    #[error(transparent)]
    Render(#[from] mangrove_render::Error),

    #[error("another load or export is still in flight")]
    Busy,
}

pub type Result<T> = std::result::Result<T, SessionError>;

/// What the session is currently doing. Pointer-style requests that do not fit
/// the mode are ignored rather than erroring; "nothing to do" is an expected
/// state here.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Mode {
    Idle,
    /// One node's label is being text-edited; the draft lives with the caller.
    Editing { id: String },
    /// One node's subtree is being repositioned.
    Dragging { id: String },
}

#[derive(Debug, Clone)]
pub struct SessionOptions {
    pub scene: SceneOptions,
    /// Transition time for animated passes, in milliseconds.
    pub duration: u32,
}

impl Default for SessionOptions {
    fn default() -> Self {
        Self {
            scene: SceneOptions::default(),
            duration: 400,
        }
    }
}

/// Clears the session's busy flag when dropped, so the indicator is released
/// on success and failure alike.
pub struct ExportGuard {
    flag: Rc<Cell<bool>>,
}

impl Drop for ExportGuard {
    fn drop(&mut self) {
        self.flag.set(false);
    }
}

pub struct Session {
    tree: MapTree,
    memory: PositionMemory,
    mode: Mode,
    measurer: Arc<dyn TextMeasurer + Send + Sync>,
    options: SessionOptions,
    busy: Rc<Cell<bool>>,
}

impl Default for Session {
    fn default() -> Self {
        Self::new(demo_tree())
    }
}

impl Session {
    pub fn new(tree: MapTree) -> Self {
        Self {
            tree,
            memory: PositionMemory::default(),
            mode: Mode::Idle,
            measurer: Arc::new(DeterministicTextMeasurer::default()),
            options: SessionOptions::default(),
            busy: Rc::new(Cell::new(false)),
        }
    }

    pub fn with_options(tree: MapTree, options: SessionOptions) -> Self {
        Self {
            options,
            ..Self::new(tree)
        }
    }

    pub fn tree(&self) -> &MapTree {
        &self.tree
    }

    pub fn mode(&self) -> &Mode {
        &self.mode
    }

    pub fn position_memory(&self) -> &PositionMemory {
        &self.memory
    }

    /// The current fully laid-out frame, for renderers that redraw from
    /// scratch rather than applying patches.
    pub fn scene(&self) -> Result<MapScene> {
        Ok(build_scene(&self.tree, self.measurer.as_ref(), &self.options.scene)?)
    }

    fn pass(&mut self, source: Option<String>, duration: u32) -> Result<ScenePatch> {
        let scene = build_scene(&self.tree, self.measurer.as_ref(), &self.options.scene)?;
        tracing::debug!(
            nodes = scene.nodes.len(),
            source = source.as_deref(),
            duration,
            "layout pass"
        );
        Ok(reconcile(
            &mut self.memory,
            &scene.placement,
            source.as_deref(),
            duration,
        ))
    }

    // --- loads -----------------------------------------------------------

    /// Replaces the document with a parsed FreeMind `.mm` file.
    ///
    /// A parse failure leaves the previous tree active and rendered; nothing
    /// is mutated until the new document is fully built.
    pub fn load_xml(&mut self, text: &str) -> Result<ScenePatch> {
        self.ensure_not_busy()?;
        let tree = parse_map_xml(text)?;
        self.install(tree)
    }

    /// Replaces the document with a parsed JSON export.
    pub fn load_json(&mut self, text: &str) -> Result<ScenePatch> {
        self.ensure_not_busy()?;
        let tree = parse_map_json(text)?;
        self.install(tree)
    }

    pub fn load_demo(&mut self) -> Result<ScenePatch> {
        self.ensure_not_busy()?;
        self.install(demo_tree())
    }

    fn install(&mut self, tree: MapTree) -> Result<ScenePatch> {
        self.tree = tree;
        self.mode = Mode::Idle;
        let duration = self.options.duration;
        self.pass(None, duration)
    }

    // --- structural edits -------------------------------------------------

    /// Appends a fresh child and runs one pass anchored at the parent.
    /// `Ok(None)` means the parent could not be resolved and nothing changed.
    pub fn add_child(&mut self, parent_id: &str, name: &str) -> Result<Option<ScenePatch>> {
        self.mode = Mode::Idle;
        if self.tree.add_child(parent_id, name).is_none() {
            return Ok(None);
        }
        let duration = self.options.duration;
        self.pass(Some(parent_id.to_string()), duration).map(Some)
    }

    /// Deletes a non-root node; exiting elements collapse toward the parent.
    pub fn delete(&mut self, id: &str) -> Result<Option<ScenePatch>> {
        self.mode = Mode::Idle;
        let parent = self.tree.parent_id_of(id).map(str::to_string);
        if !self.tree.delete(id) {
            return Ok(None);
        }
        let duration = self.options.duration;
        self.pass(parent, duration).map(Some)
    }

    /// Renames a node directly (the context-menu path, no editing mode).
    pub fn rename(&mut self, id: &str, name: &str) -> Result<Option<ScenePatch>> {
        self.mode = Mode::Idle;
        if !self.tree.rename(id, name) {
            return Ok(None);
        }
        let duration = self.options.duration;
        self.pass(Some(id.to_string()), duration).map(Some)
    }

    /// Click handler: flips a node's collapse state.
    ///
    /// Ignored while editing, since pointer interactions must not interrupt an
    /// open editor. A no-op on childless nodes.
    pub fn toggle_collapse(&mut self, id: &str) -> Result<Option<ScenePatch>> {
        if matches!(self.mode, Mode::Editing { .. }) {
            return Ok(None);
        }
        self.mode = Mode::Idle;
        if !self.tree.toggle_collapse(id) {
            return Ok(None);
        }
        let duration = self.options.duration;
        self.pass(Some(id.to_string()), duration).map(Some)
    }

    // --- label editing ----------------------------------------------------

    /// Starts editing a node's label and returns the seed text. Replaces any
    /// edit already in progress; ignored while dragging.
    pub fn begin_edit(&mut self, id: &str) -> Option<String> {
        if matches!(self.mode, Mode::Dragging { .. }) {
            return None;
        }
        let name = self.tree.get(id)?.name.clone();
        self.mode = Mode::Editing { id: id.to_string() };
        Some(name)
    }

    /// Confirms the edit (enter key or focus loss). An empty trimmed value is
    /// discarded and the previous name kept.
    pub fn commit_edit(&mut self, text: &str) -> Result<Option<ScenePatch>> {
        let Mode::Editing { id } = std::mem::replace(&mut self.mode, Mode::Idle) else {
            return Ok(None);
        };
        if !self.tree.rename(&id, text) {
            return Ok(None);
        }
        let duration = self.options.duration;
        self.pass(Some(id), duration).map(Some)
    }

    pub fn cancel_edit(&mut self) {
        if matches!(self.mode, Mode::Editing { .. }) {
            self.mode = Mode::Idle;
        }
    }

    // --- dragging ---------------------------------------------------------

    /// Starts repositioning a subtree (hidden descendants move with it).
    /// Ignored while editing or when the node is unknown.
    pub fn begin_drag(&mut self, id: &str) -> bool {
        if !matches!(self.mode, Mode::Idle) || !self.tree.contains(id) {
            return false;
        }
        self.mode = Mode::Dragging { id: id.to_string() };
        true
    }

    /// Folds one pointer increment into the dragged subtree and applies a
    /// zero-duration pass, so a drag interrupted at any point leaves a
    /// consistent, partially-moved state.
    pub fn drag_by(&mut self, d_visual_x: f64, d_visual_y: f64) -> Result<Option<ScenePatch>> {
        let Mode::Dragging { id } = &self.mode else {
            return Ok(None);
        };
        let id = id.clone();
        if !self.tree.apply_drag_offset(&id, d_visual_x, d_visual_y) {
            return Ok(None);
        }
        self.pass(Some(id), 0).map(Some)
    }

    pub fn end_drag(&mut self) -> bool {
        if matches!(self.mode, Mode::Dragging { .. }) {
            self.mode = Mode::Idle;
            return true;
        }
        false
    }

    // --- export -----------------------------------------------------------

    /// Serializes the full hierarchy (hidden subtrees included).
    pub fn export_json(&self, pretty: bool) -> Result<String> {
        let json = if pretty {
            to_json_string_pretty(&self.tree)?
        } else {
            to_json_string(&self.tree)?
        };
        Ok(json)
    }

    /// Marks a long-running export (raster, document) as in flight. A second
    /// export or a load started before the guard drops is rejected.
    pub fn begin_export(&self) -> Result<ExportGuard> {
        self.ensure_not_busy()?;
        self.busy.set(true);
        tracing::debug!("export in flight");
        Ok(ExportGuard {
            flag: Rc::clone(&self.busy),
        })
    }

    pub fn is_busy(&self) -> bool {
        self.busy.get()
    }

    fn ensure_not_busy(&self) -> Result<()> {
        if self.busy.get() {
            return Err(SessionError::Busy);
        }
        Ok(())
    }
}
