//! Widget manager for tracking UI state of nodes.

use super::state::{DragGrab, WidgetState};
use crate::graph::NodeId;
use kurbo::Point;
use std::collections::HashMap;

/// Opacity of a node while it is dragged.
pub const DRAG_OPACITY: f64 = 0.5;

/// Tracks drag and edit state for nodes.
///
/// At most one node is dragged and at most one is edited at any time.
#[derive(Debug, Clone, Default)]
pub struct WidgetManager {
    states: HashMap<NodeId, WidgetState>,
    dragging: Option<NodeId>,
    editing: Option<NodeId>,
}

impl WidgetManager {
    /// Create a new widget manager.
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the state of a node.
    pub fn state(&self, id: NodeId) -> WidgetState {
        self.states.get(&id).copied().unwrap_or_default()
    }

    fn set_state(&mut self, id: NodeId, state: WidgetState) {
        if state == WidgetState::Normal {
            self.states.remove(&id);
        } else {
            self.states.insert(id, state);
        }
    }

    /// Start dragging a node, ending any drag already in progress.
    pub fn begin_drag(&mut self, id: NodeId, pointer: Point) {
        self.end_drag();
        self.set_state(id, WidgetState::Dragging(DragGrab { pointer, moved: false }));
        self.dragging = Some(id);
    }

    /// Record pointer motion for the dragged node and return its id.
    pub fn drag_moved(&mut self) -> Option<NodeId> {
        let id = self.dragging?;
        if let Some(WidgetState::Dragging(grab)) = self.states.get_mut(&id) {
            grab.moved = true;
        }
        Some(id)
    }

    /// Finish the current drag, returning the node and its grab record.
    pub fn end_drag(&mut self) -> Option<(NodeId, DragGrab)> {
        let id = self.dragging.take()?;
        let grab = match self.state(id) {
            WidgetState::Dragging(grab) => grab,
            _ => return None,
        };
        self.set_state(id, WidgetState::Normal);
        Some((id, grab))
    }

    /// The node being dragged, if any.
    pub fn dragging(&self) -> Option<NodeId> {
        self.dragging
    }

    /// Open the label editor on a node, closing any other.
    pub fn enter_editing(&mut self, id: NodeId) {
        if self.editing.is_some_and(|old| old != id) {
            self.exit_editing();
        }
        self.set_state(id, WidgetState::Editing);
        self.editing = Some(id);
    }

    /// Close the label editor, returning the node it was open on.
    pub fn exit_editing(&mut self) -> Option<NodeId> {
        let id = self.editing.take()?;
        self.set_state(id, WidgetState::Normal);
        Some(id)
    }

    /// The node whose label is being edited, if any.
    pub fn editing(&self) -> Option<NodeId> {
        self.editing
    }

    /// Render opacity for a node.
    pub fn opacity(&self, id: NodeId) -> f64 {
        if self.state(id).is_dragging() {
            DRAG_OPACITY
        } else {
            1.0
        }
    }

    /// Forget state for a deleted node.
    pub fn remove(&mut self, id: NodeId) {
        self.states.remove(&id);
        if self.dragging == Some(id) {
            self.dragging = None;
        }
        if self.editing == Some(id) {
            self.editing = None;
        }
    }

    /// Forget all state.
    pub fn clear(&mut self) {
        self.states.clear();
        self.dragging = None;
        self.editing = None;
    }
}
