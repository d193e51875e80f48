//! Widget state definitions.

use kurbo::Point;

/// Where a drag grabbed its node.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DragGrab {
    /// Pointer position (content-local) when the drag began.
    pub pointer: Point,
    /// Whether the pointer has moved since the drag began.
    pub moved: bool,
}

/// The UI state of a node.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum WidgetState {
    /// No interaction.
    #[default]
    Normal,
    /// Being dragged by the pointer.
    Dragging(DragGrab),
    /// Inline label editor is open over this node.
    Editing,
}

impl WidgetState {
    /// Check if the node is being dragged.
    pub fn is_dragging(&self) -> bool {
        matches!(self, Self::Dragging(_))
    }

    /// Check if the node's label is being edited.
    pub fn is_editing(&self) -> bool {
        matches!(self, Self::Editing)
    }
}
