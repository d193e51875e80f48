//! Per-node interaction state kept apart from graph data.
//!
//! Nodes stay plain data. The widget manager remembers which node is being
//! dragged or edited and what that means for how the renderer should draw it.

mod manager;
mod state;

pub use manager::{WidgetManager, DRAG_OPACITY};
pub use state::{DragGrab, WidgetState};
