//! Raw input events consumed by the interaction controller.
//!
//! The input collaborator resolves what the pointer is over (a node or the
//! background) and reports positions in both screen and content-local
//! coordinates; the core never applies view transforms itself.

use crate::graph::NodeId;
use kurbo::Point;

// Use web_time for WASM compatibility
#[cfg(target_arch = "wasm32")]
pub use web_time::Instant;
#[cfg(not(target_arch = "wasm32"))]
pub use std::time::Instant;

/// Mouse button identifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MouseButton {
    Left,
    Right,
    Middle,
}

/// What a pointer event landed on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Target {
    Background,
    Node(NodeId),
}

/// A pointer position in both coordinate spaces.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointerPosition {
    /// Screen coordinates, used for click distance and panning.
    pub global: Point,
    /// Content coordinates, used for placing and moving nodes.
    pub local: Point,
}

impl PointerPosition {
    pub fn new(global: Point, local: Point) -> Self {
        Self { global, local }
    }

    /// A position for an untransformed view, where both spaces coincide.
    pub fn untransformed(point: Point) -> Self {
        Self::new(point, point)
    }
}

/// Input event delivered by the input collaborator.
#[derive(Debug, Clone, PartialEq)]
pub enum InputEvent {
    PointerDown {
        target: Target,
        position: PointerPosition,
        button: MouseButton,
        time: Instant,
    },
    PointerMove {
        position: PointerPosition,
        time: Instant,
    },
    PointerUp {
        target: Target,
        position: PointerPosition,
        button: MouseButton,
        time: Instant,
    },
    /// The pointer left the canvas.
    PointerLeave { time: Instant },
    /// The inline editor committed (blur or Enter).
    TextEditCompleted { node: NodeId, text: String },
    /// The inline editor closed without committing.
    TextEditCancelled { node: NodeId },
}

impl InputEvent {
    /// When the event happened, for events that carry a time.
    pub fn time(&self) -> Option<Instant> {
        match self {
            InputEvent::PointerDown { time, .. }
            | InputEvent::PointerMove { time, .. }
            | InputEvent::PointerUp { time, .. }
            | InputEvent::PointerLeave { time } => Some(*time),
            InputEvent::TextEditCompleted { .. } | InputEvent::TextEditCancelled { .. } => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    #[test]
    fn test_untransformed_position() {
        let p = PointerPosition::untransformed(Point::new(3.0, 4.0));
        assert_eq!(p.global, p.local);
    }

    #[test]
    fn test_event_time() {
        let now = Instant::now();
        let event = InputEvent::PointerLeave { time: now };
        assert_eq!(event.time(), Some(now));

        let edit = InputEvent::TextEditCancelled { node: Uuid::new_v4() };
        assert_eq!(edit.time(), None);
    }
}
