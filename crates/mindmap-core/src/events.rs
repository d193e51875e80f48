//! Notifications emitted by the editor core for the rendering collaborator.
//!
//! A renderer drains these after each input turn and redraws the affected
//! shapes, labels, connecting lines and the selection outline.

use crate::graph::NodeId;
use kurbo::{Point, Vec2};
use serde::{Deserialize, Serialize};

/// A change the renderer needs to reflect.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum EditorEvent {
    /// A node was created.
    NodeAdded { id: NodeId, x: f64, y: f64, text: String },
    /// A node was removed (its edges are reported separately).
    NodeRemoved { id: NodeId },
    /// A node moved to a new position.
    NodeMoved { id: NodeId, x: f64, y: f64 },
    /// A directed edge was appended.
    EdgeAdded { from: NodeId, to: NodeId },
    /// A directed edge was removed.
    EdgeRemoved { from: NodeId, to: NodeId },
    /// The selected node changed (`None` = nothing selected).
    SelectionChanged { id: Option<NodeId> },
    /// A node's label changed.
    LabelChanged { id: NodeId, text: String },
    /// An automatic layout placed these nodes.
    LayoutComputed { positions: Vec<(NodeId, Point)> },
    /// Node opacity changed (translucent while dragged).
    OpacityChanged { id: NodeId, opacity: f64 },
    /// The inline label editor should open over this node.
    LabelEditRequested { id: NodeId },
    /// The background was dragged; the view should pan by this screen delta.
    ViewPanned { delta: Vec2 },
    /// The view transform should return to identity.
    ViewReset,
}
