//! Graph data model: nodes, directed connections and the store that owns them.

use crate::events::EditorEvent;
use crate::geometry::within_distance;
use kurbo::{Point, Rect};
use std::collections::HashMap;
use uuid::Uuid;

/// Unique identifier for nodes.
pub type NodeId = Uuid;

/// Width of a node's hit box.
pub const NODE_WIDTH: f64 = 80.0;
/// Height of a node's hit box.
pub const NODE_HEIGHT: f64 = 40.0;

/// Label given to nodes created by gestures.
pub const DEFAULT_LABEL: &str = "New Node";
/// Label of the node every new session starts with.
pub const ROOT_LABEL: &str = "Root";

/// A labeled point in the diagram with outgoing connections.
#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    id: NodeId,
    /// Center of the node in content coordinates.
    pub position: Point,
    /// Text shown inside the node.
    pub label: String,
    /// Outgoing connection targets, in insertion order. Duplicates allowed.
    connections: Vec<NodeId>,
    /// Layout scratch value; only meaningful during a layout pass.
    pub(crate) subtree_width: f64,
    selected: bool,
}

impl Node {
    fn new(position: Point, label: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            position,
            label: label.into(),
            connections: Vec::new(),
            subtree_width: 0.0,
            selected: false,
        }
    }

    pub fn id(&self) -> NodeId {
        self.id
    }

    /// Outgoing connection targets in insertion order.
    pub fn connections(&self) -> &[NodeId] {
        &self.connections
    }

    /// Subtree width assigned by the most recent layout pass.
    pub fn subtree_width(&self) -> f64 {
        self.subtree_width
    }

    pub fn is_selected(&self) -> bool {
        self.selected
    }

    /// The rectangle a pointer must land in to hit this node.
    pub fn hit_box(&self) -> Rect {
        Rect::from_center_size(self.position, (NODE_WIDTH, NODE_HEIGHT))
    }
}

/// A mutation requested by the interaction layer.
///
/// Gestures never touch nodes directly; they describe what should happen
/// and the store applies it, so stale references resolve to no-ops in one place.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    /// Add a node and, if `parent` still exists, connect `parent` to it.
    AddChild { parent: Option<NodeId>, position: Point, label: String },
    RemoveNode(NodeId),
    MoveNode { id: NodeId, position: Point },
    SetLabel { id: NodeId, text: String },
    Select(NodeId),
    ClearSelection,
    /// Replace the edge `from`→`to` with `from`→new→`to`, new node at `position`.
    SplitEdge { from: NodeId, to: NodeId, position: Point, label: String },
}

/// Owns every node and, implicitly through their connection lists, every edge.
///
/// Iteration order is creation order. Operations on ids that do not exist
/// are silent no-ops.
#[derive(Debug, Clone, Default)]
pub struct GraphStore {
    nodes: HashMap<NodeId, Node>,
    /// Creation order of node ids.
    order: Vec<NodeId>,
    selected: Option<NodeId>,
    /// Notifications not yet handed to the renderer.
    events: Vec<EditorEvent>,
}

impl GraphStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a node and return its id.
    pub fn add_node(&mut self, position: Point, label: impl Into<String>) -> NodeId {
        let node = Node::new(position, label);
        let id = node.id;
        self.events.push(EditorEvent::NodeAdded {
            id,
            x: position.x,
            y: position.y,
            text: node.label.clone(),
        });
        self.order.push(id);
        self.nodes.insert(id, node);
        id
    }

    /// Remove a node and strip every connection that targets it.
    pub fn remove_node(&mut self, id: NodeId) {
        let Some(node) = self.nodes.remove(&id) else {
            log::debug!("remove_node: {id} not found");
            return;
        };
        self.order.retain(|&other| other != id);

        for to in node.connections {
            self.events.push(EditorEvent::EdgeRemoved { from: id, to });
        }
        for other_id in &self.order {
            if let Some(other) = self.nodes.get_mut(other_id) {
                let before = other.connections.len();
                other.connections.retain(|&to| to != id);
                for _ in other.connections.len()..before {
                    self.events.push(EditorEvent::EdgeRemoved { from: *other_id, to: id });
                }
            }
        }

        if self.selected == Some(id) {
            self.selected = None;
            self.events.push(EditorEvent::SelectionChanged { id: None });
        }
        self.events.push(EditorEvent::NodeRemoved { id });
    }

    /// Append `to` to `from`'s connections. Both nodes must exist.
    pub fn add_edge(&mut self, from: NodeId, to: NodeId) {
        if !self.nodes.contains_key(&to) {
            log::debug!("add_edge: target {to} not found");
            return;
        }
        let Some(node) = self.nodes.get_mut(&from) else {
            log::debug!("add_edge: source {from} not found");
            return;
        };
        node.connections.push(to);
        self.events.push(EditorEvent::EdgeAdded { from, to });
    }

    /// Remove the first `from`→`to` connection, if any.
    pub fn remove_edge(&mut self, from: NodeId, to: NodeId) {
        let Some(node) = self.nodes.get_mut(&from) else {
            log::debug!("remove_edge: source {from} not found");
            return;
        };
        if let Some(index) = node.connections.iter().position(|&c| c == to) {
            node.connections.remove(index);
            self.events.push(EditorEvent::EdgeRemoved { from, to });
        }
    }

    /// Check whether at least one `from`→`to` connection exists.
    pub fn has_edge(&self, from: NodeId, to: NodeId) -> bool {
        self.nodes
            .get(&from)
            .is_some_and(|node| node.connections.contains(&to))
    }

    pub fn set_label(&mut self, id: NodeId, text: impl Into<String>) {
        let Some(node) = self.nodes.get_mut(&id) else {
            log::debug!("set_label: {id} not found");
            return;
        };
        node.label = text.into();
        self.events.push(EditorEvent::LabelChanged {
            id,
            text: node.label.clone(),
        });
    }

    pub fn set_position(&mut self, id: NodeId, position: Point) {
        let Some(node) = self.nodes.get_mut(&id) else {
            log::debug!("set_position: {id} not found");
            return;
        };
        node.position = position;
        self.events.push(EditorEvent::NodeMoved {
            id,
            x: position.x,
            y: position.y,
        });
    }

    /// Select a node, deselecting whichever node was selected before.
    pub fn select(&mut self, id: NodeId) {
        if !self.nodes.contains_key(&id) {
            log::debug!("select: {id} not found");
            return;
        }
        if self.selected == Some(id) {
            return;
        }
        self.set_selected_flag(false);
        self.selected = Some(id);
        self.set_selected_flag(true);
        self.events.push(EditorEvent::SelectionChanged { id: Some(id) });
    }

    /// Clear the selection.
    pub fn clear_selection(&mut self) {
        if self.selected.is_none() {
            return;
        }
        self.set_selected_flag(false);
        self.selected = None;
        self.events.push(EditorEvent::SelectionChanged { id: None });
    }

    fn set_selected_flag(&mut self, value: bool) {
        if let Some(node) = self.selected.and_then(|id| self.nodes.get_mut(&id)) {
            node.selected = value;
        }
    }

    /// The currently selected node, if any.
    pub fn selected(&self) -> Option<NodeId> {
        self.selected
    }

    pub fn get(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(&id)
    }

    pub(crate) fn get_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        self.nodes.get_mut(&id)
    }

    pub fn contains(&self, id: NodeId) -> bool {
        self.nodes.contains_key(&id)
    }

    /// Position of a node, if it exists.
    pub fn position(&self, id: NodeId) -> Option<Point> {
        self.nodes.get(&id).map(|node| node.position)
    }

    /// Node ids in creation order.
    pub fn ids(&self) -> &[NodeId] {
        &self.order
    }

    /// Nodes in creation order.
    pub fn nodes(&self) -> impl Iterator<Item = &Node> {
        self.order.iter().filter_map(|id| self.nodes.get(id))
    }

    /// All nodes in creation order.
    pub fn list_nodes(&self) -> Vec<&Node> {
        self.nodes().collect()
    }

    /// Edges as `(from, to)` pairs in node-then-connection order.
    pub fn edges(&self) -> impl Iterator<Item = (NodeId, NodeId)> + '_ {
        self.nodes()
            .flat_map(|node| node.connections.iter().map(move |&to| (node.id, to)))
    }

    /// All edges as a flat list.
    pub fn list_edges(&self) -> Vec<(NodeId, NodeId)> {
        self.edges().collect()
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Topmost (most recently created) node whose hit box contains `point`.
    pub fn node_at(&self, point: Point) -> Option<NodeId> {
        self.order
            .iter()
            .rev()
            .copied()
            .find(|id| self.nodes.get(id).is_some_and(|n| n.hit_box().contains(point)))
    }

    /// First edge, in iteration order, whose segment lies within `threshold` of `point`.
    pub fn edge_at(&self, point: Point, threshold: f64) -> Option<(NodeId, NodeId)> {
        self.edges().find(|&(from, to)| {
            match (self.position(from), self.position(to)) {
                (Some(a), Some(b)) => within_distance(point, a, b, threshold),
                _ => false,
            }
        })
    }

    /// Remove every node.
    pub fn clear(&mut self) {
        self.clear_selection();
        for id in std::mem::take(&mut self.order) {
            self.events.push(EditorEvent::NodeRemoved { id });
        }
        self.nodes.clear();
    }

    /// Replace the whole graph with `incoming`, in one step.
    ///
    /// Old nodes are reported removed, then the new ones added with their edges.
    pub(crate) fn replace(&mut self, incoming: GraphStore) {
        self.clear();
        self.nodes = incoming.nodes;
        self.order = incoming.order;
        self.selected = None;
        for id in &self.order {
            if let Some(node) = self.nodes.get_mut(id) {
                node.selected = false;
                self.events.push(EditorEvent::NodeAdded {
                    id: *id,
                    x: node.position.x,
                    y: node.position.y,
                    text: node.label.clone(),
                });
            }
        }
        let edges: Vec<_> = self.edges().collect();
        for (from, to) in edges {
            self.events.push(EditorEvent::EdgeAdded { from, to });
        }
    }

    /// Apply a command, returning the id of a node it created.
    pub fn apply(&mut self, command: Command) -> Option<NodeId> {
        log::debug!("apply {command:?}");
        match command {
            Command::AddChild { parent, position, label } => {
                let id = self.add_node(position, label);
                if let Some(parent) = parent {
                    self.add_edge(parent, id);
                }
                Some(id)
            }
            Command::RemoveNode(id) => {
                self.remove_node(id);
                None
            }
            Command::MoveNode { id, position } => {
                self.set_position(id, position);
                None
            }
            Command::SetLabel { id, text } => {
                self.set_label(id, text);
                None
            }
            Command::Select(id) => {
                self.select(id);
                None
            }
            Command::ClearSelection => {
                self.clear_selection();
                None
            }
            Command::SplitEdge { from, to, position, label } => {
                if !self.has_edge(from, to) {
                    log::debug!("split: edge {from} -> {to} no longer exists");
                    return None;
                }
                self.remove_edge(from, to);
                let id = self.add_node(position, label);
                self.add_edge(from, id);
                self.add_edge(id, to);
                Some(id)
            }
        }
    }

    /// Queue a notification that did not come from a graph mutation.
    pub(crate) fn emit(&mut self, event: EditorEvent) {
        self.events.push(event);
    }

    /// Take every queued notification.
    pub fn drain_events(&mut self) -> Vec<EditorEvent> {
        std::mem::take(&mut self.events)
    }
}
