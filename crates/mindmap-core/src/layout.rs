//! Automatic top-down tree layout.
//!
//! The directed graph is treated as a tree hanging from a single root. Two
//! depth-first passes run over it:
//!
//! 1. **Subtree widths (bottom-up):** every node reserves horizontal space
//!    for itself and its descendants.
//! 2. **Positions (top-down):** children are laid out left to right inside
//!    their parent's reserved width, one fixed step lower per depth level.
//!
//! Graphs are not guaranteed to be acyclic. Both passes share the same
//! visited-set rule: a child is entered only if no earlier path has reached
//! it, so every node is counted and placed at most once and the passes agree
//! on the spanning tree they walk. Nodes the walk never reaches keep their
//! current positions.

use crate::events::EditorEvent;
use crate::graph::{GraphStore, NodeId};
use kurbo::{Point, Size};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use thiserror::Error;

/// Width reserved for a leaf.
pub const BASE_WIDTH: f64 = 150.0;
/// Horizontal gap between sibling subtrees.
pub const PADDING: f64 = 30.0;
/// Vertical distance between depth levels.
pub const VERTICAL_SPACING: f64 = 150.0;
/// Distance of the root from the top of the viewport.
pub const TOP_MARGIN: f64 = 50.0;

/// Tunable layout constants.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
    pub base_width: f64,
    pub padding: f64,
    pub vertical_spacing: f64,
    pub top_margin: f64,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            base_width: BASE_WIDTH,
            padding: PADDING,
            vertical_spacing: VERTICAL_SPACING,
            top_margin: TOP_MARGIN,
        }
    }
}

impl LayoutConfig {
    /// Where the root goes for a viewport of the given size: centered horizontally.
    pub fn origin(&self, viewport: Size) -> Point {
        Point::new(viewport.width / 2.0, self.top_margin)
    }
}

/// Why the root could not be determined unambiguously.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum RootAmbiguity {
    /// Every node has an incoming edge (the graph contains a cycle).
    #[error("no node without incoming edges")]
    NoRoot,
    /// Several nodes have no incoming edge (forest or disconnected nodes).
    #[error("{0} nodes without incoming edges")]
    MultipleRoots(usize),
}

/// The node a layout hangs from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RootChoice {
    pub root: NodeId,
    /// Set when the root is the first-created-node fallback.
    pub ambiguity: Option<RootAmbiguity>,
}

/// Result of a full layout run.
#[derive(Debug, Clone, PartialEq)]
pub struct LayoutOutcome {
    pub root: NodeId,
    /// New positions, in placement order.
    pub positions: Vec<(NodeId, Point)>,
    pub ambiguity: Option<RootAmbiguity>,
}

struct WidthFrame {
    id: NodeId,
    next_child: usize,
    children_width: f64,
    children: usize,
}

impl WidthFrame {
    fn new(id: NodeId) -> Self {
        Self {
            id,
            next_child: 0,
            children_width: 0.0,
            children: 0,
        }
    }
}

struct PlaceFrame {
    id: NodeId,
    next_child: usize,
    /// Left edge of the next child's slot.
    cursor: f64,
    y: f64,
}

/// Two-pass tree layout over a [`GraphStore`].
#[derive(Debug, Clone, Default)]
pub struct LayoutEngine {
    config: LayoutConfig,
}

impl LayoutEngine {
    pub fn new(config: LayoutConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &LayoutConfig {
        &self.config
    }

    /// Pick the layout root.
    ///
    /// The unique node with no incoming edges wins; otherwise the first node
    /// in creation order is used and the ambiguity is reported. `None` only
    /// for an empty graph.
    pub fn find_root(&self, store: &GraphStore) -> Option<RootChoice> {
        let first = *store.ids().first()?;
        let targets: HashSet<NodeId> = store.edges().map(|(_, to)| to).collect();
        let roots: Vec<NodeId> = store
            .ids()
            .iter()
            .copied()
            .filter(|id| !targets.contains(id))
            .collect();

        match roots.as_slice() {
            [root] => Some(RootChoice {
                root: *root,
                ambiguity: None,
            }),
            [] => Some(RootChoice {
                root: first,
                ambiguity: Some(RootAmbiguity::NoRoot),
            }),
            many => Some(RootChoice {
                root: first,
                ambiguity: Some(RootAmbiguity::MultipleRoots(many.len())),
            }),
        }
    }

    /// Pass 1: store each reachable node's subtree width and return the root's.
    pub fn compute_subtree_widths(&self, store: &mut GraphStore, root: NodeId) -> f64 {
        let LayoutConfig {
            base_width, padding, ..
        } = self.config;

        let mut visited = HashSet::from([root]);
        let mut stack = vec![WidthFrame::new(root)];
        let mut root_width = base_width;

        while let Some(frame) = stack.last_mut() {
            let child = store
                .get(frame.id)
                .and_then(|node| node.connections().get(frame.next_child).copied());
            if let Some(child) = child {
                frame.next_child += 1;
                if visited.insert(child) {
                    stack.push(WidthFrame::new(child));
                }
                continue;
            }

            let width = if frame.children == 0 {
                base_width
            } else {
                (frame.children_width + (frame.children - 1) as f64 * padding).max(base_width)
            };
            let id = frame.id;
            stack.pop();

            if let Some(node) = store.get_mut(id) {
                node.subtree_width = width;
            }
            match stack.last_mut() {
                Some(parent) => {
                    parent.children_width += width;
                    parent.children += 1;
                }
                None => root_width = width,
            }
        }

        root_width
    }

    /// Pass 2: place `root` at `origin` and its descendants below it.
    ///
    /// Expects pass 1 to have run from the same root. Each child is centered
    /// in a slot of its own subtree width; slots are packed edge to edge
    /// starting at `origin.x - total_width / 2`.
    pub fn assign_positions(
        &self,
        store: &mut GraphStore,
        root: NodeId,
        origin: Point,
        total_width: f64,
    ) -> Vec<(NodeId, Point)> {
        let mut positions = Vec::with_capacity(store.len());
        let Some(node) = store.get_mut(root) else {
            return positions;
        };
        node.position = origin;
        positions.push((root, origin));

        let mut visited = HashSet::from([root]);
        let mut stack = vec![PlaceFrame {
            id: root,
            next_child: 0,
            cursor: origin.x - total_width / 2.0,
            y: origin.y,
        }];

        while let Some(frame) = stack.last_mut() {
            let Some(child) = store
                .get(frame.id)
                .and_then(|node| node.connections().get(frame.next_child).copied())
            else {
                stack.pop();
                continue;
            };
            frame.next_child += 1;
            if !visited.insert(child) {
                continue;
            }

            let Some(node) = store.get_mut(child) else {
                continue;
            };
            let width = node.subtree_width;
            let center = Point::new(frame.cursor + width / 2.0, frame.y + self.config.vertical_spacing);
            frame.cursor += width;
            node.position = center;
            positions.push((child, center));

            stack.push(PlaceFrame {
                id: child,
                next_child: 0,
                cursor: center.x - width / 2.0,
                y: center.y,
            });
        }

        positions
    }

    /// Find a root, run both passes and report the new positions.
    ///
    /// Does nothing on an empty graph.
    pub fn run(&self, store: &mut GraphStore, origin: Point) -> Option<LayoutOutcome> {
        let RootChoice { root, ambiguity } = self.find_root(store)?;
        if let Some(ambiguity) = ambiguity {
            log::warn!("Layout root is ambiguous ({ambiguity}); using first node {root}");
        }

        let total_width = self.compute_subtree_widths(store, root);
        let positions = self.assign_positions(store, root, origin, total_width);
        log::info!(
            "Laid out {} of {} nodes (width {total_width})",
            positions.len(),
            store.len()
        );

        store.emit(EditorEvent::LayoutComputed {
            positions: positions.clone(),
        });
        Some(LayoutOutcome {
            root,
            positions,
            ambiguity,
        })
    }
}
