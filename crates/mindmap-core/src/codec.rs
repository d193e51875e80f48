//! JSON document format for saving and loading a mind map.
//!
//! ```json
//! {
//!   "nodes": [ { "x": 100.0, "y": 50.0, "text": "Root" } ],
//!   "connections": [ [0, 1] ]
//! }
//! ```
//!
//! Nodes are written in creation order and connections refer to them by index,
//! so ids never reach the file.

use crate::graph::{GraphStore, NodeId};
use kurbo::Point;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use thiserror::Error;

/// Errors raised while reading a document.
#[derive(Debug, Error)]
pub enum CodecError {
    #[error("Invalid document: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Connection {index} refers to node {node}, but there are only {len} nodes")]
    DanglingIndex { index: usize, node: usize, len: usize },
}

/// One node as stored on disk.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeRecord {
    pub x: f64,
    pub y: f64,
    pub text: String,
}

/// The serialized form of a whole graph.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct MindMapFile {
    pub nodes: Vec<NodeRecord>,
    /// `[from, to]` pairs of indices into `nodes`.
    pub connections: Vec<[usize; 2]>,
}

impl MindMapFile {
    /// Snapshot a graph.
    pub fn from_store(store: &GraphStore) -> Self {
        let index: HashMap<NodeId, usize> = store
            .ids()
            .iter()
            .enumerate()
            .map(|(i, id)| (*id, i))
            .collect();

        let nodes = store
            .nodes()
            .map(|node| NodeRecord {
                x: node.position.x,
                y: node.position.y,
                text: node.label.clone(),
            })
            .collect();

        let connections = store
            .edges()
            .filter_map(|(from, to)| Some([*index.get(&from)?, *index.get(&to)?]))
            .collect();

        Self { nodes, connections }
    }

    /// Check that every connection index is in range.
    pub fn validate(&self) -> Result<(), CodecError> {
        let len = self.nodes.len();
        for (index, pair) in self.connections.iter().enumerate() {
            if let Some(&node) = pair.iter().find(|&&i| i >= len) {
                return Err(CodecError::DanglingIndex { index, node, len });
            }
        }
        Ok(())
    }

    /// Build a fresh store holding this document, without any pending events.
    pub fn to_store(&self) -> Result<GraphStore, CodecError> {
        self.validate()?;

        let mut store = GraphStore::new();
        let ids: Vec<NodeId> = self
            .nodes
            .iter()
            .map(|n| store.add_node(Point::new(n.x, n.y), n.text.as_str()))
            .collect();
        for [from, to] in &self.connections {
            store.add_edge(ids[*from], ids[*to]);
        }
        store.drain_events();
        Ok(store)
    }

    /// Serialize to pretty JSON.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Parse and validate JSON.
    pub fn from_json(json: &str) -> Result<Self, CodecError> {
        let file: Self = serde_json::from_str(json)?;
        file.validate()?;
        Ok(file)
    }
}

/// Serialize the graph as pretty-printed JSON.
pub fn export(store: &GraphStore) -> Result<String, serde_json::Error> {
    MindMapFile::from_store(store).to_json()
}

/// Replace the graph with the document in `json`.
///
/// The document is fully parsed and validated first; on error `store` is left
/// exactly as it was. Returns the number of nodes loaded.
pub fn import(store: &mut GraphStore, json: &str) -> Result<usize, CodecError> {
    let fresh = MindMapFile::from_json(json)?.to_store()?;
    let count = fresh.len();
    store.replace(fresh);
    log::info!("Loaded mind map with {count} nodes");
    Ok(count)
}
