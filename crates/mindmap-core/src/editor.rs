//! Editor session: the graph, the gesture controller and the layout engine.

use crate::codec::{self, CodecError};
use crate::events::EditorEvent;
use crate::graph::{GraphStore, ROOT_LABEL};
use crate::input::{InputEvent, Instant};
use crate::interaction::{GestureConfig, InteractionController};
use crate::layout::{LayoutConfig, LayoutEngine, LayoutOutcome};
use crate::storage::{Storage, StorageError};
use kurbo::{Point, Size};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors from loading or saving a session.
#[derive(Debug, Error)]
pub enum EditorError {
    #[error(transparent)]
    Codec(#[from] CodecError),
    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// Session configuration. Missing fields take their defaults when read from JSON.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EditorConfig {
    /// Size of the visible area, in content units.
    pub viewport: Size,
    pub layout: LayoutConfig,
    pub gestures: GestureConfig,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            viewport: Size::new(800.0, 600.0),
            layout: LayoutConfig::default(),
            gestures: GestureConfig::default(),
        }
    }
}

/// Runtime state of one editing session (not persisted).
#[derive(Debug, Clone)]
pub struct Editor {
    config: EditorConfig,
    store: GraphStore,
    controller: InteractionController,
    layout: LayoutEngine,
}

impl Default for Editor {
    fn default() -> Self {
        Self::new(EditorConfig::default())
    }
}

impl Editor {
    /// Start a session with a single root node in the middle of the viewport.
    pub fn new(config: EditorConfig) -> Self {
        let mut store = GraphStore::new();
        let center = Point::new(config.viewport.width / 2.0, config.viewport.height / 2.0);
        store.add_node(center, ROOT_LABEL);

        Self {
            config,
            store,
            controller: InteractionController::new(config.gestures),
            layout: LayoutEngine::new(config.layout),
        }
    }

    pub fn config(&self) -> &EditorConfig {
        &self.config
    }

    pub fn store(&self) -> &GraphStore {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut GraphStore {
        &mut self.store
    }

    pub fn controller(&self) -> &InteractionController {
        &self.controller
    }

    /// Feed one input event through the gesture controller.
    pub fn handle(&mut self, event: InputEvent) {
        self.controller.handle(&mut self.store, event);
    }

    /// Let a pending single-click fire if its time has come.
    pub fn poll(&mut self, now: Instant) -> bool {
        self.controller.poll(&mut self.store, now)
    }

    /// Lay the graph out as a tree and ask the view to drop any panning.
    pub fn auto_layout(&mut self) -> Option<LayoutOutcome> {
        let origin = self.config.layout.origin(self.config.viewport);
        let outcome = self.layout.run(&mut self.store, origin);
        self.store.emit(EditorEvent::ViewReset);
        outcome
    }

    pub fn export_json(&self) -> Result<String, serde_json::Error> {
        codec::export(&self.store)
    }

    /// Replace the graph with a document. On error nothing changes.
    pub fn import_json(&mut self, json: &str) -> Result<usize, CodecError> {
        let count = codec::import(&mut self.store, json)?;
        self.controller.reset();
        Ok(count)
    }

    pub fn save(&self, storage: &dyn Storage, key: &str) -> Result<(), EditorError> {
        let json = self
            .export_json()
            .map_err(|e| StorageError::Serialization(e.to_string()))?;
        storage.save(key, &json)?;
        log::info!("Saved {} nodes as {key:?}", self.store.len());
        Ok(())
    }

    pub fn load(&mut self, storage: &dyn Storage, key: &str) -> Result<usize, EditorError> {
        let json = storage.load(key)?;
        Ok(self.import_json(&json)?)
    }

    /// Take every notification queued since the last call.
    pub fn drain_events(&mut self) -> Vec<EditorEvent> {
        self.store.drain_events()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::{MouseButton, PointerPosition, Target};
    use crate::storage::MemoryStorage;
    use std::time::Duration;

    fn press(editor: &mut Editor, target: Target, point: Point, time: Instant) {
        editor.handle(InputEvent::PointerDown {
            target,
            position: PointerPosition::untransformed(point),
            button: MouseButton::Left,
            time,
        });
    }

    #[test]
    fn test_new_session_has_centered_root() {
        let editor = Editor::new(EditorConfig {
            viewport: Size::new(1000.0, 500.0),
            ..EditorConfig::default()
        });

        let nodes = editor.store().list_nodes();
        assert_eq!(nodes.len(), 1);
        assert_eq!(nodes[0].label, ROOT_LABEL);
        assert_eq!(nodes[0].position, Point::new(500.0, 250.0));
    }

    #[test]
    fn test_config_defaults_fill_missing_fields() {
        let config: EditorConfig =
            serde_json::from_str(r#"{"layout":{"padding":10.0},"gestures":{}}"#).unwrap();

        assert_eq!(config.viewport, Size::new(800.0, 600.0));
        assert_eq!(config.layout.padding, 10.0);
        assert_eq!(config.layout.base_width, 150.0);
        assert_eq!(config.gestures, GestureConfig::default());
    }

    #[test]
    fn test_auto_layout_places_root_at_origin() {
        let mut editor = Editor::default();
        let root = editor.store().ids()[0];
        let child = editor.store_mut().add_node(Point::new(0.0, 0.0), "child");
        editor.store_mut().add_edge(root, child);
        editor.drain_events();

        let outcome = editor.auto_layout().unwrap();

        assert_eq!(outcome.root, root);
        assert_eq!(editor.store().position(root), Some(Point::new(400.0, 50.0)));
        assert_eq!(editor.store().position(child), Some(Point::new(400.0, 200.0)));
        assert_eq!(editor.drain_events().last(), Some(&EditorEvent::ViewReset));
    }

    #[test]
    fn test_double_click_through_editor() {
        let mut editor = Editor::default();
        let root = editor.store().ids()[0];
        editor.store_mut().select(root);
        let t0 = Instant::now();

        press(&mut editor, Target::Background, Point::new(100.0, 100.0), t0);
        press(
            &mut editor,
            Target::Background,
            Point::new(100.0, 100.0),
            t0 + Duration::from_millis(100),
        );
        assert!(!editor.poll(t0 + Duration::from_secs(1)));

        assert_eq!(editor.store().len(), 2);
        assert_eq!(editor.store().list_edges().len(), 1);
    }

    #[test]
    fn test_save_and_load_round_trip() {
        let storage = MemoryStorage::new();
        let mut editor = Editor::default();
        let root = editor.store().ids()[0];
        let child = editor.store_mut().add_node(Point::new(10.0, 20.0), "child");
        editor.store_mut().add_edge(root, child);
        editor.save(&storage, "map").unwrap();
        let saved = editor.export_json().unwrap();

        let mut other = Editor::default();
        assert_eq!(other.load(&storage, "map").unwrap(), 2);
        assert_eq!(other.export_json().unwrap(), saved);
    }

    #[test]
    fn test_load_missing_key_keeps_graph() {
        let storage = MemoryStorage::new();
        let mut editor = Editor::default();
        let before = editor.export_json().unwrap();

        let err = editor.load(&storage, "missing").unwrap_err();
        assert!(matches!(err, EditorError::Storage(StorageError::NotFound(_))));
        assert_eq!(editor.export_json().unwrap(), before);
    }

    #[test]
    fn test_import_resets_pending_click() {
        let mut editor = Editor::default();
        press(&mut editor, Target::Background, Point::new(5.0, 5.0), Instant::now());
        assert!(editor.controller().pending_click().is_some());

        editor
            .import_json(r#"{"nodes":[],"connections":[]}"#)
            .unwrap();

        assert!(editor.controller().pending_click().is_none());
        assert!(editor.store().is_empty());
    }

    #[test]
    fn test_failed_import_keeps_pending_click() {
        let mut editor = Editor::default();
        press(&mut editor, Target::Background, Point::new(5.0, 5.0), Instant::now());

        assert!(editor.import_json("{").is_err());
        assert!(editor.controller().pending_click().is_some());
        assert_eq!(editor.store().len(), 1);
    }
}
