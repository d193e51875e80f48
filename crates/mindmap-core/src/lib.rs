//! Mind Map Core Library
//!
//! Platform-agnostic data model and editing logic for a mind-map editor:
//! the node graph, automatic tree layout, gesture classification and the
//! JSON document format. Rendering, view transforms and text-input widgets
//! live outside this crate and talk to it through [`InputEvent`] and
//! [`EditorEvent`].

pub mod codec;
pub mod editor;
pub mod events;
pub mod geometry;
pub mod graph;
pub mod input;
pub mod interaction;
pub mod layout;
pub mod storage;
pub mod widget;

pub use codec::{CodecError, MindMapFile, NodeRecord};
pub use editor::{Editor, EditorConfig, EditorError};
pub use events::EditorEvent;
pub use geometry::{point_to_segment_distance, within_distance, EDGE_HIT_THRESHOLD};
pub use graph::{Command, GraphStore, Node, NodeId, DEFAULT_LABEL, ROOT_LABEL};
pub use input::{InputEvent, Instant, MouseButton, PointerPosition, Target};
pub use interaction::{GestureConfig, GestureState, InteractionController, PendingClick};
pub use layout::{LayoutConfig, LayoutEngine, LayoutOutcome, RootAmbiguity};
pub use storage::{MemoryStorage, Storage, StorageError, StorageResult};
#[cfg(not(target_arch = "wasm32"))]
pub use storage::FileStorage;
pub use widget::{WidgetManager, WidgetState};
