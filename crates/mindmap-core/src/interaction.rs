//! Gesture classification: turns raw pointer input into graph commands.
//!
//! A primary press is a double-click if it follows the previous press closely
//! in both time and space. Any other background press is held back as a
//! pending single-click until the double-click window runs out, because the
//! press that might follow would change its meaning.
//!
//! | Gesture | Target | Effect |
//! |---|---|---|
//! | double-click | background | new node at the click, connected from the selection |
//! | double-click | node | open the inline label editor |
//! | single-click (deferred) | background | deselect, then split the first edge hit |
//! | press / move / release | node | drag the node; a release without motion selects it |
//! | secondary press | node | delete the node and its edges |
//! | press / move / release | background | pan the view |

use crate::events::EditorEvent;
use crate::geometry::{distance_squared, EDGE_HIT_THRESHOLD};
use crate::graph::{Command, GraphStore, NodeId, DEFAULT_LABEL};
use crate::input::{InputEvent, Instant, MouseButton, PointerPosition, Target};
use crate::widget::{WidgetManager, DRAG_OPACITY};
use kurbo::Point;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Maximum time between the presses of a double-click.
pub const DOUBLE_CLICK_WINDOW_MS: u64 = 300;
/// Maximum screen distance between the presses of a double-click.
pub const DOUBLE_CLICK_RADIUS: f64 = 10.0;

/// Tunable gesture thresholds.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GestureConfig {
    pub double_click_window_ms: u64,
    pub double_click_radius: f64,
    /// Content-local distance within which a click hits an edge.
    pub edge_hit_threshold: f64,
}

impl Default for GestureConfig {
    fn default() -> Self {
        Self {
            double_click_window_ms: DOUBLE_CLICK_WINDOW_MS,
            double_click_radius: DOUBLE_CLICK_RADIUS,
            edge_hit_threshold: EDGE_HIT_THRESHOLD,
        }
    }
}

impl GestureConfig {
    pub fn double_click_window(&self) -> Duration {
        Duration::from_millis(self.double_click_window_ms)
    }
}

/// A background click waiting to learn whether it is half of a double-click.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PendingClick {
    /// Click position in content coordinates.
    pub local: Point,
    pub pressed_at: Instant,
    /// When the click resolves as a single-click.
    pub deadline: Instant,
}

/// Click classification state.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum GestureState {
    #[default]
    Idle,
    PendingSingleClick(PendingClick),
}

#[derive(Debug, Clone, Copy)]
struct PressRecord {
    at: Instant,
    global: Point,
}

/// Consumes input events and issues commands against a [`GraphStore`].
#[derive(Debug, Clone, Default)]
pub struct InteractionController {
    config: GestureConfig,
    state: GestureState,
    /// The previous primary press, for double-click matching.
    last_press: Option<PressRecord>,
    /// Last screen position while the background is being dragged.
    panning: Option<Point>,
    widgets: WidgetManager,
}

impl InteractionController {
    pub fn new(config: GestureConfig) -> Self {
        Self {
            config,
            ..Self::default()
        }
    }

    pub fn config(&self) -> &GestureConfig {
        &self.config
    }

    pub fn state(&self) -> GestureState {
        self.state
    }

    /// The single-click waiting for its window to close, if any.
    pub fn pending_click(&self) -> Option<&PendingClick> {
        match &self.state {
            GestureState::PendingSingleClick(click) => Some(click),
            GestureState::Idle => None,
        }
    }

    pub fn widgets(&self) -> &WidgetManager {
        &self.widgets
    }

    /// Whether the background is currently being dragged.
    pub fn is_panning(&self) -> bool {
        self.panning.is_some()
    }

    /// Drop all gesture state, e.g. after the graph was replaced.
    pub fn reset(&mut self) {
        self.state = GestureState::Idle;
        self.last_press = None;
        self.panning = None;
        self.widgets.clear();
    }

    /// Process one input event.
    ///
    /// A pending click whose window closed before the event's timestamp fires
    /// first, so it never sees the event's effects.
    pub fn handle(&mut self, store: &mut GraphStore, event: InputEvent) {
        if let Some(now) = event.time() {
            self.poll(store, now);
        }

        match event {
            InputEvent::PointerDown {
                target,
                position,
                button,
                time,
            } => self.pointer_down(store, target, position, button, time),
            InputEvent::PointerMove { position, .. } => self.pointer_move(store, position),
            InputEvent::PointerUp { target, button, .. } => {
                if button == MouseButton::Left {
                    self.pointer_up(store, target);
                }
            }
            InputEvent::PointerLeave { .. } => {
                self.panning = None;
                self.end_drag(store);
            }
            InputEvent::TextEditCompleted { node, text } => {
                if self.widgets.editing() == Some(node) {
                    self.widgets.exit_editing();
                }
                store.apply(Command::SetLabel { id: node, text });
            }
            InputEvent::TextEditCancelled { node } => {
                if self.widgets.editing() == Some(node) {
                    self.widgets.exit_editing();
                }
            }
        }
    }

    /// Fire the pending single-click if its window has closed by `now`.
    ///
    /// Returns whether a click fired.
    pub fn poll(&mut self, store: &mut GraphStore, now: Instant) -> bool {
        match self.state {
            GestureState::PendingSingleClick(click) if now >= click.deadline => {
                self.state = GestureState::Idle;
                self.fire_single_click(store, click);
                true
            }
            _ => false,
        }
    }

    fn take_pending(&mut self) -> Option<PendingClick> {
        match std::mem::take(&mut self.state) {
            GestureState::PendingSingleClick(click) => Some(click),
            GestureState::Idle => None,
        }
    }

    /// Match a primary press against the previous one.
    ///
    /// A match consumes the previous press, so a third rapid press starts over.
    fn classify(&mut self, global: Point, time: Instant) -> bool {
        let radius = self.config.double_click_radius;
        let window = self.config.double_click_window();
        let is_double = self.last_press.is_some_and(|last| {
            time.saturating_duration_since(last.at) < window
                && distance_squared(global, last.global) <= radius * radius
        });

        self.last_press = if is_double {
            None
        } else {
            Some(PressRecord { at: time, global })
        };
        is_double
    }

    fn pointer_down(
        &mut self,
        store: &mut GraphStore,
        target: Target,
        position: PointerPosition,
        button: MouseButton,
        time: Instant,
    ) {
        match button {
            MouseButton::Right => {
                if let Target::Node(id) = target {
                    log::debug!("secondary press deletes {id}");
                    self.widgets.remove(id);
                    store.apply(Command::RemoveNode(id));
                }
                return;
            }
            MouseButton::Middle => return,
            MouseButton::Left => {}
        }

        if target == Target::Background {
            self.panning = Some(position.global);
        }

        if self.classify(position.global, time) {
            if let Some(click) = self.take_pending() {
                log::debug!("double-click cancels pending click at {:?}", click.local);
            }
            self.double_click(store, target, position.local);
            return;
        }

        // This press does not pair with a pending click, so that click was single.
        if let Some(click) = self.take_pending() {
            self.fire_single_click(store, click);
        }

        match target {
            Target::Background => {
                self.state = GestureState::PendingSingleClick(PendingClick {
                    local: position.local,
                    pressed_at: time,
                    deadline: time + self.config.double_click_window(),
                });
            }
            Target::Node(id) => {
                if store.contains(id) {
                    self.widgets.begin_drag(id, position.local);
                    store.emit(EditorEvent::OpacityChanged {
                        id,
                        opacity: DRAG_OPACITY,
                    });
                }
            }
        }
    }

    fn double_click(&mut self, store: &mut GraphStore, target: Target, local: Point) {
        match target {
            Target::Background => {
                let parent = store.selected();
                log::debug!("double-click on background at {local:?}, parent {parent:?}");
                store.apply(Command::AddChild {
                    parent,
                    position: local,
                    label: DEFAULT_LABEL.to_string(),
                });
            }
            Target::Node(id) => {
                if !store.contains(id) {
                    return;
                }
                self.end_drag(store);
                self.widgets.enter_editing(id);
                store.emit(EditorEvent::LabelEditRequested { id });
            }
        }
    }

    fn pointer_move(&mut self, store: &mut GraphStore, position: PointerPosition) {
        if let Some(id) = self.widgets.drag_moved() {
            store.apply(Command::MoveNode {
                id,
                position: position.local,
            });
        } else if let Some(last) = self.panning {
            store.emit(EditorEvent::ViewPanned {
                delta: position.global - last,
            });
            self.panning = Some(position.global);
        }
    }

    fn pointer_up(&mut self, store: &mut GraphStore, target: Target) {
        self.panning = None;
        let moved = self.end_drag(store).is_some_and(|moved| moved);
        if let Target::Node(id) = target {
            if !moved {
                store.apply(Command::Select(id));
            }
        }
    }

    /// End the current drag, returning whether the node actually moved.
    fn end_drag(&mut self, store: &mut GraphStore) -> Option<bool> {
        let (id, grab) = self.widgets.end_drag()?;
        store.emit(EditorEvent::OpacityChanged { id, opacity: 1.0 });
        Some(grab.moved)
    }

    /// Run a single-click that outlived its double-click window.
    ///
    /// Everything is looked up again here: the selection, the nodes and the
    /// edges may all have changed since the press.
    fn fire_single_click(&mut self, store: &mut GraphStore, click: PendingClick) {
        if let Some(id) = store.node_at(click.local) {
            log::debug!("single-click at {:?} now lands on node {id}", click.local);
            return;
        }

        store.apply(Command::ClearSelection);

        if let Some((from, to)) = store.edge_at(click.local, self.config.edge_hit_threshold) {
            log::debug!("single-click splits edge {from} -> {to}");
            store.apply(Command::SplitEdge {
                from,
                to,
                position: click.local,
                label: DEFAULT_LABEL.to_string(),
            });
        }
    }

    /// Node being dragged, if any.
    pub fn dragging(&self) -> Option<NodeId> {
        self.widgets.dragging()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Harness {
        store: GraphStore,
        ctl: InteractionController,
        t0: Instant,
    }

    impl Harness {
        fn new() -> Self {
            Self {
                store: GraphStore::new(),
                ctl: InteractionController::default(),
                t0: Instant::now(),
            }
        }

        fn at(&self, ms: u64) -> Instant {
            self.t0 + Duration::from_millis(ms)
        }

        fn press(&mut self, target: Target, x: f64, y: f64, ms: u64) {
            self.press_button(target, x, y, ms, MouseButton::Left);
        }

        fn press_button(&mut self, target: Target, x: f64, y: f64, ms: u64, button: MouseButton) {
            let event = InputEvent::PointerDown {
                target,
                position: PointerPosition::untransformed(Point::new(x, y)),
                button,
                time: self.at(ms),
            };
            self.ctl.handle(&mut self.store, event);
        }

        fn release(&mut self, target: Target, x: f64, y: f64, ms: u64) {
            let event = InputEvent::PointerUp {
                target,
                position: PointerPosition::untransformed(Point::new(x, y)),
                button: MouseButton::Left,
                time: self.at(ms),
            };
            self.ctl.handle(&mut self.store, event);
        }

        fn move_to(&mut self, x: f64, y: f64, ms: u64) {
            let event = InputEvent::PointerMove {
                position: PointerPosition::untransformed(Point::new(x, y)),
                time: self.at(ms),
            };
            self.ctl.handle(&mut self.store, event);
        }

        fn click(&mut self, target: Target, x: f64, y: f64, ms: u64) {
            self.press(target, x, y, ms);
            self.release(target, x, y, ms + 20);
        }

        fn poll(&mut self, ms: u64) -> bool {
            let now = self.at(ms);
            self.ctl.poll(&mut self.store, now)
        }

        /// Two nodes far apart, joined by a horizontal edge through (300, 100).
        fn with_edge(&mut self) -> (NodeId, NodeId) {
            let a = self.store.add_node(Point::new(100.0, 100.0), "a");
            let b = self.store.add_node(Point::new(500.0, 100.0), "b");
            self.store.add_edge(a, b);
            self.store.drain_events();
            (a, b)
        }
    }

    #[test]
    fn test_double_click_adds_connected_node() {
        let mut h = Harness::new();
        let root = h.store.add_node(Point::new(400.0, 50.0), "Root");
        h.store.select(root);

        h.click(Target::Background, 100.0, 100.0, 0);
        h.click(Target::Background, 100.0, 100.0, 100);
        assert!(!h.poll(1000));

        assert_eq!(h.store.len(), 2);
        let new = h.store.ids()[1];
        assert_eq!(h.store.position(new), Some(Point::new(100.0, 100.0)));
        assert_eq!(h.store.list_edges(), vec![(root, new)]);
        // The deferred deselect never ran.
        assert_eq!(h.store.selected(), Some(root));
    }

    #[test]
    fn test_double_click_without_selection_adds_free_node() {
        let mut h = Harness::new();
        h.click(Target::Background, 100.0, 100.0, 0);
        h.click(Target::Background, 104.0, 103.0, 250);

        assert_eq!(h.store.len(), 1);
        assert!(h.store.list_edges().is_empty());
        assert_eq!(h.ctl.pending_click(), None);
    }

    #[test]
    fn test_third_click_is_evaluated_fresh() {
        let mut h = Harness::new();
        h.click(Target::Background, 100.0, 100.0, 0);
        h.click(Target::Background, 100.0, 100.0, 100);
        h.click(Target::Background, 100.0, 100.0, 200);

        assert_eq!(h.store.len(), 1);
        assert!(h.ctl.pending_click().is_some());

        h.click(Target::Background, 100.0, 100.0, 300);
        assert_eq!(h.store.len(), 2);
    }

    #[test]
    fn test_slow_or_distant_second_press_is_not_double() {
        let mut h = Harness::new();
        h.click(Target::Background, 100.0, 100.0, 0);
        h.click(Target::Background, 100.0, 100.0, 300);
        assert!(h.store.is_empty());

        let mut h = Harness::new();
        h.click(Target::Background, 100.0, 100.0, 0);
        h.click(Target::Background, 111.0, 100.0, 50);
        assert!(h.store.is_empty());
    }

    #[test]
    fn test_single_click_fires_after_window() {
        let mut h = Harness::new();
        let a = h.store.add_node(Point::new(500.0, 500.0), "a");
        h.store.select(a);

        h.click(Target::Background, 100.0, 100.0, 0);
        assert!(!h.poll(299));
        assert_eq!(h.store.selected(), Some(a));

        assert!(h.poll(300));
        assert_eq!(h.store.selected(), None);
        assert_eq!(h.ctl.state(), GestureState::Idle);
    }

    #[test]
    fn test_single_click_near_edge_splits_it() {
        let mut h = Harness::new();
        let (a, b) = h.with_edge();

        h.click(Target::Background, 300.0, 104.0, 0);
        h.poll(400);

        assert_eq!(h.store.len(), 3);
        let new = h.store.ids()[2];
        assert_eq!(h.store.position(new), Some(Point::new(300.0, 104.0)));
        assert_eq!(h.store.list_edges(), vec![(a, new), (new, b)]);
    }

    #[test]
    fn test_single_click_beyond_threshold_does_not_split() {
        let mut h = Harness::new();
        let (a, b) = h.with_edge();

        h.click(Target::Background, 300.0, 106.0, 0);
        h.poll(400);

        assert_eq!(h.store.len(), 2);
        assert_eq!(h.store.list_edges(), vec![(a, b)]);
    }

    #[test]
    fn test_double_click_on_edge_does_not_split() {
        let mut h = Harness::new();
        let (a, b) = h.with_edge();

        h.click(Target::Background, 300.0, 100.0, 0);
        h.click(Target::Background, 300.0, 100.0, 100);
        h.poll(1000);

        assert_eq!(h.store.len(), 3);
        assert!(h.store.has_edge(a, b));
    }

    #[test]
    fn test_stale_pending_click_is_noop() {
        let mut h = Harness::new();
        let (_, b) = h.with_edge();

        h.click(Target::Background, 300.0, 100.0, 0);
        h.store.remove_node(b);
        h.poll(400);

        assert_eq!(h.store.len(), 1);
        assert!(h.store.list_edges().is_empty());
    }

    #[test]
    fn test_pending_click_over_node_is_ignored() {
        let mut h = Harness::new();
        let (a, b) = h.with_edge();
        h.store.select(a);
        // A node sitting on top of the edge wins over the edge.
        h.store.add_node(Point::new(300.0, 100.0), "on top");

        h.click(Target::Background, 300.0, 102.0, 0);
        h.poll(400);

        assert!(h.store.has_edge(a, b));
        assert_eq!(h.store.selected(), Some(a));
    }

    #[test]
    fn test_unmatched_press_resolves_pending_click_first() {
        let mut h = Harness::new();
        let (a, _) = h.with_edge();
        h.store.select(a);

        h.click(Target::Background, 800.0, 800.0, 0);
        // Second press is far away; the first resolves as a single-click now.
        h.click(Target::Node(a), 100.0, 100.0, 50);

        assert_eq!(h.store.selected(), Some(a));
        assert!(!h.poll(1000));
        assert_eq!(h.store.selected(), Some(a));
    }

    #[test]
    fn test_click_on_node_selects_it() {
        let mut h = Harness::new();
        let a = h.store.add_node(Point::new(0.0, 0.0), "a");
        let b = h.store.add_node(Point::new(200.0, 0.0), "b");

        h.click(Target::Node(a), 0.0, 0.0, 0);
        assert_eq!(h.store.selected(), Some(a));

        h.click(Target::Node(b), 200.0, 0.0, 1000);
        assert_eq!(h.store.selected(), Some(b));
        assert!(!h.store.get(a).unwrap().is_selected());
        assert!(h.ctl.pending_click().is_none());
    }

    #[test]
    fn test_drag_moves_node() {
        let mut h = Harness::new();
        let a = h.store.add_node(Point::new(0.0, 0.0), "a");
        h.store.drain_events();

        h.press(Target::Node(a), 0.0, 0.0, 0);
        assert_eq!(h.ctl.dragging(), Some(a));
        assert_eq!(h.ctl.widgets().opacity(a), DRAG_OPACITY);

        h.move_to(40.0, 30.0, 10);
        h.move_to(80.0, 60.0, 20);
        h.release(Target::Node(a), 80.0, 60.0, 30);

        assert_eq!(h.store.position(a), Some(Point::new(80.0, 60.0)));
        assert_eq!(h.ctl.dragging(), None);
        assert_eq!(h.ctl.widgets().opacity(a), 1.0);
        // A drag with motion does not select.
        assert_eq!(h.store.selected(), None);

        let events = h.store.drain_events();
        assert_eq!(events.first(), Some(&EditorEvent::OpacityChanged { id: a, opacity: 0.5 }));
        assert_eq!(events.last(), Some(&EditorEvent::OpacityChanged { id: a, opacity: 1.0 }));
        assert!(events.contains(&EditorEvent::NodeMoved { id: a, x: 40.0, y: 30.0 }));
    }

    #[test]
    fn test_pointer_leave_ends_drag() {
        let mut h = Harness::new();
        let a = h.store.add_node(Point::new(0.0, 0.0), "a");

        h.press(Target::Node(a), 0.0, 0.0, 0);
        let event = InputEvent::PointerLeave { time: h.at(10) };
        h.ctl.handle(&mut h.store, event);
        h.move_to(50.0, 50.0, 20);

        assert_eq!(h.ctl.dragging(), None);
        assert_eq!(h.store.position(a), Some(Point::new(0.0, 0.0)));
    }

    #[test]
    fn test_secondary_press_deletes_node() {
        let mut h = Harness::new();
        let a = h.store.add_node(Point::new(0.0, 0.0), "a");
        let b = h.store.add_node(Point::new(200.0, 0.0), "b");
        let c = h.store.add_node(Point::new(400.0, 0.0), "c");
        h.store.add_edge(a, b);
        h.store.add_edge(b, c);

        h.press_button(Target::Node(b), 200.0, 0.0, 0, MouseButton::Right);

        assert!(!h.store.contains(b));
        assert!(h.store.list_edges().is_empty());
        assert!(h.ctl.pending_click().is_none());
        assert!(!h.ctl.is_panning());
    }

    #[test]
    fn test_secondary_press_does_not_count_as_click() {
        let mut h = Harness::new();
        let a = h.store.add_node(Point::new(0.0, 0.0), "a");

        h.click(Target::Background, 0.0, 0.0, 0);
        h.press_button(Target::Node(a), 0.0, 0.0, 50, MouseButton::Right);
        h.click(Target::Background, 0.0, 0.0, 100);

        // The two background clicks still pair up.
        assert_eq!(h.store.len(), 1);
        assert_ne!(h.store.ids()[0], a);
    }

    #[test]
    fn test_double_click_on_node_edits_label() {
        let mut h = Harness::new();
        let a = h.store.add_node(Point::new(0.0, 0.0), "a");
        h.store.drain_events();

        h.click(Target::Node(a), 0.0, 0.0, 0);
        h.click(Target::Node(a), 0.0, 0.0, 100);

        assert_eq!(h.ctl.widgets().editing(), Some(a));
        assert!(h
            .store
            .drain_events()
            .contains(&EditorEvent::LabelEditRequested { id: a }));

        h.ctl.handle(
            &mut h.store,
            InputEvent::TextEditCompleted {
                node: a,
                text: "renamed".to_string(),
            },
        );
        assert_eq!(h.store.get(a).unwrap().label, "renamed");
        assert_eq!(h.ctl.widgets().editing(), None);
    }

    #[test]
    fn test_cancelled_edit_keeps_label() {
        let mut h = Harness::new();
        let a = h.store.add_node(Point::new(0.0, 0.0), "a");
        h.click(Target::Node(a), 0.0, 0.0, 0);
        h.click(Target::Node(a), 0.0, 0.0, 100);

        h.ctl.handle(&mut h.store, InputEvent::TextEditCancelled { node: a });

        assert_eq!(h.store.get(a).unwrap().label, "a");
        assert_eq!(h.ctl.widgets().editing(), None);
    }

    #[test]
    fn test_background_drag_pans_view() {
        let mut h = Harness::new();
        h.press(Target::Background, 10.0, 10.0, 0);
        h.move_to(15.0, 12.0, 10);
        h.move_to(20.0, 20.0, 20);
        h.release(Target::Background, 20.0, 20.0, 30);
        h.move_to(90.0, 90.0, 40);

        let pans: Vec<_> = h
            .store
            .drain_events()
            .into_iter()
            .filter_map(|e| match e {
                EditorEvent::ViewPanned { delta } => Some((delta.x, delta.y)),
                _ => None,
            })
            .collect();
        assert_eq!(pans, vec![(5.0, 2.0), (5.0, 8.0)]);
    }

    #[test]
    fn test_any_timed_event_fires_elapsed_click() {
        let mut h = Harness::new();
        let (a, b) = h.with_edge();

        h.click(Target::Background, 300.0, 100.0, 0);
        // Still inside the window: nothing yet.
        h.move_to(300.0, 100.0, 150);
        assert_eq!(h.store.len(), 2);

        h.move_to(310.0, 120.0, 350);
        assert!(h.ctl.pending_click().is_none());
        assert_eq!(h.store.len(), 3);
        assert!(!h.store.has_edge(a, b));
    }

    #[test]
    fn test_reset_drops_pending_click() {
        let mut h = Harness::new();
        let a = h.store.add_node(Point::new(900.0, 900.0), "a");
        h.store.select(a);
        h.click(Target::Background, 0.0, 0.0, 0);

        h.ctl.reset();

        assert!(!h.poll(1000));
        assert_eq!(h.store.selected(), Some(a));
    }
}
