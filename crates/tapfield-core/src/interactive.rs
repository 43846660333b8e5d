//! Interactive scene - label fade-in, marker spawning, and drag panning
//!
//! Event mapping (identical for mouse and touch):
//!
//! | phase     | drag state                 | label       | marker |
//! |-----------|----------------------------|-------------|--------|
//! | began     | start at primary pointer   | run `Pulse` | green  |
//! | moved     | pan children by the offset | -           | blue   |
//! | ended     | release                    | -           | red    |
//! | cancelled | release                    | -           | red    |
//!
//! Every pointer in a batch spawns a marker; only the primary pointer
//! (first in the batch) drives the drag.

use tracing::{debug, trace};

use crate::action::{Action, ActionLibrary};
use crate::drag::DragState;
use crate::geometry::{Point, Rgba};
use crate::input::{PointerEvent, PointerPhase};
use crate::marker::marker_template;
use crate::node::{NodeId, SceneNode};
use crate::scene::Scene;

/// Lookup path of the status label
pub const LABEL_PATH: &str = "//helloLabel";
/// Named action run on the label when a pointer goes down
pub const PULSE_ACTION: &str = "Pulse";
/// Key the pulse runs under, so a new pulse replaces one in flight
pub const PULSE_KEY: &str = "fadeInOut";
pub const LABEL_FADE_IN_SECS: f32 = 2.0;

/// Callbacks a host event loop drives, in delivery order, on one thread
pub trait SceneCallbacks {
    /// The scene has been presented
    fn on_create(&mut self);
    fn on_begin(&mut self, event: &PointerEvent);
    fn on_move(&mut self, event: &PointerEvent);
    fn on_end(&mut self, event: &PointerEvent);
    fn on_cancel(&mut self, event: &PointerEvent);
    /// Called once per frame before actions are evaluated
    fn on_update(&mut self, current_time: f64);

    /// Route an event to the callback for its phase
    fn dispatch(&mut self, event: &PointerEvent) {
        match event.phase {
            PointerPhase::Began => self.on_begin(event),
            PointerPhase::Moved => self.on_move(event),
            PointerPhase::Ended => self.on_end(event),
            PointerPhase::Cancelled => self.on_cancel(event),
        }
    }
}

pub struct InteractiveScene {
    scene: Scene,
    actions: ActionLibrary,
    label: Option<NodeId>,
    template: Option<SceneNode>,
    drag: DragState,
}

impl InteractiveScene {
    pub fn new(scene: Scene, actions: ActionLibrary) -> Self {
        Self {
            scene,
            actions,
            label: None,
            template: None,
            drag: DragState::Absent,
        }
    }

    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    pub fn scene_mut(&mut self) -> &mut Scene {
        &mut self.scene
    }

    pub fn label(&self) -> Option<NodeId> {
        self.label
    }

    pub fn marker_template(&self) -> Option<&SceneNode> {
        self.template.as_ref()
    }

    pub fn drag_state(&self) -> DragState {
        self.drag
    }

    /// Resolve the label and build the marker template
    pub fn set_up_scene(&mut self) {
        self.label = self
            .scene
            .child_node(LABEL_PATH)
            .filter(|node| node.as_label().is_some())
            .and_then(SceneNode::id);

        match self.label.and_then(|id| self.scene.node_mut(id)) {
            Some(label) => {
                label.alpha = 0.0;
                label.run_action(Action::fade_in(LABEL_FADE_IN_SECS), None);
            }
            None => trace!(path = LABEL_PATH, "No label, skipping fade-in"),
        }

        self.template = Some(marker_template(self.scene.size()));
        debug!(label = ?self.label, "Scene set up");
    }

    /// Add a clone of the marker template at `position`. No-op without a template.
    pub fn spawn_marker(&mut self, position: Point, color: Rgba) -> Option<NodeId> {
        let Some(template) = &self.template else {
            trace!("No marker template, skipping spawn");
            return None;
        };

        let mut marker = template.duplicate();
        marker.position = position;
        if let Some(shape) = marker.as_shape_mut() {
            shape.stroke_color = color;
        }
        Some(self.scene.add_child(marker))
    }

    /// Move every direct child by `delta`
    pub fn pan_children(&mut self, delta: Point) {
        self.scene.translate_children(delta);
    }

    fn pulse_label(&mut self) {
        let Some(id) = self.label else {
            return;
        };
        let Some(pulse) = self.actions.get(PULSE_ACTION).cloned() else {
            trace!(action = PULSE_ACTION, "Named action missing, skipping pulse");
            return;
        };
        if let Some(label) = self.scene.node_mut(id) {
            label.run_action(pulse, Some(PULSE_KEY));
        }
    }

    fn spawn_markers(&mut self, event: &PointerEvent, color: Rgba) {
        for pointer in &event.pointers {
            self.spawn_marker(pointer.position, color);
        }
    }
}

impl SceneCallbacks for InteractiveScene {
    fn on_create(&mut self) {
        self.set_up_scene();
    }

    fn on_begin(&mut self, event: &PointerEvent) {
        if let Some(primary) = event.primary() {
            self.drag.begin(primary.position);
        }
        self.pulse_label();
        self.spawn_markers(event, Rgba::GREEN);
    }

    fn on_move(&mut self, event: &PointerEvent) {
        if let Some(primary) = event.primary() {
            if let Some(delta) = self.drag.drag_to(primary.position) {
                self.pan_children(delta);
            }
        }
        self.spawn_markers(event, Rgba::BLUE);
    }

    fn on_end(&mut self, event: &PointerEvent) {
        self.drag.release();
        self.spawn_markers(event, Rgba::RED);
    }

    fn on_cancel(&mut self, event: &PointerEvent) {
        self.drag.release();
        self.spawn_markers(event, Rgba::RED);
    }

    fn on_update(&mut self, _current_time: f64) {}
}
