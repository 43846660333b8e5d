//! Bevy mouse/touch input as a [`PointerSource`]
//!
//! Mouse: left button press, drag, and release map to began/moved/ended with
//! pointer id 0. Touch: each frame's pressed, moved, released, and canceled
//! touches form one batch per phase, ordered by touch id so the earliest
//! touch is the primary pointer.

use bevy::input::touch::{Touch, Touches};
use bevy::prelude::*;
use bevy::window::PrimaryWindow;
use tapfield_core::{
    Point, PointerEvent, PointerId, PointerPhase, PointerSample, PointerSource, SceneCallbacks,
};
use tracing::trace;

use crate::camera::SceneCamera;
use crate::ActiveScene;

pub const MOUSE_POINTER_ID: PointerId = 0;

/// Touch ids are shifted so they never collide with the mouse pointer
pub fn touch_pointer_id(touch_id: u64) -> PointerId {
    touch_id.saturating_add(1)
}

/// Mouse state carried between frames
#[derive(Resource, Debug, Default)]
pub struct PointerTracker {
    /// Scene position of the mouse while the left button is held
    pub mouse_position: Option<Point>,
}

/// One frame of Bevy input, converted to scene coordinates by `to_scene`
pub struct BevyPointerSource<'a, F>
where
    F: Fn(Vec2) -> Option<Point>,
{
    pub mouse: &'a ButtonInput<MouseButton>,
    pub touches: &'a Touches,
    /// Cursor position in window (viewport) coordinates
    pub cursor: Option<Vec2>,
    pub tracker: &'a mut PointerTracker,
    pub to_scene: F,
}

impl<F> BevyPointerSource<'_, F>
where
    F: Fn(Vec2) -> Option<Point>,
{
    fn poll_mouse(&mut self, events: &mut Vec<PointerEvent>) {
        let position = self.cursor.and_then(|cursor| (self.to_scene)(cursor));

        if self.mouse.just_pressed(MouseButton::Left) {
            if let Some(position) = position {
                events.push(PointerEvent::single(PointerPhase::Began, MOUSE_POINTER_ID, position));
                self.tracker.mouse_position = Some(position);
            }
        } else if self.mouse.pressed(MouseButton::Left) {
            if let Some(position) = position {
                if self.tracker.mouse_position != Some(position) {
                    events.push(PointerEvent::single(PointerPhase::Moved, MOUSE_POINTER_ID, position));
                    self.tracker.mouse_position = Some(position);
                }
            }
        }

        if self.mouse.just_released(MouseButton::Left) {
            // Cursor may have left the window; end where the drag was last seen
            if let Some(position) = position.or(self.tracker.mouse_position) {
                events.push(PointerEvent::single(PointerPhase::Ended, MOUSE_POINTER_ID, position));
            }
            self.tracker.mouse_position = None;
        }
    }

    fn touch_batch<'t>(
        &self,
        phase: PointerPhase,
        touches: impl Iterator<Item = &'t Touch>,
    ) -> Option<PointerEvent> {
        let mut pointers: Vec<PointerSample> = touches
            .filter_map(|touch| {
                (self.to_scene)(touch.position())
                    .map(|position| PointerSample::new(touch_pointer_id(touch.id()), position))
            })
            .collect();
        if pointers.is_empty() {
            return None;
        }
        pointers.sort_by_key(|p| p.id);
        Some(PointerEvent::new(phase, pointers))
    }

    fn poll_touches(&self, events: &mut Vec<PointerEvent>) {
        let touches = self.touches;
        let moved = touches
            .iter()
            .filter(|t| !touches.just_pressed(t.id()) && t.delta() != Vec2::ZERO);

        let batches = [
            self.touch_batch(PointerPhase::Began, touches.iter_just_pressed()),
            self.touch_batch(PointerPhase::Moved, moved),
            self.touch_batch(PointerPhase::Ended, touches.iter_just_released()),
            self.touch_batch(PointerPhase::Cancelled, touches.iter_just_canceled()),
        ];
        events.extend(batches.into_iter().flatten());
    }
}

impl<F> PointerSource for BevyPointerSource<'_, F>
where
    F: Fn(Vec2) -> Option<Point>,
{
    fn poll_events(&mut self) -> Vec<PointerEvent> {
        let mut events = Vec::new();
        self.poll_mouse(&mut events);
        self.poll_touches(&mut events);
        events
    }
}

/// Feed this frame's mouse and touch input to the scene callbacks
pub fn dispatch_pointer_input(
    mut scene: ResMut<ActiveScene>,
    mut tracker: ResMut<PointerTracker>,
    mouse: Res<ButtonInput<MouseButton>>,
    touches: Res<Touches>,
    windows: Query<&Window, With<PrimaryWindow>>,
    cameras: Query<(&Camera, &GlobalTransform), With<SceneCamera>>,
) {
    let Ok((camera, camera_transform)) = cameras.single() else {
        return;
    };
    let cursor = windows.single().ok().and_then(Window::cursor_position);

    let mut source = BevyPointerSource {
        mouse: &*mouse,
        touches: &*touches,
        cursor,
        tracker: &mut *tracker,
        to_scene: |viewport: Vec2| {
            camera
                .viewport_to_world_2d(camera_transform, viewport)
                .ok()
                .map(|world| Point::new(world.x, world.y))
        },
    };

    for event in source.poll_events() {
        trace!(phase = ?event.phase, pointers = event.pointers.len(), "Pointer event");
        scene.0.dispatch(&event);
    }
}
