//! Marker template - the spinning rounded square cloned at every pointer event

use std::f32::consts::PI;

use crate::action::Action;
use crate::geometry::Size;
use crate::node::SceneNode;

/// Marker side as a fraction of (scene width + scene height)
pub const MARKER_SIDE_FACTOR: f32 = 0.05;
/// Corner radius as a fraction of the marker side
pub const MARKER_CORNER_FACTOR: f32 = 0.3;
pub const MARKER_STROKE_WIDTH: f32 = 4.0;
/// Rotation speed in radians per second
pub const MARKER_SPIN_RATE: f32 = PI;
/// Seconds a marker stays fully visible before fading
pub const MARKER_LINGER_SECS: f32 = 0.5;
pub const MARKER_FADE_SECS: f32 = 0.5;

/// Build the marker template for a scene of the given size.
///
/// The template carries two actions: an endless spin, and a linger, fade,
/// remove sequence. It never joins the scene, so its actions stay at their
/// start and every clone runs them from the beginning.
pub fn marker_template(scene_size: Size) -> SceneNode {
    let side = (scene_size.width + scene_size.height) * MARKER_SIDE_FACTOR;
    let mut template = SceneNode::rounded_rect(Size::square(side), side * MARKER_CORNER_FACTOR);
    if let Some(shape) = template.as_shape_mut() {
        shape.stroke_width = MARKER_STROKE_WIDTH;
    }

    template.run_action(
        Action::repeat_forever(Action::rotate_by(MARKER_SPIN_RATE, 1.0)),
        None,
    );
    template.run_action(
        Action::sequence([
            Action::wait(MARKER_LINGER_SECS),
            Action::fade_out(MARKER_FADE_SECS),
            Action::RemoveFromParent,
        ]),
        None,
    );
    template
}
