//! 2D camera fitted to the scene's scale mode

use bevy::camera::ScalingMode;
use bevy::prelude::*;
use tapfield_core::{ScaleMode, Size};

use crate::ActiveScene;

/// Marker component for the camera presenting the scene
#[derive(Component)]
pub struct SceneCamera;

pub fn setup_camera(mut commands: Commands, scene: Res<ActiveScene>) {
    let scene = scene.0.scene();
    commands.spawn((
        Camera2d,
        Projection::Orthographic(OrthographicProjection {
            scaling_mode: scaling_mode(scene.scale_mode(), scene.size()),
            ..OrthographicProjection::default_2d()
        }),
        SceneCamera,
    ));
}

/// Map a scene scale mode onto an orthographic scaling mode.
///
/// `AutoMax` caps the visible area at the scene size, so the scene always
/// covers the window and the longer axis is cropped (aspect fill).
pub fn scaling_mode(mode: ScaleMode, size: Size) -> ScalingMode {
    match mode {
        ScaleMode::AspectFill => ScalingMode::AutoMax {
            max_width: size.width,
            max_height: size.height,
        },
        ScaleMode::AspectFit => ScalingMode::AutoMin {
            min_width: size.width,
            min_height: size.height,
        },
        ScaleMode::Fill => ScalingMode::Fixed {
            width: size.width,
            height: size.height,
        },
        ScaleMode::ResizeFill => ScalingMode::WindowSize,
    }
}
