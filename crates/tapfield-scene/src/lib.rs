//! Tapfield Scene - Bevy host for the interactive scene
//!
//! The plugin owns no scene logic. Each frame it feeds mouse and touch input
//! to the [`InteractiveScene`] callbacks, advances the scene's actions, and
//! draws the result: shapes as gizmo outlines, labels as `Text2d` entities.

pub mod camera;
pub mod input;
pub mod render;

use bevy::prelude::*;
use tapfield_core::{InteractiveScene, SceneCallbacks};
use tracing::info;

/// The scene being presented; inserted by the application before the plugin runs
#[derive(Resource)]
pub struct ActiveScene(pub InteractiveScene);

/// Plugin that presents an [`ActiveScene`]
pub struct TapfieldScenePlugin;

impl Plugin for TapfieldScenePlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<input::PointerTracker>()
            .init_resource::<render::LabelEntities>()
            .add_systems(
                Startup,
                (camera::setup_camera, render::configure_gizmos, present_scene),
            )
            .add_systems(
                Update,
                (
                    input::dispatch_pointer_input,
                    advance_scene,
                    render::sync_labels,
                    render::draw_shapes,
                )
                    .chain(),
            );
    }
}

fn present_scene(mut scene: ResMut<ActiveScene>) {
    scene.0.on_create();
    info!(
        children = scene.0.scene().children().len(),
        label = scene.0.label().is_some(),
        "Scene presented"
    );
}

/// Per-frame hook, then action evaluation
fn advance_scene(mut scene: ResMut<ActiveScene>, time: Res<Time>) {
    scene.0.on_update(time.elapsed_secs_f64());
    scene.0.scene_mut().advance(time.delta_secs());
}
