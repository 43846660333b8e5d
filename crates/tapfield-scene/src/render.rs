//! Drawing the scene - gizmo outlines for shapes, `Text2d` entities for labels

use bevy::prelude::*;
use std::collections::{HashMap, HashSet};
use tapfield_core::marker::MARKER_STROKE_WIDTH;
use tapfield_core::{NodeId, Rgba, SceneNode};

use crate::ActiveScene;

/// Labels sit above shapes and the clear color
const LABEL_DEPTH: f32 = 1.0;

/// Marks text entities that mirror a label node
#[derive(Component)]
pub struct LabelEntity;

/// Label node id -> text entity
#[derive(Resource, Debug, Default)]
pub struct LabelEntities(pub HashMap<NodeId, Entity>);

pub fn to_color(color: Rgba, alpha: f32) -> Color {
    Color::srgba(color.r, color.g, color.b, color.a * alpha)
}

pub fn node_transform(node: &SceneNode, depth: f32) -> Transform {
    Transform::from_xyz(node.position.x, node.position.y, depth)
        .with_rotation(Quat::from_rotation_z(node.rotation))
        .with_scale(Vec3::splat(node.scale))
}

/// Gizmo lines share one width; shapes are drawn at the marker stroke width
pub fn configure_gizmos(mut store: ResMut<GizmoConfigStore>) {
    let (config, _) = store.config_mut::<DefaultGizmoConfigGroup>();
    config.line.width = MARKER_STROKE_WIDTH;
}

pub fn draw_shapes(scene: Res<ActiveScene>, mut gizmos: Gizmos) {
    for node in scene.0.scene().children() {
        let Some(shape) = node.as_shape() else {
            continue;
        };
        let isometry = Isometry2d::new(
            Vec2::new(node.position.x, node.position.y),
            Rot2::radians(node.rotation),
        );
        let size = Vec2::new(shape.size.width, shape.size.height) * node.scale;
        gizmos
            .rounded_rect_2d(isometry, size, to_color(shape.stroke_color, node.alpha))
            .corner_radius(shape.corner_radius * node.scale);
    }
}

/// Spawn, update, and despawn text entities to match the scene's labels
pub fn sync_labels(
    mut commands: Commands,
    scene: Res<ActiveScene>,
    mut entities: ResMut<LabelEntities>,
    mut labels: Query<(&mut Text2d, &mut TextFont, &mut TextColor, &mut Transform), With<LabelEntity>>,
) {
    let mut present = HashSet::new();

    for node in scene.0.scene().children() {
        let (Some(id), Some(label)) = (node.id(), node.as_label()) else {
            continue;
        };
        present.insert(id);

        let transform = node_transform(node, LABEL_DEPTH);
        let color = TextColor(to_color(label.color, node.alpha));
        let existing = entities.0.get(&id).copied();

        match existing.and_then(|entity| labels.get_mut(entity).ok()) {
            Some((mut text, mut font, mut text_color, mut current)) => {
                if text.0 != label.text {
                    text.0 = label.text.clone();
                }
                if font.font_size != label.font_size {
                    font.font_size = label.font_size;
                }
                if *text_color != color {
                    *text_color = color;
                }
                if *current != transform {
                    *current = transform;
                }
            }
            None => {
                let entity = commands
                    .spawn((
                        Text2d::new(label.text.clone()),
                        TextFont {
                            font_size: label.font_size,
                            ..default()
                        },
                        color,
                        transform,
                        LabelEntity,
                    ))
                    .id();
                entities.0.insert(id, entity);
            }
        }
    }

    entities.0.retain(|id, entity| {
        if present.contains(id) {
            true
        } else {
            commands.entity(*entity).despawn();
            false
        }
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use tapfield_core::{Point, Size};

    #[test]
    fn test_node_alpha_multiplies_color_alpha() {
        let color = to_color(Rgba { r: 1.0, g: 0.0, b: 0.0, a: 0.5 }, 0.5);
        assert!((color.alpha() - 0.25).abs() < 1e-6);
    }

    #[test]
    fn test_node_transform() {
        let mut node = SceneNode::rounded_rect(Size::square(10.0), 2.0)
            .with_position(Point::new(3.0, -4.0));
        node.scale = 2.0;

        let transform = node_transform(&node, LABEL_DEPTH);
        assert_eq!(transform.translation, Vec3::new(3.0, -4.0, LABEL_DEPTH));
        assert_eq!(transform.scale, Vec3::splat(2.0));
    }
}
