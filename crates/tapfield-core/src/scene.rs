//! Scene root - size, scale mode, and the ordered list of child nodes

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::geometry::{Point, Size};
use crate::node::{NodeId, SceneNode};

/// How the scene is fitted into the view
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScaleMode {
    /// Stretch to the view, ignoring aspect ratio
    Fill,
    /// Scale uniformly until the view is covered (may crop)
    #[default]
    AspectFill,
    /// Scale uniformly until the scene fits (may letterbox)
    AspectFit,
    /// Resize the scene to the view
    ResizeFill,
}

#[derive(Debug, Clone)]
pub struct Scene {
    size: Size,
    scale_mode: ScaleMode,
    children: Vec<SceneNode>,
    next_id: u64,
}

impl Scene {
    pub fn new(size: Size) -> Self {
        Self {
            size,
            scale_mode: ScaleMode::default(),
            children: Vec::new(),
            next_id: 1,
        }
    }

    pub fn size(&self) -> Size {
        self.size
    }

    pub fn scale_mode(&self) -> ScaleMode {
        self.scale_mode
    }

    pub fn set_scale_mode(&mut self, mode: ScaleMode) {
        self.scale_mode = mode;
    }

    /// Append a node as the last child and return its new id
    pub fn add_child(&mut self, mut node: SceneNode) -> NodeId {
        let id = NodeId(self.next_id);
        self.next_id += 1;
        node.assign_id(id);
        self.children.push(node);
        id
    }

    pub fn remove_child(&mut self, id: NodeId) -> Option<SceneNode> {
        let index = self.children.iter().position(|n| n.id() == Some(id))?;
        Some(self.children.remove(index))
    }

    /// Direct children in draw order
    pub fn children(&self) -> &[SceneNode] {
        &self.children
    }

    pub fn node(&self, id: NodeId) -> Option<&SceneNode> {
        self.children.iter().find(|n| n.id() == Some(id))
    }

    pub fn node_mut(&mut self, id: NodeId) -> Option<&mut SceneNode> {
        self.children.iter_mut().find(|n| n.id() == Some(id))
    }

    /// Find a child by name path.
    ///
    /// Accepts `name`, `/name`, and `//name`. Nodes are one level deep,
    /// so all three forms search the direct children.
    pub fn child_node(&self, path: &str) -> Option<&SceneNode> {
        let name = path.trim_start_matches('/');
        if name.is_empty() {
            return None;
        }
        self.children
            .iter()
            .find(|n| n.name.as_deref() == Some(name))
    }

    /// Move every direct child by `delta`
    pub fn translate_children(&mut self, delta: Point) {
        for child in &mut self.children {
            child.position += delta;
        }
    }

    /// Advance all child actions by `dt` seconds and drop children that
    /// removed themselves. Returns the number of children removed.
    pub fn advance(&mut self, dt: f32) -> usize {
        for child in &mut self.children {
            child.advance(dt);
        }

        let before = self.children.len();
        self.children.retain(|n| !n.is_removal_requested());
        let removed = before - self.children.len();
        if removed > 0 {
            debug!(removed, remaining = self.children.len(), "Removed finished nodes");
        }
        removed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::action::Action;

    fn scene_with_label() -> (Scene, NodeId) {
        let mut scene = Scene::new(Size::new(1024.0, 768.0));
        let id = scene.add_child(SceneNode::label("Hello, World!").with_name("helloLabel"));
        (scene, id)
    }

    #[test]
    fn test_child_lookup_by_path() {
        let (scene, id) = scene_with_label();

        assert_eq!(scene.child_node("//helloLabel").and_then(|n| n.id()), Some(id));
        assert_eq!(scene.child_node("/helloLabel").and_then(|n| n.id()), Some(id));
        assert_eq!(scene.child_node("helloLabel").and_then(|n| n.id()), Some(id));
        assert!(scene.child_node("//missing").is_none());
        assert!(scene.child_node("//").is_none());
    }

    #[test]
    fn test_ids_are_unique_and_ordered() {
        let (mut scene, first) = scene_with_label();
        let second = scene.add_child(SceneNode::rounded_rect(Size::square(5.0), 1.0));
        assert!(second > first);

        let removed = scene.remove_child(first).unwrap();
        assert_eq!(removed.name.as_deref(), Some("helloLabel"));
        assert!(scene.node(first).is_none());
        assert_eq!(scene.children().len(), 1);
    }

    #[test]
    fn test_translate_children_is_unbounded() {
        let (mut scene, id) = scene_with_label();
        let other = scene.add_child(
            SceneNode::rounded_rect(Size::square(5.0), 1.0).with_position(Point::new(-2.0, 3.0)),
        );

        for _ in 0..1000 {
            scene.translate_children(Point::new(10.0, -1.0));
        }

        assert_eq!(scene.node(id).unwrap().position, Point::new(10000.0, -1000.0));
        assert_eq!(scene.node(other).unwrap().position, Point::new(9998.0, -997.0));
    }

    #[test]
    fn test_advance_removes_finished_nodes() {
        let (mut scene, label) = scene_with_label();
        let mut marker = SceneNode::rounded_rect(Size::square(5.0), 1.0);
        marker.run_action(
            Action::sequence([Action::wait(0.5), Action::RemoveFromParent]),
            None,
        );
        let marker = scene.add_child(marker);

        assert_eq!(scene.advance(0.25), 0);
        assert!(scene.node(marker).is_some());
        assert_eq!(scene.advance(0.5), 1);
        assert!(scene.node(marker).is_none());
        assert!(scene.node(label).is_some());
    }
}
