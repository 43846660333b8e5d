//! Scene nodes - labels and shapes with position, transform, and running actions

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::action::{Action, RunningAction};
use crate::geometry::{Point, Rgba, Size};

/// Identifier assigned to a node when it is added to a scene
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct NodeId(pub u64);

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "node-{}", self.0)
    }
}

/// Text label
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LabelNode {
    pub text: String,
    #[serde(default = "default_font_size")]
    pub font_size: f32,
    #[serde(default)]
    pub color: Rgba,
}

fn default_font_size() -> f32 {
    32.0
}

/// Rounded rectangle outline
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShapeNode {
    pub size: Size,
    #[serde(default)]
    pub corner_radius: f32,
    #[serde(default = "default_stroke_width")]
    pub stroke_width: f32,
    #[serde(default)]
    pub stroke_color: Rgba,
}

fn default_stroke_width() -> f32 {
    1.0
}

/// What a node draws
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NodeKind {
    Label(LabelNode),
    Shape(ShapeNode),
}

/// A visual node. Nodes are direct children of a [`Scene`](crate::Scene);
/// they do not have children of their own.
#[derive(Debug, Clone)]
pub struct SceneNode {
    id: Option<NodeId>,
    pub name: Option<String>,
    pub kind: NodeKind,
    pub position: Point,
    /// Rotation in radians, counter-clockwise
    pub rotation: f32,
    pub scale: f32,
    /// Opacity, 0.0 (transparent) to 1.0 (opaque)
    pub alpha: f32,
    actions: Vec<RunningAction>,
    removal_requested: bool,
}

impl SceneNode {
    pub fn new(kind: NodeKind) -> Self {
        Self {
            id: None,
            name: None,
            kind,
            position: Point::ZERO,
            rotation: 0.0,
            scale: 1.0,
            alpha: 1.0,
            actions: Vec::new(),
            removal_requested: false,
        }
    }

    pub fn label(text: impl Into<String>) -> Self {
        Self::new(NodeKind::Label(LabelNode {
            text: text.into(),
            font_size: default_font_size(),
            color: Rgba::WHITE,
        }))
    }

    pub fn rounded_rect(size: Size, corner_radius: f32) -> Self {
        Self::new(NodeKind::Shape(ShapeNode {
            size,
            corner_radius,
            stroke_width: default_stroke_width(),
            stroke_color: Rgba::WHITE,
        }))
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn with_position(mut self, position: Point) -> Self {
        self.position = position;
        self
    }

    /// Scene-assigned id; `None` until the node is added to a scene
    pub fn id(&self) -> Option<NodeId> {
        self.id
    }

    pub(crate) fn assign_id(&mut self, id: NodeId) {
        self.id = Some(id);
    }

    /// Copy this node, including its actions, detached from any scene
    pub fn duplicate(&self) -> SceneNode {
        let mut copy = self.clone();
        copy.id = None;
        copy.removal_requested = false;
        copy
    }

    pub fn as_label(&self) -> Option<&LabelNode> {
        match &self.kind {
            NodeKind::Label(label) => Some(label),
            _ => None,
        }
    }

    pub fn as_label_mut(&mut self) -> Option<&mut LabelNode> {
        match &mut self.kind {
            NodeKind::Label(label) => Some(label),
            _ => None,
        }
    }

    pub fn as_shape(&self) -> Option<&ShapeNode> {
        match &self.kind {
            NodeKind::Shape(shape) => Some(shape),
            _ => None,
        }
    }

    pub fn as_shape_mut(&mut self) -> Option<&mut ShapeNode> {
        match &mut self.kind {
            NodeKind::Shape(shape) => Some(shape),
            _ => None,
        }
    }

    /// Start an action. A keyed action replaces any running action with the same key.
    pub fn run_action(&mut self, action: Action, key: Option<&str>) {
        if let Some(key) = key {
            self.remove_action(key);
        }
        self.actions.push(RunningAction::new(&action, key));
    }

    pub fn has_action(&self, key: &str) -> bool {
        self.actions.iter().any(|a| a.key() == Some(key))
    }

    pub fn remove_action(&mut self, key: &str) {
        self.actions.retain(|a| a.key() != Some(key));
    }

    pub fn action_count(&self) -> usize {
        self.actions.len()
    }

    /// Step every running action by `dt` seconds, dropping finished ones
    pub fn advance(&mut self, dt: f32) {
        let mut actions = std::mem::take(&mut self.actions);
        actions.retain_mut(|action| action.step(self, dt));
        self.actions = actions;
    }

    pub(crate) fn request_removal(&mut self) {
        self.removal_requested = true;
    }

    /// Set once a `RemoveFromParent` action has run
    pub fn is_removal_requested(&self) -> bool {
        self.removal_requested
    }
}
