//! Tapfield Core - Scene graph, actions, and pointer handling
//!
//! This crate holds everything about the interactive scene that does not
//! depend on a rendering engine:
//! - A flat scene graph of labels and shapes with timed actions
//! - Scene resources loaded from TOML/JSON files
//! - A unified pointer event model for mouse and touch
//! - The interactive scene: label pulse, marker spawning, and drag panning

pub mod action;
pub mod drag;
pub mod geometry;
pub mod input;
pub mod interactive;
pub mod marker;
pub mod node;
pub mod resource;
pub mod scene;

pub use action::{Action, ActionLibrary};
pub use drag::DragState;
pub use geometry::{Point, Rgba, Size};
pub use input::{
    primary_pointer, PointerEvent, PointerId, PointerPhase, PointerSample, PointerSource,
    ScriptedSource,
};
pub use interactive::{InteractiveScene, SceneCallbacks};
pub use node::{LabelNode, NodeId, NodeKind, SceneNode, ShapeNode};
pub use resource::{
    create_scene, load_action_library, FileSceneLoader, SceneDocument, SceneError, SceneLoader,
};
pub use scene::{ScaleMode, Scene};
