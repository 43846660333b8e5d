//! Scene resources - documents, loaders, and scene creation
//!
//! A scene resource is a TOML (`<name>.toml`) or JSON (`<name>.json`) file
//! describing the scene class, its size, and its initial nodes:
//!
//! ```toml
//! class = "InteractiveScene"
//! width = 1024.0
//! height = 768.0
//!
//! [[node]]
//! name = "helloLabel"
//! position = { x = 0.0, y = 0.0 }
//! [node.kind.label]
//! text = "Hello, World!"
//! ```
//!
//! Action libraries use the same lookup with `[actions.<name>]` tables.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use thiserror::Error;
use tracing::{debug, info};

use crate::action::ActionLibrary;
use crate::geometry::{Point, Size};
use crate::node::{NodeKind, SceneNode};
use crate::scene::{Scene, ScaleMode};

/// Class name a scene resource must declare to back an interactive scene
pub const SCENE_CLASS: &str = "InteractiveScene";

#[derive(Error, Debug)]
pub enum SceneError {
    #[error("Scene resource not found: {0}")]
    NotFound(String),
    #[error("Scene resource {name} has class {found:?}, expected {expected:?}")]
    WrongClass {
        name: String,
        found: String,
        expected: &'static str,
    },
    #[error("Invalid scene size {width}x{height}")]
    InvalidSize { width: f32, height: f32 },
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
    #[error("Failed to parse TOML resource: {0}")]
    TomlError(#[from] toml::de::Error),
    #[error("Failed to parse JSON resource: {0}")]
    JsonError(#[from] serde_json::Error),
}

/// Node entry in a scene resource
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NodeSpec {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub position: Point,
    pub kind: NodeKind,
}

/// Parsed scene resource
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SceneDocument {
    pub class: String,
    pub width: f32,
    pub height: f32,
    #[serde(default, rename = "node")]
    pub nodes: Vec<NodeSpec>,
}

impl SceneDocument {
    pub fn from_toml(content: &str) -> Result<Self, SceneError> {
        Ok(toml::from_str(content)?)
    }

    pub fn from_json(content: &str) -> Result<Self, SceneError> {
        Ok(serde_json::from_str(content)?)
    }

    /// Build the scene graph, adding nodes in document order
    pub fn into_scene(self) -> Result<Scene, SceneError> {
        let valid = |v: f32| v.is_finite() && v > 0.0;
        if !valid(self.width) || !valid(self.height) {
            return Err(SceneError::InvalidSize {
                width: self.width,
                height: self.height,
            });
        }

        let mut scene = Scene::new(Size::new(self.width, self.height));
        for spec in self.nodes {
            let mut node = SceneNode::new(spec.kind).with_position(spec.position);
            node.name = spec.name;
            scene.add_child(node);
        }
        Ok(scene)
    }
}

/// Source of scene resources and action libraries
pub trait SceneLoader {
    /// Load a scene resource by name. `Ok(None)` means no such resource.
    fn load_scene(&self, name: &str) -> Result<Option<SceneDocument>, SceneError>;

    /// Load a named action library. `Ok(None)` means no such library.
    fn load_actions(&self, _name: &str) -> Result<Option<ActionLibrary>, SceneError> {
        Ok(None)
    }
}

/// Create the scene backing an [`InteractiveScene`](crate::InteractiveScene).
///
/// Fails if the resource is missing or declares a different class. Callers
/// treat any error here as a fatal startup error.
pub fn create_scene<L: SceneLoader + ?Sized>(loader: &L, name: &str) -> Result<Scene, SceneError> {
    let document = loader
        .load_scene(name)?
        .ok_or_else(|| SceneError::NotFound(name.to_string()))?;

    if document.class != SCENE_CLASS {
        return Err(SceneError::WrongClass {
            name: name.to_string(),
            found: document.class,
            expected: SCENE_CLASS,
        });
    }

    let mut scene = document.into_scene()?;
    scene.set_scale_mode(ScaleMode::AspectFill);

    info!(
        name = %name,
        width = scene.size().width,
        height = scene.size().height,
        nodes = scene.children().len(),
        "Scene created"
    );
    Ok(scene)
}

/// Load a named action library, falling back to an empty one
pub fn load_action_library<L: SceneLoader + ?Sized>(
    loader: &L,
    name: &str,
) -> Result<ActionLibrary, SceneError> {
    match loader.load_actions(name)? {
        Some(library) => {
            info!(name = %name, actions = library.len(), "Action library loaded");
            Ok(library)
        }
        None => {
            debug!(name = %name, "Action library not found, named actions disabled");
            Ok(ActionLibrary::default())
        }
    }
}

#[derive(Debug, Clone, Copy)]
enum Format {
    Toml,
    Json,
}

/// Loads resources from `<root>/<name>.toml`, falling back to `<root>/<name>.json`
#[derive(Debug, Clone)]
pub struct FileSceneLoader {
    root: PathBuf,
}

impl FileSceneLoader {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    fn locate(&self, name: &str) -> Option<(PathBuf, Format)> {
        [("toml", Format::Toml), ("json", Format::Json)]
            .into_iter()
            .map(|(ext, format)| (self.root.join(format!("{}.{}", name, ext)), format))
            .find(|(path, _)| path.is_file())
    }

    fn read(&self, name: &str) -> Result<Option<(String, Format, PathBuf)>, SceneError> {
        let Some((path, format)) = self.locate(name) else {
            return Ok(None);
        };
        let content = std::fs::read_to_string(&path)?;
        Ok(Some((content, format, path)))
    }
}

impl SceneLoader for FileSceneLoader {
    fn load_scene(&self, name: &str) -> Result<Option<SceneDocument>, SceneError> {
        let Some((content, format, path)) = self.read(name)? else {
            debug!(root = %self.root.display(), name = %name, "No scene resource");
            return Ok(None);
        };
        debug!(path = %path.display(), "Reading scene resource");

        let document = match format {
            Format::Toml => SceneDocument::from_toml(&content)?,
            Format::Json => SceneDocument::from_json(&content)?,
        };
        Ok(Some(document))
    }

    fn load_actions(&self, name: &str) -> Result<Option<ActionLibrary>, SceneError> {
        let Some((content, format, path)) = self.read(name)? else {
            return Ok(None);
        };
        debug!(path = %path.display(), "Reading action library");

        let library = match format {
            Format::Toml => ActionLibrary::from_toml(&content)?,
            Format::Json => ActionLibrary::from_json(&content)?,
        };
        Ok(Some(library))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    const GAME_SCENE: &str = r#"
class = "InteractiveScene"
width = 1024.0
height = 768.0

[[node]]
name = "helloLabel"
[node.kind.label]
text = "Hello, World!"
font_size = 65.0

[[node]]
name = "frame"
position = { x = 100.0, y = -50.0 }
[node.kind.shape]
size = { width = 40.0, height = 40.0 }
corner_radius = 8.0
"#;

    /// Loader stub that never finds anything
    struct EmptyLoader;

    impl SceneLoader for EmptyLoader {
        fn load_scene(&self, _name: &str) -> Result<Option<SceneDocument>, SceneError> {
            Ok(None)
        }
    }

    #[test]
    fn test_create_scene_from_toml_file() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("GameScene.toml"), GAME_SCENE).unwrap();

        let scene = create_scene(&FileSceneLoader::new(dir.path()), "GameScene").unwrap();
        assert_eq!(scene.size(), Size::new(1024.0, 768.0));
        assert_eq!(scene.scale_mode(), ScaleMode::AspectFill);
        assert_eq!(scene.children().len(), 2);

        let label = scene.child_node("//helloLabel").unwrap();
        assert_eq!(label.as_label().unwrap().font_size, 65.0);
        let frame = scene.child_node("frame").unwrap();
        assert_eq!(frame.position, Point::new(100.0, -50.0));
    }

    #[test]
    fn test_create_scene_from_json_file() {
        let dir = TempDir::new().unwrap();
        let json = r#"{
            "class": "InteractiveScene",
            "width": 640.0,
            "height": 480.0,
            "node": [
                {"name": "helloLabel", "kind": {"label": {"text": "Hi"}}}
            ]
        }"#;
        std::fs::write(dir.path().join("GameScene.json"), json).unwrap();

        let scene = create_scene(&FileSceneLoader::new(dir.path()), "GameScene").unwrap();
        assert_eq!(scene.size(), Size::new(640.0, 480.0));
        assert_eq!(scene.child_node("helloLabel").unwrap().as_label().unwrap().text, "Hi");
    }

    #[test]
    fn test_missing_resource_is_fatal() {
        let result = create_scene(&EmptyLoader, "GameScene");
        assert!(matches!(result, Err(SceneError::NotFound(name)) if name == "GameScene"));

        let dir = TempDir::new().unwrap();
        let result = create_scene(&FileSceneLoader::new(dir.path()), "GameScene");
        assert!(matches!(result, Err(SceneError::NotFound(_))));
    }

    #[test]
    fn test_wrong_class_is_fatal() {
        let dir = TempDir::new().unwrap();
        let other = GAME_SCENE.replace("InteractiveScene", "MenuScene");
        std::fs::write(dir.path().join("GameScene.toml"), other).unwrap();

        let result = create_scene(&FileSceneLoader::new(dir.path()), "GameScene");
        assert!(matches!(
            result,
            Err(SceneError::WrongClass { found, .. }) if found == "MenuScene"
        ));
    }

    #[test]
    fn test_invalid_size_and_parse_errors() {
        let document = SceneDocument {
            class: SCENE_CLASS.to_string(),
            width: 0.0,
            height: 768.0,
            nodes: Vec::new(),
        };
        assert!(matches!(
            document.into_scene(),
            Err(SceneError::InvalidSize { .. })
        ));

        assert!(matches!(
            SceneDocument::from_toml("class = "),
            Err(SceneError::TomlError(_))
        ));
        assert!(matches!(
            SceneDocument::from_json("{"),
            Err(SceneError::JsonError(_))
        ));
    }

    #[test]
    fn test_action_library_fallback() {
        let dir = TempDir::new().unwrap();
        let loader = FileSceneLoader::new(dir.path());
        assert!(load_action_library(&loader, "Actions").unwrap().is_empty());
        assert!(load_action_library(&EmptyLoader, "Actions").unwrap().is_empty());

        std::fs::write(
            dir.path().join("Actions.toml"),
            "[actions.Pulse]\ntype = \"fade_out\"\nduration = 0.2\n",
        )
        .unwrap();
        let library = load_action_library(&loader, "Actions").unwrap();
        assert!(library.get("Pulse").is_some());
    }
}
