//! High-level scene import.
//!
//! This module provides the main entry points for turning a scene file into
//! a [`SceneNode`] tree, and for handing the result to an engine host.
//!
//! An import either succeeds completely or fails without exposing any part
//! of the graph: the walk always builds into a [`StagingHost`] first.

use std::path::Path;

use psh_math::Vec3;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::builder::SceneBuilder;
use crate::host::{SceneHost, StagingHost};
use crate::scene::{SceneNode, Transform};
use crate::xml::{load, load_file, locate_root, ParseError, XmlTree};

/// Errors that can occur during scene import.
#[derive(Error, Debug)]
pub enum ImportError {
    /// Settings file could not be read
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Parse(#[from] ParseError),

    #[error("<{tag}> is missing its required `name` attribute")]
    MissingName { tag: String },

    #[error("Invalid number format in <{tag}>: {message}")]
    NumberFormat { tag: String, message: String },

    #[error("Invalid import settings: {0}")]
    Settings(#[from] serde_json::Error),
}

/// Result type for import operations.
pub type ImportResult<T> = Result<T, ImportError>;

/// Per-import options.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ImportSettings {
    /// Uniform scale applied to the graph root only
    pub scale: f32,

    /// Extra asset search paths, passed through to the host
    pub asset_search_paths: Vec<String>,

    /// Log the whole XML tree at debug level before building
    pub trace: bool,
}

impl Default for ImportSettings {
    fn default() -> Self {
        Self {
            scale: 1.0,
            asset_search_paths: vec![String::new()],
            trace: false,
        }
    }
}

impl ImportSettings {
    /// Parse settings from JSON; missing fields keep their defaults.
    pub fn from_json_str(json: &str) -> ImportResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn from_json_file<P: AsRef<Path>>(path: P) -> ImportResult<Self> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json_str(&json)
    }
}

/// A fully built scene, ready for registration with a host.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ImportedScene {
    /// Graph root, named after the source file
    pub root: SceneNode,

    /// Search paths from the settings, for the host's asset resolution
    pub asset_search_paths: Vec<String>,
}

/// Import a scene file.
///
/// The root node is named after the file stem.
///
/// # Example
///
/// ```ignore
/// use psh_core::import::{import_scene, ImportSettings};
///
/// let scene = import_scene("level.scene", &ImportSettings::default())?;
/// println!("Imported {} nodes", scene.root.node_count());
/// ```
pub fn import_scene<P: AsRef<Path>>(path: P, settings: &ImportSettings) -> ImportResult<ImportedScene> {
    let path = path.as_ref();
    let name = path
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("unnamed");

    let tree = load_file(path)?;
    let root = build_scene(&tree, name, settings)?;

    Ok(ImportedScene {
        root,
        asset_search_paths: settings.asset_search_paths.clone(),
    })
}

/// Import scene XML from a string (useful for testing).
pub fn import_scene_str(text: &str, name: &str, settings: &ImportSettings) -> ImportResult<ImportedScene> {
    let tree = load(text)?;
    let root = build_scene(&tree, name, settings)?;

    Ok(ImportedScene {
        root,
        asset_search_paths: settings.asset_search_paths.clone(),
    })
}

/// Build the scene graph for an already loaded document.
///
/// A document without `game/gameObjectFolder` yields a root with no children.
pub fn build_scene(tree: &XmlTree, name: &str, settings: &ImportSettings) -> ImportResult<SceneNode> {
    if settings.trace {
        log::debug!("Scene document:\n{}", tree.describe());
    }

    let mut host = StagingHost::new();
    let root = host.create_node(name);
    host.set_local_transform(root, &Transform::from_scale(Vec3::splat(settings.scale)));

    match locate_root(tree) {
        Ok(folder) => {
            let mut builder = SceneBuilder::new(&mut host);
            builder.build(folder, Some(root))?;
            log::info!("Imported '{}': {} scene nodes", name, builder.created());
        }
        Err(missing) => {
            log::warn!("{}; importing '{}' as an empty scene", missing, name);
        }
    }

    Ok(host
        .into_tree(root)
        .unwrap_or_else(|| SceneNode::new(name)))
}

/// Import scene XML and register the result with an engine host.
///
/// Nothing is created in `host` unless the whole import succeeds. Returns the
/// host handle of the root node.
pub fn import_into_host<H: SceneHost>(
    text: &str,
    name: &str,
    settings: &ImportSettings,
    host: &mut H,
) -> ImportResult<H::Handle> {
    let scene = import_scene_str(text, name, settings)?;
    Ok(scene.root.replay_into(host, None))
}
