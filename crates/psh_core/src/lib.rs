//! PSH Core - scene editor XML import.
//!
//! This crate provides:
//!
//! - **Document loading**: namespace-aware XML parsing into an owned tree
//! - **Scene graph types**: `SceneNode`, `Transform`, `MetadataRecord`
//! - **Scene building**: classification of object elements, Maya to engine
//!   handedness conversion and attribute metadata capture
//! - **Host integration**: the `SceneHost` capability an engine implements
//!
//! # Example
//!
//! ```ignore
//! use psh_core::{import_scene, ImportSettings};
//!
//! let scene = import_scene("level.scene", &ImportSettings::default())?;
//! println!("Imported {} nodes", scene.root.node_count());
//! ```

pub mod builder;
pub mod classify;
pub mod extract;
pub mod host;
pub mod import;
pub mod scene;
pub mod xml;

// Re-export commonly used types
pub use builder::SceneBuilder;
pub use classify::NodeKind;
pub use host::{NodeId, SceneHost, StagingHost};
pub use import::{
    build_scene, import_into_host, import_scene, import_scene_str, ImportError, ImportResult,
    ImportSettings, ImportedScene,
};
pub use scene::{KeyValuePair, MetadataRecord, SceneNode, Transform};
pub use xml::{load, locate_root, MissingRootError, ParseError, XmlElement, XmlTree};
