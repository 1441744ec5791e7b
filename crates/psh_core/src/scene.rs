//! Scene graph types.
//!
//! The importer's output: a tree of named nodes, each with a local
//! transform and any number of metadata records.

use psh_math::{Quat, Vec3};
use serde::Serialize;

use crate::host::SceneHost;

/// Local translation, rotation and scale of a node.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct Transform {
    /// Translation
    pub translation: Vec3,

    /// Rotation (as quaternion)
    pub rotation: Quat,

    /// Scale
    pub scale: Vec3,
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            translation: Vec3::ZERO,
            rotation: Quat::IDENTITY,
            scale: Vec3::ONE,
        }
    }
}

impl Transform {
    /// Create a new transform with only scale.
    pub fn from_scale(scale: Vec3) -> Self {
        Self {
            scale,
            ..Default::default()
        }
    }

    pub fn is_identity(&self) -> bool {
        *self == Self::default()
    }
}

/// One attribute captured as metadata.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct KeyValuePair {
    pub key: String,
    pub value: String,
}

/// Flattened attributes of one XML element, in document order.
///
/// Keys are unique; inserting an existing key replaces its value in place.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct MetadataRecord {
    pairs: Vec<KeyValuePair>,
}

impl MetadataRecord {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        let key = key.into();
        let value = value.into();
        match self.pairs.iter_mut().find(|pair| pair.key == key) {
            Some(pair) => pair.value = value,
            None => self.pairs.push(KeyValuePair { key, value }),
        }
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.pairs
            .iter()
            .find(|pair| pair.key == key)
            .map(|pair| pair.value.as_str())
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.pairs.iter().map(|pair| pair.key.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.pairs
            .iter()
            .map(|pair| (pair.key.as_str(), pair.value.as_str()))
    }

    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for MetadataRecord {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut record = Self::new();
        for (key, value) in iter {
            record.insert(key, value);
        }
        record
    }
}

/// A node in the imported scene graph.
///
/// Children are owned by their parent and kept in document order.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct SceneNode {
    pub name: String,

    /// Transform relative to the parent
    pub transform: Transform,

    /// Attached metadata records, in attachment order
    pub metadata: Vec<MetadataRecord>,

    pub children: Vec<SceneNode>,
}

impl SceneNode {
    /// Create a node with an identity transform.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    /// Find an immediate child by name.
    pub fn find_child(&self, name: &str) -> Option<&SceneNode> {
        self.children.iter().find(|child| child.name == name)
    }

    /// Depth-first search of the subtree (excluding self) by name.
    pub fn find_descendant(&self, name: &str) -> Option<&SceneNode> {
        self.children.iter().find_map(|child| {
            if child.name == name {
                Some(child)
            } else {
                child.find_descendant(name)
            }
        })
    }

    /// Number of nodes in this subtree, including self.
    pub fn node_count(&self) -> usize {
        1 + self.children.iter().map(SceneNode::node_count).sum::<usize>()
    }

    /// Number of metadata records in this subtree.
    pub fn metadata_count(&self) -> usize {
        self.metadata.len() + self.children.iter().map(SceneNode::metadata_count).sum::<usize>()
    }

    /// Recreate this subtree in a host, parenting it under `parent`.
    ///
    /// Nodes are created parent-first and children in order, so the host
    /// sees the same sibling order as the document.
    pub fn replay_into<H: SceneHost>(&self, host: &mut H, parent: Option<H::Handle>) -> H::Handle {
        let handle = host.create_node(&self.name);
        if let Some(parent) = parent {
            host.set_parent(handle, parent);
        }
        if !self.transform.is_identity() {
            host.set_local_transform(handle, &self.transform);
        }
        for record in &self.metadata {
            host.attach_metadata(handle, record.clone());
        }
        for child in &self.children {
            child.replay_into(host, Some(handle));
        }
        handle
    }
}
