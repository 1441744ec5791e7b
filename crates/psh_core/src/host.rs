//! Host capability used by the scene builder.
//!
//! The builder never touches engine objects directly. It drives a
//! [`SceneHost`], which an engine integration implements over its own node
//! types. [`StagingHost`] is the in-memory implementation the import
//! pipeline builds into before anything is handed to a real host.

use crate::scene::{MetadataRecord, SceneNode, Transform};

/// Operations the builder needs from a scene-graph host.
pub trait SceneHost {
    /// Host-side reference to a created node
    type Handle: Copy;

    /// Create an unparented node with an identity transform.
    fn create_node(&mut self, name: &str) -> Self::Handle;

    /// Attach `child` as the last child of `parent`.
    fn set_parent(&mut self, child: Self::Handle, parent: Self::Handle);

    fn set_local_transform(&mut self, node: Self::Handle, transform: &Transform);

    /// Attach a metadata record after any already attached to `node`.
    fn attach_metadata(&mut self, node: Self::Handle, record: MetadataRecord);
}

/// Index of a node inside a [`StagingHost`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct NodeId(usize);

#[derive(Debug)]
struct StagedNode {
    name: String,
    transform: Transform,
    metadata: Vec<MetadataRecord>,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
}

/// Arena-backed host that assembles a [`SceneNode`] tree.
#[derive(Debug, Default)]
pub struct StagingHost {
    nodes: Vec<StagedNode>,
}

impl StagingHost {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of nodes created so far.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Parent of a node, if it has been attached.
    pub fn parent(&self, node: NodeId) -> Option<NodeId> {
        self.nodes.get(node.0).and_then(|staged| staged.parent)
    }

    /// Assemble the subtree rooted at `root`.
    ///
    /// Returns `None` if `root` was not created by this host.
    pub fn into_tree(self, root: NodeId) -> Option<SceneNode> {
        let mut slots: Vec<Option<StagedNode>> = self.nodes.into_iter().map(Some).collect();
        assemble(&mut slots, root)
    }
}

fn assemble(slots: &mut [Option<StagedNode>], id: NodeId) -> Option<SceneNode> {
    let staged = slots.get_mut(id.0)?.take()?;

    let mut node = SceneNode {
        name: staged.name,
        transform: staged.transform,
        metadata: staged.metadata,
        children: Vec::with_capacity(staged.children.len()),
    };
    for child in staged.children {
        if let Some(child) = assemble(slots, child) {
            node.children.push(child);
        }
    }

    Some(node)
}

impl SceneHost for StagingHost {
    type Handle = NodeId;

    fn create_node(&mut self, name: &str) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(StagedNode {
            name: name.to_string(),
            transform: Transform::default(),
            metadata: Vec::new(),
            parent: None,
            children: Vec::new(),
        });
        id
    }

    fn set_parent(&mut self, child: NodeId, parent: NodeId) {
        if child == parent || parent.0 >= self.nodes.len() {
            return;
        }

        // Reparenting detaches from the previous parent first
        let previous = match self.nodes.get_mut(child.0) {
            Some(staged) => staged.parent.replace(parent),
            None => return,
        };
        if let Some(previous) = previous {
            self.nodes[previous.0].children.retain(|&id| id != child);
        }
        self.nodes[parent.0].children.push(child);
    }

    fn set_local_transform(&mut self, node: NodeId, transform: &Transform) {
        if let Some(staged) = self.nodes.get_mut(node.0) {
            staged.transform = *transform;
        }
    }

    fn attach_metadata(&mut self, node: NodeId, record: MetadataRecord) {
        if let Some(staged) = self.nodes.get_mut(node.0) {
            staged.metadata.push(record);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use psh_math::Vec3;

    #[test]
    fn test_staging_host_assembles_tree_in_order() {
        let mut host = StagingHost::new();
        let root = host.create_node("root");
        let a = host.create_node("a");
        let b = host.create_node("b");
        let c = host.create_node("c");
        host.set_parent(a, root);
        host.set_parent(b, root);
        host.set_parent(c, a);
        host.set_local_transform(c, &Transform {
            translation: Vec3::X,
            ..Default::default()
        });
        host.attach_metadata(b, [("k", "v")].into_iter().collect());

        assert_eq!(host.len(), 4);
        assert_eq!(host.parent(c), Some(a));

        let tree = host.into_tree(root).unwrap();
        let names: Vec<&str> = tree.children.iter().map(|n| n.name.as_str()).collect();
        assert_eq!(names, vec!["a", "b"]);
        assert_eq!(tree.children[0].children[0].transform.translation, Vec3::X);
        assert_eq!(tree.children[1].metadata[0].get("k"), Some("v"));
    }

    #[test]
    fn test_staging_host_reparent() {
        let mut host = StagingHost::new();
        let root = host.create_node("root");
        let a = host.create_node("a");
        let b = host.create_node("b");
        host.set_parent(a, root);
        host.set_parent(b, root);
        host.set_parent(a, b);

        let tree = host.into_tree(root).unwrap();
        assert_eq!(tree.children.len(), 1);
        assert_eq!(tree.children[0].name, "b");
        assert_eq!(tree.children[0].children[0].name, "a");
    }

    #[test]
    fn test_into_tree_unknown_root() {
        let host = StagingHost::new();
        assert!(host.into_tree(NodeId(3)).is_none());
    }
}
