//! Scene graph builder.
//!
//! Walks the object hierarchy below `gameObjectFolder`, classifies each
//! element and mirrors the qualifying ones into a [`SceneHost`].

use crate::classify::NodeKind;
use crate::extract::{extract_metadata, extract_transform};
use crate::host::SceneHost;
use crate::import::{ImportError, ImportResult};
use crate::xml::XmlElement;

/// Recursive builder over a host.
///
/// The walk is depth-first and in document order, so every node's children
/// are created in the same order as their elements.
pub struct SceneBuilder<'h, H: SceneHost> {
    host: &'h mut H,
    created: usize,
}

impl<'h, H: SceneHost> SceneBuilder<'h, H> {
    pub fn new(host: &'h mut H) -> Self {
        Self { host, created: 0 }
    }

    /// Number of scene nodes created so far.
    pub fn created(&self) -> usize {
        self.created
    }

    /// Mirror the children of `root` under `parent`.
    ///
    /// Elements that do not qualify create nothing, but their children are
    /// still walked and attach to the nearest created ancestor.
    pub fn build(&mut self, root: &XmlElement, parent: Option<H::Handle>) -> ImportResult<()> {
        for child in root.child_elements() {
            let kind = NodeKind::classify(child);

            let context = if kind.creates_node() {
                Some(self.create(child, kind, parent)?)
            } else {
                parent
            };

            if child.has_children() {
                self.build(child, context)?;
            }
        }

        Ok(())
    }

    fn create(&mut self, element: &XmlElement, kind: NodeKind, parent: Option<H::Handle>) -> ImportResult<H::Handle> {
        let name = element
            .attribute("name")
            .ok_or_else(|| ImportError::MissingName {
                tag: element.name.clone(),
            })?;

        log::trace!("Creating {:?} node '{}' from <{}>", kind, name, element.name);

        let node = self.host.create_node(name);
        if let Some(parent) = parent {
            self.host.set_parent(node, parent);
        }
        self.created += 1;

        if kind.extracts_transform() {
            if let Some(transform) = extract_transform(element)? {
                self.host.set_local_transform(node, &transform);
            }
        }

        if kind.extracts_metadata() {
            for record in extract_metadata(element) {
                self.host.attach_metadata(node, record);
            }
        }

        Ok(node)
    }
}

/// Build the children of `root` into `host` under `parent`.
pub fn build<H: SceneHost>(host: &mut H, root: &XmlElement, parent: Option<H::Handle>) -> ImportResult<usize> {
    let mut builder = SceneBuilder::new(host);
    builder.build(root, parent)?;
    Ok(builder.created())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::StagingHost;
    use crate::scene::{MetadataRecord, SceneNode, Transform};
    use psh_math::Vec3;

    fn build_tree(folder: &XmlElement) -> ImportResult<SceneNode> {
        let mut host = StagingHost::new();
        let root = host.create_node("root");
        build(&mut host, folder, Some(root))?;
        Ok(host.into_tree(root).unwrap())
    }

    fn typed(name: &str) -> XmlElement {
        XmlElement::new("gameObject")
            .with_attribute("xsi:type", "foo")
            .with_attribute("name", name)
    }

    /// Records host calls in order.
    #[derive(Default)]
    struct RecordingHost {
        calls: Vec<String>,
    }

    impl SceneHost for RecordingHost {
        type Handle = usize;

        fn create_node(&mut self, name: &str) -> usize {
            self.calls.push(format!("create {name}"));
            self.calls.len()
        }

        fn set_parent(&mut self, child: usize, parent: usize) {
            self.calls.push(format!("parent {child} {parent}"));
        }

        fn set_local_transform(&mut self, node: usize, _transform: &Transform) {
            self.calls.push(format!("transform {node}"));
        }

        fn attach_metadata(&mut self, node: usize, record: MetadataRecord) {
            self.calls.push(format!("metadata {node} {}", record.len()));
        }
    }

    #[test]
    fn test_empty_folder() {
        let tree = build_tree(&XmlElement::new("gameObjectFolder")).unwrap();
        assert!(tree.children.is_empty());
    }

    #[test]
    fn test_folder_has_no_metadata_or_transform() {
        let folder = XmlElement::new("gameObjectFolder").with_child(
            XmlElement::new("folder")
                .with_attribute("name", "Lobby")
                .with_child(XmlElement::new("translate").with_text("9 9 9")),
        );

        let tree = build_tree(&folder).unwrap();

        assert_eq!(tree.children.len(), 1);
        let lobby = &tree.children[0];
        assert_eq!(lobby.name, "Lobby");
        assert!(lobby.metadata.is_empty());
        assert!(lobby.transform.is_identity());
        assert!(lobby.children.is_empty());
    }

    #[test]
    fn test_typed_node_translate_and_metadata() {
        let folder = XmlElement::new("gameObjectFolder")
            .with_child(typed("Bar").with_child(XmlElement::new("translate").with_text("1 2 3")));

        let tree = build_tree(&folder).unwrap();
        let bar = tree.find_child("Bar").unwrap();

        assert_eq!(bar.transform.translation, Vec3::new(-1.0, 2.0, 3.0));
        assert_eq!(bar.metadata.len(), 1);
        assert_eq!(
            bar.metadata[0].iter().collect::<Vec<_>>(),
            vec![("xsi:type", "foo"), ("name", "Bar")]
        );
    }

    #[test]
    fn test_subzone_gets_transform_without_metadata() {
        let folder = XmlElement::new("gameObjectFolder").with_child(
            typed("Zone").with_child(
                XmlElement::new("subzone")
                    .with_attribute("name", "Inner")
                    .with_child(XmlElement::new("scale").with_text("3 3 3")),
            ),
        );

        let tree = build_tree(&folder).unwrap();
        let inner = tree.find_descendant("Inner").unwrap();

        assert!(inner.metadata.is_empty());
        assert_eq!(inner.transform.scale, Vec3::splat(3.0));
        assert_eq!(tree.find_child("Zone").unwrap().children.len(), 1);
    }

    #[test]
    fn test_seat_and_emitter_get_metadata() {
        let folder = XmlElement::new("gameObjectFolder")
            .with_child(XmlElement::new("seat").with_attribute("name", "Seat_A"))
            .with_child(
                XmlElement::new("emitter")
                    .with_attribute("name", "Spray")
                    .with_attribute("pitch", "1.2"),
            );

        let tree = build_tree(&folder).unwrap();

        assert_eq!(tree.find_child("Seat_A").unwrap().metadata.len(), 1);
        let spray = tree.find_child("Spray").unwrap();
        assert_eq!(spray.metadata[0].get("pitch"), Some("1.2"));
    }

    #[test]
    fn test_leaf_property_adds_record_not_node() {
        let folder = XmlElement::new("gameObjectFolder").with_child(
            typed("Chair").with_child(
                XmlElement::new("material")
                    .with_attribute("slot", "0")
                    .with_attribute("ref", "wood"),
            ),
        );

        let tree = build_tree(&folder).unwrap();
        let chair = tree.find_child("Chair").unwrap();

        assert_eq!(tree.node_count(), 2);
        assert!(chair.children.is_empty());
        assert_eq!(chair.metadata.len(), 2);
        assert_eq!(chair.metadata[1].keys().collect::<Vec<_>>(), vec!["slot", "ref"]);
    }

    #[test]
    fn test_unclassified_wrapper_is_transparent() {
        let folder = XmlElement::new("gameObjectFolder").with_child(
            XmlElement::new("folder").with_attribute("name", "Outer").with_child(
                XmlElement::new("group")
                    .with_attribute("name", "NotANode")
                    .with_child(XmlElement::new("seat").with_attribute("name", "Deep")),
            ),
        );

        let tree = build_tree(&folder).unwrap();
        let outer = tree.find_child("Outer").unwrap();

        assert_eq!(tree.node_count(), 3);
        assert_eq!(outer.children.len(), 1);
        assert_eq!(outer.children[0].name, "Deep");
        assert!(tree.find_descendant("NotANode").is_none());
    }

    #[test]
    fn test_unclassified_at_top_attaches_to_root() {
        let folder = XmlElement::new("gameObjectFolder").with_child(
            XmlElement::new("layer").with_child(typed("Loose")),
        );

        let tree = build_tree(&folder).unwrap();
        assert_eq!(tree.children.len(), 1);
        assert_eq!(tree.children[0].name, "Loose");
    }

    #[test]
    fn test_sibling_order_preserved() {
        let folder = XmlElement::new("gameObjectFolder")
            .with_child(typed("C"))
            .with_child(XmlElement::new("folder").with_attribute("name", "A"))
            .with_child(typed("B"));

        let tree = build_tree(&folder).unwrap();
        let names: Vec<&str> = tree.children.iter().map(|n| n.name.as_str()).collect();
        assert_eq!(names, vec!["C", "A", "B"]);
    }

    #[test]
    fn test_missing_name_aborts() {
        let folder = XmlElement::new("gameObjectFolder")
            .with_child(typed("Fine"))
            .with_child(XmlElement::new("emitter").with_attribute("pitch", "1"));

        let err = build_tree(&folder).unwrap_err();
        assert!(matches!(err, ImportError::MissingName { ref tag } if tag == "emitter"));
    }

    #[test]
    fn test_bad_number_in_nested_node_aborts() {
        let folder = XmlElement::new("gameObjectFolder").with_child(
            XmlElement::new("folder").with_attribute("name", "F").with_child(
                typed("T").with_child(XmlElement::new("rotate").with_text("0 0 x")),
            ),
        );

        assert!(matches!(build_tree(&folder), Err(ImportError::NumberFormat { .. })));
    }

    #[test]
    fn test_build_is_deterministic() {
        let folder = XmlElement::new("gameObjectFolder").with_child(
            typed("A")
                .with_child(XmlElement::new("rotate").with_text("0.1 0.2 0.3"))
                .with_child(XmlElement::new("seat").with_attribute("name", "S")),
        );

        assert_eq!(build_tree(&folder).unwrap(), build_tree(&folder).unwrap());
    }

    #[test]
    fn test_host_call_sequence() {
        let folder = XmlElement::new("gameObjectFolder").with_child(
            typed("A")
                .with_child(XmlElement::new("translate").with_text("1 0 0"))
                .with_child(XmlElement::new("subzone").with_attribute("name", "Z")),
        );

        let mut host = RecordingHost::default();
        let created = build(&mut host, &folder, None).unwrap();

        // <subzone name="Z"/> is also a leaf property of A
        assert_eq!(created, 2);
        assert_eq!(
            host.calls,
            vec![
                "create A",
                "transform 1",
                "metadata 1 2",
                "metadata 1 1",
                "create Z",
                "parent 5 1",
            ]
        );
    }
}
