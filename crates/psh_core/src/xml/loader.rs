//! Scene document loading.
//!
//! Parses scene XML with `roxmltree`, converts it to the owned
//! [`XmlTree`] model and locates the `game/gameObjectFolder` root.

use std::path::Path;

use roxmltree::{Attribute, Document, Node, NodeType, ParsingOptions};
use thiserror::Error;

use super::document::{NamespaceTable, XmlAttribute, XmlElement, XmlNode, XmlTree};

/// Errors that can occur while loading a scene document.
#[derive(Error, Debug)]
pub enum ParseError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("XML is not well-formed: {0}")]
    Malformed(#[from] roxmltree::Error),
}

/// Result type for loading operations.
pub type ParseResult<T> = Result<T, ParseError>;

/// The `game/gameObjectFolder` chain is broken.
///
/// Recoverable: a scene without objects imports as an empty graph.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Scene root not found: no `{missing}` element")]
pub struct MissingRootError {
    /// First path segment that could not be found
    pub missing: &'static str,
}

/// Parse scene XML text into an [`XmlTree`].
///
/// The `gap` prefix is always registered for the scene editor schema,
/// whatever the document itself declares.
pub fn load(text: &str) -> ParseResult<XmlTree> {
    let options = ParsingOptions {
        allow_dtd: true,
        ..ParsingOptions::default()
    };
    let doc = Document::parse_with_options(text, options)?;
    let root = doc.root_element();

    let mut namespaces = NamespaceTable::default();
    for ns in root.namespaces() {
        if let Some(prefix) = ns.name() {
            namespaces.register(prefix, ns.uri());
        }
    }

    let tree = XmlTree::with_namespaces(convert_element(root), namespaces);
    log::debug!(
        "Loaded scene document: {} elements under <{}>",
        tree.root.element_count(),
        tree.root.name
    );
    Ok(tree)
}

/// Read and parse a scene file.
pub fn load_file<P: AsRef<Path>>(path: P) -> ParseResult<XmlTree> {
    let text = std::fs::read_to_string(path)?;
    load(&text)
}

/// Find a single immediate child by local name, ignoring any prefix.
pub fn select_direct_child<'a>(node: &'a XmlElement, local_name: &str) -> Option<&'a XmlElement> {
    node.select_direct_child(local_name)
}

/// Locate the `game/gameObjectFolder` element.
pub fn locate_root(tree: &XmlTree) -> Result<&XmlElement, MissingRootError> {
    let game = tree
        .select_direct_child("game")
        .ok_or(MissingRootError { missing: "game" })?;

    select_direct_child(game, "gameObjectFolder").ok_or(MissingRootError {
        missing: "gameObjectFolder",
    })
}

fn convert_element(node: Node<'_, '_>) -> XmlElement {
    let tag = node.tag_name();
    let local_name = tag.name().to_string();
    let namespace = tag.namespace();

    let attributes = node
        .attributes()
        .map(|attr| XmlAttribute {
            name: attribute_source_name(node, &attr)
                .unwrap_or_else(|| qualified_name(node, attr.name(), attr.namespace())),
            local_name: attr.name().to_string(),
            namespace: attr.namespace().map(str::to_string),
            value: attr.value().to_string(),
        })
        .collect();

    let mut children = Vec::new();
    for child in node.children() {
        match child.node_type() {
            NodeType::Element => children.push(XmlNode::Element(convert_element(child))),
            NodeType::Text => {
                let text = child.text().unwrap_or_default();
                if !text.trim().is_empty() {
                    children.push(XmlNode::Text(text.to_string()));
                }
            }
            NodeType::Comment => {
                children.push(XmlNode::Comment(child.text().unwrap_or_default().to_string()));
            }
            NodeType::Root | NodeType::PI => {}
        }
    }

    XmlElement {
        name: element_source_name(node, &local_name)
            .unwrap_or_else(|| qualified_name(node, &local_name, namespace)),
        local_name,
        namespace: namespace.map(str::to_string),
        attributes,
        children,
    }
}

/// Attribute name exactly as written, prefix included.
fn attribute_source_name(node: Node<'_, '_>, attr: &Attribute<'_, '_>) -> Option<String> {
    let written = node.document().input_text().get(attr.range_qname())?;
    matches_local(written, attr.name()).then(|| written.to_string())
}

/// Tag name exactly as written in the start tag.
fn element_source_name(node: Node<'_, '_>, local: &str) -> Option<String> {
    let text = node.document().input_text();
    let tag = text.get(node.range().start..)?.strip_prefix('<')?;
    let end = tag.find(|c: char| c.is_whitespace() || c == '/' || c == '>')?;
    let written = &tag[..end];
    matches_local(written, local).then(|| written.to_string())
}

/// Guards against ranges that do not point at the name (entity expansion).
fn matches_local(written: &str, local: &str) -> bool {
    written.rsplit_once(':').map_or(written, |(_, l)| l) == local
}

/// Rebuild `prefix:local` from a resolved name.
fn qualified_name(node: Node<'_, '_>, local: &str, namespace: Option<&str>) -> String {
    match namespace.and_then(|uri| node.lookup_prefix(uri)) {
        Some(prefix) if !prefix.is_empty() => format!("{prefix}:{local}"),
        _ => local.to_string(),
    }
}
