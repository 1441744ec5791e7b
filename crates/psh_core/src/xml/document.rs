//! Owned XML document model.
//!
//! The loader converts a parsed `roxmltree` document into these types so the
//! tree no longer borrows the source text. The builder only ever reads it.

use std::fmt::Write;

/// Prefix the scene editor schema is registered under.
pub const SCENE_EDITOR_PREFIX: &str = "gap";

/// Scene editor schema namespace.
pub const SCENE_EDITOR_NS: &str = "http://home.scedev.net/schema/sceneeditor/1_3_0";

/// XML Schema instance namespace (home of `xsi:type`).
pub const XSI_NS: &str = "http://www.w3.org/2001/XMLSchema-instance";

/// An attribute as written in the source document.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct XmlAttribute {
    /// Qualified name including any prefix (e.g. `xsi:type`)
    pub name: String,

    /// Name without prefix
    pub local_name: String,

    /// Resolved namespace URI, if the name was prefixed
    pub namespace: Option<String>,

    pub value: String,
}

impl XmlAttribute {
    /// Create an attribute from a possibly prefixed name, without namespace resolution.
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        let name = name.into();
        let local_name = local_part(&name).to_string();
        Self {
            name,
            local_name,
            namespace: None,
            value: value.into(),
        }
    }
}

/// A child of an element.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum XmlNode {
    Element(XmlElement),

    /// Text content (whitespace-only runs are dropped while loading)
    Text(String),

    Comment(String),
}

/// An XML element with its attributes in document order.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct XmlElement {
    /// Qualified tag name including any prefix
    pub name: String,

    /// Tag name without prefix
    pub local_name: String,

    /// Resolved namespace URI
    pub namespace: Option<String>,

    /// Attributes in document order; names are unique
    pub attributes: Vec<XmlAttribute>,

    /// Child nodes in document order
    pub children: Vec<XmlNode>,
}

impl XmlElement {
    /// Create an empty element from a possibly prefixed name.
    pub fn new(name: impl Into<String>) -> Self {
        let name = name.into();
        let local_name = local_part(&name).to_string();
        Self {
            name,
            local_name,
            ..Default::default()
        }
    }

    /// Append an attribute (builder style).
    pub fn with_attribute(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.push(XmlAttribute::new(name, value));
        self
    }

    /// Append a child element (builder style).
    pub fn with_child(mut self, child: XmlElement) -> Self {
        self.children.push(XmlNode::Element(child));
        self
    }

    /// Append a text node (builder style).
    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.children.push(XmlNode::Text(text.into()));
        self
    }

    /// Look up an attribute value by its qualified name.
    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|attr| attr.name == name)
            .map(|attr| attr.value.as_str())
    }

    pub fn has_attributes(&self) -> bool {
        !self.attributes.is_empty()
    }

    /// True if the element has any child node (elements, text or comments).
    pub fn has_children(&self) -> bool {
        !self.children.is_empty()
    }

    /// Iterate over child elements, skipping text and comments.
    pub fn child_elements(&self) -> impl Iterator<Item = &XmlElement> {
        self.children.iter().filter_map(|child| match child {
            XmlNode::Element(element) => Some(element),
            _ => None,
        })
    }

    /// Find the first immediate child element with the given local name.
    ///
    /// The prefix is ignored, so `transform` matches both `<transform>` and
    /// `<gap:transform>`.
    pub fn select_direct_child(&self, local_name: &str) -> Option<&XmlElement> {
        self.child_elements()
            .find(|child| child.local_name == local_name)
    }

    /// Find an immediate child by qualified name, resolving the prefix
    /// through the tree's namespace table.
    ///
    /// `gap:foo` matches any child named `foo` in the scene editor namespace,
    /// whatever prefix the document itself bound to it. An unprefixed name
    /// only matches children without a namespace.
    pub fn select_qualified_child(&self, tree: &XmlTree, qualified_name: &str) -> Option<&XmlElement> {
        match qualified_name.split_once(':') {
            Some((prefix, local)) => {
                let uri = tree.resolve_prefix(prefix)?;
                self.child_elements().find(|child| {
                    child.local_name == local && child.namespace.as_deref() == Some(uri)
                })
            }
            None => self
                .child_elements()
                .find(|child| child.local_name == qualified_name && child.namespace.is_none()),
        }
    }

    /// True if the element carries an `xsi:type` object-kind attribute.
    pub fn has_type_discriminator(&self) -> bool {
        self.attributes.iter().any(|attr| {
            attr.name == "xsi:type"
                || (attr.local_name == "type" && attr.namespace.as_deref() == Some(XSI_NS))
        })
    }

    /// Concatenated text of all descendant text nodes.
    pub fn inner_text(&self) -> String {
        let mut text = String::new();
        self.collect_text(&mut text);
        text
    }

    fn collect_text(&self, out: &mut String) {
        for child in &self.children {
            match child {
                XmlNode::Element(element) => element.collect_text(out),
                XmlNode::Text(text) => out.push_str(text),
                XmlNode::Comment(_) => {}
            }
        }
    }

    /// Number of elements in this subtree, including self.
    pub fn element_count(&self) -> usize {
        1 + self.child_elements().map(XmlElement::element_count).sum::<usize>()
    }
}

/// Prefix to namespace URI bindings, in registration order.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct NamespaceTable {
    bindings: Vec<(String, String)>,
}

impl NamespaceTable {
    /// Bind a prefix, replacing any earlier binding of the same prefix.
    pub fn register(&mut self, prefix: impl Into<String>, uri: impl Into<String>) {
        let prefix = prefix.into();
        let uri = uri.into();
        match self.bindings.iter_mut().find(|(p, _)| *p == prefix) {
            Some(binding) => binding.1 = uri,
            None => self.bindings.push((prefix, uri)),
        }
    }

    pub fn resolve(&self, prefix: &str) -> Option<&str> {
        self.bindings
            .iter()
            .find(|(p, _)| p == prefix)
            .map(|(_, uri)| uri.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.bindings.iter().map(|(p, u)| (p.as_str(), u.as_str()))
    }
}

/// A loaded scene document.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct XmlTree {
    /// The document element
    pub root: XmlElement,

    /// Prefixes declared on the document element plus `gap`
    pub namespaces: NamespaceTable,
}

impl XmlTree {
    /// Wrap a document element, registering the scene editor prefix.
    pub fn new(root: XmlElement) -> Self {
        Self::with_namespaces(root, NamespaceTable::default())
    }

    /// Wrap a document element with document-declared bindings.
    ///
    /// `gap` is registered last and always resolves to the scene editor schema.
    pub fn with_namespaces(root: XmlElement, mut namespaces: NamespaceTable) -> Self {
        namespaces.register(SCENE_EDITOR_PREFIX, SCENE_EDITOR_NS);
        Self { root, namespaces }
    }

    pub fn resolve_prefix(&self, prefix: &str) -> Option<&str> {
        self.namespaces.resolve(prefix)
    }

    /// Select the document element if its local name matches.
    pub fn select_direct_child(&self, local_name: &str) -> Option<&XmlElement> {
        (self.root.local_name == local_name).then_some(&self.root)
    }

    /// Indented dump of every element with its namespace and attributes.
    pub fn describe(&self) -> String {
        let mut out = String::new();
        describe_element(&self.root, "", &mut out);
        out
    }
}

fn describe_element(element: &XmlElement, indent: &str, out: &mut String) {
    let _ = writeln!(
        out,
        "{indent}Node: {}, Namespace: {}",
        element.name,
        element.namespace.as_deref().unwrap_or("")
    );
    for attr in &element.attributes {
        let _ = writeln!(out, "{indent}  Attribute: {}, Value: {}", attr.name, attr.value);
    }

    let child_indent = format!("{indent}  ");
    for child in element.child_elements() {
        describe_element(child, &child_indent, out);
    }
}

fn local_part(name: &str) -> &str {
    name.rsplit_once(':').map_or(name, |(_, local)| local)
}
