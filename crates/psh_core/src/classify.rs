//! Node classification table.
//!
//! Every child element of the object hierarchy maps to one [`NodeKind`],
//! which decides whether it becomes a scene node and what is read from it.

use crate::xml::XmlElement;

/// What an element of the object hierarchy represents.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum NodeKind {
    /// Any element with an `xsi:type` attribute
    TypeDiscriminated,

    /// `<folder>`: grouping container
    Folder,

    /// `<seat>`
    Seat,

    /// `<subzone>` inside a sound zone: placement only
    Subzone,

    /// `<emitter>` inside a point sound
    Emitter,

    /// Anything else; traversed but not materialised
    Unclassified,
}

impl NodeKind {
    /// Classify an element.
    ///
    /// The type discriminator wins over the tag name, so a typed `<seat>` is
    /// still a single node.
    pub fn classify(element: &XmlElement) -> Self {
        if element.has_type_discriminator() {
            Self::TypeDiscriminated
        } else {
            Self::from_tag(&element.local_name)
        }
    }

    /// Classify by local tag name alone.
    pub fn from_tag(local_name: &str) -> Self {
        match local_name {
            "folder" => Self::Folder,
            "seat" => Self::Seat,
            "subzone" => Self::Subzone,
            "emitter" => Self::Emitter,
            _ => Self::Unclassified,
        }
    }

    pub const fn creates_node(self) -> bool {
        !matches!(self, Self::Unclassified)
    }

    pub const fn extracts_transform(self) -> bool {
        matches!(
            self,
            Self::TypeDiscriminated | Self::Seat | Self::Subzone | Self::Emitter
        )
    }

    pub const fn extracts_metadata(self) -> bool {
        matches!(self, Self::TypeDiscriminated | Self::Seat | Self::Emitter)
    }
}
