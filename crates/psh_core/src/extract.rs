//! Transform and metadata extraction from object elements.

use psh_math::{convert_euler_to_target, flip_translation, Mat4, Mat4Ext, Vec3};

use crate::import::{ImportError, ImportResult};
use crate::scene::{MetadataRecord, Transform};
use crate::xml::XmlElement;

/// Read an element's local transform from its direct children.
///
/// `transform` (16 values) is applied first, then `translate`, `rotate` and
/// `scale` (3 values each), each overwriting only the component it sets.
/// Returns `None` when none of them is present.
pub fn extract_transform(element: &XmlElement) -> ImportResult<Option<Transform>> {
    let matrix_node = element.select_direct_child("transform");
    let translate_node = element.select_direct_child("translate");
    let rotate_node = element.select_direct_child("rotate");
    let scale_node = element.select_direct_child("scale");

    if matrix_node.is_none() && translate_node.is_none() && rotate_node.is_none() && scale_node.is_none() {
        return Ok(None);
    }

    let mut transform = Transform::default();

    if let Some(node) = matrix_node {
        let values = parse_floats::<16>(node)?;
        let (scale, rotation, translation) = Mat4::from_maya_tokens(&values).decompose_lossy();
        transform.translation = flip_translation(translation);
        transform.rotation = rotation;
        transform.scale = scale;
    }

    if let Some(node) = translate_node {
        let values = parse_floats::<3>(node)?;
        transform.translation = flip_translation(Vec3::from_array(values));
    }

    if let Some(node) = rotate_node {
        // Radians, Maya XYZ order
        let values = parse_floats::<3>(node)?;
        transform.rotation = convert_euler_to_target(Vec3::from_array(values));
    }

    if let Some(node) = scale_node {
        let values = parse_floats::<3>(node)?;
        transform.scale = Vec3::from_array(values);
    }

    Ok(Some(transform))
}

/// Build the metadata records for an object element.
///
/// The first record holds the element's own attributes. Every direct child
/// that has attributes but no children of its own adds one more record.
pub fn extract_metadata(element: &XmlElement) -> Vec<MetadataRecord> {
    let mut records = vec![record_from_attributes(element)];

    records.extend(
        element
            .child_elements()
            .filter(|child| child.has_attributes() && !child.has_children())
            .map(record_from_attributes),
    );

    records
}

fn record_from_attributes(element: &XmlElement) -> MetadataRecord {
    element
        .attributes
        .iter()
        .map(|attr| (attr.name.as_str(), attr.value.as_str()))
        .collect()
}

/// Parse exactly `N` whitespace-separated floats from an element's text.
fn parse_floats<const N: usize>(element: &XmlElement) -> ImportResult<[f32; N]> {
    let text = element.inner_text();
    let tokens: Vec<&str> = text.split_whitespace().collect();

    if tokens.len() != N {
        return Err(ImportError::NumberFormat {
            tag: element.name.clone(),
            message: format!("expected {} values, found {}", N, tokens.len()),
        });
    }

    let mut values = [0.0f32; N];
    for (slot, token) in values.iter_mut().zip(&tokens) {
        *slot = token.parse::<f32>().map_err(|e| ImportError::NumberFormat {
            tag: element.name.clone(),
            message: format!("'{}': {}", token, e),
        })?;
    }

    Ok(values)
}
