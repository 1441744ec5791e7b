// Handedness conversion utilities
//
// Scene files are authored in Maya's right-handed space; the engine side is
// left-handed. Positions flip the X axis, Euler rotations flip Y and Z and are
// recomposed in Z * Y * X order.

use glam::{Mat4, Quat, Vec3};

/// Convert a right-handed XYZ Euler triple (radians) into a left-handed rotation.
///
/// The Y and Z components are negated, then the elemental rotations are
/// composed as `qz * qy * qx`. Changing that order changes every imported
/// orientation.
pub fn convert_euler_to_target(euler: Vec3) -> Quat {
    let flipped = Vec3::new(euler.x, -euler.y, -euler.z);

    let qx = Quat::from_rotation_x(flipped.x);
    let qy = Quat::from_rotation_y(flipped.y);
    let qz = Quat::from_rotation_z(flipped.z);

    qz * qy * qx
}

/// Mirror a position across the YZ plane (negate X).
pub fn flip_translation(translation: Vec3) -> Vec3 {
    Vec3::new(-translation.x, translation.y, translation.z)
}

/// Extension trait for Mat4 to read and decompose scene-file matrices
pub trait Mat4Ext: Sized {
    /// Build a matrix from the 16 values of a `transform` element.
    ///
    /// Maya writes matrices for row vectors, so the translation sits in
    /// values 12..15. Reading the values as glam columns yields the equivalent
    /// column-vector matrix.
    fn from_maya_tokens(values: &[f32; 16]) -> Self;

    /// Decompose into (scale, rotation, translation).
    ///
    /// Shear is discarded. A singular matrix keeps its translation and axis
    /// lengths but reports an identity rotation instead of NaNs.
    fn decompose_lossy(&self) -> (Vec3, Quat, Vec3);
}

impl Mat4Ext for Mat4 {
    fn from_maya_tokens(values: &[f32; 16]) -> Self {
        Mat4::from_cols_array(values)
    }

    fn decompose_lossy(&self) -> (Vec3, Quat, Vec3) {
        // Uniform scales below ~0.005 already give |det| under f32::EPSILON,
        // so only an exact zero or a failed decomposition counts as singular.
        if self.determinant() != 0.0 {
            let (scale, rotation, translation) = self.to_scale_rotation_translation();
            if rotation.is_finite() && scale.is_finite() {
                return (scale, rotation, translation);
            }
        }

        let scale = Vec3::new(
            self.x_axis.truncate().length(),
            self.y_axis.truncate().length(),
            self.z_axis.truncate().length(),
        );
        (scale, Quat::IDENTITY, self.w_axis.truncate())
    }
}
