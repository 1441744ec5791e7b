// Re-export glam for convenience
pub use glam::*;

// Right-handed (Maya) to left-handed (engine) conversions
mod handedness;
pub use handedness::{convert_euler_to_target, flip_translation, Mat4Ext};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reexported_types() {
        let v = Vec3::new(1.0, 2.0, 3.0);
        assert_eq!(flip_translation(v), Vec3::new(-1.0, 2.0, 3.0));
        assert_eq!(Quat::IDENTITY * v, v);
    }
}
