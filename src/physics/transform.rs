//! World placement of an object: translation plus rotation about its origin.

use glam::Vec2;

/// Position and rotation of an object, with the rotation stored as a unit
/// direction so repeated point transforms avoid recomputing `sin`/`cos`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Pose {
    pub position: Vec2,
    angle: f32,
    rotation: Vec2,
}

impl Pose {
    pub fn new(position: Vec2, angle: f32) -> Self {
        Self {
            position,
            angle,
            rotation: Vec2::from_angle(angle),
        }
    }

    pub fn from_position(position: Vec2) -> Self {
        Self::new(position, 0.0)
    }

    /// Rotation angle in radians.
    pub fn angle(&self) -> f32 {
        self.angle
    }

    /// Local-space point to world space.
    #[inline]
    pub fn transform_point(&self, local: Vec2) -> Vec2 {
        self.position + self.rotation.rotate(local)
    }

    /// Local-space direction to world space (rotation only).
    #[inline]
    pub fn transform_vector(&self, local: Vec2) -> Vec2 {
        self.rotation.rotate(local)
    }
}

impl Default for Pose {
    fn default() -> Self {
        Self::new(Vec2::ZERO, 0.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::FRAC_PI_2;

    #[test]
    fn test_transform_point_rotates_about_origin() {
        let pose = Pose::new(Vec2::new(10.0, 5.0), FRAC_PI_2);
        let p = pose.transform_point(Vec2::new(1.0, 0.0));

        let eps = 1e-5;
        assert!((p - Vec2::new(10.0, 6.0)).length() < eps);
    }

    #[test]
    fn test_transform_vector_ignores_translation() {
        let pose = Pose::new(Vec2::new(-3.0, 7.0), 0.0);
        assert_eq!(pose.transform_vector(Vec2::X), Vec2::X);
    }
}
