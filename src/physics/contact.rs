//! Contact data delivered to colliding objects.

use glam::Vec2;

use crate::team::CollisionType;

/// How a contact pair was produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContactKind {
    /// Symmetric overlap between two objects.
    Collide,
    /// A contained object crossed an edge of its container.
    Contain,
}

/// One object's view of a contact.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Contact {
    pub kind: ContactKind,
    /// Unit normal pointing away from this object along the shallowest axis.
    pub normal: Vec2,
    /// Penetration depth along `normal`.
    pub overlap: f32,
    /// Deepest contact point in world space.
    pub point: Vec2,
    /// Type of this object's hit box.
    pub collision_type: CollisionType,
    /// Type of the partner's hit box.
    pub other_type: CollisionType,
    /// Velocity change to apply to this object.
    pub impulse: Vec2,
    /// Angular velocity change to apply to this object.
    pub angular_impulse: f32,
    /// This object's share of the effective inverse mass from translation.
    pub mass_ratio: f32,
    /// This object's share of the effective inverse mass from rotation.
    pub inertia_ratio: f32,
    /// This object's share of the pair's summed inverse mass. Moving each object
    /// by `overlap * separation_share` along its normal separates the pair.
    pub separation_share: f32,
}

impl Contact {
    fn new(
        kind: ContactKind,
        normal: Vec2,
        overlap: f32,
        point: Vec2,
        collision_type: CollisionType,
        other_type: CollisionType,
    ) -> Self {
        Self {
            kind,
            normal,
            overlap,
            point,
            collision_type,
            other_type,
            impulse: Vec2::ZERO,
            angular_impulse: 0.0,
            mass_ratio: 0.0,
            inertia_ratio: 0.0,
            separation_share: 0.0,
        }
    }
}

/// The two mirrored contacts produced by one hit box pair.
///
/// `first` belongs to the first object passed to the resolver and `second` to
/// the other. Normals are opposite; overlap and point are shared.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ContactPair {
    pub first: Contact,
    pub second: Contact,
}

impl ContactPair {
    /// Build a mirrored pair from the first object's normal.
    pub fn new(
        kind: ContactKind,
        normal: Vec2,
        overlap: f32,
        point: Vec2,
        first_type: CollisionType,
        second_type: CollisionType,
    ) -> Self {
        Self {
            first: Contact::new(kind, normal, overlap, point, first_type, second_type),
            second: Contact::new(kind, -normal, overlap, point, second_type, first_type),
        }
    }

    pub fn kind(&self) -> ContactKind {
        self.first.kind
    }

    pub fn overlap(&self) -> f32 {
        self.first.overlap
    }

    pub fn point(&self) -> Vec2 {
        self.first.point
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pair_is_mirrored() {
        let pair = ContactPair::new(
            ContactKind::Collide,
            Vec2::X,
            0.5,
            Vec2::new(1.0, 2.0),
            CollisionType(1),
            CollisionType(2),
        );
        assert_eq!(pair.first.normal, -pair.second.normal);
        assert_eq!(pair.first.overlap, pair.second.overlap);
        assert_eq!(pair.first.point, pair.second.point);
        assert_eq!(pair.first.other_type, CollisionType(2));
        assert_eq!(pair.second.collision_type, CollisionType(2));
        assert_eq!(pair.second.impulse, Vec2::ZERO);
    }
}
