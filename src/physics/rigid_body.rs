//! Rigid body properties and the capability contract for collidable objects.

use glam::Vec2;

use super::collider::{BoundingBox, Collision};
use super::contact::Contact;
use super::transform::Pose;

/// Rigid body type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BodyType {
    /// Pushed around by collision impulses.
    #[default]
    Dynamic,
    /// Immovable.
    Static,
    /// Moved by its owner only; behaves as infinitely heavy in collisions.
    Kinematic,
}

/// Mass, inertia and velocity of an object, as seen by the resolver.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RigidBody {
    pub body_type: BodyType,
    pub mass: f32,
    /// Moment of inertia about the object's position.
    pub inertia: f32,
    pub linear_velocity: Vec2,
    /// Angular velocity in radians per second (positive is clockwise on screen).
    pub angular_velocity: f32,
    /// Coefficient of elasticity (0.0 - 1.0).
    pub elasticity: f32,
    /// Translates under impulses but never rotates.
    pub fixed_rotation: bool,
}

impl RigidBody {
    /// Create a dynamic body. Inertia defaults to the mass (unit-radius approximation).
    pub fn new_dynamic(mass: f32) -> Self {
        Self {
            body_type: BodyType::Dynamic,
            mass,
            inertia: mass,
            linear_velocity: Vec2::ZERO,
            angular_velocity: 0.0,
            elasticity: 0.0,
            fixed_rotation: false,
        }
    }

    pub fn new_static() -> Self {
        Self {
            body_type: BodyType::Static,
            mass: 0.0,
            inertia: 0.0,
            linear_velocity: Vec2::ZERO,
            angular_velocity: 0.0,
            elasticity: 0.0,
            fixed_rotation: true,
        }
    }

    pub fn new_kinematic() -> Self {
        Self {
            body_type: BodyType::Kinematic,
            ..Self::new_static()
        }
    }

    /// Inertia of a uniform `width` x `height` rectangle rotating about its centre.
    pub fn with_box_inertia(mut self, width: f32, height: f32) -> Self {
        self.inertia = self.mass * (width * width + height * height) / 12.0;
        self
    }

    pub fn with_inertia(mut self, inertia: f32) -> Self {
        self.inertia = inertia;
        self
    }

    pub fn with_elasticity(mut self, elasticity: f32) -> Self {
        self.elasticity = elasticity;
        self
    }

    pub fn with_velocity(mut self, linear: Vec2, angular: f32) -> Self {
        self.linear_velocity = linear;
        self.angular_velocity = angular;
        self
    }

    pub fn with_fixed_rotation(mut self) -> Self {
        self.fixed_rotation = true;
        self
    }

    /// Whether collision impulses may translate this body.
    #[inline]
    pub fn has_movement(&self) -> bool {
        self.body_type == BodyType::Dynamic && self.mass > 0.0
    }

    /// Whether collision impulses may rotate this body.
    #[inline]
    pub fn has_rotation(&self) -> bool {
        self.has_movement() && !self.fixed_rotation && self.inertia > 0.0
    }

    #[inline]
    pub fn inverse_mass(&self) -> f32 {
        if self.has_movement() {
            1.0 / self.mass
        } else {
            0.0
        }
    }

    #[inline]
    pub fn inverse_inertia(&self) -> f32 {
        if self.has_rotation() {
            1.0 / self.inertia
        } else {
            0.0
        }
    }

    /// Velocity of a point at lever arm `r` from the body's position.
    #[inline]
    pub fn point_velocity(&self, r: Vec2) -> Vec2 {
        self.linear_velocity + self.angular_velocity * r.perp()
    }
}

impl Default for RigidBody {
    fn default() -> Self {
        Self::new_static()
    }
}

/// Minimal contract an object satisfies to take part in collision passes.
///
/// The resolver only reads through this trait; the single write path is
/// [`Collidable::on_collision`], where the object decides how to react.
pub trait Collidable {
    /// World position of the object's local origin.
    fn position(&self) -> Vec2;

    /// Rotation about [`Collidable::position`], in radians.
    fn rotation(&self) -> f32;

    /// Hit boxes, with the currently active frame selected.
    fn collision(&self) -> &Collision;

    fn width(&self) -> f32;

    fn height(&self) -> f32;

    fn body(&self) -> RigidBody;

    /// Receive one contact and a read-only view of the partner. Called once per
    /// overlapping hit box pair.
    fn on_collision(&mut self, contact: &Contact, other: &dyn Collidable);

    /// Objects flagged for destruction return `false` and are skipped for the
    /// rest of the pass. Removal happens later, outside collision iteration.
    fn is_active(&self) -> bool {
        true
    }

    fn pose(&self) -> Pose {
        Pose::new(self.position(), self.rotation())
    }

    fn bounding_box(&self) -> BoundingBox {
        BoundingBox::new(self.width(), self.height())
    }
}

impl<T: Collidable + ?Sized> Collidable for Box<T> {
    fn position(&self) -> Vec2 {
        (**self).position()
    }

    fn rotation(&self) -> f32 {
        (**self).rotation()
    }

    fn collision(&self) -> &Collision {
        (**self).collision()
    }

    fn width(&self) -> f32 {
        (**self).width()
    }

    fn height(&self) -> f32 {
        (**self).height()
    }

    fn body(&self) -> RigidBody {
        (**self).body()
    }

    fn on_collision(&mut self, contact: &Contact, other: &dyn Collidable) {
        (**self).on_collision(contact, other)
    }

    fn is_active(&self) -> bool {
        (**self).is_active()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dynamic_body_inverses() {
        let rb = RigidBody::new_dynamic(4.0).with_inertia(2.0);
        assert!(rb.has_movement());
        assert!(rb.has_rotation());
        assert_eq!(rb.inverse_mass(), 0.25);
        assert_eq!(rb.inverse_inertia(), 0.5);
    }

    #[test]
    fn test_static_and_kinematic_are_immovable() {
        for rb in [RigidBody::new_static(), RigidBody::new_kinematic()] {
            assert!(!rb.has_movement());
            assert!(!rb.has_rotation());
            assert_eq!(rb.inverse_mass(), 0.0);
            assert_eq!(rb.inverse_inertia(), 0.0);
        }
    }

    #[test]
    fn test_fixed_rotation_keeps_translation() {
        let rb = RigidBody::new_dynamic(1.0).with_fixed_rotation();
        assert_eq!(rb.inverse_mass(), 1.0);
        assert_eq!(rb.inverse_inertia(), 0.0);
    }

    #[test]
    fn test_box_inertia() {
        let rb = RigidBody::new_dynamic(12.0).with_box_inertia(1.0, 2.0);
        assert!((rb.inertia - 5.0).abs() < 1e-5);
    }

    #[test]
    fn test_point_velocity() {
        let rb = RigidBody::new_dynamic(1.0).with_velocity(Vec2::new(1.0, 0.0), 2.0);
        let v = rb.point_velocity(Vec2::new(1.0, 0.0));
        assert_eq!(v, Vec2::new(1.0, 2.0));
    }
}
