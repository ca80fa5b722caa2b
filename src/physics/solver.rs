//! Impulse resolution for a detected contact pair.

use glam::Vec2;
use tracing::debug;

use super::contact::{Contact, ContactPair};
use super::rigid_body::RigidBody;

/// Restitution multiplier derived from both elasticities.
#[inline]
pub fn restitution(elasticity_a: f32, elasticity_b: f32) -> f32 {
    1.0 + 0.5 * (elasticity_a + elasticity_b)
}

/// Compute impulses for both contacts of a collide pair.
///
/// Impulses are velocity changes along each contact's normal, weighted by
/// inverse mass and lever-arm-weighted inverse inertia. Only a pair in which
/// neither object can translate or rotate keeps zero impulses, however heavy the
/// bodies are. Pairs already moving apart receive no impulse.
pub fn resolve_contact(
    pair: &mut ContactPair,
    position_a: Vec2,
    body_a: &RigidBody,
    position_b: Vec2,
    body_b: &RigidBody,
) {
    let a = BodyData::new(&pair.first, position_a, body_a);
    let b = BodyData::new(&pair.second, position_b, body_b);

    // Every term is non-negative, so the sum is zero only for two immovable objects.
    let effective_inverse_mass =
        a.linear_term() + a.angular_term() + b.linear_term() + b.angular_term();
    if effective_inverse_mass <= 0.0 {
        return;
    }
    let linear_inverse_mass = a.linear_term() + b.linear_term();

    let closing_speed = a.normal_speed + b.normal_speed;
    let e = restitution(body_a.elasticity, body_b.elasticity);
    let j = (e * closing_speed / effective_inverse_mass).max(0.0);

    a.write(&mut pair.first, j, effective_inverse_mass, linear_inverse_mass);
    b.write(&mut pair.second, j, effective_inverse_mass, linear_inverse_mass);

    if j > 0.0 {
        debug!(
            "Impulse {} along {:?} (closing speed {}, effective inverse mass {})",
            j, pair.first.normal, closing_speed, effective_inverse_mass
        );
    }
}

/// Per-body values used by the solver.
struct BodyData {
    normal: Vec2,
    inv_mass: f32,
    inv_inertia: f32,
    /// Lever length: the contact arm crossed with this body's normal.
    lever: f32,
    /// Contact point velocity along this body's normal.
    normal_speed: f32,
}

impl BodyData {
    fn new(contact: &Contact, position: Vec2, body: &RigidBody) -> Self {
        let r = contact.point - position;
        Self {
            normal: contact.normal,
            inv_mass: body.inverse_mass(),
            inv_inertia: body.inverse_inertia(),
            lever: r.perp_dot(contact.normal),
            normal_speed: body.point_velocity(r).dot(contact.normal),
        }
    }

    #[inline]
    fn linear_term(&self) -> f32 {
        self.inv_mass
    }

    #[inline]
    fn angular_term(&self) -> f32 {
        self.lever * self.lever * self.inv_inertia
    }

    fn write(
        &self,
        contact: &mut Contact,
        j: f32,
        effective_inverse_mass: f32,
        linear_inverse_mass: f32,
    ) {
        contact.impulse = -j * self.inv_mass * self.normal;
        contact.angular_impulse = -j * self.inv_inertia * self.lever;
        contact.mass_ratio = self.linear_term() / effective_inverse_mass;
        contact.inertia_ratio = self.angular_term() / effective_inverse_mass;
        if linear_inverse_mass > 0.0 {
            contact.separation_share = self.linear_term() / linear_inverse_mass;
        }
    }
}
