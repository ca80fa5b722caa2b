//! hecs integration: collision components and a system that runs a frame over a `World`.
//!
//! Entities take part when they carry [`Transform2D`], [`Extent`], a
//! [`Collision`](crate::physics::collider::Collision) and a
//! [`Team`](crate::team::Team). A [`RigidBody`](crate::physics::rigid_body::RigidBody)
//! is optional; entities without one are immovable.

pub mod components;
pub mod system;

pub mod prelude {
    pub use super::components::{ContactEvents, Destroyed, Extent, Transform2D};
    pub use super::system::CollisionSystem;
}
