//! contact2d: 2D collision detection and resolution core
//!
//! Decides every frame which oriented polygon objects overlap, classifies each
//! interaction as a symmetric collision or a containment violation, and hands
//! both objects a mirrored contact carrying the computed impulse.
//!
//! # Architecture
//!
//! The library is organized into layers:
//!
//! 1. **team** - Team and hit box type ids, name registries
//! 2. **config** - Serde data models for rule sets and hit box frames
//! 3. **error** - Configuration and shape errors
//! 4. **physics** - Geometry, broadphase, narrowphase, impulse solver, rule table and resolver
//! 5. **ecs** - hecs integration (feature = "ecs")

pub mod config;
pub mod error;
pub mod physics;
pub mod team;

#[cfg(feature = "ecs")]
pub mod ecs;

// Re-export commonly used types
pub use config::{CollisionConfig, HitBoxConfig, RuleSet};
pub use error::{ConfigError, ShapeError};

pub use physics::collider::{BoundingBox, Collision, HitBox, WorldHitBox};
pub use physics::contact::{Contact, ContactKind, ContactPair};
pub use physics::layer::CollisionLayer;
pub use physics::rigid_body::{BodyType, Collidable, RigidBody};
pub use physics::rules::{CollisionRule, CollisionRules, RuleKind};
pub use physics::transform::Pose;
pub use physics::{CollisionResolver, LayerStats, ResolverConfig};

pub use team::{CollisionType, CollisionTypeRegistry, NameRegistry, Team, TeamRegistry};

#[cfg(feature = "ecs")]
pub use ecs::prelude::*;

// Re-export glam for convenience
pub use glam;
