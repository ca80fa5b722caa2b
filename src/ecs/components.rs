//! Components read and written by the collision system.

use glam::Vec2;

use crate::physics::contact::Contact;
use crate::physics::transform::Pose;

/// World placement of an entity.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Transform2D {
    pub position: Vec2,
    /// Rotation about `position`, in radians.
    pub rotation: f32,
}

impl Transform2D {
    pub fn from_position(position: Vec2) -> Self {
        Self {
            position,
            rotation: 0.0,
        }
    }

    pub fn pose(&self) -> Pose {
        Pose::new(self.position, self.rotation)
    }
}

/// Full width and height of an entity, used for its bounding box.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Extent {
    pub width: f32,
    pub height: f32,
}

impl Extent {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }
}

/// Contacts delivered to an entity since the events were last cleared.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ContactEvents(pub Vec<Contact>);

impl ContactEvents {
    pub fn iter(&self) -> std::slice::Iter<'_, Contact> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Marks an entity for removal. Marked entities are skipped by collision
/// passes and despawned by [`CollisionSystem::despawn_destroyed`](super::system::CollisionSystem::despawn_destroyed).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Destroyed;
