//! Collision system: runs the resolver over every collidable entity of a world.

use glam::Vec2;
use hecs::{Entity, World};
use tracing::{debug, warn};

use crate::physics::collider::Collision;
use crate::physics::contact::Contact;
use crate::physics::layer::CollisionLayer;
use crate::physics::rigid_body::{Collidable, RigidBody};
use crate::physics::{CollisionResolver, LayerStats};
use crate::team::Team;

use super::components::{ContactEvents, Destroyed, Extent, Transform2D};

/// Borrowed view of one entity for the duration of a pass.
struct EntityProxy<'a> {
    entity: Entity,
    transform: Transform2D,
    extent: Extent,
    collision: &'a Collision,
    body: RigidBody,
    active: bool,
    contacts: Vec<Contact>,
}

impl Collidable for EntityProxy<'_> {
    fn position(&self) -> Vec2 {
        self.transform.position
    }

    fn rotation(&self) -> f32 {
        self.transform.rotation
    }

    fn collision(&self) -> &Collision {
        self.collision
    }

    fn width(&self) -> f32 {
        self.extent.width
    }

    fn height(&self) -> f32 {
        self.extent.height
    }

    fn body(&self) -> RigidBody {
        self.body
    }

    fn on_collision(&mut self, contact: &Contact, _other: &dyn Collidable) {
        self.contacts.push(*contact);
    }

    fn is_active(&self) -> bool {
        self.active
    }
}

/// Frame-level collision handling for a `hecs::World`.
pub struct CollisionSystem;

impl CollisionSystem {
    /// Run the same-team, collide and contain passes over all collidable
    /// entities, appending delivered contacts to each entity's [`ContactEvents`].
    ///
    /// Entities marked [`Destroyed`] are skipped. Nothing is despawned here.
    pub fn run(resolver: &CollisionResolver, world: &mut World) -> LayerStats {
        let (stats, delivered) = {
            let mut query = world.query::<(
                &Transform2D,
                &Extent,
                &Collision,
                &Team,
                Option<&RigidBody>,
                Option<&Destroyed>,
            )>();

            let mut layer = CollisionLayer::new();
            resolver.setup_empty_layer(&mut layer);
            for (entity, (transform, extent, collision, team, body, destroyed)) in query.iter() {
                layer.insert(
                    *team,
                    EntityProxy {
                        entity,
                        transform: *transform,
                        extent: *extent,
                        collision,
                        body: body.copied().unwrap_or_default(),
                        active: destroyed.is_none(),
                        contacts: Vec::new(),
                    },
                );
            }

            let stats = resolver.resolve_layer(&mut layer);
            let delivered: Vec<(Entity, Vec<Contact>)> = layer
                .drain()
                .filter(|(_, proxy)| !proxy.contacts.is_empty())
                .map(|(_, proxy)| (proxy.entity, proxy.contacts))
                .collect();
            (stats, delivered)
        };

        for (entity, mut contacts) in delivered {
            let appended = match world.get::<&mut ContactEvents>(entity) {
                Ok(mut events) => {
                    events.0.append(&mut contacts);
                    true
                }
                Err(_) => false,
            };
            if !appended {
                if let Err(err) = world.insert_one(entity, ContactEvents(contacts)) {
                    warn!("Could not record contacts for {:?}: {}", entity, err);
                }
            }
        }

        stats
    }

    /// Apply the impulses of every recorded contact to the entity's rigid body.
    pub fn apply_impulses(world: &mut World) {
        for (_entity, (body, events)) in world.query_mut::<(&mut RigidBody, &ContactEvents)>() {
            for contact in events.iter() {
                body.linear_velocity += contact.impulse;
                body.angular_velocity += contact.angular_impulse;
            }
        }
    }

    /// Forget all recorded contacts.
    pub fn clear_events(world: &mut World) {
        for (_entity, events) in world.query_mut::<&mut ContactEvents>() {
            events.0.clear();
        }
    }

    /// Despawn every entity marked [`Destroyed`]. Returns how many were removed.
    pub fn despawn_destroyed(world: &mut World) -> usize {
        let doomed: Vec<Entity> = world
            .query::<&Destroyed>()
            .iter()
            .map(|(entity, _)| entity)
            .collect();

        let mut removed = 0;
        for entity in doomed {
            if world.despawn(entity).is_ok() {
                removed += 1;
            }
        }
        if removed > 0 {
            debug!("Despawned {} destroyed entities", removed);
        }
        removed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::physics::collider::HitBox;
    use crate::physics::contact::ContactKind;
    use crate::physics::rules::CollisionRules;
    use crate::physics::ResolverConfig;
    use crate::team::CollisionType;

    const PLAYER: Team = Team(0);
    const ENEMY: Team = Team(1);
    const ARENA: Team = Team(2);

    fn square(size: f32) -> Collision {
        Collision::single(vec![
            HitBox::rectangle(Vec2::ZERO, size, size, CollisionType(0)).unwrap(),
        ])
    }

    fn resolver() -> CollisionResolver {
        let mut rules = CollisionRules::new();
        rules.add_collision_pair(PLAYER, ENEMY).unwrap();
        rules.add_container_pair(ARENA, PLAYER).unwrap();
        CollisionResolver::with_rules(rules, ResolverConfig::default())
    }

    #[test]
    fn test_run_records_contacts() {
        let mut world = World::new();
        let player = world.spawn((
            Transform2D::from_position(Vec2::ZERO),
            Extent::new(1.0, 1.0),
            square(1.0),
            PLAYER,
            RigidBody::new_dynamic(1.0)
                .with_fixed_rotation()
                .with_velocity(Vec2::new(2.0, 0.0), 0.0),
        ));
        let enemy = world.spawn((
            Transform2D::from_position(Vec2::new(0.8, 0.0)),
            Extent::new(1.0, 1.0),
            square(1.0),
            ENEMY,
            ContactEvents::default(),
        ));

        let stats = CollisionSystem::run(&resolver(), &mut world);
        assert_eq!(stats.contacts, 1);

        {
            let events = world.get::<&ContactEvents>(player).unwrap();
            assert_eq!(events.len(), 1);
            assert_eq!(events.0[0].normal, Vec2::X);
            assert_eq!(events.0[0].kind, ContactKind::Collide);
        }
        assert_eq!(world.get::<&ContactEvents>(enemy).unwrap().len(), 1);

        // The enemy has no rigid body, so the player bounces off a wall.
        CollisionSystem::apply_impulses(&mut world);
        let body = world.get::<&RigidBody>(player).unwrap();
        assert!(body.linear_velocity.x.abs() < 1e-5);
    }

    #[test]
    fn test_contain_events_and_clear() {
        let mut world = World::new();
        world.spawn((
            Transform2D::from_position(Vec2::ZERO),
            Extent::new(10.0, 10.0),
            square(10.0),
            ARENA,
        ));
        let player = world.spawn((
            Transform2D::from_position(Vec2::new(9.5, 2.0)),
            Extent::new(1.0, 1.0),
            square(1.0),
            PLAYER,
        ));

        CollisionSystem::run(&resolver(), &mut world);
        {
            let events = world.get::<&ContactEvents>(player).unwrap();
            assert_eq!(events.len(), 1);
            assert_eq!(events.0[0].kind, ContactKind::Contain);
            assert_eq!(events.0[0].normal, Vec2::NEG_X);
        }

        CollisionSystem::clear_events(&mut world);
        assert!(world.get::<&ContactEvents>(player).unwrap().is_empty());
    }

    #[test]
    fn test_destroyed_entities_are_skipped_and_despawned() {
        let mut world = World::new();
        let player = world.spawn((
            Transform2D::from_position(Vec2::ZERO),
            Extent::new(1.0, 1.0),
            square(1.0),
            PLAYER,
            Destroyed,
        ));
        world.spawn((
            Transform2D::from_position(Vec2::new(0.5, 0.0)),
            Extent::new(1.0, 1.0),
            square(1.0),
            ENEMY,
        ));

        let stats = CollisionSystem::run(&resolver(), &mut world);
        assert_eq!(stats.contacts, 0);
        assert!(world.get::<&ContactEvents>(player).is_err());

        assert_eq!(CollisionSystem::despawn_destroyed(&mut world), 1);
        assert!(!world.contains(player));
        assert_eq!(world.len(), 1);
    }
}
