//! Shared setup helpers for contact2d benchmarks.
//!
//! ## Running
//!
//!   cargo bench --manifest-path benchmarks/Cargo.toml --bench collision
//!
//! Filter by group:
//!   cargo bench --manifest-path benchmarks/Cargo.toml --bench collision -- narrowphase
//!   cargo bench --manifest-path benchmarks/Cargo.toml --bench collision -- layer

use contact2d::ecs::components::{Extent, Transform2D};
use contact2d::{
    Collidable, Collision, CollisionLayer, CollisionResolver, CollisionRules, CollisionType,
    Contact, HitBox, Pose, ResolverConfig, RigidBody, Team, WorldHitBox,
};
use glam::Vec2;

pub const PLAYER: Team = Team(0);
pub const ENEMY: Team = Team(1);
pub const ARENA: Team = Team(2);

/// Minimal collidable used by the layer benchmarks.
pub struct BenchBody {
    pub position: Vec2,
    pub rotation: f32,
    pub size: f32,
    pub collision: Collision,
    pub body: RigidBody,
    pub contacts: usize,
}

impl BenchBody {
    pub fn square(position: Vec2, rotation: f32, size: f32) -> Self {
        Self {
            position,
            rotation,
            size,
            collision: square_collision(size),
            body: RigidBody::new_dynamic(1.0).with_box_inertia(size, size),
            contacts: 0,
        }
    }
}

impl Collidable for BenchBody {
    fn position(&self) -> Vec2 {
        self.position
    }

    fn rotation(&self) -> f32 {
        self.rotation
    }

    fn collision(&self) -> &Collision {
        &self.collision
    }

    fn width(&self) -> f32 {
        self.size
    }

    fn height(&self) -> f32 {
        self.size
    }

    fn body(&self) -> RigidBody {
        self.body
    }

    fn on_collision(&mut self, _contact: &Contact, _other: &dyn Collidable) {
        self.contacts += 1;
    }
}

pub fn square_collision(size: f32) -> Collision {
    let hitbox = HitBox::rectangle(Vec2::ZERO, size, size, CollisionType(0))
        .expect("benchmark square is valid");
    Collision::single(vec![hitbox])
}

/// A square hit box placed in world space.
pub fn world_square(position: Vec2, rotation: f32, size: f32) -> WorldHitBox {
    HitBox::rectangle(Vec2::ZERO, size, size, CollisionType(0))
        .expect("benchmark square is valid")
        .to_world(&Pose::new(position, rotation))
}

/// An octagon hit box placed in world space.
pub fn world_octagon(position: Vec2, rotation: f32, radius: f32) -> WorldHitBox {
    // Increasing angle is clockwise on screen (y down).
    let points = (0..8)
        .map(|i| Vec2::from_angle(i as f32 * std::f32::consts::FRAC_PI_4) * radius)
        .collect();
    HitBox::polygon(points, CollisionType(0))
        .expect("benchmark octagon is valid")
        .to_world(&Pose::new(position, rotation))
}

/// Player vs enemy, enemy vs enemy, arena contains player.
pub fn bench_resolver(config: ResolverConfig) -> CollisionResolver {
    let mut rules = CollisionRules::new();
    rules.add_team_collision(ENEMY);
    rules
        .add_collision_pair(PLAYER, ENEMY)
        .expect("benchmark rules are consistent");
    rules
        .add_container_pair(ARENA, PLAYER)
        .expect("benchmark rules are consistent");
    CollisionResolver::with_rules(rules, config)
}

/// `n` objects on a grid with the given spacing, split between players and
/// enemies, plus one arena enclosing everything.
///
/// A spacing below 1.0 makes neighbours overlap.
pub fn setup_grid_layer(n: usize, spacing: f32) -> CollisionLayer<BenchBody> {
    let mut layer = CollisionLayer::new();
    let cols = (n as f32).sqrt().ceil() as usize;

    for i in 0..n {
        let position = Vec2::new((i % cols) as f32, (i / cols) as f32) * spacing;
        let rotation = i as f32 * 0.1;
        let team = if i % 4 == 0 { PLAYER } else { ENEMY };
        layer.insert(team, BenchBody::square(position, rotation, 1.0));
    }

    let extent = cols as f32 * spacing + 2.0;
    let mut arena = BenchBody::square(Vec2::splat(-1.0), 0.0, extent);
    arena.body = RigidBody::new_static();
    layer.insert(ARENA, arena);
    layer
}

/// The same grid as [`setup_grid_layer`], as hecs entities.
pub fn setup_grid_world(n: usize, spacing: f32) -> hecs::World {
    let mut world = hecs::World::new();
    let cols = (n as f32).sqrt().ceil() as usize;

    for i in 0..n {
        let position = Vec2::new((i % cols) as f32, (i / cols) as f32) * spacing;
        let team = if i % 4 == 0 { PLAYER } else { ENEMY };
        world.spawn((
            Transform2D {
                position,
                rotation: i as f32 * 0.1,
            },
            Extent::new(1.0, 1.0),
            square_collision(1.0),
            team,
            RigidBody::new_dynamic(1.0).with_box_inertia(1.0, 1.0),
        ));
    }
    world
}
