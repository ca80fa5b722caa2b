//! Headless arena: a player and a swarm of enemies bouncing around inside a
//! walled arena. Enemies struck by the player's spike are destroyed.
//!
//! Run:  cargo run --manifest-path demos/arena/Cargo.toml -- --frames 600
//! Logs: RUST_LOG=contact2d=debug for per-contact output

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use contact2d::ecs::components::{ContactEvents, Destroyed, Extent, Transform2D};
use contact2d::ecs::system::CollisionSystem;
use contact2d::{
    Collision, CollisionConfig, CollisionResolver, CollisionType, CollisionTypeRegistry,
    ContactKind, ResolverConfig, RigidBody, RuleSet, TeamRegistry,
};
use glam::Vec2;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

const DEFAULT_RULES: &str = include_str!("../rules.json");

const ARENA_SHAPE: &str = r#"{ "hit_boxes": [[
    { "position": [0, 0], "width": 800, "height": 600, "type": "solid" }
]] }"#;

const PLAYER_SHAPE: &str = r#"{ "hit_boxes": [[
    { "position": [0, 0], "width": 32, "height": 32, "type": "solid" },
    { "points": [[32, 8], [48, 16], [32, 24]], "type": "hurt" }
]] }"#;

const ENEMY_SHAPE: &str = r#"{ "hit_boxes": [[
    { "points": [[8, 0], [16, 0], [24, 8], [24, 16], [16, 24], [8, 24], [0, 16], [0, 8]],
      "type": "solid" }
]] }"#;

const DT: f32 = 1.0 / 60.0;

#[derive(Parser, Debug)]
#[command(about = "Headless collision arena")]
struct Args {
    /// Number of frames to simulate.
    #[arg(long, default_value_t = 600)]
    frames: u32,

    /// Number of enemies to spawn.
    #[arg(long, default_value_t = 24)]
    enemies: usize,

    /// Rule set JSON file. Defaults to the bundled rules.
    #[arg(long)]
    rules: Option<PathBuf>,
}

/// Marks enemy entities.
struct Enemy;

fn main() -> Result<()> {
    let args = Args::parse();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("info".parse()?))
        .init();

    let mut teams = TeamRegistry::new();
    for name in ["arena", "player", "enemy"] {
        teams.register(name)?;
    }
    let mut types = CollisionTypeRegistry::new();
    for name in ["solid", "hurt"] {
        types.register(name)?;
    }

    let rule_text = match &args.rules {
        Some(path) => std::fs::read_to_string(path)
            .with_context(|| format!("reading rule set {}", path.display()))?,
        None => DEFAULT_RULES.to_owned(),
    };
    let rule_set: RuleSet = serde_json::from_str(&rule_text).context("parsing rule set")?;

    let mut resolver = CollisionResolver::new(ResolverConfig::default());
    resolver.configure(&rule_set, &teams)?;

    let mut world = hecs::World::new();
    spawn_scene(&mut world, &teams, &types, args.enemies)?;
    let hurt = types.resolve("hurt")?;

    for frame in 0..args.frames {
        integrate(&mut world, DT);

        let stats = CollisionSystem::run(&resolver, &mut world);
        respond(&mut world, hurt);
        CollisionSystem::apply_impulses(&mut world);
        CollisionSystem::clear_events(&mut world);
        let removed = CollisionSystem::despawn_destroyed(&mut world);

        if frame % 60 == 0 || removed > 0 {
            info!(
                "frame {}: {} pairs, {} rejected, {} contacts, {} enemies destroyed",
                frame, stats.pairs_tested, stats.broad_phase_rejections, stats.contacts, removed
            );
        }
    }

    let remaining = world.query::<&Enemy>().iter().count();
    info!(
        "Finished {} frames with {} of {} enemies left",
        args.frames, remaining, args.enemies
    );
    Ok(())
}

fn load_collision(json: &str, types: &CollisionTypeRegistry) -> Result<Collision> {
    let config: CollisionConfig = serde_json::from_str(json).context("parsing hit boxes")?;
    Ok(Collision::from_config(&config, types)?)
}

fn spawn_scene(
    world: &mut hecs::World,
    teams: &TeamRegistry,
    types: &CollisionTypeRegistry,
    enemies: usize,
) -> Result<()> {
    world.spawn((
        Transform2D::default(),
        Extent::new(800.0, 600.0),
        load_collision(ARENA_SHAPE, types)?,
        teams.resolve("arena")?,
        RigidBody::new_static(),
    ));

    world.spawn((
        Transform2D::from_position(Vec2::new(384.0, 284.0)),
        Extent::new(48.0, 32.0),
        load_collision(PLAYER_SHAPE, types)?,
        teams.resolve("player")?,
        RigidBody::new_dynamic(4.0)
            .with_box_inertia(32.0, 32.0)
            .with_elasticity(0.5)
            .with_velocity(Vec2::new(140.0, 90.0), 0.0),
        ContactEvents::default(),
    ));

    let enemy_collision = load_collision(ENEMY_SHAPE, types)?;
    let enemy_team = teams.resolve("enemy")?;
    let centre = Vec2::new(388.0, 288.0);
    for i in 0..enemies {
        // Golden-angle spiral around the centre.
        let direction = Vec2::from_angle(i as f32 * 2.399_963);
        let radius = 100.0 + (i % 24) as f32 * 7.5;
        world.spawn((
            Transform2D {
                position: centre + direction * radius,
                rotation: i as f32 * 0.3,
            },
            Extent::new(24.0, 24.0),
            enemy_collision.clone(),
            enemy_team,
            RigidBody::new_dynamic(1.0)
                .with_box_inertia(24.0, 24.0)
                .with_elasticity(0.8)
                .with_velocity(direction.perp() * 60.0, 0.5),
            ContactEvents::default(),
            Enemy,
        ));
    }

    info!("Spawned arena, player and {} enemies", enemies);
    Ok(())
}

fn integrate(world: &mut hecs::World, dt: f32) {
    for (_entity, (transform, body)) in world.query_mut::<(&mut Transform2D, &RigidBody)>() {
        transform.position += body.linear_velocity * dt;
        transform.rotation += body.angular_velocity * dt;
    }
}

/// Positional correction and gameplay reactions. Impulses are applied afterwards.
fn respond(world: &mut hecs::World, hurt: CollisionType) {
    let mut doomed = Vec::new();

    for (entity, (transform, body, events, enemy)) in world.query_mut::<(
        &mut Transform2D,
        &mut RigidBody,
        &ContactEvents,
        Option<&Enemy>,
    )>() {
        for contact in events.iter() {
            match contact.kind {
                ContactKind::Collide => {
                    transform.position -=
                        contact.normal * contact.overlap * contact.separation_share;
                    if enemy.is_some() && contact.other_type == hurt {
                        doomed.push(entity);
                    }
                }
                ContactKind::Contain => {
                    if !body.has_movement() {
                        continue;
                    }
                    transform.position += contact.normal * contact.overlap;
                    let into_wall = body.linear_velocity.dot(contact.normal);
                    if into_wall < 0.0 {
                        body.linear_velocity -= (1.0 + body.elasticity) * into_wall * contact.normal;
                    }
                }
            }
        }
    }

    for entity in doomed {
        if world.insert_one(entity, Destroyed).is_ok() {
            debug!("Enemy {:?} destroyed", entity);
        }
    }
}
