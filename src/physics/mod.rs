//! Collision detection and resolution between teams of oriented polygon objects.
//!
//! # Architecture
//!
//! Once per frame and layer, the owner hands the resolver its team buckets:
//!
//! 1. Same-team pass: every pair inside each self-colliding team
//! 2. Collide pass: every cross-team pair of each collide rule
//! 3. Contain pass: every `(container, contained)` pair of each contain rule
//!
//! Each collide pair runs a bounding-box rejection, then a separating axis test
//! per hit box pair, then impulse resolution. Contacts are handed to both
//! objects through [`Collidable::on_collision`]; the objects apply them.

pub mod broadphase;
pub mod collider;
pub mod contact;
pub mod layer;
pub mod narrowphase;
pub mod rigid_body;
pub mod rules;
pub mod solver;
pub mod transform;

use tracing::{debug, info};

use crate::config::RuleSet;
use crate::error::ConfigError;
use crate::team::{Team, TeamRegistry};

use self::broadphase::bounding_boxes_overlap;
use self::contact::ContactPair;
use self::layer::CollisionLayer;
use self::narrowphase::{collide_hitboxes, contain_hitbox, encloses};
use self::rigid_body::Collidable;
use self::rules::{CollisionRules, RuleKind};
use self::solver::resolve_contact;

/// Configuration for the collision resolver.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ResolverConfig {
    /// Whether collide pairs are first rejected by their bounding boxes. Default: true.
    pub broad_phase: bool,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            broad_phase: true,
        }
    }
}

/// Counters for one layer pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LayerStats {
    /// Object pairs that reached the resolver.
    pub pairs_tested: usize,
    /// Pairs rejected by the bounding-box test.
    pub broad_phase_rejections: usize,
    /// Contact pairs delivered (each to two objects).
    pub contacts: usize,
}

impl LayerStats {
    pub fn merge(&mut self, other: LayerStats) {
        self.pairs_tested += other.pairs_tested;
        self.broad_phase_rejections += other.broad_phase_rejections;
        self.contacts += other.contacts;
    }
}

/// Runs collide and contain tests under a fixed rule table.
///
/// Holds no per-call state, so one resolver can serve any number of layers.
#[derive(Debug, Clone, Default)]
pub struct CollisionResolver {
    rules: CollisionRules,
    config: ResolverConfig,
}

impl CollisionResolver {
    /// Create a resolver with an empty rule table.
    pub fn new(config: ResolverConfig) -> Self {
        Self {
            rules: CollisionRules::new(),
            config,
        }
    }

    pub fn with_rules(rules: CollisionRules, config: ResolverConfig) -> Self {
        Self { rules, config }
    }

    /// Replace the rule table from configuration.
    ///
    /// On error the previous table is kept.
    pub fn configure(
        &mut self,
        rule_set: &RuleSet,
        teams: &TeamRegistry,
    ) -> Result<(), ConfigError> {
        let rules = CollisionRules::from_rule_set(rule_set, teams)?;
        info!("Configured collision resolver with {} rules", rules.len());
        self.rules = rules;
        Ok(())
    }

    pub fn rules(&self) -> &CollisionRules {
        &self.rules
    }

    pub fn config(&self) -> &ResolverConfig {
        &self.config
    }

    /// Give `layer` a bucket for every team named by a rule.
    pub fn setup_empty_layer<T>(&self, layer: &mut CollisionLayer<T>) {
        for team in self.rules.teams() {
            layer.ensure_bucket(team);
        }
    }

    /// Symmetric collision test with impulse response. Returns the number of
    /// contact pairs delivered.
    pub fn collides<A: Collidable, B: Collidable>(&self, a: &mut A, b: &mut B) -> usize {
        let mut stats = LayerStats::default();
        self.collide_pair(a, b, &mut stats);
        stats.contacts
    }

    /// Containment test of `contained` against `container`. Returns the number
    /// of contact pairs delivered.
    pub fn contains<A: Collidable, B: Collidable>(
        &self,
        container: &mut A,
        contained: &mut B,
    ) -> usize {
        let mut stats = LayerStats::default();
        self.contain_pair(container, contained, &mut stats);
        stats.contacts
    }

    /// Run the same-team, collide and contain passes over one layer.
    pub fn resolve_layer<T: Collidable>(&self, layer: &mut CollisionLayer<T>) -> LayerStats {
        let mut stats = LayerStats::default();

        for team in self.rules.team_collisions() {
            if let Some(objects) = layer.bucket_mut(team) {
                self.same_team_pass(objects, &mut stats);
            }
        }

        for (first, second) in self.rules.collision_pairs() {
            self.cross_team_pass(layer, first, second, RuleKind::Collide, &mut stats);
        }

        for (container, contained) in self.rules.container_pairs() {
            self.cross_team_pass(layer, container, contained, RuleKind::Contain, &mut stats);
        }

        debug!(
            "Layer pass: {} pairs tested, {} rejected by bounding boxes, {} contacts",
            stats.pairs_tested, stats.broad_phase_rejections, stats.contacts
        );
        stats
    }

    fn same_team_pass<T: Collidable>(&self, objects: &mut [T], stats: &mut LayerStats) {
        for i in 0..objects.len() {
            let (head, tail) = objects.split_at_mut(i + 1);
            let a = &mut head[i];
            for b in tail.iter_mut() {
                if !a.is_active() {
                    break;
                }
                self.collide_pair(a, b, stats);
            }
        }
    }

    fn cross_team_pass<T: Collidable>(
        &self,
        layer: &mut CollisionLayer<T>,
        first: Team,
        second: Team,
        kind: RuleKind,
        stats: &mut LayerStats,
    ) {
        let Some(mut firsts) = layer.take_bucket(first) else {
            return;
        };

        if let Some(seconds) = layer.bucket_mut(second) {
            for a in firsts.iter_mut() {
                for b in seconds.iter_mut() {
                    if !a.is_active() {
                        break;
                    }
                    match kind {
                        RuleKind::Collide => self.collide_pair(a, b, stats),
                        RuleKind::Contain => self.contain_pair(a, b, stats),
                    }
                }
            }
        }

        layer.restore_bucket(first, firsts);
    }

    fn collide_pair<A: Collidable, B: Collidable>(
        &self,
        a: &mut A,
        b: &mut B,
        stats: &mut LayerStats,
    ) {
        if !a.is_active() || !b.is_active() {
            return;
        }
        stats.pairs_tested += 1;

        let pose_a = a.pose();
        let pose_b = b.pose();

        if self.config.broad_phase
            && !bounding_boxes_overlap(&a.bounding_box(), &pose_a, &b.bounding_box(), &pose_b)
        {
            stats.broad_phase_rejections += 1;
            return;
        }

        let body_a = a.body();
        let body_b = b.body();
        let hitboxes_a = a.collision().to_world(&pose_a);
        let hitboxes_b = b.collision().to_world(&pose_b);

        for hitbox_a in &hitboxes_a {
            for hitbox_b in &hitboxes_b {
                let Some(mut pair) = collide_hitboxes(hitbox_a, hitbox_b) else {
                    continue;
                };
                resolve_contact(
                    &mut pair,
                    pose_a.position,
                    &body_a,
                    pose_b.position,
                    &body_b,
                );
                deliver(a, b, &pair);
                stats.contacts += 1;

                if !a.is_active() || !b.is_active() {
                    return;
                }
            }
        }
    }

    fn contain_pair<A: Collidable, B: Collidable>(
        &self,
        container: &mut A,
        contained: &mut B,
        stats: &mut LayerStats,
    ) {
        if !container.is_active() || !contained.is_active() {
            return;
        }
        stats.pairs_tested += 1;

        let pose_contained = contained.pose();
        let corners = contained.bounding_box().world_points(&pose_contained);
        let hitboxes_container = container.collision().to_world(&container.pose());
        let hitboxes_contained = contained.collision().to_world(&pose_contained);

        for outer in &hitboxes_container {
            if encloses(outer, &corners) {
                continue;
            }
            for inner in &hitboxes_contained {
                let Some(pair) = contain_hitbox(outer, inner) else {
                    continue;
                };
                deliver(container, contained, &pair);
                stats.contacts += 1;

                if !container.is_active() || !contained.is_active() {
                    return;
                }
            }
        }
    }
}

fn deliver<A: Collidable, B: Collidable>(a: &mut A, b: &mut B, pair: &ContactPair) {
    debug!(
        "{:?} contact: normal {:?}, overlap {}, point {:?}",
        pair.kind(),
        pair.first.normal,
        pair.overlap(),
        pair.point()
    );
    a.on_collision(&pair.first, &*b);
    b.on_collision(&pair.second, &*a);
}
