//! Team interaction rules: which team buckets are tested against each other.

use std::collections::BTreeSet;

use tracing::{error, info, warn};

use crate::config::RuleSet;
use crate::error::ConfigError;
use crate::team::{Team, TeamRegistry};

/// How two team buckets interact.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RuleKind {
    /// Symmetric test with impulse response.
    Collide,
    /// The first team must enclose the second.
    Contain,
}

/// An ordered team pair and how it interacts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CollisionRule {
    pub first: Team,
    pub second: Team,
    pub kind: RuleKind,
}

/// Rule table, built once per scene and read-only during frames.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CollisionRules {
    team_collisions: Vec<Team>,
    collisions: Vec<(Team, Team)>,
    containers: Vec<(Team, Team)>,
}

impl CollisionRules {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a rule table from its parsed configuration.
    ///
    /// Any unknown team name or contradictory rule fails the whole table.
    pub fn from_rule_set(rule_set: &RuleSet, teams: &TeamRegistry) -> Result<Self, ConfigError> {
        let mut rules = Self::new();

        for name in &rule_set.team_collision {
            rules.add_team_collision(teams.resolve(name)?);
            info!("Added team collision rule: {}", name);
        }

        for [first, second] in &rule_set.collision_rules {
            rules.add_collision_pair(teams.resolve(first)?, teams.resolve(second)?)?;
            info!("Added collision rule: {} vs {}", first, second);
        }

        for [container, contained] in &rule_set.container_rules {
            rules.add_container_pair(teams.resolve(container)?, teams.resolve(contained)?)?;
            info!("Added container rule: {} <- {}", container, contained);
        }

        Ok(rules)
    }

    /// Members of `team` are tested against each other.
    ///
    /// Returns `false` if the rule already existed.
    pub fn add_team_collision(&mut self, team: Team) -> bool {
        if self.team_collisions.contains(&team) {
            warn!("Attempting to add existing team collision rule for {} twice", team);
            return false;
        }
        self.team_collisions.push(team);
        true
    }

    /// Register a symmetric collide rule.
    ///
    /// A pair with both sides equal is a team collision rule. Returns
    /// `Ok(false)` for a duplicate, and fails if `second` already contains
    /// `first`.
    pub fn add_collision_pair(&mut self, first: Team, second: Team) -> Result<bool, ConfigError> {
        if first == second {
            return Ok(self.add_team_collision(first));
        }

        if self.has_collision(first, second) || self.has_container(first, second) {
            warn!(
                "Attempting to add existing collision pairing ({}, {}) twice",
                first, second
            );
            return Ok(false);
        }

        if self.has_container(second, first) {
            error!(
                "Cannot add collision rule ({}, {}): {} already contains {}",
                first, second, second, first
            );
            return Err(ConfigError::InverseRule { first, second });
        }

        self.collisions.push((first, second));
        Ok(true)
    }

    /// Register that `container` must enclose `contained`.
    ///
    /// Returns `Ok(false)` if the same ordered pairing already exists, and
    /// fails on an inverse pairing or a team containing itself.
    pub fn add_container_pair(
        &mut self,
        container: Team,
        contained: Team,
    ) -> Result<bool, ConfigError> {
        if container == contained {
            error!("Cannot add container rule: {} cannot contain itself", container);
            return Err(ConfigError::SelfContainment { team: container });
        }

        if self.has_collision_ordered(container, contained)
            || self.has_container(container, contained)
        {
            warn!(
                "Attempting to add existing collision pairing ({}, {}) twice",
                container, contained
            );
            return Ok(false);
        }

        if self.has_collision_ordered(contained, container)
            || self.has_container(contained, container)
        {
            error!(
                "Cannot add an inverse containment rule ({}, {})",
                container, contained
            );
            return Err(ConfigError::InverseRule {
                first: container,
                second: contained,
            });
        }

        self.containers.push((container, contained));
        Ok(true)
    }

    fn has_collision_ordered(&self, first: Team, second: Team) -> bool {
        self.collisions.contains(&(first, second))
    }

    fn has_collision(&self, a: Team, b: Team) -> bool {
        self.has_collision_ordered(a, b) || self.has_collision_ordered(b, a)
    }

    fn has_container(&self, container: Team, contained: Team) -> bool {
        self.containers.contains(&(container, contained))
    }

    /// Teams whose members are tested against each other, in registration order.
    pub fn team_collisions(&self) -> impl Iterator<Item = Team> + '_ {
        self.team_collisions.iter().copied()
    }

    /// Collide pairs, in registration order.
    pub fn collision_pairs(&self) -> impl Iterator<Item = (Team, Team)> + '_ {
        self.collisions.iter().copied()
    }

    /// `(container, contained)` pairs, in registration order.
    pub fn container_pairs(&self) -> impl Iterator<Item = (Team, Team)> + '_ {
        self.containers.iter().copied()
    }

    /// Every rule in pass order: team collisions, collide pairs, contain pairs.
    pub fn iter(&self) -> impl Iterator<Item = CollisionRule> + '_ {
        let same_team = self.team_collisions().map(|team| CollisionRule {
            first: team,
            second: team,
            kind: RuleKind::Collide,
        });
        let collide = self.collision_pairs().map(|(first, second)| CollisionRule {
            first,
            second,
            kind: RuleKind::Collide,
        });
        let contain = self.container_pairs().map(|(first, second)| CollisionRule {
            first,
            second,
            kind: RuleKind::Contain,
        });
        same_team.chain(collide).chain(contain)
    }

    /// Every team named by at least one rule.
    pub fn teams(&self) -> BTreeSet<Team> {
        self.iter()
            .flat_map(|rule| [rule.first, rule.second])
            .collect()
    }

    pub fn contains_team(&self, team: Team) -> bool {
        self.iter().any(|rule| rule.first == team || rule.second == team)
    }

    /// Total number of rules.
    pub fn len(&self) -> usize {
        self.team_collisions.len() + self.collisions.len() + self.containers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PLAYER: Team = Team(0);
    const ENEMY: Team = Team(1);
    const ARENA: Team = Team(2);

    fn registry() -> TeamRegistry {
        let mut teams = TeamRegistry::new();
        teams.register("player").unwrap();
        teams.register("enemy").unwrap();
        teams.register("arena").unwrap();
        teams
    }

    #[test]
    fn test_duplicate_collide_pair_is_ignored() {
        let mut rules = CollisionRules::new();
        assert_eq!(rules.add_collision_pair(PLAYER, ENEMY), Ok(true));
        assert_eq!(rules.add_collision_pair(PLAYER, ENEMY), Ok(false));
        assert_eq!(rules.add_collision_pair(ENEMY, PLAYER), Ok(false));
        assert_eq!(rules.len(), 1);
    }

    #[test]
    fn test_same_team_collide_pair_is_team_collision() {
        let mut rules = CollisionRules::new();
        assert_eq!(rules.add_collision_pair(ENEMY, ENEMY), Ok(true));
        assert!(!rules.add_team_collision(ENEMY));
        assert_eq!(rules.team_collisions().collect::<Vec<_>>(), vec![ENEMY]);
        assert_eq!(rules.collision_pairs().count(), 0);
    }

    #[test]
    fn test_inverse_containment_is_rejected() {
        let mut rules = CollisionRules::new();
        rules.add_collision_pair(PLAYER, ARENA).unwrap();
        assert_eq!(
            rules.add_container_pair(ARENA, PLAYER),
            Err(ConfigError::InverseRule {
                first: ARENA,
                second: PLAYER
            })
        );
        // Same ordering as the collide rule is only a duplicate.
        assert_eq!(rules.add_container_pair(PLAYER, ARENA), Ok(false));
        assert_eq!(rules.len(), 1);
    }

    #[test]
    fn test_contain_rule_conflicts() {
        let mut rules = CollisionRules::new();
        assert_eq!(rules.add_container_pair(ARENA, PLAYER), Ok(true));
        assert_eq!(rules.add_container_pair(ARENA, PLAYER), Ok(false));
        assert!(rules.add_container_pair(PLAYER, ARENA).is_err());
        assert!(rules.add_collision_pair(PLAYER, ARENA).is_err());
        assert_eq!(
            rules.add_container_pair(ARENA, ARENA),
            Err(ConfigError::SelfContainment { team: ARENA })
        );
        assert_eq!(rules.len(), 1);
    }

    #[test]
    fn test_from_rule_set() {
        let rule_set: RuleSet = serde_json::from_str(
            r#"{
                "team_collision": ["enemy"],
                "collision_rules": [["player", "enemy"]],
                "container_rules": [["arena", "player"], ["arena", "enemy"]]
            }"#,
        )
        .unwrap();

        let rules = CollisionRules::from_rule_set(&rule_set, &registry()).unwrap();
        assert_eq!(rules.len(), 4);
        assert_eq!(
            rules.iter().map(|r| r.kind).collect::<Vec<_>>(),
            vec![
                RuleKind::Collide,
                RuleKind::Collide,
                RuleKind::Contain,
                RuleKind::Contain
            ]
        );
        assert_eq!(
            rules.container_pairs().collect::<Vec<_>>(),
            vec![(ARENA, PLAYER), (ARENA, ENEMY)]
        );
        assert_eq!(
            rules.teams().into_iter().collect::<Vec<_>>(),
            vec![PLAYER, ENEMY, ARENA]
        );
        assert!(rules.contains_team(ARENA));
        assert!(!rules.contains_team(Team(9)));
    }

    #[test]
    fn test_unknown_team_fails() {
        let rule_set = RuleSet {
            team_collision: vec![],
            collision_rules: vec![["player".into(), "ghost".into()]],
            container_rules: vec![],
        };
        assert_eq!(
            CollisionRules::from_rule_set(&rule_set, &registry()),
            Err(ConfigError::UnknownTeam {
                name: "ghost".into()
            })
        );
    }
}
