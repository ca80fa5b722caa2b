//! Declarative configuration data consumed by the rule registry and shape builder.
//!
//! Text parsing is done by the caller (typically `serde_json`); these types are
//! the already-parsed form.

use serde::{Deserialize, Serialize};

/// Team interaction rules for a scene.
///
/// ```json
/// {
///   "team_collision": ["player", "enemy"],
///   "collision_rules": [["player", "enemy"]],
///   "container_rules": [["arena", "player"]]
/// }
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RuleSet {
    /// Teams whose members are tested against each other.
    pub team_collision: Vec<String>,
    /// Symmetric collision pairs.
    pub collision_rules: Vec<[String; 2]>,
    /// `[container, contained]` pairs.
    pub container_rules: Vec<[String; 2]>,
}

/// Hit box frames for one object, one inner list per frame.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CollisionConfig {
    pub hit_boxes: Vec<Vec<HitBoxConfig>>,
}

/// A single hit box description.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum HitBoxConfig {
    /// Convex polygon, points clockwise in local space.
    Polygon {
        points: Vec<[f32; 2]>,
        #[serde(rename = "type")]
        collision_type: String,
    },
    /// Axis-aligned rectangle anchored at its top-left corner.
    Rectangle {
        position: [f32; 2],
        width: f32,
        height: f32,
        #[serde(rename = "type")]
        collision_type: String,
    },
}

impl HitBoxConfig {
    pub fn collision_type(&self) -> &str {
        match self {
            HitBoxConfig::Polygon { collision_type, .. }
            | HitBoxConfig::Rectangle { collision_type, .. } => collision_type,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rule_set_from_json() {
        let json = r#"{
            "team_collision": ["player", "enemy"],
            "collision_rules": [["player", "enemy"], ["player", "wall"]],
            "container_rules": [["arena", "player"]]
        }"#;
        let rules: RuleSet = serde_json::from_str(json).unwrap();
        assert_eq!(rules.team_collision, vec!["player", "enemy"]);
        assert_eq!(rules.collision_rules.len(), 2);
        assert_eq!(rules.container_rules[0], ["arena".to_string(), "player".to_string()]);
    }

    #[test]
    fn test_rule_set_rejects_malformed_rules() {
        let json = r#"{
            "team_collision": [],
            "collision_rules": [["player"]],
            "container_rules": []
        }"#;
        assert!(serde_json::from_str::<RuleSet>(json).is_err());

        let missing = r#"{ "team_collision": [] }"#;
        assert!(serde_json::from_str::<RuleSet>(missing).is_err());
    }

    #[test]
    fn test_hit_box_config_variants() {
        let json = r#"{ "hit_boxes": [[
            { "position": [10, 20], "width": 100, "height": 200, "type": "solid" },
            { "points": [[0, 0], [4, 0], [2, 3]], "type": "hurt" }
        ]] }"#;
        let config: CollisionConfig = serde_json::from_str(json).unwrap();
        let frame = &config.hit_boxes[0];
        assert!(matches!(&frame[0], HitBoxConfig::Rectangle { width, .. } if *width == 100.0));
        assert!(matches!(&frame[1], HitBoxConfig::Polygon { points, .. } if points.len() == 3));
        assert_eq!(frame[1].collision_type(), "hurt");
    }
}
