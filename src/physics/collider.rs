//! Hit box polygons, per-frame hit box sets and object bounding boxes.

use std::f32::consts::TAU;

use glam::Vec2;
use tracing::warn;

use crate::config::{CollisionConfig, HitBoxConfig};
use crate::error::{ConfigError, ShapeError};
use crate::team::{CollisionType, CollisionTypeRegistry};

use super::transform::Pose;

/// Cross products below this magnitude count as collinear when validating polygons.
const COLLINEAR_EPSILON: f32 = 1e-6;

/// Tolerance on the summed turning angle of a simple convex polygon.
const WINDING_EPSILON: f32 = 1e-3;

/// Convex polygon in an object's local space.
///
/// Points are clockwise on screen (y down). Normal `i` is the unit outward normal
/// of the edge from point `i` to point `i + 1`.
#[derive(Debug, Clone, PartialEq)]
pub struct HitBox {
    points: Vec<Vec2>,
    normals: Vec<Vec2>,
    collision_type: CollisionType,
}

impl HitBox {
    /// Build a polygon hit box, validating convexity and winding.
    pub fn polygon(points: Vec<Vec2>, collision_type: CollisionType) -> Result<Self, ShapeError> {
        let n = points.len();
        if n < 3 {
            return Err(ShapeError::TooFewPoints(n));
        }
        if points.iter().any(|p| !p.is_finite()) {
            return Err(ShapeError::NonFinite);
        }

        let mut normals = Vec::with_capacity(n);
        for i in 0..n {
            let edge = points[(i + 1) % n] - points[i];
            if edge.length_squared() <= f32::EPSILON {
                return Err(ShapeError::DegenerateEdge(i));
            }
            normals.push(-edge.perp().normalize());
        }

        let mut turning_right = false;
        let mut turning_left = false;
        let mut total_turn = 0.0;
        for i in 0..n {
            let a = points[(i + 1) % n] - points[i];
            let b = points[(i + 2) % n] - points[(i + 1) % n];
            let turn = a.perp_dot(b);
            if turn > COLLINEAR_EPSILON {
                turning_right = true;
            } else if turn < -COLLINEAR_EPSILON {
                turning_left = true;
            }
            total_turn += turn.atan2(a.dot(b));
        }

        match (turning_right, turning_left) {
            // A star turns the same way at every vertex but winds more than once.
            (true, false) if (total_turn - TAU).abs() > WINDING_EPSILON => {
                Err(ShapeError::NonConvex)
            }
            (true, false) => Ok(Self {
                points,
                normals,
                collision_type,
            }),
            (false, true) => Err(ShapeError::WrongWinding),
            (true, true) => Err(ShapeError::NonConvex),
            // Every point collinear: no area to collide with.
            (false, false) => Err(ShapeError::NonConvex),
        }
    }

    /// Axis-aligned rectangle with its top-left corner at `position`.
    pub fn rectangle(
        position: Vec2,
        width: f32,
        height: f32,
        collision_type: CollisionType,
    ) -> Result<Self, ShapeError> {
        if !(width > 0.0 && height > 0.0) || !width.is_finite() || !height.is_finite() {
            return Err(ShapeError::InvalidDimensions);
        }
        if !position.is_finite() {
            return Err(ShapeError::NonFinite);
        }
        Ok(Self {
            points: vec![
                position,
                position + Vec2::new(width, 0.0),
                position + Vec2::new(width, height),
                position + Vec2::new(0.0, height),
            ],
            normals: BoundingBox::NORMALS.to_vec(),
            collision_type,
        })
    }

    /// Build a hit box from its configuration with an already-resolved type.
    pub fn from_config(
        config: &HitBoxConfig,
        collision_type: CollisionType,
    ) -> Result<Self, ShapeError> {
        match config {
            HitBoxConfig::Polygon { points, .. } => Self::polygon(
                points.iter().map(|p| Vec2::from_array(*p)).collect(),
                collision_type,
            ),
            HitBoxConfig::Rectangle {
                position,
                width,
                height,
                ..
            } => Self::rectangle(Vec2::from_array(*position), *width, *height, collision_type),
        }
    }

    pub fn points(&self) -> &[Vec2] {
        &self.points
    }

    pub fn normals(&self) -> &[Vec2] {
        &self.normals
    }

    pub fn collision_type(&self) -> CollisionType {
        self.collision_type
    }

    /// Number of vertices (and edges).
    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Transform into world space for one pair test.
    pub fn to_world(&self, pose: &Pose) -> WorldHitBox {
        WorldHitBox {
            points: self
                .points
                .iter()
                .map(|p| pose.transform_point(*p))
                .collect(),
            normals: self
                .normals
                .iter()
                .map(|n| pose.transform_vector(*n))
                .collect(),
            collision_type: self.collision_type,
        }
    }
}

/// A hit box placed in world space. Lives only for the duration of a pair test.
#[derive(Debug, Clone, PartialEq)]
pub struct WorldHitBox {
    pub points: Vec<Vec2>,
    pub normals: Vec<Vec2>,
    pub collision_type: CollisionType,
}

/// The hit box frames of an object. Exactly one frame is active at a time.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Collision {
    frames: Vec<Vec<HitBox>>,
    current: usize,
}

impl Collision {
    pub fn new(frames: Vec<Vec<HitBox>>) -> Self {
        Self { frames, current: 0 }
    }

    /// A collision with a single, always-active frame.
    pub fn single(hitboxes: Vec<HitBox>) -> Self {
        Self::new(vec![hitboxes])
    }

    /// Build every frame from configuration. All polygons are validated here, once.
    pub fn from_config(
        config: &CollisionConfig,
        types: &CollisionTypeRegistry,
    ) -> Result<Self, ConfigError> {
        let mut frames = Vec::with_capacity(config.hit_boxes.len());
        for (frame, frame_config) in config.hit_boxes.iter().enumerate() {
            let mut hitboxes = Vec::with_capacity(frame_config.len());
            for (hitbox, hitbox_config) in frame_config.iter().enumerate() {
                let collision_type = types.resolve(hitbox_config.collision_type())?;
                let built = HitBox::from_config(hitbox_config, collision_type).map_err(|source| {
                    ConfigError::Shape {
                        frame,
                        hitbox,
                        source,
                    }
                })?;
                hitboxes.push(built);
            }
            frames.push(hitboxes);
        }
        Ok(Self::new(frames))
    }

    /// Select the active frame, e.g. to follow an animation.
    pub fn set_frame(&mut self, frame: usize) {
        if frame >= self.frames.len() && !self.frames.is_empty() {
            warn!(
                "Collision frame {} out of range ({} frames), using the last frame",
                frame,
                self.frames.len()
            );
            self.current = self.frames.len() - 1;
        } else {
            self.current = frame;
        }
    }

    pub fn frame(&self) -> usize {
        self.current
    }

    pub fn frame_count(&self) -> usize {
        self.frames.len()
    }

    /// Number of hit boxes in the active frame.
    pub fn hitbox_count(&self) -> usize {
        self.hitboxes().len()
    }

    /// Hit boxes of the active frame.
    pub fn hitboxes(&self) -> &[HitBox] {
        self.frames
            .get(self.current)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn iter(&self) -> std::slice::Iter<'_, HitBox> {
        self.hitboxes().iter()
    }

    /// Active hit boxes transformed into world space.
    pub fn to_world(&self, pose: &Pose) -> Vec<WorldHitBox> {
        self.iter().map(|hitbox| hitbox.to_world(pose)).collect()
    }
}

impl<'a> IntoIterator for &'a Collision {
    type Item = &'a HitBox;
    type IntoIter = std::slice::Iter<'a, HitBox>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Oriented rectangle covering an object's full extent, used for cheap rejection.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingBox {
    pub width: f32,
    pub height: f32,
    points: [Vec2; 4],
}

impl BoundingBox {
    /// Edge normals: up, right, down, left (y down).
    pub const NORMALS: [Vec2; 4] = [Vec2::NEG_Y, Vec2::X, Vec2::Y, Vec2::NEG_X];

    pub fn new(width: f32, height: f32) -> Self {
        Self {
            width,
            height,
            points: [
                Vec2::ZERO,
                Vec2::new(width, 0.0),
                Vec2::new(width, height),
                Vec2::new(0.0, height),
            ],
        }
    }

    /// Local-space corners, clockwise from the origin.
    pub fn points(&self) -> &[Vec2; 4] {
        &self.points
    }

    pub fn world_points(&self, pose: &Pose) -> [Vec2; 4] {
        self.points.map(|p| pose.transform_point(p))
    }

    pub fn world_normals(&self, pose: &Pose) -> [Vec2; 4] {
        Self::NORMALS.map(|n| pose.transform_vector(n))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::PI;

    const SOLID: CollisionType = CollisionType(0);

    #[test]
    fn test_rectangle_points_and_normals() {
        let hb = HitBox::rectangle(Vec2::new(10.0, 20.0), 100.0, 200.0, SOLID).unwrap();
        assert_eq!(hb.len(), 4);
        assert_eq!(hb.points()[2], Vec2::new(110.0, 220.0));
        assert_eq!(hb.normals(), &BoundingBox::NORMALS);
    }

    #[test]
    fn test_polygon_normals_are_outward_units() {
        let hb = HitBox::polygon(
            vec![Vec2::new(0.0, 0.0), Vec2::new(4.0, 0.0), Vec2::new(0.0, 4.0)],
            SOLID,
        )
        .unwrap();

        let eps = 1e-5;
        assert!((hb.normals()[0] - Vec2::NEG_Y).length() < eps);
        assert!((hb.normals()[1] - Vec2::new(1.0, 1.0).normalize()).length() < eps);
        assert!((hb.normals()[2] - Vec2::NEG_X).length() < eps);
    }

    #[test]
    fn test_polygon_validation() {
        let ccw = vec![Vec2::new(0.0, 0.0), Vec2::new(0.0, 4.0), Vec2::new(4.0, 0.0)];
        assert_eq!(HitBox::polygon(ccw, SOLID), Err(ShapeError::WrongWinding));

        let concave = vec![
            Vec2::new(0.0, 0.0),
            Vec2::new(4.0, 0.0),
            Vec2::new(4.0, 4.0),
            Vec2::new(2.0, 1.0),
            Vec2::new(0.0, 4.0),
        ];
        assert_eq!(HitBox::polygon(concave, SOLID), Err(ShapeError::NonConvex));

        let line = vec![Vec2::ZERO, Vec2::X];
        assert_eq!(HitBox::polygon(line, SOLID), Err(ShapeError::TooFewPoints(2)));

        let repeated = vec![Vec2::ZERO, Vec2::ZERO, Vec2::new(1.0, 1.0)];
        assert_eq!(
            HitBox::polygon(repeated, SOLID),
            Err(ShapeError::DegenerateEdge(0))
        );

        assert_eq!(
            HitBox::rectangle(Vec2::ZERO, 0.0, 1.0, SOLID),
            Err(ShapeError::InvalidDimensions)
        );
    }

    #[test]
    fn test_self_intersecting_star_is_rejected() {
        let star_point = |k: usize, step: f32| {
            let angle = k as f32 * step;
            Vec2::new(angle.cos(), angle.sin()) * 10.0
        };

        let pentagon: Vec<Vec2> = (0..5).map(|k| star_point(k, 0.4 * PI)).collect();
        assert!(HitBox::polygon(pentagon, SOLID).is_ok());

        let pentagram: Vec<Vec2> = (0..5).map(|k| star_point(k, 0.8 * PI)).collect();
        assert_eq!(HitBox::polygon(pentagram, SOLID), Err(ShapeError::NonConvex));
    }

    #[test]
    fn test_collision_frames() {
        let mut types = CollisionTypeRegistry::new();
        types.register("test0").unwrap();
        types.register("test1").unwrap();

        let config: CollisionConfig = serde_json::from_str(
            r#"{ "hit_boxes": [
                [ { "position": [10, 20], "width": 100, "height": 200, "type": "test0" } ],
                [ { "position": [10, 20], "width": 1, "height": 2, "type": "test1" },
                  { "position": [20, 30], "width": 10, "height": 20, "type": "test1" },
                  { "points": [[0, 0], [4, 0], [2, 3]], "type": "test0" } ]
            ] }"#,
        )
        .unwrap();

        let mut collision = Collision::from_config(&config, &types).unwrap();
        assert_eq!(collision.frame_count(), 2);
        assert_eq!(collision.hitbox_count(), 1);
        assert_eq!(collision.iter().next().unwrap().collision_type(), CollisionType(0));

        collision.set_frame(1);
        assert_eq!(collision.hitbox_count(), 3);
        assert_eq!((&collision).into_iter().count(), 3);

        collision.set_frame(7);
        assert_eq!(collision.frame(), 1);
    }

    #[test]
    fn test_collision_config_errors() {
        let mut types = CollisionTypeRegistry::new();
        types.register("solid").unwrap();

        let unknown: CollisionConfig = serde_json::from_str(
            r#"{ "hit_boxes": [[ { "position": [0, 0], "width": 1, "height": 1, "type": "hurt" } ]] }"#,
        )
        .unwrap();
        assert_eq!(
            Collision::from_config(&unknown, &types),
            Err(ConfigError::UnknownCollisionType {
                name: "hurt".into()
            })
        );

        let bad_shape: CollisionConfig = serde_json::from_str(
            r#"{ "hit_boxes": [[], [ { "points": [[0, 0], [0, 4], [4, 0]], "type": "solid" } ]] }"#,
        )
        .unwrap();
        assert_eq!(
            Collision::from_config(&bad_shape, &types),
            Err(ConfigError::Shape {
                frame: 1,
                hitbox: 0,
                source: ShapeError::WrongWinding
            })
        );
    }

    #[test]
    fn test_empty_collision_has_no_hitboxes() {
        let collision = Collision::default();
        assert_eq!(collision.hitbox_count(), 0);
        assert!(collision.iter().next().is_none());
    }

    #[test]
    fn test_bounding_box_world_points() {
        let bbox = BoundingBox::new(2.0, 1.0);
        let pose = Pose::new(Vec2::new(5.0, 5.0), std::f32::consts::PI);
        let points = bbox.world_points(&pose);

        let eps = 1e-5;
        assert!((points[0] - Vec2::new(5.0, 5.0)).length() < eps);
        assert!((points[2] - Vec2::new(3.0, 4.0)).length() < eps);
        assert!((bbox.world_normals(&pose)[1] - Vec2::NEG_X).length() < eps);
    }
}
