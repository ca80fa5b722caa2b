//! Narrowphase: separating axis tests between world-space hit boxes.

use glam::Vec2;
use tracing::trace;

use super::broadphase::polygon_contains_points;
use super::collider::WorldHitBox;
use super::contact::{ContactKind, ContactPair};

/// A candidate contact axis.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Axis {
    /// Normal pointing from the first hit box towards the second.
    pub normal: Vec2,
    pub depth: f32,
    /// Deepest vertex along `normal`.
    pub point: Vec2,
}

impl Axis {
    /// Shallower axes win. On an exact tie the more vertical normal wins.
    fn is_better_than(&self, other: &Axis) -> bool {
        self.depth < other.depth
            || (self.depth == other.depth && self.normal.y.abs() > other.normal.y.abs())
    }
}

enum Sweep {
    Separated,
    Overlapping(Option<Axis>),
}

/// Sweep the edge normals of `reference` against the vertices of `incident`.
///
/// Axes where the polygons only touch carry no depth and are never chosen.
/// With `flip` set, the recorded normals are negated so they still point from
/// the first hit box of the pair towards the second.
fn sweep(reference: &WorldHitBox, incident: &WorldHitBox, flip: bool) -> Sweep {
    let mut best: Option<Axis> = None;

    for (edge_point, normal) in reference.points.iter().zip(&reference.normals) {
        let mut min = f32::MAX;
        let mut deepest = *edge_point;
        for q in &incident.points {
            let d = (*q - *edge_point).dot(*normal);
            if d < min {
                min = d;
                deepest = *q;
            }
        }

        if min > 0.0 {
            trace!("Separating axis {:?} at distance {}", normal, min);
            return Sweep::Separated;
        }

        let depth = -min;
        if depth > 0.0 {
            let axis = Axis {
                normal: if flip { -*normal } else { *normal },
                depth,
                point: deepest,
            };
            if best.map_or(true, |b| axis.is_better_than(&b)) {
                best = Some(axis);
            }
        }
    }

    Sweep::Overlapping(best)
}

/// Find the shallowest penetration axis between two hit boxes.
///
/// Returns `None` if a separating axis exists or the boxes only touch.
/// Axes of `a` are considered before axes of `b`.
pub fn shallowest_axis(a: &WorldHitBox, b: &WorldHitBox) -> Option<Axis> {
    let Sweep::Overlapping(from_a) = sweep(a, b, false) else {
        return None;
    };
    let Sweep::Overlapping(from_b) = sweep(b, a, true) else {
        return None;
    };

    match (from_a, from_b) {
        (Some(x), Some(y)) => Some(if y.is_better_than(&x) { y } else { x }),
        (x, y) => x.or(y),
    }
}

/// Symmetric collision test between two hit boxes.
///
/// The first contact of the pair belongs to `a` and its normal points from
/// `a` towards `b`.
pub fn collide_hitboxes(a: &WorldHitBox, b: &WorldHitBox) -> Option<ContactPair> {
    let axis = shallowest_axis(a, b)?;
    trace!(
        "Hit boxes overlap: normal {:?}, depth {}",
        axis.normal,
        axis.depth
    );
    Some(ContactPair::new(
        ContactKind::Collide,
        axis.normal,
        axis.depth,
        axis.point,
        a.collision_type,
        b.collision_type,
    ))
}

/// Whether every point lies inside (or on) the container hit box.
pub fn encloses(container: &WorldHitBox, points: &[Vec2]) -> bool {
    polygon_contains_points(&container.points, &container.normals, points)
}

/// Containment test: find the vertex of `contained` furthest outside any
/// edge of `container`.
///
/// The first contact belongs to the container and carries that edge's
/// outward normal; the second belongs to the contained object and points
/// back inside. Depth is the protrusion past the edge.
pub fn contain_hitbox(container: &WorldHitBox, contained: &WorldHitBox) -> Option<ContactPair> {
    let mut worst: Option<Axis> = None;

    for (edge_point, normal) in container.points.iter().zip(&container.normals) {
        for q in &contained.points {
            let d = (*q - *edge_point).dot(*normal);
            if d > 0.0 && worst.map_or(true, |w| d > w.depth) {
                worst = Some(Axis {
                    normal: *normal,
                    depth: d,
                    point: *q,
                });
            }
        }
    }

    let axis = worst?;
    Some(ContactPair::new(
        ContactKind::Contain,
        axis.normal,
        axis.depth,
        axis.point,
        container.collision_type,
        contained.collision_type,
    ))
}
