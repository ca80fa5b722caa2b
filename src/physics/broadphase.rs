//! Broadphase rejection using oriented bounding boxes.

use glam::Vec2;

use super::collider::BoundingBox;
use super::transform::Pose;

/// Test whether two oriented bounding boxes overlap.
///
/// Eight axes are tested: the four edge normals of each box. A pair is
/// rejected as soon as one axis separates them. Exactly touching boxes are
/// not separated.
pub fn bounding_boxes_overlap(
    box_a: &BoundingBox,
    pose_a: &Pose,
    box_b: &BoundingBox,
    pose_b: &Pose,
) -> bool {
    let points_a = box_a.world_points(pose_a);
    let points_b = box_b.world_points(pose_b);

    !has_separating_edge(&points_a, &box_a.world_normals(pose_a), &points_b)
        && !has_separating_edge(&points_b, &box_b.world_normals(pose_b), &points_a)
}

/// True if every point of `other` lies strictly outside one of the edges.
#[inline]
fn has_separating_edge(points: &[Vec2; 4], normals: &[Vec2; 4], other: &[Vec2; 4]) -> bool {
    points.iter().zip(normals).any(|(edge_point, normal)| {
        let edge = edge_point.dot(*normal);
        other.iter().all(|p| p.dot(*normal) - edge > 0.0)
    })
}

/// Test whether every corner of `inner` lies inside the convex polygon.
///
/// Points on an edge count as inside.
pub fn polygon_contains_points(points: &[Vec2], normals: &[Vec2], inner: &[Vec2]) -> bool {
    points.iter().zip(normals).all(|(edge_point, normal)| {
        let edge = edge_point.dot(*normal);
        inner.iter().all(|p| p.dot(*normal) - edge <= 0.0)
    })
}
