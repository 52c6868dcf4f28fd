//! Circle vs thick line segment collision detection.
//!
//! The arena boundary is four wall segments with a small physical radius, so
//! the robot collides with a wall when the distance from its center to the
//! segment drops below the sum of both radii.

use super::Contact;
use crate::types::Vec2;

/// Closest point on the segment `[a, b]` to the given point.
#[must_use]
pub fn closest_point_on_segment(point: Vec2, a: Vec2, b: Vec2) -> Vec2 {
    let ab = b - a;
    let len_sq = ab.length_squared();
    if len_sq <= f32::EPSILON {
        return a;
    }
    let t = ((point - a).dot(ab) / len_sq).clamp(0.0, 1.0);
    a + ab * t
}

/// Detect collision between a circle and a segment with thickness
/// `seg_radius`. The normal points from the segment toward the circle center.
#[must_use]
pub fn detect_circle_segment(
    center: Vec2,
    radius: f32,
    a: Vec2,
    b: Vec2,
    seg_radius: f32,
) -> Option<Contact> {
    let closest = closest_point_on_segment(center, a, b);
    let delta = center - closest;
    let dist_sq = delta.length_squared();
    let combined = radius + seg_radius;

    if dist_sq > combined * combined {
        return None;
    }

    if dist_sq > f32::EPSILON {
        let dist = dist_sq.sqrt();
        return Some(Contact {
            normal: delta * (1.0 / dist),
            depth: combined - dist,
        });
    }

    // Degenerate: center exactly on the segment. Push out perpendicular.
    let ab = b - a;
    let normal = if ab.length_squared() > f32::EPSILON {
        let inv = 1.0 / ab.length();
        Vec2::new(-ab.y * inv, ab.x * inv)
    } else {
        Vec2::new(0.0, 1.0)
    };
    Some(Contact {
        normal,
        depth: combined,
    })
}
