//! Circle vs axis-aligned rectangle collision detection.

use super::Contact;
use crate::shapes::Rect;
use crate::types::Vec2;

/// Closest point on (or inside) a rectangle to the given point.
#[must_use]
pub fn closest_point_on_rect(point: Vec2, rect: &Rect) -> Vec2 {
    let min = rect.min();
    let max = rect.max();
    Vec2::new(point.x.clamp(min.x, max.x), point.y.clamp(min.y, max.y))
}

/// Detect collision between a circle and an axis-aligned rectangle.
///
/// Returns a contact with the normal pointing from the rectangle toward the
/// circle center. When the center sits inside the rectangle the normal is
/// taken from the nearest face.
#[must_use]
pub fn detect_circle_rect(center: Vec2, radius: f32, rect: &Rect) -> Option<Contact> {
    let closest = closest_point_on_rect(center, rect);
    let delta = center - closest;
    let dist_sq = delta.length_squared();

    if dist_sq > radius * radius {
        return None;
    }

    if dist_sq > f32::EPSILON {
        let dist = dist_sq.sqrt();
        return Some(Contact {
            normal: delta * (1.0 / dist),
            depth: radius - dist,
        });
    }

    // Center inside the rectangle: push out through the nearest face.
    let min = rect.min();
    let max = rect.max();
    let left = center.x - min.x;
    let right = max.x - center.x;
    let bottom = center.y - min.y;
    let top = max.y - center.y;

    let mut depth = left;
    let mut normal = Vec2::new(-1.0, 0.0);
    if right < depth {
        depth = right;
        normal = Vec2::new(1.0, 0.0);
    }
    if bottom < depth {
        depth = bottom;
        normal = Vec2::new(0.0, -1.0);
    }
    if top < depth {
        depth = top;
        normal = Vec2::new(0.0, 1.0);
    }

    Some(Contact {
        normal,
        depth: depth + radius,
    })
}
