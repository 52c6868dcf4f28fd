//! Ray queries against segments and rectangles.
//!
//! Both functions return the distance along the ray to the first hit, or
//! `None` when the geometry is missed entirely. Rays are treated as
//! half-lines starting at the origin; segment thickness is ignored here
//! because the sensors measure to the geometric centerline.

use crate::shapes::Rect;
use crate::types::Vec2;

fn cross(a: Vec2, b: Vec2) -> f32 {
    a.x * b.y - a.y * b.x
}

/// Distance along the ray `origin + t * dir` to the segment `[a, b]`.
///
/// `dir` must be a unit vector so the returned `t` is a distance.
#[must_use]
pub fn ray_segment(origin: Vec2, dir: Vec2, a: Vec2, b: Vec2) -> Option<f32> {
    let seg = b - a;
    let denom = cross(dir, seg);
    if denom.abs() <= f32::EPSILON {
        // Parallel or degenerate segment.
        return None;
    }
    let to_a = a - origin;
    let t = cross(to_a, seg) / denom;
    let s = cross(to_a, dir) / denom;
    if t >= 0.0 && (0.0..=1.0).contains(&s) {
        Some(t)
    } else {
        None
    }
}

/// Distance along the ray to an axis-aligned rectangle, via the slab method.
///
/// An origin inside the rectangle reports a hit at distance zero.
#[must_use]
pub fn ray_rect(origin: Vec2, dir: Vec2, rect: &Rect) -> Option<f32> {
    let min = rect.min();
    let max = rect.max();

    let mut t_near = f32::NEG_INFINITY;
    let mut t_far = f32::INFINITY;

    for axis in 0..2 {
        let (o, d, lo, hi) = if axis == 0 {
            (origin.x, dir.x, min.x, max.x)
        } else {
            (origin.y, dir.y, min.y, max.y)
        };
        if d.abs() <= f32::EPSILON {
            if o < lo || o > hi {
                return None;
            }
        } else {
            let inv = 1.0 / d;
            let mut t0 = (lo - o) * inv;
            let mut t1 = (hi - o) * inv;
            if t0 > t1 {
                std::mem::swap(&mut t0, &mut t1);
            }
            t_near = t_near.max(t0);
            t_far = t_far.min(t1);
            if t_near > t_far {
                return None;
            }
        }
    }

    if t_far < 0.0 {
        return None;
    }
    Some(t_near.max(0.0))
}
