//! # Distance Sensors
//!
//! Simulated range-finder rays cast from the robot center against the arena
//! geometry. Readings are normalized to `[0, 1]` where `1.0` means nothing
//! was hit within the ray length and `0.0` means contact at the origin.
//!
//! Two layouts are supported: an evenly spaced fan across a field of view
//! centered on the robot heading, and a fixed list of angles relative to the
//! heading.

use crate::collision::{ray_rect, ray_segment};
use crate::error::ArenaError;
use crate::types::{wrap_relative_degrees, Vec2};
use crate::world::World;

/// Cast a fan of `ray_count` rays spanning `fov_degrees` centered on the
/// robot heading. Readings are ordered from the most negative relative angle
/// to the most positive.
///
/// # Errors
///
/// Fails when `ray_count < 2`, since the fan spacing divides by
/// `ray_count - 1`.
pub fn cast_rays(
    world: &World,
    ray_count: usize,
    ray_length: f32,
    fov_degrees: f32,
) -> Result<Vec<f32>, ArenaError> {
    if ray_count < 2 {
        return Err(ArenaError::InvalidRayCount { got: ray_count });
    }
    let heading = world.robot.heading_degrees;
    let start = heading - fov_degrees / 2.0;
    #[allow(clippy::cast_precision_loss)]
    let step = fov_degrees / (ray_count - 1) as f32;

    let mut readings = Vec::with_capacity(ray_count);
    for i in 0..ray_count {
        #[allow(clippy::cast_precision_loss)]
        let angle = start + step * i as f32;
        readings.push(cast_single(world, angle, ray_length));
    }
    Ok(readings)
}

/// Cast one ray per entry of `angles_degrees`, each relative to the robot
/// heading. Readings keep the input order.
#[must_use]
pub fn cast_rays_at_angles(world: &World, angles_degrees: &[f32], ray_length: f32) -> Vec<f32> {
    let heading = world.robot.heading_degrees;
    angles_degrees
        .iter()
        .map(|rel| cast_single(world, heading + rel, ray_length))
        .collect()
}

/// Single ray at an absolute angle, normalized to `[0, 1]`.
fn cast_single(world: &World, angle_degrees: f32, ray_length: f32) -> f32 {
    let origin = world.robot.pos;
    let dir = Vec2::from_degrees(angle_degrees);

    let mut best = ray_length;
    for &(a, b) in world.wall_segments() {
        if let Some(t) = ray_segment(origin, dir, a, b) {
            best = best.min(t);
        }
    }
    for rect in world.obstacles() {
        if let Some(t) = ray_rect(origin, dir, rect) {
            best = best.min(t);
        }
    }
    best / ray_length
}

/// Human-readable label for a bearing relative to the robot heading.
#[must_use]
pub fn direction_label(relative_degrees: f32) -> &'static str {
    let rel = wrap_relative_degrees(relative_degrees);
    if (-22.5..22.5).contains(&rel) {
        "Front"
    } else if (22.5..67.5).contains(&rel) {
        "Front-Right"
    } else if (67.5..112.5).contains(&rel) {
        "Right"
    } else if (112.5..157.5).contains(&rel) {
        "Rear-Right"
    } else if !(-157.5..157.5).contains(&rel) {
        "Rear"
    } else if (-157.5..-112.5).contains(&rel) {
        "Rear-Left"
    } else if (-112.5..-67.5).contains(&rel) {
        "Left"
    } else {
        "Front-Left"
    }
}

/// Mean of the readings, `0.0` for an empty slice.
#[must_use]
pub fn mean_distance(rays: &[f32]) -> f32 {
    if rays.is_empty() {
        return 0.0;
    }
    #[allow(clippy::cast_precision_loss)]
    let len = rays.len() as f32;
    rays.iter().sum::<f32>() / len
}

/// Minimum clearance per angular span of a ray layout.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Clearances {
    pub front: f32,
    pub left: f32,
    pub right: f32,
}

/// Precomputed ray indices for the front, left and right angular spans.
///
/// Left covers rays at negative relative angles, the side a left turn swings
/// the heading toward, and right covers positive relative angles. The front
/// span overlaps both sides near the heading axis.
#[derive(Debug, Clone)]
pub struct SensorSpans {
    front: Vec<usize>,
    left: Vec<usize>,
    right: Vec<usize>,
}

impl SensorSpans {
    const FRONT_HALF_WIDTH: f32 = 35.0;
    const SIDE_THRESHOLD: f32 = 20.0;

    /// Spans for an evenly spaced fan of `ray_count` rays. The front window
    /// covers roughly the middle fifth of the fan regardless of the field of
    /// view; everything below the center index is left, everything above is
    /// right.
    #[must_use]
    pub fn fan(ray_count: usize) -> Self {
        if ray_count < 3 {
            return Self::whole_range(ray_count);
        }
        #[allow(clippy::cast_precision_loss)]
        let center = (ray_count - 1) as f32 / 2.0;
        #[allow(clippy::cast_precision_loss)]
        let front_span = (ray_count as f32 * 0.22).round().max(1.0);

        let mut front = Vec::new();
        let mut left = Vec::new();
        let mut right = Vec::new();
        for i in 0..ray_count {
            #[allow(clippy::cast_precision_loss)]
            let offset = i as f32 - center;
            if offset.abs() <= front_span {
                front.push(i);
            }
            if offset < -0.5 {
                left.push(i);
            }
            if offset > 0.5 {
                right.push(i);
            }
        }
        Self { front, left, right }
    }

    /// Spans for a fixed list of relative angles.
    #[must_use]
    pub fn fixed(angles_degrees: &[f32]) -> Self {
        if angles_degrees.len() < 3 {
            return Self::whole_range(angles_degrees.len());
        }
        let mut front = Vec::new();
        let mut left = Vec::new();
        let mut right = Vec::new();
        for (i, &raw) in angles_degrees.iter().enumerate() {
            let a = wrap_relative_degrees(raw);
            if a.abs() <= Self::FRONT_HALF_WIDTH {
                front.push(i);
            }
            if a < -Self::SIDE_THRESHOLD {
                left.push(i);
            }
            if a > Self::SIDE_THRESHOLD {
                right.push(i);
            }
        }
        Self { front, left, right }
    }

    fn whole_range(count: usize) -> Self {
        let all: Vec<usize> = (0..count).collect();
        Self {
            front: all.clone(),
            left: all.clone(),
            right: all,
        }
    }

    /// Minimum reading per span. A span with no rays falls back to the
    /// global minimum so narrow layouts still produce usable clearances.
    #[must_use]
    pub fn clearances(&self, rays: &[f32]) -> Clearances {
        let global = rays.iter().copied().fold(1.0_f32, f32::min);
        let span_min = |indices: &[usize]| {
            indices
                .iter()
                .filter_map(|&i| rays.get(i).copied())
                .fold(f32::INFINITY, f32::min)
        };
        let pick = |m: f32| if m.is_finite() { m } else { global };
        Clearances {
            front: pick(span_min(&self.front)),
            left: pick(span_min(&self.left)),
            right: pick(span_min(&self.right)),
        }
    }
}
