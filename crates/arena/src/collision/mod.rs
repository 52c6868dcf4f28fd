//! # Collision Detection
//!
//! Overlap tests between the circular robot body and the static arena
//! geometry (boundary wall segments and obstacle rectangles), plus the ray
//! queries the distance sensors are built on.

mod circle_rect;
mod circle_segment;
mod raycast;

pub use circle_rect::*;
pub use circle_segment::*;
pub use raycast::*;

use crate::types::Vec2;

/// Contact information for collision response.
#[derive(Debug, Clone, Copy)]
pub struct Contact {
    /// Contact normal pointing from the geometry toward the robot.
    pub normal: Vec2,
    /// Penetration depth along the normal.
    pub depth: f32,
}
