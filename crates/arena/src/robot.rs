use crate::types::{wrap_degrees, Vec2};

/// Circular robot body with a heading and primitive motion commands.
///
/// Which command a given action maps to is decided by the environment layer;
/// the body only knows how to point itself, drive and stop.
#[derive(Clone, Debug)]
pub struct RobotBody {
    pub pos: Vec2,
    /// Heading in degrees, always kept in `[0, 360)`.
    pub heading_degrees: f32,
    pub velocity: Vec2,
    pub radius: f32,
    /// Forward drive speed in world units per second.
    pub speed: f32,
    /// Heading change per turn command, in degrees.
    pub turn_rate_degrees: f32,
}

impl RobotBody {
    pub const DEFAULT_RADIUS: f32 = 15.0;
    pub const DEFAULT_SPEED: f32 = 130.0;
    pub const DEFAULT_TURN_RATE: f32 = 12.0;

    #[must_use]
    pub fn new(pos: Vec2) -> Self {
        Self {
            pos,
            heading_degrees: 0.0,
            velocity: Vec2::ZERO,
            radius: Self::DEFAULT_RADIUS,
            speed: Self::DEFAULT_SPEED,
            turn_rate_degrees: Self::DEFAULT_TURN_RATE,
        }
    }

    #[must_use]
    pub fn heading_radians(&self) -> f32 {
        self.heading_degrees.to_radians()
    }

    /// Unit vector along the current heading.
    #[must_use]
    pub fn direction(&self) -> Vec2 {
        Vec2::from_degrees(self.heading_degrees)
    }

    /// Set velocity to full speed along the current heading.
    pub fn drive_forward(&mut self) {
        self.drive_scaled(1.0);
    }

    /// Set velocity along the current heading at `scale` times the configured
    /// speed. Negative scales drive backward.
    pub fn drive_scaled(&mut self, scale: f32) {
        self.velocity = self.direction() * (self.speed * scale);
    }

    pub fn turn(&mut self, delta_degrees: f32) {
        self.heading_degrees = wrap_degrees(self.heading_degrees + delta_degrees);
    }

    pub fn halt(&mut self) {
        self.velocity = Vec2::ZERO;
    }

    /// Move the body to `pos` and zero its velocity.
    pub fn place(&mut self, pos: Vec2) {
        self.pos = pos;
        self.velocity = Vec2::ZERO;
    }

    pub fn reset(&mut self, pos: Vec2, heading_degrees: f32) {
        self.place(pos);
        self.heading_degrees = wrap_degrees(heading_degrees);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn turn_wraps_heading() {
        let mut robot = RobotBody::new(Vec2::ZERO);
        robot.turn(-12.0);
        assert!((robot.heading_degrees - 348.0).abs() < 1e-4);
        robot.turn(24.0);
        assert!((robot.heading_degrees - 12.0).abs() < 1e-4);
    }

    #[test]
    fn drive_scaled_points_along_heading() {
        let mut robot = RobotBody::new(Vec2::ZERO);
        robot.heading_degrees = 90.0;
        robot.drive_scaled(0.5);
        assert!(robot.velocity.x.abs() < 1e-4);
        assert!((robot.velocity.y - RobotBody::DEFAULT_SPEED * 0.5).abs() < 1e-3);
    }
}
