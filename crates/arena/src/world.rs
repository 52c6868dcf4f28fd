//! # Arena World
//!
//! Owns the static geometry (boundary walls, obstacle rectangles, optional
//! goal) and the robot body, and advances the simulation one fixed tick at a
//! time. Velocity damping and the push-out collision response approximate a
//! rigid body sliding against static geometry.

use crate::collision::{detect_circle_rect, detect_circle_segment, Contact};
use crate::robot::RobotBody;
use crate::shapes::{Goal, Rect};
use crate::types::Vec2;

/// Fixed simulation tick in seconds.
pub const TICK: f32 = 1.0 / 30.0;

/// Fraction of velocity a body retains per second.
pub const DAMPING: f32 = 0.75;

/// Physical thickness of the boundary wall segments.
pub const WALL_RADIUS: f32 = 2.0;

/// Penetration below this depth is resolved without reporting a collision.
const CONTACT_SLOP: f32 = 1e-3;

/// Boundary wall segments inset by `margin` from the nominal arena edges.
#[must_use]
pub fn boundary_segments(width: f32, height: f32, margin: f32) -> [(Vec2, Vec2); 4] {
    let corners = [
        Vec2::new(margin, margin),
        Vec2::new(width - margin, margin),
        Vec2::new(width - margin, height - margin),
        Vec2::new(margin, height - margin),
    ];
    [
        (corners[0], corners[1]),
        (corners[1], corners[2]),
        (corners[2], corners[3]),
        (corners[3], corners[0]),
    ]
}

#[derive(Debug, Clone)]
pub struct World {
    width: f32,
    height: f32,
    wall_margin: f32,
    pub robot: RobotBody,
    pub goal: Option<Goal>,
    obstacles: Vec<Rect>,
    walls: [(Vec2, Vec2); 4],
}

impl World {
    #[must_use]
    pub fn new(
        width: f32,
        height: f32,
        wall_margin: f32,
        obstacles: Vec<Rect>,
        goal: Option<Goal>,
    ) -> Self {
        Self {
            width,
            height,
            wall_margin,
            robot: RobotBody::new(Vec2::new(width / 2.0, height / 2.0)),
            goal,
            obstacles,
            walls: boundary_segments(width, height, wall_margin),
        }
    }

    #[must_use]
    pub fn width(&self) -> f32 {
        self.width
    }

    #[must_use]
    pub fn height(&self) -> f32 {
        self.height
    }

    #[must_use]
    pub fn wall_margin(&self) -> f32 {
        self.wall_margin
    }

    #[must_use]
    pub fn obstacles(&self) -> &[Rect] {
        &self.obstacles
    }

    #[must_use]
    pub fn wall_segments(&self) -> &[(Vec2, Vec2)] {
        &self.walls
    }

    /// Advance the simulation by `dt` seconds and report whether the robot
    /// hit any geometry during the tick.
    ///
    /// Damping is applied to the velocity first, then the position is
    /// integrated, then any penetration is resolved by pushing the robot out
    /// along the contact normal while removing the velocity component driving
    /// it in. The robot therefore slides along walls instead of sticking.
    /// Contacts shallower than the slop are resolved silently, so a body
    /// left resting against a wall by a previous push-out does not report
    /// the same hit again on the next tick.
    pub fn step(&mut self, dt: f32) -> bool {
        self.robot.velocity = self.robot.velocity * DAMPING.powf(dt);
        self.robot.pos += self.robot.velocity * dt;

        let mut collided = false;
        let contacts = self.gather_contacts(self.robot.pos, self.robot.radius);
        for contact in contacts {
            if contact.depth > CONTACT_SLOP {
                collided = true;
            }
            self.robot.pos += contact.normal * contact.depth;
            let inward = self.robot.velocity.dot(contact.normal);
            if inward < 0.0 {
                self.robot.velocity += contact.normal * -inward;
            }
        }
        collided
    }

    fn gather_contacts(&self, center: Vec2, radius: f32) -> Vec<Contact> {
        let mut contacts = Vec::new();
        for &(a, b) in &self.walls {
            if let Some(c) = detect_circle_segment(center, radius, a, b, WALL_RADIUS) {
                contacts.push(c);
            }
        }
        for rect in &self.obstacles {
            if let Some(c) = detect_circle_rect(center, radius, rect) {
                contacts.push(c);
            }
        }
        contacts
    }

    /// Whether a circle at `pos` clears every wall and obstacle.
    #[must_use]
    pub fn is_position_free(&self, pos: Vec2, radius: f32) -> bool {
        self.gather_contacts(pos, radius).is_empty()
    }

    /// Distance from the robot center to the nearest obstacle surface, or
    /// `None` when the arena has no obstacles.
    #[must_use]
    pub fn nearest_obstacle_distance(&self, pos: Vec2) -> Option<f32> {
        self.obstacles
            .iter()
            .map(|rect| {
                let closest = crate::collision::closest_point_on_rect(pos, rect);
                pos.distance(closest)
            })
            .min_by(f32::total_cmp)
    }

    /// True when the robot center is within the combined goal and robot
    /// radii of the goal center. Always false without a goal.
    #[must_use]
    pub fn check_goal_reached(&self) -> bool {
        self.goal.is_some_and(|goal| {
            self.robot.pos.distance(goal.pos) <= goal.radius + self.robot.radius
        })
    }

    /// Put the robot back at the arena center with the given heading and no
    /// velocity. Spawn placement beyond the center is the caller's concern.
    pub fn reset(&mut self, heading_degrees: f32) {
        let center = Vec2::new(self.width / 2.0, self.height / 2.0);
        self.robot.reset(center, heading_degrees);
    }

    /// Swap the obstacle layout in one assignment. Every query after this
    /// call sees only the new layout; the walls, goal and robot are
    /// untouched.
    pub fn replace_obstacles(&mut self, obstacles: Vec<Rect>) {
        tracing::debug!(
            old = self.obstacles.len(),
            new = obstacles.len(),
            "replacing obstacle layout"
        );
        self.obstacles = obstacles;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn damping_slows_a_coasting_body() {
        let mut world = World::new(640.0, 480.0, 20.0, Vec::new(), None);
        world.robot.place(Vec2::new(320.0, 240.0));
        world.robot.velocity = Vec2::new(120.0, 0.0);
        world.step(TICK);
        assert!(world.robot.velocity.x < 120.0);
        assert!(world.robot.velocity.x > 118.0, "damping is mild per tick");
    }

    #[test]
    fn wall_contact_reports_collision_and_pushes_out() {
        let mut world = World::new(640.0, 480.0, 20.0, Vec::new(), None);
        // Just inside the left wall at x = 20, driving into it.
        world.robot.place(Vec2::new(40.0, 240.0));
        world.robot.heading_degrees = 180.0;
        world.robot.drive_forward();
        let mut collided = false;
        for _ in 0..20 {
            collided = world.step(TICK);
            if collided {
                break;
            }
        }
        assert!(collided, "driving into the wall must collide");
        let clearance = world.robot.pos.x - 20.0;
        assert!(
            clearance >= world.robot.radius + WALL_RADIUS - 1e-3,
            "push-out leaves the body clear of the wall, got clearance {clearance}"
        );
    }

    #[test]
    fn resting_contact_after_push_out_is_silent() {
        let mut world = World::new(640.0, 480.0, 20.0, Vec::new(), None);
        world.robot.place(Vec2::new(600.0, 240.0));
        world.robot.drive_forward();
        let mut hit = false;
        for _ in 0..10 {
            hit = world.step(TICK) || hit;
        }
        assert!(hit, "driving right into the wall must hit");
        world.robot.halt();
        assert!(
            !world.step(TICK),
            "a body left resting at the wall is not a new hit"
        );
    }

    #[test]
    fn goal_requires_overlap_of_combined_radii() {
        let goal = Goal::new(Vec2::new(400.0, 240.0), 18.0);
        let mut world = World::new(640.0, 480.0, 20.0, Vec::new(), Some(goal));
        world.robot.place(Vec2::new(320.0, 240.0));
        assert!(!world.check_goal_reached());
        world.robot.place(Vec2::new(368.0, 240.0));
        assert!(world.check_goal_reached(), "within 18 + 15 units");
    }

    #[test]
    fn replace_obstacles_is_visible_to_queries() {
        let mut world = World::new(640.0, 480.0, 20.0, Vec::new(), None);
        let pos = Vec2::new(320.0, 240.0);
        assert!(world.is_position_free(pos, 15.0));
        world.replace_obstacles(vec![Rect::new(300.0, 220.0, 40.0, 40.0)]);
        assert!(!world.is_position_free(pos, 15.0));
    }

    #[test]
    fn reset_centers_robot_with_heading() {
        let mut world = World::new(640.0, 480.0, 20.0, Vec::new(), None);
        world.robot.place(Vec2::new(100.0, 100.0));
        world.reset(415.0);
        assert_eq!(world.robot.pos, Vec2::new(320.0, 240.0));
        assert!((world.robot.heading_degrees - 55.0).abs() < 1e-4);
        assert_eq!(world.robot.velocity, Vec2::ZERO);
    }
}
