#![deny(clippy::all, clippy::pedantic)]
#![allow(clippy::module_name_repetitions, clippy::cast_precision_loss)]
//! # Arena Simulation
//!
//! A 2D top-down arena for wheeled robot navigation. The crate owns the world
//! geometry, the robot body, collision detection and the simulated distance
//! sensors; the reinforcement learning layer on top decides what actions mean
//! and what behavior is rewarded.
//!
//! ## Key Components
//!
//! -   **World:** The [`World`] struct holds the boundary walls, obstacle
//!     rectangles, optional [`Goal`] and the [`RobotBody`], and advances the
//!     simulation in fixed ticks with damping and push-out collision
//!     response.
//! -   **Collision:** The [`collision`] module provides the circle vs
//!     rectangle and circle vs segment overlap tests plus the ray queries
//!     the sensors are built on.
//! -   **Sensors:** The [`sensors`] module casts normalized range-finder
//!     rays, either as an even fan across a field of view or at fixed
//!     relative angles, and groups rays into front, left and right spans via
//!     [`SensorSpans`].
//!
//! ## Usage
//!
//! ```rust,ignore
//! use arena::{World, Vec2, TICK};
//!
//! let mut world = World::new(640.0, 480.0, 20.0, obstacles, None);
//! world.robot.place(Vec2::new(320.0, 240.0));
//! world.robot.drive_forward();
//! let collided = world.step(TICK);
//! ```

pub mod collision;
pub mod error;
pub mod robot;
pub mod sensors;
pub mod shapes;
pub mod types;
pub mod world;

pub use error::ArenaError;
pub use robot::RobotBody;
pub use sensors::{
    cast_rays, cast_rays_at_angles, direction_label, mean_distance, Clearances, SensorSpans,
};
pub use shapes::{Goal, Rect};
pub use types::{wrap_degrees, wrap_relative_degrees, Vec2};
pub use world::{boundary_segments, World, DAMPING, TICK, WALL_RADIUS};
