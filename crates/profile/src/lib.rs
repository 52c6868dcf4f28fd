#![deny(clippy::all, clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
//! # Environment Profiles
//!
//! Serde configuration model for the arena environments. A profile bundles
//! the world geometry, sensor layout, dynamics noise and robot parameters
//! under one key; environments consume a fully resolved [`EnvProfile`] and
//! never look anything up themselves. The [`catalog`] module holds the
//! built-in profiles and the [`store`] module layers JSON-file-backed custom
//! profiles on top.

use anyhow::Result;
use arena::{Goal, Rect, RobotBody, Vec2, World};
use serde::{Deserialize, Serialize};

pub mod catalog;
pub mod store;

pub use store::{ProfileStore, ProfileSummary};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EnvProfile {
    pub label: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub metadata: Metadata,
    pub world: WorldConfig,
    pub sensor: SensorConfig,
    #[serde(default)]
    pub dynamics: DynamicsConfig,
    #[serde(default)]
    pub robot: RobotConfig,
}

impl EnvProfile {
    /// Parse a profile from its JSON representation.
    ///
    /// # Errors
    ///
    /// Fails when the JSON is malformed or a required section is missing.
    pub fn from_str(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Build the arena world this profile describes, with the robot
    /// parameters applied and the robot placed at the arena center.
    #[must_use]
    pub fn build_world(&self) -> World {
        let obstacles = self.world.obstacles.iter().map(|r| Rect::from(*r)).collect();
        let goal = self
            .world
            .goal
            .map(|g| Goal::new(Vec2::new(g.x, g.y), g.radius));
        let mut world = World::new(
            self.world.width,
            self.world.height,
            self.world.wall_margin,
            obstacles,
            goal,
        );
        world.robot.radius = self.robot.radius;
        world.robot.speed = self.robot.speed;
        world.robot.turn_rate_degrees = self.robot.turn_rate_degrees;
        world
    }

    /// Number of sensor rays, honoring a fixed angle list when present.
    #[must_use]
    pub fn ray_count(&self) -> usize {
        self.sensor
            .sensor_angles
            .as_ref()
            .map_or(self.sensor.ray_count, Vec::len)
    }

    /// Whether the profile declares support for the given control mode. A
    /// profile that lists no modes supports all of them.
    #[must_use]
    pub fn supports(&self, mode: ControlMode) -> bool {
        self.metadata.supported_control_modes.is_empty()
            || self.metadata.supported_control_modes.contains(&mode)
    }

    /// Obstacle layouts for curriculum cycling. Falls back to the default
    /// obstacle list as a single-entry pool when no layouts are configured.
    #[must_use]
    pub fn layout_pool(&self) -> Vec<Vec<Rect>> {
        match &self.world.layouts {
            Some(pool) if !pool.is_empty() => pool
                .iter()
                .map(|layout| layout.iter().map(|r| Rect::from(*r)).collect())
                .collect(),
            _ => vec![self.world.obstacles.iter().map(|r| Rect::from(*r)).collect()],
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Metadata {
    #[serde(default)]
    pub supported_control_modes: Vec<ControlMode>,
    #[serde(default)]
    pub flat_ground_model: Option<DriveModel>,
}

/// How actions reach the environment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ControlMode {
    Discrete,
    Continuous,
}

/// Closed set of drive kinematics an environment can emulate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DriveModel {
    #[default]
    Differential,
    Ackermann,
    Rover,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorldConfig {
    pub width: f32,
    pub height: f32,
    #[serde(default = "default_wall_margin")]
    pub wall_margin: f32,
    #[serde(default)]
    pub obstacles: Vec<RectConfig>,
    #[serde(default)]
    pub goal: Option<GoalConfig>,
    /// Optional obstacle layout pool for curriculum environments.
    #[serde(default)]
    pub layouts: Option<Vec<Vec<RectConfig>>>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RectConfig {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl From<RectConfig> for Rect {
    fn from(r: RectConfig) -> Self {
        Rect::new(r.x, r.y, r.width, r.height)
    }
}

impl From<&Rect> for RectConfig {
    fn from(r: &Rect) -> Self {
        Self {
            x: r.x,
            y: r.y,
            width: r.width,
            height: r.height,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GoalConfig {
    pub x: f32,
    pub y: f32,
    #[serde(default = "default_goal_radius")]
    pub radius: f32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SensorConfig {
    pub ray_count: usize,
    pub ray_length: f32,
    pub ray_fov_degrees: f32,
    /// Fixed relative angles overriding the evenly spaced fan.
    #[serde(default)]
    pub sensor_angles: Option<Vec<f32>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DynamicsConfig {
    #[serde(default)]
    pub sensor_noise_std: f32,
    #[serde(default)]
    pub heading_drift_std: f32,
    #[serde(default)]
    pub speed_noise_std: f32,
    #[serde(default)]
    pub turn_noise_std: f32,
    #[serde(default)]
    pub randomize_spawn: bool,
    #[serde(default)]
    pub randomize_goal: bool,
    #[serde(default)]
    pub reverse_enabled: bool,
    #[serde(default = "one")]
    pub speed_scale_min: f32,
    #[serde(default = "one")]
    pub speed_scale_max: f32,
    #[serde(default = "one")]
    pub turn_scale_min: f32,
    #[serde(default = "one")]
    pub turn_scale_max: f32,
    #[serde(default = "default_max_steps")]
    pub max_steps: u32,
    #[serde(default)]
    pub spawn_x: Option<f32>,
    #[serde(default)]
    pub spawn_y: Option<f32>,
}

impl Default for DynamicsConfig {
    fn default() -> Self {
        Self {
            sensor_noise_std: 0.0,
            heading_drift_std: 0.0,
            speed_noise_std: 0.0,
            turn_noise_std: 0.0,
            randomize_spawn: false,
            randomize_goal: false,
            reverse_enabled: false,
            speed_scale_min: 1.0,
            speed_scale_max: 1.0,
            turn_scale_min: 1.0,
            turn_scale_max: 1.0,
            max_steps: default_max_steps(),
            spawn_x: None,
            spawn_y: None,
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct RobotConfig {
    #[serde(default = "default_robot_radius")]
    pub radius: f32,
    #[serde(default = "default_robot_speed")]
    pub speed: f32,
    #[serde(default = "default_robot_turn_rate")]
    pub turn_rate_degrees: f32,
}

impl Default for RobotConfig {
    fn default() -> Self {
        Self {
            radius: default_robot_radius(),
            speed: default_robot_speed(),
            turn_rate_degrees: default_robot_turn_rate(),
        }
    }
}

fn one() -> f32 {
    1.0
}

fn default_wall_margin() -> f32 {
    20.0
}

fn default_goal_radius() -> f32 {
    Goal::DEFAULT_RADIUS
}

fn default_max_steps() -> u32 {
    500
}

fn default_robot_radius() -> f32 {
    RobotBody::DEFAULT_RADIUS
}

fn default_robot_speed() -> f32 {
    RobotBody::DEFAULT_SPEED
}

fn default_robot_turn_rate() -> f32 {
    RobotBody::DEFAULT_TURN_RATE
}
