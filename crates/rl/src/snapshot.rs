//! Point-in-time view of a running environment.

use serde::Serialize;

use profile::{ControlMode, DriveModel, GoalConfig, RectConfig};

/// Everything a dashboard needs to draw one frame of the simulation.
///
/// Ray readings here are always noise-free; the snapshot feeds overlays
/// and tooling, not the policy.
#[derive(Debug, Clone, Serialize)]
pub struct StateSnapshot {
    pub x: f32,
    pub y: f32,
    pub angle_degrees: f32,
    pub collision: bool,
    pub reward: f32,
    pub episode_count: u64,
    pub current_step: u32,
    pub rays: Vec<f32>,
    pub ray_count: usize,
    pub ray_length: f32,
    pub ray_fov_degrees: f32,
    /// World-space ray angles when the profile pins fixed sensor directions,
    /// `None` in fan mode.
    pub sensor_angles_abs: Option<Vec<f32>>,
    pub sensor_angle_labels: Option<Vec<&'static str>>,
    pub world_width: f32,
    pub world_height: f32,
    pub wall_margin: f32,
    pub robot_radius: f32,
    pub obstacles: Vec<RectConfig>,
    pub goal: Option<GoalConfig>,
    pub profile: String,
    pub profile_label: String,
    pub drive_model: DriveModel,
    pub control_mode: ControlMode,
}
