//! Built-in environment profile catalog.
//!
//! Nine hand-tuned arenas spanning the baseline obstacle course, noisy
//! navigation layouts, the flat-ground drive-model suite and two
//! goal-seeking fields. Custom profiles are layered on top by
//! [`crate::store::ProfileStore`].

use crate::{
    ControlMode, DriveModel, DynamicsConfig, EnvProfile, GoalConfig, Metadata, RectConfig,
    RobotConfig, SensorConfig, WorldConfig,
};

/// Fallback profile for unknown keys.
pub const DEFAULT_PROFILE: &str = "arena_basic";

/// Built-in profile keys in catalog order.
pub const NAMES: &[&str] = &[
    "arena_basic",
    "warehouse_dense",
    "corridor_sprint",
    "goal_chase",
    "flat_ground_differential_v1",
    "flat_ground_ackermann_v1",
    "flat_ground_rover_v1",
    "flat_ground_dead_end_recovery",
    "apple_field",
];

/// The `arena_basic` profile, also the fallback for unknown keys.
#[must_use]
pub fn default_profile() -> EnvProfile {
    arena_basic()
}

/// Look up a built-in profile by key.
#[must_use]
pub fn builtin(name: &str) -> Option<EnvProfile> {
    match name {
        "arena_basic" => Some(arena_basic()),
        "warehouse_dense" => Some(warehouse_dense()),
        "corridor_sprint" => Some(corridor_sprint()),
        "goal_chase" => Some(goal_chase()),
        "flat_ground_differential_v1" => Some(flat_ground_differential_v1()),
        "flat_ground_ackermann_v1" => Some(flat_ground_ackermann_v1()),
        "flat_ground_rover_v1" => Some(flat_ground_rover_v1()),
        "flat_ground_dead_end_recovery" => Some(flat_ground_dead_end_recovery()),
        "apple_field" => Some(apple_field()),
        _ => None,
    }
}

fn rect(x: f32, y: f32, width: f32, height: f32) -> RectConfig {
    RectConfig {
        x,
        y,
        width,
        height,
    }
}

fn sensor(ray_count: usize, ray_length: f32, ray_fov_degrees: f32) -> SensorConfig {
    SensorConfig {
        ray_count,
        ray_length,
        ray_fov_degrees,
        sensor_angles: None,
    }
}

fn robot(radius: f32, speed: f32, turn_rate_degrees: f32) -> RobotConfig {
    RobotConfig {
        radius,
        speed,
        turn_rate_degrees,
    }
}

fn world(width: f32, height: f32, wall_margin: f32, obstacles: Vec<RectConfig>) -> WorldConfig {
    WorldConfig {
        width,
        height,
        wall_margin,
        obstacles,
        goal: None,
        layouts: None,
    }
}

fn both_modes() -> Metadata {
    Metadata {
        supported_control_modes: vec![ControlMode::Discrete, ControlMode::Continuous],
        flat_ground_model: None,
    }
}

fn flat_ground(model: DriveModel) -> Metadata {
    Metadata {
        supported_control_modes: vec![ControlMode::Discrete, ControlMode::Continuous],
        flat_ground_model: Some(model),
    }
}

fn arena_basic() -> EnvProfile {
    EnvProfile {
        label: "Arena Basic".into(),
        description: "Balanced obstacle arena for baseline RL experiments.".into(),
        metadata: both_modes(),
        world: world(
            640.0,
            480.0,
            20.0,
            vec![
                rect(180.0, 140.0, 120.0, 30.0),
                rect(440.0, 260.0, 60.0, 140.0),
                rect(140.0, 360.0, 160.0, 40.0),
            ],
        ),
        sensor: sensor(8, 140.0, 120.0),
        dynamics: DynamicsConfig::default(),
        robot: robot(15.0, 130.0, 12.0),
    }
}

fn warehouse_dense() -> EnvProfile {
    EnvProfile {
        label: "Warehouse Dense".into(),
        description: "High-obstacle layout for difficult navigation and collision avoidance."
            .into(),
        metadata: both_modes(),
        world: world(
            760.0,
            520.0,
            24.0,
            vec![
                rect(120.0, 100.0, 180.0, 36.0),
                rect(360.0, 90.0, 70.0, 170.0),
                rect(500.0, 140.0, 180.0, 40.0),
                rect(170.0, 260.0, 80.0, 180.0),
                rect(320.0, 300.0, 230.0, 45.0),
                rect(610.0, 280.0, 60.0, 160.0),
            ],
        ),
        sensor: sensor(12, 170.0, 180.0),
        dynamics: DynamicsConfig {
            sensor_noise_std: 0.01,
            heading_drift_std: 0.4,
            speed_noise_std: 0.03,
            turn_noise_std: 0.4,
            randomize_spawn: true,
            speed_scale_min: 0.9,
            speed_scale_max: 1.1,
            turn_scale_min: 0.9,
            turn_scale_max: 1.1,
            ..DynamicsConfig::default()
        },
        robot: robot(14.0, 120.0, 10.0),
    }
}

fn corridor_sprint() -> EnvProfile {
    EnvProfile {
        label: "Corridor Sprint".into(),
        description: "Narrow corridors with longer sensor range and faster robot motion.".into(),
        metadata: both_modes(),
        world: world(
            840.0,
            460.0,
            18.0,
            vec![
                rect(180.0, 40.0, 45.0, 320.0),
                rect(340.0, 120.0, 45.0, 322.0),
                rect(520.0, 20.0, 45.0, 300.0),
                rect(690.0, 130.0, 45.0, 312.0),
            ],
        ),
        sensor: sensor(16, 220.0, 220.0),
        dynamics: DynamicsConfig {
            sensor_noise_std: 0.02,
            heading_drift_std: 0.8,
            speed_noise_std: 0.05,
            turn_noise_std: 0.8,
            randomize_spawn: true,
            speed_scale_min: 0.85,
            speed_scale_max: 1.15,
            turn_scale_min: 0.85,
            turn_scale_max: 1.15,
            ..DynamicsConfig::default()
        },
        robot: robot(13.0, 170.0, 8.0),
    }
}

fn goal_chase() -> EnvProfile {
    EnvProfile {
        label: "Goal Chase".into(),
        description: "Navigate to the goal target, +100 reward on reach. Ideal for testing \
                      goal-seeking behaviour."
            .into(),
        metadata: flat_ground(DriveModel::Differential),
        world: WorldConfig {
            goal: Some(GoalConfig {
                x: 520.0,
                y: 380.0,
                radius: 20.0,
            }),
            ..world(
                620.0,
                480.0,
                22.0,
                vec![
                    rect(150.0, 100.0, 80.0, 30.0),
                    rect(350.0, 180.0, 30.0, 130.0),
                    rect(200.0, 330.0, 130.0, 30.0),
                    rect(420.0, 80.0, 60.0, 60.0),
                ],
            )
        },
        sensor: sensor(12, 180.0, 240.0),
        dynamics: DynamicsConfig {
            sensor_noise_std: 0.01,
            heading_drift_std: 0.3,
            speed_noise_std: 0.02,
            turn_noise_std: 0.3,
            randomize_spawn: true,
            randomize_goal: true,
            speed_scale_min: 0.95,
            speed_scale_max: 1.05,
            turn_scale_min: 0.95,
            turn_scale_max: 1.05,
            max_steps: 800,
            ..DynamicsConfig::default()
        },
        robot: robot(13.0, 130.0, 11.0),
    }
}

fn flat_ground_differential_v1() -> EnvProfile {
    EnvProfile {
        label: "Flat Ground Differential (V1)".into(),
        description: "Flat-ground baseline using differential-drive dynamics with real-world \
                      scenarios."
            .into(),
        metadata: flat_ground(DriveModel::Differential),
        world: world(
            720.0,
            520.0,
            20.0,
            vec![
                // L-shaped hallway corner
                rect(150.0, 80.0, 180.0, 28.0),
                rect(150.0, 80.0, 28.0, 150.0),
                // Doorway passage
                rect(380.0, 180.0, 28.0, 90.0),
                rect(380.0, 320.0, 28.0, 90.0),
                // Scattered clutter
                rect(500.0, 120.0, 70.0, 45.0),
                rect(560.0, 260.0, 60.0, 60.0),
                rect(220.0, 350.0, 85.0, 50.0),
                rect(420.0, 420.0, 50.0, 50.0),
            ],
        ),
        sensor: sensor(12, 180.0, 200.0),
        dynamics: DynamicsConfig {
            sensor_noise_std: 0.015,
            heading_drift_std: 0.4,
            speed_noise_std: 0.03,
            turn_noise_std: 0.4,
            randomize_spawn: true,
            speed_scale_min: 0.92,
            speed_scale_max: 1.08,
            turn_scale_min: 0.92,
            turn_scale_max: 1.08,
            max_steps: 600,
            ..DynamicsConfig::default()
        },
        robot: robot(14.0, 140.0, 11.0),
    }
}

fn flat_ground_ackermann_v1() -> EnvProfile {
    EnvProfile {
        label: "Flat Ground Ackermann (V1)".into(),
        description: "Flat-ground profile tuned for ackermann-like steering with parking lot \
                      scenarios."
            .into(),
        metadata: flat_ground(DriveModel::Ackermann),
        world: world(
            760.0,
            520.0,
            20.0,
            vec![
                // Parking row
                rect(120.0, 100.0, 90.0, 42.0),
                rect(240.0, 100.0, 90.0, 42.0),
                rect(360.0, 100.0, 90.0, 42.0),
                // Road dividers
                rect(150.0, 260.0, 200.0, 28.0),
                rect(420.0, 260.0, 200.0, 28.0),
                // Poles and signs
                rect(550.0, 370.0, 40.0, 40.0),
                rect(180.0, 380.0, 40.0, 40.0),
                // U-turn challenge
                rect(620.0, 150.0, 32.0, 220.0),
            ],
        ),
        sensor: sensor(14, 200.0, 200.0),
        dynamics: DynamicsConfig {
            sensor_noise_std: 0.018,
            heading_drift_std: 0.35,
            speed_noise_std: 0.032,
            turn_noise_std: 0.35,
            randomize_spawn: true,
            speed_scale_min: 0.88,
            speed_scale_max: 1.12,
            turn_scale_min: 0.88,
            turn_scale_max: 1.12,
            max_steps: 600,
            ..DynamicsConfig::default()
        },
        robot: robot(13.0, 150.0, 10.0),
    }
}

fn flat_ground_rover_v1() -> EnvProfile {
    EnvProfile {
        label: "Flat Ground Rover (V1)".into(),
        description: "Flat-ground profile tuned for rover-style skid steering with warehouse \
                      scenarios."
            .into(),
        metadata: flat_ground(DriveModel::Rover),
        world: world(
            760.0,
            540.0,
            22.0,
            vec![
                // Shelving rows
                rect(100.0, 110.0, 140.0, 42.0),
                rect(100.0, 190.0, 140.0, 42.0),
                rect(100.0, 270.0, 140.0, 42.0),
                // Pallet stacks
                rect(320.0, 140.0, 75.0, 60.0),
                rect(420.0, 140.0, 60.0, 75.0),
                // Loading area
                rect(540.0, 90.0, 110.0, 48.0),
                rect(540.0, 320.0, 110.0, 48.0),
                // Tight maneuvering zone
                rect(280.0, 380.0, 90.0, 45.0),
                rect(410.0, 380.0, 90.0, 45.0),
                // Center pillar
                rect(360.0, 260.0, 50.0, 50.0),
            ],
        ),
        sensor: sensor(16, 195.0, 220.0),
        dynamics: DynamicsConfig {
            sensor_noise_std: 0.02,
            heading_drift_std: 0.45,
            speed_noise_std: 0.04,
            turn_noise_std: 0.45,
            randomize_spawn: true,
            speed_scale_min: 0.85,
            speed_scale_max: 1.15,
            turn_scale_min: 0.85,
            turn_scale_max: 1.15,
            max_steps: 600,
            ..DynamicsConfig::default()
        },
        robot: robot(15.0, 135.0, 12.0),
    }
}

fn flat_ground_dead_end_recovery() -> EnvProfile {
    EnvProfile {
        label: "Dead-End Recovery".into(),
        description: "U-shaped dead ends and blind channels force the model to reverse and \
                      re-plan. Enables a 4th action: backward."
            .into(),
        metadata: Metadata {
            supported_control_modes: vec![ControlMode::Discrete],
            flat_ground_model: Some(DriveModel::Differential),
        },
        world: world(
            720.0,
            500.0,
            20.0,
            vec![
                // U-trap, open to the right
                rect(90.0, 120.0, 22.0, 180.0),
                rect(200.0, 120.0, 22.0, 180.0),
                rect(90.0, 300.0, 132.0, 22.0),
                // U-trap, open at the bottom
                rect(450.0, 80.0, 22.0, 200.0),
                rect(560.0, 80.0, 22.0, 200.0),
                rect(450.0, 80.0, 132.0, 22.0),
                // Blind channel
                rect(280.0, 330.0, 22.0, 130.0),
                rect(380.0, 330.0, 22.0, 130.0),
                rect(280.0, 458.0, 122.0, 22.0),
                // Narrow corridors
                rect(160.0, 380.0, 90.0, 22.0),
                rect(450.0, 360.0, 90.0, 22.0),
            ],
        ),
        sensor: sensor(16, 180.0, 360.0),
        dynamics: DynamicsConfig {
            sensor_noise_std: 0.015,
            heading_drift_std: 0.4,
            speed_noise_std: 0.03,
            turn_noise_std: 0.4,
            randomize_spawn: true,
            reverse_enabled: true,
            speed_scale_min: 0.9,
            speed_scale_max: 1.1,
            turn_scale_min: 0.9,
            turn_scale_max: 1.1,
            max_steps: 800,
            ..DynamicsConfig::default()
        },
        robot: robot(13.0, 120.0, 12.0),
    }
}

fn apple_field() -> EnvProfile {
    EnvProfile {
        label: "Apple Field".into(),
        description: "Open field, reach the goal target quickly with minimal obstacles.".into(),
        metadata: flat_ground(DriveModel::Differential),
        world: WorldConfig {
            goal: Some(GoalConfig {
                x: 540.0,
                y: 400.0,
                radius: 22.0,
            }),
            ..world(
                640.0,
                480.0,
                20.0,
                vec![
                    rect(200.0, 160.0, 60.0, 60.0),
                    rect(380.0, 280.0, 60.0, 60.0),
                ],
            )
        },
        sensor: sensor(12, 200.0, 360.0),
        dynamics: DynamicsConfig {
            sensor_noise_std: 0.01,
            heading_drift_std: 0.15,
            speed_noise_std: 0.01,
            turn_noise_std: 0.15,
            randomize_spawn: true,
            randomize_goal: true,
            speed_scale_min: 0.95,
            speed_scale_max: 1.05,
            turn_scale_min: 0.95,
            turn_scale_max: 1.05,
            max_steps: 600,
            ..DynamicsConfig::default()
        },
        robot: robot(13.0, 130.0, 12.0),
    }
}
