//! Discrete-action navigation environment with a shaped reward.

use std::collections::{HashSet, VecDeque};

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use arena::{
    cast_rays, cast_rays_at_angles, direction_label, mean_distance, wrap_degrees,
    wrap_relative_degrees, ArenaError, Rect, SensorSpans, Vec2, World, TICK,
};
use profile::{ControlMode, DriveModel, EnvProfile, GoalConfig, RectConfig};

use crate::env::{Env, ResetOptions, Space, Step, StepInfo};
use crate::error::EnvError;
use crate::kinematics::{discrete_command, DiscreteAction, VelocityCmd};
use crate::noise::NoiseModel;
use crate::snapshot::StateSnapshot;
use crate::spawn;

/// Heading samples kept for spin detection.
const HEADING_WINDOW: usize = 20;

/// Side length of the coarse exploration grid.
const VISIT_GRID: u32 = 16;

/// Coarse exploration-grid cell for a world position.
pub(crate) fn grid_cell(pos: Vec2, width: f32, height: f32, grid: u32) -> (u32, u32) {
    let top = (grid - 1) as f32;
    let gx = ((pos.x / width) * grid as f32).clamp(0.0, top) as u32;
    let gy = ((pos.y / height) * grid as f32).clamp(0.0, top) as u32;
    (gx, gy)
}

/// Wheeled robot navigating a walled arena toward an optional goal.
///
/// Four discrete actions: forward, turn left, turn right and (when the
/// profile enables it) reverse. An episode terminates after two consecutive
/// collision steps and truncates at the step limit or on reaching the goal.
pub struct RobotEnv {
    profile_key: String,
    profile_label: String,
    world: World,
    rng: StdRng,
    noise: NoiseModel,
    drive_model: DriveModel,

    ray_count: usize,
    ray_length: f32,
    ray_fov_degrees: f32,
    sensor_angles: Option<Vec<f32>>,
    spans: SensorSpans,

    max_steps: u32,
    reverse_enabled: bool,
    randomize_spawn: bool,
    randomize_goal: bool,
    fixed_spawn: Option<Vec2>,
    speed_scale: (f32, f32),
    turn_scale: (f32, f32),
    base_speed: f32,
    base_turn_rate: f32,

    current_step: u32,
    episode_count: u64,
    last_reward: f32,
    last_collision: bool,
    consecutive_collisions: u32,
    last_pos: Vec2,
    last_goal_dist: f32,
    best_goal_dist: f32,
    heading_history: VecDeque<f32>,
    visited_cells: HashSet<(u32, u32)>,
}

impl RobotEnv {
    /// Build an environment from a parsed profile.
    ///
    /// Fails when the profile excludes discrete control or its sensor
    /// configuration cannot produce an observation.
    pub fn new(key: impl Into<String>, profile: &EnvProfile) -> Result<Self, EnvError> {
        let profile_key = key.into();
        if !profile.supports(ControlMode::Discrete) {
            return Err(EnvError::UnsupportedControlMode {
                profile: profile_key,
                mode: ControlMode::Discrete,
            });
        }

        let sensor_angles = profile.sensor.sensor_angles.clone();
        let ray_count = profile.ray_count();
        let enough_rays = match &sensor_angles {
            Some(angles) => !angles.is_empty(),
            None => ray_count >= 2,
        };
        if !enough_rays {
            return Err(ArenaError::InvalidRayCount { got: ray_count }.into());
        }
        let spans = match &sensor_angles {
            Some(angles) => SensorSpans::fixed(angles),
            None => SensorSpans::fan(ray_count),
        };

        let world = profile.build_world();
        let dynamics = &profile.dynamics;
        let fixed_spawn = match (dynamics.spawn_x, dynamics.spawn_y) {
            (Some(x), Some(y)) => Some(Vec2::new(x, y)),
            _ => None,
        };
        let base_speed = world.robot.speed;
        let base_turn_rate = world.robot.turn_rate_degrees;
        let last_pos = world.robot.pos;

        Ok(Self {
            profile_key,
            profile_label: profile.label.clone(),
            rng: StdRng::from_entropy(),
            noise: NoiseModel::from_dynamics(dynamics),
            drive_model: profile.metadata.flat_ground_model.unwrap_or_default(),
            ray_count,
            ray_length: profile.sensor.ray_length,
            ray_fov_degrees: profile.sensor.ray_fov_degrees,
            sensor_angles,
            spans,
            max_steps: dynamics.max_steps,
            reverse_enabled: dynamics.reverse_enabled,
            randomize_spawn: dynamics.randomize_spawn,
            randomize_goal: dynamics.randomize_goal,
            fixed_spawn,
            speed_scale: (dynamics.speed_scale_min, dynamics.speed_scale_max),
            turn_scale: (dynamics.turn_scale_min, dynamics.turn_scale_max),
            base_speed,
            base_turn_rate,
            world,
            current_step: 0,
            episode_count: 0,
            last_reward: 0.0,
            last_collision: false,
            consecutive_collisions: 0,
            last_pos,
            last_goal_dist: 0.0,
            best_goal_dist: f32::INFINITY,
            heading_history: VecDeque::with_capacity(HEADING_WINDOW),
            visited_cells: HashSet::new(),
        })
    }

    #[must_use]
    pub fn profile_key(&self) -> &str {
        &self.profile_key
    }

    #[must_use]
    pub fn max_steps(&self) -> u32 {
        self.max_steps
    }

    #[must_use]
    pub fn world(&self) -> &World {
        &self.world
    }

    /// Closest the robot has been to the goal this episode. Infinity when
    /// the profile has no goal.
    #[must_use]
    pub fn best_goal_distance(&self) -> f32 {
        if self.world.goal.is_some() {
            self.best_goal_dist
        } else {
            f32::INFINITY
        }
    }

    /// Autonomous preview step: rotate right and drive forward. Collisions
    /// snap the robot back to the centre so a live preview cannot wedge it
    /// into a corner.
    pub fn step_auto(&mut self) -> StateSnapshot {
        self.world.robot.turn(self.world.robot.turn_rate_degrees);
        if let Some(jitter) = self.noise.turn_jitter(&mut self.rng) {
            self.world.robot.turn(jitter);
        }
        self.world.robot.drive_forward();
        if let Some(scale) = self.noise.speed_scale(&mut self.rng) {
            self.world.robot.velocity = self.world.robot.velocity * scale;
        }
        let collided = self.world.step(TICK);
        if collided {
            self.last_reward = -5.0;
            let center = Vec2::new(self.world.width() / 2.0, self.world.height() / 2.0);
            self.world.robot.place(center);
        } else {
            self.last_reward = 0.1;
        }
        self.last_collision = collided;
        self.state()
    }

    pub(crate) fn reseed(&mut self, seed: u64) {
        self.rng = StdRng::seed_from_u64(seed);
    }

    pub(crate) fn rng_mut(&mut self) -> &mut StdRng {
        &mut self.rng
    }

    pub(crate) fn swap_layout(&mut self, obstacles: Vec<Rect>) {
        self.world.replace_obstacles(obstacles);
    }

    /// Shared episode start. `force_randomize` overrides fixed spawn points
    /// and the profile's randomisation flags, so layout-cycling callers
    /// always get fresh placement.
    pub(crate) fn begin_episode(
        &mut self,
        options: Option<ResetOptions>,
        force_randomize: bool,
    ) -> (Vec<f32>, StepInfo) {
        self.current_step = 0;
        self.episode_count += 1;

        let heading = options
            .and_then(|o| o.heading_degrees)
            .map_or_else(|| self.rng.gen_range(0.0..360.0), wrap_degrees);
        self.world.reset(heading);

        spawn::place_robot(
            &mut self.world,
            &mut self.rng,
            self.fixed_spawn,
            self.randomize_spawn,
            force_randomize,
        );

        let speed_scale = spawn::draw_scale(&mut self.rng, self.speed_scale);
        let turn_scale = spawn::draw_scale(&mut self.rng, self.turn_scale);
        self.world.robot.speed = self.base_speed * speed_scale;
        self.world.robot.turn_rate_degrees = self.base_turn_rate * turn_scale;

        if self.randomize_goal || force_randomize {
            spawn::random_goal(&mut self.world, &mut self.rng);
        }

        self.last_reward = 0.0;
        self.last_collision = false;
        self.consecutive_collisions = 0;
        self.last_pos = self.world.robot.pos;
        self.heading_history.clear();
        self.heading_history.push_back(self.world.robot.heading_degrees);
        self.visited_cells.clear();
        let start_cell = self.visit_cell();
        self.visited_cells.insert(start_cell);
        self.last_goal_dist = self.goal_distance().unwrap_or(0.0);
        self.best_goal_dist = self.last_goal_dist;

        let info = StepInfo::at_reset(
            self.world.robot.pos.x,
            self.world.robot.pos.y,
            self.world.robot.heading_degrees,
        );
        (self.observe(), info)
    }

    fn visit_cell(&self) -> (u32, u32) {
        grid_cell(
            self.world.robot.pos,
            self.world.width(),
            self.world.height(),
            VISIT_GRID,
        )
    }

    fn goal_distance(&self) -> Option<f32> {
        self.world
            .goal
            .map(|goal| (goal.pos - self.world.robot.pos).length())
    }

    fn cast(&self) -> Vec<f32> {
        match &self.sensor_angles {
            Some(angles) => cast_rays_at_angles(&self.world, angles, self.ray_length),
            // Ray count is validated at construction.
            None => cast_rays(
                &self.world,
                self.ray_count,
                self.ray_length,
                self.ray_fov_degrees,
            )
            .unwrap_or_default(),
        }
    }

    /// Noisy rays, heading sin/cos and, for goal profiles, the normalised
    /// goal distance plus the relative bearing as sin/cos.
    fn observe(&mut self) -> Vec<f32> {
        let mut obs = self.cast();
        self.noise.perturb_rays(&mut self.rng, &mut obs);

        let heading = self.world.robot.heading_radians();
        obs.push(heading.sin());
        obs.push(heading.cos());

        if let Some(goal) = self.world.goal {
            let delta = goal.pos - self.world.robot.pos;
            let diag = Vec2::new(self.world.width(), self.world.height()).length();
            obs.push((delta.length() / diag).clamp(0.0, 1.0));
            let rel = delta.y.atan2(delta.x) - heading;
            obs.push(rel.sin());
            obs.push(rel.cos());
        }
        obs
    }

    /// Shaped reward for a collision-free step. Reads the same noisy rays
    /// the policy sees, and maintains the episode memory it scores against.
    #[allow(clippy::too_many_lines)]
    fn shaped_reward(&mut self, action: DiscreteAction, observation: &[f32], prev_pos: Vec2) -> f32 {
        let pos = self.world.robot.pos;
        let displacement = (pos - prev_pos).length();

        let rays = &observation[..self.ray_count];
        let min_dist = rays.iter().copied().fold(f32::INFINITY, f32::min);
        let mean_dist = mean_distance(rays);
        let clearances = self.spans.clearances(rays);

        // Survival bonus: accumulating small positives over a full episode
        // must beat crashing out at -40.
        let mut reward = 0.01;

        // Two-stage proximity gradient, thresholds calibrated to ray length.
        let danger = min_dist < 0.35;
        if min_dist <= 0.20 {
            reward += -0.02 - (0.20 - min_dist) * 5.0;
        } else if min_dist < 0.35 {
            reward += -0.005 - (0.35 - min_dist) * 1.2;
        } else {
            reward += displacement * 0.025;
            if min_dist > 0.40 {
                reward += 0.015;
            }
            if mean_dist > 0.60 && displacement > 0.5 {
                reward += 0.04;
            }
            if mean_dist > 0.60 && displacement < 0.3 {
                reward -= 0.015;
                if action.is_turn() {
                    reward -= 0.008;
                }
            }
        }

        // Sensor-action coupling: driving at a close wall is punished,
        // turning toward the clearer side near one is paid.
        if action == DiscreteAction::Forward && clearances.front < 0.18 {
            reward -= 0.25 + (0.18 - clearances.front) * 2.0;
        }
        if action.is_turn() && clearances.front < 0.25 {
            let safer_side = if action == DiscreteAction::TurnLeft {
                clearances.left > clearances.right
            } else {
                clearances.right > clearances.left
            };
            if safer_side {
                reward += 0.05 + (0.25 - clearances.front).max(0.0) * 0.4;
            } else {
                reward -= 0.03;
            }
        }
        if action == DiscreteAction::Reverse && self.reverse_enabled && clearances.front < 0.20 {
            reward += 0.08;
        }

        if let Some(goal) = self.world.goal {
            let delta_vec = goal.pos - pos;
            let curr_dist = delta_vec.length();
            let delta = self.last_goal_dist - curr_dist; // positive = closer
            if delta > 0.0 {
                reward += delta * 2.0;
            } else {
                reward += delta * 1.2;
            }
            self.last_goal_dist = curr_dist;
            self.best_goal_dist = self.best_goal_dist.min(curr_dist);

            // Alignment pays in full only while actually moving, otherwise
            // spinning in place to face the goal would be profitable.
            let rel = delta_vec.y.atan2(delta_vec.x) - self.world.robot.heading_radians();
            let alignment = rel.cos();
            if displacement > 0.3 {
                reward += alignment * 0.15;
            } else {
                reward += alignment * 0.008;
            }
            if curr_dist < 80.0 {
                reward += (80.0 - curr_dist) * 0.003;
            }
        }

        let pos_change = (pos - self.last_pos).length();

        // Count-based exploration bonus on the coarse grid.
        let cell = self.visit_cell();
        if self.visited_cells.insert(cell) {
            reward += 0.015;
        }

        if self.heading_history.len() == HEADING_WINDOW {
            self.heading_history.pop_front();
        }
        self.heading_history.push_back(self.world.robot.heading_degrees);

        // Spinning: a window full of turning with almost no travel.
        if self.heading_history.len() >= 10 {
            let total_turn: f32 = self
                .heading_history
                .iter()
                .zip(self.heading_history.iter().skip(1))
                .map(|(a, b)| wrap_relative_degrees(b - a).abs())
                .sum();
            if total_turn > 80.0 && pos_change < 3.0 {
                reward -= 0.50;
            }
        }

        // Idling in open space gets increasingly expensive as the episode
        // runs down.
        if pos_change < 2.0 && !danger {
            let stuck_frac =
                (self.current_step as f32 / self.max_steps.max(1) as f32).min(0.6);
            reward -= 0.08 * (1.0 + stuck_frac);
        }

        self.last_pos = pos;
        reward
    }
}

impl Env for RobotEnv {
    type Action = DiscreteAction;

    fn observation_space(&self) -> Space {
        let extra = if self.world.goal.is_some() { 3 } else { 0 };
        let len = self.ray_count + 2 + extra;
        let mut low = vec![0.0; self.ray_count];
        low.resize(len, -1.0);
        Space::Box {
            low,
            high: vec![1.0; len],
        }
    }

    fn action_space(&self) -> Space {
        Space::Discrete {
            n: if self.reverse_enabled { 4 } else { 3 },
        }
    }

    fn reset(&mut self, seed: Option<u64>, options: Option<ResetOptions>) -> (Vec<f32>, StepInfo) {
        if let Some(seed) = seed {
            self.reseed(seed);
        }
        self.begin_episode(options, false)
    }

    fn step(&mut self, action: DiscreteAction) -> Step {
        self.current_step += 1;

        let cmd = discrete_command(self.drive_model, action, self.reverse_enabled);
        self.world
            .robot
            .turn(cmd.turn_factor * self.world.robot.turn_rate_degrees);
        match cmd.velocity {
            VelocityCmd::Keep => {}
            VelocityCmd::Halt => self.world.robot.halt(),
            VelocityCmd::Drive(scale) => self.world.robot.drive_scaled(scale),
        }

        if let Some(drift) = self.noise.heading_drift(&mut self.rng) {
            self.world.robot.turn(drift);
        }
        if action.is_turn() {
            if let Some(jitter) = self.noise.turn_jitter(&mut self.rng) {
                self.world.robot.turn(jitter);
            }
        }
        if action != DiscreteAction::Reverse {
            if let Some(scale) = self.noise.speed_scale(&mut self.rng) {
                self.world.robot.velocity = self.world.robot.velocity * scale;
            }
        }

        let prev_pos = self.world.robot.pos;
        let collided = self.world.step(TICK);
        let observation = self.observe();

        let mut reward = if collided {
            self.consecutive_collisions += 1;
            -40.0
        } else {
            self.consecutive_collisions = 0;
            self.shaped_reward(action, &observation, prev_pos)
        };

        // The goal check runs even on collision steps; brushing a wall on
        // the way in still counts.
        let goal_reached = self.world.check_goal_reached();
        if goal_reached {
            reward += 100.0;
        }

        let terminated = self.consecutive_collisions >= 2;
        let truncated = self.current_step >= self.max_steps || goal_reached;
        if self.current_step >= self.max_steps && !terminated {
            reward += 12.0; // survived the whole episode
        }

        self.last_reward = reward;
        self.last_collision = collided;

        Step {
            observation,
            reward,
            terminated,
            truncated,
            info: StepInfo {
                x: self.world.robot.pos.x,
                y: self.world.robot.pos.y,
                angle_degrees: self.world.robot.heading_degrees,
                collision: collided,
                goal_reached,
            },
        }
    }

    fn state(&self) -> StateSnapshot {
        let heading = self.world.robot.heading_degrees;
        let (sensor_angles_abs, sensor_angle_labels) = match &self.sensor_angles {
            Some(angles) => (
                Some(angles.iter().map(|a| wrap_degrees(heading + a)).collect()),
                Some(angles.iter().map(|a| direction_label(*a)).collect()),
            ),
            None => (None, None),
        };
        StateSnapshot {
            x: self.world.robot.pos.x,
            y: self.world.robot.pos.y,
            angle_degrees: heading,
            collision: self.last_collision,
            reward: self.last_reward,
            episode_count: self.episode_count,
            current_step: self.current_step,
            rays: self.cast(),
            ray_count: self.ray_count,
            ray_length: self.ray_length,
            ray_fov_degrees: self.ray_fov_degrees,
            sensor_angles_abs,
            sensor_angle_labels,
            world_width: self.world.width(),
            world_height: self.world.height(),
            wall_margin: self.world.wall_margin(),
            robot_radius: self.world.robot.radius,
            obstacles: self.world.obstacles().iter().map(RectConfig::from).collect(),
            goal: self.world.goal.map(|goal| GoalConfig {
                x: goal.pos.x,
                y: goal.pos.y,
                radius: goal.radius,
            }),
            profile: self.profile_key.clone(),
            profile_label: self.profile_label.clone(),
            drive_model: self.drive_model,
            control_mode: ControlMode::Discrete,
        }
    }
}
