//! Continuous-control variant for SAC/TD3-style training.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use arena::{cast_rays, wrap_degrees, ArenaError, Vec2, World, TICK};
use profile::{ControlMode, DriveModel, EnvProfile, GoalConfig, RectConfig};

use crate::env::{Env, ResetOptions, Space, Step, StepInfo};
use crate::error::EnvError;
use crate::kinematics::continuous_gains;
use crate::noise::NoiseModel;
use crate::snapshot::StateSnapshot;
use crate::spawn;

/// Wheeled robot driven by a `[throttle, turn]` pair, both in `[-1, 1]`.
///
/// Unlike the discrete task this one ends on the first collision, keeps the
/// goal where the profile put it, and reports the absolute goal bearing in
/// the observation. Sensors always use the forward fan; fixed ray angles
/// are a discrete-only feature.
pub struct ContinuousRobotEnv {
    profile_key: String,
    profile_label: String,
    world: World,
    rng: StdRng,
    noise: NoiseModel,
    drive_model: DriveModel,

    ray_count: usize,
    ray_length: f32,
    ray_fov_degrees: f32,

    max_steps: u32,
    randomize_spawn: bool,
    fixed_spawn: Option<Vec2>,
    speed_scale: (f32, f32),
    turn_scale: (f32, f32),
    base_speed: f32,
    base_turn_rate: f32,

    current_step: u32,
    episode_count: u64,
    last_reward: f32,
    last_collision: bool,
}

impl ContinuousRobotEnv {
    pub fn new(key: impl Into<String>, profile: &EnvProfile) -> Result<Self, EnvError> {
        let profile_key = key.into();
        if !profile.supports(ControlMode::Continuous) {
            return Err(EnvError::UnsupportedControlMode {
                profile: profile_key,
                mode: ControlMode::Continuous,
            });
        }
        // Fan mode only, so the profile's ray count applies even when it
        // also lists fixed angles.
        let ray_count = profile.sensor.ray_count;
        if ray_count < 2 {
            return Err(ArenaError::InvalidRayCount { got: ray_count }.into());
        }

        let world = profile.build_world();
        let dynamics = &profile.dynamics;
        let fixed_spawn = match (dynamics.spawn_x, dynamics.spawn_y) {
            (Some(x), Some(y)) => Some(Vec2::new(x, y)),
            _ => None,
        };
        let base_speed = world.robot.speed;
        let base_turn_rate = world.robot.turn_rate_degrees;

        Ok(Self {
            profile_key,
            profile_label: profile.label.clone(),
            rng: StdRng::from_entropy(),
            noise: NoiseModel::from_dynamics(dynamics),
            drive_model: profile.metadata.flat_ground_model.unwrap_or_default(),
            ray_count,
            ray_length: profile.sensor.ray_length,
            ray_fov_degrees: profile.sensor.ray_fov_degrees,
            max_steps: dynamics.max_steps,
            randomize_spawn: dynamics.randomize_spawn,
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

    fn cast(&self) -> Vec<f32> {
        // Ray count is validated at construction.
        cast_rays(
            &self.world,
            self.ray_count,
            self.ray_length,
            self.ray_fov_degrees,
        )
        .unwrap_or_default()
    }

    /// Noisy rays, heading sin/cos and, for goal profiles, the normalised
    /// goal distance plus the absolute goal bearing as sin/cos.
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
            let goal_angle = delta.y.atan2(delta.x);
            obs.push(goal_angle.sin());
            obs.push(goal_angle.cos());
        }
        obs
    }
}

impl Env for ContinuousRobotEnv {
    type Action = [f32; 2];

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
        Space::Box {
            low: vec![-1.0, -1.0],
            high: vec![1.0, 1.0],
        }
    }

    fn reset(&mut self, seed: Option<u64>, options: Option<ResetOptions>) -> (Vec<f32>, StepInfo) {
        if let Some(seed) = seed {
            self.rng = StdRng::seed_from_u64(seed);
        }
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
            false,
        );

        let speed_scale = spawn::draw_scale(&mut self.rng, self.speed_scale);
        let turn_scale = spawn::draw_scale(&mut self.rng, self.turn_scale);
        self.world.robot.speed = self.base_speed * speed_scale;
        self.world.robot.turn_rate_degrees = self.base_turn_rate * turn_scale;

        self.last_reward = 0.0;
        self.last_collision = false;

        let info = StepInfo::at_reset(
            self.world.robot.pos.x,
            self.world.robot.pos.y,
            self.world.robot.heading_degrees,
        );
        (self.observe(), info)
    }

    fn step(&mut self, action: [f32; 2]) -> Step {
        self.current_step += 1;

        let throttle = action[0].clamp(-1.0, 1.0);
        let turn = action[1].clamp(-1.0, 1.0);
        let (turn_gain, speed_gain) = continuous_gains(self.drive_model, turn);

        let mut turn_delta = turn * self.world.robot.turn_rate_degrees * turn_gain;
        if let Some(jitter) = self.noise.turn_jitter(&mut self.rng) {
            turn_delta += jitter;
        }
        if let Some(drift) = self.noise.heading_drift(&mut self.rng) {
            turn_delta += drift;
        }
        self.world.robot.turn(turn_delta);

        let mut speed = self.world.robot.speed * throttle * speed_gain;
        if let Some(scale) = self.noise.speed_scale(&mut self.rng) {
            speed *= scale;
        }
        self.world.robot.velocity = self.world.robot.direction() * speed;

        let prev_pos = self.world.robot.pos;
        let collided = self.world.step(TICK);
        let observation = self.observe();

        let mut reward = if collided {
            -50.0
        } else {
            let displacement = (self.world.robot.pos - prev_pos).length();
            let rays = &observation[..self.ray_count];
            let min_dist = rays.iter().copied().fold(f32::INFINITY, f32::min);

            // Forward progress only pays outside the danger zone.
            let danger = min_dist < 0.5;
            let mut shaped = if danger {
                -0.01
            } else {
                displacement * 0.02 - 0.01
            };
            if min_dist < 0.5 {
                shaped -= (0.5 - min_dist) * 4.0;
            }
            if min_dist > 0.7 {
                shaped += 0.02;
            }
            shaped
        };

        let goal_reached = self.world.check_goal_reached();
        if goal_reached {
            reward += 100.0;
        }

        self.last_reward = reward;
        self.last_collision = collided;

        Step {
            observation,
            reward,
            terminated: collided,
            truncated: self.current_step >= self.max_steps || goal_reached,
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
        StateSnapshot {
            x: self.world.robot.pos.x,
            y: self.world.robot.pos.y,
            angle_degrees: self.world.robot.heading_degrees,
            collision: self.last_collision,
            reward: self.last_reward,
            episode_count: self.episode_count,
            current_step: self.current_step,
            rays: self.cast(),
            ray_count: self.ray_count,
            ray_length: self.ray_length,
            ray_fov_degrees: self.ray_fov_degrees,
            sensor_angles_abs: None,
            sensor_angle_labels: None,
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
            control_mode: ControlMode::Continuous,
        }
    }
}
