//! Scripted policies and the episode rollout driver.
//!
//! Policies here are deliberately simple reactive controllers. They exist
//! to exercise environments from the command line and the behavioral
//! suite, not to compete with trained agents.

use std::collections::VecDeque;
use std::panic::{catch_unwind, AssertUnwindSafe};

use arena::wrap_relative_degrees;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rl::{DiscreteAction, Env, Space, StateSnapshot};
use serde::Serialize;

/// Window length for spin detection, matching the episode heading history.
const SPIN_WINDOW: usize = 20;
/// Coverage is measured on the same 16x16 grid the shaping reward uses.
const COVERAGE_GRID: f32 = 16.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Policy {
    /// Uniform random action each step.
    Random,
    /// Turn right for a beat, then drive. The live-preview motion.
    Wander,
    /// Steer toward the clearest sensor reading.
    SeekClearance,
}

/// A policy plus the mutable state it needs between steps.
pub struct Driver {
    policy: Policy,
    rng: StdRng,
    tick: u64,
}

impl Driver {
    #[must_use]
    pub fn new(policy: Policy, seed: u64) -> Self {
        Self {
            policy,
            rng: StdRng::seed_from_u64(seed),
            tick: 0,
        }
    }

    /// Pick the next discrete action. `actions` is the action-space size.
    pub fn next_discrete(
        &mut self,
        obs: &[f32],
        ray_count: usize,
        actions: usize,
    ) -> DiscreteAction {
        self.tick += 1;
        match self.policy {
            Policy::Random => {
                let index = self.rng.gen_range(0..actions.max(1));
                DiscreteAction::from_index(index).unwrap_or(DiscreteAction::Forward)
            }
            Policy::Wander => {
                if self.tick % 3 == 0 {
                    DiscreteAction::TurnRight
                } else {
                    DiscreteAction::Forward
                }
            }
            Policy::SeekClearance => seek_discrete(obs, ray_count),
        }
    }

    /// Pick the next continuous `[throttle, turn]` command.
    pub fn next_continuous(&mut self, obs: &[f32], ray_count: usize) -> [f32; 2] {
        self.tick += 1;
        match self.policy {
            Policy::Random => [
                self.rng.gen_range(-1.0..=1.0),
                self.rng.gen_range(-1.0..=1.0),
            ],
            Policy::Wander => {
                let turn = if self.tick % 40 < 20 { 0.5 } else { -0.5 };
                [0.7, turn]
            }
            Policy::SeekClearance => seek_continuous(obs, ray_count),
        }
    }
}

fn ray_slice(obs: &[f32], ray_count: usize) -> &[f32] {
    &obs[..ray_count.min(obs.len())]
}

/// Minimum reading across the central third of the fan.
fn front_clearance(rays: &[f32]) -> f32 {
    if rays.is_empty() {
        return 1.0;
    }
    let third = (rays.len() / 3).max(1);
    let mid = rays.len() / 2;
    let lo = mid.saturating_sub(third / 2);
    let hi = (lo + third).min(rays.len());
    rays[lo..hi].iter().copied().fold(f32::INFINITY, f32::min)
}

fn side_means(rays: &[f32]) -> (f32, f32) {
    if rays.len() < 2 {
        return (1.0, 1.0);
    }
    let half = rays.len() / 2;
    let left: f32 = rays[..half].iter().sum::<f32>() / half as f32;
    let right: f32 = rays[half..].iter().sum::<f32>() / (rays.len() - half) as f32;
    (left, right)
}

fn seek_discrete(obs: &[f32], ray_count: usize) -> DiscreteAction {
    let rays = ray_slice(obs, ray_count);
    if front_clearance(rays) < 0.3 {
        let (left, right) = side_means(rays);
        if left > right {
            DiscreteAction::TurnLeft
        } else {
            DiscreteAction::TurnRight
        }
    } else {
        DiscreteAction::Forward
    }
}

fn seek_continuous(obs: &[f32], ray_count: usize) -> [f32; 2] {
    let rays = ray_slice(obs, ray_count);
    let front = front_clearance(rays);
    let (left, right) = side_means(rays);
    let throttle = front.clamp(0.15, 1.0);
    let turn = ((right - left) * 2.0).clamp(-1.0, 1.0);
    [throttle, turn]
}

/// Aggregate outcome of one episode.
#[derive(Debug, Clone, Serialize)]
pub struct EpisodeReport {
    pub steps: u32,
    pub total_reward: f32,
    pub terminated: bool,
    pub truncated: bool,
    pub goal_reached: bool,
    pub collided: bool,
    pub spin_detected: bool,
    /// Fraction of the 16x16 arena grid visited.
    pub coverage: f32,
    pub best_goal_dist: f32,
}

impl EpisodeReport {
    /// Placeholder for an episode that blew up mid-run.
    #[must_use]
    pub fn zeroed() -> Self {
        Self {
            steps: 0,
            total_reward: 0.0,
            terminated: false,
            truncated: false,
            goal_reached: false,
            collided: false,
            spin_detected: false,
            coverage: 0.0,
            best_goal_dist: f32::INFINITY,
        }
    }
}

/// Per-step bookkeeping shared by the discrete and continuous runners and
/// the behavioral suite.
pub(crate) struct EpisodeTracker {
    report: EpisodeReport,
    headings: VecDeque<f32>,
    positions: VecDeque<(f32, f32)>,
    visited: std::collections::HashSet<(u32, u32)>,
}

impl EpisodeTracker {
    pub(crate) fn new() -> Self {
        Self {
            report: EpisodeReport::zeroed(),
            headings: VecDeque::with_capacity(SPIN_WINDOW),
            positions: VecDeque::with_capacity(SPIN_WINDOW),
            visited: std::collections::HashSet::new(),
        }
    }

    pub(crate) fn observe(&mut self, snap: &StateSnapshot, reward: f32) {
        self.report.steps += 1;
        self.report.total_reward += reward;
        if snap.collision {
            self.report.collided = true;
        }

        let cx = ((snap.x / snap.world_width.max(1.0)) * COVERAGE_GRID)
            .clamp(0.0, COVERAGE_GRID - 1.0) as u32;
        let cy = ((snap.y / snap.world_height.max(1.0)) * COVERAGE_GRID)
            .clamp(0.0, COVERAGE_GRID - 1.0) as u32;
        self.visited.insert((cx, cy));

        if let Some(goal) = snap.goal {
            let dist = ((goal.x - snap.x).powi(2) + (goal.y - snap.y).powi(2)).sqrt();
            if dist < self.report.best_goal_dist {
                self.report.best_goal_dist = dist;
            }
        }

        if self.headings.len() == SPIN_WINDOW {
            self.headings.pop_front();
            self.positions.pop_front();
        }
        self.headings.push_back(snap.angle_degrees);
        self.positions.push_back((snap.x, snap.y));
        if !self.report.spin_detected && self.headings.len() >= 15 {
            let total_turn: f32 = self
                .headings
                .iter()
                .zip(self.headings.iter().skip(1))
                .map(|(a, b)| wrap_relative_degrees(b - a).abs())
                .sum();
            let (x0, y0) = self.positions[0];
            let (x1, y1) = self.positions[self.positions.len() - 1];
            let travel = ((x1 - x0).powi(2) + (y1 - y0).powi(2)).sqrt();
            if total_turn > 120.0 && travel < 25.0 {
                self.report.spin_detected = true;
            }
        }
    }

    pub(crate) fn finish(
        mut self,
        terminated: bool,
        truncated: bool,
        goal_reached: bool,
    ) -> EpisodeReport {
        self.report.terminated = terminated;
        self.report.truncated = truncated;
        self.report.goal_reached = goal_reached;
        self.report.coverage =
            self.visited.len() as f32 / (COVERAGE_GRID * COVERAGE_GRID);
        self.report
    }
}

fn discrete_action_count(space: &Space) -> usize {
    match space {
        Space::Discrete { n } => *n,
        Space::Box { .. } => 0,
    }
}

/// Run one discrete episode to termination or truncation.
pub fn run_discrete_episode<E>(env: &mut E, driver: &mut Driver, seed: Option<u64>) -> EpisodeReport
where
    E: Env<Action = DiscreteAction>,
{
    let actions = discrete_action_count(&env.action_space());
    let (mut obs, _) = env.reset(seed, None);
    let ray_count = env.state().ray_count;
    let mut tracker = EpisodeTracker::new();

    loop {
        let action = driver.next_discrete(&obs, ray_count, actions);
        let step = env.step(action);
        tracker.observe(&env.state(), step.reward);
        if step.is_done() {
            return tracker.finish(step.terminated, step.truncated, step.info.goal_reached);
        }
        obs = step.observation;
    }
}

/// Run one continuous episode to termination or truncation.
pub fn run_continuous_episode<E>(
    env: &mut E,
    driver: &mut Driver,
    seed: Option<u64>,
) -> EpisodeReport
where
    E: Env<Action = [f32; 2]>,
{
    let (mut obs, _) = env.reset(seed, None);
    let ray_count = env.state().ray_count;
    let mut tracker = EpisodeTracker::new();

    loop {
        let action = driver.next_continuous(&obs, ray_count);
        let step = env.step(action);
        tracker.observe(&env.state(), step.reward);
        if step.is_done() {
            return tracker.finish(step.terminated, step.truncated, step.info.goal_reached);
        }
        obs = step.observation;
    }
}

/// Run a batch of episodes. A panicking episode is logged and recorded as a
/// zeroed report; the rest of the batch keeps going.
pub fn run_batch(
    episodes: u32,
    base_seed: Option<u64>,
    mut run: impl FnMut(Option<u64>) -> EpisodeReport,
) -> Vec<EpisodeReport> {
    (0..episodes)
        .map(|i| {
            let seed = base_seed.map(|s| s.wrapping_add(u64::from(i)));
            match catch_unwind(AssertUnwindSafe(|| run(seed))) {
                Ok(report) => report,
                Err(_) => {
                    tracing::error!("episode {i} panicked, recording it as zeroed");
                    EpisodeReport::zeroed()
                }
            }
        })
        .collect()
}
