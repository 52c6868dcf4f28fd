//! Behavioral diagnostic suite for an environment profile.
//!
//! Runs deterministic probes (kinematics, collision penalty, spin penalty)
//! plus a scripted-policy batch, grades each check pass/warn/fail, and rolls
//! the grades into an overall health score. Probes drive a fresh environment
//! per check so one check can never contaminate another.

use anyhow::{Context, Result};
use profile::EnvProfile;
use rl::{DiscreteAction, Env, ResetOptions, RobotEnv};
use serde::Serialize;

use crate::rollout::{self, Driver, Policy};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Grade {
    Pass,
    Warn,
    Fail,
    Skip,
}

impl std::fmt::Display for Grade {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Grade::Pass => "pass",
            Grade::Warn => "warn",
            Grade::Fail => "fail",
            Grade::Skip => "skip",
        };
        f.write_str(s)
    }
}

/// Threshold grading. `pass_at` and `warn_at` are read in the direction
/// given by `higher_is_better`.
fn grade(value: f32, pass_at: f32, warn_at: f32, higher_is_better: bool) -> Grade {
    if higher_is_better {
        if value >= pass_at {
            Grade::Pass
        } else if value >= warn_at {
            Grade::Warn
        } else {
            Grade::Fail
        }
    } else if value <= pass_at {
        Grade::Pass
    } else if value <= warn_at {
        Grade::Warn
    } else {
        Grade::Fail
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct CheckReport {
    pub id: &'static str,
    pub name: &'static str,
    pub grade: Grade,
    pub metric: f32,
    pub unit: &'static str,
    pub detail: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct EvalReport {
    pub profile: String,
    pub overall: Grade,
    /// 0-100, pass = 100 points, warn = 50, fail = 0, skips excluded.
    pub health_score: u32,
    pub episodes: u32,
    pub checks: Vec<CheckReport>,
}

impl EvalReport {
    /// Log the whole table through tracing, one line per check.
    pub fn log(&self) {
        for check in &self.checks {
            tracing::info!(
                target: "eval",
                "{:<20} {:<4} {:>8.2}{} {}",
                check.id,
                check.grade,
                check.metric,
                check.unit,
                check.detail
            );
        }
        tracing::info!(
            target: "eval",
            "overall {} health {}/100 over {} episodes on `{}`",
            self.overall,
            self.health_score,
            self.episodes,
            self.profile
        );
    }
}

#[derive(Debug, Clone, Copy)]
pub struct EvalOptions {
    pub episodes: u32,
    pub seed: u64,
    /// Expected policy input width. Observations are trimmed or zero-padded
    /// to this length before the policy sees them, with a warning.
    pub policy_obs_dim: Option<usize>,
}

impl Default for EvalOptions {
    fn default() -> Self {
        Self {
            episodes: 8,
            seed: 0,
            policy_obs_dim: None,
        }
    }
}

/// Force `obs` to exactly `expected` entries. Extra entries are dropped,
/// missing ones become zero.
pub fn fit_observation(obs: &mut Vec<f32>, expected: usize) {
    if obs.len() != expected {
        obs.resize(expected, 0.0);
    }
}

fn pinned(heading: f32) -> Option<ResetOptions> {
    Some(ResetOptions {
        heading_degrees: Some(heading),
    })
}

fn fresh_env(key: &str, profile: &EnvProfile) -> Result<RobotEnv> {
    RobotEnv::new(key, profile).with_context(|| format!("building environment `{key}`"))
}

/// Best displacement per forward step across a few seeds. Multiple seeds
/// guard against a spawn that happens to face a nearby wall.
fn probe_forward(key: &str, profile: &EnvProfile) -> Result<CheckReport> {
    let mut best = 0.0f32;
    for seed in 0..3 {
        let mut env = fresh_env(key, profile)?;
        let (_, start) = env.reset(Some(seed), pinned(0.0));
        let mut steps = 0u32;
        let mut last = start;
        for _ in 0..5 {
            let step = env.step(DiscreteAction::Forward);
            if step.info.collision {
                break;
            }
            last = step.info;
            steps += 1;
        }
        if steps > 0 {
            let travelled =
                ((last.x - start.x).powi(2) + (last.y - start.y).powi(2)).sqrt() / steps as f32;
            best = best.max(travelled);
        }
    }
    let g = grade(best, 2.0, 0.5, true);
    Ok(CheckReport {
        id: "forward_progress",
        name: "Forward Progress",
        grade: g,
        metric: best,
        unit: "u/step",
        detail: "displacement per forward step".into(),
    })
}

/// Heading delta magnitude for one turn step versus the configured rate.
fn probe_turns(key: &str, profile: &EnvProfile) -> Result<CheckReport> {
    let rate = profile.robot.turn_rate_degrees;
    let mut worst = 0.0f32;
    for (action, sign) in [
        (DiscreteAction::TurnLeft, -1.0f32),
        (DiscreteAction::TurnRight, 1.0f32),
    ] {
        let mut env = fresh_env(key, profile)?;
        let (_, start) = env.reset(Some(1), pinned(90.0));
        let step = env.step(action);
        let delta = arena::wrap_relative_degrees(step.info.angle_degrees - start.angle_degrees);
        if delta * sign <= 0.0 {
            // Wrong direction entirely.
            worst = 180.0;
            break;
        }
        worst = worst.max((delta.abs() - rate).abs());
    }
    let g = grade(worst, rate * 0.2 + 3.0, rate * 0.5 + 6.0, false);
    Ok(CheckReport {
        id: "turn_response",
        name: "Turn Response",
        grade: g,
        metric: worst,
        unit: "deg",
        detail: format!("worst deviation from the {rate} deg turn rate"),
    })
}

/// Drive straight until the first wall hit and read the penalty.
fn probe_collision_penalty(key: &str, profile: &EnvProfile) -> Result<CheckReport> {
    for seed in 0..3 {
        let mut env = fresh_env(key, profile)?;
        env.reset(Some(seed), pinned(0.0));
        for _ in 0..env.max_steps() {
            let step = env.step(DiscreteAction::Forward);
            if step.info.collision {
                let g = grade(step.reward, -39.0, -10.0, false);
                return Ok(CheckReport {
                    id: "collision_penalty",
                    name: "Collision Penalty",
                    grade: g,
                    metric: step.reward,
                    unit: "r",
                    detail: "reward on the first wall hit".into(),
                });
            }
            if step.is_done() {
                break;
            }
        }
    }
    Ok(CheckReport {
        id: "collision_penalty",
        name: "Collision Penalty",
        grade: Grade::Skip,
        metric: 0.0,
        unit: "r",
        detail: "no collision reachable by driving straight".into(),
    })
}

/// Spin in place and look for the spin penalty in the reward stream.
fn probe_spin_penalty(key: &str, profile: &EnvProfile) -> Result<CheckReport> {
    let mut env = fresh_env(key, profile)?;
    env.reset(Some(1), pinned(0.0));
    let mut lowest = f32::INFINITY;
    for _ in 0..15 {
        let step = env.step(DiscreteAction::TurnLeft);
        lowest = lowest.min(step.reward);
        if step.is_done() {
            break;
        }
    }
    let g = grade(lowest, -0.4, -0.1, false);
    Ok(CheckReport {
        id: "spin_penalty",
        name: "Spin Penalty",
        grade: g,
        metric: lowest,
        unit: "r",
        detail: "lowest reward across 15 stationary turns".into(),
    })
}

struct BatchStats {
    goal_rate: f32,
    collision_rate: f32,
    spin_rate: f32,
    coverage: f32,
}

fn batch_stats(reports: &[rollout::EpisodeReport]) -> BatchStats {
    let n = reports.len().max(1) as f32;
    let frac = |hits: usize| hits as f32 / n;
    BatchStats {
        goal_rate: frac(reports.iter().filter(|r| r.goal_reached).count()),
        collision_rate: frac(reports.iter().filter(|r| r.collided).count()),
        spin_rate: frac(reports.iter().filter(|r| r.spin_detected).count()),
        coverage: reports.iter().map(|r| r.coverage).sum::<f32>() / n,
    }
}

fn run_policy_batch(
    key: &str,
    profile: &EnvProfile,
    options: &EvalOptions,
) -> Result<BatchStats> {
    let mut env = fresh_env(key, profile)?;
    let mut driver = Driver::new(Policy::SeekClearance, options.seed);
    let expected = options.policy_obs_dim;
    let mut warned = false;

    let actions = match env.action_space() {
        rl::Space::Discrete { n } => n,
        rl::Space::Box { .. } => 0,
    };
    let ray_count = profile.ray_count();

    let reports = rollout::run_batch(options.episodes, Some(options.seed), |seed| {
        let (mut obs, _) = env.reset(seed, None);
        let mut tracker = rollout::EpisodeTracker::new();
        loop {
            if let Some(dim) = expected {
                if obs.len() != dim && !warned {
                    tracing::warn!(
                        "observation is {} wide but the policy expects {dim}; \
                         trimming or zero-padding to fit",
                        obs.len()
                    );
                    warned = true;
                }
                fit_observation(&mut obs, dim);
            }
            let action = driver.next_discrete(&obs, ray_count, actions);
            let step = env.step(action);
            tracker.observe(&env.state(), step.reward);
            if step.is_done() {
                return tracker.finish(step.terminated, step.truncated, step.info.goal_reached);
            }
            obs = step.observation;
        }
    });
    Ok(batch_stats(&reports))
}

/// Run the full suite against one profile.
pub fn run_eval(key: &str, profile: &EnvProfile, options: &EvalOptions) -> Result<EvalReport> {
    let mut checks = vec![
        probe_forward(key, profile)?,
        probe_turns(key, profile)?,
        probe_collision_penalty(key, profile)?,
        probe_spin_penalty(key, profile)?,
    ];

    let stats = run_policy_batch(key, profile, options)?;
    if profile.world.goal.is_some() {
        checks.push(CheckReport {
            id: "goal_seeking",
            name: "Goal Seeking",
            grade: grade(stats.goal_rate, 0.40, 0.20, true),
            metric: stats.goal_rate * 100.0,
            unit: "%",
            detail: "episodes that reached the goal".into(),
        });
    } else {
        checks.push(CheckReport {
            id: "goal_seeking",
            name: "Goal Seeking",
            grade: Grade::Skip,
            metric: 0.0,
            unit: "%",
            detail: "profile has no goal".into(),
        });
    }
    checks.push(CheckReport {
        id: "wall_avoidance",
        name: "Wall Avoidance",
        grade: grade(stats.collision_rate, 0.20, 0.50, false),
        metric: stats.collision_rate * 100.0,
        unit: "%",
        detail: "episodes with at least one collision".into(),
    });
    checks.push(CheckReport {
        id: "spin_rate",
        name: "Spin Episodes",
        grade: grade(stats.spin_rate, 0.15, 0.35, false),
        metric: stats.spin_rate * 100.0,
        unit: "%",
        detail: "episodes stuck spinning in place".into(),
    });
    checks.push(CheckReport {
        id: "coverage",
        name: "Exploration Coverage",
        grade: grade(stats.coverage, 0.25, 0.15, true),
        metric: stats.coverage * 100.0,
        unit: "%",
        detail: "arena grid visited per episode".into(),
    });

    let counted: Vec<&CheckReport> = checks.iter().filter(|c| c.grade != Grade::Skip).collect();
    let passes = counted.iter().filter(|c| c.grade == Grade::Pass).count();
    let warns = counted.iter().filter(|c| c.grade == Grade::Warn).count();
    let fails = counted.iter().filter(|c| c.grade == Grade::Fail).count();
    let total = counted.len().max(1);
    let health_score = ((passes * 100 + warns * 50) as f32 / total as f32).round() as u32;
    let overall = if fails == 0 && warns <= 1 {
        Grade::Pass
    } else if fails <= 1 {
        Grade::Warn
    } else {
        Grade::Fail
    };

    Ok(EvalReport {
        profile: key.to_owned(),
        overall,
        health_score,
        episodes: options.episodes,
        checks,
    })
}
