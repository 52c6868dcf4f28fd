//! Environment contract shared by every trainable arena task.
//!
//! The shape follows Gymnasium: `reset` starts an episode and returns the
//! first observation, `step` advances one control tick and reports reward
//! plus the two distinct end-of-episode flags.

use serde::Serialize;

use crate::snapshot::StateSnapshot;

/// Per-step diagnostics returned alongside every observation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct StepInfo {
    pub x: f32,
    pub y: f32,
    pub angle_degrees: f32,
    pub collision: bool,
    pub goal_reached: bool,
}

impl StepInfo {
    /// Info payload for a freshly reset episode: nothing has happened yet.
    #[must_use]
    pub fn at_reset(x: f32, y: f32, angle_degrees: f32) -> Self {
        Self {
            x,
            y,
            angle_degrees,
            collision: false,
            goal_reached: false,
        }
    }
}

/// Outcome of a single environment transition.
#[derive(Debug, Clone)]
pub struct Step {
    pub observation: Vec<f32>,
    pub reward: f32,
    /// The task itself ended the episode (the robot crashed out).
    pub terminated: bool,
    /// The episode hit its step limit or the goal was reached.
    pub truncated: bool,
    pub info: StepInfo,
}

impl Step {
    /// True when either end condition fired and the caller must reset.
    #[must_use]
    pub fn is_done(&self) -> bool {
        self.terminated || self.truncated
    }
}

/// Action or observation space description.
#[derive(Debug, Clone, PartialEq)]
pub enum Space {
    /// `n` mutually exclusive actions, indexed `0..n`.
    Discrete { n: usize },
    /// A real-valued vector bounded element-wise by `low` and `high`.
    Box { low: Vec<f32>, high: Vec<f32> },
}

impl Space {
    /// Flat element count: vector length for `Box`, one scalar for `Discrete`.
    #[must_use]
    pub fn len(&self) -> usize {
        match self {
            Self::Discrete { .. } => 1,
            Self::Box { low, .. } => low.len(),
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Optional overrides applied when an episode starts.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ResetOptions {
    /// Pin the initial heading instead of drawing it at random.
    pub heading_degrees: Option<f32>,
}

/// Gymnasium-flavoured environment interface.
///
/// Once a step reports `terminated` or `truncated` the episode is over and
/// the caller must `reset` before stepping again.
pub trait Env {
    /// Action payload accepted by [`Env::step`].
    type Action;

    fn observation_space(&self) -> Space;

    fn action_space(&self) -> Space;

    /// Flat length of the observation vector.
    fn observation_len(&self) -> usize {
        self.observation_space().len()
    }

    /// Start a new episode. A `seed` reseeds the episode RNG before any
    /// randomisation; `options` can pin parts of the initial state.
    fn reset(&mut self, seed: Option<u64>, options: Option<ResetOptions>) -> (Vec<f32>, StepInfo);

    /// Advance the simulation by one control tick.
    fn step(&mut self, action: Self::Action) -> Step;

    /// Snapshot of the full simulation state for UIs and tooling.
    fn state(&self) -> StateSnapshot;

    /// Release any resources held by the environment.
    fn close(&mut self) {}
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn box_space_len_matches_bounds() {
        let space = Space::Box {
            low: vec![0.0; 13],
            high: vec![1.0; 13],
        };
        assert_eq!(space.len(), 13);
        assert!(!space.is_empty());
    }

    #[test]
    fn reset_info_reports_a_clean_slate() {
        let info = StepInfo::at_reset(320.0, 240.0, 90.0);
        assert!(!info.collision);
        assert!(!info.goal_reached);
        assert!((info.angle_degrees - 90.0).abs() < 1e-6);
    }
}
