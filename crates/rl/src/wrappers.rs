//! Observation wrappers layered on top of base environments.

use arena::Vec2;

use crate::env::{Env, ResetOptions, Space, Step, StepInfo};
use crate::robot_env::grid_cell;
use crate::snapshot::StateSnapshot;

/// Appends a coarse visited-cell memory grid to the observation and pays a
/// small bonus for entering new cells.
///
/// The grid is row-major, flattened onto the end of the base observation
/// with one `{0, 1}` flag per cell. Entering a fresh cell adds `+0.02` to
/// the step reward, lingering in a known one costs `-0.003`.
pub struct VisitedGridWrapper<E: Env> {
    env: E,
    grid_size: u32,
    visited: Vec<f32>,
}

impl<E: Env> VisitedGridWrapper<E> {
    pub const DEFAULT_GRID: u32 = 6;

    #[must_use]
    pub fn new(env: E) -> Self {
        Self::with_grid(env, Self::DEFAULT_GRID)
    }

    /// Wrap with an explicit grid resolution. Sizes below 3 are clamped
    /// to 3.
    #[must_use]
    pub fn with_grid(env: E, grid_size: u32) -> Self {
        let grid_size = grid_size.max(3);
        let cells = (grid_size * grid_size) as usize;
        Self {
            env,
            grid_size,
            visited: vec![0.0; cells],
        }
    }

    #[must_use]
    pub fn grid_size(&self) -> u32 {
        self.grid_size
    }

    /// Read access to the wrapped environment.
    pub fn inner(&self) -> &E {
        &self.env
    }

    fn mark_and_bonus(&mut self) -> f32 {
        let snapshot = self.env.state();
        if snapshot.world_width <= 0.0 || snapshot.world_height <= 0.0 {
            return 0.0;
        }
        let (gx, gy) = grid_cell(
            Vec2::new(snapshot.x, snapshot.y),
            snapshot.world_width,
            snapshot.world_height,
            self.grid_size,
        );
        let idx = (gy * self.grid_size + gx) as usize;
        if self.visited[idx] < 0.5 {
            self.visited[idx] = 1.0;
            0.02
        } else {
            -0.003
        }
    }

    fn augment(&self, mut obs: Vec<f32>) -> Vec<f32> {
        obs.extend_from_slice(&self.visited);
        obs
    }
}

impl<E: Env> Env for VisitedGridWrapper<E> {
    type Action = E::Action;

    fn observation_space(&self) -> Space {
        match self.env.observation_space() {
            Space::Box { mut low, mut high } => {
                let cells = (self.grid_size * self.grid_size) as usize;
                low.resize(low.len() + cells, 0.0);
                high.resize(high.len() + cells, 1.0);
                Space::Box { low, high }
            }
            other => other,
        }
    }

    fn action_space(&self) -> Space {
        self.env.action_space()
    }

    fn reset(&mut self, seed: Option<u64>, options: Option<ResetOptions>) -> (Vec<f32>, StepInfo) {
        let (obs, info) = self.env.reset(seed, options);
        self.visited.fill(0.0);
        // The start cell is marked up front and never worth a bonus.
        let _ = self.mark_and_bonus();
        (self.augment(obs), info)
    }

    fn step(&mut self, action: Self::Action) -> Step {
        let mut step = self.env.step(action);
        step.reward += self.mark_and_bonus();
        step.observation = self.augment(step.observation);
        step
    }

    fn state(&self) -> StateSnapshot {
        self.env.state()
    }

    fn close(&mut self) {
        self.env.close();
    }
}
