//! Episode-level obstacle curriculum.

use rand::Rng;

use arena::Rect;
use profile::EnvProfile;

use crate::env::{Env, ResetOptions, Space, Step, StepInfo};
use crate::error::EnvError;
use crate::robot_env::RobotEnv;
use crate::snapshot::StateSnapshot;

/// Swaps the obstacle layout every episode from the profile's layout pool.
///
/// The robot cannot memorise a single map: each reset installs a freshly
/// drawn layout before spawn and goal are re-randomised against it, and the
/// per-episode memory starts clean. Profiles without a `layouts` list
/// degrade to a single-layout pool and behave like a plain [`RobotEnv`].
pub struct CurriculumEnv {
    env: RobotEnv,
    pool: Vec<Vec<Rect>>,
}

impl CurriculumEnv {
    pub fn new(key: impl Into<String>, profile: &EnvProfile) -> Result<Self, EnvError> {
        let pool = profile.layout_pool();
        let env = RobotEnv::new(key, profile)?;
        tracing::debug!(layouts = pool.len(), "curriculum layout pool ready");
        Ok(Self { env, pool })
    }

    #[must_use]
    pub fn layout_count(&self) -> usize {
        self.pool.len()
    }

    /// Read access to the wrapped environment.
    pub fn inner(&self) -> &RobotEnv {
        &self.env
    }
}

impl Env for CurriculumEnv {
    type Action = <RobotEnv as Env>::Action;

    fn observation_space(&self) -> Space {
        self.env.observation_space()
    }

    fn action_space(&self) -> Space {
        self.env.action_space()
    }

    fn reset(&mut self, seed: Option<u64>, options: Option<ResetOptions>) -> (Vec<f32>, StepInfo) {
        if let Some(seed) = seed {
            self.env.reseed(seed);
        }
        // The layout must land before spawn and goal sampling look at it.
        let idx = self.env.rng_mut().gen_range(0..self.pool.len());
        self.env.swap_layout(self.pool[idx].clone());
        self.env.begin_episode(options, true)
    }

    fn step(&mut self, action: Self::Action) -> Step {
        self.env.step(action)
    }

    fn state(&self) -> StateSnapshot {
        self.env.state()
    }
}
