#![deny(clippy::all, clippy::pedantic)]
#![allow(
    clippy::module_name_repetitions,
    clippy::cast_precision_loss,
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss
)]
//! # Trainable Arena Environments
//!
//! Gymnasium-style reinforcement learning environments over the arena
//! simulation.
//!
//! This crate turns the raw physics of the `arena` crate and the catalog of
//! the `profile` crate into seedable environments with shaped rewards. Both
//! a discrete-action task and a continuous throttle/steer task are provided,
//! along with an exploration-memory observation wrapper and a layout
//! curriculum that re-deals the obstacle map every episode.
//!
//! ## Key Components
//!
//! -   **Environment contract:** The [`Env`] trait in the [`env`] module
//!     defines reset/step semantics, observation and action [`Space`]s and
//!     the split between `terminated` and `truncated` episode ends.
//! -   **Tasks:** [`RobotEnv`] is the discrete navigation task with a
//!     densely shaped reward; [`ContinuousRobotEnv`] is the first-collision
//!     variant for continuous-control learners.
//! -   **Composition:** [`VisitedGridWrapper`] appends a coarse visited-cell
//!     memory to observations, and [`CurriculumEnv`] cycles obstacle
//!     layouts so policies generalise instead of memorising one map.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use profile::catalog;
//! use rl::{DiscreteAction, Env, RobotEnv};
//!
//! let profile = catalog::builtin("goal_chase").unwrap();
//! let mut env = RobotEnv::new("goal_chase", &profile)?;
//!
//! let (mut obs, _info) = env.reset(Some(42), None);
//! loop {
//!     let step = env.step(DiscreteAction::Forward);
//!     obs = step.observation;
//!     if step.is_done() {
//!         break;
//!     }
//! }
//! ```

pub mod continuous;
pub mod curriculum;
pub mod env;
pub mod error;
pub mod kinematics;
pub mod noise;
pub mod robot_env;
pub mod snapshot;
mod spawn;
pub mod wrappers;

pub use continuous::ContinuousRobotEnv;
pub use curriculum::CurriculumEnv;
pub use env::{Env, ResetOptions, Space, Step, StepInfo};
pub use error::EnvError;
pub use kinematics::{
    continuous_gains, discrete_command, DiscreteAction, DriveCommand, VelocityCmd,
};
pub use noise::NoiseModel;
pub use robot_env::RobotEnv;
pub use snapshot::StateSnapshot;
pub use wrappers::VisitedGridWrapper;
