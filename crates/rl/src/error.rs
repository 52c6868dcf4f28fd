//! Environment construction errors.

use arena::ArenaError;
use profile::ControlMode;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum EnvError {
    /// The profile's metadata excludes this control mode.
    #[error("profile '{profile}' does not allow {mode:?} control")]
    UnsupportedControlMode { profile: String, mode: ControlMode },

    #[error(transparent)]
    Arena(#[from] ArenaError),
}
