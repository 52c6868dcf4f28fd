use thiserror::Error;

#[derive(Error, Debug)]
pub enum ArenaError {
    #[error("sensor fan needs at least 2 rays, got {got}")]
    InvalidRayCount { got: usize },
}
