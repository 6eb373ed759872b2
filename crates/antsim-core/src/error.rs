use antsim_brain::NetworkError;
use antsim_physics::IndexError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SimulationError {
    #[error(transparent)]
    Network(#[from] NetworkError),

    #[error(transparent)]
    Index(#[from] IndexError),

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}
