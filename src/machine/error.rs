//! Errors surfaced at the machine boundary.

use crate::core::ConfigError;
use thiserror::Error;

/// Failure to build or start a [`Machine`](crate::Machine).
#[derive(Debug, Error)]
pub enum MachineError {
    /// The configuration document is not valid JSON.
    #[error("invalid machine config: {0}")]
    Parse(#[from] serde_json::Error),

    /// The state tree references a state that is not declared.
    #[error(transparent)]
    Config(#[from] ConfigError),
}
