//! Configuration errors raised during activation.

use thiserror::Error;

/// Errors detected while activating a state tree.
///
/// Activation performs the core's only validation: every `initial` reference
/// encountered along the chain must name a key of the `states` map declared
/// at the same level. The first miss aborts activation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// An `initial` name has no matching entry in `states`.
    #[error("No definition for state: {state}. Remove initial state or add it to 'states' config.")]
    UndefinedInitialState {
        /// The initial state name that could not be resolved.
        state: String,
    },
}
