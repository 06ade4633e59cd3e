//! Build errors for state-tree definition builders.

use thiserror::Error;

/// Errors that can occur when assembling a state-tree definition.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BuildError {
    #[error("Initial state '{state}' is not declared. Add it with .state(\"{state}\", ...) before .build()")]
    UndefinedInitialState { state: String },

    #[error("Transition target '{target}' (event '{event}' on state '{state}') is not declared at the same level. Add it with .state(\"{target}\", ...)")]
    UndefinedTransitionTarget {
        state: String,
        event: String,
        target: String,
    },
}
