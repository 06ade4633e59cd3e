//! Builder API for declaring state trees without JSON.
//!
//! This module provides a fluent builder producing the same
//! [`StateDefinition`](crate::core::StateDefinition) trees the JSON path
//! parses, with cross-reference validation at build time.

pub mod definition;
pub mod error;

pub use definition::StateDefinitionBuilder;
pub use error::BuildError;
