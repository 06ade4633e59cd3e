//! Core state-tree types and logic.
//!
//! This module contains the recursive heart of the machine:
//! - Declarative [`StateDefinition`] trees, immutable once loaded
//! - The [`StateNode`] runtime engine: activation, bubbling, teardown
//! - [`ObserverRegistry`] fan-out with handle-based unsubscription
//! - Immutable [`StateHistory`] tracking
//!
//! Nothing here locks: operations on a tree assume one caller at a time,
//! the discipline [`Machine`](crate::Machine) enforces at the boundary.

mod definition;
mod error;
mod event;
mod history;
mod node;
mod observer;

pub use definition::StateDefinition;
pub use error::ConfigError;
pub use event::Event;
pub use history::{StateHistory, TransitionRecord};
pub use node::StateNode;
pub use observer::{ObserverRegistry, SubscriptionId};
