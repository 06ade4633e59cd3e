//! Statecraft: a hierarchical state machine runtime
//!
//! Statecraft runs declarative trees of states: each state may nest child
//! states, fire entry/exit events, and map events to sibling states. Events
//! dispatch to the innermost active state first and bubble toward the root
//! until one level captures them.
//!
//! # Core Concepts
//!
//! - **State tree**: immutable [`StateDefinition`]s, parsed from JSON or
//!   assembled with [`StateDefinitionBuilder`]
//! - **Active path**: the dotted chain of active state names, reported by
//!   [`Machine::current_state`]
//! - **Observers**: callbacks for raw named events and for path changes,
//!   removable by opaque handle
//! - **History**: immutable record of every path change over time
//!
//! # Example
//!
//! ```rust
//! use statecraft::Machine;
//!
//! let machine = Machine::new(
//!     r#"{
//!         "initial": "idle",
//!         "states": {
//!             "idle": {
//!                 "entry": "entered_idle",
//!                 "on": { "START": "running" }
//!             },
//!             "running": {
//!                 "entry": "entered_running",
//!                 "on": { "STOP": "idle" }
//!             }
//!         }
//!     }"#,
//! )?;
//!
//! machine.subscribe_events(|event| println!("event: {}", event.name));
//! machine.start()?;
//! assert_eq!(machine.current_state(), "idle");
//!
//! machine.send("START");
//! assert_eq!(machine.current_state(), "running");
//! # Ok::<(), statecraft::MachineError>(())
//! ```

pub mod builder;
pub mod core;
pub mod machine;

// Re-export commonly used types
pub use builder::{BuildError, StateDefinitionBuilder};
pub use core::{ConfigError, Event, StateDefinition, StateHistory, SubscriptionId, TransitionRecord};
pub use machine::{Machine, MachineError};
