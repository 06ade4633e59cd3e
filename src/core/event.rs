//! Named events fanned out to observers.
//!
//! Events are plain named payloads. The runtime fires them automatically for
//! entry and exit actions, and anything with access to a node's event
//! registry may emit them manually.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A raw named event.
///
/// Entry and exit actions declared in a state definition fire as events
/// carrying the action name; custom events emitted through a registry use
/// the same shape.
///
/// # Example
///
/// ```rust
/// use statecraft::core::Event;
///
/// let event = Event::new("entered_idle");
/// assert_eq!(event.name, "entered_idle");
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Event {
    /// The event name (an entry/exit action name, or a custom label).
    pub name: String,
}

impl Event {
    /// Create an event with the given name.
    pub fn new(name: impl Into<String>) -> Self {
        Event { name: name.into() }
    }
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}
