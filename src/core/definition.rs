//! Declarative state-tree definitions.
//!
//! A [`StateDefinition`] is the static, immutable description of one state:
//! its substates, its entry/exit action names, and its transition table.
//! Definitions are loaded once (from JSON or via the
//! [builder](crate::builder)) and then shared read-only by every runtime
//! node that activates them; runtime state never leaks back into a
//! definition.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;

/// Immutable declarative description of one state and its substates.
///
/// Every field is optional in the serialized form and unknown fields are
/// ignored, so a definition level can be as sparse as `{}`. The JSON shape
/// at every level of the tree:
///
/// ```json
/// {
///   "id": "diagnostic label",
///   "initial": "idle",
///   "states": { "idle": {}, "running": {} },
///   "entry": "entered",
///   "exit": "exited",
///   "on": { "START": "running" }
/// }
/// ```
///
/// The `on` table maps event names to **sibling** names: a target must be
/// declared in the same `states` map in which this definition itself
/// appears, and it is the *parent* of this state that resolves the target
/// when this state is the active child.
///
/// # Example
///
/// ```rust
/// use statecraft::core::StateDefinition;
///
/// let definition: StateDefinition = serde_json::from_str(
///     r#"{
///         "initial": "idle",
///         "states": {
///             "idle": { "entry": "entered_idle", "on": { "START": "running" } },
///             "running": { "entry": "entered_running" }
///         }
///     }"#,
/// )
/// .unwrap();
///
/// assert_eq!(definition.initial_state(), Some("idle"));
/// assert_eq!(definition.states["idle"].on["START"], "running");
/// ```
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct StateDefinition {
    /// Identifier for diagnostics; never interpreted by the runtime.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    /// Name of the child state activated when this state is entered.
    /// Absent (or empty) means this state is a leaf.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub initial: Option<String>,

    /// Child definitions, keyed by state name. Shared behind `Arc` so many
    /// runtime activations reference one definition without copying it.
    #[serde(skip_serializing_if = "HashMap::is_empty")]
    pub states: HashMap<String, Arc<StateDefinition>>,

    /// Event fired when this state becomes active.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub entry: Option<String>,

    /// Event fired when this state stops being active.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub exit: Option<String>,

    /// Transition table: event name to the sibling state it activates.
    #[serde(skip_serializing_if = "HashMap::is_empty")]
    pub on: HashMap<String, String>,
}

impl StateDefinition {
    /// The declared initial child, treating the empty string as unset.
    pub fn initial_state(&self) -> Option<&str> {
        self.initial.as_deref().filter(|name| !name.is_empty())
    }

    /// The entry action name, treating the empty string as unset.
    pub fn entry_action(&self) -> Option<&str> {
        self.entry.as_deref().filter(|name| !name.is_empty())
    }

    /// The exit action name, treating the empty string as unset.
    pub fn exit_action(&self) -> Option<&str> {
        self.exit.as_deref().filter(|name| !name.is_empty())
    }

    /// Whether following `initial` references from this definition reaches a
    /// leaf without hitting a name missing from its `states` map.
    ///
    /// Activation of a definition touches exactly this chain, so a
    /// transition target passing this check cannot fail to activate.
    pub(crate) fn initial_chain_resolves(&self) -> bool {
        let mut definition = self;
        while let Some(initial) = definition.initial_state() {
            match definition.states.get(initial) {
                Some(child) => definition = child,
                None => return false,
            }
        }
        true
    }
}
