//! Lock-serialized facade over the state tree.
//!
//! A [`Machine`] owns the root [`StateNode`] behind a mutex and translates
//! `start`/`send`/`current_state` calls into core operations, so at most one
//! call runs against the tree at a time. Observers registered here see every
//! raw event and path change bubbled up from anywhere in the tree.

use crate::core::{
    Event, ObserverRegistry, StateDefinition, StateHistory, StateNode, SubscriptionId,
    TransitionRecord,
};
use chrono::Utc;
use std::sync::{Arc, Mutex, MutexGuard};

mod error;

pub use error::MachineError;

/// A running hierarchical state machine.
///
/// Built from a declarative JSON document describing the state tree, or from
/// an already-assembled [`StateDefinition`]. The machine is [`Send`] and
/// [`Sync`]; calls from any thread are serialized internally.
///
/// Observer callbacks run synchronously while the machine lock is held. A
/// callback must not call back into the same machine: the lock is not
/// re-entrant.
///
/// # Example
///
/// ```rust
/// use statecraft::Machine;
///
/// let machine = Machine::new(
///     r#"{
///         "initial": "idle",
///         "states": {
///             "idle": {
///                 "entry": "entered_idle",
///                 "on": { "START": "running" }
///             },
///             "running": { "on": { "STOP": "idle" } }
///         }
///     }"#,
/// )
/// .unwrap();
///
/// machine.start().unwrap();
/// assert_eq!(machine.current_state(), "idle");
///
/// machine.send("START");
/// assert_eq!(machine.current_state(), "running");
/// ```
pub struct Machine {
    config: Option<String>,
    root: Mutex<StateNode>,
    events: ObserverRegistry<Event>,
    transitions: ObserverRegistry<str>,
    history: Arc<Mutex<StateHistory>>,
}

impl Machine {
    /// Parse a JSON state-tree document into a machine.
    ///
    /// Parsing happens here; reference errors (an `initial` naming an
    /// undeclared state) surface later, from [`start`](Machine::start).
    pub fn new(config: &str) -> Result<Self, MachineError> {
        let definition: StateDefinition = serde_json::from_str(config)?;
        let mut machine = Self::from_definition(definition);
        machine.config = Some(config.to_string());
        Ok(machine)
    }

    /// Build a machine from an already-assembled definition tree.
    pub fn from_definition(definition: StateDefinition) -> Self {
        let root = StateNode::new(Arc::new(definition));
        let events = root.events().clone();
        let transitions = root.transitions().clone();
        let history = Arc::new(Mutex::new(StateHistory::new()));

        let record = Arc::clone(&history);
        transitions.subscribe(move |path: &str| {
            let mut history = record.lock().unwrap_or_else(|e| e.into_inner());
            let from = history
                .last()
                .map(|record| record.to.clone())
                .unwrap_or_default();
            let updated = history.record(TransitionRecord {
                from,
                to: path.to_string(),
                at: Utc::now(),
            });
            *history = updated;
        });

        Machine {
            config: None,
            root: Mutex::new(root),
            events,
            transitions,
            history,
        }
    }

    /// Activate the tree's initial chain, firing entry events top-down.
    ///
    /// Fails when any level's `initial` names a state missing from its
    /// `states` mapping.
    pub fn start(&self) -> Result<(), MachineError> {
        self.lock_root().init()?;
        Ok(())
    }

    /// Dispatch one event.
    ///
    /// Events nobody along the active path handles are dropped silently.
    pub fn send(&self, event: &str) {
        self.lock_root().transition(event);
    }

    /// The dotted active path, empty before [`start`](Machine::start).
    pub fn current_state(&self) -> String {
        self.lock_root().active_path()
    }

    /// Observe every raw event bubbled from anywhere in the tree.
    pub fn subscribe_events<F>(&self, callback: F) -> SubscriptionId
    where
        F: Fn(&Event) + Send + Sync + 'static,
    {
        self.events.subscribe(callback)
    }

    /// Remove an event observer; `false` when the handle is unknown.
    pub fn unsubscribe_events(&self, id: SubscriptionId) -> bool {
        self.events.unsubscribe(id)
    }

    /// Observe the dotted active path after every change.
    pub fn subscribe_transitions<F>(&self, callback: F) -> SubscriptionId
    where
        F: Fn(&str) + Send + Sync + 'static,
    {
        self.transitions.subscribe(callback)
    }

    /// Remove a path observer; `false` when the handle is unknown.
    pub fn unsubscribe_transitions(&self, id: SubscriptionId) -> bool {
        self.transitions.unsubscribe(id)
    }

    /// Snapshot of every path change recorded so far.
    pub fn history(&self) -> StateHistory {
        self.history
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }

    /// The configuration document this machine was parsed from, when it was
    /// built from one.
    pub fn config(&self) -> Option<&str> {
        self.config.as_deref()
    }

    // Emissions run after the tree is written, so a subscriber panic leaves
    // the tree consistent; recover the guard instead of wedging the machine.
    fn lock_root(&self) -> MutexGuard<'_, StateNode> {
        self.root.lock().unwrap_or_else(|e| e.into_inner())
    }
}
