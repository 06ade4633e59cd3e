//! Recursive state-tree engine.
//!
//! A [`StateNode`] is the runtime instance of one [`StateDefinition`] along
//! the active path. Each node owns at most one active child, created fresh
//! from the shared definition every time a state is entered, so no subscriber
//! list or child pointer survives deactivation.
//!
//! Events dispatch innermost-first: the deepest active state is offered the
//! event before its ancestors, and a capture stops the climb. Entry actions
//! run top-down on activation, exit actions bottom-up on deactivation. Both
//! are announced as plain named [`Event`]s through the node's event registry,
//! which forwards into the parent's registry all the way to the root.

use super::definition::StateDefinition;
use super::error::ConfigError;
use super::event::Event;
use super::observer::ObserverRegistry;
use std::sync::Arc;

/// The currently active child of a node, owned exclusively by its parent.
#[derive(Debug)]
struct ActiveChild {
    name: String,
    node: Box<StateNode>,
}

/// Runtime instance of a state along the active path.
///
/// Operations on a node are not internally synchronized; callers serialize
/// access, as [`Machine`](crate::Machine) does behind its lock.
///
/// # Example
///
/// ```rust
/// use statecraft::core::{StateDefinition, StateNode};
/// use std::sync::Arc;
///
/// let definition: StateDefinition = serde_json::from_str(
///     r#"{
///         "initial": "idle",
///         "states": {
///             "idle": { "on": { "START": "running" } },
///             "running": {}
///         }
///     }"#,
/// )
/// .unwrap();
///
/// let mut root = StateNode::new(Arc::new(definition));
/// root.init().unwrap();
/// assert_eq!(root.active_path(), "idle");
///
/// assert!(root.transition("START"));
/// assert_eq!(root.active_path(), "running");
/// ```
#[derive(Debug)]
pub struct StateNode {
    definition: Arc<StateDefinition>,
    active: Option<ActiveChild>,
    events: ObserverRegistry<Event>,
    transitions: ObserverRegistry<str>,
}

impl StateNode {
    /// Create an inactive node for `definition`.
    ///
    /// Nothing runs until [`init`](StateNode::init) is called.
    pub fn new(definition: Arc<StateDefinition>) -> Self {
        StateNode {
            definition,
            active: None,
            events: ObserverRegistry::new(),
            transitions: ObserverRegistry::new(),
        }
    }

    /// Activate this node's initial chain.
    ///
    /// When the definition declares an `initial` child, that child is
    /// instantiated, wired into this node's registries, and recorded as
    /// active (announcing the path change). This node's own entry event
    /// fires next, then the child is initialized the same way, so entry
    /// events arrive top-down. A node without an `initial` is a leaf and
    /// only fires its own entry event.
    ///
    /// Fails when `initial` names a state missing from `states`, at this
    /// level or any level below.
    pub fn init(&mut self) -> Result<(), ConfigError> {
        let initial = self.definition.initial_state().map(str::to_string);
        if let Some(initial) = initial {
            let definition = match self.definition.states.get(&initial) {
                Some(definition) => Arc::clone(definition),
                None => return Err(ConfigError::UndefinedInitialState { state: initial }),
            };
            self.activate(&initial, &definition);
        }
        self.enter();
        if let Some(child) = &mut self.active {
            child.node.init()?;
        }
        Ok(())
    }

    /// Dispatch one event; returns whether it was captured.
    ///
    /// The active child is asked first, recursively, so the innermost
    /// active state gets the event before its ancestors and a capture
    /// stops the climb. When no descendant captures it, this node reads
    /// the active child's `on` table and resolves the target among that
    /// child's siblings in this node's `states`. A hit tears the old
    /// branch down bottom-up, then activates the target top-down.
    ///
    /// Misses are inert: no `on` entry anywhere along the active path, an
    /// entry whose target is not declared, or a target whose own initial
    /// chain is broken all leave the tree untouched and report `false`.
    pub fn transition(&mut self, event: &str) -> bool {
        if let Some(child) = &mut self.active {
            if child.node.transition(event) {
                return true;
            }
        }
        let Some(child) = &self.active else {
            return false;
        };
        let Some(target) = child.node.definition.on.get(event) else {
            return false;
        };
        if target.is_empty() {
            return false;
        }
        let Some(definition) = self.definition.states.get(target) else {
            return false;
        };
        // The old branch comes down only once the target's whole initial
        // chain is known to resolve, so a transition that cannot finish
        // never starts.
        if !definition.initial_chain_resolves() {
            return false;
        }

        let target = target.clone();
        let definition = Arc::clone(definition);
        if let Some(child) = &mut self.active {
            child.node.close();
        }
        self.activate(&target, &definition);
        if let Some(child) = &mut self.active {
            // Cannot fail: the chain was checked before the swap.
            let _ = child.node.init();
        }
        true
    }

    /// Run exit events for the active branch, deepest state first, then
    /// this node's own exit event.
    pub fn exit(&self) {
        if let Some(child) = &self.active {
            child.node.exit();
        }
        if let Some(exit) = self.definition.exit_action() {
            self.events.emit(&Event::new(exit));
        }
    }

    /// Tear this node down when it is superseded by a transition.
    ///
    /// Runs [`exit`](StateNode::exit), then drops every event subscriber.
    /// Transition subscribers are left in place.
    pub fn close(&mut self) {
        self.exit();
        self.events.clear();
    }

    /// Dotted names of the active chain below this node; empty when no
    /// child is active.
    pub fn active_path(&self) -> String {
        match &self.active {
            Some(child) => {
                let rest = child.node.active_path();
                if rest.is_empty() {
                    child.name.clone()
                } else {
                    format!("{}.{}", child.name, rest)
                }
            }
            None => String::new(),
        }
    }

    /// Raw named events emitted by this node and bubbled up from its
    /// active descendants.
    pub fn events(&self) -> &ObserverRegistry<Event> {
        &self.events
    }

    /// Active-path announcements for changes anywhere in this subtree.
    pub fn transitions(&self) -> &ObserverRegistry<str> {
        &self.transitions
    }

    fn enter(&self) {
        if let Some(entry) = self.definition.entry_action() {
            self.events.emit(&Event::new(entry));
        }
    }

    /// Build a fresh child for `definition` and wire its registries into
    /// this node's before recording it as active.
    fn activate(&mut self, name: &str, definition: &Arc<StateDefinition>) {
        let child = StateNode::new(Arc::clone(definition));

        let events = self.events.clone();
        child.events.subscribe(move |event: &Event| events.emit(event));

        let transitions = self.transitions.clone();
        let child_name = name.to_string();
        child.transitions.subscribe(move |path: &str| {
            transitions.emit(&format!("{}.{}", child_name, path));
        });

        self.set_active(name, Box::new(child));
    }

    fn set_active(&mut self, name: &str, node: Box<StateNode>) {
        if name.is_empty() {
            return;
        }
        self.active = Some(ActiveChild {
            name: name.to_string(),
            node,
        });
        let path = self.active_path();
        self.transitions.emit(&path);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    fn node(json: &str) -> StateNode {
        let definition: StateDefinition = serde_json::from_str(json).unwrap();
        StateNode::new(Arc::new(definition))
    }

    fn collect_events(node: &StateNode) -> Arc<Mutex<Vec<String>>> {
        let log = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&log);
        node.events().subscribe(move |event: &Event| {
            sink.lock().unwrap().push(event.name.clone());
        });
        log
    }

    fn collect_paths(node: &StateNode) -> Arc<Mutex<Vec<String>>> {
        let log = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&log);
        node.transitions().subscribe(move |path: &str| {
            sink.lock().unwrap().push(path.to_string());
        });
        log
    }

    #[test]
    fn leaf_init_fires_only_its_own_entry() {
        let mut leaf = node(r#"{ "entry": "woke_up" }"#);
        let events = collect_events(&leaf);

        leaf.init().unwrap();

        assert_eq!(*events.lock().unwrap(), vec!["woke_up"]);
        assert_eq!(leaf.active_path(), "");
    }

    #[test]
    fn init_activates_the_initial_chain() {
        let mut root = node(
            r#"{
                "initial": "idle",
                "states": {
                    "idle": {
                        "initial": "low",
                        "states": { "low": {} }
                    }
                }
            }"#,
        );

        root.init().unwrap();

        assert_eq!(root.active_path(), "idle.low");
        let idle = root.active.as_ref().unwrap();
        assert_eq!(idle.name, "idle");
        assert_eq!(idle.node.active.as_ref().unwrap().name, "low");
    }

    #[test]
    fn init_rejects_an_undeclared_initial_state() {
        let mut root = node(r#"{ "initial": "idling", "states": { "idle": {} } }"#);

        let err = root.init().unwrap_err();

        assert_eq!(
            err.to_string(),
            "No definition for state: idling. Remove initial state or add it to 'states' config."
        );
        assert!(root.active.is_none());
        assert_eq!(root.active_path(), "");
    }

    #[test]
    fn init_surfaces_a_missing_state_at_any_depth() {
        let mut root = node(
            r#"{
                "initial": "idle",
                "states": {
                    "idle": { "initial": "ghost", "states": {} }
                }
            }"#,
        );

        let err = root.init().unwrap_err();
        assert_eq!(
            err,
            ConfigError::UndefinedInitialState {
                state: "ghost".to_string()
            }
        );
    }

    #[test]
    fn set_active_ignores_an_empty_name() {
        let mut root = node("{}");
        let paths = collect_paths(&root);

        root.set_active("", Box::new(node("{}")));

        assert!(root.active.is_none());
        assert!(paths.lock().unwrap().is_empty());

        root.set_active("idle", Box::new(node("{}")));
        assert_eq!(root.active.as_ref().unwrap().name, "idle");
        assert_eq!(*paths.lock().unwrap(), vec!["idle"]);
    }

    #[test]
    fn close_clears_event_subscribers_but_keeps_transition_subscribers() {
        let mut leaf = node(r#"{ "exit": "exit_test_event" }"#);
        let events = collect_events(&leaf);
        let _paths = collect_paths(&leaf);
        assert_eq!(leaf.events().len(), 1);
        assert_eq!(leaf.transitions().len(), 1);

        leaf.close();

        assert_eq!(*events.lock().unwrap(), vec!["exit_test_event"]);
        assert!(leaf.events().is_empty());
        assert_eq!(leaf.transitions().len(), 1);
    }

    #[test]
    fn exit_events_run_leaf_first() {
        let mut root = node(
            r#"{
                "exit": "exit_parent",
                "initial": "idle",
                "states": {
                    "idle": { "exit": "exit_child" }
                }
            }"#,
        );
        let events = collect_events(&root);

        root.init().unwrap();
        root.exit();

        assert_eq!(*events.lock().unwrap(), vec!["exit_child", "exit_parent"]);
    }

    #[test]
    fn flat_transitions_swap_between_siblings() {
        let mut root = node(
            r#"{
                "initial": "idle",
                "states": {
                    "idle": {
                        "entry": "entered_idle",
                        "on": { "START": "running" }
                    },
                    "running": {
                        "entry": "entered_running",
                        "on": { "STOP": "idle" }
                    }
                }
            }"#,
        );
        let events = collect_events(&root);

        root.init().unwrap();
        assert_eq!(*events.lock().unwrap(), vec!["entered_idle"]);
        assert_eq!(root.active_path(), "idle");

        assert!(root.transition("START"));
        assert_eq!(
            *events.lock().unwrap(),
            vec!["entered_idle", "entered_running"]
        );
        assert_eq!(root.active_path(), "running");

        assert!(root.transition("STOP"));
        assert_eq!(
            *events.lock().unwrap(),
            vec!["entered_idle", "entered_running", "entered_idle"]
        );
        assert_eq!(root.active_path(), "idle");
    }

    #[test]
    fn unknown_events_leave_the_tree_unchanged() {
        let mut root = node(
            r#"{
                "initial": "idle",
                "states": {
                    "idle": { "entry": "entered_idle", "on": { "START": "running" } },
                    "running": {}
                }
            }"#,
        );
        let events = collect_events(&root);
        root.init().unwrap();

        assert!(!root.transition("NOT_AN_EVENT"));

        assert_eq!(root.active_path(), "idle");
        assert_eq!(*events.lock().unwrap(), vec!["entered_idle"]);
    }

    #[test]
    fn transition_to_an_undeclared_target_is_inert() {
        let mut root = node(
            r#"{
                "initial": "idle",
                "states": {
                    "idle": { "exit": "exited_idle", "on": { "GO": "nowhere" } }
                }
            }"#,
        );
        let events = collect_events(&root);
        root.init().unwrap();

        assert!(!root.transition("GO"));

        assert_eq!(root.active_path(), "idle");
        assert!(events.lock().unwrap().is_empty());
    }

    #[test]
    fn transition_to_a_target_with_a_broken_chain_is_inert() {
        let mut root = node(
            r#"{
                "initial": "idle",
                "states": {
                    "idle": { "exit": "exited_idle", "on": { "GO": "broken" } },
                    "broken": { "initial": "ghost", "states": {} }
                }
            }"#,
        );
        let events = collect_events(&root);
        root.init().unwrap();

        assert!(!root.transition("GO"));

        assert_eq!(root.active_path(), "idle");
        assert!(events.lock().unwrap().is_empty());
    }

    #[test]
    fn nested_transitions_swap_within_the_owning_level() {
        let mut root = node(
            r#"{
                "initial": "idle",
                "states": {
                    "idle": {
                        "initial": "idle.low",
                        "states": {
                            "idle.low": {
                                "entry": "entered_idle.low",
                                "on": { "UP": "idle.high" }
                            },
                            "idle.high": {
                                "entry": "entered_idle.high",
                                "on": { "DOWN": "idle.low" }
                            }
                        }
                    }
                }
            }"#,
        );
        let events = collect_events(&root);

        root.init().unwrap();
        assert_eq!(*events.lock().unwrap(), vec!["entered_idle.low"]);
        assert_eq!(root.active_path(), "idle.idle.low");

        assert!(root.transition("UP"));
        assert_eq!(root.active_path(), "idle.idle.high");
        assert_eq!(root.active.as_ref().unwrap().name, "idle");

        assert!(root.transition("DOWN"));
        assert_eq!(root.active_path(), "idle.idle.low");
        assert_eq!(
            *events.lock().unwrap(),
            vec!["entered_idle.low", "entered_idle.high", "entered_idle.low"]
        );
    }

    #[test]
    fn entries_fire_top_down_and_exits_bottom_up() {
        let mut root = node(
            r#"{
                "initial": "idle",
                "states": {
                    "idle": {
                        "entry": "entered_idle",
                        "exit": "exited_idle",
                        "initial": "idle.low",
                        "on": { "START": "running" },
                        "states": {
                            "idle.low": {
                                "entry": "entered_idle.low",
                                "exit": "exited_idle.low"
                            }
                        }
                    },
                    "running": { "entry": "entered_running", "exit": "exited_running" }
                }
            }"#,
        );
        let events = collect_events(&root);

        root.init().unwrap();
        assert_eq!(
            *events.lock().unwrap(),
            vec!["entered_idle", "entered_idle.low"]
        );

        assert!(root.transition("START"));
        assert_eq!(
            *events.lock().unwrap(),
            vec![
                "entered_idle",
                "entered_idle.low",
                "exited_idle.low",
                "exited_idle",
                "entered_running"
            ]
        );
    }

    #[test]
    fn active_path_joins_names_with_dots() {
        let mut root = node(
            r#"{
                "initial": "idle",
                "states": {
                    "idle": {
                        "initial": "idle.low",
                        "states": { "idle.low": {} }
                    },
                    "running": {}
                }
            }"#,
        );
        root.init().unwrap();
        assert_eq!(root.active_path(), "idle.idle.low");
    }

    #[test]
    fn path_changes_are_announced_for_every_activation() {
        let mut root = node(
            r#"{
                "initial": "idle",
                "states": {
                    "idle": {
                        "initial": "idle.low",
                        "states": {
                            "idle.low": { "on": { "UP": "idle.high" } },
                            "idle.high": {}
                        }
                    }
                }
            }"#,
        );
        let paths = collect_paths(&root);

        root.init().unwrap();
        assert_eq!(*paths.lock().unwrap(), vec!["idle", "idle.idle.low"]);

        root.transition("UP");
        assert_eq!(
            *paths.lock().unwrap(),
            vec!["idle", "idle.idle.low", "idle.idle.high"]
        );
    }

    #[test]
    fn the_innermost_capture_stops_the_climb() {
        let mut root = node(
            r#"{
                "initial": "a",
                "states": {
                    "a": {
                        "initial": "x",
                        "on": { "GO": "b" },
                        "states": {
                            "x": { "on": { "GO": "y" } },
                            "y": {}
                        }
                    },
                    "b": {}
                }
            }"#,
        );
        root.init().unwrap();
        assert_eq!(root.active_path(), "a.x");

        assert!(root.transition("GO"));

        assert_eq!(root.active_path(), "a.y");
        assert_eq!(root.active.as_ref().unwrap().name, "a");
    }

    #[test]
    fn reentering_a_state_resets_its_runtime() {
        let mut root = node(
            r#"{
                "initial": "idle",
                "states": {
                    "idle": { "on": { "START": "running" } },
                    "running": { "on": { "STOP": "idle" } }
                }
            }"#,
        );
        root.init().unwrap();

        // One event subscriber on the fresh child: the parent forwarder.
        let idle = &root.active.as_ref().unwrap().node;
        assert_eq!(idle.events().len(), 1);
        idle.events().subscribe(|_| {});
        assert_eq!(idle.events().len(), 2);

        root.transition("START");
        root.transition("STOP");

        let idle = &root.active.as_ref().unwrap().node;
        assert_eq!(idle.events().len(), 1);
        assert_eq!(idle.transitions().len(), 1);
        assert!(idle.active.is_none());
    }

    #[test]
    fn reinitializing_builds_the_chain_fresh() {
        let mut root = node(
            r#"{
                "initial": "idle",
                "states": { "idle": { "entry": "entered_idle" } }
            }"#,
        );
        let events = collect_events(&root);

        root.init().unwrap();
        root.init().unwrap();

        assert_eq!(root.active_path(), "idle");
        assert_eq!(
            *events.lock().unwrap(),
            vec!["entered_idle", "entered_idle"]
        );
        assert_eq!(root.active.as_ref().unwrap().node.events().len(), 1);
    }
}
