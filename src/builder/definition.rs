//! Builder for declaring state trees in code.

use crate::builder::error::BuildError;
use crate::core::StateDefinition;
use std::collections::HashMap;
use std::sync::Arc;

/// Fluent builder for a [`StateDefinition`] tree.
///
/// Unlike the JSON path, which leaves malformed transition targets inert at
/// runtime, the builder validates references while assembling: an `initial`
/// must name a declared child, and every child's `on` target must name one
/// of that child's siblings.
///
/// # Example
///
/// ```rust
/// use statecraft::builder::StateDefinitionBuilder;
/// use statecraft::Machine;
///
/// let definition = StateDefinitionBuilder::new()
///     .initial("idle")
///     .state(
///         "idle",
///         StateDefinitionBuilder::new()
///             .entry("entered_idle")
///             .on("START", "running"),
///     )?
///     .state("running", StateDefinitionBuilder::new())?
///     .build()?;
///
/// let machine = Machine::from_definition(definition);
/// machine.start()?;
/// assert_eq!(machine.current_state(), "idle");
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
pub struct StateDefinitionBuilder {
    id: Option<String>,
    initial: Option<String>,
    states: HashMap<String, Arc<StateDefinition>>,
    entry: Option<String>,
    exit: Option<String>,
    on: HashMap<String, String>,
}

impl StateDefinitionBuilder {
    /// Create a new builder for one level of the tree.
    pub fn new() -> Self {
        Self {
            id: None,
            initial: None,
            states: HashMap::new(),
            entry: None,
            exit: None,
            on: HashMap::new(),
        }
    }

    /// Set the diagnostic identifier.
    pub fn id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    /// Name the child state activated when this state is entered.
    pub fn initial(mut self, state: impl Into<String>) -> Self {
        self.initial = Some(state.into());
        self
    }

    /// Set the event name fired when this state is entered.
    pub fn entry(mut self, event: impl Into<String>) -> Self {
        self.entry = Some(event.into());
        self
    }

    /// Set the event name fired when this state is left.
    pub fn exit(mut self, event: impl Into<String>) -> Self {
        self.exit = Some(event.into());
        self
    }

    /// Map `event` to a sibling state of this one.
    pub fn on(mut self, event: impl Into<String>, target: impl Into<String>) -> Self {
        self.on.insert(event.into(), target.into());
        self
    }

    /// Declare a child state from a nested builder.
    ///
    /// The child is built immediately, so a broken reference inside it
    /// surfaces here rather than at the top-level `build`.
    pub fn state(
        mut self,
        name: impl Into<String>,
        child: StateDefinitionBuilder,
    ) -> Result<Self, BuildError> {
        let definition = child.build()?;
        self.states.insert(name.into(), Arc::new(definition));
        Ok(self)
    }

    /// Declare a child state from an already-built definition.
    pub fn add_state(mut self, name: impl Into<String>, definition: StateDefinition) -> Self {
        self.states.insert(name.into(), Arc::new(definition));
        self
    }

    /// Validate references at this level and produce the definition.
    pub fn build(self) -> Result<StateDefinition, BuildError> {
        if let Some(initial) = &self.initial {
            if !self.states.contains_key(initial) {
                return Err(BuildError::UndefinedInitialState {
                    state: initial.clone(),
                });
            }
        }
        for (name, child) in &self.states {
            for (event, target) in &child.on {
                if !self.states.contains_key(target) {
                    return Err(BuildError::UndefinedTransitionTarget {
                        state: name.clone(),
                        event: event.clone(),
                        target: target.clone(),
                    });
                }
            }
        }

        Ok(StateDefinition {
            id: self.id,
            initial: self.initial,
            states: self.states,
            entry: self.entry,
            exit: self.exit,
            on: self.on,
        })
    }
}

impl Default for StateDefinitionBuilder {
    fn default() -> Self {
        Self::new()
    }
}
