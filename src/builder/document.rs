//! Serialized form of a machine definition.
//!
//! Lets a definition live in a configuration file instead of code. A
//! document is validated by the same builder as a hand-written definition.
//!
//! ```json
//! {
//!   "states": ["Submitted", "Paid", "Fulfilled", "Cancelled"],
//!   "events": ["Pay", "Fulfill", "Cancel"],
//!   "initial": "Submitted",
//!   "terminals": ["Fulfilled", "Cancelled"],
//!   "transitions": [
//!     { "source": "Submitted", "event": "Pay", "target": "Paid" },
//!     { "source": "Paid", "event": "Fulfill", "target": "Fulfilled" }
//!   ]
//! }
//! ```

use crate::builder::error::ConfigurationError;
use crate::builder::machine::MachineBuilder;
use crate::core::{Event, MachineDefinition, State, Transition};
use serde::{Deserialize, Serialize};

/// Declarative description of a machine definition.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(bound = "")]
pub struct DefinitionDocument<S: State, E: Event> {
    pub states: Vec<S>,
    pub events: Vec<E>,
    pub initial: S,
    #[serde(default)]
    pub terminals: Vec<S>,
    #[serde(default)]
    pub transitions: Vec<Transition<S, E>>,
}

impl<S: State, E: Event> DefinitionDocument<S, E> {
    /// Validate the document and build the definition it describes.
    pub fn build(self) -> Result<MachineDefinition<S, E>, ConfigurationError> {
        MachineBuilder::new()
            .states(self.states)
            .events(self.events)
            .initial(self.initial)
            .terminals(self.terminals)
            .transitions(self.transitions)
            .build()
    }
}

impl<S: State, E: Event> MachineDefinition<S, E> {
    /// Parse and validate a JSON definition document.
    pub fn from_json(json: &str) -> Result<Self, ConfigurationError> {
        let document: DefinitionDocument<S, E> =
            serde_json::from_str(json).map_err(|e| ConfigurationError::Malformed(e.to_string()))?;
        document.build()
    }

    /// Describe this definition as a document.
    ///
    /// Transitions keep declaration order. States, events and terminals
    /// come out in an unspecified order.
    pub fn to_document(&self) -> DefinitionDocument<S, E> {
        DefinitionDocument {
            states: self.states().cloned().collect(),
            events: self.events().cloned().collect(),
            initial: self.initial().clone(),
            terminals: self.terminals().cloned().collect(),
            transitions: self.transitions().to_vec(),
        }
    }
}
