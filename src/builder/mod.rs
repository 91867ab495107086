//! Builder API for machine definitions.
//!
//! This module provides the fluent [`MachineBuilder`], the `state_enum!` and
//! `event_enum!` declaration macros, and [`DefinitionDocument`] for loading
//! definitions from configuration. Every path into a
//! [`MachineDefinition`](crate::core::MachineDefinition) goes through
//! [`MachineBuilder::build`], so malformed tables are caught once, at startup.

pub mod document;
pub mod error;
pub mod machine;
pub mod macros;

pub use document::DefinitionDocument;
pub use error::{ConfigurationError, DefinitionViolation};
pub use machine::MachineBuilder;
