//! Build errors for machine descriptors.

use crate::core::StateId;
use thiserror::Error;

/// A single problem in a machine descriptor.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ConfigurationError {
    #[error("State {state} is referenced by {referenced_by} but has no registered task")]
    MissingFactory {
        state: StateId,
        referenced_by: String,
    },

    #[error("Hop from {from} toward {toward} goes through {via}, but {from} -> {via} is not declared")]
    IllegalHop {
        from: StateId,
        toward: StateId,
        via: StateId,
    },

    #[error("Recovery target {target} has no registered task")]
    MissingRecoveryTarget { target: StateId },

    #[error("The {role} cannot be the sentinel {state}")]
    SentinelState { role: &'static str, state: StateId },
}

/// Errors that can occur when building a machine.
#[derive(Debug, Error)]
pub enum BuildError {
    #[error("Start state not specified. Call .start(state) before .build()")]
    MissingStartState,

    #[error("Machine descriptor has {} configuration error(s): {}", .0.len(), summarize(.0))]
    Configuration(Vec<ConfigurationError>),
}

impl BuildError {
    /// The individual configuration errors, if any.
    pub fn configuration_errors(&self) -> &[ConfigurationError] {
        match self {
            BuildError::Configuration(errors) => errors,
            BuildError::MissingStartState => &[],
        }
    }
}

fn summarize(errors: &[ConfigurationError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}
