//! Build-time validation of machine descriptors.
//!
//! Every check produces a `Validation` and the results are combined with
//! `Validation::all_vec`, so a descriptor with several mistakes reports
//! all of them at once instead of one per build attempt.

use crate::builder::error::ConfigurationError;
use crate::builder::graph::{HopTable, TransitionGraph};
use crate::builder::registry::StateRegistry;
use crate::core::StateId;
use stillwater::validation::Validation;
use stillwater::NonEmptyVec;

type Check = Validation<(), NonEmptyVec<ConfigurationError>>;

/// What the validator needs to know about a descriptor.
pub struct Descriptor<'a, B> {
    pub registry: &'a StateRegistry<B>,
    pub graph: &'a TransitionGraph,
    pub hops: &'a HopTable,
    pub start: StateId,
    /// Explicit recovery target, if the behavior set one.
    pub recovery: Option<StateId>,
}

/// Check the descriptor, accumulating ALL configuration errors.
pub fn validate<B: 'static>(descriptor: &Descriptor<'_, B>) -> Check {
    let mut checks: Vec<Check> = Vec::new();
    let registry = descriptor.registry;

    checks.push(not_sentinel(descriptor.start, "start state"));

    for (from, to) in descriptor.graph.edges() {
        checks.push(require_task(
            registry,
            from,
            || format!("edge {from} -> {to} (source)"),
        ));
        checks.push(require_task(
            registry,
            to,
            || format!("edge {from} -> {to} (target)"),
        ));
    }

    for (from, toward, via) in descriptor.hops.routes() {
        checks.push(require_task(
            registry,
            via,
            || format!("hop {from} -> {toward} (intermediate)"),
        ));
        checks.push(if descriptor.graph.is_legal(from, via) {
            Validation::success(())
        } else {
            Validation::fail(ConfigurationError::IllegalHop { from, toward, via })
        });
    }

    if let Some(target) = descriptor.recovery {
        checks.push(not_sentinel(target, "recovery target"));
        checks.push(if registry.contains(target) {
            Validation::success(())
        } else {
            Validation::fail(ConfigurationError::MissingRecoveryTarget { target })
        });
    }

    Validation::all_vec(checks).map(|_| ())
}

/// Convert a failed validation into a plain list of errors.
pub fn into_errors(check: Check) -> Result<(), Vec<ConfigurationError>> {
    match check {
        Validation::Success(_) => Ok(()),
        Validation::Failure(errors) => Err(errors.iter().cloned().collect()),
    }
}

fn not_sentinel(state: StateId, role: &'static str) -> Check {
    if state.is_sentinel() {
        Validation::fail(ConfigurationError::SentinelState { role, state })
    } else {
        Validation::success(())
    }
}

fn require_task<B: 'static>(
    registry: &StateRegistry<B>,
    state: StateId,
    referenced_by: impl FnOnce() -> String,
) -> Check {
    if registry.contains(state) {
        Validation::success(())
    } else {
        Validation::fail(ConfigurationError::MissingFactory {
            state,
            referenced_by: referenced_by(),
        })
    }
}
