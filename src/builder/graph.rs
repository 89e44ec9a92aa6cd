//! Transition graph and hop table.

use crate::core::StateId;
use std::collections::{BTreeMap, BTreeSet};

/// Adjacency map of legal direct moves.
///
/// Declaring edges is additive: declaring successors for the same source
/// twice merges the two sets.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TransitionGraph {
    edges: BTreeMap<StateId, BTreeSet<StateId>>,
}

impl TransitionGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add `to` to the successors of `from`.
    pub fn declare<I>(&mut self, from: StateId, to: I)
    where
        I: IntoIterator<Item = StateId>,
    {
        self.edges.entry(from).or_default().extend(to);
    }

    /// Check whether `from -> to` was declared.
    pub fn is_legal(&self, from: StateId, to: StateId) -> bool {
        self.edges
            .get(&from)
            .is_some_and(|successors| successors.contains(&to))
    }

    /// Declared successors of `from`.
    pub fn successors(&self, from: StateId) -> impl Iterator<Item = StateId> + '_ {
        self.edges.get(&from).into_iter().flatten().copied()
    }

    /// Every declared edge as `(from, to)`.
    pub fn edges(&self) -> impl Iterator<Item = (StateId, StateId)> + '_ {
        self.edges
            .iter()
            .flat_map(|(from, successors)| successors.iter().map(move |to| (*from, *to)))
    }
}

/// Routes for requests with no direct edge.
///
/// Maps `(current, ultimate)` to the intermediate state the machine
/// should enter first.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct HopTable {
    routes: BTreeMap<(StateId, StateId), StateId>,
}

impl HopTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Route requests for `toward` made in `from` through `via`.
    /// A later declaration for the same pair replaces the earlier one.
    pub fn declare(&mut self, from: StateId, toward: StateId, via: StateId) {
        self.routes.insert((from, toward), via);
    }

    pub fn route(&self, from: StateId, toward: StateId) -> Option<StateId> {
        self.routes.get(&(from, toward)).copied()
    }

    /// Every route as `(from, toward, via)`.
    pub fn routes(&self) -> impl Iterator<Item = (StateId, StateId, StateId)> + '_ {
        self.routes
            .iter()
            .map(|((from, toward), via)| (*from, *toward, *via))
    }

    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }
}
