//! State registry: state id to task factory.

use crate::core::StateId;
use crate::engine::{factory, Idle, LeaveBadState, StateTask, TaskFactory, TaskSeed};
use std::borrow::Cow;
use std::collections::BTreeMap;

struct Entry<B> {
    name: Cow<'static, str>,
    factory: TaskFactory<B>,
}

/// Maps each state to the factory that creates its task.
pub struct StateRegistry<B> {
    entries: BTreeMap<StateId, Entry<B>>,
}

impl<B: 'static> StateRegistry<B> {
    /// An empty registry.
    pub fn new() -> Self {
        Self {
            entries: BTreeMap::new(),
        }
    }

    /// A registry holding the engine's default states: `BAD_STATE` leaves
    /// for the recovery target, `INIT_STATE` idles.
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        registry.register_factory(
            StateId::BAD_STATE,
            "BAD_STATE",
            factory(|_: TaskSeed| LeaveBadState),
        );
        registry.register_factory(StateId::INIT_STATE, "INIT_STATE", factory(|_: TaskSeed| Idle));
        registry
    }

    /// Insert or overwrite the factory for `id`.
    pub fn register<T, F>(&mut self, id: StateId, name: impl Into<Cow<'static, str>>, make: F)
    where
        T: StateTask<B> + 'static,
        F: Fn(TaskSeed) -> T + Send + Sync + 'static,
    {
        self.register_factory(id, name, factory(make));
    }

    pub fn register_factory(
        &mut self,
        id: StateId,
        name: impl Into<Cow<'static, str>>,
        factory: TaskFactory<B>,
    ) {
        self.entries.insert(
            id,
            Entry {
                name: name.into(),
                factory,
            },
        );
    }

    pub fn contains(&self, id: StateId) -> bool {
        self.entries.contains_key(&id)
    }

    pub fn factory(&self, id: StateId) -> Option<&TaskFactory<B>> {
        self.entries.get(&id).map(|entry| &entry.factory)
    }

    /// Display name for `id`, for logging.
    pub fn label(&self, id: StateId) -> &str {
        match self.entries.get(&id) {
            Some(entry) => entry.name.as_ref(),
            None if id == StateId::NOT_A_STATE => "NOT_A_STATE",
            None => "<unregistered>",
        }
    }

    /// Registered ids in ascending order.
    pub fn states(&self) -> impl Iterator<Item = StateId> + '_ {
        self.entries.keys().copied()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<B: 'static> Default for StateRegistry<B> {
    fn default() -> Self {
        Self::new()
    }
}
