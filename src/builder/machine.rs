//! Builder for constructing machines.

use crate::builder::error::BuildError;
use crate::builder::graph::{HopTable, TransitionGraph};
use crate::builder::registry::StateRegistry;
use crate::builder::validation::{into_errors, validate, Descriptor};
use crate::core::{State, StateHistory, StateId, DEFAULT_HISTORY_CAPACITY};
use crate::engine::{Machine, StateTask, TaskSeed};
use crate::world::Body;
use tracing::error;

/// Builder for a machine descriptor with a fluent API.
///
/// A new builder already holds the default states (`BAD_STATE`,
/// `INIT_STATE`) and the edge `BAD_STATE -> INIT_STATE`; behavior
/// registrations overwrite or extend them.
pub struct MachineBuilder<B> {
    name: String,
    start: Option<StateId>,
    recovery: Option<StateId>,
    registry: StateRegistry<B>,
    graph: TransitionGraph,
    hops: HopTable,
    history_capacity: usize,
}

impl<B: Body + 'static> MachineBuilder<B> {
    /// Create a new builder.
    pub fn new() -> Self {
        let mut graph = TransitionGraph::new();
        graph.declare(StateId::BAD_STATE, [StateId::INIT_STATE]);
        Self {
            name: "machine".to_string(),
            start: None,
            recovery: None,
            registry: StateRegistry::with_defaults(),
            graph,
            hops: HopTable::new(),
            history_capacity: DEFAULT_HISTORY_CAPACITY,
        }
    }

    /// Name used in log output.
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Set the start state (required).
    pub fn start(mut self, state: impl Into<StateId>) -> Self {
        self.start = Some(state.into());
        self
    }

    /// Re-enter `state` after illegal transitions instead of the start state.
    pub fn recover_to(mut self, state: impl Into<StateId>) -> Self {
        self.recovery = Some(state.into());
        self
    }

    /// Register the task for a behavior state, named after the variant.
    pub fn state<S, T, F>(mut self, state: S, make: F) -> Self
    where
        S: State,
        T: StateTask<B> + 'static,
        F: Fn(TaskSeed) -> T + Send + Sync + 'static,
    {
        self.registry.register(state.id(), state.name(), make);
        self
    }

    /// Register the task for a raw state id. Overwrites earlier entries.
    pub fn register_state<T, F>(mut self, id: impl Into<StateId>, make: F) -> Self
    where
        T: StateTask<B> + 'static,
        F: Fn(TaskSeed) -> T + Send + Sync + 'static,
    {
        let id = id.into();
        self.registry.register(id, id.to_string(), make);
        self
    }

    /// Declare legal successors of `from`. Additive.
    pub fn declare_edge<I>(mut self, from: impl Into<StateId>, to: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<StateId>,
    {
        self.graph
            .declare(from.into(), to.into_iter().map(Into::into));
        self
    }

    /// Route requests for `toward` made in `from` through `via`.
    pub fn declare_hop(
        mut self,
        from: impl Into<StateId>,
        toward: impl Into<StateId>,
        via: impl Into<StateId>,
    ) -> Self {
        self.hops.declare(from.into(), toward.into(), via.into());
        self
    }

    /// Number of transitions kept in the machine's history.
    pub fn history_capacity(mut self, capacity: usize) -> Self {
        self.history_capacity = capacity;
        self
    }

    /// Validate the descriptor and start the machine for `body`.
    ///
    /// Captures the body's transform as the machine's snapshot. Fails
    /// with every configuration error found; a start state without a task
    /// is not an error, recovery falls back to the idle task for it.
    pub fn build(mut self, body: &B) -> Result<Machine<B>, BuildError> {
        let start = self.start.ok_or(BuildError::MissingStartState)?;
        let recovery_target = self.recovery.unwrap_or(start);

        let check = validate(&Descriptor {
            registry: &self.registry,
            graph: &self.graph,
            hops: &self.hops,
            start,
            recovery: self.recovery,
        });
        into_errors(check).map_err(BuildError::Configuration)?;
        self.graph.declare(StateId::BAD_STATE, [recovery_target]);

        if !self.registry.contains(start) {
            error!(
                machine = %self.name,
                start = %start,
                "start state has no task; recovery into it will idle"
            );
        }

        Ok(Machine::launch(
            self.name,
            self.registry,
            self.graph,
            self.hops,
            start,
            recovery_target,
            StateHistory::with_capacity(self.history_capacity),
            body,
        ))
    }
}

impl<B: Body + 'static> Default for MachineBuilder<B> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::ConfigurationError;
    use crate::core::{Transform, Vec3};
    use crate::engine::Idle;

    #[derive(Default)]
    struct Post {
        transform: Transform,
    }

    impl Body for Post {
        fn transform(&self) -> Transform {
            self.transform
        }

        fn set_transform(&mut self, transform: Transform) {
            self.transform = transform;
        }
    }

    const A: StateId = StateId::new(1);
    const B: StateId = StateId::new(2);

    #[test]
    fn builder_requires_start_state() {
        let result = MachineBuilder::<Post>::new().build(&Post::default());

        assert!(matches!(result, Err(BuildError::MissingStartState)));
    }

    #[test]
    fn builder_rejects_sentinel_start() {
        let result = MachineBuilder::<Post>::new()
            .start(StateId::NOT_A_STATE)
            .build(&Post::default());

        let err = result.unwrap_err();
        assert_eq!(
            err.configuration_errors(),
            &[ConfigurationError::SentinelState {
                role: "start state",
                state: StateId::NOT_A_STATE,
            }]
        );
    }

    #[test]
    fn builder_rejects_sentinel_recovery_target() {
        let result = MachineBuilder::new()
            .register_state(A, |_| Idle)
            .start(A)
            .recover_to(StateId::NOT_A_STATE)
            .build(&Post::default());

        let err = result.unwrap_err();
        assert!(err
            .configuration_errors()
            .contains(&ConfigurationError::SentinelState {
                role: "recovery target",
                state: StateId::NOT_A_STATE,
            }));
    }

    #[test]
    fn builder_rejects_edge_without_task() {
        let result = MachineBuilder::new()
            .register_state(A, |_| Idle)
            .declare_edge(A, [B])
            .start(A)
            .build(&Post::default());

        let err = result.unwrap_err();
        assert_eq!(
            err.configuration_errors(),
            &[ConfigurationError::MissingFactory {
                state: B,
                referenced_by: "edge #1 -> #2 (target)".to_string(),
            }]
        );
    }

    #[test]
    fn builder_rejects_unregistered_recovery_target() {
        let result = MachineBuilder::new()
            .register_state(A, |_| Idle)
            .start(A)
            .recover_to(B)
            .build(&Post::default());

        let err = result.unwrap_err();
        assert!(err
            .configuration_errors()
            .contains(&ConfigurationError::MissingRecoveryTarget { target: B }));
    }

    #[test]
    fn fluent_api_builds_machine() {
        let body = Post {
            transform: Transform::at(Vec3::new(0.0, 1.0, 0.0)),
        };
        let machine = MachineBuilder::new()
            .name("post")
            .register_state(A, |_| Idle)
            .register_state(B, |_| Idle)
            .declare_edge(A, [B])
            .declare_edge(B, [A])
            .start(A)
            .build(&body)
            .unwrap();

        assert_eq!(machine.name(), "post");
        assert_eq!(machine.current_state(), A);
        assert_eq!(machine.recovery_target(), A);
        assert_eq!(machine.snapshot().start_position(), Vec3::new(0.0, 1.0, 0.0));
        assert_eq!(machine.snapshot().start_state(), A);
        assert!(machine.can_transition_to(B));
        assert!(machine.graph().is_legal(StateId::BAD_STATE, A));
        assert!(machine.has_active_task());
    }

    #[test]
    fn edges_declared_twice_merge() {
        let machine = MachineBuilder::new()
            .register_state(A, |_| Idle)
            .register_state(B, |_| Idle)
            .register_state(StateId::new(3), |_| Idle)
            .declare_edge(A, [B])
            .declare_edge(A, [StateId::new(3)])
            .start(A)
            .build(&Post::default())
            .unwrap();

        assert!(machine.can_transition_to(B));
        assert!(machine.can_transition_to(StateId::new(3)));
    }
}
