//! Smartstate: tick-driven state machines for interactive scene objects
//!
//! Every interactive object (a door, a light, a throwable) is one instance
//! of the same engine, configured by a descriptor: its states, a task
//! factory per state, the legal transitions between them, and multi-hop
//! routes through intermediate states. The host calls `tick` once per
//! frame; external stimuli such as a key press become transition
//! requests. A request that is neither a legal edge nor a declared route
//! is never an error: the machine restores the entity to its initial
//! snapshot and re-enters its recovery state.
//!
//! # Core Concepts
//!
//! - **State**: `StateId` values, declared per behavior with `state_enum!`
//! - **Task**: resumable per-state work stepped once per tick
//! - **Descriptor**: registry, transition graph and hop table, validated at build
//! - **Recovery**: snapshot restore after an illegal request
//!
//! # Example
//!
//! ```rust
//! use smartstate::builder::MachineBuilder;
//! use smartstate::core::{Transform, Vec3};
//! use smartstate::engine::{Idle, Step, TransitionOutcome};
//! use smartstate::state_enum;
//! use smartstate::world::{Body, Targets};
//!
//! state_enum! {
//!     enum Lever {
//!         Up = 1,
//!         Down = 2,
//!     }
//! }
//!
//! #[derive(Default)]
//! struct Handle {
//!     transform: Transform,
//! }
//!
//! impl Body for Handle {
//!     fn transform(&self) -> Transform {
//!         self.transform
//!     }
//!
//!     fn set_transform(&mut self, transform: Transform) {
//!         self.transform = transform;
//!     }
//! }
//!
//! let mut handle = Handle::default();
//! let mut machine = MachineBuilder::new()
//!     .name("lever")
//!     .state(Lever::Up, |_| Idle)
//!     .state(Lever::Down, |_| Idle)
//!     .declare_edge(Lever::Up, [Lever::Down])
//!     .declare_edge(Lever::Down, [Lever::Up])
//!     .start(Lever::Up)
//!     .build(&handle)
//!     .unwrap();
//!
//! let outcome = machine.request_transition(&mut handle, Lever::Down);
//! assert!(matches!(outcome, TransitionOutcome::Direct { .. }));
//! assert_eq!(machine.tick(&mut handle, &Targets::default(), 0.016), Step::Continue);
//! ```

pub mod behaviors;
pub mod builder;
pub mod core;
pub mod engine;
pub mod world;

// Re-export commonly used types
pub use builder::{BuildError, MachineBuilder};
pub use core::{State, StateHistory, StateId, StateTransition};
pub use engine::{Machine, StateTask, Step, TransitionOutcome};
pub use world::{Body, World};
