//! The cooperative scheduling engine.
//!
//! # Key Concepts
//!
//! - **Tasks**: per-state resumable work, stepped once per tick
//! - **Machine**: owns the current state and the single running task
//! - **Controller**: validates requests, resolves multi-hop routes
//! - **Recovery**: restores the entity snapshot after illegal requests
//!
//! Everything runs on the caller's thread. A request, whether it comes
//! from a task's own step result or from a stimulus between ticks, is
//! applied in full before the next step.

mod machine;
mod recovery;
mod task;
mod transition;

pub use machine::{Machine, MachineStats, MachineStatus};
pub use recovery::Recovery;
pub use task::{factory, Idle, LeaveBadState, StateTask, Step, TaskContext, TaskFactory, TaskSeed};
pub use transition::TransitionOutcome;
