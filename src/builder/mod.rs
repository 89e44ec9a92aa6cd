//! Builder API for machine descriptors.
//!
//! A descriptor is everything a behavior supplies to the shared engine:
//! its states and their task factories (registry), the legal direct moves
//! (graph), the multi-hop routes (hop table), and the start and recovery
//! states. The builder validates it as a whole before a machine is
//! started, so configuration mistakes fail construction rather than
//! surfacing at runtime.

pub mod error;
pub mod graph;
pub mod machine;
pub mod macros;
pub mod registry;
pub mod validation;

pub use error::{BuildError, ConfigurationError};
pub use graph::{HopTable, TransitionGraph};
pub use machine::MachineBuilder;
pub use registry::StateRegistry;
