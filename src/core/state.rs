//! State identifiers and the `State` trait for behavior state enums.
//!
//! The engine only ever sees [`StateId`] values. Behaviors describe their
//! states as plain enums (usually through the [`state_enum!`](crate::state_enum)
//! macro) and convert them into ids at the edges of the API.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Integer identifier for a machine state.
///
/// Three values are reserved by the engine:
///
/// - [`StateId::NOT_A_STATE`]: no transition is pending
/// - [`StateId::BAD_STATE`]: landing state of an illegal transition
/// - [`StateId::INIT_STATE`]: default entry state
///
/// Behaviors may reuse `INIT_STATE`'s value for one of their own states;
/// registering a task for it simply overwrites the default idle task.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Debug, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StateId(i32);

impl StateId {
    /// Sentinel meaning "no pending transition".
    pub const NOT_A_STATE: StateId = StateId(-2);

    /// Landing state for transitions that were not supposed to happen.
    pub const BAD_STATE: StateId = StateId(-1);

    /// Default entry state of every machine.
    pub const INIT_STATE: StateId = StateId(0);

    pub const fn new(raw: i32) -> Self {
        StateId(raw)
    }

    pub const fn raw(self) -> i32 {
        self.0
    }

    /// Check whether this id is an engine sentinel that a machine can
    /// never settle in. `INIT_STATE` is not one: behaviors may own it.
    pub fn is_sentinel(self) -> bool {
        self == Self::NOT_A_STATE || self == Self::BAD_STATE
    }
}

impl From<i32> for StateId {
    fn from(raw: i32) -> Self {
        StateId(raw)
    }
}

impl fmt::Display for StateId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            Self::NOT_A_STATE => f.write_str("NOT_A_STATE"),
            Self::BAD_STATE => f.write_str("BAD_STATE"),
            StateId(raw) => write!(f, "#{raw}"),
        }
    }
}

/// Trait for behavior state enums.
///
/// Implementations map each variant to a stable [`StateId`] and back.
/// All methods are pure.
///
/// # Example
///
/// ```rust
/// use smartstate::core::{State, StateId};
///
/// #[derive(Clone, Copy, PartialEq, Eq, Debug)]
/// enum Valve {
///     Shut,
///     Flowing,
/// }
///
/// impl State for Valve {
///     fn id(self) -> StateId {
///         StateId::new(self as i32)
///     }
///
///     fn name(&self) -> &'static str {
///         match self {
///             Self::Shut => "Shut",
///             Self::Flowing => "Flowing",
///         }
///     }
///
///     fn from_id(id: StateId) -> Option<Self> {
///         match id.raw() {
///             0 => Some(Self::Shut),
///             1 => Some(Self::Flowing),
///             _ => None,
///         }
///     }
/// }
///
/// assert_eq!(Valve::from_id(Valve::Flowing.id()), Some(Valve::Flowing));
/// ```
pub trait State: Copy + Eq + fmt::Debug + Send + Sync + 'static {
    /// Identifier used by the engine for this state.
    fn id(self) -> StateId;

    /// Name for display/logging.
    fn name(&self) -> &'static str;

    /// Inverse of [`State::id`].
    fn from_id(id: StateId) -> Option<Self>;

    /// Check if this is a terminal state with no way out.
    ///
    /// Default implementation returns `false`.
    fn is_final(&self) -> bool {
        false
    }
}
