//! Macros for declaring behavior states.

/// Declare a state enum with explicit ids and implement `State` for it.
///
/// Also implements `From<Enum> for StateId`, so variants can be passed
/// anywhere the builder and machine accept `impl Into<StateId>`.
///
/// # Example
///
/// ```
/// use smartstate::core::{State, StateId};
/// use smartstate::state_enum;
///
/// state_enum! {
///     pub enum Hatch {
///         Shut = 0,
///         Opening = 1,
///         Wide = 2,
///         Welded = 3,
///     }
///     final: [Welded]
/// }
///
/// assert_eq!(StateId::from(Hatch::Wide), StateId::new(2));
/// assert_eq!(Hatch::from_id(StateId::new(1)), Some(Hatch::Opening));
/// assert!(Hatch::Welded.is_final());
/// ```
#[macro_export]
macro_rules! state_enum {
    (
        $(#[$meta:meta])*
        $vis:vis enum $name:ident {
            $(
                $(#[$variant_meta:meta])*
                $variant:ident = $value:literal
            ),* $(,)?
        }

        $(final: [$($final:ident),* $(,)?])?
    ) => {
        $(#[$meta])*
        #[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, serde::Serialize, serde::Deserialize)]
        #[repr(i32)]
        $vis enum $name {
            $(
                $(#[$variant_meta])*
                $variant = $value
            ),*
        }

        impl $crate::core::State for $name {
            fn id(self) -> $crate::core::StateId {
                $crate::core::StateId::new(self as i32)
            }

            fn name(&self) -> &'static str {
                match self {
                    $(Self::$variant => stringify!($variant)),*
                }
            }

            fn from_id(id: $crate::core::StateId) -> Option<Self> {
                match id.raw() {
                    $($value => Some(Self::$variant),)*
                    _ => None,
                }
            }

            fn is_final(&self) -> bool {
                match self {
                    $($(Self::$final => true,)*)?
                    #[allow(unreachable_patterns)]
                    _ => false,
                }
            }
        }

        impl From<$name> for $crate::core::StateId {
            fn from(state: $name) -> Self {
                $crate::core::State::id(state)
            }
        }
    };
}
