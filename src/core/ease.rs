//! Movement easing.

use std::ops::RangeInclusive;

/// Valid range for the `ease_factor` parameter.
pub const EASE_FACTOR_RANGE: RangeInclusive<f32> = 0.0..=2.0;

/// Map normalized progress in `[0, 1]` to eased progress in `[0, 1]`.
///
/// `y = x^a / (x^a + (1 - x)^a)` with `a = ease_factor + 1`. An
/// `ease_factor` of zero is a straight line; larger values accelerate
/// around the midpoint and slow down near both ends. Inputs outside
/// `[0, 1]` are clamped.
///
/// # Example
///
/// ```rust
/// use smartstate::core::ease;
///
/// assert_eq!(ease(0.0, 1.0), 0.0);
/// assert_eq!(ease(0.5, 1.0), 0.5);
/// assert_eq!(ease(1.0, 1.0), 1.0);
/// assert!(ease(0.25, 2.0) < ease(0.25, 0.0));
/// ```
pub fn ease(x: f32, ease_factor: f32) -> f32 {
    let x = x.clamp(0.0, 1.0);
    let a = ease_factor + 1.0;
    let rising = x.powf(a);
    let falling = (1.0 - x).powf(a);
    rising / (rising + falling)
}

/// Check whether `ease_factor` lies in [`EASE_FACTOR_RANGE`].
pub fn is_valid_ease_factor(ease_factor: f32) -> bool {
    EASE_FACTOR_RANGE.contains(&ease_factor)
}
