//! Indicator trait.
//!
//! Indicators are pure functions of close history.

use crate::domain::PricePoint;

/// Trait for indicators evaluated at a single observation.
///
/// No value at index t may depend on observations after t.
pub trait Indicator: Send + Sync {
    /// Number of observations before `index` needed for a valid value.
    fn lookback(&self) -> usize;

    /// Value at `index`, or `None` while warming up / out of range.
    fn value_at(&self, points: &[PricePoint], index: usize) -> Option<f64>;

    /// Value at the most recent observation.
    fn latest(&self, points: &[PricePoint]) -> Option<f64> {
        points
            .len()
            .checked_sub(1)
            .and_then(|last| self.value_at(points, last))
    }
}
