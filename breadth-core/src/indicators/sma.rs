//! Simple Moving Average (SMA).
//!
//! Mean of the trailing `period` closes ending at an observation.
//! Lookback: period - 1 (first valid value at index period-1).

use super::indicator::Indicator;
use crate::domain::PricePoint;

#[derive(Debug, Clone)]
pub struct Sma {
    period: usize,
}

impl Sma {
    /// A zero period never yields a value.
    pub fn new(period: usize) -> Self {
        Self { period }
    }
}

impl Indicator for Sma {
    fn lookback(&self) -> usize {
        self.period.saturating_sub(1)
    }

    fn value_at(&self, points: &[PricePoint], index: usize) -> Option<f64> {
        if self.period == 0 || index >= points.len() || index < self.lookback() {
            return None;
        }
        let window = &points[(index - self.lookback())..=index];
        Some(window.iter().map(|p| p.close).sum::<f64>() / self.period as f64)
    }
}
