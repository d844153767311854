//! Rolling maximum of closes: the trailing high over a lookback window.
//!
//! Value at t = max(close[t-period+1..=t]). Lookback: period - 1.

use super::indicator::Indicator;
use crate::domain::PricePoint;

#[derive(Debug, Clone)]
pub struct RollingMax {
    period: usize,
}

impl RollingMax {
    /// A zero period never yields a value.
    pub fn new(period: usize) -> Self {
        Self { period }
    }
}

impl Indicator for RollingMax {
    fn lookback(&self) -> usize {
        self.period.saturating_sub(1)
    }

    fn value_at(&self, points: &[PricePoint], index: usize) -> Option<f64> {
        if self.period == 0 || index >= points.len() || index < self.lookback() {
            return None;
        }
        let high = points[(index - self.lookback())..=index]
            .iter()
            .map(|p| p.close)
            .fold(f64::NEG_INFINITY, f64::max);
        Some(high)
    }
}
