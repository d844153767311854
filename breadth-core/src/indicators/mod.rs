//! Indicators used by the breadth engine.
//!
//! Both implement the `Indicator` trait; the engine reads single values at
//! the latest (or second-latest) observation via `value_at`/`latest`.

pub mod indicator;
pub mod rolling_max;
pub mod sma;

pub use indicator::Indicator;
pub use rolling_max::RollingMax;
pub use sma::Sma;

/// Create a daily price series from closes for testing.
#[cfg(test)]
pub fn make_points(closes: &[f64]) -> Vec<crate::domain::PricePoint> {
    use crate::domain::PricePoint;
    let base_date = chrono::NaiveDate::from_ymd_opt(2024, 1, 2).unwrap();
    closes
        .iter()
        .enumerate()
        .map(|(i, &close)| PricePoint::new(base_date + chrono::Duration::days(i as i64), close))
        .collect()
}

/// Assert two f64 values are approximately equal (within epsilon).
#[cfg(test)]
pub fn assert_approx(actual: f64, expected: f64, epsilon: f64) {
    assert!(
        (actual - expected).abs() < epsilon,
        "assert_approx failed: actual={actual}, expected={expected}, diff={}, epsilon={epsilon}",
        (actual - expected).abs()
    );
}

/// Default epsilon for indicator tests.
#[cfg(test)]
pub const DEFAULT_EPSILON: f64 = 1e-10;
