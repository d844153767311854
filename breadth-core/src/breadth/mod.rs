//! Breadth metrics engine.
//!
//! Pure computations over a `SeriesTable` + `MembershipCatalog` snapshot:
//! - Advance/decline ratio over recent calendar days
//! - Moving-average participation (per symbol, per industry)
//! - Relative-strength breakouts against the trailing high
//! - Index-wise cross-tabulation and the per-index breakout view
//!
//! Every routine only reads its inputs and allocates fresh outputs, so any
//! of them may run concurrently against the same snapshot.

pub mod advance_decline;
pub mod breakout;
pub mod index;
pub mod participation;

pub use advance_decline::{advance_decline, advance_decline_on, AdvanceDeclineRow, Direction};
pub use breakout::{
    breakout_listings, detect_breakouts, industry_breakouts, unique_industries, BreakoutListing,
    BreakoutRow, IndustryBreakout,
};
pub use index::{index_breadth, index_breakouts, IndexBreadthRow, IndexBreakouts};
pub use participation::{
    breadth_row, industry_participation, participation_rows, BreadthRow, IndustryParticipation,
};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors surfaced by the engine.
///
/// Per-symbol problems (short history, missing dates, unmapped industry) are
/// never errors; they are skipped where they occur.
#[derive(Debug, Error, PartialEq)]
pub enum BreadthError {
    #[error("no usable price data for any universe symbol")]
    NoPriceData,

    #[error("membership catalog has no universe symbols")]
    NoMembershipData,

    #[error("unknown index '{name}'")]
    UnknownIndex { name: String },

    #[error("invalid breadth parameters: {0}")]
    InvalidParams(String),
}

/// Lookback windows and thresholds for every breadth computation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BreadthParams {
    /// Short moving-average window (observations).
    pub short_ma: usize,
    /// Long moving-average window; also the participation eligibility gate.
    pub long_ma: usize,
    /// Trailing-high window for relative-strength breakouts.
    pub breakout_window: usize,
    /// Number of calendar days covered by the advance/decline table.
    pub ad_days: usize,
    /// Absolute percent move beyond which a symbol advances or declines.
    pub ad_threshold_pct: f64,
}

impl Default for BreadthParams {
    fn default() -> Self {
        Self {
            short_ma: 50,
            long_ma: 200,
            breakout_window: 65,
            ad_days: 15,
            ad_threshold_pct: 1.0,
        }
    }
}

impl BreadthParams {
    pub fn validate(&self) -> Result<(), BreadthError> {
        if self.short_ma == 0 || self.long_ma == 0 || self.breakout_window == 0 {
            return Err(BreadthError::InvalidParams(
                "moving-average and breakout windows must be >= 1".into(),
            ));
        }
        if self.short_ma > self.long_ma {
            return Err(BreadthError::InvalidParams(format!(
                "short_ma ({}) must not exceed long_ma ({})",
                self.short_ma, self.long_ma
            )));
        }
        if self.ad_days == 0 {
            return Err(BreadthError::InvalidParams("ad_days must be >= 1".into()));
        }
        if !self.ad_threshold_pct.is_finite() || self.ad_threshold_pct < 0.0 {
            return Err(BreadthError::InvalidParams(
                "ad_threshold_pct must be a non-negative number".into(),
            ));
        }
        Ok(())
    }
}

/// Round half away from zero to `decimals` places.
pub fn round_to(value: f64, decimals: u32) -> f64 {
    let factor = 10f64.powi(decimals as i32);
    (value * factor).round() / factor
}

/// `part / whole * 100`, rounded; an empty group reports an explicit 0.
pub fn pct(part: usize, whole: usize, decimals: u32) -> f64 {
    if whole == 0 {
        return 0.0;
    }
    round_to(part as f64 / whole as f64 * 100.0, decimals)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_params_match_fixed_windows() {
        let p = BreadthParams::default();
        assert_eq!((p.short_ma, p.long_ma, p.breakout_window, p.ad_days), (50, 200, 65, 15));
        assert!(p.validate().is_ok());
    }

    #[test]
    fn invalid_params_rejected() {
        let p = BreadthParams {
            short_ma: 300,
            ..BreadthParams::default()
        };
        assert!(matches!(p.validate(), Err(BreadthError::InvalidParams(_))));

        let p = BreadthParams {
            breakout_window: 0,
            ..BreadthParams::default()
        };
        assert!(p.validate().is_err());
    }

    #[test]
    fn rounding_helpers() {
        assert_eq!(round_to(2.0 / 3.0, 2), 0.67);
        assert_eq!(round_to(1.25, 1), 1.3);
        assert_eq!(pct(1, 3, 1), 33.3);
        assert_eq!(pct(2, 4, 1), 50.0);
        assert_eq!(pct(5, 0, 1), 0.0);
    }
}
