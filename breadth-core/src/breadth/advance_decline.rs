//! Advance/decline ratio over recent calendar days.
//!
//! Each day D compares a symbol's close on D with its close on D-1 (the
//! previous *calendar* day, not the previous trading day). Mondays therefore
//! compare against Sundays and usually contribute nothing. Symbols without
//! an exact observation on both dates are skipped.

use chrono::{Duration, NaiveDate};
use serde::{Deserialize, Serialize};

use super::{round_to, BreadthParams};
use crate::domain::{PriceSeries, SeriesTable};

/// Classification of a single day's move.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Direction {
    Advancing,
    Declining,
    Neutral,
}

impl Direction {
    /// Strictly beyond `threshold_pct` in either direction; otherwise neutral.
    pub fn classify(change_pct: f64, threshold_pct: f64) -> Self {
        if change_pct > threshold_pct {
            Direction::Advancing
        } else if change_pct < -threshold_pct {
            Direction::Declining
        } else {
            Direction::Neutral
        }
    }
}

/// Advancers and decliners for one calendar day.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AdvanceDeclineRow {
    pub date: NaiveDate,
    pub advancers: usize,
    pub decliners: usize,
    /// advancers / max(decliners, 1), two decimals.
    pub ratio: f64,
}

/// Percent change from the previous calendar day to `day`.
pub fn calendar_day_change_pct(series: &PriceSeries, day: NaiveDate) -> Option<f64> {
    if series.len() < 2 {
        return None;
    }
    let today = series.close_on(day)?;
    let prev = series.close_on(day.pred_opt()?)?;
    Some((today - prev) / prev * 100.0)
}

/// Advance/decline counts for a single day across `symbols`.
pub fn advance_decline_on(
    table: &SeriesTable,
    symbols: &[&str],
    day: NaiveDate,
    params: &BreadthParams,
) -> AdvanceDeclineRow {
    let mut advancers = 0;
    let mut decliners = 0;

    for symbol in symbols {
        let Some(change) = table
            .get(symbol)
            .and_then(|series| calendar_day_change_pct(series, day))
        else {
            continue;
        };
        match Direction::classify(change, params.ad_threshold_pct) {
            Direction::Advancing => advancers += 1,
            Direction::Declining => decliners += 1,
            Direction::Neutral => {}
        }
    }

    AdvanceDeclineRow {
        date: day,
        advancers,
        decliners,
        ratio: round_to(advancers as f64 / decliners.max(1) as f64, 2),
    }
}

/// One row per calendar day for the `params.ad_days` days ending at `as_of`,
/// ascending by date. Weekends and holidays are included as (usually empty) rows.
pub fn advance_decline(
    table: &SeriesTable,
    symbols: &[&str],
    as_of: NaiveDate,
    params: &BreadthParams,
) -> Vec<AdvanceDeclineRow> {
    let mut rows: Vec<AdvanceDeclineRow> = (0..params.ad_days)
        .filter_map(|back| as_of.checked_sub_signed(Duration::days(back as i64)))
        .map(|day| advance_decline_on(table, symbols, day, params))
        .collect();
    rows.sort_by_key(|r| r.date);

    tracing::debug!(
        days = rows.len(),
        symbols = symbols.len(),
        "computed advance/decline table"
    );
    rows
}
