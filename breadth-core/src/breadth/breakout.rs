//! Relative-strength breakouts.
//!
//! A symbol breaks out when its latest close reaches the trailing high of
//! the `breakout_window` observations ending at the *previous* close, so a
//! breakout must clear the prior range rather than trivially match itself.
//!
//! Industry representation divides by the full industry population from the
//! catalog, not by the subset with enough history. This differs on purpose
//! from the eligible-count denominator used for moving-average participation.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

use super::{pct, round_to, BreadthParams};
use crate::domain::{MembershipCatalog, PriceSeries, SeriesTable, Symbol};
use crate::indicators::{Indicator, RollingMax};

/// A flagged breakout.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BreakoutRow {
    pub symbol: Symbol,
    /// Latest close, two decimals.
    pub close: f64,
    /// Percent change versus the previous close, two decimals.
    pub change_pct: f64,
}

/// Breakout joined with its industry for display.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BreakoutListing {
    pub symbol: Symbol,
    pub industry: Option<String>,
    pub close: f64,
    pub change_pct: f64,
}

/// Breakout representation for one industry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndustryBreakout {
    pub industry: String,
    pub breakouts: usize,
    pub industry_total: usize,
    pub pct_in_breakout: f64,
}

/// Check one symbol for a breakout.
///
/// Series shorter than the window are skipped. With exactly `breakout_window`
/// observations the trailing window ending at the previous close is still one
/// short, so such a symbol cannot be flagged yet.
pub fn detect_breakout(
    symbol: &str,
    series: &PriceSeries,
    params: &BreadthParams,
) -> Option<BreakoutRow> {
    let n = series.len();
    if n < params.breakout_window || n < 2 {
        return None;
    }
    let points = series.points();
    let last_close = points[n - 1].close;
    let prev_close = points[n - 2].close;
    let trailing_high = RollingMax::new(params.breakout_window).value_at(points, n - 2)?;

    if last_close < trailing_high {
        return None;
    }

    Some(BreakoutRow {
        symbol: symbol.to_string(),
        close: round_to(last_close, 2),
        change_pct: round_to((last_close - prev_close) / prev_close * 100.0, 2),
    })
}

/// Breakouts among `symbols`, in input order.
pub fn detect_breakouts(
    table: &SeriesTable,
    symbols: &[&str],
    params: &BreadthParams,
) -> Vec<BreakoutRow> {
    let rows: Vec<BreakoutRow> = symbols
        .iter()
        .filter_map(|s| table.get(s).and_then(|series| detect_breakout(s, series, params)))
        .collect();

    tracing::debug!(
        breakouts = rows.len(),
        scanned = symbols.len(),
        "detected relative-strength breakouts"
    );
    rows
}

/// Join breakouts to their industries, sorted by today's change descending.
pub fn breakout_listings(rows: &[BreakoutRow], catalog: &MembershipCatalog) -> Vec<BreakoutListing> {
    let mut listings: Vec<BreakoutListing> = rows
        .iter()
        .map(|row| BreakoutListing {
            symbol: row.symbol.clone(),
            industry: catalog.industry_of(&row.symbol).map(String::from),
            close: row.close,
            change_pct: row.change_pct,
        })
        .collect();
    listings.sort_by(|a, b| b.change_pct.total_cmp(&a.change_pct));
    listings
}

/// Number of distinct industries represented among the listings.
pub fn unique_industries(listings: &[BreakoutListing]) -> usize {
    listings
        .iter()
        .filter_map(|l| l.industry.as_deref())
        .collect::<BTreeSet<_>>()
        .len()
}

/// Breakout count per industry against that industry's full population.
///
/// Only industries with at least one breakout appear, sorted by percentage
/// descending (ties by name). Listings without an industry, or whose industry
/// has no population in the catalog, are left out.
pub fn industry_breakouts(
    listings: &[BreakoutListing],
    catalog: &MembershipCatalog,
) -> Vec<IndustryBreakout> {
    let totals = catalog.industry_totals();
    let mut counts: BTreeMap<&str, usize> = BTreeMap::new();
    for industry in listings.iter().filter_map(|l| l.industry.as_deref()) {
        *counts.entry(industry).or_insert(0) += 1;
    }

    let mut rows: Vec<IndustryBreakout> = counts
        .into_iter()
        .filter_map(|(industry, breakouts)| {
            let industry_total = totals.get(industry).copied().filter(|&t| t > 0)?;
            Some(IndustryBreakout {
                industry: industry.to_string(),
                breakouts,
                industry_total,
                pct_in_breakout: pct(breakouts, industry_total, 2),
            })
        })
        .collect();
    rows.sort_by(|a, b| b.pct_in_breakout.total_cmp(&a.pct_in_breakout));
    rows
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, NaiveDate};

    fn series(closes: &[f64]) -> PriceSeries {
        let base = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        PriceSeries::from_pairs(
            closes
                .iter()
                .enumerate()
                .map(|(i, &c)| (base + Duration::days(i as i64), c)),
        )
    }

    fn rising(n: usize) -> Vec<f64> {
        (0..n).map(|i| 100.0 + i as f64).collect()
    }

    #[test]
    fn new_high_is_flagged() {
        let row = detect_breakout("A", &series(&rising(70)), &BreadthParams::default()).unwrap();
        assert_eq!(row.close, 169.0);
        assert_eq!(row.change_pct, round_to(1.0 / 168.0 * 100.0, 2));
    }

    #[test]
    fn equal_to_prior_high_is_flagged() {
        let mut closes = vec![100.0; 80];
        closes[40] = 120.0;
        closes.push(120.0);
        let row = detect_breakout("A", &series(&closes), &BreadthParams::default()).unwrap();
        assert_eq!(row.change_pct, 20.0);
    }

    #[test]
    fn below_prior_high_is_not_flagged() {
        let mut closes = vec![100.0; 80];
        closes[40] = 120.0;
        closes.push(119.99);
        assert!(detect_breakout("A", &series(&closes), &BreadthParams::default()).is_none());
    }

    #[test]
    fn high_outside_window_is_ignored() {
        // The 150 close falls one observation outside the trailing window.
        let mut closes = vec![150.0];
        closes.extend(vec![100.0; 65]);
        closes.push(101.0);
        assert!(detect_breakout("A", &series(&closes), &BreadthParams::default()).is_some());
    }

    #[test]
    fn window_boundary() {
        let params = BreadthParams::default();
        assert!(detect_breakout("A", &series(&rising(64)), &params).is_none());
        assert!(detect_breakout("A", &series(&rising(65)), &params).is_none());
        assert!(detect_breakout("A", &series(&rising(66)), &params).is_some());
    }

    #[test]
    fn zero_window_never_flags() {
        let params = BreadthParams {
            breakout_window: 0,
            ..BreadthParams::default()
        };
        let mut table = SeriesTable::new();
        table.insert("A", series(&rising(70)));
        assert!(detect_breakouts(&table, &["A"], &params).is_empty());
    }

    fn catalog() -> MembershipCatalog {
        let mut c = MembershipCatalog::new();
        for (s, i) in [
            ("A", "Auto"),
            ("B", "Auto"),
            ("C", "Auto"),
            ("D", "Auto"),
            ("E", "Metals"),
            ("F", "Metals"),
        ] {
            c.add_symbol(s, Some(i.into()));
        }
        c.add_symbol("G", None);
        c
    }

    fn row(symbol: &str, change_pct: f64) -> BreakoutRow {
        BreakoutRow {
            symbol: symbol.into(),
            close: 10.0,
            change_pct,
        }
    }

    #[test]
    fn listings_sorted_by_change_desc() {
        let listings = breakout_listings(
            &[row("A", 1.5), row("E", 4.0), row("G", 2.0)],
            &catalog(),
        );
        let order: Vec<&str> = listings.iter().map(|l| l.symbol.as_str()).collect();
        assert_eq!(order, vec!["E", "G", "A"]);
        assert_eq!(listings[1].industry, None);
        assert_eq!(unique_industries(&listings), 2);
    }

    #[test]
    fn industry_representation_uses_full_population() {
        let c = catalog();
        let listings = breakout_listings(&[row("A", 1.0), row("E", 1.0), row("G", 1.0)], &c);
        let stats = industry_breakouts(&listings, &c);

        assert_eq!(stats.len(), 2);
        assert_eq!(stats[0].industry, "Metals");
        assert_eq!(stats[0].pct_in_breakout, 50.0);
        assert_eq!(stats[1].industry, "Auto");
        assert_eq!(stats[1].industry_total, 4);
        assert_eq!(stats[1].pct_in_breakout, 25.0);
    }

    #[test]
    fn industries_without_breakouts_or_population_are_absent() {
        let c = catalog();
        let stray = BreakoutListing {
            symbol: "Z".into(),
            industry: Some("Unlisted".into()),
            close: 1.0,
            change_pct: 1.0,
        };
        let stats = industry_breakouts(&[stray], &c);
        assert!(stats.is_empty());
    }
}
