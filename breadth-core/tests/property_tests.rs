//! Property tests for breadth invariants.
//!
//! Uses proptest to verify:
//! 1. Advance/decline counts are bounded and the ratio is always defined
//! 2. Symbols below the long window never reach participation output
//! 3. Flagged breakouts clear the trailing high; others never do
//! 4. Per-industry counts sum to the universe-wide count
//! 5. Every reported percentage lies in [0, 100]

use breadth_core::breadth::{
    advance_decline, breakout_listings, detect_breakouts, index_breadth, industry_breakouts,
    industry_participation, participation_rows, BreadthParams,
};
use breadth_core::domain::{IndexMembership, MembershipCatalog, PriceSeries, SeriesTable};
use chrono::{Duration, NaiveDate};
use proptest::prelude::*;

const INDUSTRIES: [&str; 3] = ["Auto", "Banks", "Pharma"];

fn end_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 6, 28).unwrap()
}

// ── Strategies (proptest) ────────────────────────────────────────────

/// A random walk of `len` closes laid on consecutive calendar days.
fn arb_series(max_len: usize) -> impl Strategy<Value = PriceSeries> {
    (0..max_len, 10.0..500.0_f64).prop_flat_map(|(len, start)| {
        prop::collection::vec(-0.04..0.04_f64, len).prop_map(move |returns| {
            let end = end_date();
            let mut close = start;
            let n = returns.len() as i64;
            PriceSeries::from_pairs(returns.into_iter().enumerate().map(|(i, r)| {
                close *= 1.0 + r;
                (end - Duration::days(n - 1 - i as i64), close)
            }))
        })
    })
}

/// A universe of up to 12 symbols with random industries and histories.
fn arb_universe() -> impl Strategy<Value = (MembershipCatalog, SeriesTable)> {
    prop::collection::vec((arb_series(260), 0..4usize), 1..12).prop_map(|entries| {
        let mut catalog = MembershipCatalog::new();
        let mut table = SeriesTable::new();
        let mut members = Vec::new();
        for (i, (series, industry)) in entries.into_iter().enumerate() {
            let symbol = format!("S{i}");
            catalog.add_symbol(symbol.clone(), INDUSTRIES.get(industry).map(|s| s.to_string()));
            if i % 2 == 0 {
                members.push(symbol.clone());
            }
            table.insert(symbol, series);
        }
        catalog.add_index(IndexMembership::new("Even", members));
        (catalog, table)
    })
}

fn in_pct_range(v: f64) -> bool {
    (0.0..=100.0).contains(&v)
}

proptest! {
    #[test]
    fn advance_decline_is_bounded((catalog, table) in arb_universe()) {
        let symbols = catalog.universe_symbols();
        let rows = advance_decline(&table, &symbols, end_date(), &BreadthParams::default());
        prop_assert_eq!(rows.len(), 15);
        for row in rows {
            prop_assert!(row.advancers + row.decliners <= symbols.len());
            prop_assert!(row.ratio.is_finite());
            prop_assert!(row.ratio >= 0.0);
        }
    }

    #[test]
    fn participation_respects_eligibility_gate((catalog, table) in arb_universe()) {
        let params = BreadthParams::default();
        let symbols = catalog.universe_symbols();
        let rows = participation_rows(&table, &symbols, &params);
        for row in &rows {
            prop_assert!(table.get(&row.symbol).unwrap().len() >= params.long_ma);
        }
        let eligible = symbols
            .iter()
            .filter(|s| table.get(s).unwrap().len() >= params.long_ma)
            .count();
        prop_assert_eq!(rows.len(), eligible);
    }

    #[test]
    fn breakouts_clear_trailing_high((catalog, table) in arb_universe()) {
        let params = BreadthParams::default();
        let symbols = catalog.universe_symbols();
        let flagged: Vec<String> = detect_breakouts(&table, &symbols, &params)
            .into_iter()
            .map(|b| b.symbol)
            .collect();

        for symbol in &symbols {
            let closes = table.get(symbol).unwrap().closes();
            let n = closes.len();
            let is_flagged = flagged.iter().any(|f| f == symbol);
            if n < params.breakout_window + 1 {
                prop_assert!(!is_flagged);
                continue;
            }
            let window = &closes[n - 1 - params.breakout_window..n - 1];
            let high = window.iter().copied().fold(f64::NEG_INFINITY, f64::max);
            prop_assert_eq!(is_flagged, closes[n - 1] >= high);
        }
    }

    #[test]
    fn industry_counts_are_conserved((catalog, table) in arb_universe()) {
        let symbols = catalog.universe_symbols();
        let rows = participation_rows(&table, &symbols, &BreadthParams::default());
        let groups = industry_participation(&rows, &catalog);

        let mapped = |symbol: &str| catalog.industry_of(symbol).is_some();
        let above_short = rows.iter().filter(|r| r.above_short && mapped(&r.symbol)).count();
        let above_long = rows.iter().filter(|r| r.above_long && mapped(&r.symbol)).count();
        prop_assert_eq!(groups.iter().map(|g| g.above_short).sum::<usize>(), above_short);
        prop_assert_eq!(groups.iter().map(|g| g.above_long).sum::<usize>(), above_long);
        prop_assert!(groups.iter().all(|g| g.total > 0));
    }

    #[test]
    fn percentages_stay_in_range((catalog, table) in arb_universe()) {
        let params = BreadthParams::default();
        let symbols = catalog.universe_symbols();
        let rows = participation_rows(&table, &symbols, &params);
        for g in industry_participation(&rows, &catalog) {
            prop_assert!(in_pct_range(g.pct_above_short) && in_pct_range(g.pct_above_long));
        }

        let breakouts = detect_breakouts(&table, &symbols, &params);
        let listings = breakout_listings(&breakouts, &catalog);
        for g in industry_breakouts(&listings, &catalog) {
            prop_assert!(in_pct_range(g.pct_in_breakout));
        }

        for row in index_breadth(&table, &catalog, &breakouts, &params) {
            prop_assert!(in_pct_range(row.pct_above_short));
            prop_assert!(in_pct_range(row.pct_above_long));
            prop_assert!(in_pct_range(row.pct_in_breakout));
        }
    }
}
