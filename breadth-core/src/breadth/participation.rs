//! Moving-average participation.
//!
//! A symbol is eligible only with at least `long_ma` observations; shorter
//! series are excluded from every row and aggregate here (not flagged).
//! Industry percentages use the eligible count as denominator, and
//! industries without eligible symbols produce no row.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::{pct, BreadthParams};
use crate::domain::{MembershipCatalog, PriceSeries, SeriesTable, Symbol};
use crate::indicators::{Indicator, Sma};

/// Latest close against both moving averages for one eligible symbol.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BreadthRow {
    pub symbol: Symbol,
    pub close: f64,
    pub dma_short: f64,
    pub dma_long: f64,
    pub above_short: bool,
    pub above_long: bool,
}

/// Participation for one industry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndustryParticipation {
    pub industry: String,
    pub total: usize,
    pub above_short: usize,
    pub above_long: usize,
    pub pct_above_short: f64,
    pub pct_above_long: f64,
}

/// Breadth row for a single symbol, or `None` below the eligibility gate.
pub fn breadth_row(symbol: &str, series: &PriceSeries, params: &BreadthParams) -> Option<BreadthRow> {
    if series.len() < params.long_ma.max(params.short_ma) {
        return None;
    }
    let points = series.points();
    let close = series.last()?.close;
    let dma_short = Sma::new(params.short_ma).latest(points)?;
    let dma_long = Sma::new(params.long_ma).latest(points)?;

    Some(BreadthRow {
        symbol: symbol.to_string(),
        close,
        dma_short,
        dma_long,
        above_short: close > dma_short,
        above_long: close > dma_long,
    })
}

/// Breadth rows for every eligible symbol in `symbols`, in input order.
pub fn participation_rows(
    table: &SeriesTable,
    symbols: &[&str],
    params: &BreadthParams,
) -> Vec<BreadthRow> {
    let rows: Vec<BreadthRow> = symbols
        .iter()
        .filter_map(|s| table.get(s).and_then(|series| breadth_row(s, series, params)))
        .collect();

    tracing::debug!(
        eligible = rows.len(),
        skipped = symbols.len() - rows.len(),
        "computed moving-average participation"
    );
    rows
}

/// Group breadth rows by industry, ordered by industry name.
///
/// Rows whose symbol has no industry are counted in no group.
pub fn industry_participation(
    rows: &[BreadthRow],
    catalog: &MembershipCatalog,
) -> Vec<IndustryParticipation> {
    let mut groups: BTreeMap<&str, (usize, usize, usize)> = BTreeMap::new();

    for row in rows {
        let Some(industry) = catalog.industry_of(&row.symbol) else {
            continue;
        };
        let entry = groups.entry(industry).or_default();
        entry.0 += 1;
        entry.1 += usize::from(row.above_short);
        entry.2 += usize::from(row.above_long);
    }

    groups
        .into_iter()
        .map(|(industry, (total, above_short, above_long))| IndustryParticipation {
            industry: industry.to_string(),
            total,
            above_short,
            above_long,
            pct_above_short: pct(above_short, total, 1),
            pct_above_long: pct(above_long, total, 1),
        })
        .collect()
}
