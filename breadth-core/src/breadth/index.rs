//! Index-wise cross-tabulation and the per-index breakout view.
//!
//! Unlike the industry table, an index with no eligible constituents still
//! gets a row, with every percentage reported as an explicit 0.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use super::participation::breadth_row;
use super::{pct, BreadthError, BreadthParams, BreakoutListing, BreakoutRow};
use crate::domain::{IndexMembership, IndexName, MembershipCatalog, SeriesTable};

/// Summary row for one index.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndexBreadthRow {
    pub index: IndexName,
    /// Constituents with enough history for both moving averages.
    pub total: usize,
    pub above_short: usize,
    pub pct_above_short: f64,
    pub above_long: usize,
    pub pct_above_long: f64,
    pub breakouts: usize,
    pub pct_in_breakout: f64,
}

/// Result of the per-index breakout selection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum IndexBreakouts {
    /// Breakouts in the index, sorted by today's change descending.
    Found(Vec<BreakoutListing>),
    /// The index has no breakout stocks.
    NoBreakouts,
}

impl IndexBreakouts {
    pub fn listings(&self) -> &[BreakoutListing] {
        match self {
            IndexBreakouts::Found(listings) => listings,
            IndexBreakouts::NoBreakouts => &[],
        }
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, IndexBreakouts::NoBreakouts)
    }
}

/// Breadth summary for a single index.
///
/// A constituent counts as a breakout only if it is eligible here and
/// appears in `breakout_symbols`.
pub fn index_row(
    index: &IndexMembership,
    table: &SeriesTable,
    breakout_symbols: &BTreeSet<&str>,
    params: &BreadthParams,
) -> IndexBreadthRow {
    let mut total = 0;
    let mut above_short = 0;
    let mut above_long = 0;
    let mut breakouts = 0;

    for symbol in &index.symbols {
        let Some(row) = table
            .get(symbol)
            .and_then(|series| breadth_row(symbol, series, params))
        else {
            continue;
        };
        total += 1;
        above_short += usize::from(row.above_short);
        above_long += usize::from(row.above_long);
        breakouts += usize::from(breakout_symbols.contains(symbol.as_str()));
    }

    IndexBreadthRow {
        index: index.name.clone(),
        total,
        above_short,
        pct_above_short: pct(above_short, total, 1),
        above_long,
        pct_above_long: pct(above_long, total, 1),
        breakouts,
        pct_in_breakout: pct(breakouts, total, 1),
    }
}

/// One row per configured index, in catalog order.
pub fn index_breadth(
    table: &SeriesTable,
    catalog: &MembershipCatalog,
    breakouts: &[BreakoutRow],
    params: &BreadthParams,
) -> Vec<IndexBreadthRow> {
    let breakout_symbols: BTreeSet<&str> = breakouts.iter().map(|b| b.symbol.as_str()).collect();
    catalog
        .indices()
        .iter()
        .map(|index| {
            let row = index_row(index, table, &breakout_symbols, params);
            tracing::debug!(
                index = %row.index,
                constituents = index.symbols.len(),
                eligible = row.total,
                "computed index breadth"
            );
            row
        })
        .collect()
}

/// Restrict the global breakout list to one index's constituents.
pub fn index_breakouts(
    listings: &[BreakoutListing],
    catalog: &MembershipCatalog,
    index_name: &str,
) -> Result<IndexBreakouts, BreadthError> {
    let index = catalog
        .index(index_name)
        .ok_or_else(|| BreadthError::UnknownIndex {
            name: index_name.to_string(),
        })?;

    let mut selected: Vec<BreakoutListing> = listings
        .iter()
        .filter(|l| index.contains(&l.symbol))
        .cloned()
        .collect();

    if selected.is_empty() {
        return Ok(IndexBreakouts::NoBreakouts);
    }
    selected.sort_by(|a, b| b.change_pct.total_cmp(&a.change_pct));
    Ok(IndexBreakouts::Found(selected))
}
