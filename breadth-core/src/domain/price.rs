//! Price observations: the fundamental market data unit for breadth.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::Symbol;

/// Daily close for a single symbol on a single day.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PricePoint {
    pub date: NaiveDate,
    pub close: f64,
}

impl PricePoint {
    pub fn new(date: NaiveDate, close: f64) -> Self {
        Self { date, close }
    }

    /// A usable observation has a finite, strictly positive close.
    pub fn is_usable(&self) -> bool {
        self.close.is_finite() && self.close > 0.0
    }
}

/// Date-ordered close history for one symbol.
///
/// Invariant: dates are strictly increasing and every close is usable.
/// Gaps (weekends, holidays, missing data) are allowed.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PriceSeries {
    points: Vec<PricePoint>,
}

impl PriceSeries {
    /// Build a series from raw observations.
    ///
    /// Unusable closes are dropped, points are sorted by date, and for a
    /// duplicated date the first observation wins.
    pub fn from_points(points: impl IntoIterator<Item = PricePoint>) -> Self {
        let mut points: Vec<PricePoint> = points.into_iter().filter(|p| p.is_usable()).collect();
        points.sort_by_key(|p| p.date);
        points.dedup_by_key(|p| p.date);
        Self { points }
    }

    /// Build a series from `(date, close)` pairs.
    pub fn from_pairs(pairs: impl IntoIterator<Item = (NaiveDate, f64)>) -> Self {
        Self::from_points(pairs.into_iter().map(|(date, close)| PricePoint::new(date, close)))
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn points(&self) -> &[PricePoint] {
        &self.points
    }

    pub fn closes(&self) -> Vec<f64> {
        self.points.iter().map(|p| p.close).collect()
    }

    /// Most recent observation.
    pub fn last(&self) -> Option<&PricePoint> {
        self.points.last()
    }

    /// Close recorded on exactly `date`, if any.
    pub fn close_on(&self, date: NaiveDate) -> Option<f64> {
        self.points
            .binary_search_by_key(&date, |p| p.date)
            .ok()
            .map(|i| self.points[i].close)
    }
}

/// Close histories keyed by symbol. Owned by the caller; the engine only reads it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SeriesTable {
    series: BTreeMap<Symbol, PriceSeries>,
}

impl SeriesTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, symbol: impl Into<Symbol>, series: PriceSeries) {
        self.series.insert(symbol.into(), series);
    }

    pub fn get(&self, symbol: &str) -> Option<&PriceSeries> {
        self.series.get(symbol)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &PriceSeries)> {
        self.series.iter().map(|(s, p)| (s.as_str(), p))
    }

    pub fn len(&self) -> usize {
        self.series.len()
    }

    pub fn is_empty(&self) -> bool {
        self.series.is_empty()
    }

    /// Number of series holding at least one observation.
    pub fn usable_count(&self) -> usize {
        self.series.values().filter(|s| !s.is_empty()).count()
    }

    /// Whether any of `symbols` has at least one observation.
    pub fn has_data_for<'a>(&self, symbols: impl IntoIterator<Item = &'a str>) -> bool {
        symbols
            .into_iter()
            .any(|s| self.get(s).is_some_and(|series| !series.is_empty()))
    }
}

impl FromIterator<(Symbol, PriceSeries)> for SeriesTable {
    fn from_iter<I: IntoIterator<Item = (Symbol, PriceSeries)>>(iter: I) -> Self {
        Self {
            series: iter.into_iter().collect(),
        }
    }
}
