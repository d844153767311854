//! Shared fixtures for breadth integration tests.

#![allow(dead_code)]

use breadth_core::domain::{PriceSeries, SeriesTable};
use chrono::{Datelike, Duration, NaiveDate, Weekday};

/// Weekday-only dates ending on `end` (inclusive), oldest first.
pub fn trading_days(end: NaiveDate, count: usize) -> Vec<NaiveDate> {
    let mut days = Vec::with_capacity(count);
    let mut day = end;
    while days.len() < count {
        if !matches!(day.weekday(), Weekday::Sat | Weekday::Sun) {
            days.push(day);
        }
        day -= Duration::days(1);
    }
    days.reverse();
    days
}

/// Series with `closes` laid on consecutive trading days ending at `end`.
pub fn series_ending(end: NaiveDate, closes: &[f64]) -> PriceSeries {
    let days = trading_days(end, closes.len());
    PriceSeries::from_pairs(days.into_iter().zip(closes.iter().copied()))
}

/// `n` flat closes at `base` with the final close replaced by `last`.
pub fn flat_then(n: usize, base: f64, last: f64) -> Vec<f64> {
    let mut closes = vec![base; n];
    if let Some(c) = closes.last_mut() {
        *c = last;
    }
    closes
}

pub fn table(entries: &[(&str, PriceSeries)]) -> SeriesTable {
    entries
        .iter()
        .map(|(s, p)| (s.to_string(), p.clone()))
        .collect()
}

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}
