//! Price loading for the dashboard.
//!
//! Given catalog symbols, fetches close histories and returns a
//! `SeriesTable` keyed by catalog symbol. Fallback policy per symbol:
//! 1. If online and a provider is available → fetch `{symbol}{suffix}`
//! 2. If that fails (or offline) and `synthetic` → deterministic random walk (tagged)
//! 3. Otherwise → skip the symbol (it behaves like one with no history)
//!
//! Only a load in which *no* symbol produced data is an error.

use breadth_core::data::{DataError, DataSource, DownloadProgress, PriceProvider};
use breadth_core::domain::{PricePoint, PriceSeries, SeriesTable};
use chrono::{Datelike, Duration, NaiveDate};
use rayon::prelude::*;
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use thiserror::Error;

/// Errors from the data loading layer.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error(
        "no price data for any of {requested} symbols (every fetch failed; use --synthetic for synthetic data)"
    )]
    NoData { requested: usize },
}

/// Options controlling how series are loaded.
#[derive(Debug, Clone)]
pub struct LoadOptions {
    /// First calendar day to request.
    pub start: NaiveDate,
    /// Last calendar day to request.
    pub end: NaiveDate,
    /// Appended to each symbol to form the provider ticker.
    pub symbol_suffix: String,
    /// If true, never make network requests.
    pub offline: bool,
    /// If true, generate synthetic series when real data is unavailable.
    pub synthetic: bool,
}

impl LoadOptions {
    /// Options covering `lookback_days` calendar days ending at `as_of`.
    pub fn lookback(as_of: NaiveDate, lookback_days: u32, symbol_suffix: impl Into<String>) -> Self {
        Self {
            start: as_of - Duration::days(i64::from(lookback_days)),
            end: as_of,
            symbol_suffix: symbol_suffix.into(),
            offline: false,
            synthetic: false,
        }
    }
}

/// Result of loading series, including provenance.
#[derive(Debug)]
pub struct LoadedSeries {
    pub table: SeriesTable,
    /// Data source per loaded symbol.
    pub sources: BTreeMap<String, DataSource>,
    /// Symbols that produced no data, with the reason.
    pub failures: Vec<(String, String)>,
    /// BLAKE3 over symbols, dates and closes.
    pub dataset_hash: String,
    pub has_synthetic: bool,
}

enum Outcome {
    Loaded(PriceSeries, DataSource),
    Failed(String),
}

/// Load close histories for `symbols`, fetching in parallel.
pub fn load_series(
    symbols: &[&str],
    provider: Option<&dyn PriceProvider>,
    progress: Option<&dyn DownloadProgress>,
    opts: &LoadOptions,
) -> Result<LoadedSeries, LoadError> {
    let total = symbols.len();
    let done = AtomicUsize::new(0);

    let outcomes: Vec<(&str, Outcome)> = symbols
        .par_iter()
        .map(|&symbol| {
            let outcome = load_one(symbol, provider, opts);
            let n = done.fetch_add(1, Ordering::Relaxed) + 1;
            if let Some(p) = progress {
                let status = match &outcome {
                    Outcome::Loaded(..) => Ok(()),
                    Outcome::Failed(reason) => Err(DataError::Other(reason.clone())),
                };
                p.on_complete(symbol, n, total, &status);
            }
            (symbol, outcome)
        })
        .collect();

    let mut table = SeriesTable::new();
    let mut sources = BTreeMap::new();
    let mut failures = Vec::new();
    let mut has_synthetic = false;

    for (symbol, outcome) in outcomes {
        match outcome {
            Outcome::Loaded(series, source) => {
                has_synthetic |= source == DataSource::Synthetic;
                sources.insert(symbol.to_string(), source);
                table.insert(symbol, series);
            }
            Outcome::Failed(reason) => failures.push((symbol.to_string(), reason)),
        }
    }

    if let Some(p) = progress {
        p.on_batch_complete(sources.len(), failures.len(), total);
    }
    tracing::info!(
        requested = total,
        loaded = sources.len(),
        failed = failures.len(),
        synthetic = has_synthetic,
        "loaded price series"
    );

    if table.usable_count() == 0 {
        return Err(LoadError::NoData { requested: total });
    }

    let dataset_hash = compute_dataset_hash(&table);
    Ok(LoadedSeries {
        table,
        sources,
        failures,
        dataset_hash,
        has_synthetic,
    })
}

fn load_one(symbol: &str, provider: Option<&dyn PriceProvider>, opts: &LoadOptions) -> Outcome {
    let mut reason = String::from("offline");

    if !opts.offline {
        if let Some(prov) = provider {
            let ticker = format!("{symbol}{}", opts.symbol_suffix);
            match prov.fetch(&ticker, opts.start, opts.end) {
                Ok(fetched) if !fetched.series.is_empty() => {
                    return Outcome::Loaded(fetched.series, fetched.source);
                }
                Ok(_) => reason = format!("{} returned no closes for {ticker}", prov.name()),
                Err(e) => {
                    tracing::warn!(%ticker, error = %e, "fetch failed");
                    reason = e.to_string();
                }
            }
        } else {
            reason = String::from("no provider configured");
        }
    }

    if opts.synthetic {
        tracing::warn!(%symbol, "using synthetic series; results will be tagged as synthetic");
        return Outcome::Loaded(
            generate_synthetic_series(symbol, opts.start, opts.end),
            DataSource::Synthetic,
        );
    }

    tracing::debug!(%symbol, %reason, "skipping symbol without data");
    Outcome::Failed(reason)
}

/// Compute a deterministic BLAKE3 hash over all series.
///
/// `SeriesTable` iterates in symbol order, so the hash is stable.
pub fn compute_dataset_hash(table: &SeriesTable) -> String {
    let mut hasher = blake3::Hasher::new();
    for (symbol, series) in table.iter() {
        hasher.update(symbol.as_bytes());
        for point in series.points() {
            hasher.update(point.date.to_string().as_bytes());
            hasher.update(&point.close.to_le_bytes());
        }
    }
    hasher.finalize().to_hex().to_string()
}

/// Generate a synthetic weekday series for offline development.
///
/// A random walk from 100.0, seeded by the symbol name.
pub fn generate_synthetic_series(symbol: &str, start: NaiveDate, end: NaiveDate) -> PriceSeries {
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    let seed: [u8; 32] = *blake3::hash(symbol.as_bytes()).as_bytes();
    let mut rng = StdRng::from_seed(seed);

    let mut points = Vec::new();
    let mut price = 100.0_f64;
    let mut current = start;

    while current <= end {
        if !matches!(current.weekday(), chrono::Weekday::Sat | chrono::Weekday::Sun) {
            let daily_return: f64 = rng.gen_range(-0.03..0.03);
            price *= 1.0 + daily_return;
            points.push(PricePoint::new(current, price));
        }
        current += Duration::days(1);
    }

    PriceSeries::from_points(points)
}
