//! Price provider trait and structured error types.
//!
//! The PriceProvider trait abstracts over price sources (Yahoo Finance,
//! synthetic data in tests) so the loader can swap implementations.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::PriceSeries;

/// Structured error types for data operations.
///
/// These are designed to be displayable in CLI output and logs.
#[derive(Debug, Error)]
pub enum DataError {
    #[error("network unreachable: {0}")]
    NetworkUnreachable(String),

    #[error("rate limited by provider")]
    RateLimited,

    #[error("response format changed: {0}")]
    ResponseFormatChanged(String),

    #[error("symbol not found: {symbol}")]
    SymbolNotFound { symbol: String },

    #[error("provider returned HTTP {status} for {symbol}")]
    Http { symbol: String, status: u16 },

    #[error("data error: {0}")]
    Other(String),
}

/// Result of a successful fetch for a single symbol.
#[derive(Debug, Clone)]
pub struct FetchResult {
    pub symbol: String,
    pub series: PriceSeries,
    pub source: DataSource,
}

/// Where the data came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DataSource {
    YahooFinance,
    Synthetic,
}

/// Trait for price providers.
///
/// Implementations fetch daily closes for one provider ticker. One attempt
/// per call; failures are reported, never retried here.
pub trait PriceProvider: Send + Sync {
    /// Human-readable name of this provider.
    fn name(&self) -> &str;

    /// Fetch daily closes for a ticker over a date range.
    fn fetch(&self, ticker: &str, start: NaiveDate, end: NaiveDate)
        -> Result<FetchResult, DataError>;
}

/// Progress callback for multi-symbol operations.
pub trait DownloadProgress: Send + Sync {
    /// Called when a symbol fetch completes.
    fn on_complete(&self, symbol: &str, done: usize, total: usize, result: &Result<(), DataError>);

    /// Called when the entire batch is done.
    fn on_batch_complete(&self, succeeded: usize, failed: usize, total: usize);
}

/// Simple progress reporter that prints to stderr.
pub struct StderrProgress;

impl DownloadProgress for StderrProgress {
    fn on_complete(&self, symbol: &str, done: usize, total: usize, result: &Result<(), DataError>) {
        match result {
            Ok(()) => eprintln!("[{done}/{total}] OK: {symbol}"),
            Err(e) => eprintln!("[{done}/{total}] FAIL: {symbol}: {e}"),
        }
    }

    fn on_batch_complete(&self, succeeded: usize, failed: usize, total: usize) {
        eprintln!("Fetch complete: {succeeded}/{total} succeeded, {failed} failed");
    }
}
