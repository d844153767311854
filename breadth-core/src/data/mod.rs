//! Data boundary: price providers and membership lists

pub mod membership;
pub mod provider;
pub mod yahoo;

pub use membership::{load_catalog, read_index_symbols, read_universe, MembershipError};
pub use provider::{DataError, DataSource, DownloadProgress, FetchResult, PriceProvider, StderrProgress};
pub use yahoo::YahooProvider;
