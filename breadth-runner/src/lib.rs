//! Breadth Runner: dashboard orchestration on top of `breadth-core`.
//!
//! This crate provides:
//! - TOML configuration (universe file, index lists, windows)
//! - Parallel price loading with synthetic fallback and dataset hashing
//! - Report assembly over one snapshot
//! - CSV/JSON export

pub mod config;
pub mod data_loader;
pub mod export;
pub mod report;

pub use config::{ConfigError, DashboardConfig, IndexSource};
pub use data_loader::{load_series, LoadError, LoadOptions, LoadedSeries};
pub use export::write_report;
pub use report::BreadthReport;
