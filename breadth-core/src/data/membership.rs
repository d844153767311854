//! Membership list readers.
//!
//! Universe files carry `SYMBOL` and `INDUSTRY` columns; index files carry a
//! `SYMBOL` column. Header names are matched after trimming and
//! upper-casing, so `" Symbol "` and `symbol` both resolve. Extra columns
//! are ignored.

use std::io::Read;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::domain::{IndexMembership, Industry, MembershipCatalog, Symbol};

const SYMBOL_COLUMN: &str = "SYMBOL";
const INDUSTRY_COLUMN: &str = "INDUSTRY";

#[derive(Debug, Error)]
pub enum MembershipError {
    #[error("read membership file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("parse membership CSV: {0}")]
    Csv(#[from] csv::Error),

    #[error("membership list '{list}' has no {column} column")]
    MissingColumn { list: String, column: &'static str },
}

fn normalize_header(h: &str) -> String {
    h.trim().to_uppercase()
}

fn column_index(headers: &csv::StringRecord, column: &str) -> Option<usize> {
    headers.iter().position(|h| normalize_header(h) == column)
}

/// Read `(symbol, industry)` rows from a universe CSV.
///
/// Rows with a blank symbol are skipped; a blank industry is kept as `None`.
/// A missing `INDUSTRY` column leaves every industry unresolved.
pub fn read_universe<R: Read>(
    reader: R,
    list: &str,
) -> Result<Vec<(Symbol, Option<Industry>)>, MembershipError> {
    let mut rdr = csv::ReaderBuilder::new().flexible(true).from_reader(reader);
    let headers = rdr.headers()?.clone();
    let symbol_idx = column_index(&headers, SYMBOL_COLUMN).ok_or(MembershipError::MissingColumn {
        list: list.to_string(),
        column: SYMBOL_COLUMN,
    })?;
    let industry_idx = column_index(&headers, INDUSTRY_COLUMN);
    if industry_idx.is_none() {
        tracing::warn!(%list, "universe list has no INDUSTRY column");
    }

    let mut rows = Vec::new();
    for record in rdr.records() {
        let record = record?;
        let symbol = record.get(symbol_idx).unwrap_or("").trim();
        if symbol.is_empty() {
            continue;
        }
        let industry = industry_idx
            .and_then(|i| record.get(i))
            .map(str::trim)
            .filter(|i| !i.is_empty())
            .map(String::from);
        rows.push((symbol.to_string(), industry));
    }
    Ok(rows)
}

/// Read constituent symbols from an index CSV.
pub fn read_index_symbols<R: Read>(reader: R, list: &str) -> Result<Vec<Symbol>, MembershipError> {
    let mut rdr = csv::ReaderBuilder::new().flexible(true).from_reader(reader);
    let headers = rdr.headers()?.clone();
    let symbol_idx = column_index(&headers, SYMBOL_COLUMN).ok_or(MembershipError::MissingColumn {
        list: list.to_string(),
        column: SYMBOL_COLUMN,
    })?;

    let mut symbols = Vec::new();
    for record in rdr.records() {
        let record = record?;
        let symbol = record.get(symbol_idx).unwrap_or("").trim();
        if !symbol.is_empty() {
            symbols.push(symbol.to_string());
        }
    }
    Ok(symbols)
}

fn open(path: &Path) -> Result<std::fs::File, MembershipError> {
    std::fs::File::open(path).map_err(|source| MembershipError::Io {
        path: path.to_path_buf(),
        source,
    })
}

/// Build a catalog from a universe file and `(index name, file)` pairs.
///
/// The first row wins when a universe symbol repeats. Index order follows
/// `indices`.
pub fn load_catalog(
    universe_path: &Path,
    indices: &[(String, PathBuf)],
) -> Result<MembershipCatalog, MembershipError> {
    let mut catalog = MembershipCatalog::new();

    let universe = read_universe(open(universe_path)?, &universe_path.display().to_string())?;
    for (symbol, industry) in universe {
        if !catalog.in_universe(&symbol) {
            catalog.add_symbol(symbol, industry);
        }
    }

    for (name, path) in indices {
        let symbols = read_index_symbols(open(path)?, name)?;
        tracing::debug!(index = %name, constituents = symbols.len(), "loaded index list");
        catalog.add_index(IndexMembership::new(name.clone(), symbols));
    }

    tracing::info!(
        universe = catalog.universe_len(),
        indices = catalog.indices().len(),
        "loaded membership catalog"
    );
    Ok(catalog)
}
