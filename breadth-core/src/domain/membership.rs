//! Membership catalog: industry classification and index constituents.
//!
//! The universe maps every symbol to at most one industry. Indices are
//! named symbol sets kept in configured order, so index-wise tables come out
//! in the order the indices were declared.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

use super::{IndexName, Industry, Symbol};

/// Constituents of one named index.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndexMembership {
    pub name: IndexName,
    pub symbols: BTreeSet<Symbol>,
}

impl IndexMembership {
    pub fn new(name: impl Into<IndexName>, symbols: impl IntoIterator<Item = Symbol>) -> Self {
        Self {
            name: name.into(),
            symbols: symbols.into_iter().collect(),
        }
    }

    pub fn contains(&self, symbol: &str) -> bool {
        self.symbols.contains(symbol)
    }
}

/// Symbol → industry mapping plus named index memberships.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MembershipCatalog {
    universe: BTreeMap<Symbol, Option<Industry>>,
    indices: Vec<IndexMembership>,
}

impl MembershipCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a universe symbol. Blank industries are stored as unresolved.
    pub fn add_symbol(&mut self, symbol: impl Into<Symbol>, industry: Option<Industry>) {
        let industry = industry
            .map(|i| i.trim().to_string())
            .filter(|i| !i.is_empty());
        self.universe.insert(symbol.into(), industry);
    }

    /// Add (or replace) a named index.
    pub fn add_index(&mut self, index: IndexMembership) {
        if let Some(existing) = self.indices.iter_mut().find(|i| i.name == index.name) {
            *existing = index;
        } else {
            self.indices.push(index);
        }
    }

    /// Industry of a universe symbol; `None` when unknown or unmapped.
    pub fn industry_of(&self, symbol: &str) -> Option<&str> {
        self.universe.get(symbol).and_then(|i| i.as_deref())
    }

    pub fn universe_symbols(&self) -> Vec<&str> {
        self.universe.keys().map(|s| s.as_str()).collect()
    }

    pub fn universe_len(&self) -> usize {
        self.universe.len()
    }

    pub fn in_universe(&self, symbol: &str) -> bool {
        self.universe.contains_key(symbol)
    }

    /// Count of universe symbols per industry (unmapped symbols excluded).
    pub fn industry_totals(&self) -> BTreeMap<&str, usize> {
        let mut totals = BTreeMap::new();
        for industry in self.universe.values().flatten() {
            *totals.entry(industry.as_str()).or_insert(0) += 1;
        }
        totals
    }

    pub fn indices(&self) -> &[IndexMembership] {
        &self.indices
    }

    pub fn index(&self, name: &str) -> Option<&IndexMembership> {
        self.indices.iter().find(|i| i.name == name)
    }

    pub fn index_names(&self) -> Vec<&str> {
        self.indices.iter().map(|i| i.name.as_str()).collect()
    }

    /// Union of universe symbols and every index constituent.
    pub fn all_symbols(&self) -> BTreeSet<&str> {
        self.universe
            .keys()
            .map(|s| s.as_str())
            .chain(
                self.indices
                    .iter()
                    .flat_map(|i| i.symbols.iter().map(|s| s.as_str())),
            )
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> MembershipCatalog {
        let mut c = MembershipCatalog::new();
        c.add_symbol("INFY", Some("Information Technology".into()));
        c.add_symbol("TCS", Some("Information Technology".into()));
        c.add_symbol("HDFCBANK", Some("Financial Services".into()));
        c.add_symbol("ORPHAN", Some("   ".into()));
        c.add_index(IndexMembership::new(
            "Nifty IT",
            ["INFY".to_string(), "TCS".to_string(), "LTIM".to_string()],
        ));
        c
    }

    #[test]
    fn blank_industry_is_unresolved() {
        let c = sample();
        assert_eq!(c.industry_of("ORPHAN"), None);
        assert!(c.in_universe("ORPHAN"));
        assert_eq!(c.industry_of("INFY"), Some("Information Technology"));
    }

    #[test]
    fn industry_totals_skip_unmapped() {
        let c = sample();
        let totals = c.industry_totals();
        assert_eq!(totals["Information Technology"], 2);
        assert_eq!(totals["Financial Services"], 1);
        assert_eq!(totals.values().sum::<usize>(), 3);
    }

    #[test]
    fn all_symbols_includes_index_only_members() {
        let c = sample();
        let all = c.all_symbols();
        assert!(all.contains("LTIM"));
        assert!(all.contains("HDFCBANK"));
        assert_eq!(all.len(), 5);
    }

    #[test]
    fn add_index_replaces_same_name_in_place() {
        let mut c = sample();
        c.add_index(IndexMembership::new("Nifty 50", ["TCS".to_string()]));
        c.add_index(IndexMembership::new("Nifty IT", ["INFY".to_string()]));
        assert_eq!(c.index_names(), vec!["Nifty IT", "Nifty 50"]);
        assert_eq!(c.index("Nifty IT").unwrap().symbols.len(), 1);
    }
}
