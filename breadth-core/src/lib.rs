//! Breadth Core: domain types, indicators, breadth engine, data boundary.
//!
//! This crate contains the breadth analytics engine:
//! - Domain types (price points, series tables, membership catalog)
//! - Rolling indicators (SMA, trailing high)
//! - Advance/decline, moving-average participation, RS breakouts
//! - Industry and index cross-tabulation
//! - Price provider trait with a Yahoo Finance implementation
//! - Membership CSV readers
//!
//! The engine is synchronous and pure: every routine reads an immutable
//! snapshot and returns fresh tables.

pub mod breadth;
pub mod data;
pub mod domain;
pub mod indicators;

#[cfg(test)]
mod tests {
    use super::*;

    /// Compile-time check: snapshot and output types are Send + Sync, so
    /// independent reducers can share one snapshot across threads.
    #[allow(dead_code)]
    fn assert_send_sync() {
        fn require_send<T: Send>() {}
        fn require_sync<T: Sync>() {}

        require_send::<domain::SeriesTable>();
        require_sync::<domain::SeriesTable>();
        require_send::<domain::MembershipCatalog>();
        require_sync::<domain::MembershipCatalog>();
        require_send::<breadth::BreadthParams>();
        require_sync::<breadth::BreadthParams>();

        require_send::<breadth::AdvanceDeclineRow>();
        require_send::<breadth::BreadthRow>();
        require_send::<breadth::IndustryParticipation>();
        require_send::<breadth::BreakoutRow>();
        require_send::<breadth::BreakoutListing>();
        require_send::<breadth::IndustryBreakout>();
        require_send::<breadth::IndexBreadthRow>();
        require_send::<breadth::IndexBreakouts>();

        require_send::<data::YahooProvider>();
        require_sync::<data::YahooProvider>();
    }
}
