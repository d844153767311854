//! Domain types for the breadth engine

pub mod membership;
pub mod price;

pub use membership::{IndexMembership, MembershipCatalog};
pub use price::{PricePoint, PriceSeries, SeriesTable};

/// Symbol type alias
pub type Symbol = String;

/// Industry (sector) name
pub type Industry = String;

/// Name of an index, e.g. "Nifty 50"
pub type IndexName = String;
