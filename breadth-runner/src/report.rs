//! Report assembly: runs every breadth section over one snapshot.

use std::time::Instant;

use breadth_core::breadth::{
    advance_decline, breakout_listings, detect_breakouts, index_breadth, index_breakouts,
    industry_breakouts, industry_participation, participation_rows, unique_industries,
    AdvanceDeclineRow, BreadthError, BreadthParams, BreadthRow, BreakoutListing,
    IndexBreadthRow, IndexBreakouts, IndustryBreakout, IndustryParticipation,
};
use breadth_core::domain::{MembershipCatalog, SeriesTable};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Every dashboard table for one as-of date.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BreadthReport {
    pub as_of: NaiveDate,
    pub advance_decline: Vec<AdvanceDeclineRow>,
    pub breadth_rows: Vec<BreadthRow>,
    pub industry_participation: Vec<IndustryParticipation>,
    /// Universe breakouts joined to industry, by change descending.
    pub breakouts: Vec<BreakoutListing>,
    pub unique_breakout_industries: usize,
    pub industry_breakouts: Vec<IndustryBreakout>,
    pub index_breadth: Vec<IndexBreadthRow>,
}

impl BreadthReport {
    /// Compute the full report.
    ///
    /// The universe sections and the breakout scan run concurrently; index
    /// breadth then cross-references the universe breakouts.
    pub fn compute(
        catalog: &MembershipCatalog,
        table: &SeriesTable,
        as_of: NaiveDate,
        params: &BreadthParams,
    ) -> Result<Self, BreadthError> {
        params.validate()?;
        if catalog.universe_len() == 0 {
            return Err(BreadthError::NoMembershipData);
        }
        let universe = catalog.universe_symbols();
        if !table.has_data_for(universe.iter().copied()) {
            return Err(BreadthError::NoPriceData);
        }

        let start = Instant::now();

        let ((advance_decline, breadth_rows), breakout_rows) = rayon::join(
            || {
                rayon::join(
                    || advance_decline(table, &universe, as_of, params),
                    || participation_rows(table, &universe, params),
                )
            },
            || detect_breakouts(table, &universe, params),
        );

        let industry_participation = industry_participation(&breadth_rows, catalog);
        let breakouts = breakout_listings(&breakout_rows, catalog);
        let unique_breakout_industries = unique_industries(&breakouts);
        let industry_breakouts = industry_breakouts(&breakouts, catalog);
        let index_breadth = index_breadth(table, catalog, &breakout_rows, params);

        tracing::info!(
            %as_of,
            universe = universe.len(),
            eligible = breadth_rows.len(),
            breakouts = breakouts.len(),
            indices = index_breadth.len(),
            elapsed_ms = start.elapsed().as_millis() as u64,
            "computed breadth report"
        );

        Ok(Self {
            as_of,
            advance_decline,
            breadth_rows,
            industry_participation,
            breakouts,
            unique_breakout_industries,
            industry_breakouts,
            index_breadth,
        })
    }

    /// Breakouts restricted to one index.
    pub fn index_breakouts(
        &self,
        catalog: &MembershipCatalog,
        index_name: &str,
    ) -> Result<IndexBreakouts, BreadthError> {
        index_breakouts(&self.breakouts, catalog, index_name)
    }

    /// Latest advance/decline row, if any.
    pub fn latest_advance_decline(&self) -> Option<&AdvanceDeclineRow> {
        self.advance_decline.last()
    }
}
