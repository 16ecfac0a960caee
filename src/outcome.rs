//! Report Outcome - the single result threaded through chart projection and narrative

use crate::normalize::{NormalizedReport, NormalizedRow, NormalizedTotals};
use crate::template::DateRange;
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ReportOutcome {
    #[serde(rename_all = "camelCase")]
    Success {
        row_count: u64,
        rows: Vec<NormalizedRow>,
        totals: NormalizedTotals,
        date_range: DateRange,
    },
    Failure { error: String },
}

impl ReportOutcome {
    pub fn success(report: NormalizedReport, date_range: DateRange) -> Self {
        ReportOutcome::Success {
            row_count: report.row_count,
            rows: report.rows,
            totals: report.totals,
            date_range,
        }
    }

    pub fn failure(error: impl Into<String>) -> Self {
        ReportOutcome::Failure { error: error.into() }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, ReportOutcome::Success { .. })
    }

    /// Rows of a successful report; `None` for a failure
    pub fn rows(&self) -> Option<&[NormalizedRow]> {
        match self {
            ReportOutcome::Success { rows, .. } => Some(rows),
            ReportOutcome::Failure { .. } => None,
        }
    }
}
