//! Report templates - the fixed report shapes the assistant knows how to run

use serde::{Deserialize, Serialize};

/// Row limit used when a template does not ask for a specific one
pub const DEFAULT_ROW_LIMIT: u32 = 100;

/// Date range expressed in the backend's own tokens ("7daysAgo", "yesterday", "2024-01-31").
/// Tokens are passed through untouched.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DateRange {
    pub start_date: String,
    pub end_date: String,
}

impl DateRange {
    pub fn new(start_date: impl Into<String>, end_date: impl Into<String>) -> Self {
        Self {
            start_date: start_date.into(),
            end_date: end_date.into(),
        }
    }

    /// `N daysAgo` through yesterday
    pub fn days_ago_to_yesterday(days: u32) -> Self {
        Self::new(format!("{}daysAgo", days), "yesterday")
    }
}

/// Immutable description of one report: which dimensions and metrics, over which dates, how many rows.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportTemplate {
    pub dimensions: Vec<String>,
    pub metrics: Vec<String>,
    pub date_range: DateRange,
    pub limit: u32,
}

impl ReportTemplate {
    pub fn new(dimensions: &[&str], metrics: &[&str], date_range: DateRange) -> Self {
        Self {
            dimensions: dimensions.iter().map(|d| d.to_string()).collect(),
            metrics: metrics.iter().map(|m| m.to_string()).collect(),
            date_range,
            limit: DEFAULT_ROW_LIMIT,
        }
    }

    pub fn with_limit(mut self, limit: u32) -> Self {
        self.limit = limit;
        self
    }

    /// Dimension names followed by metric names, the key order of every normalized row
    pub fn field_names(&self) -> impl Iterator<Item = &str> {
        self.dimensions
            .iter()
            .chain(self.metrics.iter())
            .map(String::as_str)
    }
}
