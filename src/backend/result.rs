//! Raw Report Result - positional tabular data as returned by a backend

use serde::{Deserialize, Serialize};

/// One backend row. Values line up with the template's dimension and metric order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawRow {
    #[serde(default)]
    pub dimension_values: Vec<Option<String>>,
    #[serde(default)]
    pub metric_values: Vec<Option<String>>,
}

impl RawRow {
    pub fn new(dimension_values: &[&str], metric_values: &[&str]) -> Self {
        Self {
            dimension_values: dimension_values.iter().map(|v| Some(v.to_string())).collect(),
            metric_values: metric_values.iter().map(|v| Some(v.to_string())).collect(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawReportResult {
    #[serde(default)]
    pub rows: Vec<RawRow>,

    /// Aggregate row, when the backend computed one
    #[serde(default)]
    pub totals: Option<RawRow>,

    /// Total matching rows as reported by the backend (may exceed `rows.len()`)
    #[serde(default)]
    pub row_count: Option<u64>,
}
