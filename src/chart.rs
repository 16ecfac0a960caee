//! Chart Projector - derives a renderable chart spec from normalized rows
//!
//! Axis selection looks only at the first preview row: the first non-numeric field
//! is the category axis, every other numeric field is a series. Later rows are
//! coerced cell by cell and may carry text under a series key when the data is sparse.

use crate::normalize::NormalizedRow;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Rows kept for charts and for the narrative preview
pub const PREVIEW_ROWS: usize = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChartKind {
    Line,
    Area,
    #[default]
    Bar,
    Pie,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChartSpec {
    pub rows: Vec<NormalizedRow>,
    pub x_key: String,
    pub y_keys: Vec<String>,
    pub chart_kind: ChartKind,
}

impl ChartSpec {
    /// False when the first row had no numeric field; renderers show no series then
    pub fn has_series(&self) -> bool {
        !self.y_keys.is_empty()
    }
}

pub fn project(rows: &[NormalizedRow]) -> Option<ChartSpec> {
    let preview: Vec<NormalizedRow> = rows
        .iter()
        .take(PREVIEW_ROWS)
        .map(|row| {
            row.iter()
                .map(|(key, value)| (key.clone(), value.coerced()))
                .collect()
        })
        .collect();

    let first = preview.first()?;

    let x_key = first
        .iter()
        .find(|(_, value)| !value.is_numeric())
        .or_else(|| first.first())
        .map(|(key, _)| key.clone())?;

    let y_keys: Vec<String> = first
        .iter()
        .filter(|(key, value)| value.is_numeric() && **key != x_key)
        .map(|(key, _)| key.clone())
        .collect();

    debug!("Chart projection: x={}, y={:?}, rows={}", x_key, y_keys, preview.len());

    Some(ChartSpec {
        rows: preview,
        x_key,
        y_keys,
        chart_kind: ChartKind::default(),
    })
}
