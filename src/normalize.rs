//! Row Normalizer - positional backend rows to flat, ordered field maps
//!
//! Every row produced for a template has the same keys in the same order:
//! the template's dimensions, then its metrics.

use crate::backend::result::{RawReportResult, RawRow};
use crate::template::ReportTemplate;
use indexmap::IndexMap;
use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::Number;
use std::fmt;

lazy_static! {
    // Plain decimal literal: no whitespace, sign only as leading minus, no hex/inf/NaN.
    static ref NUMERIC_LITERAL: Regex =
        Regex::new(r"^-?(\d+\.?\d*|\.\d+)([eE][+-]?\d+)?$").unwrap();
    static ref INTEGER_LITERAL: Regex = Regex::new(r"^-?\d+$").unwrap();
}

/// A normalized cell: text, or a number when the source text was unambiguously numeric
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    Number(Number),
    Text(String),
}

impl FieldValue {
    pub fn text(value: impl Into<String>) -> Self {
        FieldValue::Text(value.into())
    }

    /// Number when `raw` is a complete numeric literal, text otherwise
    pub fn coerce(raw: &str) -> Self {
        match parse_numeric(raw) {
            Some(number) => FieldValue::Number(number),
            None => FieldValue::Text(raw.to_string()),
        }
    }

    /// Re-apply coercion to an existing value (text cells that look numeric become numbers)
    pub fn coerced(&self) -> Self {
        match self {
            FieldValue::Text(raw) => FieldValue::coerce(raw),
            number => number.clone(),
        }
    }

    pub fn is_numeric(&self) -> bool {
        matches!(self, FieldValue::Number(_))
    }
}

impl From<i64> for FieldValue {
    fn from(value: i64) -> Self {
        FieldValue::Number(Number::from(value))
    }
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        FieldValue::text(value)
    }
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldValue::Number(number) => write!(f, "{}", number),
            FieldValue::Text(text) => f.write_str(text),
        }
    }
}

/// Parse a numeric literal. Integers stay integers so they print without a fraction.
pub fn parse_numeric(raw: &str) -> Option<Number> {
    if !NUMERIC_LITERAL.is_match(raw) {
        return None;
    }
    if INTEGER_LITERAL.is_match(raw) {
        if let Ok(int) = raw.parse::<i64>() {
            return Some(Number::from(int));
        }
    }
    raw.parse::<f64>().ok().and_then(Number::from_f64)
}

pub type NormalizedRow = IndexMap<String, FieldValue>;

/// Same key domain as a row, restricted to metric names
pub type NormalizedTotals = IndexMap<String, FieldValue>;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NormalizedReport {
    pub rows: Vec<NormalizedRow>,
    pub totals: NormalizedTotals,
    pub row_count: u64,
}

pub fn normalize(raw: RawReportResult, template: &ReportTemplate) -> NormalizedReport {
    let rows = raw
        .rows
        .into_iter()
        .map(|row| normalize_row(row, template))
        .collect();

    let totals = raw
        .totals
        .map(|row| metric_fields(row.metric_values, template).collect())
        .unwrap_or_default();

    NormalizedReport {
        rows,
        totals,
        row_count: raw.row_count.unwrap_or(0),
    }
}

fn normalize_row(row: RawRow, template: &ReportTemplate) -> NormalizedRow {
    let mut dimension_values = row.dimension_values.into_iter();
    let dimensions = template.dimensions.iter().map(move |name| {
        let value = dimension_values.next().flatten().unwrap_or_default();
        (name.clone(), FieldValue::Text(value))
    });

    dimensions.chain(metric_fields(row.metric_values, template)).collect()
}

fn metric_fields(
    values: Vec<Option<String>>,
    template: &ReportTemplate,
) -> impl Iterator<Item = (String, FieldValue)> + '_ {
    let mut values = values.into_iter();
    template.metrics.iter().map(move |name| {
        let value = values.next().flatten().unwrap_or_default();
        (name.clone(), FieldValue::coerce(&value))
    })
}
