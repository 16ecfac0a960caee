//! Narrative Assembler - the analytics context block embedded in the LLM prompt

use crate::chart::PREVIEW_ROWS;
use crate::normalize::NormalizedRow;
use crate::outcome::ReportOutcome;
use itertools::Itertools;

/// Context for the prompt. Empty when no report was selected.
pub fn describe(outcome: Option<&ReportOutcome>) -> String {
    match outcome {
        None => String::new(),
        Some(ReportOutcome::Success {
            row_count,
            rows,
            totals,
            date_range,
        }) => {
            let totals_json = serde_json::to_string_pretty(totals).unwrap_or_else(|_| "{}".to_string());
            let top_results = rows
                .iter()
                .take(PREVIEW_ROWS)
                .enumerate()
                .map(|(index, row)| format!("{}. {}", index + 1, render_row(row)))
                .join("\n");

            format!(
                r#"

REAL GA4 DATA FROM YOUR DEALERSHIP:
Date Range: {} to {}
Total Rows: {}

Totals: {}

Top Results:
{}

Please analyze this ACTUAL data from the dealership's GA4 account."#,
                date_range.start_date, date_range.end_date, row_count, totals_json, top_results
            )
        }
        Some(ReportOutcome::Failure { error }) => format!(
            r#"

DATA FETCH ERROR: {}
Please provide analysis based on typical dealership patterns and suggest how to get this data."#,
            error
        ),
    }
}

fn render_row(row: &NormalizedRow) -> String {
    row.iter()
        .map(|(key, value)| format!("{}: {}", key, value))
        .join(", ")
}
