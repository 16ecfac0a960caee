//! GA4 Data API backend
//!
//! Runs templates through the `properties/{id}:runReport` REST method and turns the
//! response into a `RawReportResult`. One HTTP attempt per report, no retries.

use crate::backend::engine::ReportBackend;
use crate::backend::result::{RawReportResult, RawRow};
use crate::config::AnalyticsConfig;
use crate::error::{AnalyticsError, Result};
use crate::template::ReportTemplate;
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

pub struct Ga4Client {
    config: AnalyticsConfig,
    http: Client,
}

#[derive(Debug, Serialize)]
struct NamedField<'a> {
    name: &'a str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct WireDateRange<'a> {
    start_date: &'a str,
    end_date: &'a str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct RunReportRequest<'a> {
    dimensions: Vec<NamedField<'a>>,
    metrics: Vec<NamedField<'a>>,
    date_ranges: Vec<WireDateRange<'a>>,
    limit: u32,
    metric_aggregations: Vec<&'static str>,
}

impl<'a> RunReportRequest<'a> {
    fn from_template(template: &'a ReportTemplate) -> Self {
        Self {
            dimensions: template.dimensions.iter().map(|name| NamedField { name }).collect(),
            metrics: template.metrics.iter().map(|name| NamedField { name }).collect(),
            date_ranges: vec![WireDateRange {
                start_date: &template.date_range.start_date,
                end_date: &template.date_range.end_date,
            }],
            limit: template.limit,
            metric_aggregations: vec!["TOTAL"],
        }
    }
}

// GA4 omits empty repeated fields and zero counts, hence the defaults.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RunReportResponse {
    #[serde(default)]
    rows: Vec<Ga4Row>,
    #[serde(default)]
    totals: Vec<Ga4Row>,
    #[serde(default)]
    row_count: Option<u64>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Ga4Row {
    #[serde(default)]
    dimension_values: Vec<Ga4Value>,
    #[serde(default)]
    metric_values: Vec<Ga4Value>,
}

#[derive(Debug, Deserialize)]
struct Ga4Value {
    #[serde(default)]
    value: Option<String>,
}

#[derive(Debug, Deserialize)]
struct Ga4ErrorEnvelope {
    error: Ga4Error,
}

#[derive(Debug, Deserialize)]
struct Ga4Error {
    message: String,
    #[serde(default)]
    status: Option<String>,
}

impl From<Ga4Row> for RawRow {
    fn from(row: Ga4Row) -> Self {
        Self {
            dimension_values: row.dimension_values.into_iter().map(|v| v.value).collect(),
            metric_values: row.metric_values.into_iter().map(|v| v.value).collect(),
        }
    }
}

impl From<RunReportResponse> for RawReportResult {
    fn from(response: RunReportResponse) -> Self {
        Self {
            rows: response.rows.into_iter().map(RawRow::from).collect(),
            totals: response.totals.into_iter().next().map(RawRow::from),
            row_count: response.row_count,
        }
    }
}

impl Ga4Client {
    pub fn new(config: AnalyticsConfig) -> Result<Self> {
        let http = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| AnalyticsError::Config(format!("Failed to create HTTP client for GA4: {}", e)))?;
        Ok(Self { config, http })
    }

    fn report_url(&self) -> String {
        format!(
            "{}/properties/{}:runReport",
            self.config.api_base_url.trim_end_matches('/'),
            self.config.property_id
        )
    }
}

#[async_trait]
impl ReportBackend for Ga4Client {
    fn name(&self) -> &'static str {
        "ga4"
    }

    async fn run_report(&self, template: &ReportTemplate) -> Result<RawReportResult> {
        let token = self.config.credentials.bearer_token(&self.http).await?;
        let request = RunReportRequest::from_template(template);

        info!(
            "📊 Running GA4 report: dimensions={:?}, metrics={:?}, range={}..{}, limit={}",
            template.dimensions,
            template.metrics,
            template.date_range.start_date,
            template.date_range.end_date,
            template.limit
        );

        let response = self
            .http
            .post(self.report_url())
            .bearer_auth(token)
            .json(&request)
            .send()
            .await
            .map_err(|e| self.transport_error(e))?;

        let status = response.status();
        let text = response.text().await.map_err(|e| self.transport_error(e))?;
        if !status.is_success() {
            return Err(AnalyticsError::Backend(error_message(status, &text)));
        }

        let body: RunReportResponse = serde_json::from_str(&text)
            .map_err(|e| AnalyticsError::MalformedPayload(format!("GA4 runReport response: {}", e)))?;
        debug!("GA4 returned {} rows (rowCount={:?})", body.rows.len(), body.row_count);

        Ok(body.into())
    }
}

impl Ga4Client {
    fn transport_error(&self, err: reqwest::Error) -> AnalyticsError {
        if err.is_timeout() {
            AnalyticsError::Backend(format!(
                "GA4 request timed out after {}s",
                self.config.timeout.as_secs()
            ))
        } else {
            AnalyticsError::Backend(format!("GA4 request failed: {}", err))
        }
    }
}

/// Backend message from a GA4 error body, or the raw body when it is not the usual envelope
fn error_message(status: StatusCode, body: &str) -> String {
    match serde_json::from_str::<Ga4ErrorEnvelope>(body) {
        Ok(envelope) => match envelope.error.status {
            Some(code) => format!("{} ({})", envelope.error.message, code),
            None => envelope.error.message,
        },
        Err(_) if body.trim().is_empty() => format!("GA4 request failed with status {}", status),
        Err(_) => format!("GA4 request failed with status {}: {}", status, body.trim()),
    }
}
