//! Report backend trait - the contract every analytics backend implements

use crate::backend::result::RawReportResult;
use crate::error::Result;
use crate::template::ReportTemplate;
use async_trait::async_trait;

#[async_trait]
pub trait ReportBackend: Send + Sync {
    /// Backend name (e.g., "ga4", "fixture")
    fn name(&self) -> &'static str;

    /// Run one report. Single attempt; every failure is reported as
    /// `AnalyticsError::Backend` except a success body that cannot be decoded,
    /// which is `AnalyticsError::MalformedPayload`.
    async fn run_report(&self, template: &ReportTemplate) -> Result<RawReportResult>;
}
