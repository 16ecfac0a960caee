//! Fixture backend - serves a recorded `RawReportResult` from a JSON file

use crate::backend::engine::ReportBackend;
use crate::backend::result::RawReportResult;
use crate::error::{AnalyticsError, Result};
use crate::template::ReportTemplate;
use async_trait::async_trait;
use std::path::PathBuf;
use tracing::info;

pub struct FixtureBackend {
    path: PathBuf,
}

impl FixtureBackend {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl ReportBackend for FixtureBackend {
    fn name(&self) -> &'static str {
        "fixture"
    }

    async fn run_report(&self, template: &ReportTemplate) -> Result<RawReportResult> {
        info!("📁 Serving {:?} report from {}", template.dimensions, self.path.display());
        let content = tokio::fs::read_to_string(&self.path).await.map_err(|e| {
            AnalyticsError::Backend(format!("Failed to read fixture {}: {}", self.path.display(), e))
        })?;
        serde_json::from_str(&content)
            .map_err(|e| AnalyticsError::MalformedPayload(format!("fixture {}: {}", self.path.display(), e)))
    }
}
