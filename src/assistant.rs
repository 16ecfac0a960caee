//! Analytics Assistant - end-to-end handling of one chat message
//!
//! message -> intent routing -> report backend -> normalization -> chart + narrative -> LLM
//!
//! Backend failures become a `ReportOutcome::Failure` so an answer is still produced;
//! only validation, generation and malformed-payload errors leave this module.

use crate::backend::engine::ReportBackend;
use crate::chart::{self, ChartSpec};
use crate::error::{AnalyticsError, Result};
use crate::intent::IntentRouter;
use crate::llm::CompletionClient;
use crate::narrative;
use crate::normalize::normalize;
use crate::outcome::ReportOutcome;
use crate::prompts;
use crate::template::ReportTemplate;
use serde::Serialize;
use std::sync::Arc;
use tracing::{info, warn};

pub const MESSAGE_REQUIRED: &str = "Message is required";

/// Response returned to the caller
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AssistantResponse {
    /// Generated answer text, relayed verbatim
    pub response: String,

    /// Present only when a report ran successfully and returned rows
    pub chart_data: Option<ChartSpec>,

    /// Name of the report template that was selected
    #[serde(skip_serializing_if = "Option::is_none")]
    pub report: Option<String>,
}

/// Everything the pipeline derived before the LLM call
#[derive(Debug, Clone)]
pub struct PreparedAnswer {
    pub report: Option<String>,
    pub outcome: Option<ReportOutcome>,
    pub chart: Option<ChartSpec>,
    pub data_context: String,
    pub prompt: String,
}

pub struct AnalyticsAssistant {
    router: IntentRouter,
    backend: Arc<dyn ReportBackend>,
    llm: Arc<dyn CompletionClient>,
}

impl AnalyticsAssistant {
    pub fn new(router: IntentRouter, backend: Arc<dyn ReportBackend>, llm: Arc<dyn CompletionClient>) -> Self {
        Self { router, backend, llm }
    }

    pub async fn answer(&self, message: &str) -> Result<AssistantResponse> {
        let prepared = self.prepare(message).await?;
        self.generate(prepared).await
    }

    /// Hand a prepared prompt to the LLM
    pub async fn generate(&self, prepared: PreparedAnswer) -> Result<AssistantResponse> {
        let response = self.llm.complete(&prepared.prompt).await?;

        Ok(AssistantResponse {
            response,
            chart_data: prepared.chart,
            report: prepared.report,
        })
    }

    /// Run everything up to (not including) the LLM call
    pub async fn prepare(&self, message: &str) -> Result<PreparedAnswer> {
        if message.trim().is_empty() {
            return Err(AnalyticsError::Validation(MESSAGE_REQUIRED.to_string()));
        }

        let (report, outcome) = match self.router.route(message) {
            Some(rule) => {
                info!("🧭 Selected report '{}'", rule.name);
                let outcome = self.run_report(&rule.template).await?;
                (Some(rule.name.clone()), Some(outcome))
            }
            None => {
                info!("🧭 No report matches - answering without analytics data");
                (None, None)
            }
        };

        let chart = outcome.as_ref().and_then(ReportOutcome::rows).and_then(chart::project);
        let data_context = narrative::describe(outcome.as_ref());
        let prompt = prompts::analysis_prompt(&data_context, message);

        Ok(PreparedAnswer {
            report,
            outcome,
            chart,
            data_context,
            prompt,
        })
    }

    /// Backend errors are folded into the outcome; anything else propagates
    pub async fn run_report(&self, template: &ReportTemplate) -> Result<ReportOutcome> {
        match self.backend.run_report(template).await {
            Ok(raw) => {
                let report = normalize(raw, template);
                info!(
                    "✅ {} report: {} rows returned, rowCount={}",
                    self.backend.name(),
                    report.rows.len(),
                    report.row_count
                );
                Ok(ReportOutcome::success(report, template.date_range.clone()))
            }
            Err(AnalyticsError::Backend(message)) => {
                warn!("⚠️  {} report failed: {}", self.backend.name(), message);
                Ok(ReportOutcome::failure(message))
            }
            Err(e) => Err(e),
        }
    }
}
