mod common;

use common::{assistant, FakeBackend, FakeLlm, Script};
use dealer_insights::backend::{FixtureBackend, RawReportResult, RawRow};
use dealer_insights::error::AnalyticsError;
use dealer_insights::intent::IntentRouter;
use dealer_insights::normalize::FieldValue;
use dealer_insights::outcome::ReportOutcome;
use dealer_insights::AnalyticsAssistant;
use pretty_assertions::assert_eq;
use std::sync::Arc;

fn miami_report() -> RawReportResult {
    RawReportResult {
        rows: vec![RawRow::new(&["Miami"], &["120", "85"])],
        totals: Some(RawRow::new(&["RESERVED_TOTAL"], &["120", "85"])),
        row_count: Some(1),
    }
}

#[tokio::test]
async fn test_city_question_produces_chart_and_data_prompt() {
    let backend = FakeBackend::new(Script::Report(miami_report()));
    let llm = FakeLlm::answering();

    let answer = assistant(backend.clone(), llm.clone())
        .answer("Show me active users by city")
        .await
        .unwrap();

    assert_eq!(answer.response, "## Key Findings\nTraffic is healthy.");
    assert_eq!(answer.report.as_deref(), Some("traffic_by_city"));

    let chart = answer.chart_data.expect("chart for a data-bearing answer");
    assert_eq!(chart.x_key, "city");
    assert_eq!(chart.y_keys, vec!["activeUsers", "sessions"]);
    assert_eq!(chart.rows[0]["city"], FieldValue::text("Miami"));
    assert_eq!(chart.rows[0]["activeUsers"], FieldValue::from(120i64));
    assert_eq!(chart.rows[0]["sessions"], FieldValue::from(85i64));

    let template = backend.last_template().unwrap();
    assert_eq!(template.dimensions, vec!["city"]);
    assert_eq!(template.limit, 20);

    let prompt = llm.last_prompt();
    assert!(prompt.contains("Total Rows: 1"));
    assert!(prompt.contains("1. city: Miami, activeUsers: 120, sessions: 85"));
    assert!(prompt.contains("User question: Show me active users by city"));
}

#[tokio::test]
async fn test_backend_auth_failure_still_answers_without_chart() {
    let backend = FakeBackend::new(Script::BackendError(
        "Request had invalid authentication credentials.".to_string(),
    ));
    let llm = FakeLlm::answering();
    let assistant = assistant(backend.clone(), llm.clone());

    let prepared = assistant.prepare("traffic last week").await.unwrap();
    assert_eq!(
        prepared.outcome,
        Some(ReportOutcome::failure("Request had invalid authentication credentials."))
    );
    assert!(prepared.chart.is_none());
    assert!(prepared
        .data_context
        .contains("DATA FETCH ERROR: Request had invalid authentication credentials."));
    assert!(!prepared.data_context.contains("Top Results"));

    let answer = assistant.answer("traffic last week").await.unwrap();
    assert!(answer.chart_data.is_none());
    assert!(!answer.response.is_empty());
    assert!(llm.last_prompt().contains("DATA FETCH ERROR"));
}

#[tokio::test]
async fn test_empty_message_rejected_before_backend() {
    let backend = FakeBackend::new(Script::Report(miami_report()));
    let llm = FakeLlm::answering();
    let assistant = assistant(backend.clone(), llm.clone());

    for message in ["", "   "] {
        let err = assistant.answer(message).await.unwrap_err();
        assert!(matches!(err, AnalyticsError::Validation(_)));
    }
    assert_eq!(backend.calls(), 0);
    assert_eq!(llm.calls(), 0);
}

#[tokio::test]
async fn test_device_question_with_zero_rows() {
    let backend = FakeBackend::new(Script::Report(RawReportResult::default()));
    let llm = FakeLlm::answering();

    let answer = assistant(backend.clone(), llm.clone())
        .answer("show traffic by device")
        .await
        .unwrap();

    assert_eq!(backend.last_template().unwrap().dimensions, vec!["deviceCategory"]);
    assert!(answer.chart_data.is_none());
    assert!(llm.last_prompt().contains("Total Rows: 0"));
}

#[tokio::test]
async fn test_unmatched_question_skips_backend() {
    let backend = FakeBackend::new(Script::Report(miami_report()));
    let llm = FakeLlm::answering();
    let assistant = assistant(backend.clone(), llm.clone());

    let prepared = assistant.prepare("How should I price trade-ins?").await.unwrap();
    assert!(prepared.report.is_none());
    assert!(prepared.outcome.is_none());
    assert_eq!(prepared.data_context, "");

    let answer = assistant.answer("How should I price trade-ins?").await.unwrap();
    assert!(answer.chart_data.is_none());
    assert!(answer.report.is_none());
    assert_eq!(backend.calls(), 0);
    assert!(!llm.last_prompt().contains("REAL GA4 DATA"));
}

#[tokio::test]
async fn test_rule_order_traffic_before_vehicle() {
    let backend = FakeBackend::new(Script::Report(RawReportResult::default()));
    let llm = FakeLlm::answering();

    let answer = assistant(backend.clone(), llm)
        .answer("Is vehicle page traffic up?")
        .await
        .unwrap();

    assert_eq!(answer.report.as_deref(), Some("traffic_by_date"));
    assert_eq!(backend.last_template().unwrap().dimensions, vec!["date"]);
}

#[tokio::test]
async fn test_malformed_payload_propagates() {
    let backend = FakeBackend::new(Script::Malformed("rows: invalid type".to_string()));
    let llm = FakeLlm::answering();

    let err = assistant(backend, llm.clone())
        .answer("campaign performance")
        .await
        .unwrap_err();

    assert!(matches!(err, AnalyticsError::MalformedPayload(_)));
    assert_eq!(llm.calls(), 0);
}

#[tokio::test]
async fn test_generation_failure_propagates() {
    let backend = FakeBackend::new(Script::Report(miami_report()));

    let err = assistant(backend, FakeLlm::failing())
        .answer("traffic by city")
        .await
        .unwrap_err();

    assert!(matches!(err, AnalyticsError::Generation(_)));
}

#[tokio::test]
async fn test_fixture_backend_end_to_end() {
    let path = concat!(env!("CARGO_MANIFEST_DIR"), "/tests/fixtures/device_report.json");
    let llm = FakeLlm::answering();
    let assistant = AnalyticsAssistant::new(
        IntentRouter::default(),
        Arc::new(FixtureBackend::new(path)),
        llm.clone(),
    );

    let answer = assistant.answer("mobile vs desktop traffic").await.unwrap();

    let chart = answer.chart_data.unwrap();
    assert_eq!(chart.x_key, "deviceCategory");
    assert_eq!(chart.y_keys, vec!["activeUsers", "sessions", "bounceRate"]);
    assert_eq!(chart.rows.len(), 3);

    let prompt = llm.last_prompt();
    assert!(prompt.contains("Total Rows: 3"));
    assert!(prompt.contains("\"bounceRate\": 0.44"));
    assert!(prompt.contains("2. deviceCategory: desktop, activeUsers: 190, sessions: 260, bounceRate: 0.36"));
}
