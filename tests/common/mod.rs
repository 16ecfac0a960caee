#![allow(dead_code)]

use async_trait::async_trait;
use dealer_insights::backend::{RawReportResult, ReportBackend};
use dealer_insights::error::{AnalyticsError, Result};
use dealer_insights::intent::IntentRouter;
use dealer_insights::llm::CompletionClient;
use dealer_insights::template::ReportTemplate;
use dealer_insights::AnalyticsAssistant;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

pub enum Script {
    Report(RawReportResult),
    BackendError(String),
    Malformed(String),
}

pub struct FakeBackend {
    script: Script,
    calls: AtomicUsize,
    templates: Mutex<Vec<ReportTemplate>>,
}

impl FakeBackend {
    pub fn new(script: Script) -> Arc<Self> {
        Arc::new(Self {
            script,
            calls: AtomicUsize::new(0),
            templates: Mutex::new(Vec::new()),
        })
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn last_template(&self) -> Option<ReportTemplate> {
        self.templates.lock().unwrap().last().cloned()
    }
}

#[async_trait]
impl ReportBackend for FakeBackend {
    fn name(&self) -> &'static str {
        "fake"
    }

    async fn run_report(&self, template: &ReportTemplate) -> Result<RawReportResult> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.templates.lock().unwrap().push(template.clone());
        match &self.script {
            Script::Report(raw) => Ok(raw.clone()),
            Script::BackendError(message) => Err(AnalyticsError::Backend(message.clone())),
            Script::Malformed(message) => Err(AnalyticsError::MalformedPayload(message.clone())),
        }
    }
}

pub struct FakeLlm {
    fail: bool,
    prompts: Mutex<Vec<String>>,
}

impl FakeLlm {
    pub fn answering() -> Arc<Self> {
        Arc::new(Self {
            fail: false,
            prompts: Mutex::new(Vec::new()),
        })
    }

    pub fn failing() -> Arc<Self> {
        Arc::new(Self {
            fail: true,
            prompts: Mutex::new(Vec::new()),
        })
    }

    pub fn last_prompt(&self) -> String {
        self.prompts.lock().unwrap().last().cloned().unwrap_or_default()
    }

    pub fn calls(&self) -> usize {
        self.prompts.lock().unwrap().len()
    }
}

#[async_trait]
impl CompletionClient for FakeLlm {
    async fn complete(&self, prompt: &str) -> Result<String> {
        self.prompts.lock().unwrap().push(prompt.to_string());
        if self.fail {
            return Err(AnalyticsError::Generation("overloaded".to_string()));
        }
        Ok("## Key Findings\nTraffic is healthy.".to_string())
    }
}

pub fn assistant(backend: Arc<FakeBackend>, llm: Arc<FakeLlm>) -> AnalyticsAssistant {
    AnalyticsAssistant::new(IntentRouter::default(), backend, llm)
}
