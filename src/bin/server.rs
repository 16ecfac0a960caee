//! HTTP server for the dealership analytics chat

use anyhow::Result;
use dealer_insights::api;
use dealer_insights::assistant::AnalyticsAssistant;
use dealer_insights::backend::Ga4Client;
use dealer_insights::config::AppConfig;
use dealer_insights::intent::IntentRouter;
use dealer_insights::llm::LlmClient;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables from .env file
    dotenv::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = AppConfig::from_env()?;
    info!("🚀 Starting dealer-insights API server for GA4 property {}", config.analytics.property_id);
    if config.llm.is_offline() {
        info!("⚠️  ANTHROPIC_API_KEY not found - answers use the offline placeholder");
    }

    let backend = Ga4Client::new(config.analytics.clone())?;
    let llm = LlmClient::new(config.llm.clone())?;
    let assistant = AnalyticsAssistant::new(IntentRouter::default(), Arc::new(backend), Arc::new(llm));

    let bind_addr = config.server.bind_addr();
    let listener = TcpListener::bind(&bind_addr).await?;
    info!("✅ Server listening on http://{}", bind_addr);

    axum::serve(listener, api::router(Arc::new(assistant))).await?;
    Ok(())
}
