use dealer_insights::assistant::AnalyticsAssistant;
use dealer_insights::backend::{FixtureBackend, Ga4Client, ReportBackend};
use dealer_insights::config::AppConfig;
use dealer_insights::intent::IntentRouter;
use dealer_insights::llm::LlmClient;

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "dealer-insights")]
#[command(about = "Ask questions about dealership web analytics")]
#[command(version)]
struct Args {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show which report a question would run
    Route {
        /// The question in natural language
        message: String,
    },
    /// Answer a question end to end
    Ask {
        /// The question in natural language
        message: String,

        /// Serve the report from a recorded JSON result instead of GA4
        #[arg(long)]
        fixture: Option<PathBuf>,

        /// Also print the analytics context handed to the model
        #[arg(long)]
        context: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables from .env file
    dotenv::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .init();

    let args = Args::parse();

    match args.command {
        Commands::Route { message } => route(&message),
        Commands::Ask { message, fixture, context } => ask(&message, fixture, context).await,
    }
}

fn route(message: &str) -> Result<()> {
    match IntentRouter::default().route(message) {
        Some(rule) => {
            println!("Report: {}", rule.name);
            println!("{}", serde_json::to_string_pretty(&rule.template)?);
        }
        None => println!("No report matches this question; it would be answered without analytics data."),
    }
    Ok(())
}

async fn ask(message: &str, fixture: Option<PathBuf>, show_context: bool) -> Result<()> {
    let config = AppConfig::from_env()?;

    let backend: Arc<dyn ReportBackend> = match fixture {
        Some(path) => Arc::new(FixtureBackend::new(path)),
        None => Arc::new(Ga4Client::new(config.analytics.clone())?),
    };
    let llm = Arc::new(LlmClient::new(config.llm.clone())?);
    let assistant = AnalyticsAssistant::new(IntentRouter::default(), backend, llm);

    let prepared = assistant.prepare(message).await?;
    if show_context {
        println!("=== Analytics context ({}) ===", prepared.report.as_deref().unwrap_or("none"));
        println!("{}\n", prepared.data_context.trim());
    }

    let answer = assistant.generate(prepared).await?;
    println!("{}", answer.response);
    if let Some(chart) = &answer.chart_data {
        println!("\n=== Chart ===");
        println!("{}", serde_json::to_string_pretty(chart)?);
    }
    Ok(())
}
