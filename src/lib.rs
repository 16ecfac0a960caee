pub mod api;
pub mod assistant;
pub mod backend;
pub mod chart;
pub mod config;
pub mod error;
pub mod intent;
pub mod llm;
pub mod narrative;
pub mod normalize;
pub mod outcome;
pub mod prompts;
pub mod template;

pub use assistant::{AnalyticsAssistant, AssistantResponse};
pub use error::{AnalyticsError, Result};
