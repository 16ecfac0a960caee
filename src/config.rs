//! Process configuration
//!
//! Read once at startup from the environment (optionally seeded by `.env`) and then
//! handed to the clients explicitly. Nothing here is mutated after construction.

use crate::backend::auth::Credentials;
use crate::error::{AnalyticsError, Result};
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;
use tracing::warn;

pub const DEFAULT_GA4_BASE_URL: &str = "https://analyticsdata.googleapis.com/v1beta";
pub const DEFAULT_ANTHROPIC_BASE_URL: &str = "https://api.anthropic.com";
pub const DEFAULT_MODEL: &str = "claude-3-5-sonnet-20241022";

/// Placeholder key that puts the completion client in offline mode
pub const OFFLINE_API_KEY: &str = "dummy-api-key";

#[derive(Debug, Clone)]
pub struct AnalyticsConfig {
    pub property_id: String,
    pub credentials: Credentials,
    pub api_base_url: String,
    pub timeout: Duration,
}

#[derive(Debug, Clone)]
pub struct LlmConfig {
    pub api_key: String,
    pub base_url: String,
    pub model: String,
    pub max_tokens: u32,
    pub timeout: Duration,
}

impl LlmConfig {
    pub fn is_offline(&self) -> bool {
        self.api_key == OFFLINE_API_KEY
    }
}

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl ServerConfig {
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub analytics: AnalyticsConfig,
    pub llm: LlmConfig,
    pub server: ServerConfig,
}

impl AppConfig {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from any key lookup; blank values count as unset
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        let property_id = get("GA4_PROPERTY_ID")
            .ok_or_else(|| AnalyticsError::Config("GA4_PROPERTY_ID must be set".to_string()))?;

        let credentials = match (get("GA4_ACCESS_TOKEN"), get("GOOGLE_APPLICATION_CREDENTIALS")) {
            (Some(token), _) => Credentials::AccessToken(token),
            (None, Some(path)) => Credentials::ServiceAccountFile(PathBuf::from(path)),
            (None, None) => {
                return Err(AnalyticsError::Config(
                    "Either GA4_ACCESS_TOKEN or GOOGLE_APPLICATION_CREDENTIALS must be set".to_string(),
                ))
            }
        };

        let analytics = AnalyticsConfig {
            property_id,
            credentials,
            api_base_url: get("GA4_API_BASE_URL").unwrap_or_else(|| DEFAULT_GA4_BASE_URL.to_string()),
            timeout: Duration::from_secs(parse_or("GA4_TIMEOUT_SECS", get("GA4_TIMEOUT_SECS"), 30)?),
        };

        let api_key = match get("ANTHROPIC_API_KEY") {
            Some(key) => key,
            None => {
                warn!("ANTHROPIC_API_KEY not set - answers will use the offline placeholder");
                OFFLINE_API_KEY.to_string()
            }
        };

        let llm = LlmConfig {
            api_key,
            base_url: get("ANTHROPIC_BASE_URL").unwrap_or_else(|| DEFAULT_ANTHROPIC_BASE_URL.to_string()),
            model: get("ANTHROPIC_MODEL").unwrap_or_else(|| DEFAULT_MODEL.to_string()),
            max_tokens: parse_or("ANTHROPIC_MAX_TOKENS", get("ANTHROPIC_MAX_TOKENS"), 1500)?,
            timeout: Duration::from_secs(parse_or("ANTHROPIC_TIMEOUT_SECS", get("ANTHROPIC_TIMEOUT_SECS"), 120)?),
        };

        let server = ServerConfig {
            host: get("SERVER_HOST").unwrap_or_else(|| "0.0.0.0".to_string()),
            port: parse_or("SERVER_PORT", get("SERVER_PORT"), 3000)?,
        };

        Ok(Self { analytics, llm, server })
    }
}

fn parse_or<T: FromStr>(key: &str, value: Option<String>, default: T) -> Result<T> {
    match value {
        Some(raw) => raw
            .parse()
            .map_err(|_| AnalyticsError::Config(format!("{} has an invalid value: {}", key, raw))),
        None => Ok(default),
    }
}
