//! Backend credentials
//!
//! Either a pre-issued bearer token, or a service-account key file that is turned
//! into a short-lived access token through the OAuth2 JWT-bearer grant. Tokens are
//! resolved on every call and never cached.

use crate::error::{AnalyticsError, Result};
use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{encode, Algorithm, EncodingKey, Header};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use tracing::debug;

pub const ANALYTICS_READONLY_SCOPE: &str = "https://www.googleapis.com/auth/analytics.readonly";

const DEFAULT_TOKEN_URI: &str = "https://oauth2.googleapis.com/token";
const JWT_BEARER_GRANT: &str = "urn:ietf:params:oauth:grant-type:jwt-bearer";
const ASSERTION_LIFETIME_SECS: i64 = 3600;

#[derive(Clone, PartialEq, Eq)]
pub enum Credentials {
    AccessToken(String),
    ServiceAccountFile(PathBuf),
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Credentials::AccessToken(_) => f.write_str("AccessToken(<redacted>)"),
            Credentials::ServiceAccountFile(path) => {
                f.debug_tuple("ServiceAccountFile").field(path).finish()
            }
        }
    }
}

impl Credentials {
    /// Bearer token for one backend call
    pub async fn bearer_token(&self, http: &Client) -> Result<String> {
        match self {
            Credentials::AccessToken(token) => Ok(token.clone()),
            Credentials::ServiceAccountFile(path) => {
                let key = ServiceAccountKey::from_file(path).await?;
                key.exchange(http).await
            }
        }
    }
}

/// The fields of a service-account JSON key that token exchange needs
#[derive(Clone, Deserialize)]
pub struct ServiceAccountKey {
    pub client_email: String,
    pub private_key: String,
    #[serde(default = "default_token_uri")]
    pub token_uri: String,
}

impl fmt::Debug for ServiceAccountKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ServiceAccountKey")
            .field("client_email", &self.client_email)
            .field("private_key", &"<redacted>")
            .field("token_uri", &self.token_uri)
            .finish()
    }
}

fn default_token_uri() -> String {
    DEFAULT_TOKEN_URI.to_string()
}

#[derive(Debug, Serialize)]
struct AssertionClaims<'a> {
    iss: &'a str,
    scope: &'a str,
    aud: &'a str,
    iat: i64,
    exp: i64,
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
}

#[derive(Debug, Deserialize)]
struct TokenErrorResponse {
    error: String,
    #[serde(default)]
    error_description: Option<String>,
}

impl ServiceAccountKey {
    pub async fn from_file(path: &Path) -> Result<Self> {
        let content = tokio::fs::read_to_string(path).await.map_err(|e| {
            AnalyticsError::Backend(format!(
                "Failed to read service account key {}: {}",
                path.display(),
                e
            ))
        })?;
        serde_json::from_str(&content).map_err(|e| {
            AnalyticsError::Backend(format!(
                "Invalid service account key {}: {}",
                path.display(),
                e
            ))
        })
    }

    /// RS256-signed JWT assertion for the analytics read-only scope
    pub fn assertion(&self, issued_at: DateTime<Utc>) -> Result<String> {
        let claims = AssertionClaims {
            iss: &self.client_email,
            scope: ANALYTICS_READONLY_SCOPE,
            aud: &self.token_uri,
            iat: issued_at.timestamp(),
            exp: (issued_at + Duration::seconds(ASSERTION_LIFETIME_SECS)).timestamp(),
        };
        let key = EncodingKey::from_rsa_pem(self.private_key.as_bytes())
            .map_err(|e| AnalyticsError::Backend(format!("Invalid service account private key: {}", e)))?;
        encode(&Header::new(Algorithm::RS256), &claims, &key)
            .map_err(|e| AnalyticsError::Backend(format!("Failed to sign token assertion: {}", e)))
    }

    pub async fn exchange(&self, http: &Client) -> Result<String> {
        let assertion = self.assertion(Utc::now())?;
        debug!("Exchanging service account assertion for {}", self.client_email);

        let response = http
            .post(&self.token_uri)
            .form(&[("grant_type", JWT_BEARER_GRANT), ("assertion", assertion.as_str())])
            .send()
            .await
            .map_err(|e| AnalyticsError::Backend(format!("Token exchange failed: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            let message = match serde_json::from_str::<TokenErrorResponse>(&text) {
                Ok(err) => match err.error_description {
                    Some(description) => format!("{}: {}", err.error, description),
                    None => err.error,
                },
                Err(_) => text,
            };
            return Err(AnalyticsError::Backend(format!(
                "Token exchange failed with status {}: {}",
                status, message
            )));
        }

        let token: TokenResponse = response
            .json()
            .await
            .map_err(|e| AnalyticsError::Backend(format!("Failed to parse token response: {}", e)))?;
        Ok(token.access_token)
    }
}
