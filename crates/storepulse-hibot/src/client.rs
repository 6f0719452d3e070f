use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::{json, Value};
use storepulse_core::ReportWindow;
use storepulse_report::ConversationRecord;

use crate::{ConversationSource, ConversationSourceError, HibotError};

pub const DEFAULT_HIBOT_BASE_URL: &str = "https://pdn.api.hibot.us/api_external";
pub const DEFAULT_HIBOT_CHANNEL_TYPE: &str = "WHATSAPP";
const MIN_REQUEST_TIMEOUT_MS: u64 = 1_000;

#[derive(Debug, Clone)]
/// Public struct `HibotConfig` used across StorePulse components.
pub struct HibotConfig {
    pub base_url: String,
    pub app_id: Option<String>,
    pub app_secret: Option<String>,
    pub channel_type: String,
    pub request_timeout_ms: u64,
}

impl Default for HibotConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_HIBOT_BASE_URL.to_string(),
            app_id: None,
            app_secret: None,
            channel_type: DEFAULT_HIBOT_CHANNEL_TYPE.to_string(),
            request_timeout_ms: 30_000,
        }
    }
}

impl HibotConfig {
    fn credentials(&self) -> Option<(&str, &str)> {
        let app_id = non_empty(self.app_id.as_deref())?;
        let app_secret = non_empty(self.app_secret.as_deref())?;
        Some((app_id, app_secret))
    }
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|value| !value.is_empty())
}

#[derive(Debug, Deserialize)]
struct LoginResponse {
    #[serde(default)]
    token: Option<String>,
}

#[derive(Debug, Clone)]
/// Public struct `HibotClient` used across StorePulse components.
pub struct HibotClient {
    client: reqwest::Client,
    config: HibotConfig,
}

impl HibotClient {
    pub fn new(config: HibotConfig) -> Result<Self, HibotError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_millis(
                config.request_timeout_ms.max(MIN_REQUEST_TIMEOUT_MS),
            ))
            .build()?;
        Ok(Self { client, config })
    }

    pub fn has_credentials(&self) -> bool {
        self.config.credentials().is_some()
    }

    fn endpoint_url(&self, path: &str) -> String {
        format!("{}/{path}", self.config.base_url.trim().trim_end_matches('/'))
    }

    /// Exchanges the application id/secret for a bearer token. Returns
    /// `MissingCredentials` without any network call when either is unset.
    pub async fn login(&self) -> Result<String, HibotError> {
        let Some((app_id, app_secret)) = self.config.credentials() else {
            tracing::warn!("hibot credentials are not configured; skipping login");
            return Err(HibotError::MissingCredentials);
        };
        let url = self.endpoint_url("login");
        tracing::debug!(url = %url, "authenticating with hibot");

        let response = self
            .client
            .post(&url)
            .json(&json!({ "appId": app_id, "appSecret": app_secret }))
            .send()
            .await?;
        let status = response.status();
        let raw = response.text().await?;
        if !status.is_success() {
            return Err(HibotError::HttpStatus {
                status: status.as_u16(),
                body: raw,
            });
        }

        let parsed: LoginResponse = serde_json::from_str(&raw)?;
        parsed
            .token
            .map(|token| token.trim().to_string())
            .filter(|token| !token.is_empty())
            .ok_or(HibotError::MissingToken)
    }

    /// Fetches conversations created inside `window`. A successful response
    /// that is not a JSON array means there are no conversations.
    pub async fn fetch_with_token(
        &self,
        token: &str,
        window: ReportWindow,
    ) -> Result<Vec<ConversationRecord>, HibotError> {
        let url = self.endpoint_url("conversations");
        tracing::debug!(
            url = %url,
            from_unix_ms = window.from_unix_ms,
            to_unix_ms = window.to_unix_ms,
            channel_type = %self.config.channel_type,
            "fetching hibot conversations"
        );

        let response = self
            .client
            .post(&url)
            .bearer_auth(token)
            .json(&json!({
                "from": window.from_unix_ms,
                "to": window.to_unix_ms,
                "channelType": self.config.channel_type,
            }))
            .send()
            .await?;
        let status = response.status();
        let raw = response.text().await?;
        if !status.is_success() {
            return Err(HibotError::HttpStatus {
                status: status.as_u16(),
                body: raw,
            });
        }

        let body = serde_json::from_str::<Value>(&raw).map_err(|error| {
            HibotError::InvalidResponse(format!("conversations body is not JSON: {error}"))
        })?;
        let records = match body {
            Value::Array(items) => items
                .into_iter()
                .map(ConversationRecord::from_json)
                .collect::<Vec<_>>(),
            _ => Vec::new(),
        };
        tracing::info!(conversations = records.len(), "fetched hibot conversations");
        Ok(records)
    }
}

#[async_trait]
impl ConversationSource for HibotClient {
    async fn fetch_conversations(
        &self,
        window: ReportWindow,
    ) -> Result<Vec<ConversationRecord>, ConversationSourceError> {
        let token = self.login().await.map_err(ConversationSourceError::Auth)?;
        self.fetch_with_token(&token, window)
            .await
            .map_err(ConversationSourceError::Fetch)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unit_endpoint_url_normalizes_trailing_slash() {
        let client = HibotClient::new(HibotConfig {
            base_url: "https://hibot.example/api_external/ ".to_string(),
            ..HibotConfig::default()
        })
        .expect("client");
        assert_eq!(
            client.endpoint_url("login"),
            "https://hibot.example/api_external/login"
        );
    }

    #[test]
    fn unit_credentials_require_both_non_blank_values() {
        let mut config = HibotConfig {
            app_id: Some("app".to_string()),
            app_secret: Some("   ".to_string()),
            ..HibotConfig::default()
        };
        assert!(config.credentials().is_none());
        config.app_secret = Some("secret".to_string());
        assert_eq!(config.credentials(), Some(("app", "secret")));
    }

    #[tokio::test]
    async fn regression_login_without_credentials_short_circuits() {
        let client = HibotClient::new(HibotConfig {
            base_url: "http://127.0.0.1:9".to_string(),
            ..HibotConfig::default()
        })
        .expect("client");
        assert!(!client.has_credentials());
        let error = client.login().await.expect_err("missing credentials");
        assert!(matches!(error, HibotError::MissingCredentials));
    }
}
