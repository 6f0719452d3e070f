use async_trait::async_trait;
use storepulse_core::ReportWindow;
use storepulse_report::ConversationRecord;
use thiserror::Error;

#[derive(Debug, Error)]
/// Enumerates supported `HibotError` values.
pub enum HibotError {
    #[error("HIBOT_APP_ID or HIBOT_APP_SECRET is not configured")]
    MissingCredentials,
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("upstream returned non-success status {status}: {body}")]
    HttpStatus { status: u16, body: String },
    #[error("login response did not contain a token")]
    MissingToken,
    #[error("serialization error: {0}")]
    Serde(#[from] serde_json::Error),
    #[error("invalid response: {0}")]
    InvalidResponse(String),
}

/// Which phase of the upstream exchange failed. Zero conversations is a
/// success, never one of these.
#[derive(Debug, Error)]
pub enum ConversationSourceError {
    #[error("upstream authentication failed: {0}")]
    Auth(#[source] HibotError),
    #[error("upstream conversation fetch failed: {0}")]
    Fetch(#[source] HibotError),
}

impl ConversationSourceError {
    pub fn is_auth_failure(&self) -> bool {
        matches!(self, Self::Auth(_))
    }

    pub fn inner(&self) -> &HibotError {
        match self {
            Self::Auth(error) | Self::Fetch(error) => error,
        }
    }
}

#[async_trait]
/// Trait contract for `ConversationSource` behavior.
pub trait ConversationSource: Send + Sync {
    async fn fetch_conversations(
        &self,
        window: ReportWindow,
    ) -> Result<Vec<ConversationRecord>, ConversationSourceError>;
}
