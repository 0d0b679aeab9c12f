//! Next-card provider boundary.

use async_trait::async_trait;
use reqwest::Client;
use thiserror::Error;

use drill_core::types::{NextCardResponse, PreviousAnswer};

/// Provider failure. Recoverable: the session keeps the last answer and
/// re-issues it on retry.
#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("network error: {0}")]
    Network(String),

    #[error("provider error: {status} - {message}")]
    Backend { status: u16, message: String },

    #[error("parse error: {0}")]
    Parse(String),
}

/// External service supplying the next card and current progress given the
/// previous answer. `previous` is omitted on the very first call of a
/// session.
#[async_trait]
pub trait CardProvider: Send + Sync {
    async fn next_card(
        &self,
        previous: Option<&PreviousAnswer>,
    ) -> Result<NextCardResponse, ProviderError>;
}

/// HTTP implementation against the session REST endpoint.
pub struct HttpCardProvider {
    client: Client,
    base_url: String,
}

impl HttpCardProvider {
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url: String = base_url.into();
        Self {
            client: Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }
}

#[async_trait]
impl CardProvider for HttpCardProvider {
    async fn next_card(
        &self,
        previous: Option<&PreviousAnswer>,
    ) -> Result<NextCardResponse, ProviderError> {
        let url = format!("{}/api/v1/session/next-card", self.base_url);

        let mut request = self.client.post(&url);
        if let Some(answer) = previous {
            request = request.json(answer);
        }

        let resp = request
            .send()
            .await
            .map_err(|e| ProviderError::Network(e.to_string()))?;

        if !resp.status().is_success() {
            let status = resp.status().as_u16();
            let body = resp.text().await.unwrap_or_default();
            return Err(ProviderError::Backend {
                status,
                message: error_detail(&body),
            });
        }

        resp.json()
            .await
            .map_err(|e| ProviderError::Parse(e.to_string()))
    }
}

/// Pull the human-readable detail out of a structured error body, falling
/// back to the raw text.
fn error_detail(body: &str) -> String {
    serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|value| {
            value
                .get("detail")
                .and_then(|detail| detail.as_str())
                .map(str::to_owned)
        })
        .unwrap_or_else(|| body.to_string())
}
