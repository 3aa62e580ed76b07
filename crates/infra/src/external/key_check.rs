//! API key verification against the mail and AI providers.
//!
//! A key is valid when an authenticated read-only listing call succeeds. Every
//! other outcome (non-2xx, timeout, unreachable host) is a rejection; callers
//! do not get to distinguish them.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use serde::Serialize;
use thiserror::Error;
use tracing::{debug, instrument};

const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Provider {
    Mail,
    Ai,
}

impl Provider {
    pub fn as_str(&self) -> &'static str {
        match self {
            Provider::Mail => "mail",
            Provider::Ai => "ai",
        }
    }

    fn probe_path(&self) -> &'static str {
        match self {
            Provider::Mail => "/domains",
            Provider::Ai => "/v1/models",
        }
    }

    /// JSON pointer to a human-readable account label in the probe response.
    fn account_pointer(&self) -> &'static str {
        match self {
            Provider::Mail => "/data/0/name",
            Provider::Ai => "/data/0/owned_by",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct KeyIdentity {
    pub provider: Provider,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub account: Option<String>,
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum KeyCheckError {
    #[error("api key is empty")]
    Empty,

    #[error("provider rejected the key with status {0}")]
    Rejected(u16),

    #[error("provider request failed: {0}")]
    Transport(String),
}

#[async_trait]
pub trait KeyVerifier: Send + Sync {
    fn provider(&self) -> Provider;

    async fn verify(&self, api_key: &str) -> Result<KeyIdentity, KeyCheckError>;
}

#[async_trait]
impl<V> KeyVerifier for Arc<V>
where
    V: KeyVerifier + ?Sized,
{
    fn provider(&self) -> Provider {
        (**self).provider()
    }

    async fn verify(&self, api_key: &str) -> Result<KeyIdentity, KeyCheckError> {
        (**self).verify(api_key).await
    }
}

#[derive(Debug, Clone)]
pub struct HttpKeyVerifier {
    provider: Provider,
    base_url: String,
    client: reqwest::Client,
}

impl HttpKeyVerifier {
    pub fn new(provider: Provider, base_url: impl Into<String>) -> Result<Self, KeyCheckError> {
        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| KeyCheckError::Transport(e.to_string()))?;
        Ok(Self {
            provider,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            client,
        })
    }

    pub fn mail(base_url: impl Into<String>) -> Result<Self, KeyCheckError> {
        Self::new(Provider::Mail, base_url)
    }

    pub fn ai(base_url: impl Into<String>) -> Result<Self, KeyCheckError> {
        Self::new(Provider::Ai, base_url)
    }
}

#[async_trait]
impl KeyVerifier for HttpKeyVerifier {
    fn provider(&self) -> Provider {
        self.provider
    }

    #[instrument(skip_all, fields(provider = self.provider.as_str()), err)]
    async fn verify(&self, api_key: &str) -> Result<KeyIdentity, KeyCheckError> {
        let api_key = api_key.trim();
        if api_key.is_empty() {
            return Err(KeyCheckError::Empty);
        }

        let url = format!("{}{}", self.base_url, self.provider.probe_path());
        let resp = self
            .client
            .get(&url)
            .bearer_auth(api_key)
            .send()
            .await
            .map_err(|e| KeyCheckError::Transport(e.to_string()))?;

        let status = resp.status();
        if !status.is_success() {
            return Err(KeyCheckError::Rejected(status.as_u16()));
        }

        // The account label is informational; an unexpected body still means
        // the key was accepted.
        let account = match resp.json::<serde_json::Value>().await {
            Ok(body) => body
                .pointer(self.provider.account_pointer())
                .and_then(|v| v.as_str())
                .map(str::to_string),
            Err(e) => {
                debug!(error = %e, "provider response was not JSON");
                None
            }
        };

        Ok(KeyIdentity {
            provider: self.provider,
            account,
        })
    }
}

#[cfg(test)]
mod tests {
    use axum::Router;
    use axum::http::{HeaderMap, StatusCode};
    use axum::routing::get;
    use serde_json::json;

    use super::*;

    const GOOD_KEY: &str = "sk-good";

    fn authorized(headers: &HeaderMap) -> bool {
        headers
            .get("authorization")
            .and_then(|v| v.to_str().ok())
            .is_some_and(|v| v == format!("Bearer {GOOD_KEY}"))
    }

    async fn spawn_provider() -> String {
        let app = Router::new()
            .route(
                "/domains",
                get(|headers: HeaderMap| async move {
                    if authorized(&headers) {
                        Ok(axum::Json(json!({"data": [{"name": "mail.example.com"}]})))
                    } else {
                        Err(StatusCode::UNAUTHORIZED)
                    }
                }),
            )
            .route(
                "/v1/models",
                get(|headers: HeaderMap| async move {
                    if authorized(&headers) {
                        Ok(axum::Json(json!({"data": [{"id": "m-1", "owned_by": "org-acme"}]})))
                    } else {
                        Err(StatusCode::UNAUTHORIZED)
                    }
                }),
            );

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        format!("http://{addr}")
    }

    #[tokio::test]
    async fn mail_key_is_accepted_and_reports_account() {
        let base = spawn_provider().await;
        let verifier = HttpKeyVerifier::mail(base).unwrap();
        let identity = verifier.verify(GOOD_KEY).await.unwrap();
        assert_eq!(identity.provider, Provider::Mail);
        assert_eq!(identity.account.as_deref(), Some("mail.example.com"));
    }

    #[tokio::test]
    async fn ai_key_is_accepted_and_reports_account() {
        let base = spawn_provider().await;
        let verifier = HttpKeyVerifier::ai(format!("{base}/")).unwrap();
        let identity = verifier.verify(GOOD_KEY).await.unwrap();
        assert_eq!(identity.provider, Provider::Ai);
        assert_eq!(identity.account.as_deref(), Some("org-acme"));
    }

    #[tokio::test]
    async fn wrong_key_is_rejected() {
        let base = spawn_provider().await;
        let verifier = HttpKeyVerifier::mail(base).unwrap();
        assert_eq!(verifier.verify("sk-bad").await, Err(KeyCheckError::Rejected(401)));
    }

    #[tokio::test]
    async fn empty_key_never_leaves_the_process() {
        let verifier = HttpKeyVerifier::ai("http://127.0.0.1:1").unwrap();
        assert_eq!(verifier.verify("  ").await, Err(KeyCheckError::Empty));
    }

    #[tokio::test]
    async fn unreachable_provider_is_a_transport_error() {
        let verifier = HttpKeyVerifier::mail("http://127.0.0.1:1").unwrap();
        assert!(matches!(verifier.verify(GOOD_KEY).await, Err(KeyCheckError::Transport(_))));
    }
}
