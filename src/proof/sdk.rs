//! Proof session service client.
//!
//! # Responsibilities
//! - Open a verification session with the app credentials
//! - Poll the session until it completes, fails, or keeps erroring
//!
//! The workflow only sees the [`ProofSdk`] trait; [`HttpProofSdk`] speaks the
//! session service's HTTP API.

use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use crate::config::{ProofConfig, ProofCredentials};
use crate::proof::types::{ProofError, ProofResult};
use crate::resilience::poll_delay;

/// Consecutive failed polls before a session is given up.
const MAX_POLL_ERRORS: u32 = 5;

/// A session opened with the proof service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionHandle {
    pub session_id: String,
    /// Where the holder completes the proof.
    pub request_url: String,
}

/// How a session ended. Delivered once per session.
#[derive(Debug, Clone, PartialEq)]
pub enum SessionOutcome {
    Success(Value),
    Failure(String),
}

pub trait ProofSdk: Send + Sync {
    /// Open a session for the configured provider.
    fn init(
        &self,
        credentials: &ProofCredentials,
    ) -> impl Future<Output = ProofResult<SessionHandle>> + Send;

    /// Wait for the holder to finish the session.
    fn await_outcome(&self, session: &SessionHandle) -> impl Future<Output = SessionOutcome> + Send;
}

impl<T: ProofSdk> ProofSdk for Arc<T> {
    fn init(
        &self,
        credentials: &ProofCredentials,
    ) -> impl Future<Output = ProofResult<SessionHandle>> + Send {
        (**self).init(credentials)
    }

    fn await_outcome(&self, session: &SessionHandle) -> impl Future<Output = SessionOutcome> + Send {
        (**self).await_outcome(session)
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct CreateSessionRequest<'a> {
    app_id: &'a str,
    provider_id: &'a str,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CreateSessionResponse {
    session_id: String,
    request_url: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "lowercase")]
enum SessionStatus {
    Pending,
    Completed,
    Failed,
}

#[derive(Debug, Deserialize)]
struct SessionStatusResponse {
    status: SessionStatus,
    #[serde(default)]
    proofs: Option<Value>,
    #[serde(default)]
    error: Option<String>,
}

/// HTTP client for the proof session service.
#[derive(Debug, Clone)]
pub struct HttpProofSdk {
    client: Client,
    endpoint: String,
    poll_base_ms: u64,
    poll_max_ms: u64,
}

impl HttpProofSdk {
    pub fn new(config: &ProofConfig) -> ProofResult<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()?;

        Ok(Self {
            client,
            endpoint: config.endpoint.trim_end_matches('/').to_string(),
            poll_base_ms: config.poll_base_ms,
            poll_max_ms: config.poll_max_ms,
        })
    }

    async fn create_session(&self, credentials: &ProofCredentials) -> ProofResult<SessionHandle> {
        let body = CreateSessionRequest {
            app_id: &credentials.app_id,
            provider_id: &credentials.provider_id,
        };

        let resp = self
            .client
            .post(format!("{}/sessions", self.endpoint))
            .bearer_auth(&credentials.app_secret)
            .json(&body)
            .send()
            .await?;

        let status = resp.status();
        let text = resp.text().await?;

        if !status.is_success() {
            return Err(ProofError::Session(format!(
                "session service returned {}: {}",
                status,
                text.trim()
            )));
        }

        let created: CreateSessionResponse = serde_json::from_str(&text)
            .map_err(|e| ProofError::Session(format!("unexpected session response: {}", e)))?;

        Ok(SessionHandle {
            session_id: created.session_id,
            request_url: created.request_url,
        })
    }

    async fn poll_once(&self, session: &SessionHandle) -> ProofResult<SessionStatusResponse> {
        let resp = self
            .client
            .get(format!("{}/sessions/{}", self.endpoint, session.session_id))
            .send()
            .await?;
        let status = resp.status();
        let text = resp.text().await?;

        if !status.is_success() {
            return Err(ProofError::Session(format!("status poll returned {}", status)));
        }

        serde_json::from_str(&text)
            .map_err(|e| ProofError::Session(format!("unexpected status response: {}", e)))
    }
}

impl ProofSdk for HttpProofSdk {
    async fn init(&self, credentials: &ProofCredentials) -> ProofResult<SessionHandle> {
        let handle = self.create_session(credentials).await?;
        tracing::info!(session_id = %handle.session_id, "Proof session created");
        Ok(handle)
    }

    async fn await_outcome(&self, session: &SessionHandle) -> SessionOutcome {
        let mut attempt = 0u32;
        let mut errors = 0u32;

        loop {
            tokio::time::sleep(poll_delay(attempt, self.poll_base_ms, self.poll_max_ms)).await;
            attempt = attempt.saturating_add(1);

            match self.poll_once(session).await {
                Ok(resp) => {
                    errors = 0;
                    match resp.status {
                        SessionStatus::Pending => {
                            tracing::debug!(session_id = %session.session_id, attempt, "Proof session pending");
                        }
                        SessionStatus::Completed => {
                            return match resp.proofs {
                                Some(proofs) if !proofs.is_null() => SessionOutcome::Success(proofs),
                                _ => SessionOutcome::Failure(
                                    "Session completed without a proof".to_string(),
                                ),
                            };
                        }
                        SessionStatus::Failed => {
                            return SessionOutcome::Failure(
                                resp.error.unwrap_or_else(|| "Verification failed".to_string()),
                            );
                        }
                    }
                }
                Err(e) => {
                    errors += 1;
                    tracing::warn!(
                        session_id = %session.session_id,
                        error = %e,
                        consecutive_errors = errors,
                        "Proof session poll failed"
                    );
                    if errors >= MAX_POLL_ERRORS {
                        return SessionOutcome::Failure(format!(
                            "Proof service unreachable: {}",
                            e
                        ));
                    }
                }
            }
        }
    }
}
