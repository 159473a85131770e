//! Credential acquisition driver.
//!
//! # Flow
//! ```text
//! initiate():  Idle → Connecting → (session opened, URL launched) → Verifying
//!              → (outcome) → ProofReady | Error
//! mint():      ProofReady → Minting (tx submitted)
//! await_confirmation() / on_confirmation(true):  Minting → Success
//! reset():     Success | Error | ProofReady → Idle
//! ```
//!
//! Every failure sets a user-facing message, moves to `Error`, and is also
//! returned to the caller.

use alloy::primitives::{Address, TxHash};
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tokio::sync::broadcast;
use uuid::Uuid;

use crate::blockchain::{ContractCall, ReceiptStatus};
use crate::config::{AppConfig, ProofCredentials, ResolvedChain};
use crate::lifecycle::cancelled;
use crate::observability::metrics;
use crate::proof::{
    extract_degree_name, normalize_payload, Proof, ProofError, ProofSdk, SessionOutcome,
};
use crate::session::WalletSession;
use crate::workflow::launcher::VerificationLauncher;
use crate::workflow::notify::{NotificationCenter, KEY_MINT_TX, KEY_PROOF_INIT, KEY_PROOF_VERIFY};
use crate::workflow::phase::{transition, Phase, TransitionError, WorkflowEvent};

#[derive(Debug, Error)]
pub enum WorkflowError {
    #[error("Please connect your wallet first")]
    WalletDisconnected,

    #[error("Proof service is not configured (app id, app secret and provider id are required)")]
    ConfigMissing,

    #[error("Failed to start proof session: {0}")]
    Sdk(ProofError),

    #[error("Verification failed: {0}")]
    Verification(String),

    #[error("Verification timed out after {0}s")]
    VerificationTimedOut(u64),

    #[error("Verification cancelled")]
    VerificationCancelled,

    #[error("Minting failed. Please try again.")]
    MintFailed,

    #[error("No verified proof to mint")]
    NoProof,

    #[error("No transaction to confirm")]
    NoTransaction,

    #[error(transparent)]
    InvalidTransition(#[from] TransitionError),
}

/// What the workflow needs from configuration.
#[derive(Debug, Clone)]
pub struct WorkflowSettings {
    /// `None` when any of the three credentials is missing.
    pub credentials: Option<ProofCredentials>,
    pub registry: Address,
    pub verification_timeout: Duration,
}

impl WorkflowSettings {
    pub fn from_config(config: &AppConfig, chain: &ResolvedChain) -> Self {
        Self {
            credentials: config.proof.credentials(),
            registry: chain.registry.address,
            verification_timeout: Duration::from_secs(config.proof.verification_timeout_secs),
        }
    }
}

/// A proof that passed verification, held until it is minted.
#[derive(Debug, Clone, PartialEq)]
pub struct VerifiedProof {
    pub proof: Proof,
    pub degree_name: String,
}

pub struct CredentialWorkflow<S, P> {
    session: S,
    sdk: P,
    launcher: Arc<dyn VerificationLauncher>,
    notices: Arc<NotificationCenter>,
    settings: WorkflowSettings,
    cancel: Option<broadcast::Receiver<()>>,

    phase: Phase,
    attempt_id: Option<Uuid>,
    verified: Option<VerifiedProof>,
    tx_hash: Option<TxHash>,
    error_message: Option<String>,
    /// Set once the current mint has been celebrated.
    celebrated: bool,
    celebrations: u64,
}

impl<S: WalletSession, P: ProofSdk> CredentialWorkflow<S, P> {
    pub fn new(
        session: S,
        sdk: P,
        launcher: Arc<dyn VerificationLauncher>,
        settings: WorkflowSettings,
    ) -> Self {
        Self {
            session,
            sdk,
            launcher,
            notices: Arc::new(NotificationCenter::new()),
            settings,
            cancel: None,
            phase: Phase::Idle,
            attempt_id: None,
            verified: None,
            tx_hash: None,
            error_message: None,
            celebrated: false,
            celebrations: 0,
        }
    }

    /// Give up waiting on verification when `rx` fires.
    pub fn with_cancel(mut self, rx: broadcast::Receiver<()>) -> Self {
        self.cancel = Some(rx);
        self
    }

    pub fn with_notifications(mut self, notices: Arc<NotificationCenter>) -> Self {
        self.notices = notices;
        self
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn verified(&self) -> Option<&VerifiedProof> {
        self.verified.as_ref()
    }

    pub fn degree_name(&self) -> Option<&str> {
        self.verified.as_ref().map(|v| v.degree_name.as_str())
    }

    pub fn tx_hash(&self) -> Option<TxHash> {
        self.tx_hash
    }

    pub fn error_message(&self) -> Option<&str> {
        self.error_message.as_deref()
    }

    /// How many mints have been celebrated over this workflow's life.
    pub fn celebrations(&self) -> u64 {
        self.celebrations
    }

    pub fn attempt_id(&self) -> Option<Uuid> {
        self.attempt_id
    }

    pub fn notifications(&self) -> &Arc<NotificationCenter> {
        &self.notices
    }

    /// Request a proof session, launch the verification URL and wait for
    /// the holder to finish. Ends in `ProofReady` or `Error`.
    pub async fn initiate(&mut self) -> Result<(), WorkflowError> {
        if !self.session.is_connected() {
            self.notices.error(None, WorkflowError::WalletDisconnected.to_string());
            return Err(WorkflowError::WalletDisconnected);
        }

        self.apply(WorkflowEvent::Initiate)?;
        self.clear_attempt();
        let attempt = Uuid::new_v4();
        self.attempt_id = Some(attempt);

        tracing::info!(attempt_id = %attempt, "Starting credential acquisition");
        self.notices.loading(KEY_PROOF_INIT, "Initializing proof session...");

        let Some(credentials) = self.settings.credentials.clone() else {
            return Err(self.fail(WorkflowError::ConfigMissing, Some(KEY_PROOF_INIT)));
        };

        let handle = match self.sdk.init(&credentials).await {
            Ok(handle) => handle,
            Err(e) => return Err(self.fail(WorkflowError::Sdk(e), Some(KEY_PROOF_INIT))),
        };
        self.notices.success(Some(KEY_PROOF_INIT), "Proof session ready");

        self.apply(WorkflowEvent::SessionOpened)?;
        tracing::info!(
            attempt_id = %attempt,
            session_id = %handle.session_id,
            "Opening verification window"
        );
        if let Err(e) = self.launcher.open(&handle.request_url) {
            tracing::warn!(error = %e, url = %handle.request_url, "Failed to open verification window");
        }
        self.notices
            .loading(KEY_PROOF_VERIFY, "Complete the verification in the opened window...");

        let deadline = self.settings.verification_timeout;
        let sdk = &self.sdk;
        let cancel = &mut self.cancel;
        let outcome = tokio::select! {
            outcome = sdk.await_outcome(&handle) => Ok(outcome),
            _ = tokio::time::sleep(deadline) => Err(WorkflowError::VerificationTimedOut(deadline.as_secs())),
            _ = wait_cancel(cancel) => Err(WorkflowError::VerificationCancelled),
        };

        let payload = match outcome {
            Ok(SessionOutcome::Success(payload)) => payload,
            Ok(SessionOutcome::Failure(reason)) => {
                return Err(self.fail(WorkflowError::Verification(reason), Some(KEY_PROOF_VERIFY)))
            }
            Err(e) => return Err(self.fail(e, Some(KEY_PROOF_VERIFY))),
        };

        let verified = match verify_payload(payload) {
            Ok(v) => v,
            Err(e) => {
                return Err(self.fail(
                    WorkflowError::Verification(e.to_string()),
                    Some(KEY_PROOF_VERIFY),
                ))
            }
        };

        tracing::info!(attempt_id = %attempt, degree = %verified.degree_name, "Proof verified");
        self.notices.success(
            Some(KEY_PROOF_VERIFY),
            format!("Verified: {}", verified.degree_name),
        );
        self.verified = Some(verified);
        self.apply(WorkflowEvent::Verified)?;
        Ok(())
    }

    /// Submit `verifyAndMint` with the held proof. Ends in `Minting` with a
    /// transaction hash, or `Error`.
    pub async fn mint(&mut self) -> Result<TxHash, WorkflowError> {
        let Some(verified) = self.verified.clone() else {
            return Err(WorkflowError::NoProof);
        };
        let Some(account) = self.session.account().filter(|_| self.session.is_connected()) else {
            self.notices.error(None, WorkflowError::WalletDisconnected.to_string());
            return Err(WorkflowError::WalletDisconnected);
        };

        self.apply(WorkflowEvent::Mint)?;
        self.tx_hash = None;
        self.error_message = None;
        self.celebrated = false;
        self.notices
            .loading(KEY_MINT_TX, "Submitting credential to the registry...");

        let abi = match verified.proof.sanitized().to_abi() {
            Ok(abi) => abi,
            Err(e) => {
                tracing::error!(error = %e, "Proof cannot be encoded for the registry");
                metrics::record_mint_outcome("failed");
                return Err(self.fail(WorkflowError::MintFailed, Some(KEY_MINT_TX)));
            }
        };
        let call = ContractCall::verify_and_mint(self.settings.registry, abi);

        match self.session.write_contract(&call).await {
            Ok(tx_hash) => {
                tracing::info!(
                    account = %account,
                    tx_hash = %tx_hash,
                    degree = %verified.degree_name,
                    "Mint transaction submitted"
                );
                self.tx_hash = Some(tx_hash);
                self.notices
                    .loading(KEY_MINT_TX, format!("Transaction submitted: {}", tx_hash));
                Ok(tx_hash)
            }
            Err(e) => {
                tracing::error!(account = %account, error = %e, "Mint transaction failed");
                metrics::record_mint_outcome("failed");
                Err(self.fail(WorkflowError::MintFailed, Some(KEY_MINT_TX)))
            }
        }
    }

    /// Receipt callback. Returns true only for the call that moved the
    /// workflow to `Success`; the celebration fires exactly then.
    pub fn on_confirmation(&mut self, confirmed: bool) -> bool {
        if !confirmed || self.phase != Phase::Minting || self.celebrated {
            return false;
        }
        if self.apply(WorkflowEvent::Confirmed).is_err() {
            return false;
        }

        self.celebrated = true;
        self.celebrations += 1;
        metrics::record_mint_outcome("confirmed");

        let degree = self.degree_name().unwrap_or_default().to_string();
        self.notices
            .success(Some(KEY_MINT_TX), format!("Credential minted: {}", degree));
        true
    }

    /// Watch the submitted transaction until it is confirmed or fails.
    pub async fn await_confirmation(&mut self) -> Result<(), WorkflowError> {
        if self.phase == Phase::Success {
            return Ok(());
        }
        let Some(tx_hash) = self.tx_hash else {
            return Err(WorkflowError::NoTransaction);
        };
        if self.phase != Phase::Minting {
            return Err(TransitionError {
                from: self.phase,
                event: WorkflowEvent::Confirmed,
            }
            .into());
        }

        match self.session.watch_receipt(tx_hash).await {
            Ok(ReceiptStatus::Confirmed { block_number }) => {
                tracing::info!(tx_hash = %tx_hash, block = block_number, "Mint confirmed");
                self.on_confirmation(true);
                Ok(())
            }
            Ok(ReceiptStatus::Failed(reason)) => {
                tracing::error!(tx_hash = %tx_hash, reason = %reason, "Mint transaction reverted");
                metrics::record_mint_outcome("reverted");
                Err(self.fail(WorkflowError::MintFailed, Some(KEY_MINT_TX)))
            }
            Ok(status) => {
                tracing::error!(tx_hash = %tx_hash, status = ?status, "Receipt watch ended unconfirmed");
                Err(self.fail(WorkflowError::MintFailed, Some(KEY_MINT_TX)))
            }
            Err(e) => {
                tracing::error!(tx_hash = %tx_hash, error = %e, "Receipt watch failed");
                Err(self.fail(WorkflowError::MintFailed, Some(KEY_MINT_TX)))
            }
        }
    }

    /// Start a new sequence: forget proof, degree, transaction and error.
    pub fn reset(&mut self) -> Result<(), WorkflowError> {
        if self.phase != Phase::Idle {
            self.apply(WorkflowEvent::Reset)?;
        }
        self.clear_attempt();
        Ok(())
    }

    /// Drop everything the previous attempt left behind, notices included.
    fn clear_attempt(&mut self) {
        self.attempt_id = None;
        self.verified = None;
        self.tx_hash = None;
        self.error_message = None;
        self.celebrated = false;
        for key in [KEY_PROOF_INIT, KEY_PROOF_VERIFY, KEY_MINT_TX] {
            self.notices.dismiss(key);
        }
    }

    fn apply(&mut self, event: WorkflowEvent) -> Result<Phase, TransitionError> {
        let next = transition(self.phase, event, self.verified.is_some())?;
        metrics::record_transition(self.phase.as_str(), next.as_str());
        self.phase = next;
        Ok(next)
    }

    /// Record `err` as the user-facing message and move to `Error`.
    fn fail(&mut self, err: WorkflowError, key: Option<&str>) -> WorkflowError {
        let message = err.to_string();
        if self.apply(WorkflowEvent::Failed).is_err() {
            tracing::warn!(phase = %self.phase, "Failure outside a busy phase");
            metrics::record_transition(self.phase.as_str(), Phase::Error.as_str());
            self.phase = Phase::Error;
        }
        tracing::warn!(attempt_id = ?self.attempt_id, error = %message, "Credential workflow failed");
        self.notices.error(key, message.clone());
        self.error_message = Some(message);
        err
    }
}

async fn wait_cancel(rx: &mut Option<broadcast::Receiver<()>>) {
    match rx {
        Some(rx) => cancelled(rx).await,
        None => std::future::pending().await,
    }
}

/// Turn a session payload into a held proof.
fn verify_payload(payload: serde_json::Value) -> Result<VerifiedProof, ProofError> {
    let normalized = normalize_payload(payload)?;
    let degree_name = extract_degree_name(&normalized);
    let proof = Proof::from_value(normalized)?;
    Ok(VerifiedProof { proof, degree_name })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_verify_payload_accepts_context_only_proof() {
        let verified = verify_payload(json!([
            { "claimData": { "context": "{\"degreeName\":\"BSc Physics\"}" } }
        ]))
        .unwrap();
        assert_eq!(verified.degree_name, "BSc Physics");
        assert_eq!(verified.proof.claim_info.context, "{\"degreeName\":\"BSc Physics\"}");
    }

    #[test]
    fn test_verify_payload_rejects_empty_list() {
        assert!(matches!(verify_payload(json!([])), Err(ProofError::EmptyPayload)));
    }

    #[test]
    fn test_mint_failure_message() {
        assert_eq!(
            WorkflowError::MintFailed.to_string(),
            "Minting failed. Please try again."
        );
    }
}
