//! Workflow phases and the transition table.

use std::fmt;
use thiserror::Error;

/// Where a credential acquisition stands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Phase {
    Idle,
    /// Requesting a proof session.
    Connecting,
    /// The holder is completing the proof in the verification window.
    Verifying,
    /// A verified proof is held and can be minted.
    ProofReady,
    Minting,
    Success,
    Error,
}

impl Phase {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Connecting => "connecting",
            Self::Verifying => "verifying",
            Self::ProofReady => "proof_ready",
            Self::Minting => "minting",
            Self::Success => "success",
            Self::Error => "error",
        }
    }

    /// Phases with an operation in flight.
    pub fn is_busy(&self) -> bool {
        matches!(self, Self::Connecting | Self::Verifying | Self::Minting)
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WorkflowEvent {
    Initiate,
    SessionOpened,
    Verified,
    Mint,
    Confirmed,
    Failed,
    Reset,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("Cannot apply {event:?} in phase {from}")]
pub struct TransitionError {
    pub from: Phase,
    pub event: WorkflowEvent,
}

/// Next phase for `event`, or an error leaving `current` in place.
///
/// `has_proof` gates minting out of `Error`: a failed mint can be retried
/// with the proof it already holds.
pub fn transition(
    current: Phase,
    event: WorkflowEvent,
    has_proof: bool,
) -> Result<Phase, TransitionError> {
    use Phase::*;
    use WorkflowEvent::*;

    let next = match (current, event) {
        (Idle | Error, Initiate) => Connecting,

        (Connecting, SessionOpened) => Verifying,
        (Connecting, Failed) => Error,

        (Verifying, Verified) => ProofReady,
        (Verifying, Failed) => Error,

        (ProofReady, Mint) => Minting,
        (Error, Mint) if has_proof => Minting,

        (Minting, Confirmed) => Success,
        (Minting, Failed) => Error,

        (Success | Error | ProofReady, Reset) => Idle,

        _ => {
            return Err(TransitionError {
                from: current,
                event,
            })
        }
    };

    tracing::debug!(from = %current, to = %next, event = ?event, "workflow transition");
    Ok(next)
}
