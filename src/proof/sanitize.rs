//! Bounds on proof text before it goes on-chain.

use crate::proof::extract::truncate_chars;
use crate::proof::types::{ClaimInfo, Proof};

pub const MAX_PROVIDER_CHARS: usize = 200;
pub const MAX_PARAMETERS_CHARS: usize = 500;
pub const MAX_CONTEXT_CHARS: usize = 1000;

/// Trim and truncate the free-text claim fields.
pub fn sanitize_claim_info(info: &ClaimInfo) -> ClaimInfo {
    ClaimInfo {
        provider: truncate_chars(info.provider.trim(), MAX_PROVIDER_CHARS),
        parameters: truncate_chars(info.parameters.trim(), MAX_PARAMETERS_CHARS),
        context: truncate_chars(info.context.trim(), MAX_CONTEXT_CHARS),
    }
}

impl Proof {
    /// Copy of the proof with bounded claim text; the raw payload is kept.
    pub fn sanitized(&self) -> Proof {
        Proof {
            claim_info: sanitize_claim_info(&self.claim_info),
            signed_claim: self.signed_claim.clone(),
            raw: self.raw.clone(),
        }
    }
}
