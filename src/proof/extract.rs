//! Payload normalization and degree-name extraction.

use serde_json::Value;

use crate::proof::types::{ProofError, ProofResult};

/// Used when the proof context names no degree.
pub const DEFAULT_DEGREE_NAME: &str = "Academic Credential";

pub const MAX_DEGREE_NAME_CHARS: usize = 100;

/// The session service may deliver one proof object, a list of proofs, or a
/// JSON-encoded string of either, and the encodings nest (a list of
/// encoded proofs is fine). Reduce all of them to the first proof.
pub fn normalize_payload(payload: Value) -> ProofResult<Value> {
    match payload {
        Value::Array(proofs) => match proofs.into_iter().next() {
            Some(first) => normalize_payload(first),
            None => Err(ProofError::EmptyPayload),
        },
        Value::String(text) => {
            let parsed: Value = serde_json::from_str(text.trim())
                .map_err(|e| ProofError::MalformedPayload(e.to_string()))?;
            match parsed {
                // A string holding a string is not a proof.
                Value::String(_) => Err(ProofError::MalformedPayload(
                    "nested string payload".to_string(),
                )),
                other => normalize_payload(other),
            }
        }
        Value::Null => Err(ProofError::EmptyPayload),
        other => Ok(other),
    }
}

/// Pull the degree name out of the proof's free-text context.
///
/// The context is untrusted: angle brackets are stripped before parsing and
/// anything that is not a JSON object with a non-empty `degreeName` string
/// falls back to [`DEFAULT_DEGREE_NAME`]. The result is at most
/// [`MAX_DEGREE_NAME_CHARS`] characters.
pub fn extract_degree_name(proof: &Value) -> String {
    let raw = ["/claimData/context", "/claimInfo/context"]
        .iter()
        .filter_map(|path| proof.pointer(path).and_then(Value::as_str))
        .find(|s| !s.is_empty())
        .unwrap_or("{}");

    let sanitized: String = raw.trim().chars().filter(|c| !matches!(c, '<' | '>')).collect();

    let name = match serde_json::from_str::<Value>(&sanitized) {
        Ok(context) => context
            .get("degreeName")
            .and_then(Value::as_str)
            .filter(|s| !s.is_empty())
            .map(str::to_string),
        Err(e) => {
            tracing::warn!(error = %e, "Proof context is not JSON, using default degree name");
            None
        }
    };

    truncate_chars(name.as_deref().unwrap_or(DEFAULT_DEGREE_NAME).trim(), MAX_DEGREE_NAME_CHARS)
}

/// First `max` characters of `s` (not bytes, so never splits a code point).
pub fn truncate_chars(s: &str, max: usize) -> String {
    match s.char_indices().nth(max) {
        Some((idx, _)) => s[..idx].to_string(),
        None => s.to_string(),
    }
}
