//! Proof payload model.
//!
//! The session service returns proofs in its native shape:
//!
//! ```text
//! { "identifier": "0x..",
//!   "claimData": { "provider", "parameters", "context",
//!                  "identifier", "owner", "timestampS", "epoch" },
//!   "signatures": ["0x.."], "witnesses": [..] }
//! ```
//!
//! Some integrations pre-transform it into the contract layout
//! (`claimInfo` + `signedClaim`). Both are accepted.

use alloy::primitives::{Address, Bytes, B256};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use thiserror::Error;

use crate::blockchain::contract;

#[derive(Debug, Error)]
pub enum ProofError {
    #[error("Proof payload is not valid JSON: {0}")]
    MalformedPayload(String),

    #[error("Proof payload is empty")]
    EmptyPayload,

    #[error("Proof is missing '{0}'")]
    MissingField(&'static str),

    #[error("Proof field '{field}' is invalid: {reason}")]
    InvalidField { field: &'static str, reason: String },

    #[error("Proof session error: {0}")]
    Session(String),

    #[error("Proof service request failed: {0}")]
    Http(#[from] reqwest::Error),
}

pub type ProofResult<T> = Result<T, ProofError>;

/// The part of the claim the contract re-hashes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClaimInfo {
    #[serde(default)]
    pub provider: String,
    #[serde(default)]
    pub parameters: String,
    #[serde(default)]
    pub context: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompleteClaim {
    #[serde(default)]
    pub identifier: String,
    #[serde(default)]
    pub owner: String,
    #[serde(default, deserialize_with = "u64_from_str_or_number")]
    pub timestamp_s: u64,
    #[serde(default, deserialize_with = "u64_from_str_or_number")]
    pub epoch: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignedClaim {
    pub claim: CompleteClaim,
    #[serde(default)]
    pub signatures: Vec<String>,
}

/// A verified proof, retained between verification and minting.
#[derive(Debug, Clone, PartialEq)]
pub struct Proof {
    pub claim_info: ClaimInfo,
    pub signed_claim: SignedClaim,
    /// The payload exactly as received, kept for the credential book.
    pub raw: Value,
}

impl Proof {
    /// Build the typed proof from a normalized payload object.
    pub fn from_value(raw: Value) -> ProofResult<Self> {
        let claim_info = match (raw.get("claimInfo"), raw.get("claimData")) {
            (Some(info), _) => field::<ClaimInfo>(info, "claimInfo")?,
            (None, Some(data)) => field::<ClaimInfo>(data, "claimData")?,
            (None, None) => return Err(ProofError::MissingField("claimInfo")),
        };

        let signed_claim = match (raw.get("signedClaim"), raw.get("claimData")) {
            (Some(signed), _) => field::<SignedClaim>(signed, "signedClaim")?,
            (None, Some(data)) => SignedClaim {
                claim: field::<CompleteClaim>(data, "claimData")?,
                signatures: match raw.get("signatures") {
                    Some(sigs) => field::<Vec<String>>(sigs, "signatures")?,
                    None => Vec::new(),
                },
            },
            (None, None) => return Err(ProofError::MissingField("signedClaim")),
        };

        Ok(Self {
            claim_info,
            signed_claim,
            raw,
        })
    }

    /// Contract arguments for `verifyAndMint`.
    ///
    /// Absent claim fields encode as zero; the registry's signature check is
    /// the authority on whether such a proof is acceptable. Present but
    /// malformed fields are rejected here.
    pub fn to_abi(&self) -> ProofResult<contract::Proof> {
        let claim = &self.signed_claim.claim;

        let identifier: B256 = parse_or_zero(&claim.identifier, "identifier")?;
        let owner: Address = parse_or_zero(&claim.owner, "owner")?;
        let timestamp_s = u32::try_from(claim.timestamp_s).map_err(|e| invalid("timestampS", e))?;
        let epoch = u32::try_from(claim.epoch).map_err(|e| invalid("epoch", e))?;

        let signatures = self
            .signed_claim
            .signatures
            .iter()
            .map(|s| s.trim().parse::<Bytes>().map_err(|e| invalid("signatures", e)))
            .collect::<ProofResult<Vec<_>>>()?;

        Ok(contract::Proof {
            claimInfo: contract::ClaimInfo {
                provider: self.claim_info.provider.clone(),
                parameters: self.claim_info.parameters.clone(),
                context: self.claim_info.context.clone(),
            },
            signedClaim: contract::SignedClaim {
                claim: contract::CompleteClaimData {
                    identifier,
                    owner,
                    timestampS: timestamp_s,
                    epoch,
                },
                signatures,
            },
        })
    }
}

fn field<T: serde::de::DeserializeOwned>(value: &Value, name: &'static str) -> ProofResult<T> {
    T::deserialize(value).map_err(|e| invalid(name, e))
}

fn parse_or_zero<T>(text: &str, name: &'static str) -> ProofResult<T>
where
    T: std::str::FromStr + Default,
    T::Err: std::fmt::Display,
{
    let text = text.trim();
    if text.is_empty() {
        Ok(T::default())
    } else {
        text.parse().map_err(|e| invalid(name, e))
    }
}

fn invalid(field: &'static str, reason: impl std::fmt::Display) -> ProofError {
    ProofError::InvalidField {
        field,
        reason: reason.to_string(),
    }
}

fn u64_from_str_or_number<'de, D>(deserializer: D) -> Result<u64, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Number(u64),
        Text(String),
    }

    match Raw::deserialize(deserializer)? {
        Raw::Number(n) => Ok(n),
        Raw::Text(s) => s.trim().parse().map_err(serde::de::Error::custom),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn native_payload() -> Value {
        json!({
            "identifier": "0x1111111111111111111111111111111111111111111111111111111111111111",
            "claimData": {
                "provider": "http",
                "parameters": "{\"url\":\"https://portal.example.edu\"}",
                "context": "{\"degreeName\":\"BSc Physics\"}",
                "identifier": "0x1111111111111111111111111111111111111111111111111111111111111111",
                "owner": "0xf39fd6e51aad88f6f4ce6ab8827279cfffb92266",
                "timestampS": 1700000000,
                "epoch": "1"
            },
            "signatures": ["0xabcdef"],
            "witnesses": []
        })
    }

    #[test]
    fn test_native_shape() {
        let proof = Proof::from_value(native_payload()).unwrap();
        assert_eq!(proof.claim_info.provider, "http");
        assert_eq!(proof.signed_claim.claim.timestamp_s, 1_700_000_000);
        assert_eq!(proof.signed_claim.claim.epoch, 1);
        assert_eq!(proof.signed_claim.signatures, vec!["0xabcdef".to_string()]);
    }

    #[test]
    fn test_contract_shape() {
        let payload = json!({
            "claimInfo": { "provider": "http", "parameters": "{}", "context": "{}" },
            "signedClaim": {
                "claim": {
                    "identifier": "0x2222222222222222222222222222222222222222222222222222222222222222",
                    "owner": "0x0000000000000000000000000000000000000001",
                    "timestampS": "42",
                    "epoch": 2
                },
                "signatures": []
            }
        });
        let proof = Proof::from_value(payload).unwrap();
        assert_eq!(proof.signed_claim.claim.timestamp_s, 42);

        let abi = proof.to_abi().unwrap();
        assert_eq!(abi.signedClaim.claim.epoch, 2);
        assert_eq!(abi.signedClaim.claim.owner, Address::with_last_byte(1));
    }

    #[test]
    fn test_to_abi_decodes_fields() {
        let abi = Proof::from_value(native_payload()).unwrap().to_abi().unwrap();
        assert_eq!(abi.signedClaim.claim.identifier, B256::repeat_byte(0x11));
        assert_eq!(&abi.signedClaim.signatures[0][..], &[0xab, 0xcd, 0xef]);
        assert_eq!(abi.claimInfo.context, "{\"degreeName\":\"BSc Physics\"}");
    }

    #[test]
    fn test_context_only_claim_encodes_with_zero_defaults() {
        let payload = json!({ "claimData": { "context": "{\"degreeName\":\"BSc Physics\"}" } });
        let abi = Proof::from_value(payload).unwrap().to_abi().unwrap();
        assert_eq!(abi.signedClaim.claim.identifier, B256::ZERO);
        assert_eq!(abi.signedClaim.claim.owner, Address::ZERO);
        assert!(abi.signedClaim.signatures.is_empty());
        assert_eq!(abi.claimInfo.context, "{\"degreeName\":\"BSc Physics\"}");
    }

    #[test]
    fn test_missing_claim() {
        let err = Proof::from_value(json!({ "signatures": [] })).unwrap_err();
        assert!(matches!(err, ProofError::MissingField("claimInfo")));
    }

    #[test]
    fn test_bad_owner_is_reported() {
        let mut payload = native_payload();
        payload["claimData"]["owner"] = json!("not-an-address");
        let err = Proof::from_value(payload).unwrap().to_abi().unwrap_err();
        assert!(matches!(err, ProofError::InvalidField { field: "owner", .. }));
    }

    #[test]
    fn test_timestamp_out_of_u32_range() {
        let mut payload = native_payload();
        payload["claimData"]["timestampS"] = json!(u64::from(u32::MAX) + 1);
        let err = Proof::from_value(payload).unwrap().to_abi().unwrap_err();
        assert!(matches!(err, ProofError::InvalidField { field: "timestampS", .. }));
    }
}
