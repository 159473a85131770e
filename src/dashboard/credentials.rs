//! In-memory credential book.
//!
//! Until the holder mints something, the book shows two demonstration
//! entries so the listing is never empty.

use alloy::primitives::TxHash;
use chrono::NaiveDate;
use serde::Serialize;
use serde_json::{json, Value};

use crate::workflow::VerifiedProof;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum CredentialStatus {
    Pending,
    Active,
    Verified,
}

impl CredentialStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Active => "active",
            Self::Verified => "verified",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Credential {
    pub id: String,
    /// `YYYY.MM.DD`
    pub date: String,
    pub issuer: String,
    pub degree: String,
    pub status: CredentialStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tx_hash: Option<TxHash>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub proof_data: Option<Value>,
    pub is_demo: bool,
}

const DATE_FORMAT: &str = "%Y.%m.%d";

impl Credential {
    /// Explorer page for the mint transaction, or the explorer root for
    /// credentials that never went on-chain.
    pub fn explorer_link(&self, explorer_url: &str) -> String {
        let base = explorer_url.trim_end_matches('/');
        match self.tx_hash {
            Some(tx) => format!("{}/tx/{}", base, tx),
            None => base.to_string(),
        }
    }

    /// Pretty JSON of the whole record, raw proof payload included.
    pub fn details_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

fn demo(id: &str, date: &str) -> Credential {
    Credential {
        id: id.to_string(),
        date: date.to_string(),
        issuer: "Stanford University".to_string(),
        degree: "CS Demo".to_string(),
        status: CredentialStatus::Verified,
        tx_hash: None,
        proof_data: Some(json!({ "demo": true, "note": "This is demonstration data" })),
        is_demo: true,
    }
}

pub fn demo_credentials() -> Vec<Credential> {
    vec![demo("demo-1", "2024.03.15"), demo("demo-2", "2024.01.08")]
}

#[derive(Debug, Clone, Default)]
pub struct CredentialBook {
    minted: Vec<Credential>,
}

impl CredentialBook {
    pub fn new() -> Self {
        Self::default()
    }

    /// Real credentials, or the demo entries when there are none.
    pub fn visible(&self) -> Vec<Credential> {
        if self.minted.is_empty() {
            demo_credentials()
        } else {
            self.minted.clone()
        }
    }

    /// Case-insensitive substring match on issuer or degree.
    pub fn filter(&self, query: &str) -> Vec<Credential> {
        let query = query.trim().to_lowercase();
        self.visible()
            .into_iter()
            .filter(|c| {
                query.is_empty()
                    || c.issuer.to_lowercase().contains(&query)
                    || c.degree.to_lowercase().contains(&query)
            })
            .collect()
    }

    /// Look up a visible credential by id.
    pub fn find(&self, id: &str) -> Option<Credential> {
        let id = id.trim();
        self.visible().into_iter().find(|c| c.id.eq_ignore_ascii_case(id))
    }

    /// Add the credential a confirmed mint produced.
    pub fn record_minted(&mut self, verified: &VerifiedProof, tx_hash: TxHash, date: NaiveDate) {
        let issuer = match verified.proof.claim_info.provider.trim() {
            "" => "Unknown issuer".to_string(),
            provider => provider.to_string(),
        };

        self.minted.push(Credential {
            id: tx_hash.to_string(),
            date: date.format(DATE_FORMAT).to_string(),
            issuer,
            degree: verified.degree_name.clone(),
            status: CredentialStatus::Verified,
            tx_hash: Some(tx_hash),
            proof_data: Some(verified.proof.raw.clone()),
            is_demo: false,
        });
    }

    pub fn len(&self) -> usize {
        self.minted.len()
    }

    pub fn is_empty(&self) -> bool {
        self.minted.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::proof::Proof;

    fn verified(provider: &str, degree: &str) -> VerifiedProof {
        let raw = json!({ "claimData": { "provider": provider, "context": "{}" } });
        VerifiedProof {
            proof: Proof::from_value(raw).unwrap(),
            degree_name: degree.to_string(),
        }
    }

    #[test]
    fn test_demo_fixtures_when_empty() {
        let book = CredentialBook::new();
        let visible = book.visible();
        assert_eq!(visible.len(), 2);
        assert_eq!(visible[0].id, "demo-1");
        assert_eq!(visible[0].date, "2024.03.15");
        assert_eq!(visible[1].date, "2024.01.08");
        assert!(visible.iter().all(|c| c.is_demo && c.status == CredentialStatus::Verified));
        assert_eq!(
            visible[0].proof_data.as_ref().unwrap()["note"],
            "This is demonstration data"
        );
    }

    #[test]
    fn test_minted_credentials_replace_demo() {
        let mut book = CredentialBook::new();
        let date = NaiveDate::from_ymd_opt(2025, 6, 1).unwrap();
        book.record_minted(&verified("MIT Portal", "BSc Physics"), TxHash::repeat_byte(1), date);

        let visible = book.visible();
        assert_eq!(visible.len(), 1);
        assert_eq!(visible[0].date, "2025.06.01");
        assert_eq!(visible[0].issuer, "MIT Portal");
        assert_eq!(visible[0].degree, "BSc Physics");
        assert!(!visible[0].is_demo);
        assert_eq!(visible[0].tx_hash, Some(TxHash::repeat_byte(1)));
    }

    #[test]
    fn test_filter_matches_issuer_or_degree() {
        let mut book = CredentialBook::new();
        let date = NaiveDate::from_ymd_opt(2025, 6, 1).unwrap();
        book.record_minted(&verified("MIT Portal", "BSc Physics"), TxHash::repeat_byte(1), date);
        book.record_minted(&verified("Oxford", "BA History"), TxHash::repeat_byte(2), date);

        assert_eq!(book.filter("").len(), 2);
        assert_eq!(book.filter("mit").len(), 1);
        assert_eq!(book.filter("HISTORY").len(), 1);
        assert!(book.filter("chemistry").is_empty());
    }

    #[test]
    fn test_filter_applies_to_demo_entries() {
        let book = CredentialBook::new();
        assert_eq!(book.filter("stanford").len(), 2);
        assert!(book.filter("oxford").is_empty());
    }

    #[test]
    fn test_details_include_proof_and_explorer_link() {
        let mut book = CredentialBook::new();
        let date = NaiveDate::from_ymd_opt(2025, 6, 1).unwrap();
        let tx = TxHash::repeat_byte(0xab);
        book.record_minted(&verified("MIT Portal", "BSc Physics"), tx, date);

        let credential = book.find(&format!(" {} ", tx)).unwrap();
        assert_eq!(
            credential.explorer_link("https://amoy.polygonscan.com/"),
            format!("https://amoy.polygonscan.com/tx/{}", tx)
        );

        let details: Value = serde_json::from_str(&credential.details_json().unwrap()).unwrap();
        assert_eq!(details["degree"], "BSc Physics");
        assert_eq!(details["txHash"], tx.to_string());
        assert_eq!(details["proofData"]["claimData"]["provider"], "MIT Portal");
        assert_eq!(details["isDemo"], false);
    }

    #[test]
    fn test_demo_details_link_to_explorer_root() {
        let book = CredentialBook::new();
        let demo = book.find("demo-2").unwrap();
        assert_eq!(demo.explorer_link("https://amoy.polygonscan.com"), "https://amoy.polygonscan.com");

        let details: Value = serde_json::from_str(&demo.details_json().unwrap()).unwrap();
        assert!(details.get("txHash").is_none());
        assert_eq!(details["proofData"]["demo"], true);
        assert!(book.find("demo-3").is_none());
    }
}
