//! Candidate profiles aggregated from minted credentials.

use alloy::primitives::Address;
use chrono::DateTime;
use std::collections::HashMap;

/// One `CredentialMinted` event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MintRecord {
    pub user: Address,
    pub degree_name: String,
    pub issuer: String,
    /// Unix seconds, as emitted by the registry.
    pub timestamp: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Confidence {
    High,
    Medium,
    Low,
}

impl Confidence {
    pub fn from_score(score: u8) -> Self {
        match score {
            90.. => Self::High,
            75.. => Self::Medium,
            _ => Self::Low,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::High => "High",
            Self::Medium => "Medium",
            Self::Low => "Low",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CandidateProfile {
    pub address: Address,
    /// In mint order.
    pub degrees: Vec<String>,
    pub issuers: Vec<String>,
    pub first_minted: u64,
    pub credential_count: usize,
    pub trust_score: u8,
    pub confidence: Confidence,
}

impl CandidateProfile {
    /// First mint as e.g. "Mar 15, 2024".
    pub fn mint_date(&self) -> Option<String> {
        let secs = i64::try_from(self.first_minted).ok()?;
        DateTime::from_timestamp(secs, 0).map(|d| d.format("%b %-d, %Y").to_string())
    }

    fn matches(&self, query: &str) -> bool {
        self.address.to_string().to_lowercase().contains(query)
            || self.degrees.iter().any(|d| d.to_lowercase().contains(query))
    }
}

/// Deterministic score in [80, 99] from the address's last two bytes,
/// `0x0000` → 80 and `0xffff` → 99.
pub fn trust_score(address: &Address) -> u8 {
    let bytes = address.as_slice();
    let tail = u32::from(u16::from_be_bytes([bytes[18], bytes[19]]));
    (80 + tail * 19 / 0xffff) as u8
}

/// Group mint records by holder, first-seen order.
pub fn aggregate(records: &[MintRecord]) -> Vec<CandidateProfile> {
    let mut index: HashMap<Address, usize> = HashMap::new();
    let mut profiles: Vec<CandidateProfile> = Vec::new();

    for record in records {
        let slot = *index.entry(record.user).or_insert_with(|| {
            let score = trust_score(&record.user);
            profiles.push(CandidateProfile {
                address: record.user,
                degrees: Vec::new(),
                issuers: Vec::new(),
                first_minted: record.timestamp,
                credential_count: 0,
                trust_score: score,
                confidence: Confidence::from_score(score),
            });
            profiles.len() - 1
        });

        let profile = &mut profiles[slot];
        profile.degrees.push(record.degree_name.clone());
        profile.issuers.push(record.issuer.clone());
        profile.credential_count += 1;
    }

    profiles
}

/// Case-insensitive substring match on the address or any degree. A blank
/// query returns everything.
pub fn search<'a>(candidates: &'a [CandidateProfile], query: &str) -> Vec<&'a CandidateProfile> {
    let query = query.trim().to_lowercase();
    if query.is_empty() {
        return candidates.iter().collect();
    }
    candidates.iter().filter(|c| c.matches(&query)).collect()
}

#[derive(Debug, Clone, PartialEq)]
pub struct TalentStats {
    pub active_candidates: usize,
    pub total_credentials: usize,
    /// Mean trust score to one decimal.
    pub network_trust: f64,
}

/// Shown before any candidate exists.
pub const EMPTY_NETWORK_TRUST: f64 = 99.8;

impl TalentStats {
    pub fn from_candidates(candidates: &[CandidateProfile]) -> Self {
        let network_trust = if candidates.is_empty() {
            EMPTY_NETWORK_TRUST
        } else {
            let sum: f64 = candidates.iter().map(|c| f64::from(c.trust_score)).sum();
            (sum / candidates.len() as f64 * 10.0).round() / 10.0
        };

        Self {
            active_candidates: candidates.len(),
            total_credentials: candidates.iter().map(|c| c.credential_count).sum(),
            network_trust,
        }
    }
}
