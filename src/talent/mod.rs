//! Talent directory: holders of minted credentials, scored and searchable.

pub mod profile;
pub mod scanner;

pub use profile::{
    aggregate, search, trust_score, CandidateProfile, Confidence, MintRecord, TalentStats,
};
pub use scanner::{load_candidates, scan_mints};
