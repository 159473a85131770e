//! Proof acquisition subsystem.
//!
//! # Data Flow
//! ```text
//! ProofCredentials
//!     → sdk.rs (open session, poll for the outcome)
//! SessionOutcome::Success(payload)
//!     → extract.rs (object / array / JSON string → one proof, degree name)
//!     → types.rs (typed proof, contract encoding)
//!     → sanitize.rs (bounded claim text)
//! ```

pub mod extract;
pub mod sanitize;
pub mod sdk;
pub mod types;

pub use extract::{extract_degree_name, normalize_payload, DEFAULT_DEGREE_NAME};
pub use sdk::{HttpProofSdk, ProofSdk, SessionHandle, SessionOutcome};
pub use types::{Proof, ProofError, ProofResult};
