//! EduSeal credential bridge library.
//!
//! Connect a wallet, prove a degree through a zero-knowledge TLS proof
//! session, mint it with `verifyAndMint`, and browse what has been minted.

pub mod config;
pub mod blockchain;
pub mod session;
pub mod proof;
pub mod workflow;
pub mod talent;
pub mod dashboard;
pub mod lifecycle;
pub mod observability;
pub mod resilience;

pub use config::schema::AppConfig;
pub use session::{AppContext, WalletSession};
pub use workflow::{CredentialWorkflow, Phase};
