//! Holder dashboard: the credentials minted in this session.

pub mod credentials;

pub use credentials::{demo_credentials, Credential, CredentialBook, CredentialStatus};
