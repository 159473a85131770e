//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! eduseal.toml (optional)
//!     → loader.rs (parse, environment overrides)
//!     → validation.rs (semantic checks)
//!     → AppConfig (validated, immutable)
//!
//! metadata.json + chain.network
//!     → chain.rs (select deployment, check registry ABI)
//!     → ResolvedChain
//! ```
//!
//! # Design Decisions
//! - All fields have defaults to allow minimal configs
//! - Secrets and chain selection can come from the environment
//! - An unknown chain name stops startup

pub mod chain;
pub mod loader;
pub mod schema;
pub mod validation;

pub use chain::{ChainConfigError, ChainMetadata, ResolvedChain};
pub use loader::{load_config, ConfigError};
pub use schema::{AppConfig, ObservabilityConfig, ProofConfig, ProofCredentials, RpcConfig};
