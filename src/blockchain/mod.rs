//! Blockchain integration subsystem.
//!
//! # Data Flow
//! ```text
//! ResolvedChain + [rpc] config
//!     → client.rs (RPC connection with timeouts and failover)
//! EDUSEAL_WALLET_PRIVATE_KEY
//!     → wallet.rs (local signer)
//! Proof
//!     → contract.rs (verifyAndMint calldata)
//!     → transaction.rs (broadcast, receipt polling)
//! ```
//!
//! # Security Constraints
//! - Private keys ONLY from environment variables
//! - Never log private keys or sensitive data
//! - All RPC calls have configurable timeouts

pub mod client;
pub mod contract;
pub mod transaction;
pub mod types;
pub mod wallet;

pub use client::BlockchainClient;
pub use contract::ContractCall;
pub use transaction::ReceiptWatcher;
pub use types::{BlockchainConfig, BlockchainError, BlockchainResult, ChainId, ReceiptStatus};
pub use wallet::Wallet;
