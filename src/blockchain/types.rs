//! Chain-specific types and error definitions.

use thiserror::Error;

use crate::config::{ResolvedChain, RpcConfig};

/// Chain ID type for strong typing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ChainId(pub u64);

impl From<u64> for ChainId {
    fn from(id: u64) -> Self {
        Self(id)
    }
}

impl From<ChainId> for u64 {
    fn from(id: ChainId) -> Self {
        id.0
    }
}

/// Connection settings for the RPC client, merged from the resolved chain
/// descriptor and the `[rpc]` config section.
#[derive(Debug, Clone)]
pub struct BlockchainConfig {
    /// Primary JSON-RPC endpoint (from the descriptor).
    pub rpc_url: String,
    pub failover_urls: Vec<String>,
    pub chain_id: u64,
    pub rpc_timeout_secs: u64,
    pub confirmation_blocks: u32,
    pub receipt_poll_ms: u64,
    pub confirmation_timeout_secs: u64,
}

impl BlockchainConfig {
    pub fn from_parts(chain: &ResolvedChain, rpc: &RpcConfig) -> Self {
        Self {
            rpc_url: chain.rpc_url.clone(),
            failover_urls: rpc.failover_urls.clone(),
            chain_id: chain.chain_id,
            rpc_timeout_secs: rpc.rpc_timeout_secs,
            confirmation_blocks: rpc.confirmation_blocks,
            receipt_poll_ms: rpc.receipt_poll_ms,
            confirmation_timeout_secs: rpc.confirmation_timeout_secs,
        }
    }
}

/// Errors that can occur during blockchain operations.
#[derive(Debug, Error)]
pub enum BlockchainError {
    /// RPC connection or request failed.
    #[error("RPC error: {0}")]
    Rpc(String),

    /// RPC request timed out.
    #[error("RPC timeout after {0} seconds")]
    Timeout(u64),

    /// No receipt with enough confirmations within the deadline.
    #[error("Transaction not confirmed after {0} seconds")]
    ConfirmationTimeout(u64),

    /// Invalid private key format or derivation error.
    #[error("Wallet error: {0}")]
    Wallet(String),

    /// Chain configuration mismatch.
    #[error("Chain ID mismatch: expected {expected}, got {actual}")]
    ChainMismatch { expected: u64, actual: u64 },

    /// Operation needs something the client was built without (e.g. a signer).
    #[error("Blockchain not available: {0}")]
    NotAvailable(String),
}

/// Result type for blockchain operations.
pub type BlockchainResult<T> = Result<T, BlockchainError>;

/// What the receipt watcher currently knows about a transaction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReceiptStatus {
    /// Not yet mined.
    Pending,
    /// Mined but not enough confirmations.
    Confirming { current: u32, required: u32 },
    /// Confirmed with the required block depth.
    Confirmed { block_number: u64 },
    /// Reverted or dropped.
    Failed(String),
}

impl ReceiptStatus {
    pub fn is_loading(&self) -> bool {
        matches!(self, Self::Pending | Self::Confirming { .. })
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Self::Confirmed { .. })
    }
}
