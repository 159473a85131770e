//! Startup orchestration.
//!
//! # Order
//! configuration (already validated) → chain descriptor → wallet key → RPC
//! client → wallet session. Every step's failure stops startup.

use std::path::Path;
use std::sync::Arc;
use thiserror::Error;

use crate::blockchain::{BlockchainClient, BlockchainConfig, BlockchainError, Wallet};
use crate::config::chain::resolve_chain;
use crate::config::{AppConfig, ChainConfigError, ConfigError, ResolvedChain};
use crate::proof::{HttpProofSdk, ProofError};
use crate::session::{EvmWalletSession, WalletSession};

#[derive(Debug, Error)]
pub enum StartupError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Chain configuration error: {0}")]
    Chain(#[from] ChainConfigError),

    #[error("Blockchain error: {0}")]
    Blockchain(#[from] BlockchainError),

    #[error("Proof service error: {0}")]
    Proof(#[from] ProofError),
}

/// Everything a command needs, built once in dependency order.
#[derive(Debug, Clone)]
pub struct AppContext {
    pub config: AppConfig,
    pub chain: ResolvedChain,
    pub session: Arc<EvmWalletSession>,
}

impl AppContext {
    pub async fn initialize(config: AppConfig) -> Result<Self, StartupError> {
        let chain = resolve_chain(Path::new(&config.chain.metadata_path), &config.chain.network)?;
        tracing::info!(
            network = %chain.network,
            chain_id = chain.chain_id,
            registry = %chain.registry.address,
            "Chain resolved"
        );

        let wallet = Wallet::from_env(chain.chain_id)?;
        if wallet.is_none() {
            tracing::warn!("No wallet key configured, session is read-only");
        }

        let client =
            BlockchainClient::new(BlockchainConfig::from_parts(&chain, &config.rpc), wallet.as_ref())
                .await?;
        let session = Arc::new(EvmWalletSession::new(client, wallet));

        tracing::info!(
            connected = session.is_connected(),
            account = ?session.account(),
            "Wallet session ready"
        );

        Ok(Self {
            config,
            chain,
            session,
        })
    }

    pub fn proof_sdk(&self) -> Result<HttpProofSdk, StartupError> {
        Ok(HttpProofSdk::new(&self.config.proof)?)
    }
}
