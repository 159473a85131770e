//! Chain descriptor resolution.
//!
//! The descriptor is a static JSON document listing every deployment:
//!
//! ```text
//! { "chains": [ { "network": "devnet", "chainId": "31337",
//!                 "rpc_url": "http://127.0.0.1:8545",
//!                 "contracts": [ { "address": "0x..", "abi": [..] } ] } ] }
//! ```
//!
//! One entry is selected by network name. The first contract of that entry
//! is the credential registry and its ABI must expose `verifyAndMint`.

use std::fs;
use std::path::Path;

use alloy::json_abi::JsonAbi;
use alloy::primitives::Address;
use alloy::sol_types::SolCall;
use serde::{Deserialize, Deserializer};
use thiserror::Error;

use crate::blockchain::contract::verifyAndMintCall;

/// Errors resolving the chain descriptor. All of them are fatal at startup.
#[derive(Debug, Error)]
pub enum ChainConfigError {
    #[error("Failed to read chain metadata: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid chain metadata: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Chain '{network}' not found in metadata (available: {available})")]
    UnknownNetwork { network: String, available: String },

    #[error("Chain '{0}' declares no contracts")]
    NoContracts(String),

    #[error("Registry ABI has no '{0}' function")]
    MissingFunction(&'static str),

    #[error("Registry ABI '{0}' does not take a Proof tuple")]
    SignatureMismatch(&'static str),
}

/// The whole descriptor document.
#[derive(Debug, Clone, Deserialize)]
pub struct ChainMetadata {
    pub chains: Vec<ChainDescriptor>,
}

/// One deployment.
#[derive(Debug, Clone, Deserialize)]
pub struct ChainDescriptor {
    pub network: String,
    #[serde(rename = "chainId", deserialize_with = "chain_id_from_str_or_number")]
    pub chain_id: u64,
    pub rpc_url: String,
    #[serde(default)]
    pub contracts: Vec<ContractDescriptor>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ContractDescriptor {
    #[serde(default)]
    pub name: Option<String>,
    pub address: Address,
    pub abi: JsonAbi,
}

/// The selected deployment with its registry contract.
#[derive(Debug, Clone)]
pub struct ResolvedChain {
    pub network: String,
    pub chain_id: u64,
    pub rpc_url: String,
    pub registry: ContractDescriptor,
}

impl ChainMetadata {
    pub fn from_json(json: &str) -> Result<Self, ChainConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn load(path: &Path) -> Result<Self, ChainConfigError> {
        let content = fs::read_to_string(path)?;
        Self::from_json(&content)
    }

    /// Select the entry for `network`.
    pub fn resolve(&self, network: &str) -> Result<ResolvedChain, ChainConfigError> {
        let entry = self
            .chains
            .iter()
            .find(|c| c.network == network)
            .ok_or_else(|| ChainConfigError::UnknownNetwork {
                network: network.to_string(),
                available: self
                    .chains
                    .iter()
                    .map(|c| c.network.as_str())
                    .collect::<Vec<_>>()
                    .join(", "),
            })?;

        let registry = entry
            .contracts
            .first()
            .cloned()
            .ok_or_else(|| ChainConfigError::NoContracts(entry.network.clone()))?;

        check_registry_abi(&registry.abi)?;

        Ok(ResolvedChain {
            network: entry.network.clone(),
            chain_id: entry.chain_id,
            rpc_url: entry.rpc_url.clone(),
            registry,
        })
    }
}

/// Load the descriptor at `path` and resolve `network`.
pub fn resolve_chain(path: &Path, network: &str) -> Result<ResolvedChain, ChainConfigError> {
    let resolved = ChainMetadata::load(path)?.resolve(network)?;
    tracing::info!(
        network = %resolved.network,
        chain_id = resolved.chain_id,
        registry = %resolved.registry.address,
        "Chain descriptor resolved"
    );
    Ok(resolved)
}

/// The encoder is compiled against a fixed `verifyAndMint(Proof)` layout, so
/// the configured ABI has to agree with it.
fn check_registry_abi(abi: &JsonAbi) -> Result<(), ChainConfigError> {
    const NAME: &str = "verifyAndMint";

    let overloads = abi
        .function(NAME)
        .ok_or(ChainConfigError::MissingFunction(NAME))?;

    if overloads
        .iter()
        .any(|f| f.selector().0 == verifyAndMintCall::SELECTOR)
    {
        Ok(())
    } else {
        Err(ChainConfigError::SignatureMismatch(NAME))
    }
}

fn chain_id_from_str_or_number<'de, D>(deserializer: D) -> Result<u64, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Number(u64),
        Text(String),
    }

    match Raw::deserialize(deserializer)? {
        Raw::Number(n) => Ok(n),
        Raw::Text(s) => s.trim().parse().map_err(serde::de::Error::custom),
    }
}
