//! Reads `CredentialMinted` events back from the registry.

use alloy::primitives::Address;
use alloy::rpc::types::{BlockNumberOrTag, Filter};
use alloy::sol_types::SolEvent;

use crate::blockchain::contract::CredentialMinted;
use crate::blockchain::{BlockchainClient, BlockchainResult};
use crate::observability::metrics;
use crate::talent::profile::{aggregate, CandidateProfile, MintRecord};

/// Every mint the registry has emitted, oldest first.
pub async fn scan_mints(
    client: &BlockchainClient,
    registry: Address,
) -> BlockchainResult<Vec<MintRecord>> {
    let filter = Filter::new()
        .address(registry)
        .event_signature(CredentialMinted::SIGNATURE_HASH)
        .from_block(BlockNumberOrTag::Earliest)
        .to_block(BlockNumberOrTag::Latest);

    let logs = client.get_logs(&filter).await?;
    let mut records = Vec::with_capacity(logs.len());

    for log in logs {
        match log.log_decode::<CredentialMinted>() {
            Ok(decoded) => {
                let event = decoded.inner.data;
                records.push(MintRecord {
                    user: event.user,
                    degree_name: event.degreeName,
                    issuer: event.issuer,
                    timestamp: event.timestamp.saturating_to::<u64>(),
                });
            }
            Err(e) => {
                tracing::warn!(
                    tx_hash = ?log.transaction_hash,
                    error = %e,
                    "Skipping undecodable CredentialMinted log"
                );
            }
        }
    }

    tracing::debug!(count = records.len(), registry = %registry, "Mint logs scanned");
    Ok(records)
}

/// Scan and aggregate in one go.
pub async fn load_candidates(
    client: &BlockchainClient,
    registry: Address,
) -> BlockchainResult<Vec<CandidateProfile>> {
    let records = scan_mints(client, registry).await?;
    let candidates = aggregate(&records);
    metrics::record_candidates(candidates.len());
    Ok(candidates)
}
