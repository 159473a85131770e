//! Contract writes and confirmation monitoring.
//!
//! # Responsibilities
//! - Turn a `ContractCall` into a transaction request and broadcast it
//! - Poll for the receipt until it has the configured block depth

use alloy::network::TransactionBuilder;
use alloy::primitives::{Address, TxHash};
use alloy::rpc::types::TransactionRequest;
use std::time::Duration;
use tokio::time::{interval, timeout};

use crate::blockchain::client::BlockchainClient;
use crate::blockchain::contract::ContractCall;
use crate::blockchain::types::{BlockchainError, BlockchainResult, ReceiptStatus};

/// Build the transaction request for a contract call. Gas, nonce and chain
/// id are left to the provider's fillers.
pub fn build_call(from: Address, call: &ContractCall) -> TransactionRequest {
    TransactionRequest::default()
        .with_from(from)
        .with_to(call.address)
        .with_input(call.calldata.clone())
}

/// Broadcast `call` from `from`.
pub async fn submit_call(
    client: &BlockchainClient,
    from: Address,
    call: &ContractCall,
) -> BlockchainResult<TxHash> {
    let tx_hash = client.send_transaction(build_call(from, call)).await?;
    tracing::info!(
        tx_hash = %tx_hash,
        contract = %call.address,
        function = call.function,
        "Transaction broadcast"
    );
    Ok(tx_hash)
}

/// Polls receipts for one transaction at a time.
#[derive(Debug, Clone)]
pub struct ReceiptWatcher {
    client: BlockchainClient,
    poll_interval: Duration,
    deadline: Duration,
}

impl ReceiptWatcher {
    pub fn new(client: BlockchainClient) -> Self {
        let config = client.config();
        let poll_interval = Duration::from_millis(config.receipt_poll_ms);
        let deadline = Duration::from_secs(config.confirmation_timeout_secs);
        Self {
            client,
            poll_interval,
            deadline,
        }
    }

    /// One look at the receipt, without waiting.
    pub async fn check(&self, tx_hash: TxHash) -> BlockchainResult<ReceiptStatus> {
        let required = self.client.confirmation_blocks();

        let receipt = match self.client.get_transaction_receipt(tx_hash).await? {
            Some(r) => r,
            None => return Ok(ReceiptStatus::Pending),
        };

        if !receipt.status() {
            return Ok(ReceiptStatus::Failed("Transaction reverted".to_string()));
        }

        let current_block = self.client.get_block_number().await?;
        let tx_block = receipt.block_number.unwrap_or(current_block);
        // The inclusion block counts as the first confirmation.
        let confirmations = current_block.saturating_sub(tx_block).saturating_add(1) as u32;

        if confirmations >= required {
            Ok(ReceiptStatus::Confirmed {
                block_number: tx_block,
            })
        } else {
            Ok(ReceiptStatus::Confirming {
                current: confirmations,
                required,
            })
        }
    }

    /// Wait until the transaction is confirmed or has failed.
    pub async fn wait(&self, tx_hash: TxHash) -> BlockchainResult<ReceiptStatus> {
        let result = timeout(self.deadline, async {
            let mut ticker = interval(self.poll_interval);

            loop {
                ticker.tick().await;

                match self.check(tx_hash).await? {
                    ReceiptStatus::Pending => {
                        tracing::debug!(tx_hash = %tx_hash, "Transaction pending");
                    }
                    ReceiptStatus::Confirming { current, required } => {
                        tracing::debug!(
                            tx_hash = %tx_hash,
                            confirmations = current,
                            required = required,
                            "Waiting for confirmations"
                        );
                    }
                    done => return Ok(done),
                }
            }
        })
        .await;

        match result {
            Ok(status) => status,
            Err(_) => Err(BlockchainError::ConfirmationTimeout(self.deadline.as_secs())),
        }
    }
}
