//! Wallet session backed by a local signer and the RPC client.

use alloy::primitives::{Address, TxHash};

use crate::blockchain::transaction::submit_call;
use crate::blockchain::{
    BlockchainClient, BlockchainError, BlockchainResult, ContractCall, ReceiptStatus,
    ReceiptWatcher, Wallet,
};
use crate::session::WalletSession;

#[derive(Debug, Clone)]
pub struct EvmWalletSession {
    client: BlockchainClient,
    wallet: Option<Wallet>,
    watcher: ReceiptWatcher,
}

impl EvmWalletSession {
    /// Without a wallet the session is read-only.
    pub fn new(client: BlockchainClient, wallet: Option<Wallet>) -> Self {
        let watcher = ReceiptWatcher::new(client.clone());
        Self {
            client,
            wallet,
            watcher,
        }
    }

    pub fn client(&self) -> &BlockchainClient {
        &self.client
    }
}

impl WalletSession for EvmWalletSession {
    fn is_connected(&self) -> bool {
        self.wallet.is_some() && self.client.can_sign()
    }

    fn account(&self) -> Option<Address> {
        self.wallet.as_ref().map(Wallet::address)
    }

    async fn write_contract(&self, call: &ContractCall) -> BlockchainResult<TxHash> {
        let from = self
            .account()
            .ok_or_else(|| BlockchainError::NotAvailable("wallet not connected".to_string()))?;
        submit_call(&self.client, from, call).await
    }

    async fn watch_receipt(&self, tx_hash: TxHash) -> BlockchainResult<ReceiptStatus> {
        self.watcher.wait(tx_hash).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::blockchain::BlockchainConfig;
    use alloy::primitives::Bytes;

    const TEST_PRIVATE_KEY: &str = "ac0974bec39a17e36ba4a6b4d238ff944bacb478cbed5efcae784d7bf4f2ff80";

    fn offline_config() -> BlockchainConfig {
        BlockchainConfig {
            rpc_url: "http://127.0.0.1:1".to_string(),
            failover_urls: Vec::new(),
            chain_id: 31337,
            rpc_timeout_secs: 1,
            confirmation_blocks: 1,
            receipt_poll_ms: 50,
            confirmation_timeout_secs: 1,
        }
    }

    #[tokio::test]
    async fn test_read_only_session() {
        let client = BlockchainClient::new(offline_config(), None).await.unwrap();
        let session = EvmWalletSession::new(client, None);

        assert!(!session.is_connected());
        assert!(session.account().is_none());

        let call = ContractCall {
            address: Address::repeat_byte(0x5f),
            function: "verifyAndMint",
            calldata: Bytes::new(),
        };
        let err = session.write_contract(&call).await.unwrap_err();
        assert!(matches!(err, BlockchainError::NotAvailable(_)));
    }

    #[tokio::test]
    async fn test_session_with_wallet_reports_account() {
        let wallet = Wallet::from_private_key(TEST_PRIVATE_KEY, 31337).unwrap();
        let expected = wallet.address();
        let client = BlockchainClient::new(offline_config(), Some(&wallet)).await.unwrap();
        let session = EvmWalletSession::new(client, Some(wallet));

        assert!(session.is_connected());
        assert_eq!(session.account(), Some(expected));
    }
}
