//! Wallet session.
//!
//! The workflow talks to the wallet only through [`WalletSession`]: whether
//! an account is connected, which one, a contract write, and a receipt watch
//! keyed by the returned hash.

pub mod evm;

use alloy::primitives::{Address, TxHash};
use std::future::Future;
use std::sync::Arc;

use crate::blockchain::{BlockchainResult, ContractCall, ReceiptStatus};

pub use crate::lifecycle::startup::AppContext;
pub use evm::EvmWalletSession;

pub trait WalletSession: Send + Sync {
    fn is_connected(&self) -> bool;

    fn account(&self) -> Option<Address>;

    /// Sign and broadcast `call`, returning the transaction hash.
    fn write_contract(
        &self,
        call: &ContractCall,
    ) -> impl Future<Output = BlockchainResult<TxHash>> + Send;

    /// Wait until `tx_hash` is confirmed or has failed.
    fn watch_receipt(
        &self,
        tx_hash: TxHash,
    ) -> impl Future<Output = BlockchainResult<ReceiptStatus>> + Send;
}

impl<T: WalletSession> WalletSession for Arc<T> {
    fn is_connected(&self) -> bool {
        (**self).is_connected()
    }

    fn account(&self) -> Option<Address> {
        (**self).account()
    }

    fn write_contract(
        &self,
        call: &ContractCall,
    ) -> impl Future<Output = BlockchainResult<TxHash>> + Send {
        (**self).write_contract(call)
    }

    fn watch_receipt(
        &self,
        tx_hash: TxHash,
    ) -> impl Future<Output = BlockchainResult<ReceiptStatus>> + Send {
        (**self).watch_receipt(tx_hash)
    }
}
