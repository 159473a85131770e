//! Local signing key for the wallet session.
//!
//! # Security
//! - Private keys are loaded ONLY from environment variables
//! - Keys are never logged or serialized

use alloy::network::EthereumWallet;
use alloy::primitives::Address;
use alloy::signers::local::PrivateKeySigner;
use alloy::signers::Signer;

use crate::blockchain::types::{BlockchainError, BlockchainResult};

/// Environment variable name for the private key.
pub const PRIVATE_KEY_ENV_VAR: &str = "EDUSEAL_WALLET_PRIVATE_KEY";

/// Signing key bound to one chain.
#[derive(Debug, Clone)]
pub struct Wallet {
    signer: PrivateKeySigner,
    chain_id: u64,
}

impl Wallet {
    /// Create a wallet from a hex-encoded private key string (with or
    /// without `0x`).
    pub fn from_private_key(private_key_hex: &str, chain_id: u64) -> BlockchainResult<Self> {
        let key_hex = private_key_hex
            .trim()
            .strip_prefix("0x")
            .unwrap_or(private_key_hex.trim());

        let signer: PrivateKeySigner = key_hex
            .parse()
            .map_err(|e| BlockchainError::Wallet(format!("Invalid private key format: {}", e)))?;
        let signer = signer.with_chain_id(Some(chain_id));

        tracing::info!(
            address = %signer.address(),
            chain_id = chain_id,
            "Wallet initialized"
        );

        Ok(Self { signer, chain_id })
    }

    /// Load the wallet from `EDUSEAL_WALLET_PRIVATE_KEY`.
    ///
    /// `Ok(None)` when the variable is unset: the session is then read-only.
    pub fn from_env(chain_id: u64) -> BlockchainResult<Option<Self>> {
        match std::env::var(PRIVATE_KEY_ENV_VAR) {
            Ok(key) if !key.trim().is_empty() => Self::from_private_key(&key, chain_id).map(Some),
            _ => Ok(None),
        }
    }

    pub fn address(&self) -> Address {
        self.signer.address()
    }

    pub fn chain_id(&self) -> u64 {
        self.chain_id
    }

    /// Network wallet used by the provider's signing filler.
    pub fn ethereum_wallet(&self) -> EthereumWallet {
        EthereumWallet::from(self.signer.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // Anvil's first account. Publicly known, never holds real funds.
    const ANVIL_KEY: &str = "ac0974bec39a17e36ba4a6b4d238ff944bacb478cbed5efcae784d7bf4f2ff80";
    const ANVIL_ADDRESS: &str = "0xf39fd6e51aad88f6f4ce6ab8827279cfffb92266";

    #[test]
    fn test_key_with_and_without_prefix_agree() {
        let bare = Wallet::from_private_key(ANVIL_KEY, 31337).unwrap();
        let prefixed = Wallet::from_private_key(&format!("  0x{}\n", ANVIL_KEY), 31337).unwrap();

        assert_eq!(bare.address(), prefixed.address());
        assert_eq!(bare.address().to_string().to_lowercase(), ANVIL_ADDRESS);
        assert_eq!(bare.chain_id(), 31337);
    }

    #[test]
    fn test_malformed_key_is_a_wallet_error() {
        let err = Wallet::from_private_key("0xnot-hex", 80002).unwrap_err();
        assert!(matches!(err, BlockchainError::Wallet(_)));
        assert!(err.to_string().contains("Invalid private key"));
    }

    #[test]
    fn test_signer_is_bound_to_chain() {
        let wallet = Wallet::from_private_key(ANVIL_KEY, 80002).unwrap();
        assert_eq!(wallet.signer.chain_id(), Some(80002));
        assert!(!format!("{:?}", wallet).contains(ANVIL_KEY));
    }
}
