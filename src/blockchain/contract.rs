//! Credential registry bindings.
//!
//! `verifyAndMint` takes the proof tuple produced by the proof session
//! service. `CredentialMinted` is what the talent scanner reads back.

use alloy::primitives::{Address, Bytes};
use alloy::sol;
use alloy::sol_types::SolCall;

sol! {
    #[derive(Debug, PartialEq, Eq)]
    struct ClaimInfo {
        string provider;
        string parameters;
        string context;
    }

    #[derive(Debug, PartialEq, Eq)]
    struct CompleteClaimData {
        bytes32 identifier;
        address owner;
        uint32 timestampS;
        uint32 epoch;
    }

    #[derive(Debug, PartialEq, Eq)]
    struct SignedClaim {
        CompleteClaimData claim;
        bytes[] signatures;
    }

    #[derive(Debug, PartialEq, Eq)]
    struct Proof {
        ClaimInfo claimInfo;
        SignedClaim signedClaim;
    }

    function verifyAndMint(Proof proof) external;

    /// Emitted by the registry for every minted credential.
    #[derive(Debug)]
    event CredentialMinted(
        address indexed user,
        uint256 indexed credentialIndex,
        string degreeName,
        string issuer,
        uint256 timestamp
    );
}

/// A contract write as handed to the wallet session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContractCall {
    pub address: Address,
    pub function: &'static str,
    pub calldata: Bytes,
}

impl ContractCall {
    /// `verifyAndMint(proof)` against the registry at `registry`.
    pub fn verify_and_mint(registry: Address, proof: Proof) -> Self {
        Self {
            address: registry,
            function: "verifyAndMint",
            calldata: Bytes::from(verifyAndMintCall { proof }.abi_encode()),
        }
    }
}
