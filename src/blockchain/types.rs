//! Chain-specific types and error definitions.

use alloy::primitives::B256;
use thiserror::Error;

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

/// DON identifier as stored on chain: UTF-8 bytes right-padded to 32.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DonId(pub B256);

impl DonId {
    /// Encode a DON id string, rejecting ids longer than 32 bytes.
    pub fn encode(don_id: &str) -> BlockchainResult<Self> {
        let bytes = don_id.as_bytes();
        if bytes.len() > 32 {
            return Err(BlockchainError::InvalidDonId(don_id.to_string()));
        }
        let mut padded = [0u8; 32];
        padded[..bytes.len()].copy_from_slice(bytes);
        Ok(Self(B256::from(padded)))
    }
}

/// Public keys published by the DON coordinator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DonKeys {
    /// secp256k1 public key of the DON (uncompressed, with or without 0x04).
    pub don_public_key: Vec<u8>,
    /// Serialized threshold encryption public key.
    pub threshold_public_key: Vec<u8>,
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

    /// Contract call reverted or returned unexpected data.
    #[error("Contract call {call} failed: {reason}")]
    Contract { call: &'static str, reason: String },

    /// Invalid private key format or derivation error.
    #[error("Wallet error: {0}")]
    Wallet(String),

    /// Chain configuration mismatch.
    #[error("Chain ID mismatch: expected {expected}, got {actual}")]
    ChainMismatch { expected: u64, actual: u64 },

    /// DON id does not fit in bytes32.
    #[error("DON id '{0}' is longer than 32 bytes")]
    InvalidDonId(String),

    /// The router has no coordinator registered for the DON.
    #[error("No coordinator registered for DON '{0}'")]
    UnknownDon(String),
}

/// Result type for blockchain operations.
pub type BlockchainResult<T> = Result<T, BlockchainError>;
