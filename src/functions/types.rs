//! Secrets manager request, result, and error types.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::blockchain::BlockchainError;

/// Ciphertext produced by [`SecretsManager::encrypt_secrets`].
///
/// [`SecretsManager::encrypt_secrets`]: crate::functions::SecretsManager::encrypt_secrets
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EncryptedSecrets {
    /// 0x-prefixed hex ciphertext.
    pub encrypted_secrets: String,
}

/// Arguments of a single upload to the DON.
#[derive(Debug, Clone, Copy)]
pub struct UploadRequest<'a> {
    pub encrypted_secrets_hexstring: &'a str,
    pub gateway_urls: &'a [String],
    pub slot_id: u32,
    pub minutes_until_expiration: u64,
}

/// Outcome reported by the gateway for an upload.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UploadResult {
    pub success: bool,
    pub error_message: Option<String>,
    /// Version as reported; parsed by the caller.
    pub version: Option<String>,
    /// Gateway that answered.
    pub gateway_url: Option<String>,
    pub nodes_total: usize,
    pub nodes_succeeded: usize,
}

impl std::fmt::Display for UploadResult {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "success={} version={} nodes={}/{}",
            self.success,
            self.version.as_deref().unwrap_or("-"),
            self.nodes_succeeded,
            self.nodes_total
        )?;
        if let Some(gateway) = &self.gateway_url {
            write!(f, " gateway={}", gateway)?;
        }
        if let Some(message) = &self.error_message {
            write!(f, " error=\"{}\"", message)?;
        }
        Ok(())
    }
}

/// Errors raised by a secrets manager.
#[derive(Debug, Error)]
pub enum FunctionsError {
    #[error("secrets manager not initialized - call initialize() first")]
    NotInitialized,

    #[error(transparent)]
    Blockchain(#[from] BlockchainError),

    #[error("invalid secrets: {0}")]
    InvalidSecrets(String),

    #[error("invalid DON public key: {0}")]
    InvalidPublicKey(String),

    #[error("encryption failed: {0}")]
    Encryption(String),

    #[error("invalid upload argument: {0}")]
    InvalidArgument(String),

    #[error("gateway error: {0}")]
    Gateway(String),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Result type for secrets manager operations.
pub type FunctionsResult<T> = Result<T, FunctionsError>;
