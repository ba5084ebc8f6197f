//! Oracle network secrets management.
//!
//! # Data Flow
//! ```text
//! SecretsPayload
//!     → encrypt_secrets (sign with wallet, seal to DON public key)
//!     → upload_encrypted_secrets_to_don (signed secrets_set message)
//!     → gateway.rs (POST to gateways, aggregate node responses)
//!     → UploadResult
//! ```
//!
//! [`SecretsManager`] is the seam the uploader drives; [`DonSecretsManager`]
//! is the network-backed implementation.

use std::future::Future;

pub mod encryption;
pub mod gateway;
pub mod manager;
pub mod types;

pub use gateway::GatewayClient;
pub use manager::DonSecretsManager;
pub use types::{EncryptedSecrets, FunctionsError, FunctionsResult, UploadRequest, UploadResult};

use crate::secrets::SecretsPayload;

/// Encrypts secrets for a DON and stores them on its gateway nodes.
pub trait SecretsManager {
    /// Fetch whatever the manager needs from chain. Must complete before any
    /// other call.
    fn initialize(&mut self) -> impl Future<Output = FunctionsResult<()>> + Send;

    /// Encrypt `secrets` for the DON.
    fn encrypt_secrets(
        &self,
        secrets: &SecretsPayload,
    ) -> impl Future<Output = FunctionsResult<EncryptedSecrets>> + Send;

    /// Upload previously encrypted secrets. One round trip, never retried.
    fn upload_encrypted_secrets_to_don(
        &self,
        request: UploadRequest<'_>,
    ) -> impl Future<Output = FunctionsResult<UploadResult>> + Send;
}
