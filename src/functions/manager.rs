//! Secrets manager backed by the on-chain coordinator and the DON gateways.

use std::time::{Duration, SystemTime, UNIX_EPOCH};

use alloy::primitives::Address;

use crate::blockchain::{BlockchainClient, BlockchainError, DonKeys, Wallet};
use crate::config::{Credentials, UploaderConfig};
use crate::functions::encryption;
use crate::functions::gateway::{GatewayClient, SecretsSetArgs};
use crate::functions::types::{
    EncryptedSecrets, FunctionsError, FunctionsResult, UploadRequest, UploadResult,
};
use crate::functions::SecretsManager;
use crate::secrets::SecretsPayload;

/// Shortest expiration the gateways accept.
pub const MIN_MINUTES_UNTIL_EXPIRATION: u64 = 5;

/// Secrets manager for one router / DON pair, signing as one wallet.
#[derive(Debug)]
pub struct DonSecretsManager {
    client: BlockchainClient,
    gateway: GatewayClient,
    wallet: Wallet,
    router_address: Address,
    don_id: String,
    keys: Option<DonKeys>,
}

impl DonSecretsManager {
    /// Build the signer, RPC provider and gateway client. Sends no requests.
    pub fn connect(credentials: &Credentials, config: &UploaderConfig) -> FunctionsResult<Self> {
        let wallet = Wallet::from_private_key(credentials.private_key())?;
        let client = BlockchainClient::new(credentials.rpc_url(), config.blockchain.clone())?;
        let router_address: Address = config.functions.router_address.parse().map_err(|e| {
            FunctionsError::InvalidArgument(format!(
                "invalid router address '{}': {}",
                config.functions.router_address, e
            ))
        })?;
        let gateway = GatewayClient::new(
            wallet.clone(),
            &config.functions.don_id,
            Duration::from_secs(config.gateway.request_timeout_secs),
        )?;

        Ok(Self {
            client,
            gateway,
            wallet,
            router_address,
            don_id: config.functions.don_id.clone(),
            keys: None,
        })
    }

    fn keys(&self) -> FunctionsResult<&DonKeys> {
        self.keys.as_ref().ok_or(FunctionsError::NotInitialized)
    }

    fn now() -> FunctionsResult<Duration> {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map_err(|_| FunctionsError::InvalidArgument("system clock is before 1970".to_string()))
    }
}

impl SecretsManager for DonSecretsManager {
    async fn initialize(&mut self) -> FunctionsResult<()> {
        match self.client.verify_chain_id().await {
            Ok(()) => {}
            Err(e @ BlockchainError::ChainMismatch { .. }) => {
                tracing::warn!(error = %e, "Connected to an unexpected chain");
            }
            Err(e) => return Err(e.into()),
        }

        let coordinator = self
            .client
            .get_coordinator(self.router_address, &self.don_id)
            .await?;
        let keys = self.client.get_don_keys(coordinator).await?;
        encryption::parse_don_public_key(&keys.don_public_key)?;

        tracing::info!(
            router = %self.router_address,
            coordinator = %coordinator,
            don_id = %self.don_id,
            signer = %self.wallet.address(),
            "Secrets manager initialized"
        );
        self.keys = Some(keys);
        Ok(())
    }

    async fn encrypt_secrets(&self, secrets: &SecretsPayload) -> FunctionsResult<EncryptedSecrets> {
        let keys = self.keys()?;
        if secrets.is_empty() {
            return Err(FunctionsError::InvalidSecrets("secrets object is empty".to_string()));
        }

        let message = secrets.to_json()?;
        let signature = self.wallet.sign_message_hex(message.as_bytes()).await?;
        let signed = serde_json::json!({ "message": message, "signature": signature }).to_string();

        let envelope = encryption::seal(keys, signed.as_bytes())?;
        tracing::debug!(
            secrets = secrets.len(),
            ciphertext_bytes = envelope.len(),
            "Secrets encrypted"
        );

        Ok(EncryptedSecrets {
            encrypted_secrets: alloy::hex::encode_prefixed(envelope),
        })
    }

    async fn upload_encrypted_secrets_to_don(
        &self,
        request: UploadRequest<'_>,
    ) -> FunctionsResult<UploadResult> {
        self.keys()?;

        let hex = request.encrypted_secrets_hexstring;
        if !hex.starts_with("0x") {
            return Err(FunctionsError::InvalidArgument(
                "encrypted secrets must be a 0x-prefixed hex string".to_string(),
            ));
        }
        let ciphertext = alloy::hex::decode(hex)
            .map_err(|e| FunctionsError::InvalidArgument(format!("encrypted secrets: {}", e)))?;
        if request.gateway_urls.is_empty() {
            return Err(FunctionsError::InvalidArgument(
                "at least one gateway URL is required".to_string(),
            ));
        }
        if request.minutes_until_expiration < MIN_MINUTES_UNTIL_EXPIRATION {
            return Err(FunctionsError::InvalidArgument(format!(
                "expiration must be at least {} minutes",
                MIN_MINUTES_UNTIL_EXPIRATION
            )));
        }

        let now = Self::now()?;
        let args = SecretsSetArgs {
            slot_id: request.slot_id,
            version: now.as_secs(),
            expiration_ms: now.as_millis() as u64 + request.minutes_until_expiration * 60_000,
        };

        let message = self.gateway.build_request(&ciphertext, args).await?;
        self.gateway.send(&message, request.gateway_urls).await
    }
}
