//! Blockchain RPC client with timeout and error handling.
//!
//! # Responsibilities
//! - Connect to the JSON-RPC endpoint
//! - Resolve the DON coordinator through the Functions router
//! - Fetch the DON encryption keys from the coordinator
//! - Bound every call with the configured timeout

use std::fmt::Display;
use std::future::Future;
use std::time::Duration;

use alloy::primitives::Address;
use alloy::providers::{DynProvider, Provider, ProviderBuilder};
use tokio::time::timeout;

use crate::blockchain::contracts::{IFunctionsCoordinator, IFunctionsRouter};
use crate::blockchain::types::{BlockchainError, BlockchainResult, ChainId, DonId, DonKeys};
use crate::config::BlockchainConfig;

/// Blockchain RPC client wrapper.
#[derive(Clone)]
pub struct BlockchainClient {
    provider: DynProvider,
    rpc_url: String,
    config: BlockchainConfig,
    timeout_duration: Duration,
}

impl BlockchainClient {
    /// Create a new blockchain client. No request is sent until first use.
    ///
    /// # Arguments
    /// * `rpc_url` - JSON-RPC endpoint
    /// * `config` - Blockchain configuration
    pub fn new(rpc_url: &str, config: BlockchainConfig) -> BlockchainResult<Self> {
        let url: url::Url = rpc_url
            .parse()
            .map_err(|e| BlockchainError::Rpc(format!("Invalid RPC URL '{}': {}", rpc_url, e)))?;

        let provider = ProviderBuilder::new().connect_http(url).erased();

        Ok(Self {
            provider,
            rpc_url: rpc_url.to_string(),
            timeout_duration: Duration::from_secs(config.rpc_timeout_secs),
            config,
        })
    }

    /// Run an RPC future under the configured timeout.
    async fn bounded<T, E, F>(&self, call: &'static str, fut: F) -> BlockchainResult<T>
    where
        E: Display,
        F: Future<Output = Result<T, E>>,
    {
        match timeout(self.timeout_duration, fut).await {
            Ok(Ok(value)) => Ok(value),
            Ok(Err(e)) => {
                tracing::warn!(call, error = %e, "RPC call failed");
                Err(BlockchainError::Contract {
                    call,
                    reason: e.to_string(),
                })
            }
            Err(_) => {
                tracing::warn!(call, "RPC timeout");
                Err(BlockchainError::Timeout(self.timeout_duration.as_secs()))
            }
        }
    }

    /// Get the chain ID from the RPC.
    pub async fn get_chain_id(&self) -> BlockchainResult<ChainId> {
        match timeout(self.timeout_duration, self.provider.get_chain_id()).await {
            Ok(Ok(id)) => Ok(ChainId(id)),
            Ok(Err(e)) => Err(BlockchainError::Rpc(e.to_string())),
            Err(_) => Err(BlockchainError::Timeout(self.timeout_duration.as_secs())),
        }
    }

    /// Verify the connected chain ID matches configuration, if one is set.
    pub async fn verify_chain_id(&self) -> BlockchainResult<()> {
        let Some(expected) = self.config.chain_id else {
            return Ok(());
        };
        let actual = self.get_chain_id().await?;
        if actual.0 != expected {
            return Err(BlockchainError::ChainMismatch {
                expected,
                actual: actual.0,
            });
        }
        Ok(())
    }

    /// Resolve the coordinator serving `don_id` through the router.
    pub async fn get_coordinator(&self, router: Address, don_id: &str) -> BlockchainResult<Address> {
        let id = DonId::encode(don_id)?;
        let router = IFunctionsRouter::new(router, &self.provider);

        let coordinator = self
            .bounded("getContractById", async { router.getContractById(id.0).call().await })
            .await?;

        if coordinator == Address::ZERO {
            return Err(BlockchainError::UnknownDon(don_id.to_string()));
        }
        Ok(coordinator)
    }

    /// Fetch the DON and threshold public keys from a coordinator.
    pub async fn get_don_keys(&self, coordinator: Address) -> BlockchainResult<DonKeys> {
        let coordinator = IFunctionsCoordinator::new(coordinator, &self.provider);

        let don_public_key = self
            .bounded("getDONPublicKey", async { coordinator.getDONPublicKey().call().await })
            .await?;
        let threshold_public_key = self
            .bounded("getThresholdPublicKey", async {
                coordinator.getThresholdPublicKey().call().await
            })
            .await?;

        Ok(DonKeys {
            don_public_key: don_public_key.to_vec(),
            threshold_public_key: threshold_public_key.to_vec(),
        })
    }

    /// Get the configured RPC endpoint.
    pub fn rpc_url(&self) -> &str {
        &self.rpc_url
    }
}

impl std::fmt::Debug for BlockchainClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BlockchainClient")
            .field("rpc_url", &self.rpc_url)
            .field("chain_id", &self.config.chain_id)
            .field("timeout_secs", &self.config.rpc_timeout_secs)
            .finish()
    }
}
