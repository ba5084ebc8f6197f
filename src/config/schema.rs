//! Configuration schema definitions.
//!
//! All types derive Serde traits for deserialization from config files.
//! Every field has a default so an absent config file yields the Sepolia
//! testnet deployment.

use serde::{Deserialize, Serialize};

/// Slot the secrets are stored in on every gateway node.
pub const SLOT_ID: u32 = 0;

/// How long the DON keeps the uploaded secrets.
pub const MINUTES_UNTIL_EXPIRATION: u64 = 1440;

/// Root configuration for the uploader.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct UploaderConfig {
    /// Oracle network deployment (router, DON, gateways).
    pub functions: FunctionsConfig,

    /// RPC connection settings.
    pub blockchain: BlockchainConfig,

    /// Gateway HTTP client settings.
    pub gateway: GatewayConfig,
}

/// Oracle network deployment targeted by the upload.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
#[serde(default)]
pub struct FunctionsConfig {
    /// Functions router contract address.
    pub router_address: String,

    /// DON identifier (at most 32 bytes, right-padded on chain).
    pub don_id: String,

    /// Gateway endpoints, tried in order.
    pub gateway_urls: Vec<String>,
}

impl Default for FunctionsConfig {
    fn default() -> Self {
        Self {
            router_address: "0xb83E47C2bC239B3bf370bc41e1459A34b41238D0".to_string(),
            don_id: "fun-ethereum-sepolia-1".to_string(),
            gateway_urls: vec![
                "https://01.functions-gateway.testnet.chain.link/".to_string(),
                "https://02.functions-gateway.testnet.chain.link/".to_string(),
            ],
        }
    }
}

/// RPC connection settings. The endpoint itself comes from the environment.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct BlockchainConfig {
    /// Expected chain ID; a mismatch is logged, not fatal.
    pub chain_id: Option<u64>,

    /// RPC request timeout in seconds.
    pub rpc_timeout_secs: u64,
}

impl Default for BlockchainConfig {
    fn default() -> Self {
        Self {
            chain_id: Some(11_155_111), // Sepolia
            rpc_timeout_secs: 10,
        }
    }
}

/// Gateway HTTP client settings.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct GatewayConfig {
    /// Per-request timeout in seconds.
    pub request_timeout_secs: u64,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            request_timeout_secs: 30,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_target_sepolia() {
        let config = UploaderConfig::default();
        assert_eq!(config.functions.don_id, "fun-ethereum-sepolia-1");
        assert_eq!(config.functions.gateway_urls.len(), 2);
        assert_eq!(config.blockchain.chain_id, Some(11_155_111));
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config: UploaderConfig = toml::from_str(
            r#"
            [functions]
            don_id = "fun-polygon-amoy-1"
            "#,
        )
        .unwrap();
        assert_eq!(config.functions.don_id, "fun-polygon-amoy-1");
        assert_eq!(
            config.functions.router_address,
            FunctionsConfig::default().router_address
        );
        assert_eq!(config.gateway.request_timeout_secs, 30);
    }
}
