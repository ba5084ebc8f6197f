//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate addresses, identifiers and URLs before any network use
//! - Validate value ranges (timeouts > 0)
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: UploaderConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use alloy::primitives::Address;
use thiserror::Error;

use crate::config::schema::UploaderConfig;

/// Maximum DON id length; it is stored on chain as `bytes32`.
pub const MAX_DON_ID_LEN: usize = 32;

/// A single semantic problem with the configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("invalid router address '{0}'")]
    InvalidRouterAddress(String),

    #[error("DON id must be 1 to 32 bytes, got {0}")]
    InvalidDonId(usize),

    #[error("at least one gateway URL is required")]
    NoGateways,

    #[error("invalid gateway URL '{url}': {reason}")]
    InvalidGatewayUrl { url: String, reason: String },

    #[error("{0} must be greater than zero")]
    ZeroTimeout(&'static str),
}

/// Check a parsed configuration, collecting every problem found.
pub fn validate_config(config: &UploaderConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();
    let functions = &config.functions;

    if functions.router_address.parse::<Address>().is_err() {
        errors.push(ValidationError::InvalidRouterAddress(
            functions.router_address.clone(),
        ));
    }

    let don_id_len = functions.don_id.len();
    if don_id_len == 0 || don_id_len > MAX_DON_ID_LEN {
        errors.push(ValidationError::InvalidDonId(don_id_len));
    }

    if functions.gateway_urls.is_empty() {
        errors.push(ValidationError::NoGateways);
    }
    for raw in &functions.gateway_urls {
        match url::Url::parse(raw) {
            Ok(parsed) if matches!(parsed.scheme(), "http" | "https") => {}
            Ok(parsed) => errors.push(ValidationError::InvalidGatewayUrl {
                url: raw.clone(),
                reason: format!("unsupported scheme '{}'", parsed.scheme()),
            }),
            Err(e) => errors.push(ValidationError::InvalidGatewayUrl {
                url: raw.clone(),
                reason: e.to_string(),
            }),
        }
    }

    if config.blockchain.rpc_timeout_secs == 0 {
        errors.push(ValidationError::ZeroTimeout("blockchain.rpc_timeout_secs"));
    }
    if config.gateway.request_timeout_secs == 0 {
        errors.push(ValidationError::ZeroTimeout("gateway.request_timeout_secs"));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        assert!(validate_config(&UploaderConfig::default()).is_ok());
    }

    #[test]
    fn test_collects_all_errors() {
        let mut config = UploaderConfig::default();
        config.functions.router_address = "not-an-address".to_string();
        config.functions.don_id = "x".repeat(33);
        config.functions.gateway_urls = vec!["ftp://gateway".to_string(), "::".to_string()];
        config.gateway.request_timeout_secs = 0;

        let errors = validate_config(&config).unwrap_err();
        assert_eq!(errors.len(), 5);
        assert!(errors.contains(&ValidationError::InvalidDonId(33)));
        assert!(errors.contains(&ValidationError::ZeroTimeout("gateway.request_timeout_secs")));
    }

    #[test]
    fn test_empty_gateway_list() {
        let mut config = UploaderConfig::default();
        config.functions.gateway_urls.clear();
        assert_eq!(
            validate_config(&config).unwrap_err(),
            vec![ValidationError::NoGateways]
        );
    }
}
