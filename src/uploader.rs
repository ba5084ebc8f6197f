//! The upload run: credentials → encrypt → upload → report version.
//!
//! # Design Decisions
//! - Strictly sequential; every step gates the next
//! - No retries; the first error ends the run
//! - Writes progress to an injected sink and never exits the process

use std::io::Write;

use crate::config::{
    ConfigurationError, Credentials, EnvVars, UploaderConfig, MINUTES_UNTIL_EXPIRATION, SLOT_ID,
};
use crate::error::{UploaderError, UploaderResult};
use crate::functions::{FunctionsResult, SecretsManager, UploadRequest};
use crate::secrets::SecretsPayload;

/// Parse the leading decimal digits of a version string.
///
/// `"5"` and `" 17 "` parse; trailing garbage after the digits is ignored.
pub fn parse_version(raw: &str) -> Option<u64> {
    let trimmed = raw.trim_start();
    let end = trimmed
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(trimmed.len());
    trimmed[..end].parse().ok()
}

/// Encrypts the configured secrets and uploads them to the DON.
#[derive(Debug)]
pub struct SecretsUploader {
    config: UploaderConfig,
    env: EnvVars,
}

impl SecretsUploader {
    pub fn new(config: UploaderConfig, env: EnvVars) -> Self {
        Self { config, env }
    }

    pub fn config(&self) -> &UploaderConfig {
        &self.config
    }

    /// Run one upload and return the secrets version.
    ///
    /// `connect` builds the secrets manager from validated credentials; it is
    /// not called when a credential is missing.
    pub async fn run<M, F, W>(&self, connect: F, out: &mut W) -> UploaderResult<u64>
    where
        M: SecretsManager,
        F: FnOnce(&Credentials, &UploaderConfig) -> FunctionsResult<M>,
        W: Write,
    {
        let credentials = Credentials::from_env(&self.env)?;
        let secrets = SecretsPayload::from_env(&self.env);

        let mut manager = connect(&credentials, &self.config)
            .map_err(|e| ConfigurationError::InvalidCredentials(e.to_string()))?;

        manager.initialize().await.map_err(UploaderError::Network)?;

        let encrypted = manager
            .encrypt_secrets(&secrets)
            .await
            .map_err(UploaderError::Encryption)?;

        let gateway_urls = &self.config.functions.gateway_urls;
        writeln!(
            out,
            "Upload encrypted secret to gateways {}. slotId {}. Expiration in minutes: {}",
            gateway_urls.join(","),
            SLOT_ID,
            MINUTES_UNTIL_EXPIRATION
        )?;

        let result = manager
            .upload_encrypted_secrets_to_don(UploadRequest {
                encrypted_secrets_hexstring: &encrypted.encrypted_secrets,
                gateway_urls,
                slot_id: SLOT_ID,
                minutes_until_expiration: MINUTES_UNTIL_EXPIRATION,
            })
            .await
            .map_err(|e| UploaderError::Upload(e.to_string()))?;

        if !result.success {
            tracing::error!(result = %result, "Upload rejected");
            return Err(UploaderError::Upload(
                result
                    .error_message
                    .unwrap_or_else(|| "unknown error".to_string()),
            ));
        }

        let raw_version = result.version.as_deref().unwrap_or_default();
        let version = parse_version(raw_version).ok_or_else(|| {
            UploaderError::Upload(format!("gateway returned invalid version '{}'", raw_version))
        })?;

        writeln!(out, "\nSecrets uploaded successfully, response {}", result)?;

        tracing::info!(version, slot_id = SLOT_ID, "Secrets uploaded");
        writeln!(out, "Secrets version: {}", version)?;

        Ok(version)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_version() {
        assert_eq!(parse_version("3"), Some(3));
        assert_eq!(parse_version(" 1712345678"), Some(1_712_345_678));
        assert_eq!(parse_version("12abc"), Some(12));
        assert_eq!(parse_version(""), None);
        assert_eq!(parse_version("abc"), None);
        assert_eq!(parse_version("-1"), None);
    }
}
