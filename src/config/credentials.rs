//! Credentials sourced from the process environment.
//!
//! # Security
//! - The private key is only ever read from the environment
//! - `Credentials` never prints the key, not even in `Debug`

use std::collections::HashMap;

use thiserror::Error;

/// Environment variable holding the signing key.
pub const PRIVATE_KEY_ENV_VAR: &str = "PRIVATE_KEY";

/// Environment variable holding the JSON-RPC endpoint.
pub const RPC_URL_ENV_VAR: &str = "SEPOLIA_RPC_URL";

/// Snapshot of environment variables.
///
/// The uploader reads through this instead of `std::env` so runs can be
/// driven from tests without mutating the process environment.
#[derive(Debug, Clone, Default)]
pub struct EnvVars {
    vars: HashMap<String, String>,
}

impl EnvVars {
    /// Capture the current process environment.
    pub fn from_process() -> Self {
        Self {
            vars: std::env::vars().collect(),
        }
    }

    /// Look up a variable, treating an empty value as unset.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.vars
            .get(name)
            .map(String::as_str)
            .filter(|value| !value.is_empty())
    }
}

impl<K, V> FromIterator<(K, V)> for EnvVars
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            vars: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

/// A required credential was absent or unusable.
#[derive(Debug, Error)]
pub enum ConfigurationError {
    #[error("private key not provided - check your environment variables")]
    MissingPrivateKey,

    #[error("rpcUrl not provided - check your environment variables")]
    MissingRpcUrl,

    #[error("invalid credentials: {0}")]
    InvalidCredentials(String),

    #[error("invalid configuration: {0}")]
    Config(#[from] crate::config::loader::ConfigError),
}

/// Signing key and RPC endpoint.
#[derive(Clone)]
pub struct Credentials {
    private_key: String,
    rpc_url: String,
}

impl Credentials {
    /// Read both credentials, private key first.
    pub fn from_env(env: &EnvVars) -> Result<Self, ConfigurationError> {
        let private_key = env
            .get(PRIVATE_KEY_ENV_VAR)
            .ok_or(ConfigurationError::MissingPrivateKey)?;
        let rpc_url = env
            .get(RPC_URL_ENV_VAR)
            .ok_or(ConfigurationError::MissingRpcUrl)?;

        Ok(Self {
            private_key: private_key.to_string(),
            rpc_url: rpc_url.to_string(),
        })
    }

    pub fn private_key(&self) -> &str {
        &self.private_key
    }

    pub fn rpc_url(&self) -> &str {
        &self.rpc_url
    }
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("private_key", &"<redacted>")
            .field("rpc_url", &self.rpc_url)
            .finish()
    }
}
