//! Secret values collected for upload.
//!
//! Values are only held for the duration of a run and never logged.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::config::EnvVars;

/// Secret name → environment variable it is read from.
pub const SECRET_ENV_VARS: [(&str, &str); 2] = [
    ("alpacaKey", "ALPACA_API_KEY"),
    ("alpacaSecret", "ALPACA_SECRET_KEY"),
];

/// Mapping of secret name to secret value.
#[derive(Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct SecretsPayload(BTreeMap<String, String>);

impl SecretsPayload {
    /// Collect every entry of [`SECRET_ENV_VARS`]; unset variables become `""`.
    pub fn from_env(env: &EnvVars) -> Self {
        SECRET_ENV_VARS
            .iter()
            .map(|(name, var)| (*name, env.get(var).unwrap_or_default()))
            .collect()
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.0.get(name).map(String::as_str)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Compact JSON object, keys in sorted order.
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}

impl<K, V> FromIterator<(K, V)> for SecretsPayload
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect())
    }
}

impl std::fmt::Debug for SecretsPayload {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_set().entries(self.names()).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_values_default_to_empty() {
        let payload = SecretsPayload::from_env(&EnvVars::default());
        assert_eq!(payload.len(), 2);
        assert_eq!(payload.get("alpacaKey"), Some(""));
        assert_eq!(payload.get("alpacaSecret"), Some(""));
    }

    #[test]
    fn test_values_read_from_env() {
        let env: EnvVars = [("ALPACA_API_KEY", "key-1"), ("ALPACA_SECRET_KEY", "secret-1")]
            .into_iter()
            .collect();
        let payload = SecretsPayload::from_env(&env);
        assert_eq!(
            payload.to_json().unwrap(),
            r#"{"alpacaKey":"key-1","alpacaSecret":"secret-1"}"#
        );
    }

    #[test]
    fn test_debug_hides_values() {
        let payload: SecretsPayload = [("alpacaKey", "hunter2")].into_iter().collect();
        let debug = format!("{:?}", payload);
        assert!(debug.contains("alpacaKey"));
        assert!(!debug.contains("hunter2"));
    }
}
