//! Top-level error type of an upload run.

use thiserror::Error;

use crate::config::ConfigurationError;
use crate::functions::FunctionsError;

/// Every way a run can fail. None of them is retried.
#[derive(Debug, Error)]
pub enum UploaderError {
    /// Missing or unusable credentials or configuration.
    #[error(transparent)]
    Configuration(#[from] ConfigurationError),

    /// Secrets manager could not initialize against the chain.
    #[error("failed to initialize secrets manager: {0}")]
    Network(#[source] FunctionsError),

    /// Encrypting the secrets failed.
    #[error("failed to encrypt secrets: {0}")]
    Encryption(#[source] FunctionsError),

    /// Upload rejected, failed, or returned an unusable version.
    #[error("Failed to upload secrets: {0}")]
    Upload(String),

    /// Progress output could not be written.
    #[error("failed to write output: {0}")]
    Output(#[from] std::io::Error),
}

/// Result type for an upload run.
pub type UploaderResult<T> = Result<T, UploaderError>;
