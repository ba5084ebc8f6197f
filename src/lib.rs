//! Encrypt credential secrets and upload them to oracle network gateways.

pub mod blockchain;
pub mod config;
pub mod error;
pub mod functions;
pub mod observability;
pub mod secrets;
pub mod uploader;

pub use config::UploaderConfig;
pub use error::{UploaderError, UploaderResult};
pub use uploader::SecretsUploader;
