//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! optional TOML file (--config)        process environment
//!     → loader.rs (parse & deserialize)    → credentials.rs (key, RPC URL)
//!     → validation.rs (semantic checks)
//!     → UploaderConfig (validated, immutable)
//! ```
//!
//! # Design Decisions
//! - Config is immutable once loaded
//! - All fields have defaults; the defaults are the Sepolia deployment
//! - Secrets and credentials never live in the config file

pub mod credentials;
pub mod loader;
pub mod schema;
pub mod validation;

pub use credentials::{ConfigurationError, Credentials, EnvVars};
pub use loader::{load_config, load_or_default, ConfigError};
pub use schema::{
    BlockchainConfig, FunctionsConfig, GatewayConfig, UploaderConfig, MINUTES_UNTIL_EXPIRATION,
    SLOT_ID,
};
