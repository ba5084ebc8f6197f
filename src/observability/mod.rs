//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! All subsystems produce:
//!     → logging.rs (structured log events on stderr)
//! ```
//!
//! # Design Decisions
//! - Never log private keys or secret values; log names and addresses only

pub mod logging;
