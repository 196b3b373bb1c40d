//! Naskh Core Library
//!
//! Core types, errors, and configuration for the Naskh replicated
//! key-value store.

pub mod config;
pub mod error;
pub mod types;

pub use config::{NodeConfig, NodeRole};
pub use error::{Error, Result};

/// Naskh version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Path replicas expose for incoming replication commands
pub const REPLICATE_PATH: &str = "/internal/replicate";

/// Returns the local hostname, or a fixed fallback when it cannot be read.
pub fn local_hostname() -> String {
    hostname::get()
        .map(|h| h.to_string_lossy().to_string())
        .unwrap_or_else(|_| "naskh-node".to_string())
}
