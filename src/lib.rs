//! aaaa-sieve: find which URLs in a list resolve to an IPv6 address
//!
//! This crate reads a flat list of URLs, filters it against an ignore list,
//! IDNA-normalizes and deduplicates it, then asks a DNS-over-HTTPS resolver
//! for the AAAA record of every host. URLs whose host has at least one AAAA
//! answer are written to the output list, in input order.

pub mod config;
pub mod output;
pub mod probe;
pub mod storage;
pub mod url;

use thiserror::Error;

/// Main error type for aaaa-sieve operations
///
/// Only run-level failures end up here. Per-URL problems are contained in
/// [`probe::ResolveError`] and never abort a run.
#[derive(Debug, Error)]
pub enum SieveError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Storage error: {0}")]
    Storage(#[from] storage::StorageError),

    #[error("HTTP client error: {0}")]
    HttpClient(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid URL in config: {0}")]
    InvalidUrl(String),

    #[error("Missing required setting: {0}")]
    Missing(&'static str),
}

/// URL-specific errors
#[derive(Debug, Error)]
pub enum UrlError {
    #[error("Missing host in URL: {0}")]
    MissingHost(String),

    #[error("Cannot IDNA-encode host '{host}': {reason}")]
    Encoding { host: String, reason: String },
}

/// Result type alias for aaaa-sieve operations
pub type Result<T> = std::result::Result<T, SieveError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

/// Result type alias for URL operations
pub type UrlResult<T> = std::result::Result<T, UrlError>;

// Re-export commonly used types
pub use config::Config;
pub use output::RunStatistics;
pub use probe::{Orchestrator, ProbeGate, ProbeResult};
pub use storage::{FileStore, LineStore};
pub use crate::url::{normalize_entries, IgnoreList};
