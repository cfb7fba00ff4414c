//! Configuration module for aaaa-sieve
//!
//! This module handles loading, parsing, and validating TOML configuration
//! files. All settings have defaults, so a config file is optional.
//!
//! # Example
//!
//! ```no_run
//! use aaaa_sieve::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("aaaa-sieve.toml")).unwrap();
//! println!("Resolver: {}", config.probe.resolver_url);
//! ```

mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{
    Config, FilesConfig, ProbeConfig, RunPaths, DEFAULT_CONCURRENCY, DEFAULT_RESOLVER_URL,
    DEFAULT_TIMEOUT_SECS,
};

// Re-export parser and validation functions
pub use parser::{load_config, parse_config};
pub use validation::{validate, MAX_CONCURRENCY};
