use crate::{ConfigError, ConfigResult};
use serde::Deserialize;
use std::path::PathBuf;
use std::time::Duration;

/// Default number of probes allowed in flight at once
pub const DEFAULT_CONCURRENCY: usize = 200;

/// Default per-probe request timeout in seconds
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;

/// Default DNS-over-HTTPS endpoint (JSON API)
pub const DEFAULT_RESOLVER_URL: &str = "https://cloudflare-dns.com/dns-query";

/// Main configuration structure for aaaa-sieve
///
/// Every field is optional in the TOML file. Command-line flags are applied
/// on top of whatever the file provides.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Config {
    pub probe: ProbeConfig,
    pub files: FilesConfig,
}

/// Probe behavior configuration
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ProbeConfig {
    /// Maximum number of DNS-over-HTTPS requests in flight
    pub concurrency: usize,

    /// Per-request timeout (seconds)
    #[serde(rename = "timeout-secs")]
    pub timeout_secs: u64,

    /// DNS-over-HTTPS endpoint accepting `name` and `type` query parameters
    #[serde(rename = "resolver-url")]
    pub resolver_url: String,
}

impl ProbeConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl Default for ProbeConfig {
    fn default() -> Self {
        Self {
            concurrency: DEFAULT_CONCURRENCY,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            resolver_url: DEFAULT_RESOLVER_URL.to_string(),
        }
    }
}

/// List locations
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct FilesConfig {
    /// URL list to normalize (rewritten in place) and probe
    pub input: Option<PathBuf>,

    /// Where IPv6-capable URLs are written
    pub output: Option<PathBuf>,

    /// Optional list of prefixes to skip
    pub ignore: Option<PathBuf>,
}

/// Concrete paths for one run, after all settings have been merged
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunPaths {
    pub input: PathBuf,
    pub output: PathBuf,
    pub ignore: Option<PathBuf>,
}

impl FilesConfig {
    /// Resolves the paths for a run, failing if input or output is unset
    pub fn require(&self) -> ConfigResult<RunPaths> {
        let input = self.input.clone().ok_or(ConfigError::Missing("input path"))?;
        let output = self.output.clone().ok_or(ConfigError::Missing("output path"))?;

        Ok(RunPaths {
            input,
            output,
            ignore: self.ignore.clone(),
        })
    }
}
