use crate::config::types::{Config, FilesConfig, ProbeConfig};
use crate::ConfigError;
use url::Url;

/// Upper bound on the probe concurrency
pub const MAX_CONCURRENCY: usize = 10_000;

/// Validates the entire configuration
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_probe_config(&config.probe)?;
    validate_files_config(&config.files)?;
    Ok(())
}

/// Validates probe configuration
fn validate_probe_config(config: &ProbeConfig) -> Result<(), ConfigError> {
    if config.concurrency < 1 || config.concurrency > MAX_CONCURRENCY {
        return Err(ConfigError::Validation(format!(
            "concurrency must be between 1 and {}, got {}",
            MAX_CONCURRENCY, config.concurrency
        )));
    }

    if config.timeout_secs < 1 {
        return Err(ConfigError::Validation(format!(
            "timeout-secs must be >= 1, got {}",
            config.timeout_secs
        )));
    }

    let url = Url::parse(&config.resolver_url).map_err(|e| {
        ConfigError::InvalidUrl(format!("Invalid resolver-url '{}': {}", config.resolver_url, e))
    })?;

    if url.scheme() != "https" && url.scheme() != "http" {
        return Err(ConfigError::Validation(format!(
            "resolver-url must use HTTP or HTTPS, got '{}'",
            url.scheme()
        )));
    }

    if url.host_str().is_none() {
        return Err(ConfigError::InvalidUrl(format!(
            "resolver-url '{}' has no host",
            config.resolver_url
        )));
    }

    Ok(())
}

/// Validates list locations that were given
fn validate_files_config(config: &FilesConfig) -> Result<(), ConfigError> {
    for (name, path) in [
        ("input", &config.input),
        ("output", &config.output),
        ("ignore", &config.ignore),
    ] {
        if let Some(path) = path {
            if path.as_os_str().is_empty() {
                return Err(ConfigError::Validation(format!(
                    "{} path cannot be empty",
                    name
                )));
            }
        }
    }

    if let (Some(input), Some(output)) = (&config.input, &config.output) {
        if input == output {
            return Err(ConfigError::Validation(format!(
                "input and output must be different files, both are '{}'",
                input.display()
            )));
        }
    }

    Ok(())
}
