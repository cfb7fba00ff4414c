//! DNS-over-HTTPS AAAA prober
//!
//! This module handles the single network operation of the tool:
//! - Building the shared HTTP client
//! - Querying the resolver's JSON API for a host's AAAA records
//! - Classifying the answer

use crate::config::ProbeConfig;
use crate::url::extract_host;
use crate::UrlError;
use reqwest::header::ACCEPT;
use reqwest::Client;
use serde::Deserialize;
use thiserror::Error;

/// Media type of the resolver's JSON response format
pub const DNS_JSON: &str = "application/dns-json";

/// Classification of one AAAA lookup
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProbeResult {
    /// The resolver returned at least one AAAA answer
    Ipv6Present {
        /// The `data` field of the first answer
        address: String,
    },

    /// The lookup succeeded but produced no usable answer
    Ipv6Absent,

    /// The resolver answered with a non-success HTTP status
    Indeterminate {
        /// The HTTP status code received
        status_code: u16,
    },
}

impl ProbeResult {
    /// Returns true if the URL belongs in the output list
    pub fn has_ipv6(&self) -> bool {
        matches!(self, Self::Ipv6Present { .. })
    }
}

/// Failure of a single probe
///
/// These never leave the probe's own URL: the orchestrator counts the URL
/// as not IPv6-capable and carries on.
#[derive(Debug, Error)]
pub enum ResolveError {
    #[error("No host to look up: {0}")]
    MissingHost(#[from] UrlError),

    #[error("Resolver request for {host} failed: {source}")]
    Request {
        host: String,
        source: reqwest::Error,
    },

    #[error("Malformed resolver response for {host}: {source}")]
    Decode {
        host: String,
        source: serde_json::Error,
    },

    #[error("Probe gate closed")]
    GateClosed,

    #[error("Probe task failed: {0}")]
    TaskFailed(String),
}

/// The subset of the resolver's JSON response that matters here
#[derive(Debug, Deserialize)]
struct DohResponse {
    #[serde(rename = "Status")]
    status: i64,

    #[serde(rename = "Answer")]
    answer: Option<Vec<serde_json::Map<String, serde_json::Value>>>,
}

/// Builds the HTTP client shared by every probe of a run
///
/// The request timeout bounds each probe so one stalled lookup cannot hold
/// up the whole run.
///
/// # Arguments
///
/// * `config` - The probe configuration
///
/// # Returns
///
/// * `Ok(Client)` - Successfully built HTTP client
/// * `Err(reqwest::Error)` - Failed to build client
pub fn build_http_client(config: &ProbeConfig) -> Result<Client, reqwest::Error> {
    let user_agent = format!("{}/{}", env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION"));

    Client::builder()
        .user_agent(user_agent)
        .timeout(config.timeout())
        .connect_timeout(config.timeout())
        .pool_max_idle_per_host(config.concurrency)
        .gzip(true)
        .brotli(true)
        .build()
}

/// Classifies a resolver JSON body
///
/// `Status` 0 with at least one `Answer` entry carrying a `data` key means
/// the host has IPv6, whatever the value. The record type is not checked:
/// only AAAA was asked for.
///
/// # Returns
///
/// * `Ok(ProbeResult)` - `Ipv6Present` or `Ipv6Absent`
/// * `Err(serde_json::Error)` - The body is not a resolver response
pub fn classify_response(body: &str) -> Result<ProbeResult, serde_json::Error> {
    let response: DohResponse = serde_json::from_str(body)?;

    if response.status != 0 {
        return Ok(ProbeResult::Ipv6Absent);
    }

    let address = response
        .answer
        .unwrap_or_default()
        .into_iter()
        .find_map(|mut answer| answer.remove("data"));

    Ok(match address {
        Some(serde_json::Value::String(address)) => ProbeResult::Ipv6Present { address },
        Some(other) => ProbeResult::Ipv6Present {
            address: other.to_string(),
        },
        None => ProbeResult::Ipv6Absent,
    })
}

/// Looks up the AAAA record for the host of `url`
///
/// # Request
///
/// `GET <resolver_url>?name=<host>&type=AAAA` with
/// `accept: application/dns-json`.
///
/// # Classification
///
/// | Condition | Result |
/// |-----------|--------|
/// | HTTP status not 2xx | `Ok(Indeterminate)` |
/// | `Status` 0 and an answer with `data` | `Ok(Ipv6Present)` |
/// | Anything else parseable | `Ok(Ipv6Absent)` |
/// | Body not valid resolver JSON | `Err(Decode)` |
/// | Connection error or timeout | `Err(Request)` |
/// | URL without a host | `Err(MissingHost)` |
///
/// # Arguments
///
/// * `client` - The shared HTTP client
/// * `resolver_url` - The DNS-over-HTTPS endpoint
/// * `url` - The URL whose host is looked up
pub async fn probe_url(
    client: &Client,
    resolver_url: &str,
    url: &str,
) -> Result<ProbeResult, ResolveError> {
    let host = extract_host(url)?;

    let response = client
        .get(resolver_url)
        .header(ACCEPT, DNS_JSON)
        .query(&[("name", host.as_str()), ("type", "AAAA")])
        .send()
        .await
        .map_err(|source| ResolveError::Request {
            host: host.clone(),
            source,
        })?;

    let status = response.status();
    if !status.is_success() {
        tracing::debug!("Resolver answered HTTP {} for {}", status.as_u16(), host);
        return Ok(ProbeResult::Indeterminate {
            status_code: status.as_u16(),
        });
    }

    let body = response.text().await.map_err(|source| ResolveError::Request {
        host: host.clone(),
        source,
    })?;

    let result = classify_response(&body).map_err(|source| ResolveError::Decode {
        host: host.clone(),
        source,
    })?;

    if let ProbeResult::Ipv6Present { address } = &result {
        tracing::debug!("Found AAAA record for {}: {}", url, address);
    }

    Ok(result)
}
