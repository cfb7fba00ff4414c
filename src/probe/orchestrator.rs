//! Probe orchestrator - main run logic
//!
//! This module ties the pieces of a run together:
//! - Normalizing the input list and atomically rewriting it
//! - Fanning out one gated probe task per URL
//! - Fanning the results back in, in input order
//! - Writing the IPv6-capable URLs to the output list

use crate::config::ProbeConfig;
use crate::output::{log_statistics, RunStatistics};
use crate::probe::gate::ProbeGate;
use crate::probe::resolver::{build_http_client, probe_url, ProbeResult, ResolveError};
use crate::probe::ProbeOutcome;
use crate::storage::LineStore;
use crate::url::{normalize_entries, IgnoreList, NormalizeOutcome};
use crate::SieveError;
use reqwest::Client;
use std::sync::Arc;
use std::time::Instant;

/// Main probe orchestrator structure
///
/// One orchestrator owns the shared HTTP client and the probe gate for a
/// run. Both are shared with probe tasks by cheap handle clones.
pub struct Orchestrator {
    client: Client,
    gate: Arc<ProbeGate>,
    resolver_url: Arc<str>,
    config: ProbeConfig,
}

impl Orchestrator {
    /// Creates a new orchestrator
    ///
    /// # Arguments
    ///
    /// * `config` - The probe configuration
    ///
    /// # Returns
    ///
    /// * `Ok(Orchestrator)` - Successfully created orchestrator
    /// * `Err(SieveError)` - The HTTP client could not be built
    pub fn new(config: ProbeConfig) -> Result<Self, SieveError> {
        let client = build_http_client(&config)?;
        Ok(Self::with_client(config, client))
    }

    /// Creates an orchestrator around an existing HTTP client
    pub fn with_client(config: ProbeConfig, client: Client) -> Self {
        Self {
            client,
            gate: Arc::new(ProbeGate::new(config.concurrency)),
            resolver_url: Arc::from(config.resolver_url.as_str()),
            config,
        }
    }

    /// The gate bounding this orchestrator's probes
    pub fn gate(&self) -> &ProbeGate {
        &self.gate
    }

    pub fn config(&self) -> &ProbeConfig {
        &self.config
    }

    /// Runs a complete probe operation
    ///
    /// 1. Read the input (and ignore list, if any), normalize and dedupe it
    /// 2. Atomically replace the input with the normalized list
    /// 3. Probe every URL through the gate
    /// 4. Wait for every probe to finish
    /// 5. Write the IPv6-capable URLs, in input order, to `output`
    ///
    /// Storage failures abort the run. Probe failures only affect their
    /// own URL, which is left out of the output.
    ///
    /// # Arguments
    ///
    /// * `input` - The URL list; rewritten in normalized form
    /// * `output` - Receives the IPv6-capable URLs
    /// * `ignore` - Optional list of prefixes to skip
    ///
    /// # Returns
    ///
    /// * `Ok(RunStatistics)` - The run completed
    /// * `Err(SieveError)` - A list could not be read or written
    pub async fn run(
        &self,
        input: &dyn LineStore,
        output: &dyn LineStore,
        ignore: Option<&dyn LineStore>,
    ) -> Result<RunStatistics, SieveError> {
        let start = Instant::now();
        let mut stats = RunStatistics::new(self.gate.capacity());

        let (input_lines, normalized) = prepare(input, ignore)?;
        stats.record_normalization(input_lines, &normalized);

        input.write_lines(&normalized.entries)?;
        tracing::info!(
            "Normalized {}: {} lines -> {} URLs ({} ignored, {} duplicates)",
            input.describe(),
            input_lines,
            normalized.entries.len(),
            normalized.ignored,
            normalized.duplicates
        );

        let urls = normalized.entries;
        let outcomes = self.probe_all(&urls).await;

        let mut ipv6_urls = Vec::new();
        for (url, outcome) in urls.iter().zip(&outcomes) {
            stats.record_probe(outcome);
            if matches!(outcome, Ok(result) if result.has_ipv6()) {
                ipv6_urls.push(url.clone());
            }
        }

        output.write_lines(&ipv6_urls)?;
        tracing::info!(
            "Wrote {} IPv6-capable URLs to {}",
            ipv6_urls.len(),
            output.describe()
        );

        stats.peak_in_flight = self.gate.peak();
        stats.elapsed = start.elapsed();
        log_statistics(&stats);

        Ok(stats)
    }

    /// Probes every URL concurrently, bounded by the gate
    ///
    /// One task is spawned per URL, in order. Results are collected only
    /// after every task has finished and are index-aligned with `urls`.
    /// A panicking task yields `Err(ResolveError::TaskFailed)` for its URL.
    pub async fn probe_all(&self, urls: &[String]) -> Vec<ProbeOutcome> {
        tracing::info!(
            "Probing {} URLs via {} (at most {} in flight)",
            urls.len(),
            self.resolver_url,
            self.gate.capacity()
        );

        let mut handles = Vec::with_capacity(urls.len());
        for url in urls {
            let client = self.client.clone();
            let gate = Arc::clone(&self.gate);
            let resolver_url = Arc::clone(&self.resolver_url);
            let url = url.clone();

            handles.push(tokio::spawn(async move {
                let _permit = gate.acquire().await.map_err(|_| ResolveError::GateClosed)?;
                probe_url(&client, &resolver_url, &url).await
            }));
        }

        let mut outcomes = Vec::with_capacity(handles.len());
        for (url, handle) in urls.iter().zip(handles) {
            let outcome = match handle.await {
                Ok(outcome) => outcome,
                Err(e) => Err(ResolveError::TaskFailed(e.to_string())),
            };

            match &outcome {
                Ok(ProbeResult::Ipv6Present { .. }) => tracing::info!("IPv6: {}", url),
                Ok(ProbeResult::Ipv6Absent) => tracing::debug!("No AAAA record for {}", url),
                Ok(ProbeResult::Indeterminate { status_code }) => {
                    tracing::debug!("Indeterminate result for {} (HTTP {})", url, status_code)
                }
                Err(e) => tracing::warn!("Probe failed for {}: {}", url, e),
            }

            outcomes.push(outcome);
        }

        outcomes
    }
}

/// Reads and normalizes the input without writing anything
///
/// # Returns
///
/// * `Ok((usize, NormalizeOutcome))` - Number of lines read and the result
/// * `Err(SieveError)` - The input or ignore list could not be read
pub fn prepare(
    input: &dyn LineStore,
    ignore: Option<&dyn LineStore>,
) -> Result<(usize, NormalizeOutcome), SieveError> {
    let lines = input.read_lines()?;

    let ignore = match ignore {
        Some(store) => {
            let prefixes = IgnoreList::new(store.read_lines()?);
            tracing::debug!("Loaded {} ignore prefixes from {}", prefixes.len(), store.describe());
            prefixes
        }
        None => IgnoreList::default(),
    };

    let outcome = normalize_entries(&lines, &ignore);
    Ok((lines.len(), outcome))
}
