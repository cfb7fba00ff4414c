//! Probe module for AAAA lookups
//!
//! This module contains the core probing logic, including:
//! - The gate bounding concurrent resolver requests
//! - DNS-over-HTTPS lookups and answer classification
//! - Overall run orchestration and order-preserving fan-in

mod gate;
mod orchestrator;
mod resolver;

pub use gate::{GatePermit, ProbeGate};
pub use orchestrator::{prepare, Orchestrator};
pub use resolver::{
    build_http_client, classify_response, probe_url, ProbeResult, ResolveError, DNS_JSON,
};

/// Outcome of probing one URL
pub type ProbeOutcome = Result<ProbeResult, ResolveError>;

use crate::config::ProbeConfig;
use crate::storage::LineStore;
use crate::{RunStatistics, SieveError};

/// Runs a complete probe operation with a fresh orchestrator
///
/// This is the main entry point for library users. See
/// [`Orchestrator::run`] for the steps involved.
///
/// # Example
///
/// ```no_run
/// use aaaa_sieve::config::ProbeConfig;
/// use aaaa_sieve::probe::check_links;
/// use aaaa_sieve::storage::FileStore;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let input = FileStore::new("urls.txt");
/// let output = FileStore::new("ipv6.txt");
/// let stats = check_links(ProbeConfig::default(), &input, &output, None).await?;
/// println!("{} of {} URLs have IPv6", stats.ipv6_present, stats.probed);
/// # Ok(())
/// # }
/// ```
pub async fn check_links(
    config: ProbeConfig,
    input: &dyn LineStore,
    output: &dyn LineStore,
    ignore: Option<&dyn LineStore>,
) -> Result<RunStatistics, SieveError> {
    let orchestrator = Orchestrator::new(config)?;
    orchestrator.run(input, output, ignore).await
}
