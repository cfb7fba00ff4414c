//! Statistics for a probe run
//!
//! This module provides the per-run counters collected by the
//! orchestrator and the functions that log and print them.

use crate::probe::{ProbeOutcome, ProbeResult};
use crate::url::NormalizeOutcome;
use chrono::{DateTime, Utc};
use std::time::Duration;

/// Probe run statistics summary
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunStatistics {
    /// When the run started
    pub started_at: DateTime<Utc>,

    /// Wall-clock time of the whole run
    pub elapsed: Duration,

    /// Non-blank lines read from the input list
    pub input_lines: usize,

    /// Lines dropped by the ignore list
    pub ignored: usize,

    /// Lines dropped as duplicates after normalization
    pub duplicates: usize,

    /// Lines kept unencoded because their host could not be encoded
    pub encoding_fallbacks: usize,

    /// URLs sent to the resolver
    pub probed: usize,

    /// URLs with at least one AAAA answer
    pub ipv6_present: usize,

    /// URLs whose lookup produced no AAAA answer
    pub ipv6_absent: usize,

    /// URLs for which the resolver returned a non-success status
    pub indeterminate: usize,

    /// URLs whose probe failed outright
    pub failed: usize,

    /// Configured gate capacity
    pub concurrency: usize,

    /// Most probes observed in flight at once
    pub peak_in_flight: usize,
}

impl RunStatistics {
    /// Creates empty statistics stamped with the current time
    pub fn new(concurrency: usize) -> Self {
        Self {
            started_at: Utc::now(),
            elapsed: Duration::ZERO,
            input_lines: 0,
            ignored: 0,
            duplicates: 0,
            encoding_fallbacks: 0,
            probed: 0,
            ipv6_present: 0,
            ipv6_absent: 0,
            indeterminate: 0,
            failed: 0,
            concurrency,
            peak_in_flight: 0,
        }
    }

    /// Records the counters of the normalization pass
    pub fn record_normalization(&mut self, input_lines: usize, outcome: &NormalizeOutcome) {
        self.input_lines = input_lines;
        self.ignored = outcome.ignored;
        self.duplicates = outcome.duplicates;
        self.encoding_fallbacks = outcome.encoding_fallbacks;
    }

    /// Records one probe outcome
    pub fn record_probe(&mut self, outcome: &ProbeOutcome) {
        self.probed += 1;
        match outcome {
            Ok(ProbeResult::Ipv6Present { .. }) => self.ipv6_present += 1,
            Ok(ProbeResult::Ipv6Absent) => self.ipv6_absent += 1,
            Ok(ProbeResult::Indeterminate { .. }) => self.indeterminate += 1,
            Err(_) => self.failed += 1,
        }
    }

    /// Share of probed URLs that have IPv6, as a percentage
    pub fn ipv6_rate(&self) -> f64 {
        if self.probed > 0 {
            (self.ipv6_present as f64 / self.probed as f64) * 100.0
        } else {
            0.0
        }
    }

    /// Probes completed per second over the whole run
    pub fn probes_per_second(&self) -> f64 {
        let secs = self.elapsed.as_secs_f64();
        if secs > 0.0 {
            self.probed as f64 / secs
        } else {
            0.0
        }
    }
}

/// Logs a one-line summary of a run
pub fn log_statistics(stats: &RunStatistics) {
    tracing::info!(
        "Run finished in {:.2}s: {} probed, {} with IPv6, {} without, {} indeterminate, {} failed (~{:.2} probes/sec, peak {} of {} in flight)",
        stats.elapsed.as_secs_f64(),
        stats.probed,
        stats.ipv6_present,
        stats.ipv6_absent,
        stats.indeterminate,
        stats.failed,
        stats.probes_per_second(),
        stats.peak_in_flight,
        stats.concurrency
    );
}

/// Prints statistics to stdout in a formatted manner
///
/// # Arguments
///
/// * `stats` - The statistics to display
pub fn print_statistics(stats: &RunStatistics) {
    println!("=== Probe Statistics ===\n");

    println!("Input:");
    println!("  Started at: {}", stats.started_at.to_rfc3339());
    println!("  Lines read: {}", stats.input_lines);
    println!("  Ignored: {}", stats.ignored);
    println!("  Duplicates removed: {}", stats.duplicates);
    println!("  Kept unencoded: {}", stats.encoding_fallbacks);
    println!();

    println!("Probes:");
    println!("  Probed: {}", stats.probed);
    println!("  IPv6 present: {}", stats.ipv6_present);
    println!("  IPv6 absent: {}", stats.ipv6_absent);
    println!("  Indeterminate: {}", stats.indeterminate);
    println!("  Failed: {}", stats.failed);
    println!(
        "  Peak in flight: {} (limit {})",
        stats.peak_in_flight, stats.concurrency
    );
    println!();

    println!(
        "IPv6 Rate: {:.1}% ({} / {} URLs) in {:.2}s",
        stats.ipv6_rate(),
        stats.ipv6_present,
        stats.probed,
        stats.elapsed.as_secs_f64()
    );
}
