//! URL handling module for aaaa-sieve
//!
//! This module provides URL splitting, host extraction, IDNA host encoding,
//! ignore-prefix matching and the normalize/deduplicate pass run over the
//! input list before probing.

mod matcher;
mod normalize;
mod parts;

use std::collections::HashSet;

// Re-export main functions
pub use matcher::IgnoreList;
pub use normalize::{encode_host, normalize_entry};
pub use parts::{extract_host, split_url, UrlParts};

/// Result of one normalization pass
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NormalizeOutcome {
    /// Normalized, deduplicated entries in first-seen order
    pub entries: Vec<String>,

    /// Lines dropped because they matched an ignore prefix
    pub ignored: usize,

    /// Lines dropped because their normalized form was already seen
    pub duplicates: usize,

    /// Lines kept verbatim because their host could not be encoded
    pub encoding_fallbacks: usize,
}

/// Filters, IDNA-normalizes and deduplicates a list of URL lines
///
/// For each line, in order:
/// 1. Trim whitespace; blank lines are skipped
/// 2. Drop the line if it starts with any ignore prefix
/// 3. Re-encode the host; on failure keep the trimmed line verbatim
/// 4. Keep the result only if it has not been seen earlier in this pass
///
/// Encoding failures are logged and counted, never propagated. Running the
/// pass again over its own output with the same ignore list returns the
/// same entries.
///
/// # Examples
///
/// ```
/// use aaaa_sieve::url::{normalize_entries, IgnoreList};
///
/// let outcome = normalize_entries(
///     ["http://skip.com/a", "http://keep.com/a", "http://KEEP.com/a"],
///     &IgnoreList::new(["http://skip.com"]),
/// );
/// assert_eq!(outcome.entries, vec!["http://keep.com/a".to_string()]);
/// assert_eq!(outcome.ignored, 1);
/// assert_eq!(outcome.duplicates, 1);
/// ```
pub fn normalize_entries<I, S>(lines: I, ignore: &IgnoreList) -> NormalizeOutcome
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut outcome = NormalizeOutcome::default();
    let mut seen: HashSet<String> = HashSet::new();

    for line in lines {
        let line = line.as_ref().trim();
        if line.is_empty() {
            continue;
        }

        if ignore.is_ignored(line) {
            tracing::trace!("Ignoring {}", line);
            outcome.ignored += 1;
            continue;
        }

        let normalized = match normalize_entry(line) {
            Ok(n) => n,
            Err(e) => {
                tracing::warn!("Keeping '{}' unencoded: {}", line, e);
                outcome.encoding_fallbacks += 1;
                line.to_string()
            }
        };

        if seen.insert(normalized.clone()) {
            outcome.entries.push(normalized);
        } else {
            tracing::trace!("Dropping duplicate {}", normalized);
            outcome.duplicates += 1;
        }
    }

    outcome
}
