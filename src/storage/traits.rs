//! Storage traits and error types
//!
//! This module defines the trait interface for line-oriented list storage
//! and associated error types.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur during storage operations
///
/// All of these are fatal for a run: without its input, or without a place
/// to put results, there is nothing useful left to do.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to replace {path}: {source}")]
    Persist {
        path: PathBuf,
        source: std::io::Error,
    },
}

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

/// Trait for list storage backends
///
/// A list is UTF-8 text with one entry per line. Readers see trimmed,
/// non-blank lines. Writers replace the whole list at once.
pub trait LineStore {
    /// Reads every entry, trimmed, in stored order
    fn read_lines(&self) -> StorageResult<Vec<String>>;

    /// Replaces the stored list with `lines`
    ///
    /// Each entry is written followed by a newline. Implementations must
    /// never leave a partially written list visible: either the old list or
    /// the complete new one is observable at any time.
    fn write_lines(&self, lines: &[String]) -> StorageResult<()>;

    /// A human-readable location for log messages
    fn describe(&self) -> String;
}
