//! Storage module for URL lists
//!
//! This module handles reading and writing the line-oriented lists the
//! tool works on:
//! - The input list (read, then atomically rewritten in normalized form)
//! - The optional ignore list (read only)
//! - The output list (written once at the end of a run)

mod file;
mod traits;

pub use file::{FileStore, LineSource};
pub use traits::{LineStore, StorageError, StorageResult};
