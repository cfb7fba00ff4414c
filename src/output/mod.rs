//! Output module for run reporting
//!
//! This module handles recording, logging and printing the statistics of
//! a probe run. The output list itself is written through
//! [`crate::storage::LineStore`].

pub mod stats;

pub use stats::{log_statistics, print_statistics, RunStatistics};
