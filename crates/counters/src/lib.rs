//! # Counters
//!
//! Parsing and aggregation of raw CPU performance-counter dump files.
//!
//! Each benchmark iteration produces one text file of counter readings (one
//! counter per line, as printed by `perf stat`). This crate turns a directory
//! of such files into per-iteration [`Iteration`] mappings over the fixed
//! [`Metric`] allow-list, and provides the summary statistics (mean, median,
//! sample standard deviation) computed over the iterations where a metric was
//! actually measured.

pub mod metric;
pub mod parse;
pub mod stats;

pub use metric::Metric;
pub use parse::{collect_iterations, parse_line, parse_reader, Error, Iteration};
