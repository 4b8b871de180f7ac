//! # Report
//!
//! The tabular artifacts exchanged between the batch stages: the per-run
//! summary table produced by the extractor and the cross-run degradation
//! report produced by the calculator.
//!
//! Stages communicate only through these artifacts, persisted as Parquet
//! files with metric names as the row key. Absent values (missing readings,
//! undefined statistics, skipped degradations) are stored as nulls.

pub mod artifact;
pub mod degradation;
pub mod summary;

pub use artifact::{
    read_metric_values, write_degradation, write_summary, Error, MetricValue, AVERAGE_COLUMN,
    DEGRADATION_COLUMN, METRIC_COLUMN,
};
pub use degradation::{DegradationReport, DegradationRow, SKIP_DEGRADATION};
pub use summary::{SummaryRow, SummaryTable};
