//! Parquet persistence for the report artifacts.
//!
//! Column layouts are fixed: the summary table stores the metric name, one
//! `Iteration N` column per input file, then `Average`, `Median` and
//! `Standard Deviation`; the degradation report stores the metric name, both
//! averages and the degradation percentage. Readers are column-name driven
//! and fail with a typed error when an expected column is absent.

use std::io::Write;
use std::sync::Arc;

use arrow_array::{Array, ArrayRef, Float64Array, RecordBatch, StringArray};
use arrow_schema::{DataType, Field, Schema, SchemaRef};
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use parquet::arrow::arrow_writer::ArrowWriter;
use parquet::file::reader::ChunkReader;
use thiserror::Error;

use crate::degradation::DegradationReport;
use crate::summary::SummaryTable;

/// Metric-name column shared by both artifacts.
pub const METRIC_COLUMN: &str = "perf metric";
/// Average column of the summary table.
pub const AVERAGE_COLUMN: &str = "Average";
/// Median column of the summary table.
pub const MEDIAN_COLUMN: &str = "Median";
/// Standard deviation column of the summary table.
pub const STD_DEV_COLUMN: &str = "Standard Deviation";
/// Baseline average column of the degradation report.
pub const BASELINE_AVERAGE_COLUMN: &str = "Average_baseline";
/// Current average column of the degradation report.
pub const CURRENT_AVERAGE_COLUMN: &str = "Average_current";
/// Degradation percentage column of the degradation report.
pub const DEGRADATION_COLUMN: &str = "Degradation (%)";

fn iteration_column(index: usize) -> String {
    format!("Iteration {}", index)
}

/// Errors that can occur while reading or writing report artifacts
#[derive(Error, Debug)]
pub enum Error {
    /// An expected column is absent from an input artifact
    #[error("required column {0:?} is missing from the artifact")]
    MissingColumn(&'static str),

    /// An expected column holds a different Arrow type than the layout defines
    #[error("column {0:?} is not of the expected {1} type")]
    ColumnType(&'static str, &'static str),

    #[error("failed to read or write Parquet data: {0}")]
    Parquet(#[from] parquet::errors::ParquetError),

    #[error("failed to decode record batch: {0}")]
    Arrow(#[from] arrow_schema::ArrowError),
}

/// One (metric name, value) pair read back from an artifact's metric-keyed
/// float column. Nulls come back as `None`.
#[derive(Debug, Clone, PartialEq)]
pub struct MetricValue {
    pub metric: String,
    pub value: Option<f64>,
}

/// Writes a summary table as a Parquet artifact.
pub fn write_summary<W: Write + Send>(writer: W, table: &SummaryTable) -> Result<(), Error> {
    let mut fields = vec![Field::new(METRIC_COLUMN, DataType::Utf8, false)];
    for index in 1..=table.iteration_count {
        fields.push(Field::new(iteration_column(index), DataType::Float64, true));
    }
    fields.push(Field::new(AVERAGE_COLUMN, DataType::Float64, true));
    fields.push(Field::new(MEDIAN_COLUMN, DataType::Float64, true));
    fields.push(Field::new(STD_DEV_COLUMN, DataType::Float64, true));
    let schema = Arc::new(Schema::new(fields));

    let metric_names: StringArray = table
        .rows
        .iter()
        .map(|row| Some(row.metric.as_str()))
        .collect();
    let mut columns: Vec<ArrayRef> = vec![Arc::new(metric_names)];
    for index in 0..table.iteration_count {
        let values: Float64Array = table.rows.iter().map(|row| row.iterations[index]).collect();
        columns.push(Arc::new(values));
    }
    let averages: Float64Array = table.rows.iter().map(|row| row.average).collect();
    let medians: Float64Array = table.rows.iter().map(|row| row.median).collect();
    let std_devs: Float64Array = table.rows.iter().map(|row| row.std_dev).collect();
    columns.push(Arc::new(averages));
    columns.push(Arc::new(medians));
    columns.push(Arc::new(std_devs));

    let batch = RecordBatch::try_new(schema.clone(), columns)?;
    write_batch(writer, schema, &batch)
}

/// Writes a degradation report as a Parquet artifact.
pub fn write_degradation<W: Write + Send>(
    writer: W,
    report: &DegradationReport,
) -> Result<(), Error> {
    let schema = Arc::new(Schema::new(vec![
        Field::new(METRIC_COLUMN, DataType::Utf8, false),
        Field::new(BASELINE_AVERAGE_COLUMN, DataType::Float64, true),
        Field::new(CURRENT_AVERAGE_COLUMN, DataType::Float64, true),
        Field::new(DEGRADATION_COLUMN, DataType::Float64, true),
    ]));

    let metric_names: StringArray = report
        .rows
        .iter()
        .map(|row| Some(row.metric.as_str()))
        .collect();
    let baselines: Float64Array = report.rows.iter().map(|row| row.baseline).collect();
    let currents: Float64Array = report.rows.iter().map(|row| row.current).collect();
    let degradations: Float64Array = report.rows.iter().map(|row| row.degradation).collect();

    let batch = RecordBatch::try_new(
        schema.clone(),
        vec![
            Arc::new(metric_names),
            Arc::new(baselines),
            Arc::new(currents),
            Arc::new(degradations),
        ],
    )?;
    write_batch(writer, schema, &batch)
}

fn write_batch<W: Write + Send>(
    writer: W,
    schema: SchemaRef,
    batch: &RecordBatch,
) -> Result<(), Error> {
    let mut writer = ArrowWriter::try_new(writer, schema, None)?;
    writer.write(batch)?;
    writer.close()?;
    Ok(())
}

/// Reads the metric-name column together with one named float column from an
/// artifact.
///
/// The extractor's output is read with [`AVERAGE_COLUMN`] and the
/// degradation report with [`DEGRADATION_COLUMN`]; any other columns in the
/// file are ignored.
pub fn read_metric_values<R: ChunkReader + 'static>(
    reader: R,
    value_column: &'static str,
) -> Result<Vec<MetricValue>, Error> {
    let arrow_reader = ParquetRecordBatchReaderBuilder::try_new(reader)?.build()?;

    let mut rows = Vec::new();
    for batch in arrow_reader {
        let batch = batch?;

        let metric_col = batch
            .column_by_name(METRIC_COLUMN)
            .ok_or(Error::MissingColumn(METRIC_COLUMN))?
            .as_any()
            .downcast_ref::<StringArray>()
            .ok_or(Error::ColumnType(METRIC_COLUMN, "Utf8"))?;
        let value_col = batch
            .column_by_name(value_column)
            .ok_or(Error::MissingColumn(value_column))?
            .as_any()
            .downcast_ref::<Float64Array>()
            .ok_or(Error::ColumnType(value_column, "Float64"))?;

        for i in 0..batch.num_rows() {
            let metric = if metric_col.is_null(i) {
                String::new()
            } else {
                metric_col.value(i).to_string()
            };
            let value = if value_col.is_null(i) {
                None
            } else {
                Some(value_col.value(i))
            };
            rows.push(MetricValue { metric, value });
        }
    }
    Ok(rows)
}
