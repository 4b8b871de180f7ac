use anyhow::{Context, Result};
use clap::Parser;
use std::fs::File;
use std::path::{Path, PathBuf};

use report::{DegradationReport, MetricValue, AVERAGE_COLUMN};

#[derive(Parser)]
#[command(name = "degradation")]
#[command(about = "Compute per-metric degradation between two summary tables")]
struct Cli {
    #[arg(short, long, help = "Summary table of the baseline configuration")]
    baseline: PathBuf,

    #[arg(short, long, help = "Summary table of the configuration under comparison")]
    current: PathBuf,

    #[arg(short, long, help = "Output Parquet file for the degradation report")]
    output: PathBuf,
}

fn read_averages(path: &Path) -> Result<Vec<MetricValue>> {
    let file = File::open(path)
        .with_context(|| format!("Failed to open summary table: {}", path.display()))?;
    report::read_metric_values(file, AVERAGE_COLUMN)
        .with_context(|| format!("Failed to read summary table: {}", path.display()))
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    let baseline = read_averages(&cli.baseline)?;
    let current = read_averages(&cli.current)?;

    let degradation = DegradationReport::compute(&baseline, &current);
    println!(
        "Joined {} metrics from {} and {}",
        degradation.rows.len(),
        cli.baseline.display(),
        cli.current.display()
    );

    let output_file = File::create(&cli.output)
        .with_context(|| format!("Failed to create output file: {}", cli.output.display()))?;
    report::write_degradation(output_file, &degradation)
        .with_context(|| "Failed to write degradation report")?;

    println!("Degradation report written to {}", cli.output.display());
    Ok(())
}
