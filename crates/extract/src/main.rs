use anyhow::{Context, Result};
use clap::Parser;
use std::fs::File;
use std::path::PathBuf;

use counters::collect_iterations;
use report::SummaryTable;

#[derive(Parser)]
#[command(name = "extract")]
#[command(about = "Aggregate raw perf counter dumps into a summary table")]
struct Cli {
    #[arg(short, long, help = "Directory of .txt counter dumps, one per iteration")]
    input_dir: PathBuf,

    #[arg(short, long, help = "Output Parquet file for the summary table")]
    output: PathBuf,
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    let iterations = collect_iterations(&cli.input_dir).with_context(|| {
        format!(
            "Failed to collect counter dumps from {}",
            cli.input_dir.display()
        )
    })?;
    println!(
        "Parsed {} iteration files from {}",
        iterations.len(),
        cli.input_dir.display()
    );

    let table = SummaryTable::from_iterations(&iterations);

    let output_file = File::create(&cli.output)
        .with_context(|| format!("Failed to create output file: {}", cli.output.display()))?;
    report::write_summary(output_file, &table)
        .with_context(|| "Failed to write summary table")?;

    println!("Summary table written to {}", cli.output.display());
    Ok(())
}
