use anyhow::{anyhow, Context, Result};
use clap::Parser;
use std::fs::File;
use std::path::PathBuf;

use report::DEGRADATION_COLUMN;

mod render;
use render::{prepare_series, METRIC_NAME_MAPPING};

#[derive(Parser)]
#[command(name = "chart")]
#[command(about = "Render a grouped bar chart of degradation across kernel configurations")]
struct Cli {
    #[arg(
        short = 'c',
        long = "config",
        value_name = "NAME=PATH",
        required = true,
        help = "Named degradation report, e.g. \"Secure Kernel=secure.parquet\"; repeatable, ordered"
    )]
    configs: Vec<String>,

    #[arg(short, long, help = "Output PNG file for the chart")]
    output: PathBuf,
}

fn parse_config(arg: &str) -> Result<(String, PathBuf)> {
    let (name, path) = arg
        .split_once('=')
        .ok_or_else(|| anyhow!("Expected NAME=PATH, got {:?}", arg))?;
    if name.trim().is_empty() || path.trim().is_empty() {
        return Err(anyhow!("Expected NAME=PATH, got {:?}", arg));
    }
    Ok((name.to_string(), PathBuf::from(path)))
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    let mut series = Vec::with_capacity(cli.configs.len());
    for arg in &cli.configs {
        let (name, path) = parse_config(arg)?;
        let file = File::open(&path)
            .with_context(|| format!("Failed to open degradation report: {}", path.display()))?;
        let rows = report::read_metric_values(file, DEGRADATION_COLUMN)
            .with_context(|| format!("Failed to read degradation report: {}", path.display()))?;

        let config = prepare_series(&name, &rows);
        println!(
            "{}: {} of {} chart metrics present in {}",
            name,
            config.values.len(),
            METRIC_NAME_MAPPING.len(),
            path.display()
        );
        series.push(config);
    }

    render::render(&series, &cli.output)?;
    println!("Chart written to {}", cli.output.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_config() {
        let (name, path) = parse_config("Secure Kernel=reports/secure.parquet").unwrap();
        assert_eq!(name, "Secure Kernel");
        assert_eq!(path, PathBuf::from("reports/secure.parquet"));
    }

    #[test]
    fn test_parse_config_rejects_malformed_args() {
        assert!(parse_config("no-separator").is_err());
        assert!(parse_config("=path.parquet").is_err());
        assert!(parse_config("Name=").is_err());
    }
}
