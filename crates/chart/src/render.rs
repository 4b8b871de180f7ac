use anyhow::{anyhow, Result};
use plotters::prelude::*;
use std::path::Path;

use report::MetricValue;

/// Report metric name → chart display name, in chart slot order.
pub const METRIC_NAME_MAPPING: [(&str, &str); 4] = [
    ("IPC", "IPC (Instructions per Cycle)"),
    ("Branch-miss Rate", "Branch-miss Rate"),
    ("cycle_activity.stalls_total", "Stall Cycles"),
    ("misc2_retired.lfence", "LFENCE Barrier Rate"),
];

/// Output resolution of the rendered PNG.
const RESOLUTION: (u32, u32) = (3000, 2000);

/// One bar color per configuration, cycled when there are more
/// configurations than colors.
const PALETTE: [RGBColor; 4] = [
    RGBColor(44, 160, 44),
    RGBColor(227, 119, 194),
    RGBColor(255, 127, 14),
    RGBColor(31, 119, 180),
];

/// Which sign of a degradation percentage marks a regression for a metric.
///
/// The stored degradation is always `(baseline − current) / baseline × 100`,
/// so for IPC a positive value means the ratio dropped (worse), while for
/// stall/miss/lfence-style counters a negative value means the counter grew
/// (worse). The interpretation lives here, not in the data.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum LabelSign {
    /// Positive change is a regression (the IPC metric)
    Inverted,
    /// Negative change is a regression (all other metrics)
    Normal,
}

impl LabelSign {
    pub fn for_metric(display_name: &str) -> Self {
        if display_name.contains("IPC") {
            LabelSign::Inverted
        } else {
            LabelSign::Normal
        }
    }

    pub fn is_regression(&self, value: f64) -> bool {
        match self {
            LabelSign::Inverted => value > 0.0,
            LabelSign::Normal => value < 0.0,
        }
    }
}

/// The plottable degradation values of one named configuration, as
/// (chart slot, value) pairs in slot order.
#[derive(Debug, Clone, PartialEq)]
pub struct ConfigSeries {
    pub name: String,
    pub values: Vec<(usize, f64)>,
}

/// Selects and reorders one configuration's degradation rows for plotting.
///
/// Rows outside the metric mapping and rows with an absent degradation value
/// are dropped.
pub fn prepare_series(name: &str, rows: &[MetricValue]) -> ConfigSeries {
    let mut values: Vec<(usize, f64)> = rows
        .iter()
        .filter_map(|row| {
            let slot = METRIC_NAME_MAPPING
                .iter()
                .position(|(source, _)| *source == row.metric)?;
            Some((slot, row.value?))
        })
        .collect();
    values.sort_by_key(|&(slot, _)| slot);
    ConfigSeries {
        name: name.to_string(),
        values,
    }
}

/// Draws the grouped bar chart and writes it as a PNG.
pub fn render(series: &[ConfigSeries], output: &Path) -> Result<()> {
    let all_values: Vec<f64> = series
        .iter()
        .flat_map(|config| config.values.iter().map(|&(_, value)| value))
        .collect();
    if all_values.is_empty() {
        return Err(anyhow!("No degradation values to plot"));
    }

    // Keep the zero axis inside the plot and leave headroom for the labels
    let low = all_values.iter().cloned().fold(0.0_f64, f64::min);
    let high = all_values.iter().cloned().fold(0.0_f64, f64::max);
    let padding = (high - low).max(1.0) * 0.15;
    let y_range = (low - padding)..(high + padding);

    let metric_count = METRIC_NAME_MAPPING.len();
    let root = BitMapBackend::new(output, RESOLUTION).into_drawing_area();
    root.fill(&WHITE)
        .map_err(|e| anyhow!("Failed to fill chart background: {}", e))?;

    let mut chart = ChartBuilder::on(&root)
        .caption("Performance Degradation Across Kernels", ("sans-serif", 64))
        .margin(30)
        .x_label_area_size(90)
        .y_label_area_size(130)
        .build_cartesian_2d(0f64..metric_count as f64, y_range.clone())
        .map_err(|e| anyhow!("Failed to build chart axes: {}", e))?;

    chart
        .configure_mesh()
        .disable_x_mesh()
        .x_desc("Perf Metric")
        .y_desc("Degradation (%)")
        .x_labels(metric_count)
        .x_label_formatter(&|x| {
            METRIC_NAME_MAPPING
                .get(x.floor() as usize)
                .map(|(_, display)| display.to_string())
                .unwrap_or_default()
        })
        .label_style(("sans-serif", 34))
        .axis_desc_style(("sans-serif", 42))
        .draw()
        .map_err(|e| anyhow!("Failed to draw chart mesh: {}", e))?;

    // Each metric slot is one unit wide; the configurations share 80% of it
    let bar_width = 0.8 / series.len() as f64;

    for (config_index, config) in series.iter().enumerate() {
        let color = PALETTE[config_index % PALETTE.len()];
        chart
            .draw_series(config.values.iter().map(|&(slot, value)| {
                let x0 = slot as f64 + 0.1 + config_index as f64 * bar_width;
                let x1 = x0 + bar_width * 0.9;
                Rectangle::new([(x0, 0.0), (x1, value)], color.filled())
            }))
            .map_err(|e| anyhow!("Failed to draw bars for {}: {}", config.name, e))?
            .label(config.name.clone())
            .legend(move |(x, y)| {
                Rectangle::new([(x, y - 10), (x + 20, y + 10)], color.filled())
            });
    }

    chart
        .draw_series(LineSeries::new(
            vec![(0.0, 0.0), (metric_count as f64, 0.0)],
            BLACK.stroke_width(3),
        ))
        .map_err(|e| anyhow!("Failed to draw zero line: {}", e))?;

    // Value labels at the end of each bar, colored by the sign policy
    let label_offset = (y_range.end - y_range.start) * 0.012;
    for (config_index, config) in series.iter().enumerate() {
        for &(slot, value) in &config.values {
            let sign = LabelSign::for_metric(METRIC_NAME_MAPPING[slot].1);
            let color = if sign.is_regression(value) { RED } else { GREEN };
            let x = slot as f64 + 0.1 + config_index as f64 * bar_width;
            let y = if value >= 0.0 {
                value + label_offset
            } else {
                value - label_offset
            };
            chart
                .draw_series(std::iter::once(Text::new(
                    format!("{:.2}%", value),
                    (x, y),
                    ("sans-serif", 28).into_font().color(&color),
                )))
                .map_err(|e| anyhow!("Failed to draw value label: {}", e))?;
        }
    }

    chart
        .configure_series_labels()
        .position(SeriesLabelPosition::LowerLeft)
        .label_font(("sans-serif", 36))
        .background_style(&WHITE.mix(0.8))
        .border_style(&BLACK)
        .draw()
        .map_err(|e| anyhow!("Failed to draw legend: {}", e))?;

    root.present()
        .map_err(|e| anyhow!("Failed to write chart to {}: {}", output.display(), e))?;
    Ok(())
}
