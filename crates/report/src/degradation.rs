use crate::artifact::MetricValue;

/// Metrics whose degradation is never computed: raw event counts are not
/// meaningful as a ratio between runs.
pub const SKIP_DEGRADATION: [&str; 4] = [
    "cpu-cycles",
    "instructions",
    "branch-instructions",
    "branch-misses",
];

/// One row of the degradation report.
#[derive(Debug, Clone, PartialEq)]
pub struct DegradationRow {
    pub metric: String,
    pub baseline: Option<f64>,
    pub current: Option<f64>,
    /// `(baseline − current) / baseline × 100`, unrounded. Absent for
    /// skip-set metrics, zero baselines, and absent averages. The sign is
    /// interpreted per metric category at render time only.
    pub degradation: Option<f64>,
}

/// The cross-run degradation report: baseline averages joined against
/// current averages by metric name.
#[derive(Debug, Clone, PartialEq)]
pub struct DegradationReport {
    pub rows: Vec<DegradationRow>,
}

impl DegradationReport {
    /// Joins the two average columns and computes per-metric degradation.
    ///
    /// Rows with a blank metric name are discarded before the join. The join
    /// is an inner join keyed on metric name, preserving baseline row order;
    /// a metric present on only one side is dropped silently.
    pub fn compute(baseline: &[MetricValue], current: &[MetricValue]) -> Self {
        let rows = baseline
            .iter()
            .filter(|row| !row.metric.trim().is_empty())
            .filter_map(|base| {
                let curr = current
                    .iter()
                    .find(|row| row.metric == base.metric)?;
                Some(DegradationRow {
                    metric: base.metric.clone(),
                    baseline: base.value,
                    current: curr.value,
                    degradation: degradation_percent(&base.metric, base.value, curr.value),
                })
            })
            .collect();
        Self { rows }
    }
}

fn degradation_percent(
    metric: &str,
    baseline: Option<f64>,
    current: Option<f64>,
) -> Option<f64> {
    if SKIP_DEGRADATION.contains(&metric) {
        return None;
    }
    let baseline = baseline?;
    let current = current?;
    if baseline == 0.0 {
        return None;
    }
    Some((baseline - current) / baseline * 100.0)
}
