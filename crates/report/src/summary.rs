use counters::{stats, Iteration, Metric};

/// Row name of the derived instructions-per-cycle entry.
pub const IPC_ROW: &str = "IPC";
/// Row name of the derived branch-miss rate entry.
pub const BRANCH_MISS_RATE_ROW: &str = "Branch-miss Rate";

/// One row of the summary table.
///
/// Counter rows carry a value per iteration plus the derived statistics.
/// The separator row has an empty metric name and no values; the synthetic
/// ratio rows ([`IPC_ROW`], [`BRANCH_MISS_RATE_ROW`]) populate only the
/// average.
#[derive(Debug, Clone, PartialEq)]
pub struct SummaryRow {
    pub metric: String,
    pub iterations: Vec<Option<f64>>,
    pub average: Option<f64>,
    pub median: Option<f64>,
    pub std_dev: Option<f64>,
}

impl SummaryRow {
    fn empty(metric: &str, iteration_count: usize) -> Self {
        Self {
            metric: metric.to_string(),
            iterations: vec![None; iteration_count],
            average: None,
            median: None,
            std_dev: None,
        }
    }
}

/// The summary table for one measurement run: one row per allow-listed
/// metric in fixed order, followed by a blank separator row and the two
/// derived ratio rows.
#[derive(Debug, Clone, PartialEq)]
pub struct SummaryTable {
    pub iteration_count: usize,
    pub rows: Vec<SummaryRow>,
}

impl SummaryTable {
    /// Builds the summary table from the parsed iterations.
    ///
    /// Statistics are computed over the iterations where the metric was
    /// present; a metric missing from a file contributes a null, not a zero.
    /// Ratio rows with a zero or absent denominator get an absent average.
    pub fn from_iterations(iterations: &[Iteration]) -> Self {
        let iteration_count = iterations.len();
        let mut rows: Vec<SummaryRow> = Metric::ALL
            .iter()
            .map(|&metric| {
                let values: Vec<Option<f64>> =
                    iterations.iter().map(|it| it.get(metric)).collect();
                let present: Vec<f64> = values.iter().filter_map(|v| *v).collect();
                SummaryRow {
                    metric: metric.event_name().to_string(),
                    average: stats::mean(&present),
                    median: stats::median(&present),
                    std_dev: stats::std_dev(&present),
                    iterations: values,
                }
            })
            .collect();

        let average_of = |metric: Metric| {
            rows.iter()
                .find(|row| row.metric == metric.event_name())
                .and_then(|row| row.average)
        };
        let ipc = ratio(average_of(Metric::Instructions), average_of(Metric::CpuCycles));
        let branch_miss_rate = ratio(
            average_of(Metric::BranchMisses),
            average_of(Metric::BranchInstructions),
        );

        rows.push(SummaryRow::empty("", iteration_count));

        let mut ipc_row = SummaryRow::empty(IPC_ROW, iteration_count);
        ipc_row.average = ipc;
        rows.push(ipc_row);

        let mut bmr_row = SummaryRow::empty(BRANCH_MISS_RATE_ROW, iteration_count);
        bmr_row.average = branch_miss_rate;
        rows.push(bmr_row);

        Self {
            iteration_count,
            rows,
        }
    }

    /// The average column of a row, by metric name.
    pub fn average_of(&self, metric: &str) -> Option<f64> {
        self.rows
            .iter()
            .find(|row| row.metric == metric)
            .and_then(|row| row.average)
    }
}

/// Division with an absent result for zero or absent denominators.
fn ratio(numerator: Option<f64>, denominator: Option<f64>) -> Option<f64> {
    let numerator = numerator?;
    let denominator = denominator?;
    if denominator == 0.0 {
        return None;
    }
    Some(numerator / denominator)
}

#[cfg(test)]
mod tests {
    use super::*;
    use counters::parse_reader;
    use std::io::Cursor;

    fn iteration(lines: &str) -> Iteration {
        parse_reader(Cursor::new(lines)).unwrap()
    }

    #[test]
    fn test_two_file_example() {
        // Two iterations with identical cycles and instructions
        let iterations = vec![
            iteration("1000 cpu-cycles\n500 instructions\n"),
            iteration("1000 cpu-cycles\n500 instructions\n"),
        ];
        let table = SummaryTable::from_iterations(&iterations);

        assert_eq!(table.average_of("cpu-cycles"), Some(1000.0));
        assert_eq!(table.average_of("instructions"), Some(500.0));
        assert_eq!(table.average_of(IPC_ROW), Some(0.5));
    }

    #[test]
    fn test_row_order_and_separator() {
        let table = SummaryTable::from_iterations(&[iteration("1000 cpu-cycles\n")]);
        let names: Vec<&str> = table.rows.iter().map(|r| r.metric.as_str()).collect();
        assert_eq!(
            names,
            vec![
                "cpu-cycles",
                "instructions",
                "branch-instructions",
                "branch-misses",
                "cycle_activity.stalls_total",
                "misc2_retired.lfence",
                "",
                IPC_ROW,
                BRANCH_MISS_RATE_ROW,
            ]
        );
    }

    #[test]
    fn test_missing_values_ignored_in_statistics() {
        // cpu-cycles present in all three files, instructions in only one
        let iterations = vec![
            iteration("100 cpu-cycles\n700 instructions\n"),
            iteration("200 cpu-cycles\n"),
            iteration("300 cpu-cycles\n"),
        ];
        let table = SummaryTable::from_iterations(&iterations);

        assert_eq!(table.average_of("cpu-cycles"), Some(200.0));
        assert_eq!(table.average_of("instructions"), Some(700.0));

        let instructions = &table.rows[1];
        assert_eq!(instructions.iterations, vec![Some(700.0), None, None]);
        assert_eq!(instructions.median, Some(700.0));
        // A single present value has no sample standard deviation
        assert_eq!(instructions.std_dev, None);
    }

    #[test]
    fn test_std_dev_present_with_two_values() {
        let iterations = vec![iteration("100 cpu-cycles\n"), iteration("300 cpu-cycles\n")];
        let table = SummaryTable::from_iterations(&iterations);
        let cycles = &table.rows[0];
        // Sample standard deviation of {100, 300}
        assert!((cycles.std_dev.unwrap() - 141.4213562373095).abs() < 1e-9);
    }

    #[test]
    fn test_ipc_absent_on_zero_cycles() {
        let iterations = vec![iteration("0 cpu-cycles\n500 instructions\n")];
        let table = SummaryTable::from_iterations(&iterations);
        assert_eq!(table.average_of(IPC_ROW), None);
    }

    #[test]
    fn test_ratios_absent_when_inputs_missing() {
        let iterations = vec![iteration("1000 cpu-cycles\n")];
        let table = SummaryTable::from_iterations(&iterations);
        assert_eq!(table.average_of(IPC_ROW), None);
        assert_eq!(table.average_of(BRANCH_MISS_RATE_ROW), None);
    }

    #[test]
    fn test_branch_miss_rate() {
        let iterations = vec![iteration("80000 branch-instructions\n1200 branch-misses\n")];
        let table = SummaryTable::from_iterations(&iterations);
        assert_eq!(table.average_of(BRANCH_MISS_RATE_ROW), Some(1200.0 / 80000.0));
    }

    #[test]
    fn test_empty_run_has_no_statistics() {
        let table = SummaryTable::from_iterations(&[]);
        assert_eq!(table.iteration_count, 0);
        for row in &table.rows {
            assert_eq!(row.average, None);
            assert_eq!(row.median, None);
            assert_eq!(row.std_dev, None);
        }
    }
}
