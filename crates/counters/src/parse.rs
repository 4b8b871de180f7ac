use std::collections::BTreeMap;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};

use log::debug;
use thiserror::Error;

use crate::metric::Metric;

/// Errors that can occur while collecting raw counter dumps
#[derive(Error, Debug)]
pub enum Error {
    /// The input directory contained no .txt files to parse
    #[error("no .txt input files found in {}", .0.display())]
    NoInput(PathBuf),

    /// An input file or directory could not be read
    #[error("failed to read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
}

/// One benchmark iteration's counter readings.
///
/// Maps each recognized [`Metric`] to the value read from that iteration's
/// dump file. A metric that did not appear in the file is simply absent from
/// the map, which is distinct from a zero reading.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Iteration {
    values: BTreeMap<Metric, f64>,
}

impl Iteration {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a reading, replacing any earlier reading of the same metric.
    pub fn insert(&mut self, metric: Metric, value: f64) {
        self.values.insert(metric, value);
    }

    /// The reading for a metric, or `None` if it was missing from the file.
    pub fn get(&self, metric: Metric) -> Option<f64> {
        self.values.get(&metric).copied()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (Metric, f64)> + '_ {
        self.values.iter().map(|(m, v)| (*m, *v))
    }
}

/// Parses a single line of a counter dump.
///
/// Returns the (metric, value) reading, or `None` for lines that carry no
/// reading: blank lines, the `perf stat` header and trailer, lines whose
/// first token is not numeric, and lines naming a counter outside the
/// allow-list. Skipping these is filtering, not an error.
pub fn parse_line(line: &str) -> Option<(Metric, f64)> {
    let line = line.trim();
    if line.is_empty() {
        return None;
    }
    if line.starts_with("Performance counter") || line.contains("seconds time elapsed") {
        return None;
    }

    let mut tokens = line.split_whitespace();
    let value_token = tokens.next()?;
    let name_token = tokens.next()?;

    // Counter values are printed with thousands separators
    let value: f64 = value_token.replace(',', "").parse().ok()?;
    let metric = Metric::from_event_name(name_token)?;
    Some((metric, value))
}

/// Parses one full counter dump into an [`Iteration`].
pub fn parse_reader<R: BufRead>(reader: R) -> std::io::Result<Iteration> {
    let mut iteration = Iteration::new();
    for line in reader.lines() {
        if let Some((metric, value)) = parse_line(&line?) {
            iteration.insert(metric, value);
        }
    }
    Ok(iteration)
}

fn parse_file(path: &Path) -> Result<Iteration, Error> {
    let file = File::open(path).map_err(|source| Error::Io {
        path: path.to_path_buf(),
        source,
    })?;
    parse_reader(BufReader::new(file)).map_err(|source| Error::Io {
        path: path.to_path_buf(),
        source,
    })
}

/// Parses every `*.txt` file in a directory, in file-name order.
///
/// Returns one [`Iteration`] per file. The ordering is deterministic so that
/// the report's `Iteration N` columns are stable across runs. Fails with
/// [`Error::NoInput`] when the directory holds no matching files.
pub fn collect_iterations(dir: &Path) -> Result<Vec<Iteration>, Error> {
    let entries = std::fs::read_dir(dir).map_err(|source| Error::Io {
        path: dir.to_path_buf(),
        source,
    })?;

    let mut files: Vec<PathBuf> = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|source| Error::Io {
            path: dir.to_path_buf(),
            source,
        })?;
        let path = entry.path();
        if path.is_file() && path.extension().is_some_and(|ext| ext == "txt") {
            files.push(path);
        }
    }
    files.sort();

    if files.is_empty() {
        return Err(Error::NoInput(dir.to_path_buf()));
    }

    let mut iterations = Vec::with_capacity(files.len());
    for path in &files {
        let iteration = parse_file(path)?;
        debug!("parsed {}: {:?}", path.display(), iteration);
        iterations.push(iteration);
    }
    Ok(iterations)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use std::io::Cursor;
    use std::io::Write;

    #[rstest]
    #[case("1,234,567 cpu-cycles", Some((Metric::CpuCycles, 1_234_567.0)))]
    #[case("500 instructions", Some((Metric::Instructions, 500.0)))]
    #[case("42 misc2_retired.lfence", Some((Metric::LfenceRetired, 42.0)))]
    #[case("  8,200  branch-misses   #  1.2% of all branches", Some((Metric::BranchMisses, 8200.0)))]
    #[case("", None)]
    #[case("Performance counter stats for './bench':", None)]
    #[case("1.234 seconds time elapsed", None)]
    #[case("not-a-number cpu-cycles", None)]
    #[case("99 cache-misses", None)]
    #[case("1234", None)]
    fn test_parse_line(#[case] line: &str, #[case] expected: Option<(Metric, f64)>) {
        assert_eq!(parse_line(line), expected);
    }

    #[test]
    fn test_parse_reader_full_dump() {
        let dump = "\
Performance counter stats for './bench':

     1,000,000      cpu-cycles
       500,000      instructions
        80,000      branch-instructions
         1,200      branch-misses
       200,000      cycle_activity.stalls_total
            30      misc2_retired.lfence

   0.512345678 seconds time elapsed
";
        let iteration = parse_reader(Cursor::new(dump)).unwrap();
        assert_eq!(iteration.len(), 6);
        assert_eq!(iteration.get(Metric::CpuCycles), Some(1_000_000.0));
        assert_eq!(iteration.get(Metric::LfenceRetired), Some(30.0));
    }

    #[test]
    fn test_no_recognized_tokens_yields_empty_iteration() {
        let dump = "header line\n123 cache-misses\nnoise\n";
        let iteration = parse_reader(Cursor::new(dump)).unwrap();
        assert!(iteration.is_empty());
    }

    #[test]
    fn test_missing_metric_is_absent_not_zero() {
        let iteration = parse_reader(Cursor::new("1000 cpu-cycles\n")).unwrap();
        assert_eq!(iteration.get(Metric::Instructions), None);
    }

    #[test]
    fn test_collect_iterations_sorted_and_logged() {
        testing_logger::setup();

        let dir = tempfile::tempdir().unwrap();
        // Write files out of lexical order to exercise the sort
        for (name, cycles) in [("run_2.txt", 2000), ("run_1.txt", 1000)] {
            let mut f = File::create(dir.path().join(name)).unwrap();
            writeln!(f, "{} cpu-cycles", cycles).unwrap();
        }
        // A non-.txt file must be ignored
        File::create(dir.path().join("notes.md")).unwrap();

        let iterations = collect_iterations(dir.path()).unwrap();
        assert_eq!(iterations.len(), 2);
        assert_eq!(iterations[0].get(Metric::CpuCycles), Some(1000.0));
        assert_eq!(iterations[1].get(Metric::CpuCycles), Some(2000.0));

        // One diagnostic listing per parsed file
        testing_logger::validate(|captured_logs| {
            let parsed: Vec<_> = captured_logs
                .iter()
                .filter(|log| log.body.starts_with("parsed "))
                .collect();
            assert_eq!(parsed.len(), 2);
            assert_eq!(parsed[0].level, log::Level::Debug);
        });
    }

    #[test]
    fn test_collect_iterations_no_input() {
        let dir = tempfile::tempdir().unwrap();
        let result = collect_iterations(dir.path());
        assert!(matches!(result, Err(Error::NoInput(_))));
    }
}
