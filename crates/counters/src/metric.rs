/// The fixed set of performance counters tracked across benchmark iterations.
///
/// The variant order is the row order of the summary report. Counter names
/// follow the perf event names as they appear in the raw dump files.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Metric {
    /// Total CPU cycles
    CpuCycles,
    /// Retired instructions
    Instructions,
    /// Retired branch instructions
    BranchInstructions,
    /// Mispredicted branches
    BranchMisses,
    /// Cycles in which no uops execute (`cycle_activity.stalls_total`)
    StallCycles,
    /// Retired LFENCE barriers (`misc2_retired.lfence`)
    LfenceRetired,
}

impl Metric {
    /// All tracked metrics, in report row order.
    pub const ALL: [Metric; 6] = [
        Metric::CpuCycles,
        Metric::Instructions,
        Metric::BranchInstructions,
        Metric::BranchMisses,
        Metric::StallCycles,
        Metric::LfenceRetired,
    ];

    /// The perf event name of this metric, as found in raw dump files and
    /// used as the row key in report artifacts.
    pub fn event_name(&self) -> &'static str {
        match self {
            Metric::CpuCycles => "cpu-cycles",
            Metric::Instructions => "instructions",
            Metric::BranchInstructions => "branch-instructions",
            Metric::BranchMisses => "branch-misses",
            Metric::StallCycles => "cycle_activity.stalls_total",
            Metric::LfenceRetired => "misc2_retired.lfence",
        }
    }

    /// Looks up a metric by its perf event name. Names outside the allow-list
    /// return `None` and are filtered out by the parser.
    pub fn from_event_name(name: &str) -> Option<Metric> {
        Metric::ALL.iter().copied().find(|m| m.event_name() == name)
    }
}
