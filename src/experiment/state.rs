//! Experiment state - outcome bookkeeping owned by one runner

use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::ResultStore;

/// Why an experiment stopped.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum TerminationCode {
    /// The experiment has not run yet.
    #[default]
    Unset,
    /// Ratios stabilized within tolerance.
    Convergent,
    /// The next level was predicted to exceed the give-up budget.
    TimedOut,
    /// Memory or another resource ran out.
    OutOfResources,
}

impl TerminationCode {
    /// Numeric code: `Convergent=0`, `TimedOut=1`, `OutOfResources=2`, `Unset=-1`.
    #[must_use]
    pub const fn code(self) -> i32 {
        match self {
            Self::Unset => -1,
            Self::Convergent => 0,
            Self::TimedOut => 1,
            Self::OutOfResources => 2,
        }
    }

    /// Whether the experiment finished.
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        !matches!(self, Self::Unset)
    }
}

impl std::fmt::Display for TerminationCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::Unset => "unset",
            Self::Convergent => "convergent",
            Self::TimedOut => "timed out",
            Self::OutOfResources => "out of resources",
        };
        write!(f, "{name}")
    }
}

/// Mutable run state. Created empty with the runner, filled in by
/// `run()`, read-only afterwards.
#[derive(Debug, Default)]
pub(crate) struct ExperimentState {
    pub(crate) store: ResultStore,
    pub(crate) termination: TerminationCode,
    pub(crate) elapsed: Option<Duration>,
    pub(crate) min_runs: usize,
    pub(crate) tuning_doublings: Option<usize>,
    pub(crate) started_at: Option<DateTime<Utc>>,
    pub(crate) ended_at: Option<DateTime<Utc>>,
    pub(crate) ran: bool,
}

impl ExperimentState {
    pub(crate) fn new(min_runs: usize) -> Self {
        Self {
            min_runs,
            ..Self::default()
        }
    }
}
