//! Experiment Report - serializable summary of a finished run

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::TerminationCode;
use crate::Result;

/// Summary of one experiment, suitable for persisting as JSON.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ExperimentReport {
    /// How the run ended.
    pub termination: TerminationCode,
    /// Numeric form of `termination`.
    pub termination_code: i32,
    /// Wall-clock run time in seconds, if the run started.
    pub wall_time_secs: Option<f64>,
    /// When the run started.
    pub started_at: Option<DateTime<Utc>>,
    /// When the run ended.
    pub ended_at: Option<DateTime<Utc>>,
    /// Raw measurement count.
    pub measurements: usize,
    /// Distinct levels measured.
    pub levels: usize,
    /// Effective minimum run count after tuning.
    pub min_runs: usize,
    /// Doublings performed by the tuning pre-phase, if it ran.
    pub tuning_doublings: Option<usize>,
    /// Mean elapsed nanoseconds per level.
    pub level_means: Vec<f64>,
    /// Growth ratios, most recent first.
    pub ratios: Vec<f64>,
    /// Classifier label for the finished series.
    pub growth_label: String,
}

impl ExperimentReport {
    /// Render as pretty-printed JSON.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::Json`] if serialization fails.
    pub fn to_json_pretty(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

impl std::fmt::Display for ExperimentReport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} ({}, {} levels, {} measurements",
            self.growth_label, self.termination, self.levels, self.measurements
        )?;
        if let Some(secs) = self.wall_time_secs {
            write!(f, ", {secs:.3}s")?;
        }
        write!(f, ")")
    }
}
