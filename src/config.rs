//! Configuration for doubling experiments
//!
//! An [`ExperimentConfig`] is immutable once built. Construction validates
//! every field and raises `min_runs` to `look_back + 1` when it is lower,
//! since `look_back` ratios need `look_back + 1` measurements.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// Default convergence tolerance.
pub const DEFAULT_TOLERANCE: f64 = 0.2;
/// Default minimum raw measurement count.
pub const DEFAULT_MIN_RUNS: usize = 5;
/// Default trials per level.
pub const DEFAULT_TRIALS: usize = 1;
/// Default cap on tuning doublings.
pub const DEFAULT_TUNING_TRIES: usize = 5;
/// Default number of ratios inspected by the convergence check.
pub const DEFAULT_LOOK_BACK: usize = 4;
/// Default per-level budget in hours.
pub const DEFAULT_GIVE_UP_HOURS: f64 = 1.0;

/// Validated experiment settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExperimentConfig {
    tolerance: f64,
    min_runs: usize,
    trials: usize,
    tuning: bool,
    tuning_tries: usize,
    look_back: usize,
    give_up_hours: f64,
    verbose: bool,
}

impl Default for ExperimentConfig {
    fn default() -> Self {
        Self {
            tolerance: DEFAULT_TOLERANCE,
            min_runs: DEFAULT_MIN_RUNS,
            trials: DEFAULT_TRIALS,
            tuning: true,
            tuning_tries: DEFAULT_TUNING_TRIES,
            look_back: DEFAULT_LOOK_BACK,
            give_up_hours: DEFAULT_GIVE_UP_HOURS,
            verbose: false,
        }
    }
}

impl ExperimentConfig {
    /// Create a builder starting from the defaults.
    #[must_use]
    pub fn builder() -> ExperimentConfigBuilder {
        ExperimentConfigBuilder::default()
    }

    /// Parse and validate a JSON document. Missing fields take their defaults.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Json`] on malformed JSON and [`Error::InvalidConfig`]
    /// on out-of-range values.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let raw: Self = serde_json::from_str(json)?;
        raw.validated()
    }

    /// Load and validate a JSON configuration file.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Io`] if the file cannot be read, otherwise as
    /// [`ExperimentConfig::from_json_str`].
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json_str(&json)
    }

    /// Check ranges and normalize `min_runs`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidConfig`] naming the first offending field.
    pub fn validated(mut self) -> Result<Self> {
        if !(self.tolerance.is_finite() && self.tolerance > 0.0) {
            return Err(Error::InvalidConfig(format!(
                "tolerance must be a positive number, got {}",
                self.tolerance
            )));
        }
        if self.trials == 0 {
            return Err(Error::InvalidConfig("trials must be at least 1".to_string()));
        }
        if self.look_back == 0 {
            return Err(Error::InvalidConfig(
                "look_back must be at least 1".to_string(),
            ));
        }
        if !(self.give_up_hours.is_finite() && self.give_up_hours > 0.0) {
            return Err(Error::InvalidConfig(format!(
                "give_up_hours must be a positive number, got {}",
                self.give_up_hours
            )));
        }
        self.min_runs = self.min_runs.max(self.look_back + 1);
        Ok(self)
    }

    /// Copy with a different tolerance, validated.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidConfig`] if `tolerance` is not positive.
    pub fn with_tolerance(mut self, tolerance: f64) -> Result<Self> {
        self.tolerance = tolerance;
        self.validated()
    }

    /// Copy with a different trial count, validated.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidConfig`] if `trials` is zero.
    pub fn with_trials(mut self, trials: usize) -> Result<Self> {
        self.trials = trials;
        self.validated()
    }

    /// Maximum drift between ratios accepted as converged.
    #[must_use]
    pub const fn tolerance(&self) -> f64 {
        self.tolerance
    }

    /// Minimum raw measurement count before convergence is checked.
    #[must_use]
    pub const fn min_runs(&self) -> usize {
        self.min_runs
    }

    /// Trials run at each level.
    #[must_use]
    pub const fn trials(&self) -> usize {
        self.trials
    }

    /// Whether the tuning pre-phase runs.
    #[must_use]
    pub const fn tuning(&self) -> bool {
        self.tuning
    }

    /// Maximum doublings performed by the tuning pre-phase.
    #[must_use]
    pub const fn tuning_tries(&self) -> usize {
        self.tuning_tries
    }

    /// Number of ratios inspected by the convergence check.
    #[must_use]
    pub const fn look_back(&self) -> usize {
        self.look_back
    }

    /// Budget for a single level, in hours.
    #[must_use]
    pub const fn give_up_hours(&self) -> f64 {
        self.give_up_hours
    }

    /// Whether diagnostic narration is logged at info level.
    #[must_use]
    pub const fn verbose(&self) -> bool {
        self.verbose
    }
}

/// Builder for `ExperimentConfig`.
#[derive(Debug, Default)]
pub struct ExperimentConfigBuilder {
    config: ExperimentConfig,
}

impl ExperimentConfigBuilder {
    /// Set the convergence tolerance.
    #[must_use]
    pub const fn tolerance(mut self, tolerance: f64) -> Self {
        self.config.tolerance = tolerance;
        self
    }

    /// Set the minimum raw measurement count.
    #[must_use]
    pub const fn min_runs(mut self, min_runs: usize) -> Self {
        self.config.min_runs = min_runs;
        self
    }

    /// Set the number of trials per level.
    #[must_use]
    pub const fn trials(mut self, trials: usize) -> Self {
        self.config.trials = trials;
        self
    }

    /// Enable or disable the tuning pre-phase.
    #[must_use]
    pub const fn tuning(mut self, tuning: bool) -> Self {
        self.config.tuning = tuning;
        self
    }

    /// Set the maximum tuning doublings.
    #[must_use]
    pub const fn tuning_tries(mut self, tuning_tries: usize) -> Self {
        self.config.tuning_tries = tuning_tries;
        self
    }

    /// Set the number of ratios inspected by the convergence check.
    #[must_use]
    pub const fn look_back(mut self, look_back: usize) -> Self {
        self.config.look_back = look_back;
        self
    }

    /// Set the per-level budget in hours.
    #[must_use]
    pub const fn give_up_hours(mut self, give_up_hours: f64) -> Self {
        self.config.give_up_hours = give_up_hours;
        self
    }

    /// Log diagnostic narration at info level.
    #[must_use]
    pub const fn verbose(mut self, verbose: bool) -> Self {
        self.config.verbose = verbose;
        self
    }

    /// Validate and build the `ExperimentConfig`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidConfig`] on out-of-range values.
    pub fn build(self) -> Result<ExperimentConfig> {
        self.config.validated()
    }
}
