//! Measurement - one timed trial of the subject at a size level

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A single timed trial.
///
/// `level` counts how many times the subject's input size had been doubled
/// when the trial ran; `elapsed_ns` is the wall-clock cost of the trial in
/// nanoseconds. Records are immutable once created.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Measurement {
    level: usize,
    elapsed_ns: f64,
    recorded_at: DateTime<Utc>,
}

impl Measurement {
    /// Create a new measurement stamped with the current time.
    #[must_use]
    pub fn new(level: usize, elapsed_ns: f64) -> Self {
        Self {
            level,
            elapsed_ns,
            recorded_at: Utc::now(),
        }
    }

    /// Create a builder for constructing a measurement with a custom timestamp.
    #[must_use]
    pub fn builder(level: usize, elapsed_ns: f64) -> MeasurementBuilder {
        MeasurementBuilder::new(level, elapsed_ns)
    }

    /// Get the doubling level.
    #[must_use]
    pub const fn level(&self) -> usize {
        self.level
    }

    /// Get the elapsed time in nanoseconds.
    #[must_use]
    pub const fn elapsed_ns(&self) -> f64 {
        self.elapsed_ns
    }

    /// Get the timestamp when the measurement was recorded.
    #[must_use]
    pub const fn recorded_at(&self) -> DateTime<Utc> {
        self.recorded_at
    }
}

/// Builder for `Measurement`.
#[derive(Debug)]
pub struct MeasurementBuilder {
    level: usize,
    elapsed_ns: f64,
    recorded_at: DateTime<Utc>,
}

impl MeasurementBuilder {
    /// Create a new builder with required fields.
    #[must_use]
    pub fn new(level: usize, elapsed_ns: f64) -> Self {
        Self {
            level,
            elapsed_ns,
            recorded_at: Utc::now(),
        }
    }

    /// Set a custom timestamp.
    #[must_use]
    pub const fn recorded_at(mut self, recorded_at: DateTime<Utc>) -> Self {
        self.recorded_at = recorded_at;
        self
    }

    /// Build the `Measurement`.
    #[must_use]
    pub const fn build(self) -> Measurement {
        Measurement {
            level: self.level,
            elapsed_ns: self.elapsed_ns,
            recorded_at: self.recorded_at,
        }
    }
}
