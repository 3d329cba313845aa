//! Give-up prediction - stop doubling before a level becomes impractically slow

use tracing::debug;

use super::ResultStore;
use crate::{Error, Result};

/// Nanoseconds per hour; measurements are recorded in nanoseconds.
pub const NANOS_PER_HOUR: f64 = 3.6e12;

/// Extrapolates the next level's cost from the latest growth step.
///
/// The next level is predicted to take `latest × ratio(0)`; the experiment
/// gives up when that exceeds the budget.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GiveUpPredictor {
    give_up_hours: f64,
}

impl GiveUpPredictor {
    /// Create a predictor with a per-level budget in hours.
    #[must_use]
    pub const fn new(give_up_hours: f64) -> Self {
        Self { give_up_hours }
    }

    /// Get the per-level budget in hours.
    #[must_use]
    pub const fn give_up_hours(&self) -> f64 {
        self.give_up_hours
    }

    /// Predicted run-time of the next level, in hours.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InsufficientData`] if fewer than 2 levels exist.
    pub fn predicted_next_hours(&self, store: &ResultStore) -> Result<f64> {
        let last_time = store.latest().ok_or(Error::InsufficientData {
            required: 2,
            available: 0,
        })?;
        let last_ratio = store.ratio(0)?;
        Ok(last_time * last_ratio / NANOS_PER_HOUR)
    }

    /// Whether the next doubling is predicted to exceed the budget.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InsufficientData`] if fewer than 2 levels exist.
    pub fn should_give_up(&self, store: &ResultStore) -> Result<bool> {
        let predicted = self.predicted_next_hours(store)?;
        debug!(
            predicted_hours = predicted,
            budget_hours = self.give_up_hours,
            "predicted time for next double"
        );
        Ok(predicted > self.give_up_hours)
    }
}
