//! Tuning pre-phase - find a starting size where growth is measurable
//!
//! At very small (or very large) input sizes a polynomial operation can look
//! constant or logarithmic for its first few doublings. The tuner keeps
//! doubling until the latest ratio classifies as faster than logarithmic, or
//! until its try budget runs out, in which case the subject may really be
//! constant or logarithmic.

use super::{measure_level, ResultStore};
use crate::classify::{GrowthClassifier, SUBLINEAR_MAX_INDEX};
use crate::sink::MeasurementSink;
use crate::subject::Subject;
use crate::Result;

/// Runs the tuning pre-phase against a shared store.
pub struct Tuner<'a> {
    classifier: &'a dyn GrowthClassifier,
    trials: usize,
    tuning_tries: usize,
    look_back: usize,
    verbose: bool,
}

impl<'a> Tuner<'a> {
    /// Create a tuner.
    #[must_use]
    pub fn new(
        classifier: &'a dyn GrowthClassifier,
        trials: usize,
        tuning_tries: usize,
        look_back: usize,
    ) -> Self {
        Self {
            classifier,
            trials,
            tuning_tries,
            look_back,
            verbose: false,
        }
    }

    /// Narrate tuning ratios at info level instead of debug.
    #[must_use]
    pub const fn verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    /// Whether the latest ratio shows growth faster than logarithmic.
    ///
    /// # Errors
    ///
    /// Never fails once two levels exist; the guard keeps the ratio query in
    /// range.
    pub fn check_init_n(&self, store: &ResultStore) -> Result<bool> {
        if store.level_count() < 2 {
            return Ok(false);
        }
        let ratio = store.ratio(0)?;
        let class = self.classifier.nearest_class_index(ratio);
        narrate!(self.verbose, ratio, class, "tuning run");
        Ok(class > SUBLINEAR_MAX_INDEX)
    }

    /// Run the pre-phase and raise `min_runs` for the main loop.
    ///
    /// Measurements are appended to `store` starting at its current level
    /// count, and the subject is doubled after each level, so it is left one
    /// doubling ahead of the last measured level. Returns the number of
    /// doublings performed. `min_runs` is raised to at least
    /// `doublings + look_back - 1` and never lowered.
    ///
    /// # Errors
    ///
    /// Propagates subject, store and sink errors, including
    /// [`crate::Error::OutOfResources`].
    pub fn tune<S: Subject + ?Sized>(
        &self,
        subject: &mut S,
        store: &mut ResultStore,
        sink: &mut dyn MeasurementSink,
        min_runs: &mut usize,
    ) -> Result<usize> {
        narrate!(self.verbose, tries = self.tuning_tries, "finding min doubles");

        let mut doublings = 0;
        while !self.check_init_n(store)? && doublings < self.tuning_tries {
            let level = store.level_count();
            measure_level(subject, store, sink, level, self.trials)?;
            subject.double_input_size()?;
            doublings += 1;
            narrate!(self.verbose, doublings, "N doubled");
        }

        let floor = (doublings + self.look_back).saturating_sub(1);
        if *min_runs < floor {
            *min_runs = floor;
        }
        narrate!(self.verbose, min_runs = *min_runs, "min doubles set");

        Ok(doublings)
    }
}
