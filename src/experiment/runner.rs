//! Experiment Runner - the doubling control loop
//!
//! ```text
//! Idle ──> Tuning (optional) ──> Measuring ──┬──> Convergent
//!                                            ├──> TimedOut
//!                                            └──> OutOfResources
//! ```
//!
//! Each pass of the measuring loop consults the give-up predictor, doubles the
//! subject, runs `trials` timed executions and re-checks convergence.

use std::time::{Duration, Instant};

use chrono::{DateTime, Utc};
use tracing::warn;

use super::{
    measure_level, ConvergenceDetector, ExperimentReport, ExperimentState, GiveUpPredictor,
    ResultStore, TerminationCode, Tuner,
};
use crate::classify::{DoublingRatioTable, GrowthClassifier};
use crate::config::ExperimentConfig;
use crate::sink::{MeasurementSink, NullSink};
use crate::subject::Subject;
use crate::{Error, Result};

/// Drives one doubling experiment against one subject.
///
/// The runner owns its subject, store and sink; a runner runs once.
///
/// ```rust
/// use doubling_experiment::{ExperimentConfig, ExperimentRunner, TerminationCode};
/// use doubling_experiment::subject::Subject;
///
/// /// Reports a cost that doubles with the input.
/// struct Linear(f64);
///
/// impl Subject for Linear {
///     fn measure_once(&mut self) -> doubling_experiment::Result<f64> {
///         Ok(self.0)
///     }
///     fn double_input_size(&mut self) -> doubling_experiment::Result<()> {
///         self.0 *= 2.0;
///         Ok(())
///     }
/// }
///
/// let config = ExperimentConfig::builder().tuning(false).look_back(2).build()?;
/// let mut runner = ExperimentRunner::new(config, Linear(1_000.0));
/// assert_eq!(runner.run()?, TerminationCode::Convergent);
/// assert_eq!(runner.growth_label(), "O(n)");
/// # Ok::<(), doubling_experiment::Error>(())
/// ```
pub struct ExperimentRunner<S, K = NullSink> {
    config: ExperimentConfig,
    subject: S,
    classifier: Box<dyn GrowthClassifier>,
    sink: K,
    state: ExperimentState,
}

impl<S: Subject> ExperimentRunner<S, NullSink> {
    /// Create a runner with the default classifier and no output sink.
    pub fn new(config: ExperimentConfig, subject: S) -> Self {
        let state = ExperimentState::new(config.min_runs());
        Self {
            config,
            subject,
            classifier: Box::new(DoublingRatioTable::new()),
            sink: NullSink,
            state,
        }
    }
}

impl<S: Subject, K: MeasurementSink> ExperimentRunner<S, K> {
    /// Replace the growth classifier.
    #[must_use]
    pub fn with_classifier(mut self, classifier: impl GrowthClassifier + 'static) -> Self {
        self.classifier = Box::new(classifier);
        self
    }

    /// Send every measurement to `sink` as it is recorded.
    pub fn with_sink<K2: MeasurementSink>(self, sink: K2) -> ExperimentRunner<S, K2> {
        ExperimentRunner {
            config: self.config,
            subject: self.subject,
            classifier: self.classifier,
            sink,
            state: self.state,
        }
    }

    /// Change the convergence tolerance before running.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidConfig`] for a non-positive tolerance,
    /// [`Error::AlreadyRan`] after the run.
    pub fn set_tolerance(&mut self, tolerance: f64) -> Result<()> {
        self.ensure_idle()?;
        self.config = self.config.clone().with_tolerance(tolerance)?;
        Ok(())
    }

    /// Change the number of trials per level before running.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidConfig`] for zero trials, [`Error::AlreadyRan`] after
    /// the run.
    pub fn set_trials(&mut self, trials: usize) -> Result<()> {
        self.ensure_idle()?;
        self.config = self.config.clone().with_trials(trials)?;
        self.state.min_runs = self.config.min_runs();
        Ok(())
    }

    const fn ensure_idle(&self) -> Result<()> {
        if self.state.ran {
            Err(Error::AlreadyRan)
        } else {
            Ok(())
        }
    }

    /// Run the experiment to termination.
    ///
    /// Resource exhaustion reported by the subject ends the run with
    /// [`TerminationCode::OutOfResources`] and keeps every measurement taken
    /// before it.
    ///
    /// # Errors
    ///
    /// Any error other than [`Error::OutOfResources`] aborts the run and is
    /// returned; the termination code then stays [`TerminationCode::Unset`].
    /// Calling `run` twice returns [`Error::AlreadyRan`].
    pub fn run(&mut self) -> Result<TerminationCode> {
        self.ensure_idle()?;
        self.state.ran = true;

        let start = Instant::now();
        self.state.started_at = Some(Utc::now());

        let termination = match self.measure_until_stable(start) {
            Ok(code) => code,
            Err(err) if err.is_resource_exhaustion() => {
                warn!(
                    error = %err,
                    levels = self.state.store.level_count(),
                    "resource exhaustion, stopping experiment"
                );
                self.state.elapsed = Some(start.elapsed());
                TerminationCode::OutOfResources
            }
            Err(err) => return Err(err),
        };

        self.state.termination = termination;
        self.state.ended_at = Some(Utc::now());
        self.sink.flush()?;

        narrate!(
            self.config.verbose(),
            termination = %termination,
            levels = self.state.store.level_count(),
            measurements = self.state.store.size(),
            "experiment finished"
        );
        Ok(termination)
    }

    fn measure_until_stable(&mut self, start: Instant) -> Result<TerminationCode> {
        let verbose = self.config.verbose();
        let trials = self.config.trials();
        let mut min_runs = self.config.min_runs();

        // after tuning the subject sits at a size that has not been measured
        let mut unmeasured_size = false;
        if self.config.tuning() {
            let tuner = Tuner::new(
                self.classifier.as_ref(),
                trials,
                self.config.tuning_tries(),
                self.config.look_back(),
            )
            .verbose(verbose);
            let doublings = tuner.tune(
                &mut self.subject,
                &mut self.state.store,
                &mut self.sink,
                &mut min_runs,
            )?;
            self.state.tuning_doublings = Some(doublings);
            unmeasured_size = doublings > 0;
        }
        self.state.min_runs = min_runs;

        let detector =
            ConvergenceDetector::new(min_runs, self.config.look_back(), self.config.tolerance());
        let predictor = GiveUpPredictor::new(self.config.give_up_hours());

        let mut level = self.state.store.level_count();
        while !detector.has_converged(&self.state.store)? {
            if level > 1 && predictor.should_give_up(&self.state.store)? {
                let predicted_hours = predictor.predicted_next_hours(&self.state.store)?;
                narrate!(
                    verbose,
                    level,
                    predicted_hours,
                    "next double predicted to exceed give-up time"
                );
                break;
            }

            if level > 0 {
                if unmeasured_size {
                    unmeasured_size = false;
                } else {
                    self.subject.double_input_size()?;
                }
            }

            measure_level(
                &mut self.subject,
                &mut self.state.store,
                &mut self.sink,
                level,
                trials,
            )?;
            level += 1;

            if let Ok(ratio) = self.state.store.ratio(0) {
                narrate!(verbose, level, ratio, "N doubled");
            } else {
                narrate!(verbose, level, "N doubled");
            }
        }

        self.state.elapsed = Some(start.elapsed());
        if detector.has_converged(&self.state.store)? {
            Ok(TerminationCode::Convergent)
        } else {
            Ok(TerminationCode::TimedOut)
        }
    }

    /// How the run ended; [`TerminationCode::Unset`] before `run`.
    #[must_use]
    pub const fn termination_code(&self) -> TerminationCode {
        self.state.termination
    }

    /// Wall-clock run time.
    #[must_use]
    pub const fn elapsed_wall_time(&self) -> Option<Duration> {
        self.state.elapsed
    }

    /// Measurements collected so far.
    #[must_use]
    pub const fn store(&self) -> &ResultStore {
        &self.state.store
    }

    /// Effective minimum run count, after tuning if it ran.
    #[must_use]
    pub const fn min_runs(&self) -> usize {
        self.state.min_runs
    }

    /// Doublings performed by the tuning pre-phase, if it ran.
    #[must_use]
    pub const fn tuning_doublings(&self) -> Option<usize> {
        self.state.tuning_doublings
    }

    /// When the run started.
    #[must_use]
    pub const fn started_at(&self) -> Option<DateTime<Utc>> {
        self.state.started_at
    }

    /// When the run ended.
    #[must_use]
    pub const fn ended_at(&self) -> Option<DateTime<Utc>> {
        self.state.ended_at
    }

    /// The configuration in effect.
    #[must_use]
    pub const fn config(&self) -> &ExperimentConfig {
        &self.config
    }

    /// The subject under measurement.
    #[must_use]
    pub const fn subject(&self) -> &S {
        &self.subject
    }

    /// The output sink.
    #[must_use]
    pub const fn sink(&self) -> &K {
        &self.sink
    }

    /// Growth-class label for the measurements collected.
    #[must_use]
    pub fn growth_label(&self) -> String {
        self.classifier.label(&self.state.store)
    }

    /// Summarize the run.
    #[must_use]
    pub fn report(&self) -> ExperimentReport {
        let store = &self.state.store;
        ExperimentReport {
            termination: self.state.termination,
            termination_code: self.state.termination.code(),
            wall_time_secs: self.state.elapsed.map(|d| d.as_secs_f64()),
            started_at: self.state.started_at,
            ended_at: self.state.ended_at,
            measurements: store.size(),
            levels: store.level_count(),
            min_runs: self.state.min_runs,
            tuning_doublings: self.state.tuning_doublings,
            level_means: store.level_means(),
            ratios: store.ratios(),
            growth_label: self.growth_label(),
        }
    }
}

impl<S, K> std::fmt::Debug for ExperimentRunner<S, K> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ExperimentRunner")
            .field("config", &self.config)
            .field("state", &self.state)
            .finish_non_exhaustive()
    }
}
