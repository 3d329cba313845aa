//! Doubling experiments
//!
//! This module holds the control loop and its collaborators.
//!
//! ## Components
//!
//! ```text
//! ExperimentRunner ──> Tuner (optional pre-phase)
//!        │                 │
//!        ├──> GiveUpPredictor
//!        ├──> ConvergenceDetector
//!        └──────> ResultStore <── Measurement
//! ```
//!
//! ## Usage
//!
//! ```rust
//! use doubling_experiment::experiment::{ConvergenceDetector, GiveUpPredictor, ResultStore};
//!
//! let mut store = ResultStore::new();
//! for (level, ns) in [100.0, 200.0, 400.0].into_iter().enumerate() {
//!     store.append(level, ns)?;
//! }
//!
//! let detector = ConvergenceDetector::new(3, 2, 0.01);
//! assert!(detector.has_converged(&store)?);
//!
//! let predictor = GiveUpPredictor::new(1.0);
//! assert!(!predictor.should_give_up(&store)?);
//! # Ok::<(), doubling_experiment::Error>(())
//! ```

/// Log at info when verbose, debug otherwise.
macro_rules! narrate {
    ($verbose:expr, $($arg:tt)+) => {
        if $verbose {
            ::tracing::info!($($arg)+);
        } else {
            ::tracing::debug!($($arg)+);
        }
    };
}

mod convergence;
mod give_up;
mod measurement;
mod report;
mod runner;
mod state;
mod store;
mod tuner;

pub use convergence::ConvergenceDetector;
pub use give_up::{GiveUpPredictor, NANOS_PER_HOUR};
pub use measurement::{Measurement, MeasurementBuilder};
pub use report::ExperimentReport;
pub use runner::ExperimentRunner;
pub(crate) use state::ExperimentState;
pub use state::TerminationCode;
pub use store::ResultStore;
pub use tuner::Tuner;

use crate::sink::MeasurementSink;
use crate::subject::Subject;
use crate::Result;

/// Run `trials` timed executions at `level`, recording each one.
fn measure_level<S: Subject + ?Sized>(
    subject: &mut S,
    store: &mut ResultStore,
    sink: &mut dyn MeasurementSink,
    level: usize,
    trials: usize,
) -> Result<()> {
    for _ in 0..trials {
        let elapsed = subject.measure_once()?;
        let measurement = Measurement::new(level, elapsed);
        sink.record(&measurement)?;
        store.push(measurement)?;
    }
    Ok(())
}
