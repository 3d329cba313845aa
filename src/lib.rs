//! # doubling-experiment: Empirical Growth-Rate Estimation
//!
//! Runs an operation at repeatedly doubled input sizes until the ratio
//! between successive sizes' run-times stops drifting, then classifies that
//! ratio into a growth class such as `O(n)` or `O(n^2)`.
//!
//! ## Design Principles
//!
//! - **One loop, one owner**: an [`ExperimentRunner`] owns its subject, its
//!   [`experiment::ResultStore`] and its sink; nothing is shared between runs
//! - **Stop early**: the give-up predictor refuses a doubling whose
//!   extrapolated cost exceeds the budget
//! - **Fail soft on exhaustion**: [`Error::OutOfResources`] from the subject
//!   ends the run with a terminal state and keeps the data collected
//!
//! ## Example Usage
//!
//! ```rust,no_run
//! use doubling_experiment::subject::{double_vec, FnSubject};
//! use doubling_experiment::{ExperimentConfig, ExperimentRunner};
//!
//! let subject = FnSubject::new(
//!     vec![7u64; 1 << 12],
//!     |v: &mut Vec<u64>| {
//!         v.sort_unstable();
//!         Ok(())
//!     },
//!     double_vec,
//! );
//!
//! let config = ExperimentConfig::builder().trials(3).build()?;
//! let mut runner = ExperimentRunner::new(config, subject);
//! runner.run()?;
//! println!("{}", runner.report());
//! # Ok::<(), doubling_experiment::Error>(())
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]

pub mod classify;
pub mod config;
pub mod error;
pub mod experiment;
pub mod logging;
pub mod sink;
pub mod subject;

pub use config::ExperimentConfig;
pub use error::{Error, Result};
pub use experiment::{ExperimentReport, ExperimentRunner, TerminationCode};
