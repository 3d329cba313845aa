//! Resource exhaustion recovery tests
//!
//! A subject that runs out of memory ends the experiment with
//! `OutOfResources` and keeps every measurement taken before the failure.
//! Any other subject failure aborts the run.

use std::time::Duration;

use doubling_experiment::sink::MemorySink;
use doubling_experiment::subject::{double_vec, FnSubject, Subject};
use doubling_experiment::{Error, ExperimentConfig, ExperimentRunner, Result, TerminationCode};

/// Fails with `fault` on the `fail_at`-th call to `measure_once`.
struct Faulty {
    calls: usize,
    fail_at: usize,
    fault: fn() -> Error,
    cost: f64,
}

impl Subject for Faulty {
    fn measure_once(&mut self) -> Result<f64> {
        self.calls += 1;
        if self.calls == self.fail_at {
            return Err((self.fault)());
        }
        Ok(self.cost)
    }

    fn double_input_size(&mut self) -> Result<()> {
        // ratio drifts so the loop never converges on its own
        self.cost *= 2.0 + self.calls as f64;
        Ok(())
    }
}

fn oom() -> Error {
    Error::OutOfResources("simulated allocation failure".to_string())
}

fn subject_failure() -> Error {
    Error::Subject("simulated crash".to_string())
}

fn config() -> ExperimentConfig {
    ExperimentConfig::builder()
        .tuning(false)
        .look_back(3)
        .tolerance(0.01)
        .give_up_hours(1000.0)
        .build()
        .unwrap()
}

#[test]
fn test_exhaustion_after_three_levels_keeps_data() {
    let subject = Faulty {
        calls: 0,
        fail_at: 4,
        fault: oom,
        cost: 100.0,
    };
    let mut runner = ExperimentRunner::new(config(), subject).with_sink(MemorySink::new());

    let code = runner.run().unwrap();

    assert_eq!(code, TerminationCode::OutOfResources);
    assert_eq!(runner.termination_code().code(), 2);
    assert_eq!(runner.store().level_count(), 3);
    assert_eq!(runner.store().size(), 3);
    assert!(runner.elapsed_wall_time().is_some());
    assert!(runner.ended_at().is_some());
    // sink was still flushed
    assert_eq!(runner.sink().flushes(), 1);
    assert_eq!(runner.sink().measurements().len(), 3);
}

#[test]
fn test_exhaustion_before_first_trial() {
    let subject = Faulty {
        calls: 0,
        fail_at: 1,
        fault: oom,
        cost: 100.0,
    };
    let mut runner = ExperimentRunner::new(config(), subject);

    assert_eq!(runner.run().unwrap(), TerminationCode::OutOfResources);
    assert!(runner.store().is_empty());
    assert!(runner.elapsed_wall_time().is_some());
}

#[test]
fn test_exhaustion_during_tuning() {
    let config = ExperimentConfig::builder()
        .tuning(true)
        .tuning_tries(10)
        .build()
        .unwrap();
    let subject = Faulty {
        calls: 0,
        fail_at: 2,
        fault: oom,
        cost: 100.0,
    };
    let mut runner = ExperimentRunner::new(config, subject);

    assert_eq!(runner.run().unwrap(), TerminationCode::OutOfResources);
    assert_eq!(runner.store().size(), 1);
}

#[test]
fn test_other_failures_propagate() {
    let subject = Faulty {
        calls: 0,
        fail_at: 3,
        fault: subject_failure,
        cost: 100.0,
    };
    let mut runner = ExperimentRunner::new(config(), subject);

    let err = runner.run().unwrap_err();
    assert!(matches!(err, Error::Subject(_)));
    assert_eq!(runner.termination_code(), TerminationCode::Unset);
    assert_eq!(runner.store().size(), 2);
}

#[test]
fn test_failed_allocation_in_doubling_is_recovered() {
    // doubling beyond the first level asks for an impossible allocation
    let subject = FnSubject::new(
        vec![0u8; 16],
        |_: &mut Vec<u8>| {
            std::thread::sleep(Duration::from_micros(50));
            Ok(())
        },
        |v: &mut Vec<u8>| {
            if v.len() >= 32 {
                v.try_reserve(usize::MAX)?;
            }
            double_vec(v)
        },
    );
    let mut runner = ExperimentRunner::new(config(), subject);

    assert_eq!(runner.run().unwrap(), TerminationCode::OutOfResources);
    assert_eq!(runner.store().level_count(), 2);
    assert_eq!(runner.subject().state().len(), 32);
}
