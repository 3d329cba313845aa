//! Doubling experiments on two sorting algorithms
//!
//! This demo:
//! - Times insertion sort and the standard library sort at doubling sizes
//! - Writes each measurement as a JSON line to `target/doubling_<name>.jsonl`
//! - Prints the growth class and the full report
//!
//! Run with: RUST_LOG=doubling_experiment=info cargo run --example doubling_sort

use std::fs::File;
use std::io::BufWriter;

use anyhow::Context;
use doubling_experiment::logging::init_tracing;
use doubling_experiment::sink::JsonLinesSink;
use doubling_experiment::subject::{double_vec, time_ns, Subject};
use doubling_experiment::{ExperimentConfig, ExperimentRunner};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Sorts a fresh shuffled copy of its input on every trial.
struct SortSubject {
    input: Vec<u64>,
    scratch: Vec<u64>,
    rng: StdRng,
    sort: fn(&mut [u64]),
}

impl SortSubject {
    fn new(len: usize, sort: fn(&mut [u64])) -> Self {
        let mut rng = StdRng::seed_from_u64(42);
        let input = (0..len).map(|_| rng.gen()).collect();
        Self {
            input,
            scratch: Vec::new(),
            rng,
            sort,
        }
    }
}

impl Subject for SortSubject {
    fn measure_once(&mut self) -> doubling_experiment::Result<f64> {
        self.scratch.clear();
        self.scratch.try_reserve(self.input.len())?;
        self.scratch.extend_from_slice(&self.input);
        let sort = self.sort;
        let scratch = &mut self.scratch;
        time_ns(|| {
            sort(scratch);
            Ok(())
        })
    }

    fn double_input_size(&mut self) -> doubling_experiment::Result<()> {
        double_vec(&mut self.input)?;
        // fresh values so the doubled half is not already ordered
        let half = self.input.len() / 2;
        for v in &mut self.input[half..] {
            *v = self.rng.gen();
        }
        Ok(())
    }
}

fn insertion_sort(v: &mut [u64]) {
    for i in 1..v.len() {
        let mut j = i;
        while j > 0 && v[j - 1] > v[j] {
            v.swap(j - 1, j);
            j -= 1;
        }
    }
}

fn std_sort(v: &mut [u64]) {
    v.sort_unstable();
}

fn run(name: &str, subject: SortSubject, config: &ExperimentConfig) -> anyhow::Result<()> {
    let path = format!("target/doubling_{name}.jsonl");
    let file = File::create(&path).with_context(|| format!("creating {path}"))?;
    let sink = JsonLinesSink::with_header(BufWriter::new(file), name, config)?;

    let mut runner = ExperimentRunner::new(config.clone(), subject).with_sink(sink);
    let termination = runner.run()?;

    println!("{name}: {} ({termination})", runner.growth_label());
    println!("{}", runner.report().to_json_pretty()?);
    println!("  measurements written to {path}\n");
    Ok(())
}

fn main() -> anyhow::Result<()> {
    init_tracing(true);

    let config = ExperimentConfig::builder()
        .trials(3)
        .look_back(3)
        .tolerance(0.3)
        .give_up_hours(10.0 / 3600.0)
        .verbose(true)
        .build()?;

    std::fs::create_dir_all("target")?;
    run("insertion_sort", SortSubject::new(256, insertion_sort), &config)?;
    run("std_sort", SortSubject::new(4096, std_sort), &config)?;
    Ok(())
}
