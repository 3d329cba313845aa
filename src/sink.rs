//! Output sinks for measurements
//!
//! The experiment loop hands every measurement to a [`MeasurementSink`] as soon
//! as it is appended, and flushes the sink when the run ends.

use std::io::Write;

use serde::Serialize;

use crate::config::ExperimentConfig;
use crate::experiment::Measurement;
use crate::Result;

/// Destination for measurements as they are recorded.
pub trait MeasurementSink {
    /// Record one measurement.
    ///
    /// # Errors
    ///
    /// Returns an error if the measurement cannot be written.
    fn record(&mut self, measurement: &Measurement) -> Result<()>;

    /// Flush buffered output.
    ///
    /// # Errors
    ///
    /// Returns an error if buffered output cannot be written.
    fn flush(&mut self) -> Result<()> {
        Ok(())
    }
}

/// Discards everything.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullSink;

impl MeasurementSink for NullSink {
    fn record(&mut self, _measurement: &Measurement) -> Result<()> {
        Ok(())
    }
}

/// Keeps a copy of every measurement in memory.
#[derive(Debug, Clone, Default)]
pub struct MemorySink {
    measurements: Vec<Measurement>,
    flushes: usize,
}

impl MemorySink {
    /// Create an empty sink.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Measurements recorded so far.
    #[must_use]
    pub fn measurements(&self) -> &[Measurement] {
        &self.measurements
    }

    /// Number of times the sink was flushed.
    #[must_use]
    pub const fn flushes(&self) -> usize {
        self.flushes
    }
}

impl MeasurementSink for MemorySink {
    fn record(&mut self, measurement: &Measurement) -> Result<()> {
        self.measurements.push(measurement.clone());
        Ok(())
    }

    fn flush(&mut self) -> Result<()> {
        self.flushes += 1;
        Ok(())
    }
}

#[derive(Serialize)]
struct Header<'a> {
    experiment: &'a str,
    config: &'a ExperimentConfig,
}

/// Writes one JSON object per line.
///
/// An optional header line carries the experiment name and configuration so
/// a results file is self-describing.
#[derive(Debug)]
pub struct JsonLinesSink<W: Write> {
    writer: W,
}

impl<W: Write> JsonLinesSink<W> {
    /// Create a sink without a header line.
    pub const fn new(writer: W) -> Self {
        Self { writer }
    }

    /// Create a sink and write a header line describing the experiment.
    ///
    /// # Errors
    ///
    /// Returns an error if the header cannot be written.
    pub fn with_header(mut writer: W, experiment: &str, config: &ExperimentConfig) -> Result<Self> {
        serde_json::to_writer(&mut writer, &Header { experiment, config })?;
        writer.write_all(b"\n")?;
        Ok(Self { writer })
    }

    /// Consume the sink and return the writer.
    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl<W: Write> MeasurementSink for JsonLinesSink<W> {
    fn record(&mut self, measurement: &Measurement) -> Result<()> {
        serde_json::to_writer(&mut self.writer, measurement)?;
        self.writer.write_all(b"\n")?;
        Ok(())
    }

    fn flush(&mut self) -> Result<()> {
        self.writer.flush()?;
        Ok(())
    }
}
