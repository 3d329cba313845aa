//! Result Store - append-only series of measurements for one experiment
//!
//! Measurements are kept in temporal order and aggregated per level as they
//! arrive, so ratio queries never rescan the raw series.

use serde::Serialize;

use super::Measurement;
use crate::{Error, Result};

/// Running aggregate of one level's trials.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
struct LevelAggregate {
    sum_ns: f64,
    trials: usize,
}

impl LevelAggregate {
    #[allow(clippy::cast_precision_loss)]
    fn mean(self) -> f64 {
        self.sum_ns / self.trials as f64
    }
}

/// Append-only store of measurements.
///
/// ## Invariants
///
/// - Levels are contiguous from 0: each appended level equals the last level
///   or the last level plus one.
/// - Nothing is ever removed.
///
/// ## Ratios
///
/// `ratio(k)` divides the mean of a level by the mean of the level before it,
/// newer over older. `k = 0` is the most recent growth step. Means are
/// arithmetic means over the level's trials.
#[derive(Debug, Clone, Default, Serialize, PartialEq)]
pub struct ResultStore {
    measurements: Vec<Measurement>,
    #[serde(skip)]
    levels: Vec<LevelAggregate>,
}

impl ResultStore {
    /// Create a new empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuild a store from previously recorded measurements.
    ///
    /// # Errors
    ///
    /// Returns the same errors as [`ResultStore::push`] for the first
    /// measurement that breaks the store's invariants.
    pub fn from_measurements(measurements: impl IntoIterator<Item = Measurement>) -> Result<Self> {
        let mut store = Self::new();
        for m in measurements {
            store.push(m)?;
        }
        Ok(store)
    }

    /// Append one trial's elapsed time at `level`.
    ///
    /// # Errors
    ///
    /// - [`Error::NonContiguousLevel`] if `level` would leave a gap or go back
    /// - [`Error::InvalidMeasurement`] if `elapsed_ns` is negative or not finite
    pub fn append(&mut self, level: usize, elapsed_ns: f64) -> Result<()> {
        self.push(Measurement::new(level, elapsed_ns))
    }

    /// Append an already constructed measurement.
    ///
    /// # Errors
    ///
    /// See [`ResultStore::append`].
    pub fn push(&mut self, measurement: Measurement) -> Result<()> {
        let elapsed = measurement.elapsed_ns();
        if !elapsed.is_finite() || elapsed < 0.0 {
            return Err(Error::InvalidMeasurement(format!(
                "elapsed time must be finite and non-negative, got {elapsed}"
            )));
        }

        let level = measurement.level();
        let next = self.levels.len();
        if level + 1 == next {
            // same level as the previous trial
        } else if level == next {
            self.levels.push(LevelAggregate::default());
        } else {
            return Err(Error::NonContiguousLevel {
                expected: next,
                got: level,
            });
        }

        let agg = &mut self.levels[level];
        agg.sum_ns += elapsed;
        agg.trials += 1;
        self.measurements.push(measurement);
        Ok(())
    }

    /// Total number of measurements (trials), not levels.
    #[must_use]
    pub fn size(&self) -> usize {
        self.measurements.len()
    }

    /// Check if the store holds no measurements.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.measurements.is_empty()
    }

    /// Number of distinct levels recorded.
    #[must_use]
    pub fn level_count(&self) -> usize {
        self.levels.len()
    }

    /// Elapsed time of the most recent measurement.
    #[must_use]
    pub fn latest(&self) -> Option<f64> {
        self.measurements.last().map(Measurement::elapsed_ns)
    }

    /// Growth ratio of the `k`-th most recent level step.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InsufficientData`] if fewer than `k + 2` levels exist.
    pub fn ratio(&self, k: usize) -> Result<f64> {
        let count = self.levels.len();
        if count < k + 2 {
            return Err(Error::InsufficientData {
                required: k + 2,
                available: count,
            });
        }
        let newer = self.levels[count - 1 - k].mean();
        let older = self.levels[count - 2 - k].mean();
        Ok(newer / older)
    }

    /// All available ratios, most recent first.
    #[must_use]
    pub fn ratios(&self) -> Vec<f64> {
        self.levels
            .windows(2)
            .rev()
            .map(|w| w[1].mean() / w[0].mean())
            .collect()
    }

    /// Mean elapsed time per level, indexed by level.
    #[must_use]
    pub fn level_means(&self) -> Vec<f64> {
        self.levels.iter().map(|agg| agg.mean()).collect()
    }

    /// All measurements in insertion order.
    #[must_use]
    pub fn measurements(&self) -> &[Measurement] {
        &self.measurements
    }

    /// Iterate over measurements in insertion order.
    pub fn iter(&self) -> std::slice::Iter<'_, Measurement> {
        self.measurements.iter()
    }
}

impl<'a> IntoIterator for &'a ResultStore {
    type Item = &'a Measurement;
    type IntoIter = std::slice::Iter<'a, Measurement>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store_with(levels: &[&[f64]]) -> ResultStore {
        let mut store = ResultStore::new();
        for (level, trials) in levels.iter().enumerate() {
            for &t in *trials {
                store.append(level, t).unwrap();
            }
        }
        store
    }

    #[test]
    fn test_store_default() {
        let store = ResultStore::new();
        assert!(store.is_empty());
        assert_eq!(store.size(), 0);
        assert_eq!(store.level_count(), 0);
        assert!(store.latest().is_none());
    }

    #[test]
    fn test_size_counts_trials_not_levels() {
        let store = store_with(&[&[1.0, 2.0, 3.0], &[4.0, 5.0]]);
        assert_eq!(store.size(), 5);
        assert_eq!(store.level_count(), 2);
        assert!((store.latest().unwrap() - 5.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_ratio_uses_level_means() {
        // level 0 mean = 100, level 1 mean = 300
        let store = store_with(&[&[50.0, 150.0], &[200.0, 400.0]]);
        let r = store.ratio(0).unwrap();
        assert!((r - 3.0).abs() < 1e-12);
    }

    #[test]
    fn test_ratio_indexing_newest_first() {
        let store = store_with(&[&[100.0], &[200.0], &[800.0]]);
        assert!((store.ratio(0).unwrap() - 4.0).abs() < 1e-12);
        assert!((store.ratio(1).unwrap() - 2.0).abs() < 1e-12);
        assert_eq!(store.ratios(), vec![4.0, 2.0]);
    }

    #[test]
    fn test_ratio_insufficient_data() {
        let store = store_with(&[&[100.0], &[200.0]]);
        assert!(store.ratio(0).is_ok());
        match store.ratio(1) {
            Err(Error::InsufficientData {
                required,
                available,
            }) => {
                assert_eq!(required, 3);
                assert_eq!(available, 2);
            }
            other => panic!("expected InsufficientData, got {other:?}"),
        }
    }

    #[test]
    fn test_append_rejects_gap() {
        let mut store = ResultStore::new();
        assert!(matches!(
            store.append(1, 10.0),
            Err(Error::NonContiguousLevel {
                expected: 0,
                got: 1
            })
        ));
        store.append(0, 10.0).unwrap();
        assert!(store.append(2, 10.0).is_err());
        assert_eq!(store.size(), 1);
    }

    #[test]
    fn test_append_rejects_going_back() {
        let store_levels: &[&[f64]] = &[&[1.0], &[2.0], &[3.0]];
        let mut store = store_with(store_levels);
        assert!(store.append(1, 4.0).is_err());
        assert!(store.append(2, 4.0).is_ok());
    }

    #[test]
    fn test_append_rejects_invalid_elapsed() {
        let mut store = ResultStore::new();
        assert!(matches!(
            store.append(0, -1.0),
            Err(Error::InvalidMeasurement(_))
        ));
        assert!(store.append(0, f64::NAN).is_err());
        assert!(store.append(0, f64::INFINITY).is_err());
        assert!(store.is_empty());
    }

    #[test]
    fn test_level_means() {
        let store = store_with(&[&[10.0, 30.0], &[40.0]]);
        assert_eq!(store.level_means(), vec![20.0, 40.0]);
    }

    #[test]
    fn test_from_measurements_rebuilds_aggregates() {
        let original = store_with(&[&[10.0, 30.0], &[40.0], &[80.0]]);
        let rebuilt = ResultStore::from_measurements(original.iter().cloned()).unwrap();
        assert_eq!(rebuilt, original);
        assert!((rebuilt.ratio(0).unwrap() - 2.0).abs() < 1e-12);
    }
}
