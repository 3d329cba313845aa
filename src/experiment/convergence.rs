//! Convergence detection over the ratio series

use tracing::debug;

use super::ResultStore;
use crate::Result;

/// Decides whether recent growth ratios have stopped drifting.
///
/// The drift is the absolute value of the summed successive differences of the
/// last `look_back` ratios, which telescopes to `|ratio(0) − ratio(look_back − 1)|`
/// when all ratios are finite. With `look_back = 1` the sum is empty, the
/// drift is zero and convergence reduces to the `min_runs` gate; use
/// `look_back ≥ 2` for a meaningful check.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ConvergenceDetector {
    min_runs: usize,
    look_back: usize,
    tolerance: f64,
}

impl ConvergenceDetector {
    /// Create a detector.
    #[must_use]
    pub const fn new(min_runs: usize, look_back: usize, tolerance: f64) -> Self {
        Self {
            min_runs,
            look_back,
            tolerance,
        }
    }

    /// Minimum raw measurement count before convergence can be declared.
    #[must_use]
    pub const fn min_runs(&self) -> usize {
        self.min_runs
    }

    /// Number of ratios inspected.
    #[must_use]
    pub const fn look_back(&self) -> usize {
        self.look_back
    }

    /// Maximum drift accepted as converged.
    #[must_use]
    pub const fn tolerance(&self) -> f64 {
        self.tolerance
    }

    /// Net drift across the last `look_back` ratios.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::InsufficientData`] if fewer than
    /// `look_back + 1` levels exist.
    pub fn drift(&self, store: &ResultStore) -> Result<f64> {
        let ratios = (0..self.look_back)
            .map(|k| store.ratio(k))
            .collect::<Result<Vec<f64>>>()?;

        let change: f64 = ratios.windows(2).map(|w| w[0] - w[1]).sum();
        Ok(change.abs())
    }

    /// Whether the ratio series has stabilized within tolerance.
    ///
    /// Returns `false` while fewer than `min_runs` measurements or fewer than
    /// `look_back + 1` levels have been recorded.
    ///
    /// # Errors
    ///
    /// Propagates errors from the ratio accessor; none occur once the level
    /// gate has passed.
    pub fn has_converged(&self, store: &ResultStore) -> Result<bool> {
        if store.size() < self.min_runs {
            return Ok(false);
        }
        if store.level_count() < self.look_back + 1 {
            return Ok(false);
        }

        let change = self.drift(store)?;
        let ratio = store.ratio(0)?;
        debug!(
            change,
            ratio,
            tolerance = self.tolerance,
            "convergence check"
        );
        Ok(change <= self.tolerance)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn series(times: &[f64]) -> ResultStore {
        let mut store = ResultStore::new();
        for (level, &t) in times.iter().enumerate() {
            store.append(level, t).unwrap();
        }
        store
    }

    #[test]
    fn test_min_runs_gate() {
        let detector = ConvergenceDetector::new(10, 2, 0.01);
        let store = series(&[100.0, 200.0, 400.0, 800.0]);
        assert!(!detector.has_converged(&store).unwrap());
    }

    #[test]
    fn test_constant_ratio_converges() {
        let detector = ConvergenceDetector::new(3, 2, 0.01);
        let store = series(&[100.0, 200.0, 400.0]);
        assert!(detector.has_converged(&store).unwrap());
        assert!(detector.drift(&store).unwrap().abs() < 1e-12);
    }

    #[test]
    fn test_level_gate_with_repeated_trials() {
        // 4 raw measurements but only 2 levels; look_back 2 needs 3 levels
        let detector = ConvergenceDetector::new(3, 2, 0.01);
        let mut store = ResultStore::new();
        store.append(0, 100.0).unwrap();
        store.append(0, 100.0).unwrap();
        store.append(1, 200.0).unwrap();
        store.append(1, 200.0).unwrap();
        assert!(!detector.has_converged(&store).unwrap());
    }

    #[test]
    fn test_drifting_ratio_does_not_converge() {
        let detector = ConvergenceDetector::new(4, 3, 0.1);
        // ratios oldest→newest: 2, 3, 4
        let store = series(&[100.0, 200.0, 600.0, 2400.0]);
        let drift = detector.drift(&store).unwrap();
        assert!((drift - 2.0).abs() < 1e-9);
        assert!(!detector.has_converged(&store).unwrap());
    }

    #[test]
    fn test_oscillation_cancels() {
        // ratios oldest→newest: 2, 3, 2; differences cancel
        let detector = ConvergenceDetector::new(4, 3, 0.01);
        let store = series(&[100.0, 200.0, 600.0, 1200.0]);
        assert!(detector.has_converged(&store).unwrap());
    }

    #[test]
    fn test_look_back_one_is_vacuous() {
        let detector = ConvergenceDetector::new(2, 1, 0.0);
        let store = series(&[100.0, 10_000.0]);
        assert!(detector.drift(&store).unwrap().abs() < f64::EPSILON);
        assert!(detector.has_converged(&store).unwrap());
    }
}
