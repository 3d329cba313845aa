//! Growth classification from doubling ratios
//!
//! Doubling the input of an `O(f(n))` operation multiplies its cost by roughly
//! `f(2n) / f(n)`. [`DoublingRatioTable`] maps an observed ratio to the nearest
//! canonical class by that expected multiplier.

use crate::experiment::ResultStore;

/// Canonical growth classes, ordered by increasing growth rate.
///
/// Indices `0` and `1` are constant and logarithmic growth; the tuner keeps
/// doubling while the observed ratio maps to either of them.
pub const CANONICAL_CLASSES: [(&str, f64); 7] = [
    ("O(1)", 1.0),
    ("O(log n)", 1.1),
    ("O(n)", 2.0),
    ("O(n log n)", 2.2),
    ("O(n^2)", 4.0),
    ("O(n^3)", 8.0),
    ("O(n^4)", 16.0),
];

/// Highest class index that still counts as constant or logarithmic growth.
pub const SUBLINEAR_MAX_INDEX: usize = 1;

/// Maps doubling ratios to growth classes.
pub trait GrowthClassifier {
    /// Index of the canonical class whose doubling ratio is nearest `ratio`.
    ///
    /// Indices are ordered by increasing growth; `≤ 1` means constant or
    /// logarithmic.
    fn nearest_class_index(&self, ratio: f64) -> usize;

    /// Human-readable label for a finished experiment.
    fn label(&self, store: &ResultStore) -> String;
}

/// Nearest-neighbour lookup in [`CANONICAL_CLASSES`].
#[derive(Debug, Clone, Copy, Default)]
pub struct DoublingRatioTable;

impl DoublingRatioTable {
    /// Create the default classifier.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl GrowthClassifier for DoublingRatioTable {
    fn nearest_class_index(&self, ratio: f64) -> usize {
        CANONICAL_CLASSES
            .iter()
            .enumerate()
            .min_by(|(_, (_, a)), (_, (_, b))| {
                (a - ratio).abs().total_cmp(&(b - ratio).abs())
            })
            .map_or(0, |(idx, _)| idx)
    }

    fn label(&self, store: &ResultStore) -> String {
        match store.ratio(0) {
            Ok(ratio) if ratio.is_finite() => {
                CANONICAL_CLASSES[self.nearest_class_index(ratio)].0.to_string()
            }
            _ => "unknown".to_string(),
        }
    }
}
