//! Cumulative per-field value ranges.
//!
//! Ranges only ever widen. A fresh entry starts at `(+inf, -inf)` so the
//! first recorded sample sets both bounds.

use indexmap::IndexMap;

use cumulus_core::Sample;

/// Observed `(min, max)` of a field over every saved sample.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DataRange {
    /// Smallest value seen.
    pub min: f64,
    /// Largest value seen.
    pub max: f64,
}

impl DataRange {
    /// The seed range: nothing observed yet.
    pub const EMPTY: DataRange = DataRange {
        min: f64::INFINITY,
        max: f64::NEG_INFINITY,
    };

    /// Whether no finite sample has been folded in.
    pub fn is_empty(&self) -> bool {
        self.min > self.max
    }

    /// Widen to cover `(lo, hi)`.
    pub fn widen(&mut self, (lo, hi): (f64, f64)) {
        self.min = self.min.min(lo);
        self.max = self.max.max(hi);
    }

    /// The range as a `(min, max)` tuple.
    pub fn as_tuple(&self) -> (f64, f64) {
        (self.min, self.max)
    }
}

impl Default for DataRange {
    fn default() -> Self {
        Self::EMPTY
    }
}

/// Field name → [`DataRange`], in first-save order.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct RangeTable {
    ranges: IndexMap<String, DataRange>,
}

impl RangeTable {
    /// An empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Fold `sample` into the range of `name`, creating the entry if needed.
    ///
    /// Samples with no comparable value (all NaN) still create the entry.
    pub fn record(&mut self, name: &str, sample: Sample<'_>) {
        if !self.ranges.contains_key(name) {
            self.ranges.insert(name.to_string(), DataRange::EMPTY);
        }
        if let (Some(range), Some(extent)) = (self.ranges.get_mut(name), sample.extent()) {
            range.widen(extent);
        }
    }

    /// Range of `name`, if it was ever recorded.
    pub fn get(&self, name: &str) -> Option<DataRange> {
        self.ranges.get(name).copied()
    }

    /// Number of tracked fields.
    pub fn len(&self) -> usize {
        self.ranges.len()
    }

    /// Whether no field has been recorded.
    pub fn is_empty(&self) -> bool {
        self.ranges.is_empty()
    }

    /// Iterate `(name, range)` in first-save order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, DataRange)> {
        self.ranges.iter().map(|(k, v)| (k.as_str(), *v))
    }

    /// Forget every range.
    pub fn clear(&mut self) {
        self.ranges.clear();
    }
}
