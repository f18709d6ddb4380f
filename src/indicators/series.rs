// =============================================================================
// Numeric Series — indicator output anchored to an absolute bar index
// =============================================================================
//
// Windowed indicators produce fewer values than there are bars. Rather than
// padding with NaN, each series records the bar index of its first element so
// that series of different lengths can be lined up by index arithmetic.
// =============================================================================

use std::ops::Deref;

use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct Series {
    /// Absolute bar index of `values[0]`.
    start: usize,
    values: Vec<f64>,
}

impl Series {
    pub fn new(start: usize, values: Vec<f64>) -> Self {
        Self { start, values }
    }

    /// An empty series that would have begun at bar `start`.
    pub fn empty(start: usize) -> Self {
        Self {
            start,
            values: Vec::new(),
        }
    }

    pub fn start(&self) -> usize {
        self.start
    }

    /// One past the absolute bar index of the last element.
    pub fn end(&self) -> usize {
        self.start + self.values.len()
    }

    pub fn values(&self) -> &[f64] {
        &self.values
    }

    pub fn into_values(self) -> Vec<f64> {
        self.values
    }

    /// Look up the value computed for absolute bar index `bar_index`.
    pub fn at(&self, bar_index: usize) -> Option<f64> {
        bar_index
            .checked_sub(self.start)
            .and_then(|i| self.values.get(i))
            .copied()
    }

    /// Most recent value, if any.
    pub fn latest(&self) -> Option<f64> {
        self.values.last().copied()
    }
}

impl Deref for Series {
    type Target = [f64];

    fn deref(&self) -> &[f64] {
        &self.values
    }
}
