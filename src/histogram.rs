//! Integer-binned observation counts.
//!
//! A [`Histogram`] of size `n` counts observations in bins `0..n`. It is
//! the observed side of a goodness-of-fit test against a
//! [`DiscreteDistribution`].

use crate::distribution::DiscreteDistribution;
use crate::error::DistributionError;
use crate::testing::{self, TestResult};

/// Fixed-size histogram over the bins `0..size`.
///
/// # Examples
/// ```
/// use u_discrete::histogram::Histogram;
///
/// let mut h = Histogram::new(3);
/// h.add(0).unwrap();
/// h.add(2).unwrap();
/// h.add_clamped(7).unwrap();
/// assert_eq!(h.counts(), &[1, 0, 2]);
/// assert_eq!(h.total(), 3);
/// assert!(h.add(3).is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Histogram {
    counts: Vec<u64>,
    total: u64,
}

impl Histogram {
    /// Creates an empty histogram with `size` bins.
    pub fn new(size: usize) -> Self {
        Self {
            counts: vec![0; size],
            total: 0,
        }
    }

    /// Records one observation in bin `k`.
    ///
    /// # Errors
    /// Returns [`DistributionError::IndexOutOfRange`] if `k` is not in `0..len()`.
    pub fn add(&mut self, k: i64) -> Result<(), DistributionError> {
        let index = usize::try_from(k)
            .ok()
            .filter(|&i| i < self.counts.len())
            .ok_or(DistributionError::IndexOutOfRange {
                index: k,
                size: self.counts.len(),
            })?;
        self.record(index);
        Ok(())
    }

    /// Records one observation, sending values below zero to the first bin
    /// and values at or beyond `len()` to the last.
    ///
    /// # Errors
    /// Returns [`DistributionError::IndexOutOfRange`] only if the histogram
    /// has no bins.
    pub fn add_clamped(&mut self, k: i64) -> Result<(), DistributionError> {
        let last = self
            .counts
            .len()
            .checked_sub(1)
            .ok_or(DistributionError::IndexOutOfRange { index: k, size: 0 })?;
        let index = usize::try_from(k.max(0)).map_or(last, |i| i.min(last));
        self.record(index);
        Ok(())
    }

    fn record(&mut self, index: usize) {
        self.counts[index] += 1;
        self.total += 1;
    }

    /// Number of bins.
    pub fn len(&self) -> usize {
        self.counts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    /// Count in bin `i`, or `None` outside `0..len()`.
    pub fn count(&self, i: usize) -> Option<u64> {
        self.counts.get(i).copied()
    }

    pub fn counts(&self) -> &[u64] {
        &self.counts
    }

    /// Total observations recorded.
    pub fn total(&self) -> u64 {
        self.total
    }

    /// Chi-squared goodness-of-fit test of these counts against `distribution`.
    ///
    /// See [`testing::chi_squared_test`].
    pub fn chi_squared_test(&self, distribution: &dyn DiscreteDistribution) -> TestResult {
        testing::chi_squared_test(self, distribution)
    }

    /// As [`chi_squared_test`](Self::chi_squared_test), with a custom floor
    /// for the expected count of each merged group.
    ///
    /// # Errors
    /// Returns `Err` if `min_expected` is not finite and positive.
    pub fn chi_squared_test_with(
        &self,
        distribution: &dyn DiscreteDistribution,
        min_expected: f64,
    ) -> Result<TestResult, DistributionError> {
        testing::chi_squared_test_with(self, distribution, min_expected)
    }
}
