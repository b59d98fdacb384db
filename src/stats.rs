//! Compensated summation for probability accumulation.
//!
//! Expectation values, summed CDFs, and goodness-of-fit statistics add up
//! hundreds of terms of very different magnitude. Plain `+=` loses the
//! low-order bits of the small terms; [`CompensatedSum`] recovers them.
//!
//! # Algorithm
//! Neumaier's improved Kahan–Babuška summation, which also handles the
//! case where the addend is larger in magnitude than the running sum.
//!
//! Reference: Neumaier (1974), "Rundungsfehleranalyse einiger Verfahren
//! zur Summation endlicher Summen", *Zeitschrift für Angewandte
//! Mathematik und Mechanik* 54(1), pp. 39–51.

/// Running compensated sum.
///
/// # Examples
/// ```
/// use u_discrete::stats::CompensatedSum;
/// let mut acc = CompensatedSum::new();
/// acc.add(1.0);
/// acc.add(1e-16);
/// acc.add(-1.0);
/// assert_eq!(acc.value(), 1e-16);
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct CompensatedSum {
    sum: f64,
    compensation: f64,
}

impl CompensatedSum {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds `x`, capturing the bits lost to rounding in the compensation term.
    pub fn add(&mut self, x: f64) {
        let t = self.sum + x;
        if self.sum.abs() >= x.abs() {
            self.compensation += (self.sum - t) + x;
        } else {
            self.compensation += (x - t) + self.sum;
        }
        self.sum = t;
    }

    /// Current value of the sum. An infinite or NaN running sum is returned
    /// as is.
    pub fn value(&self) -> f64 {
        if self.sum.is_finite() {
            self.sum + self.compensation
        } else {
            self.sum
        }
    }
}

impl Extend<f64> for CompensatedSum {
    fn extend<I: IntoIterator<Item = f64>>(&mut self, iter: I) {
        for x in iter {
            self.add(x);
        }
    }
}

impl FromIterator<f64> for CompensatedSum {
    fn from_iter<I: IntoIterator<Item = f64>>(iter: I) -> Self {
        let mut acc = Self::new();
        acc.extend(iter);
        acc
    }
}

/// Compensated sum of a slice.
///
/// # Complexity
/// Time: O(n), Space: O(1)
pub fn kahan_sum(data: &[f64]) -> f64 {
    data.iter().copied().collect::<CompensatedSum>().value()
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(300))]

        #[test]
        fn incremental_matches_slice(data in proptest::collection::vec(-1e6_f64..1e6, 0..100)) {
            let mut acc = CompensatedSum::new();
            for &x in &data {
                acc.add(x);
            }
            prop_assert_eq!(acc.value(), kahan_sum(&data));
        }

        #[test]
        fn order_insensitive_to_tolerance(data in proptest::collection::vec(-1e3_f64..1e3, 1..100)) {
            let forward = kahan_sum(&data);
            let reversed: Vec<f64> = data.iter().rev().copied().collect();
            let backward = kahan_sum(&reversed);
            prop_assert!((forward - backward).abs() <= 1e-9 * (1.0 + forward.abs()));
        }
    }
}
