//! Chi-squared goodness-of-fit testing.
//!
//! Compares the counts in a [`Histogram`] against the counts a
//! [`DiscreteDistribution`] predicts for the same number of observations.
//!
//! # Algorithm
//!
//! 1. Expected count for bin `i` is `total·P(X = i)`. The first bin also
//!    absorbs the left tail (`total·P(X ≤ 0)`) and the last bin the right
//!    tail (`total·P(X ≥ size−1)`), so expected counts sum to `total`.
//! 2. Bins are merged left to right into groups until each group expects at
//!    least [`MIN_EXPECTED_COUNT`] observations; a short remainder joins the
//!    last group.
//! 3. χ² = Σ (O − E)²/E over the groups, with `groups − 1` degrees of
//!    freedom (the distribution's parameters are given, not fitted).
//!
//! # Examples
//!
//! ```
//! use u_discrete::distributions::Binomial;
//! use u_discrete::histogram::Histogram;
//!
//! // Exactly the expected counts for 16 draws of Binomial(0.5, 4).
//! let mut h = Histogram::new(5);
//! for (k, n) in [1, 4, 6, 4, 1].into_iter().enumerate() {
//!     for _ in 0..n {
//!         h.add(k as i64).unwrap();
//!     }
//! }
//! let result = h.chi_squared_test(&Binomial::new(0.5, 4).unwrap());
//! assert!(result.statistic() < 1e-12);
//! assert!(result.right_probability() > 0.99);
//! ```

use tracing::debug;

use crate::distribution::DiscreteDistribution;
use crate::error::DistributionError;
use crate::histogram::Histogram;
use crate::special;
use crate::stats;

/// Default floor on the expected count of each merged group.
pub const MIN_EXPECTED_COUNT: f64 = 5.0;

// ---------------------------------------------------------------------------
// Reference distribution
// ---------------------------------------------------------------------------

/// Chi-squared distribution with an integer number of degrees of freedom.
///
/// With zero degrees of freedom it is a point mass at zero, and the tail
/// functions are taken as `P(X < x)` and `P(X ≥ x)` so that a zero
/// statistic is never significant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChiSquared {
    dof: u32,
}

impl ChiSquared {
    pub fn new(dof: u32) -> Self {
        Self { dof }
    }

    pub fn degrees_of_freedom(&self) -> u32 {
        self.dof
    }

    /// P(X ≤ x).
    pub fn cdf(&self, x: f64) -> f64 {
        if self.dof == 0 {
            return if x > 0.0 { 1.0 } else { 0.0 };
        }
        if x == f64::INFINITY {
            return 1.0;
        }
        special::chi_squared_cdf(x, self.dof as f64)
    }

    /// P(X > x), evaluated directly in the upper tail.
    pub fn right_probability(&self, x: f64) -> f64 {
        if self.dof == 0 {
            return if x > 0.0 { 0.0 } else { 1.0 };
        }
        if x == f64::INFINITY {
            return 0.0;
        }
        special::chi_squared_sf(x, self.dof as f64)
    }

    pub fn mean(&self) -> f64 {
        self.dof as f64
    }

    pub fn variance(&self) -> f64 {
        2.0 * self.dof as f64
    }
}

// ---------------------------------------------------------------------------
// Test result
// ---------------------------------------------------------------------------

/// Outcome of a goodness-of-fit test: the statistic and the distribution it
/// follows under the null hypothesis.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TestResult {
    statistic: f64,
    distribution: ChiSquared,
}

impl TestResult {
    pub fn new(statistic: f64, distribution: ChiSquared) -> Self {
        Self {
            statistic,
            distribution,
        }
    }

    pub fn statistic(&self) -> f64 {
        self.statistic
    }

    pub fn distribution(&self) -> ChiSquared {
        self.distribution
    }

    /// Probability of a statistic at least this large under the null
    /// hypothesis (the p-value).
    pub fn right_probability(&self) -> f64 {
        self.distribution.right_probability(self.statistic)
    }

    pub fn left_probability(&self) -> f64 {
        self.distribution.cdf(self.statistic)
    }
}

// ---------------------------------------------------------------------------
// Goodness of fit
// ---------------------------------------------------------------------------

/// Chi-squared test of `histogram` against `distribution`, merging bins up
/// to [`MIN_EXPECTED_COUNT`].
pub fn chi_squared_test(histogram: &Histogram, distribution: &dyn DiscreteDistribution) -> TestResult {
    goodness_of_fit(histogram, distribution, MIN_EXPECTED_COUNT)
}

/// Chi-squared test with a caller-chosen floor for each group's expected count.
///
/// # Errors
/// Returns `Err` if `min_expected` is not finite and positive.
pub fn chi_squared_test_with(
    histogram: &Histogram,
    distribution: &dyn DiscreteDistribution,
    min_expected: f64,
) -> Result<TestResult, DistributionError> {
    if !min_expected.is_finite() || min_expected <= 0.0 {
        return Err(DistributionError::parameter(
            "min_expected",
            format!("must be finite and positive, got {min_expected}"),
        ));
    }
    Ok(goodness_of_fit(histogram, distribution, min_expected))
}

/// Observed and expected counts of one merged run of bins.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
struct Group {
    observed: f64,
    expected: f64,
}

impl Group {
    fn absorb(&mut self, other: Group) {
        self.observed += other.observed;
        self.expected += other.expected;
    }

    /// Contribution `(O − E)²/E`. Observations where none are expected make
    /// the fit impossible.
    fn contribution(&self) -> f64 {
        if self.expected > 0.0 {
            (self.observed - self.expected).powi(2) / self.expected
        } else if self.observed > 0.0 {
            f64::INFINITY
        } else {
            0.0
        }
    }
}

/// `Σ (O − E)²/E` over the merged groups.
fn statistic(groups: &[Group]) -> f64 {
    let contributions: Vec<f64> = groups.iter().map(Group::contribution).collect();
    stats::kahan_sum(&contributions)
}

fn goodness_of_fit(
    histogram: &Histogram,
    distribution: &dyn DiscreteDistribution,
    min_expected: f64,
) -> TestResult {
    let expected = expected_counts(histogram, distribution);
    let groups = merge_bins(histogram.counts(), &expected, min_expected);

    let statistic = statistic(&groups);
    let dof = u32::try_from(groups.len().saturating_sub(1)).unwrap_or(u32::MAX);
    debug!(
        bins = histogram.len(),
        groups = groups.len(),
        dof,
        statistic,
        "chi-squared goodness of fit"
    );
    TestResult::new(statistic, ChiSquared::new(dof))
}

/// `total·P(bin)` per bin, with the end bins absorbing the tails.
fn expected_counts(histogram: &Histogram, distribution: &dyn DiscreteDistribution) -> Vec<f64> {
    let size = histogram.len();
    let total = histogram.total() as f64;
    (0..size)
        .map(|i| {
            let k = i as i64;
            let probability = if size == 1 {
                1.0
            } else if i == 0 {
                distribution.left_inclusive_probability(0)
            } else if i == size - 1 {
                distribution.right_exclusive_probability(k - 1)
            } else {
                distribution.probability_mass(k)
            };
            total * probability
        })
        .collect()
}

/// Merges adjacent bins until every group expects at least `min_expected`.
fn merge_bins(observed: &[u64], expected: &[f64], min_expected: f64) -> Vec<Group> {
    let mut groups: Vec<Group> = Vec::new();
    let mut current = Group::default();
    for (&o, &e) in observed.iter().zip(expected) {
        current.absorb(Group {
            observed: o as f64,
            expected: e,
        });
        if current.expected >= min_expected {
            groups.push(current);
            current = Group::default();
        }
    }
    if current.observed > 0.0 || current.expected > 0.0 {
        match groups.last_mut() {
            Some(last) => last.absorb(current),
            None => groups.push(current),
        }
    }
    groups
}
