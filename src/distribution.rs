//! The discrete distribution contract.
//!
//! [`DiscreteDistribution`] needs only two primitives from an implementor,
//! [`support`](DiscreteDistribution::support) and
//! [`probability_mass`](DiscreteDistribution::probability_mass). Everything
//! else (cumulative probabilities, quantiles, moments, sampling) has a
//! default built on those two, and concrete distributions override the
//! defaults with closed forms where they have them.
//!
//! The default algorithms are also exported as free functions
//! ([`summed_left_inclusive`], [`refine_quantile`], [`summed_expectation`],
//! ...) so an override can fall back to, or seed, the generic machinery.
//!
//! # Conventions
//! - `left_inclusive_probability(k)` = P(X ≤ k)
//! - `left_exclusive_probability(k)` = P(X < k)
//! - `right_exclusive_probability(k)` = P(X > k)
//!
//! For every integer `k`, inside the support or not,
//! `P(X ≤ k) + P(X > k) = 1` up to rounding.

use rand::RngCore;
use tracing::{trace, warn};

use crate::error::DistributionError;
use crate::interval::{Endpoint, Interval};
use crate::random;
use crate::special;
use crate::stats::CompensatedSum;

/// Remaining tail probability below which summation over an unbounded
/// support stops.
pub const TAIL_TOLERANCE: f64 = 1e-14;

/// Terms a default expectation may run past its tail horizon, and the cap
/// on the mass sums behind the default CDFs.
pub const MAX_SUMMATION_TERMS: u64 = 1 << 24;

/// Absolute bound on the terms a single expectation visits, however far its
/// tail horizon lies.
const SUMMATION_CEILING: u64 = 1 << 32;

/// Bounded supports at most this wide seed the quantile search at their
/// left endpoint instead of a normal approximation.
const NARROW_SUPPORT_WIDTH: u64 = 64;

/// A probability distribution over the integers.
///
/// Implementations are immutable values: parameters are validated once at
/// construction and every query is a pure function of its argument.
///
/// # Examples
/// A distribution supplying only its support and mass function gets the
/// full contract from the defaults:
/// ```
/// use u_discrete::distribution::DiscreteDistribution;
/// use u_discrete::interval::Interval;
///
/// struct Loaded;
///
/// impl DiscreteDistribution for Loaded {
///     fn support(&self) -> Interval {
///         Interval::from_endpoints(1, 3).unwrap()
///     }
///     fn probability_mass(&self, k: i64) -> f64 {
///         match k {
///             1 => 1.0 / 6.0,
///             2 => 2.0 / 6.0,
///             3 => 3.0 / 6.0,
///             _ => 0.0,
///         }
///     }
/// }
///
/// let d = Loaded;
/// assert!((d.mean() - 14.0 / 6.0).abs() < 1e-14);
/// assert_eq!(d.inverse_left_probability(0.5).unwrap(), 2);
/// ```
pub trait DiscreteDistribution {
    /// The integers on which the mass function may be non-zero.
    fn support(&self) -> Interval;

    /// P(X = k). Exactly `0.0` outside [`support`](Self::support).
    fn probability_mass(&self, k: i64) -> f64;

    /// P(X ≤ k).
    fn left_inclusive_probability(&self, k: i64) -> f64 {
        summed_left_inclusive(self, k)
    }

    /// P(X < k).
    fn left_exclusive_probability(&self, k: i64) -> f64 {
        shifted_left_exclusive(self, k)
    }

    /// P(X > k).
    fn right_exclusive_probability(&self, k: i64) -> f64 {
        complement_right_exclusive(self, k)
    }

    /// Quantile function: the unique `K` with `P(X < K) < p ≤ P(X ≤ K)`.
    ///
    /// # Errors
    /// [`DistributionError::InvalidArgument`] if `p` is not in `(0, 1]`.
    fn inverse_left_probability(&self, p: f64) -> Result<i64, DistributionError> {
        searched_inverse_left(self, p)
    }

    /// `Σ f(k)·P(X = k)` over the support.
    fn expectation_value(&self, f: &dyn Fn(i64) -> f64) -> f64 {
        summed_expectation(self, f)
    }

    /// E[Xⁿ].
    fn raw_moment(&self, n: u32) -> f64 {
        if n == 0 {
            return 1.0;
        }
        let exponent = i32::try_from(n).unwrap_or(i32::MAX);
        self.expectation_value(&|k| (k as f64).powi(exponent))
    }

    /// E[(X − μ)ⁿ].
    fn central_moment(&self, n: u32) -> f64 {
        match n {
            0 => 1.0,
            1 => 0.0,
            _ => {
                let mu = self.mean();
                let exponent = i32::try_from(n).unwrap_or(i32::MAX);
                self.expectation_value(&|k| (k as f64 - mu).powi(exponent))
            }
        }
    }

    fn mean(&self) -> f64 {
        self.raw_moment(1)
    }

    fn variance(&self) -> f64 {
        self.central_moment(2)
    }

    fn standard_deviation(&self) -> f64 {
        self.variance().sqrt()
    }

    /// Third standardized moment. A point mass has zero skewness.
    fn skewness(&self) -> f64 {
        let var = self.variance();
        if var <= 0.0 {
            return 0.0;
        }
        self.central_moment(3) / (var * var.sqrt())
    }

    /// Draws one variate by inverting the CDF at a uniform deviate.
    ///
    /// A deviate of exactly zero is treated as infinitesimally positive, so
    /// it maps to the leftmost support point.
    fn random_value(&self, rng: &mut dyn RngCore) -> i64 {
        let p = random::probability_deviate(rng);
        self.inverse_left_probability(p)
            .unwrap_or_else(|_| self.support().left_value())
    }

    /// Draws `count` independent variates.
    fn random_values(&self, rng: &mut dyn RngCore, count: usize) -> Vec<i64> {
        (0..count).map(|_| self.random_value(rng)).collect()
    }
}

// ============================================================================
// Cumulative probabilities
// ============================================================================

/// Default P(X ≤ k): sums the mass function from the nearer finite end.
///
/// - Left end finite: `Σ_{lo..=k}`.
/// - Only the right end finite: `1 − Σ_{k+1..=hi}`.
/// - Both unbounded: sums downward from `k` until a term no longer moves
///   the sum. Distributions with gaps of zero mass below their bulk must
///   override this.
pub fn summed_left_inclusive<D>(d: &D, k: i64) -> f64
where
    D: DiscreteDistribution + ?Sized,
{
    let support = d.support();
    if support.is_left_of(k) {
        return 0.0;
    }
    if support.is_at_or_right_of_end(k) {
        return 1.0;
    }
    match (support.left_endpoint(), support.right_endpoint()) {
        (Endpoint::Finite(lo), _) => sum_masses_upward(d, lo, k),
        (Endpoint::Unbounded, Endpoint::Finite(hi)) => {
            // k < hi here, so k + 1 cannot overflow.
            (1.0 - sum_masses_upward(d, k + 1, hi)).max(0.0)
        }
        (Endpoint::Unbounded, Endpoint::Unbounded) => sum_masses_downward(d, k),
    }
}

/// Default P(X < k), defined as P(X ≤ k − 1) without stepping past a
/// finite left endpoint or `i64::MIN`.
pub fn shifted_left_exclusive<D>(d: &D, k: i64) -> f64
where
    D: DiscreteDistribution + ?Sized,
{
    let support = d.support();
    if let Endpoint::Finite(lo) = support.left_endpoint() {
        if k <= lo {
            return 0.0;
        }
    }
    match k.checked_sub(1) {
        Some(j) => d.left_inclusive_probability(j),
        None => 0.0,
    }
}

/// Default P(X > k) as the complement of P(X ≤ k), with exact values
/// outside the support.
pub fn complement_right_exclusive<D>(d: &D, k: i64) -> f64
where
    D: DiscreteDistribution + ?Sized,
{
    let support = d.support();
    if support.is_left_of(k) {
        return 1.0;
    }
    if support.is_at_or_right_of_end(k) {
        return 0.0;
    }
    (1.0 - d.left_inclusive_probability(k)).clamp(0.0, 1.0)
}

/// `Σ_{from..=to} P(X = i)`, stopping early once the sum reaches one.
fn sum_masses_upward<D>(d: &D, from: i64, to: i64) -> f64
where
    D: DiscreteDistribution + ?Sized,
{
    let mut acc = CompensatedSum::new();
    for (n, i) in (from..=to).enumerate() {
        if n as u64 >= MAX_SUMMATION_TERMS {
            warn!(from, to, "mass summation hit the term cap");
            break;
        }
        acc.add(d.probability_mass(i));
        if acc.value() >= 1.0 {
            return 1.0;
        }
    }
    acc.value().min(1.0)
}

/// `Σ_{i ≤ k} P(X = i)` for supports unbounded on the left.
fn sum_masses_downward<D>(d: &D, k: i64) -> f64
where
    D: DiscreteDistribution + ?Sized,
{
    let mut acc = CompensatedSum::new();
    for (n, i) in (i64::MIN..=k).rev().enumerate() {
        if n as u64 >= MAX_SUMMATION_TERMS {
            warn!(k, "downward mass summation hit the term cap");
            break;
        }
        let mass = d.probability_mass(i);
        acc.add(mass);
        let total = acc.value();
        if total > 0.0 && mass <= f64::EPSILON * total {
            break;
        }
    }
    acc.value().min(1.0)
}

// ============================================================================
// Quantiles
// ============================================================================

/// Rejects probabilities outside `(0, 1]`, including NaN.
pub fn validate_probability(p: f64) -> Result<(), DistributionError> {
    if p > 0.0 && p <= 1.0 {
        Ok(())
    } else {
        Err(DistributionError::InvalidArgument { name: "p", value: p })
    }
}

/// Default quantile: a seeded search over the CDF.
///
/// Narrow bounded supports start at their left end. Everything else starts
/// from the normal approximation `μ + σ·Φ⁻¹(p)`, which lands within a few
/// steps of the answer for the unimodal families in this crate.
pub fn searched_inverse_left<D>(d: &D, p: f64) -> Result<i64, DistributionError>
where
    D: DiscreteDistribution + ?Sized,
{
    validate_probability(p)?;
    let support = d.support();
    let seed = match support.width() {
        Some(w) if w <= NARROW_SUPPORT_WIDTH => support.left_value(),
        _ => normal_seed(d, p),
    };
    Ok(refine_quantile(d, p, seed))
}

/// Starting point `μ + σ·Φ⁻¹(p)`, falling back to `μ` when that is not finite.
fn normal_seed<D>(d: &D, p: f64) -> i64
where
    D: DiscreteDistribution + ?Sized,
{
    let mu = d.mean();
    let guess = mu + d.standard_deviation() * special::inverse_normal_cdf(p);
    let guess = if guess.is_finite() { guess } else { mu };
    if guess.is_finite() {
        // `as` saturates at the i64 range.
        guess.round() as i64
    } else {
        0
    }
}

/// Outcome of the outward search from the seed.
enum Bracket {
    /// The answer was pinned down without bisection.
    Exact(i64),
    /// P(X ≤ below) < p ≤ P(X ≤ above).
    Between { below: i64, above: i64 },
}

/// Finds the quantile of `p` starting from `seed`.
///
/// # Algorithm
/// Gallops away from the seed with doubling steps until the target is
/// bracketed, then bisects. Every probe goes through
/// `left_inclusive_probability`, so the answer satisfies
/// `P(X < K) < p ≤ P(X ≤ K)` against exactly the CDF the caller sees.
///
/// # Complexity
/// At most 64 doubling steps and 64 bisection steps, for any seed.
///
/// If the CDF never reaches `p` before `i64::MAX` (possible only for
/// `p = 1` when the CDF rounds below one everywhere), the search saturates
/// at `i64::MAX` and logs a warning.
pub fn refine_quantile<D>(d: &D, p: f64, seed: i64) -> i64
where
    D: DiscreteDistribution + ?Sized,
{
    let support = d.support();
    let start = support.clamp(seed);

    let bracket = if d.left_inclusive_probability(start) >= p {
        gallop_left(d, &support, p, start)
    } else {
        gallop_right(d, &support, p, start)
    };

    let k = match bracket {
        Bracket::Exact(k) => k,
        Bracket::Between {
            mut below,
            mut above,
        } => {
            while above.abs_diff(below) > 1 {
                let mid = below + (above.abs_diff(below) / 2) as i64;
                if d.left_inclusive_probability(mid) >= p {
                    above = mid;
                } else {
                    below = mid;
                }
            }
            above
        }
    };
    trace!(p, seed, k, "quantile resolved");
    k
}

/// Search leftward from `above`, where P(X ≤ above) ≥ p already holds.
fn gallop_left<D>(d: &D, support: &Interval, p: f64, mut above: i64) -> Bracket
where
    D: DiscreteDistribution + ?Sized,
{
    let floor = support.left_endpoint().finite();
    let mut step: i64 = 1;
    loop {
        if floor == Some(above) {
            // P(X < lo) = 0 < p.
            return Bracket::Exact(above);
        }
        let mut candidate = above.saturating_sub(step);
        if let Some(lo) = floor {
            candidate = candidate.max(lo);
        }
        if candidate == above {
            return Bracket::Exact(above);
        }
        if d.left_inclusive_probability(candidate) < p {
            return Bracket::Between {
                below: candidate,
                above,
            };
        }
        above = candidate;
        step = step.saturating_mul(2);
    }
}

/// Search rightward from `below`, where P(X ≤ below) < p.
fn gallop_right<D>(d: &D, support: &Interval, p: f64, mut below: i64) -> Bracket
where
    D: DiscreteDistribution + ?Sized,
{
    let ceiling = support.right_endpoint().finite();
    let mut step: i64 = 1;
    loop {
        let mut candidate = below.saturating_add(step);
        if let Some(hi) = ceiling {
            candidate = candidate.min(hi);
        }
        if candidate == below {
            warn!(p, k = below, "quantile search saturated before reaching p");
            return Bracket::Exact(below);
        }
        if d.left_inclusive_probability(candidate) >= p {
            return Bracket::Between {
                below,
                above: candidate,
            };
        }
        below = candidate;
        step = step.saturating_mul(2);
    }
}

// ============================================================================
// Expectation values
// ============================================================================

/// Default `Σ f(k)·P(X = k)`.
///
/// Bounded supports are summed end to end. Toward an unbounded end the sum
/// stops once the remaining tail probability is below [`TAIL_TOLERANCE`]
/// and the latest term no longer moves the sum; supports unbounded on both
/// sides are summed outward from zero.
///
/// The number of terms toward an unbounded end is limited by the tail
/// horizon, the point where `P(X > k)` first drops below
/// [`TAIL_TOLERANCE`] (found with [`refine_quantile`] from the starting
/// point), plus [`MAX_SUMMATION_TERMS`]. Widely spread distributions are
/// therefore summed as far as they need.
pub fn summed_expectation<D>(d: &D, f: &dyn Fn(i64) -> f64) -> f64
where
    D: DiscreteDistribution + ?Sized,
{
    let support = d.support();
    let mut acc = CompensatedSum::new();
    match (support.left_endpoint(), support.right_endpoint()) {
        (Endpoint::Finite(lo), Endpoint::Finite(hi)) => {
            for (n, k) in (lo..=hi).enumerate() {
                if n as u64 >= SUMMATION_CEILING {
                    warn!(lo, hi, "expectation over bounded support hit the term ceiling");
                    break;
                }
                acc.add(weighted_term(d, f, k));
            }
        }
        (Endpoint::Finite(lo), Endpoint::Unbounded) => sum_rightward(d, f, lo, &mut acc),
        (Endpoint::Unbounded, Endpoint::Finite(hi)) => sum_leftward(d, f, hi, &mut acc),
        (Endpoint::Unbounded, Endpoint::Unbounded) => {
            sum_rightward(d, f, 0, &mut acc);
            sum_leftward(d, f, -1, &mut acc);
        }
    }
    acc.value()
}

/// `f(k)·P(X = k)`, treating zero mass as contributing nothing even where
/// `f` overflows.
fn weighted_term<D>(d: &D, f: &dyn Fn(i64) -> f64, k: i64) -> f64
where
    D: DiscreteDistribution + ?Sized,
{
    let mass = d.probability_mass(k);
    if mass == 0.0 {
        0.0
    } else {
        f(k) * mass
    }
}

fn tail_is_negligible(tail: f64, term: f64, acc: &CompensatedSum) -> bool {
    tail < TAIL_TOLERANCE && term.abs() <= f64::EPSILON * acc.value().abs()
}

/// Terms a one-sided expectation from `start` may visit: the distance to
/// the tail horizon plus [`MAX_SUMMATION_TERMS`].
///
/// The horizon search evaluates only `left_inclusive_probability`, so it
/// never re-enters the expectation through the default moments.
fn summation_budget<D>(d: &D, start: i64, rightward: bool) -> u64
where
    D: DiscreteDistribution + ?Sized,
{
    let p = if rightward {
        1.0 - TAIL_TOLERANCE
    } else {
        TAIL_TOLERANCE
    };
    refine_quantile(d, p, start)
        .abs_diff(start)
        .saturating_add(MAX_SUMMATION_TERMS)
        .min(SUMMATION_CEILING)
}

fn sum_rightward<D>(d: &D, f: &dyn Fn(i64) -> f64, start: i64, acc: &mut CompensatedSum)
where
    D: DiscreteDistribution + ?Sized,
{
    let budget = summation_budget(d, start, true);
    for (n, k) in (start..=i64::MAX).enumerate() {
        if n as u64 >= budget {
            warn!(start, budget, "rightward expectation exhausted its term budget");
            return;
        }
        let term = weighted_term(d, f, k);
        acc.add(term);
        if tail_is_negligible(d.right_exclusive_probability(k), term, acc) {
            return;
        }
    }
}

fn sum_leftward<D>(d: &D, f: &dyn Fn(i64) -> f64, start: i64, acc: &mut CompensatedSum)
where
    D: DiscreteDistribution + ?Sized,
{
    let budget = summation_budget(d, start, false);
    for (n, k) in (i64::MIN..=start).rev().enumerate() {
        if n as u64 >= budget {
            warn!(start, budget, "leftward expectation exhausted its term budget");
            return;
        }
        let term = weighted_term(d, f, k);
        acc.add(term);
        if tail_is_negligible(d.left_exclusive_probability(k), term, acc) {
            return;
        }
    }
}
