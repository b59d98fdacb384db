//! Concrete discrete distributions.
//!
//! Each type validates its parameters once in `new` and then implements
//! [`DiscreteDistribution`] with closed forms wherever they exist. Anything
//! not overridden falls back to the generic summation and search in
//! [`crate::distribution`].
//!
//! # Supported Distributions
//!
//! | Distribution | Parameters | Support | Mean | Variance |
//! |---|---|---|---|---|
//! | [`Bernoulli`] | p | {0, 1} | p | pq |
//! | [`Binomial`] | p, n | [0, n] | np | npq |
//! | [`Poisson`] | λ | [0, ∞) | λ | λ |
//! | [`DiscreteUniform`] | a, b | [a, b] | (a+b)/2 | ((b−a+1)²−1)/12 |
//! | [`Geometric`] | p | [0, ∞) | q/p | q/p² |
//! | [`NegativeBinomial`] | r, p | [0, ∞) | rq/p | rq/p² |
//! | [`Hypergeometric`] | N, K, n | [max(0, n−N+K), min(n, K)] | nK/N | see docs |
//!
//! Here `q = 1 − p`. Geometric and negative binomial count *failures*
//! before the first (respectively r-th) success.
//!
//! # Numerical Notes
//!
//! Binomial, Poisson, and negative binomial masses use the saddle-point
//! forms in [`crate::special`], which keep their accuracy for parameters in
//! the millions; hypergeometric masses are evaluated in log space. Each
//! pair of cumulative functions is computed so that one side comes from a
//! direct evaluation and the other from the complementary form of the same
//! special function, which keeps `P(X ≤ k) + P(X > k)` within a few ulps
//! of one.

use tracing::warn;

use crate::distribution::{
    refine_quantile, validate_probability, DiscreteDistribution, MAX_SUMMATION_TERMS,
};
use crate::error::DistributionError;
use crate::interval::Interval;
use crate::special::{
    binomial_mass, ln_binomial, poisson_mass, regularized_incomplete_beta, regularized_lower_gamma,
    regularized_upper_gamma,
};
use crate::stats::CompensatedSum;

/// Accepts `p ∈ [0, 1]`.
fn check_closed_probability(name: &'static str, p: f64) -> Result<(), DistributionError> {
    if (0.0..=1.0).contains(&p) {
        Ok(())
    } else {
        Err(DistributionError::parameter(name, format!("must lie in [0, 1], got {p}")))
    }
}

/// Accepts `p ∈ (0, 1]`.
fn check_success_probability(name: &'static str, p: f64) -> Result<(), DistributionError> {
    if p > 0.0 && p <= 1.0 {
        Ok(())
    } else {
        Err(DistributionError::parameter(name, format!("must lie in (0, 1], got {p}")))
    }
}

/// Accepts counts that fit the `i64` argument space.
fn check_count(name: &'static str, n: u64) -> Result<i64, DistributionError> {
    i64::try_from(n).map_err(|_| {
        DistributionError::parameter(name, format!("must not exceed {}, got {n}", i64::MAX))
    })
}

// ============================================================================
// Bernoulli Distribution
// ============================================================================

/// A single trial with success probability `p`.
///
/// # Mathematical Definition
/// - PMF: P(0) = q, P(1) = p
/// - Mean: p
/// - Variance: pq
/// - Skewness: (q − p)/√(pq)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bernoulli {
    p: f64,
}

impl Bernoulli {
    /// # Errors
    /// Returns `Err` if `p` is outside `[0, 1]` or NaN.
    pub fn new(p: f64) -> Result<Self, DistributionError> {
        check_closed_probability("p", p)?;
        Ok(Self { p })
    }

    pub fn p(&self) -> f64 {
        self.p
    }

    fn q(&self) -> f64 {
        1.0 - self.p
    }
}

impl DiscreteDistribution for Bernoulli {
    fn support(&self) -> Interval {
        Interval::between(0, 1)
    }

    fn probability_mass(&self, k: i64) -> f64 {
        match k {
            0 => self.q(),
            1 => self.p,
            _ => 0.0,
        }
    }

    fn left_inclusive_probability(&self, k: i64) -> f64 {
        match k {
            k if k < 0 => 0.0,
            0 => self.q(),
            _ => 1.0,
        }
    }

    fn left_exclusive_probability(&self, k: i64) -> f64 {
        match k {
            k if k <= 0 => 0.0,
            1 => self.q(),
            _ => 1.0,
        }
    }

    fn right_exclusive_probability(&self, k: i64) -> f64 {
        match k {
            k if k < 0 => 1.0,
            0 => self.p,
            _ => 0.0,
        }
    }

    fn inverse_left_probability(&self, p: f64) -> Result<i64, DistributionError> {
        validate_probability(p)?;
        Ok(if p <= self.q() { 0 } else { 1 })
    }

    fn raw_moment(&self, n: u32) -> f64 {
        if n == 0 {
            1.0
        } else {
            self.p
        }
    }

    fn central_moment(&self, n: u32) -> f64 {
        // E[(X − p)ⁿ] = q·(−p)ⁿ + p·qⁿ
        let exponent = i32::try_from(n).unwrap_or(i32::MAX);
        let (p, q) = (self.p, self.q());
        q * (-p).powi(exponent) + p * q.powi(exponent)
    }

    fn mean(&self) -> f64 {
        self.p
    }

    fn variance(&self) -> f64 {
        self.p * self.q()
    }

    fn skewness(&self) -> f64 {
        let var = self.variance();
        if var <= 0.0 {
            return 0.0;
        }
        (self.q() - self.p) / var.sqrt()
    }
}

// ============================================================================
// Binomial Distribution
// ============================================================================

/// Number of successes in `n` independent trials with success probability `p`.
///
/// # Mathematical Definition
/// - PMF: C(n, k)·pᵏ·q^(n−k)
/// - CDF: P(X ≤ k) = I_q(n − k, k + 1)
/// - Mean: np
/// - Variance: npq
/// - Skewness: (q − p)/√(npq)
///
/// # Examples
/// ```
/// use u_discrete::distribution::DiscreteDistribution;
/// use u_discrete::distributions::Binomial;
///
/// let b = Binomial::new(0.5, 4).unwrap();
/// assert!((b.probability_mass(2) - 6.0 / 16.0).abs() < 1e-14);
/// assert!((b.left_inclusive_probability(1) - 5.0 / 16.0).abs() < 1e-14);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Binomial {
    p: f64,
    n: i64,
}

impl Binomial {
    /// # Errors
    /// Returns `Err` if `p` is outside `[0, 1]` or `n` exceeds `i64::MAX`.
    pub fn new(p: f64, n: u64) -> Result<Self, DistributionError> {
        check_closed_probability("p", p)?;
        let n = check_count("n", n)?;
        Ok(Self { p, n })
    }

    pub fn p(&self) -> f64 {
        self.p
    }

    pub fn n(&self) -> u64 {
        self.n.unsigned_abs()
    }

    fn q(&self) -> f64 {
        1.0 - self.p
    }
}

impl DiscreteDistribution for Binomial {
    fn support(&self) -> Interval {
        Interval::between(0, self.n)
    }

    fn probability_mass(&self, k: i64) -> f64 {
        if k < 0 || k > self.n {
            return 0.0;
        }
        if self.p == 0.0 {
            return if k == 0 { 1.0 } else { 0.0 };
        }
        if self.p == 1.0 {
            return if k == self.n { 1.0 } else { 0.0 };
        }
        binomial_mass(k as f64, self.n as f64, self.p, self.q())
    }

    fn left_inclusive_probability(&self, k: i64) -> f64 {
        if k < 0 {
            return 0.0;
        }
        if k >= self.n || self.p == 0.0 {
            return 1.0;
        }
        if self.p == 1.0 {
            return 0.0;
        }
        let (n, k) = (self.n as f64, k as f64);
        regularized_incomplete_beta(self.q(), n - k, k + 1.0)
    }

    fn right_exclusive_probability(&self, k: i64) -> f64 {
        if k < 0 {
            return 1.0;
        }
        if k >= self.n || self.p == 0.0 {
            return 0.0;
        }
        if self.p == 1.0 {
            return 1.0;
        }
        let (n, k) = (self.n as f64, k as f64);
        regularized_incomplete_beta(self.p, k + 1.0, n - k)
    }

    fn mean(&self) -> f64 {
        self.n as f64 * self.p
    }

    fn variance(&self) -> f64 {
        self.n as f64 * self.p * self.q()
    }

    fn skewness(&self) -> f64 {
        let var = self.variance();
        if var <= 0.0 {
            return 0.0;
        }
        (self.q() - self.p) / var.sqrt()
    }
}

// ============================================================================
// Poisson Distribution
// ============================================================================

/// Count of events in a fixed interval at mean rate `λ`.
///
/// # Mathematical Definition
/// - PMF: e^(−λ)·λᵏ/k!
/// - CDF: P(X ≤ k) = Q(k + 1, λ), the regularized upper incomplete gamma
/// - Mean: λ
/// - Variance: λ
/// - Skewness: 1/√λ
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Poisson {
    lambda: f64,
}

impl Poisson {
    /// # Errors
    /// Returns `Err` if `lambda` is not finite and strictly positive.
    pub fn new(lambda: f64) -> Result<Self, DistributionError> {
        if !lambda.is_finite() || lambda <= 0.0 {
            return Err(DistributionError::parameter(
                "lambda",
                format!("must be finite and positive, got {lambda}"),
            ));
        }
        Ok(Self { lambda })
    }

    pub fn lambda(&self) -> f64 {
        self.lambda
    }
}

impl DiscreteDistribution for Poisson {
    fn support(&self) -> Interval {
        Interval::at_least(0)
    }

    fn probability_mass(&self, k: i64) -> f64 {
        if k < 0 {
            return 0.0;
        }
        poisson_mass(k.unsigned_abs(), self.lambda)
    }

    fn left_inclusive_probability(&self, k: i64) -> f64 {
        if k < 0 {
            return 0.0;
        }
        regularized_upper_gamma(k as f64 + 1.0, self.lambda)
    }

    fn right_exclusive_probability(&self, k: i64) -> f64 {
        if k < 0 {
            return 1.0;
        }
        regularized_lower_gamma(k as f64 + 1.0, self.lambda)
    }

    fn mean(&self) -> f64 {
        self.lambda
    }

    fn variance(&self) -> f64 {
        self.lambda
    }

    fn skewness(&self) -> f64 {
        1.0 / self.lambda.sqrt()
    }
}

// ============================================================================
// Discrete Uniform Distribution
// ============================================================================

/// Equal mass on every integer in `[a, b]`.
///
/// # Mathematical Definition
/// - PMF: 1/(b − a + 1)
/// - CDF: (k − a + 1)/(b − a + 1)
/// - Mean: (a + b)/2
/// - Variance: ((b − a + 1)² − 1)/12
///
/// # Examples
/// ```
/// use u_discrete::distribution::DiscreteDistribution;
/// use u_discrete::distributions::DiscreteUniform;
///
/// let die = DiscreteUniform::new(1, 6).unwrap();
/// assert!((die.mean() - 3.5).abs() < 1e-15);
/// assert_eq!(die.inverse_left_probability(0.5).unwrap(), 3);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DiscreteUniform {
    a: i64,
    b: i64,
}

impl DiscreteUniform {
    /// # Errors
    /// Returns `Err` if `a > b`.
    pub fn new(a: i64, b: i64) -> Result<Self, DistributionError> {
        if a > b {
            return Err(DistributionError::parameter(
                "b",
                format!("must be at least a = {a}, got {b}"),
            ));
        }
        Ok(Self { a, b })
    }

    pub fn a(&self) -> i64 {
        self.a
    }

    pub fn b(&self) -> i64 {
        self.b
    }

    /// Number of support points, as `f64` so extreme ranges do not overflow.
    fn count(&self) -> f64 {
        self.b.abs_diff(self.a) as f64 + 1.0
    }
}

impl DiscreteDistribution for DiscreteUniform {
    fn support(&self) -> Interval {
        Interval::between(self.a, self.b)
    }

    fn probability_mass(&self, k: i64) -> f64 {
        if k < self.a || k > self.b {
            0.0
        } else {
            1.0 / self.count()
        }
    }

    fn left_inclusive_probability(&self, k: i64) -> f64 {
        if k < self.a {
            0.0
        } else if k >= self.b {
            1.0
        } else {
            (k.abs_diff(self.a) as f64 + 1.0) / self.count()
        }
    }

    fn right_exclusive_probability(&self, k: i64) -> f64 {
        if k < self.a {
            1.0
        } else if k >= self.b {
            0.0
        } else {
            self.b.abs_diff(k) as f64 / self.count()
        }
    }

    fn inverse_left_probability(&self, p: f64) -> Result<i64, DistributionError> {
        validate_probability(p)?;
        let offset = (p * self.count()).ceil() - 1.0;
        let seed = self.a.saturating_add(offset as i64);
        Ok(refine_quantile(self, p, seed))
    }

    fn mean(&self) -> f64 {
        self.a as f64 + self.b.abs_diff(self.a) as f64 / 2.0
    }

    fn variance(&self) -> f64 {
        let n = self.count();
        (n * n - 1.0) / 12.0
    }

    fn skewness(&self) -> f64 {
        0.0
    }
}

// ============================================================================
// Geometric Distribution
// ============================================================================

/// Number of failures before the first success.
///
/// # Mathematical Definition
/// - PMF: qᵏ·p
/// - CDF: 1 − q^(k+1)
/// - Quantile: ⌈ln(1 − P)/ln q⌉ − 1
/// - Mean: q/p
/// - Variance: q/p²
/// - Skewness: (2 − p)/√q
///
/// Powers of `q` are formed as `exp((k+1)·ln_1p(−p))`, with `expm1` for the
/// CDF, so small `p` keeps full precision.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Geometric {
    p: f64,
    ln_q: f64,
}

impl Geometric {
    /// # Errors
    /// Returns `Err` if `p` is outside `(0, 1]` or NaN.
    pub fn new(p: f64) -> Result<Self, DistributionError> {
        check_success_probability("p", p)?;
        Ok(Self {
            p,
            ln_q: (-p).ln_1p(),
        })
    }

    pub fn p(&self) -> f64 {
        self.p
    }

    fn q(&self) -> f64 {
        1.0 - self.p
    }

    /// Point mass at zero.
    fn is_degenerate(&self) -> bool {
        self.p == 1.0
    }
}

impl DiscreteDistribution for Geometric {
    fn support(&self) -> Interval {
        Interval::at_least(0)
    }

    fn probability_mass(&self, k: i64) -> f64 {
        if k < 0 {
            return 0.0;
        }
        if self.is_degenerate() {
            return if k == 0 { 1.0 } else { 0.0 };
        }
        self.p * (k as f64 * self.ln_q).exp()
    }

    fn left_inclusive_probability(&self, k: i64) -> f64 {
        if k < 0 {
            return 0.0;
        }
        if self.is_degenerate() {
            return 1.0;
        }
        -((k as f64 + 1.0) * self.ln_q).exp_m1()
    }

    fn right_exclusive_probability(&self, k: i64) -> f64 {
        if k < 0 {
            return 1.0;
        }
        if self.is_degenerate() {
            return 0.0;
        }
        ((k as f64 + 1.0) * self.ln_q).exp()
    }

    fn inverse_left_probability(&self, p: f64) -> Result<i64, DistributionError> {
        validate_probability(p)?;
        if self.is_degenerate() {
            return Ok(0);
        }
        let seed = ((-p).ln_1p() / self.ln_q).ceil() - 1.0;
        Ok(refine_quantile(self, p, seed as i64))
    }

    fn mean(&self) -> f64 {
        self.q() / self.p
    }

    fn variance(&self) -> f64 {
        self.q() / (self.p * self.p)
    }

    fn skewness(&self) -> f64 {
        if self.is_degenerate() {
            return 0.0;
        }
        (2.0 - self.p) / self.q().sqrt()
    }
}

// ============================================================================
// Negative Binomial Distribution
// ============================================================================

/// Number of failures before the `r`-th success, with real `r > 0`.
///
/// # Mathematical Definition
/// - PMF: Γ(k + r)/(k!·Γ(r))·pʳ·qᵏ
/// - CDF: P(X ≤ k) = I_p(r, k + 1)
/// - Mean: rq/p
/// - Variance: rq/p²
/// - Skewness: (2 − p)/√(rq)
///
/// With `r = 1` this is [`Geometric`]. For integer `r`,
/// `P(X ≤ k) = P(Binomial(p, r + k) ≥ r)`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NegativeBinomial {
    r: f64,
    p: f64,
}

impl NegativeBinomial {
    /// # Errors
    /// Returns `Err` if `r` is not finite and positive, or `p` is outside `(0, 1]`.
    pub fn new(r: f64, p: f64) -> Result<Self, DistributionError> {
        if !r.is_finite() || r <= 0.0 {
            return Err(DistributionError::parameter(
                "r",
                format!("must be finite and positive, got {r}"),
            ));
        }
        check_success_probability("p", p)?;
        Ok(Self { r, p })
    }

    pub fn r(&self) -> f64 {
        self.r
    }

    pub fn p(&self) -> f64 {
        self.p
    }

    fn q(&self) -> f64 {
        1.0 - self.p
    }
}

impl DiscreteDistribution for NegativeBinomial {
    fn support(&self) -> Interval {
        Interval::at_least(0)
    }

    fn probability_mass(&self, k: i64) -> f64 {
        if k < 0 {
            return 0.0;
        }
        if self.p == 1.0 {
            return if k == 0 { 1.0 } else { 0.0 };
        }
        // C(r+k−1, k)·pʳqᵏ = r/(r+k)·C(r+k, k)·pʳqᵏ
        let trials = self.r + k as f64;
        self.r / trials * binomial_mass(self.r, trials, self.p, self.q())
    }

    fn left_inclusive_probability(&self, k: i64) -> f64 {
        if k < 0 {
            return 0.0;
        }
        if self.p == 1.0 {
            return 1.0;
        }
        regularized_incomplete_beta(self.p, self.r, k as f64 + 1.0)
    }

    fn right_exclusive_probability(&self, k: i64) -> f64 {
        if k < 0 {
            return 1.0;
        }
        if self.p == 1.0 {
            return 0.0;
        }
        regularized_incomplete_beta(self.q(), k as f64 + 1.0, self.r)
    }

    fn mean(&self) -> f64 {
        self.r * self.q() / self.p
    }

    fn variance(&self) -> f64 {
        self.r * self.q() / (self.p * self.p)
    }

    fn skewness(&self) -> f64 {
        let rq = self.r * self.q();
        if rq <= 0.0 {
            return 0.0;
        }
        (2.0 - self.p) / rq.sqrt()
    }
}

// ============================================================================
// Hypergeometric Distribution
// ============================================================================

/// Successes among `draws` items taken without replacement from a
/// population of `population` items, `successes` of which are marked.
///
/// # Mathematical Definition
/// With N = population, K = successes, n = draws:
/// - PMF: C(K, k)·C(N − K, n − k)/C(N, n)
/// - Mean: nK/N
/// - Variance: n·(K/N)·(1 − K/N)·(N − n)/(N − 1)
/// - Skewness: (N − 2K)·√(N − 1)·(N − 2n) / (√(nK(N − K)(N − n))·(N − 2))
///
/// # Algorithm
/// The CDF has no convenient closed form, so it sums mass over whichever
/// tail lies away from the mode and complements. Mass is monotone on each
/// side of the mode, so that sum stops as soon as a term no longer changes it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Hypergeometric {
    population: u64,
    successes: u64,
    draws: u64,
    low: i64,
    high: i64,
    mode: i64,
    ln_total: f64,
}

impl Hypergeometric {
    /// # Errors
    /// Returns `Err` if `successes` or `draws` exceeds `population`, or
    /// `population` exceeds `i64::MAX`.
    pub fn new(population: u64, successes: u64, draws: u64) -> Result<Self, DistributionError> {
        check_count("population", population)?;
        if successes > population {
            return Err(DistributionError::parameter(
                "successes",
                format!("must not exceed population {population}, got {successes}"),
            ));
        }
        if draws > population {
            return Err(DistributionError::parameter(
                "draws",
                format!("must not exceed population {population}, got {draws}"),
            ));
        }
        let low = draws.saturating_sub(population - successes);
        let high = draws.min(successes);
        // ⌊(n + 1)(K + 1)/(N + 2)⌋, in f64 to stay clear of overflow.
        let mode = ((draws as f64 + 1.0) * (successes as f64 + 1.0) / (population as f64 + 2.0))
            .floor()
            .clamp(low as f64, high as f64);
        Ok(Self {
            population,
            successes,
            draws,
            low: low as i64,
            high: high as i64,
            mode: mode as i64,
            ln_total: ln_binomial(population, draws),
        })
    }

    pub fn population(&self) -> u64 {
        self.population
    }

    pub fn successes(&self) -> u64 {
        self.successes
    }

    pub fn draws(&self) -> u64 {
        self.draws
    }

    /// Sums mass over `ks`, which must run away from the mode.
    fn tail_sum(&self, ks: impl Iterator<Item = i64>) -> f64 {
        let mut acc = CompensatedSum::new();
        for (n, k) in ks.enumerate() {
            if n as u64 >= MAX_SUMMATION_TERMS {
                warn!(
                    population = self.population,
                    draws = self.draws,
                    "hypergeometric tail sum hit the term cap"
                );
                break;
            }
            let mass = self.probability_mass(k);
            acc.add(mass);
            if mass <= f64::EPSILON * acc.value() {
                break;
            }
        }
        acc.value().clamp(0.0, 1.0)
    }

    /// `(P(X ≤ k), P(X > k))` for `low ≤ k < high`.
    fn split(&self, k: i64) -> (f64, f64) {
        if k < self.mode {
            let left = self.tail_sum((self.low..=k).rev());
            (left, 1.0 - left)
        } else {
            let right = self.tail_sum(k + 1..=self.high);
            (1.0 - right, right)
        }
    }
}

impl DiscreteDistribution for Hypergeometric {
    fn support(&self) -> Interval {
        Interval::between(self.low, self.high)
    }

    fn probability_mass(&self, k: i64) -> f64 {
        if k < self.low || k > self.high {
            return 0.0;
        }
        let k = k.unsigned_abs();
        let ln_pmf = ln_binomial(self.successes, k)
            + ln_binomial(self.population - self.successes, self.draws - k)
            - self.ln_total;
        ln_pmf.exp()
    }

    fn left_inclusive_probability(&self, k: i64) -> f64 {
        if k < self.low {
            return 0.0;
        }
        if k >= self.high {
            return 1.0;
        }
        self.split(k).0
    }

    fn right_exclusive_probability(&self, k: i64) -> f64 {
        if k < self.low {
            return 1.0;
        }
        if k >= self.high {
            return 0.0;
        }
        self.split(k).1
    }

    fn mean(&self) -> f64 {
        if self.population == 0 {
            return 0.0;
        }
        self.draws as f64 * self.successes as f64 / self.population as f64
    }

    fn variance(&self) -> f64 {
        if self.population <= 1 {
            return 0.0;
        }
        let big_n = self.population as f64;
        let frac = self.successes as f64 / big_n;
        self.draws as f64 * frac * (1.0 - frac) * (big_n - self.draws as f64) / (big_n - 1.0)
    }

    fn skewness(&self) -> f64 {
        if self.population <= 2 || self.variance() <= 0.0 {
            return 0.0;
        }
        let big_n = self.population as f64;
        let big_k = self.successes as f64;
        let n = self.draws as f64;
        let numerator = (big_n - 2.0 * big_k) * (big_n - 1.0).sqrt() * (big_n - 2.0 * n);
        let denominator = (n * big_k * (big_n - big_k) * (big_n - n)).sqrt() * (big_n - 2.0);
        numerator / denominator
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::distribution::{searched_inverse_left, summed_expectation, summed_left_inclusive};
    use approx::{assert_abs_diff_eq, assert_relative_eq};

    /// The reference instances exercised across every property below.
    fn instances() -> Vec<(&'static str, Box<dyn DiscreteDistribution>)> {
        vec![
            ("Bernoulli(0.1)", Box::new(Bernoulli::new(0.1).unwrap())),
            ("Binomial(0.2, 30)", Box::new(Binomial::new(0.2, 30).unwrap())),
            ("Binomial(0.4, 5)", Box::new(Binomial::new(0.4, 5).unwrap())),
            ("Poisson(4.5)", Box::new(Poisson::new(4.5).unwrap())),
            ("Poisson(400)", Box::new(Poisson::new(400.0).unwrap())),
            ("DiscreteUniform(5, 11)", Box::new(DiscreteUniform::new(5, 11).unwrap())),
            ("Geometric(0.6)", Box::new(Geometric::new(0.6).unwrap())),
            ("NegativeBinomial(7.8, 0.4)", Box::new(NegativeBinomial::new(7.8, 0.4).unwrap())),
            ("Hypergeometric(9, 3, 5)", Box::new(Hypergeometric::new(9, 3, 5).unwrap())),
        ]
    }

    // --- cross-distribution properties ---

    #[test]
    fn test_unitarity() {
        for (_, d) in instances() {
            let total = d.expectation_value(&|_| 1.0);
            assert_abs_diff_eq!(total, 1.0, epsilon = 1e-12);
        }
    }

    #[test]
    fn test_mean_matches_expectation() {
        for (_, d) in instances() {
            let m = d.expectation_value(&|k| k as f64);
            assert_relative_eq!(m, d.mean(), epsilon = 1e-12, max_relative = 1e-10);
        }
    }

    #[test]
    fn test_variance_matches_expectation() {
        for (_, d) in instances() {
            let mu = d.mean();
            let v = d.expectation_value(&|k| (k as f64 - mu).powi(2));
            assert_relative_eq!(v, d.variance(), epsilon = 1e-12, max_relative = 1e-10);
        }
    }

    #[test]
    fn test_skewness_matches_expectation() {
        for (_, d) in instances() {
            let mu = d.mean();
            let sigma = d.standard_deviation();
            let m3 = d.expectation_value(&|k| (k as f64 - mu).powi(3));
            assert_relative_eq!(
                m3 / sigma.powi(3),
                d.skewness(),
                epsilon = 1e-10,
                max_relative = 1e-8
            );
        }
    }

    #[test]
    fn test_probability_axioms() {
        for (name, d) in instances() {
            for k in -10..=100 {
                let mass = d.probability_mass(k);
                let p = d.left_inclusive_probability(k);
                let q = d.right_exclusive_probability(k);
                assert!((0.0..=1.0).contains(&mass), "{name}: mass({k}) = {mass}");
                assert!((0.0..=1.0).contains(&p), "{name}: P({k}) = {p}");
                assert!((0.0..=1.0).contains(&q), "{name}: Q({k}) = {q}");
                assert_abs_diff_eq!(p + q, 1.0, epsilon = 1e-12);
            }
        }
    }

    #[test]
    fn test_outside_support() {
        for (_, d) in instances() {
            let support = d.support();
            if let Some(min) = support.left_endpoint().finite() {
                assert_eq!(d.probability_mass(min - 1), 0.0);
                assert_eq!(d.left_inclusive_probability(min - 1), 0.0);
                assert_eq!(d.right_exclusive_probability(min - 1), 1.0);
                assert_eq!(d.left_exclusive_probability(min), 0.0);
            }
            if let Some(max) = support.right_endpoint().finite() {
                assert_eq!(d.probability_mass(max + 1), 0.0);
                assert_eq!(d.left_inclusive_probability(max + 1), 1.0);
                assert_eq!(d.right_exclusive_probability(max), 0.0);
            }
        }
    }

    #[test]
    fn test_inverse_cdf_law() {
        let ps = [
            0.0134, 0.0872, 0.2016, 0.3489, 0.5, 0.6321, 0.7716, 0.8829, 0.9575, 0.9999, 1.0,
        ];
        for (name, d) in instances() {
            for &p in &ps {
                let k = d.inverse_left_probability(p).unwrap();
                assert!(d.left_exclusive_probability(k) < p, "{name}: p={p}, k={k}");
                assert!(p <= d.left_inclusive_probability(k), "{name}: p={p}, k={k}");
            }
        }
    }

    #[test]
    fn test_defaults_agree_with_overrides() {
        for (name, d) in instances() {
            let d = d.as_ref();
            for k in -2..=60 {
                let summed = summed_left_inclusive(d, k);
                assert_abs_diff_eq!(summed, d.left_inclusive_probability(k), epsilon = 1e-10);
            }
            for &p in &[0.05, 0.25, 0.5, 0.75, 0.95] {
                assert_eq!(
                    searched_inverse_left(d, p).unwrap(),
                    d.inverse_left_probability(p).unwrap(),
                    "{name}: p={p}"
                );
            }
            let m2 = summed_expectation(d, &|k| (k as f64).powi(2));
            let expected = d.variance() + d.mean().powi(2);
            assert_relative_eq!(m2, expected, max_relative = 1e-10);
        }
    }

    #[test]
    fn test_negative_binomial_binomial_relation() {
        let (r, p, k) = (3_u64, 0.4, 2_i64);
        let nb = NegativeBinomial::new(r as f64, p).unwrap();
        let b = Binomial::new(p, r + k as u64).unwrap();
        let nb_p = nb.left_inclusive_probability(k);
        assert_abs_diff_eq!(nb_p, b.right_exclusive_probability(r as i64 - 1), epsilon = 1e-10);
        assert_abs_diff_eq!(nb_p, 1.0 - b.left_inclusive_probability(2), epsilon = 1e-10);
        // I_0.4(3, 3) = 0.31744
        assert_abs_diff_eq!(nb_p, 0.31744, epsilon = 1e-10);
    }

    #[test]
    fn test_small_probability_expectations_normalize() {
        let d = Geometric::new(1e-6).unwrap();
        assert_abs_diff_eq!(d.expectation_value(&|_| 1.0), 1.0, epsilon = 1e-12);
        assert_relative_eq!(d.expectation_value(&|k| k as f64), d.mean(), max_relative = 1e-10);

        let d = NegativeBinomial::new(2.5, 1e-4).unwrap();
        assert_abs_diff_eq!(d.expectation_value(&|_| 1.0), 1.0, epsilon = 1e-12);
        assert_relative_eq!(d.expectation_value(&|k| k as f64), d.mean(), max_relative = 1e-10);
    }

    /// `P(X = k)` recovered from the closed-form CDF, differencing whichever
    /// side holds the smaller probability.
    pub(super) fn cdf_step(d: &dyn DiscreteDistribution, k: i64) -> f64 {
        if d.left_inclusive_probability(k) <= 0.5 {
            d.left_inclusive_probability(k) - d.left_inclusive_probability(k - 1)
        } else {
            d.right_exclusive_probability(k - 1) - d.right_exclusive_probability(k)
        }
    }

    #[test]
    fn test_large_parameter_cdf_steps_match_mass() {
        let cases: Vec<Box<dyn DiscreteDistribution>> = vec![
            Box::new(Poisson::new(1e4).unwrap()),
            Box::new(Poisson::new(1e6).unwrap()),
            Box::new(Binomial::new(0.5, 1_000_000).unwrap()),
            Box::new(Binomial::new(0.5, 100_000_000).unwrap()),
            Box::new(Binomial::new(0.3, 100_000_000).unwrap()),
        ];
        for d in &cases {
            let (mu, sigma) = (d.mean(), d.standard_deviation());
            for z in [-3.0, -1.0, 0.0, 1.0, 3.0] {
                let k = (mu + z * sigma).round() as i64;
                let mass = d.probability_mass(k);
                let step = cdf_step(d.as_ref(), k);
                let err = ((step - mass) / mass).abs();
                assert!(err < 1e-6, "mu={mu}, k={k}: step {step} vs mass {mass}");
            }
        }
    }

    #[test]
    fn test_large_parameter_cdf_matches_summed_masses() {
        let poisson = Poisson::new(1e4).unwrap();
        assert_abs_diff_eq!(
            poisson.left_inclusive_probability(10_100),
            summed_left_inclusive(&poisson, 10_100),
            epsilon = 1e-10
        );

        let binomial = Binomial::new(0.5, 1_000_000).unwrap();
        assert_abs_diff_eq!(
            binomial.left_inclusive_probability(500_500),
            summed_left_inclusive(&binomial, 500_500),
            epsilon = 1e-10
        );
    }

    #[test]
    fn test_poisson_large_rate_median() {
        let d = Poisson::new(1e6).unwrap();
        assert_abs_diff_eq!(d.left_inclusive_probability(1_000_000), 0.500266, epsilon = 1e-6);
        assert_eq!(d.inverse_left_probability(0.5).unwrap(), 1_000_000);
    }

    #[test]
    fn test_poisson_small_lambda_quantile() {
        let d = Poisson::new(0.5).unwrap();
        let p = 0.7716;
        let k = d.inverse_left_probability(p).unwrap();
        assert_eq!(k, 1);
        assert!(d.left_exclusive_probability(k) < p);
        assert!(p <= d.left_inclusive_probability(k));
    }

    // --- Bernoulli ---

    #[test]
    fn test_bernoulli_values() {
        let d = Bernoulli::new(0.1).unwrap();
        assert_abs_diff_eq!(d.probability_mass(0), 0.9);
        assert_abs_diff_eq!(d.probability_mass(1), 0.1);
        assert_eq!(d.inverse_left_probability(0.89).unwrap(), 0);
        assert_eq!(d.inverse_left_probability(0.91).unwrap(), 1);
        assert_abs_diff_eq!(d.raw_moment(5), 0.1);
        assert_abs_diff_eq!(d.central_moment(2), d.variance(), epsilon = 1e-15);
    }

    #[test]
    fn test_bernoulli_degenerate() {
        let never = Bernoulli::new(0.0).unwrap();
        assert_eq!(never.inverse_left_probability(1.0).unwrap(), 0);
        assert_eq!(never.skewness(), 0.0);
        let always = Bernoulli::new(1.0).unwrap();
        assert_eq!(always.inverse_left_probability(1e-300).unwrap(), 1);
        assert_eq!(always.variance(), 0.0);
    }

    // --- Binomial ---

    #[test]
    fn test_binomial_pmf() {
        let d = Binomial::new(0.4, 5).unwrap();
        // C(5,2)·0.4²·0.6³ = 10·0.16·0.216
        assert_abs_diff_eq!(d.probability_mass(2), 0.3456, epsilon = 1e-14);
        assert_abs_diff_eq!(d.left_inclusive_probability(0), 0.6_f64.powi(5), epsilon = 1e-14);
    }

    #[test]
    fn test_binomial_degenerate_p() {
        let zero = Binomial::new(0.0, 10).unwrap();
        assert_eq!(zero.probability_mass(0), 1.0);
        assert_eq!(zero.left_inclusive_probability(0), 1.0);
        assert_eq!(zero.inverse_left_probability(1.0).unwrap(), 0);
        let one = Binomial::new(1.0, 10).unwrap();
        assert_eq!(one.probability_mass(10), 1.0);
        assert_eq!(one.left_inclusive_probability(9), 0.0);
        assert_eq!(one.right_exclusive_probability(9), 1.0);
        assert_eq!(one.inverse_left_probability(0.5).unwrap(), 10);
    }

    #[test]
    fn test_binomial_zero_trials() {
        let d = Binomial::new(0.3, 0).unwrap();
        assert_eq!(d.probability_mass(0), 1.0);
        assert_eq!(d.mean(), 0.0);
        assert_eq!(d.inverse_left_probability(0.5).unwrap(), 0);
    }

    #[test]
    fn test_binomial_large_n_quantile() {
        let d = Binomial::new(0.5, 10_000).unwrap();
        let k = d.inverse_left_probability(0.5).unwrap();
        assert_eq!(k, 5_000);
    }

    // --- Poisson ---

    #[test]
    fn test_poisson_values() {
        let d = Poisson::new(4.5).unwrap();
        assert_abs_diff_eq!(d.probability_mass(0), (-4.5_f64).exp(), epsilon = 1e-15);
        let f2 = (-4.5_f64).exp() * (1.0 + 4.5 + 4.5 * 4.5 / 2.0);
        assert_relative_eq!(d.left_inclusive_probability(2), f2, max_relative = 1e-12);
        assert_relative_eq!(d.skewness(), 1.0 / 4.5_f64.sqrt());
    }

    #[test]
    fn test_poisson_large_lambda_tails() {
        let d = Poisson::new(400.0).unwrap();
        assert!(d.left_inclusive_probability(300) < 1e-6);
        assert!(d.right_exclusive_probability(500) < 1e-6);
        let median = d.inverse_left_probability(0.5).unwrap();
        assert!((399..=400).contains(&median), "median {median}");
    }

    // --- DiscreteUniform ---

    #[test]
    fn test_uniform_values() {
        let d = DiscreteUniform::new(5, 11).unwrap();
        assert_abs_diff_eq!(d.probability_mass(7), 1.0 / 7.0);
        assert_abs_diff_eq!(d.left_inclusive_probability(7), 3.0 / 7.0, epsilon = 1e-15);
        assert_abs_diff_eq!(d.mean(), 8.0);
        assert_abs_diff_eq!(d.variance(), 4.0);
        assert_eq!(d.inverse_left_probability(3.0 / 7.0).unwrap(), 7);
        assert_eq!(d.inverse_left_probability(1.0).unwrap(), 11);
    }

    #[test]
    fn test_uniform_single_point() {
        let d = DiscreteUniform::new(-3, -3).unwrap();
        assert_eq!(d.probability_mass(-3), 1.0);
        assert_eq!(d.variance(), 0.0);
        assert_eq!(d.inverse_left_probability(0.3).unwrap(), -3);
    }

    #[test]
    fn test_uniform_full_range_does_not_overflow() {
        let d = DiscreteUniform::new(i64::MIN, i64::MAX).unwrap();
        assert!(d.probability_mass(0) > 0.0);
        assert_abs_diff_eq!(d.left_inclusive_probability(-1), 0.5, epsilon = 1e-15);
        let k = d.inverse_left_probability(0.5).unwrap();
        assert!(d.left_exclusive_probability(k) < 0.5);
        assert!(0.5 <= d.left_inclusive_probability(k));
    }

    // --- Geometric ---

    #[test]
    fn test_geometric_values() {
        let d = Geometric::new(0.6).unwrap();
        assert_abs_diff_eq!(d.probability_mass(2), 0.4 * 0.4 * 0.6, epsilon = 1e-15);
        assert_abs_diff_eq!(d.left_inclusive_probability(1), 1.0 - 0.16, epsilon = 1e-15);
        assert_abs_diff_eq!(d.mean(), 0.4 / 0.6, epsilon = 1e-15);
        assert_eq!(d.inverse_left_probability(0.59).unwrap(), 0);
        assert_eq!(d.inverse_left_probability(0.61).unwrap(), 1);
    }

    #[test]
    fn test_geometric_certain_success() {
        let d = Geometric::new(1.0).unwrap();
        assert_eq!(d.probability_mass(0), 1.0);
        assert_eq!(d.probability_mass(1), 0.0);
        assert_eq!(d.right_exclusive_probability(0), 0.0);
        assert_eq!(d.inverse_left_probability(1.0).unwrap(), 0);
        assert_eq!(d.variance(), 0.0);
    }

    #[test]
    fn test_geometric_is_negative_binomial_with_r_one() {
        let g = Geometric::new(0.3).unwrap();
        let nb = NegativeBinomial::new(1.0, 0.3).unwrap();
        for k in 0..30 {
            assert_relative_eq!(g.probability_mass(k), nb.probability_mass(k), max_relative = 1e-12);
            assert_abs_diff_eq!(
                g.left_inclusive_probability(k),
                nb.left_inclusive_probability(k),
                epsilon = 1e-13
            );
        }
    }

    #[test]
    fn test_geometric_extreme_argument() {
        let d = Geometric::new(0.6).unwrap();
        assert_eq!(d.left_inclusive_probability(i64::MAX), 1.0);
        assert_eq!(d.right_exclusive_probability(i64::MAX), 0.0);
    }

    // --- Hypergeometric ---

    #[test]
    fn test_hypergeometric_values() {
        let d = Hypergeometric::new(9, 3, 5).unwrap();
        let support = d.support();
        assert_eq!(support.left_value(), 0);
        assert_eq!(support.right_value(), 3);
        // C(3,1)·C(6,4)/C(9,5) = 3·15/126
        assert_abs_diff_eq!(d.probability_mass(1), 45.0 / 126.0, epsilon = 1e-14);
        assert_abs_diff_eq!(d.mean(), 5.0 / 3.0, epsilon = 1e-15);
    }

    #[test]
    fn test_hypergeometric_forced_successes() {
        // Drawing 8 of 10 with 6 marked forces at least 4 marked.
        let d = Hypergeometric::new(10, 6, 8).unwrap();
        assert_eq!(d.support().left_value(), 4);
        assert_eq!(d.support().right_value(), 6);
        assert_eq!(d.left_inclusive_probability(3), 0.0);
        assert_abs_diff_eq!(d.expectation_value(&|_| 1.0), 1.0, epsilon = 1e-14);
    }

    // --- construction ---

    #[test]
    fn test_invalid_parameters() {
        assert!(Bernoulli::new(-0.1).is_err());
        assert!(Bernoulli::new(f64::NAN).is_err());
        assert!(Binomial::new(1.5, 3).is_err());
        assert!(Binomial::new(0.5, u64::MAX).is_err());
        assert!(Poisson::new(0.0).is_err());
        assert!(Poisson::new(f64::INFINITY).is_err());
        assert!(DiscreteUniform::new(3, 2).is_err());
        assert!(Geometric::new(0.0).is_err());
        assert!(NegativeBinomial::new(0.0, 0.5).is_err());
        assert!(NegativeBinomial::new(2.0, 0.0).is_err());
        assert!(Hypergeometric::new(5, 6, 2).is_err());
        assert!(Hypergeometric::new(5, 2, 6).is_err());
    }

    #[test]
    fn test_error_names_parameter() {
        match Poisson::new(-1.0) {
            Err(DistributionError::InvalidParameter { name, .. }) => assert_eq!(name, "lambda"),
            other => panic!("unexpected {other:?}"),
        }
        match Hypergeometric::new(5, 2, 6) {
            Err(DistributionError::InvalidParameter { name, .. }) => assert_eq!(name, "draws"),
            other => panic!("unexpected {other:?}"),
        }
    }
}
