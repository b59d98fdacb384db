//! # u-discrete
//!
//! Discrete probability distributions over the integers.
//!
//! A distribution supplies its support and probability mass function; the
//! [`DiscreteDistribution`] contract turns those into cumulative
//! probabilities, quantiles, moments, and random variates, with closed-form
//! overrides for the standard families.
//!
//! ## Modules
//!
//! - [`interval`] — Integer supports with optionally unbounded ends
//! - [`distribution`] — The distribution contract and its generic algorithms
//! - [`distributions`] — Bernoulli, binomial, Poisson, discrete uniform,
//!   geometric, negative binomial, hypergeometric
//! - [`histogram`] — Binned observation counts
//! - [`testing`] — Chi-squared goodness-of-fit test
//! - [`special`] — Log-gamma, incomplete beta and gamma, chi-squared tails
//! - [`stats`] — Compensated summation
//! - [`random`] — Seeded generators and uniform deviates
//! - [`error`] — The crate's error type
//!
//! ## Design Philosophy
//!
//! - **Consistency first**: every quantile is found by searching the same
//!   CDF that checks it, and complementary probabilities come from the same
//!   special-function evaluation
//! - **Explicit randomness**: generators are always passed in, never global
//! - **Property-based testing**: probability axioms verified via proptest
//!
//! ## Example
//!
//! ```
//! use u_discrete::{DiscreteDistribution, Histogram, Poisson};
//! use u_discrete::random::create_rng;
//!
//! let d = Poisson::new(4.5).unwrap();
//! let k = d.inverse_left_probability(0.5).unwrap();
//! assert!(d.left_exclusive_probability(k) < 0.5);
//! assert!(0.5 <= d.left_inclusive_probability(k));
//!
//! let mut rng = create_rng(42);
//! let mut h = Histogram::new(16);
//! for x in d.random_values(&mut rng, 1000) {
//!     h.add_clamped(x).unwrap();
//! }
//! assert_eq!(h.total(), 1000);
//! ```

pub mod distribution;
pub mod distributions;
pub mod error;
pub mod histogram;
pub mod interval;
pub mod random;
pub mod special;
pub mod stats;
pub mod testing;

pub use distribution::DiscreteDistribution;
pub use distributions::{
    Bernoulli, Binomial, DiscreteUniform, Geometric, Hypergeometric, NegativeBinomial, Poisson,
};
pub use error::DistributionError;
pub use histogram::Histogram;
pub use interval::{Endpoint, Interval};
pub use testing::{ChiSquared, TestResult};
