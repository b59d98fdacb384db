//! Error type shared by distributions, intervals, and histograms.
//!
//! Every failure in this crate is local and immediate: a constructor is
//! handed a parameter outside its domain, or a query is handed an argument
//! it cannot interpret. Querying a probability outside a distribution's
//! support is *not* an error; it has a defined boundary value.

/// Errors raised by construction and argument validation.
#[derive(Debug, Clone, PartialEq)]
pub enum DistributionError {
    /// A distribution parameter violates its domain.
    InvalidParameter {
        /// Name of the offending parameter.
        name: &'static str,
        /// Human-readable constraint that was violated.
        reason: String,
    },
    /// An interval was requested with `low > high`.
    InvalidRange { low: i64, high: i64 },
    /// A probability argument fell outside `(0, 1]`.
    InvalidArgument { name: &'static str, value: f64 },
    /// A histogram bin index fell outside `0..size`.
    IndexOutOfRange { index: i64, size: usize },
}

impl DistributionError {
    pub(crate) fn parameter(name: &'static str, reason: impl Into<String>) -> Self {
        DistributionError::InvalidParameter {
            name,
            reason: reason.into(),
        }
    }
}

impl std::fmt::Display for DistributionError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DistributionError::InvalidParameter { name, reason } => {
                write!(f, "invalid parameter '{name}': {reason}")
            }
            DistributionError::InvalidRange { low, high } => {
                write!(f, "invalid range: low endpoint {low} exceeds high endpoint {high}")
            }
            DistributionError::InvalidArgument { name, value } => {
                write!(f, "invalid argument '{name}' = {value}: must lie in (0, 1]")
            }
            DistributionError::IndexOutOfRange { index, size } => {
                write!(f, "bin index {index} out of range for histogram of size {size}")
            }
        }
    }
}

impl std::error::Error for DistributionError {}
