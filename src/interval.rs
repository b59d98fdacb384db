//! Integer intervals describing a distribution's support.
//!
//! An [`Interval`] is a closed range `[low, high]` over `i64` in which
//! either end may be unbounded. Unbounded ends are tagged explicitly with
//! [`Endpoint::Unbounded`] instead of being encoded as `i64::MIN`/`i64::MAX`,
//! so no code path ever performs arithmetic on a sentinel value.

use crate::error::DistributionError;

/// One end of an [`Interval`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Endpoint {
    /// Inclusive finite endpoint.
    Finite(i64),
    /// No bound in this direction.
    Unbounded,
}

impl Endpoint {
    /// Returns the finite value, if any.
    pub fn finite(self) -> Option<i64> {
        match self {
            Endpoint::Finite(v) => Some(v),
            Endpoint::Unbounded => None,
        }
    }

    pub fn is_finite(self) -> bool {
        matches!(self, Endpoint::Finite(_))
    }
}

/// Immutable inclusive integer range with optionally unbounded ends.
///
/// # Invariant
/// When both ends are finite, `low ≤ high`.
///
/// # Examples
/// ```
/// use u_discrete::interval::{Endpoint, Interval};
///
/// let i = Interval::from_endpoints(2, 5).unwrap();
/// assert_eq!(i.left_endpoint(), Endpoint::Finite(2));
/// assert_eq!(i.width(), Some(4));
/// assert!(Interval::from_endpoints(5, 2).is_err());
///
/// let half = Interval::at_least(0);
/// assert_eq!(half.right_endpoint(), Endpoint::Unbounded);
/// assert_eq!(half.right_value(), i64::MAX);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Interval {
    low: Endpoint,
    high: Endpoint,
}

impl Interval {
    /// Creates the finite interval `[low, high]`.
    ///
    /// # Errors
    /// Returns [`DistributionError::InvalidRange`] if `low > high`.
    pub fn from_endpoints(low: i64, high: i64) -> Result<Self, DistributionError> {
        if low > high {
            return Err(DistributionError::InvalidRange { low, high });
        }
        Ok(Self {
            low: Endpoint::Finite(low),
            high: Endpoint::Finite(high),
        })
    }

    /// Finite interval from endpoints the caller has already ordered.
    pub(crate) fn between(low: i64, high: i64) -> Self {
        debug_assert!(low <= high, "unordered endpoints {low} > {high}");
        Self {
            low: Endpoint::Finite(low),
            high: Endpoint::Finite(high.max(low)),
        }
    }

    /// Creates `[low, +∞)`.
    pub fn at_least(low: i64) -> Self {
        Self {
            low: Endpoint::Finite(low),
            high: Endpoint::Unbounded,
        }
    }

    /// Creates `(−∞, high]`.
    pub fn at_most(high: i64) -> Self {
        Self {
            low: Endpoint::Unbounded,
            high: Endpoint::Finite(high),
        }
    }

    /// Creates `(−∞, +∞)`.
    pub fn unbounded() -> Self {
        Self {
            low: Endpoint::Unbounded,
            high: Endpoint::Unbounded,
        }
    }

    pub fn left_endpoint(&self) -> Endpoint {
        self.low
    }

    pub fn right_endpoint(&self) -> Endpoint {
        self.high
    }

    /// Left endpoint with `i64::MIN` standing in for an unbounded end.
    pub fn left_value(&self) -> i64 {
        self.low.finite().unwrap_or(i64::MIN)
    }

    /// Right endpoint with `i64::MAX` standing in for an unbounded end.
    pub fn right_value(&self) -> i64 {
        self.high.finite().unwrap_or(i64::MAX)
    }

    /// True if `k` lies within the interval.
    pub fn contains(&self, k: i64) -> bool {
        let above_low = match self.low {
            Endpoint::Finite(lo) => k >= lo,
            Endpoint::Unbounded => true,
        };
        let below_high = match self.high {
            Endpoint::Finite(hi) => k <= hi,
            Endpoint::Unbounded => true,
        };
        above_low && below_high
    }

    /// True if both ends are finite.
    pub fn is_bounded(&self) -> bool {
        self.low.is_finite() && self.high.is_finite()
    }

    /// True if `k` lies strictly left of a finite left endpoint.
    pub fn is_left_of(&self, k: i64) -> bool {
        matches!(self.low, Endpoint::Finite(lo) if k < lo)
    }

    /// True if `k` lies at or right of a finite right endpoint.
    pub fn is_at_or_right_of_end(&self, k: i64) -> bool {
        matches!(self.high, Endpoint::Finite(hi) if k >= hi)
    }

    /// Number of integers in the interval minus one, i.e. `high − low`.
    ///
    /// Returns `None` for unbounded intervals.
    pub fn width(&self) -> Option<u64> {
        match (self.low, self.high) {
            (Endpoint::Finite(lo), Endpoint::Finite(hi)) => Some(hi.abs_diff(lo)),
            _ => None,
        }
    }

    /// Clamps `k` into the interval.
    pub fn clamp(&self, k: i64) -> i64 {
        let k = match self.low {
            Endpoint::Finite(lo) => k.max(lo),
            Endpoint::Unbounded => k,
        };
        match self.high {
            Endpoint::Finite(hi) => k.min(hi),
            Endpoint::Unbounded => k,
        }
    }
}

impl std::fmt::Display for Interval {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.low {
            Endpoint::Finite(lo) => write!(f, "[{lo}, ")?,
            Endpoint::Unbounded => write!(f, "(-inf, ")?,
        }
        match self.high {
            Endpoint::Finite(hi) => write!(f, "{hi}]"),
            Endpoint::Unbounded => write!(f, "+inf)"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_endpoints() {
        let i = Interval::from_endpoints(-3, 7).unwrap();
        assert_eq!(i.left_endpoint(), Endpoint::Finite(-3));
        assert_eq!(i.right_endpoint(), Endpoint::Finite(7));
        assert_eq!(i.width(), Some(10));
        assert!(i.is_bounded());
    }

    #[test]
    fn test_single_point() {
        let i = Interval::from_endpoints(4, 4).unwrap();
        assert_eq!(i.width(), Some(0));
        assert!(i.contains(4));
        assert!(!i.contains(3));
        assert!(!i.contains(5));
    }

    #[test]
    fn test_invalid_range() {
        assert_eq!(
            Interval::from_endpoints(1, 0),
            Err(DistributionError::InvalidRange { low: 1, high: 0 })
        );
    }

    #[test]
    fn test_unbounded_sentinels() {
        let i = Interval::unbounded();
        assert_eq!(i.left_value(), i64::MIN);
        assert_eq!(i.right_value(), i64::MAX);
        assert!(i.contains(i64::MIN));
        assert!(i.contains(i64::MAX));
        assert_eq!(i.width(), None);
        assert!(!i.is_left_of(i64::MIN));
        assert!(!i.is_at_or_right_of_end(i64::MAX));
    }

    #[test]
    fn test_extreme_width_does_not_overflow() {
        let i = Interval::from_endpoints(i64::MIN, i64::MAX).unwrap();
        assert_eq!(i.width(), Some(u64::MAX));
    }

    #[test]
    fn test_half_bounded() {
        let i = Interval::at_least(0);
        assert!(i.is_left_of(-1));
        assert!(!i.is_left_of(0));
        assert_eq!(i.clamp(-5), 0);
        assert_eq!(i.clamp(1_000_000), 1_000_000);

        let j = Interval::at_most(10);
        assert!(j.is_at_or_right_of_end(10));
        assert!(!j.is_at_or_right_of_end(9));
        assert_eq!(j.clamp(20), 10);
    }

    #[test]
    fn test_display() {
        assert_eq!(Interval::from_endpoints(0, 3).unwrap().to_string(), "[0, 3]");
        assert_eq!(Interval::at_least(0).to_string(), "[0, +inf)");
        assert_eq!(Interval::unbounded().to_string(), "(-inf, +inf)");
    }
}
