/*
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

use std::fmt;

/// A numerical representation of the evaluation of a position.
///
/// Scores are always from Blue's perspective: higher is better for Blue, lower is better for Red.
/// The simple heuristic only produces small whole numbers, but the complex one divides,
/// so a [`Score`] is a real number and may grow large.
#[derive(Clone, Copy, Default, PartialEq, PartialOrd)]
#[repr(transparent)]
pub struct Score(pub f64);

impl Score {
    /// Starting bound for a search window's lower end.
    pub const ALPHA: Self = Self(f64::NEG_INFINITY);

    /// Starting bound for a search window's upper end.
    pub const BETA: Self = Self(f64::INFINITY);

    /// A position neither side is ahead in.
    pub const DRAW: Self = Self(0.0);

    /// Creates a new [`Score`].
    #[inline(always)]
    pub const fn new(score: f64) -> Self {
        Self(score)
    }

    /// Returns the inner value.
    #[inline(always)]
    pub const fn inner(&self) -> f64 {
        self.0
    }

    /// Returns the larger of `self` and `other`.
    #[inline(always)]
    pub fn max(self, other: Self) -> Self {
        Self(self.0.max(other.0))
    }

    /// Returns the smaller of `self` and `other`.
    #[inline(always)]
    pub fn min(self, other: Self) -> Self {
        Self(self.0.min(other.0))
    }
}

impl From<i32> for Score {
    #[inline(always)]
    fn from(value: i32) -> Self {
        Self(value as f64)
    }
}

impl PartialEq<f64> for Score {
    fn eq(&self, other: &f64) -> bool {
        self.0.eq(other)
    }
}

impl PartialOrd<f64> for Score {
    fn partial_cmp(&self, other: &f64) -> Option<std::cmp::Ordering> {
        self.0.partial_cmp(other)
    }
}

impl fmt::Display for Score {
    /// Whole scores print without a fractional part. Otherwise, the formatter's precision is used, or 4 places by default.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.is_infinite() {
            let sign = if self.0 > 0.0 { "+" } else { "-" };
            return write!(f, "{sign}inf");
        }

        if self.0.fract() == 0.0 && f.precision().is_none() {
            write!(f, "{}", self.0)
        } else {
            let precision = f.precision().unwrap_or(4);
            write!(f, "{:.*}", precision, self.0)
        }
    }
}

impl fmt::Debug for Score {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ordering() {
        assert!(Score::ALPHA < Score::from(-1_000_000));
        assert!(Score::BETA > Score::from(1_000_000));
        assert!(Score::DRAW < Score::new(0.25));
        assert!(Score::ALPHA < Score::BETA);
    }

    #[test]
    fn test_display() {
        assert_eq!(Score::from(6).to_string(), "6");
        assert_eq!(Score::from(-3).to_string(), "-3");
        assert_eq!(Score::new(-1.0 / 6.0).to_string(), "-0.1667");
        assert_eq!(format!("{:.1}", Score::new(2.26)), "2.3");
        assert_eq!(Score::ALPHA.to_string(), "-inf");
        assert_eq!(Score::BETA.to_string(), "+inf");
    }
}
