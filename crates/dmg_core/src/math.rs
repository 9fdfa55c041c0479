//! Exact rational multipliers for deterministic damage math.
//!
//! Every multiplier in the calculator (nature, stage rank, STAB, type
//! effectiveness, item boosts, heal fractions and thresholds) is a small
//! rational number. Keeping them as `num/den` pairs and flooring after each
//! multiplication gives the same result on every platform, with no
//! floating-point rounding drift.

use std::fmt;

use serde::{Deserialize, Serialize};

/// A non-negative rational multiplier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Ratio {
    /// Numerator.
    pub num: u32,
    /// Denominator (never zero).
    pub den: u32,
}

impl Ratio {
    /// Multiplicative identity.
    pub const ONE: Self = Self { num: 1, den: 1 };
    /// Zero multiplier (type immunity).
    pub const ZERO: Self = Self { num: 0, den: 1 };
    /// One and a half (STAB, critical hits, choice items).
    pub const THREE_HALVES: Self = Self { num: 3, den: 2 };

    /// Create a new ratio.
    ///
    /// A zero denominator is treated as one so the value stays usable.
    #[must_use]
    pub const fn new(num: u32, den: u32) -> Self {
        Self {
            num,
            den: if den == 0 { 1 } else { den },
        }
    }

    /// Create a ratio from a whole number.
    #[must_use]
    pub const fn whole(n: u32) -> Self {
        Self { num: n, den: 1 }
    }

    /// Create a ratio from thousandths, e.g. `per_mille(333)` is 0.333.
    #[must_use]
    pub const fn per_mille(n: u32) -> Self {
        Self { num: n, den: 1000 }
    }

    /// Whether this ratio is exactly zero.
    #[must_use]
    pub const fn is_zero(self) -> bool {
        self.num == 0
    }

    /// Multiply `value` by this ratio and floor the result.
    #[must_use]
    pub const fn apply(self, value: u32) -> u32 {
        (value as u64 * self.num as u64 / self.den as u64) as u32
    }

    /// Product of two ratios, reduced to lowest terms.
    #[must_use]
    pub fn mul(self, other: Self) -> Self {
        let num = self.num as u64 * other.num as u64;
        let den = self.den as u64 * other.den as u64;
        let g = gcd(num, den).max(1);
        Self {
            num: (num / g) as u32,
            den: (den / g) as u32,
        }
    }

    /// Whether `part / whole` is at or below this ratio.
    ///
    /// Compared by cross-multiplication, so no precision is lost.
    #[must_use]
    pub const fn admits(self, part: u32, whole: u32) -> bool {
        part as u64 * self.den as u64 <= whole as u64 * self.num as u64
    }
}

impl Default for Ratio {
    fn default() -> Self {
        Self::ONE
    }
}

impl fmt::Display for Ratio {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.den == 1 {
            write!(f, "{}", self.num)
        } else {
            write!(f, "{}/{}", self.num, self.den)
        }
    }
}

const fn gcd(mut a: u64, mut b: u64) -> u64 {
    while b != 0 {
        let t = a % b;
        a = b;
        b = t;
    }
    a
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_apply_floors() {
        assert_eq!(Ratio::THREE_HALVES.apply(57), 85);
        assert_eq!(Ratio::new(11, 10).apply(145), 159);
        assert_eq!(Ratio::new(11, 10).apply(150), 165);
        assert_eq!(Ratio::new(9, 10).apply(150), 135);
    }

    #[test]
    fn test_zero_denominator_is_safe() {
        let r = Ratio::new(5, 0);
        assert_eq!(r.den, 1);
        assert_eq!(r.apply(3), 15);
    }

    #[test]
    fn test_mul_reduces() {
        let quarter = Ratio::new(1, 2).mul(Ratio::new(1, 2));
        assert_eq!(quarter, Ratio::new(1, 4));

        let four = Ratio::whole(2).mul(Ratio::whole(2));
        assert_eq!(four, Ratio::whole(4));

        let neutral = Ratio::whole(2).mul(Ratio::new(1, 2));
        assert_eq!(neutral, Ratio::ONE);

        assert!(Ratio::ZERO.mul(Ratio::whole(2)).is_zero());
    }

    #[test]
    fn test_admits() {
        let half = Ratio::new(1, 2);
        assert!(half.admits(50, 100));
        assert!(half.admits(49, 100));
        assert!(!half.admits(51, 100));
    }

    #[test]
    fn test_per_mille() {
        assert_eq!(Ratio::per_mille(333).apply(201), 66);
        assert_eq!(Ratio::per_mille(250), Ratio::new(250, 1000));
    }

    #[test]
    fn test_display() {
        assert_eq!(Ratio::whole(2).to_string(), "2");
        assert_eq!(Ratio::new(1, 2).to_string(), "1/2");
    }
}
