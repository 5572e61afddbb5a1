//! Exact rational numbers.
//!
//! Mixed-strategy probabilities and Bayesian posteriors are compared against
//! fixed answer menus, so they are never represented as floats.

use std::cmp::Ordering;
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, Div, Mul, Neg, Sub};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// A rational number kept in lowest terms with a strictly positive denominator.
///
/// Because the representation is canonical, the derived `Eq` and `Hash`
/// compare values, not spellings: `2/6 == 1/3`.
///
/// Constructors and parsing reject values that do not fit. Arithmetic
/// operators are carried out in 128-bit intermediates and panic if the
/// reduced result does not fit in 64 bits, like integer overflow; use the
/// `checked_*` methods where operands come from callers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "FractionRepr", into = "FractionRepr")]
pub struct Fraction {
    num: i64,
    den: i64,
}

#[derive(Serialize, Deserialize)]
struct FractionRepr {
    numerator: i64,
    denominator: i64,
}

fn gcd(a: i128, b: i128) -> i128 {
    let (mut a, mut b) = (a.abs(), b.abs());
    while b != 0 {
        (a, b) = (b, a % b);
    }
    a
}

impl Fraction {
    /// Zero.
    pub const ZERO: Fraction = Fraction { num: 0, den: 1 };
    /// One.
    pub const ONE: Fraction = Fraction { num: 1, den: 1 };

    /// Build `num / den` in lowest terms. Returns `None` when `den` is zero
    /// or the reduced value does not fit (`i64::MIN / -1`).
    pub fn new(num: i64, den: i64) -> Option<Self> {
        Self::from_i128(num as i128, den as i128)
    }

    /// Build `num / den` from wide integers. Returns `None` when `den` is
    /// zero or the reduced value does not fit in 64 bits.
    pub fn from_i128(num: i128, den: i128) -> Option<Self> {
        Self::checked_reduce(num, den)
    }

    /// An integer as a fraction.
    pub fn from_integer(value: i64) -> Self {
        Self { num: value, den: 1 }
    }

    /// Divide numerator and denominator by their gcd, then make the
    /// denominator positive.
    fn checked_reduce(num: i128, den: i128) -> Option<Self> {
        if den == 0 {
            return None;
        }
        let g = gcd(num, den).max(1);
        let (mut num, mut den) = (num / g, den / g);
        if den < 0 {
            num = num.checked_neg()?;
            den = den.checked_neg()?;
        }
        Some(Self {
            num: i64::try_from(num).ok()?,
            den: i64::try_from(den).ok()?,
        })
    }

    fn reduce(num: i128, den: i128) -> Self {
        match Self::checked_reduce(num, den) {
            Some(f) => f,
            None => panic!("fraction overflow: {}/{}", num, den),
        }
    }

    /// Numerator (sign carrier).
    pub fn numerator(&self) -> i64 {
        self.num
    }

    /// Denominator, always positive.
    pub fn denominator(&self) -> i64 {
        self.den
    }

    /// Reduce again. Values are always kept reduced, so this is the identity.
    pub fn reduced(self) -> Self {
        Self::reduce(self.num as i128, self.den as i128)
    }

    /// True for `0`.
    pub fn is_zero(&self) -> bool {
        self.num == 0
    }

    /// True for values strictly below zero.
    pub fn is_negative(&self) -> bool {
        self.num < 0
    }

    /// Addition returning `None` on overflow.
    pub fn checked_add(self, rhs: Fraction) -> Option<Fraction> {
        Self::checked_reduce(
            self.num as i128 * rhs.den as i128 + rhs.num as i128 * self.den as i128,
            self.den as i128 * rhs.den as i128,
        )
    }

    /// Multiplication returning `None` on overflow.
    pub fn checked_mul(self, rhs: Fraction) -> Option<Fraction> {
        Self::checked_reduce(self.num as i128 * rhs.num as i128, self.den as i128 * rhs.den as i128)
    }

    /// Negation returning `None` for `i64::MIN`.
    pub fn checked_neg(self) -> Option<Fraction> {
        Some(Self {
            num: self.num.checked_neg()?,
            den: self.den,
        })
    }

    /// Division returning `None` on a zero divisor or overflow.
    pub fn checked_div(self, rhs: Fraction) -> Option<Fraction> {
        Self::checked_reduce(
            self.num as i128 * rhs.den as i128,
            self.den as i128 * rhs.num as i128,
        )
    }
}

impl Default for Fraction {
    fn default() -> Self {
        Self::ZERO
    }
}

impl From<i64> for Fraction {
    fn from(value: i64) -> Self {
        Self::from_integer(value)
    }
}

impl PartialOrd for Fraction {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Fraction {
    fn cmp(&self, other: &Self) -> Ordering {
        // denominators are positive, so cross-multiplication preserves order
        (self.num as i128 * other.den as i128).cmp(&(other.num as i128 * self.den as i128))
    }
}

impl Add for Fraction {
    type Output = Fraction;

    /// # Panics
    /// Panics if the sum overflows.
    fn add(self, rhs: Fraction) -> Fraction {
        Self::reduce(
            self.num as i128 * rhs.den as i128 + rhs.num as i128 * self.den as i128,
            self.den as i128 * rhs.den as i128,
        )
    }
}

impl Sub for Fraction {
    type Output = Fraction;

    /// # Panics
    /// Panics if the difference overflows.
    fn sub(self, rhs: Fraction) -> Fraction {
        Self::reduce(
            self.num as i128 * rhs.den as i128 - rhs.num as i128 * self.den as i128,
            self.den as i128 * rhs.den as i128,
        )
    }
}

impl Mul for Fraction {
    type Output = Fraction;

    /// # Panics
    /// Panics if the product overflows.
    fn mul(self, rhs: Fraction) -> Fraction {
        Self::reduce(
            self.num as i128 * rhs.num as i128,
            self.den as i128 * rhs.den as i128,
        )
    }
}

impl Div for Fraction {
    type Output = Fraction;

    /// # Panics
    /// Panics if `rhs` is zero or the quotient overflows.
    fn div(self, rhs: Fraction) -> Fraction {
        match self.checked_div(rhs) {
            Some(q) => q,
            None => panic!("fraction division by {} failed", rhs),
        }
    }
}

impl Neg for Fraction {
    type Output = Fraction;

    /// # Panics
    /// Panics if the numerator is `i64::MIN`.
    fn neg(self) -> Fraction {
        Self::reduce(-(self.num as i128), self.den as i128)
    }
}

impl Sum for Fraction {
    fn sum<I: Iterator<Item = Fraction>>(iter: I) -> Self {
        iter.fold(Fraction::ZERO, |acc, f| acc + f)
    }
}

impl fmt::Display for Fraction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.den == 1 {
            write!(f, "{}", self.num)
        } else {
            write!(f, "{}/{}", self.num, self.den)
        }
    }
}

impl FromStr for Fraction {
    type Err = String;

    /// Parse `"n/d"` or a bare integer `"n"`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let (num, den) = match s.split_once('/') {
            Some((n, d)) => (n.trim(), d.trim()),
            None => (s, "1"),
        };
        let num: i64 = num.parse().map_err(|_| format!("invalid numerator in '{}'", s))?;
        let den: i64 = den.parse().map_err(|_| format!("invalid denominator in '{}'", s))?;
        Fraction::new(num, den).ok_or_else(|| format!("zero denominator or overflow in '{}'", s))
    }
}

impl TryFrom<FractionRepr> for Fraction {
    type Error = String;

    fn try_from(repr: FractionRepr) -> Result<Self, Self::Error> {
        Fraction::new(repr.numerator, repr.denominator)
            .ok_or_else(|| "denominator must be non-zero and the value must fit in 64 bits".to_string())
    }
}

impl From<Fraction> for FractionRepr {
    fn from(f: Fraction) -> Self {
        FractionRepr {
            numerator: f.num,
            denominator: f.den,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn frac(n: i64, d: i64) -> Fraction {
        Fraction::new(n, d).unwrap()
    }

    #[test]
    fn test_reduces_and_normalizes_sign() {
        let f = frac(2, 6);
        assert_eq!((f.numerator(), f.denominator()), (1, 3));

        let g = frac(3, -9);
        assert_eq!((g.numerator(), g.denominator()), (-1, 3));

        let h = frac(-4, -8);
        assert_eq!((h.numerator(), h.denominator()), (1, 2));

        assert_eq!(frac(0, -5), Fraction::ZERO);
        assert!(Fraction::new(1, 0).is_none());
    }

    #[test]
    fn test_reduction_is_idempotent() {
        for (n, d) in [(2, 6), (-3, 7), (10, -4), (0, 3), (9, 9)] {
            let once = frac(n, d);
            let twice = once.reduced();
            assert_eq!(once, twice);
            assert!(twice.denominator() > 0);
        }
    }

    #[test]
    fn test_arithmetic_and_ordering() {
        assert_eq!(frac(1, 4) + frac(3, 4), Fraction::ONE);
        assert_eq!(frac(1, 2) - frac(1, 3), frac(1, 6));
        assert_eq!(frac(2, 3) * frac(3, 4), frac(1, 2));
        assert_eq!(frac(1, 3) / frac(2, 3), frac(1, 2));
        assert!(frac(1, 3) < frac(1, 2));
        assert!(frac(-1, 2) < Fraction::ZERO);
        assert_eq!(frac(1, 3).checked_div(Fraction::ZERO), None);
        let total: Fraction = [frac(1, 6), frac(1, 3), frac(1, 2)].into_iter().sum();
        assert_eq!(total, Fraction::ONE);
    }

    #[test]
    fn test_display_and_parse() {
        assert_eq!(frac(4, 11).to_string(), "4/11");
        assert_eq!(frac(6, 3).to_string(), "2");
        assert_eq!("3/9".parse::<Fraction>().unwrap(), frac(1, 3));
        assert_eq!(" 5 ".parse::<Fraction>().unwrap(), Fraction::from_integer(5));
        assert!("1/0".parse::<Fraction>().is_err());
        assert!("x/2".parse::<Fraction>().is_err());
    }

    #[test]
    fn test_out_of_range_values_are_rejected() {
        assert!(Fraction::new(i64::MIN, -1).is_none());
        assert_eq!(Fraction::new(i64::MIN, -2).unwrap(), Fraction::from_integer(1 << 62));
        assert!(Fraction::from_i128(1, i64::MAX as i128 + 1).is_none());
        assert_eq!(Fraction::from_i128(i64::MAX as i128 * 2, 2), Some(Fraction::from_integer(i64::MAX)));
        assert!(format!("{}/-1", i64::MIN).parse::<Fraction>().is_err());

        let json = r#"{"numerator":-9223372036854775808,"denominator":-1}"#;
        assert!(serde_json::from_str::<Fraction>(json).is_err());
    }

    #[test]
    fn test_checked_arithmetic() {
        let big = Fraction::from_integer(i64::MAX);
        assert_eq!(big.checked_add(Fraction::ONE), None);
        assert_eq!(big.checked_mul(Fraction::from_integer(2)), None);
        assert_eq!(Fraction::from_integer(i64::MIN).checked_neg(), None);
        assert_eq!(frac(1, 3).checked_neg(), Some(frac(-1, 3)));
        assert_eq!(frac(1, 2).checked_add(frac(1, 3)), Some(frac(5, 6)));
        assert_eq!(frac(2, 3).checked_mul(frac(3, 4)), Some(frac(1, 2)));
        assert_eq!(-frac(3, 4), frac(-3, 4));
    }

    #[test]
    fn test_serializes_reduced_pair() {
        let json = serde_json::to_string(&frac(2, 6)).unwrap();
        assert_eq!(json, r#"{"numerator":1,"denominator":3}"#);
        let parsed: Fraction = serde_json::from_str(r#"{"numerator":4,"denominator":-8}"#).unwrap();
        assert_eq!(parsed, frac(-1, 2));
        assert!(serde_json::from_str::<Fraction>(r#"{"numerator":1,"denominator":0}"#).is_err());
    }
}
