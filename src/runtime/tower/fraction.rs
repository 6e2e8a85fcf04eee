use std::cmp::Ordering;

use num_bigint::BigInt;
use num_integer::Integer;
use num_traits::{One, Signed, Zero};

/// Exact rational number kept in lowest terms with a positive denominator.
///
/// A denominator of one is legal here (integers promoted to the fraction
/// level look like that) but never survives into a stored result: see
/// [`Value::from_fraction`](super::Value::from_fraction).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Fraction {
    num: BigInt,
    den: BigInt,
}

impl Fraction {
    /// Builds `num / den` in lowest terms.
    ///
    /// Panics on a zero denominator; callers check divisors first.
    pub fn new(num: BigInt, den: BigInt) -> Self {
        assert!(!den.is_zero(), "Fraction::new: zero denominator");
        let g = num.gcd(&den);
        let (mut num, mut den) = if g.is_one() {
            (num, den)
        } else {
            (num / &g, den / &g)
        };
        if den.is_negative() {
            num = -num;
            den = -den;
        }
        Self { num, den }
    }

    pub fn from_integer(value: BigInt) -> Self {
        Self {
            num: value,
            den: BigInt::one(),
        }
    }

    pub fn numer(&self) -> &BigInt {
        &self.num
    }

    pub fn denom(&self) -> &BigInt {
        &self.den
    }

    pub fn into_parts(self) -> (BigInt, BigInt) {
        (self.num, self.den)
    }

    pub fn is_integer(&self) -> bool {
        self.den.is_one()
    }

    pub fn is_zero(&self) -> bool {
        self.num.is_zero()
    }

    pub fn is_negative(&self) -> bool {
        self.num.is_negative()
    }

    pub fn neg(&self) -> Self {
        Self {
            num: -&self.num,
            den: self.den.clone(),
        }
    }

    pub fn abs(&self) -> Self {
        Self {
            num: self.num.abs(),
            den: self.den.clone(),
        }
    }

    pub fn add(&self, other: &Self) -> Self {
        Self::new(
            &self.num * &other.den + &other.num * &self.den,
            &self.den * &other.den,
        )
    }

    pub fn sub(&self, other: &Self) -> Self {
        Self::new(
            &self.num * &other.den - &other.num * &self.den,
            &self.den * &other.den,
        )
    }

    pub fn mul(&self, other: &Self) -> Self {
        Self::new(&self.num * &other.num, &self.den * &other.den)
    }

    /// Returns `None` when `other` is zero.
    pub fn div(&self, other: &Self) -> Option<Self> {
        if other.is_zero() {
            return None;
        }
        Some(Self::new(&self.num * &other.den, &self.den * &other.num))
    }

    pub fn recip(&self) -> Option<Self> {
        Self::from_integer(BigInt::one()).div(self)
    }

    /// Largest integer not above the value.
    pub fn floor(&self) -> BigInt {
        self.num.div_floor(&self.den)
    }

    /// Integer part, rounding toward zero.
    pub fn trunc(&self) -> BigInt {
        &self.num / &self.den
    }

    /// Raises to an integer power. `None` for a negative power of zero.
    pub fn powi(&self, exp: u32, negative: bool) -> Option<Self> {
        let num = num_traits::pow(self.num.clone(), exp as usize);
        let den = num_traits::pow(self.den.clone(), exp as usize);
        if negative {
            if num.is_zero() {
                return None;
            }
            Some(Self::new(den, num))
        } else {
            Some(Self { num, den })
        }
    }

    /// Bits needed for the larger of numerator and denominator.
    pub fn bits(&self) -> u64 {
        self.num.bits().max(self.den.bits())
    }
}

impl PartialOrd for Fraction {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Fraction {
    fn cmp(&self, other: &Self) -> Ordering {
        (&self.num * &other.den).cmp(&(&other.num * &self.den))
    }
}
