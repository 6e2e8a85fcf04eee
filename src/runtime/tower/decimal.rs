use std::cmp::Ordering;

use num_bigint::{BigInt, Sign};
use num_integer::Integer;
use num_traits::{One, Signed, ToPrimitive, Zero};

use crate::runtime::{
    error::{Result, RuntimeError},
    tower::fraction::Fraction,
};

/// Precision large enough that `add`, `sub` and `mul` never round.
pub const EXACT: usize = 1 << 40;

/// `10^n` as a big integer.
pub fn pow10(n: u64) -> BigInt {
    num_traits::pow(BigInt::from(10u32), n as usize)
}

/// Number of decimal digits in `|value|`; zero has one digit.
pub fn decimal_digits(value: &BigInt) -> u64 {
    if value.is_zero() {
        return 1;
    }
    // bits * log10(2) is within one of the answer.
    let estimate = ((value.bits() - 1) as f64 * std::f64::consts::LOG10_2) as u64 + 1;
    if value.magnitude() >= pow10(estimate).magnitude() {
        estimate + 1
    } else {
        estimate
    }
}

/// Arbitrary-precision decimal: `mantissa * 10^exponent`.
///
/// Always normalized: the mantissa carries no trailing zeros and zero is
/// stored with exponent 0, so structural equality is numeric equality.
/// Arithmetic takes the working precision in significant digits and rounds
/// half to even.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Decimal {
    mantissa: BigInt,
    exponent: i64,
}

impl Decimal {
    pub fn new(mantissa: BigInt, exponent: i64) -> Self {
        if mantissa.is_zero() {
            return Self::zero();
        }
        let ten = BigInt::from(10u32);
        let mut mantissa = mantissa;
        let mut exponent = exponent;
        loop {
            let (q, r) = mantissa.div_rem(&ten);
            if !r.is_zero() {
                break;
            }
            mantissa = q;
            exponent = exponent.saturating_add(1);
        }
        Self { mantissa, exponent }
    }

    pub fn zero() -> Self {
        Self {
            mantissa: BigInt::zero(),
            exponent: 0,
        }
    }

    pub fn one() -> Self {
        Self::from_i64(1)
    }

    pub fn from_i64(value: i64) -> Self {
        Self::new(BigInt::from(value), 0)
    }

    pub fn from_bigint(value: BigInt) -> Self {
        Self::new(value, 0)
    }

    /// Converts an exact fraction, rounding to `precision` digits.
    pub fn from_fraction(value: &Fraction, precision: usize) -> Self {
        Self::quotient(
            &Self::from_bigint(value.numer().clone()),
            &Self::from_bigint(value.denom().clone()),
            precision,
        )
    }

    pub fn mantissa(&self) -> &BigInt {
        &self.mantissa
    }

    pub fn exponent(&self) -> i64 {
        self.exponent
    }

    pub fn digits(&self) -> u64 {
        decimal_digits(&self.mantissa)
    }

    /// Exponent of the leading digit, as in scientific notation.
    pub fn adjusted_exponent(&self) -> i64 {
        self.exponent.saturating_add(self.digits() as i64 - 1)
    }

    pub fn is_zero(&self) -> bool {
        self.mantissa.is_zero()
    }

    pub fn is_negative(&self) -> bool {
        self.mantissa.is_negative()
    }

    pub fn is_integer(&self) -> bool {
        self.exponent >= 0
    }

    pub fn neg(&self) -> Self {
        Self {
            mantissa: -&self.mantissa,
            exponent: self.exponent,
        }
    }

    pub fn abs(&self) -> Self {
        Self {
            mantissa: self.mantissa.abs(),
            exponent: self.exponent,
        }
    }

    /// Rounds to at most `precision` significant digits, half to even.
    pub fn round(&self, precision: usize) -> Self {
        let digits = self.digits();
        if digits <= precision as u64 {
            return self.clone();
        }
        let drop = digits - precision as u64;
        Self::new(
            round_half_even(&self.mantissa, drop),
            self.exponent.saturating_add(drop as i64),
        )
    }

    pub fn add(&self, other: &Self, precision: usize) -> Self {
        if self.is_zero() {
            return other.round(precision);
        }
        if other.is_zero() {
            return self.round(precision);
        }
        let (big, small) = if self.adjusted_exponent() >= other.adjusted_exponent() {
            (self, other)
        } else {
            (other, self)
        };
        let width = precision as u64 + 3;
        let gap = big.adjusted_exponent().saturating_sub(small.adjusted_exponent());
        if gap >= width.max(big.digits()) as i64 {
            // `small` sits entirely below the rounding digit: replace it with
            // a sticky unit of the same sign.
            let k = width.saturating_sub(big.digits());
            let mantissa = &big.mantissa * pow10(k) + small.mantissa.signum();
            return Self::new(mantissa, big.exponent - k as i64).round(precision);
        }
        let exponent = self.exponent.min(other.exponent);
        let a = &self.mantissa * pow10((self.exponent - exponent) as u64);
        let b = &other.mantissa * pow10((other.exponent - exponent) as u64);
        Self::new(a + b, exponent).round(precision)
    }

    pub fn sub(&self, other: &Self, precision: usize) -> Self {
        self.add(&other.neg(), precision)
    }

    pub fn mul(&self, other: &Self, precision: usize) -> Self {
        Self::new(
            &self.mantissa * &other.mantissa,
            self.exponent.saturating_add(other.exponent),
        )
        .round(precision)
    }

    /// Returns `None` when `other` is zero.
    pub fn div(&self, other: &Self, precision: usize) -> Option<Self> {
        if other.is_zero() {
            return None;
        }
        Some(Self::quotient(self, other, precision))
    }

    fn quotient(num: &Self, den: &Self, precision: usize) -> Self {
        if num.is_zero() {
            return Self::zero();
        }
        let wanted = precision as i64 + 2;
        let shift = (wanted + den.digits() as i64 - num.digits() as i64).max(0) as u64;
        let scaled = &num.mantissa * pow10(shift);
        let (q, r) = scaled.div_rem(&den.mantissa);
        let exponent = num
            .exponent
            .saturating_sub(den.exponent)
            .saturating_sub(shift as i64);
        if r.is_zero() {
            Self::new(q, exponent).round(precision)
        } else {
            let sticky = if num.is_negative() == den.is_negative() {
                BigInt::one()
            } else {
                -BigInt::one()
            };
            Self::new(q * 10 + sticky, exponent.saturating_sub(1)).round(precision)
        }
    }

    /// Largest integer not above the value.
    pub fn floor(&self) -> BigInt {
        if self.exponent >= 0 {
            &self.mantissa * pow10(self.exponent as u64)
        } else {
            self.mantissa.div_floor(&pow10(self.exponent.unsigned_abs()))
        }
    }

    /// Integer part, rounding toward zero.
    pub fn trunc(&self) -> BigInt {
        if self.exponent >= 0 {
            &self.mantissa * pow10(self.exponent as u64)
        } else {
            &self.mantissa / pow10(self.exponent.unsigned_abs())
        }
    }

    /// Exact integer value, if the decimal is integral and fits in `i64`.
    pub fn to_i64(&self) -> Option<i64> {
        if !self.is_integer() || self.exponent > 18 {
            return None;
        }
        (&self.mantissa * pow10(self.exponent as u64)).to_i64()
    }

    /// Exact conversion to a fraction.
    pub fn to_fraction(&self) -> Fraction {
        if self.exponent >= 0 {
            Fraction::from_integer(self.floor())
        } else {
            Fraction::new(
                self.mantissa.clone(),
                pow10(self.exponent.unsigned_abs()),
            )
        }
    }

    /// Magnitude digits, most significant first, without sign or exponent.
    pub fn digit_string(&self) -> String {
        self.mantissa.magnitude().to_str_radix(10)
    }

    /// Fails with `Overflow` or `Underflow` when the leading digit's exponent
    /// is outside `±max_exponent`.
    pub fn check_range(self, max_exponent: i64) -> Result<Self> {
        if self.is_zero() {
            return Ok(self);
        }
        let adjusted = self.adjusted_exponent();
        if adjusted > max_exponent {
            Err(RuntimeError::Overflow {
                representation: "Decimal",
            })
        } else if adjusted < -max_exponent {
            Err(RuntimeError::Underflow)
        } else {
            Ok(self)
        }
    }
}

fn round_half_even(mantissa: &BigInt, drop: u64) -> BigInt {
    let divisor = pow10(drop);
    let (q, r) = mantissa.magnitude().div_rem(divisor.magnitude());
    let q = match (r * 2u32).cmp(divisor.magnitude()) {
        Ordering::Greater => q + 1u32,
        Ordering::Equal if q.is_odd() => q + 1u32,
        _ => q,
    };
    let sign = if mantissa.is_negative() {
        Sign::Minus
    } else {
        Sign::Plus
    };
    BigInt::from_biguint(sign, q)
}

impl PartialOrd for Decimal {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Decimal {
    fn cmp(&self, other: &Self) -> Ordering {
        let (ls, rs) = (self.mantissa.sign(), other.mantissa.sign());
        if ls != rs || ls == Sign::NoSign {
            return ls.cmp(&rs);
        }
        let by_magnitude = match self.adjusted_exponent().cmp(&other.adjusted_exponent()) {
            Ordering::Equal => {
                let exponent = self.exponent.min(other.exponent);
                let a = self.mantissa.magnitude() * pow10((self.exponent - exponent) as u64).magnitude();
                let b = other.mantissa.magnitude() * pow10((other.exponent - exponent) as u64).magnitude();
                a.cmp(&b)
            }
            ordering => ordering,
        };
        if ls == Sign::Minus {
            by_magnitude.reverse()
        } else {
            by_magnitude
        }
    }
}
