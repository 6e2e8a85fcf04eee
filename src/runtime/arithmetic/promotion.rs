use num_bigint::BigInt;

use crate::runtime::tower::{Complex, Decimal, Fraction, Level, Value};

/// Both operands of a binary operation coerced to one tower level.
#[derive(Debug, Clone, PartialEq)]
pub enum Promoted {
    Integer(i64, i64),
    Bignum(BigInt, BigInt),
    Fraction(Fraction, Fraction),
    Decimal(Decimal, Decimal),
    Complex(Complex, Complex),
}

impl Promoted {
    pub fn level(&self) -> Level {
        match self {
            Promoted::Integer(..) => Level::Integer,
            Promoted::Bignum(..) => Level::Bignum,
            Promoted::Fraction(..) => Level::Fraction,
            Promoted::Decimal(..) => Level::Decimal,
            Promoted::Complex(..) => Level::Complex,
        }
    }

    /// True when the second operand is zero at this level.
    pub fn divisor_is_zero(&self) -> bool {
        match self {
            Promoted::Integer(_, y) => *y == 0,
            Promoted::Bignum(_, y) => y == &BigInt::from(0),
            Promoted::Fraction(_, y) => y.is_zero(),
            Promoted::Decimal(_, y) => y.is_zero(),
            Promoted::Complex(_, y) => y.is_zero(),
        }
    }
}

/// Coerces `x` and `y` to `level`.
///
/// Promotion only moves up the tower: `None` when either operand sits above
/// `level` or is not numeric. Decimal conversions round to `precision`.
pub fn promote(x: &Value, y: &Value, level: Level, precision: usize) -> Option<Promoted> {
    if x.level()? > level || y.level()? > level {
        return None;
    }
    Some(match level {
        Level::Integer => match (x, y) {
            (Value::Integer(a), Value::Integer(b)) => Promoted::Integer(*a, *b),
            _ => return None,
        },
        Level::Bignum => Promoted::Bignum(x.to_bigint()?, y.to_bigint()?),
        Level::Fraction => Promoted::Fraction(x.to_fraction()?, y.to_fraction()?),
        Level::Decimal => Promoted::Decimal(x.to_decimal(precision)?, y.to_decimal(precision)?),
        Level::Complex => Promoted::Complex(x.to_complex()?, y.to_complex()?),
    })
}

/// Lowest level holding both operands exactly, or `None` if either is not
/// numeric.
pub fn common_level(x: &Value, y: &Value) -> Option<Level> {
    Some(x.level()?.max(y.level()?))
}
