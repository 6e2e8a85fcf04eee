use num_bigint::BigInt;
use num_traits::{Signed, ToPrimitive, Zero};

use crate::runtime::{
    expr::Expr,
    tower::{Level, complex::Complex, decimal::Decimal, fraction::Fraction},
    units::UnitValue,
};

/// Owned, decoded form of a heap object.
///
/// The evaluator works on `Value`s; the heap stores their encoded bytes.
/// Constructors keep each number in the lowest representation that holds it
/// exactly: a `Bignum` never fits in `i64` and a `Fraction` never has a
/// denominator of one.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Integer(i64),
    Bignum(BigInt),
    Fraction(Fraction),
    Decimal(Decimal),
    Complex(Box<Complex>),
    Unit(Box<UnitValue>),
    Symbol(String),
    Expression(Box<Expr>),
    Program(Vec<Value>),
    /// Index into the command table.
    Command(u16),
}

impl Value {
    pub fn from_bigint(value: BigInt) -> Value {
        match value.to_i64() {
            Some(small) => Value::Integer(small),
            None => Value::Bignum(value),
        }
    }

    pub fn from_fraction(value: Fraction) -> Value {
        if value.is_integer() {
            let (num, _) = value.into_parts();
            Value::from_bigint(num)
        } else {
            Value::Fraction(value)
        }
    }

    /// `num / den` reduced and demoted. Panics on a zero denominator.
    pub fn from_ratio(num: BigInt, den: BigInt) -> Value {
        Value::from_fraction(Fraction::new(num, den))
    }

    pub fn unit(value: Value, unit: Expr) -> Value {
        Value::Unit(Box::new(UnitValue { value, unit }))
    }

    pub fn complex(re: Value, im: Value) -> Value {
        Value::Complex(Box::new(Complex::new(re, im)))
    }

    /// Position in the numeric tower, `None` for non-numeric values.
    pub fn level(&self) -> Option<Level> {
        match self {
            Value::Integer(_) => Some(Level::Integer),
            Value::Bignum(_) => Some(Level::Bignum),
            Value::Fraction(_) => Some(Level::Fraction),
            Value::Decimal(_) => Some(Level::Decimal),
            Value::Complex(_) => Some(Level::Complex),
            _ => None,
        }
    }

    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Integer(_) => "Integer",
            Value::Bignum(_) => "Big integer",
            Value::Fraction(_) => "Fraction",
            Value::Decimal(_) => "Decimal",
            Value::Complex(_) => "Complex",
            Value::Unit(_) => "Unit",
            Value::Symbol(_) => "Symbol",
            Value::Expression(_) => "Expression",
            Value::Program(_) => "Program",
            Value::Command(_) => "Command",
        }
    }

    /// Real numbers: every tower level below complex.
    pub fn is_real(&self) -> bool {
        matches!(
            self,
            Value::Integer(_) | Value::Bignum(_) | Value::Fraction(_) | Value::Decimal(_)
        )
    }

    pub fn is_symbolic(&self) -> bool {
        matches!(self, Value::Symbol(_) | Value::Expression(_))
    }

    pub fn is_zero(&self) -> bool {
        match self {
            Value::Integer(v) => *v == 0,
            Value::Bignum(v) => v.is_zero(),
            Value::Fraction(v) => v.is_zero(),
            Value::Decimal(v) => v.is_zero(),
            Value::Complex(z) => z.is_zero(),
            _ => false,
        }
    }

    pub fn is_negative(&self) -> bool {
        match self {
            Value::Integer(v) => *v < 0,
            Value::Bignum(v) => v.is_negative(),
            Value::Fraction(v) => v.is_negative(),
            Value::Decimal(v) => v.is_negative(),
            _ => false,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Value::Integer(v) => Some(*v),
            Value::Decimal(d) => d.to_i64(),
            _ => None,
        }
    }

    /// Exact integer value of an integer-level number.
    pub fn to_bigint(&self) -> Option<BigInt> {
        match self {
            Value::Integer(v) => Some(BigInt::from(*v)),
            Value::Bignum(v) => Some(v.clone()),
            _ => None,
        }
    }

    /// Exact rational value of an integer- or fraction-level number.
    pub fn to_fraction(&self) -> Option<Fraction> {
        match self {
            Value::Fraction(f) => Some(f.clone()),
            other => other.to_bigint().map(Fraction::from_integer),
        }
    }

    /// Decimal value of any real number, rounded to `precision` digits.
    pub fn to_decimal(&self, precision: usize) -> Option<Decimal> {
        match self {
            Value::Integer(v) => Some(Decimal::from_i64(*v).round(precision)),
            Value::Bignum(v) => Some(Decimal::from_bigint(v.clone()).round(precision)),
            Value::Fraction(f) => Some(Decimal::from_fraction(f, precision)),
            Value::Decimal(d) => Some(d.round(precision)),
            _ => None,
        }
    }

    pub fn to_complex(&self) -> Option<Complex> {
        match self {
            Value::Complex(z) => Some((**z).clone()),
            real if real.is_real() => Some(Complex::from_real(real.clone())),
            _ => None,
        }
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Value::Integer(value)
    }
}

impl From<BigInt> for Value {
    fn from(value: BigInt) -> Self {
        Value::from_bigint(value)
    }
}

impl From<Decimal> for Value {
    fn from(value: Decimal) -> Self {
        Value::Decimal(value)
    }
}
