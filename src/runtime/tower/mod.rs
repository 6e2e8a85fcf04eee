//! The numeric tower: integer < big integer < fraction < decimal < complex.

pub mod complex;
pub mod decimal;
pub mod decimal_math;
pub mod fraction;
pub mod value;

pub use complex::Complex;
pub use decimal::Decimal;
pub use fraction::Fraction;
pub use value::Value;

/// Representation levels in promotion order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Level {
    Integer,
    Bignum,
    Fraction,
    Decimal,
    Complex,
}

impl Level {
    pub const ALL: [Level; 5] = [
        Level::Integer,
        Level::Bignum,
        Level::Fraction,
        Level::Decimal,
        Level::Complex,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Level::Integer => "Integer",
            Level::Bignum => "Big integer",
            Level::Fraction => "Fraction",
            Level::Decimal => "Decimal",
            Level::Complex => "Complex",
        }
    }
}
