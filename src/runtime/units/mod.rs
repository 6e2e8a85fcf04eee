//! Unit subsystem.
//!
//! A unit object pairs a numeric value with a unit expression over named
//! units. Named units resolve through [`UnitTable`]; conversion reduces both
//! sides to base units and compares the resulting dimensions.

pub mod builtin_units;
pub mod commands;
pub mod prefixes;
pub mod reduce;
pub mod table;
pub mod unit_ops;


pub use reduce::{Dimensions, Reduced, convert, reduce};
pub use table::{UnitDef, UnitTable};

use crate::runtime::{expr::Expr, tower::Value};

/// Value part and unit part of a unit object.
///
/// `value` is a real or complex number; `unit` only holds symbols,
/// products, quotients and constant powers.
#[derive(Debug, Clone, PartialEq)]
pub struct UnitValue {
    pub value: Value,
    pub unit: Expr,
}

impl UnitValue {
    pub fn new(value: Value, unit: Expr) -> Self {
        Self { value, unit }
    }

    pub fn into_value(self) -> Value {
        Value::Unit(Box::new(self))
    }
}
