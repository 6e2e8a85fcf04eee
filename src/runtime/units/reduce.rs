//! Base-unit reduction and the unit-expression algebra built on it.

use std::collections::BTreeMap;

use log::debug;
use num_bigint::BigInt;

use crate::{
    runtime::{
        arithmetic::{
            EvalContext, evaluate,
            operators::{DIV, MUL, POW},
        },
        error::{Result, RuntimeError},
        expr::{Expr, ExprOp},
        tower::{Fraction, Value},
        units::UnitValue,
    },
    syntax::render_unit,
};

/// Base-unit exponents. Zero exponents are never stored.
pub type Dimensions = BTreeMap<String, Fraction>;

/// A unit expression rewritten as `factor * product(base ^ exponent)`.
#[derive(Debug, Clone, PartialEq)]
pub struct Reduced {
    pub factor: Value,
    pub dims: Dimensions,
}

impl Reduced {
    fn scalar(factor: Value) -> Self {
        Self {
            factor,
            dims: Dimensions::new(),
        }
    }

    fn merge(mut self, other: Reduced, sign: i64, ctx: &EvalContext<'_>) -> Result<Self> {
        let op = if sign < 0 { &DIV } else { &MUL };
        self.factor = evaluate(op, &self.factor, &other.factor, ctx)?;
        let sign = Fraction::from_integer(BigInt::from(sign));
        for (name, exponent) in other.dims {
            let entry = self
                .dims
                .remove(&name)
                .unwrap_or_else(|| Fraction::from_integer(BigInt::from(0)));
            let sum = entry.add(&exponent.mul(&sign));
            if !sum.is_zero() {
                self.dims.insert(name, sum);
            }
        }
        Ok(self)
    }

    fn raise(mut self, exponent: &Fraction, ctx: &EvalContext<'_>) -> Result<Self> {
        self.factor = evaluate(&POW, &self.factor, &Value::from_fraction(exponent.clone()), ctx)?;
        if exponent.is_zero() {
            self.dims.clear();
        } else {
            for power in self.dims.values_mut() {
                *power = power.mul(exponent);
            }
        }
        Ok(self)
    }
}

/// Definitions nested deeper than this are treated as cyclic.
const MAX_DEPTH: usize = 16;

/// Reduces a unit expression to base units.
pub fn reduce(unit: &Expr, ctx: &EvalContext<'_>) -> Result<Reduced> {
    reduce_at(unit, ctx, 0)
}

fn reduce_at(unit: &Expr, ctx: &EvalContext<'_>, depth: usize) -> Result<Reduced> {
    match unit {
        Expr::Number(value) => Ok(Reduced::scalar(value.clone())),
        Expr::Symbol(name) => reduce_symbol(name, ctx, depth),
        Expr::Binary(ExprOp::Mul, left, right) => {
            reduce_at(left, ctx, depth)?.merge(reduce_at(right, ctx, depth)?, 1, ctx)
        }
        Expr::Binary(ExprOp::Div, left, right) => {
            reduce_at(left, ctx, depth)?.merge(reduce_at(right, ctx, depth)?, -1, ctx)
        }
        Expr::Binary(ExprOp::Pow, base, exponent) => {
            let exponent = match exponent.as_ref() {
                Expr::Number(n) => n.to_fraction(),
                _ => None,
            }
            .ok_or_else(|| RuntimeError::InvalidUnitDefinition(render_unit(unit)))?;
            reduce_at(base, ctx, depth)?.raise(&exponent, ctx)
        }
        _ => Err(RuntimeError::InvalidUnitDefinition(render_unit(unit))),
    }
}

fn reduce_symbol(name: &str, ctx: &EvalContext<'_>, depth: usize) -> Result<Reduced> {
    if depth > MAX_DEPTH {
        return Err(RuntimeError::InvalidUnitDefinition(name.to_string()));
    }
    let resolved = ctx
        .units
        .lookup(name)
        .ok_or_else(|| RuntimeError::UndefinedUnit(name.to_string()))?;
    let def = resolved.def;
    let mut reduced = if def.is_base() {
        let mut dims = Dimensions::new();
        dims.insert(def.name.clone(), Fraction::from_integer(BigInt::from(1)));
        Reduced {
            factor: Value::Integer(1),
            dims,
        }
    } else {
        reduce_at(&def.base, ctx, depth + 1)?
    };
    reduced.factor = evaluate(&MUL, &def.factor, &reduced.factor, ctx)?;
    if let Some(prefix) = resolved.prefix {
        reduced.factor = evaluate(&MUL, &prefix.scale.factor(), &reduced.factor, ctx)?;
    }
    Ok(reduced)
}

/// Expresses `value` in the `target` unit.
///
/// `None` when the two units do not reduce to the same dimensions; neither
/// operand is touched in that case.
pub fn convert(value: &UnitValue, target: &Expr, ctx: &EvalContext<'_>) -> Result<Option<UnitValue>> {
    let from = reduce(&value.unit, ctx)?;
    let to = reduce(target, ctx)?;
    if from.dims != to.dims {
        debug!(
            "cannot convert {} to {}",
            render_unit(&value.unit),
            render_unit(target)
        );
        return Ok(None);
    }
    let ratio = evaluate(&DIV, &from.factor, &to.factor, ctx)?;
    let scaled = evaluate(&MUL, &value.value, &ratio, ctx)?;
    Ok(Some(UnitValue::new(scaled, target.clone())))
}

fn one() -> Fraction {
    Fraction::from_integer(BigInt::from(1))
}

/// Collects `symbol ^ power` terms in order of first appearance. False when
/// the expression is not a plain product of powers.
fn flatten(unit: &Expr, power: &Fraction, out: &mut Vec<(String, Fraction)>) -> bool {
    match unit {
        Expr::Symbol(name) => {
            match out.iter_mut().find(|(seen, _)| seen == name) {
                Some((_, total)) => *total = total.add(power),
                None => out.push((name.clone(), power.clone())),
            }
            true
        }
        Expr::Number(Value::Integer(1)) => true,
        Expr::Binary(ExprOp::Mul, left, right) => {
            flatten(left, power, out) && flatten(right, power, out)
        }
        Expr::Binary(ExprOp::Div, left, right) => {
            flatten(left, power, out) && flatten(right, &power.neg(), out)
        }
        Expr::Binary(ExprOp::Pow, base, exponent) => match exponent.as_ref() {
            Expr::Number(n) => match n.to_fraction() {
                Some(n) => flatten(base, &power.mul(&n), out),
                None => false,
            },
            _ => false,
        },
        _ => false,
    }
}

fn product_of(terms: &[(String, Fraction)]) -> Expr {
    let factor = |name: &str, power: Fraction| {
        if power == one() {
            Expr::symbol(name)
        } else {
            Expr::binary(
                ExprOp::Pow,
                Expr::symbol(name),
                Expr::Number(Value::from_fraction(power)),
            )
        }
    };
    let product = |positive: bool| {
        terms
            .iter()
            .filter(|(_, power)| !power.is_zero() && power.is_negative() != positive)
            .map(|(name, power)| factor(name, power.abs()))
            .reduce(|acc, next| Expr::binary(ExprOp::Mul, acc, next))
    };
    match (product(true), product(false)) {
        (Some(num), None) => num,
        (Some(num), Some(den)) => Expr::binary(ExprOp::Div, num, den),
        (None, Some(den)) => Expr::binary(ExprOp::Div, Expr::Number(Value::Integer(1)), den),
        (None, None) => Expr::Number(Value::Integer(1)),
    }
}

/// Cancels repeated symbols: `km/s*s` becomes `km`, `m*m` becomes `m^2`.
///
/// Expressions that are not products of powers are returned unchanged.
pub fn simplify(unit: &Expr) -> Expr {
    let mut terms = Vec::new();
    if !flatten(unit, &one(), &mut terms) {
        return unit.clone();
    }
    product_of(&terms)
}

/// The unit expression spelling out base dimensions, e.g. `kg*m/s^2`.
pub fn base_expression(dims: &Dimensions) -> Expr {
    let terms: Vec<(String, Fraction)> = dims
        .iter()
        .map(|(name, power)| (name.clone(), power.clone()))
        .collect();
    product_of(&terms)
}
