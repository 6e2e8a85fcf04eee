//! Unit commands: CONVERT, UBASE, UFACT, UVAL, →UNIT, CYCLE and →PREFIX.

use crate::{
    runtime::{
        arithmetic::{EvalContext, evaluate, operators::MUL},
        error::{Result, RuntimeError},
        expr::{Expr, ExprOp},
        tower::Value,
        units::{
            UnitValue, prefixes,
            reduce::{base_expression, convert, reduce, simplify},
        },
    },
    syntax::render_unit,
};

fn not_a_unit(op: &'static str, x: &Value) -> RuntimeError {
    RuntimeError::BadOperandType {
        op,
        operand: x.type_name(),
    }
}

fn bad_pair(op: &'static str, x: &Value, y: &Value) -> RuntimeError {
    RuntimeError::BadArgumentType {
        op,
        left: x.type_name(),
        right: y.type_name(),
    }
}

/// `CONVERT`: `x` expressed in the unit of `y`. The value of `y` is ignored.
pub fn convert_to(x: &Value, y: &Value, ctx: &EvalContext<'_>) -> Result<Value> {
    let (Value::Unit(from), Value::Unit(to)) = (x, y) else {
        return Err(bad_pair("convert", x, y));
    };
    Ok(convert_value(from, &to.unit, ctx)?.into_value())
}

/// `UBASE`: `x` in base units; dimensionless results become plain numbers.
pub fn to_base(x: &Value, ctx: &EvalContext<'_>) -> Result<Value> {
    let Value::Unit(u) = x else {
        return Err(not_a_unit("convert to base units", x));
    };
    let reduced = reduce(&u.unit, ctx)?;
    let value = evaluate(&MUL, &u.value, &reduced.factor, ctx)?;
    if reduced.dims.is_empty() {
        return Ok(value);
    }
    Ok(Value::unit(value, base_expression(&reduced.dims)))
}

/// `UFACT`: rewrites `x` with the unit of `y` as a leading factor and the
/// remainder in base units, e.g. `1_W` factored by `1_J` gives `1_J/s`.
pub fn factor(x: &Value, y: &Value, ctx: &EvalContext<'_>) -> Result<Value> {
    let (Value::Unit(u), Value::Unit(by)) = (x, y) else {
        return Err(bad_pair("factor", x, y));
    };
    let rest = reduce(
        &Expr::binary(ExprOp::Div, u.unit.clone(), by.unit.clone()),
        ctx,
    )?;
    let value = evaluate(&MUL, &u.value, &rest.factor, ctx)?;
    let unit = if rest.dims.is_empty() {
        by.unit.clone()
    } else {
        simplify(&Expr::binary(
            ExprOp::Mul,
            by.unit.clone(),
            base_expression(&rest.dims),
        ))
    };
    Ok(Value::unit(value, unit))
}

/// `UVAL`: the numeric part.
pub fn value_of(x: &Value) -> Result<Value> {
    match x {
        Value::Unit(u) => Ok(u.value.clone()),
        _ => Err(not_a_unit("take the value of", x)),
    }
}

/// `→UNIT`: attaches the unit of `y` to the number `x`.
pub fn attach(x: &Value, y: &Value) -> Result<Value> {
    match (x, y) {
        (number, Value::Unit(u)) if number.level().is_some() => {
            Ok(Value::unit(number.clone(), u.unit.clone()))
        }
        (Value::Unit(inner), Value::Unit(u)) => Ok(Value::unit(inner.value.clone(), u.unit.clone())),
        _ => Err(bad_pair("attach a unit to", x, y)),
    }
}

/// `CYCLE`: converts a single-symbol unit to the next unit of its category
/// in table order. A prefixed unit first goes to its unprefixed form.
/// Compound units are returned unchanged.
pub fn cycle(x: &Value, ctx: &EvalContext<'_>) -> Result<Value> {
    let Value::Unit(u) = x else {
        return Err(not_a_unit("cycle", x));
    };
    let Expr::Symbol(name) = &u.unit else {
        return Ok(x.clone());
    };
    let resolved = ctx
        .units
        .lookup(name)
        .ok_or_else(|| RuntimeError::UndefinedUnit(name.clone()))?;
    let candidates: Vec<String> = if resolved.prefix.is_some() {
        vec![resolved.def.name.clone()]
    } else {
        let members = ctx.units.category(&resolved.def.category);
        let start = members
            .iter()
            .position(|def| def.name == resolved.def.name)
            .unwrap_or(0);
        (1..members.len())
            .map(|step| members[(start + step) % members.len()].name.clone())
            .collect()
    };
    for candidate in candidates {
        if let Some(converted) = convert(u, &Expr::Symbol(candidate), ctx)? {
            return Ok(converted.into_value());
        }
    }
    Ok(x.clone())
}

/// `→PREFIX`: re-expresses a single-symbol unit under the prefix named by
/// `y`, e.g. `1500_m` with `k` gives `3/2_km`. The prefixed name has to
/// resolve back to the same unit, so `m` cannot take the prefix `m`
/// (`min` is minutes).
pub fn to_prefix(x: &Value, y: &Value, ctx: &EvalContext<'_>) -> Result<Value> {
    let (Value::Unit(u), Value::Symbol(symbol)) = (x, y) else {
        return Err(bad_pair("change the prefix of", x, y));
    };
    let Expr::Symbol(name) = &u.unit else {
        return Err(RuntimeError::BadArgumentValue(format!(
            "cannot prefix compound unit {}",
            render_unit(&u.unit)
        )));
    };
    let prefix = prefixes::find(symbol)
        .ok_or_else(|| RuntimeError::BadArgumentValue(format!("unknown prefix {}", symbol)))?;
    let unit = ctx
        .units
        .lookup(name)
        .ok_or_else(|| RuntimeError::UndefinedUnit(name.clone()))?
        .def;
    let target = format!("{}{}", prefix.symbol, unit.name);
    let same_unit = ctx.units.lookup(&target).is_some_and(|resolved| {
        resolved.def.name == unit.name
            && resolved.prefix.is_some_and(|p| p.symbol == prefix.symbol)
    });
    if !same_unit {
        return Err(RuntimeError::BadArgumentValue(format!(
            "{} cannot take the prefix {}",
            unit.name, prefix.symbol
        )));
    }
    Ok(convert_value(u, &Expr::Symbol(target), ctx)?.into_value())
}

/// Like [`convert`], failing with `IncompatibleUnits` on a dimension
/// mismatch.
pub fn convert_value(value: &UnitValue, target: &Expr, ctx: &EvalContext<'_>) -> Result<UnitValue> {
    convert(value, target, ctx)?.ok_or_else(|| RuntimeError::IncompatibleUnits {
        from: render_unit(&value.unit),
        to: render_unit(target),
    })
}
