//! Percent family, composed from the basic operators.
//!
//! Composition goes through [`evaluate`], so units and exact values behave
//! as they would for the spelled-out formula.

use crate::runtime::{
    arithmetic::{
        EvalContext, evaluate,
        operators::{DIV, MUL, SUB},
    },
    error::Result,
    tower::Value,
};

const HUNDRED: Value = Value::Integer(100);

/// `%`: `x * y / 100`.
pub fn percent(x: &Value, y: &Value, ctx: &EvalContext<'_>) -> Result<Value> {
    let product = evaluate(&MUL, x, y, ctx)?;
    evaluate(&DIV, &product, &HUNDRED, ctx)
}

/// `%CH`: `100 * (y - x) / x`.
pub fn percent_change(x: &Value, y: &Value, ctx: &EvalContext<'_>) -> Result<Value> {
    let delta = evaluate(&SUB, y, x, ctx)?;
    let scaled = evaluate(&MUL, &HUNDRED, &delta, ctx)?;
    evaluate(&DIV, &scaled, x, ctx)
}

/// `%T`: `100 * y / x`.
pub fn percent_total(x: &Value, y: &Value, ctx: &EvalContext<'_>) -> Result<Value> {
    let scaled = evaluate(&MUL, &HUNDRED, y, ctx)?;
    evaluate(&DIV, &scaled, x, ctx)
}
