//! Text rendering of values and expressions.
//!
//! Rendered text parses back to the same value: `1.5`, `3/2`, `(1,2)`,
//! `1_km/s`, `'x^2+1'`.

use std::fmt;

use crate::runtime::{
    expr::{Expr, ExprOp},
    tower::{Decimal, Value},
    vm::commands::command_name,
};

/// Adjusted exponents in this range render without an exponent.
const PLAIN_EXPONENTS: std::ops::RangeInclusive<i64> = -5..=14;

/// Standard decimal text: always contains a `.`; scientific form
/// `d.ddE±x` outside the plain exponent range.
pub fn format_decimal(value: &Decimal) -> String {
    if value.is_zero() {
        return "0.".to_string();
    }
    let sign = if value.is_negative() { "-" } else { "" };
    let digits = value.digit_string();
    let adjusted = value.adjusted_exponent();

    if !PLAIN_EXPONENTS.contains(&adjusted) {
        let (lead, rest) = digits.split_at(1);
        return format!("{}{}.{}E{}", sign, lead, rest, adjusted);
    }

    let exponent = value.exponent();
    if exponent >= 0 {
        return format!("{}{}{}.", sign, digits, "0".repeat(exponent as usize));
    }
    let point = digits.len() as i64 + exponent;
    if point > 0 {
        let (whole, fraction) = digits.split_at(point as usize);
        format!("{}{}.{}", sign, whole, fraction)
    } else {
        format!("{}0.{}{}", sign, "0".repeat((-point) as usize), digits)
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Integer(v) => write!(f, "{}", v),
            Value::Bignum(v) => write!(f, "{}", v),
            Value::Fraction(v) => write!(f, "{}/{}", v.numer(), v.denom()),
            Value::Decimal(v) => f.write_str(&format_decimal(v)),
            Value::Complex(z) => write!(f, "({},{})", z.re, z.im),
            Value::Unit(u) => write!(f, "{}_{}", u.value, render_unit(&u.unit)),
            Value::Symbol(name) => write!(f, "'{}'", name),
            Value::Expression(expr) => write!(f, "'{}'", render_expr(expr)),
            Value::Program(items) => {
                f.write_str("«")?;
                for item in items {
                    write!(f, " {}", item)?;
                }
                f.write_str(" »")
            }
            Value::Command(index) => match command_name(*index) {
                Some(name) => f.write_str(name),
                None => write!(f, "#{}", index),
            },
        }
    }
}

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&render_expr(self))
    }
}

/// Binding strength of a rendered node.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Shape {
    /// Symbols, calls and non-negative integers or decimals.
    Atom,
    /// Unary minus and negative numbers.
    Negative,
    Infix(u8),
}

fn shape(expr: &Expr) -> Shape {
    match expr {
        Expr::Symbol(_) => Shape::Atom,
        Expr::Neg(_) => Shape::Negative,
        Expr::Number(value) if value.is_negative() => Shape::Negative,
        Expr::Number(Value::Fraction(_)) => Shape::Infix(2),
        Expr::Number(_) => Shape::Atom,
        Expr::Binary(op, _, _) => match op.precedence() {
            Some(p) => Shape::Infix(p),
            None => Shape::Atom,
        },
    }
}

fn is_negative_fraction(expr: &Expr) -> bool {
    matches!(expr, Expr::Number(Value::Fraction(f)) if f.is_negative())
}

fn needs_parens(child: &Expr, parent: ExprOp, right: bool) -> bool {
    let Some(parent_prec) = parent.precedence() else {
        return false;
    };
    let child_is_pow = matches!(child, Expr::Binary(ExprOp::Pow, _, _));
    match shape(child) {
        Shape::Atom => false,
        Shape::Negative if !right => parent == ExprOp::Pow,
        Shape::Negative => !(parent == ExprOp::Pow && !is_negative_fraction(child)),
        Shape::Infix(p) if !right => p < parent_prec || (child_is_pow && parent == ExprOp::Pow),
        Shape::Infix(p) => p <= parent_prec && !(child_is_pow && parent == ExprOp::Pow),
    }
}

fn operand(out: &mut String, child: &Expr, parent: ExprOp, right: bool) {
    if needs_parens(child, parent, right) {
        out.push('(');
        write_expr(out, child);
        out.push(')');
    } else {
        write_expr(out, child);
    }
}

fn write_expr(out: &mut String, expr: &Expr) {
    match expr {
        Expr::Number(value) => out.push_str(&value.to_string()),
        Expr::Symbol(name) => out.push_str(name),
        Expr::Neg(inner) => {
            out.push('-');
            let bare = matches!(inner.as_ref(), Expr::Binary(ExprOp::Pow, _, _))
                || shape(inner) == Shape::Atom;
            if bare {
                write_expr(out, inner);
            } else {
                out.push('(');
                write_expr(out, inner);
                out.push(')');
            }
        }
        Expr::Binary(op, left, right) if op.precedence().is_none() => {
            out.push_str(op.spelling());
            out.push('(');
            write_expr(out, left);
            out.push(',');
            write_expr(out, right);
            out.push(')');
        }
        Expr::Binary(op, left, right) => {
            operand(out, left, *op, false);
            match op {
                ExprOp::Mod | ExprOp::Rem => {
                    out.push(' ');
                    out.push_str(op.spelling());
                    out.push(' ');
                }
                _ => out.push_str(op.spelling()),
            }
            operand(out, right, *op, true);
        }
    }
}

/// Algebraic text of an expression, with the minimal parentheses needed to
/// parse back to the same tree.
pub fn render_expr(expr: &Expr) -> String {
    let mut out = String::new();
    write_expr(&mut out, expr);
    out
}

/// Unit expressions use the algebraic syntax: `kg*m/s^2`, `1/s`.
pub fn render_unit(unit: &Expr) -> String {
    render_expr(unit)
}
