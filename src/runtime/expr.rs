use std::collections::BTreeSet;

use crate::runtime::tower::Value;

/// Operator node of a symbolic expression.
///
/// The discriminant is the operator token stored inline in encoded
/// expressions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum ExprOp {
    Add = 1,
    Sub = 2,
    Mul = 3,
    Div = 4,
    Pow = 5,
    Mod = 6,
    Rem = 7,
    Hypot = 8,
    Atan2 = 9,
    Min = 10,
    Max = 11,
    Percent = 12,
    PercentChange = 13,
    PercentTotal = 14,
}

/// Token code of unary negation in encoded expressions.
pub const NEG_CODE: u8 = 32;

impl ExprOp {
    pub const ALL: [ExprOp; 14] = [
        ExprOp::Add,
        ExprOp::Sub,
        ExprOp::Mul,
        ExprOp::Div,
        ExprOp::Pow,
        ExprOp::Mod,
        ExprOp::Rem,
        ExprOp::Hypot,
        ExprOp::Atan2,
        ExprOp::Min,
        ExprOp::Max,
        ExprOp::Percent,
        ExprOp::PercentChange,
        ExprOp::PercentTotal,
    ];

    pub fn code(self) -> u8 {
        self as u8
    }

    pub fn from_code(code: u8) -> Option<Self> {
        Self::ALL.into_iter().find(|op| op.code() == code)
    }

    /// Spelling in algebraic text: the infix symbol or the function name.
    pub fn spelling(self) -> &'static str {
        match self {
            ExprOp::Add => "+",
            ExprOp::Sub => "-",
            ExprOp::Mul => "*",
            ExprOp::Div => "/",
            ExprOp::Pow => "^",
            ExprOp::Mod => "mod",
            ExprOp::Rem => "rem",
            ExprOp::Hypot => "hypot",
            ExprOp::Atan2 => "atan2",
            ExprOp::Min => "min",
            ExprOp::Max => "max",
            ExprOp::Percent => "%",
            ExprOp::PercentChange => "%CH",
            ExprOp::PercentTotal => "%T",
        }
    }

    /// Binding strength of infix operators; `None` for function-call forms.
    pub fn precedence(self) -> Option<u8> {
        match self {
            ExprOp::Add | ExprOp::Sub => Some(1),
            ExprOp::Mul | ExprOp::Div | ExprOp::Mod | ExprOp::Rem => Some(2),
            ExprOp::Pow => Some(4),
            _ => None,
        }
    }

    pub fn from_function_name(name: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .filter(|op| op.precedence().is_none())
            .find(|op| op.spelling().eq_ignore_ascii_case(name))
    }
}

/// Symbolic expression tree.
///
/// Leaves are symbols and real numbers.
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    Number(Value),
    Symbol(String),
    Neg(Box<Expr>),
    Binary(ExprOp, Box<Expr>, Box<Expr>),
}

impl Expr {
    pub fn symbol(name: impl Into<String>) -> Self {
        Expr::Symbol(name.into())
    }

    pub fn binary(op: ExprOp, left: Expr, right: Expr) -> Self {
        Expr::Binary(op, Box::new(left), Box::new(right))
    }

    pub fn neg(inner: Expr) -> Self {
        Expr::Neg(Box::new(inner))
    }

    /// Lifts a value into an expression operand. Only symbols, expressions
    /// and real numbers qualify.
    pub fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::Symbol(name) => Some(Expr::Symbol(name.clone())),
            Value::Expression(expr) => Some((**expr).clone()),
            real if real.is_real() => Some(Expr::Number(real.clone())),
            _ => None,
        }
    }

    /// Collapses single-leaf expressions back into plain values.
    pub fn into_value(self) -> Value {
        match self {
            Expr::Number(value) => value,
            Expr::Symbol(name) => Value::Symbol(name),
            other => Value::Expression(Box::new(other)),
        }
    }

    pub fn symbols(&self) -> BTreeSet<&str> {
        let mut out = BTreeSet::new();
        self.collect_symbols(&mut out);
        out
    }

    fn collect_symbols<'a>(&'a self, out: &mut BTreeSet<&'a str>) {
        match self {
            Expr::Number(_) => {}
            Expr::Symbol(name) => {
                out.insert(name.as_str());
            }
            Expr::Neg(inner) => inner.collect_symbols(out),
            Expr::Binary(_, left, right) => {
                left.collect_symbols(out);
                right.collect_symbols(out);
            }
        }
    }

    pub fn is_symbol(&self) -> bool {
        matches!(self, Expr::Symbol(_))
    }
}
