//! Infix algebraic parser for quoted expressions and unit suffixes.
//!
//! Precedence, lowest first: `+ -`, then `* / mod rem`, then unary minus,
//! then `^` (right associative). Two-argument functions use call syntax:
//! `hypot(x,y)`, `atan2(y,x)`, `min`, `max`, `%`, `%CH`, `%T`.
//!
//! Constants are folded while parsing: a minus sign applied to a number
//! yields a negative number and an integer divided by an integer yields an
//! exact fraction. This keeps rendered text stable across re-parsing.

use num_traits::Zero;

use crate::{
    runtime::{
        arithmetic::unary::negate,
        error::{Result, RuntimeError},
        expr::{Expr, ExprOp},
        tower::Value,
    },
    syntax::literal::parse_real,
};

#[derive(Debug, Clone, PartialEq)]
enum Tok {
    Number(String),
    Ident(String),
    Op(char),
    LParen,
    RParen,
    Comma,
}

fn is_ident_start(c: char) -> bool {
    c.is_alphabetic() || c == '%'
}

fn is_ident_continue(c: char) -> bool {
    c.is_alphanumeric()
}

fn scan(input: &str) -> Result<Vec<Tok>> {
    let chars: Vec<char> = input.chars().collect();
    let mut tokens = Vec::new();
    let mut i = 0;
    while i < chars.len() {
        let c = chars[i];
        if c.is_whitespace() {
            i += 1;
            continue;
        }
        if c.is_ascii_digit() || c == '.' {
            let start = i;
            while i < chars.len() && (chars[i].is_ascii_digit() || chars[i] == '.') {
                i += 1;
            }
            // Exponent only when digits follow the marker.
            if i < chars.len() && matches!(chars[i], 'E' | 'e') {
                let mut j = i + 1;
                if j < chars.len() && matches!(chars[j], '+' | '-') {
                    j += 1;
                }
                if j < chars.len() && chars[j].is_ascii_digit() {
                    i = j;
                    while i < chars.len() && chars[i].is_ascii_digit() {
                        i += 1;
                    }
                }
            }
            tokens.push(Tok::Number(chars[start..i].iter().collect()));
            continue;
        }
        if is_ident_start(c) {
            let start = i;
            i += 1;
            while i < chars.len() && is_ident_continue(chars[i]) {
                i += 1;
            }
            tokens.push(Tok::Ident(chars[start..i].iter().collect()));
            continue;
        }
        tokens.push(match c {
            '+' | '-' | '*' | '/' | '^' => Tok::Op(c),
            '(' => Tok::LParen,
            ')' => Tok::RParen,
            ',' => Tok::Comma,
            other => {
                return Err(RuntimeError::syntax(
                    format!("unexpected character `{}`", other),
                    input,
                ));
            }
        });
        i += 1;
    }
    Ok(tokens)
}

struct Parser<'a> {
    input: &'a str,
    tokens: Vec<Tok>,
    position: usize,
}

impl<'a> Parser<'a> {
    fn new(input: &'a str) -> Result<Self> {
        Ok(Self {
            input,
            tokens: scan(input)?,
            position: 0,
        })
    }

    fn peek(&self) -> Option<&Tok> {
        self.tokens.get(self.position)
    }

    fn advance(&mut self) -> Option<Tok> {
        let token = self.tokens.get(self.position).cloned();
        self.position += 1;
        token
    }

    fn error(&self, message: impl Into<String>) -> RuntimeError {
        RuntimeError::syntax(message, self.input)
    }

    fn expect(&mut self, expected: Tok, what: &str) -> Result<()> {
        match self.advance() {
            Some(token) if token == expected => Ok(()),
            _ => Err(self.error(format!("expected {}", what))),
        }
    }

    fn parse(mut self) -> Result<Expr> {
        if self.tokens.is_empty() {
            return Err(self.error("empty expression"));
        }
        let expr = self.additive()?;
        match self.peek() {
            None => Ok(expr),
            Some(_) => Err(self.error("unexpected token")),
        }
    }

    fn additive(&mut self) -> Result<Expr> {
        let mut left = self.multiplicative()?;
        loop {
            let op = match self.peek() {
                Some(Tok::Op('+')) => ExprOp::Add,
                Some(Tok::Op('-')) => ExprOp::Sub,
                _ => return Ok(left),
            };
            self.advance();
            let right = self.multiplicative()?;
            left = build(op, left, right);
        }
    }

    fn multiplicative(&mut self) -> Result<Expr> {
        let mut left = self.unary()?;
        loop {
            let op = match self.peek() {
                Some(Tok::Op('*')) => ExprOp::Mul,
                Some(Tok::Op('/')) => ExprOp::Div,
                Some(Tok::Ident(word)) if word.eq_ignore_ascii_case("mod") => ExprOp::Mod,
                Some(Tok::Ident(word)) if word.eq_ignore_ascii_case("rem") => ExprOp::Rem,
                _ => return Ok(left),
            };
            self.advance();
            let right = self.unary()?;
            left = build(op, left, right);
        }
    }

    fn unary(&mut self) -> Result<Expr> {
        match self.peek() {
            Some(Tok::Op('-')) => {
                self.advance();
                let operand = self.unary()?;
                Ok(fold_neg(operand))
            }
            Some(Tok::Op('+')) => {
                self.advance();
                self.unary()
            }
            _ => self.power(),
        }
    }

    fn power(&mut self) -> Result<Expr> {
        let base = self.primary()?;
        if self.peek() == Some(&Tok::Op('^')) {
            self.advance();
            let exponent = self.unary()?;
            return Ok(build(ExprOp::Pow, base, exponent));
        }
        Ok(base)
    }

    fn primary(&mut self) -> Result<Expr> {
        match self.advance() {
            Some(Tok::Number(text)) => match parse_real(&text)? {
                Some(value) => Ok(Expr::Number(value)),
                None => Err(self.error(format!("malformed number `{}`", text))),
            },
            Some(Tok::Ident(name)) => {
                if self.peek() != Some(&Tok::LParen) {
                    return Ok(Expr::Symbol(name));
                }
                let op = ExprOp::from_function_name(&name)
                    .ok_or_else(|| self.error(format!("unknown function `{}`", name)))?;
                self.advance();
                let first = self.additive()?;
                self.expect(Tok::Comma, "`,`")?;
                let second = self.additive()?;
                self.expect(Tok::RParen, "`)`")?;
                Ok(Expr::binary(op, first, second))
            }
            Some(Tok::LParen) => {
                let inner = self.additive()?;
                self.expect(Tok::RParen, "`)`")?;
                Ok(inner)
            }
            _ => Err(self.error("expected a value")),
        }
    }
}

fn fold_neg(operand: Expr) -> Expr {
    if let Expr::Number(value) = &operand
        && let Some(negative) = negate(value)
    {
        return Expr::Number(negative);
    }
    Expr::neg(operand)
}

fn build(op: ExprOp, left: Expr, right: Expr) -> Expr {
    if op == ExprOp::Div
        && let (Expr::Number(num), Expr::Number(den)) = (&left, &right)
        && let (Some(num), Some(den)) = (num.to_bigint(), den.to_bigint())
        && !den.is_zero()
    {
        return Expr::Number(Value::from_ratio(num, den));
    }
    Expr::binary(op, left, right)
}

/// Parses an algebraic expression.
pub fn parse_expression(input: &str) -> Result<Expr> {
    Parser::new(input)?.parse()
}

/// Parses a unit expression: symbols combined with `*`, `/` and `^` with
/// constant exponents. Symbols are not resolved here.
pub fn parse_unit_expression(input: &str) -> Result<Expr> {
    let expr = parse_expression(input)?;
    if is_unit_expression(&expr, false) {
        Ok(expr)
    } else {
        Err(RuntimeError::syntax("invalid unit expression", input))
    }
}

fn is_unit_expression(expr: &Expr, numerator: bool) -> bool {
    match expr {
        Expr::Symbol(_) => true,
        Expr::Number(Value::Integer(1)) => numerator,
        Expr::Binary(ExprOp::Mul, left, right) => {
            is_unit_expression(left, false) && is_unit_expression(right, false)
        }
        Expr::Binary(ExprOp::Div, left, right) => {
            is_unit_expression(left, true) && is_unit_expression(right, false)
        }
        Expr::Binary(ExprOp::Pow, base, exponent) => {
            is_unit_expression(base, false)
                && matches!(
                    exponent.as_ref(),
                    Expr::Number(Value::Integer(_) | Value::Fraction(_))
                )
        }
        _ => false,
    }
}
