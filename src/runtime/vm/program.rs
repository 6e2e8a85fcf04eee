//! Command-line parsing, command dispatch and program evaluation.

use log::trace;

use crate::{
    runtime::{
        arithmetic::{EvalContext, UnaryOp, evaluate, evaluate_handles, operator_for},
        error::{Result, RuntimeError},
        expr::Expr,
        tower::Value,
        vm::{
            Runtime,
            commands::{CommandKind, command, lookup},
        },
    },
    syntax::{Token, parse_expression, parse_literal, tokenize},
};

fn is_name(word: &str) -> bool {
    let mut chars = word.chars();
    chars.next().is_some_and(char::is_alphabetic) && chars.all(|c| c.is_alphanumeric())
}

/// Numerically evaluates an algebraic. Symbols stay symbolic, so the result
/// may itself be an expression. In unit mode, symbols naming units become
/// `1_unit` objects.
pub(crate) fn evaluate_expr(expr: &Expr, ctx: &EvalContext<'_>) -> Result<Value> {
    match expr {
        Expr::Number(value) => Ok(value.clone()),
        Expr::Symbol(name) if ctx.unit_mode && ctx.units.lookup(name).is_some() => {
            Ok(Value::unit(Value::Integer(1), expr.clone()))
        }
        Expr::Symbol(name) => Ok(Value::Symbol(name.clone())),
        Expr::Neg(inner) => UnaryOp::Neg.apply(&evaluate_expr(inner, ctx)?, ctx),
        Expr::Binary(op, left, right) => {
            let left = evaluate_expr(left, ctx)?;
            let right = evaluate_expr(right, ctx)?;
            evaluate(operator_for(*op), &left, &right, ctx)
        }
    }
}

impl Runtime {
    /// Turns a command line into objects: literals, symbols, algebraics,
    /// programs and command references.
    pub(super) fn parse_line(&self, text: &str) -> Result<Vec<Value>> {
        let tokens = tokenize(text)?;
        let mut tokens = tokens.into_iter();
        let mut objects = Vec::new();
        while let Some(token) = tokens.next() {
            objects.push(self.parse_object(token, &mut tokens, text)?);
        }
        Ok(objects)
    }

    fn parse_object(
        &self,
        token: Token,
        rest: &mut impl Iterator<Item = Token>,
        text: &str,
    ) -> Result<Value> {
        match token {
            Token::Quoted(body) => Ok(parse_expression(&body)?.into_value()),
            Token::ProgramStart => {
                let mut items = Vec::new();
                loop {
                    match rest.next() {
                        Some(Token::ProgramEnd) => return Ok(Value::Program(items)),
                        Some(inner) => items.push(self.parse_object(inner, rest, text)?),
                        None => return Err(RuntimeError::syntax("unterminated program", text)),
                    }
                }
            }
            Token::ProgramEnd => Err(RuntimeError::syntax("unexpected `»`", text)),
            Token::Word(word) => {
                if let Some(index) = lookup(&word) {
                    return Ok(Value::Command(index));
                }
                if let Some(value) = parse_literal(&word, &self.units)? {
                    return Ok(value);
                }
                if is_name(&word) {
                    return Ok(Value::Symbol(word));
                }
                Err(RuntimeError::syntax(format!("unknown word `{}`", word), text))
            }
        }
    }

    /// Runs a command without the atomicity wrapper; callers restore the
    /// stack on failure.
    pub(super) fn dispatch(&mut self, index: u16) -> Result<()> {
        let Some(cmd) = command(index) else {
            return Err(RuntimeError::BadArgumentValue(format!(
                "unknown command #{}",
                index
            )));
        };
        trace!("command: {}", cmd.name);
        match &cmd.kind {
            CommandKind::Binary(op) => {
                self.require(2)?;
                let n = self.stack.len();
                let ctx = EvalContext::new(&self.config, &self.units);
                let result =
                    evaluate_handles(&mut self.heap, op, &self.stack[n - 2], &self.stack[n - 1], &ctx)?;
                self.stack.truncate(n - 2);
                self.stack.push(result);
                Ok(())
            }
            CommandKind::Unary(op) => self.apply_values(1, |args, ctx| op.apply(&args[0], ctx)),
            CommandKind::Native(f) => f(self),
        }
    }

    /// Evaluates one object inside a program: commands run, everything else
    /// is pushed.
    fn eval_object(&mut self, object: &Value) -> Result<()> {
        match object {
            Value::Command(index) => self.dispatch(*index),
            other => self.push(other),
        }
    }

    /// `EVAL`: runs a program, computes an algebraic or executes a command.
    pub(crate) fn op_eval(&mut self) -> Result<()> {
        let value = self.pop()?;
        match value {
            Value::Program(items) => {
                self.enter_eval()?;
                let result = self.run_program(&items);
                self.leave_eval();
                result
            }
            Value::Command(index) => self.dispatch(index),
            Value::Expression(expr) => {
                let ctx = EvalContext::new(&self.config, &self.units);
                let result = evaluate_expr(&expr, &ctx)?;
                self.push(&result)
            }
            other => self.push(&other),
        }
    }

    fn run_program(&mut self, items: &[Value]) -> Result<()> {
        for item in items {
            if self.take_interrupt() {
                return Err(RuntimeError::Interrupted);
            }
            self.eval_object(item)?;
        }
        Ok(())
    }
}
