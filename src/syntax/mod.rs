//! RPL text: command-line tokens, literals, algebraic expressions and the
//! rendering that turns values back into text.

pub mod algebraic;
pub mod lexer;
pub mod literal;
pub mod render;

pub use algebraic::{parse_expression, parse_unit_expression};
pub use lexer::{Token, tokenize};
pub use literal::{parse_exact_number, parse_literal, parse_real};
pub use render::{format_decimal, render_expr, render_unit};
