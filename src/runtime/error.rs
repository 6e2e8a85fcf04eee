use thiserror::Error;

use crate::diagnostics::{self, ErrorCode, format_message, render_diagnostic};

pub type Result<T> = std::result::Result<T, RuntimeError>;

/// Every failure a command can report.
///
/// All variants are local to the command that raised them: the command loop
/// restores the stack it had on entry and keeps running. Engine contract
/// violations (a handle dereferenced with the wrong tag, a dangling slot) are
/// not represented here; they panic.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RuntimeError {
    #[error("out of memory: {requested} bytes requested, {available} available")]
    OutOfMemory { requested: usize, available: usize },

    /// No implementation or promotion path for this operand combination.
    #[error("bad argument type: cannot {op} {left} and {right}")]
    BadArgumentType {
        op: &'static str,
        left: &'static str,
        right: &'static str,
    },

    /// A unary command applied to a value it has no meaning for.
    #[error("bad argument type: cannot {op} {operand}")]
    BadOperandType {
        op: &'static str,
        operand: &'static str,
    },

    #[error("bad argument value: {0}")]
    BadArgumentValue(String),

    #[error("division by zero")]
    DivisionByZero,

    #[error("{representation} overflow")]
    Overflow { representation: &'static str },

    #[error("decimal underflow")]
    Underflow,

    #[error("inconsistent units: cannot convert {from} to {to}")]
    IncompatibleUnits { from: String, to: String },

    #[error("{type_name} payload of {len} bytes exceeds {max}")]
    ObjectTooLarge {
        type_name: &'static str,
        len: usize,
        max: usize,
    },

    #[error("syntax error: {message} in `{input}`")]
    Syntax { message: String, input: String },

    #[error("undefined unit `{0}`")]
    UndefinedUnit(String),

    #[error("unit `{0}` cannot be reduced to base units")]
    InvalidUnitDefinition(String),

    #[error("too few arguments: need {needed}, have {depth}")]
    StackUnderflow { needed: usize, depth: usize },

    #[error("interrupted")]
    Interrupted,

    #[error("configuration error: {0}")]
    Config(String),

    #[error("i/o error: {0}")]
    Io(String),
}

impl RuntimeError {
    pub fn syntax(message: impl Into<String>, input: impl Into<String>) -> Self {
        RuntimeError::Syntax {
            message: message.into(),
            input: input.into(),
        }
    }

    /// The registered diagnostic code for this error.
    pub fn code(&self) -> &'static ErrorCode {
        match self {
            RuntimeError::OutOfMemory { .. } => &diagnostics::OUT_OF_MEMORY,
            RuntimeError::BadArgumentType { .. } => &diagnostics::BAD_ARGUMENT_TYPE,
            RuntimeError::BadOperandType { .. } => &diagnostics::BAD_OPERAND_TYPE,
            RuntimeError::BadArgumentValue(_) => &diagnostics::BAD_ARGUMENT_VALUE,
            RuntimeError::DivisionByZero => &diagnostics::DIVISION_BY_ZERO,
            RuntimeError::Overflow { .. } => &diagnostics::NUMERIC_OVERFLOW,
            RuntimeError::Underflow => &diagnostics::NUMERIC_UNDERFLOW,
            RuntimeError::IncompatibleUnits { .. } => &diagnostics::INCONSISTENT_UNITS,
            RuntimeError::ObjectTooLarge { .. } => &diagnostics::OBJECT_TOO_LARGE,
            RuntimeError::Syntax { .. } => &diagnostics::SYNTAX_ERROR,
            RuntimeError::UndefinedUnit(_) => &diagnostics::UNDEFINED_UNIT,
            RuntimeError::InvalidUnitDefinition(_) => &diagnostics::INVALID_UNIT_DEFINITION,
            RuntimeError::StackUnderflow { .. } => &diagnostics::TOO_FEW_ARGUMENTS,
            RuntimeError::Interrupted => &diagnostics::INTERRUPTED,
            RuntimeError::Config(_) => &diagnostics::CONFIGURATION_ERROR,
            RuntimeError::Io(_) => &diagnostics::IO_ERROR,
        }
    }

    /// User-facing message built from the code's template.
    pub fn message(&self) -> String {
        let template = self.code().message;
        match self {
            RuntimeError::OutOfMemory {
                requested,
                available,
            } => format_message(
                template,
                &[requested.to_string().as_str(), available.to_string().as_str()],
            ),
            RuntimeError::BadArgumentType { op, left, right } => {
                format_message(template, &[*op, *left, *right])
            }
            RuntimeError::BadOperandType { op, operand } => format_message(template, &[*op, *operand]),
            RuntimeError::Overflow { representation } => {
                format_message(template, &[*representation])
            }
            RuntimeError::IncompatibleUnits { from, to } => format_message(template, &[from.as_str(), to.as_str()]),
            RuntimeError::ObjectTooLarge {
                type_name,
                len,
                max,
            } => format_message(
                template,
                &[*type_name, len.to_string().as_str(), max.to_string().as_str()],
            ),
            RuntimeError::Syntax { message, input } => format_message(template, &[message.as_str(), input.as_str()]),
            RuntimeError::StackUnderflow { needed, depth } => {
                format_message(
                    template,
                    &[needed.to_string().as_str(), depth.to_string().as_str()],
                )
            }
            RuntimeError::UndefinedUnit(name) | RuntimeError::InvalidUnitDefinition(name) => {
                format_message(template, &[name.as_str()])
            }
            RuntimeError::BadArgumentValue(detail)
            | RuntimeError::Config(detail)
            | RuntimeError::Io(detail) => format_message(template, &[detail.as_str()]),
            RuntimeError::DivisionByZero | RuntimeError::Underflow | RuntimeError::Interrupted => {
                template.to_string()
            }
        }
    }

    /// Full diagnostic block: code, title, message and hint.
    pub fn render(&self) -> String {
        render_diagnostic(self.code(), &self.message())
    }
}

impl From<std::io::Error> for RuntimeError {
    fn from(err: std::io::Error) -> Self {
        RuntimeError::Io(err.to_string())
    }
}

impl From<serde_json::Error> for RuntimeError {
    fn from(err: serde_json::Error) -> Self {
        RuntimeError::Config(err.to_string())
    }
}
