//! Diagnostics module.
//!
//! Stable error codes with message templates and hints, shared by the
//! command loop, the CLI and the on-screen error line.

pub mod error_code;
pub mod format;
pub mod runtime_errors;

pub use error_code::{ErrorCode, ErrorType};
pub use format::format_message;
pub use runtime_errors::*;

/// Renders a diagnostic as a plain-text block:
///
/// ```text
/// error[E1002]: DIVIDE BY ZERO
///
/// Cannot divide by zero.
///
/// Hint:
///   Check divisor is non-zero before division.
/// ```
pub fn render_diagnostic(code: &ErrorCode, message: &str) -> String {
    let mut out = format!("error[{}]: {}\n\n{}", code.code, code.title, message);
    if let Some(hint) = code.hint {
        out.push_str("\n\nHint:\n  ");
        out.push_str(hint);
    }
    out
}
