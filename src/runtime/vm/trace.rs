use crate::runtime::{
    error::Result,
    tower::Value,
    vm::{Runtime, commands::command_name},
};

impl Runtime {
    /// Prints the command and the resulting stack, one line per level.
    pub(super) fn trace_command(&self, index: u16, result: &Result<()>) {
        let name = command_name(index).unwrap_or("?");
        match result {
            Ok(()) => println!("{:<8} ok", name),
            Err(err) => println!("{:<8} error[{}]: {}", name, err.code().code, err.message()),
        }
        for line in stack_lines(&self.stack_values()) {
            println!("  {}", line);
        }
    }
}

/// `n: value` lines, highest level first.
pub(crate) fn stack_lines(values: &[Value]) -> Vec<String> {
    let depth = values.len();
    values
        .iter()
        .enumerate()
        .map(|(i, value)| format!("{}: {}", depth - i, value))
        .collect()
}
