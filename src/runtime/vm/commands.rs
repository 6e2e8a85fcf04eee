use crate::runtime::{
    arithmetic::{Operator, UnaryOp, operators::*},
    error::Result,
    vm::Runtime,
};

pub type NativeFn = fn(&mut Runtime) -> Result<()>;

/// How a command consumes the stack.
pub enum CommandKind {
    /// Two arguments through the generic evaluator.
    Binary(&'static Operator),
    Unary(UnaryOp),
    Native(NativeFn),
}

pub struct Command {
    pub name: &'static str,
    /// Alternate spellings accepted on the command line.
    pub aliases: &'static [&'static str],
    pub kind: CommandKind,
}

const fn binary(op: &'static Operator) -> Command {
    Command {
        name: op.name,
        aliases: &[],
        kind: CommandKind::Binary(op),
    }
}

const fn native(name: &'static str, aliases: &'static [&'static str], f: NativeFn) -> Command {
    Command {
        name,
        aliases,
        kind: CommandKind::Native(f),
    }
}

const fn unary(op: UnaryOp, aliases: &'static [&'static str]) -> Command {
    Command {
        name: op.name(),
        aliases,
        kind: CommandKind::Unary(op),
    }
}

/// The command table. Programs store commands by their index here, so new
/// commands are appended.
pub static COMMANDS: &[Command] = &[
    binary(&ADD),
    binary(&SUB),
    binary(&MUL),
    binary(&DIV),
    binary(&POW),
    binary(&MOD),
    binary(&REM),
    binary(&HYPOT),
    binary(&ATAN2),
    binary(&MIN),
    binary(&MAX),
    binary(&PERCENT),
    binary(&PERCENT_CHANGE),
    binary(&PERCENT_TOTAL),
    unary(UnaryOp::Neg, &["CHS"]),
    unary(UnaryOp::Inv, &[]),
    unary(UnaryOp::Abs, &[]),
    unary(UnaryOp::Sqrt, &["√"]),
    native("DUP", &[], Runtime::op_dup),
    native("DROP", &[], Runtime::op_drop),
    native("SWAP", &[], Runtime::op_swap),
    native("OVER", &[], Runtime::op_over),
    native("ROT", &[], Runtime::op_rot),
    native("CLEAR", &[], Runtime::op_clear),
    native("DEPTH", &[], Runtime::op_depth),
    native("EVAL", &[], Runtime::op_eval),
    native("PREC", &[], Runtime::op_prec),
    native("CONVERT", &[], Runtime::op_convert),
    native("UBASE", &[], Runtime::op_ubase),
    native("UFACT", &[], Runtime::op_ufact),
    native("UVAL", &[], Runtime::op_uval),
    native("→UNIT", &["TOUNIT", "->UNIT"], Runtime::op_to_unit),
    native("CYCLE", &[], Runtime::op_cycle),
    native("→PREFIX", &["TOPREFIX", "->PREFIX"], Runtime::op_to_prefix),
];

pub fn command(index: u16) -> Option<&'static Command> {
    COMMANDS.get(usize::from(index))
}

pub fn command_name(index: u16) -> Option<&'static str> {
    command(index).map(|c| c.name)
}

/// Finds a command by name or alias, ignoring ASCII case.
pub fn lookup(word: &str) -> Option<u16> {
    COMMANDS
        .iter()
        .position(|c| {
            c.name.eq_ignore_ascii_case(word) || c.aliases.iter().any(|a| a.eq_ignore_ascii_case(word))
        })
        .and_then(|index| u16::try_from(index).ok())
}
