use super::error_code::{ErrorCode, ErrorType};

pub const OUT_OF_MEMORY: ErrorCode = ErrorCode {
    code: "E1000",
    title: "OUT OF MEMORY",
    error_type: ErrorType::Runtime,
    message: "Needed {} bytes, only {} available after collection.",
    hint: Some("Drop unused stack levels or raise the heap size."),
};

pub const BAD_ARGUMENT_TYPE: ErrorCode = ErrorCode {
    code: "E1001",
    title: "BAD ARGUMENT TYPE",
    error_type: ErrorType::Runtime,
    message: "Cannot {} {} and {} values.", // op, type1, type2
    hint: None,
};

pub const DIVISION_BY_ZERO: ErrorCode = ErrorCode {
    code: "E1002",
    title: "DIVIDE BY ZERO",
    error_type: ErrorType::Runtime,
    message: "Cannot divide by zero.",
    hint: Some("Check divisor is non-zero before division."),
};

pub const NUMERIC_OVERFLOW: ErrorCode = ErrorCode {
    code: "E1003",
    title: "NUMERIC OVERFLOW",
    error_type: ErrorType::Runtime,
    message: "{} result exceeds the representable range.",
    hint: Some("Big integers are bounded by max_bignum_bits, decimals by max_exponent."),
};

pub const NUMERIC_UNDERFLOW: ErrorCode = ErrorCode {
    code: "E1004",
    title: "NUMERIC UNDERFLOW",
    error_type: ErrorType::Runtime,
    message: "Decimal result is too small to represent.",
    hint: None,
};

pub const INCONSISTENT_UNITS: ErrorCode = ErrorCode {
    code: "E1005",
    title: "INCONSISTENT UNITS",
    error_type: ErrorType::Runtime,
    message: "Cannot convert {} to {}.",
    hint: Some("Both units must reduce to the same base dimensions."),
};

pub const OBJECT_TOO_LARGE: ErrorCode = ErrorCode {
    code: "E1006",
    title: "OBJECT TOO LARGE",
    error_type: ErrorType::Runtime,
    message: "{} payload of {} bytes exceeds the {} byte limit.",
    hint: None,
};

pub const TOO_FEW_ARGUMENTS: ErrorCode = ErrorCode {
    code: "E1007",
    title: "TOO FEW ARGUMENTS",
    error_type: ErrorType::Runtime,
    message: "Command needs {} stack levels, stack has {}.",
    hint: None,
};

pub const INTERRUPTED: ErrorCode = ErrorCode {
    code: "E1008",
    title: "INTERRUPTED",
    error_type: ErrorType::Runtime,
    message: "Evaluation was halted.",
    hint: None,
};

pub const INVALID_UNIT_DEFINITION: ErrorCode = ErrorCode {
    code: "E1009",
    title: "INVALID UNIT DEFINITION",
    error_type: ErrorType::Runtime,
    message: "Unit `{}` cannot be reduced to base units.",
    hint: Some("Check the unit file for cyclic or malformed definitions."),
};

pub const BAD_ARGUMENT_VALUE: ErrorCode = ErrorCode {
    code: "E1010",
    title: "BAD ARGUMENT VALUE",
    error_type: ErrorType::Runtime,
    message: "{}",
    hint: None,
};

pub const CONFIGURATION_ERROR: ErrorCode = ErrorCode {
    code: "E1011",
    title: "CONFIGURATION ERROR",
    error_type: ErrorType::Runtime,
    message: "{}",
    hint: None,
};

pub const IO_ERROR: ErrorCode = ErrorCode {
    code: "E1012",
    title: "I/O ERROR",
    error_type: ErrorType::Runtime,
    message: "{}",
    hint: None,
};

pub const BAD_OPERAND_TYPE: ErrorCode = ErrorCode {
    code: "E1013",
    title: "BAD ARGUMENT TYPE",
    error_type: ErrorType::Runtime,
    message: "Cannot {} {} values.", // op, type
    hint: None,
};

pub const SYNTAX_ERROR: ErrorCode = ErrorCode {
    code: "E2000",
    title: "SYNTAX ERROR",
    error_type: ErrorType::Syntax,
    message: "{} in `{}`.",
    hint: None,
};

pub const UNDEFINED_UNIT: ErrorCode = ErrorCode {
    code: "E2001",
    title: "INVALID UNIT",
    error_type: ErrorType::Syntax,
    message: "Unit `{}` is not defined.",
    hint: Some("Units resolve by exact name, then by metric prefix."),
};

/// All registered codes, in code order.
pub static ERROR_CODES: &[&ErrorCode] = &[
    &OUT_OF_MEMORY,
    &BAD_ARGUMENT_TYPE,
    &DIVISION_BY_ZERO,
    &NUMERIC_OVERFLOW,
    &NUMERIC_UNDERFLOW,
    &INCONSISTENT_UNITS,
    &OBJECT_TOO_LARGE,
    &TOO_FEW_ARGUMENTS,
    &INTERRUPTED,
    &INVALID_UNIT_DEFINITION,
    &BAD_ARGUMENT_VALUE,
    &CONFIGURATION_ERROR,
    &IO_ERROR,
    &BAD_OPERAND_TYPE,
    &SYNTAX_ERROR,
    &UNDEFINED_UNIT,
];

pub fn lookup_error_code(code: &str) -> Option<&'static ErrorCode> {
    ERROR_CODES.iter().copied().find(|ec| ec.code == code)
}
