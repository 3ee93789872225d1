//! Process exit codes
//!
//! These values are a stable contract with calling shells and automation.

/// Successful termination
pub const OK: i32 = 0;

/// Generic suite-level error
pub const GENERIC: i32 = 1;

/// Higher-level input failed to parse
pub const PARSER: i32 = 4;

/// Options or configuration error
pub const OPTIONS: i32 = 5;

/// Command line arguments are not valid UTF-8
pub const ENCODING: i32 = 6;

/// Operator interrupted execution (Ctrl-C)
pub const INTERRUPTED: i32 = 99;

/// Unexpected failure, most likely a bug
pub const UNEXPECTED: i32 = 250;
