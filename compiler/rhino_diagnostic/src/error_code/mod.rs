//! Error codes for all compiler diagnostics.
//!
//! The first digit names the phase that reports the code.

#[cfg(test)]
mod tests;

use std::fmt;

/// Error codes for all compiler diagnostics.
///
/// Format: E#### where first digit indicates phase:
/// - E1xxx: Name and declaration resolution errors
/// - E2xxx: Type errors
/// - E9xxx: Internal compiler errors
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug, PartialOrd, Ord)]
pub enum ErrorCode {
    // Resolution Errors (E1xxx)
    /// No function named `main`
    E1001,
    /// Identifier does not name anything in scope
    E1002,
    /// Called name does not name a function
    E1003,
    /// Called expression is not a function
    E1004,
    /// Type name does not exist
    E1005,
    /// Expression in type position is not a type
    E1006,
    /// Enum type has no value with this name
    E1007,
    /// Top-level initializer reads variables whose initializers form a cycle
    E1008,

    // Type Errors (E2xxx)
    /// Right-hand side does not match the left-hand side
    E2001,
    /// Condition is not a boolean
    E2002,
    /// `for` over a value that is neither a range nor an enum type
    E2003,

    // Internal Errors (E9xxx)
    /// Internal compiler error
    E9001,
}

impl ErrorCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCode::E1001 => "E1001",
            ErrorCode::E1002 => "E1002",
            ErrorCode::E1003 => "E1003",
            ErrorCode::E1004 => "E1004",
            ErrorCode::E1005 => "E1005",
            ErrorCode::E1006 => "E1006",
            ErrorCode::E1007 => "E1007",
            ErrorCode::E1008 => "E1008",
            ErrorCode::E2001 => "E2001",
            ErrorCode::E2002 => "E2002",
            ErrorCode::E2003 => "E2003",
            ErrorCode::E9001 => "E9001",
        }
    }

    /// Default message for diagnostics carrying this code.
    pub fn description(&self) -> &'static str {
        match self {
            ErrorCode::E1001 => "the program has no `main` function",
            ErrorCode::E1002 => "this name does not exist",
            ErrorCode::E1003 => "this function does not exist",
            ErrorCode::E1004 => "this expression is not a function",
            ErrorCode::E1005 => "this type does not exist",
            ErrorCode::E1006 => "this expression is not a valid type",
            ErrorCode::E1007 => "this enum value does not exist",
            ErrorCode::E1008 => "this initializer depends on a cycle of top-level variables",
            ErrorCode::E2001 => "the value does not match the type it is assigned to",
            ErrorCode::E2002 => "the condition is not a boolean",
            ErrorCode::E2003 => "this value cannot be iterated over",
            ErrorCode::E9001 => "internal compiler error",
        }
    }

    pub fn is_resolution_error(&self) -> bool {
        matches!(
            self,
            ErrorCode::E1001
                | ErrorCode::E1002
                | ErrorCode::E1003
                | ErrorCode::E1004
                | ErrorCode::E1005
                | ErrorCode::E1006
                | ErrorCode::E1007
                | ErrorCode::E1008
        )
    }

    pub fn is_type_error(&self) -> bool {
        matches!(self, ErrorCode::E2001 | ErrorCode::E2002 | ErrorCode::E2003)
    }

    pub fn is_internal(&self) -> bool {
        matches!(self, ErrorCode::E9001)
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
