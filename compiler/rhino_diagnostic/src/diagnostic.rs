//! The diagnostic record.

use std::fmt;

use rhino_ir::Span;

use crate::ErrorCode;

/// One reported problem in the program being compiled.
///
/// `line` and `column` are 1-based and stay 0 until the queue annotates
/// positions from the source text.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Diagnostic {
    pub code: ErrorCode,
    pub span: Span,
    pub message: String,
    pub line: u32,
    pub column: u32,
}

impl Diagnostic {
    /// A diagnostic with the code's default message.
    pub fn new(code: ErrorCode, span: Span) -> Self {
        Diagnostic {
            code,
            span,
            message: code.description().to_string(),
            line: 0,
            column: 0,
        }
    }

    #[must_use]
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = message.into();
        self
    }

    pub fn has_position(&self) -> bool {
        self.line != 0
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "error[{}]", self.code)?;
        if self.has_position() {
            write!(f, " at {}:{}", self.line, self.column)?;
        }
        write!(f, ": {}", self.message)
    }
}
