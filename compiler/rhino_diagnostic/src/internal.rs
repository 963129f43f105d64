//! Internal compiler errors.

use rhino_ir::LayoutError;
use thiserror::Error;

use crate::ErrorCode;

/// A broken compiler invariant. Never caused by the program being compiled.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum InternalError {
    #[error(
        "internal compiler error [E9001]: malformed program: {0}\n\
         This is a bug in the Rhino compiler, not a problem with the program being compiled."
    )]
    Layout(#[from] LayoutError),

    #[error(
        "internal compiler error [E9001] in {pass}: {detail}\n\
         This is a bug in the Rhino compiler, not a problem with the program being compiled."
    )]
    Invariant { pass: &'static str, detail: String },
}

impl InternalError {
    pub fn invariant(pass: &'static str, detail: impl Into<String>) -> Self {
        InternalError::Invariant {
            pass,
            detail: detail.into(),
        }
    }

    pub fn code(&self) -> ErrorCode {
        ErrorCode::E9001
    }
}
