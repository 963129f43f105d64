//! Diagnostics for the Rhino compiler.
//!
//! User-facing problems are recorded, never thrown: passes push a
//! [`Diagnostic`] into the [`DiagnosticQueue`] and carry on. Broken compiler
//! invariants are different; they surface as [`InternalError`] and abort the
//! pipeline.

mod diagnostic;
mod error_code;
mod internal;
mod queue;
pub mod span_utils;

pub use diagnostic::Diagnostic;
pub use error_code::ErrorCode;
pub use internal::InternalError;
pub use queue::{DiagnosticConfig, DiagnosticQueue};
