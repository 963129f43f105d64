//! Rhino compiler front-end.
//!
//! A [`Session`] takes a program built by a parser (or by
//! [`ProgramBuilder`](rhino_ir::ProgramBuilder)) together with its source
//! text, runs name resolution, type resolution and checking, and returns
//! the typed program with its diagnostics. Back ends consume the program
//! only when [`Compilation::is_ok`] holds.

mod session;
mod tracing_setup;

pub use session::{Compilation, Session};
pub use tracing_setup::init_tracing;

pub use rhino_diagnostic::{Diagnostic, DiagnosticConfig, ErrorCode, InternalError};
pub use rhino_ir::Program;
