//! Semantic analysis for Rhino.
//!
//! Three passes run over a [`Program`](rhino_ir::Program) in order:
//!
//! 1. **Name resolution** picks the `main` function, gives every block a
//!    scope table and rewrites identifier placeholders into references.
//! 2. **Type resolution** resolves declared types, infers the rest and
//!    rewrites `Enum.Value` field accesses into enum-value literals.
//! 3. **Checking** reports type mismatches, non-boolean conditions, bad
//!    calls and names that never resolved.
//!
//! The first two run together through [`resolve`]; [`check`] runs last.
//! Problems in the program are recorded on the [`Compiler`]; broken
//! compiler invariants come back as [`InternalError`](rhino_diagnostic::InternalError).

mod check;
mod compiler;
mod resolve;

pub use check::check;
pub use compiler::Compiler;
pub use resolve::{determine_main, resolve, resolve_names, resolve_types};
