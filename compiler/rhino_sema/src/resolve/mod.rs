//! Name and type resolution.

mod names;
mod types;

#[cfg(test)]
mod tests;

use rhino_diagnostic::{ErrorCode, InternalError};
use rhino_ir::{Program, Span};

use crate::Compiler;

pub use names::resolve_names;
pub use types::resolve_types;

/// Run name resolution then type resolution over the whole program.
///
/// The program's layout is validated first; a malformed program is a
/// compiler bug and comes back as an [`InternalError`]. Resolving an
/// already resolved program changes nothing.
#[tracing::instrument(
    level = "debug",
    skip_all,
    fields(statements = program.stmts().len(), expressions = program.exprs().len())
)]
pub fn resolve(compiler: &mut Compiler<'_>, program: &mut Program) -> Result<(), InternalError> {
    program.validate()?;
    determine_main(compiler, program);
    resolve_names(compiler, program)?;
    resolve_types(compiler, program)?;
    tracing::debug!("resolution complete");
    Ok(())
}

/// Find the function named `main`, searching every function declared
/// anywhere in the program. The first match wins.
///
/// A program without one gets a single error at the start of the file.
/// The search runs once per program; later calls keep its outcome.
pub fn determine_main(compiler: &mut Compiler<'_>, program: &mut Program) {
    if program.main_searched {
        return;
    }
    program.main_searched = true;

    let main = program
        .functions()
        .iter()
        .position(|function| compiler.name(function.name) == "main")
        .and_then(|index| u32::try_from(index).ok())
        .map(rhino_ir::FunctionId::new);

    match main {
        Some(function) => {
            tracing::debug!(?function, "found main");
            program.main = Some(function);
        }
        None => {
            compiler.raise(ErrorCode::E1001, Span::DUMMY);
        }
    }
}
