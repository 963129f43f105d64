//! The compilation pipeline.

use rhino_diagnostic::{Diagnostic, DiagnosticConfig, InternalError};
use rhino_ir::Program;
use rhino_sema::{check, resolve, Compiler};

/// Runs the front-end passes with a fixed diagnostic configuration.
#[derive(Clone, Debug, Default)]
pub struct Session {
    config: DiagnosticConfig,
}

/// A resolved, checked program and the problems found in it.
#[derive(Debug)]
pub struct Compilation {
    pub program: Program,
    /// In report order, with line and column filled in.
    pub diagnostics: Vec<Diagnostic>,
}

impl Compilation {
    /// No diagnostics: the program may be handed to a back end.
    pub fn is_ok(&self) -> bool {
        self.diagnostics.is_empty()
    }

    /// One line per diagnostic.
    pub fn render(&self) -> String {
        self.diagnostics
            .iter()
            .map(|diagnostic| format!("{diagnostic}\n"))
            .collect()
    }
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: DiagnosticConfig) -> Self {
        Session { config }
    }

    pub fn config(&self) -> &DiagnosticConfig {
        &self.config
    }

    /// Resolve and check `program`, whose spans point into `source`.
    ///
    /// Problems in the program end up in [`Compilation::diagnostics`]. An
    /// `Err` means the compiler itself failed.
    #[tracing::instrument(level = "debug", skip_all, fields(source_len = source.len()))]
    pub fn compile(&self, mut program: Program, source: &str) -> Result<Compilation, InternalError> {
        let mut compiler = Compiler::with_config(source, self.config.clone());
        resolve(&mut compiler, &mut program)?;
        check(&mut compiler, &mut program)?;
        let diagnostics = compiler.finish();
        tracing::debug!(diagnostics = diagnostics.len(), "compilation complete");
        Ok(Compilation {
            program,
            diagnostics,
        })
    }
}
