//! Per-compilation state shared by the passes.

use rhino_diagnostic::{Diagnostic, DiagnosticConfig, DiagnosticQueue, ErrorCode};
use rhino_ir::Span;

/// The source buffer and diagnostic sink of one compilation.
pub struct Compiler<'src> {
    source: &'src str,
    diagnostics: DiagnosticQueue,
}

impl<'src> Compiler<'src> {
    pub fn new(source: &'src str) -> Self {
        Self::with_config(source, DiagnosticConfig::default())
    }

    pub fn with_config(source: &'src str, config: DiagnosticConfig) -> Self {
        Compiler {
            source,
            diagnostics: DiagnosticQueue::with_config(config),
        }
    }

    #[inline]
    pub fn source(&self) -> &'src str {
        self.source
    }

    /// Source text of a name.
    #[inline]
    pub fn name(&self, span: Span) -> &'src str {
        span.text(self.source)
    }

    /// Record a compilation error with the code's default message.
    pub fn raise(&mut self, code: ErrorCode, span: Span) -> bool {
        self.report(Diagnostic::new(code, span))
    }

    /// Record a compilation error. Returns `false` if the queue dropped it.
    pub fn report(&mut self, diagnostic: Diagnostic) -> bool {
        tracing::debug!(
            code = %diagnostic.code,
            span = %diagnostic.span,
            message = %diagnostic.message,
            "compilation error"
        );
        self.diagnostics.push(diagnostic)
    }

    pub fn diagnostics(&self) -> &DiagnosticQueue {
        &self.diagnostics
    }

    pub fn has_errors(&self) -> bool {
        self.diagnostics.has_errors()
    }

    /// Annotate line and column numbers and hand out every diagnostic.
    pub fn finish(mut self) -> Vec<Diagnostic> {
        self.diagnostics.annotate_positions(self.source);
        self.diagnostics.flush()
    }
}
