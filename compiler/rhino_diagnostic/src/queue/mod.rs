//! Append-only diagnostic sink.
//!
//! Features:
//! - Error limit, after which further diagnostics are dropped
//! - Deduplication of identical `(code, span)` reports
//! - Line/column annotation from the source text


use rustc_hash::FxHashSet;

use rhino_ir::Span;

use crate::span_utils::LineOffsetTable;
use crate::{Diagnostic, ErrorCode};

/// Configuration for diagnostic processing.
///
/// The default keeps every diagnostic and collapses identical reports.
#[derive(Clone, Debug, Eq, PartialEq, Hash)]
pub struct DiagnosticConfig {
    /// Maximum number of diagnostics kept (0 = unlimited).
    pub error_limit: usize,
    /// Drop a report whose code and span match an earlier one.
    pub deduplicate: bool,
}

impl Default for DiagnosticConfig {
    fn default() -> Self {
        DiagnosticConfig {
            error_limit: 0,
            deduplicate: true,
        }
    }
}

impl DiagnosticConfig {
    /// No limit and no deduplication.
    pub fn unlimited() -> Self {
        DiagnosticConfig {
            error_limit: 0,
            deduplicate: false,
        }
    }
}

/// Collects diagnostics in the order they are raised.
#[derive(Debug, Default)]
pub struct DiagnosticQueue {
    diagnostics: Vec<Diagnostic>,
    seen: FxHashSet<(ErrorCode, Span)>,
    config: DiagnosticConfig,
    dropped: usize,
}

impl DiagnosticQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: DiagnosticConfig) -> Self {
        DiagnosticQueue {
            config,
            ..Self::default()
        }
    }

    /// Record a diagnostic. Returns `false` if it was dropped as a duplicate
    /// or because the error limit is reached.
    pub fn push(&mut self, diagnostic: Diagnostic) -> bool {
        if self.limit_reached() {
            self.dropped += 1;
            return false;
        }
        if self.config.deduplicate && !self.seen.insert((diagnostic.code, diagnostic.span)) {
            return false;
        }
        self.diagnostics.push(diagnostic);
        true
    }

    /// Record a diagnostic with the code's default message.
    pub fn raise(&mut self, code: ErrorCode, span: Span) -> bool {
        self.push(Diagnostic::new(code, span))
    }

    pub fn limit_reached(&self) -> bool {
        self.config.error_limit > 0 && self.diagnostics.len() >= self.config.error_limit
    }

    /// Diagnostics dropped because the limit was reached.
    pub fn dropped(&self) -> usize {
        self.dropped
    }

    pub fn len(&self) -> usize {
        self.diagnostics.len()
    }

    pub fn is_empty(&self) -> bool {
        self.diagnostics.is_empty()
    }

    pub fn has_errors(&self) -> bool {
        !self.diagnostics.is_empty()
    }

    /// Number of diagnostics carrying `code`.
    pub fn count(&self, code: ErrorCode) -> usize {
        self.diagnostics.iter().filter(|d| d.code == code).count()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Diagnostic> {
        self.diagnostics.iter()
    }

    /// Fill in line and column for every diagnostic from `source`.
    pub fn annotate_positions(&mut self, source: &str) {
        let table = LineOffsetTable::build(source);
        for diagnostic in &mut self.diagnostics {
            let (line, column) = table.offset_to_line_col(source, diagnostic.span.start);
            diagnostic.line = line;
            diagnostic.column = column;
        }
    }

    /// Take every diagnostic out of the queue, in report order.
    pub fn flush(&mut self) -> Vec<Diagnostic> {
        self.seen.clear();
        std::mem::take(&mut self.diagnostics)
    }
}
