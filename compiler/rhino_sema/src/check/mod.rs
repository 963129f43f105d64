//! Type checking.
//!
//! Runs on a resolved program and only reports: the program is not changed
//! apart from `given_error` flags, which also keep a second run quiet. Invalid sorts are assignable everywhere,
//! so an expression that already failed does not produce follow-on errors.
//!
//! Struct declarations are not checked.


use smallvec::SmallVec;

use rhino_diagnostic::{Diagnostic, ErrorCode, InternalError};
use rhino_ir::{assignable, Block, ExprId, ExprKind, Program, Sort, Span, StmtId, StmtKind};
use rhino_stack::ensure_sufficient_stack;

use crate::Compiler;

/// Report every type error in the program.
#[tracing::instrument(level = "debug", skip_all, fields(statements = program.stmts().len()))]
pub fn check(compiler: &mut Compiler<'_>, program: &mut Program) -> Result<(), InternalError> {
    let root = program.block;
    if root.symbol_table.is_sentinel() && !root.is_empty() {
        return Err(InternalError::invariant(
            "type checking",
            "program was not resolved before checking",
        ));
    }
    let mut checker = Checker { compiler, program };
    checker.check_block(root);
    tracing::debug!(
        errors = checker.compiler.diagnostics().len(),
        "type checking complete"
    );
    Ok(())
}

struct Checker<'a, 'src> {
    compiler: &'a mut Compiler<'src>,
    program: &'a mut Program,
}

impl Checker<'_, '_> {
    fn check_block(&mut self, block: Block) {
        ensure_sufficient_stack(|| {
            let children: SmallVec<[StmtId; 16]> = self.program.children(block).collect();
            for id in children {
                self.check_stmt(id);
            }
        });
    }

    fn check_stmt(&mut self, id: StmtId) {
        let stmt = self.program.stmt(id);
        let (kind, span) = (stmt.kind, stmt.span);
        match kind {
            StmtKind::Function(function) => {
                let body = self.program.function(function).body;
                self.check_block(body);
            }
            StmtKind::Variable {
                variable,
                initial_value: Some(value),
                ..
            } => {
                self.check_expr(value);
                let target = self.program.variable(variable).sort;
                self.check_assignable(value, target, span);
            }
            StmtKind::Assign { lhs, rhs } => {
                self.check_expr(lhs);
                self.check_expr(rhs);
                let target = self.program.expression_sort(lhs);
                self.check_assignable(rhs, target, span);
            }
            StmtKind::If { condition, body }
            | StmtKind::ElseIf { condition, body }
            | StmtKind::While { condition, body } => {
                self.check_condition(condition);
                self.check_block(body);
            }
            StmtKind::For { iterable, body, .. } => {
                self.check_iterable(iterable);
                self.check_block(body);
            }
            StmtKind::CodeBlock(body) | StmtKind::Else { body } | StmtKind::Loop { body } => {
                self.check_block(body);
            }
            StmtKind::Output(value) | StmtKind::Expression(value) | StmtKind::Return(Some(value)) => {
                self.check_expr(value);
            }
            StmtKind::Variable {
                initial_value: None,
                ..
            }
            | StmtKind::EnumType(_)
            | StmtKind::StructType(_)
            | StmtKind::Return(None)
            | StmtKind::Break
            | StmtKind::Invalid => {}
        }
    }

    /// Report a mismatch at `span` when `value` cannot be stored as `target`.
    /// The mismatch is flagged on `value`.
    fn check_assignable(&mut self, value: ExprId, target: Sort, span: Span) {
        let found = self.program.expression_sort(value);
        if assignable(found, target) || self.program.expr(value).given_error {
            return;
        }
        let reported = self.compiler.report(
            Diagnostic::new(ErrorCode::E2001, span)
                .with_message(format!("expected `{target}`, found `{found}`")),
        );
        self.program.expr_mut(value).given_error |= reported;
    }

    fn check_condition(&mut self, condition: ExprId) {
        self.check_expr(condition);
        let sort = self.program.expression_sort(condition);
        let expr = self.program.expr(condition);
        if sort.is_invalid() || sort == Sort::Bool || expr.given_error {
            return;
        }
        let span = expr.span;
        let reported = self.compiler.report(
            Diagnostic::new(ErrorCode::E2002, span)
                .with_message(format!("expected `bool`, found `{sort}`")),
        );
        self.program.expr_mut(condition).given_error |= reported;
    }

    /// Only ranges and enum types can be iterated.
    fn check_iterable(&mut self, iterable: ExprId) {
        self.check_expr(iterable);
        let expr = self.program.expr(iterable);
        let iterable_ok = matches!(
            expr.kind,
            ExprKind::Range { .. } | ExprKind::TypeRef(Sort::Enum(_)) | ExprKind::Identifier
        ) || expr.given_error;
        if !iterable_ok {
            self.raise_once(iterable, ErrorCode::E2003);
        }
    }

    fn check_expr(&mut self, id: ExprId) {
        ensure_sufficient_stack(|| {
            let kind = self.program.expr(id).kind;
            match kind {
                ExprKind::Identifier => self.raise_once(id, ErrorCode::E1002),
                ExprKind::Call { callee, arguments } => {
                    self.check_callee(callee);
                    let arguments: SmallVec<[ExprId; 8]> =
                        self.program.arguments(arguments).collect();
                    for argument in arguments {
                        self.check_expr(argument);
                    }
                }
                ExprKind::Field { subject, .. } => self.check_expr(subject),
                ExprKind::Range { first: a, last: b } | ExprKind::Binary { lhs: a, rhs: b, .. } => {
                    self.check_expr(a);
                    self.check_expr(b);
                }
                ExprKind::Unary { operand, .. } => self.check_expr(operand),
                ExprKind::Invalid
                | ExprKind::Integer(_)
                | ExprKind::Float(_)
                | ExprKind::Boolean(_)
                | ExprKind::String
                | ExprKind::EnumValue(_)
                | ExprKind::VariableRef(_)
                | ExprKind::FunctionRef(_)
                | ExprKind::ParameterRef(_)
                | ExprKind::TypeRef(_) => {}
            }
        });
    }

    fn check_callee(&mut self, callee: ExprId) {
        let kind = self.program.expr(callee).kind;
        match kind {
            ExprKind::FunctionRef(_) => {}
            ExprKind::Identifier => self.raise_once(callee, ErrorCode::E1003),
            _ => {
                self.check_expr(callee);
                self.raise_once(callee, ErrorCode::E1004);
            }
        }
    }

    /// Report `code` at the expression unless it already carries an error.
    fn raise_once(&mut self, id: ExprId, code: ErrorCode) {
        let expr = self.program.expr(id);
        if expr.given_error {
            return;
        }
        let span = expr.span;
        if self.compiler.raise(code, span) {
            self.program.expr_mut(id).given_error = true;
        }
    }
}
