//! Type resolution and inference.
//!
//! Runs after name resolution has finished for the whole program. Each
//! block first resolves the signatures of the functions declared directly
//! in it, so a call anywhere in the block sees its callee's return sort.
//! Statements are then walked in order: declared types are resolved,
//! undeclared variable types are inferred from their initializer, and
//! every visited expression records its sort.
//!
//! Top-level variables may be read before their declaration. Their sorts
//! and initialization order are settled together, before any function body
//! is walked: a global is settled once every global its initializer reads
//! is settled.
//!
//! A value in a position that expects an enum may name one of the enum's
//! values directly: `c: Colour = Red` reads as `Colour.Red`.

use smallvec::SmallVec;

use rhino_diagnostic::{ErrorCode, InternalError};
use rhino_ir::{
    Block, EnumTypeId, EnumValueId, ExprId, ExprKind, FunctionId, Program, Sort, Span, StmtId,
    StmtKind, VariableId,
};
use rhino_stack::ensure_sufficient_stack;

use crate::Compiler;

const PASS: &str = "type resolution";

/// Resolve and infer the sort of every declaration and expression.
#[tracing::instrument(level = "debug", skip_all)]
pub fn resolve_types(
    compiler: &mut Compiler<'_>,
    program: &mut Program,
) -> Result<(), InternalError> {
    let mut resolver = TypeResolver { compiler, program };
    let root = resolver.program.block;
    resolver.resolve_block(root, true)?;
    tracing::debug!("type resolution complete");
    Ok(())
}

struct TypeResolver<'a, 'src> {
    compiler: &'a mut Compiler<'src>,
    program: &'a mut Program,
}

/// A top-level variable waiting for the globals its initializer reads.
#[derive(Copy, Clone)]
struct Global {
    variable: VariableId,
    declared: bool,
    initial_value: Option<ExprId>,
}

impl TypeResolver<'_, '_> {
    fn resolve_block(&mut self, block: Block, top_level: bool) -> Result<(), InternalError> {
        ensure_sufficient_stack(|| self.resolve_block_inner(block, top_level))
    }

    fn resolve_block_inner(&mut self, block: Block, top_level: bool) -> Result<(), InternalError> {
        if block.symbol_table.is_sentinel() {
            return Err(InternalError::invariant(
                PASS,
                format!(
                    "block at statement {} was never name-resolved",
                    block.statements.start
                ),
            ));
        }

        let children: SmallVec<[StmtId; 16]> = self.program.children(block).collect();
        for &id in &children {
            let kind = self.program.stmt(id).kind;
            if let StmtKind::Function(function) = kind {
                self.resolve_signature(function);
            }
        }
        if top_level {
            self.resolve_globals(&children);
        }
        for id in children {
            let kind = self.program.stmt(id).kind;
            if top_level && matches!(kind, StmtKind::Variable { .. }) {
                continue;
            }
            self.resolve_stmt(id)?;
        }
        Ok(())
    }

    fn resolve_signature(&mut self, function: FunctionId) {
        let signature = self.program.function(function);
        let return_type = signature.return_type_expr;
        let parameters = signature.parameters;

        let return_sort = match return_type {
            Some(type_expr) => self.resolve_type_expr(type_expr),
            None => Sort::None,
        };
        self.program.function_mut(function).return_sort = return_sort;

        for param in parameters.iter() {
            let type_expr = self.program.parameter(param).type_expr;
            let sort = type_expr.map_or(Sort::Error, |type_expr| self.resolve_type_expr(type_expr));
            self.program.parameter_mut(param).sort = sort;
        }
    }

    /// Settle the sort and initialization order of every top-level variable.
    ///
    /// Declared sorts are known up front. The rest are inferred in rounds:
    /// each round settles the globals whose initializers only read settled
    /// globals. Whatever is left when a round settles nothing reads itself
    /// through a cycle and is reported.
    fn resolve_globals(&mut self, children: &[StmtId]) {
        let mut pending: SmallVec<[Global; 8]> = SmallVec::new();
        for &id in children {
            let kind = self.program.stmt(id).kind;
            let StmtKind::Variable {
                variable,
                type_expr,
                initial_value,
            } = kind
            else {
                continue;
            };
            let sort = type_expr.map_or(Sort::Uninitialised, |type_expr| {
                self.resolve_type_expr(type_expr)
            });
            let record = self.program.variable_mut(variable);
            record.sort = sort;
            record.order = 0;
            pending.push(Global {
                variable,
                declared: type_expr.is_some(),
                initial_value,
            });
        }

        let mut round = 0u32;
        loop {
            let before = pending.len();
            let mut index = 0;
            while index < pending.len() {
                let global = pending[index];
                let reads = global
                    .initial_value
                    .map_or(Some(0), |value| self.settled_order(value));
                match reads {
                    Some(reads) => {
                        self.settle_global(global, reads + 1);
                        pending.remove(index);
                    }
                    None => index += 1,
                }
            }
            round += 1;
            if pending.len() == before {
                break;
            }
        }
        tracing::trace!(rounds = round, cyclic = pending.len(), "globals settled");

        for global in pending {
            let hint = self.declared_hint(global);
            if let Some(value) = global.initial_value {
                self.resolve_expr(value, hint);
                self.raise_once(value, ErrorCode::E1008);
            }
            if !global.declared {
                self.program.variable_mut(global.variable).sort = Sort::Error;
            }
        }
    }

    fn settle_global(&mut self, global: Global, order: u32) {
        let hint = self.declared_hint(global);
        let inferred = global
            .initial_value
            .map(|value| self.resolve_expr(value, hint));
        let record = self.program.variable_mut(global.variable);
        record.order = order;
        if !global.declared {
            record.sort = inferred.unwrap_or(Sort::Error);
        }
        tracing::trace!(variable = ?global.variable, order, sort = %record.sort, "global");
    }

    fn declared_hint(&self, global: Global) -> Option<Sort> {
        global
            .declared
            .then(|| self.program.variable(global.variable).sort)
    }

    /// Highest initialization order among the variables `id` reads, or
    /// `None` while one of them is still unsettled.
    fn settled_order(&self, id: ExprId) -> Option<u32> {
        ensure_sufficient_stack(|| match self.program.expr(id).kind {
            ExprKind::VariableRef(variable) => {
                let order = self.program.variable(variable).order;
                (order > 0).then_some(order)
            }
            ExprKind::Call { callee, arguments } => {
                let callee = self.settled_order(callee)?;
                self.program
                    .arguments(arguments)
                    .try_fold(callee, |order, argument| {
                        Some(order.max(self.settled_order(argument)?))
                    })
            }
            ExprKind::Field { subject, .. } => self.settled_order(subject),
            ExprKind::Range { first: a, last: b } | ExprKind::Binary { lhs: a, rhs: b, .. } => {
                Some(self.settled_order(a)?.max(self.settled_order(b)?))
            }
            ExprKind::Unary { operand, .. } => self.settled_order(operand),
            ExprKind::Invalid
            | ExprKind::Identifier
            | ExprKind::Integer(_)
            | ExprKind::Float(_)
            | ExprKind::Boolean(_)
            | ExprKind::String
            | ExprKind::EnumValue(_)
            | ExprKind::FunctionRef(_)
            | ExprKind::ParameterRef(_)
            | ExprKind::TypeRef(_) => Some(0),
        })
    }

    fn resolve_stmt(&mut self, id: StmtId) -> Result<(), InternalError> {
        let kind = self.program.stmt(id).kind;
        match kind {
            StmtKind::Function(function) => {
                let body = self.program.function(function).body;
                self.resolve_block(body, false)
            }
            StmtKind::Variable {
                variable,
                type_expr,
                initial_value,
            } => {
                let declared = type_expr.map(|type_expr| self.resolve_type_expr(type_expr));
                let inferred = initial_value.map(|value| self.resolve_expr(value, declared));
                let sort = declared.or(inferred).unwrap_or(Sort::Error);
                tracing::trace!(?variable, %sort, "variable sort");
                self.program.variable_mut(variable).sort = sort;
                Ok(())
            }
            StmtKind::For {
                iterator,
                iterable,
                body,
            } => {
                self.resolve_expr(iterable, None);
                let sort = match self.program.expr(iterable).kind {
                    ExprKind::Range { .. } => Sort::Int,
                    ExprKind::TypeRef(Sort::Enum(enum_type)) => Sort::Enum(enum_type),
                    // Reported by the checker.
                    _ => Sort::Error,
                };
                self.program.variable_mut(iterator).sort = sort;
                self.resolve_block(body, false)
            }
            StmtKind::If { condition, body }
            | StmtKind::ElseIf { condition, body }
            | StmtKind::While { condition, body } => {
                self.resolve_expr(condition, Some(Sort::Bool));
                self.resolve_block(body, false)
            }
            StmtKind::CodeBlock(body) | StmtKind::Else { body } | StmtKind::Loop { body } => {
                self.resolve_block(body, false)
            }
            StmtKind::Assign { lhs, rhs } => {
                let target = self.resolve_expr(lhs, None);
                self.resolve_expr(rhs, Some(target));
                Ok(())
            }
            StmtKind::Output(value) | StmtKind::Expression(value) | StmtKind::Return(Some(value)) => {
                self.resolve_expr(value, None);
                Ok(())
            }
            StmtKind::EnumType(_)
            | StmtKind::StructType(_)
            | StmtKind::Return(None)
            | StmtKind::Break
            | StmtKind::Invalid => Ok(()),
        }
    }

    /// Resolve an expression in type position to the sort it names.
    fn resolve_type_expr(&mut self, id: ExprId) -> Sort {
        let kind = self.program.expr(id).kind;
        let sort = match kind {
            ExprKind::TypeRef(sort) => sort,
            ExprKind::Identifier => {
                self.raise_once(id, ErrorCode::E1005);
                Sort::Error
            }
            _ => {
                self.raise_once(id, ErrorCode::E1006);
                Sort::Error
            }
        };
        self.program.expr_mut(id).sort = sort;
        sort
    }

    /// Resolve sub-expressions first, then record this expression's sort.
    ///
    /// `expected` is the sort the surrounding statement wants. It only
    /// applies to this node, never to its operands.
    fn resolve_expr(&mut self, id: ExprId, expected: Option<Sort>) -> Sort {
        ensure_sufficient_stack(|| {
            let kind = self.program.expr(id).kind;
            match kind {
                ExprKind::Identifier => {
                    if let Some(Sort::Enum(enum_type)) = expected {
                        let name = self.program.expr(id).span;
                        if let Some(value) = self.find_enum_value(enum_type, name) {
                            tracing::trace!(?value, "bare enum value");
                            self.program.expr_mut(id).kind = ExprKind::EnumValue(value);
                        }
                    }
                }
                ExprKind::Field { subject, field } => {
                    self.resolve_expr(subject, None);
                    let subject = self.program.expr(subject).kind;
                    if let ExprKind::TypeRef(Sort::Enum(enum_type)) = subject {
                        match self.find_enum_value(enum_type, field) {
                            Some(value) => {
                                tracing::trace!(?value, "enum value literal");
                                self.program.expr_mut(id).kind = ExprKind::EnumValue(value);
                            }
                            None => self.raise_once(id, ErrorCode::E1007),
                        }
                    }
                }
                ExprKind::Call { callee, arguments } => {
                    self.resolve_expr(callee, None);
                    let arguments: SmallVec<[ExprId; 8]> =
                        self.program.arguments(arguments).collect();
                    for argument in arguments {
                        self.resolve_expr(argument, None);
                    }
                }
                ExprKind::Range { first: a, last: b } | ExprKind::Binary { lhs: a, rhs: b, .. } => {
                    self.resolve_expr(a, None);
                    self.resolve_expr(b, None);
                }
                ExprKind::Unary { operand, .. } => {
                    self.resolve_expr(operand, None);
                }
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
            let sort = self.program.expression_sort(id);
            self.program.expr_mut(id).sort = sort;
            sort
        })
    }

    /// The value of `enum_type` whose name reads the same as `name`.
    fn find_enum_value(&self, enum_type: EnumTypeId, name: Span) -> Option<EnumValueId> {
        let source = self.compiler.source();
        let wanted = name.text(source);
        let values = self.program.enum_type(enum_type).values;
        self.program
            .enum_values(values)
            .find(|(_, value)| value.name.text(source) == wanted)
            .map(|(value, _)| value)
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
