//! Name resolution.
//!
//! Every block gets a fresh scope table chained to its parent's. Functions
//! declared directly in a block are registered before any of its statements
//! are walked, so calls may refer forward and functions may recurse into
//! each other. At the top level enum types, struct types and variables are
//! registered the same way, so a function may use a global declared after
//! it. Everything else is registered when its declaration is reached.
//!
//! Only `Identifier` placeholders are rewritten. A name that finds nothing
//! stays a placeholder; the checker reports it.

use smallvec::SmallVec;

use rhino_diagnostic::InternalError;
use rhino_ir::{
    Block, ExprId, ExprKind, Program, Sort, StmtId, StmtKind, SymbolRef, SymbolTableId,
};
use rhino_stack::ensure_sufficient_stack;

use crate::Compiler;

const PASS: &str = "name resolution";

/// Resolve every name in the program.
#[tracing::instrument(level = "debug", skip_all)]
pub fn resolve_names(
    compiler: &mut Compiler<'_>,
    program: &mut Program,
) -> Result<(), InternalError> {
    let mut resolver = NameResolver { compiler, program };
    let table = resolver.program.new_symbol_table(SymbolTableId::SENTINEL);
    resolver.program.block.symbol_table = table;
    let root = resolver.program.block;
    resolver.resolve_block(root, true)?;
    tracing::debug!(
        tables = resolver.program.symbol_table_count(),
        "name resolution complete"
    );
    Ok(())
}

struct NameResolver<'a, 'src> {
    compiler: &'a mut Compiler<'src>,
    program: &'a mut Program,
}

impl NameResolver<'_, '_> {
    /// Give the body of `stmt` a new scope chained to `parent`.
    fn open_body(&mut self, stmt: StmtId, parent: SymbolTableId) -> Result<Block, InternalError> {
        let table = self.program.new_symbol_table(parent);
        let body = self.program.body_mut(stmt).ok_or_else(|| {
            InternalError::invariant(PASS, format!("statement {} has no body", stmt.raw()))
        })?;
        body.symbol_table = table;
        Ok(*body)
    }

    fn declare(&mut self, scope: SymbolTableId, target: SymbolRef) {
        let name = match target {
            SymbolRef::Variable(id) => self.program.variable(id).name,
            SymbolRef::Function(id) => self.program.function(id).name,
            SymbolRef::Parameter(id) => self.program.parameter(id).name,
            SymbolRef::EnumType(id) => self.program.enum_type(id).name,
            SymbolRef::StructType(id) => self.program.struct_type(id).name,
        };
        tracing::trace!(name = self.compiler.name(name), ?target, "declare");
        self.program.declare_symbol(scope, name, target);
    }

    /// Walk a block whose scope table has already been assigned.
    fn resolve_block(&mut self, block: Block, top_level: bool) -> Result<(), InternalError> {
        ensure_sufficient_stack(|| self.resolve_block_inner(block, top_level))
    }

    fn resolve_block_inner(&mut self, block: Block, top_level: bool) -> Result<(), InternalError> {
        let scope = block.symbol_table;
        let children: SmallVec<[StmtId; 16]> = self.program.children(block).collect();

        for &id in &children {
            let kind = self.program.stmt(id).kind;
            match kind {
                StmtKind::Function(function) => {
                    self.declare(scope, SymbolRef::Function(function));
                }
                StmtKind::EnumType(enum_type) if top_level => {
                    self.declare(scope, SymbolRef::EnumType(enum_type));
                }
                StmtKind::StructType(struct_type) if top_level => {
                    self.declare(scope, SymbolRef::StructType(struct_type));
                }
                StmtKind::Variable { variable, .. } if top_level => {
                    self.declare(scope, SymbolRef::Variable(variable));
                }
                _ => {}
            }
        }

        for id in children {
            self.resolve_stmt(id, scope, top_level)?;
        }
        Ok(())
    }

    fn resolve_stmt(
        &mut self,
        id: StmtId,
        scope: SymbolTableId,
        top_level: bool,
    ) -> Result<(), InternalError> {
        let kind = self.program.stmt(id).kind;
        match kind {
            StmtKind::Function(function) => {
                let signature = self.program.function(function);
                let return_type = signature.return_type_expr;
                let parameters = signature.parameters;
                if let Some(return_type) = return_type {
                    self.resolve_expr(return_type, scope);
                }
                for param in parameters.iter() {
                    if let Some(type_expr) = self.program.parameter(param).type_expr {
                        self.resolve_expr(type_expr, scope);
                    }
                }

                let body = self.open_body(id, scope)?;
                for param in parameters.iter() {
                    self.declare(body.symbol_table, SymbolRef::Parameter(param));
                }
                self.resolve_block(body, false)
            }
            StmtKind::EnumType(enum_type) => {
                if !top_level {
                    self.declare(scope, SymbolRef::EnumType(enum_type));
                }
                Ok(())
            }
            StmtKind::StructType(struct_type) => {
                if !top_level {
                    self.declare(scope, SymbolRef::StructType(struct_type));
                }
                Ok(())
            }
            StmtKind::Variable {
                variable,
                type_expr,
                initial_value,
            } => {
                // Inside a body the initializer cannot see the variable it
                // initialises. Top-level variables are already declared.
                if let Some(value) = initial_value {
                    self.resolve_expr(value, scope);
                }
                if let Some(type_expr) = type_expr {
                    self.resolve_expr(type_expr, scope);
                }
                if !top_level {
                    self.declare(scope, SymbolRef::Variable(variable));
                }
                Ok(())
            }
            StmtKind::For {
                iterator, iterable, ..
            } => {
                self.resolve_expr(iterable, scope);
                let body = self.open_body(id, scope)?;
                self.declare(body.symbol_table, SymbolRef::Variable(iterator));
                self.resolve_block(body, false)
            }
            StmtKind::If { condition, .. }
            | StmtKind::ElseIf { condition, .. }
            | StmtKind::While { condition, .. } => {
                self.resolve_expr(condition, scope);
                let body = self.open_body(id, scope)?;
                self.resolve_block(body, false)
            }
            StmtKind::CodeBlock(_) | StmtKind::Else { .. } | StmtKind::Loop { .. } => {
                let body = self.open_body(id, scope)?;
                self.resolve_block(body, false)
            }
            StmtKind::Assign { lhs, rhs } => {
                self.resolve_expr(lhs, scope);
                self.resolve_expr(rhs, scope);
                Ok(())
            }
            StmtKind::Output(value) | StmtKind::Expression(value) | StmtKind::Return(Some(value)) => {
                self.resolve_expr(value, scope);
                Ok(())
            }
            StmtKind::Return(None) | StmtKind::Break | StmtKind::Invalid => Ok(()),
        }
    }

    fn resolve_expr(&mut self, id: ExprId, scope: SymbolTableId) {
        let kind = self.program.expr(id).kind;
        ensure_sufficient_stack(|| match kind {
            ExprKind::Identifier => self.resolve_identifier(id, scope),
            ExprKind::Call { callee, arguments } => {
                self.resolve_expr(callee, scope);
                let arguments: SmallVec<[ExprId; 8]> = self.program.arguments(arguments).collect();
                for argument in arguments {
                    self.resolve_expr(argument, scope);
                }
            }
            ExprKind::Field { subject, .. } => self.resolve_expr(subject, scope),
            ExprKind::Range { first: a, last: b } | ExprKind::Binary { lhs: a, rhs: b, .. } => {
                self.resolve_expr(a, scope);
                self.resolve_expr(b, scope);
            }
            ExprKind::Unary { operand, .. } => self.resolve_expr(operand, scope),
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
        });
    }

    fn resolve_identifier(&mut self, id: ExprId, scope: SymbolTableId) {
        let source = self.compiler.source();
        let name = self.program.expr(id).span.text(source);

        // Built-in type names are keywords and cannot be shadowed.
        let resolved = if let Some(sort) = Sort::builtin(name) {
            Some(ExprKind::TypeRef(sort))
        } else {
            self.program
                .find_symbol(scope, |candidate| candidate.text(source) == name)
                .map(|symbol| match symbol.target {
                    SymbolRef::Variable(variable) => ExprKind::VariableRef(variable),
                    SymbolRef::Function(function) => ExprKind::FunctionRef(function),
                    SymbolRef::Parameter(param) => ExprKind::ParameterRef(param),
                    SymbolRef::EnumType(enum_type) => ExprKind::TypeRef(Sort::Enum(enum_type)),
                    SymbolRef::StructType(struct_type) => {
                        ExprKind::TypeRef(Sort::Struct(struct_type))
                    }
                })
        };

        match resolved {
            Some(kind) => self.program.expr_mut(id).kind = kind,
            None => tracing::trace!(name, "unresolved identifier"),
        }
    }
}
