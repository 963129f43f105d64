//! Structural validation of a program.
//!
//! Passes assume every stored index is in range and every block honours the
//! flattened layout. [`Program::validate`] checks both up front so a
//! malformed program is rejected as a compiler bug instead of panicking
//! halfway through a pass.

use std::fmt;

use super::expr::ExprKind;
use super::stmt::{Block, StmtKind};
use super::Program;
use crate::id::{EnumTypeId, ExprId, StmtId};

/// A broken structural invariant.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum LayoutError {
    /// A block's slice reaches past the end of the statement list or of the
    /// block that contains it.
    BlockOutOfBounds { start: u32, len: u32, limit: u32 },
    /// A body does not start right after the statement that owns it.
    BodyMisplaced { stmt: StmtId, body_start: u32 },
    /// An index refers past the end of its arena.
    DanglingIndex { kind: &'static str, index: u32 },
    /// An enum type's values do not follow the previous enum type's values.
    EnumValuesNotContiguous { enum_type: EnumTypeId },
}

impl fmt::Display for LayoutError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LayoutError::BlockOutOfBounds { start, len, limit } => write!(
                f,
                "block [{start}; {len}] extends past statement {limit}"
            ),
            LayoutError::BodyMisplaced { stmt, body_start } => write!(
                f,
                "body of statement {} starts at {body_start}, expected {}",
                stmt.raw(),
                stmt.raw() + 1
            ),
            LayoutError::DanglingIndex { kind, index } => {
                write!(f, "{kind} index {index} is out of range")
            }
            LayoutError::EnumValuesNotContiguous { enum_type } => write!(
                f,
                "values of enum type {} are not contiguous with earlier enum values",
                enum_type.raw()
            ),
        }
    }
}

impl std::error::Error for LayoutError {}

fn in_range(kind: &'static str, index: usize, len: usize) -> Result<(), LayoutError> {
    if index < len {
        Ok(())
    } else {
        Err(LayoutError::DanglingIndex {
            kind,
            index: u32::try_from(index).unwrap_or(u32::MAX),
        })
    }
}

impl Program {
    /// Check index ranges and the flattened block layout.
    pub fn validate(&self) -> Result<(), LayoutError> {
        self.validate_expressions()?;
        self.validate_declarations()?;
        for stmt in self.stmts.iter() {
            self.validate_stmt(stmt.kind)?;
        }
        self.validate_blocks()?;
        for table in self.symbol_tables.iter() {
            in_range("symbol table", table.next.index(), self.symbol_tables.len())?;
        }
        Ok(())
    }

    fn check_expr(&self, id: ExprId) -> Result<(), LayoutError> {
        in_range("expression", id.index(), self.exprs.len())
    }

    fn validate_expressions(&self) -> Result<(), LayoutError> {
        for expr in self.exprs.iter() {
            match expr.kind {
                ExprKind::EnumValue(value) => {
                    in_range("enum value", value.index(), self.enum_values.len())?;
                }
                ExprKind::VariableRef(variable) => {
                    in_range("variable", variable.index(), self.variables.len())?;
                }
                ExprKind::FunctionRef(function) => {
                    in_range("function", function.index(), self.functions.len())?;
                }
                ExprKind::ParameterRef(param) => {
                    in_range("parameter", param.index(), self.parameters.len())?;
                }
                ExprKind::Call { callee, arguments } => {
                    self.check_expr(callee)?;
                    if !arguments.is_empty() {
                        in_range("argument", arguments.end() as usize - 1, self.arguments.len())?;
                    }
                    for argument in self.arguments(arguments) {
                        self.check_expr(argument)?;
                    }
                }
                ExprKind::Field { subject, .. } => self.check_expr(subject)?,
                ExprKind::Range { first: a, last: b } | ExprKind::Binary { lhs: a, rhs: b, .. } => {
                    self.check_expr(a)?;
                    self.check_expr(b)?;
                }
                ExprKind::Unary { operand, .. } => self.check_expr(operand)?,
                ExprKind::Invalid
                | ExprKind::Identifier
                | ExprKind::Integer(_)
                | ExprKind::Float(_)
                | ExprKind::Boolean(_)
                | ExprKind::String
                | ExprKind::TypeRef(_) => {}
            }
        }
        Ok(())
    }

    fn validate_declarations(&self) -> Result<(), LayoutError> {
        for function in self.functions.iter() {
            if let Some(return_type) = function.return_type_expr {
                self.check_expr(return_type)?;
            }
            if !function.parameters.is_empty() {
                in_range(
                    "parameter",
                    function.parameters.end() as usize - 1,
                    self.parameters.len(),
                )?;
            }
        }
        for parameter in self.parameters.iter() {
            if let Some(type_expr) = parameter.type_expr {
                self.check_expr(type_expr)?;
            }
        }

        let mut expected_start = 0;
        for (id, enum_type) in self.enum_types.iter_enumerated() {
            if enum_type.values.start != expected_start {
                return Err(LayoutError::EnumValuesNotContiguous { enum_type: id });
            }
            expected_start = enum_type.values.end();
        }
        if expected_start as usize > self.enum_values.len() {
            return Err(LayoutError::DanglingIndex {
                kind: "enum value",
                index: expected_start - 1,
            });
        }
        Ok(())
    }

    fn validate_stmt(&self, kind: StmtKind) -> Result<(), LayoutError> {
        match kind {
            StmtKind::Function(function) => {
                in_range("function", function.index(), self.functions.len())
            }
            StmtKind::EnumType(enum_type) => {
                in_range("enum type", enum_type.index(), self.enum_types.len())
            }
            StmtKind::StructType(struct_type) => {
                in_range("struct type", struct_type.index(), self.struct_types.len())
            }
            StmtKind::Variable {
                variable,
                type_expr,
                initial_value,
            } => {
                in_range("variable", variable.index(), self.variables.len())?;
                type_expr
                    .into_iter()
                    .chain(initial_value)
                    .try_for_each(|expr| self.check_expr(expr))
            }
            StmtKind::For {
                iterator, iterable, ..
            } => {
                in_range("variable", iterator.index(), self.variables.len())?;
                self.check_expr(iterable)
            }
            StmtKind::If { condition, .. }
            | StmtKind::ElseIf { condition, .. }
            | StmtKind::While { condition, .. }
            | StmtKind::Output(condition)
            | StmtKind::Expression(condition)
            | StmtKind::Return(Some(condition)) => self.check_expr(condition),
            StmtKind::Assign { lhs, rhs } => {
                self.check_expr(lhs)?;
                self.check_expr(rhs)
            }
            StmtKind::Invalid
            | StmtKind::CodeBlock(_)
            | StmtKind::Else { .. }
            | StmtKind::Loop { .. }
            | StmtKind::Break
            | StmtKind::Return(None) => Ok(()),
        }
    }

    /// Walk every block from the root. Each direct child's body must start
    /// right after it and end inside the enclosing block, which makes each
    /// block's skip walk land exactly on its length.
    fn validate_blocks(&self) -> Result<(), LayoutError> {
        let total = u32::try_from(self.stmts.len()).unwrap_or(u32::MAX);
        let root = self.block;
        if root.statements.end() > total {
            return Err(LayoutError::BlockOutOfBounds {
                start: root.statements.start,
                len: root.len(),
                limit: total,
            });
        }

        let mut pending: Vec<Block> = vec![root];
        while let Some(block) = pending.pop() {
            in_range(
                "symbol table",
                block.symbol_table.index(),
                self.symbol_tables.len(),
            )?;
            let limit = block.statements.end();
            let mut children = self.children(block);
            for id in children.by_ref() {
                let Some(body) = self.body_of(id) else {
                    continue;
                };
                if body.statements.start != id.raw() + 1 {
                    return Err(LayoutError::BodyMisplaced {
                        stmt: id,
                        body_start: body.statements.start,
                    });
                }
                if body.statements.end() > limit {
                    return Err(LayoutError::BlockOutOfBounds {
                        start: body.statements.start,
                        len: body.len(),
                        limit,
                    });
                }
                pending.push(body);
            }
            debug_assert_eq!(children.offset(), block.len());
        }
        Ok(())
    }
}
