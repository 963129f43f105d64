//! Sorts: the resolved types of the language.

use std::fmt;

use super::expr::ExprKind;
use super::operators::{BinaryOp, UnaryOp};
use super::Program;
use crate::id::{EnumTypeId, EnumValueId, ExprId, StructTypeId};

/// A resolved type.
///
/// `Uninitialised` and `Error` are the two invalid sorts. Both are
/// assignable in either direction, so one bad expression reports once
/// instead of cascading through every use.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug, Default)]
pub enum Sort {
    #[default]
    Uninitialised,
    Error,
    None,
    Bool,
    Int,
    Num,
    Str,
    Enum(EnumTypeId),
    Struct(StructTypeId),
}

impl Sort {
    #[inline]
    pub const fn is_invalid(self) -> bool {
        matches!(self, Sort::Uninitialised | Sort::Error)
    }

    pub const fn name(self) -> &'static str {
        match self {
            Sort::Uninitialised => "uninitialised",
            Sort::Error => "error",
            Sort::None => "none",
            Sort::Bool => "bool",
            Sort::Int => "int",
            Sort::Num => "num",
            Sort::Str => "str",
            Sort::Enum(_) => "enum",
            Sort::Struct(_) => "struct",
        }
    }

    /// Sort for one of the built-in type keywords.
    pub fn builtin(keyword: &str) -> Option<Sort> {
        match keyword {
            "int" => Some(Sort::Int),
            "num" => Some(Sort::Num),
            "str" => Some(Sort::Str),
            "bool" => Some(Sort::Bool),
            _ => None,
        }
    }
}

impl fmt::Display for Sort {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Sort::Enum(id) => write!(f, "enum #{}", id.raw()),
            Sort::Struct(id) => write!(f, "struct #{}", id.raw()),
            other => f.write_str(other.name()),
        }
    }
}

/// Whether a value of sort `from` may be stored where `to` is expected.
///
/// Equal sorts are assignable (enums and structs only to the same
/// declaration). `int` widens to `num` but not the reverse. Any invalid
/// sort on either side is accepted.
pub fn assignable(from: Sort, to: Sort) -> bool {
    from.is_invalid() || to.is_invalid() || from == to || (from == Sort::Int && to == Sort::Num)
}

crate::static_assert_size!(Sort, 8);

impl Program {
    /// Derive an expression's sort from its structure.
    ///
    /// Reads the sorts of referenced declarations, so it is meaningful once
    /// the type pass has filled those in. It does not read `Expr::sort`.
    pub fn expression_sort(&self, id: ExprId) -> Sort {
        rhino_stack::ensure_sufficient_stack(|| self.expression_sort_inner(id))
    }

    fn expression_sort_inner(&self, id: ExprId) -> Sort {
        match self.expr(id).kind {
            ExprKind::Integer(_) => Sort::Int,
            ExprKind::Float(_) => Sort::Num,
            ExprKind::Boolean(_) => Sort::Bool,
            ExprKind::String => Sort::Str,
            ExprKind::EnumValue(value) => self.enum_value_sort(value),
            ExprKind::VariableRef(variable) => self.variable(variable).sort,
            ExprKind::ParameterRef(param) => self.parameter(param).sort,
            ExprKind::FunctionRef(function) => self.function(function).return_sort,
            ExprKind::Call { callee, .. } => match self.expr(callee).kind {
                ExprKind::FunctionRef(function) => self.function(function).return_sort,
                _ => Sort::Error,
            },
            ExprKind::Unary { op, operand } => match op {
                UnaryOp::Not => Sort::Bool,
                UnaryOp::Pos | UnaryOp::Neg | UnaryOp::Increment | UnaryOp::Decrement => {
                    self.expression_sort(operand)
                }
            },
            ExprKind::Binary { op, lhs, rhs } => {
                if op.is_boolean() {
                    return Sort::Bool;
                }
                let lhs = self.expression_sort(lhs);
                let rhs = self.expression_sort(rhs);
                if lhs.is_invalid() || rhs.is_invalid() {
                    Sort::Error
                } else if op == BinaryOp::Div {
                    Sort::Num
                } else if lhs == Sort::Int && rhs == Sort::Int {
                    Sort::Int
                } else {
                    Sort::Num
                }
            }
            ExprKind::Invalid
            | ExprKind::Identifier
            | ExprKind::TypeRef(_)
            | ExprKind::Field { .. }
            | ExprKind::Range { .. } => Sort::Error,
        }
    }

    fn enum_value_sort(&self, value: EnumValueId) -> Sort {
        self.enum_type_of(value).map_or(Sort::Error, Sort::Enum)
    }

    /// The enum type whose value slice contains `value`.
    ///
    /// Value slices are appended in enum-type order, so this accumulates
    /// slice lengths until the running total passes `value`.
    pub fn enum_type_of(&self, value: EnumValueId) -> Option<EnumTypeId> {
        let mut end = 0u32;
        for (id, enum_type) in self.enum_types.iter_enumerated() {
            end += enum_type.values.len;
            if value.raw() < end {
                return Some(id);
            }
        }
        None
    }
}
