//! Expression nodes.

use super::operators::{BinaryOp, UnaryOp};
use super::sort::Sort;
use crate::arena::IdRange;
use crate::id::{ArgId, EnumValueId, ExprId, FunctionId, ParamId, VariableId};
use crate::span::Span;

/// An expression node.
///
/// `sort` is `Uninitialised` until the type pass records it. `given_error`
/// marks a node that already produced a diagnostic, so later passes stay
/// quiet about it.
#[derive(Clone, Debug, PartialEq, Default)]
pub struct Expr {
    pub kind: ExprKind,
    pub span: Span,
    pub sort: Sort,
    pub given_error: bool,
}

impl Expr {
    pub fn new(kind: ExprKind, span: Span) -> Self {
        Expr {
            kind,
            span,
            sort: Sort::Uninitialised,
            given_error: false,
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Default)]
pub enum ExprKind {
    /// Parser recovery placeholder.
    #[default]
    Invalid,
    /// An unresolved name; the name is the node's span.
    Identifier,
    Integer(i64),
    Float(f64),
    Boolean(bool),
    /// String literal; the contents are the node's span.
    String,
    EnumValue(EnumValueId),
    VariableRef(VariableId),
    FunctionRef(FunctionId),
    ParameterRef(ParamId),
    /// A name that resolved to a type, in type or value position.
    TypeRef(Sort),
    Call {
        callee: ExprId,
        arguments: IdRange<ArgId>,
    },
    /// `subject.field`
    Field {
        subject: ExprId,
        field: Span,
    },
    Range {
        first: ExprId,
        last: ExprId,
    },
    Unary {
        op: UnaryOp,
        operand: ExprId,
    },
    Binary {
        op: BinaryOp,
        lhs: ExprId,
        rhs: ExprId,
    },
}

impl ExprKind {
    /// True for nodes that already name their referent.
    pub const fn is_reference(&self) -> bool {
        matches!(
            self,
            Self::VariableRef(_)
                | Self::FunctionRef(_)
                | Self::ParameterRef(_)
                | Self::TypeRef(_)
                | Self::EnumValue(_)
        )
    }
}
