//! Declaration records: functions, parameters, variables, enum and struct types.

use super::sort::Sort;
use super::stmt::Block;
use crate::arena::IdRange;
use crate::id::{EnumValueId, ExprId, ParamId};
use crate::span::Span;

#[derive(Clone, Debug, PartialEq, Default)]
pub struct Function {
    pub name: Span,
    /// Span of the whole declaration.
    pub span: Span,
    pub body: Block,
    pub return_type_expr: Option<ExprId>,
    /// `None` when the declaration names no return type.
    pub return_sort: Sort,
    pub parameters: IdRange<ParamId>,
}

#[derive(Clone, Debug, PartialEq, Default)]
pub struct Parameter {
    pub name: Span,
    pub type_expr: Option<ExprId>,
    pub sort: Sort,
}

#[derive(Clone, Debug, PartialEq, Default)]
pub struct Variable {
    pub name: Span,
    pub sort: Sort,
    /// Initialization order of a top-level variable: one more than the
    /// highest order its initializer reads. 0 for locals and for globals
    /// whose initializers depend on each other in a cycle.
    pub order: u32,
}

/// An enum type owns a contiguous slice of the global enum-value list.
#[derive(Clone, Debug, PartialEq, Default)]
pub struct EnumType {
    pub name: Span,
    pub values: IdRange<EnumValueId>,
}

#[derive(Clone, Debug, PartialEq, Default)]
pub struct EnumValue {
    pub name: Span,
}

/// Struct types are declared and resolvable but carry no checked fields.
#[derive(Clone, Debug, PartialEq, Default)]
pub struct StructType {
    pub name: Span,
}
