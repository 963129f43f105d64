//! Statement nodes and blocks.

use crate::arena::IdRange;
use crate::id::{EnumTypeId, ExprId, FunctionId, StmtId, StructTypeId, SymbolTableId, VariableId};
use crate::span::Span;

/// A flattened block: a slice of the global statement list.
///
/// The slice holds the block's direct statements and, inline after each
/// block-bearing statement, that statement's whole body. Use
/// [`Program::children`](crate::Program::children) to visit direct
/// statements only.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug, Default)]
pub struct Block {
    pub statements: IdRange<StmtId>,
    /// Scope table, assigned by name resolution. Sentinel until then.
    pub symbol_table: SymbolTableId,
}

impl Block {
    pub const EMPTY: Block = Block {
        statements: IdRange::EMPTY,
        symbol_table: SymbolTableId::SENTINEL,
    };

    #[inline]
    pub const fn len(&self) -> u32 {
        self.statements.len
    }

    #[inline]
    pub const fn is_empty(&self) -> bool {
        self.statements.len == 0
    }
}

#[derive(Clone, Debug, PartialEq, Default)]
pub struct Stmt {
    pub kind: StmtKind,
    pub span: Span,
}

impl Stmt {
    pub fn new(kind: StmtKind, span: Span) -> Self {
        Stmt { kind, span }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Default)]
pub enum StmtKind {
    #[default]
    Invalid,
    /// Function declaration; the body lives in the [`Function`](crate::Function) record.
    Function(FunctionId),
    EnumType(EnumTypeId),
    StructType(StructTypeId),
    Variable {
        variable: VariableId,
        type_expr: Option<ExprId>,
        initial_value: Option<ExprId>,
    },
    CodeBlock(Block),
    If {
        condition: ExprId,
        body: Block,
    },
    ElseIf {
        condition: ExprId,
        body: Block,
    },
    Else {
        body: Block,
    },
    /// Unconditional loop, left with `break`.
    Loop {
        body: Block,
    },
    For {
        iterator: VariableId,
        iterable: ExprId,
        body: Block,
    },
    While {
        condition: ExprId,
        body: Block,
    },
    Break,
    Assign {
        lhs: ExprId,
        rhs: ExprId,
    },
    Output(ExprId),
    Expression(ExprId),
    Return(Option<ExprId>),
}

impl StmtKind {
    /// The inline body, for every kind except function declarations.
    pub const fn inline_body(&self) -> Option<Block> {
        match self {
            Self::CodeBlock(body)
            | Self::If { body, .. }
            | Self::ElseIf { body, .. }
            | Self::Else { body }
            | Self::Loop { body }
            | Self::For { body, .. }
            | Self::While { body, .. } => Some(*body),
            _ => None,
        }
    }

    pub fn inline_body_mut(&mut self) -> Option<&mut Block> {
        match self {
            Self::CodeBlock(body)
            | Self::If { body, .. }
            | Self::ElseIf { body, .. }
            | Self::Else { body }
            | Self::Loop { body }
            | Self::For { body, .. }
            | Self::While { body, .. } => Some(body),
            _ => None,
        }
    }
}
