//! Rhino IR - the Abstract Program Model
//!
//! This crate holds the data structures every later phase of the Rhino
//! compiler works on:
//! - Spans for source locations
//! - Typed indices and bucketed arenas that own every node
//! - The program model itself (expressions, statements, declarations)
//! - Symbol tables chained per scope
//! - Sorts (resolved types) and the structural sort derivation
//!
//! # Design
//!
//! - **Index everything**: nodes refer to each other through `u32` newtypes
//!   (`ExprId`, `StmtId`, ...) into arenas owned by [`Program`].
//! - **Flatten blocks**: a block is a slice of the global statement list that
//!   also contains every nested block inline. See [`apm::block`].
//! - **Never free**: nodes are created once and only ever filled in.

/// Compile-time assertion that a type has a specific size.
#[macro_export]
macro_rules! static_assert_size {
    ($ty:ty, $size:expr) => {
        const _: [(); $size] = [(); ::std::mem::size_of::<$ty>()];
    };
}

pub mod apm;
pub mod arena;
pub mod build;
mod id;
mod span;

pub use apm::{
    assignable, BinaryOp, Block, BlockStart, Children, EnumType, EnumValue, Expr, ExprKind, Function,
    LayoutError, Parameter, Program, Sort, Stmt, StmtKind, StructType, Symbol, SymbolRef,
    SymbolTable, UnaryOp, Variable, SYMBOL_TABLE_CAPACITY,
};
pub use arena::{Arena, IdRange, List, BUCKET_BYTES};
pub use build::ProgramBuilder;
pub use id::{
    ArgId, EnumTypeId, EnumValueId, ExprId, FunctionId, Idx, ParamId, StmtId, StructTypeId,
    SymbolTableId, VariableId,
};
pub use span::Span;
