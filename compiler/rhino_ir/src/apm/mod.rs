//! The Abstract Program Model.
//!
//! A [`Program`] owns one arena per node kind. Nodes are appended once,
//! referenced by typed index, and later only filled in: resolved
//! references, sorts, error flags and block scope tables.

pub mod block;
mod decl;
mod expr;
mod operators;
mod sort;
mod stmt;
mod symbol;
mod validate;


pub use block::Children;
pub use decl::{EnumType, EnumValue, Function, Parameter, StructType, Variable};
pub use expr::{Expr, ExprKind};
pub use operators::{BinaryOp, UnaryOp};
pub use sort::{assignable, Sort};
pub use stmt::{Block, Stmt, StmtKind};
pub use symbol::{Symbol, SymbolRef, SymbolTable, SYMBOL_TABLE_CAPACITY};
pub use validate::LayoutError;

use crate::arena::{Arena, IdRange, List};
use crate::id::{
    ArgId, EnumTypeId, EnumValueId, ExprId, FunctionId, ParamId, StmtId, StructTypeId,
    SymbolTableId, VariableId,
};
use crate::span::Span;

/// Marks where a block's statements begin, see [`Program::open_block`].
#[derive(Copy, Clone, Eq, PartialEq, Debug)]
#[must_use]
pub struct BlockStart(u32);

/// A whole program.
#[derive(Clone, Debug)]
pub struct Program {
    exprs: Arena<ExprId, Expr>,
    arguments: Arena<ArgId, ExprId>,
    stmts: Arena<StmtId, Stmt>,
    functions: Arena<FunctionId, Function>,
    parameters: Arena<ParamId, Parameter>,
    variables: Arena<VariableId, Variable>,
    enum_types: Arena<EnumTypeId, EnumType>,
    enum_values: Arena<EnumValueId, EnumValue>,
    struct_types: Arena<StructTypeId, StructType>,
    symbol_tables: Arena<SymbolTableId, SymbolTable>,
    /// The program's entry point, set by name resolution.
    pub main: Option<FunctionId>,
    /// Set once the search for `main` has run, whether or not it found one.
    pub main_searched: bool,
    /// The top-level declaration block.
    pub block: Block,
}

impl Program {
    /// An empty program. The sentinel symbol table is allocated here, before
    /// anything else, so that index 0 can mean "no next table".
    pub fn new() -> Self {
        let mut symbol_tables = Arena::new();
        symbol_tables.push(SymbolTable::default());
        Program {
            exprs: Arena::new(),
            arguments: Arena::new(),
            stmts: Arena::new(),
            functions: Arena::new(),
            parameters: Arena::new(),
            variables: Arena::new(),
            enum_types: Arena::new(),
            enum_values: Arena::new(),
            struct_types: Arena::new(),
            symbol_tables,
            main: None,
            main_searched: false,
            block: Block::EMPTY,
        }
    }

    // ===== Expressions =====

    #[inline]
    pub fn alloc_expr(&mut self, expr: Expr) -> ExprId {
        self.exprs.push(expr)
    }

    /// # Panics
    /// Panics if `id` is out of bounds.
    #[inline]
    #[track_caller]
    pub fn expr(&self, id: ExprId) -> &Expr {
        self.exprs.get(id)
    }

    /// # Panics
    /// Panics if `id` is out of bounds.
    #[inline]
    #[track_caller]
    pub fn expr_mut(&mut self, id: ExprId) -> &mut Expr {
        self.exprs.get_mut(id)
    }

    #[inline]
    pub fn exprs(&self) -> List<'_, ExprId, Expr> {
        self.exprs.list()
    }

    /// Store a call's argument list.
    pub fn alloc_arguments(&mut self, arguments: impl IntoIterator<Item = ExprId>) -> IdRange<ArgId> {
        let first = self.arguments.next_id();
        for argument in arguments {
            self.arguments.push(argument);
        }
        IdRange::between(first, self.arguments.next_id())
    }

    pub fn arguments(&self, range: IdRange<ArgId>) -> impl Iterator<Item = ExprId> + '_ {
        self.arguments.slice(range).map(|(_, expr)| *expr)
    }

    // ===== Statements =====

    #[inline]
    pub fn alloc_stmt(&mut self, stmt: Stmt) -> StmtId {
        self.stmts.push(stmt)
    }

    /// # Panics
    /// Panics if `id` is out of bounds.
    #[inline]
    #[track_caller]
    pub fn stmt(&self, id: StmtId) -> &Stmt {
        self.stmts.get(id)
    }

    /// # Panics
    /// Panics if `id` is out of bounds.
    #[inline]
    #[track_caller]
    pub fn stmt_mut(&mut self, id: StmtId) -> &mut Stmt {
        self.stmts.get_mut(id)
    }

    #[inline]
    pub fn stmts(&self) -> List<'_, StmtId, Stmt> {
        self.stmts.list()
    }

    /// Begin a block: every statement appended until the matching
    /// [`close_block`](Self::close_block) belongs to it, nested bodies
    /// included. Open a statement's body immediately after appending the
    /// statement.
    #[inline]
    pub fn open_block(&self) -> BlockStart {
        BlockStart(self.stmts.next_id().raw())
    }

    pub fn close_block(&self, start: BlockStart) -> Block {
        let end = self.stmts.next_id().raw();
        Block {
            statements: IdRange::new(start.0, end - start.0),
            symbol_table: SymbolTableId::SENTINEL,
        }
    }

    // ===== Declarations =====

    #[inline]
    pub fn alloc_function(&mut self, function: Function) -> FunctionId {
        self.functions.push(function)
    }

    #[inline]
    #[track_caller]
    pub fn function(&self, id: FunctionId) -> &Function {
        self.functions.get(id)
    }

    #[inline]
    #[track_caller]
    pub fn function_mut(&mut self, id: FunctionId) -> &mut Function {
        self.functions.get_mut(id)
    }

    #[inline]
    pub fn functions(&self) -> List<'_, FunctionId, Function> {
        self.functions.list()
    }

    pub fn alloc_parameters(
        &mut self,
        parameters: impl IntoIterator<Item = Parameter>,
    ) -> IdRange<ParamId> {
        let first = self.parameters.next_id();
        for parameter in parameters {
            self.parameters.push(parameter);
        }
        IdRange::between(first, self.parameters.next_id())
    }

    #[inline]
    #[track_caller]
    pub fn parameter(&self, id: ParamId) -> &Parameter {
        self.parameters.get(id)
    }

    #[inline]
    #[track_caller]
    pub fn parameter_mut(&mut self, id: ParamId) -> &mut Parameter {
        self.parameters.get_mut(id)
    }

    pub fn parameters(&self, range: IdRange<ParamId>) -> impl Iterator<Item = (ParamId, &Parameter)> + '_ {
        self.parameters.slice(range)
    }

    #[inline]
    pub fn alloc_variable(&mut self, variable: Variable) -> VariableId {
        self.variables.push(variable)
    }

    #[inline]
    #[track_caller]
    pub fn variable(&self, id: VariableId) -> &Variable {
        self.variables.get(id)
    }

    #[inline]
    #[track_caller]
    pub fn variable_mut(&mut self, id: VariableId) -> &mut Variable {
        self.variables.get_mut(id)
    }

    #[inline]
    pub fn variables(&self) -> List<'_, VariableId, Variable> {
        self.variables.list()
    }

    /// Append an enum type together with its values. The values land right
    /// after those of every earlier enum type.
    pub fn alloc_enum_type(
        &mut self,
        name: Span,
        values: impl IntoIterator<Item = EnumValue>,
    ) -> EnumTypeId {
        let first = self.enum_values.next_id();
        for value in values {
            self.enum_values.push(value);
        }
        let values = IdRange::between(first, self.enum_values.next_id());
        self.enum_types.push(EnumType { name, values })
    }

    #[inline]
    #[track_caller]
    pub fn enum_type(&self, id: EnumTypeId) -> &EnumType {
        self.enum_types.get(id)
    }

    #[inline]
    pub fn enum_types(&self) -> List<'_, EnumTypeId, EnumType> {
        self.enum_types.list()
    }

    #[inline]
    #[track_caller]
    pub fn enum_value(&self, id: EnumValueId) -> &EnumValue {
        self.enum_values.get(id)
    }

    pub fn enum_values(&self, range: IdRange<EnumValueId>) -> impl Iterator<Item = (EnumValueId, &EnumValue)> + '_ {
        self.enum_values.slice(range)
    }

    #[inline]
    pub fn alloc_struct_type(&mut self, struct_type: StructType) -> StructTypeId {
        self.struct_types.push(struct_type)
    }

    #[inline]
    #[track_caller]
    pub fn struct_type(&self, id: StructTypeId) -> &StructType {
        self.struct_types.get(id)
    }

    // ===== Symbol tables =====

    #[inline]
    #[track_caller]
    pub fn symbol_table(&self, id: SymbolTableId) -> &SymbolTable {
        self.symbol_tables.get(id)
    }

    #[inline]
    pub fn symbol_table_count(&self) -> usize {
        self.symbol_tables.len()
    }
}

impl Default for Program {
    fn default() -> Self {
        Self::new()
    }
}
