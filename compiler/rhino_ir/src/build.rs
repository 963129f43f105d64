//! Programmatic construction of programs.
//!
//! [`ProgramBuilder`] appends nodes in the order a parser would, so every
//! block comes out in flattened layout. Names and literals are written to
//! a synthetic source buffer and nodes get spans into it, which keeps
//! name comparison by source text working without a real parser.
//!
//! ```
//! use rhino_ir::{BinaryOp, ProgramBuilder};
//!
//! let mut b = ProgramBuilder::new();
//! b.function("main", &[], None, |b| {
//!     let one = b.int(1);
//!     let two = b.int(2);
//!     let sum = b.binary(BinaryOp::Add, one, two);
//!     b.variable("x", None, Some(sum));
//! });
//! let (program, source) = b.finish();
//! assert_eq!(program.block.len(), 2);
//! assert!(source.contains("main"));
//! ```

use crate::apm::{
    BinaryOp, BlockStart, EnumValue, Expr, ExprKind, Function, Parameter, Program, Stmt,
    StmtKind, UnaryOp, Variable,
};
use crate::id::{EnumTypeId, ExprId, FunctionId, StmtId, StructTypeId, VariableId};
use crate::span::Span;
use crate::{Block, StructType};

/// Builds a [`Program`] together with the source text its spans point into.
pub struct ProgramBuilder {
    program: Program,
    source: String,
    root: BlockStart,
}

impl ProgramBuilder {
    pub fn new() -> Self {
        let program = Program::new();
        let root = program.open_block();
        ProgramBuilder {
            program,
            source: String::new(),
            root,
        }
    }

    /// Append `text` to the source, separated by a space, and return its span.
    ///
    /// # Panics
    /// Panics if the source grows past `u32::MAX` bytes.
    pub fn text(&mut self, text: &str) -> Span {
        if !self.source.is_empty() && !self.source.ends_with('\n') {
            self.source.push(' ');
        }
        let start = offset(self.source.len());
        self.source.push_str(text);
        Span::new(start, offset(text.len()))
    }

    /// Start a new source line.
    pub fn newline(&mut self) {
        self.source.push('\n');
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn program(&self) -> &Program {
        &self.program
    }

    pub fn program_mut(&mut self) -> &mut Program {
        &mut self.program
    }

    /// Close the top-level block and hand out the program and its source.
    pub fn finish(mut self) -> (Program, String) {
        self.program.block = self.program.close_block(self.root);
        (self.program, self.source)
    }

    // ===== Expressions =====

    fn expr(&mut self, kind: ExprKind, span: Span) -> ExprId {
        self.program.alloc_expr(Expr::new(kind, span))
    }

    /// An unresolved name.
    pub fn ident(&mut self, name: &str) -> ExprId {
        let span = self.text(name);
        self.expr(ExprKind::Identifier, span)
    }

    pub fn int(&mut self, value: i64) -> ExprId {
        let span = self.text(&value.to_string());
        self.expr(ExprKind::Integer(value), span)
    }

    pub fn float(&mut self, value: f64) -> ExprId {
        let span = self.text(&format!("{value:?}"));
        self.expr(ExprKind::Float(value), span)
    }

    pub fn boolean(&mut self, value: bool) -> ExprId {
        let span = self.text(if value { "true" } else { "false" });
        self.expr(ExprKind::Boolean(value), span)
    }

    /// A string literal; the node's span covers the contents without quotes.
    pub fn string(&mut self, contents: &str) -> ExprId {
        let quoted = self.text(&format!("\"{contents}\""));
        let span = Span::new(quoted.start + 1, quoted.len - 2);
        self.expr(ExprKind::String, span)
    }

    pub fn call(&mut self, callee: ExprId, arguments: &[ExprId]) -> ExprId {
        let mut span = self.program.expr(callee).span;
        for &argument in arguments {
            span = span.merge(self.program.expr(argument).span);
        }
        let arguments = self.program.alloc_arguments(arguments.iter().copied());
        self.expr(ExprKind::Call { callee, arguments }, span)
    }

    /// `subject.field`
    pub fn field(&mut self, subject: ExprId, field: &str) -> ExprId {
        let field = self.text(field);
        let span = self.program.expr(subject).span.merge(field);
        self.expr(ExprKind::Field { subject, field }, span)
    }

    pub fn range(&mut self, first: ExprId, last: ExprId) -> ExprId {
        let span = self.merged(first, last);
        self.expr(ExprKind::Range { first, last }, span)
    }

    pub fn unary(&mut self, op: UnaryOp, operand: ExprId) -> ExprId {
        let span = self.text(op.as_symbol()).merge(self.program.expr(operand).span);
        self.expr(ExprKind::Unary { op, operand }, span)
    }

    pub fn binary(&mut self, op: BinaryOp, lhs: ExprId, rhs: ExprId) -> ExprId {
        let span = self.merged(lhs, rhs);
        self.expr(ExprKind::Binary { op, lhs, rhs }, span)
    }

    fn merged(&self, a: ExprId, b: ExprId) -> Span {
        self.program.expr(a).span.merge(self.program.expr(b).span)
    }

    fn merged_opt(&self, span: Span, exprs: &[Option<ExprId>]) -> Span {
        exprs
            .iter()
            .flatten()
            .fold(span, |span, &expr| span.merge(self.program.expr(expr).span))
    }

    // ===== Statements =====

    fn stmt(&mut self, kind: StmtKind, span: Span) -> StmtId {
        self.program.alloc_stmt(Stmt::new(kind, span))
    }

    /// Append a block-bearing statement and build its body in place.
    fn with_body(
        &mut self,
        span: Span,
        kind: impl FnOnce(Block) -> StmtKind,
        body: impl FnOnce(&mut Self),
    ) -> StmtId {
        let id = self.stmt(StmtKind::Invalid, span);
        let start = self.program.open_block();
        body(self);
        let block = self.program.close_block(start);
        self.program.stmt_mut(id).kind = kind(block);
        id
    }

    pub fn variable(
        &mut self,
        name: &str,
        type_expr: Option<ExprId>,
        initial_value: Option<ExprId>,
    ) -> VariableId {
        let name = self.text(name);
        let variable = self.program.alloc_variable(Variable {
            name,
            ..Variable::default()
        });
        let span = self.merged_opt(name, &[type_expr, initial_value]);
        self.stmt(
            StmtKind::Variable {
                variable,
                type_expr,
                initial_value,
            },
            span,
        );
        variable
    }

    pub fn assign(&mut self, lhs: ExprId, rhs: ExprId) -> StmtId {
        let span = self.merged(lhs, rhs);
        self.stmt(StmtKind::Assign { lhs, rhs }, span)
    }

    pub fn output(&mut self, value: ExprId) -> StmtId {
        let span = self.program.expr(value).span;
        self.stmt(StmtKind::Output(value), span)
    }

    pub fn expression(&mut self, value: ExprId) -> StmtId {
        let span = self.program.expr(value).span;
        self.stmt(StmtKind::Expression(value), span)
    }

    pub fn return_stmt(&mut self, value: Option<ExprId>) -> StmtId {
        let keyword = self.text("return");
        let span = self.merged_opt(keyword, &[value]);
        self.stmt(StmtKind::Return(value), span)
    }

    pub fn break_stmt(&mut self) -> StmtId {
        let span = self.text("break");
        self.stmt(StmtKind::Break, span)
    }

    pub fn enum_type(&mut self, name: &str, values: &[&str]) -> EnumTypeId {
        let name = self.text(name);
        let values: Vec<EnumValue> = values
            .iter()
            .map(|value| EnumValue {
                name: self.text(value),
            })
            .collect();
        let enum_type = self.program.alloc_enum_type(name, values);
        self.stmt(StmtKind::EnumType(enum_type), name);
        enum_type
    }

    pub fn struct_type(&mut self, name: &str) -> StructTypeId {
        let name = self.text(name);
        let struct_type = self.program.alloc_struct_type(StructType { name });
        self.stmt(StmtKind::StructType(struct_type), name);
        struct_type
    }

    /// Declare a function. Parameters are `(name, type expression)` pairs.
    pub fn function(
        &mut self,
        name: &str,
        parameters: &[(&str, Option<ExprId>)],
        return_type: Option<ExprId>,
        body: impl FnOnce(&mut Self),
    ) -> FunctionId {
        let name = self.text(name);
        let parameters: Vec<Parameter> = parameters
            .iter()
            .map(|&(param, type_expr)| Parameter {
                name: self.text(param),
                type_expr,
                ..Parameter::default()
            })
            .collect();
        let parameters = self.program.alloc_parameters(parameters);
        let span = self.merged_opt(name, &[return_type]);
        let function = self.program.alloc_function(Function {
            name,
            span,
            return_type_expr: return_type,
            parameters,
            ..Function::default()
        });

        self.stmt(StmtKind::Function(function), name);
        let start = self.program.open_block();
        body(self);
        let block = self.program.close_block(start);
        self.program.function_mut(function).body = block;
        function
    }

    pub fn code_block(&mut self, body: impl FnOnce(&mut Self)) -> StmtId {
        let span = self.text("{");
        self.with_body(span, StmtKind::CodeBlock, body)
    }

    pub fn if_stmt(&mut self, condition: ExprId, body: impl FnOnce(&mut Self)) -> StmtId {
        let span = self.program.expr(condition).span;
        self.with_body(span, |block| StmtKind::If { condition, body: block }, body)
    }

    pub fn else_if(&mut self, condition: ExprId, body: impl FnOnce(&mut Self)) -> StmtId {
        let span = self.program.expr(condition).span;
        self.with_body(span, |block| StmtKind::ElseIf { condition, body: block }, body)
    }

    pub fn else_stmt(&mut self, body: impl FnOnce(&mut Self)) -> StmtId {
        let span = self.text("else");
        self.with_body(span, |block| StmtKind::Else { body: block }, body)
    }

    pub fn loop_stmt(&mut self, body: impl FnOnce(&mut Self)) -> StmtId {
        let span = self.text("loop");
        self.with_body(span, |block| StmtKind::Loop { body: block }, body)
    }

    pub fn while_loop(&mut self, condition: ExprId, body: impl FnOnce(&mut Self)) -> StmtId {
        let span = self.program.expr(condition).span;
        self.with_body(span, |block| StmtKind::While { condition, body: block }, body)
    }

    /// `for iterator in iterable { body }`. Returns the iterator variable.
    pub fn for_loop(
        &mut self,
        iterator: &str,
        iterable: ExprId,
        body: impl FnOnce(&mut Self),
    ) -> VariableId {
        let name = self.text(iterator);
        let iterator = self.program.alloc_variable(Variable {
            name,
            ..Variable::default()
        });
        let span = name.merge(self.program.expr(iterable).span);
        self.with_body(
            span,
            |block| StmtKind::For {
                iterator,
                iterable,
                body: block,
            },
            body,
        );
        iterator
    }
}

impl Default for ProgramBuilder {
    fn default() -> Self {
        Self::new()
    }
}

fn offset(len: usize) -> u32 {
    u32::try_from(len).unwrap_or_else(|_| panic!("synthetic source exceeds {} bytes", u32::MAX))
}
