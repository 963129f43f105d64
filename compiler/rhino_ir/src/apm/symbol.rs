//! Scope symbol tables.
//!
//! Each scope owns a chain of fixed-capacity tables linked through `next` to
//! the enclosing scope's chain. When a table fills up, an overflow table is
//! spliced in right after it, still ahead of the enclosing scope, so a
//! lookup walking `next` sees the whole scope before its parent.

use smallvec::SmallVec;

use super::Program;
use crate::id::{EnumTypeId, FunctionId, ParamId, StructTypeId, SymbolTableId, VariableId};
use crate::span::Span;

/// Entries per table.
pub const SYMBOL_TABLE_CAPACITY: usize = 16;

/// What a symbol names.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum SymbolRef {
    Variable(VariableId),
    Function(FunctionId),
    Parameter(ParamId),
    EnumType(EnumTypeId),
    StructType(StructTypeId),
}

#[derive(Copy, Clone, Eq, PartialEq, Debug)]
pub struct Symbol {
    pub name: Span,
    pub target: SymbolRef,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct SymbolTable {
    entries: SmallVec<[Symbol; SYMBOL_TABLE_CAPACITY]>,
    /// Next table in the lookup chain; the sentinel ends it.
    pub next: SymbolTableId,
    /// Overflow table of the scope that precedes it in the chain.
    pub continuation: bool,
}

impl SymbolTable {
    /// Entries in declaration order.
    #[inline]
    pub fn symbols(&self) -> &[Symbol] {
        &self.entries
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    #[inline]
    pub fn is_full(&self) -> bool {
        self.entries.len() >= SYMBOL_TABLE_CAPACITY
    }
}

impl Program {
    /// Allocate an empty table whose chain continues at `next`.
    pub fn new_symbol_table(&mut self, next: SymbolTableId) -> SymbolTableId {
        let (id, table) = self.symbol_tables.append();
        table.next = next;
        id
    }

    /// Add `name` to the scope that starts at `table`.
    ///
    /// Tables are addressed by index throughout, so allocating an overflow
    /// table never invalidates a table another caller is holding.
    pub fn declare_symbol(&mut self, table: SymbolTableId, name: Span, target: SymbolRef) {
        let mut tail = table;
        loop {
            let next = self.symbol_tables.get(tail).next;
            if next.is_sentinel() || !self.symbol_tables.get(next).continuation {
                break;
            }
            tail = next;
        }

        if self.symbol_tables.get(tail).is_full() {
            let parent = self.symbol_tables.get(tail).next;
            let overflow = self.new_symbol_table(parent);
            self.symbol_tables.get_mut(overflow).continuation = true;
            self.symbol_tables.get_mut(tail).next = overflow;
            tracing::trace!(?tail, ?overflow, "symbol table overflow");
            tail = overflow;
        }

        self.symbol_tables
            .get_mut(tail)
            .entries
            .push(Symbol { name, target });
    }

    /// Walk the chain from `table` and return the first symbol whose name
    /// matches `matches`. Inner scopes come first, so inner names shadow
    /// outer ones.
    pub fn find_symbol(
        &self,
        table: SymbolTableId,
        mut matches: impl FnMut(Span) -> bool,
    ) -> Option<Symbol> {
        let mut current = table;
        while !current.is_sentinel() {
            let table = self.symbol_tables.get(current);
            if let Some(symbol) = table.symbols().iter().find(|symbol| matches(symbol.name)) {
                return Some(*symbol);
            }
            current = table.next;
        }
        None
    }
}
