//! Walking flattened blocks.
//!
//! A block's statement slice contains its nested bodies inline, so moving
//! from one direct child to the next means skipping the child's whole
//! subtree. All skip arithmetic lives here.

use super::stmt::{Block, StmtKind};
use super::Program;
use crate::id::StmtId;

impl Program {
    /// The body of a block-bearing statement or function declaration.
    pub fn body_of(&self, id: StmtId) -> Option<Block> {
        match self.stmt(id).kind {
            StmtKind::Function(function) => Some(self.function(function).body),
            kind => kind.inline_body(),
        }
    }

    /// Mutable access to the body, for recording its scope table.
    pub fn body_mut(&mut self, id: StmtId) -> Option<&mut Block> {
        let kind = self.stmt(id).kind;
        if let StmtKind::Function(function) = kind {
            return Some(&mut self.function_mut(function).body);
        }
        self.stmt_mut(id).kind.inline_body_mut()
    }

    /// Slots the statement occupies in its block, computed from the stored
    /// body length: 1 for a leaf, `1 + body length` otherwise.
    pub fn slot_count(&self, id: StmtId) -> u32 {
        self.body_of(id).map_or(1, |body| 1 + body.len())
    }

    /// Slots the statement occupies, computed by recursively walking its body.
    ///
    /// Agrees with [`slot_count`](Self::slot_count) on every well-formed
    /// program; [`validate`](Self::validate) checks that it does.
    pub fn subtree_slot_count(&self, id: StmtId) -> u32 {
        rhino_stack::ensure_sufficient_stack(|| match self.body_of(id) {
            None => 1,
            Some(body) => 1 + self
                .children(body)
                .map(|child| self.subtree_slot_count(child))
                .sum::<u32>(),
        })
    }

    /// Offset of the direct child following the one at `offset`, or `None`
    /// once the walk reaches the end of the block.
    pub fn next_statement_in_block(&self, block: Block, offset: u32) -> Option<u32> {
        let current = StmtId::new(block.statements.start + offset);
        let next = offset + self.slot_count(current);
        (next < block.len()).then_some(next)
    }

    /// Iterate the direct children of `block`, skipping nested bodies.
    pub fn children(&self, block: Block) -> Children<'_> {
        Children {
            program: self,
            block,
            offset: 0,
        }
    }
}

/// Iterator over the direct statements of a block.
pub struct Children<'p> {
    program: &'p Program,
    block: Block,
    offset: u32,
}

impl Children<'_> {
    /// Offset the next child will be read from.
    pub fn offset(&self) -> u32 {
        self.offset
    }
}

impl Iterator for Children<'_> {
    type Item = StmtId;

    fn next(&mut self) -> Option<StmtId> {
        if self.offset >= self.block.len() {
            return None;
        }
        let id = StmtId::new(self.block.statements.start + self.offset);
        self.offset += self.program.slot_count(id);
        Some(id)
    }
}

impl std::iter::FusedIterator for Children<'_> {}
