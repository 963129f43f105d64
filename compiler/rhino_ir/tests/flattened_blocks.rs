//! Property tests for the flattened block layout.
#![allow(clippy::unwrap_used, clippy::expect_used, reason = "Tests can panic")]

use proptest::prelude::*;
use rhino_ir::{Block, Program, ProgramBuilder, StmtId};

#[derive(Clone, Debug)]
enum Shape {
    Leaf,
    Block(Vec<Shape>),
    Loop(Vec<Shape>),
    Function(Vec<Shape>),
}

fn shape() -> impl Strategy<Value = Shape> {
    let leaf = Just(Shape::Leaf);
    leaf.prop_recursive(5, 64, 6, |inner| {
        prop_oneof![
            prop::collection::vec(inner.clone(), 0..6).prop_map(Shape::Block),
            prop::collection::vec(inner.clone(), 0..6).prop_map(Shape::Loop),
            prop::collection::vec(inner, 0..6).prop_map(Shape::Function),
        ]
    })
}

fn emit(b: &mut ProgramBuilder, shape: &Shape) {
    match shape {
        Shape::Leaf => {
            b.break_stmt();
        }
        Shape::Block(children) => {
            b.code_block(|b| children.iter().for_each(|c| emit(b, c)));
        }
        Shape::Loop(children) => {
            let condition = b.boolean(true);
            b.while_loop(condition, |b| children.iter().for_each(|c| emit(b, c)));
        }
        Shape::Function(children) => {
            b.function("f", &[], None, |b| children.iter().for_each(|c| emit(b, c)));
        }
    }
}

fn size(shape: &Shape) -> u32 {
    match shape {
        Shape::Leaf => 1,
        Shape::Block(children) | Shape::Loop(children) | Shape::Function(children) => {
            1 + children.iter().map(size).sum::<u32>()
        }
    }
}

/// Walk every block, checking each direct-child walk ends exactly at the
/// block length. Returns the number of blocks visited.
fn check_blocks(program: &Program, block: Block) -> usize {
    let mut offset = 0;
    let mut visited = 1;
    for child in program.children(block) {
        assert_eq!(child, StmtId::new(block.statements.start + offset));
        offset += program.subtree_slot_count(child);
        if let Some(body) = program.body_of(child) {
            visited += check_blocks(program, body);
        }
    }
    assert_eq!(offset, block.len());
    visited
}

proptest! {
    #[test]
    fn skip_walk_terminates_at_block_length(shapes in prop::collection::vec(shape(), 0..8)) {
        let mut b = ProgramBuilder::new();
        for s in &shapes {
            emit(&mut b, s);
        }
        let (program, _) = b.finish();

        prop_assert_eq!(program.block.len(), shapes.iter().map(size).sum::<u32>());
        prop_assert_eq!(program.children(program.block).count(), shapes.len());
        check_blocks(&program, program.block);
        prop_assert!(program.validate().is_ok());
    }

    #[test]
    fn slot_count_matches_subtree(shapes in prop::collection::vec(shape(), 1..4)) {
        let mut b = ProgramBuilder::new();
        for s in &shapes {
            emit(&mut b, s);
        }
        let (program, _) = b.finish();
        for index in 0..program.stmts().len() {
            let id = StmtId::new(u32::try_from(index).unwrap());
            prop_assert_eq!(program.slot_count(id), program.subtree_slot_count(id));
        }
    }
}
