//! Property-based test generators using proptest.
//!
//! Provides strategies for generating random words and scripted operation
//! sequences, plus the model the scripts are checked against.

use proptest::prelude::*;
use txcell_core::Word;

/// A scripted operation against an indexed bank of cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CellOp {
    /// Transactional read of the cell at the index.
    Read(usize),
    /// Transactional write of the value to the cell at the index.
    Write(usize, usize),
}

/// Strategy for generating arbitrary words.
pub fn word_strategy() -> impl Strategy<Value = Word> {
    any::<usize>().prop_map(Word::new)
}

/// Strategy for generating a single operation touching one of `cells`
/// cells.
pub fn cell_op_strategy(cells: usize) -> impl Strategy<Value = CellOp> {
    prop_oneof![
        (0..cells).prop_map(CellOp::Read),
        (0..cells, any::<usize>()).prop_map(|(index, value)| CellOp::Write(index, value)),
    ]
}

/// Strategy for generating operation scripts of up to `max_len` steps.
pub fn script_strategy(cells: usize, max_len: usize) -> impl Strategy<Value = Vec<CellOp>> {
    prop::collection::vec(cell_op_strategy(cells), 0..max_len)
}
