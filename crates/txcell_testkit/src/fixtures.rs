//! Test fixtures and context helpers.
//!
//! Provides convenience types for setting up banks of transacted cells and
//! contexts with deliberately shaped contention.

use txcell_core::{Config, Context, TxCell};

/// A bank of transacted cells with a uniform initial value.
///
/// Cells are plain vector elements, so scoped threads can borrow them
/// directly without reference counting.
pub struct CellBank {
    cells: Vec<TxCell>,
}

impl CellBank {
    /// Creates `count` cells, each holding `initial`.
    #[must_use]
    pub fn new(count: usize, initial: usize) -> Self {
        Self {
            cells: (0..count).map(|_| TxCell::new(initial)).collect(),
        }
    }

    /// The cells.
    #[must_use]
    pub fn cells(&self) -> &[TxCell] {
        &self.cells
    }

    /// The cell at `index`.
    #[must_use]
    pub fn cell(&self, index: usize) -> &TxCell {
        &self.cells[index]
    }

    /// Number of cells in the bank.
    #[must_use]
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    /// True when the bank holds no cells.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Quiescent sum over every cell.
    ///
    /// Only meaningful with no transaction in flight: the per-cell loads
    /// are not taken atomically as a group.
    #[must_use]
    pub fn total(&self) -> usize {
        self.cells.iter().map(|c| c.value().as_usize()).sum()
    }
}

/// Creates a context whose orec table has a single slot, forcing every
/// cell onto one ownership record.
///
/// Deterministic total aliasing: any two transactions touching any two
/// cells contend, which makes false-sharing behavior testable without
/// reverse-engineering the address hash.
#[must_use]
pub fn fully_aliased_context() -> Context {
    Context::with_config(Config::new().orec_slots(1))
}
