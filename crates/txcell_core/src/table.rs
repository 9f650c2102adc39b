//! The orec table: a fixed, hash-indexed array of ownership records.

use crate::cell::TxCell;
use crate::orec::{Acquisition, Orec, OrecWord};
use crate::types::{TransactionId, Version};

/// A fixed-size array of orecs shared by every transaction in one context.
///
/// A cell's record is located by a deliberately cheap hash of its address,
/// so multiple cells may alias to one slot. Aliased cells serialize against
/// each other — false contention — but never corrupt each other: a slot's
/// version covers whichever cells map to it. The table never grows,
/// shrinks, or rehashes.
#[derive(Debug)]
pub(crate) struct OrecTable {
    records: Box<[Orec]>,
    mask: usize,
}

impl OrecTable {
    /// Cells are at least word-aligned; dropping the always-zero low bits
    /// keeps neighbouring cells from piling onto one slot.
    const ADDR_SHIFT: u32 = std::mem::align_of::<TxCell>().trailing_zeros();

    /// Creates a table with `slots` records, rounded up to a power of two
    /// so indexing stays a shift and a mask.
    pub(crate) fn with_slots(slots: usize) -> Self {
        let slots = slots.next_power_of_two();
        let records: Vec<Orec> = (0..slots).map(|_| Orec::default()).collect();
        Self {
            records: records.into_boxed_slice(),
            mask: slots - 1,
        }
    }

    /// Number of slots.
    pub(crate) fn len(&self) -> usize {
        self.records.len()
    }

    fn index(&self, addr: usize) -> usize {
        (addr >> Self::ADDR_SHIFT) & self.mask
    }

    /// Copies the current word of the record `addr` hashes to.
    ///
    /// A copy, not a reference: the caller gets a point-in-time value.
    pub(crate) fn find(&self, addr: usize) -> OrecWord {
        self.records[self.index(addr)].load()
    }

    /// Stores `word` into the indexed record. Release path only; the
    /// caller must own the record.
    pub(crate) fn insert(&self, addr: usize, word: OrecWord) {
        self.records[self.index(addr)].release(word);
    }

    /// Attempts to move the indexed record from version `prev` to owner
    /// `next`.
    pub(crate) fn acquire(
        &self,
        addr: usize,
        prev: Version,
        next: TransactionId,
    ) -> Acquisition {
        self.records[self.index(addr)].acquire(prev, next)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slot_count_rounds_up_to_a_power_of_two() {
        assert_eq!(OrecTable::with_slots(256).len(), 256);
        assert_eq!(OrecTable::with_slots(100).len(), 128);
        assert_eq!(OrecTable::with_slots(1).len(), 1);
        assert_eq!(OrecTable::with_slots(0).len(), 1);
    }

    #[test]
    fn fresh_records_carry_the_first_version() {
        let table = OrecTable::with_slots(4);
        let cell = TxCell::new(0usize);
        assert_eq!(table.find(cell.addr()).version(), Some(Version::FIRST));
    }

    #[test]
    fn acquire_and_insert_roundtrip() {
        let table = OrecTable::with_slots(4);
        let cell = TxCell::new(0usize);
        let id = TransactionId::FIRST;

        assert_eq!(
            table.acquire(cell.addr(), Version::FIRST, id),
            Acquisition::Succeeded
        );
        assert_eq!(table.find(cell.addr()).owner(), Some(id));

        table.insert(cell.addr(), OrecWord::from_version(Version::FIRST.bump()));
        assert_eq!(
            table.find(cell.addr()).version(),
            Some(Version::FIRST.bump())
        );
    }

    #[test]
    fn single_slot_table_aliases_every_address() {
        let table = OrecTable::with_slots(1);
        let a = TxCell::new(0usize);
        let b = TxCell::new(0usize);
        let owner = TransactionId::FIRST;

        assert_eq!(
            table.acquire(a.addr(), Version::FIRST, owner),
            Acquisition::Succeeded
        );
        // A different address, but the same record: a peer sees it busy.
        assert_eq!(
            table.acquire(b.addr(), Version::FIRST, owner.next()),
            Acquisition::Busy
        );
    }
}
