//! Ownership records and their acquisition protocol.
//!
//! An orec is a single atomically-updated word. An odd word is the
//! *version* of the last commit that touched the slot; an even word is the
//! *identity* of the transaction currently committing through it. That
//! low-bit partition is the whole encoding: no other state exists.
//!
//! Threads synchronize exclusively through the two primitives here, a
//! full-fence compare-and-swap and a full fence after release stores.
//! No mutex is used anywhere in the crate.

use crate::cell::TxCell;
use crate::error::{ConsistencyError, TxResult};
use crate::types::{Snapshot, TransactionId, Version};
use std::sync::atomic::{fence, AtomicUsize, Ordering};

/// Atomic compare-and-swap over an orec word.
///
/// Returns the word observed at the slot, which equals `prev` exactly when
/// the swap happened. A successful CAS publishes all prior writes and
/// acquires all subsequent reads.
fn compare_and_swap(slot: &AtomicUsize, prev: usize, next: usize) -> usize {
    match slot.compare_exchange(prev, next, Ordering::SeqCst, Ordering::SeqCst) {
        Ok(seen) | Err(seen) => seen,
    }
}

/// Outcome of attempting to acquire an orec slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Acquisition {
    /// The slot now holds (or already held) the caller's identity.
    Succeeded,
    /// Another transaction committed first; the slot carries a different
    /// version than the caller expected.
    Failed,
    /// The slot is currently owned by a peer transaction.
    Busy,
}

/// A point-in-time copy of an orec word.
///
/// `OrecTable::find` hands out copies, never references: inspecting a copy
/// confines every check-then-act race to the commit-time CAS, where it is
/// detected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct OrecWord(usize);

impl OrecWord {
    pub(crate) fn from_version(version: Version) -> Self {
        Self(version.as_usize())
    }

    /// True when the word labels an unowned slot with a commit version.
    pub(crate) fn is_version(self) -> bool {
        self.0 % 2 == 1
    }

    /// The slot's version, if unowned.
    pub(crate) fn version(self) -> Option<Version> {
        self.is_version().then(|| Version::new(self.0))
    }

    /// The owning transaction's identity, if owned.
    pub(crate) fn owner(self) -> Option<TransactionId> {
        (!self.is_version()).then(|| TransactionId::new(self.0))
    }

    /// Resolves `cell` against this orec observation.
    ///
    /// An unowned slot pairs the cell's current word with the slot version.
    /// An owned slot means the value is mid-rewrite; refuse rather than
    /// guess. The cell load itself carries no synchronization: the prior
    /// committer's release fence is what makes its store visible ahead of
    /// the version this copy holds.
    pub(crate) fn resolve(self, cell: &TxCell) -> TxResult<Snapshot> {
        match self.version() {
            Some(version) => Ok(Snapshot::new(cell.load(), version)),
            None => Err(ConsistencyError),
        }
    }
}

/// A live orec slot.
///
/// The word moves from `Unowned@V` (odd) to `Owned by T` (even identity)
/// only through [`Orec::acquire`], and back only through [`Orec::release`].
#[derive(Debug)]
pub(crate) struct Orec {
    word: AtomicUsize,
}

impl Default for Orec {
    fn default() -> Self {
        Self {
            word: AtomicUsize::new(Version::FIRST.as_usize()),
        }
    }
}

impl Orec {
    /// Copies the current word out of the slot.
    pub(crate) fn load(&self) -> OrecWord {
        OrecWord(self.word.load(Ordering::SeqCst))
    }

    /// Attempts to move the slot from version `prev` to owner `next`.
    pub(crate) fn acquire(&self, prev: Version, next: TransactionId) -> Acquisition {
        let seen = compare_and_swap(&self.word, prev.as_usize(), next.as_usize());
        if seen == prev.as_usize() || seen == next.as_usize() {
            // The second arm is idempotent re-acquisition, taken when two
            // logged cells alias to this slot. It does not revalidate the
            // version the aliased entry captured; an aliased entry whose
            // snapshot predates the current owner's acquisition slips
            // through here.
            Acquisition::Succeeded
        } else if seen % 2 == 1 {
            Acquisition::Failed
        } else {
            Acquisition::Busy
        }
    }

    /// Stores `word` into the slot, then fences.
    ///
    /// Only the slot's current owner releases, so the store itself is
    /// unraced; the full fence orders it before any subsequent orec
    /// interaction by this thread.
    pub(crate) fn release(&self, word: OrecWord) {
        self.word.store(word.0, Ordering::Release);
        fence(Ordering::SeqCst);
    }
}
