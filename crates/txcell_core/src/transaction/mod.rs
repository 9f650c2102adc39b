//! Transaction descriptors and the two-phase commit protocol.
//!
//! A descriptor tracks every cell its transaction touched in an ordered
//! log. Reads and writes stay private to the log until `commit`, which
//! first acquires the orec of every logged cell (phase one) and then
//! publishes the new words and stepped versions (phase two). A failed
//! acquisition rolls every already-acquired orec back to its prior version
//! and surfaces as [`ConsistencyError`] with the descriptor still active.

mod log;

pub use log::LogEntry;

use self::log::Log;
use crate::cell::TxCell;
use crate::context::Context;
use crate::error::{ConsistencyError, TxResult};
use crate::orec::{Acquisition, OrecWord};
use crate::types::{TransactionId, Word};
use std::fmt;
use tracing::trace;

/// State of a transaction descriptor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransactionState {
    /// Accepting reads and writes.
    Active,
    /// Commit published every logged write. Terminal.
    Committed,
    /// Every logged change was discarded. Terminal.
    Aborted,
}

/// A transaction descriptor bound to a [`Context`].
///
/// A descriptor is owned by one thread for its entire life; it is not
/// thread-safe and cannot be shared. Concurrency comes from several
/// descriptors, each on its own thread, contending on one context.
///
/// Reads and writes see the transaction's own writes through the log.
/// Nothing is published until [`commit`](Transaction::commit); dropping an
/// active descriptor aborts it.
///
/// # Example
/// ```
/// use txcell_core::{Context, TxCell, Word};
///
/// let ctx = Context::new();
/// let cell = TxCell::new(10usize);
///
/// let mut txn = ctx.begin();
/// let seen = txn.read(&cell)?;
/// txn.write(&cell, seen.as_usize() + 1)?;
/// txn.commit()?;
///
/// assert_eq!(cell.value(), Word::new(11));
/// # Ok::<(), txcell_core::ConsistencyError>(())
/// ```
pub struct Transaction<'t> {
    id: TransactionId,
    state: TransactionState,
    ctx: &'t Context,
    log: Log<'t>,
}

impl<'t> Transaction<'t> {
    /// Starts a transaction against `ctx`. Equivalent to
    /// [`Context::begin`].
    pub fn new(ctx: &'t Context) -> Self {
        let id = ctx.allocate_id();
        ctx.stats().record_start();
        Self {
            id,
            state: TransactionState::Active,
            ctx,
            log: Log::default(),
        }
    }

    /// This transaction's identity token.
    #[must_use]
    pub fn id(&self) -> TransactionId {
        self.id
    }

    /// Current descriptor state.
    #[must_use]
    pub fn state(&self) -> TransactionState {
        self.state
    }

    /// True while the descriptor accepts reads and writes.
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.state == TransactionState::Active
    }

    /// Transactionally reads `cell`.
    ///
    /// Returns the word this transaction would commit for the cell: its
    /// own latest write if any, otherwise the value captured on first
    /// touch.
    ///
    /// # Errors
    ///
    /// [`ConsistencyError`] if the cell's orec is owned by a peer
    /// transaction mid-commit.
    ///
    /// # Panics
    ///
    /// If the descriptor is no longer active.
    pub fn read(&mut self, cell: &'t TxCell) -> TxResult<Word> {
        assert!(self.is_active(), "read on a finished transaction");
        let index = self.ensure(cell)?;
        self.ctx.stats().record_read();
        Ok(self.log.entries()[index].new_snapshot().value)
    }

    /// Transactionally writes `word` to `cell`.
    ///
    /// The write stays private to this descriptor until commit. Each write
    /// also advances the entry's prospective post-commit version by one
    /// step, so the version the final write carries is what a successful
    /// commit publishes to the cell's orec.
    ///
    /// # Errors
    ///
    /// [`ConsistencyError`] if the cell's orec is owned by a peer
    /// transaction mid-commit.
    ///
    /// # Panics
    ///
    /// If the descriptor is no longer active.
    pub fn write(&mut self, cell: &'t TxCell, word: impl Into<Word>) -> TxResult<()> {
        assert!(self.is_active(), "write on a finished transaction");
        let index = self.ensure(cell)?;
        self.log.entry_mut(index).record_write(word.into());
        self.ctx.stats().record_write();
        Ok(())
    }

    /// Commits the transaction: acquire every logged orec, then publish.
    ///
    /// # Errors
    ///
    /// [`ConsistencyError`] if any acquisition fails. Every touched orec
    /// is already restored to its pre-acquisition version when this
    /// returns, and the descriptor stays active: the caller decides
    /// whether to retry with a fresh transaction or drop this one.
    ///
    /// # Panics
    ///
    /// If the descriptor is no longer active.
    pub fn commit(&mut self) -> TxResult<()> {
        assert!(self.is_active(), "commit on a finished transaction");
        if !self.acquire_all() {
            trace!(id = %self.id, "commit lost an acquisition race");
            self.ctx.stats().record_conflict();
            return Err(ConsistencyError);
        }
        self.make_all_changes();
        Ok(())
    }

    /// Abandons the transaction, discarding the log.
    ///
    /// An active transaction owns no orec (acquisition happens only inside
    /// commit), so there is nothing to restore.
    ///
    /// # Panics
    ///
    /// If the descriptor is no longer active.
    pub fn abort(&mut self) {
        assert!(self.is_active(), "abort on a finished transaction");
        self.state = TransactionState::Aborted;
        self.ctx.stats().record_abort();
    }

    /// Number of cells in the log.
    #[must_use]
    pub fn log_len(&self) -> usize {
        self.log.entries().len()
    }

    /// The log entry at `index`, in first-touch order.
    #[must_use]
    pub fn entry(&self, index: usize) -> &LogEntry<'t> {
        &self.log.entries()[index]
    }

    /// Ensures the log holds an entry for `cell` and returns its index.
    ///
    /// First touch resolves the cell against the orec table, fixing the
    /// version this transaction is consistent with. There is no later
    /// revalidation: commit-time acquisition supplies this version as the
    /// CAS expectation, so any divergence after this point is caught
    /// there.
    ///
    /// # Errors
    ///
    /// [`ConsistencyError`] if the cell's orec is owned by a peer.
    pub fn ensure(&mut self, cell: &'t TxCell) -> TxResult<usize> {
        if let Some(index) = self.log.position(cell) {
            return Ok(index);
        }
        let snapshot = match self.ctx.orecs().find(cell.addr()).resolve(cell) {
            Ok(snapshot) => snapshot,
            Err(err) => {
                trace!(id = %self.id, "first touch found an owned record");
                self.ctx.stats().record_conflict();
                return Err(err);
            }
        };
        Ok(self.log.push(LogEntry::first_touch(cell, snapshot)))
    }

    /// Phase one of commit: acquire the orec of every logged cell, in log
    /// order.
    ///
    /// Acquisition does not spin: a record that is busy under a peer fails
    /// the whole phase exactly like a version mismatch does. On failure
    /// every record acquired so far is restored to its pre-acquisition
    /// version before this returns false, and the descriptor is still
    /// active.
    ///
    /// Public together with [`make_all_changes`](Transaction::make_all_changes)
    /// so tests can hold the window between the phases open and drive
    /// contention deterministically.
    pub fn acquire_all(&self) -> bool {
        let entries = self.log.entries();
        for (held, entry) in entries.iter().enumerate() {
            let verdict =
                self.ctx
                    .orecs()
                    .acquire(entry.addr(), entry.old_snapshot().version, self.id);
            if verdict != Acquisition::Succeeded {
                for acquired in &entries[..held] {
                    self.release_to_old(acquired);
                }
                return false;
            }
        }
        true
    }

    /// Phase two of commit: publish every logged write, then hand each
    /// orec back.
    ///
    /// The descriptor moves to committed before the first store so that
    /// `release` installs new versions. Within each entry the cell store
    /// precedes the release: paired with the release fence, a peer that
    /// resolves the slot at the new version is guaranteed to observe the
    /// new word.
    ///
    /// Must only be called after [`acquire_all`](Transaction::acquire_all)
    /// returned true.
    pub fn make_all_changes(&mut self) {
        self.state = TransactionState::Committed;
        for entry in self.log.entries() {
            entry.cell().store(entry.new_snapshot().value);
            self.release(entry);
        }
        self.ctx.stats().record_commit();
    }

    /// Hands an orec back after the descriptor left the active state:
    /// committed descriptors install the entry's new version, aborted ones
    /// the old.
    ///
    /// The slot must not be owned by a peer. It may already hold a version
    /// again when aliased entries share it and an earlier release already
    /// republished the record.
    fn release(&self, entry: &LogEntry<'t>) {
        assert!(!self.is_active(), "release on an active transaction");
        debug_assert!(self
            .ctx
            .orecs()
            .find(entry.addr())
            .owner()
            .map_or(true, |owner| owner == self.id));

        let version = match self.state {
            TransactionState::Committed => entry.new_snapshot().version,
            _ => entry.old_snapshot().version,
        };
        self.ctx
            .orecs()
            .insert(entry.addr(), OrecWord::from_version(version));
    }

    /// Rollback path for a failed phase one: unconditionally restores the
    /// entry's pre-acquisition version, independent of descriptor state.
    fn release_to_old(&self, entry: &LogEntry<'t>) {
        debug_assert!(self
            .ctx
            .orecs()
            .find(entry.addr())
            .owner()
            .map_or(true, |owner| owner == self.id));

        self.ctx.orecs().insert(
            entry.addr(),
            OrecWord::from_version(entry.old_snapshot().version),
        );
    }
}

impl Drop for Transaction<'_> {
    fn drop(&mut self) {
        if self.is_active() {
            self.abort();
        }
    }
}

impl fmt::Debug for Transaction<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Transaction")
            .field("id", &self.id)
            .field("state", &self.state)
            .field("log_len", &self.log_len())
            .finish()
    }
}
