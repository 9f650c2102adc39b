//! Context statistics and telemetry.
//!
//! Counters for monitoring transaction traffic on a context. A retried
//! transaction shows up once per attempt: a conflicted commit counts one
//! conflict, and dropping the failed descriptor counts one abort.

use std::sync::atomic::{AtomicU64, Ordering};

/// Counters over every transaction begun against one context.
///
/// All counters are relaxed atomics, safe to read while transactions are
/// in flight. Values are monotonically increasing.
#[derive(Debug, Default)]
pub struct ContextStats {
    /// Transactions started.
    started: AtomicU64,
    /// Transactions committed.
    committed: AtomicU64,
    /// Transactions aborted (explicitly or by drop).
    aborted: AtomicU64,
    /// Consistency conflicts observed, at first touch or at commit.
    conflicts: AtomicU64,
    /// Transactional reads.
    reads: AtomicU64,
    /// Transactional writes.
    writes: AtomicU64,
}

impl ContextStats {
    /// Creates a zeroed stats instance.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    // === Increment methods (internal use) ===

    pub(crate) fn record_start(&self) {
        self.started.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_commit(&self) {
        self.committed.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_abort(&self) {
        self.aborted.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_conflict(&self) {
        self.conflicts.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_read(&self) {
        self.reads.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_write(&self) {
        self.writes.fetch_add(1, Ordering::Relaxed);
    }

    // === Getter methods (public API) ===

    /// Returns the number of transactions started.
    pub fn started(&self) -> u64 {
        self.started.load(Ordering::Relaxed)
    }

    /// Returns the number of transactions committed.
    pub fn committed(&self) -> u64 {
        self.committed.load(Ordering::Relaxed)
    }

    /// Returns the number of transactions aborted, explicitly or by drop.
    pub fn aborted(&self) -> u64 {
        self.aborted.load(Ordering::Relaxed)
    }

    /// Returns the number of consistency conflicts observed.
    ///
    /// High conflict counts relative to commits indicate contended cells,
    /// or unrelated cells aliasing to shared orec slots.
    pub fn conflicts(&self) -> u64 {
        self.conflicts.load(Ordering::Relaxed)
    }

    /// Returns the number of transactional reads.
    pub fn reads(&self) -> u64 {
        self.reads.load(Ordering::Relaxed)
    }

    /// Returns the number of transactional writes.
    pub fn writes(&self) -> u64 {
        self.writes.load(Ordering::Relaxed)
    }

    /// Returns a point-in-time copy of all counters.
    pub fn snapshot(&self) -> StatsSnapshot {
        StatsSnapshot {
            started: self.started(),
            committed: self.committed(),
            aborted: self.aborted(),
            conflicts: self.conflicts(),
            reads: self.reads(),
            writes: self.writes(),
        }
    }
}

/// A point-in-time copy of [`ContextStats`].
///
/// A plain struct that can be compared or moved across threads without
/// atomics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct StatsSnapshot {
    /// Transactions started.
    pub started: u64,
    /// Transactions committed.
    pub committed: u64,
    /// Transactions aborted.
    pub aborted: u64,
    /// Consistency conflicts observed.
    pub conflicts: u64,
    /// Transactional reads.
    pub reads: u64,
    /// Transactional writes.
    pub writes: u64,
}
