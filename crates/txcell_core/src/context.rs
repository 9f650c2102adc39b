//! Transactional contexts.

use crate::config::Config;
use crate::error::{ConsistencyError, TxResult};
use crate::stats::ContextStats;
use crate::table::OrecTable;
use crate::transaction::Transaction;
use crate::types::TransactionId;
use std::sync::atomic::{AtomicUsize, Ordering};
use tracing::debug;

/// A universe of transactional state: one orec table plus the identity
/// allocator and stats shared by every transaction begun against it.
///
/// Transactions in distinct contexts never observe each other, even when
/// they touch the same cells; conflict detection happens entirely inside
/// one context's orec table. A context must outlive every descriptor bound
/// to it, which the borrow held by [`Transaction`] enforces.
///
/// Contexts are cheap to share: hand `&Context` to as many threads as
/// needed and begin one descriptor per thread of work.
#[derive(Debug)]
pub struct Context {
    orecs: OrecTable,
    next_id: AtomicUsize,
    stats: ContextStats,
}

impl Default for Context {
    fn default() -> Self {
        Self::new()
    }
}

impl Context {
    /// Creates a context with the default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::with_config(Config::default())
    }

    /// Creates a context with `config`.
    ///
    /// The orec slot count is rounded up to a power of two.
    #[must_use]
    pub fn with_config(config: Config) -> Self {
        let orecs = OrecTable::with_slots(config.orec_slots);
        debug!(slots = orecs.len(), "context created");
        Self {
            orecs,
            next_id: AtomicUsize::new(TransactionId::FIRST.as_usize()),
            stats: ContextStats::new(),
        }
    }

    /// Starts a transaction bound to this context.
    #[must_use]
    pub fn begin(&self) -> Transaction<'_> {
        Transaction::new(self)
    }

    /// Runs `f` transactionally, retrying on conflict until a commit
    /// succeeds.
    ///
    /// Every attempt gets a fresh descriptor. A [`ConsistencyError`]
    /// surfacing from the closure or from commit abandons the attempt
    /// (the descriptor aborts on drop) and starts over; any value the
    /// closure returns is handed back once its attempt commits.
    ///
    /// The closure may run many times, so it must stay free of side
    /// effects other than its transactional reads and writes. Retrying is
    /// unbounded: under pathological contention two callers can defeat
    /// each other repeatedly, and `run` adds no fairness on top of the
    /// underlying protocol.
    ///
    /// # Example
    /// ```
    /// use txcell_core::{Context, TxCell, Word};
    ///
    /// let ctx = Context::new();
    /// let counter = TxCell::new(0usize);
    ///
    /// let seen = ctx.run(|txn| {
    ///     let n = txn.read(&counter)?;
    ///     txn.write(&counter, n.as_usize() + 1)?;
    ///     Ok(n)
    /// });
    ///
    /// assert_eq!(seen, Word::new(0));
    /// assert_eq!(counter.value(), Word::new(1));
    /// ```
    pub fn run<'c, T>(&'c self, mut f: impl FnMut(&mut Transaction<'c>) -> TxResult<T>) -> T {
        loop {
            let mut txn = self.begin();
            let attempt = match f(&mut txn) {
                Ok(value) => txn.commit().map(|()| value),
                Err(err) => Err(err),
            };
            match attempt {
                Ok(value) => return value,
                Err(ConsistencyError) => continue,
            }
        }
    }

    /// Statistics over every transaction begun against this context.
    #[must_use]
    pub fn stats(&self) -> &ContextStats {
        &self.stats
    }

    pub(crate) fn orecs(&self) -> &OrecTable {
        &self.orecs
    }

    pub(crate) fn allocate_id(&self) -> TransactionId {
        TransactionId::new(self.next_id.fetch_add(TransactionId::STEP, Ordering::Relaxed))
    }
}
