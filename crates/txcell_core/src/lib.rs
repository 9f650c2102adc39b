//! # TxCell Core
//!
//! Word-granularity software transactional memory.
//!
//! This crate provides:
//! - [`TxCell`]: word-sized shared memory locations
//! - [`Transaction`]: per-thread read/write logs with two-phase commit
//! - [`Context`]: the shared ownership-record table transactions
//!   synchronize through
//! - Optimistic conflict detection via per-record version words and
//!   single-word compare-and-swap
//!
//! ## Model
//!
//! Every transacted cell is shadowed by an ownership record ("orec") in
//! its context's fixed table. An orec word is either an odd *version* —
//! the label left by the last commit that touched the record — or the even
//! *identity* of the transaction currently committing through it.
//!
//! Reads capture `(value, version)` snapshots into the transaction's log;
//! writes stay in the log too, advancing the entry's prospective version.
//! Commit acquires every touched record with a CAS keyed on the captured
//! version, publishes the new words, and releases the records at their
//! stepped versions. Any interleaved commit makes a CAS miss and fails the
//! whole transaction with [`ConsistencyError`] — conflicts are detected,
//! never blocked on.
//!
//! Failure is expected traffic: retry with a fresh transaction, or let
//! [`Context::run`] loop for you.
//!
//! ```
//! use txcell_core::{Context, TxCell};
//!
//! let ctx = Context::new();
//! let balance = TxCell::new(100usize);
//! let audit = TxCell::new(0usize);
//!
//! ctx.run(|txn| {
//!     let cur = txn.read(&balance)?;
//!     txn.write(&balance, cur.as_usize() - 30)?;
//!     txn.write(&audit, 1usize)
//! });
//!
//! assert_eq!(balance.value().as_usize(), 70);
//! assert_eq!(audit.value().as_usize(), 1);
//! ```
//!
//! ## Sharing model
//!
//! Descriptors are single-threaded; the context is the shared object.
//! Threads race whole commits, never individual loads, so a torn mix of
//! two transactions' writes is impossible. Two cells can hash to the same
//! orec slot, in which case they contend as if they were one location —
//! false sharing by design, traded for a fixed-size table.
//!
//! Plain (non-transactional) access through [`TxCell::value`] bypasses
//! conflict detection and pairs with no version; use it only on quiescent
//! cells.

#![deny(unsafe_code)]
#![warn(missing_docs)]

mod cell;
mod config;
mod context;
mod error;
mod orec;
mod stats;
mod table;
mod transaction;
mod types;

pub use cell::TxCell;
pub use config::Config;
pub use context::Context;
pub use error::{ConsistencyError, TxResult};
pub use stats::{ContextStats, StatsSnapshot};
pub use transaction::{LogEntry, Transaction, TransactionState};
pub use types::{Snapshot, TransactionId, Version, Word};
