//! Error types for TxCell core.

use thiserror::Error;

/// Result type for transactional operations.
pub type TxResult<T> = Result<T, ConsistencyError>;

/// The transaction cannot linearize with the observed history.
///
/// Raised from two places: a read or write whose first touch of a cell
/// finds the cell's orec owned by a peer transaction mid-commit, and a
/// commit whose acquisition phase loses a race. In both cases the
/// descriptor is left active with every touched orec restored; the caller
/// either retries with a fresh transaction or lets the descriptor drop,
/// which aborts it.
///
/// Conflicts are expected traffic under contention, not a programming
/// error; contract violations (for example, reading through a committed
/// descriptor) are asserts instead.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("transaction conflict: concurrent ownership observed")]
pub struct ConsistencyError;
