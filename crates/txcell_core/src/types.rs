//! Core type definitions for TxCell.

use std::fmt;

/// An opaque machine-word-sized value.
///
/// The library never interprets a word; it only moves words between
/// transacted cells and transaction logs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Word(usize);

impl Word {
    /// Creates a word from a raw value.
    #[must_use]
    pub const fn new(value: usize) -> Self {
        Self(value)
    }

    /// Returns the raw value.
    #[must_use]
    pub const fn as_usize(self) -> usize {
        self.0
    }
}

impl From<usize> for Word {
    fn from(value: usize) -> Self {
        Self(value)
    }
}

impl fmt::Display for Word {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Unique identifier for a live transaction.
///
/// Identities are strictly positive and **even**, so a single orec word can
/// tell an owner apart from a version by its low bit alone. A context
/// allocates them from a monotonic counter (2, 4, 6, ...) and never reuses
/// one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TransactionId(usize);

impl TransactionId {
    /// The first identity a context hands out.
    pub const FIRST: Self = Self(2);

    /// Distance between consecutive identities; keeps them even.
    pub const STEP: usize = 2;

    /// Creates a transaction identity from a raw even value.
    #[must_use]
    pub const fn new(id: usize) -> Self {
        debug_assert!(id != 0 && id % 2 == 0);
        Self(id)
    }

    /// Returns the raw token value.
    #[must_use]
    pub const fn as_usize(self) -> usize {
        self.0
    }

    /// Returns the identity a context hands out after this one.
    #[must_use]
    pub const fn next(self) -> Self {
        Self(self.0 + Self::STEP)
    }
}

impl fmt::Display for TransactionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "txn:{}", self.0)
    }
}

/// Version label stamped on an orec slot by a successful commit.
///
/// Versions are strictly positive and **odd**: the initial version is 1 and
/// every committed write advances the slot by [`Version::STEP`], keeping
/// the low bit set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Version(usize);

impl Version {
    /// The version of an orec slot no transaction has committed to yet.
    pub const FIRST: Self = Self(1);

    /// Distance between consecutive committed versions.
    pub const STEP: usize = 2;

    /// Creates a version from a raw odd value.
    #[must_use]
    pub const fn new(version: usize) -> Self {
        debug_assert!(version % 2 == 1);
        Self(version)
    }

    /// Returns the raw version value.
    #[must_use]
    pub const fn as_usize(self) -> usize {
        self.0
    }

    /// Returns the version one further commit would advance the slot to.
    #[must_use]
    pub const fn bump(self) -> Self {
        Self(self.0 + Self::STEP)
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "v:{}", self.0)
    }
}

/// A `(value, version)` pair captured from a cell together with its orec at
/// a moment in time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Snapshot {
    /// The word read from the cell.
    pub value: Word,
    /// The orec version observed at the moment of reading.
    pub version: Version,
}

impl Snapshot {
    /// Creates a snapshot.
    #[must_use]
    pub const fn new(value: Word, version: Version) -> Self {
        Self { value, version }
    }
}
