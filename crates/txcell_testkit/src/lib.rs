//! # TxCell Testkit
//!
//! Test utilities for TxCell.
//!
//! This crate provides:
//! - Cell-bank fixtures and contention-shaping context helpers
//! - Property-based test generators using proptest
//! - Stress harnesses for concurrent transaction workloads
//!
//! ## Usage
//!
//! ```rust,ignore
//! use txcell_testkit::prelude::*;
//! use txcell_core::Context;
//!
//! #[test]
//! fn converges_under_contention() {
//!     let ctx = Context::new();
//!     let bank = CellBank::new(8, 0);
//!     let result = stress_increments(&ctx, &bank, &StressConfig::default());
//!     assert_eq!(bank.total(), result.committed);
//! }
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

pub mod fixtures;
pub mod generators;
pub mod stress;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::fixtures::*;
    pub use crate::generators::*;
    pub use crate::stress::*;
}

pub use fixtures::*;
pub use generators::*;
pub use stress::*;
