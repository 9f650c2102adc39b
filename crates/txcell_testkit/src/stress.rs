//! Stress harnesses for concurrent transaction workloads.
//!
//! These drive many threads through `Context::run` retry loops and report
//! how much conflict traffic the run produced. Callers assert the workload
//! invariant afterwards (counter totals, conservation laws) through the
//! bank's quiescent accessors.

use crate::fixtures::CellBank;
use std::thread;
use std::time::{Duration, Instant};
use txcell_core::Context;

/// Result of a stress run.
#[derive(Debug, Clone)]
pub struct StressResult {
    /// Transactions committed by the run.
    pub committed: usize,
    /// Conflicts hit (and retried through) along the way.
    pub conflicts: u64,
    /// Total duration.
    pub duration: Duration,
    /// Commits per second.
    pub commits_per_second: f64,
}

impl StressResult {
    /// Creates a new result.
    #[must_use]
    pub fn new(committed: usize, conflicts: u64, duration: Duration) -> Self {
        let commits_per_second = if duration.as_secs_f64() > 0.0 {
            committed as f64 / duration.as_secs_f64()
        } else {
            0.0
        };

        Self {
            committed,
            conflicts,
            duration,
            commits_per_second,
        }
    }

    /// Prints a summary of the run.
    pub fn print_summary(&self, name: &str) {
        println!("\n=== {} ===", name);
        println!("Committed: {}", self.committed);
        println!("Conflicts: {}", self.conflicts);
        println!("Duration: {:?}", self.duration);
        println!("Throughput: {:.2} commits/sec", self.commits_per_second);
    }
}

/// Configuration for stress runs.
#[derive(Debug, Clone)]
pub struct StressConfig {
    /// Number of concurrent threads.
    pub threads: usize,
    /// Transactions per thread.
    pub ops_per_thread: usize,
}

impl Default for StressConfig {
    fn default() -> Self {
        Self {
            threads: 4,
            ops_per_thread: 1_000,
        }
    }
}

/// Runs concurrent counter increments spread across the bank.
///
/// Every operation increments one cell by 1, so afterwards the bank total
/// equals the committed count (plus whatever the bank held before).
pub fn stress_increments(ctx: &Context, bank: &CellBank, config: &StressConfig) -> StressResult {
    let conflicts_before = ctx.stats().conflicts();
    let start = Instant::now();

    thread::scope(|s| {
        for t in 0..config.threads {
            s.spawn(move || {
                for i in 0..config.ops_per_thread {
                    let cell = bank.cell((t + i) % bank.len());
                    ctx.run(|txn| {
                        let n = txn.read(cell)?;
                        txn.write(cell, n.as_usize() + 1)
                    });
                }
            });
        }
    });

    StressResult::new(
        config.threads * config.ops_per_thread,
        ctx.stats().conflicts() - conflicts_before,
        start.elapsed(),
    )
}

/// Runs concurrent transfers between pseudo-randomly chosen cells.
///
/// A transfer moves a small amount from one cell to another inside a
/// single transaction, skipping underfunded sources, so the bank total is
/// invariant across the whole run.
pub fn stress_transfers(ctx: &Context, bank: &CellBank, config: &StressConfig) -> StressResult {
    let conflicts_before = ctx.stats().conflicts();
    let start = Instant::now();

    thread::scope(|s| {
        for t in 0..config.threads {
            s.spawn(move || {
                for i in 0..config.ops_per_thread {
                    let src = (t * 5 + i * 3) % bank.len();
                    let dst = (t * 7 + i * 11 + 1) % bank.len();
                    if src == dst {
                        continue;
                    }
                    let amount = 1 + i % 5;
                    ctx.run(|txn| {
                        let from = txn.read(bank.cell(src))?.as_usize();
                        if from >= amount {
                            let to = txn.read(bank.cell(dst))?.as_usize();
                            txn.write(bank.cell(src), from - amount)?;
                            txn.write(bank.cell(dst), to + amount)?;
                        }
                        Ok(())
                    });
                }
            });
        }
    });

    StressResult::new(
        config.threads * config.ops_per_thread,
        ctx.stats().conflicts() - conflicts_before,
        start.elapsed(),
    )
}
