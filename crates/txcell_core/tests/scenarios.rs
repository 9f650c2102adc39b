//! End-to-end transaction scenarios, including multi-threaded contention.

use txcell_core::{
    ConsistencyError, Context, Snapshot, TransactionState, TxCell, TxResult, Version, Word,
};
use std::sync::Barrier;
use std::thread;

#[test]
fn read_write_single_transaction() {
    let ctx = Context::new();
    let x = TxCell::new(20usize);
    let y = TxCell::new(200usize);
    let mut txn = ctx.begin();

    assert_eq!(txn.read(&x).unwrap(), Word::new(20));
    let index = txn.ensure(&x).unwrap();
    assert_eq!(
        txn.entry(index).old_snapshot(),
        Snapshot::new(Word::new(20), Version::new(1))
    );
    assert_eq!(txn.entry(index).new_snapshot(), txn.entry(index).old_snapshot());

    txn.write(&x, 30usize).unwrap();
    assert_eq!(txn.read(&x).unwrap(), Word::new(30));
    assert_eq!(txn.entry(index).new_snapshot().version, Version::new(3));

    txn.write(&x, 40usize).unwrap();
    let entry = *txn.entry(index);
    assert_eq!(entry.old_snapshot(), Snapshot::new(Word::new(20), Version::new(1)));
    assert_eq!(entry.new_snapshot(), Snapshot::new(Word::new(40), Version::new(5)));
    assert_eq!(txn.log_len(), 1);

    txn.write(&y, 210usize).unwrap();
    assert_eq!(txn.log_len(), 2);

    txn.commit().unwrap();
    assert_eq!(x.value(), Word::new(40));
    assert_eq!(y.value(), Word::new(210));

    // The record advanced to the final write's version.
    let mut after = ctx.begin();
    let index = after.ensure(&x).unwrap();
    assert_eq!(after.entry(index).old_snapshot().version, Version::new(5));
}

#[test]
fn commit_publishes() {
    let ctx = Context::new();
    let x = TxCell::new(10usize);

    let mut txn = ctx.begin();
    txn.write(&x, 20usize).unwrap();
    assert_eq!(x.value(), Word::new(10));
    txn.commit().unwrap();
    assert_eq!(x.value(), Word::new(20));
}

#[test]
fn abort_discards() {
    let ctx = Context::new();
    let x = TxCell::new(10usize);

    let mut txn = ctx.begin();
    txn.write(&x, 20usize).unwrap();
    assert_eq!(x.value(), Word::new(10));
    txn.abort();
    assert_eq!(x.value(), Word::new(10));
}

#[test]
fn write_write_conflict_has_one_winner() {
    let ctx = Context::new();
    let x = TxCell::new(10usize);

    let mut t1 = ctx.begin();
    let mut t2 = ctx.begin();

    t1.write(&x, 20usize).unwrap();
    t2.write(&x, 30usize).unwrap();
    assert_eq!(t1.read(&x).unwrap(), Word::new(20));
    assert_eq!(t2.read(&x).unwrap(), Word::new(30));

    t1.commit().unwrap();
    assert_eq!(x.value(), Word::new(20));

    assert_eq!(t2.commit(), Err(ConsistencyError));
    assert_eq!(x.value(), Word::new(20));
}

#[test]
fn acquire_time_contention_rejects_newcomers() {
    let ctx = Context::new();
    let x = TxCell::new(10usize);

    let mut t1 = ctx.begin();
    t1.write(&x, 20usize).unwrap();

    // Phase one done, phase two pending: t1 owns the record.
    assert!(t1.acquire_all());

    let mut t2 = ctx.begin();
    assert_eq!(t2.write(&x, 20usize), Err(ConsistencyError));

    assert_eq!(x.value(), Word::new(10));
    t1.make_all_changes();
    assert_eq!(x.value(), Word::new(20));
    assert_eq!(t1.state(), TransactionState::Committed);
}

#[test]
fn independent_cells_commit_together() {
    let ctx = Context::new();
    let x = TxCell::new(20usize);
    let y = TxCell::new(200usize);

    let mut txn = ctx.begin();
    assert_eq!(txn.read(&x).unwrap(), Word::new(20));
    txn.write(&y, 210usize).unwrap();
    assert_eq!(txn.log_len(), 2);

    txn.commit().unwrap();
    assert_eq!(x.value(), Word::new(20));
    assert_eq!(y.value(), Word::new(210));
}

#[test]
fn racing_commits_have_exactly_one_winner() {
    let ctx = Context::new();
    let x = TxCell::new(0usize);
    let barrier = Barrier::new(2);

    let outcomes: Vec<TxResult<()>> = thread::scope(|s| {
        let handles: Vec<_> = (0..2usize)
            .map(|i| {
                let ctx = &ctx;
                let x = &x;
                let barrier = &barrier;
                s.spawn(move || -> TxResult<()> {
                    let mut txn = ctx.begin();
                    txn.read(x)?;
                    txn.write(x, 100 + i)?;
                    // Both snapshots are taken before either commit starts.
                    barrier.wait();
                    txn.commit()
                })
            })
            .collect();
        handles.into_iter().map(|h| h.join().unwrap()).collect()
    });

    let winners: Vec<usize> = (0..outcomes.len())
        .filter(|&i| outcomes[i].is_ok())
        .collect();
    assert_eq!(winners.len(), 1);
    assert_eq!(x.value(), Word::new(100 + winners[0]));
}

#[test]
fn contended_increments_all_land() {
    let ctx = Context::new();
    let counter = TxCell::new(0usize);

    thread::scope(|s| {
        for _ in 0..4 {
            let ctx = &ctx;
            let counter = &counter;
            s.spawn(move || {
                for _ in 0..100 {
                    ctx.run(|txn| {
                        let n = txn.read(counter)?;
                        txn.write(counter, n.as_usize() + 1)
                    });
                }
            });
        }
    });

    assert_eq!(counter.value(), Word::new(400));
    let stats = ctx.stats();
    assert_eq!(stats.committed(), 400);
    // Every conflicted attempt was aborted and retried.
    assert_eq!(stats.started(), stats.committed() + stats.aborted());
}

#[test]
fn concurrent_transfers_conserve_the_total() {
    let ctx = Context::new();
    let cells: Vec<TxCell> = (0..8).map(|_| TxCell::new(1_000usize)).collect();

    thread::scope(|s| {
        for t in 0..4usize {
            let ctx = &ctx;
            let cells = &cells;
            s.spawn(move || {
                for i in 0..200usize {
                    let src = (t * 5 + i * 3) % cells.len();
                    let dst = (t * 7 + i * 11 + 1) % cells.len();
                    if src == dst {
                        continue;
                    }
                    let amount = 1 + i % 7;
                    ctx.run(|txn| {
                        let from = txn.read(&cells[src])?.as_usize();
                        if from >= amount {
                            let to = txn.read(&cells[dst])?.as_usize();
                            txn.write(&cells[src], from - amount)?;
                            txn.write(&cells[dst], to + amount)?;
                        }
                        Ok(())
                    });
                }
            });
        }
    });

    let total: usize = cells.iter().map(|c| c.value().as_usize()).sum();
    assert_eq!(total, 8_000);
}

#[test]
fn stats_track_transaction_outcomes() {
    let ctx = Context::new();
    let x = TxCell::new(0usize);

    ctx.run(|txn| txn.write(&x, 1usize));

    let mut loser = ctx.begin();
    loser.read(&x).unwrap();

    let mut winner = ctx.begin();
    winner.write(&x, 2usize).unwrap();
    winner.commit().unwrap();

    assert_eq!(loser.commit(), Err(ConsistencyError));
    drop(loser);

    let snap = ctx.stats().snapshot();
    assert_eq!(snap.started, 3);
    assert_eq!(snap.committed, 2);
    assert_eq!(snap.aborted, 1);
    assert_eq!(snap.conflicts, 1);
    assert_eq!(snap.reads, 1);
    assert_eq!(snap.writes, 2);
}
