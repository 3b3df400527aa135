use std::fmt;
use std::io::Write;
use std::sync::atomic::{AtomicU64, Ordering};

use parking_lot::Mutex;

use crate::{
    error::Result,
    helpers::ratio,
    scan::BlockScan,
    skip::SkipPolicy,
    types::SourcedBlock,
};

/// Running counters over a block stream.
///
/// Each field is an independently-updated atomic: increments use relaxed
/// ordering and no cross-counter guarantee is made mid-run. The driver's
/// join barrier is what makes the final read in [`snapshot`](Counters::snapshot)
/// observe every increment.
#[derive(Debug, Default)]
struct Counters {
    transactions: AtomicU64,
    inputs: AtomicU64,
    outputs: AtomicU64,
    version1: AtomicU64,
    version2: AtomicU64,
    locktimes_gt0: AtomicU64,
}

impl Counters {
    fn snapshot(&self) -> StatsReport {
        StatsReport {
            transactions: self.transactions.load(Ordering::Relaxed),
            inputs: self.inputs.load(Ordering::Relaxed),
            outputs: self.outputs.load(Ordering::Relaxed),
            version1: self.version1.load(Ordering::Relaxed),
            version2: self.version2.load(Ordering::Relaxed),
            locktimes_gt0: self.locktimes_gt0.load(Ordering::Relaxed),
        }
    }
}

/// Final counter values of a stats pass.
///
/// Ratios are plain floating-point divisions by the transaction count; a
/// report over zero transactions yields NaN or infinity, and rendering such
/// a report is still well-defined.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatsReport {
    pub transactions: u64,
    pub inputs: u64,
    pub outputs: u64,
    pub version1: u64,
    pub version2: u64,
    pub locktimes_gt0: u64,
}

impl StatsReport {
    /// Inputs per transaction.
    pub fn input_ratio(&self) -> f64 {
        ratio(self.inputs, self.transactions)
    }

    /// Outputs per transaction.
    pub fn output_ratio(&self) -> f64 {
        ratio(self.outputs, self.transactions)
    }

    /// Share of transactions tagged version 1.
    pub fn version1_ratio(&self) -> f64 {
        ratio(self.version1, self.transactions)
    }

    /// Share of transactions tagged version 2.
    pub fn version2_ratio(&self) -> f64 {
        ratio(self.version2, self.transactions)
    }

    /// Share of transactions with a locktime greater than zero.
    pub fn locktime_ratio(&self) -> f64 {
        ratio(self.locktimes_gt0, self.transactions)
    }
}

impl fmt::Display for StatsReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Transactions:\t{}", self.transactions)?;
        writeln!(f, "-- Inputs:\t{} (ratio {}) ", self.inputs, self.input_ratio())?;
        writeln!(
            f,
            "-- Outputs:\t{} (ratio {}) ",
            self.outputs,
            self.output_ratio()
        )?;
        writeln!(
            f,
            "-- Version1:\t{} ({}%) ",
            self.version1,
            self.version1_ratio() * 100.0
        )?;
        writeln!(
            f,
            "-- Version2:\t{} ({}%) ",
            self.version2,
            self.version2_ratio() * 100.0
        )?;
        writeln!(
            f,
            "-- Locktimes (>0):\t{} ({}%) ",
            self.locktimes_gt0,
            self.locktime_ratio() * 100.0
        )?;
        writeln!(f)
    }
}

/// Scan pass accumulating transaction statistics across the whole stream.
///
/// `process` only ever increments; nothing is decremented or reset during a
/// run. The pass renders its report to the sink once, at `finalize`.
pub struct StatsDump<P, W> {
    policy: P,
    counters: Counters,
    sink: Mutex<W>,
}

impl<P, W> StatsDump<P, W>
where
    P: SkipPolicy,
    W: Write + Send,
{
    /// Creates a stats pass reporting to `sink` at finalize.
    pub fn new(policy: P, sink: W) -> Self {
        Self {
            policy,
            counters: Counters::default(),
            sink: Mutex::new(sink),
        }
    }

    /// Reads the current counter values.
    ///
    /// Meaningful once all `process` calls have completed; mid-run snapshots
    /// may observe a partially-applied block.
    pub fn snapshot(&self) -> StatsReport {
        self.counters.snapshot()
    }

    /// Consumes the pass and returns the report sink.
    pub fn into_sink(self) -> W {
        self.sink.into_inner()
    }
}

impl<P, W> BlockScan for StatsDump<P, W>
where
    P: SkipPolicy,
    W: Write + Send,
{
    fn process(&self, block: &SourcedBlock) -> Result<()> {
        if self.policy.should_skip(block) {
            return Ok(());
        }

        let txdata = &block.block.txdata;
        self.counters
            .transactions
            .fetch_add(txdata.len() as u64, Ordering::Relaxed);

        for tx in txdata {
            self.counters
                .inputs
                .fetch_add(tx.input.len() as u64, Ordering::Relaxed);
            self.counters
                .outputs
                .fetch_add(tx.output.len() as u64, Ordering::Relaxed);

            if tx.version.0 == 1 {
                self.counters.version1.fetch_add(1, Ordering::Relaxed);
            }
            if tx.version.0 == 2 {
                self.counters.version2.fetch_add(1, Ordering::Relaxed);
            }
            if tx.lock_time.to_consensus_u32() > 0 {
                self.counters.locktimes_gt0.fetch_add(1, Ordering::Relaxed);
            }
        }

        Ok(())
    }

    fn finalize(&self) -> Result<()> {
        let report = self.snapshot();
        let mut sink = self.sink.lock();
        write!(sink, "{report}")?;
        sink.flush()?;
        Ok(())
    }
}
