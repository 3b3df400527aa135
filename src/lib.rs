//! # blockscan
//!
//! Streaming scan passes over raw Bitcoin block data: a binary
//! **output-value dump** (one fixed 12-byte height/value record per
//! transaction output) and a **transaction statistics** pass (running
//! counters with an end-of-run ratio report).
//!
//! ## Overview
//!
//! This library is block source-agnostic: any driver that can hand it
//! [`SourcedBlock`] values (decoded blocks paired with a resolved height)
//! can run the passes, sequentially or from a pool of worker threads. A
//! reader for raw `blk*.dat` streams and a height resolver are included for
//! the common case.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use std::{fs::File, io::BufReader, sync::Arc};
//! use blockscan::{
//!     run_parallel, BlockScan, DatReader, HeightTracker, ScanConfig, SkipNone, StatsDump,
//! };
//!
//! let config = ScanConfig::MAINNET;
//! let reader = DatReader::new(BufReader::new(File::open("blk00000.dat")?), config);
//!
//! let mut tracker = HeightTracker::new();
//! let blocks = reader.map(move |block| block.map(|b| tracker.source(b)));
//!
//! let stats = Arc::new(StatsDump::new(SkipNone, std::io::stdout()));
//! let scans: Vec<Arc<dyn BlockScan>> = vec![stats];
//! run_parallel(blocks, &scans, 0)?;
//! ```

/// Per-network stream framing parameters.
pub mod config;
/// Scan pass dumping height/value records for every transaction output.
pub mod emitter;
/// Error types shared across the crate.
pub mod error;
mod helpers;
/// The scan pass contract driven by a block source.
pub mod scan;
/// Per-block skip policies.
pub mod skip;
/// Block stream decoding, height resolution, and scan drivers.
pub mod source;
/// Scan pass accumulating transaction statistics.
pub mod stats;
/// Core types shared by the scan passes.
pub mod types;

pub use config::{ScanConfig, ScanNetwork};
pub use emitter::OutputValueDump;
pub use error::{Result, ScanError};
pub use helpers::{decode_record, encode_record, RECORD_SIZE};
pub use scan::BlockScan;
pub use skip::{HeightWindow, SkipNone, SkipPolicy};
pub use source::{run_parallel, run_sequential, DatReader, HeightTracker};
pub use stats::{StatsDump, StatsReport};
pub use types::{Amount, Height, SourcedBlock, HEIGHT_UNKNOWN};
