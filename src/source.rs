use std::collections::HashMap;
use std::io::{self, Read};
use std::sync::Arc;

use bitcoin::{consensus, hashes::Hash, Block, BlockHash};
use rayon::iter::{ParallelBridge, ParallelIterator};
use tracing::{debug, warn};

use crate::{
    config::ScanConfig,
    error::{Result, ScanError},
    scan::BlockScan,
    types::{Height, SourcedBlock},
};

/// Iterator over the blocks of a raw `blk*.dat`-style stream.
///
/// Each frame is 4 magic bytes, a little-endian 4-byte length, then one
/// consensus-encoded block. A clean end of stream, or a run of zero bytes
/// where the next magic would be (preallocated `blk` files pad their tail
/// with zeroes), terminates the iterator.
pub struct DatReader<R> {
    reader: R,
    config: ScanConfig,
}

impl<R: Read> DatReader<R> {
    /// Wraps a byte stream framed with `config`'s network magic.
    pub fn new(reader: R, config: ScanConfig) -> Self {
        Self { reader, config }
    }

    fn read_frame(&mut self) -> Result<Option<Block>> {
        let mut magic = [0u8; 4];
        match self.reader.read_exact(&mut magic) {
            Ok(()) => {}
            Err(err) if err.kind() == io::ErrorKind::UnexpectedEof => return Ok(None),
            Err(err) => return Err(err.into()),
        }

        if magic == [0u8; 4] {
            return Ok(None);
        }
        if magic != self.config.magic {
            return Err(ScanError::BadMagic(magic));
        }

        let mut len_bytes = [0u8; 4];
        self.reader.read_exact(&mut len_bytes)?;
        let len = u32::from_le_bytes(len_bytes) as usize;
        if len > self.config.max_block_bytes {
            return Err(ScanError::OversizedBlock(len));
        }

        let mut raw = vec![0u8; len];
        self.reader.read_exact(&mut raw)?;
        Ok(Some(consensus::deserialize(&raw)?))
    }
}

impl<R: Read> Iterator for DatReader<R> {
    type Item = Result<Block>;

    fn next(&mut self) -> Option<Self::Item> {
        self.read_frame().transpose()
    }
}

/// Resolves block heights by chaining `prev_blockhash` links.
///
/// A block whose parent hash is all zeroes is the genesis block (height 0).
/// A block whose parent has already been seen sits one above it. Anything
/// else is unplaceable unless an anchor height was configured for the first
/// such block.
#[derive(Debug, Default)]
pub struct HeightTracker {
    heights: HashMap<BlockHash, Height>,
    anchor: Option<Height>,
}

impl HeightTracker {
    /// Tracker that can only place chains starting at genesis.
    pub fn new() -> Self {
        Self::default()
    }

    /// Tracker that assigns `height` to the first block whose parent is
    /// unknown, for streams that start mid-chain.
    pub fn starting_at(height: Height) -> Self {
        Self {
            heights: HashMap::new(),
            anchor: Some(height),
        }
    }

    /// Resolves the height of `block`, remembering it for its descendants.
    pub fn resolve(&mut self, block: &Block) -> Option<Height> {
        let prev = block.header.prev_blockhash;
        let height = if let Some(parent) = self.heights.get(&prev) {
            parent + 1
        } else if prev == BlockHash::all_zeros() {
            0
        } else {
            self.anchor.take()?
        };

        self.heights.insert(block.block_hash(), height);
        Some(height)
    }

    /// Resolves the block's height and pairs the two up.
    pub fn source(&mut self, block: Block) -> SourcedBlock {
        let height = self.resolve(&block);
        if height.is_none() {
            warn!(hash = %block.block_hash(), "block height could not be resolved");
        }
        SourcedBlock::new(height, block)
    }
}

/// Drives every scan over the block stream on the calling thread, then
/// finalizes each scan. The first error aborts the run.
pub fn run_sequential<I>(blocks: I, scans: &[Arc<dyn BlockScan>]) -> Result<()>
where
    I: IntoIterator<Item = Result<SourcedBlock>>,
{
    let mut processed: u64 = 0;
    for block in blocks {
        let block = block?;
        for scan in scans {
            scan.process(&block)?;
        }
        processed += 1;
    }

    debug!(blocks = processed, "block stream exhausted");
    for scan in scans {
        scan.finalize()?;
    }
    Ok(())
}

/// Drives every scan over the block stream from a pool of worker threads.
///
/// Blocks are handed to workers as they are decoded, with no ordering
/// guarantee between blocks on different workers. All workers are joined
/// before any scan is finalized, which is the happens-before barrier the
/// [`BlockScan::finalize`] contract requires. `threads == 0` selects one
/// worker per available core.
pub fn run_parallel<I>(blocks: I, scans: &[Arc<dyn BlockScan>], threads: usize) -> Result<()>
where
    I: IntoIterator<Item = Result<SourcedBlock>> + Send,
    I::IntoIter: Send,
{
    let pool = rayon::ThreadPoolBuilder::new().num_threads(threads).build()?;
    pool.install(|| {
        blocks.into_iter().par_bridge().try_for_each(|block| -> Result<()> {
            let block = block?;
            for scan in scans {
                scan.process(&block)?;
            }
            Ok(())
        })
    })?;

    for scan in scans {
        scan.finalize()?;
    }
    Ok(())
}
