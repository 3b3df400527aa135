use crate::types::{Height, SourcedBlock};

/// Per-block predicate deciding whether a scan pass excludes a block.
///
/// Policies are consulted by each scan independently, before any side effect
/// for the block; a skipped block leaves counters and output untouched.
pub trait SkipPolicy: Send + Sync {
    /// Returns true when the block must not be processed.
    fn should_skip(&self, block: &SourcedBlock) -> bool;
}

/// Policy that processes every block.
#[derive(Debug, Clone, Copy, Default)]
pub struct SkipNone;

impl SkipPolicy for SkipNone {
    fn should_skip(&self, _block: &SourcedBlock) -> bool {
        false
    }
}

/// Inclusive height window.
///
/// An unbounded window never skips. A bounded window skips blocks outside the
/// range, and blocks whose height the source could not resolve (membership
/// cannot be established for them).
#[derive(Debug, Clone, Copy, Default)]
pub struct HeightWindow {
    min: Option<Height>,
    max: Option<Height>,
}

impl HeightWindow {
    /// Builds a window from optional inclusive bounds.
    pub fn new(min: Option<Height>, max: Option<Height>) -> Self {
        Self { min, max }
    }

    fn is_bounded(&self) -> bool {
        self.min.is_some() || self.max.is_some()
    }
}

impl SkipPolicy for HeightWindow {
    fn should_skip(&self, block: &SourcedBlock) -> bool {
        if !self.is_bounded() {
            return false;
        }

        let Some(height) = block.height else {
            return true;
        };

        self.min.is_some_and(|min| height < min) || self.max.is_some_and(|max| height > max)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bitcoin::{
        block::{Header as BlockHeader, Version as BlockVersion},
        hashes::Hash,
        pow::CompactTarget,
        Block, BlockHash, TxMerkleNode,
    };

    fn block_at(height: Option<Height>) -> SourcedBlock {
        let header = BlockHeader {
            version: BlockVersion::TWO,
            prev_blockhash: BlockHash::all_zeros(),
            merkle_root: TxMerkleNode::all_zeros(),
            time: 0,
            bits: CompactTarget::default(),
            nonce: 0,
        };
        SourcedBlock::new(
            height,
            Block {
                header,
                txdata: vec![],
            },
        )
    }

    #[test]
    fn skip_none_processes_everything() {
        assert!(!SkipNone.should_skip(&block_at(Some(0))));
        assert!(!SkipNone.should_skip(&block_at(None)));
    }

    #[test]
    fn unbounded_window_processes_unknown_heights() {
        let window = HeightWindow::default();
        assert!(!window.should_skip(&block_at(None)));
        assert!(!window.should_skip(&block_at(Some(123))));
    }

    #[test]
    fn bounded_window_is_inclusive() {
        let window = HeightWindow::new(Some(100), Some(200));
        assert!(window.should_skip(&block_at(Some(99))));
        assert!(!window.should_skip(&block_at(Some(100))));
        assert!(!window.should_skip(&block_at(Some(200))));
        assert!(window.should_skip(&block_at(Some(201))));
    }

    #[test]
    fn half_open_bounds_apply_independently() {
        let min_only = HeightWindow::new(Some(50), None);
        assert!(min_only.should_skip(&block_at(Some(49))));
        assert!(!min_only.should_skip(&block_at(Some(u32::MAX))));

        let max_only = HeightWindow::new(None, Some(50));
        assert!(!max_only.should_skip(&block_at(Some(0))));
        assert!(max_only.should_skip(&block_at(Some(51))));
    }

    #[test]
    fn bounded_window_skips_unresolved_heights() {
        let window = HeightWindow::new(Some(0), None);
        assert!(window.should_skip(&block_at(None)));
    }
}
