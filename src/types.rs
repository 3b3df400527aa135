use bitcoin::Block;

/// Satoshi value type (unsigned 64-bit integer).
pub type Amount = u64;

/// Block height type (unsigned 32-bit integer).
pub type Height = u32;

/// Sentinel height written for blocks whose height could not be resolved.
pub const HEIGHT_UNKNOWN: Height = 0xffff_ffff;

/// A block paired with the height the block source resolved for it.
///
/// `bitcoin::Block` does not carry its own height; the source that decodes
/// the stream is responsible for resolving one (or passing `None` when the
/// block cannot be placed in the chain).
#[derive(Debug, Clone)]
pub struct SourcedBlock {
    /// Resolved height, if the source could determine one.
    pub height: Option<Height>,
    /// The decoded block.
    pub block: Block,
}

impl SourcedBlock {
    /// Pairs a decoded block with its resolved height.
    pub fn new(height: Option<Height>, block: Block) -> Self {
        Self { height, block }
    }

    /// Returns the resolved height, or [`HEIGHT_UNKNOWN`] when there is none.
    pub fn height_or_unknown(&self) -> Height {
        self.height.unwrap_or(HEIGHT_UNKNOWN)
    }
}
