use crate::error::Result;
use crate::types::SourcedBlock;

/// Abstraction over one scan pass driven by a block source.
///
/// A source calls [`process`](Self::process) once per block, in the order
/// blocks are produced, possibly from several worker threads at once.
/// Implementations therefore keep their mutable state behind atomics or a
/// lock and take `&self`.
///
/// [`finalize`](Self::finalize) must be called exactly once, and only after
/// every `process` call has returned across all threads; the join barrier
/// that orders the two is owned by the driver, not by implementations. After
/// `finalize` a scan is terminal and receives no further calls.
pub trait BlockScan: Send + Sync {
    /// Consumes one block, producing the scan's side effect for it.
    fn process(&self, block: &SourcedBlock) -> Result<()>;

    /// Flushes or reports once the block stream is exhausted. The default
    /// does nothing.
    fn finalize(&self) -> Result<()> {
        Ok(())
    }
}
