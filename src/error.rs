use thiserror::Error;

/// Errors surfaced while decoding a block stream or writing scan output.
#[derive(Debug, Error)]
pub enum ScanError {
    /// Reading the block stream or writing to a scan sink failed. Output
    /// sinks cannot produce a valid partial result, so this aborts the run.
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),

    /// The stream contained bytes that do not consensus-decode into a block.
    #[error("block decode failed: {0}")]
    Decode(#[from] bitcoin::consensus::encode::Error),

    /// The stream carried a frame with the wrong network magic.
    #[error("unexpected network magic {0:02x?}")]
    BadMagic([u8; 4]),

    /// A frame's length prefix exceeded the configured maximum block size.
    #[error("block length prefix of {0} bytes exceeds the configured maximum")]
    OversizedBlock(usize),

    /// The worker thread pool could not be constructed.
    #[error("thread pool: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),
}

/// Convenience alias used across the crate.
pub type Result<T> = std::result::Result<T, ScanError>;
