/// Static parameters that describe how a raw block stream is framed on a network.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScanConfig {
    /// Network magic bytes prefixing each block frame in a `blk*.dat` stream.
    pub magic: [u8; 4],
    /// Upper bound accepted for a frame's length prefix, in bytes. Frames
    /// claiming more than this are treated as stream corruption.
    pub max_block_bytes: usize,
}

/// Bitcoin networks whose block streams can be scanned.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScanNetwork {
    Mainnet,
    Testnet4,
    Signet,
    Regtest,
}

impl ScanConfig {
    /// Stream parameters for Bitcoin mainnet.
    pub const MAINNET: Self = Self {
        magic: [0xf9, 0xbe, 0xb4, 0xd9],
        max_block_bytes: 8_000_000,
    };

    /// Stream parameters for Bitcoin testnet4.
    pub const TESTNET4: Self = Self {
        magic: [0x1c, 0x16, 0x3f, 0x28],
        max_block_bytes: 8_000_000,
    };

    /// Stream parameters for Bitcoin signet.
    pub const SIGNET: Self = Self {
        magic: [0x0a, 0x03, 0xcf, 0x40],
        max_block_bytes: 8_000_000,
    };

    /// Stream parameters for Bitcoin regtest.
    pub const REGTEST: Self = Self {
        magic: [0xfa, 0xbf, 0xb5, 0xda],
        max_block_bytes: 8_000_000,
    };

    /// Returns the configuration associated with the provided Bitcoin network.
    pub const fn for_network(network: ScanNetwork) -> Self {
        match network {
            ScanNetwork::Mainnet => Self::MAINNET,
            ScanNetwork::Testnet4 => Self::TESTNET4,
            ScanNetwork::Signet => Self::SIGNET,
            ScanNetwork::Regtest => Self::REGTEST,
        }
    }
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self::MAINNET
    }
}

impl From<ScanNetwork> for ScanConfig {
    fn from(network: ScanNetwork) -> Self {
        Self::for_network(network)
    }
}
