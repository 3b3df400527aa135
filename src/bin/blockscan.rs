use std::fs::File;
use std::io::{self, BufReader, Read};
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use clap::{Parser, ValueEnum};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use blockscan::{
    run_parallel, run_sequential, BlockScan, DatReader, HeightTracker, HeightWindow,
    OutputValueDump, Result, ScanConfig, ScanNetwork, StatsDump,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum NetworkArg {
    Mainnet,
    Testnet4,
    Signet,
    Regtest,
}

impl From<NetworkArg> for ScanNetwork {
    fn from(network: NetworkArg) -> Self {
        match network {
            NetworkArg::Mainnet => ScanNetwork::Mainnet,
            NetworkArg::Testnet4 => ScanNetwork::Testnet4,
            NetworkArg::Signet => ScanNetwork::Signet,
            NetworkArg::Regtest => ScanNetwork::Regtest,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum ScanKind {
    /// Transaction statistics, reported at end of run.
    Stats,
    /// Binary height/value records, one per transaction output.
    Dump,
}

/// Scan raw Bitcoin block streams.
#[derive(Debug, Parser)]
#[command(name = "blockscan", version, about)]
struct Args {
    /// Raw block file in blk*.dat framing; reads standard input when omitted.
    file: Option<PathBuf>,

    /// Network whose magic frames the stream.
    #[arg(short, long, value_enum, default_value = "mainnet")]
    network: NetworkArg,

    /// Scan passes to run over the stream (repeatable; defaults to stats).
    #[arg(short, long = "scan", value_enum)]
    scans: Vec<ScanKind>,

    /// Lowest block height to process (inclusive).
    #[arg(long)]
    min_height: Option<u32>,

    /// Highest block height to process (inclusive).
    #[arg(long)]
    max_height: Option<u32>,

    /// Height assigned to the first block when the stream starts mid-chain.
    #[arg(long)]
    start_height: Option<u32>,

    /// Worker threads; 1 stays on the calling thread, 0 selects one per core.
    #[arg(short = 'j', long, default_value_t = 1)]
    threads: usize,
}

fn selected_scans(args: &Args, window: HeightWindow) -> Vec<Arc<dyn BlockScan>> {
    let kinds: &[ScanKind] = if args.scans.is_empty() {
        &[ScanKind::Stats]
    } else {
        &args.scans
    };

    kinds
        .iter()
        .map(|kind| match kind {
            ScanKind::Stats => {
                Arc::new(StatsDump::new(window, io::stdout())) as Arc<dyn BlockScan>
            }
            ScanKind::Dump => {
                Arc::new(OutputValueDump::new(window, io::stdout())) as Arc<dyn BlockScan>
            }
        })
        .collect()
}

fn run(args: Args) -> Result<()> {
    let config = ScanConfig::from(ScanNetwork::from(args.network));
    let window = HeightWindow::new(args.min_height, args.max_height);
    let scans = selected_scans(&args, window);

    let input: Box<dyn Read + Send> = match &args.file {
        Some(path) => {
            info!(file = %path.display(), "scanning block file");
            Box::new(File::open(path)?)
        }
        None => {
            info!("scanning standard input");
            Box::new(io::stdin())
        }
    };

    let mut tracker = match args.start_height {
        Some(height) => HeightTracker::starting_at(height),
        None => HeightTracker::new(),
    };
    let blocks = DatReader::new(BufReader::new(input), config)
        .map(move |block| block.map(|b| tracker.source(b)));

    if args.threads == 1 {
        run_sequential(blocks, &scans)
    } else {
        run_parallel(blocks, &scans, args.threads)
    }
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(io::stderr)
        .init();

    if let Err(err) = run(Args::parse()) {
        error!(%err, "scan aborted");
        return ExitCode::FAILURE;
    }
    ExitCode::SUCCESS
}
