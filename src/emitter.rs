use std::io::Write;

use parking_lot::Mutex;

use crate::{
    error::Result,
    helpers::encode_record,
    scan::BlockScan,
    skip::SkipPolicy,
    types::SourcedBlock,
};

/// Scan pass that dumps one fixed 12-byte record per transaction output:
/// the block height followed by the output value (see
/// [`encode_record`](crate::helpers::encode_record) for the byte layout).
///
/// Records are written in block order, then transaction order, then output
/// order as presented by the source. The sink is shared by all worker
/// threads; a block's records are written under one lock acquisition, so
/// records from concurrent calls never interleave.
pub struct OutputValueDump<P, W> {
    policy: P,
    sink: Mutex<W>,
}

impl<P, W> OutputValueDump<P, W>
where
    P: SkipPolicy,
    W: Write + Send,
{
    /// Creates a dump pass writing records to `sink`.
    pub fn new(policy: P, sink: W) -> Self {
        Self {
            policy,
            sink: Mutex::new(sink),
        }
    }

    /// Consumes the pass and returns the sink with everything written so far.
    pub fn into_sink(self) -> W {
        self.sink.into_inner()
    }
}

impl<P, W> BlockScan for OutputValueDump<P, W>
where
    P: SkipPolicy,
    W: Write + Send,
{
    fn process(&self, block: &SourcedBlock) -> Result<()> {
        if self.policy.should_skip(block) {
            return Ok(());
        }

        let height = block.height_or_unknown();

        let mut sink = self.sink.lock();
        for tx in &block.block.txdata {
            for output in &tx.output {
                let record = encode_record(height, output.value.to_sat());
                sink.write_all(&record)?;
            }
        }

        Ok(())
    }

    fn finalize(&self) -> Result<()> {
        self.sink.lock().flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        helpers::{decode_record, RECORD_SIZE},
        skip::{HeightWindow, SkipNone},
        types::HEIGHT_UNKNOWN,
    };
    use bitcoin::{
        absolute::LockTime,
        block::{Block as BitcoinBlock, Header as BlockHeader, Version as BlockVersion},
        hashes::Hash,
        pow::CompactTarget,
        transaction::Version,
        Amount as BtcAmount, BlockHash, ScriptBuf, Transaction, TxMerkleNode, TxOut,
    };
    use std::io::{self, Write};

    fn standard_output(value: u64) -> TxOut {
        TxOut {
            value: BtcAmount::from_sat(value),
            script_pubkey: ScriptBuf::new(),
        }
    }

    fn make_transaction(version: i32, locktime: u32, outputs: Vec<TxOut>) -> Transaction {
        Transaction {
            version: Version(version),
            lock_time: LockTime::from_consensus(locktime),
            input: vec![],
            output: outputs,
        }
    }

    fn build_block(txdata: Vec<Transaction>) -> BitcoinBlock {
        let header = BlockHeader {
            version: BlockVersion::TWO,
            prev_blockhash: BlockHash::all_zeros(),
            merkle_root: TxMerkleNode::all_zeros(),
            time: 0,
            bits: CompactTarget::default(),
            nonce: 0,
        };
        BitcoinBlock { header, txdata }
    }

    fn emitted_records(dump: OutputValueDump<impl SkipPolicy, Vec<u8>>) -> Vec<(u32, u64)> {
        let bytes = dump.into_sink();
        assert_eq!(bytes.len() % RECORD_SIZE, 0);
        bytes
            .chunks_exact(RECORD_SIZE)
            .map(|chunk| {
                let mut record = [0u8; RECORD_SIZE];
                record.copy_from_slice(chunk);
                decode_record(&record)
            })
            .collect()
    }

    #[test]
    fn emits_one_record_per_output_in_order() {
        let block = build_block(vec![
            make_transaction(1, 0, vec![standard_output(5), standard_output(7)]),
            make_transaction(2, 500, vec![standard_output(3)]),
        ]);
        let dump = OutputValueDump::new(SkipNone, Vec::<u8>::new());

        dump.process(&SourcedBlock::new(Some(100), block))
            .expect("process failed");
        dump.finalize().expect("finalize failed");

        assert_eq!(emitted_records(dump), vec![(100, 5), (100, 7), (100, 3)]);
    }

    #[test]
    fn output_length_is_twelve_bytes_per_output() {
        let blocks = [
            build_block(vec![make_transaction(1, 0, vec![standard_output(1)])]),
            build_block(vec![
                make_transaction(1, 0, vec![standard_output(2), standard_output(3)]),
                make_transaction(2, 0, vec![]),
            ]),
        ];
        let dump = OutputValueDump::new(SkipNone, Vec::<u8>::new());

        for (height, block) in blocks.into_iter().enumerate() {
            dump.process(&SourcedBlock::new(Some(height as u32), block))
                .expect("process failed");
        }

        assert_eq!(dump.into_sink().len(), 3 * RECORD_SIZE);
    }

    #[test]
    fn empty_blocks_and_outputless_transactions_emit_nothing() {
        let dump = OutputValueDump::new(SkipNone, Vec::<u8>::new());

        dump.process(&SourcedBlock::new(Some(1), build_block(vec![])))
            .expect("process failed");
        dump.process(&SourcedBlock::new(
            Some(2),
            build_block(vec![make_transaction(1, 0, vec![])]),
        ))
        .expect("process failed");

        assert!(dump.into_sink().is_empty());
    }

    #[test]
    fn skipped_blocks_emit_nothing() {
        let block = build_block(vec![make_transaction(1, 0, vec![standard_output(9)])]);
        let dump = OutputValueDump::new(HeightWindow::new(Some(10), None), Vec::<u8>::new());

        dump.process(&SourcedBlock::new(Some(5), block))
            .expect("process failed");

        assert!(dump.into_sink().is_empty());
    }

    #[test]
    fn unresolved_height_uses_the_sentinel() {
        let block = build_block(vec![make_transaction(1, 0, vec![standard_output(4)])]);
        let dump = OutputValueDump::new(SkipNone, Vec::<u8>::new());

        dump.process(&SourcedBlock::new(None, block))
            .expect("process failed");

        assert_eq!(emitted_records(dump), vec![(HEIGHT_UNKNOWN, 4)]);
    }

    struct FailingWriter;

    impl Write for FailingWriter {
        fn write(&mut self, _buf: &[u8]) -> io::Result<usize> {
            Err(io::Error::new(io::ErrorKind::BrokenPipe, "sink closed"))
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn sink_write_failure_propagates() {
        let block = build_block(vec![make_transaction(1, 0, vec![standard_output(1)])]);
        let dump = OutputValueDump::new(SkipNone, FailingWriter);

        let result = dump.process(&SourcedBlock::new(Some(0), block));

        assert!(result.is_err());
    }
}
