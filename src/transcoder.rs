//! Stream compression and decompression
//!
//! Compressed layout: 32-bit magic, tree header, then one code per input
//! byte followed by the sentinel's code. Everything is bit-packed MSB first
//! and the last byte is zero-padded.

use std::io::{self, BufReader, BufWriter, ErrorKind, Read, Seek, SeekFrom, Write};

use bitstream_io::{BigEndian, BitRead, BitReader, BitWrite, BitWriter};
use tracing::{debug, warn};

use crate::codes::CodeTable;
use crate::config::CodecConfig;
use crate::error::{is_eof, CompressError, Result};
use crate::frequency::FrequencyTable;
use crate::header::{read_tree, write_header};
use crate::tree::HuffNode;
use crate::{HUFF_NUMBER, HUFF_TREE, MAGIC_BITS, SENTINEL};

/// Bit accounting for one compress or decompress call.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TranscodeStats {
    /// Bytes encoded or decoded, sentinel excluded.
    pub symbols: u64,
    /// Magic plus serialized tree.
    pub header_bits: u64,
    /// Every code written or read, the sentinel's included.
    pub payload_bits: u64,
}

impl TranscodeStats {
    pub fn total_bits(&self) -> u64 {
        self.header_bits + self.payload_bits
    }

    pub fn compressed_bytes(&self) -> u64 {
        (self.total_bits() + 7) / 8
    }
}

/// Compress `input` into `output`.
///
/// The input is read twice: once to count symbols, then again after seeking
/// back to the position it had on entry.
pub fn compress<R, W>(mut input: R, output: W, config: &CodecConfig) -> Result<TranscodeStats>
where
    R: Read + Seek,
    W: Write,
{
    config.validate()?;
    let start = input.stream_position()?;

    let freq = FrequencyTable::count_limited(
        BufReader::with_capacity(config.buffer_capacity, &mut input),
        config.max_input_size,
    )?;
    let root = HuffNode::build(&freq);
    let codes = CodeTable::build(&root);
    debug!(
        bytes = freq.total(),
        distinct = root.leaf_count() - 1,
        depth = root.depth(),
        entropy = freq.entropy_bits(),
        "built huffman tree"
    );

    let mut out = BitWriter::endian(
        BufWriter::with_capacity(config.buffer_capacity, output),
        BigEndian,
    );
    let result = encode(&mut input, start, &root, &codes, &mut out, config);
    let closed = close(&mut out);
    let stats = result?;
    closed?;

    debug!(
        symbols = stats.symbols,
        header_bits = stats.header_bits,
        payload_bits = stats.payload_bits,
        "compressed"
    );
    Ok(stats)
}

fn encode<R, W>(
    input: &mut R,
    start: u64,
    root: &HuffNode,
    codes: &CodeTable,
    out: &mut W,
    config: &CodecConfig,
) -> Result<TranscodeStats>
where
    R: Read + Seek,
    W: BitWrite,
{
    let mut stats = TranscodeStats::default();

    out.write(MAGIC_BITS, HUFF_TREE)?;
    stats.header_bits = u64::from(MAGIC_BITS) + write_header(root, out)?;

    input.seek(SeekFrom::Start(start))?;
    let mut reader = BufReader::with_capacity(config.buffer_capacity, input);
    let mut buf = [0u8; 8192];
    loop {
        let n = match reader.read(&mut buf) {
            Ok(0) => break,
            Ok(n) => n,
            Err(e) if e.kind() == ErrorKind::Interrupted => continue,
            Err(e) => return Err(e.into()),
        };
        for &b in &buf[..n] {
            // The input changed between passes if a byte has no code.
            let code = codes.get(u16::from(b)).ok_or_else(|| {
                io::Error::new(
                    ErrorKind::InvalidData,
                    format!("byte {} not seen while counting", b),
                )
            })?;
            code.write_to(out)?;
            stats.payload_bits += code.len() as u64;
            stats.symbols += 1;
        }
    }

    let eos = codes
        .get(SENTINEL)
        .ok_or_else(|| io::Error::new(ErrorKind::InvalidData, "no code for end-of-stream"))?;
    eos.write_to(out)?;
    stats.payload_bits += eos.len() as u64;
    Ok(stats)
}

/// Zero-pad to a byte boundary and flush.
fn close<W: Write>(out: &mut BitWriter<W, BigEndian>) -> io::Result<()> {
    out.byte_align()?;
    out.flush()
}

/// Decompress `input` into `output`, stopping at the end-of-stream code.
///
/// Bytes decoded before a failure are flushed to `output`; the caller decides
/// whether to keep them.
pub fn decompress<R, W>(input: R, output: W, config: &CodecConfig) -> Result<TranscodeStats>
where
    R: Read,
    W: Write,
{
    config.validate()?;
    let mut bits = BitReader::endian(
        BufReader::with_capacity(config.buffer_capacity, input),
        BigEndian,
    );

    let magic: u32 = bits.read(MAGIC_BITS).map_err(payload_error)?;
    if magic != HUFF_TREE {
        if magic == HUFF_NUMBER {
            warn!("input uses the legacy fixed-table format");
        }
        return Err(CompressError::BadMagicNumber { found: magic });
    }

    let root = read_tree(&mut bits)?;
    let header_bits = u64::from(MAGIC_BITS) + crate::header::header_bits(&root);

    let mut out = BufWriter::with_capacity(config.buffer_capacity, output);
    let result = decode(&root, &mut bits, &mut out);
    let flushed = out.flush();
    let mut stats = match result {
        Ok(stats) => stats,
        Err(e) => {
            warn!(error = %e, "decompression aborted");
            return Err(e);
        }
    };
    flushed?;

    stats.header_bits = header_bits;
    debug!(
        symbols = stats.symbols,
        payload_bits = stats.payload_bits,
        "decompressed"
    );
    Ok(stats)
}

/// Walk the tree one bit at a time, emitting a byte at every non-sentinel
/// leaf and returning to the root. A tree that is a single leaf consumes one
/// bit per symbol.
fn decode<R, W>(root: &HuffNode, input: &mut R, out: &mut W) -> Result<TranscodeStats>
where
    R: BitRead,
    W: Write,
{
    let mut stats = TranscodeStats::default();
    let mut current = root;
    loop {
        let bit = input.read_bit().map_err(payload_error)?;
        stats.payload_bits += 1;
        current = match current {
            HuffNode::Internal { left, right, .. } => {
                if bit {
                    &**right
                } else {
                    &**left
                }
            }
            leaf => leaf,
        };

        if let HuffNode::Leaf { symbol, .. } = current {
            if *symbol == SENTINEL {
                return Ok(stats);
            }
            out.write_all(&[*symbol as u8])?;
            stats.symbols += 1;
            current = root;
        }
    }
}

fn payload_error(err: io::Error) -> CompressError {
    if is_eof(&err) {
        CompressError::TruncatedStream
    } else {
        CompressError::IoError(err)
    }
}
