//! treehuff: lossless byte-stream compression with Huffman coding.
//!
//! The compressed stream is self-describing: a 32-bit magic number, then the
//! exact Huffman tree used, then the bit-packed codes ending with the code
//! for a synthetic end-of-stream symbol.
//!
//! - [`frequency`] counts symbols
//! - [`tree`] builds the tree by greedy merging
//! - [`codes`] derives each symbol's root-to-leaf path
//! - [`header`] writes and reads the tree as a preorder bit encoding
//! - [`transcoder`] drives compress and decompress over streams

pub mod codes;
pub mod config;
pub mod error;
pub mod frequency;
pub mod header;
pub mod transcoder;
pub mod tree;

use std::io::{Cursor, Read, Seek, Write};

pub use crate::config::CodecConfig;
pub use crate::error::{CompressError, Result};
pub use crate::transcoder::TranscodeStats;

/// A symbol value: 0..=255 for bytes, [`SENTINEL`] for end-of-stream.
pub type Symbol = u16;

pub const WORD_BITS: u32 = 8;
pub const SYMBOL_BITS: u32 = WORD_BITS + 1;
pub const MAGIC_BITS: u32 = 32;
pub const ALPHABET_SIZE: usize = 1 << WORD_BITS;
pub const SENTINEL: Symbol = ALPHABET_SIZE as Symbol;

/// Magic of the older fixed-table format. Recognized, never written.
pub const HUFF_NUMBER: u32 = 0xface_8200;
/// Magic of the tree-header format.
pub const HUFF_TREE: u32 = HUFF_NUMBER | 1;

/// The main compressor engine
#[derive(Debug, Clone, Default)]
pub struct Compressor {
    config: CodecConfig,
}

impl Compressor {
    /// Create a new compressor with the given configuration
    pub fn new(config: CodecConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &CodecConfig {
        &self.config
    }

    /// Compress a seekable stream; it is read twice.
    pub fn compress<R: Read + Seek, W: Write>(&self, input: R, output: W) -> Result<TranscodeStats> {
        transcoder::compress(input, output, &self.config)
    }

    pub fn decompress<R: Read, W: Write>(&self, input: R, output: W) -> Result<TranscodeStats> {
        transcoder::decompress(input, output, &self.config)
    }

    pub fn compress_bytes(&self, data: &[u8]) -> Result<Vec<u8>> {
        let mut out = Vec::new();
        self.compress(Cursor::new(data), &mut out)?;
        Ok(out)
    }

    pub fn decompress_bytes(&self, data: &[u8]) -> Result<Vec<u8>> {
        let mut out = Vec::new();
        self.decompress(data, &mut out)?;
        Ok(out)
    }
}
