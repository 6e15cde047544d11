//! Tree header serialization
//!
//! Preorder, one tag bit per node: `0` for an internal node followed by its
//! left and right subtrees, `1` for a leaf followed by its symbol as a 9-bit
//! field. The encoding is self-delimiting, so no length prefix is written.

use std::io;

use bitstream_io::{BitRead, BitWrite};

use crate::error::{is_eof, CompressError, Result};
use crate::tree::HuffNode;
use crate::{SENTINEL, SYMBOL_BITS};

/// Deepest nesting a decoded header may have. A full tree over 257 leaves
/// can never be deeper than 256.
pub const MAX_TREE_DEPTH: usize = SENTINEL as usize;

/// Serialize `root`, returning the number of bits written.
pub fn write_header<W: BitWrite>(root: &HuffNode, out: &mut W) -> io::Result<u64> {
    match root {
        HuffNode::Internal { left, right, .. } => {
            out.write_bit(false)?;
            let l = write_header(left, out)?;
            let r = write_header(right, out)?;
            Ok(1 + l + r)
        }
        HuffNode::Leaf { symbol, .. } => {
            out.write_bit(true)?;
            out.write(SYMBOL_BITS, *symbol)?;
            Ok(1 + u64::from(SYMBOL_BITS))
        }
    }
}

/// Size in bits of the header for `root`.
pub fn header_bits(root: &HuffNode) -> u64 {
    match root {
        HuffNode::Internal { left, right, .. } => 1 + header_bits(left) + header_bits(right),
        HuffNode::Leaf { .. } => 1 + u64::from(SYMBOL_BITS),
    }
}

/// Rebuild a tree from its header. Weights of the result are zero.
pub fn read_tree<R: BitRead>(input: &mut R) -> Result<HuffNode> {
    read_node(input, 0)
}

fn read_node<R: BitRead>(input: &mut R, depth: usize) -> Result<HuffNode> {
    if depth > MAX_TREE_DEPTH {
        return Err(CompressError::MalformedHeader(format!(
            "tree deeper than {} levels",
            MAX_TREE_DEPTH
        )));
    }
    if input.read_bit().map_err(truncated)? {
        let symbol: u16 = input.read(SYMBOL_BITS).map_err(truncated)?;
        if symbol > SENTINEL {
            return Err(CompressError::MalformedHeader(format!(
                "leaf symbol {} out of range",
                symbol
            )));
        }
        Ok(HuffNode::leaf(symbol, 0))
    } else {
        let left = read_node(input, depth + 1)?;
        let right = read_node(input, depth + 1)?;
        Ok(HuffNode::Internal {
            weight: 0,
            left: Box::new(left),
            right: Box::new(right),
        })
    }
}

fn truncated(err: io::Error) -> CompressError {
    if is_eof(&err) {
        CompressError::MalformedHeader("header ended early".into())
    } else {
        CompressError::IoError(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::frequency::FrequencyTable;
    use bitstream_io::{BigEndian, BitReader, BitWriter};
    use std::io::Cursor;

    fn serialize(root: &HuffNode) -> (Vec<u8>, u64) {
        let mut out = Vec::new();
        let mut w = BitWriter::endian(&mut out, BigEndian);
        let bits = write_header(root, &mut w).unwrap();
        w.byte_align().unwrap();
        drop(w);
        (out, bits)
    }

    fn deserialize(bytes: &[u8]) -> Result<HuffNode> {
        let mut r = BitReader::endian(Cursor::new(bytes), BigEndian);
        read_tree(&mut r)
    }

    #[test]
    fn test_aab_header_bits() {
        let tree = HuffNode::build(&FrequencyTable::from_bytes(b"AAB"));
        let (bytes, bits) = serialize(&tree);
        assert_eq!(bits, 32);
        assert_eq!(bits, header_bits(&tree));
        // 0 1 001000001 0 1 001000010 1 100000000
        assert_eq!(bytes, vec![0x48, 0x29, 0x0B, 0x00]);
    }

    #[test]
    fn test_header_roundtrip_shape() {
        let data = b"she sells sea shells by the sea shore";
        let tree = HuffNode::build(&FrequencyTable::from_bytes(data));
        let (bytes, _) = serialize(&tree);
        let rebuilt = deserialize(&bytes).unwrap();
        assert!(rebuilt.same_shape(&tree));
        assert_eq!(rebuilt.weight(), 0);
    }

    #[test]
    fn test_single_leaf_header() {
        let tree = HuffNode::leaf(SENTINEL, 1);
        let (bytes, bits) = serialize(&tree);
        assert_eq!(bits, 10);
        assert!(deserialize(&bytes).unwrap().same_shape(&tree));
    }

    #[test]
    fn test_truncated_header() {
        let tree = HuffNode::build(&FrequencyTable::from_bytes(b"hello world"));
        let (bytes, _) = serialize(&tree);
        let result = deserialize(&bytes[..bytes.len() / 2]);
        assert!(matches!(result, Err(CompressError::MalformedHeader(_))));
        assert!(matches!(
            deserialize(&[]),
            Err(CompressError::MalformedHeader(_))
        ));
    }

    #[test]
    fn test_symbol_out_of_range() {
        // leaf tag then 9 ones (511)
        let result = deserialize(&[0xFF, 0xC0]);
        assert!(matches!(result, Err(CompressError::MalformedHeader(_))));
    }

    #[test]
    fn test_depth_limit() {
        let zeros = vec![0u8; 64];
        let result = deserialize(&zeros);
        match result {
            Err(CompressError::MalformedHeader(msg)) => assert!(msg.contains("deeper")),
            other => panic!("expected depth failure, got {:?}", other),
        }
    }
}
