//! Code table derivation
//!
//! Each leaf's code is its root-to-leaf path: `false` for a left edge,
//! `true` for a right edge. Codes keep their exact length, so leading
//! zeros survive into the output.

use std::fmt;
use std::io;

use bitstream_io::BitWrite;

use crate::tree::HuffNode;
use crate::{Symbol, ALPHABET_SIZE};

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Code {
    bits: Vec<bool>,
}

impl Code {
    pub fn from_bits(bits: Vec<bool>) -> Self {
        Self { bits }
    }

    pub fn bits(&self) -> &[bool] {
        &self.bits
    }

    pub fn len(&self) -> usize {
        self.bits.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bits.is_empty()
    }

    pub fn is_prefix_of(&self, other: &Code) -> bool {
        other.bits.starts_with(&self.bits)
    }

    /// Emit exactly `len()` bits, first path step first.
    pub fn write_to<W: BitWrite>(&self, out: &mut W) -> io::Result<()> {
        for &bit in &self.bits {
            out.write_bit(bit)?;
        }
        Ok(())
    }
}

impl fmt::Display for Code {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for &bit in &self.bits {
            f.write_str(if bit { "1" } else { "0" })?;
        }
        Ok(())
    }
}

/// Symbol to code mapping for every leaf of a tree.
#[derive(Debug, Clone)]
pub struct CodeTable {
    codes: Vec<Option<Code>>,
}

impl CodeTable {
    /// Walk `root` and record the path to every leaf. A tree that is a single
    /// leaf assigns that leaf the one-bit code `0`.
    pub fn build(root: &HuffNode) -> Self {
        let mut codes = vec![None; ALPHABET_SIZE + 1];
        match root {
            HuffNode::Leaf { symbol, .. } => {
                codes[*symbol as usize] = Some(Code::from_bits(vec![false]));
            }
            HuffNode::Internal { .. } => {
                let mut path = Vec::new();
                assign(root, &mut path, &mut codes);
            }
        }
        for (symbol, code) in codes.iter().enumerate() {
            if let Some(code) = code {
                tracing::trace!(symbol, code = %code, "assigned code");
            }
        }
        Self { codes }
    }

    pub fn get(&self, symbol: Symbol) -> Option<&Code> {
        self.codes.get(symbol as usize).and_then(Option::as_ref)
    }

    pub fn iter(&self) -> impl Iterator<Item = (Symbol, &Code)> + '_ {
        self.codes
            .iter()
            .enumerate()
            .filter_map(|(s, c)| c.as_ref().map(|c| (s as Symbol, c)))
    }

    pub fn len(&self) -> usize {
        self.iter().count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

fn assign(node: &HuffNode, path: &mut Vec<bool>, codes: &mut [Option<Code>]) {
    match node {
        HuffNode::Leaf { symbol, .. } => {
            if let Some(slot) = codes.get_mut(*symbol as usize) {
                *slot = Some(Code::from_bits(path.clone()));
            }
        }
        HuffNode::Internal { left, right, .. } => {
            path.push(false);
            assign(left, path, codes);
            path.pop();
            path.push(true);
            assign(right, path, codes);
            path.pop();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::frequency::FrequencyTable;
    use crate::SENTINEL;

    fn code_str(table: &CodeTable, symbol: Symbol) -> String {
        table.get(symbol).unwrap().to_string()
    }

    #[test]
    fn test_aab_codes() {
        let tree = HuffNode::build(&FrequencyTable::from_bytes(b"AAB"));
        let table = CodeTable::build(&tree);
        assert_eq!(code_str(&table, 65), "0");
        assert_eq!(code_str(&table, 66), "10");
        assert_eq!(code_str(&table, SENTINEL), "11");
        assert_eq!(table.len(), 3);
        assert!(table.get(67).is_none());
    }

    #[test]
    fn test_single_leaf_gets_one_bit() {
        let table = CodeTable::build(&HuffNode::leaf(SENTINEL, 1));
        assert_eq!(code_str(&table, SENTINEL), "0");
    }

    #[test]
    fn test_leading_zeros_kept() {
        // left spine: symbol 3 sits at path 000
        let tree = HuffNode::internal(
            HuffNode::internal(
                HuffNode::internal(HuffNode::leaf(3, 1), HuffNode::leaf(4, 1)),
                HuffNode::leaf(5, 2),
            ),
            HuffNode::leaf(6, 4),
        );
        let table = CodeTable::build(&tree);
        assert_eq!(code_str(&table, 3), "000");
        assert_eq!(table.get(3).unwrap().len(), 3);
        assert_eq!(code_str(&table, 4), "001");
        assert_eq!(code_str(&table, 6), "1");
    }

    #[test]
    fn test_prefix_free_all_bytes() {
        let data: Vec<u8> = (0..=255u8)
            .flat_map(|b| std::iter::repeat(b).take(b as usize % 7 + 1))
            .collect();
        let table = CodeTable::build(&HuffNode::build(&FrequencyTable::from_bytes(&data)));
        let codes: Vec<_> = table.iter().map(|(_, c)| c).collect();
        assert_eq!(codes.len(), 257);
        for (i, a) in codes.iter().enumerate() {
            for (j, b) in codes.iter().enumerate() {
                if i != j {
                    assert!(!a.is_prefix_of(b), "{} is a prefix of {}", a, b);
                }
            }
        }
    }
}
