//! Huffman tree construction
//!
//! Greedy pairwise merging over a min-priority queue. Ties on weight are
//! broken by insertion sequence (earlier wins), so identical frequency
//! tables always produce identical trees and bit-identical output.

use std::cmp::Ordering;
use std::collections::BinaryHeap;

use crate::frequency::FrequencyTable;
use crate::Symbol;

/// A node of a full binary Huffman tree. Each internal node owns both children.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HuffNode {
    Leaf {
        symbol: Symbol,
        weight: u64,
    },
    Internal {
        weight: u64,
        left: Box<HuffNode>,
        right: Box<HuffNode>,
    },
}

impl HuffNode {
    pub fn leaf(symbol: Symbol, weight: u64) -> Self {
        HuffNode::Leaf { symbol, weight }
    }

    pub fn internal(left: HuffNode, right: HuffNode) -> Self {
        HuffNode::Internal {
            weight: left.weight() + right.weight(),
            left: Box::new(left),
            right: Box::new(right),
        }
    }

    pub fn weight(&self) -> u64 {
        match self {
            HuffNode::Leaf { weight, .. } | HuffNode::Internal { weight, .. } => *weight,
        }
    }

    pub fn is_leaf(&self) -> bool {
        matches!(self, HuffNode::Leaf { .. })
    }

    /// Build the tree for a frequency table. Every symbol with a nonzero
    /// count becomes a leaf; the table always holds the sentinel, so the
    /// result has at least one leaf.
    pub fn build(freq: &FrequencyTable) -> HuffNode {
        let mut seq = 0u64;
        let mut heap = BinaryHeap::new();
        for (symbol, count) in freq.nonzero() {
            heap.push(Pending {
                seq,
                node: HuffNode::leaf(symbol, count),
            });
            seq += 1;
        }

        loop {
            let first = match heap.pop() {
                Some(p) => p,
                None => return HuffNode::leaf(crate::SENTINEL, 1),
            };
            let second = match heap.pop() {
                Some(p) => p,
                None => return first.node,
            };
            heap.push(Pending {
                seq,
                node: HuffNode::internal(first.node, second.node),
            });
            seq += 1;
        }
    }

    pub fn leaf_count(&self) -> usize {
        match self {
            HuffNode::Leaf { .. } => 1,
            HuffNode::Internal { left, right, .. } => left.leaf_count() + right.leaf_count(),
        }
    }

    /// Length of the longest root-to-leaf path.
    pub fn depth(&self) -> usize {
        match self {
            HuffNode::Leaf { .. } => 0,
            HuffNode::Internal { left, right, .. } => 1 + left.depth().max(right.depth()),
        }
    }

    /// Same shape and same symbol at every leaf position; weights are ignored.
    pub fn same_shape(&self, other: &HuffNode) -> bool {
        match (self, other) {
            (HuffNode::Leaf { symbol: a, .. }, HuffNode::Leaf { symbol: b, .. }) => a == b,
            (
                HuffNode::Internal {
                    left: al,
                    right: ar,
                    ..
                },
                HuffNode::Internal {
                    left: bl,
                    right: br,
                    ..
                },
            ) => al.same_shape(bl) && ar.same_shape(br),
            _ => false,
        }
    }
}

/// Queue entry ordered by (weight, seq), smallest first.
struct Pending {
    seq: u64,
    node: HuffNode,
}

impl Pending {
    fn key(&self) -> (u64, u64) {
        (self.node.weight(), self.seq)
    }
}

impl Eq for Pending {}
impl PartialEq for Pending {
    fn eq(&self, other: &Self) -> bool {
        self.key() == other.key()
    }
}
impl PartialOrd for Pending {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}
impl Ord for Pending {
    fn cmp(&self, other: &Self) -> Ordering {
        other.key().cmp(&self.key()) // min-heap
    }
}
