//! Symbol frequency analysis
//!
//! Counts every 8-bit symbol of an input stream and adds the synthetic
//! end-of-stream symbol with a count of exactly one.

use std::io::{ErrorKind, Read};

use crate::error::{CompressError, Result};
use crate::{Symbol, ALPHABET_SIZE, SENTINEL};

/// Occurrence counts indexed by symbol value, sentinel included.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrequencyTable {
    counts: [u64; ALPHABET_SIZE + 1],
}

impl FrequencyTable {
    /// Scan `reader` to exhaustion.
    pub fn count<R: Read>(reader: R) -> Result<Self> {
        Self::count_limited(reader, u64::MAX)
    }

    /// Like [`count`](Self::count), but fails once more than `limit` bytes
    /// have been seen.
    pub fn count_limited<R: Read>(mut reader: R, limit: u64) -> Result<Self> {
        let mut counts = [0u64; ALPHABET_SIZE + 1];
        let mut buf = [0u8; 8192];
        let mut total = 0u64;
        loop {
            let n = match reader.read(&mut buf) {
                Ok(0) => break,
                Ok(n) => n,
                Err(e) if e.kind() == ErrorKind::Interrupted => continue,
                Err(e) => return Err(e.into()),
            };
            total += n as u64;
            if total > limit {
                return Err(CompressError::InputTooLarge { size: total, limit });
            }
            for &b in &buf[..n] {
                counts[b as usize] += 1;
            }
        }
        counts[SENTINEL as usize] = 1;
        Ok(Self { counts })
    }

    pub fn from_bytes(data: &[u8]) -> Self {
        let mut counts = [0u64; ALPHABET_SIZE + 1];
        for &b in data {
            counts[b as usize] += 1;
        }
        counts[SENTINEL as usize] = 1;
        Self { counts }
    }

    pub fn get(&self, symbol: Symbol) -> u64 {
        self.counts.get(symbol as usize).copied().unwrap_or(0)
    }

    /// Symbols with a nonzero count, ascending, paired with their counts.
    pub fn nonzero(&self) -> impl Iterator<Item = (Symbol, u64)> + '_ {
        self.counts
            .iter()
            .enumerate()
            .filter(|&(_, &c)| c > 0)
            .map(|(s, &c)| (s as Symbol, c))
    }

    /// Number of real bytes counted (the sentinel is not included).
    pub fn total(&self) -> u64 {
        self.counts[..ALPHABET_SIZE].iter().sum()
    }

    /// Shannon entropy of the real symbols in bits per byte.
    pub fn entropy_bits(&self) -> f64 {
        let total = self.total();
        if total == 0 {
            return 0.0;
        }
        let len = total as f64;
        let mut entropy = 0.0;
        for &f in &self.counts[..ALPHABET_SIZE] {
            if f > 0 {
                let p = f as f64 / len;
                entropy -= p * p.log2();
            }
        }
        entropy
    }
}
