//! 2048-bit log bloom filter stored per receipt.
//!
//! Each item (the emitting address plus every topic) sets three bit
//! positions derived from a domain-tagged blake3 hash of the item. A block's
//! header bloom is the union of its receipt blooms, so a light client can
//! rule out "this block contains a log from address X" with one read.

use crate::types::Log;
use serde::de::Error as DeError;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

pub const BLOOM_BYTES: usize = 256;
pub const BLOOM_BITS: usize = BLOOM_BYTES * 8;

#[derive(Clone, Copy, PartialEq, Eq)]
pub struct Bloom(pub [u8; BLOOM_BYTES]);

impl Bloom {
    pub fn empty() -> Self {
        Self([0u8; BLOOM_BYTES])
    }

    /// The three bit positions an item maps to: consecutive 16-bit LE words
    /// of blake3("TSR_BLOOM" || item), each reduced mod 2048.
    fn positions(item: &[u8]) -> [usize; 3] {
        let mut hasher = blake3::Hasher::new();
        hasher.update(b"TSR_BLOOM");
        hasher.update(item);
        let h = hasher.finalize();
        let b = h.as_bytes();
        let mut out = [0usize; 3];
        for (i, slot) in out.iter_mut().enumerate() {
            *slot = u16::from_le_bytes([b[2 * i], b[2 * i + 1]]) as usize % BLOOM_BITS;
        }
        out
    }

    pub fn set(&mut self, item: &[u8]) {
        for pos in Self::positions(item) {
            self.0[pos / 8] |= 1 << (pos % 8);
        }
    }

    pub fn contains(&self, item: &[u8]) -> bool {
        Self::positions(item)
            .iter()
            .all(|pos| self.0[pos / 8] & (1 << (pos % 8)) != 0)
    }

    pub fn accrue_log(&mut self, log: &Log) {
        self.set(&log.address.0);
        for topic in &log.topics {
            self.set(&topic.0);
        }
    }

    /// Bloom over exactly this log set.
    pub fn for_logs(logs: &[Log]) -> Self {
        let mut bloom = Self::empty();
        for log in logs {
            bloom.accrue_log(log);
        }
        bloom
    }

    pub fn union(&mut self, other: &Bloom) {
        for (a, b) in self.0.iter_mut().zip(other.0.iter()) {
            *a |= b;
        }
    }

    pub fn is_empty(&self) -> bool {
        self.0.iter().all(|b| *b == 0)
    }
}

impl Default for Bloom {
    fn default() -> Self {
        Self::empty()
    }
}

impl fmt::Debug for Bloom {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Bloom({})", hex::encode(self.0))
    }
}

// 256-byte arrays are past serde's derive limit; encode as a hex string,
// which also keeps JSON receipts readable.
impl Serialize for Bloom {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&hex::encode(self.0))
    }
}

impl<'de> Deserialize<'de> for Bloom {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        let bytes = hex::decode(&s).map_err(DeError::custom)?;
        if bytes.len() != BLOOM_BYTES {
            return Err(DeError::custom(format!(
                "bloom must be {BLOOM_BYTES} bytes, got {}",
                bytes.len()
            )));
        }
        let mut out = [0u8; BLOOM_BYTES];
        out.copy_from_slice(&bytes);
        Ok(Bloom(out))
    }
}
