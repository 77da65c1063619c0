//! Per-block execution context.

use crate::types::{Address, BlockHeader, Hash32};
use std::fmt;
use std::sync::Arc;

/// Historical-block-hash lookup the engine can consult (e.g. for a
/// BLOCKHASH-style operation). Backed by the caller's chain index.
pub trait HeaderReader: Send + Sync {
    /// Hash of the canonical block at `height`, if known.
    fn block_hash(&self, height: u64) -> Option<Hash32>;
}

/// A [`HeaderReader`] with no history. Useful for genesis processing and
/// engines that never look back.
pub struct NoAncestors;

impl HeaderReader for NoAncestors {
    fn block_hash(&self, _height: u64) -> Option<Hash32> {
        None
    }
}

/// Immutable block-level parameters, assembled once per block. The
/// per-transaction mutable fields (origin, gas price) live in the engine
/// and are reset through `MessageEngine::begin_transaction`.
#[derive(Clone)]
pub struct BlockContext {
    pub beneficiary: Address,
    pub height: u64,
    pub timestamp: u64,
    pub gas_limit: u64,
    pub difficulty: u64,
    hashes: Arc<dyn HeaderReader>,
}

impl BlockContext {
    pub fn for_block(header: &BlockHeader, hashes: Arc<dyn HeaderReader>) -> Self {
        Self {
            beneficiary: header.beneficiary,
            height: header.height,
            timestamp: header.timestamp,
            gas_limit: header.gas_limit,
            difficulty: header.difficulty,
            hashes,
        }
    }

    pub fn ancestor_hash(&self, height: u64) -> Option<Hash32> {
        self.hashes.block_hash(height)
    }
}

impl fmt::Debug for BlockContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BlockContext")
            .field("beneficiary", &self.beneficiary)
            .field("height", &self.height)
            .field("timestamp", &self.timestamp)
            .field("gas_limit", &self.gas_limit)
            .field("difficulty", &self.difficulty)
            .finish()
    }
}
