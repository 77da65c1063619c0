//! World-state seam.
//!
//! The persistent, trie-backed account store is owned by the caller and
//! consumed here through the [`WorldState`] trait: plain account access,
//! snapshot/revert for nested execution, a per-transaction log buffer, and
//! the root/finalise operations the receipt logic needs. State is mutated
//! cumulatively across a block and never rolled back between transactions.

use crate::types::{Address, Hash32, Log};

pub mod memory;

pub use memory::MemoryState;

pub trait WorldState {
    fn balance(&self, addr: &Address) -> u128;
    fn set_balance(&mut self, addr: &Address, value: u128);

    fn nonce(&self, addr: &Address) -> u64;
    fn set_nonce(&mut self, addr: &Address, nonce: u64);

    fn code(&self, addr: &Address) -> Option<Vec<u8>>;
    fn set_code(&mut self, addr: &Address, code: Vec<u8>);

    fn storage(&self, addr: &Address, slot: &Hash32) -> Hash32;
    fn set_storage(&mut self, addr: &Address, slot: Hash32, value: Hash32);

    /// Capture the current state; `revert_to` discards everything written
    /// since the matching snapshot, including logs.
    fn snapshot(&mut self) -> usize;
    fn revert_to(&mut self, snapshot: usize);

    /// Scope subsequent log emission to (tx hash, block hash, index) so
    /// emissions from different transactions never cross-contaminate.
    fn prepare_tx(&mut self, tx_hash: Hash32, block_hash: Hash32, index: u32);

    /// Emit a log under the current transaction scope.
    fn add_log(&mut self, address: Address, topics: Vec<Hash32>, data: Vec<u8>);

    /// Logs emitted by the given transaction, in emission order.
    fn logs(&self, tx_hash: &Hash32) -> Vec<Log>;

    /// Settle pending writes without producing a root (status-receipt era).
    fn finalise(&mut self, prune_empty: bool);

    /// Deterministic commitment to the current state (root-receipt era).
    fn intermediate_root(&mut self, prune_empty: bool) -> Hash32;
}
