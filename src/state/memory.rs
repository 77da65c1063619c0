//! In-memory reference implementation of [`WorldState`].
//!
//! BTreeMap-backed so iteration order, and therefore the state root, is
//! deterministic. Snapshots are whole-state clones; fine for the block
//! volumes this backend is meant for (tests, light tooling). Production
//! nodes plug in their trie-backed store instead.

use super::WorldState;
use crate::types::{Address, Hash32, Log};
use std::collections::BTreeMap;

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Account {
    pub balance: u128,
    pub nonce: u64,
    pub code: Vec<u8>,
    pub storage: BTreeMap<Hash32, Hash32>,
}

impl Account {
    pub fn is_empty(&self) -> bool {
        self.balance == 0 && self.nonce == 0 && self.code.is_empty()
    }
}

#[derive(Clone, Debug, Default)]
struct TxScope {
    tx_hash: Hash32,
    next_log: u32,
}

#[derive(Clone, Debug, Default)]
pub struct MemoryState {
    accounts: BTreeMap<Address, Account>,
    logs: BTreeMap<Hash32, Vec<Log>>,
    snapshots: Vec<(BTreeMap<Address, Account>, BTreeMap<Hash32, Vec<Log>>)>,
    scope: Option<TxScope>,
}

impl MemoryState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed an account balance (genesis allocation, test funding).
    pub fn credit(&mut self, addr: Address, amount: u128) {
        let acct = self.accounts.entry(addr).or_default();
        acct.balance = acct.balance.saturating_add(amount);
    }

    pub fn account(&self, addr: &Address) -> Option<&Account> {
        self.accounts.get(addr)
    }

    fn prune_empty(&mut self) {
        self.accounts.retain(|_, acct| !acct.is_empty());
    }

    /// Deterministic root over the full account set.
    ///
    /// Format per account (sorted by address): address(20) || balance(16 LE) ||
    /// nonce(8 LE) || code_len(4 LE) || code || slot_count(4 LE) || slots.
    fn root_hash(&self) -> Hash32 {
        let mut hasher = blake3::Hasher::new();
        hasher.update(b"TSR_STATE");
        hasher.update(&(self.accounts.len() as u32).to_le_bytes());
        for (addr, acct) in &self.accounts {
            hasher.update(&addr.0);
            hasher.update(&acct.balance.to_le_bytes());
            hasher.update(&acct.nonce.to_le_bytes());
            hasher.update(&(acct.code.len() as u32).to_le_bytes());
            hasher.update(&acct.code);
            hasher.update(&(acct.storage.len() as u32).to_le_bytes());
            for (slot, value) in &acct.storage {
                hasher.update(&slot.0);
                hasher.update(&value.0);
            }
        }
        let h = hasher.finalize();
        let mut buf = [0u8; 32];
        buf.copy_from_slice(h.as_bytes());
        Hash32(buf)
    }
}

impl WorldState for MemoryState {
    fn balance(&self, addr: &Address) -> u128 {
        self.accounts.get(addr).map_or(0, |a| a.balance)
    }

    fn set_balance(&mut self, addr: &Address, value: u128) {
        self.accounts.entry(*addr).or_default().balance = value;
    }

    fn nonce(&self, addr: &Address) -> u64 {
        self.accounts.get(addr).map_or(0, |a| a.nonce)
    }

    fn set_nonce(&mut self, addr: &Address, nonce: u64) {
        self.accounts.entry(*addr).or_default().nonce = nonce;
    }

    fn code(&self, addr: &Address) -> Option<Vec<u8>> {
        self.accounts
            .get(addr)
            .filter(|a| !a.code.is_empty())
            .map(|a| a.code.clone())
    }

    fn set_code(&mut self, addr: &Address, code: Vec<u8>) {
        self.accounts.entry(*addr).or_default().code = code;
    }

    fn storage(&self, addr: &Address, slot: &Hash32) -> Hash32 {
        self.accounts
            .get(addr)
            .and_then(|a| a.storage.get(slot).copied())
            .unwrap_or_else(Hash32::zero)
    }

    fn set_storage(&mut self, addr: &Address, slot: Hash32, value: Hash32) {
        let acct = self.accounts.entry(*addr).or_default();
        if value == Hash32::zero() {
            acct.storage.remove(&slot);
        } else {
            acct.storage.insert(slot, value);
        }
    }

    fn snapshot(&mut self) -> usize {
        self.snapshots.push((self.accounts.clone(), self.logs.clone()));
        self.snapshots.len() - 1
    }

    fn revert_to(&mut self, snapshot: usize) {
        if snapshot >= self.snapshots.len() {
            return;
        }
        let (accounts, logs) = self.snapshots[snapshot].clone();
        self.accounts = accounts;
        self.logs = logs;
        self.snapshots.truncate(snapshot);
    }

    // Block hash and index matter to indexed backends; this one only needs
    // the tx hash to attribute logs.
    fn prepare_tx(&mut self, tx_hash: Hash32, _block_hash: Hash32, _index: u32) {
        self.scope = Some(TxScope {
            tx_hash,
            next_log: 0,
        });
    }

    fn add_log(&mut self, address: Address, topics: Vec<Hash32>, data: Vec<u8>) {
        let scope = match self.scope.as_mut() {
            Some(s) => s,
            // Emission outside a transaction scope is a caller bug; drop it
            // rather than mis-attribute it to another transaction.
            None => return,
        };
        let log = Log {
            address,
            topics,
            data,
            tx_hash: scope.tx_hash,
            index: scope.next_log,
        };
        scope.next_log += 1;
        self.logs.entry(scope.tx_hash).or_default().push(log);
    }

    fn logs(&self, tx_hash: &Hash32) -> Vec<Log> {
        self.logs.get(tx_hash).cloned().unwrap_or_default()
    }

    fn finalise(&mut self, prune_empty: bool) {
        if prune_empty {
            self.prune_empty();
        }
        self.snapshots.clear();
    }

    fn intermediate_root(&mut self, prune_empty: bool) -> Hash32 {
        if prune_empty {
            self.prune_empty();
        }
        self.root_hash()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn addr(b: u8) -> Address {
        Address([b; 20])
    }

    #[test]
    fn snapshot_revert_restores_state_and_logs() {
        let mut st = MemoryState::new();
        st.set_balance(&addr(1), 100);
        st.prepare_tx(Hash32([1; 32]), Hash32::zero(), 0);

        let snap = st.snapshot();
        st.set_balance(&addr(1), 5);
        st.add_log(addr(1), vec![], b"boom".to_vec());
        st.revert_to(snap);

        assert_eq!(st.balance(&addr(1)), 100);
        assert!(st.logs(&Hash32([1; 32])).is_empty());
    }

    #[test]
    fn root_tracks_balance_changes() {
        let mut st = MemoryState::new();
        let before = st.intermediate_root(false);
        st.set_balance(&addr(1), 100);
        let after = st.intermediate_root(false);
        assert_ne!(before, after);
    }

    #[test]
    fn prune_removes_empty_accounts_from_root() {
        let mut st = MemoryState::new();
        st.set_nonce(&addr(1), 0); // touch an account into existence, empty
        let kept = st.clone().intermediate_root(false);
        let pruned = st.intermediate_root(true);
        assert_ne!(kept, pruned);
        assert!(st.account(&addr(1)).is_none());
    }

    #[test]
    fn logs_are_scoped_per_tx() {
        let mut st = MemoryState::new();
        st.prepare_tx(Hash32([1; 32]), Hash32::zero(), 0);
        st.add_log(addr(1), vec![], vec![1]);
        st.prepare_tx(Hash32([2; 32]), Hash32::zero(), 1);
        st.add_log(addr(2), vec![], vec![2]);
        st.add_log(addr(2), vec![], vec![3]);

        assert_eq!(st.logs(&Hash32([1; 32])).len(), 1);
        let second = st.logs(&Hash32([2; 32]));
        assert_eq!(second.len(), 2);
        assert_eq!(second[0].index, 0);
        assert_eq!(second[1].index, 1);
        assert!(second.iter().all(|l| l.tx_hash == Hash32([2; 32])));
    }
}
