//! Versioned chain rules.
//!
//! Fork-conditioned behavior is keyed by block height and resolved once per
//! block into an immutable [`Rules`] value handed to the executor. Two
//! implementations disagreeing on any of these flags at any height will
//! fork the chain, so activation heights are part of chain configuration,
//! never hard-coded in execution logic.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChainConfig {
    pub chain_id: u64,
    /// Height from which receipts carry a success/failure status instead of
    /// an intermediate state root. `None` means the fork never activates.
    #[serde(default)]
    pub status_receipts_from: Option<u64>,
    /// Height from which empty accounts (zero balance, zero nonce, no code)
    /// are pruned when state is finalised or a root is computed.
    #[serde(default)]
    pub prune_empty_from: Option<u64>,
}

impl Default for ChainConfig {
    fn default() -> Self {
        // Fresh chains start with all upgrades active from genesis.
        Self {
            chain_id: 1,
            status_receipts_from: Some(0),
            prune_empty_from: Some(0),
        }
    }
}

impl ChainConfig {
    pub fn is_status_receipts(&self, height: u64) -> bool {
        self.status_receipts_from.map_or(false, |from| height >= from)
    }

    pub fn is_prune_empty(&self, height: u64) -> bool {
        self.prune_empty_from.map_or(false, |from| height >= from)
    }

    /// Resolve the rule set in force at `height`.
    pub fn rules_at(&self, height: u64) -> Rules {
        Rules {
            status_receipts: self.is_status_receipts(height),
            prune_empty_accounts: self.is_prune_empty(height),
        }
    }
}

/// Immutable per-block snapshot of the fork table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rules {
    pub status_receipts: bool,
    pub prune_empty_accounts: bool,
}
