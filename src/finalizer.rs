//! Consensus finalization seam.
//!
//! Whatever end-of-block state mutation the consensus protocol mandates
//! (rewards, slashing payouts, fee sinks) happens behind [`ConsensusEngine`].
//! The processor calls it exactly once per block, after every transaction,
//! with `seal = false`: execute and validate, never assemble a new block.

use crate::state::WorldState;
use crate::types::{BlockHeader, Receipt, Tx};
use thiserror::Error;
use tracing::debug;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum FinalizeError {
    #[error("finalize failed: {0}")]
    Engine(String),
}

pub trait ConsensusEngine: Send + Sync {
    fn finalize(
        &self,
        header: &BlockHeader,
        state: &mut dyn WorldState,
        txs: &[Tx],
        uncles: &[BlockHeader],
        receipts: &[Receipt],
        seal: bool,
    ) -> Result<(), FinalizeError>;
}

/// Fixed block rewards: the beneficiary earns the full block reward plus an
/// inclusion bonus per uncle; each uncle's beneficiary earns a fraction of
/// the block reward.
pub struct StaticRewards {
    pub block_reward: u128,
    pub uncle_divisor: u128,
}

impl Default for StaticRewards {
    fn default() -> Self {
        Self {
            block_reward: 2_000_000,
            uncle_divisor: 32,
        }
    }
}

impl ConsensusEngine for StaticRewards {
    fn finalize(
        &self,
        header: &BlockHeader,
        state: &mut dyn WorldState,
        _txs: &[Tx],
        uncles: &[BlockHeader],
        _receipts: &[Receipt],
        seal: bool,
    ) -> Result<(), FinalizeError> {
        let uncle_bonus = self.block_reward / self.uncle_divisor;
        for uncle in uncles {
            state.set_balance(
                &uncle.beneficiary,
                state.balance(&uncle.beneficiary).saturating_add(uncle_bonus),
            );
        }
        let reward = self
            .block_reward
            .saturating_add(uncle_bonus.saturating_mul(uncles.len() as u128));
        state.set_balance(
            &header.beneficiary,
            state.balance(&header.beneficiary).saturating_add(reward),
        );
        debug!(
            height = header.height,
            uncles = uncles.len(),
            reward,
            seal,
            "finalized block rewards"
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::{MemoryState, WorldState};
    use crate::types::{Address, Hash32};

    fn header(beneficiary: Address, height: u64) -> BlockHeader {
        BlockHeader {
            height,
            parent: Hash32::zero(),
            beneficiary,
            gas_limit: 1_000_000,
            timestamp: 0,
            difficulty: 0,
        }
    }

    #[test]
    fn rewards_beneficiary_and_uncles() {
        let miner = Address([1; 20]);
        let uncle_miner = Address([2; 20]);
        let mut state = MemoryState::new();
        let engine = StaticRewards::default();

        engine
            .finalize(
                &header(miner, 10),
                &mut state,
                &[],
                &[header(uncle_miner, 9)],
                &[],
                false,
            )
            .unwrap();

        let bonus = engine.block_reward / engine.uncle_divisor;
        assert_eq!(state.balance(&uncle_miner), bonus);
        assert_eq!(state.balance(&miner), engine.block_reward + bonus);
    }
}
