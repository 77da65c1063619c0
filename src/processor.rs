//! Block state-transition function.
//!
//! [`StateProcessor::process`] applies every transaction of a block, in
//! order, against the caller's world state, then runs the consensus
//! finalizer once. Either every transaction applies and the full
//! (receipts, logs, gas used) result is returned, or the first
//! block-invalidating error aborts the whole call with no partial result.
//! Mutations already written to world state are NOT rolled back on abort;
//! a caller that gives up on a block must discard the state instance.

use crate::context::{BlockContext, HeaderReader};
use crate::crypto::tx::contract_address;
use crate::crypto::{ChainSigner, CryptoError, TxSigner};
use crate::engine::{EngineFactory, ExecError, MessageEngine};
use crate::finalizer::{ConsensusEngine, FinalizeError};
use crate::gas::GasPool;
use crate::message::Message;
use crate::rules::{ChainConfig, Rules};
use crate::state::WorldState;
use crate::types::{Block, BlockHeader, Bloom, Log, Receipt, ReceiptOutcome, Tx};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, warn};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ProcessError {
    #[error("sender recovery failed: {0}")]
    Signature(#[from] CryptoError),
    #[error("invalid transaction: {0}")]
    Exec(#[from] ExecError),
    #[error("processing cancelled at transaction {0}")]
    Cancelled(usize),
    #[error(transparent)]
    Finalize(#[from] FinalizeError),
}

/// Cooperative cancellation signal, checked between transactions. Clones
/// share the flag, so the caller keeps one end and hands the other in via
/// [`ProcessOptions`].
#[derive(Clone, Debug, Default)]
pub struct CancelFlag(Arc<AtomicBool>);

impl CancelFlag {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}

#[derive(Clone, Debug, Default)]
pub struct ProcessOptions {
    pub cancel: CancelFlag,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ProcessOutcome {
    pub receipts: Vec<Receipt>,
    /// All logs of the block: each receipt's logs concatenated in
    /// transaction order.
    pub logs: Vec<Log>,
    pub gas_used: u64,
}

/// Transitions world state from one block to the next. Holds no mutable
/// state itself; every `process` call builds its gas pool and engine fresh,
/// so independent calls on independent states may run concurrently.
pub struct StateProcessor<'a> {
    config: &'a ChainConfig,
    chain: Arc<dyn HeaderReader>,
    vm: &'a dyn EngineFactory,
    engine: &'a dyn ConsensusEngine,
}

impl<'a> StateProcessor<'a> {
    pub fn new(
        config: &'a ChainConfig,
        chain: Arc<dyn HeaderReader>,
        vm: &'a dyn EngineFactory,
        engine: &'a dyn ConsensusEngine,
    ) -> Self {
        Self {
            config,
            chain,
            vm,
            engine,
        }
    }

    /// Apply `block` to `state` and return the receipts, aggregated logs,
    /// and total gas used. Fail-fast: the first invalidating transaction
    /// aborts the call and discards all accumulated receipts and logs.
    pub fn process(
        &self,
        block: &Block,
        state: &mut dyn WorldState,
        opts: &ProcessOptions,
    ) -> Result<ProcessOutcome, ProcessError> {
        let header = &block.header;
        let block_hash = block.id();
        let rules = self.config.rules_at(header.height);
        let signer = ChainSigner::new(self.config.chain_id);
        let mut pool = GasPool::new(header.gas_limit);
        let ctx = BlockContext::for_block(header, self.chain.clone());
        let mut vm = self.vm.build(ctx);

        let mut receipts = Vec::with_capacity(block.txs.len());
        let mut all_logs = Vec::new();
        let mut used_gas = 0u64;

        for (i, tx) in block.txs.iter().enumerate() {
            if opts.cancel.is_cancelled() {
                warn!(height = header.height, index = i, "block processing cancelled");
                return Err(ProcessError::Cancelled(i));
            }
            state.prepare_tx(tx.hash(), block_hash, i as u32);
            let (receipt, gas) = apply_transaction(
                vm.as_mut(),
                &rules,
                &mut pool,
                state,
                header,
                tx,
                &mut used_gas,
                &signer,
            )
            .map_err(|e| {
                warn!(height = header.height, index = i, error = %e, "block execution aborted");
                e
            })?;
            debug!(height = header.height, index = i, gas, "applied transaction");
            all_logs.extend(receipt.logs.iter().cloned());
            receipts.push(receipt);
        }

        self.engine
            .finalize(header, state, &block.txs, &block.uncles, &receipts, false)?;

        Ok(ProcessOutcome {
            receipts,
            logs: all_logs,
            gas_used: used_gas,
        })
    }
}

/// Apply one transaction and build its receipt. `used_gas` is the running
/// block total; it is only advanced when the transaction is includable.
/// A non-`Ok` return invalidates the whole block.
#[allow(clippy::too_many_arguments)]
pub fn apply_transaction(
    vm: &mut dyn MessageEngine,
    rules: &Rules,
    pool: &mut GasPool,
    state: &mut dyn WorldState,
    _header: &BlockHeader,
    tx: &Tx,
    used_gas: &mut u64,
    signer: &dyn TxSigner,
) -> Result<(Receipt, u64), ProcessError> {
    let msg = Message::from_tx(tx, signer)?;

    vm.begin_transaction(msg.sender, msg.gas_price);
    let outcome = vm.apply_message(state, &msg, pool)?;

    // Fork-conditioned post-state handling. This is what peers must
    // reproduce bit-for-bit, so the branch lives on the pre-resolved rule
    // set, never on ad-hoc height checks.
    let receipt_outcome = if rules.status_receipts {
        state.finalise(rules.prune_empty_accounts);
        ReceiptOutcome::Status(!outcome.reverted)
    } else {
        ReceiptOutcome::Root(state.intermediate_root(rules.prune_empty_accounts))
    };

    *used_gas += outcome.gas_used;

    let tx_hash = tx.hash();
    let logs = state.logs(&tx_hash);
    let bloom = Bloom::for_logs(&logs);
    let contract = if tx.is_create() {
        Some(contract_address(&msg.sender, tx.nonce))
    } else {
        None
    };

    let receipt = Receipt {
        tx_hash,
        outcome: receipt_outcome,
        gas_used: outcome.gas_used,
        cumulative_gas_used: *used_gas,
        bloom,
        contract_address: contract,
        logs,
    };
    Ok((receipt, outcome.gas_used))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cancel_flag_is_shared_across_clones() {
        let flag = CancelFlag::new();
        let other = flag.clone();
        assert!(!other.is_cancelled());
        flag.cancel();
        assert!(other.is_cancelled());
    }
}
