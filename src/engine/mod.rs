//! Message-application seam.
//!
//! Opcode semantics live behind [`MessageEngine`]; this core only needs the
//! contract "apply one message against world state, drawing gas from the
//! pool". One engine value is built per block and reused across its
//! transactions, with an explicit [`MessageEngine::begin_transaction`] that
//! clears residual call/return state so nothing leaks between transactions.
//! The trait boundary also lets tests script engine behavior without a VM.

use crate::context::BlockContext;
use crate::gas::{GasLimitReached, GasPool};
use crate::message::Message;
use crate::state::WorldState;
use crate::types::Address;
use thiserror::Error;

pub mod transfer;

pub use transfer::{TransferEngine, TransferEngineFactory};

/// Result of applying one valid message.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MessageOutcome {
    pub output: Vec<u8>,
    pub gas_used: u64,
    /// The message was valid and gas-charged but its logic reverted.
    /// Recorded as a failed receipt; never aborts the block.
    pub reverted: bool,
}

/// Block-invalidating execution failures. Any of these means the
/// transaction cannot be included, so the whole block is rejected.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ExecError {
    #[error("nonce too low: expected {expected}, got {got}")]
    NonceTooLow { expected: u64, got: u64 },
    #[error("nonce too high: expected {expected}, got {got}")]
    NonceTooHigh { expected: u64, got: u64 },
    #[error("insufficient funds: have {have}, need {need}")]
    InsufficientFunds { have: u128, need: u128 },
    #[error("intrinsic gas too low: limit {limit}, required {required}")]
    IntrinsicGas { limit: u64, required: u64 },
    #[error(transparent)]
    GasPool(#[from] GasLimitReached),
}

pub trait MessageEngine {
    /// Reset residual per-transaction state and install the mutable context
    /// fields (origin, effective gas price) for the next message.
    fn begin_transaction(&mut self, origin: Address, gas_price: u64);

    /// Apply `msg` against `state`, consuming from `pool`. Performs the
    /// balance transfer, nonce increment, execution or deployment, and
    /// refund accounting.
    fn apply_message(
        &mut self,
        state: &mut dyn WorldState,
        msg: &Message,
        pool: &mut GasPool,
    ) -> Result<MessageOutcome, ExecError>;
}

/// Builds the one engine a block's transactions share. Variant selection
/// happens at startup configuration, never mid-block.
pub trait EngineFactory {
    fn build(&self, ctx: BlockContext) -> Box<dyn MessageEngine>;
}
