//! Plain value-transfer engine.
//!
//! Implements everything the message contract requires except bytecode
//! execution: gas purchase, nonce and balance checks, the transfer itself,
//! verbatim code install on creation, and refund accounting. Chains that
//! run contracts wrap their VM in this same trait.

use super::{ExecError, MessageEngine, MessageOutcome};
use crate::context::BlockContext;
use crate::crypto::tx::contract_address;
use crate::engine::EngineFactory;
use crate::gas::GasPool;
use crate::message::Message;
use crate::state::WorldState;
use crate::types::Address;

/// Base cost of any transaction.
pub const TX_GAS: u64 = 21_000;
/// Per-byte cost of the payload.
pub const TX_PAYLOAD_GAS: u64 = 10;
/// Surcharge for contract creation.
pub const CREATE_GAS: u64 = 32_000;

pub fn intrinsic_gas(msg: &Message) -> u64 {
    let mut gas = TX_GAS.saturating_add((msg.payload.len() as u64).saturating_mul(TX_PAYLOAD_GAS));
    if msg.is_create() {
        gas = gas.saturating_add(CREATE_GAS);
    }
    gas
}

pub struct TransferEngine {
    ctx: BlockContext,
    origin: Address,
    gas_price: u64,
    return_data: Vec<u8>,
}

impl TransferEngine {
    pub fn new(ctx: BlockContext) -> Self {
        Self {
            ctx,
            origin: Address::zero(),
            gas_price: 0,
            return_data: Vec::new(),
        }
    }
}

impl MessageEngine for TransferEngine {
    fn begin_transaction(&mut self, origin: Address, gas_price: u64) {
        self.origin = origin;
        self.gas_price = gas_price;
        self.return_data.clear();
    }

    fn apply_message(
        &mut self,
        state: &mut dyn WorldState,
        msg: &Message,
        pool: &mut GasPool,
    ) -> Result<MessageOutcome, ExecError> {
        // Reserve the full gas limit from the block budget up front.
        pool.sub_gas(msg.gas_limit)?;

        let expected = state.nonce(&msg.sender);
        if msg.nonce < expected {
            return Err(ExecError::NonceTooLow { expected, got: msg.nonce });
        }
        if msg.nonce > expected {
            return Err(ExecError::NonceTooHigh { expected, got: msg.nonce });
        }

        let required = intrinsic_gas(msg);
        if msg.gas_limit < required {
            return Err(ExecError::IntrinsicGas {
                limit: msg.gas_limit,
                required,
            });
        }

        let gas_cost = u128::from(msg.gas_limit) * u128::from(self.gas_price);
        let need = gas_cost.saturating_add(msg.value);
        let have = state.balance(&msg.sender);
        if have < need {
            return Err(ExecError::InsufficientFunds { have, need });
        }

        // Point of no return: gas is bought and the nonce advances even if
        // a richer engine's execution were to revert past here.
        state.set_balance(&msg.sender, have - gas_cost);
        state.set_nonce(&msg.sender, expected + 1);

        let dest = match msg.to {
            Some(to) => to,
            None => contract_address(&msg.sender, msg.nonce),
        };
        let sender_after = state.balance(&msg.sender);
        state.set_balance(&msg.sender, sender_after - msg.value);
        state.set_balance(&dest, state.balance(&dest).saturating_add(msg.value));
        if msg.is_create() {
            state.set_code(&dest, msg.payload.clone());
        }

        let gas_used = required;
        let remaining = msg.gas_limit - gas_used;
        // Unused gas goes back to both the sender and the block budget.
        state.set_balance(
            &msg.sender,
            state
                .balance(&msg.sender)
                .saturating_add(u128::from(remaining) * u128::from(self.gas_price)),
        );
        pool.add_gas(remaining);

        // Fees accrue to the block beneficiary.
        let fee = u128::from(gas_used) * u128::from(self.gas_price);
        state.set_balance(
            &self.ctx.beneficiary,
            state.balance(&self.ctx.beneficiary).saturating_add(fee),
        );

        Ok(MessageOutcome {
            output: self.return_data.clone(),
            gas_used,
            reverted: false,
        })
    }
}

pub struct TransferEngineFactory;

impl EngineFactory for TransferEngineFactory {
    fn build(&self, ctx: BlockContext) -> Box<dyn MessageEngine> {
        Box::new(TransferEngine::new(ctx))
    }
}
