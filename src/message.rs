//! Canonical execution message, derived per transaction.

use crate::crypto::{CryptoError, TxSigner};
use crate::types::{Address, Tx};
use serde::{Deserialize, Serialize};

/// What the execution engine actually runs: a transaction with its sender
/// recovered. Ephemeral; lives for one transaction.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub sender: Address,
    pub to: Option<Address>,
    pub nonce: u64,
    pub value: u128,
    pub payload: Vec<u8>,
    pub gas_limit: u64,
    pub gas_price: u64,
}

impl Message {
    /// Resolve a signed transaction into a message by recovering its sender.
    /// Recovery failure invalidates the whole block, not just this tx.
    pub fn from_tx(tx: &Tx, signer: &dyn TxSigner) -> Result<Self, CryptoError> {
        let sender = signer.sender(tx)?;
        Ok(Self {
            sender,
            to: tx.to,
            nonce: tx.nonce,
            value: tx.value,
            payload: tx.payload.clone(),
            gas_limit: tx.gas_limit,
            gas_price: tx.gas_price,
        })
    }

    pub fn is_create(&self) -> bool {
        self.to.is_none()
    }
}
