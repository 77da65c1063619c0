use crate::types::{Address, Tx};
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CryptoError {
    #[error("invalid signature")]
    InvalidSignature,
    #[error("wrong chain id: expected {expected}, got {got}")]
    ChainIdMismatch { expected: u64, got: u64 },
    #[error("key error: {0}")]
    Key(String),
}

/// Sender-recovery capability: turns a signed transaction into its
/// originating address, or fails the whole block.
pub trait TxSigner: Send + Sync {
    fn sender(&self, tx: &Tx) -> Result<Address, CryptoError>;
}

/// The production signer: ed25519 over the canonical sign-bytes, with the
/// chain id baked in as replay protection.
pub struct ChainSigner {
    chain_id: u64,
}

impl ChainSigner {
    pub fn new(chain_id: u64) -> Self {
        Self { chain_id }
    }
}

impl TxSigner for ChainSigner {
    fn sender(&self, tx: &Tx) -> Result<Address, CryptoError> {
        if tx.chain_id != self.chain_id {
            return Err(CryptoError::ChainIdMismatch {
                expected: self.chain_id,
                got: tx.chain_id,
            });
        }
        ed25519::verify(&tx.pubkey, &tx::tx_sign_bytes(tx), &tx.signature)?;
        Ok(tx::derive_address(&tx.pubkey))
    }
}

pub mod ed25519;

pub mod tx;
