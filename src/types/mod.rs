use serde::{Deserialize, Serialize};
use std::fmt;

pub mod bloom;

pub use bloom::Bloom;

pub type Height = u64;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize, PartialOrd, Ord)]
pub struct Hash32(pub [u8; 32]);

impl Hash32 {
    pub fn zero() -> Self {
        Self([0u8; 32])
    }
}

impl fmt::Display for Hash32 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", hex::encode(self.0))
    }
}

/// 20-byte account address (first 20 bytes of blake3 over the public key).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize, PartialOrd, Ord)]
pub struct Address(pub [u8; 20]);

impl Address {
    pub fn zero() -> Self {
        Self([0u8; 20])
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", hex::encode(self.0))
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tx {
    pub pubkey: Vec<u8>,
    pub nonce: u64,
    pub gas_price: u64,
    pub gas_limit: u64,
    /// `None` means contract creation.
    pub to: Option<Address>,
    pub value: u128,
    pub payload: Vec<u8>,
    pub signature: Vec<u8>,
    pub chain_id: u64,
}

impl Tx {
    pub fn is_create(&self) -> bool {
        self.to.is_none()
    }

    /// Deterministic tx hash using a fixed binary format.
    ///
    /// Format: "TSR_TX" || pubkey_len(2 LE) || pubkey || nonce(8 LE) ||
    ///         gas_price(8 LE) || gas_limit(8 LE) || to_flag(1) || to(20) ||
    ///         value(16 LE) || chain_id(8 LE) || payload_len(4 LE) || payload
    ///
    /// Signature is intentionally excluded: the hash is over the content
    /// being signed, not the signature itself.
    pub fn hash(&self) -> Hash32 {
        let mut buf =
            Vec::with_capacity(6 + 2 + self.pubkey.len() + 8 * 4 + 1 + 20 + 16 + 4 + self.payload.len());
        buf.extend_from_slice(b"TSR_TX");
        buf.extend_from_slice(&(self.pubkey.len() as u16).to_le_bytes());
        buf.extend_from_slice(&self.pubkey);
        buf.extend_from_slice(&self.nonce.to_le_bytes());
        buf.extend_from_slice(&self.gas_price.to_le_bytes());
        buf.extend_from_slice(&self.gas_limit.to_le_bytes());
        match &self.to {
            Some(to) => {
                buf.push(1);
                buf.extend_from_slice(&to.0);
            }
            None => buf.push(0),
        }
        buf.extend_from_slice(&self.value.to_le_bytes());
        buf.extend_from_slice(&self.chain_id.to_le_bytes());
        buf.extend_from_slice(&(self.payload.len() as u32).to_le_bytes());
        buf.extend_from_slice(&self.payload);
        hash_bytes(&buf)
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlockHeader {
    pub height: Height,
    pub parent: Hash32,
    pub beneficiary: Address,
    pub gas_limit: u64,
    pub timestamp: u64,
    pub difficulty: u64,
}

impl BlockHeader {
    /// Deterministic header ID using a fixed binary format.
    ///
    /// Format: "TSR_HDR" || height(8 LE) || parent(32) || beneficiary(20) ||
    ///         gas_limit(8 LE) || timestamp(8 LE) || difficulty(8 LE)
    ///
    /// This is stable across serde versions and JSON whitespace changes.
    pub fn id(&self) -> Hash32 {
        let mut buf = Vec::with_capacity(7 + 8 + 32 + 20 + 8 + 8 + 8);
        buf.extend_from_slice(b"TSR_HDR");
        buf.extend_from_slice(&self.height.to_le_bytes());
        buf.extend_from_slice(&self.parent.0);
        buf.extend_from_slice(&self.beneficiary.0);
        buf.extend_from_slice(&self.gas_limit.to_le_bytes());
        buf.extend_from_slice(&self.timestamp.to_le_bytes());
        buf.extend_from_slice(&self.difficulty.to_le_bytes());
        hash_bytes(&buf)
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Block {
    pub header: BlockHeader,
    pub txs: Vec<Tx>,
    /// Alternate-lineage headers eligible for partial reward.
    pub uncles: Vec<BlockHeader>,
}

impl Block {
    /// The block is identified by its header.
    pub fn id(&self) -> Hash32 {
        self.header.id()
    }
}

/// Event record emitted during execution, tagged with the transaction it
/// came from and its ordinal within that transaction.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Log {
    pub address: Address,
    pub topics: Vec<Hash32>,
    pub data: Vec<u8>,
    pub tx_hash: Hash32,
    pub index: u32,
}

/// Per-transaction outcome field. Below the status-receipts fork a receipt
/// commits to an intermediate state root; at or after the fork it carries a
/// success flag instead. The two are mutually exclusive by construction.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ReceiptOutcome {
    Root(Hash32),
    Status(bool),
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Receipt {
    pub tx_hash: Hash32,
    pub outcome: ReceiptOutcome,
    /// Gas used by this transaction alone.
    pub gas_used: u64,
    /// Running total over the block up to and including this transaction.
    pub cumulative_gas_used: u64,
    pub bloom: Bloom,
    /// Derived address when the transaction created a contract.
    pub contract_address: Option<Address>,
    pub logs: Vec<Log>,
}

impl Receipt {
    pub fn succeeded(&self) -> bool {
        !matches!(self.outcome, ReceiptOutcome::Status(false))
    }
}

pub fn hash_bytes(b: &[u8]) -> Hash32 {
    let h = blake3::hash(b);
    let mut out = [0u8; 32];
    out.copy_from_slice(h.as_bytes());
    Hash32(out)
}

/// receipts_root: hash over binary-encoded receipts (no serde_json).
///
/// Format per receipt: tx_hash(32) || outcome(1 + 32|1) || gas_used(8 LE) ||
///                     cumulative_gas_used(8 LE) || bloom(256) || log_count(4 LE)
pub fn receipts_root(receipts: &[Receipt]) -> Hash32 {
    let mut hasher = blake3::Hasher::new();
    hasher.update(b"TSR_RCPROOT");
    hasher.update(&(receipts.len() as u32).to_le_bytes());
    for r in receipts {
        hasher.update(&r.tx_hash.0);
        match &r.outcome {
            ReceiptOutcome::Root(root) => {
                hasher.update(&[0u8]);
                hasher.update(&root.0);
            }
            ReceiptOutcome::Status(ok) => {
                hasher.update(&[1u8]);
                hasher.update(&[*ok as u8]);
            }
        }
        hasher.update(&r.gas_used.to_le_bytes());
        hasher.update(&r.cumulative_gas_used.to_le_bytes());
        hasher.update(&r.bloom.0);
        hasher.update(&(r.logs.len() as u32).to_le_bytes());
    }
    let h = hasher.finalize();
    let mut out = [0u8; 32];
    out.copy_from_slice(h.as_bytes());
    Hash32(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_tx() -> Tx {
        Tx {
            pubkey: vec![7u8; 32],
            nonce: 3,
            gas_price: 2,
            gas_limit: 50_000,
            to: Some(Address([0xAB; 20])),
            value: 1_000,
            payload: b"hello".to_vec(),
            signature: vec![0u8; 64],
            chain_id: 1,
        }
    }

    #[test]
    fn tx_hash_ignores_signature() {
        let a = sample_tx();
        let mut b = sample_tx();
        b.signature = vec![0xFF; 64];
        assert_eq!(a.hash(), b.hash());
    }

    #[test]
    fn tx_hash_covers_recipient() {
        let a = sample_tx();
        let mut b = sample_tx();
        b.to = None;
        assert_ne!(a.hash(), b.hash());
    }

    #[test]
    fn header_id_changes_with_height() {
        let h = BlockHeader {
            height: 1,
            parent: Hash32::zero(),
            beneficiary: Address::zero(),
            gas_limit: 1_000_000,
            timestamp: 42,
            difficulty: 100,
        };
        let mut h2 = h.clone();
        h2.height = 2;
        assert_ne!(h.id(), h2.id());
    }
}
