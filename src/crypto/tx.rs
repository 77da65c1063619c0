use crate::types::{Address, Tx};

pub fn derive_address(pubkey: &[u8]) -> Address {
    let h = blake3::hash(pubkey);
    let mut out = [0u8; 20];
    out.copy_from_slice(&h.as_bytes()[..20]);
    Address(out)
}

/// Canonical bytes a transaction is signed over. The signature field itself
/// is excluded; chain id is included for replay protection.
pub fn tx_sign_bytes(tx: &Tx) -> Vec<u8> {
    serde_json::to_vec(&(
        "tessera-tx-v1",
        tx.chain_id,
        &tx.pubkey,
        tx.nonce,
        tx.gas_price,
        tx.gas_limit,
        &tx.to,
        tx.value,
        &tx.payload,
    ))
    .unwrap_or_default()
}

/// Address of the contract created by `sender` at `nonce`. A deterministic
/// function of exactly those two inputs, so peers derive the same address
/// without executing anything.
pub fn contract_address(sender: &Address, nonce: u64) -> Address {
    let mut buf = Vec::with_capacity(10 + 20 + 8);
    buf.extend_from_slice(b"TSR_CREATE");
    buf.extend_from_slice(&sender.0);
    buf.extend_from_slice(&nonce.to_le_bytes());
    let h = blake3::hash(&buf);
    let mut out = [0u8; 20];
    out.copy_from_slice(&h.as_bytes()[..20]);
    Address(out)
}
