use super::CryptoError;
use crate::crypto::tx::{derive_address, tx_sign_bytes};
use crate::types::{Address, Tx};
use ed25519_dalek::{Signature, Signer as DalekSigner, SigningKey, Verifier as DalekVerifier, VerifyingKey};
use rand::rngs::OsRng;

#[derive(Clone)]
pub struct Keypair {
    sk: SigningKey,
}

impl Keypair {
    pub fn generate() -> Self {
        let mut rng = OsRng;
        Self {
            sk: SigningKey::generate(&mut rng),
        }
    }

    pub fn from_seed(seed32: [u8; 32]) -> Self {
        Self {
            sk: SigningKey::from_bytes(&seed32),
        }
    }

    pub fn public_key(&self) -> Vec<u8> {
        self.sk.verifying_key().to_bytes().to_vec()
    }

    pub fn address(&self) -> Address {
        derive_address(&self.public_key())
    }

    pub fn sign(&self, msg: &[u8]) -> Vec<u8> {
        let sig: Signature = self.sk.sign(msg);
        sig.to_bytes().to_vec()
    }

    /// Fill in `pubkey` and `signature` over the tx's canonical sign-bytes.
    pub fn sign_tx(&self, tx: &mut Tx) {
        tx.pubkey = self.public_key();
        tx.signature = self.sign(&tx_sign_bytes(tx));
    }
}

pub fn verify(pubkey: &[u8], msg: &[u8], sig: &[u8]) -> Result<(), CryptoError> {
    let vk = VerifyingKey::from_bytes(
        pubkey
            .try_into()
            .map_err(|_| CryptoError::Key("bad pubkey length".into()))?,
    )
    .map_err(|e| CryptoError::Key(format!("{e}")))?;

    let sig = Signature::from_bytes(
        sig.try_into()
            .map_err(|_| CryptoError::Key("bad signature length".into()))?,
    );
    vk.verify(msg, &sig).map_err(|_| CryptoError::InvalidSignature)
}
