//! Sealing of signed secrets to the DON public key.
//!
//! Envelope layout (hex encoded, 0x-prefixed):
//! ```text
//! version (1) || ephemeral pubkey, SEC1 compressed (33) || nonce (12) || ChaCha20-Poly1305 ciphertext
//! ```
//! The symmetric key is `SHA-256(ECDH shared x || ephemeral pubkey)`; the AAD
//! is `SHA-256(threshold public key)`, binding the envelope to the current
//! key set.
//!
//! This envelope does not interoperate with the network's threshold (TDH2)
//! scheme: live DON nodes cannot decrypt it. Replace [`seal`] through the
//! `SecretsManager` seam to talk to a production DON.

use chacha20poly1305::aead::{Aead, KeyInit, Payload};
use chacha20poly1305::{ChaCha20Poly1305, Key, Nonce};
use k256::ecdh::diffie_hellman;
use k256::elliptic_curve::sec1::ToEncodedPoint;
use k256::{PublicKey, SecretKey};
use rand::rngs::OsRng;
use rand::RngCore;
use sha2::{Digest, Sha256};

use crate::blockchain::DonKeys;
use crate::functions::types::{FunctionsError, FunctionsResult};

pub const ENVELOPE_VERSION: u8 = 1;
pub const EPHEMERAL_KEY_BYTES: usize = 33;
pub const NONCE_BYTES: usize = 12;

const HEADER_BYTES: usize = 1 + EPHEMERAL_KEY_BYTES + NONCE_BYTES;

/// Parse the coordinator's DON key: 64 raw bytes or 65/33 SEC1 bytes.
pub fn parse_don_public_key(raw: &[u8]) -> FunctionsResult<PublicKey> {
    let parsed = if raw.len() == 64 {
        let mut sec1 = Vec::with_capacity(65);
        sec1.push(0x04);
        sec1.extend_from_slice(raw);
        PublicKey::from_sec1_bytes(&sec1)
    } else {
        PublicKey::from_sec1_bytes(raw)
    };
    parsed.map_err(|_| FunctionsError::InvalidPublicKey(format!("{} bytes", raw.len())))
}

fn derive_key(shared_x: &[u8], ephemeral_public: &[u8]) -> [u8; 32] {
    let mut hasher = Sha256::new();
    hasher.update(shared_x);
    hasher.update(ephemeral_public);
    let mut key = [0u8; 32];
    key.copy_from_slice(&hasher.finalize());
    key
}

fn threshold_aad(keys: &DonKeys) -> Vec<u8> {
    Sha256::digest(&keys.threshold_public_key).to_vec()
}

/// Seal `plaintext` for the DON and return the envelope bytes.
pub fn seal(keys: &DonKeys, plaintext: &[u8]) -> FunctionsResult<Vec<u8>> {
    let don_public_key = parse_don_public_key(&keys.don_public_key)?;

    let ephemeral = SecretKey::random(&mut OsRng);
    let ephemeral_public = ephemeral.public_key().to_encoded_point(true);
    let shared = diffie_hellman(ephemeral.to_nonzero_scalar(), don_public_key.as_affine());
    let key = derive_key(shared.raw_secret_bytes(), ephemeral_public.as_bytes());

    let mut nonce = [0u8; NONCE_BYTES];
    OsRng.fill_bytes(&mut nonce);

    let cipher = ChaCha20Poly1305::new(Key::from_slice(&key));
    let aad = threshold_aad(keys);
    let ciphertext = cipher
        .encrypt(
            Nonce::from_slice(&nonce),
            Payload {
                msg: plaintext,
                aad: &aad,
            },
        )
        .map_err(|_| FunctionsError::Encryption("aead encrypt failed".to_string()))?;

    let mut envelope = Vec::with_capacity(HEADER_BYTES + ciphertext.len());
    envelope.push(ENVELOPE_VERSION);
    envelope.extend_from_slice(ephemeral_public.as_bytes());
    envelope.extend_from_slice(&nonce);
    envelope.extend_from_slice(&ciphertext);
    Ok(envelope)
}

/// Open an envelope with the DON secret key. Only the DON holds this key.
#[cfg(test)]
pub fn open(don_secret: &SecretKey, keys: &DonKeys, envelope: &[u8]) -> FunctionsResult<Vec<u8>> {
    if envelope.len() < HEADER_BYTES || envelope[0] != ENVELOPE_VERSION {
        return Err(FunctionsError::Encryption("malformed envelope".to_string()));
    }
    let ephemeral_bytes = &envelope[1..1 + EPHEMERAL_KEY_BYTES];
    let nonce = &envelope[1 + EPHEMERAL_KEY_BYTES..HEADER_BYTES];
    let ephemeral_public = PublicKey::from_sec1_bytes(ephemeral_bytes)
        .map_err(|_| FunctionsError::Encryption("bad ephemeral key".to_string()))?;

    let shared = diffie_hellman(don_secret.to_nonzero_scalar(), ephemeral_public.as_affine());
    let key = derive_key(shared.raw_secret_bytes(), ephemeral_bytes);
    let aad = threshold_aad(keys);

    ChaCha20Poly1305::new(Key::from_slice(&key))
        .decrypt(
            Nonce::from_slice(nonce),
            Payload {
                msg: &envelope[HEADER_BYTES..],
                aad: &aad,
            },
        )
        .map_err(|_| FunctionsError::Encryption("aead decrypt failed".to_string()))
}
