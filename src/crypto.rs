//! Low-level cryptographic operations.
//!
//! This module is the only place in the crate that touches the block cipher.
//! Everything above it encrypts and decrypts exclusively through `encrypt`
//! and `decrypt`.
//!
//! Primitive choices:
//! - **Cipher**: AES-128 in counter mode (confidentiality only, no tag)
//! - **IV**: 128 bits, generated fresh per encryption via `SystemRandom`
//! - **Counter**: the IV is the initial block, incremented as a 128-bit
//!   big-endian integer
//! - **Key size**: 128 bits (16 bytes)
//!
//! Counter mode has no integrity check. A wrong key or a tampered ciphertext
//! decrypts to garbage without error; detection happens in the codec.

use aes::cipher::generic_array::GenericArray;
use aes::cipher::{KeyIvInit, StreamCipher};
use aes::Aes128;
use ring::rand::{SecureRandom, SystemRandom};

use crate::error::PhonevaultError;
use crate::keys::EncryptionKey;

type Aes128Ctr = ctr::Ctr128BE<Aes128>;

/// Size of the initialization vector in bytes (one AES block).
pub const IV_LEN: usize = 16;

/// Size of an encryption key in bytes (128 bits).
pub const KEY_LEN: usize = 16;

/// An initialization vector for a single encryption.
pub type Iv = [u8; IV_LEN];

/// Generate a cryptographically secure random IV.
///
/// Uses `ring::rand::SystemRandom`. There is no IV caching and no
/// counter-based generation: every call draws fresh entropy, so two saves
/// under the same key never share a keystream.
fn generate_iv() -> Result<Iv, PhonevaultError> {
    let rng = SystemRandom::new();
    let mut iv = [0u8; IV_LEN];
    rng.fill(&mut iv).map_err(|_| PhonevaultError::RandomnessFailure)?;
    Ok(iv)
}

/// XOR `data` in place with the AES-128-CTR keystream for `key` and `iv`.
fn apply_keystream(key: &EncryptionKey, iv: &Iv, data: &mut [u8]) {
    let mut cipher = Aes128Ctr::new(
        GenericArray::from_slice(key.as_bytes()),
        GenericArray::from_slice(iv),
    );
    cipher.apply_keystream(data);
}

/// Encrypt `plaintext` under a freshly generated IV.
///
/// Returns the IV and the ciphertext separately. The ciphertext is always
/// exactly as long as the plaintext.
///
/// The only failure is the system random source refusing to produce an IV.
pub fn encrypt(key: &EncryptionKey, plaintext: &[u8]) -> Result<(Iv, Vec<u8>), PhonevaultError> {
    let iv = generate_iv()?;
    let mut ciphertext = plaintext.to_vec();
    apply_keystream(key, &iv, &mut ciphertext);
    Ok((iv, ciphertext))
}

/// Decrypt `ciphertext` that was produced under `iv`.
///
/// Infallible. A wrong key or damaged ciphertext yields garbage plaintext of
/// the same length, never an error.
pub fn decrypt(key: &EncryptionKey, iv: &Iv, ciphertext: &[u8]) -> Vec<u8> {
    let mut plaintext = ciphertext.to_vec();
    apply_keystream(key, iv, &mut plaintext);
    plaintext
}
