//! Encryption key ownership.
//!
//! The store is keyed by a single 16-byte AES-128 secret supplied from
//! outside the process: a key file, the environment, or an interactive
//! prompt. This module holds that secret in a type that is opaque,
//! non-cloneable, and zeroised on drop.
//!
//! Keys are never derived from passwords and never persisted by the store.

use std::fmt;
use std::str::FromStr;

use ring::rand::{SecureRandom, SystemRandom};
use zeroize::{Zeroize, ZeroizeOnDrop, Zeroizing};

use crate::crypto::KEY_LEN;
use crate::error::PhonevaultError;

/// The secret that encrypts and decrypts a store.
///
/// - Not `Clone`. Cannot be duplicated without explicit conversion.
/// - Zeroised on drop.
/// - `Debug` output is redacted.
#[derive(Zeroize, ZeroizeOnDrop)]
pub struct EncryptionKey {
    bytes: [u8; KEY_LEN],
}

impl EncryptionKey {
    /// Construct a key from raw bytes.
    pub fn from_bytes(bytes: [u8; KEY_LEN]) -> Self {
        Self { bytes }
    }

    /// Parse a key from hex text, e.g. `4552a7202d04fb997f31c649d5533255`.
    ///
    /// Surrounding whitespace is ignored so that keys read from files or
    /// pasted into a prompt parse cleanly. Anything other than exactly 32 hex
    /// digits is rejected with [`PhonevaultError::InvalidKeyInput`].
    pub fn from_hex(text: &str) -> Result<Self, PhonevaultError> {
        let decoded = Zeroizing::new(
            hex::decode(text.trim())
                .map_err(|_| PhonevaultError::InvalidKeyInput("key is not valid hex"))?,
        );
        let bytes: [u8; KEY_LEN] = decoded
            .as_slice()
            .try_into()
            .map_err(|_| PhonevaultError::InvalidKeyInput("key must be exactly 16 bytes"))?;
        Ok(Self { bytes })
    }

    /// Generate a fresh random key from the system's secure random source.
    pub fn generate() -> Result<Self, PhonevaultError> {
        let rng = SystemRandom::new();
        let mut bytes = [0u8; KEY_LEN];
        rng.fill(&mut bytes).map_err(|_| PhonevaultError::RandomnessFailure)?;
        Ok(Self { bytes })
    }

    /// Render the key as lowercase hex, for handing a freshly generated key
    /// to the user.
    pub fn to_hex(&self) -> Zeroizing<String> {
        Zeroizing::new(hex::encode(&self.bytes))
    }

    /// `pub(crate)`: raw bytes never leave the crate.
    pub(crate) fn as_bytes(&self) -> &[u8; KEY_LEN] {
        &self.bytes
    }
}

impl FromStr for EncryptionKey {
    type Err = PhonevaultError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_hex(s)
    }
}

impl fmt::Debug for EncryptionKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("EncryptionKey([redacted])")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_hex_accepts_sixteen_bytes() {
        let key = EncryptionKey::from_hex("4552a7202d04fb997f31c649d5533255").unwrap();
        assert_eq!(key.as_bytes()[0], 0x45);
        assert_eq!(key.as_bytes()[15], 0x55);
    }

    #[test]
    fn test_from_hex_trims_whitespace() {
        let key = EncryptionKey::from_hex("  000102030405060708090a0b0c0d0e0f\n").unwrap();
        assert_eq!(key.as_bytes(), &core::array::from_fn::<u8, 16, _>(|i| i as u8));
    }

    #[test]
    fn test_from_hex_rejects_bad_input() {
        let cases = [
            "",
            "zz",
            "00112233",
            "4552a7202d04fb997f31c649d553325",
            "4552a7202d04fb997f31c649d553325500",
        ];
        for bad in cases {
            assert!(
                matches!(EncryptionKey::from_hex(bad), Err(PhonevaultError::InvalidKeyInput(_))),
                "accepted {bad:?}"
            );
        }
    }

    #[test]
    fn test_debug_is_redacted() {
        let key = EncryptionKey::from_bytes([0xab; KEY_LEN]);
        let shown = format!("{key:?}");
        assert!(!shown.contains("ab"));
        assert!(shown.contains("redacted"));
    }

    #[test]
    fn test_generate_hex_roundtrip() {
        let key = EncryptionKey::generate().unwrap();
        let parsed: EncryptionKey = key.to_hex().parse().unwrap();
        assert_eq!(key.as_bytes(), parsed.as_bytes());
    }
}
