//! On-disk framing of an encrypted phone book.
//!
//! # Layout
//! ```text
//! [ IV (16 bytes) ][ ciphertext (N bytes) ]
//! ```
//!
//! No magic number, no version byte, no length prefix. `N` is the file
//! length minus 16 and always equals the plaintext length.

use crate::crypto::{Iv, IV_LEN};

/// An IV and the ciphertext it was used to produce.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredBlob {
    pub iv: Iv,
    pub ciphertext: Vec<u8>,
}

impl StoredBlob {
    /// Split raw file bytes into IV and ciphertext.
    ///
    /// Returns `None` if there are fewer bytes than an IV.
    pub fn from_bytes(bytes: &[u8]) -> Option<Self> {
        if bytes.len() < IV_LEN {
            return None;
        }
        let (iv, ciphertext) = bytes.split_at(IV_LEN);
        Some(Self {
            iv: iv.try_into().ok()?,
            ciphertext: ciphertext.to_vec(),
        })
    }

    /// Concatenate IV and ciphertext into the bytes written to disk.
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(IV_LEN + self.ciphertext.len());
        out.extend_from_slice(&self.iv);
        out.extend_from_slice(&self.ciphertext);
        out
    }
}
