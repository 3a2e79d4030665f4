//! Error types for phonevault.
//!
//! Every variant is a distinct failure mode of the persistence layer.
//! Messages are intentionally minimal. They say *what* failed without
//! echoing key material or decrypted bytes.

use std::path::PathBuf;

use thiserror::Error;

/// The single error type for all phonevault operations.
#[derive(Debug, Error)]
pub enum PhonevaultError {
    /// The supplied key text was not hex, or did not decode to exactly
    /// 16 bytes. The reason never contains the key itself.
    #[error("invalid key: {0}")]
    InvalidKeyInput(&'static str),

    /// The bytes handed to the codec are not a valid encoded phone book.
    #[error("malformed phone book data")]
    MalformedData(#[from] serde_json::Error),

    /// A store file exists but its contents could not be decrypted into a
    /// phone book. Either the key is wrong or the file has been damaged.
    #[error("wrong key or corrupt data in {}", path.display())]
    WrongKeyOrCorruptData { path: PathBuf },

    /// Any other filesystem failure while reading or writing the store.
    #[error("i/o error on {}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The system's random number generator failed to produce bytes.
    #[error("randomness source failed")]
    RandomnessFailure,

    /// A contact name was empty.
    #[error("contact name must not be empty")]
    EmptyContactName,
}

impl PhonevaultError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}
