//! Encrypted persistence of a phone book.
//!
//! The store mediates between the in-memory `PhoneBook` and its encrypted
//! on-disk form:
//!
//! ```text
//! load:  read file -> split IV / ciphertext -> decrypt -> decode
//! save:  encode -> encrypt under fresh IV -> write temp file -> rename
//! ```
//!
//! A missing file is the normal first-run path and yields an empty book.
//! A present file that does not decode is never replaced by an empty book:
//! it surfaces as `WrongKeyOrCorruptData` and the caller decides what to do.

use std::fs;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;

use crate::blob::StoredBlob;
use crate::codec::{self, PhoneBook};
use crate::crypto;
use crate::error::PhonevaultError;
use crate::journal::{EventLog, EventSink, StoreEvent, StoreEventKind};
use crate::keys::EncryptionKey;

/// Where a store lives and the key that protects it.
#[derive(Debug)]
pub struct StoreConfig {
    pub path: PathBuf,
    pub key: EncryptionKey,
}

impl StoreConfig {
    pub fn new(path: impl Into<PathBuf>, key: EncryptionKey) -> Self {
        Self {
            path: path.into(),
            key,
        }
    }
}

/// An encrypted phone book file.
#[derive(Debug)]
pub struct Store {
    config: StoreConfig,
    journal: EventLog,
}

impl Store {
    pub fn new(config: StoreConfig) -> Self {
        Self {
            config,
            journal: EventLog::new(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.config.path
    }

    /// Attach a sink that receives a copy of every store event.
    pub fn add_event_sink(&mut self, sink: Box<dyn EventSink>) {
        self.journal.add_forward_sink(sink);
    }

    /// Read-only access to the event journal.
    pub fn journal(&self) -> &EventLog {
        &self.journal
    }

    /// Load the phone book from disk.
    ///
    /// - No file: returns an empty book.
    /// - File present but undecodable (too short, wrong key, damaged):
    ///   [`PhonevaultError::WrongKeyOrCorruptData`].
    /// - Any other read failure: [`PhonevaultError::Io`].
    pub fn load(&mut self) -> Result<PhoneBook, PhonevaultError> {
        let path = self.config.path.clone();

        let raw = match fs::read(&path) {
            Ok(raw) => raw,
            Err(err) if err.kind() == ErrorKind::NotFound => {
                tracing::info!(
                    path = %path.display(),
                    "no store file, starting with an empty phone book"
                );
                self.record(StoreEventKind::Created, Some(0));
                return Ok(PhoneBook::new());
            }
            Err(err) => return Err(PhonevaultError::io(path, err)),
        };

        match self.open(&raw) {
            Ok(book) => {
                tracing::info!(path = %path.display(), contacts = book.len(), "loaded phone book");
                self.record(StoreEventKind::Loaded, Some(book.len()));
                Ok(book)
            }
            Err(reason) => {
                tracing::warn!(
                    path = %path.display(),
                    bytes = raw.len(),
                    %reason,
                    "rejected store file"
                );
                self.record(StoreEventKind::Rejected, None);
                Err(PhonevaultError::WrongKeyOrCorruptData { path })
            }
        }
    }

    /// Encrypt and write `book`, fully replacing any previous file.
    ///
    /// The bytes go to a temporary file in the same directory, which is
    /// synced and then renamed over the target. A failure at any point
    /// leaves the previous file untouched.
    pub fn save(&mut self, book: &PhoneBook) -> Result<(), PhonevaultError> {
        let plaintext = codec::encode(book);
        let (iv, ciphertext) = crypto::encrypt(&self.config.key, &plaintext)?;
        let blob = StoredBlob { iv, ciphertext };

        let path = self.config.path.clone();
        write_atomic(&path, &blob.to_bytes())?;

        tracing::info!(path = %path.display(), contacts = book.len(), "saved phone book");
        tracing::debug!(plaintext_len = plaintext.len(), "wrote iv and ciphertext");
        self.record(StoreEventKind::Saved, Some(book.len()));
        Ok(())
    }

    /// Decrypt and decode raw file bytes. The error is a short reason for
    /// the log, never surfaced to callers as-is.
    fn open(&self, raw: &[u8]) -> Result<PhoneBook, String> {
        let blob = StoredBlob::from_bytes(raw).ok_or_else(|| "shorter than iv".to_string())?;
        let plaintext = crypto::decrypt(&self.config.key, &blob.iv, &blob.ciphertext);
        codec::decode(&plaintext).map_err(|err| err.to_string())
    }

    fn record(&mut self, kind: StoreEventKind, contacts: Option<usize>) {
        let event = StoreEvent::now(kind, &self.config.path, contacts);
        self.journal.append(event);
    }
}

/// Write `bytes` to `path` via a synced temporary file and a rename.
fn write_atomic(path: &Path, bytes: &[u8]) -> Result<(), PhonevaultError> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    fs::create_dir_all(dir).map_err(|e| PhonevaultError::io(dir, e))?;

    let mut tmp = NamedTempFile::new_in(dir).map_err(|e| PhonevaultError::io(dir, e))?;
    tmp.write_all(bytes)
        .and_then(|()| tmp.as_file().sync_all())
        .map_err(|e| PhonevaultError::io(tmp.path(), e))?;
    tmp.persist(path).map_err(|e| PhonevaultError::io(path, e.error))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crypto::IV_LEN;

    fn key(byte: u8) -> EncryptionKey {
        EncryptionKey::from_bytes([byte; 16])
    }

    #[test]
    fn test_missing_file_yields_empty_book() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = Store::new(StoreConfig::new(dir.path().join("none.bin"), key(1)));
        let book = store.load().unwrap();
        assert!(book.is_empty());
        assert_eq!(store.journal().last().unwrap().kind, StoreEventKind::Created);
    }

    #[test]
    fn test_save_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("pb.bin");
        let mut book = PhoneBook::new();
        book.insert("Alice", "111").unwrap();

        Store::new(StoreConfig::new(&path, key(1))).save(&book).unwrap();
        let loaded = Store::new(StoreConfig::new(&path, key(1))).load().unwrap();
        assert_eq!(loaded, book);

        let raw = fs::read(&path).unwrap();
        assert_eq!(raw.len(), IV_LEN + codec::encode(&book).len());
    }

    #[test]
    fn test_save_creates_parent_directories() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("data").join("nested").join("pb.bin");
        Store::new(StoreConfig::new(&path, key(4))).save(&PhoneBook::new()).unwrap();
        assert!(path.is_file());
    }

    #[test]
    fn test_save_leaves_no_temp_files() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("pb.bin");
        let mut store = Store::new(StoreConfig::new(&path, key(2)));
        store.save(&PhoneBook::new()).unwrap();
        store.save(&PhoneBook::new()).unwrap();

        let names: Vec<_> = fs::read_dir(dir.path())
            .unwrap()
            .map(|e| e.unwrap().file_name())
            .collect();
        assert_eq!(names, ["pb.bin"]);
    }

    #[test]
    fn test_wrong_key_rejected_and_journaled() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("pb.bin");
        let mut book = PhoneBook::new();
        book.insert("Bob", "222").unwrap();
        Store::new(StoreConfig::new(&path, key(1))).save(&book).unwrap();

        let mut store = Store::new(StoreConfig::new(&path, key(9)));
        let err = store.load().unwrap_err();
        assert!(matches!(err, PhonevaultError::WrongKeyOrCorruptData { .. }));
        assert_eq!(store.journal().last().unwrap().kind, StoreEventKind::Rejected);
    }
}
