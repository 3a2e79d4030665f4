//! # phonevault
//!
//! A small persistent phone book (contact name -> phone number) whose file on
//! disk is encrypted with AES-128 in counter mode.
//!
//! Every save draws a fresh random IV and writes `IV || ciphertext`
//! atomically. Every load splits the file, decrypts and decodes it, and
//! refuses to hand back a book it cannot decode.
//!
//! Counter mode gives confidentiality only. A tampered file may decrypt to a
//! different but well-formed book; callers must not rely on integrity.
//!
//! ## Public API
//!
//! ```no_run
//! use phonevault::{contacts, EncryptionKey, Store, StoreConfig};
//!
//! # fn main() -> Result<(), phonevault::PhonevaultError> {
//! let key = EncryptionKey::from_hex("4552a7202d04fb997f31c649d5533255")?;
//! let mut store = Store::new(StoreConfig::new("data/phonebook.bin", key));
//!
//! let mut book = store.load()?;
//! contacts::add(&mut book, "Alice", "111")?;
//! store.save(&book)?;
//! # Ok(())
//! # }
//! ```

pub mod blob;
pub mod codec;
pub mod contacts;
pub mod crypto;
pub mod error;
pub mod journal;
pub mod keys;
pub mod menu;
pub mod store;

pub use codec::PhoneBook;
pub use error::PhonevaultError;
pub use keys::EncryptionKey;
pub use store::{Store, StoreConfig};
