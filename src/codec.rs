//! Phone book model and its canonical byte encoding.
//!
//! A `PhoneBook` is serialized as a compact JSON object with keys in sorted
//! order, encoded as UTF-8. The same book always encodes to the same bytes.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::PhonevaultError;

/// A mapping from contact name to phone number.
///
/// Names are unique and non-empty. Numbers are free-form text. Iteration is
/// in name order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "BTreeMap<String, String>", into = "BTreeMap<String, String>")]
pub struct PhoneBook {
    entries: BTreeMap<String, String>,
}

impl PhoneBook {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or overwrite the number stored for `name`.
    ///
    /// Returns the previous number, if any.
    pub fn insert(&mut self, name: &str, number: &str) -> Result<Option<String>, PhonevaultError> {
        if name.is_empty() {
            return Err(PhonevaultError::EmptyContactName);
        }
        Ok(self.entries.insert(name.to_string(), number.to_string()))
    }

    /// Look up the number stored for `name`.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.entries.get(name).map(String::as_str)
    }

    /// Return the number of contacts.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if the book holds no contacts.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate over `(name, number)` pairs in name order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

impl TryFrom<BTreeMap<String, String>> for PhoneBook {
    type Error = &'static str;

    fn try_from(entries: BTreeMap<String, String>) -> Result<Self, Self::Error> {
        if entries.contains_key("") {
            return Err("empty contact name");
        }
        Ok(Self { entries })
    }
}

impl From<PhoneBook> for BTreeMap<String, String> {
    fn from(book: PhoneBook) -> Self {
        book.entries
    }
}

/// Encode a phone book to its canonical bytes.
///
/// Infallible: every key and value is already valid text.
pub fn encode(book: &PhoneBook) -> Vec<u8> {
    serde_json::to_vec(&book.entries).expect("a map of strings to strings always serializes")
}

/// Decode canonical bytes back into a phone book.
///
/// Fails with [`PhonevaultError::MalformedData`] if the bytes are not UTF-8,
/// not JSON, not an object of string values, or contain an empty name.
pub fn decode(bytes: &[u8]) -> Result<PhoneBook, PhonevaultError> {
    Ok(serde_json::from_slice(bytes)?)
}
