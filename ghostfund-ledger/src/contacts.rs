//! Contact address-book loading and sender resolution.
//!
//! The address-book CSV carries three columns:
//! `Saved Name`, `Contact's Public Display Name`, `Phone Number`.
//! The canonical name prefers the saved name, then the display name, then
//! the phone string itself.

use anyhow::{Context, Result};
use serde::Deserialize;
use std::collections::HashMap;
use std::fs::File;
use std::io::Read;
use std::path::Path;

/// Canonical identity a sender label resolves to.
#[derive(Debug, Clone, PartialEq)]
pub struct ContactEntry {
    pub name: String,
    pub phone: String,
}

/// Address-book keyed two ways: lowercased canonical name and normalized
/// phone. Built once per invocation, immutable after construction.
#[derive(Debug, Default)]
pub struct ContactBook {
    by_name: HashMap<String, ContactEntry>,
    by_phone: HashMap<String, ContactEntry>,
}

/// Strip a phone string down to digits plus a leading `+`.
pub fn normalize_phone(phone: &str) -> String {
    let mut out = String::new();
    for (i, c) in phone.trim().char_indices() {
        if c.is_ascii_digit() || (c == '+' && i == 0) {
            out.push(c);
        }
    }
    out
}

#[derive(Debug, Deserialize)]
struct ContactRecord {
    #[serde(rename = "Saved Name", default)]
    saved_name: String,
    #[serde(rename = "Contact's Public Display Name", default)]
    display_name: String,
    #[serde(rename = "Phone Number", default)]
    phone: String,
}

impl ContactBook {
    /// Load the address-book CSV. The file is required: an unreadable or
    /// absent book is fatal to ingestion.
    pub fn from_csv_path(path: impl AsRef<Path>) -> Result<Self> {
        let file = File::open(path.as_ref())
            .with_context(|| format!("opening contact book {}", path.as_ref().display()))?;
        Self::from_csv_reader(file)
            .with_context(|| format!("reading contact book {}", path.as_ref().display()))
    }

    /// Build the book from any CSV source with the expected headers.
    pub fn from_csv_reader<R: Read>(reader: R) -> Result<Self> {
        let mut rdr = csv::Reader::from_reader(reader);
        let mut book = ContactBook::default();

        for result in rdr.deserialize() {
            let rec: ContactRecord = result?;

            let saved = rec.saved_name.trim();
            let display = rec.display_name.trim();
            let phone = rec.phone.trim();

            let final_name = if !saved.is_empty() {
                saved
            } else if !display.is_empty() {
                display
            } else {
                phone
            };

            if final_name.is_empty() && phone.is_empty() {
                continue;
            }

            let entry = ContactEntry {
                name: if final_name.is_empty() {
                    phone.to_string()
                } else {
                    final_name.to_string()
                },
                phone: phone.to_string(),
            };

            if !final_name.is_empty() {
                book.by_name.insert(final_name.to_lowercase(), entry.clone());
            }

            let phone_norm = normalize_phone(phone);
            if !phone_norm.is_empty() {
                book.by_phone.insert(phone_norm, entry);
            }
        }

        log::debug!(
            "contact book loaded: {} names, {} phones",
            book.by_name.len(),
            book.by_phone.len()
        );
        Ok(book)
    }

    /// Resolve a raw sender label to a canonical identity.
    ///
    /// Order: exact lowercased-name hit; then, when the label carries any
    /// digit, a normalized-phone hit; otherwise the raw label with an
    /// empty phone. Total — every sender resolves.
    pub fn resolve(&self, sender: &str) -> ContactEntry {
        let sender = sender.trim();

        if let Some(entry) = self.by_name.get(&sender.to_lowercase()) {
            return entry.clone();
        }

        if sender.chars().any(|c| c.is_ascii_digit()) {
            if let Some(entry) = self.by_phone.get(&normalize_phone(sender)) {
                return entry.clone();
            }
        }

        ContactEntry {
            name: sender.to_string(),
            phone: String::new(),
        }
    }
}
