//! Secret Service / Credential Manager lookup via the keyring crate

use keyring::Entry;

use super::{CredentialError, CredentialSource};

pub struct KeyringSource {
    entry: String,
}

impl KeyringSource {
    pub fn new(entry: &str) -> Self {
        Self {
            entry: entry.to_string(),
        }
    }
}

impl CredentialSource for KeyringSource {
    fn read_entry(&self) -> Result<String, CredentialError> {
        let entry = Entry::new(&self.entry, "oauth")
            .map_err(|e| CredentialError::Lookup(e.to_string()))?;
        match entry.get_password() {
            Ok(raw) => Ok(raw),
            Err(keyring::Error::NoEntry) => Err(CredentialError::Lookup(format!(
                "no secure-store entry named {:?}",
                self.entry
            ))),
            Err(e) => Err(CredentialError::Lookup(e.to_string())),
        }
    }
}
