//! macOS Keychain lookup via the `security` CLI

use std::process::Command;

use super::{CredentialError, CredentialSource};

pub struct SecurityCli {
    entry: String,
}

impl SecurityCli {
    pub fn new(entry: &str) -> Self {
        Self {
            entry: entry.to_string(),
        }
    }
}

impl CredentialSource for SecurityCli {
    fn read_entry(&self) -> Result<String, CredentialError> {
        let output = Command::new("security")
            .args(["find-generic-password", "-s", &self.entry, "-w"])
            .output()
            .map_err(|e| CredentialError::Lookup(format!("failed to run security: {}", e)))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(CredentialError::Lookup(format!(
                "security exited with {}: {}",
                output.status,
                stderr.trim()
            )));
        }

        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}
