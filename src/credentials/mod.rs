//! Secure-credential-store access for the Claude Code OAuth token
//! - macOS: Keychain via the `security` CLI
//! - elsewhere: Secret Service / Credential Manager via the keyring crate

#[cfg(target_os = "macos")]
pub mod keychain;
#[cfg(not(target_os = "macos"))]
pub mod keyring_store;

#[derive(Debug, thiserror::Error)]
pub enum CredentialError {
    #[error("credential lookup failed: {0}")]
    Lookup(String),
    #[error("credential store returned malformed JSON: {0}")]
    Malformed(#[from] serde_json::Error),
    #[error("credential entry has no claudeAiOauth.accessToken field")]
    MissingToken,
}

/// Read access to one platform secure-store entry. Implementations
/// block (subprocess or IPC to the store daemon); callers run them on
/// a worker thread.
pub trait CredentialSource: Send + Sync {
    /// Returns the raw text stored under the configured entry.
    fn read_entry(&self) -> Result<String, CredentialError>;

    /// Looks the entry up and extracts the OAuth access token.
    fn fetch(&self) -> Result<String, CredentialError> {
        extract_access_token(&self.read_entry()?)
    }
}

/// Pulls `claudeAiOauth.accessToken` out of the stored JSON document.
pub fn extract_access_token(raw: &str) -> Result<String, CredentialError> {
    let json: serde_json::Value = serde_json::from_str(raw.trim())?;
    json["claudeAiOauth"]["accessToken"]
        .as_str()
        .map(String::from)
        .ok_or(CredentialError::MissingToken)
}

/// Returns the secure-store implementation for the current platform.
pub fn platform_source(entry: &str) -> Box<dyn CredentialSource> {
    #[cfg(target_os = "macos")]
    {
        Box::new(keychain::SecurityCli::new(entry))
    }
    #[cfg(not(target_os = "macos"))]
    {
        Box::new(keyring_store::KeyringSource::new(entry))
    }
}
