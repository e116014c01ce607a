//! The encrypted payload: the one persisted artifact.
//!
//! On disk and on the wire this is a JSON object whose byte fields are
//! arrays of integers 0-255:
//!
//! ```text
//! {
//!   "salt": [16 bytes],
//!   "iv": [12 bytes],
//!   "encryptedData": [ciphertext + 16-byte tag],
//!   "mimeType": "image/png",      (optional)
//!   "version": "1.0",             (optional)
//!   "timestamp": 1718000000000    (optional, Unix ms)
//! }
//! ```

use std::path::Path;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::crypto::{IV_LENGTH, SALT_LENGTH, TAG_LENGTH};
use crate::error::{CryptError, Result};
use crate::fs::write_atomic;

/// Salt, IV, and ciphertext plus optional metadata.
///
/// Fields are private; a payload is either produced by encryption or parsed
/// from JSON, and never edited afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EncryptedPayload {
    salt: Vec<u8>,
    iv: Vec<u8>,
    encrypted_data: Vec<u8>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    mime_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    version: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    timestamp: Option<i64>,
}

/// Metadata view of a payload, readable without the password.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PayloadSummary {
    pub version: Option<String>,
    pub mime_type: Option<String>,
    pub created_at: Option<DateTime<Utc>>,
    pub ciphertext_bytes: usize,
    pub plaintext_bytes: usize,
    pub well_formed: bool,
}

impl EncryptedPayload {
    pub(crate) fn new(
        salt: [u8; SALT_LENGTH],
        iv: [u8; IV_LENGTH],
        encrypted_data: Vec<u8>,
        mime_type: Option<String>,
        version: &str,
        timestamp: i64,
    ) -> Self {
        Self {
            salt: salt.to_vec(),
            iv: iv.to_vec(),
            encrypted_data,
            mime_type,
            version: Some(version.to_string()),
            timestamp: Some(timestamp),
        }
    }

    pub fn salt(&self) -> &[u8] {
        &self.salt
    }

    pub fn iv(&self) -> &[u8] {
        &self.iv
    }

    /// Ciphertext with the authentication tag appended.
    pub fn ciphertext(&self) -> &[u8] {
        &self.encrypted_data
    }

    pub fn mime_type(&self) -> Option<&str> {
        self.mime_type.as_deref()
    }

    pub fn version(&self) -> Option<&str> {
        self.version.as_deref()
    }

    /// Creation time in Unix milliseconds.
    pub fn timestamp(&self) -> Option<i64> {
        self.timestamp
    }

    /// Check the structural invariants: 16-byte salt, 12-byte IV, non-empty
    /// ciphertext.
    pub fn validate(&self) -> Result<()> {
        if self.salt.len() != SALT_LENGTH {
            return Err(CryptError::InvalidPayload(format!(
                "salt must be {} bytes (got {})",
                SALT_LENGTH,
                self.salt.len()
            )));
        }

        if self.iv.len() != IV_LENGTH {
            return Err(CryptError::InvalidPayload(format!(
                "iv must be {} bytes (got {})",
                IV_LENGTH,
                self.iv.len()
            )));
        }

        if self.encrypted_data.is_empty() {
            return Err(CryptError::InvalidPayload(
                "encrypted data is empty".to_string(),
            ));
        }

        Ok(())
    }

    /// Parse a payload from JSON text.
    ///
    /// Any shape problem (missing arrays, values outside 0-255, wrong types)
    /// is reported as `InvalidPayload`. Lengths are checked by [`validate`].
    ///
    /// [`validate`]: EncryptedPayload::validate
    pub fn from_json(text: &str) -> Result<Self> {
        serde_json::from_str(text).map_err(|e| CryptError::InvalidPayload(e.to_string()))
    }

    /// Parse a payload from an already-decoded JSON value.
    pub fn from_value(value: serde_json::Value) -> Result<Self> {
        serde_json::from_value(value).map_err(|e| CryptError::InvalidPayload(e.to_string()))
    }

    /// Serialize to compact JSON.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    /// Serialize to indented JSON.
    pub fn to_json_pretty(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Read and parse a payload file.
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json(&text)
    }

    /// Write the payload as JSON, replacing `path` atomically.
    pub fn save(&self, path: &Path) -> Result<()> {
        let json = self.to_json()?;
        write_atomic(path, json.as_bytes())
    }

    pub fn summary(&self) -> PayloadSummary {
        PayloadSummary {
            version: self.version.clone(),
            mime_type: self.mime_type.clone(),
            created_at: self.timestamp.and_then(DateTime::<Utc>::from_timestamp_millis),
            ciphertext_bytes: self.encrypted_data.len(),
            plaintext_bytes: self.encrypted_data.len().saturating_sub(TAG_LENGTH),
            well_formed: self.validate().is_ok(),
        }
    }
}
