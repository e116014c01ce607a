//! Error types for imgcrypt core operations.
//!
//! Errors carry diagnostic detail at the core level. Anything that crosses
//! the worker boundary goes through [`CryptError::user_message`], which
//! never includes internal detail.

use std::time::Duration;

use thiserror::Error;

/// Result type alias for imgcrypt operations.
pub type Result<T> = std::result::Result<T, CryptError>;

/// Message returned for faults that do not map onto the taxonomy.
pub const UNEXPECTED_ERROR_MESSAGE: &str = "An unexpected error occurred";

/// Core error type for imgcrypt operations.
#[derive(Debug, Error)]
pub enum CryptError {
    /// Malformed task message or missing required field
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Password shorter than the encryption minimum
    #[error("Password must be at least {min} characters")]
    WeakPassword { min: usize },

    /// Structurally malformed encrypted payload
    #[error("Invalid encrypted file: {0}")]
    InvalidPayload(String),

    /// PBKDF2 step failed
    #[error("Key derivation failed: {0}")]
    KeyDerivation(String),

    /// AEAD encryption or randomness failure
    #[error("Encryption failed: {0}")]
    Encryption(String),

    /// Tag verification failed (wrong password or tampered data)
    #[error("Decryption failed: wrong password or corrupted file")]
    AuthenticationFailed,

    /// The worker did not answer within the configured timeout
    #[error("Operation timed out after {0:?}")]
    Timeout(Duration),

    /// The worker thread is gone or could not be started
    #[error("Worker unavailable: {0}")]
    WorkerUnavailable(String),

    /// A task failed on the worker; carries the outward message and the
    /// category reported by the worker
    #[error("{message}")]
    TaskFailed { kind: &'static str, message: String },

    /// I/O error
    #[error("I/O error: {source}")]
    Io {
        #[from]
        source: std::io::Error,
    },

    /// JSON serialization error
    #[error("JSON error: {source}")]
    Json {
        #[from]
        source: serde_json::Error,
    },
}

impl CryptError {
    /// The message shown to the caller.
    ///
    /// Input and payload errors keep their detail since it only describes
    /// what the caller sent. Crypto failures collapse to a fixed string.
    pub fn user_message(&self) -> String {
        match self {
            CryptError::InvalidInput(_)
            | CryptError::WeakPassword { .. }
            | CryptError::InvalidPayload(_)
            | CryptError::AuthenticationFailed
            | CryptError::Timeout(_)
            | CryptError::TaskFailed { .. } => self.to_string(),
            CryptError::KeyDerivation(_) => "Key derivation failed".to_string(),
            CryptError::Encryption(_) => "Encryption failed".to_string(),
            CryptError::WorkerUnavailable(_) => "Worker unavailable".to_string(),
            CryptError::Io { .. } | CryptError::Json { .. } => {
                UNEXPECTED_ERROR_MESSAGE.to_string()
            }
        }
    }

    /// Short stable name of the error category, used as a log field.
    pub fn kind(&self) -> &'static str {
        match self {
            CryptError::InvalidInput(_) => "invalid_input",
            CryptError::WeakPassword { .. } => "weak_password",
            CryptError::InvalidPayload(_) => "invalid_payload",
            CryptError::KeyDerivation(_) => "key_derivation",
            CryptError::Encryption(_) => "encryption",
            CryptError::AuthenticationFailed => "authentication_failed",
            CryptError::Timeout(_) => "timeout",
            CryptError::WorkerUnavailable(_) => "worker_unavailable",
            CryptError::TaskFailed { kind, .. } => *kind,
            CryptError::Io { .. } => "io",
            CryptError::Json { .. } => "json",
        }
    }
}
