//! # imgcrypt Core
//!
//! Core library for imgcrypt - password-based encryption of image files.
//!
//! This crate provides the crypto engine, the encrypted payload format, and
//! the worker boundary that runs crypto off the caller's thread, independent
//! of the CLI interface.
//!
//! ## Architecture
//!
//! - **crypto**: PBKDF2 key derivation, AES-256-GCM, password checks
//! - **payload**: The JSON payload that is persisted and exchanged
//! - **boundary**: Task messages, dispatch, and the worker thread
//! - **fs**: Atomic file writes

pub mod boundary;
pub mod crypto;
pub mod error;
pub mod fs;
pub mod payload;

pub use boundary::{
    CryptoWorker, TaskHandler, TaskRequest, TaskResponse, TaskResult, WorkerConfig, WorkerState,
};
pub use crypto::CryptoEngine;
pub use error::{CryptError, Result};
pub use payload::{EncryptedPayload, PayloadSummary};

/// Core version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert!(!VERSION.is_empty());
    }
}
