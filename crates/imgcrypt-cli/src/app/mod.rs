//! Application-level utilities for the imgcrypt CLI.
//!
//! This module provides:
//! - The per-invocation context (CLI args + config)
//! - Password acquisition
//! - The session that owns the crypto worker

mod context;
mod password;
mod session;

pub use context::AppContext;
pub use password::{decryption_password, encryption_password};
pub use session::{ensure_exists, load_payload, Session};
