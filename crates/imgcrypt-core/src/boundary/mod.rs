//! Worker boundary.
//!
//! Crypto runs on a dedicated thread that only exchanges messages with the
//! caller. A request is `{"action": "encrypt" | "decrypt", "data": {...}}`;
//! every request gets exactly one `{"success", "result" | "error"}` reply.
//! Error strings in replies come from [`CryptError::user_message`] and never
//! carry key material or cipher internals.
//!
//! [`CryptError::user_message`]: crate::error::CryptError::user_message

pub mod handler;
pub mod message;
pub mod worker;

pub use handler::{handle_message, handle_request, TaskHandler};
pub use message::{
    Action, DecryptionRequest, EncryptionRequest, TaskRequest, TaskResponse, TaskResult,
};
pub use worker::{CryptoWorker, WorkerConfig, WorkerState};
