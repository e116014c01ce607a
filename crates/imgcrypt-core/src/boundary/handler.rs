//! Dispatch of validated tasks to a handler.

use std::any::Any;
use std::panic::{catch_unwind, AssertUnwindSafe};

use serde_json::Value;

use super::message::{TaskRequest, TaskResponse, TaskResult};
use crate::crypto::CryptoEngine;
use crate::error::{CryptError, Result, UNEXPECTED_ERROR_MESSAGE};

/// Something that can execute tasks on the worker thread.
pub trait TaskHandler: Send + 'static {
    fn handle(&self, request: TaskRequest) -> Result<TaskResult>;
}

impl TaskHandler for CryptoEngine {
    fn handle(&self, request: TaskRequest) -> Result<TaskResult> {
        use secrecy::ExposeSecret;

        match request {
            TaskRequest::Encrypt(req) => {
                let payload = self.encrypt(
                    &req.image_data,
                    req.password.expose_secret(),
                    req.mime_type.as_deref(),
                )?;
                Ok(TaskResult::Payload(payload))
            }
            TaskRequest::Decrypt(req) => {
                let plaintext = self.decrypt(&req.payload, req.password.expose_secret())?;
                Ok(TaskResult::Plaintext(plaintext))
            }
        }
    }
}

/// Validate, dispatch, and answer one raw message.
///
/// Always returns exactly one response. Panics inside the handler are caught
/// and reported as [`UNEXPECTED_ERROR_MESSAGE`].
pub fn handle_message<H: TaskHandler + ?Sized>(handler: &H, message: Value) -> TaskResponse {
    contain(|| dispatch(handler, TaskRequest::from_message(message)?))
}

/// Answer a request that was built in-process.
///
/// Skips JSON entirely so large images are never expanded into `Value`
/// arrays. Same response and panic guarantees as [`handle_message`].
pub fn handle_request<H: TaskHandler + ?Sized>(handler: &H, request: TaskRequest) -> TaskResponse {
    contain(|| {
        request.validate()?;
        dispatch(handler, request)
    })
}

fn dispatch<H: TaskHandler + ?Sized>(handler: &H, request: TaskRequest) -> Result<TaskResult> {
    tracing::debug!(action = request.action().as_str(), "task started");
    handler.handle(request)
}

fn contain(task: impl FnOnce() -> Result<TaskResult>) -> TaskResponse {
    match catch_unwind(AssertUnwindSafe(task)) {
        Ok(Ok(result)) => TaskResponse::success(result),
        Ok(Err(err)) => {
            log_failure(&err);
            TaskResponse::from_error(&err)
        }
        Err(panic) => {
            tracing::error!(panic = %panic_message(panic.as_ref()), "task handler panicked");
            TaskResponse::failure(UNEXPECTED_ERROR_MESSAGE)
        }
    }
}

fn log_failure(err: &CryptError) {
    match err {
        CryptError::KeyDerivation(_) | CryptError::Encryption(_) => {
            tracing::error!(kind = err.kind(), error = %err, "task failed");
        }
        _ => {
            tracing::info!(kind = err.kind(), error = %err, "task rejected");
        }
    }
}

fn panic_message(panic: &(dyn Any + Send)) -> String {
    if let Some(message) = panic.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = panic.downcast_ref::<String>() {
        message.clone()
    } else {
        "non-string panic payload".to_string()
    }
}
