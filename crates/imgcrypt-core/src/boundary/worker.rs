//! The isolated worker thread and its caller-side handle.
//!
//! Requests travel over an unbounded `mpsc` channel; each one carries its own
//! `oneshot` sender for the reply. Raw JSON messages are validated on the
//! worker. The typed `encrypt`/`decrypt` helpers send the request itself, so
//! image bytes move into the worker without being copied into JSON. The worker thread owns the handler and
//! processes one envelope at a time until the request channel closes.
//!
//! A running OS thread cannot be killed. Terminating a worker closes its
//! request channel and drops the pending reply receiver, so a stuck task is
//! abandoned: the thread exits once the task returns and its result is
//! discarded.

use std::thread::{self, JoinHandle};
use std::time::Duration;

use serde_json::Value;
use tokio::sync::{mpsc, oneshot};
use uuid::Uuid;
use zeroize::Zeroizing;

use super::handler::{handle_message, handle_request, TaskHandler};
use super::message::{
    DecryptionRequest, EncryptionRequest, TaskRequest, TaskResponse, TaskResult,
};
use crate::crypto::CryptoEngine;
use crate::error::{CryptError, Result, UNEXPECTED_ERROR_MESSAGE};
use crate::payload::EncryptedPayload;

/// Worker lifecycle options.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkerConfig {
    /// Give up on a task after this long. `None` waits forever.
    pub task_timeout: Option<Duration>,
    /// Tear down and recreate the worker thread after every task.
    pub recycle_after_task: bool,
    /// Start a fresh worker when submitting to a terminated one.
    pub auto_respawn: bool,
}

impl Default for WorkerConfig {
    fn default() -> Self {
        Self {
            task_timeout: None,
            recycle_after_task: false,
            auto_respawn: true,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WorkerState {
    Idle,
    /// A task has been sent and no response has been received yet
    Busy,
    Terminated,
}

enum Task {
    Raw(Value),
    Typed(TaskRequest),
}

struct Envelope {
    id: Uuid,
    task: Task,
    reply: oneshot::Sender<TaskResponse>,
}

/// Caller-side handle to a worker thread.
///
/// `submit` takes `&mut self`, so a handle can have at most one task in
/// flight. Use several workers to process files concurrently.
pub struct CryptoWorker<H: TaskHandler + Clone = CryptoEngine> {
    handler: H,
    config: WorkerConfig,
    sender: Option<mpsc::UnboundedSender<Envelope>>,
    thread: Option<JoinHandle<()>>,
    state: WorkerState,
    generation: u64,
}

impl CryptoWorker<CryptoEngine> {
    /// Start a worker backed by the default crypto engine.
    pub fn new(config: WorkerConfig) -> Result<Self> {
        Self::spawn(CryptoEngine::default(), config)
    }
}

impl<H: TaskHandler + Clone> CryptoWorker<H> {
    /// Start a worker thread running `handler`.
    pub fn spawn(handler: H, config: WorkerConfig) -> Result<Self> {
        let mut worker = Self {
            handler,
            config,
            sender: None,
            thread: None,
            state: WorkerState::Terminated,
            generation: 0,
        };
        worker.start_thread()?;
        Ok(worker)
    }

    pub fn state(&self) -> WorkerState {
        self.state
    }

    pub fn config(&self) -> &WorkerConfig {
        &self.config
    }

    /// Number of worker threads started by this handle so far.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Send one raw task message and wait for its response.
    ///
    /// # Errors
    ///
    /// - `Timeout` if `task_timeout` elapses; the worker is terminated
    /// - `WorkerUnavailable` if the worker is terminated and `auto_respawn`
    ///   is off, or if the worker thread died before answering
    ///
    /// Task-level failures are not errors here; they come back as a
    /// `TaskResponse` with `success: false`.
    pub async fn submit(&mut self, message: Value) -> Result<TaskResponse> {
        self.dispatch(Task::Raw(message)).await
    }

    async fn dispatch(&mut self, task: Task) -> Result<TaskResponse> {
        match self.state {
            WorkerState::Idle => {}
            WorkerState::Busy => {
                // The previous submit future was dropped before its reply arrived.
                tracing::warn!("previous task was abandoned; restarting worker");
                self.respawn()?;
            }
            WorkerState::Terminated => {
                if !self.config.auto_respawn {
                    return Err(CryptError::WorkerUnavailable(
                        "worker has been terminated".to_string(),
                    ));
                }
                self.respawn()?;
            }
        }

        let sender = self
            .sender
            .as_ref()
            .ok_or_else(|| CryptError::WorkerUnavailable("worker is not running".to_string()))?;

        let id = Uuid::new_v4();
        let (reply, receiver) = oneshot::channel();
        if sender.send(Envelope { id, task, reply }).is_err() {
            self.mark_terminated();
            return Err(CryptError::WorkerUnavailable(
                "worker thread has exited".to_string(),
            ));
        }
        self.state = WorkerState::Busy;
        tracing::debug!(task_id = %id, generation = self.generation, "task submitted");

        let received = match self.config.task_timeout {
            Some(limit) => match tokio::time::timeout(limit, receiver).await {
                Ok(received) => received,
                Err(_) => {
                    tracing::warn!(
                        task_id = %id,
                        timeout = ?limit,
                        "task timed out; terminating worker"
                    );
                    self.terminate();
                    return Err(CryptError::Timeout(limit));
                }
            },
            None => receiver.await,
        };

        let response = match received {
            Ok(response) => response,
            Err(_) => {
                self.mark_terminated();
                return Err(CryptError::WorkerUnavailable(
                    "worker exited without responding".to_string(),
                ));
            }
        };

        self.state = WorkerState::Idle;
        tracing::debug!(task_id = %id, success = response.success, "task finished");

        if self.config.recycle_after_task {
            self.respawn()?;
        }

        Ok(response)
    }

    /// Encrypt through the worker and return the payload.
    pub async fn encrypt(&mut self, request: EncryptionRequest) -> Result<EncryptedPayload> {
        let task = Task::Typed(TaskRequest::Encrypt(request));
        match self.dispatch(task).await?.into_result()? {
            TaskResult::Payload(payload) => Ok(payload),
            TaskResult::Plaintext(_) => Err(unexpected_result()),
        }
    }

    /// Decrypt through the worker and return the image bytes, wiped on drop.
    pub async fn decrypt(&mut self, request: DecryptionRequest) -> Result<Zeroizing<Vec<u8>>> {
        let task = Task::Typed(TaskRequest::Decrypt(request));
        match self.dispatch(task).await?.into_result()? {
            TaskResult::Plaintext(plaintext) => Ok(Zeroizing::new(plaintext)),
            TaskResult::Payload(_) => Err(unexpected_result()),
        }
    }

    /// Abandon any outstanding task and stop accepting new ones.
    pub fn terminate(&mut self) {
        if self.state == WorkerState::Terminated {
            return;
        }
        tracing::debug!(generation = self.generation, "terminating worker");
        self.mark_terminated();
    }

    /// Close the request channel and block until the worker thread exits.
    ///
    /// Waits for an in-progress task to finish; use [`terminate`] to abandon
    /// one instead.
    ///
    /// [`terminate`]: CryptoWorker::terminate
    pub fn shutdown(mut self) {
        self.sender = None;
        if let Some(thread) = self.thread.take() {
            if thread.join().is_err() {
                tracing::warn!(generation = self.generation, "worker thread panicked");
            }
        }
        self.state = WorkerState::Terminated;
    }

    /// Replace the worker thread with a fresh one.
    pub fn respawn(&mut self) -> Result<()> {
        self.terminate();
        self.start_thread()
    }

    fn mark_terminated(&mut self) {
        self.sender = None;
        // Detach: the thread may still be inside a task.
        self.thread = None;
        self.state = WorkerState::Terminated;
    }

    fn start_thread(&mut self) -> Result<()> {
        let (sender, mut receiver) = mpsc::unbounded_channel::<Envelope>();
        let handler = self.handler.clone();
        let generation = self.generation + 1;

        let thread = thread::Builder::new()
            .name(format!("imgcrypt-worker-{}", generation))
            .spawn(move || {
                while let Some(envelope) = receiver.blocking_recv() {
                    let response = match envelope.task {
                        Task::Raw(message) => handle_message(&handler, message),
                        Task::Typed(request) => handle_request(&handler, request),
                    };
                    if envelope.reply.send(response).is_err() {
                        tracing::debug!(
                            task_id = %envelope.id,
                            "caller went away; response dropped"
                        );
                    }
                }
                tracing::trace!(generation, "worker thread exiting");
            })
            .map_err(|e| CryptError::WorkerUnavailable(format!("failed to start worker: {}", e)))?;

        self.sender = Some(sender);
        self.thread = Some(thread);
        self.generation = generation;
        self.state = WorkerState::Idle;
        Ok(())
    }
}

impl<H: TaskHandler + Clone> Drop for CryptoWorker<H> {
    fn drop(&mut self) {
        self.mark_terminated();
    }
}

impl<H: TaskHandler + Clone> std::fmt::Debug for CryptoWorker<H> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CryptoWorker")
            .field("state", &self.state)
            .field("generation", &self.generation)
            .field("config", &self.config)
            .finish()
    }
}

fn unexpected_result() -> CryptError {
    CryptError::TaskFailed {
        kind: "unexpected",
        message: UNEXPECTED_ERROR_MESSAGE.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn test_new_worker_is_idle() {
        let worker = CryptoWorker::new(WorkerConfig::default()).unwrap();
        assert_eq!(worker.state(), WorkerState::Idle);
        assert_eq!(worker.generation(), 1);
    }

    #[tokio::test]
    async fn test_submit_returns_failure_response_for_bad_message() {
        let mut worker = CryptoWorker::new(WorkerConfig::default()).unwrap();
        let response = worker.submit(json!({ "data": {} })).await.unwrap();
        assert!(!response.success);
        assert_eq!(response.error.as_deref(), Some("Invalid input: missing action"));
        assert_eq!(worker.state(), WorkerState::Idle);
    }

    #[tokio::test]
    async fn test_terminated_worker_without_respawn_rejects() {
        let config = WorkerConfig {
            auto_respawn: false,
            ..WorkerConfig::default()
        };
        let mut worker = CryptoWorker::new(config).unwrap();
        worker.terminate();
        assert_eq!(worker.state(), WorkerState::Terminated);

        let result = worker.submit(json!({ "action": "encrypt" })).await;
        assert!(matches!(result, Err(CryptError::WorkerUnavailable(_))));
    }

    #[tokio::test]
    async fn test_terminated_worker_respawns_on_submit() {
        let mut worker = CryptoWorker::new(WorkerConfig::default()).unwrap();
        worker.terminate();

        let response = worker
            .submit(json!({ "action": "nope", "data": {} }))
            .await
            .unwrap();
        assert!(!response.success);
        assert_eq!(worker.generation(), 2);
        assert_eq!(worker.state(), WorkerState::Idle);
    }

    #[test]
    fn test_default_config() {
        let config = WorkerConfig::default();
        assert!(config.task_timeout.is_none());
        assert!(!config.recycle_after_task);
        assert!(config.auto_respawn);
    }
}
