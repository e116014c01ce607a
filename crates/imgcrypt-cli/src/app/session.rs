//! The caller side of the worker boundary.
//!
//! A `Session` owns one worker and remembers which file it is working on.
//! Reading and writing files happens here; only bytes and payloads cross
//! into the worker.

use std::path::{Path, PathBuf};

use imgcrypt_core::boundary::{DecryptionRequest, EncryptionRequest};
use imgcrypt_core::{CryptoEngine, CryptoWorker, EncryptedPayload};
use zeroize::Zeroizing;

use crate::config::ImgcryptConfig;
use crate::errors::CliError;
use crate::ui::{Spinner, UiContext};

pub struct Session {
    worker: CryptoWorker,
    max_image_bytes: usize,
    current_file: Option<PathBuf>,
    ui: UiContext,
}

impl Session {
    pub fn start(config: &ImgcryptConfig, ui: UiContext) -> anyhow::Result<Self> {
        let engine = CryptoEngine::with_max_plaintext_bytes(config.limits.max_image_bytes);
        let worker = CryptoWorker::spawn(engine, config.worker_config())?;
        Ok(Self {
            worker,
            max_image_bytes: config.limits.max_image_bytes,
            current_file: None,
            ui,
        })
    }

    /// The file most recently handed to the worker.
    pub fn current_file(&self) -> Option<&Path> {
        self.current_file.as_deref()
    }

    /// Read an image and encrypt it on the worker.
    pub async fn encrypt_file(
        &mut self,
        input: &Path,
        password: &str,
        mime_type: Option<String>,
    ) -> anyhow::Result<EncryptedPayload> {
        ensure_exists(input, "Image")?;
        let size = std::fs::metadata(input)?.len();
        if size > self.max_image_bytes as u64 {
            return Err(CliError::invalid_input(format!(
                "Image is {} bytes; the limit is {} bytes",
                size, self.max_image_bytes
            ))
            .into());
        }

        let image = std::fs::read(input)
            .map_err(|e| anyhow::anyhow!("Failed to read {}: {}", input.display(), e))?;
        self.current_file = Some(input.to_path_buf());
        tracing::info!(path = %input.display(), bytes = image.len(), "encrypting image");

        let mut request = EncryptionRequest::new(image, password);
        if let Some(mime_type) = mime_type {
            request = request.with_mime_type(mime_type);
        }

        let spinner = Spinner::start(&self.ui, "Encrypting");
        let result = self.worker.encrypt(request).await;
        spinner.finish();
        Ok(result?)
    }

    /// Decrypt a payload already loaded from `input` on the worker.
    pub async fn decrypt_file(
        &mut self,
        input: &Path,
        payload: EncryptedPayload,
        password: &str,
    ) -> anyhow::Result<Zeroizing<Vec<u8>>> {
        self.current_file = Some(input.to_path_buf());
        tracing::info!(path = %input.display(), "decrypting payload");

        let spinner = Spinner::start(&self.ui, "Decrypting");
        let result = self
            .worker
            .decrypt(DecryptionRequest::new(payload, password))
            .await;
        spinner.finish();
        Ok(result?)
    }

    /// Stop the worker thread.
    pub fn close(self) {
        self.worker.shutdown();
    }
}

/// Read and parse a payload file without decrypting it.
pub fn load_payload(path: &Path) -> anyhow::Result<EncryptedPayload> {
    ensure_exists(path, "Encrypted file")?;
    let text = std::fs::read_to_string(path).map_err(|e| {
        CliError::invalid_input(format!(
            "Invalid encrypted file: {} is not readable text ({})",
            path.display(),
            e
        ))
    })?;
    Ok(EncryptedPayload::from_json(&text)?)
}

pub fn ensure_exists(path: &Path, what: &str) -> anyhow::Result<()> {
    if !path.exists() {
        return Err(CliError::not_found(
            format!("{} not found: {}", what, path.display()),
            "Hint: Check the path and try again.",
        )
        .into());
    }
    Ok(())
}
