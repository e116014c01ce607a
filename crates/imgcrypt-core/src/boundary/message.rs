//! Task messages exchanged with the worker.
//!
//! Requests arrive as untyped JSON (`{"action": ..., "data": ...}`) and are
//! checked here before anything reaches the crypto engine. Responses are
//! `{"success": bool, "result"?: ..., "error"?: string}`.

use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};
use zeroize::Zeroizing;

use crate::error::{CryptError, Result};
use crate::payload::EncryptedPayload;

/// Operation requested by a task message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Encrypt,
    Decrypt,
}

impl Action {
    pub fn as_str(&self) -> &'static str {
        match self {
            Action::Encrypt => "encrypt",
            Action::Decrypt => "decrypt",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "encrypt" => Some(Action::Encrypt),
            "decrypt" => Some(Action::Decrypt),
            _ => None,
        }
    }
}

/// Image bytes and password for one encryption.
pub struct EncryptionRequest {
    /// Raw image bytes, wiped when the request is dropped
    pub image_data: Zeroizing<Vec<u8>>,
    pub password: SecretString,
    pub mime_type: Option<String>,
}

impl EncryptionRequest {
    pub fn new(image_data: Vec<u8>, password: impl Into<String>) -> Self {
        Self {
            image_data: Zeroizing::new(image_data),
            password: SecretString::from(password.into()),
            mime_type: None,
        }
    }

    pub fn with_mime_type(mut self, mime_type: impl Into<String>) -> Self {
        self.mime_type = Some(mime_type.into());
        self
    }
}

impl std::fmt::Debug for EncryptionRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EncryptionRequest")
            .field("image_data_len", &self.image_data.len())
            .field("password", &"[REDACTED]")
            .field("mime_type", &self.mime_type)
            .finish()
    }
}

/// Payload and password for one decryption.
pub struct DecryptionRequest {
    pub payload: EncryptedPayload,
    pub password: SecretString,
}

impl DecryptionRequest {
    pub fn new(payload: EncryptedPayload, password: impl Into<String>) -> Self {
        Self {
            payload,
            password: SecretString::from(password.into()),
        }
    }
}

impl std::fmt::Debug for DecryptionRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DecryptionRequest")
            .field("payload", &self.payload.summary())
            .field("password", &"[REDACTED]")
            .finish()
    }
}

/// A validated task.
#[derive(Debug)]
pub enum TaskRequest {
    Encrypt(EncryptionRequest),
    Decrypt(DecryptionRequest),
}

impl TaskRequest {
    pub fn action(&self) -> Action {
        match self {
            TaskRequest::Encrypt(_) => Action::Encrypt,
            TaskRequest::Decrypt(_) => Action::Decrypt,
        }
    }

    /// Validate the structure of a raw task message.
    ///
    /// # Errors
    ///
    /// - `InvalidInput` if the message is not an object, the action is
    ///   missing or unknown, `data` is missing or has the wrong shape, or the
    ///   decrypt password is empty
    /// - `InvalidPayload` if `data.encryptedData` is not a payload object
    pub fn from_message(message: Value) -> Result<Self> {
        let mut object = match message {
            Value::Object(object) => object,
            _ => {
                return Err(CryptError::InvalidInput(
                    "message must be a JSON object".to_string(),
                ))
            }
        };

        let action = match object.remove("action") {
            Some(Value::String(name)) => Action::parse(&name).ok_or_else(|| {
                CryptError::InvalidInput(format!("unknown action \"{}\"", name))
            })?,
            Some(_) => {
                return Err(CryptError::InvalidInput(
                    "action must be a string".to_string(),
                ))
            }
            None => return Err(CryptError::InvalidInput("missing action".to_string())),
        };

        let mut data = match object.remove("data") {
            Some(Value::Object(data)) => data,
            Some(Value::Null) | None => {
                return Err(CryptError::InvalidInput("missing data".to_string()))
            }
            Some(_) => {
                return Err(CryptError::InvalidInput(
                    "data must be a JSON object".to_string(),
                ))
            }
        };

        let request = match action {
            Action::Encrypt => {
                let image_data = Zeroizing::new(byte_field(&mut data, "imageData")?);
                let password = secret_field(&mut data, "password")?;
                let mime_type = match data.remove("mimeType") {
                    None | Some(Value::Null) => None,
                    Some(Value::String(mime_type)) => Some(mime_type),
                    Some(_) => return Err(malformed("mimeType", "a string")),
                };
                TaskRequest::Encrypt(EncryptionRequest {
                    image_data,
                    password,
                    mime_type,
                })
            }
            Action::Decrypt => {
                let password = secret_field(&mut data, "password")?;
                if password.expose_secret().is_empty() {
                    return Err(CryptError::InvalidInput("password is required".to_string()));
                }
                let payload = match data.remove("encryptedData") {
                    Some(value) => EncryptedPayload::from_value(value)?,
                    None => {
                        return Err(CryptError::InvalidInput("missing encryptedData".to_string()))
                    }
                };
                TaskRequest::Decrypt(DecryptionRequest { payload, password })
            }
        };
        Ok(request)
    }

    /// Checks a typed request needs before dispatch. Raw messages get the
    /// same checks in [`from_message`].
    ///
    /// [`from_message`]: TaskRequest::from_message
    pub fn validate(&self) -> Result<()> {
        match self {
            TaskRequest::Decrypt(request) if request.password.expose_secret().is_empty() => {
                Err(CryptError::InvalidInput("password is required".to_string()))
            }
            _ => Ok(()),
        }
    }

    /// Build the wire message for this task.
    pub fn into_message(self) -> Value {
        match self {
            TaskRequest::Encrypt(request) => {
                let mut data = Map::new();
                data.insert("imageData".to_string(), json!(request.image_data.as_slice()));
                data.insert(
                    "password".to_string(),
                    Value::String(request.password.expose_secret().to_string()),
                );
                if let Some(mime_type) = request.mime_type.as_ref() {
                    data.insert("mimeType".to_string(), Value::String(mime_type.clone()));
                }
                json!({ "action": Action::Encrypt.as_str(), "data": data })
            }
            TaskRequest::Decrypt(request) => json!({
                "action": Action::Decrypt.as_str(),
                "data": {
                    "encryptedData": request.payload,
                    "password": request.password.expose_secret(),
                },
            }),
        }
    }
}

// Field errors name the field and the expected shape, never the value sent.
fn malformed(field: &str, expected: &str) -> CryptError {
    CryptError::InvalidInput(format!("{} must be {}", field, expected))
}

fn secret_field(data: &mut Map<String, Value>, field: &str) -> Result<SecretString> {
    match data.remove(field) {
        Some(Value::String(value)) => Ok(SecretString::from(value)),
        Some(_) => Err(malformed(field, "a string")),
        None => Err(CryptError::InvalidInput(format!("missing {}", field))),
    }
}

fn byte_field(data: &mut Map<String, Value>, field: &str) -> Result<Vec<u8>> {
    let values = match data.remove(field) {
        Some(Value::Array(values)) => values,
        Some(_) => return Err(malformed(field, "an array of integers 0-255")),
        None => return Err(CryptError::InvalidInput(format!("missing {}", field))),
    };
    values
        .iter()
        .map(|value| {
            value
                .as_u64()
                .and_then(|byte| u8::try_from(byte).ok())
                .ok_or_else(|| malformed(field, "an array of integers 0-255"))
        })
        .collect()
}

/// Successful task output.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TaskResult {
    Payload(EncryptedPayload),
    Plaintext(Vec<u8>),
}

/// The single terminal response to a task.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskResponse {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub result: Option<TaskResult>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// Error category for the caller's own handling; never on the wire
    #[serde(skip)]
    pub error_kind: Option<&'static str>,
}

impl TaskResponse {
    pub fn success(result: TaskResult) -> Self {
        Self {
            success: true,
            result: Some(result),
            error: None,
            error_kind: None,
        }
    }

    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            success: false,
            result: None,
            error: Some(message.into()),
            error_kind: None,
        }
    }

    /// Failure response for a task error, using its outward message.
    pub fn from_error(err: &CryptError) -> Self {
        Self {
            error_kind: Some(err.kind()),
            ..Self::failure(err.user_message())
        }
    }

    /// Convert to the caller-side result. Failures become `TaskFailed`
    /// carrying the outward message.
    pub fn into_result(self) -> Result<TaskResult> {
        match (self.success, self.result) {
            (true, Some(result)) => Ok(result),
            _ => Err(CryptError::TaskFailed {
                kind: self.error_kind.unwrap_or("unexpected"),
                message: self
                    .error
                    .unwrap_or_else(|| crate::error::UNEXPECTED_ERROR_MESSAGE.to_string()),
            }),
        }
    }

    pub fn to_message(&self) -> Result<Value> {
        Ok(serde_json::to_value(self)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn payload_value() -> Value {
        json!({
            "salt": vec![1u8; 16],
            "iv": vec![2u8; 12],
            "encryptedData": vec![3u8; 24],
        })
    }

    #[test]
    fn test_parse_encrypt_message() {
        let request = TaskRequest::from_message(json!({
            "action": "encrypt",
            "data": { "imageData": [137, 80, 78, 71], "password": "secret1", "mimeType": "image/png" },
        }))
        .unwrap();

        match request {
            TaskRequest::Encrypt(req) => {
                assert_eq!(req.image_data.as_slice(), &[137, 80, 78, 71]);
                assert_eq!(req.password.expose_secret(), "secret1");
                assert_eq!(req.mime_type.as_deref(), Some("image/png"));
            }
            other => panic!("expected encrypt, got {:?}", other),
        }
    }

    #[test]
    fn test_parse_decrypt_message() {
        let request = TaskRequest::from_message(json!({
            "action": "decrypt",
            "data": { "encryptedData": payload_value(), "password": "secret1" },
        }))
        .unwrap();
        assert_eq!(request.action(), Action::Decrypt);
    }

    #[test]
    fn test_missing_action() {
        let result = TaskRequest::from_message(json!({ "data": {} }));
        match result {
            Err(CryptError::InvalidInput(detail)) => assert_eq!(detail, "missing action"),
            other => panic!("expected InvalidInput, got {:?}", other),
        }
    }

    #[test]
    fn test_unknown_action() {
        let result = TaskRequest::from_message(json!({ "action": "compress", "data": {} }));
        assert!(matches!(result, Err(CryptError::InvalidInput(_))));

        let result = TaskRequest::from_message(json!({ "action": 7, "data": {} }));
        assert!(matches!(result, Err(CryptError::InvalidInput(_))));
    }

    #[test]
    fn test_missing_or_null_data() {
        let result = TaskRequest::from_message(json!({ "action": "encrypt" }));
        assert!(matches!(result, Err(CryptError::InvalidInput(_))));

        let result = TaskRequest::from_message(json!({ "action": "decrypt", "data": null }));
        assert!(matches!(result, Err(CryptError::InvalidInput(_))));
    }

    #[test]
    fn test_non_object_message() {
        let result = TaskRequest::from_message(json!(["encrypt"]));
        assert!(matches!(result, Err(CryptError::InvalidInput(_))));
    }

    #[test]
    fn test_wrong_data_shape() {
        let result = TaskRequest::from_message(json!({
            "action": "encrypt",
            "data": { "imageData": "not bytes", "password": "secret1" },
        }));
        assert!(matches!(result, Err(CryptError::InvalidInput(_))));

        let result = TaskRequest::from_message(json!({
            "action": "decrypt",
            "data": { "password": "secret1" },
        }));
        assert!(matches!(result, Err(CryptError::InvalidInput(_))));
    }

    #[test]
    fn test_field_errors_do_not_echo_values() {
        let result = TaskRequest::from_message(json!({
            "action": "encrypt",
            "data": { "imageData": [1], "password": 123456 },
        }));
        match result {
            Err(CryptError::InvalidInput(detail)) => {
                assert_eq!(detail, "password must be a string");
                assert!(!detail.contains("123456"));
            }
            other => panic!("expected InvalidInput, got {:?}", other),
        }

        let result = TaskRequest::from_message(json!({
            "action": "decrypt",
            "data": { "encryptedData": payload_value(), "password": ["hunter", 22] },
        }));
        let detail = result.unwrap_err().user_message();
        assert_eq!(detail, "Invalid input: password must be a string");
        assert!(!detail.contains("hunter"));

        let result = TaskRequest::from_message(json!({
            "action": "encrypt",
            "data": { "imageData": [1, 300], "password": "secret1" },
        }));
        assert_eq!(
            result.unwrap_err().to_string(),
            "Invalid input: imageData must be an array of integers 0-255"
        );
    }

    #[test]
    fn test_missing_fields_are_named() {
        let result = TaskRequest::from_message(json!({
            "action": "encrypt",
            "data": { "imageData": [1, 2] },
        }));
        assert_eq!(result.unwrap_err().to_string(), "Invalid input: missing password");

        let result = TaskRequest::from_message(json!({
            "action": "decrypt",
            "data": { "password": "secret1" },
        }));
        assert_eq!(
            result.unwrap_err().to_string(),
            "Invalid input: missing encryptedData"
        );

        let result = TaskRequest::from_message(json!({ "action": "encrypt", "data": [1, 2] }));
        assert_eq!(
            result.unwrap_err().to_string(),
            "Invalid input: data must be a JSON object"
        );
    }

    #[test]
    fn test_validate_typed_decrypt_password() {
        let payload = EncryptedPayload::from_value(payload_value()).unwrap();
        let request = TaskRequest::Decrypt(DecryptionRequest::new(payload, ""));
        match request.validate() {
            Err(CryptError::InvalidInput(detail)) => assert_eq!(detail, "password is required"),
            other => panic!("expected InvalidInput, got {:?}", other),
        }

        let request = TaskRequest::Encrypt(EncryptionRequest::new(vec![1], "secret1"));
        assert!(request.validate().is_ok());
    }

    #[test]
    fn test_decrypt_empty_password_rejected() {
        let result = TaskRequest::from_message(json!({
            "action": "decrypt",
            "data": { "encryptedData": payload_value(), "password": "" },
        }));
        match result {
            Err(CryptError::InvalidInput(detail)) => assert_eq!(detail, "password is required"),
            other => panic!("expected InvalidInput, got {:?}", other),
        }
    }

    #[test]
    fn test_decrypt_malformed_payload_is_invalid_payload() {
        let result = TaskRequest::from_message(json!({
            "action": "decrypt",
            "data": { "encryptedData": { "salt": [1, 2] }, "password": "secret1" },
        }));
        assert!(matches!(result, Err(CryptError::InvalidPayload(_))));
    }

    #[test]
    fn test_into_message_round_trips() {
        let request = EncryptionRequest::new(vec![1, 2, 3], "secret1").with_mime_type("image/gif");
        let message = TaskRequest::Encrypt(request).into_message();
        assert_eq!(message["action"], "encrypt");
        assert_eq!(message["data"]["imageData"], json!([1, 2, 3]));
        assert_eq!(message["data"]["mimeType"], "image/gif");

        let parsed = TaskRequest::from_message(message).unwrap();
        assert_eq!(parsed.action(), Action::Encrypt);
    }

    #[test]
    fn test_request_debug_redacts_password() {
        let request = EncryptionRequest::new(vec![1, 2, 3], "hunter22");
        let debug_output = format!("{:?}", request);
        assert!(debug_output.contains("REDACTED"));
        assert!(!debug_output.contains("hunter22"));
    }

    #[test]
    fn test_response_wire_shape() {
        let ok = TaskResponse::success(TaskResult::Plaintext(vec![7, 8]));
        assert_eq!(
            ok.to_message().unwrap(),
            json!({ "success": true, "result": [7, 8] })
        );

        let failed = TaskResponse::failure("Invalid input: missing action");
        assert_eq!(
            failed.to_message().unwrap(),
            json!({ "success": false, "error": "Invalid input: missing action" })
        );
    }

    #[test]
    fn test_response_into_result() {
        let failed = TaskResponse::from_error(&CryptError::Encryption("rng".to_string()));
        match failed.into_result() {
            Err(CryptError::TaskFailed { kind, message }) => {
                assert_eq!(kind, "encryption");
                assert_eq!(message, "Encryption failed");
            }
            other => panic!("expected TaskFailed, got {:?}", other),
        }

        let failed = TaskResponse::failure("An unexpected error occurred");
        assert!(matches!(
            failed.into_result(),
            Err(CryptError::TaskFailed { kind: "unexpected", .. })
        ));

        let ok = TaskResponse::success(TaskResult::Plaintext(vec![1]));
        assert_eq!(ok.into_result().unwrap(), TaskResult::Plaintext(vec![1]));
    }
}
