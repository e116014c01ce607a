use serde_json::Value;

use imgcrypt_core::crypto::{decrypt, encrypt, CryptoEngine};
use imgcrypt_core::{CryptError, EncryptedPayload};

const PASSWORD: &str = "correct-horse-42";

fn png_image() -> Vec<u8> {
    let mut bytes = vec![0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A];
    bytes.extend((0..4096u32).map(|i| (i * 31 % 251) as u8));
    bytes
}

fn flip_bit(payload: &EncryptedPayload, field: &str, index: usize) -> EncryptedPayload {
    let mut value = serde_json::to_value(payload).expect("payload should serialize");
    let bytes = value[field].as_array_mut().expect("field should be an array");
    let byte = bytes[index].as_u64().expect("byte should be an integer");
    bytes[index] = Value::from(byte ^ 0x01);
    EncryptedPayload::from_value(value).expect("tampered payload should still parse")
}

#[test]
fn test_png_round_trip_keeps_metadata() {
    let image = png_image();
    let payload = encrypt(&image, PASSWORD, Some("image/png")).expect("encrypt should succeed");

    assert_eq!(payload.mime_type(), Some("image/png"));
    assert_eq!(payload.ciphertext().len(), image.len() + 16);

    let decrypted = decrypt(&payload, PASSWORD).expect("decrypt should succeed");
    assert_eq!(decrypted, image);
}

#[test]
fn test_round_trip_through_json_text() {
    let image = png_image();
    let payload = encrypt(&image, PASSWORD, Some("image/png")).expect("encrypt should succeed");

    let text = payload.to_json().expect("to_json should succeed");
    let parsed = EncryptedPayload::from_json(&text).expect("from_json should succeed");
    assert_eq!(parsed, payload);
    assert_eq!(decrypt(&parsed, PASSWORD).expect("decrypt should succeed"), image);
}

#[test]
fn test_same_input_encrypts_differently() {
    let image = png_image();
    let first = encrypt(&image, PASSWORD, None).expect("encrypt should succeed");
    let second = encrypt(&image, PASSWORD, None).expect("encrypt should succeed");

    assert_ne!(first.salt(), second.salt());
    assert_ne!(first.iv(), second.iv());
    assert_ne!(first.ciphertext(), second.ciphertext());
}

#[test]
fn test_tampered_ciphertext_fails_authentication() {
    let payload = encrypt(&png_image(), PASSWORD, None).expect("encrypt should succeed");

    for index in [0, payload.ciphertext().len() / 2, payload.ciphertext().len() - 1] {
        let tampered = flip_bit(&payload, "encryptedData", index);
        assert!(matches!(
            decrypt(&tampered, PASSWORD),
            Err(CryptError::AuthenticationFailed)
        ));
    }
}

#[test]
fn test_tampered_salt_or_iv_fails_authentication() {
    let payload = encrypt(&png_image(), PASSWORD, None).expect("encrypt should succeed");

    let tampered = flip_bit(&payload, "salt", 3);
    assert!(matches!(
        decrypt(&tampered, PASSWORD),
        Err(CryptError::AuthenticationFailed)
    ));

    let tampered = flip_bit(&payload, "iv", 11);
    assert!(matches!(
        decrypt(&tampered, PASSWORD),
        Err(CryptError::AuthenticationFailed)
    ));
}

#[test]
fn test_wrong_password_and_tampering_share_message() {
    let payload = encrypt(&png_image(), PASSWORD, None).expect("encrypt should succeed");

    let wrong = decrypt(&payload, "not-the-password").unwrap_err();
    let tampered = decrypt(&flip_bit(&payload, "encryptedData", 0), PASSWORD).unwrap_err();
    assert_eq!(wrong.user_message(), tampered.user_message());
}

#[test]
fn test_truncated_iv_rejected_before_crypto() {
    let payload = encrypt(&png_image(), PASSWORD, None).expect("encrypt should succeed");
    let mut value = serde_json::to_value(&payload).expect("payload should serialize");
    value["iv"].as_array_mut().expect("iv should be an array").pop();
    let truncated = EncryptedPayload::from_value(value).expect("payload should parse");

    match decrypt(&truncated, PASSWORD) {
        Err(CryptError::InvalidPayload(detail)) => assert!(detail.contains("iv")),
        other => panic!("expected InvalidPayload, got {:?}", other),
    }
}

#[test]
fn test_minimal_payload_from_other_producer() {
    let image = png_image();
    let payload = encrypt(&image, PASSWORD, Some("image/png")).expect("encrypt should succeed");

    // Keep only the three required fields
    let full = serde_json::to_value(&payload).expect("payload should serialize");
    let minimal = serde_json::json!({
        "salt": full["salt"],
        "iv": full["iv"],
        "encryptedData": full["encryptedData"],
    });
    let parsed = EncryptedPayload::from_value(minimal).expect("minimal payload should parse");

    assert!(parsed.mime_type().is_none());
    assert_eq!(decrypt(&parsed, PASSWORD).expect("decrypt should succeed"), image);
}

#[test]
fn test_save_load_decrypt() {
    let dir = tempfile::tempdir().expect("tempdir should be created");
    let path = dir.path().join("holiday.png.json");
    let image = png_image();

    let engine = CryptoEngine::default();
    let payload = engine
        .encrypt(&image, PASSWORD, Some("image/png"))
        .expect("encrypt should succeed");
    payload.save(&path).expect("save should succeed");

    let loaded = EncryptedPayload::load(&path).expect("load should succeed");
    assert_eq!(engine.decrypt(&loaded, PASSWORD).expect("decrypt should succeed"), image);
}

#[test]
fn test_large_image_round_trip() {
    let image: Vec<u8> = (0..8 * 1024 * 1024u32).map(|i| (i % 253) as u8).collect();
    let engine = CryptoEngine::with_max_plaintext_bytes(image.len());

    let payload = engine
        .encrypt(&image, PASSWORD, Some("image/tiff"))
        .expect("encrypt at the limit should succeed");
    assert_eq!(payload.ciphertext().len(), image.len() + 16);

    let decrypted = engine.decrypt(&payload, PASSWORD).expect("decrypt should succeed");
    assert_eq!(decrypted.len(), image.len());
    assert!(decrypted == image);
}

#[test]
fn test_decrypts_payload_from_independent_implementation() {
    // salt, iv, and ciphertext from Python's hashlib + cryptography AESGCM
    // with 250,000 PBKDF2-SHA256 rounds.
    let ciphertext =
        hex::decode("8ddae55429b445406b3f131301cf7d67abb34150e820195957ab03cf53506723")
            .expect("valid hex");
    let json = serde_json::json!({
        "salt": hex::decode("101112131415161718191a1b1c1d1e1f").expect("valid hex"),
        "iv": hex::decode("a1a2a3a4a5a6a7a8a9aaabac").expect("valid hex"),
        "encryptedData": ciphertext,
        "mimeType": "image/png",
    });
    let payload = EncryptedPayload::from_json(&json.to_string()).expect("fixture should parse");

    let plaintext = decrypt(&payload, "p\u{e4}ssw\u{f6}rd-42").expect("fixture should decrypt");
    assert_eq!(hex::encode(plaintext), "89504e470d0a1a0a0000000d49484452");

    assert!(matches!(
        decrypt(&payload, "passw\u{f6}rd-42"),
        Err(CryptError::AuthenticationFailed)
    ));
}
