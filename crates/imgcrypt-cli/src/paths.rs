//! Default output paths.

use std::ffi::OsString;
use std::path::{Path, PathBuf};

use crate::constants::PAYLOAD_EXTENSION;
use crate::mime::extension_for_mime;

/// `photo.png` -> `photo.png.json`
pub fn encrypted_output_path(image: &Path) -> PathBuf {
    append_extension(image, PAYLOAD_EXTENSION)
}

/// Pick the decrypted image path for a payload file.
///
/// - `photo.png.json` -> `photo.png`
/// - `photo.json` with `image/jpeg` -> `photo.jpg`
/// - `photo.json` without a MIME type -> `photo.bin`
/// - `blob.dat` -> `blob.dat.<ext>`
pub fn decrypted_output_path(payload: &Path, mime_type: Option<&str>) -> PathBuf {
    let extension = mime_type.and_then(extension_for_mime).unwrap_or("bin");

    let is_payload_file = payload
        .extension()
        .map(|ext| ext.eq_ignore_ascii_case(PAYLOAD_EXTENSION))
        .unwrap_or(false);
    if !is_payload_file {
        return append_extension(payload, extension);
    }

    let stripped = payload.with_extension("");
    if stripped.extension().is_some() {
        stripped
    } else {
        stripped.with_extension(extension)
    }
}

fn append_extension(path: &Path, extension: &str) -> PathBuf {
    let mut name: OsString = path.as_os_str().to_owned();
    name.push(".");
    name.push(extension);
    PathBuf::from(name)
}
