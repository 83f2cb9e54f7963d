//! Shared file reading helpers.

use std::borrow::Cow;
use std::path::Path;

use crate::error::{Error, Result};

/// Decode bytes to a string, handling the encodings we meet in practice.
///
/// UTF-8 is tried first (BOM handled by encoding_rs); malformed input
/// falls back to Windows-1252, which word processors still emit for
/// "ANSI" HTML exports.
pub fn decode_text(bytes: &[u8]) -> Cow<'_, str> {
    let (result, _encoding, malformed) = encoding_rs::UTF_8.decode(bytes);
    if !malformed {
        return result;
    }

    let (result, _, _) = encoding_rs::WINDOWS_1252.decode(bytes);
    result
}

/// Read a whole file as text, with encoding fallback and typed errors.
pub fn read_text_file(path: &Path) -> Result<String> {
    let bytes = std::fs::read(path).map_err(|e| match e.kind() {
        std::io::ErrorKind::NotFound => Error::NotFound(path.display().to_string()),
        _ => Error::Io(e),
    })?;
    Ok(decode_text(&bytes).into_owned())
}

/// Write a whole file, mapping permission failures to the typed error.
pub fn write_text_file(path: &Path, text: &str) -> Result<()> {
    std::fs::write(path, text).map_err(|e| match e.kind() {
        std::io::ErrorKind::PermissionDenied => Error::WriteProtected(path.display().to_string()),
        _ => Error::Io(e),
    })
}
