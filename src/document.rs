//! Document validation and payload encoding.
//!
//! The validator checks the recipient number format and probes the
//! document's content type from its leading bytes; the filename extension is
//! never consulted. The encoder reads the whole file and produces the
//! transport-safe base64 text the gateway expects.

use std::path::Path;
use std::sync::LazyLock;

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use regex::Regex;
use tokio::io::AsyncReadExt;

use crate::error::{FaxwireError, Result};

/// Accepted recipient format: optional leading '+', then one or more digits.
static FAX_NUMBER_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\+?[0-9]+$").expect("hardcoded regex"));

/// Every PDF document starts with these bytes.
const PDF_MAGIC: [u8; 5] = *b"%PDF-";

/// Check that the recipient number and document are acceptable for submission.
///
/// Fails with `InvalidRecipient`, `FileNotFound`, or `InvalidFileType`.
/// No side effects.
pub async fn validate(recipient: &str, path: &Path) -> Result<()> {
    validate_recipient(recipient)?;

    if !path.exists() {
        return Err(FaxwireError::FileNotFound(path.to_path_buf()));
    }

    match probe_content_type(path).await? {
        Some("application/pdf") => Ok(()),
        _ => Err(FaxwireError::InvalidFileType(path.to_path_buf())),
    }
}

/// Check the recipient number alone.
pub fn validate_recipient(recipient: &str) -> Result<()> {
    if FAX_NUMBER_PATTERN.is_match(recipient) {
        Ok(())
    } else {
        Err(FaxwireError::InvalidRecipient(recipient.to_string()))
    }
}

/// Probe the document's content type from its leading bytes.
///
/// Returns `None` when no type can be detected, including for files shorter
/// than a PDF header. I/O failures other than early EOF surface as `Read`.
async fn probe_content_type(path: &Path) -> Result<Option<&'static str>> {
    let mut file = tokio::fs::File::open(path)
        .await
        .map_err(|source| read_error(path, source))?;
    let mut head = [0u8; PDF_MAGIC.len()];

    match file.read_exact(&mut head).await {
        Ok(_) => Ok((head == PDF_MAGIC).then_some("application/pdf")),
        Err(e) if e.kind() == std::io::ErrorKind::UnexpectedEof => Ok(None),
        Err(source) => Err(read_error(path, source)),
    }
}

fn read_error(path: &Path, source: std::io::Error) -> FaxwireError {
    FaxwireError::Read {
        path: path.to_path_buf(),
        source,
    }
}

/// Read the complete document and return its base64 encoding.
///
/// Standard alphabet, no line wrapping. Fails with `Read` if the file cannot
/// be fully read; nothing partial is ever returned.
pub async fn encode(path: &Path) -> Result<String> {
    let bytes = tokio::fs::read(path)
        .await
        .map_err(|source| read_error(path, source))?;

    Ok(STANDARD.encode(bytes))
}

/// Final path segment of the document, as sent to the gateway.
pub fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.to_string_lossy().into_owned())
}
