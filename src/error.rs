//! Error types for the fax transmission workflow.

use std::path::PathBuf;

use thiserror::Error;

/// Result type alias using the faxwire error type.
pub type Result<T> = std::result::Result<T, FaxwireError>;

/// Main error type for the fax transmission workflow.
#[derive(Error, Debug)]
pub enum FaxwireError {
    /// Recipient number does not match the accepted format
    #[error("invalid recipient fax number: {0:?} (expected an optional '+' followed by digits)")]
    InvalidRecipient(String),

    /// Document does not exist at the given path
    #[error("file does not exist: {}", .0.display())]
    FileNotFound(PathBuf),

    /// Document content is not a PDF
    #[error("not a valid PDF file: {}", .0.display())]
    InvalidFileType(PathBuf),

    /// Document could not be fully read
    #[error("failed to read {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Network-level failure: connection refused, timeout, DNS
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// Gateway answered the submission with a status other than 200
    #[error("gateway rejected the fax submission with HTTP status {status}")]
    SubmissionRejected { status: u16 },

    /// Submission succeeded but the acknowledgement body was unusable
    #[error("malformed submission response: {0}")]
    MalformedResponse(String),

    /// A status poll returned a non-success response or an unusable body
    #[error("status poll failed{}: {detail}", status_suffix(.status))]
    Poll { status: Option<u16>, detail: String },

    /// The configured poll attempt cap was reached without a terminal status
    #[error("no terminal fax status after {attempts} poll attempts")]
    PollAttemptsExhausted { attempts: u32 },

    /// The workflow was cancelled before a terminal status was observed
    #[error("interrupted before the fax reached a terminal status")]
    Interrupted,

    /// Configuration could not be loaded
    #[error("configuration error: {0}")]
    Config(#[from] figment::Error),

    /// General error from anyhow
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

fn status_suffix(status: &Option<u16>) -> String {
    match status {
        Some(code) => format!(" (HTTP {code})"),
        None => String::new(),
    }
}
