//! Wire-level data model for the fax gateway.
//!
//! These types mirror the gateway's REST contract: a submission body, the
//! acknowledgement it returns, and the history snapshot each poll produces.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// A single fax transmission request, as submitted to the gateway.
///
/// Built once per invocation from already-validated inputs and consumed
/// exactly once by submission.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FaxRequest {
    /// Identifier of the outbound sending line configured on the account.
    pub faxline_id: String,

    /// Recipient fax number: optional leading '+', then digits.
    pub recipient: String,

    /// Final path segment of the source document.
    pub filename: String,

    /// Standard-alphabet base64 of the document bytes, no line wrapping.
    pub base64_content: String,
}

impl FaxRequest {
    /// Pure assembly; validation has already happened upstream.
    pub fn new(
        faxline_id: impl Into<String>,
        recipient: impl Into<String>,
        filename: impl Into<String>,
        base64_content: impl Into<String>,
    ) -> Self {
        Self {
            faxline_id: faxline_id.into(),
            recipient: recipient.into(),
            filename: filename.into(),
            base64_content: base64_content.into(),
        }
    }
}

/// Opaque token issued by the gateway identifying one transmission attempt.
///
/// Used as the key for all subsequent status polls.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SessionId(pub String);

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<String> for SessionId {
    fn from(id: String) -> Self {
        SessionId(id)
    }
}

impl From<&str> for SessionId {
    fn from(id: &str) -> Self {
        SessionId(id.to_string())
    }
}

impl std::ops::Deref for SessionId {
    type Target = str;
    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

/// Acknowledgement body returned by a successful submission.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransmissionAck {
    pub session_id: SessionId,
}

/// Snapshot of a transmission's history record.
///
/// Each poll produces a fresh, independent snapshot; nothing retains
/// identity across polls.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryEntry {
    pub fax_status_type: String,
}

/// Transmission status reported by the gateway.
///
/// Only `Sent` and `Failed` are terminal. Every other wire value, including
/// ones this crate does not know about, keeps the poller going.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FaxStatus {
    Pending,
    Sending,
    Sent,
    Failed,
    /// Any other non-terminal wire value.
    Other(String),
}

impl FaxStatus {
    /// True exactly for the states after which polling must stop.
    pub fn is_terminal(&self) -> bool {
        matches!(self, FaxStatus::Sent | FaxStatus::Failed)
    }

    /// The uppercase wire form.
    pub fn as_str(&self) -> &str {
        match self {
            FaxStatus::Pending => "PENDING",
            FaxStatus::Sending => "SENDING",
            FaxStatus::Sent => "SENT",
            FaxStatus::Failed => "FAILED",
            FaxStatus::Other(s) => s,
        }
    }
}

impl fmt::Display for FaxStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<&str> for FaxStatus {
    fn from(s: &str) -> Self {
        match s {
            "PENDING" => FaxStatus::Pending,
            "SENDING" => FaxStatus::Sending,
            "SENT" => FaxStatus::Sent,
            "FAILED" => FaxStatus::Failed,
            other => FaxStatus::Other(other.to_string()),
        }
    }
}

impl FromStr for FaxStatus {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(FaxStatus::from(s))
    }
}
