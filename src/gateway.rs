//! Gateway client abstraction for submitting faxes and polling their status.
//!
//! This module defines the `Gateway` trait to abstract the two wire
//! operations, enabling testability with mock implementations.

use async_trait::async_trait;
use std::time::Duration;

use crate::config::Config;
use crate::error::{FaxwireError, Result};
use crate::fax::{FaxRequest, FaxStatus, HistoryEntry, SessionId, TransmissionAck};

/// Trait for talking to the fax gateway.
///
/// This abstraction allows for different implementations (production vs.
/// testing) and makes the workflow testable without making real HTTP calls.
#[async_trait]
pub trait Gateway: Send + Sync {
    /// Submit a fax request, returning the gateway-issued session identifier.
    ///
    /// # Errors
    /// Returns an error if:
    /// - The request fails at the network level (`Transport`)
    /// - The gateway answers with a status other than 200 (`SubmissionRejected`)
    /// - The acknowledgement body carries no session identifier (`MalformedResponse`)
    ///
    /// No retry happens at this layer.
    async fn submit(&self, request: &FaxRequest) -> Result<SessionId>;

    /// Fetch the current transmission status for a session.
    ///
    /// A single attempt: network failures are `Transport`, non-success
    /// responses and unusable bodies are `Poll`.
    async fn poll_status(&self, session_id: &SessionId) -> Result<FaxStatus>;
}

// ============================================================================
// Response interpretation
// ============================================================================

/// Interpret a submission response.
///
/// Success is signaled only by HTTP 200 with a body carrying the session
/// identifier; the identifier is returned unchanged.
pub fn parse_submit_response(status: u16, body: &str) -> Result<SessionId> {
    if status != 200 {
        return Err(FaxwireError::SubmissionRejected { status });
    }

    let ack: TransmissionAck = serde_json::from_str(body)
        .map_err(|e| FaxwireError::MalformedResponse(e.to_string()))?;

    Ok(ack.session_id)
}

/// Interpret a history response.
///
/// Any 2xx status with a parsable `faxStatusType` field is success.
pub fn parse_status_response(status: u16, body: &str) -> Result<FaxStatus> {
    if !(200..300).contains(&status) {
        return Err(FaxwireError::Poll {
            status: Some(status),
            detail: "gateway returned a non-success status".to_string(),
        });
    }

    let entry: HistoryEntry = serde_json::from_str(body).map_err(|e| FaxwireError::Poll {
        status: None,
        detail: e.to_string(),
    })?;

    Ok(FaxStatus::from(entry.fax_status_type.as_str()))
}

// ============================================================================
// Production Implementation using reqwest
// ============================================================================

/// Production gateway client using reqwest.
///
/// Holds one HTTP client with explicit connect and request timeouts and
/// authenticates every call with HTTP basic auth (token id / token).
#[derive(Clone)]
pub struct ReqwestGateway {
    client: reqwest::Client,
    base_url: String,
    token_id: String,
    token: String,
}

impl ReqwestGateway {
    /// Build a gateway client from the resolved configuration.
    pub fn new(config: &Config) -> Result<Self> {
        let client = reqwest::Client::builder()
            .connect_timeout(Duration::from_millis(config.http.connect_timeout_ms))
            .timeout(Duration::from_millis(config.http.request_timeout_ms))
            .build()?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            token_id: config.token_id.clone(),
            token: config.token.clone(),
        })
    }
}

#[async_trait]
impl Gateway for ReqwestGateway {
    #[tracing::instrument(skip(self, request), fields(recipient = %request.recipient, filename = %request.filename))]
    async fn submit(&self, request: &FaxRequest) -> Result<SessionId> {
        let url = format!("{}/sessions/fax", self.base_url);

        tracing::debug!(url = %url, payload_len = request.base64_content.len(), "submitting fax request");

        // .json() declares Content-Type: application/json
        let response = self
            .client
            .post(&url)
            .basic_auth(&self.token_id, Some(&self.token))
            .json(request)
            .send()
            .await?;

        let status = response.status().as_u16();
        let body = response.text().await?;

        tracing::debug!(status = status, response_len = body.len(), "submission response received");

        parse_submit_response(status, &body)
    }

    #[tracing::instrument(skip(self), fields(session_id = %session_id))]
    async fn poll_status(&self, session_id: &SessionId) -> Result<FaxStatus> {
        let url = format!("{}/history/{}", self.base_url, session_id);

        let response = self
            .client
            .get(&url)
            .basic_auth(&self.token_id, Some(&self.token))
            .send()
            .await?;

        let status = response.status().as_u16();
        let body = response.text().await?;

        tracing::debug!(status = status, response_len = body.len(), "history response received");

        parse_status_response(status, &body)
    }
}

// ============================================================================
// Test/Mock Implementation
// ============================================================================

use parking_lot::Mutex;
use std::collections::VecDeque;
use std::sync::Arc;

/// Mock gateway for testing.
///
/// Canned results are queued per operation and returned in FIFO order;
/// every call is recorded for later assertions.
///
/// # Example
/// ```ignore
/// let mock = MockGateway::new();
/// mock.push_submit_response(Ok(SessionId::from("abc123")));
/// mock.push_poll_response(Ok(FaxStatus::Sent));
/// ```
#[derive(Clone, Default)]
pub struct MockGateway {
    submit_responses: Arc<Mutex<VecDeque<Result<SessionId>>>>,
    poll_responses: Arc<Mutex<VecDeque<Result<FaxStatus>>>>,
    submitted: Arc<Mutex<Vec<FaxRequest>>>,
    polled: Arc<Mutex<Vec<SessionId>>>,
}

impl MockGateway {
    /// Create a new mock gateway with empty queues.
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a result for the next unanswered `submit` call.
    pub fn push_submit_response(&self, response: Result<SessionId>) {
        self.submit_responses.lock().push_back(response);
    }

    /// Queue a result for the next unanswered `poll_status` call.
    pub fn push_poll_response(&self, response: Result<FaxStatus>) {
        self.poll_responses.lock().push_back(response);
    }

    /// All requests passed to `submit`, in call order.
    pub fn submitted_requests(&self) -> Vec<FaxRequest> {
        self.submitted.lock().clone()
    }

    /// All session ids passed to `poll_status`, in call order.
    pub fn polled_sessions(&self) -> Vec<SessionId> {
        self.polled.lock().clone()
    }

    /// Number of `poll_status` calls made.
    pub fn poll_count(&self) -> usize {
        self.polled.lock().len()
    }
}

#[async_trait]
impl Gateway for MockGateway {
    async fn submit(&self, request: &FaxRequest) -> Result<SessionId> {
        self.submitted.lock().push(request.clone());

        self.submit_responses
            .lock()
            .pop_front()
            .unwrap_or_else(|| {
                Err(FaxwireError::Other(anyhow::anyhow!(
                    "no mock submit response queued"
                )))
            })
    }

    async fn poll_status(&self, session_id: &SessionId) -> Result<FaxStatus> {
        self.polled.lock().push(session_id.clone());

        self.poll_responses.lock().pop_front().unwrap_or_else(|| {
            Err(FaxwireError::Other(anyhow::anyhow!(
                "no mock poll response queued"
            )))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn submit_response_returns_embedded_session_id_unchanged() {
        let session_id = parse_submit_response(200, r#"{"sessionId":"abc123"}"#).unwrap();
        assert_eq!(session_id, SessionId::from("abc123"));
    }

    #[test]
    fn submit_response_rejects_any_non_200_status() {
        for status in [201, 204, 302, 400, 401, 403, 500, 503] {
            let err = parse_submit_response(status, "").unwrap_err();
            assert!(
                matches!(err, FaxwireError::SubmissionRejected { status: s } if s == status),
                "expected SubmissionRejected for {status}, got {err:?}"
            );
        }
    }

    #[test]
    fn submit_response_with_unusable_body_is_malformed() {
        for body in ["", "not json", r#"{"unexpected":"shape"}"#] {
            let err = parse_submit_response(200, body).unwrap_err();
            assert!(matches!(err, FaxwireError::MalformedResponse(_)));
        }
    }

    #[test]
    fn status_response_extracts_the_status_field() {
        let status = parse_status_response(200, r#"{"faxStatusType":"SENDING"}"#).unwrap();
        assert_eq!(status, FaxStatus::Sending);

        // Unknown values stay pollable instead of failing.
        let status = parse_status_response(200, r#"{"faxStatusType":"SCANNING"}"#).unwrap();
        assert_eq!(status, FaxStatus::Other("SCANNING".to_string()));
    }

    #[test]
    fn status_response_fails_outside_2xx() {
        let err = parse_status_response(404, "").unwrap_err();
        assert!(matches!(err, FaxwireError::Poll { status: Some(404), .. }));
    }

    #[test]
    fn status_response_with_unusable_body_is_a_poll_error() {
        let err = parse_status_response(200, r#"{"noStatusHere":true}"#).unwrap_err();
        assert!(matches!(err, FaxwireError::Poll { status: None, .. }));
    }

    #[tokio::test]
    async fn mock_gateway_answers_in_fifo_order_and_records_calls() {
        let mock = MockGateway::new();
        mock.push_poll_response(Ok(FaxStatus::Pending));
        mock.push_poll_response(Ok(FaxStatus::Sent));

        let session = SessionId::from("abc123");
        assert_eq!(mock.poll_status(&session).await.unwrap(), FaxStatus::Pending);
        assert_eq!(mock.poll_status(&session).await.unwrap(), FaxStatus::Sent);
        assert_eq!(mock.poll_count(), 2);
        assert_eq!(mock.polled_sessions(), vec![session.clone(), session]);
    }

    #[tokio::test]
    async fn mock_gateway_errors_when_no_response_is_queued() {
        let mock = MockGateway::new();
        let result = mock.poll_status(&SessionId::from("abc123")).await;
        assert!(result.is_err());
    }
}
