//! The fax transmission workflow: submit once, then poll to a terminal status.
//!
//! The workflow is strictly sequential: validation, encoding, submission,
//! and polling each finish before the next step starts, and at most one
//! request is ever in flight. Submission is never retried; poll failures are
//! handled according to the configured [`PollFailurePolicy`].

use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tokio_util::sync::CancellationToken;

use crate::config::{PollFailurePolicy, PollSettings};
use crate::document;
use crate::error::{FaxwireError, Result};
use crate::fax::{FaxRequest, FaxStatus, SessionId};
use crate::gateway::Gateway;

/// Trait for waiting between poll attempts.
///
/// Abstracted so tests can observe and skip the delays instead of sleeping
/// through them.
#[async_trait]
pub trait Sleeper: Send + Sync {
    async fn sleep(&self, duration: Duration);
}

/// Production sleeper backed by the tokio timer.
#[derive(Debug, Clone, Copy, Default)]
pub struct TokioSleeper;

#[async_trait]
impl Sleeper for TokioSleeper {
    async fn sleep(&self, duration: Duration) {
        tokio::time::sleep(duration).await;
    }
}

/// Sleeper that records requested delays and returns immediately.
#[derive(Debug, Clone, Default)]
pub struct RecordingSleeper {
    slept: Arc<parking_lot::Mutex<Vec<Duration>>>,
}

impl RecordingSleeper {
    pub fn new() -> Self {
        Self::default()
    }

    /// Delays requested so far, in order.
    pub fn slept(&self) -> Vec<Duration> {
        self.slept.lock().clone()
    }
}

#[async_trait]
impl Sleeper for RecordingSleeper {
    async fn sleep(&self, duration: Duration) {
        self.slept.lock().push(duration);
    }
}

/// Result of a workflow run that reached a terminal status.
#[derive(Debug, Clone)]
pub struct FaxReport {
    /// Session identifier issued at submission.
    pub session_id: SessionId,
    /// The terminal status that ended polling.
    pub outcome: FaxStatus,
    /// Number of successful poll attempts, the terminal one included.
    pub polls: u32,
}

/// Sequences validation, encoding, submission, and status polling for one
/// document.
pub struct FaxWorkflow<G, S = TokioSleeper> {
    gateway: G,
    faxline_id: String,
    poll: PollSettings,
    sleeper: S,
    cancel: CancellationToken,
}

impl<G: Gateway> FaxWorkflow<G> {
    pub fn new(gateway: G, faxline_id: impl Into<String>, poll: PollSettings) -> Self {
        Self {
            gateway,
            faxline_id: faxline_id.into(),
            poll,
            sleeper: TokioSleeper,
            cancel: CancellationToken::new(),
        }
    }
}

impl<G: Gateway, S: Sleeper> FaxWorkflow<G, S> {
    /// Replace the sleeper, for tests that simulate time.
    pub fn with_sleeper<S2: Sleeper>(self, sleeper: S2) -> FaxWorkflow<G, S2> {
        FaxWorkflow {
            gateway: self.gateway,
            faxline_id: self.faxline_id,
            poll: self.poll,
            sleeper,
            cancel: self.cancel,
        }
    }

    /// Use an externally owned cancellation token.
    ///
    /// Cancelling it during the inter-poll wait unwinds the workflow with
    /// `Interrupted` without issuing further requests. The submission, once
    /// acknowledged, cannot be un-sent.
    pub fn with_cancellation(mut self, cancel: CancellationToken) -> Self {
        self.cancel = cancel;
        self
    }

    /// Run the whole workflow for one document.
    ///
    /// `on_status` is invoked for every successfully polled status, the
    /// terminal one included. Validation and submission failures end the
    /// workflow before any polling happens.
    pub async fn run<F>(&self, recipient: &str, path: &Path, mut on_status: F) -> Result<FaxReport>
    where
        F: FnMut(&FaxStatus),
    {
        document::validate(recipient, path).await?;
        let content = document::encode(path).await?;

        let request = FaxRequest::new(
            self.faxline_id.clone(),
            recipient,
            document::display_name(path),
            content,
        );

        tracing::info!(recipient = %request.recipient, filename = %request.filename, "submitting fax");
        let session_id = self.gateway.submit(&request).await?;
        tracing::info!(session_id = %session_id, "fax accepted by gateway, tracking status");

        self.track(&session_id, &mut on_status).await
    }

    /// Poll until a terminal status, honoring the failure policy, the
    /// optional attempt cap, and cancellation.
    ///
    /// After every attempt, success or failure, the configured delay passes
    /// before the next one.
    async fn track<F>(&self, session_id: &SessionId, on_status: &mut F) -> Result<FaxReport>
    where
        F: FnMut(&FaxStatus),
    {
        let interval = Duration::from_millis(self.poll.interval_ms);
        let mut attempts: u32 = 0;
        let mut polls: u32 = 0;

        loop {
            if let Some(max) = self.poll.max_attempts
                && attempts >= max
            {
                return Err(FaxwireError::PollAttemptsExhausted { attempts });
            }
            attempts += 1;

            match self.gateway.poll_status(session_id).await {
                Ok(status) => {
                    polls += 1;
                    on_status(&status);

                    if status.is_terminal() {
                        tracing::info!(
                            session_id = %session_id,
                            status = %status,
                            polls = polls,
                            "fax reached terminal status"
                        );
                        return Ok(FaxReport {
                            session_id: session_id.clone(),
                            outcome: status,
                            polls,
                        });
                    }

                    tracing::info!(
                        session_id = %session_id,
                        status = %status,
                        attempt = attempts,
                        "fax still in progress"
                    );
                }
                Err(error) if self.poll.on_error == PollFailurePolicy::Abort => {
                    tracing::error!(
                        session_id = %session_id,
                        error = %error,
                        "status poll failed, aborting"
                    );
                    return Err(error);
                }
                Err(error) => {
                    tracing::warn!(
                        session_id = %session_id,
                        error = %error,
                        attempt = attempts,
                        "status poll failed, retrying after delay"
                    );
                }
            }

            tokio::select! {
                _ = self.sleeper.sleep(interval) => {}
                _ = self.cancel.cancelled() => {
                    tracing::info!(session_id = %session_id, "status tracking interrupted");
                    return Err(FaxwireError::Interrupted);
                }
            }
        }
    }
}
