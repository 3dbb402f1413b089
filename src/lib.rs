//! Fax transmission workflow for a fax-over-IP gateway.
//!
//! This crate validates a PDF document and a recipient number, submits the
//! document to the gateway's REST API, and tracks the transmission by
//! polling the history endpoint at a fixed interval until the gateway
//! reports a terminal status (`SENT` or `FAILED`).
//!
//! The gateway is behind the [`gateway::Gateway`] trait and the inter-poll
//! delay behind [`workflow::Sleeper`], so the whole workflow is testable
//! without a network or real time.

pub mod config;
pub mod document;
pub mod error;
pub mod fax;
pub mod gateway;
pub mod workflow;

// Re-export commonly used types
pub use config::{Config, HttpSettings, PollFailurePolicy, PollSettings};
pub use error::{FaxwireError, Result};
pub use fax::{FaxRequest, FaxStatus, HistoryEntry, SessionId, TransmissionAck};
pub use gateway::{Gateway, MockGateway, ReqwestGateway};
pub use workflow::{FaxReport, FaxWorkflow, RecordingSleeper, Sleeper, TokioSleeper};
