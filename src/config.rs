//! Configuration schema, defaults, and layered loading.
//!
//! Precedence: defaults < faxwire.toml < environment (`FAXWIRE_*`).
//!
//! The result is an immutable value constructed once at startup and passed
//! into the workflow; there is no ambient configuration state.

use std::path::{Path, PathBuf};

use anyhow::ensure;
use figment::Figment;
use figment::providers::{Env, Format, Serialized, Toml};
use serde::{Deserialize, Serialize};

use crate::error::Result;

pub const CONFIG_FILE: &str = "faxwire.toml";

/// Fixed delay between status poll attempts.
pub const DEFAULT_POLL_INTERVAL_MS: u64 = 5_000;

/// HTTP transport timeouts, explicit rather than whatever the transport
/// defaults to.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(default)]
pub struct HttpSettings {
    /// Connection establishment timeout in milliseconds
    pub connect_timeout_ms: u64,
    /// Whole-request timeout in milliseconds
    pub request_timeout_ms: u64,
}

impl Default for HttpSettings {
    fn default() -> Self {
        Self {
            connect_timeout_ms: 10_000,
            request_timeout_ms: 30_000,
        }
    }
}

/// Policy applied when a poll attempt fails.
///
/// The submission has already been accepted at that point; continuing trades
/// a few wasted polls for not losing track of a session that may still be
/// sending. `Abort` ends the workflow on the first failed poll instead.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum PollFailurePolicy {
    #[default]
    ContinuePolling,
    Abort,
}

/// Status poller tuning.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(default)]
pub struct PollSettings {
    /// Fixed delay between poll attempts in milliseconds
    pub interval_ms: u64,
    /// Optional safety cap on poll attempts; unset polls until a terminal
    /// status is observed
    pub max_attempts: Option<u32>,
    /// What to do when a poll attempt fails
    pub on_error: PollFailurePolicy,
}

impl Default for PollSettings {
    fn default() -> Self {
        Self {
            interval_ms: DEFAULT_POLL_INTERVAL_MS,
            max_attempts: None,
            on_error: PollFailurePolicy::ContinuePolling,
        }
    }
}

/// Fully resolved application configuration after all layers merge.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Base URL of the fax gateway REST API
    pub base_url: String,
    /// Token identifier, used as the basic-auth username
    pub token_id: String,
    /// Token secret, used as the basic-auth password
    pub token: String,
    /// Outbound sending line identifier on the gateway account
    pub faxline_id: String,
    /// Default recipient when none is passed on the command line
    pub recipient: Option<String>,
    /// Default document path when none is passed on the command line
    pub pdf_file_path: Option<PathBuf>,
    pub http: HttpSettings,
    pub poll: PollSettings,
}

impl Config {
    /// Rejects configurations that cannot produce a working gateway client.
    pub fn validate(&self) -> anyhow::Result<()> {
        ensure!(!self.base_url.is_empty(), "Invalid config: base_url must be set");
        ensure!(!self.token_id.is_empty(), "Invalid config: token_id must be set");
        ensure!(!self.token.is_empty(), "Invalid config: token must be set");
        ensure!(
            !self.faxline_id.is_empty(),
            "Invalid config: faxline_id must be set"
        );
        ensure!(
            self.poll.interval_ms > 0,
            "Invalid config: poll.interval_ms must be > 0"
        );
        ensure!(
            self.http.request_timeout_ms > 0,
            "Invalid config: http.request_timeout_ms must be > 0"
        );
        Ok(())
    }
}

/// Loads config from defaults, file, and environment.
pub fn load_config() -> Result<Config> {
    load_config_from(Path::new(CONFIG_FILE))
}

/// Loads config with an explicit file location.
///
/// A missing file is fine; the environment layer can carry everything.
pub fn load_config_from(path: &Path) -> Result<Config> {
    let config: Config = Figment::new()
        .merge(Serialized::defaults(Config::default()))
        .merge(Toml::file(path))
        .merge(Env::prefixed("FAXWIRE_").split("__"))
        .extract()?;

    config.validate()?;

    Ok(config)
}
