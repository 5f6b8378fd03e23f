//! Error types for the browser suite

use thiserror::Error;

#[derive(Error, Debug)]
pub enum E2eError {
    #[error("Browser failed to launch: {0}")]
    BrowserLaunch(String),

    #[error("CDP error: {0}")]
    Cdp(#[from] chromiumoxide::error::CdpError),

    #[error("Invalid CDP command: {0}")]
    CdpCommand(String),

    #[error("Navigation to {url} failed: {reason}")]
    Navigation { url: String, reason: String },

    #[error("Timeout after {timeout_ms} ms waiting for {what} (last state: {state})")]
    Timeout {
        what: String,
        state: String,
        timeout_ms: u64,
    },

    #[error("Strict mode violation: {locator} resolved to {count} elements")]
    StrictModeViolation { locator: String, count: usize },

    #[error("Assertion failed: {0}")]
    AssertionFailed(String),

    #[error("Setup failed: {0}")]
    Setup(String),

    #[error("Target {url} is not reachable after {attempts} attempts")]
    TargetUnreachable { url: String, attempts: usize },

    #[error("Runner configuration error: {0}")]
    RunnerConfig(String),

    #[error("Configuration error: {0}")]
    Config(#[from] saucedemo_common::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Screenshot decode error: {0}")]
    ScreenshotDecode(#[from] base64::DecodeError),
}

pub type E2eResult<T> = Result<T, E2eError>;
