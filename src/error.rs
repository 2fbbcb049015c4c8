use std::time::Duration;
use thiserror::Error;

/// Why a probe could not reach a verdict for its candidate.
///
/// None of these are fatal to a search: the prober records them and moves on.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ProbeError {
    #[error("timed out after {0:?}")]
    Timeout(Duration),

    #[error("transport error: {0}")]
    Transport(String),

    #[error("malformed response: {0}")]
    Malformed(String),

    #[error("probe task aborted: {0}")]
    Panicked(String),
}

impl ProbeError {
    /// Classify a reqwest failure. `timeout` is the per-request limit that was in force.
    pub fn from_reqwest(err: reqwest::Error, timeout: Duration) -> Self {
        if err.is_timeout() {
            ProbeError::Timeout(timeout)
        } else if err.is_decode() || err.is_body() {
            ProbeError::Malformed(err.to_string())
        } else {
            ProbeError::Transport(err.to_string())
        }
    }
}
