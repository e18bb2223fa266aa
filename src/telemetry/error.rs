use thiserror::Error;

/// Why a single telemetry fetch failed. All variants are retried on the next
/// tick; the distinction is informational.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FetchError {
    #[error("network unreachable: {0}")]
    NetworkUnreachable(String),
    #[error("bad status: {0}")]
    BadStatus(u16),
    #[error("malformed payload: {0}")]
    MalformedPayload(String),
}

#[derive(Debug, Error)]
pub enum TelemetryError {
    #[error("poller already running")]
    AlreadyRunning,
    #[error("http client error: {0}")]
    HttpClient(#[from] reqwest::Error),
}
