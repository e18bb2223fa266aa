use async_trait::async_trait;
use std::time::Duration;

use super::error::{FetchError, TelemetryError};
use super::parsing::parse_payload;
use super::types::TrackReading;

pub const DEFAULT_TELEMETRY_URL: &str = "https://api.wheretheiss.at/v1/satellites/25544";

/// Something that can report where the tracked object is right now.
#[async_trait]
pub trait TelemetrySource: Send + Sync {
    async fn fetch(&self) -> Result<TrackReading, FetchError>;
}

/// Polls a JSON position endpoint over HTTP.
pub struct HttpTelemetrySource {
    url: String,
    client: reqwest::Client,
}

impl HttpTelemetrySource {
    pub fn new(url: impl Into<String>, timeout: Duration) -> Result<Self, TelemetryError> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            url: url.into(),
            client,
        })
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

#[async_trait]
impl TelemetrySource for HttpTelemetrySource {
    async fn fetch(&self) -> Result<TrackReading, FetchError> {
        let response = self
            .client
            .get(&self.url)
            .send()
            .await
            .map_err(|e| FetchError::NetworkUnreachable(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::BadStatus(status.as_u16()));
        }

        let body = response
            .bytes()
            .await
            .map_err(|e| FetchError::NetworkUnreachable(e.to_string()))?;

        parse_payload(&body)
    }
}
