use serde::{Deserialize, Deserializer};
use std::time::Duration;
use thiserror::Error;

use crate::scene::SceneConfig;
use crate::telemetry::{PollerConfig, DEFAULT_POLL_INTERVAL, DEFAULT_TELEMETRY_URL};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("YAML parse error: {0}")]
    Yaml(#[from] serde_yaml::Error),
    #[error("invalid config: {0}")]
    Invalid(String),
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub telemetry: TelemetryConfig,
    pub scene: SceneConfig,
    pub web: WebConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct TelemetryConfig {
    pub url: String,
    #[serde(deserialize_with = "deserialize_duration")]
    pub poll_interval: Duration,
    /// Defaults to `poll_interval` when absent.
    #[serde(deserialize_with = "deserialize_optional_duration")]
    pub fetch_timeout: Option<Duration>,
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            url: DEFAULT_TELEMETRY_URL.to_string(),
            poll_interval: DEFAULT_POLL_INTERVAL,
            fetch_timeout: None,
        }
    }
}

impl TelemetryConfig {
    pub fn poller_config(&self) -> PollerConfig {
        PollerConfig {
            interval: self.poll_interval,
            fetch_timeout: self.fetch_timeout.unwrap_or(self.poll_interval),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct WebConfig {
    pub bind: String,
}

impl Default for WebConfig {
    fn default() -> Self {
        Self {
            bind: "0.0.0.0:8080".to_string(),
        }
    }
}

impl Config {
    pub fn from_file(path: &str) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_str(&content)
    }

    pub fn from_str(yaml: &str) -> Result<Self, ConfigError> {
        let config: Config = serde_yaml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    /// Read `path` if given, otherwise fall back to defaults.
    pub fn load(path: Option<&str>) -> Result<Self, ConfigError> {
        match path {
            Some(path) => Self::from_file(path),
            None => Ok(Self::default()),
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let invalid = |msg: &str| Err(ConfigError::Invalid(msg.to_string()));

        if self.telemetry.url.trim().is_empty() {
            return invalid("telemetry.url is empty");
        }
        if self.telemetry.poll_interval.is_zero() {
            return invalid("telemetry.poll_interval must be positive");
        }
        if self.telemetry.fetch_timeout.is_some_and(|t| t.is_zero()) {
            return invalid("telemetry.fetch_timeout must be positive");
        }
        if !(self.scene.body_radius.is_finite() && self.scene.body_radius >= 0.0) {
            return invalid("scene.body_radius must be a non-negative number");
        }
        if !(self.scene.marker_altitude_offset.is_finite()
            && self.scene.marker_altitude_offset >= 0.0)
        {
            return invalid("scene.marker_altitude_offset must be a non-negative number");
        }
        if !(self.scene.sun_distance_factor.is_finite() && self.scene.sun_distance_factor > 1.0) {
            return invalid("scene.sun_distance_factor must be greater than 1");
        }
        Ok(())
    }
}

fn deserialize_duration<'de, D>(deserializer: D) -> Result<Duration, D::Error>
where
    D: Deserializer<'de>,
{
    let s = String::deserialize(deserializer)?;
    humantime::parse_duration(s.trim()).map_err(serde::de::Error::custom)
}

fn deserialize_optional_duration<'de, D>(deserializer: D) -> Result<Option<Duration>, D::Error>
where
    D: Deserializer<'de>,
{
    Option::<String>::deserialize(deserializer)?
        .map(|s| humantime::parse_duration(s.trim()).map_err(serde::de::Error::custom))
        .transpose()
}
