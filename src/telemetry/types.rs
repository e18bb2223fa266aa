use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::error::FetchError;
use crate::geo::GeodeticPoint;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Visibility {
    Daylight,
    Eclipsed,
    Other(String),
}

impl From<String> for Visibility {
    fn from(value: String) -> Self {
        match value.as_str() {
            "daylight" => Visibility::Daylight,
            "eclipsed" => Visibility::Eclipsed,
            _ => Visibility::Other(value),
        }
    }
}

impl From<Visibility> for String {
    fn from(value: Visibility) -> Self {
        match value {
            Visibility::Daylight => "daylight".to_string(),
            Visibility::Eclipsed => "eclipsed".to_string(),
            Visibility::Other(label) => label,
        }
    }
}

/// Fields carried by the feed that nothing here computes with. Kept so
/// consumers can display them.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Passthrough {
    pub name: Option<String>,
    pub footprint: Option<f64>,
    pub timestamp: Option<i64>,
    pub daynum: Option<f64>,
    pub solar_lat: Option<f64>,
    pub solar_lon: Option<f64>,
    pub units: Option<String>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

/// One validated telemetry reading, before it is stamped by the poller.
#[derive(Debug, Clone, PartialEq)]
pub struct TrackReading {
    pub id: u64,
    pub position: GeodeticPoint,
    pub altitude_km: f64,
    pub velocity_kmh: f64,
    pub visibility: Visibility,
    pub passthrough: Passthrough,
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct TrackSample {
    pub id: u64,
    pub position: GeodeticPoint,
    pub altitude_km: f64,
    pub velocity_kmh: f64,
    #[schema(value_type = String)]
    pub visibility: Visibility,
    pub received_at: DateTime<Utc>,
    #[schema(value_type = Object)]
    pub passthrough: Passthrough,
}

impl TrackSample {
    pub fn new(reading: TrackReading, received_at: DateTime<Utc>) -> Self {
        Self {
            id: reading.id,
            position: reading.position,
            altitude_km: reading.altitude_km,
            velocity_kmh: reading.velocity_kmh,
            visibility: reading.visibility,
            received_at,
            passthrough: reading.passthrough,
        }
    }
}

/// What the poller currently knows about the tracked object.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum TrackState {
    #[default]
    Acquiring,
    Live(TrackSample),
    Lost(FetchError),
}

impl TrackState {
    pub fn health(&self) -> Health {
        match self {
            TrackState::Acquiring => Health::Acquiring,
            TrackState::Live(_) => Health::Live,
            TrackState::Lost(_) => Health::Lost,
        }
    }

    pub fn sample(&self) -> Option<&TrackSample> {
        match self {
            TrackState::Live(sample) => Some(sample),
            _ => None,
        }
    }
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema, strum_macros::Display,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum Health {
    Acquiring,
    Live,
    Lost,
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub enum PollerMode {
    Idle,
    Running {
        started: DateTime<Utc>,
        interval_secs: f64,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn visibility_labels() {
        assert_eq!(Visibility::from("daylight".to_string()), Visibility::Daylight);
        assert_eq!(Visibility::from("eclipsed".to_string()), Visibility::Eclipsed);
        assert_eq!(
            Visibility::from("penumbra".to_string()),
            Visibility::Other("penumbra".to_string())
        );
        assert_eq!(String::from(Visibility::Other("x".into())), "x");
    }

    #[test]
    fn health_projection() {
        assert_eq!(TrackState::Acquiring.health(), Health::Acquiring);
        assert_eq!(TrackState::Lost(FetchError::BadStatus(500)).health(), Health::Lost);
        assert_eq!(Health::Live.to_string(), "live");
        assert!(TrackState::Acquiring.sample().is_none());
    }
}
