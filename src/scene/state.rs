use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::ephemeris::sub_solar_point;
use crate::geo::{to_cartesian, CartesianVector, GeodeticPoint};
use crate::telemetry::{Health, TrackState};

pub const DEFAULT_BODY_RADIUS: f64 = 5.0;
pub const DEFAULT_MARKER_ALTITUDE_OFFSET: f64 = 0.2;
pub const DEFAULT_SUN_DISTANCE_FACTOR: f64 = 10.0;

#[derive(Debug, Clone, Copy, PartialEq, Deserialize, Serialize, ToSchema)]
#[serde(default)]
pub struct SceneConfig {
    /// Radius of the model body in scene units.
    pub body_radius: f64,
    /// How far above the surface the tracked object is drawn.
    pub marker_altitude_offset: f64,
    /// Light source distance as a multiple of `body_radius`.
    pub sun_distance_factor: f64,
}

impl Default for SceneConfig {
    fn default() -> Self {
        Self {
            body_radius: DEFAULT_BODY_RADIUS,
            marker_altitude_offset: DEFAULT_MARKER_ALTITUDE_OFFSET,
            sun_distance_factor: DEFAULT_SUN_DISTANCE_FACTOR,
        }
    }
}

/// Everything a renderer needs for one frame.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct SceneState {
    pub at: DateTime<Utc>,
    /// Present only while the track is live.
    pub object_vector: Option<CartesianVector>,
    pub sun_direction: CartesianVector,
    pub sub_solar: GeodeticPoint,
    pub health: Health,
}

impl SceneState {
    pub fn compute(track: &TrackState, now: DateTime<Utc>, config: &SceneConfig) -> Self {
        let object_vector = track.sample().map(|sample| {
            to_cartesian(
                &sample.position,
                config.body_radius + config.marker_altitude_offset,
            )
        });

        let sub_solar = sub_solar_point(now);
        let sun_distance = config.body_radius * config.sun_distance_factor;
        let sun_direction = to_cartesian(&sub_solar, sun_distance);

        Self {
            at: now,
            object_vector,
            sun_direction,
            sub_solar,
            health: track.health(),
        }
    }
}
