use axum::{
    extract::{Query, State},
    Json,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::ephemeris::sub_solar_point;
use crate::geo::{to_cartesian, CartesianVector, GeodeticPoint};
use crate::scene::SceneState;
use crate::web::api::error::{ApiError, ApiResult};
use crate::web::state::AppState;

#[derive(Debug, Deserialize, IntoParams)]
pub struct SunQuery {
    /// RFC3339 instant, defaults to now
    pub at: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct SunResponse {
    pub at: DateTime<Utc>,
    pub sub_solar: GeodeticPoint,
    pub direction: CartesianVector,
}

#[utoipa::path(
    get,
    path = "/api/scene",
    responses(
        (status = 200, description = "Scene vectors for the current instant", body = SceneState)
    ),
    tag = "scene"
)]
pub async fn scene(State(state): State<AppState>) -> ApiResult<Json<SceneState>> {
    let track = state.poller.lock().await.track_state();
    let now = state.clock.now();
    Ok(Json(SceneState::compute(&track, now, &state.config.scene)))
}

#[utoipa::path(
    get,
    path = "/api/sun",
    params(SunQuery),
    responses(
        (status = 200, description = "Sub-solar point", body = SunResponse),
        (status = 400, description = "Invalid timestamp")
    ),
    tag = "scene"
)]
pub async fn sun(
    State(state): State<AppState>,
    Query(query): Query<SunQuery>,
) -> ApiResult<Json<SunResponse>> {
    let at = match query.at.as_deref() {
        Some(raw) => DateTime::parse_from_rfc3339(raw)
            .map_err(|e| ApiError::Validation(format!("invalid 'at': {}", e)))?
            .with_timezone(&Utc),
        None => state.clock.now(),
    };

    let sub_solar = sub_solar_point(at);
    let scene = &state.config.scene;
    let direction = to_cartesian(&sub_solar, scene.body_radius * scene.sun_distance_factor);

    Ok(Json(SunResponse {
        at,
        sub_solar,
        direction,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::telemetry::{
        FetchError, FixedClock, ManualScheduler, PollerConfig, TelemetryPoller, TelemetrySource,
        TrackReading,
    };
    use async_trait::async_trait;
    use chrono::TimeZone;
    use std::sync::Arc;
    use tokio::sync::Mutex;

    struct Offline;

    #[async_trait]
    impl TelemetrySource for Offline {
        async fn fetch(&self) -> Result<TrackReading, FetchError> {
            Err(FetchError::NetworkUnreachable("offline".into()))
        }
    }

    fn app_state() -> AppState {
        let clock = Arc::new(FixedClock::new(
            Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap(),
        ));
        let poller = TelemetryPoller::new(
            Arc::new(Offline),
            Arc::new(ManualScheduler::new()),
            clock.clone(),
            PollerConfig::default(),
        );
        AppState {
            config: Arc::new(Config::default()),
            poller: Arc::new(Mutex::new(poller)),
            clock,
        }
    }

    #[tokio::test]
    async fn sun_defaults_to_clock() {
        let Json(body) = sun(State(app_state()), Query(SunQuery { at: None }))
            .await
            .ok()
            .unwrap();
        assert_eq!(body.at, Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap());
        assert_eq!(body.sub_solar.longitude_deg(), 0.0);
        assert!((body.direction.norm() - 50.0).abs() < 1e-9);
    }

    #[tokio::test]
    async fn sun_rejects_bad_timestamp() {
        let result = sun(
            State(app_state()),
            Query(SunQuery {
                at: Some("yesterday".into()),
            }),
        )
        .await;
        assert!(matches!(result, Err(ApiError::Validation(_))));
    }

    #[tokio::test]
    async fn scene_without_sample_has_no_marker() {
        let Json(body) = scene(State(app_state())).await.ok().unwrap();
        assert!(body.object_vector.is_none());
        assert_eq!(body.health, crate::telemetry::Health::Acquiring);
    }
}
