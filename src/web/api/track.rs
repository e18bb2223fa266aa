use axum::{extract::State, Json};
use serde::Serialize;
use utoipa::ToSchema;

use crate::telemetry::{Health, PollerMode, TrackSample, TrackState};
use crate::web::api::error::ApiResult;
use crate::web::state::AppState;

#[derive(Debug, Serialize, ToSchema)]
pub struct TrackStatusResponse {
    pub health: Health,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sample: Option<TrackSample>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl From<TrackState> for TrackStatusResponse {
    fn from(state: TrackState) -> Self {
        let health = state.health();
        match state {
            TrackState::Acquiring => Self {
                health,
                sample: None,
                error: None,
            },
            TrackState::Live(sample) => Self {
                health,
                sample: Some(sample),
                error: None,
            },
            TrackState::Lost(reason) => Self {
                health,
                sample: None,
                error: Some(reason.to_string()),
            },
        }
    }
}

#[utoipa::path(
    get,
    path = "/api/track",
    responses(
        (status = 200, description = "Latest track state", body = TrackStatusResponse)
    ),
    tag = "track"
)]
pub async fn status(State(state): State<AppState>) -> ApiResult<Json<TrackStatusResponse>> {
    let poller = state.poller.lock().await;
    Ok(Json(poller.track_state().into()))
}

#[utoipa::path(
    get,
    path = "/api/track/mode",
    responses(
        (status = 200, description = "Poller mode", body = PollerMode)
    ),
    tag = "track"
)]
pub async fn mode(State(state): State<AppState>) -> ApiResult<Json<PollerMode>> {
    let poller = state.poller.lock().await;
    Ok(Json(poller.mode()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::telemetry::FetchError;

    #[test]
    fn lost_state_carries_reason() {
        let response = TrackStatusResponse::from(TrackState::Lost(FetchError::BadStatus(502)));
        assert_eq!(response.health, Health::Lost);
        assert_eq!(response.error.as_deref(), Some("bad status: 502"));
        assert!(response.sample.is_none());

        let body = serde_json::to_value(TrackStatusResponse::from(TrackState::Acquiring)).unwrap();
        assert_eq!(body, serde_json::json!({ "health": "acquiring" }));
    }
}
