use utoipa::OpenApi;

use super::api::error::ErrorResponse;
use super::api::scene::SunResponse;
use super::api::track::TrackStatusResponse;

#[derive(OpenApi)]
#[openapi(
    paths(
        super::api::track::status,
        super::api::track::mode,
        super::api::scene::scene,
        super::api::scene::sun,
    ),
    components(
        schemas(
            TrackStatusResponse,
            SunResponse,
            ErrorResponse,
            crate::scene::SceneState,
            crate::scene::SceneConfig,
            crate::geo::GeodeticPoint,
            crate::geo::CartesianVector,
            crate::telemetry::TrackSample,
            crate::telemetry::Health,
            crate::telemetry::PollerMode,
        )
    ),
    info(
        title = "Orbit Glance API",
        description = "Live position of the tracked object and the sun, in scene coordinates",
        version = "0.1.0"
    ),
    tags(
        (name = "track", description = "Telemetry poller state"),
        (name = "scene", description = "Scene vectors and sub-solar point")
    )
)]
pub struct ApiDoc;
