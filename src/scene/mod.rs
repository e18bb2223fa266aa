mod state;

pub use state::{
    SceneConfig, SceneState, DEFAULT_BODY_RADIUS, DEFAULT_MARKER_ALTITUDE_OFFSET,
    DEFAULT_SUN_DISTANCE_FACTOR,
};
