use std::sync::Arc;
use tokio::sync::Mutex;

use crate::config::Config;
use crate::telemetry::{Clock, TelemetryPoller};

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub poller: Arc<Mutex<TelemetryPoller>>,
    pub clock: Arc<dyn Clock>,
}
