mod clock;
mod error;
mod parsing;
mod poller;
mod schedule;
mod source;
mod types;

pub use clock::{Clock, FixedClock, SystemClock};
pub use error::{FetchError, TelemetryError};
pub use parsing::parse_payload;
pub use poller::{PollerConfig, TelemetryPoller, DEFAULT_POLL_INTERVAL};
pub use schedule::{
    IntervalScheduler, ManualScheduler, ScheduleHandle, Scheduler, TickFn, TickOutcome,
};
pub use source::{HttpTelemetrySource, TelemetrySource, DEFAULT_TELEMETRY_URL};
pub use types::{
    Health, Passthrough, PollerMode, TrackReading, TrackSample, TrackState, Visibility,
};
