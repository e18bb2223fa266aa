use std::sync::{Arc, Mutex as StdMutex};
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;

use super::clock::Clock;
use super::error::{FetchError, TelemetryError};
use super::schedule::{ScheduleHandle, Scheduler, TickOutcome};
use super::source::TelemetrySource;
use super::types::{PollerMode, TrackSample, TrackState};

pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(5);

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PollerConfig {
    pub interval: Duration,
    /// Upper bound on a single fetch. A fetch that runs longer resolves as
    /// `NetworkUnreachable` so it cannot suppress ticks forever.
    pub fetch_timeout: Duration,
}

impl Default for PollerConfig {
    fn default() -> Self {
        Self {
            interval: DEFAULT_POLL_INTERVAL,
            fetch_timeout: DEFAULT_POLL_INTERVAL,
        }
    }
}

#[derive(Debug)]
struct Shared {
    state: TrackState,
    mode: PollerMode,
    /// Bumped on every start and stop. Results tagged with an older epoch are
    /// discarded.
    epoch: u64,
}

/// The fetch task of the current run. `done` flips to true once its result
/// has been applied.
struct InFlight {
    join: JoinHandle<()>,
    done: watch::Receiver<bool>,
}

impl InFlight {
    fn is_pending(&self) -> bool {
        !*self.done.borrow() && !self.join.is_finished()
    }
}

struct Inner {
    source: Arc<dyn TelemetrySource>,
    clock: Arc<dyn Clock>,
    config: PollerConfig,
    shared: StdMutex<Shared>,
    in_flight: StdMutex<Option<InFlight>>,
}

/// Keeps the latest position of the tracked object by fetching on a fixed
/// cadence, with at most one fetch in flight.
///
/// State goes `Acquiring` on start, then `Live` or `Lost` after each fetch
/// depending only on that fetch's outcome. Stopping guarantees no further
/// writes to the track state.
pub struct TelemetryPoller {
    inner: Arc<Inner>,
    scheduler: Arc<dyn Scheduler>,
    schedule: Option<ScheduleHandle>,
}

impl TelemetryPoller {
    pub fn new(
        source: Arc<dyn TelemetrySource>,
        scheduler: Arc<dyn Scheduler>,
        clock: Arc<dyn Clock>,
        config: PollerConfig,
    ) -> Self {
        Self {
            inner: Arc::new(Inner {
                source,
                clock,
                config,
                shared: StdMutex::new(Shared {
                    state: TrackState::Acquiring,
                    mode: PollerMode::Idle,
                    epoch: 0,
                }),
                in_flight: StdMutex::new(None),
            }),
            scheduler,
            schedule: None,
        }
    }

    pub fn config(&self) -> PollerConfig {
        self.inner.config
    }

    pub fn track_state(&self) -> TrackState {
        self.inner.shared.lock().unwrap().state.clone()
    }

    pub fn mode(&self) -> PollerMode {
        self.inner.shared.lock().unwrap().mode.clone()
    }

    pub fn is_running(&self) -> bool {
        self.schedule.is_some()
    }

    /// Reset to `Acquiring` and register with the scheduler. Must be called
    /// from within a tokio runtime.
    pub fn start(&mut self) -> Result<(), TelemetryError> {
        if self.schedule.is_some() {
            return Err(TelemetryError::AlreadyRunning);
        }

        let epoch = {
            let mut shared = self.inner.shared.lock().unwrap();
            shared.epoch += 1;
            shared.state = TrackState::Acquiring;
            shared.mode = PollerMode::Running {
                started: self.inner.clock.now(),
                interval_secs: self.inner.config.interval.as_secs_f64(),
            };
            shared.epoch
        };

        let inner = self.inner.clone();
        let handle = self.scheduler.schedule(
            self.inner.config.interval,
            Box::new(move || inner.tick(epoch)),
        );
        self.schedule = Some(handle);

        log::info!(
            "Telemetry poller started (interval: {:?}, timeout: {:?})",
            self.inner.config.interval,
            self.inner.config.fetch_timeout
        );
        Ok(())
    }

    /// Cancel the schedule and drop any outstanding fetch. The track state goes
    /// back to `Acquiring` and is not written again until the next `start`.
    pub async fn stop(&mut self) {
        if let Some(handle) = self.schedule.take() {
            handle.cancel();
        }

        {
            let mut shared = self.inner.shared.lock().unwrap();
            shared.epoch += 1;
            shared.state = TrackState::Acquiring;
            shared.mode = PollerMode::Idle;
        }

        let in_flight = self.inner.in_flight.lock().unwrap().take();
        if let Some(InFlight { join, .. }) = in_flight {
            join.abort();
            let _ = join.await;
        }

        log::info!("Telemetry poller stopped");
    }

    /// Wait for the outstanding fetch, if any, to be applied. The fetch stays
    /// registered, so ticks arriving meanwhile are still skipped.
    pub async fn settle(&self) {
        let done = self
            .inner
            .in_flight
            .lock()
            .unwrap()
            .as_ref()
            .map(|fetch| fetch.done.clone());
        if let Some(mut done) = done {
            // Err means the task was aborted by `stop`
            let _ = done.wait_for(|applied| *applied).await;
        }
    }
}

impl Inner {
    fn tick(self: &Arc<Self>, epoch: u64) -> TickOutcome {
        let mut in_flight = self.in_flight.lock().unwrap();

        if in_flight.as_ref().is_some_and(InFlight::is_pending) {
            log::debug!("Previous telemetry fetch still outstanding, skipping tick");
            return TickOutcome::Skipped;
        }

        if self.shared.lock().unwrap().epoch != epoch {
            return TickOutcome::Stale;
        }

        let inner = self.clone();
        let (done_tx, done) = watch::channel(false);
        let join = tokio::spawn(async move {
            inner.poll_once(epoch).await;
            let _ = done_tx.send(true);
        });
        *in_flight = Some(InFlight { join, done });
        TickOutcome::Dispatched
    }

    async fn poll_once(&self, epoch: u64) {
        let timeout = self.config.fetch_timeout;
        let result = match tokio::time::timeout(timeout, self.source.fetch()).await {
            Ok(result) => result,
            Err(_) => Err(FetchError::NetworkUnreachable(format!(
                "no response within {:?}",
                timeout
            ))),
        };

        let next = match result {
            Ok(reading) => TrackState::Live(TrackSample::new(reading, self.clock.now())),
            Err(e) => TrackState::Lost(e),
        };
        self.apply(epoch, next);
    }

    fn apply(&self, epoch: u64, next: TrackState) {
        let mut shared = self.shared.lock().unwrap();
        if shared.epoch != epoch {
            log::debug!("Discarding telemetry result from a stopped run");
            return;
        }

        match (&shared.state, &next) {
            (_, TrackState::Lost(reason)) => log::warn!("Telemetry lost: {}", reason),
            (TrackState::Live(_), TrackState::Live(sample)) => log::debug!(
                "Telemetry sample {} at {:.3}, {:.3}",
                sample.id,
                sample.position.latitude_deg(),
                sample.position.longitude_deg()
            ),
            (_, TrackState::Live(sample)) => log::info!(
                "Telemetry live (object {}, {} -> live)",
                sample.id,
                shared.state.health()
            ),
            (_, TrackState::Acquiring) => {}
        }

        shared.state = next;
    }
}
