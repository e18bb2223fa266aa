use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex as StdMutex};
use std::time::Duration;
use tokio::sync::oneshot;
use tokio::time::{interval, MissedTickBehavior};

pub type TickFn = Box<dyn FnMut() -> TickOutcome + Send + 'static>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    Dispatched,
    /// A fetch was still outstanding; this tick is dropped.
    Skipped,
    /// The run this tick belonged to has been stopped.
    Stale,
}

/// Runs a tick function every `interval` until the returned handle is
/// cancelled.
pub trait Scheduler: Send + Sync {
    fn schedule(&self, interval: Duration, tick: TickFn) -> ScheduleHandle;
}

#[derive(Debug)]
pub struct ScheduleHandle {
    cancelled: Arc<AtomicBool>,
    stop_tx: Option<oneshot::Sender<()>>,
}

impl ScheduleHandle {
    fn new(cancelled: Arc<AtomicBool>, stop_tx: Option<oneshot::Sender<()>>) -> Self {
        Self { cancelled, stop_tx }
    }

    /// No tick starts after this returns.
    pub fn cancel(mut self) {
        self.cancelled.store(true, Ordering::SeqCst);
        if let Some(stop_tx) = self.stop_tx.take() {
            let _ = stop_tx.send(());
        }
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::SeqCst)
    }
}

/// Tokio timer. The first tick fires immediately; ticks the task could not
/// run on time are dropped rather than burst.
#[derive(Debug, Default, Clone, Copy)]
pub struct IntervalScheduler;

impl Scheduler for IntervalScheduler {
    fn schedule(&self, period: Duration, mut tick: TickFn) -> ScheduleHandle {
        let cancelled = Arc::new(AtomicBool::new(false));
        let (stop_tx, mut stop_rx) = oneshot::channel();
        let flag = cancelled.clone();

        tokio::spawn(async move {
            let mut ticker = interval(period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

            loop {
                let should_stop = tokio::select! {
                    _ = ticker.tick() => false,
                    _ = &mut stop_rx => true,
                };
                if should_stop || flag.load(Ordering::SeqCst) {
                    return;
                }
                if tick() == TickOutcome::Stale {
                    return;
                }
            }
        });

        ScheduleHandle::new(cancelled, Some(stop_tx))
    }
}

struct Slot {
    cancelled: Arc<AtomicBool>,
    tick: TickFn,
}

/// Fires ticks only when [`ManualScheduler::step`] is called.
#[derive(Clone, Default)]
pub struct ManualScheduler {
    slots: Arc<StdMutex<Vec<Slot>>>,
}

impl ManualScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fire every live tick once and report what each one did.
    pub fn step(&self) -> Vec<TickOutcome> {
        let mut slots = self.slots.lock().unwrap();
        slots.retain(|slot| !slot.cancelled.load(Ordering::SeqCst));
        slots.iter_mut().map(|slot| (slot.tick)()).collect()
    }
}

impl Scheduler for ManualScheduler {
    fn schedule(&self, _interval: Duration, tick: TickFn) -> ScheduleHandle {
        let cancelled = Arc::new(AtomicBool::new(false));
        self.slots.lock().unwrap().push(Slot {
            cancelled: cancelled.clone(),
            tick,
        });
        ScheduleHandle::new(cancelled, None)
    }
}
