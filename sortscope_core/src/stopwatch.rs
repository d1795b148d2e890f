//! Tick based stopwatch that runs alongside a sorting run.

use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use tokio::task::JoinHandle;
use tokio::time::{self, Instant, MissedTickBehavior};

use crate::observer::RunObserver;

/// Formats milliseconds as `seconds.millis` with the millis zero padded to three digits.
///
/// # Example
/// ```
/// use sortscope_core::format_elapsed;
///
/// assert_eq!(format_elapsed(0), "0.000s");
/// assert_eq!(format_elapsed(1534), "1.534s");
/// ```
#[must_use]
pub fn format_elapsed(ms: u64) -> String {
    format!("{}.{:03}s", ms / 1000, ms % 1000)
}

#[derive(Debug, Default)]
struct Clock {
    elapsed_ms: u64,
    running: bool,
    // Bumped on every start so a ticker from an earlier start can never count again.
    epoch: u64,
}

/// Elapsed time counter advanced by a fixed interval ticker while a run is active.
///
/// Increments and [`stop`](Stopwatch::stop) go through the same lock: once `stop` has returned,
/// the value it returned is final.
pub struct Stopwatch {
    clock: Arc<Mutex<Clock>>,
    ticker: Mutex<Option<JoinHandle<()>>>,
    tick: Duration,
}

impl Stopwatch {
    #[must_use]
    pub fn new(tick: Duration) -> Self {
        Self {
            clock: Arc::new(Mutex::new(Clock::default())),
            ticker: Mutex::new(None),
            tick,
        }
    }

    #[must_use]
    pub fn elapsed_ms(&self) -> u64 {
        self.clock.lock().elapsed_ms
    }

    /// Starts ticking from the current value. Must be called from within a tokio runtime.
    ///
    /// Does nothing if already running.
    pub fn start(&self, observer: Arc<dyn RunObserver>) {
        let epoch = {
            let mut clock = self.clock.lock();
            if clock.running {
                return;
            }
            clock.running = true;
            clock.epoch += 1;
            clock.epoch
        };

        let clock = Arc::clone(&self.clock);
        let tick = self.tick;
        let step = u64::try_from(tick.as_millis()).unwrap_or(u64::MAX);

        let handle = tokio::spawn(async move {
            let mut interval = time::interval_at(Instant::now() + tick, tick);
            interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                interval.tick().await;
                let mut guard = clock.lock();
                if !guard.running || guard.epoch != epoch {
                    break;
                }
                guard.elapsed_ms += step;
                observer.on_elapsed_tick(guard.elapsed_ms);
            }
        });

        if let Some(previous) = self.ticker.lock().replace(handle) {
            previous.abort();
        }
    }

    /// Stops ticking and returns the final elapsed value.
    pub fn stop(&self) -> u64 {
        let elapsed = {
            let mut clock = self.clock.lock();
            clock.running = false;
            clock.elapsed_ms
        };
        if let Some(ticker) = self.ticker.lock().take() {
            ticker.abort();
        }
        elapsed
    }

    /// Stops ticking and sets the elapsed value back to zero.
    pub fn reset(&self, observer: &dyn RunObserver) {
        self.stop();
        let mut clock = self.clock.lock();
        clock.elapsed_ms = 0;
        observer.on_elapsed_tick(0);
    }
}

impl Drop for Stopwatch {
    fn drop(&mut self) {
        if let Some(ticker) = self.ticker.get_mut().take() {
            ticker.abort();
        }
    }
}
