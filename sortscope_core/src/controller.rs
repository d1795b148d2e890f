//! The run controller: owns the current array, starts and cancels runs and keeps the stopwatch
//! and history in step with the run lifecycle.

use std::any::Any;
use std::fmt;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;

use futures::FutureExt;
use parking_lot::Mutex;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::Serialize;
use tokio::runtime::Handle;
use tokio::task::JoinHandle;

use crate::algorithm::Algorithm;
use crate::config::{Speed, SpeedControl, VisualizerConfig};
use crate::error::{Result, RunError, VizError};
use crate::history::{HistoryLog, HistoryRecord};
use crate::observer::{Marker, RunObserver, Snapshot};
use crate::sorters::StepSorter;
use crate::stepper::{Pacing, StepCounts, StepSink, Stepper};
use crate::stopwatch::Stopwatch;
use crate::token::CancellationToken;

/// Lifecycle of the visualizer.
///
/// A paused run is indistinguishable from a cancelled one: both go back to `Idle`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RunState {
    #[default]
    Idle,
    Running,
    Completed,
}

impl fmt::Display for RunState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = match self {
            Self::Idle => "idle",
            Self::Running => "running",
            Self::Completed => "completed",
        };
        f.write_str(state)
    }
}

/// How a run ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunOutcome {
    /// The array was sorted. The record is the one added to the history.
    Completed {
        record: HistoryRecord,
        counts: StepCounts,
    },
    /// The run was cancelled (paused) before it finished.
    Cancelled,
    /// The run was aborted by an internal fault.
    Faulted(String),
}

/// Handle to a spawned run.
#[derive(Debug)]
pub struct RunHandle(JoinHandle<RunOutcome>);

impl RunHandle {
    /// Waits for the run to end.
    pub async fn join(self) -> RunOutcome {
        self.0
            .await
            .unwrap_or_else(|err| RunOutcome::Faulted(err.to_string()))
    }
}

struct Inner {
    state: RunState,
    algorithm: Algorithm,
    array: Vec<u32>,
    // Length used by `regenerate`; only changed by `new_array`.
    size: usize,
    comparing: Marker,
    swapping: Marker,
    // Permutation of the run's input to fall back to while `array` shows a sorter holding values
    // outside it.
    settled: Option<Vec<u32>>,
    // Token of the active run, if any.
    token: Option<CancellationToken>,
    history: HistoryLog,
    rng: StdRng,
}

impl Inner {
    fn is_active(&self, token: &CancellationToken) -> bool {
        !token.is_cancelled() && self.token.as_ref().is_some_and(|t| t.same_as(token))
    }

    fn clear_markers(&mut self) {
        self.comparing = None;
        self.swapping = None;
    }

    // Called when a run stops early, so a resumed run starts from a permutation of the input.
    fn settle(&mut self) {
        if let Some(values) = self.settled.take() {
            self.array = values;
        }
    }

    fn snapshot(&self) -> Snapshot {
        Snapshot {
            values: self.array.clone(),
            comparing: self.comparing,
            swapping: self.swapping,
            completed: self.state == RunState::Completed,
        }
    }

    fn generate(&mut self, size: usize, max_value: u32) {
        let rng = &mut self.rng;
        self.array = (0..size).map(|_| rng.gen_range(1..=max_value)).collect();
        self.size = size;
    }
}

struct Shared {
    config: VisualizerConfig,
    observer: Arc<dyn RunObserver>,
    speed: SpeedControl,
    stopwatch: Stopwatch,
    inner: Mutex<Inner>,
}

impl Shared {
    // Moves an Idle or Completed visualizer to a fresh Idle state over the current array.
    fn reset_idle(&self, inner: &mut Inner) {
        inner.state = RunState::Idle;
        inner.clear_markers();
        self.stopwatch.reset(self.observer.as_ref());
        self.observer.on_snapshot(&inner.snapshot());
    }

    fn complete(
        &self,
        algorithm: Algorithm,
        token: &CancellationToken,
        values: Vec<u32>,
        counts: StepCounts,
    ) -> RunOutcome {
        let mut inner = self.inner.lock();
        if !inner.is_active(token) {
            return RunOutcome::Cancelled;
        }

        let elapsed = self.stopwatch.stop();
        let size = values.len();
        inner.token = None;
        inner.state = RunState::Completed;
        inner.array = values;
        inner.settled = None;
        inner.clear_markers();
        self.observer.on_snapshot(&inner.snapshot());

        let record = HistoryRecord::new(algorithm, elapsed, size);
        inner.history.push(record.clone());
        self.observer.on_history_changed(&inner.history.to_vec());

        tracing::debug!(
            %algorithm,
            size,
            elapsed_ms = elapsed,
            comparisons = counts.comparisons,
            exchanges = counts.exchanges,
            writes = counts.writes,
            "run completed"
        );
        RunOutcome::Completed { record, counts }
    }

    fn fault(&self, algorithm: Algorithm, token: &CancellationToken, message: String) -> RunOutcome {
        let mut inner = self.inner.lock();
        if !inner.is_active(token) {
            return RunOutcome::Cancelled;
        }

        token.cancel();
        inner.token = None;
        inner.state = RunState::Idle;
        inner.settle();
        inner.clear_markers();
        self.stopwatch.stop();
        self.observer.on_snapshot(&inner.snapshot());
        self.observer.on_diagnostic(&message);

        tracing::error!(%algorithm, %message, "run aborted");
        RunOutcome::Faulted(message)
    }
}

// Publication path of one run. Writes into the shared state only while the run is still active.
struct RunSink {
    shared: Arc<Shared>,
    token: CancellationToken,
}

impl StepSink for RunSink {
    fn publish(
        &self,
        snapshot: Snapshot,
        settled: Option<Vec<u32>>,
    ) -> std::result::Result<(), RunError> {
        let mut inner = self.shared.inner.lock();
        if !inner.is_active(&self.token) {
            return Err(RunError::Cancelled);
        }

        inner.array.clone_from(&snapshot.values);
        inner.settled = settled;
        inner.comparing = snapshot.comparing;
        inner.swapping = snapshot.swapping;
        self.shared.observer.on_snapshot(&snapshot);
        Ok(())
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        format!("sorter panicked: {message}")
    } else if let Some(message) = payload.downcast_ref::<String>() {
        format!("sorter panicked: {message}")
    } else {
        "sorter panicked".to_string()
    }
}

async fn drive(
    shared: Arc<Shared>,
    algorithm: Algorithm,
    sorter: &'static dyn StepSorter,
    token: CancellationToken,
    values: Vec<u32>,
) -> RunOutcome {
    let sink = Arc::new(RunSink {
        shared: Arc::clone(&shared),
        token: token.clone(),
    });
    let mut stepper = Stepper::new(
        values,
        token.clone(),
        Pacing::Paced(shared.speed.clone()),
        sink,
    );

    let result = AssertUnwindSafe(sorter.sort(&mut stepper))
        .catch_unwind()
        .await
        .unwrap_or_else(|payload| Err(RunError::Fault(panic_message(payload.as_ref()))));

    match result {
        Ok(()) => {
            let (values, counts) = stepper.finish();
            shared.complete(algorithm, &token, values, counts)
        }
        Err(RunError::Cancelled) => {
            tracing::debug!(%algorithm, "run cancelled");
            RunOutcome::Cancelled
        }
        Err(RunError::Fault(message)) => shared.fault(algorithm, &token, message),
    }
}

/// Drives sorting runs over an array and reports every step to a [`RunObserver`].
///
/// At most one run is active at a time. Runs are spawned on the ambient tokio runtime; everything
/// else is synchronous.
///
/// # Example
/// ```
/// use std::sync::Arc;
/// use sortscope_core::{Algorithm, NoOpObserver, RunOutcome, Visualizer, VisualizerConfig};
///
/// let runtime = tokio::runtime::Builder::new_current_thread()
///     .enable_all()
///     .build()
///     .unwrap();
///
/// runtime.block_on(async {
///     let viz = Visualizer::new(VisualizerConfig::default(), Arc::new(NoOpObserver)).unwrap();
///     viz.load_array(vec![3, 1, 2]).unwrap();
///     viz.set_speed(100).unwrap();
///
///     let outcome = viz.start(Algorithm::Insertion).unwrap().join().await;
///     assert!(matches!(outcome, RunOutcome::Completed { .. }));
///     assert_eq!(viz.array(), vec![1, 2, 3]);
/// });
/// ```
pub struct Visualizer {
    shared: Arc<Shared>,
}

impl Visualizer {
    /// Creates an idle visualizer over a freshly generated array of `config.initial_size` values.
    pub fn new(config: VisualizerConfig, observer: Arc<dyn RunObserver>) -> Result<Self> {
        config.validate()?;

        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        let mut inner = Inner {
            state: RunState::Idle,
            algorithm: Algorithm::default(),
            array: Vec::new(),
            size: config.initial_size,
            comparing: None,
            swapping: None,
            settled: None,
            token: None,
            history: HistoryLog::new(config.history_capacity),
            rng,
        };
        inner.generate(config.initial_size, config.max_value);
        observer.on_snapshot(&inner.snapshot());

        let shared = Shared {
            speed: SpeedControl::new(config.speed),
            stopwatch: Stopwatch::new(config.tick()),
            inner: Mutex::new(inner),
            observer,
            config,
        };
        Ok(Self {
            shared: Arc::new(shared),
        })
    }

    /// Starts `algorithm` over the current array.
    ///
    /// After a completed run the stopwatch starts from zero; after a pause it continues from
    /// where it stopped and the run picks up the array as the paused run left it.
    pub fn start(&self, algorithm: Algorithm) -> Result<RunHandle> {
        self.start_with(algorithm, algorithm.sorter())
    }

    // Runs `sorter` in place of the one registered for `algorithm`.
    pub(crate) fn start_with(
        &self,
        algorithm: Algorithm,
        sorter: &'static dyn StepSorter,
    ) -> Result<RunHandle> {
        let runtime = Handle::try_current().map_err(|_| VizError::NoRuntime)?;
        let shared = &self.shared;

        let mut inner = shared.inner.lock();
        if inner.state == RunState::Running {
            tracing::warn!(%algorithm, "start rejected, a run is already active");
            return Err(VizError::RunActive);
        }

        if inner.state == RunState::Completed {
            shared.stopwatch.reset(shared.observer.as_ref());
        }
        let token = CancellationToken::new();
        inner.token = Some(token.clone());
        inner.state = RunState::Running;
        inner.algorithm = algorithm;
        inner.settled = None;
        inner.clear_markers();
        shared.observer.on_snapshot(&inner.snapshot());

        let values = inner.array.clone();
        tracing::debug!(%algorithm, size = values.len(), "run started");

        shared.stopwatch.start(Arc::clone(&shared.observer));
        let handle = runtime.spawn(drive(Arc::clone(shared), algorithm, sorter, token, values));
        Ok(RunHandle(handle))
    }

    /// Cancels the active run. Returns `false` if nothing was running.
    ///
    /// The visualizer is idle when this returns; the run itself unwinds at its next step without
    /// publishing anything further. If the sorter was holding values outside the array, the
    /// array is put back to the last permutation of the input it published.
    pub fn cancel(&self) -> bool {
        let shared = &self.shared;
        let mut inner = shared.inner.lock();
        if inner.state != RunState::Running {
            return false;
        }

        if let Some(token) = inner.token.take() {
            token.cancel();
        }
        inner.state = RunState::Idle;
        inner.settle();
        inner.clear_markers();
        let elapsed = shared.stopwatch.stop();
        shared.observer.on_snapshot(&inner.snapshot());

        tracing::debug!(algorithm = %inner.algorithm, elapsed_ms = elapsed, "run cancelled");
        true
    }

    /// Pauses an active run, or starts the selected algorithm otherwise.
    ///
    /// Returns the handle of the run it started, if any.
    pub fn toggle(&self) -> Result<Option<RunHandle>> {
        if self.cancel() {
            Ok(None)
        } else {
            self.start(self.algorithm()).map(Some)
        }
    }

    /// Replaces the array with `size` random values.
    pub fn new_array(&self, size: usize) -> Result<()> {
        let shared = &self.shared;
        let mut inner = shared.inner.lock();
        if inner.state == RunState::Running {
            tracing::warn!(size, "new array rejected, a run is already active");
            return Err(VizError::RunActive);
        }
        shared.config.check_size(size)?;

        inner.generate(size, shared.config.max_value);
        shared.reset_idle(&mut inner);
        Ok(())
    }

    /// Replaces the array with random values, keeping the last generated size.
    pub fn regenerate(&self) -> Result<()> {
        let size = self.shared.inner.lock().size;
        self.new_array(size)
    }

    /// Replaces the array with the given values. Any length up to the configured maximum is
    /// accepted, including empty.
    pub fn load_array(&self, values: Vec<u32>) -> Result<()> {
        let shared = &self.shared;
        let mut inner = shared.inner.lock();
        if inner.state == RunState::Running {
            tracing::warn!(len = values.len(), "load rejected, a run is already active");
            return Err(VizError::RunActive);
        }
        let max = shared.config.max_size;
        if values.len() > max {
            return Err(VizError::ArrayTooLong {
                len: values.len(),
                max,
            });
        }

        inner.array = values;
        shared.reset_idle(&mut inner);
        Ok(())
    }

    /// Switches the selected algorithm and generates a fresh array for it.
    pub fn select_algorithm(&self, algorithm: Algorithm) -> Result<()> {
        let shared = &self.shared;
        let mut inner = shared.inner.lock();
        if inner.state == RunState::Running {
            tracing::warn!(%algorithm, "algorithm switch rejected, a run is already active");
            return Err(VizError::RunActive);
        }

        inner.algorithm = algorithm;
        let size = inner.size;
        inner.generate(size, shared.config.max_value);
        shared.reset_idle(&mut inner);
        Ok(())
    }

    /// Changes the speed. Takes effect on the next step of an active run.
    pub fn set_speed(&self, speed: u8) -> Result<()> {
        let speed = Speed::new(speed).inspect_err(|_| {
            tracing::warn!(speed, "speed rejected");
        })?;
        self.shared.speed.set(speed);
        Ok(())
    }

    #[must_use]
    pub fn state(&self) -> RunState {
        self.shared.inner.lock().state
    }

    #[must_use]
    pub fn is_running(&self) -> bool {
        self.state() == RunState::Running
    }

    /// The array as last published.
    #[must_use]
    pub fn array(&self) -> Vec<u32> {
        self.shared.inner.lock().array.clone()
    }

    /// The `(comparing, swapping)` markers of the last published step.
    #[must_use]
    pub fn markers(&self) -> (Marker, Marker) {
        let inner = self.shared.inner.lock();
        (inner.comparing, inner.swapping)
    }

    /// The current state as a renderer would see it.
    #[must_use]
    pub fn snapshot(&self) -> Snapshot {
        self.shared.inner.lock().snapshot()
    }

    /// Completed runs, most recent first.
    #[must_use]
    pub fn history(&self) -> Vec<HistoryRecord> {
        self.shared.inner.lock().history.to_vec()
    }

    #[must_use]
    pub fn elapsed_ms(&self) -> u64 {
        self.shared.stopwatch.elapsed_ms()
    }

    #[must_use]
    pub fn speed(&self) -> Speed {
        self.shared.speed.get()
    }

    #[must_use]
    pub fn algorithm(&self) -> Algorithm {
        self.shared.inner.lock().algorithm
    }

    /// Length of the current array.
    #[must_use]
    pub fn size(&self) -> usize {
        self.shared.inner.lock().array.len()
    }

    #[must_use]
    pub fn config(&self) -> &VisualizerConfig {
        &self.shared.config
    }
}

impl Drop for Visualizer {
    fn drop(&mut self) {
        self.cancel();
    }
}

impl fmt::Debug for Visualizer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let inner = self.shared.inner.lock();
        f.debug_struct("Visualizer")
            .field("state", &inner.state)
            .field("algorithm", &inner.algorithm)
            .field("size", &inner.array.len())
            .field("speed", &self.shared.speed.get())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use futures::future::BoxFuture;

    use super::*;
    use crate::observer::{ChannelObserver, NoOpObserver, VizEvent};

    type StepResult = std::result::Result<(), RunError>;

    async fn swap_then_panic(s: &mut Stepper) -> StepResult {
        s.exchange(0, 1).await?;
        panic!("bad pivot")
    }

    async fn step_past_the_end(s: &mut Stepper) -> StepResult {
        s.compare(0, 1).await?;
        let end = s.len();
        s.exchange(0, end).await
    }

    struct Panicking;

    impl StepSorter for Panicking {
        fn sort<'a>(&'a self, stepper: &'a mut Stepper) -> BoxFuture<'a, StepResult> {
            swap_then_panic(stepper).boxed()
        }
    }

    struct OutOfRange;

    impl StepSorter for OutOfRange {
        fn sort<'a>(&'a self, stepper: &'a mut Stepper) -> BoxFuture<'a, StepResult> {
            step_past_the_end(stepper).boxed()
        }
    }

    fn visualizer() -> Visualizer {
        let config = VisualizerConfig {
            seed: Some(7),
            ..Default::default()
        };
        Visualizer::new(config, Arc::new(NoOpObserver)).unwrap()
    }

    #[test]
    fn starts_idle_with_initial_array() {
        let viz = visualizer();
        assert_eq!(viz.state(), RunState::Idle);
        assert_eq!(viz.size(), 20);
        assert!(viz.array().iter().all(|v| (1..=100).contains(v)));
        assert_eq!(viz.markers(), (None, None));
    }

    #[test]
    fn seeded_arrays_are_reproducible() {
        assert_eq!(visualizer().array(), visualizer().array());
    }

    #[test]
    fn start_needs_a_runtime() {
        let viz = visualizer();
        assert!(matches!(viz.start(Algorithm::Bubble), Err(VizError::NoRuntime)));
        assert_eq!(viz.state(), RunState::Idle);
    }

    #[test]
    fn rejects_invalid_requests() {
        let viz = visualizer();
        assert!(matches!(
            viz.new_array(4),
            Err(VizError::InvalidSize { size: 4, .. })
        ));
        assert!(matches!(
            viz.load_array(vec![1; 201]),
            Err(VizError::ArrayTooLong { len: 201, max: 200 })
        ));
        assert_eq!(viz.set_speed(0), Err(VizError::InvalidSpeed(0)));
        assert_eq!(viz.size(), 20);
        assert_eq!(viz.speed().get(), 50);
    }

    #[test]
    fn regenerate_keeps_generated_size() {
        let viz = visualizer();
        viz.new_array(8).unwrap();
        viz.load_array(vec![1, 2]).unwrap();
        viz.regenerate().unwrap();
        assert_eq!(viz.size(), 8);
    }

    #[test]
    fn select_algorithm_generates_a_new_array() {
        let viz = visualizer();
        viz.load_array(vec![9, 9, 9, 9, 9, 9]).unwrap();
        viz.select_algorithm(Algorithm::Heap).unwrap();
        assert_eq!(viz.algorithm(), Algorithm::Heap);
        assert_eq!(viz.size(), 20);
    }

    #[test]
    fn cancel_while_idle_is_a_noop() {
        let viz = visualizer();
        assert!(!viz.cancel());
        assert_eq!(viz.state(), RunState::Idle);
    }

    #[test]
    fn panic_messages() {
        assert_eq!(panic_message(&"boom"), "sorter panicked: boom");
        assert_eq!(
            panic_message(&String::from("bad index")),
            "sorter panicked: bad index"
        );
        assert_eq!(panic_message(&42_u8), "sorter panicked");
    }

    // Runs `sorter` over [4, 3, 2, 1] until it faults, then checks nothing of the run survives.
    async fn contained_fault(sorter: &'static dyn StepSorter) -> (Visualizer, String) {
        let (observer, mut rx) = ChannelObserver::new();
        let config = VisualizerConfig {
            seed: Some(7),
            ..Default::default()
        };
        let viz = Visualizer::new(config, Arc::new(observer)).unwrap();
        viz.load_array(vec![4, 3, 2, 1]).unwrap();

        let outcome = viz.start_with(Algorithm::Quick, sorter).unwrap().join().await;
        let RunOutcome::Faulted(message) = outcome else {
            panic!("run did not fault: {outcome:?}");
        };

        assert_eq!(viz.state(), RunState::Idle);
        assert_eq!(viz.markers(), (None, None));
        assert!(viz.history().is_empty());

        let elapsed = viz.elapsed_ms();
        assert!(elapsed > 0);
        tokio::time::sleep(Duration::from_secs(1)).await;
        assert_eq!(viz.elapsed_ms(), elapsed);

        let mut events = Vec::new();
        while let Ok(event) = rx.try_recv() {
            events.push(event);
        }
        assert!(events.contains(&VizEvent::Diagnostic(message.clone())));
        assert!(!events.iter().any(|e| matches!(e, VizEvent::History(_))));

        (viz, message)
    }

    #[tokio::test(start_paused = true)]
    async fn sorter_panic_is_contained() {
        let (viz, message) = contained_fault(&Panicking).await;
        assert_eq!(message, "sorter panicked: bad pivot");
        assert_eq!(viz.array(), [3, 4, 2, 1]);

        // the visualizer is usable again
        let outcome = viz.start(Algorithm::Bubble).unwrap().join().await;
        assert!(matches!(outcome, RunOutcome::Completed { .. }));
        assert_eq!(viz.array(), [1, 2, 3, 4]);
        assert_eq!(viz.history().len(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn out_of_range_step_is_contained() {
        let (viz, message) = contained_fault(&OutOfRange).await;
        assert_eq!(message, "index 4 is out of range for an array of length 4");
        assert_eq!(viz.array(), [4, 3, 2, 1]);
    }
}
