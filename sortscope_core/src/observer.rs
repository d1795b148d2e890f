//! The consumer side of the visualizer: whatever draws the bars implements [`RunObserver`].

use serde::Serialize;
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};

use crate::history::HistoryRecord;

/// An index pair highlighted by the most recent primitive.
pub type Marker = Option<(usize, usize)>;

/// The state of the array as a renderer should see it after one primitive.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct Snapshot {
    pub values: Vec<u32>,
    pub comparing: Marker,
    pub swapping: Marker,
    pub completed: bool,
}

impl Snapshot {
    /// A snapshot with no highlighted indices.
    #[must_use]
    pub fn plain(values: Vec<u32>, completed: bool) -> Self {
        Self {
            values,
            comparing: None,
            swapping: None,
            completed,
        }
    }
}

/// Receives everything the visualizer publishes.
///
/// Callbacks are invoked while the visualizer holds its internal lock so that events arrive in
/// the order they happened. Implementations must return quickly and must not call back into the
/// [`Visualizer`](crate::Visualizer).
pub trait RunObserver: Send + Sync {
    /// Called after every primitive and on every lifecycle change.
    fn on_snapshot(&self, snapshot: &Snapshot);

    /// Called every stopwatch tick while running, and when the stopwatch is reset.
    fn on_elapsed_tick(&self, _elapsed_ms: u64) {}

    /// Called with the full log, most recent first, whenever a record is added.
    fn on_history_changed(&self, _records: &[HistoryRecord]) {}

    /// Called when a run is aborted by an internal fault.
    fn on_diagnostic(&self, _message: &str) {}
}

/// An observer that ignores every event.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoOpObserver;

impl RunObserver for NoOpObserver {
    fn on_snapshot(&self, _snapshot: &Snapshot) {}
}

/// One event as forwarded by [`ChannelObserver`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VizEvent {
    Snapshot(Snapshot),
    Tick(u64),
    History(Vec<HistoryRecord>),
    Diagnostic(String),
}

/// Forwards every event into an unbounded tokio channel.
///
/// Events are dropped silently once the receiver is gone.
#[derive(Debug, Clone)]
pub struct ChannelObserver {
    tx: UnboundedSender<VizEvent>,
}

impl ChannelObserver {
    #[must_use]
    pub fn new() -> (Self, UnboundedReceiver<VizEvent>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, rx)
    }
}

impl RunObserver for ChannelObserver {
    fn on_snapshot(&self, snapshot: &Snapshot) {
        let _ = self.tx.send(VizEvent::Snapshot(snapshot.clone()));
    }

    fn on_elapsed_tick(&self, elapsed_ms: u64) {
        let _ = self.tx.send(VizEvent::Tick(elapsed_ms));
    }

    fn on_history_changed(&self, records: &[HistoryRecord]) {
        let _ = self.tx.send(VizEvent::History(records.to_vec()));
    }

    fn on_diagnostic(&self, message: &str) {
        let _ = self.tx.send(VizEvent::Diagnostic(message.to_string()));
    }
}
