//! # Introduction
//!
//! An instrumented sorting engine for visualizers. Twelve classical sorting algorithms are written
//! against a [`Stepper`] so that every comparison and exchange becomes a discrete, paced and
//! cancellable step, published to a [`RunObserver`] as a [`Snapshot`] of the array.
//!
//! The [`Visualizer`] owns the array, runs one algorithm at a time on the tokio runtime, keeps a
//! [`Stopwatch`] ticking while the run is active and records every naturally completed run in a
//! bounded [`HistoryLog`].
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use sortscope_core::{Algorithm, ChannelObserver, RunState, Visualizer, VisualizerConfig};
//!
//! # let runtime = tokio::runtime::Builder::new_current_thread().enable_all().build().unwrap();
//! # runtime.block_on(async {
//! let (observer, mut events) = ChannelObserver::new();
//! let viz = Visualizer::new(VisualizerConfig::default(), Arc::new(observer)).unwrap();
//! viz.load_array(vec![5, 3, 8, 1]).unwrap();
//! viz.set_speed(100).unwrap();
//!
//! viz.start(Algorithm::Bubble).unwrap().join().await;
//! assert_eq!(viz.state(), RunState::Completed);
//! assert_eq!(viz.array(), vec![1, 3, 5, 8]);
//! assert_eq!(viz.history().len(), 1);
//!
//! while let Ok(event) = events.try_recv() {
//!     // draw it
//!     let _ = event;
//! }
//! # });
//! ```

pub mod benchmark;
pub mod projection;
pub mod sorters;

mod algorithm;
mod config;
mod controller;
mod error;
mod history;
mod observer;
mod stepper;
mod stopwatch;
mod token;

pub use algorithm::Algorithm;
pub use config::{
    Speed, SpeedControl, VisualizerConfig, DEFAULT_ARRAY_SIZE, DEFAULT_SPEED, HISTORY_CAPACITY,
    MAX_ARRAY_SIZE, MAX_VALUE, MIN_ARRAY_SIZE, TICK_MILLIS,
};
pub use controller::{RunHandle, RunOutcome, RunState, Visualizer};
pub use error::{Result, RunError, VizError};
pub use history::{format_timestamp, HistoryLog, HistoryRecord};
pub use observer::{ChannelObserver, Marker, NoOpObserver, RunObserver, Snapshot, VizEvent};
pub use stepper::{Pacing, StepCounts, StepSink, Stepper, SENTINEL};
pub use stopwatch::{format_elapsed, Stopwatch};
pub use token::CancellationToken;
