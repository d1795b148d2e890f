//! Errors raised by the visualizer.
//!
//! [`VizError`] covers requests the [`Visualizer`](crate::Visualizer) refuses synchronously, while
//! [`RunError`] is what a step-emitting sorter unwinds with once a run stops early.

use thiserror::Error;

/// Alias for `Result<T, sortscope_core::VizError>`.
pub type Result<T> = std::result::Result<T, VizError>;

/// A request that was rejected before it could change any state.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum VizError {
    /// The requested array size is outside the configured bounds.
    #[error("array size {size} is outside the allowed range {min}..={max}")]
    InvalidSize { size: usize, min: usize, max: usize },

    /// An explicitly loaded array is longer than the configured maximum.
    #[error("array of length {len} exceeds the maximum of {max}")]
    ArrayTooLong { len: usize, max: usize },

    /// Speed must be within `1..=100`.
    #[error("speed {0} is outside the allowed range 1..=100")]
    InvalidSpeed(u8),

    /// No sorter is registered under the given name.
    #[error("unknown algorithm: {0}")]
    UnknownAlgorithm(String),

    /// The configuration failed validation.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// A run is active and the request would mutate state it owns.
    #[error("a sorting run is already active")]
    RunActive,

    /// Runs are spawned on tokio and need a runtime to be present.
    #[error("no tokio runtime is available to drive the run")]
    NoRuntime,
}

/// Why a step-emitting sorter stopped before finishing.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RunError {
    /// The run's cancellation token was triggered.
    #[error("run cancelled")]
    Cancelled,

    /// The sorter hit a state it should never reach.
    #[error("internal fault: {0}")]
    Fault(String),
}
