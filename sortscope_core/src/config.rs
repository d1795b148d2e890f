//! Configuration for a [`Visualizer`](crate::Visualizer) and the speed setting that paces every
//! step.

use std::sync::atomic::{AtomicU8, Ordering};
use std::sync::Arc;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{Result, VizError};

pub const MIN_ARRAY_SIZE: usize = 5;
pub const MAX_ARRAY_SIZE: usize = 200;
pub const DEFAULT_ARRAY_SIZE: usize = 20;
pub const DEFAULT_SPEED: u8 = 50;
pub const HISTORY_CAPACITY: usize = 10;
pub const TICK_MILLIS: u64 = 10;
pub const MAX_VALUE: u32 = 100;

/// How fast the animation steps, from `1` (slowest) to `100` (fastest).
///
/// # Example
/// ```
/// use std::time::Duration;
/// use sortscope_core::Speed;
///
/// assert_eq!(Speed::new(1).unwrap().delay(), Duration::from_millis(198));
/// assert_eq!(Speed::new(100).unwrap().delay(), Duration::from_millis(2));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct Speed(u8);

impl Speed {
    pub const MIN: u8 = 1;
    pub const MAX: u8 = 100;

    pub fn new(speed: u8) -> Result<Self> {
        if (Self::MIN..=Self::MAX).contains(&speed) {
            Ok(Self(speed))
        } else {
            Err(VizError::InvalidSpeed(speed))
        }
    }

    #[must_use]
    pub fn get(self) -> u8 {
        self.0
    }

    /// The pause between two primitives: `floor(200 - speed * 1.98)` milliseconds.
    #[must_use]
    pub fn delay(self) -> Duration {
        // 200 - 1.98 * s == (20000 - 198 * s) / 100, kept in integers so the floor is exact.
        let millis = (20_000 - 198 * u64::from(self.0)) / 100;
        Duration::from_millis(millis)
    }
}

impl Default for Speed {
    fn default() -> Self {
        Self(DEFAULT_SPEED)
    }
}

impl TryFrom<u8> for Speed {
    type Error = VizError;

    fn try_from(value: u8) -> Result<Self> {
        Self::new(value)
    }
}

impl From<Speed> for u8 {
    fn from(speed: Speed) -> Self {
        speed.0
    }
}

/// A speed setting shared between the controller and a running sorter.
///
/// The sorter reads it before every delay, so changing the speed mid-run takes effect on the next
/// step.
#[derive(Debug, Clone)]
pub struct SpeedControl(Arc<AtomicU8>);

impl SpeedControl {
    #[must_use]
    pub fn new(speed: Speed) -> Self {
        Self(Arc::new(AtomicU8::new(speed.get())))
    }

    #[must_use]
    pub fn get(&self) -> Speed {
        Speed(self.0.load(Ordering::Relaxed))
    }

    pub fn set(&self, speed: Speed) {
        self.0.store(speed.get(), Ordering::Relaxed);
    }

    #[must_use]
    pub fn delay(&self) -> Duration {
        self.get().delay()
    }
}

/// Tunables of a [`Visualizer`](crate::Visualizer).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct VisualizerConfig {
    pub min_size: usize,
    pub max_size: usize,
    /// Size of the array generated when the visualizer is created.
    pub initial_size: usize,
    pub speed: Speed,
    pub history_capacity: usize,
    /// Stopwatch resolution in milliseconds.
    pub tick_millis: u64,
    /// Generated values are drawn from `1..=max_value`.
    pub max_value: u32,
    /// Seed for reproducible arrays. `None` seeds from the OS.
    pub seed: Option<u64>,
}

impl Default for VisualizerConfig {
    fn default() -> Self {
        Self {
            min_size: MIN_ARRAY_SIZE,
            max_size: MAX_ARRAY_SIZE,
            initial_size: DEFAULT_ARRAY_SIZE,
            speed: Speed::default(),
            history_capacity: HISTORY_CAPACITY,
            tick_millis: TICK_MILLIS,
            max_value: MAX_VALUE,
            seed: None,
        }
    }
}

impl VisualizerConfig {
    pub fn validate(&self) -> Result<()> {
        if self.min_size > self.max_size {
            return Err(VizError::InvalidConfig(format!(
                "min_size {} is larger than max_size {}",
                self.min_size, self.max_size
            )));
        }
        self.check_size(self.initial_size)?;
        if self.history_capacity == 0 {
            return Err(VizError::InvalidConfig(
                "history_capacity must be at least 1".into(),
            ));
        }
        if self.tick_millis == 0 {
            return Err(VizError::InvalidConfig("tick_millis must be at least 1".into()));
        }
        if self.max_value == 0 || self.max_value == u32::MAX {
            return Err(VizError::InvalidConfig(format!(
                "max_value must be within 1..{}",
                u32::MAX
            )));
        }
        Ok(())
    }

    /// Checks a requested array size against the configured bounds.
    pub fn check_size(&self, size: usize) -> Result<()> {
        if (self.min_size..=self.max_size).contains(&size) {
            Ok(())
        } else {
            Err(VizError::InvalidSize {
                size,
                min: self.min_size,
                max: self.max_size,
            })
        }
    }

    #[must_use]
    pub fn tick(&self) -> Duration {
        Duration::from_millis(self.tick_millis)
    }
}
