//! Bounded log of completed runs.

use std::collections::VecDeque;

use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};

use crate::algorithm::Algorithm;
use crate::stopwatch::format_elapsed;

/// One naturally completed run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryRecord {
    pub algorithm: Algorithm,
    pub elapsed_ms: u64,
    pub array_size: usize,
    pub completed_at: DateTime<Local>,
}

impl HistoryRecord {
    #[must_use]
    pub fn new(algorithm: Algorithm, elapsed_ms: u64, array_size: usize) -> Self {
        Self {
            algorithm,
            elapsed_ms,
            array_size,
            completed_at: Local::now(),
        }
    }

    /// Elapsed time as `seconds.millis` (e.g. `1.534s`).
    #[must_use]
    pub fn elapsed(&self) -> String {
        format_elapsed(self.elapsed_ms)
    }

    /// Local wall-clock time of completion, `HH:MM:SS`.
    #[must_use]
    pub fn timestamp(&self) -> String {
        format_timestamp(self)
    }
}

/// Formats the completion time of `record` as `HH:MM:SS` local time.
#[must_use]
pub fn format_timestamp(record: &HistoryRecord) -> String {
    record.completed_at.format("%H:%M:%S").to_string()
}

/// Completed runs, most recent first, never holding more than `capacity` records.
#[derive(Debug, Clone)]
pub struct HistoryLog {
    records: VecDeque<HistoryRecord>,
    capacity: usize,
}

impl HistoryLog {
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        Self {
            records: VecDeque::with_capacity(capacity + 1),
            capacity,
        }
    }

    /// Prepends `record`, silently dropping the oldest one when over capacity.
    pub fn push(&mut self, record: HistoryRecord) {
        self.records.push_front(record);
        self.records.truncate(self.capacity);
    }

    pub fn iter(&self) -> impl Iterator<Item = &HistoryRecord> {
        self.records.iter()
    }

    #[must_use]
    pub fn to_vec(&self) -> Vec<HistoryRecord> {
        self.iter().cloned().collect()
    }
}
