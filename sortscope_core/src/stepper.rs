//! The primitives every sorter is written against.
//!
//! A [`Stepper`] owns the working copy of the array for one run. Sorters never touch the values
//! directly; they ask the stepper to compare, exchange or write, and the stepper:
//!
//! 1. checks the run's [`CancellationToken`],
//! 2. applies the change and publishes a [`Snapshot`] with the indices involved,
//! 3. waits one pacing delay,
//! 4. checks the token again before handing control back.

use std::cmp::Ordering;
use std::sync::Arc;

use crate::config::SpeedControl;
use crate::error::RunError;
use crate::observer::{Marker, Snapshot};
use crate::token::CancellationToken;

/// Padding value used by sorters that need a power-of-two length.
///
/// It compares greater than or equal to any real value, so padding always sinks to the end.
pub const SENTINEL: u32 = u32::MAX;

/// Where a stepper sends its snapshots.
///
/// Returning an error stops the run at the current primitive.
pub trait StepSink: Send + Sync {
    /// `settled` is set while the sorter keeps values outside the array. It is the published
    /// array with those values put back, a permutation of the input that a stopped run can be
    /// resumed from.
    fn publish(&self, snapshot: Snapshot, settled: Option<Vec<u32>>) -> Result<(), RunError>;
}

/// How long a stepper waits after each primitive.
#[derive(Debug, Clone)]
pub enum Pacing {
    /// Sleep for the delay of the shared speed setting.
    Paced(SpeedControl),
    /// Never wait. Used for benchmarks and tests.
    Unpaced,
}

/// Number of primitives a run performed.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct StepCounts {
    pub comparisons: u64,
    pub exchanges: u64,
    pub writes: u64,
}

impl StepCounts {
    #[must_use]
    pub fn total(&self) -> u64 {
        self.comparisons + self.exchanges + self.writes
    }
}

/// The working array of one run together with everything needed to pace and observe it.
pub struct Stepper {
    values: Vec<u32>,
    // Number of SENTINEL entries appended by `pad_to`.
    padding: usize,
    // Values the sorter keeps outside the array and the index they belong at.
    held: Option<(usize, Vec<u32>)>,
    comparing: Marker,
    swapping: Marker,
    token: CancellationToken,
    pacing: Pacing,
    sink: Option<Arc<dyn StepSink>>,
    counts: StepCounts,
}

impl Stepper {
    #[must_use]
    pub fn new(
        values: Vec<u32>,
        token: CancellationToken,
        pacing: Pacing,
        sink: Arc<dyn StepSink>,
    ) -> Self {
        Self {
            values,
            padding: 0,
            held: None,
            comparing: None,
            swapping: None,
            token,
            pacing,
            sink: Some(sink),
            counts: StepCounts::default(),
        }
    }

    /// A stepper that neither waits nor publishes.
    #[must_use]
    pub fn unpaced(values: Vec<u32>) -> Self {
        Self {
            values,
            padding: 0,
            held: None,
            comparing: None,
            swapping: None,
            token: CancellationToken::new(),
            pacing: Pacing::Unpaced,
            sink: None,
            counts: StepCounts::default(),
        }
    }

    /// Length of the working array, padding included.
    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    #[must_use]
    pub fn counts(&self) -> StepCounts {
        self.counts
    }

    #[must_use]
    pub fn token(&self) -> &CancellationToken {
        &self.token
    }

    /// Reads a value without emitting a step.
    pub fn value(&self, i: usize) -> Result<u32, RunError> {
        self.values
            .get(i)
            .copied()
            .ok_or_else(|| self.out_of_range(i))
    }

    /// Copies a range of values without emitting a step. Used for auxiliary buffers.
    pub fn copy_range(&self, range: std::ops::Range<usize>) -> Result<Vec<u32>, RunError> {
        let end = range.end;
        self.values
            .get(range)
            .map(<[u32]>::to_vec)
            .ok_or_else(|| self.out_of_range(end.saturating_sub(1)))
    }

    /// Fails with [`RunError::Cancelled`] once the run has been cancelled.
    pub fn checkpoint(&self) -> Result<(), RunError> {
        self.token.checkpoint()
    }

    /// Compares the values at `i` and `j`, highlighting both.
    pub async fn compare(&mut self, i: usize, j: usize) -> Result<Ordering, RunError> {
        let (a, b) = (self.value(i)?, self.value(j)?);
        self.compare_values((i, j), a, b).await
    }

    /// Compares two values that are not necessarily stored at the highlighted indices.
    ///
    /// Sorters that compare against a held key or an auxiliary buffer use this so the renderer
    /// still sees which positions are involved.
    pub async fn compare_values(
        &mut self,
        at: (usize, usize),
        a: u32,
        b: u32,
    ) -> Result<Ordering, RunError> {
        self.checkpoint()?;
        self.check_index(at.0)?;
        self.check_index(at.1)?;

        self.counts.comparisons += 1;
        self.comparing = Some(at);
        self.swapping = None;
        tracing::trace!(i = at.0, j = at.1, "compare");

        self.emit().await?;
        Ok(a.cmp(&b))
    }

    /// Swaps the values at `i` and `j`.
    pub async fn exchange(&mut self, i: usize, j: usize) -> Result<(), RunError> {
        self.checkpoint()?;
        self.check_index(i)?;
        self.check_index(j)?;

        self.values.swap(i, j);
        self.counts.exchanges += 1;
        self.comparing = None;
        self.swapping = Some((i, j));
        tracing::trace!(i, j, "exchange");

        self.emit().await
    }

    /// Stores `value` at `i`. `from` is the position the value is highlighted as coming from.
    pub async fn write(&mut self, i: usize, value: u32, from: usize) -> Result<(), RunError> {
        self.write_holding(i, value, from, i, std::iter::empty()).await
    }

    /// Like [`write`](Self::write), for sorters that keep values outside the array.
    ///
    /// `held` are the values not written back yet. Once this write is applied they are
    /// considered to occupy the positions from `at` onwards, which is what a stopped run leaves
    /// behind. A plain write releases everything held.
    pub async fn write_holding(
        &mut self,
        i: usize,
        value: u32,
        from: usize,
        at: usize,
        held: impl IntoIterator<Item = u32>,
    ) -> Result<(), RunError> {
        self.checkpoint()?;
        self.check_index(i)?;
        self.check_index(from)?;

        self.values[i] = value;
        let held = held.into_iter().collect::<Vec<_>>();
        self.held = (!held.is_empty()).then_some((at, held));
        self.counts.writes += 1;
        self.comparing = None;
        self.swapping = Some((i, from));
        tracing::trace!(i, from, value, "write");

        self.emit().await
    }

    /// Appends [`SENTINEL`] values until the array is `len` long.
    ///
    /// Padding never shows up in a published snapshot: snapshots hide as many sentinel entries as
    /// were added, so renderers always see the original length.
    pub fn pad_to(&mut self, len: usize) {
        while self.values.len() < len {
            self.values.push(SENTINEL);
            self.padding += 1;
        }
    }

    /// Removes the padding added by [`pad_to`](Self::pad_to).
    ///
    /// The last sentinel valued entries are dropped, which on a sorted array is a plain truncate
    /// and on any other array still leaves a permutation of the real values.
    pub fn strip_padding(&mut self) {
        let mut i = self.values.len();
        while self.padding > 0 && i > 0 {
            i -= 1;
            if self.values[i] == SENTINEL {
                self.values.remove(i);
                self.padding -= 1;
            }
        }
    }

    /// Consumes the stepper, returning the working array and the primitive tally.
    ///
    /// Values still held by a stopped sorter are put back first.
    #[must_use]
    pub fn finish(mut self) -> (Vec<u32>, StepCounts) {
        if let Some((at, held)) = self.held.take() {
            if let Some(slots) = self.values.get_mut(at..at + held.len()) {
                slots.copy_from_slice(&held);
            }
        }
        self.strip_padding();
        (self.values, self.counts)
    }

    fn check_index(&self, i: usize) -> Result<(), RunError> {
        if i < self.values.len() {
            Ok(())
        } else {
            Err(self.out_of_range(i))
        }
    }

    fn out_of_range(&self, i: usize) -> RunError {
        RunError::Fault(format!(
            "index {i} is out of range for an array of length {}",
            self.values.len()
        ))
    }

    // Publishes the current state, waits one delay and clears the markers again.
    async fn emit(&mut self) -> Result<(), RunError> {
        let shown = match &self.sink {
            Some(sink) => {
                let (snapshot, visible) = self.view();
                if visible {
                    sink.publish(snapshot, self.settled())?;
                }
                visible
            }
            None => true,
        };

        if shown {
            if let Pacing::Paced(speed) = &self.pacing {
                tokio::time::sleep(speed.delay()).await;
            }
        }

        self.comparing = None;
        self.swapping = None;
        self.checkpoint()
    }

    /// The array as a renderer should see it, with any padding hidden.
    #[must_use]
    pub fn snapshot(&self) -> Snapshot {
        self.view().0
    }

    // Also reports whether the current primitive touches at least one visible position.
    fn view(&self) -> (Snapshot, bool) {
        if self.padding == 0 {
            let snapshot = Snapshot {
                values: self.values.clone(),
                comparing: self.comparing,
                swapping: self.swapping,
                completed: false,
            };
            return (snapshot, true);
        }

        let hidden = hidden_padding(&self.values, self.padding);
        let mut position = Vec::with_capacity(self.values.len());
        let mut values = Vec::with_capacity(self.values.len() - self.padding);
        for (i, &value) in self.values.iter().enumerate() {
            if hidden[i] {
                position.push(None);
            } else {
                position.push(Some(values.len()));
                values.push(value);
            }
        }

        let touched = [self.comparing, self.swapping]
            .into_iter()
            .flatten()
            .any(|(i, j)| !hidden[i] || !hidden[j]);

        // A pair is only shown when both ends are real positions.
        let remap = |marker: Marker| -> Marker {
            let (i, j) = marker?;
            Some((position[i]?, position[j]?))
        };

        let snapshot = Snapshot {
            values,
            comparing: remap(self.comparing),
            swapping: remap(self.swapping),
            completed: false,
        };
        (snapshot, touched)
    }

    // The array with held values put back and padding hidden, if anything is held.
    fn settled(&self) -> Option<Vec<u32>> {
        let (at, held) = self.held.as_ref()?;
        let mut values = self.values.clone();
        values.get_mut(*at..at + held.len())?.copy_from_slice(held);
        if self.padding == 0 {
            return Some(values);
        }

        let hidden = hidden_padding(&values, self.padding);
        let visible = values
            .into_iter()
            .zip(hidden)
            .filter_map(|(value, hidden)| (!hidden).then_some(value))
            .collect();
        Some(visible)
    }
}

// Marks the last `padding` sentinel valued entries. Real values equal to SENTINEL are
// interchangeable with padding, so what is left is always a permutation of the input.
fn hidden_padding(values: &[u32], padding: usize) -> Vec<bool> {
    let mut hidden = vec![false; values.len()];
    let mut remaining = padding;
    for (i, &value) in values.iter().enumerate().rev() {
        if remaining == 0 {
            break;
        }
        if value == SENTINEL {
            hidden[i] = true;
            remaining -= 1;
        }
    }
    hidden
}
