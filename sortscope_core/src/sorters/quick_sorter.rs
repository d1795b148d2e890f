use std::cmp::Ordering;

use futures::future::{BoxFuture, FutureExt};

use super::StepSorter;
use crate::error::RunError;
use crate::stepper::Stepper;

/// An implementation of [Quick Sort](https://en.wikipedia.org/wiki/Quicksort)
///
/// # Usage
///```
/// use sortscope_core::sorters::{QuickSorter, StepSorter};
/// use sortscope_core::Stepper;
///
/// let mut stepper = Stepper::unpaced(vec![1, 5, 4, 2, 3]);
/// futures::executor::block_on(QuickSorter.sort(&mut stepper)).unwrap();
/// assert_eq!(stepper.finish().0, vec![1, 2, 3, 4, 5]);
///```
///
/// # Explanation
///
/// Quicksort is an in-place sorting algorithm. Developed
/// by British computer scientist Tony Hoare in 1959 and published
/// in 1961 it is still a commonly used algorithm for
/// sorting.
///
/// # Algorithm
///
/// This version uses the Lomuto partition scheme: the last element of the range is the pivot,
/// every element strictly smaller than the pivot is exchanged towards the front, and finally the
/// pivot is exchanged into the slot right after them. Both sides of the pivot are then sorted
/// recursively.
///
/// Already sorted input is the worst case, taking a quadratic number of comparisons.
#[derive(Default, Debug, Clone, Copy)]
pub struct QuickSorter;

// Sorts `lo..hi`.
fn quicksort(s: &mut Stepper, lo: usize, hi: usize) -> BoxFuture<'_, Result<(), RunError>> {
    async move {
        if hi - lo < 2 {
            return Ok(());
        }
        s.checkpoint()?;

        let pivot = partition(s, lo, hi - 1).await?;
        quicksort(s, lo, pivot).await?;
        quicksort(s, pivot + 1, hi).await
    }
    .boxed()
}

// Partitions `lo..=last` around the value at `last` and returns the pivot's final index.
async fn partition(s: &mut Stepper, lo: usize, last: usize) -> Result<usize, RunError> {
    // Next slot for an element smaller than the pivot.
    let mut store = lo;

    for j in lo..last {
        if s.compare(j, last).await? == Ordering::Less {
            s.exchange(store, j).await?;
            store += 1;
        }
    }

    s.exchange(store, last).await?;
    Ok(store)
}

impl StepSorter for QuickSorter {
    fn sort<'a>(&'a self, stepper: &'a mut Stepper) -> BoxFuture<'a, Result<(), RunError>> {
        let n = stepper.len();
        quicksort(stepper, 0, n)
    }
}
