use std::cmp::Ordering;

use futures::future::{BoxFuture, FutureExt};

use super::StepSorter;
use crate::error::RunError;
use crate::stepper::Stepper;

/// An implementation of [Merge Sort](https://en.wikipedia.org/wiki/Merge_sort)
///
/// # Explanation
///
/// Merge sort divides the range at its midpoint, sorts both halves recursively and then merges
/// them. The merge copies both halves into auxiliary buffers and writes the smaller head back into
/// the array one element at a time, taking from the left half on ties so equal elements keep their
/// order.
///
/// A run stopped during a merge puts whatever is left in the buffers back after the last written
/// position, so the array is still a permutation of the input.
#[derive(Default, Debug, Clone, Copy)]
pub struct MergeSorter;

// Sorts `lo..hi`.
fn merge_sort(s: &mut Stepper, lo: usize, hi: usize) -> BoxFuture<'_, Result<(), RunError>> {
    async move {
        if hi - lo < 2 {
            return Ok(());
        }
        s.checkpoint()?;

        // Left half is lo..=mid, matching a midpoint of floor((lo + last) / 2).
        let mid = lo + (hi - lo - 1) / 2;
        merge_sort(s, lo, mid + 1).await?;
        merge_sort(s, mid + 1, hi).await?;
        merge(s, lo, mid + 1, hi).await
    }
    .boxed()
}

async fn merge(s: &mut Stepper, lo: usize, mid: usize, hi: usize) -> Result<(), RunError> {
    let left = s.copy_range(lo..mid)?;
    let right = s.copy_range(mid..hi)?;
    let (mut i, mut j) = (0, 0);

    for k in lo..hi {
        let take_left = if i < left.len() && j < right.len() {
            let order = s.compare_values((lo + i, mid + j), left[i], right[j]).await?;
            order != Ordering::Greater
        } else {
            i < left.len()
        };

        let (value, from) = if take_left {
            i += 1;
            (left[i - 1], lo + i - 1)
        } else {
            j += 1;
            (right[j - 1], mid + j - 1)
        };
        // What is left of both buffers fills the rest of the range if the run stops here.
        let rest = left[i..].iter().chain(&right[j..]).copied();
        s.write_holding(k, value, from, k + 1, rest).await?;
    }

    Ok(())
}

impl StepSorter for MergeSorter {
    fn sort<'a>(&'a self, stepper: &'a mut Stepper) -> BoxFuture<'a, Result<(), RunError>> {
        let n = stepper.len();
        merge_sort(stepper, 0, n)
    }
}
