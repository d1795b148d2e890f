use std::cmp::Ordering;

use futures::future::{BoxFuture, FutureExt};

use super::StepSorter;
use crate::error::RunError;
use crate::stepper::Stepper;

/// An implementation of [Pancake Sort](https://en.wikipedia.org/wiki/Pancake_sorting)
///
/// # Explanation
///
/// The only way to rearrange the array is to reverse a prefix of it, like flipping part of a
/// stack of pancakes with a spatula. For every prefix length from the whole array down to two, the
/// largest value of the prefix is found, flipped to the front, and then the whole prefix is
/// flipped so that value lands at the end of it.
#[derive(Default, Debug, Clone, Copy)]
pub struct PancakeSorter;

// Reverses `0..=last`.
async fn flip(s: &mut Stepper, mut last: usize) -> Result<(), RunError> {
    let mut first = 0;
    while first < last {
        s.exchange(first, last).await?;
        first += 1;
        last -= 1;
    }
    Ok(())
}

// Index of the largest value in `0..=last`. The first occurrence wins ties.
async fn find_max(s: &mut Stepper, last: usize) -> Result<usize, RunError> {
    let mut max = 0;
    for i in 1..=last {
        if s.compare(max, i).await? == Ordering::Less {
            max = i;
        }
    }
    Ok(max)
}

async fn pancake_sort(s: &mut Stepper) -> Result<(), RunError> {
    let n = s.len();

    for last in (1..n).rev() {
        s.checkpoint()?;

        let max = find_max(s, last).await?;
        if max != last {
            if max != 0 {
                flip(s, max).await?;
            }
            flip(s, last).await?;
        }
    }

    Ok(())
}

impl StepSorter for PancakeSorter {
    fn sort<'a>(&'a self, stepper: &'a mut Stepper) -> BoxFuture<'a, Result<(), RunError>> {
        pancake_sort(stepper).boxed()
    }
}
