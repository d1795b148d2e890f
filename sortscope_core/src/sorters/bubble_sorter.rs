use std::cmp::Ordering;

use futures::future::{BoxFuture, FutureExt};

use super::StepSorter;
use crate::error::RunError;
use crate::stepper::Stepper;

/// An implementation of [Bubble Sort](https://en.wikipedia.org/wiki/Bubble_sort)
///
/// # Usage
///```
/// use sortscope_core::sorters::{BubbleSorter, StepSorter};
/// use sortscope_core::Stepper;
///
/// let mut stepper = Stepper::unpaced(vec![5, 3, 8, 1]);
/// futures::executor::block_on(BubbleSorter.sort(&mut stepper)).unwrap();
/// assert_eq!(stepper.finish().0, vec![1, 3, 5, 8]);
///```
/// # Explanation
///
/// Bubble sort, sometimes referred to as sinking sort,
/// is a simple sorting algorithm that repeatedly steps
/// through the list, compares adjacent elements and swaps
/// them if they are in the wrong order. After every pass the
/// largest remaining element has "bubbled" to the end, so each
/// pass looks at one element less than the one before.
#[derive(Default, Debug, Clone, Copy)]
pub struct BubbleSorter;

async fn bubble_sort(s: &mut Stepper) -> Result<(), RunError> {
    let n = s.len();

    for pass in 0..n.saturating_sub(1) {
        s.checkpoint()?;
        for j in 0..n - pass - 1 {
            if s.compare(j, j + 1).await? == Ordering::Greater {
                s.exchange(j, j + 1).await?;
            }
        }
    }

    Ok(())
}

impl StepSorter for BubbleSorter {
    fn sort<'a>(&'a self, stepper: &'a mut Stepper) -> BoxFuture<'a, Result<(), RunError>> {
        bubble_sort(stepper).boxed()
    }
}
