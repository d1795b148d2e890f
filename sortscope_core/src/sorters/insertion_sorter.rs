use std::cmp::Ordering;

use futures::future::{BoxFuture, FutureExt};

use super::StepSorter;
use crate::error::RunError;
use crate::stepper::Stepper;

/// An implementation of [Insertion Sort](https://en.wikipedia.org/wiki/Insertion_sort)
///
/// # Explanation
///
/// Insertion sort is a simple sorting algorithm that builds the final sorted array one item at a
/// time.
///
/// At each array position the key is held aside and compared against the sorted prefix from right
/// to left. Every larger element is shifted one position to the right, then the key is written
/// into the gap that is left.
///
/// The comparisons highlight the key's original position and the element it is being compared
/// with, even though the key itself may already have been overwritten by a shift. A run stopped
/// in the middle of a shift leaves the key in the gap.
///
/// # Usage
///```
/// use sortscope_core::sorters::{InsertionSorter, StepSorter};
/// use sortscope_core::Stepper;
///
/// let mut stepper = Stepper::unpaced(vec![1, 5, 4, 2, 3]);
/// futures::executor::block_on(InsertionSorter.sort(&mut stepper)).unwrap();
/// assert_eq!(stepper.finish().0, vec![1, 2, 3, 4, 5]);
///```
#[derive(Default, Debug, Clone, Copy)]
pub struct InsertionSorter;

async fn insertion_sort(s: &mut Stepper) -> Result<(), RunError> {
    let n = s.len();

    for unsorted in 1..n {
        s.checkpoint()?;

        let key = s.value(unsorted)?;
        // `hole` is where the key would go if the scan stopped now.
        let mut hole = unsorted;
        while hole > 0 {
            let left = s.value(hole - 1)?;
            if s.compare_values((unsorted, hole - 1), left, key).await? != Ordering::Greater {
                break;
            }
            // The key is held aside and belongs in the new gap if the run stops here.
            s.write_holding(hole, left, hole - 1, hole - 1, [key]).await?;
            hole -= 1;
        }

        if hole != unsorted {
            s.write(hole, key, unsorted).await?;
        }
    }

    Ok(())
}

impl StepSorter for InsertionSorter {
    fn sort<'a>(&'a self, stepper: &'a mut Stepper) -> BoxFuture<'a, Result<(), RunError>> {
        insertion_sort(stepper).boxed()
    }
}
