use std::cmp::Ordering;

use futures::future::{BoxFuture, FutureExt};

use super::StepSorter;
use crate::error::RunError;
use crate::stepper::Stepper;

/// An implementation of [Selection Sort](https://en.wikipedia.org/wiki/Selection_sort)
///
/// # Explanation
///
/// The algorithm divides the input list into two parts: a sorted sublist of items which is built
/// up from left to right at the front of the list and a sublist of the remaining unsorted items
/// that occupy the rest of the list. The algorithm proceeds by finding the smallest element in the
/// unsorted sublist and exchanging it with the leftmost unsorted element, moving the sublist
/// boundaries one element to the right.
///
/// Every outer iteration performs at most one exchange.
#[derive(Default, Debug, Clone, Copy)]
pub struct SelectionSorter;

async fn selection_sort(s: &mut Stepper) -> Result<(), RunError> {
    let n = s.len();

    for unsorted in 0..n.saturating_sub(1) {
        s.checkpoint()?;

        let mut smallest = unsorted;
        for j in unsorted + 1..n {
            if s.compare(smallest, j).await? == Ordering::Greater {
                smallest = j;
            }
        }

        if smallest != unsorted {
            s.exchange(unsorted, smallest).await?;
        }
    }

    Ok(())
}

impl StepSorter for SelectionSorter {
    fn sort<'a>(&'a self, stepper: &'a mut Stepper) -> BoxFuture<'a, Result<(), RunError>> {
        selection_sort(stepper).boxed()
    }
}
