use std::cmp::Ordering;

use futures::future::{BoxFuture, FutureExt};

use super::StepSorter;
use crate::error::RunError;
use crate::stepper::Stepper;

/// An implementation of [Cocktail Shaker Sort](https://en.wikipedia.org/wiki/Cocktail_shaker_sort)
///
/// A bidirectional bubble sort: a forward pass carries the largest element to the end, then a
/// backward pass carries the smallest to the front. Both bounds shrink after their pass, and the
/// sort stops as soon as a pass makes no exchange.
#[derive(Default, Debug, Clone, Copy)]
pub struct CocktailSorter;

// One bubble step over the adjacent pair at `i`. Returns whether it exchanged.
async fn bubble(s: &mut Stepper, i: usize) -> Result<bool, RunError> {
    if s.compare(i, i + 1).await? == Ordering::Greater {
        s.exchange(i, i + 1).await?;
        Ok(true)
    } else {
        Ok(false)
    }
}

async fn cocktail_sort(s: &mut Stepper) -> Result<(), RunError> {
    let n = s.len();
    if n < 2 {
        return Ok(());
    }

    let mut start = 0;
    let mut end = n - 1;

    loop {
        s.checkpoint()?;

        let mut swapped = false;
        for i in start..end {
            swapped |= bubble(s, i).await?;
        }
        if !swapped {
            break;
        }
        end -= 1;

        s.checkpoint()?;

        swapped = false;
        for i in (start..end).rev() {
            swapped |= bubble(s, i).await?;
        }
        if !swapped {
            break;
        }
        start += 1;
    }

    Ok(())
}

impl StepSorter for CocktailSorter {
    fn sort<'a>(&'a self, stepper: &'a mut Stepper) -> BoxFuture<'a, Result<(), RunError>> {
        cocktail_sort(stepper).boxed()
    }
}
