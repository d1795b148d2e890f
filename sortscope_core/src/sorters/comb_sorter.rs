use std::cmp::Ordering;

use futures::future::{BoxFuture, FutureExt};

use super::StepSorter;
use crate::error::RunError;
use crate::stepper::Stepper;

/// Factor the gap shrinks by after every pass.
const SHRINK: f64 = 1.3;

/// An implementation of [Comb Sort](https://en.wikipedia.org/wiki/Comb_sort)
///
/// # Explanation
///
/// Comb sort improves on bubble sort by comparing elements that are `gap` positions apart. The gap
/// starts at the array length and is divided by 1.3 (rounded down) before every pass. Once it
/// reaches 1 the algorithm keeps making plain bubble passes until one of them performs no exchange.
#[derive(Default, Debug, Clone, Copy)]
pub struct CombSorter;

fn shrink(gap: usize) -> usize {
    // gap is at most the array length, so the cast back is lossless
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss, clippy::cast_precision_loss)]
    let next = (gap as f64 / SHRINK).floor() as usize;
    next.max(1)
}

async fn comb_sort(s: &mut Stepper) -> Result<(), RunError> {
    let n = s.len();
    let mut gap = n;
    let mut sorted = false;

    while !sorted {
        s.checkpoint()?;

        gap = shrink(gap);
        // Only a pass with gap 1 can prove the array sorted.
        sorted = gap == 1;

        let mut i = 0;
        while i + gap < n {
            if s.compare(i, i + gap).await? == Ordering::Greater {
                s.exchange(i, i + gap).await?;
                sorted = false;
            }
            i += 1;
        }
    }

    Ok(())
}

impl StepSorter for CombSorter {
    fn sort<'a>(&'a self, stepper: &'a mut Stepper) -> BoxFuture<'a, Result<(), RunError>> {
        comb_sort(stepper).boxed()
    }
}

#[cfg(test)]
mod tests {

    use super::*;
    use crate::sorters::sorted_with;

    #[test]
    fn gap_sequence() {
        assert_eq!(shrink(20), 15);
        assert_eq!(shrink(15), 11);
        assert_eq!(shrink(2), 1);
        assert_eq!(shrink(1), 1);
        assert_eq!(shrink(0), 1);
    }

    #[test]
    fn arbitrary_array() {
        assert_eq!(sorted_with(&CombSorter, &[1, 5, 4, 2, 3]), [1, 2, 3, 4, 5]);
    }

    #[test]
    fn sorted_array() {
        let slice = (1..10).collect::<Vec<u32>>();
        assert_eq!(sorted_with(&CombSorter, &slice), slice);
    }

    #[test]
    fn very_unsorted() {
        let slice = (1..1000).rev().collect::<Vec<u32>>();
        assert_eq!(
            sorted_with(&CombSorter, &slice),
            (1..1000).collect::<Vec<u32>>()
        );
    }

    #[test]
    fn simple_edge_cases() {
        assert_eq!(sorted_with(&CombSorter, &[1]), [1]);
        assert_eq!(sorted_with(&CombSorter, &[1, 2]), [1, 2]);
        assert_eq!(sorted_with(&CombSorter, &[2, 1]), [1, 2]);
        assert_eq!(sorted_with(&CombSorter, &[3, 1, 2]), [1, 2, 3]);
    }
}
