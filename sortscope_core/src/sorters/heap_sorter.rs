use std::cmp::Ordering;

use futures::future::{BoxFuture, FutureExt};

use super::StepSorter;
use crate::error::RunError;
use crate::stepper::Stepper;

/// An implementation of [Heap Sort](https://en.wikipedia.org/wiki/Heapsort)
///
/// # Explanation
///
/// The array is first rearranged into a max-heap by sifting down every parent node, last parent
/// first. The root then holds the largest value; it is exchanged with the last element of the
/// heap, the heap shrinks by one and the new root is sifted down again until the heap is empty.
#[derive(Default, Debug, Clone, Copy)]
pub struct HeapSorter;

// Restores the heap property for the subtree rooted at `root` within `0..len`.
async fn sift_down(s: &mut Stepper, len: usize, mut root: usize) -> Result<(), RunError> {
    loop {
        s.checkpoint()?;

        let mut largest = root;
        for child in [2 * root + 1, 2 * root + 2] {
            if child < len && s.compare(child, largest).await? == Ordering::Greater {
                largest = child;
            }
        }

        if largest == root {
            return Ok(());
        }
        s.exchange(root, largest).await?;
        root = largest;
    }
}

async fn heap_sort(s: &mut Stepper) -> Result<(), RunError> {
    let n = s.len();

    for parent in (0..n / 2).rev() {
        sift_down(s, n, parent).await?;
    }

    for end in (1..n).rev() {
        s.checkpoint()?;
        s.exchange(0, end).await?;
        sift_down(s, end, 0).await?;
    }

    Ok(())
}

impl StepSorter for HeapSorter {
    fn sort<'a>(&'a self, stepper: &'a mut Stepper) -> BoxFuture<'a, Result<(), RunError>> {
        heap_sort(stepper).boxed()
    }
}
