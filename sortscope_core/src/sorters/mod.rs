//! Step-emitting implementations of the twelve sorting algorithms.
//!
//! Every sorter is written against a [`Stepper`]: it never reads or writes the array behind the
//! stepper's back, so each comparison and exchange becomes an observable, paced and cancellable
//! step.
//!
//! # Example
//!
//! ```
//! use sortscope_core::sorters::{BubbleSorter, StepSorter};
//! use sortscope_core::Stepper;
//!
//! let mut stepper = Stepper::unpaced(vec![1, 3, 2, 5, 4]);
//! futures::executor::block_on(BubbleSorter.sort(&mut stepper)).unwrap();
//! assert_eq!(stepper.finish().0, vec![1, 2, 3, 4, 5]);
//! ```

mod bitonic_sorter;
mod bubble_sorter;
mod cocktail_sorter;
mod comb_sorter;
mod gnome_sorter;
mod heap_sorter;
mod insertion_sorter;
mod merge_sorter;
mod pancake_sorter;
mod quick_sorter;
mod selection_sorter;
mod tree_sorter;

pub use bitonic_sorter::BitonicSorter;
pub use bubble_sorter::BubbleSorter;
pub use cocktail_sorter::CocktailSorter;
pub use comb_sorter::CombSorter;
pub use gnome_sorter::GnomeSorter;
pub use heap_sorter::HeapSorter;
pub use insertion_sorter::InsertionSorter;
pub use merge_sorter::MergeSorter;
pub use pancake_sorter::PancakeSorter;
pub use quick_sorter::QuickSorter;
pub use selection_sorter::SelectionSorter;
pub use tree_sorter::TreeSorter;

use futures::future::BoxFuture;

use crate::error::RunError;
use crate::stepper::{StepCounts, Stepper};

/// A sorting algorithm whose every comparison and exchange goes through a [`Stepper`].
///
/// The returned future resolves once the array behind the stepper is sorted ascending, or with
/// the [`RunError`] the stepper raised when the run was cancelled or faulted.
pub trait StepSorter: Send + Sync {
    fn sort<'a>(&'a self, stepper: &'a mut Stepper) -> BoxFuture<'a, Result<(), RunError>>;
}

/// Sorts `values` with `sorter` without any pacing or publication.
///
/// Returns the sorted values and the number of primitives it took.
pub async fn sort_unpaced(
    sorter: &dyn StepSorter,
    values: Vec<u32>,
) -> Result<(Vec<u32>, StepCounts), RunError> {
    let mut stepper = Stepper::unpaced(values);
    sorter.sort(&mut stepper).await?;
    Ok(stepper.finish())
}

#[cfg(test)]
pub(crate) fn sorted_with(sorter: &dyn StepSorter, values: &[u32]) -> Vec<u32> {
    futures::executor::block_on(sort_unpaced(sorter, values.to_vec()))
        .expect("unpaced sort cannot be cancelled")
        .0
}

// Runs `sorter` until it has published `steps` snapshots, then cancels it and returns what the
// stepper leaves behind.
#[cfg(test)]
pub(crate) fn stopped_after(sorter: &dyn StepSorter, values: &[u32], steps: usize) -> Vec<u32> {
    use std::sync::Arc;

    use parking_lot::Mutex;

    use crate::observer::Snapshot;
    use crate::stepper::{Pacing, StepSink};
    use crate::token::CancellationToken;

    struct CancelAfter {
        left: Mutex<usize>,
        token: CancellationToken,
    }

    impl StepSink for CancelAfter {
        fn publish(&self, _: Snapshot, _: Option<Vec<u32>>) -> Result<(), RunError> {
            let mut left = self.left.lock();
            if *left == 0 {
                self.token.cancel();
                return Err(RunError::Cancelled);
            }
            *left -= 1;
            Ok(())
        }
    }

    let token = CancellationToken::new();
    let sink = Arc::new(CancelAfter {
        left: Mutex::new(steps),
        token: token.clone(),
    });
    let mut stepper = Stepper::new(values.to_vec(), token, Pacing::Unpaced, sink);
    let result = futures::executor::block_on(sorter.sort(&mut stepper));
    assert_eq!(result, Err(RunError::Cancelled));
    stepper.finish().0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::algorithm::Algorithm;

    #[test]
    fn every_algorithm_sorts_with_duplicates() {
        let input = [7, 3, 3, 9, 1, 7, 0, 3, 12, 1, 5];
        let mut expected = input.to_vec();
        expected.sort_unstable();

        for algorithm in Algorithm::ALL {
            assert_eq!(
                sorted_with(algorithm.sorter(), &input),
                expected,
                "{algorithm} failed"
            );
        }
    }

    #[test]
    fn empty_and_single_take_no_steps() {
        for algorithm in Algorithm::ALL {
            for input in [vec![], vec![42]] {
                let (values, counts) =
                    futures::executor::block_on(sort_unpaced(algorithm.sorter(), input.clone()))
                        .unwrap();
                assert_eq!(values, input);
                assert_eq!(counts.total(), 0, "{algorithm} stepped on {input:?}");
            }
        }
    }

    #[test]
    fn cancelled_before_start_does_nothing() {
        for algorithm in Algorithm::ALL {
            let mut stepper = Stepper::unpaced(vec![4, 3, 2, 1]);
            stepper.token().cancel();
            let result = futures::executor::block_on(algorithm.sorter().sort(&mut stepper));
            assert_eq!(result, Err(RunError::Cancelled), "{algorithm}");
            assert_eq!(stepper.counts().total(), 0);
        }
    }
}
