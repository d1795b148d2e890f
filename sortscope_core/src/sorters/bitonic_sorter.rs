use std::cmp::Ordering;

use futures::future::{BoxFuture, FutureExt};

use super::StepSorter;
use crate::error::RunError;
use crate::stepper::Stepper;

/// An implementation of [Bitonic Sort](https://en.wikipedia.org/wiki/Bitonic_sorter)
///
/// # Explanation
///
/// Bitonic sort is a sorting network. It recursively sorts the first half of the range ascending
/// and the second half descending, which makes the whole range bitonic, then merges it by
/// comparing every element with the one half a range away and recursing into both halves.
///
/// The network only works on power-of-two lengths. Shorter arrays are padded with
/// [`SENTINEL`](crate::stepper::SENTINEL) values, which sort to the end and are stripped again
/// before the result is handed back. Published snapshots never contain the padding.
///
/// # Usage
///```
/// use sortscope_core::sorters::{BitonicSorter, StepSorter};
/// use sortscope_core::Stepper;
///
/// let mut stepper = Stepper::unpaced(vec![9, 4, 7, 1, 3]);
/// futures::executor::block_on(BitonicSorter.sort(&mut stepper)).unwrap();
/// assert_eq!(stepper.finish().0, vec![1, 3, 4, 7, 9]);
///```
#[derive(Default, Debug, Clone, Copy)]
pub struct BitonicSorter;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Direction {
    Ascending,
    Descending,
}

async fn compare_and_swap(
    s: &mut Stepper,
    i: usize,
    j: usize,
    direction: Direction,
) -> Result<(), RunError> {
    let order = s.compare(i, j).await?;
    let out_of_order = match direction {
        Direction::Ascending => order == Ordering::Greater,
        Direction::Descending => order == Ordering::Less,
    };
    if out_of_order {
        s.exchange(i, j).await?;
    }
    Ok(())
}

fn bitonic_merge(
    s: &mut Stepper,
    lo: usize,
    len: usize,
    direction: Direction,
) -> BoxFuture<'_, Result<(), RunError>> {
    async move {
        if len < 2 {
            return Ok(());
        }
        s.checkpoint()?;

        let half = len / 2;
        for i in lo..lo + half {
            compare_and_swap(s, i, i + half, direction).await?;
        }
        bitonic_merge(s, lo, half, direction).await?;
        bitonic_merge(s, lo + half, half, direction).await
    }
    .boxed()
}

fn bitonic_sort(
    s: &mut Stepper,
    lo: usize,
    len: usize,
    direction: Direction,
) -> BoxFuture<'_, Result<(), RunError>> {
    async move {
        if len < 2 {
            return Ok(());
        }
        s.checkpoint()?;

        let half = len / 2;
        bitonic_sort(s, lo, half, Direction::Ascending).await?;
        bitonic_sort(s, lo + half, half, Direction::Descending).await?;
        bitonic_merge(s, lo, len, direction).await
    }
    .boxed()
}

async fn sort_padded(s: &mut Stepper) -> Result<(), RunError> {
    let n = s.len();
    if n < 2 {
        return Ok(());
    }

    let padded = n.next_power_of_two();
    s.pad_to(padded);
    bitonic_sort(s, 0, padded, Direction::Ascending).await?;
    s.strip_padding();

    Ok(())
}

impl StepSorter for BitonicSorter {
    fn sort<'a>(&'a self, stepper: &'a mut Stepper) -> BoxFuture<'a, Result<(), RunError>> {
        sort_padded(stepper).boxed()
    }
}

#[cfg(test)]
mod tests {

    use super::*;
    use crate::sorters::sorted_with;
    use crate::stepper::SENTINEL;

    #[test]
    fn arbitrary_array() {
        assert_eq!(sorted_with(&BitonicSorter, &[1, 5, 4, 2, 3]), [1, 2, 3, 4, 5]);
    }

    #[test]
    fn sorted_array() {
        let slice = (1..10).collect::<Vec<u32>>();
        assert_eq!(sorted_with(&BitonicSorter, &slice), slice);
    }

    #[test]
    fn very_unsorted() {
        let slice = (1..1000).rev().collect::<Vec<u32>>();
        assert_eq!(
            sorted_with(&BitonicSorter, &slice),
            (1..1000).collect::<Vec<u32>>()
        );
    }

    #[test]
    fn simple_edge_cases() {
        assert_eq!(sorted_with(&BitonicSorter, &[1]), [1]);
        assert_eq!(sorted_with(&BitonicSorter, &[1, 2]), [1, 2]);
        assert_eq!(sorted_with(&BitonicSorter, &[2, 1]), [1, 2]);
        assert_eq!(sorted_with(&BitonicSorter, &[3, 1, 2]), [1, 2, 3]);
    }

    #[test]
    fn length_is_preserved_for_every_size() {
        for len in 0..=33u32 {
            let input = (0..len).map(|v| (v * 7919) % 31).collect::<Vec<u32>>();
            let mut expected = input.clone();
            expected.sort_unstable();
            assert_eq!(sorted_with(&BitonicSorter, &input), expected, "len {len}");
        }
    }

    #[test]
    fn real_values_equal_to_the_sentinel_survive() {
        let input = [SENTINEL, 3, SENTINEL, 1, 2];
        assert_eq!(
            sorted_with(&BitonicSorter, &input),
            [1, 2, 3, SENTINEL, SENTINEL]
        );
    }
}
