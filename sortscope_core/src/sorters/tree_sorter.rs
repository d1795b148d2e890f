use std::cmp::Ordering;

use futures::future::{BoxFuture, FutureExt};

use super::StepSorter;
use crate::error::RunError;
use crate::stepper::Stepper;

/// An implementation of [Tree Sort](https://en.wikipedia.org/wiki/Tree_sort)
///
/// # Explanation
///
/// Every value is inserted into a binary search tree, then an in-order traversal writes the values
/// back into the array from left to right.
///
/// Values equal to a node go into its right subtree, so equal values come out in the order they
/// were inserted. Each node remembers the array position its value was read from; insertion
/// compares are highlighted between the value being inserted and that position.
///
/// A run stopped while writing back leaves the values still in the tree after the written prefix.
///
/// The tree is not balanced: already sorted input degenerates into a list and takes a quadratic
/// number of comparisons.
#[derive(Default, Debug, Clone, Copy)]
pub struct TreeSorter;

#[derive(Debug)]
struct Node {
    value: u32,
    origin: usize,
    left: Option<usize>,
    right: Option<usize>,
}

/// Binary search tree stored in an arena; children are indices into `nodes`.
#[derive(Debug, Default)]
struct Tree {
    nodes: Vec<Node>,
}

impl Tree {
    fn with_capacity(capacity: usize) -> Self {
        Self {
            nodes: Vec::with_capacity(capacity),
        }
    }

    fn push(&mut self, value: u32, origin: usize) -> usize {
        self.nodes.push(Node {
            value,
            origin,
            left: None,
            right: None,
        });
        self.nodes.len() - 1
    }

    // Inserts the value found at array index `origin`, emitting one compare per visited node.
    async fn insert(&mut self, s: &mut Stepper, origin: usize) -> Result<(), RunError> {
        let value = s.value(origin)?;
        if self.nodes.is_empty() {
            self.push(value, origin);
            return Ok(());
        }

        let mut current = 0;
        loop {
            let node = &self.nodes[current];
            let goes_left =
                s.compare_values((origin, node.origin), value, node.value).await? == Ordering::Less;

            let child = if goes_left { node.left } else { node.right };
            match child {
                Some(next) => current = next,
                None => {
                    let leaf = self.push(value, origin);
                    let node = &mut self.nodes[current];
                    if goes_left {
                        node.left = Some(leaf);
                    } else {
                        node.right = Some(leaf);
                    }
                    return Ok(());
                }
            }
        }
    }

    // Node indices in sorted order.
    fn in_order(&self) -> Vec<usize> {
        let mut order = Vec::with_capacity(self.nodes.len());
        let mut stack = Vec::new();
        let mut current = (!self.nodes.is_empty()).then_some(0);

        loop {
            while let Some(index) = current {
                stack.push(index);
                current = self.nodes[index].left;
            }
            let Some(index) = stack.pop() else {
                return order;
            };
            order.push(index);
            current = self.nodes[index].right;
        }
    }

    // Writes the values back in order, emitting one write per node.
    async fn write_in_order(&self, s: &mut Stepper) -> Result<(), RunError> {
        let order = self.in_order();

        for (cursor, &index) in order.iter().enumerate() {
            let node = &self.nodes[index];
            // Values still in the tree follow the written prefix if the run stops here.
            let rest = order[cursor + 1..].iter().map(|&i| self.nodes[i].value);
            s.write_holding(cursor, node.value, node.origin, cursor + 1, rest).await?;
        }

        Ok(())
    }
}

async fn tree_sort(s: &mut Stepper) -> Result<(), RunError> {
    let n = s.len();
    if n < 2 {
        return Ok(());
    }
    let mut tree = Tree::with_capacity(n);

    for origin in 0..n {
        s.checkpoint()?;
        tree.insert(s, origin).await?;
    }

    tree.write_in_order(s).await
}

impl StepSorter for TreeSorter {
    fn sort<'a>(&'a self, stepper: &'a mut Stepper) -> BoxFuture<'a, Result<(), RunError>> {
        tree_sort(stepper).boxed()
    }
}

#[cfg(test)]
mod tests {

    use super::*;
    use crate::sorters::{sort_unpaced, sorted_with, stopped_after};

    #[test]
    fn arbitrary_array() {
        assert_eq!(sorted_with(&TreeSorter, &[1, 5, 4, 2, 3]), [1, 2, 3, 4, 5]);
    }

    #[test]
    fn sorted_array() {
        let slice = (1..10).collect::<Vec<u32>>();
        assert_eq!(sorted_with(&TreeSorter, &slice), slice);
    }

    #[test]
    fn very_unsorted() {
        let slice = (1..200).rev().collect::<Vec<u32>>();
        assert_eq!(
            sorted_with(&TreeSorter, &slice),
            (1..200).collect::<Vec<u32>>()
        );
    }

    #[test]
    fn simple_edge_cases() {
        assert_eq!(sorted_with(&TreeSorter, &[1]), [1]);
        assert_eq!(sorted_with(&TreeSorter, &[1, 2]), [1, 2]);
        assert_eq!(sorted_with(&TreeSorter, &[2, 1]), [1, 2]);
        assert_eq!(sorted_with(&TreeSorter, &[3, 1, 2]), [1, 2, 3]);
    }

    #[test]
    fn stopped_write_back_keeps_every_value() {
        // four compares to build the tree, then 1 and 2 are written back over [3, 3]
        assert_eq!(stopped_after(&TreeSorter, &[3, 3, 1, 2], 5), [1, 2, 3, 3]);
    }

    #[test]
    fn duplicates_go_right() {
        assert_eq!(sorted_with(&TreeSorter, &[2, 2, 1, 2]), [1, 2, 2, 2]);
    }

    #[test]
    fn sorted_input_is_quadratic() {
        let (_, counts) =
            futures::executor::block_on(sort_unpaced(&TreeSorter, (0..10).collect())).unwrap();
        assert_eq!(counts.comparisons, 45);
        assert_eq!(counts.writes, 10);
    }
}
