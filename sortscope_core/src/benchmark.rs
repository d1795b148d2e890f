//! Runs every algorithm without pacing and tabulates how many primitives each one needed.

use std::time::{Duration, Instant};

use colored::Colorize;
use prettytable::{row, Table};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::algorithm::Algorithm;
use crate::error::RunError;
use crate::sorters::sort_unpaced;
use crate::stepper::StepCounts;

pub const DEFAULT_SIZES: [usize; 4] = [10, 50, 100, 200];

// Quadratic sorters are skipped above this size.
const QUADRATIC_LIMIT: usize = 5_000;

/// Result of one unpaced run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Measurement {
    pub algorithm: Algorithm,
    pub size: usize,
    pub counts: StepCounts,
    pub took: Duration,
}

fn is_quadratic(algorithm: Algorithm) -> bool {
    !matches!(
        algorithm,
        Algorithm::Merge | Algorithm::Quick | Algorithm::Heap | Algorithm::Comb | Algorithm::Bitonic
    )
}

/// Sorts a copy of `values` with `algorithm` and reports the tally.
pub fn measure(algorithm: Algorithm, values: &[u32]) -> Result<Measurement, RunError> {
    let now = Instant::now();
    let (sorted, counts) =
        futures::executor::block_on(sort_unpaced(algorithm.sorter(), values.to_vec()))?;
    let took = now.elapsed();

    if sorted.windows(2).any(|w| w[0] > w[1]) {
        return Err(RunError::Fault(format!("{algorithm} left the array unsorted")));
    }

    Ok(Measurement {
        algorithm,
        size: values.len(),
        counts,
        took,
    })
}

/// Prints one table per size with every algorithm run over the same random array.
pub fn run_benchmark(sizes: &[usize], seed: Option<u64>) -> Result<(), RunError> {
    let mut random = match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };

    for &n in sizes {
        let values: Vec<u32> = (0..n).map(|_| random.gen_range(1..=100)).collect();

        println!(
            "{} {}",
            "List Size -> ".bold().underline().blue(),
            n.to_string().bold()
        );

        let mut table = Table::new();
        table.add_row(row![
            "Sorter".bold(),
            "Comparisons".bold(),
            "Exchanges".bold(),
            "Writes".bold(),
            "Time Taken".bold()
        ]);

        for algorithm in Algorithm::ALL {
            if n > QUADRATIC_LIMIT && is_quadratic(algorithm) {
                table.add_row(row![algorithm.label(), "Not Doing It".red(), "", "", ""]);
                continue;
            }

            let m = measure(algorithm, &values)?;
            table.add_row(row![
                algorithm.label(),
                m.counts.comparisons.to_string(),
                m.counts.exchanges.to_string(),
                m.counts.writes.to_string(),
                format!("{:?}", m.took)
            ]);
        }

        table.printstd();
        println!();
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bubble_counts_on_reversed_input() {
        let values: Vec<u32> = (1..=5).rev().collect();
        let m = measure(Algorithm::Bubble, &values).unwrap();
        assert_eq!(m.size, 5);
        assert_eq!(m.counts.comparisons, 10);
        assert_eq!(m.counts.exchanges, 10);
        assert_eq!(m.counts.writes, 0);
    }

    #[test]
    fn every_algorithm_measures() {
        let values = [9, 2, 7, 2, 5, 1, 8];
        for algorithm in Algorithm::ALL {
            let m = measure(algorithm, &values).unwrap();
            assert!(m.counts.comparisons > 0, "{algorithm}");
        }
    }
}
