use anyhow::Result;
use clap::Args;

use sortscope_core::benchmark::{run_benchmark, DEFAULT_SIZES};

/// Run every algorithm unpaced and count comparisons, exchanges and writes.
#[derive(Debug, Args)]
pub struct BenchArgs {
    /// Array sizes to benchmark, comma separated.
    #[arg(long, value_delimiter = ',', default_values_t = DEFAULT_SIZES)]
    sizes: Vec<usize>,

    /// Seed for the random arrays.
    #[arg(long)]
    seed: Option<u64>,
}

impl BenchArgs {
    pub fn run(self) -> Result<()> {
        run_benchmark(&self.sizes, self.seed)?;
        Ok(())
    }
}
