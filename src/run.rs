use std::sync::Arc;

use anyhow::Result;
use clap::Args;
use colored::Colorize;

use sortscope_core::{
    Algorithm, RunObserver, RunOutcome, Speed, Visualizer, VisualizerConfig, DEFAULT_ARRAY_SIZE,
    DEFAULT_SPEED,
};

use crate::terminal::{history_table, TerminalObserver};

/// Animate sorting algorithms one after another over the same array.
#[derive(Debug, Args)]
pub struct RunArgs {
    /// Algorithm to animate. Repeat to run several; defaults to all of them.
    #[arg(short, long = "algorithm", value_name = "ALGO")]
    algorithms: Vec<Algorithm>,

    /// Number of random values to sort.
    #[arg(short, long, default_value_t = DEFAULT_ARRAY_SIZE)]
    size: usize,

    /// Animation speed from 1 (slowest) to 100 (fastest).
    #[arg(long, default_value_t = DEFAULT_SPEED)]
    speed: u8,

    /// Seed for the random array.
    #[arg(long)]
    seed: Option<u64>,

    /// Sort these values instead of a random array, e.g. `--values 5,3,8,1`.
    #[arg(long, value_delimiter = ',')]
    values: Option<Vec<u32>>,

    /// Print the history as JSON instead of a table.
    #[arg(long)]
    json: bool,
}

impl RunArgs {
    fn config(&self) -> Result<VisualizerConfig> {
        let mut config = VisualizerConfig {
            speed: Speed::new(self.speed)?,
            seed: self.seed,
            ..Default::default()
        };
        // `--values` replaces the generated array, so its size is not checked.
        if self.values.is_none() {
            config.initial_size = self.size;
        }
        config.validate()?;
        Ok(config)
    }

    pub async fn run(self) -> Result<()> {
        let config = self.config()?;
        let observer = Arc::new(TerminalObserver::new(true)?);
        let viz = Visualizer::new(config, Arc::clone(&observer) as Arc<dyn RunObserver>)?;

        let input = match self.values {
            Some(values) => values,
            None => viz.array(),
        };
        let algorithms = if self.algorithms.is_empty() {
            Algorithm::ALL.to_vec()
        } else {
            self.algorithms
        };

        for algorithm in algorithms {
            viz.load_array(input.clone())?;
            let handle = viz.start(algorithm)?;

            tokio::select! {
                outcome = handle.join() => {
                    if let RunOutcome::Faulted(message) = outcome {
                        anyhow::bail!("{algorithm} failed: {message}");
                    }
                }
                _ = tokio::signal::ctrl_c() => {
                    viz.cancel();
                    observer.println(format!("{} {}", "paused".yellow().bold(), algorithm.label()));
                    break;
                }
            }
        }
        observer.finish();

        let history = viz.history();
        if self.json {
            println!("{}", serde_json::to_string_pretty(&history)?);
        } else if !history.is_empty() {
            history_table(&history).printstd();
        }

        Ok(())
    }
}
