use std::str::FromStr;
use std::sync::Arc;

use anyhow::{anyhow, bail, Context, Result};
use clap::Args;
use colored::Colorize;
use tokio::io::{AsyncBufReadExt, BufReader};

use sortscope_core::{
    format_elapsed, Algorithm, RunObserver, Speed, Visualizer, VisualizerConfig, DEFAULT_SPEED,
};

use crate::terminal::{history_table, TerminalObserver};

const HELP: &str = "\
start [ALGO]     start (or resume) the selected algorithm, or ALGO
pause            pause the running algorithm
toggle           start when idle, pause when running
new [SIZE]       generate a new random array
load 5,3,8,1     sort these values next
algo NAME        select an algorithm
speed N          set the speed, 1 to 100
history          show the completed runs
show             show the current state
help             show this message
quit             leave";

/// Control a visualizer by typing commands on stdin.
#[derive(Debug, Args)]
pub struct InteractiveArgs {
    /// Animation speed from 1 (slowest) to 100 (fastest).
    #[arg(long, default_value_t = DEFAULT_SPEED)]
    speed: u8,

    /// Seed for the random arrays.
    #[arg(long)]
    seed: Option<u64>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Command {
    Start(Option<Algorithm>),
    Pause,
    Toggle,
    New(Option<usize>),
    Load(Vec<u32>),
    Algo(Algorithm),
    Speed(u8),
    History,
    Show,
    Help,
    Quit,
}

fn parse_values(list: &str) -> Result<Vec<u32>> {
    list.split(',')
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(|v| v.parse().with_context(|| format!("`{v}` is not a value")))
        .collect()
}

impl FromStr for Command {
    type Err = anyhow::Error;

    fn from_str(line: &str) -> Result<Self> {
        let mut words = line.split_whitespace();
        let name = words.next().ok_or_else(|| anyhow!("empty command"))?;
        let arg = words.next();
        if let Some(extra) = words.next() {
            bail!("unexpected argument `{extra}`");
        }

        let command = match (name.to_ascii_lowercase().as_str(), arg) {
            ("start", algo) => Command::Start(algo.map(str::parse::<Algorithm>).transpose()?),
            ("pause", None) => Command::Pause,
            ("toggle", None) => Command::Toggle,
            ("new", size) => Command::New(
                size.map(|s| s.parse().with_context(|| format!("`{s}` is not a size")))
                    .transpose()?,
            ),
            ("load", Some(list)) => Command::Load(parse_values(list)?),
            ("load", None) => Command::Load(Vec::new()),
            ("algo", Some(algo)) => Command::Algo(algo.parse()?),
            ("speed", Some(speed)) => Command::Speed(
                speed
                    .parse()
                    .with_context(|| format!("`{speed}` is not a speed"))?,
            ),
            ("history", None) => Command::History,
            ("show", None) => Command::Show,
            ("help" | "?", None) => Command::Help,
            ("quit" | "exit" | "q", None) => Command::Quit,
            ("algo" | "speed", None) => bail!("`{name}` needs an argument"),
            _ => bail!("unknown command `{line}`, type `help` for a list"),
        };
        Ok(command)
    }
}

fn show(viz: &Visualizer) -> String {
    let values = viz
        .array()
        .iter()
        .map(u32::to_string)
        .collect::<Vec<_>>()
        .join(",");
    format!(
        "{} {} | {} {} | {} {} | {} {} | {} [{values}]",
        "state".bold(),
        viz.state(),
        "algorithm".bold(),
        viz.algorithm().label(),
        "speed".bold(),
        viz.speed().get(),
        "elapsed".bold(),
        format_elapsed(viz.elapsed_ms()),
        "array".bold(),
    )
}

// Returns `false` once the session should end.
fn execute(viz: &Visualizer, observer: &TerminalObserver, command: Command) -> Result<bool> {
    match command {
        Command::Start(algo) => {
            viz.start(algo.unwrap_or_else(|| viz.algorithm()))?;
        }
        Command::Pause => {
            if !viz.cancel() {
                observer.println("nothing is running");
            }
        }
        Command::Toggle => {
            viz.toggle()?;
        }
        Command::New(Some(size)) => viz.new_array(size)?,
        Command::New(None) => viz.regenerate()?,
        Command::Load(values) => viz.load_array(values)?,
        Command::Algo(algo) => viz.select_algorithm(algo)?,
        Command::Speed(speed) => viz.set_speed(speed)?,
        Command::History => {
            let history = viz.history();
            if history.is_empty() {
                observer.println("no completed runs yet");
            } else {
                observer
                    .progress_bar()
                    .suspend(|| history_table(&history).printstd());
            }
        }
        Command::Show => observer.println(show(viz)),
        Command::Help => observer.println(HELP),
        Command::Quit => return Ok(false),
    }
    Ok(true)
}

impl InteractiveArgs {
    pub async fn run(self) -> Result<()> {
        let config = VisualizerConfig {
            speed: Speed::new(self.speed)?,
            seed: self.seed,
            ..Default::default()
        };
        let observer = Arc::new(TerminalObserver::new(true)?);
        let viz = Visualizer::new(config, Arc::clone(&observer) as Arc<dyn RunObserver>)?;
        observer.println(format!("type {} for a list of commands", "help".bold()));

        let mut lines = BufReader::new(tokio::io::stdin()).lines();
        while let Some(line) = lines.next_line().await? {
            if line.trim().is_empty() {
                continue;
            }

            let result = line
                .parse::<Command>()
                .and_then(|command| execute(&viz, &observer, command));
            match result {
                Ok(true) => {}
                Ok(false) => break,
                Err(err) => observer.println(format!("{} {err:#}", "error:".red().bold())),
            }
        }

        viz.cancel();
        observer.finish();
        Ok(())
    }
}
