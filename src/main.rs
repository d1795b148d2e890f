mod bench;
mod interactive;
mod run;
mod terminal;

use anstyle::{Color, RgbColor, Style};
use anyhow::Result;
use clap::builder::Styles;
use clap::{Parser, Subcommand};
use colored::Colorize;
use prettytable::{row, Table};
use tracing::Level;
use tracing_subscriber::EnvFilter;

use bench::BenchArgs;
use interactive::InteractiveArgs;
use run::RunArgs;
use sortscope_core::projection::BarColor;
use sortscope_core::Algorithm;

#[derive(Parser)]
#[command(author, version, about, long_about = None, styles=get_styles())] // Read from `Cargo.toml`
struct Cli {
    /// Log debug output to stderr.
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    commands: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List the sorting algorithms that can be animated
    List,
    /// Animate sorting algorithms in the terminal
    Run(RunArgs),
    /// Count the steps every algorithm takes, without animation
    Bench(BenchArgs),
    /// Drive a visualizer with commands typed on stdin
    Interactive(InteractiveArgs),
}

fn list() {
    let mut table = Table::new();
    table.add_row(row!["Name".bold(), "Algorithm".bold()]);
    for algorithm in Algorithm::ALL {
        table.add_row(row![algorithm.id().green(), algorithm.label()]);
    }
    table.printstd();
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let level = if cli.verbose { Level::DEBUG } else { Level::WARN };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive(level.into()))
        .with_writer(std::io::stderr)
        .init();

    match cli.commands {
        Commands::List => list(),
        Commands::Run(args) => args.run().await?,
        Commands::Bench(args) => args.run()?,
        Commands::Interactive(args) => args.run().await?,
    }

    Ok(())
}

// Help output uses the bar palette: headers in the unsorted blue, literals in the sorted green.
fn get_styles() -> Styles {
    let color = |bar: BarColor| {
        let (r, g, b) = bar.rgb();
        Style::new().fg_color(Some(Color::Rgb(RgbColor(r, g, b))))
    };

    Styles::styled()
        .usage(color(BarColor::Unsorted).bold().underline())
        .header(color(BarColor::Unsorted).bold())
        .literal(color(BarColor::Sorted))
        .invalid(color(BarColor::Swapping).bold())
        .error(color(BarColor::Swapping).bold())
        .valid(color(BarColor::Sorted).bold().underline())
        .placeholder(color(BarColor::Comparing))
}

#[test]
fn verify_cli() {
    use clap::CommandFactory;
    Cli::command().debug_assert()
}
