use std::time::Duration;

use anyhow::Result;
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use prettytable::{row, Table};

use sortscope_core::projection::{bar_width, project, Bar};
use sortscope_core::{format_elapsed, HistoryRecord, RunObserver, Snapshot};

const LEVELS: [char; 8] = ['▁', '▂', '▃', '▄', '▅', '▆', '▇', '█'];

// Approximate pixel width of one terminal cell.
const CELL_PIXELS: f64 = 8.0;

/// Draws every snapshot as one line of coloured block characters under a spinner.
pub struct TerminalObserver {
    pb: ProgressBar,
    announce_runs: bool,
}

impl TerminalObserver {
    pub fn new(announce_runs: bool) -> Result<Self> {
        let pb = ProgressBar::new_spinner();
        pb.set_style(ProgressStyle::with_template(
            "{spinner:.green} [{prefix:.bold}] {msg}",
        )?);
        pb.set_prefix(format_elapsed(0));
        pb.enable_steady_tick(Duration::from_millis(100));
        Ok(Self { pb, announce_runs })
    }

    pub fn progress_bar(&self) -> &ProgressBar {
        &self.pb
    }

    /// Prints above the animation line.
    pub fn println(&self, line: impl AsRef<str>) {
        self.pb.println(line);
    }

    pub fn finish(&self) {
        self.pb.finish_and_clear();
    }
}

impl RunObserver for TerminalObserver {
    fn on_snapshot(&self, snapshot: &Snapshot) {
        self.pb.set_message(render(snapshot));
    }

    fn on_elapsed_tick(&self, elapsed_ms: u64) {
        self.pb.set_prefix(format_elapsed(elapsed_ms));
    }

    fn on_history_changed(&self, records: &[HistoryRecord]) {
        if !self.announce_runs {
            return;
        }
        if let Some(latest) = records.first() {
            self.pb.println(format!(
                "{} {} sorted {} values in {}",
                "✔".green(),
                latest.algorithm.label().bold(),
                latest.array_size,
                latest.elapsed().bold()
            ));
        }
    }

    fn on_diagnostic(&self, message: &str) {
        self.pb.println(format!("{} {message}", "error:".red().bold()));
    }
}

fn bar_char(bar: &Bar, max: u32) -> char {
    if max == 0 {
        return LEVELS[0];
    }
    let level = u64::from(bar.value) * (LEVELS.len() as u64 - 1) / u64::from(max);
    LEVELS[level as usize]
}

// Small arrays get wider bars, the same way they would on a canvas.
fn columns_per_bar(size: usize) -> usize {
    (bar_width(size) / CELL_PIXELS).round().max(1.0) as usize
}

/// Coloured block characters per value, scaled to the largest value.
pub fn render(snapshot: &Snapshot) -> String {
    let bars = project(snapshot);
    let max = bars.iter().map(|bar| bar.value).max().unwrap_or(0);
    let columns = columns_per_bar(bars.len());

    bars.iter()
        .map(|bar| {
            let (r, g, b) = bar.color.rgb();
            let glyph = bar_char(bar, max)
                .to_string()
                .repeat(columns)
                .truecolor(r, g, b);
            if bar.emphasized {
                glyph.bold().to_string()
            } else {
                glyph.to_string()
            }
        })
        .collect()
}

pub fn history_table(records: &[HistoryRecord]) -> Table {
    let mut table = Table::new();
    table.add_row(row![
        "#".bold(),
        "Algorithm".bold(),
        "Elapsed".bold(),
        "Size".bold(),
        "Completed At".bold()
    ]);

    for (i, record) in records.iter().enumerate() {
        table.add_row(row![
            (i + 1).to_string(),
            record.algorithm.label(),
            record.elapsed(),
            record.array_size.to_string(),
            record.timestamp()
        ]);
    }

    table
}

#[cfg(test)]
mod tests {
    use super::*;
    use sortscope_core::Algorithm;

    #[test]
    fn renders_glyphs_scaled_to_the_largest_value() {
        colored::control::set_override(false);
        let line = render(&Snapshot::plain(vec![1, 50, 100, 0], false));
        assert_eq!(line, "▁▁▁▄▄▄███▁▁▁");

        let wide = render(&Snapshot::plain((1..=200).collect(), false));
        assert_eq!(wide.chars().count(), 200);
    }

    #[test]
    fn bars_narrow_as_the_array_grows() {
        assert_eq!(columns_per_bar(5), 3);
        assert_eq!(columns_per_bar(60), 1);
        assert_eq!(columns_per_bar(200), 1);
    }

    #[test]
    fn empty_snapshot_renders_nothing() {
        assert_eq!(render(&Snapshot::default()), "");
    }

    #[test]
    fn table_has_a_row_per_record() {
        let records = vec![
            HistoryRecord::new(Algorithm::Quick, 1534, 20),
            HistoryRecord::new(Algorithm::Bubble, 70, 5),
        ];
        let table = history_table(&records);
        assert_eq!(table.len(), 3);
    }
}
