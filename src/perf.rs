//! Evaluating strategies over many episodes.

use std::{fmt::Display, ops::Deref};

#[cfg(feature = "fancy")]
use comfy_table::{Cell, Color, ColumnConstraint, Row, Table, Width};
#[cfg(feature = "fancy")]
use owo_colors::{AnsiColors, OwoColorize, Stream};
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::strategy::{Attempt, Strategy};

/// A record of one strategy's attempts after a run of the
/// [harness](crate::harness).
///
/// This struct can provide statistics about the attempts on its own, but it
/// is recommended to produce a [`Summary`] first to cache the computations.
#[derive(Clone, Debug, Hash, PartialEq, Eq, PartialOrd, Ord)]
pub struct Perf {
    pub(crate) tries: Vec<Attempt>,
    strategy_name: String,
    max_guesses: usize,
}

impl Perf {
    /// Creates a new empty performance record.
    pub(crate) fn new(strat: &dyn Strategy, max_guesses: usize) -> Self {
        Perf {
            tries: Vec::new(),
            strategy_name: format!("{} v{}", strat, strat.version()),
            max_guesses,
        }
    }

    /// Gets the name of the strategy that produced this performance record.
    pub fn strategy_name(&self) -> &str {
        &self.strategy_name
    }

    /// Gets every attempt, in the order the targets were run.
    pub fn attempts(&self) -> &[Attempt] {
        &self.tries
    }

    /// Gets the number of episodes attempted by the strategy.
    pub fn num_tried(&self) -> u32 {
        self.tries.len() as u32
    }

    /// Gets the number of episodes won by the strategy.
    pub fn num_solved(&self) -> u32 {
        self.solved().count() as u32
    }

    /// Gets the fraction of episodes won by the strategy.
    pub fn frac_solved(&self) -> f32 {
        ratio(self.num_solved(), self.num_tried())
    }

    /// Gets the number of episodes the strategy lost.
    pub fn num_missed(&self) -> u32 {
        self.num_tried() - self.num_solved()
    }

    /// Gets the number of guesses across all won episodes.
    pub fn cumulative_guesses_solved(&self) -> u32 {
        self.solved().map(|a| a.guesses.len() as u32).sum()
    }

    /// Gets the average number of guesses needed to win.
    ///
    /// Lost episodes are not counted.
    pub fn mean_guesses(&self) -> f32 {
        ratio(self.cumulative_guesses_solved(), self.num_solved())
    }

    /// Gets the reward summed over every episode.
    pub fn total_reward(&self) -> i64 {
        self.tries.iter().map(|a| a.total_reward as i64).sum()
    }

    /// Gets the average reward per episode.
    pub fn mean_reward(&self) -> f32 {
        if self.tries.is_empty() {
            0.
        } else {
            self.total_reward() as f32 / self.num_tried() as f32
        }
    }

    fn solved(&self) -> impl Iterator<Item = &Attempt> + '_ {
        self.tries.iter().filter(|a| a.solved())
    }

    /// Lays out the strategy's guesses for each target as a grid, with
    /// lost episodes highlighted.
    #[cfg(feature = "fancy")]
    pub fn table(&self) -> Table {
        let mut table = Table::new();
        if !table.is_tty() {
            table.set_table_width(80);
        } else {
            table.load_preset(comfy_table::presets::UTF8_FULL);
        }
        let columns = (table.get_table_width().unwrap_or(80) / 9).max(1) as usize;
        for chunk in self.tries.chunks(columns) {
            let mut row = Row::new();
            for attempt in chunk {
                let mut cell = Cell::new(format!("{}\n-----\n{}", attempt.target, attempt));
                if !attempt.solved() {
                    cell = cell.bg(Color::Red).fg(Color::Black);
                }
                row.add_cell(cell);
            }
            table.add_row(row);
        }
        table.set_constraints(vec![
            ColumnConstraint::LowerBoundary(Width::Fixed(5));
            columns
        ]);
        table
    }

    /// Prints the strategy's summary and then its [`table()`](Perf::table()).
    #[cfg(feature = "fancy")]
    pub fn print(&self) {
        print!("{}", self);
        println!("{}", self.table());
    }

    /// Converts this performance record to a pre-calculated summary.
    pub fn to_summary(&self) -> Summary {
        let mut bins = vec![0; self.max_guesses];
        for attempt in self.solved() {
            if let Some(bin) = attempt.guesses.len().checked_sub(1).and_then(|i| bins.get_mut(i)) {
                *bin += 1;
            }
        }

        Summary {
            strategy_name: &self.strategy_name,
            num_tried: self.num_tried(),
            num_solved: self.num_solved(),
            total_reward: self.total_reward(),
            histogram: Histogram { bins },
        }
    }
}

impl Display for Perf {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_summary())
    }
}

fn ratio(num: u32, denom: u32) -> f32 {
    if denom == 0 {
        0.
    } else {
        num as f32 / denom as f32
    }
}

/// A summary of a strategy's performance generated by the
/// [harness](crate::harness).
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(
    feature = "serde",
    derive(Serialize, Deserialize),
    serde(crate = "serde_crate")
)]
pub struct Summary<'a> {
    strategy_name: &'a str,
    num_tried: u32,
    num_solved: u32,
    total_reward: i64,
    histogram: Histogram,
}

impl<'a> Summary<'a> {
    /// Gets the name of the strategy that produced this performance record.
    pub fn strategy_name(&self) -> &'a str {
        self.strategy_name
    }

    pub fn num_tried(&self) -> u32 {
        self.num_tried
    }

    pub fn num_solved(&self) -> u32 {
        self.num_solved
    }

    pub fn frac_solved(&self) -> f32 {
        ratio(self.num_solved, self.num_tried)
    }

    pub fn num_missed(&self) -> u32 {
        self.num_tried - self.num_solved
    }

    /// Gets the number of guesses across all won episodes.
    pub fn cumulative_guesses_solved(&self) -> u32 {
        self.histogram
            .iter()
            .enumerate()
            .map(|(i, v)| (i as u32 + 1) * v)
            .sum::<u32>()
    }

    /// Gets the average number of guesses needed to win.
    pub fn mean_guesses(&self) -> f32 {
        ratio(self.cumulative_guesses_solved(), self.num_solved)
    }

    pub fn total_reward(&self) -> i64 {
        self.total_reward
    }

    pub fn mean_reward(&self) -> f32 {
        if self.num_tried == 0 {
            0.
        } else {
            self.total_reward as f32 / self.num_tried as f32
        }
    }

    pub fn histogram(&self) -> &Histogram {
        &self.histogram
    }

    /// Prints the summary to stdout, highlighting the solve rate, and
    /// optionally the histogram.
    #[cfg(feature = "fancy")]
    pub fn print(&self, histogram: bool) -> crate::Result<()> {
        use std::io::Write;

        let mut stdout = std::io::stdout();
        let rate = self.frac_solved() * 100.;
        writeln!(stdout, "{:-^80}", self.strategy_name)?;
        writeln!(stdout, "Ran {} words", self.num_tried())?;
        writeln!(
            stdout,
            "Guessed {} correctly, or {}, and {} incorrectly",
            self.num_solved(),
            format!("{:.1}%", rate).if_supports_color(Stream::Stdout, |text| {
                if rate >= 90. {
                    text.color(AnsiColors::Green)
                } else if rate >= 50. {
                    text.color(AnsiColors::Yellow)
                } else {
                    text.color(AnsiColors::Red)
                }
            }),
            self.num_missed()
        )?;
        writeln!(
            stdout,
            "Correct guesses took {:.2} attempts on average",
            self.mean_guesses()
        )?;
        writeln!(
            stdout,
            "Earned {:.2} reward per episode on average",
            self.mean_reward()
        )?;

        if histogram {
            write!(stdout, "{}", self.histogram)?;
        }

        Ok(())
    }
}

impl<'a> Display for Summary<'a> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "{:-^80}", self.strategy_name)?;
        writeln!(f, "Ran {} words", self.num_tried())?;

        writeln!(
            f,
            "Guessed {} correctly, or {:.1}%, and {} incorrectly",
            self.num_solved(),
            self.frac_solved() * 100.,
            self.num_missed()
        )?;

        writeln!(
            f,
            "Correct guesses took {:.2} attempts on average",
            self.mean_guesses(),
        )?;

        writeln!(
            f,
            "Earned {:.2} reward per episode on average",
            self.mean_reward()
        )?;

        Ok(())
    }
}

/// How many won episodes took each number of guesses; bin `i` counts wins
/// in `i + 1` guesses.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(
    feature = "serde",
    derive(Serialize, Deserialize),
    serde(crate = "serde_crate")
)]
pub struct Histogram {
    bins: Vec<u32>,
}

impl From<Vec<u32>> for Histogram {
    fn from(bins: Vec<u32>) -> Self {
        Self { bins }
    }
}

impl Deref for Histogram {
    type Target = [u32];

    fn deref(&self) -> &Self::Target {
        &self.bins
    }
}

impl Display for Histogram {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let max = self.iter().copied().max().unwrap_or(0);
        let label_width = self.len().to_string().len();
        let digits =
            std::iter::successors(Some(max), |&n| (n >= 10).then(|| n / 10)).count();
        let room = 80usize.saturating_sub(label_width + digits + 5).max(1);
        let count_per_mark = (max as f32 / room as f32).max(1.0);

        for (i, &bin) in self.bins.iter().enumerate() {
            write!(f, "{:>label_width$} |", i + 1)?;
            let marks = (bin as f32 / count_per_mark).floor() as usize;
            writeln!(f, "{:■>marks$} ({})", "", bin)?;
        }

        Ok(())
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::{episode::Status, words::Word};

    fn attempt(target: &str, guesses: &[&str], reward: i32, status: Status) -> Attempt {
        Attempt {
            target: Word::new(target, 5).unwrap(),
            guesses: guesses.iter().map(|g| Word::new(g, 5).unwrap()).collect(),
            total_reward: reward,
            status,
        }
    }

    fn perf() -> Perf {
        Perf {
            tries: vec![
                attempt("crane", &["crane"], 50, Status::Won),
                attempt("crate", &["crane", "crate"], 87, Status::Won),
                attempt("caret", &["crane", "trace", "caret"], 110, Status::Won),
                attempt(
                    "youth",
                    &["crane", "slate", "trace", "crate", "caret", "about"],
                    -20,
                    Status::Lost,
                ),
            ],
            strategy_name: "test v0".to_string(),
            max_guesses: 6,
        }
    }

    #[test]
    fn perf_counts() {
        let perf = perf();
        assert_eq!(perf.num_tried(), 4);
        assert_eq!(perf.num_solved(), 3);
        assert_eq!(perf.num_missed(), 1);
        assert_eq!(perf.frac_solved(), 0.75);
        assert_eq!(perf.cumulative_guesses_solved(), 6);
        assert_eq!(perf.mean_guesses(), 2.);
        assert_eq!(perf.total_reward(), 227);
        assert_eq!(perf.mean_reward(), 56.75);
    }

    #[test]
    fn summary_matches_perf() {
        let perf = perf();
        let summary = perf.to_summary();

        assert_eq!(&**summary.histogram(), &[1, 1, 1, 0, 0, 0]);
        assert_eq!(summary.strategy_name(), perf.strategy_name());
        assert_eq!(summary.num_solved(), perf.num_solved());
        assert_eq!(summary.mean_guesses(), perf.mean_guesses());
        assert_eq!(summary.mean_reward(), perf.mean_reward());
        assert_eq!(summary.to_string(), perf.to_string());
    }

    #[test]
    fn empty_perf_has_no_nans() {
        let perf = Perf {
            tries: Vec::new(),
            strategy_name: "empty".to_string(),
            max_guesses: 6,
        };
        assert_eq!(perf.frac_solved(), 0.);
        assert_eq!(perf.mean_guesses(), 0.);
        assert_eq!(perf.mean_reward(), 0.);
        assert_eq!(perf.to_summary().histogram().iter().sum::<u32>(), 0);
    }

    #[cfg(feature = "fancy")]
    #[test]
    fn table_lists_every_attempt() {
        let perf = perf();
        let text = perf.table().to_string();

        for attempt in perf.attempts() {
            assert!(text.contains(&*attempt.target));
        }
        assert!(text.contains("about"));
        assert!(text.contains("-----"));
    }

    #[test]
    fn histogram_lines_fit() {
        let histogram = Histogram::from(vec![3, 120000, 0, 7, 1, 0]);
        let text = histogram.to_string();

        assert_eq!(text.lines().count(), 6);
        assert!(text.lines().all(|l| l.chars().count() <= 80));
        assert!(text.starts_with("1 |"));
        assert!(text.lines().nth(2).unwrap().ends_with("| (0)"));
    }
}
