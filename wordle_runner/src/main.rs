use std::{
    error::Error,
    fs,
    io::{self, BufRead, Write},
    path::{Path, PathBuf},
    process,
};

use clap::{Parser, Subcommand};
use log::{error, info};
use owo_colors::{OwoColorize, Stream};
use rand::seq::SliceRandom;
use wordle_env::{
    strategy::{Greedy, Sampling},
    words::SAMPLE,
    CommonWords, Episode, EpisodeError, GameConfig, Grade, Harness, HarnessError, Result, Status,
    StepOutcome, Strategy, WordPool,
};

#[derive(Parser, Debug)]
#[clap(author, version, about)]
struct Cli {
    /// File of words that can be guessed, one per line
    #[clap(long, global = true)]
    words: Option<PathBuf>,

    /// File of words that can be targets, one per line
    #[clap(long, global = true)]
    answers: Option<PathBuf>,

    /// File of common words to favor, one per line
    #[clap(long, global = true)]
    common: Option<PathBuf>,

    /// JSON game configuration
    #[clap(long, global = true)]
    config: Option<PathBuf>,

    #[clap(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Play one game in the terminal, with suggestions every turn
    Play {
        /// The word to guess; random if omitted
        #[clap(long)]
        target: Option<String>,
    },

    /// Run the built-in strategies over many targets
    Simulate {
        /// How many random targets to run [default: 100]
        #[clap(long)]
        num: Option<usize>,

        /// Run every answer instead of a random sample
        #[clap(long, conflicts_with = "num")]
        all: bool,

        /// Show a progress bar
        #[clap(short, long)]
        verbose: bool,

        /// Also print every strategy's guesses as a grid
        #[clap(long)]
        table: bool,
    },
}

struct Setup {
    config: GameConfig,
    pool: WordPool,
    answers: Option<Vec<String>>,
    common: CommonWords,
}

fn read_words(path: &Path) -> io::Result<Vec<String>> {
    Ok(fs::read_to_string(path)?
        .lines()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .map(str::to_string)
        .collect())
}

impl Setup {
    fn load(cli: &Cli) -> Result<Self> {
        let config = match &cli.config {
            Some(path) => GameConfig::from_json(&fs::read_to_string(path)?)?,
            None => GameConfig::new(),
        };
        let pool = match &cli.words {
            Some(path) => WordPool::new(read_words(path)?, config.word_length)?,
            None => WordPool::new(SAMPLE, config.word_length)?,
        };
        let answers = cli.answers.as_deref().map(read_words).transpose()?;
        let common = match &cli.common {
            Some(path) => read_words(path)?.into_iter().collect(),
            None => CommonWords::new(),
        };
        info!(
            "loaded {} words, {} answers, {} common words",
            pool.len(),
            answers.as_ref().map_or(pool.len(), Vec::len),
            common.len()
        );

        Ok(Setup {
            config,
            pool,
            answers,
            common,
        })
    }
}

fn print_feedback(outcome: &StepOutcome, guess: &str) {
    for (letter, grade) in guess.chars().zip(outcome.feedback.iter()) {
        let letter = letter.to_ascii_uppercase();
        match grade {
            Grade::Correct => print!(
                "{}",
                letter.if_supports_color(Stream::Stdout, |l| l.black().on_green().to_string())
            ),
            Grade::Present => print!(
                "{}",
                letter.if_supports_color(Stream::Stdout, |l| l.black().on_yellow().to_string())
            ),
            Grade::Absent => print!(
                "{}",
                letter.if_supports_color(Stream::Stdout, |l| l.dimmed().to_string())
            ),
        }
    }
    println!("  ({})  reward {:+}", outcome.feedback, outcome.reward);
}

fn pick_target<S: AsRef<str>>(answers: &[S]) -> Result<String> {
    answers
        .choose(&mut rand::thread_rng())
        .map(|a| a.as_ref().to_string())
        .ok_or_else(|| HarnessError::EmptyAnswerList.into())
}

fn play(setup: Setup, target: Option<String>) -> Result<()> {
    let target = match target {
        Some(t) => t,
        None => match &setup.answers {
            Some(answers) => pick_target(answers)?,
            None => pick_target(&setup.pool)?,
        },
    };
    let mut episode = Episode::new(&target, setup.pool, setup.common, setup.config)?;

    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();

    while !episode.is_done() {
        match episode.select_words_with_probabilities() {
            Ok(ranked) => {
                println!("Suggestions:");
                for (word, p) in ranked {
                    println!("  {} {:>6.2}%", word, p * 100.);
                }
            }
            Err(e) => println!("No suggestions: {}", e),
        }

        print!(
            "Guess {}/{}: ",
            episode.guess_count() + 1,
            episode.config().max_guesses
        );
        io::stdout().flush()?;

        let line = match lines.next() {
            Some(line) => line?,
            None => return Ok(()),
        };
        let guess = line.trim().to_ascii_lowercase();

        match episode.step_word(&guess) {
            Ok(outcome) => print_feedback(&outcome, &guess),
            Err(e) => match e.episode() {
                Some(kind @ (EpisodeError::NotInPool(_) | EpisodeError::MalformedWord { .. })) => {
                    println!("{}", kind)
                }
                _ => return Err(e),
            },
        }
    }

    match episode.status() {
        Status::Won => println!(
            "Solved in {} guesses with {} total reward!",
            episode.guess_count(),
            episode.total_reward()
        ),
        _ => println!(
            "Out of guesses. The word was {}; total reward {}.",
            episode.target().if_supports_color(Stream::Stdout, |t| t.bold()),
            episode.total_reward()
        ),
    }

    Ok(())
}

struct SimulateOptions {
    num: Option<usize>,
    all: bool,
    verbose: bool,
    table: bool,
}

fn simulate(setup: Setup, options: SimulateOptions) -> Result<()> {
    let mut harness = Harness::new()
        .add_strategies(vec![Box::new(Greedy) as Box<dyn Strategy>, Box::new(Sampling)])
        .pool(setup.pool)
        .common(setup.common)
        .config(setup.config);
    if let Some(answers) = setup.answers {
        harness = harness.answers(answers);
    }
    harness = if options.all {
        harness.test_all()
    } else {
        harness.test_num(options.num.unwrap_or(100))
    };
    if options.verbose {
        harness = harness.verbose();
    }

    let record = harness.run()?;
    if options.table {
        for perf in record.iter() {
            perf.print();
        }
    }
    record.print_report()
}

fn run(cli: Cli) -> Result<()> {
    let setup = Setup::load(&cli)?;
    match cli.command {
        Command::Play { target } => play(setup, target),
        Command::Simulate {
            num,
            all,
            verbose,
            table,
        } => simulate(
            setup,
            SimulateOptions {
                num,
                all,
                verbose,
                table,
            },
        ),
    }
}

fn main() {
    env_logger::init();

    let cli = Cli::parse();
    if let Err(e) = run(cli) {
        error!("{}", e);
        let mut source = e.source();
        while let Some(cause) = source {
            error!("  caused by: {}", cause);
            source = cause.source();
        }
        process::exit(1);
    }
}
