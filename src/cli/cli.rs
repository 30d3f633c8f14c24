use std::path::PathBuf;

use clap::Parser;

use crate::application::data::{LogLevel, PuzzleKind};

#[derive(Parser, Debug, Clone)]
#[command(version, about = "Solves camp puzzles from their text input")]
pub struct Cli {
    /// The puzzle to solve
    #[clap(value_enum)]
    pub puzzle: PuzzleKind,

    /// The puzzle input, relative to the root directory
    #[clap(default_value = "input.txt")]
    pub input: PathBuf,

    #[clap(long, short, default_value = "warn", value_enum)]
    pub log_level: LogLevel,

    /// The directory holding the input and an optional puzzles.yaml
    #[clap(long, short, default_value = ".")]
    pub root: PathBuf,
}
