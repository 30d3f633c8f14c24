use std::path::PathBuf;

use crate::application::data::PuzzleKind;
use crate::cli::Cli;

#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    pub puzzle: PuzzleKind,
    pub input: PathBuf,
    pub root: PathBuf,
}

impl RuntimeConfig {
    /// The input file, relative paths being taken from the project root.
    pub fn input_path(&self) -> PathBuf {
        self.root.join(&self.input)
    }
}

impl From<Cli> for RuntimeConfig {
    fn from(cli: Cli) -> Self {
        Self {
            puzzle: cli.puzzle,
            input: cli.input,
            root: cli.root,
        }
    }
}
