use derive_more::Display;
use snafu::Snafu;

use crate::filesystem::NavigationError;
use crate::puzzles::crate_stacks::CrateStacksError;
use crate::puzzles::{CrateStacks, DiskUsage, StreamMarker};

/// The answers of both parts of a puzzle, already rendered as text.
#[derive(Debug, Clone, PartialEq, Eq, Display)]
#[display("{part_one} / {part_two}")]
pub struct Answers {
    pub part_one: String,
    pub part_two: String,
}

impl Answers {
    pub fn new(part_one: impl ToString, part_two: impl ToString) -> Self {
        Self {
            part_one: part_one.to_string(),
            part_two: part_two.to_string(),
        }
    }
}

pub trait PuzzleTrait {
    fn name(&self) -> &'static str;
    /// Solves both parts against the raw puzzle input.
    fn solve(&self, input: &str) -> Result<Answers, PuzzleError>;
}

#[derive(Debug, Clone)]
pub enum Puzzle {
    StreamMarker(StreamMarker),
    DiskUsage(DiskUsage),
    CrateStacks(CrateStacks),
}

impl PuzzleTrait for Puzzle {
    fn name(&self) -> &'static str {
        match self {
            Puzzle::StreamMarker(puzzle) => puzzle.name(),
            Puzzle::DiskUsage(puzzle) => puzzle.name(),
            Puzzle::CrateStacks(puzzle) => puzzle.name(),
        }
    }

    fn solve(&self, input: &str) -> Result<Answers, PuzzleError> {
        match self {
            Puzzle::StreamMarker(puzzle) => puzzle.solve(input),
            Puzzle::DiskUsage(puzzle) => puzzle.solve(input),
            Puzzle::CrateStacks(puzzle) => puzzle.solve(input),
        }
    }
}

#[derive(Debug, Snafu)]
#[snafu(visibility(pub(crate)))]
pub enum PuzzleError {
    #[snafu(display("Failed to rebuild the directory tree from the transcript"))]
    TranscriptError { source: NavigationError },
    #[snafu(display("No directory is at least {} bytes large", target))]
    NoDirectoryLargeEnough { target: u64 },
    #[snafu(display("No marker of {} distinct characters in the datastream", length))]
    MarkerNotFound { length: usize },
    #[snafu(display("Failed to rearrange the crate stacks"))]
    CrateStacksError { source: CrateStacksError },
}
