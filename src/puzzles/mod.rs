pub mod crate_stacks;
mod disk_usage;
mod puzzle;
mod stream_marker;

pub use crate_stacks::CrateStacks;
pub use disk_usage::DiskUsage;
pub use puzzle::{Answers, Puzzle, PuzzleError, PuzzleTrait};
pub use stream_marker::StreamMarker;
