mod puzzle_config;

pub use puzzle_config::{PuzzleConfig, PuzzleConfigError};
