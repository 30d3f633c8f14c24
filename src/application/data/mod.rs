mod log_level;
mod puzzle_kind;

pub use log_level::LogLevel;
pub use puzzle_kind::PuzzleKind;
