use clap::ValueEnum;
use derive_more::Display;

/// The puzzles that can be solved from the command line.
#[derive(Debug, Clone, Copy, ValueEnum, PartialEq, Eq, Display)]
pub enum PuzzleKind {
    /// Locate start-of-packet and start-of-message markers in a datastream
    #[display("stream-marker")]
    StreamMarker,
    /// Rebuild a directory tree from a terminal session and measure it
    #[display("disk-usage")]
    DiskUsage,
    /// Rearrange stacks of crates with a crane
    #[display("crate-stacks")]
    CrateStacks,
}
