use std::num::NonZeroUsize;

use snafu::OptionExt;
use tracing::debug;

use crate::puzzles::puzzle::{Answers, MarkerNotFoundSnafu, PuzzleError, PuzzleTrait};

pub const DEFAULT_PACKET_MARKER_LENGTH: NonZeroUsize = NonZeroUsize::new(4).unwrap();
pub const DEFAULT_MESSAGE_MARKER_LENGTH: NonZeroUsize = NonZeroUsize::new(14).unwrap();

/// Finds where the start-of-packet and start-of-message markers end in a datastream.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StreamMarker {
    pub packet_marker_length: NonZeroUsize,
    pub message_marker_length: NonZeroUsize,
}

impl Default for StreamMarker {
    fn default() -> Self {
        Self {
            packet_marker_length: DEFAULT_PACKET_MARKER_LENGTH,
            message_marker_length: DEFAULT_MESSAGE_MARKER_LENGTH,
        }
    }
}

/// Number of characters read once the last `length` characters are all different.
pub fn find_marker(stream: &str, length: NonZeroUsize) -> Option<usize> {
    let chars: Vec<char> = stream.chars().collect();
    chars
        .windows(length.get())
        .position(all_distinct)
        .map(|start| start + length.get())
}

fn all_distinct(window: &[char]) -> bool {
    window
        .iter()
        .enumerate()
        .all(|(i, c)| !window[i + 1..].contains(c))
}

impl PuzzleTrait for StreamMarker {
    fn name(&self) -> &'static str {
        "stream-marker"
    }

    fn solve(&self, input: &str) -> Result<Answers, PuzzleError> {
        let stream = input.trim();
        debug!("Scanning a datastream of {} characters", stream.len());

        let packet = find_marker(stream, self.packet_marker_length).context(MarkerNotFoundSnafu {
            length: self.packet_marker_length.get(),
        })?;
        let message =
            find_marker(stream, self.message_marker_length).context(MarkerNotFoundSnafu {
                length: self.message_marker_length.get(),
            })?;

        Ok(Answers::new(packet, message))
    }
}
