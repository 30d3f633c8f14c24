use snafu::{OptionExt, ResultExt};
use tracing::{debug, info};

use crate::filesystem::queries::{smallest_directory_at_least, space_to_free, sum_small_directories};
use crate::filesystem::{DirTree, parse_transcript, replay};
use crate::puzzles::puzzle::{
    Answers, NoDirectoryLargeEnoughSnafu, PuzzleError, PuzzleTrait, TranscriptSnafu,
};

pub const DEFAULT_SMALL_DIRECTORY_THRESHOLD: u64 = 100_000;
pub const DEFAULT_DISK_CAPACITY: u64 = 70_000_000;
pub const DEFAULT_NEEDED_FREE_SPACE: u64 = 30_000_000;

/// Rebuilds a device's directory tree from a terminal session and reports how much
/// space small directories take and which directory to delete to make room for an update.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiskUsage {
    pub small_directory_threshold: u64,
    pub disk_capacity: u64,
    pub needed_free_space: u64,
}

impl Default for DiskUsage {
    fn default() -> Self {
        Self {
            small_directory_threshold: DEFAULT_SMALL_DIRECTORY_THRESHOLD,
            disk_capacity: DEFAULT_DISK_CAPACITY,
            needed_free_space: DEFAULT_NEEDED_FREE_SPACE,
        }
    }
}

impl PuzzleTrait for DiskUsage {
    fn name(&self) -> &'static str {
        "disk-usage"
    }

    fn solve(&self, input: &str) -> Result<Answers, PuzzleError> {
        let actions = parse_transcript(input);
        let tree = replay(actions).context(TranscriptSnafu)?;

        let small_sum = sum_small_directories(&tree, self.small_directory_threshold);

        let used = tree.total_size(DirTree::ROOT);
        let target = space_to_free(used, self.disk_capacity, self.needed_free_space);
        info!("{} bytes used, {} bytes need to be freed", used, target);

        let to_delete =
            smallest_directory_at_least(&tree, target).context(NoDirectoryLargeEnoughSnafu {
                target,
            })?;
        debug!("Smallest directory to delete holds {} bytes", to_delete);

        Ok(Answers::new(small_sum, to_delete))
    }
}
