use std::string::FromUtf8Error;

use compio::fs;
use snafu::Snafu;
use snafu::prelude::*;
use tracing::{debug, info};

use crate::application::RuntimeConfig;
use crate::application::output::{configure_colors, render_answers};
use crate::config::{PuzzleConfig, PuzzleConfigError};
use crate::puzzles::{Answers, PuzzleError, PuzzleTrait};

pub struct Application;

impl Application {
    pub async fn run(runtime_config: impl Into<RuntimeConfig>) -> Result<(), ApplicationError> {
        let runtime_config: RuntimeConfig = runtime_config.into();
        let answers = Self::solve(&runtime_config).await?;

        configure_colors();
        println!(
            "{}",
            render_answers(&runtime_config.puzzle.to_string(), &answers)
        );

        Ok(())
    }

    /// Loads the config and the input, then solves the requested puzzle.
    pub async fn solve(runtime_config: &RuntimeConfig) -> Result<Answers, ApplicationError> {
        let config = PuzzleConfig::read(&runtime_config.root)
            .await
            .context(ConfigSnafu)?;
        debug!("Loaded config: {:?}", config);

        let puzzle = config.puzzle(runtime_config.puzzle);

        let input_path = runtime_config.input_path();
        debug!("Reading puzzle input from {}", input_path.display());
        let bytes = fs::read(&input_path).await.context(InputReadSnafu {
            file_path: input_path.display().to_string(),
        })?;
        let input = String::from_utf8(bytes).context(InputEncodingSnafu {
            file_path: input_path.display().to_string(),
        })?;

        info!(
            "Solving '{}' with {} bytes of input",
            puzzle.name(),
            input.len()
        );
        let answers = puzzle.solve(&input).context(PuzzleSnafu {
            puzzle: puzzle.name(),
        })?;
        info!("Solved '{}': {}", puzzle.name(), answers);

        Ok(answers)
    }
}

#[derive(Debug, Snafu)]
pub enum ApplicationError {
    #[snafu(display("Critical failure encountered during configuration stage"))]
    ConfigError { source: PuzzleConfigError },
    #[snafu(display("Failed to read the puzzle input: {}", file_path))]
    InputReadError {
        file_path: String,
        source: std::io::Error,
    },
    #[snafu(display("The puzzle input {} is not valid UTF-8", file_path))]
    InputEncodingError {
        file_path: String,
        source: FromUtf8Error,
    },
    #[snafu(display("Failed to solve puzzle '{}'", puzzle))]
    PuzzleError {
        puzzle: String,
        source: PuzzleError,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::data::PuzzleKind;
    use std::path::PathBuf;
    use tempfile::TempDir;

    const TRANSCRIPT: &str = "$ cd /\n$ ls\n100 a.txt\ndir d\n$ cd d\n$ ls\n200 b.txt\n";

    fn runtime_config(dir: &TempDir, puzzle: PuzzleKind) -> RuntimeConfig {
        RuntimeConfig {
            puzzle,
            input: PathBuf::from("input.txt"),
            root: dir.path().to_path_buf(),
        }
    }

    #[compio::test]
    async fn solves_input_from_root() {
        let dir = TempDir::new().expect("Failed to create temp dir");
        std::fs::write(dir.path().join("input.txt"), TRANSCRIPT).expect("Failed to write input");

        let answers = Application::solve(&runtime_config(&dir, PuzzleKind::DiskUsage))
            .await
            .unwrap();
        assert_eq!(answers, Answers::new(500, 200));
    }

    #[compio::test]
    async fn config_file_changes_the_answers() {
        let dir = TempDir::new().expect("Failed to create temp dir");
        std::fs::write(dir.path().join("input.txt"), TRANSCRIPT).expect("Failed to write input");
        std::fs::write(
            dir.path().join("puzzles.yaml"),
            "disk_usage:\n  small_directory_threshold: 250\n  disk_capacity: 1000\n  needed_free_space: 850\n",
        )
        .expect("Failed to write config");

        let answers = Application::solve(&runtime_config(&dir, PuzzleKind::DiskUsage))
            .await
            .unwrap();
        assert_eq!(answers, Answers::new(200, 200));
    }

    #[compio::test]
    async fn missing_input_is_reported() {
        let dir = TempDir::new().expect("Failed to create temp dir");
        let result = Application::solve(&runtime_config(&dir, PuzzleKind::StreamMarker)).await;
        assert!(matches!(result, Err(ApplicationError::InputReadError { .. })));
    }

    #[compio::test]
    async fn puzzle_failures_name_the_puzzle() {
        let dir = TempDir::new().expect("Failed to create temp dir");
        std::fs::write(dir.path().join("input.txt"), "$ cd ..\n").expect("Failed to write input");

        let result = Application::solve(&runtime_config(&dir, PuzzleKind::DiskUsage)).await;
        match result {
            Err(ApplicationError::PuzzleError { puzzle, .. }) => assert_eq!(puzzle, "disk-usage"),
            other => panic!("expected a puzzle error, got {other:?}"),
        }
    }
}
