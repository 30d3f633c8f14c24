use std::{
    borrow::Cow,
    io::ErrorKind,
    num::NonZeroUsize,
    path::{Path, PathBuf},
    string::FromUtf8Error,
};

use compio::fs;
use hashlink::LinkedHashMap;
use saphyr::{LoadableYamlNode, Scalar, Yaml};
use snafu::prelude::*;
use tracing::{debug, info, warn};

use crate::application::data::PuzzleKind;
use crate::puzzles::{CrateStacks, DiskUsage, Puzzle, StreamMarker};

const CONFIG_FILE_NAME: &str = "puzzles.yaml";

const DISK_USAGE: &str = "disk_usage";
const SMALL_DIRECTORY_THRESHOLD: &str = "small_directory_threshold";
const DISK_CAPACITY: &str = "disk_capacity";
const NEEDED_FREE_SPACE: &str = "needed_free_space";

const STREAM_MARKER: &str = "stream_marker";
const PACKET_MARKER_LENGTH: &str = "packet_marker_length";
const MESSAGE_MARKER_LENGTH: &str = "message_marker_length";

fn get_config_file_path(root: &Path) -> PathBuf {
    root.join(CONFIG_FILE_NAME)
}

fn yaml_key(name: &'static str) -> Yaml<'static> {
    Yaml::Value(Scalar::String(Cow::Borrowed(name)))
}

/// Tunable constants of the puzzles, read from an optional `puzzles.yaml`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PuzzleConfig {
    pub disk_usage: DiskUsage,
    pub stream_marker: StreamMarker,
}

impl PuzzleConfig {
    pub async fn read(root: &Path) -> Result<Self, PuzzleConfigError> {
        Self::from_path(get_config_file_path(root)).await
    }

    /// Loads the config at `path`, falling back to the defaults when the file does not exist.
    pub async fn from_path(path: PathBuf) -> Result<Self, PuzzleConfigError> {
        debug!("Opening config file: {}", path.display());
        let bytes = match fs::read(&path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                info!("No config file at {}, using defaults", path.display());
                return Ok(Self::default());
            }
            Err(e) => {
                return Err(e).context(ReadSnafu {
                    file_path: path.display().to_string(),
                });
            }
        };
        debug!("Successfully read config file: {} bytes", bytes.len());

        let contents = String::from_utf8(bytes).context(EncodingSnafu {
            file_path: path.display().to_string(),
        })?;
        contents.as_str().try_into()
    }

    /// The puzzle of the given kind, configured from this config.
    pub fn puzzle(&self, kind: PuzzleKind) -> Puzzle {
        match kind {
            PuzzleKind::StreamMarker => Puzzle::StreamMarker(self.stream_marker.clone()),
            PuzzleKind::DiskUsage => Puzzle::DiskUsage(self.disk_usage.clone()),
            PuzzleKind::CrateStacks => Puzzle::CrateStacks(CrateStacks),
        }
    }

    fn parse_disk_usage(
        section: &LinkedHashMap<Yaml, Yaml>,
    ) -> Result<DiskUsage, PuzzleConfigError> {
        let defaults = DiskUsage::default();
        warn_unknown_keys(
            DISK_USAGE,
            section,
            &[SMALL_DIRECTORY_THRESHOLD, DISK_CAPACITY, NEEDED_FREE_SPACE],
        );

        Ok(DiskUsage {
            small_directory_threshold: read_u64(
                section,
                DISK_USAGE,
                SMALL_DIRECTORY_THRESHOLD,
                defaults.small_directory_threshold,
            )?,
            disk_capacity: read_u64(section, DISK_USAGE, DISK_CAPACITY, defaults.disk_capacity)?,
            needed_free_space: read_u64(
                section,
                DISK_USAGE,
                NEEDED_FREE_SPACE,
                defaults.needed_free_space,
            )?,
        })
    }

    fn parse_stream_marker(
        section: &LinkedHashMap<Yaml, Yaml>,
    ) -> Result<StreamMarker, PuzzleConfigError> {
        let defaults = StreamMarker::default();
        warn_unknown_keys(
            STREAM_MARKER,
            section,
            &[PACKET_MARKER_LENGTH, MESSAGE_MARKER_LENGTH],
        );

        Ok(StreamMarker {
            packet_marker_length: read_marker_length(
                section,
                PACKET_MARKER_LENGTH,
                defaults.packet_marker_length,
            )?,
            message_marker_length: read_marker_length(
                section,
                MESSAGE_MARKER_LENGTH,
                defaults.message_marker_length,
            )?,
        })
    }
}

fn section<'a, 'input>(
    top_level: &'a LinkedHashMap<Yaml<'input>, Yaml<'input>>,
    name: &'static str,
) -> Result<Option<&'a LinkedHashMap<Yaml<'input>, Yaml<'input>>>, PuzzleConfigError> {
    match top_level.get(&yaml_key(name)) {
        None | Some(Yaml::Value(Scalar::Null)) => Ok(None),
        Some(value) => value
            .as_mapping()
            .map(Some)
            .context(SectionNotMapSnafu { section: name }),
    }
}

fn read_u64(
    section: &LinkedHashMap<Yaml, Yaml>,
    section_name: &str,
    key: &'static str,
    default: u64,
) -> Result<u64, PuzzleConfigError> {
    let full_key = || format!("{section_name}.{key}");
    match section.get(&yaml_key(key)) {
        None | Some(Yaml::Value(Scalar::Null)) => Ok(default),
        Some(Yaml::Value(Scalar::Integer(value))) => {
            u64::try_from(*value).map_err(|_| PuzzleConfigError::NegativeValue {
                key: full_key(),
                value: *value,
            })
        }
        Some(other) => {
            debug!("Expected an integer for {}, got {:?}", full_key(), other);
            Err(PuzzleConfigError::NotAnInteger { key: full_key() })
        }
    }
}

fn read_marker_length(
    section: &LinkedHashMap<Yaml, Yaml>,
    key: &'static str,
    default: NonZeroUsize,
) -> Result<NonZeroUsize, PuzzleConfigError> {
    let value = read_u64(section, STREAM_MARKER, key, default.get() as u64)?;
    usize::try_from(value)
        .ok()
        .and_then(NonZeroUsize::new)
        .context(InvalidMarkerLengthSnafu {
            key: format!("{STREAM_MARKER}.{key}"),
            value,
        })
}

fn warn_unknown_keys(section_name: &str, section: &LinkedHashMap<Yaml, Yaml>, known: &[&str]) {
    for key in section.keys() {
        match key.as_str() {
            Some(name) if known.contains(&name) => {}
            _ => warn!("Ignoring unknown config key {:?} in {}", key, section_name),
        }
    }
}

impl TryFrom<&str> for PuzzleConfig {
    type Error = PuzzleConfigError;

    fn try_from(contents: &str) -> Result<Self, Self::Error> {
        let documents = Yaml::load_from_str(contents).context(ParseSnafu)?;
        let document = match documents.first() {
            None | Some(Yaml::Value(Scalar::Null)) => {
                debug!("Config file is empty, using defaults");
                return Ok(Self::default());
            }
            Some(document) => document,
        };

        let top_level = document.as_mapping().context(TopLevelNotMapSnafu)?;
        warn_unknown_keys("the config file", top_level, &[DISK_USAGE, STREAM_MARKER]);

        let disk_usage = match section(top_level, DISK_USAGE)? {
            Some(section) => Self::parse_disk_usage(section)?,
            None => DiskUsage::default(),
        };
        let stream_marker = match section(top_level, STREAM_MARKER)? {
            Some(section) => Self::parse_stream_marker(section)?,
            None => StreamMarker::default(),
        };

        Ok(PuzzleConfig {
            disk_usage,
            stream_marker,
        })
    }
}

#[derive(Debug, Snafu)]
pub enum PuzzleConfigError {
    #[snafu(display("Failed to read the config file: {}", file_path))]
    ReadError {
        file_path: String,
        source: std::io::Error,
    },
    #[snafu(display("The config file {} is not valid UTF-8", file_path))]
    EncodingError {
        file_path: String,
        source: FromUtf8Error,
    },
    #[snafu(display("Failed to parse the config file"))]
    ParseError { source: saphyr::ScanError },
    #[snafu(display("Top level of config should be a map"))]
    TopLevelNotMap,
    #[snafu(display("Section '{}' should be a map", section))]
    SectionNotMap { section: String },
    #[snafu(display("'{}' should be an integer", key))]
    NotAnInteger { key: String },
    #[snafu(display("'{}' cannot be negative, got {}", key, value))]
    NegativeValue { key: String, value: i64 },
    #[snafu(display("'{}' must be a positive marker length, got {}", key, value))]
    InvalidMarkerLength { key: String, value: u64 },
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::TempDir;

    #[compio::test]
    async fn missing_file_gives_defaults() {
        let dir = TempDir::new().expect("Failed to create temp dir");
        let config = PuzzleConfig::read(dir.path()).await.unwrap();
        assert_eq!(config, PuzzleConfig::default());
    }

    #[compio::test]
    async fn reads_config_from_root() {
        let dir = TempDir::new().expect("Failed to create temp dir");
        let mut file = std::fs::File::create(dir.path().join(CONFIG_FILE_NAME))
            .expect("Failed to create config file");
        writeln!(
            file,
            "disk_usage:\n  small_directory_threshold: 500\nstream_marker:\n  message_marker_length: 10"
        )
        .expect("Failed to write config file");

        let config = PuzzleConfig::read(dir.path()).await.unwrap();
        assert_eq!(config.disk_usage.small_directory_threshold, 500);
        assert_eq!(config.disk_usage.disk_capacity, 70_000_000);
        assert_eq!(config.stream_marker.packet_marker_length.get(), 4);
        assert_eq!(config.stream_marker.message_marker_length.get(), 10);
    }

    #[compio::test]
    async fn non_utf8_file_is_rejected() {
        let dir = TempDir::new().expect("Failed to create temp dir");
        std::fs::write(dir.path().join(CONFIG_FILE_NAME), [0xff, 0xfe, 0x00])
            .expect("Failed to write config file");

        let result = PuzzleConfig::read(dir.path()).await;
        assert!(matches!(result, Err(PuzzleConfigError::EncodingError { .. })));
    }

    #[test]
    fn empty_contents_give_defaults() {
        let config: PuzzleConfig = "".try_into().unwrap();
        assert_eq!(config, PuzzleConfig::default());
    }

    #[test]
    fn full_config_overrides_every_value() {
        let contents = r#"
disk_usage:
  small_directory_threshold: 1
  disk_capacity: 2
  needed_free_space: 3
stream_marker:
  packet_marker_length: 5
  message_marker_length: 6
"#;
        let config: PuzzleConfig = contents.try_into().unwrap();
        assert_eq!(
            config.disk_usage,
            DiskUsage {
                small_directory_threshold: 1,
                disk_capacity: 2,
                needed_free_space: 3,
            }
        );
        assert_eq!(config.stream_marker.packet_marker_length.get(), 5);
        assert_eq!(config.stream_marker.message_marker_length.get(), 6);
    }

    #[test]
    fn unknown_keys_are_ignored() {
        let contents = "crate_stacks:\n  anything: 1\ndisk_usage:\n  colour: blue\n";
        let config: PuzzleConfig = contents.try_into().unwrap();
        assert_eq!(config, PuzzleConfig::default());
    }

    #[test]
    fn invalid_yaml_is_rejected() {
        let result: Result<PuzzleConfig, _> = "invalid: yaml: content: [unclosed".try_into();
        assert!(matches!(result, Err(PuzzleConfigError::ParseError { .. })));
    }

    #[test]
    fn list_top_level_is_rejected() {
        let result: Result<PuzzleConfig, _> = "- item1\n- item2".try_into();
        assert!(matches!(result, Err(PuzzleConfigError::TopLevelNotMap)));
    }

    #[test]
    fn scalar_section_is_rejected() {
        let result: Result<PuzzleConfig, _> = "disk_usage: 12".try_into();
        assert!(matches!(
            result,
            Err(PuzzleConfigError::SectionNotMap { section }) if section == DISK_USAGE
        ));
    }

    #[test]
    fn string_value_is_rejected() {
        let result: Result<PuzzleConfig, _> =
            "disk_usage:\n  disk_capacity: plenty\n".try_into();
        assert!(matches!(
            result,
            Err(PuzzleConfigError::NotAnInteger { key }) if key == "disk_usage.disk_capacity"
        ));
    }

    #[test]
    fn negative_value_is_rejected() {
        let result: Result<PuzzleConfig, _> =
            "disk_usage:\n  needed_free_space: -5\n".try_into();
        assert!(matches!(
            result,
            Err(PuzzleConfigError::NegativeValue { value: -5, .. })
        ));
    }

    #[test]
    fn zero_marker_length_is_rejected() {
        let result: Result<PuzzleConfig, _> =
            "stream_marker:\n  packet_marker_length: 0\n".try_into();
        assert!(matches!(
            result,
            Err(PuzzleConfigError::InvalidMarkerLength { value: 0, .. })
        ));
    }

    #[test]
    fn puzzle_kind_selects_configured_puzzle() {
        let config: PuzzleConfig = "disk_usage:\n  disk_capacity: 9\n".try_into().unwrap();
        match config.puzzle(PuzzleKind::DiskUsage) {
            Puzzle::DiskUsage(puzzle) => assert_eq!(puzzle.disk_capacity, 9),
            other => panic!("expected disk usage puzzle, got {other:?}"),
        }
        assert!(matches!(
            config.puzzle(PuzzleKind::CrateStacks),
            Puzzle::CrateStacks(_)
        ));
    }
}
