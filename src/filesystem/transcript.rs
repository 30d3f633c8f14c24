use hashlink::LinkedHashMap;
use once_cell::sync::Lazy;
use regex::Regex;
use tracing::{debug, warn};

static CHANGE_DIRECTORY: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\$ cd (?<name>.+)$").expect("cd pattern is valid"));
static LIST_DIRECTORY: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\$ ls$").expect("ls pattern is valid"));
static LISTED_DIRECTORY: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^dir (?<name>.+)$").expect("dir pattern is valid"));
static LISTED_FILE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(?<size>\d+) (?<name>.+)$").expect("file pattern is valid"));

/// One entry of an `ls` output. Listed directories carry no parent until replayed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Entry {
    Directory,
    File { size: u64 },
}

/// The entries of a single `ls` run, keyed by name in output order.
pub type Listing = LinkedHashMap<String, Entry>;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    ChangeDirectory(String),
    ListDirectory(Listing),
}

#[derive(Debug, PartialEq, Eq)]
enum Line<'a> {
    ChangeDirectory(&'a str),
    ListDirectory,
    Listed(&'a str, Entry),
    Unrecognized,
}

impl<'a> Line<'a> {
    fn classify(line: &'a str) -> Self {
        if let Some(caps) = CHANGE_DIRECTORY.captures(line) {
            return Line::ChangeDirectory(caps.name("name").map_or("", |m| m.as_str()));
        }
        if LIST_DIRECTORY.is_match(line) {
            return Line::ListDirectory;
        }
        if let Some(caps) = LISTED_DIRECTORY.captures(line) {
            return Line::Listed(
                caps.name("name").map_or("", |m| m.as_str()),
                Entry::Directory,
            );
        }
        if let Some(caps) = LISTED_FILE.captures(line) {
            let name = caps.name("name").map_or("", |m| m.as_str());
            let size = caps.name("size").map_or("", |m| m.as_str());
            return match size.parse::<u64>() {
                Ok(size) => Line::Listed(name, Entry::File { size }),
                Err(e) => {
                    warn!("Ignoring file '{}' with unusable size '{}': {}", name, size, e);
                    Line::Unrecognized
                }
            };
        }
        Line::Unrecognized
    }
}

/// Turns a terminal transcript into the ordered actions it describes.
///
/// Consecutive listing lines after a `$ ls` are gathered into one [`Action::ListDirectory`],
/// emitted as soon as any other line shows up or the input ends. Lines of an unknown shape
/// are skipped.
pub fn parse_transcript(input: &str) -> Vec<Action> {
    let mut actions = Vec::new();
    let mut pending: Option<Listing> = None;

    for (index, raw) in input.lines().enumerate() {
        let line = Line::classify(raw.trim_end());

        if !matches!(line, Line::Listed(..)) {
            if let Some(listing) = pending.take() {
                actions.push(Action::ListDirectory(listing));
            }
        }

        match line {
            Line::ChangeDirectory(name) => actions.push(Action::ChangeDirectory(name.to_string())),
            Line::ListDirectory => pending = Some(Listing::new()),
            Line::Listed(name, entry) => match pending.as_mut() {
                Some(listing) => {
                    listing.insert(name.to_string(), entry);
                }
                None => debug!("Line {}: listing entry outside of ls, skipping", index + 1),
            },
            Line::Unrecognized => debug!("Line {}: unrecognized, skipping: {:?}", index + 1, raw),
        }
    }

    if let Some(listing) = pending {
        actions.push(Action::ListDirectory(listing));
    }

    debug!("Parsed {} actions from transcript", actions.len());
    actions
}
