use snafu::Snafu;
use tracing::{debug, trace};

use crate::filesystem::transcript::Action;
use crate::filesystem::tree::{DirId, DirTree, Node};

const ROOT_PATH: &str = "/";
const BACK_PATH: &str = "..";

/// Applies a single action to `tree` with `cursor` as the current directory and returns
/// the current directory after the action.
pub fn apply(tree: &mut DirTree, cursor: DirId, action: Action) -> Result<DirId, NavigationError> {
    match action {
        Action::ChangeDirectory(name) => change_directory(tree, cursor, &name),
        Action::ListDirectory(listing) => {
            trace!(
                "Listing {} entries into {}",
                listing.len(),
                tree.path(cursor)
            );
            tree.attach_listing(cursor, listing);
            Ok(cursor)
        }
    }
}

fn change_directory(tree: &DirTree, cursor: DirId, name: &str) -> Result<DirId, NavigationError> {
    match name {
        ROOT_PATH => Ok(DirTree::ROOT),
        BACK_PATH => tree.parent(cursor).ok_or(NavigationError::AboveRoot),
        _ => match tree.child(cursor, name) {
            Some(Node::Directory(child)) => Ok(child),
            Some(Node::File { .. }) => Err(NavigationError::NotADirectory {
                name: name.to_string(),
                path: tree.path(cursor),
            }),
            None => Err(NavigationError::NotFound {
                name: name.to_string(),
                path: tree.path(cursor),
            }),
        },
    }
}

/// Rebuilds the directory tree by replaying `actions` in order, starting at the root.
pub fn replay(actions: impl IntoIterator<Item = Action>) -> Result<DirTree, NavigationError> {
    let mut tree = DirTree::new();
    let cursor = actions
        .into_iter()
        .try_fold(DirTree::ROOT, |cursor, action| {
            apply(&mut tree, cursor, action)
        })?;
    debug!(
        "Replay finished in {} with {} directories in the tree",
        tree.path(cursor),
        tree.directories().len()
    );
    Ok(tree)
}

#[derive(Debug, Snafu, PartialEq, Eq)]
pub enum NavigationError {
    #[snafu(display("Cannot cd ..; already at the root directory"))]
    AboveRoot,
    #[snafu(display("Cannot cd to '{}' in {}; not found", name, path))]
    NotFound { name: String, path: String },
    #[snafu(display(
        "Cannot cd to '{}' in {}; it's a file (you can only cd to directories)",
        name,
        path
    ))]
    NotADirectory { name: String, path: String },
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filesystem::transcript::{Entry, Listing, parse_transcript};

    const SCENARIO: &str = "\
$ cd /
$ ls
100 a.txt
dir d
$ cd d
$ ls
200 b.txt
";

    fn dir(tree: &DirTree, parent: DirId, name: &str) -> DirId {
        match tree.child(parent, name) {
            Some(Node::Directory(id)) => id,
            other => panic!("expected directory '{name}', got {other:?}"),
        }
    }

    #[test]
    fn builds_tree_from_transcript() {
        let tree = replay(parse_transcript(SCENARIO)).unwrap();
        let d = dir(&tree, DirTree::ROOT, "d");

        assert_eq!(tree.total_size(DirTree::ROOT), 300);
        assert_eq!(tree.total_size(d), 200);
        assert_eq!(tree.parent(d), Some(DirTree::ROOT));
    }

    #[test]
    fn cd_up_from_root_fails() {
        let result = replay(parse_transcript("$ cd /\n$ cd ..\n"));
        assert_eq!(result.unwrap_err(), NavigationError::AboveRoot);
    }

    #[test]
    fn cd_to_missing_child_fails() {
        let result = replay(parse_transcript("$ ls\ndir a\n$ cd b\n"));
        assert_eq!(
            result.unwrap_err(),
            NavigationError::NotFound {
                name: "b".into(),
                path: "/".into()
            }
        );
    }

    #[test]
    fn cd_into_file_fails() {
        let result = replay(parse_transcript("$ ls\ndir a\n$ cd a\n$ ls\n10 f\n$ cd f\n"));
        assert_eq!(
            result.unwrap_err(),
            NavigationError::NotADirectory {
                name: "f".into(),
                path: "/a".into()
            }
        );
    }

    #[test]
    fn cd_before_any_listing_fails() {
        let result = replay(parse_transcript("$ cd a\n"));
        assert!(matches!(result, Err(NavigationError::NotFound { .. })));
    }

    #[test]
    fn cd_root_and_back_navigate() {
        let mut tree = DirTree::new();
        let cursor = apply(
            &mut tree,
            DirTree::ROOT,
            Action::ListDirectory(Listing::from_iter([("x".to_string(), Entry::Directory)])),
        )
        .unwrap();
        let x = apply(&mut tree, cursor, Action::ChangeDirectory("x".into())).unwrap();
        assert_eq!(tree.path(x), "/x");

        let up = apply(&mut tree, x, Action::ChangeDirectory("..".into())).unwrap();
        assert_eq!(up, DirTree::ROOT);

        let root = apply(&mut tree, x, Action::ChangeDirectory("/".into())).unwrap();
        assert_eq!(root, DirTree::ROOT);
    }

    #[test]
    fn relisting_a_directory_replaces_its_children() {
        let first = replay(parse_transcript(SCENARIO)).unwrap();
        let before: Vec<String> = first
            .children(DirTree::ROOT)
            .map(|(name, _)| name.to_string())
            .collect();
        assert_eq!(before, vec!["a.txt", "d"]);

        let transcript = format!("{SCENARIO}$ cd /\n$ ls\n50 c.txt\ndir e\n");
        let tree = replay(parse_transcript(&transcript)).unwrap();
        let after: Vec<String> = tree
            .children(DirTree::ROOT)
            .map(|(name, _)| name.to_string())
            .collect();

        assert_eq!(after, vec!["c.txt", "e"]);
        assert_eq!(tree.child(DirTree::ROOT, "d"), None);
        assert_eq!(tree.total_size(DirTree::ROOT), 50);
    }

    #[test]
    fn error_messages_name_the_target() {
        let error = NavigationError::NotADirectory {
            name: "f".into(),
            path: "/a".into(),
        };
        let message = error.to_string();
        assert!(message.contains("'f'"));
        assert!(message.contains("/a"));
        assert!(message.contains("it's a file"));
    }
}
