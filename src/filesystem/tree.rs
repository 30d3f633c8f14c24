use derive_more::Display;
use hashlink::LinkedHashMap;

use crate::filesystem::transcript::{Entry, Listing};

/// Stable handle of a directory inside a [`DirTree`] arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display)]
#[display("dir#{_0}")]
pub struct DirId(usize);

/// A child of a directory: either a sized file or another directory of the same tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Node {
    File { size: u64 },
    Directory(DirId),
}

#[derive(Debug, Clone)]
struct Directory {
    name: String,
    parent: Option<DirId>,
    children: LinkedHashMap<String, Node>,
}

impl Directory {
    fn empty(name: String, parent: Option<DirId>) -> Self {
        Self {
            name,
            parent,
            children: LinkedHashMap::new(),
        }
    }
}

/// Directory tree reconstructed from a terminal transcript.
///
/// Directories live in an arena and are addressed by [`DirId`]. A directory owns its
/// children through its child mapping, while the parent link is only a handle used to
/// walk upwards. Sizes are never stored on directories; they are derived on demand.
#[derive(Debug, Clone)]
pub struct DirTree {
    dirs: Vec<Directory>,
}

impl Default for DirTree {
    fn default() -> Self {
        Self::new()
    }
}

impl DirTree {
    pub const ROOT: DirId = DirId(0);

    /// Creates a tree holding only an empty root directory.
    pub fn new() -> Self {
        Self {
            dirs: vec![Directory::empty(String::new(), None)],
        }
    }

    pub fn parent(&self, id: DirId) -> Option<DirId> {
        self.dirs[id.0].parent
    }

    pub fn children(&self, id: DirId) -> impl Iterator<Item = (&str, Node)> {
        self.dirs[id.0]
            .children
            .iter()
            .map(|(name, node)| (name.as_str(), *node))
    }

    pub fn child(&self, id: DirId, name: &str) -> Option<Node> {
        self.dirs[id.0].children.get(name).copied()
    }

    /// Replaces the children of `id` with the entries of `listing`.
    ///
    /// Every listed directory gets a fresh, empty arena slot whose parent is `id`. Whatever
    /// `id` held before is detached from the tree, so listing a directory twice keeps only
    /// the last listing.
    pub fn attach_listing(&mut self, id: DirId, listing: Listing) {
        let mut children = LinkedHashMap::with_capacity(listing.len());
        for (name, entry) in listing {
            let node = match entry {
                Entry::File { size } => Node::File { size },
                Entry::Directory => {
                    let child = DirId(self.dirs.len());
                    self.dirs.push(Directory::empty(name.clone(), Some(id)));
                    Node::Directory(child)
                }
            };
            children.insert(name, node);
        }
        self.dirs[id.0].children = children;
    }

    /// Absolute slash-separated path of a directory, `/` for the root.
    pub fn path(&self, id: DirId) -> String {
        let mut names = Vec::new();
        let mut current = Some(id);
        while let Some(dir) = current {
            let record = &self.dirs[dir.0];
            if record.parent.is_some() {
                names.push(record.name.as_str());
            }
            current = record.parent;
        }
        names.reverse();
        format!("/{}", names.join("/"))
    }

    /// Sum of every file size below `id`, computed by a full walk of its subtree. Saturates
    /// at `u64::MAX`.
    pub fn total_size(&self, id: DirId) -> u64 {
        self.children(id)
            .map(|(_, node)| match node {
                Node::File { size } => size,
                Node::Directory(child) => self.total_size(child),
            })
            .fold(0, u64::saturating_add)
    }

    /// Every directory reachable from the root, in pre-order.
    pub fn directories(&self) -> Vec<DirId> {
        let mut found = Vec::new();
        let mut stack = vec![Self::ROOT];
        while let Some(dir) = stack.pop() {
            found.push(dir);
            let subdirs = self.children(dir).filter_map(|(_, node)| match node {
                Node::Directory(child) => Some(child),
                Node::File { .. } => None,
            });
            let start = stack.len();
            stack.extend(subdirs);
            stack[start..].reverse();
        }
        found
    }
}
