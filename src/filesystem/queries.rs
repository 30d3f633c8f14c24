//! Read-only aggregate queries over a finished [`DirTree`].
//!
//! Each query is one post-order walk returning, for every directory, the total size of its
//! subtree together with the query's running accumulator.

use crate::filesystem::tree::{DirId, DirTree, Node};

/// Sum of the total sizes of all directories whose total is at most `threshold`.
///
/// Nested directories are counted once for themselves and again inside every qualifying
/// ancestor. Sizes saturate at `u64::MAX`.
pub fn sum_small_directories(tree: &DirTree, threshold: u64) -> u64 {
    total_and_small_sum(tree, DirTree::ROOT, threshold).1
}

fn total_and_small_sum(tree: &DirTree, dir: DirId, threshold: u64) -> (u64, u64) {
    let (total, small_sum) = tree
        .children(dir)
        .fold((0u64, 0u64), |(total, small_sum), (_, node)| match node {
            Node::File { size } => (total.saturating_add(size), small_sum),
            Node::Directory(child) => {
                let (child_total, child_sum) = total_and_small_sum(tree, child, threshold);
                (
                    total.saturating_add(child_total),
                    small_sum.saturating_add(child_sum),
                )
            }
        });

    if total <= threshold {
        (total, small_sum.saturating_add(total))
    } else {
        (total, small_sum)
    }
}

/// Total size of the smallest directory whose total is at least `target`, or `None` when
/// not even the root is that large.
pub fn smallest_directory_at_least(tree: &DirTree, target: u64) -> Option<u64> {
    total_and_smallest_at_least(tree, DirTree::ROOT, target).1
}

fn total_and_smallest_at_least(tree: &DirTree, dir: DirId, target: u64) -> (u64, Option<u64>) {
    let (total, best) = tree
        .children(dir)
        .fold((0u64, None), |(total, best), (_, node)| match node {
            Node::File { size } => (total.saturating_add(size), best),
            Node::Directory(child) => {
                let (child_total, child_best) = total_and_smallest_at_least(tree, child, target);
                (total.saturating_add(child_total), smaller(best, child_best))
            }
        });

    let own = (total >= target).then_some(total);
    (total, smaller(best, own))
}

fn smaller(a: Option<u64>, b: Option<u64>) -> Option<u64> {
    match (a, b) {
        (Some(a), Some(b)) => Some(a.min(b)),
        (a, None) => a,
        (None, b) => b,
    }
}

/// How much has to be deleted so that `needed_free` bytes are available on a disk of
/// `disk_capacity` bytes with `used` bytes taken, i.e. `used - (disk_capacity - needed_free)`
/// clamped at zero.
pub fn space_to_free(used: u64, disk_capacity: u64, needed_free: u64) -> u64 {
    match used.checked_sub(disk_capacity) {
        Some(overflowing) => overflowing.saturating_add(needed_free),
        None => needed_free.saturating_sub(disk_capacity - used),
    }
}
