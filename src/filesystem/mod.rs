//! Directory tree reconstruction from a terminal transcript.
//!
//! Raw transcript text is turned into [`Action`]s by [`parse_transcript`], replayed into a
//! [`DirTree`] by [`replay`], and then inspected with the read-only queries of [`queries`].

mod builder;
pub mod queries;
mod transcript;
mod tree;

pub use builder::{NavigationError, apply, replay};
pub use transcript::{Action, Entry, Listing, parse_transcript};
pub use tree::{DirId, DirTree, Node};
