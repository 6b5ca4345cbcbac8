//! Streaming directory walking
//!
//! A walk resolves its root synchronously, then traverses the tree on a
//! dedicated producer thread, sending [`Entry`] values over a bounded channel
//! to the [`EntryStream`] held by the caller.
//!
//! - `config` - [`WalkerConfig`] and its option methods
//! - `entry` - [`Entry`] and [`FileType`]
//! - `filter` - glob matching, pruning and emission filters
//! - `traversal` - root resolution and the pre-order traversal
//! - `streaming` - [`Walker`] and [`EntryStream`]
//!
//! Entries arrive in strict pre-order: a directory before anything inside it,
//! siblings sorted by name.

mod config;
mod entry;
mod filter;
mod streaming;
mod traversal;

pub use config::WalkerConfig;
pub use entry::{Entry, FileType};
pub use filter::{EntryFilter, PSEUDO_FS_NAMES, glob_match};
pub use streaming::{EntryStream, Walker, walk};
pub use traversal::WalkSummary;
