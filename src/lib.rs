//! archwalk - A streaming, filterable directory walker for archive pipelines

pub mod cancel;
pub mod error;
pub mod output;
pub mod walker;

#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;

pub use cancel::CancelToken;
pub use error::{EntryError, EntryOp, WalkError};
pub use output::{EntryOutput, JsonLinesFormatter, ListFormatter, OutputConfig};
pub use walker::{Entry, EntryStream, FileType, WalkSummary, Walker, WalkerConfig, walk};
