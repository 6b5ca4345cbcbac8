//! Entry formatting and display
//!
//! Formatters consume entries as they come off the stream:
//! - `listing` - plain paths, or long listings with colors
//! - `json` - one JSON object per line
//! - `config` - output configuration
//! - `utils` - size and time formatting

mod config;
mod json;
mod listing;
mod utils;

use std::io;

use crate::walker::{Entry, WalkSummary};

pub use config::OutputConfig;
pub use json::{EntryRecord, JsonLinesFormatter};
pub use listing::ListFormatter;
pub use utils::{format_mtime, format_size, long_columns};

/// Receives entries in walk order.
pub trait EntryOutput {
    fn output_entry(&mut self, entry: &Entry) -> io::Result<()>;

    fn finish(&mut self, summary: &WalkSummary) -> io::Result<()>;
}
