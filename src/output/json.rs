//! JSON lines output formatting

use std::io::{self, Write};

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::walker::{Entry, FileType, WalkSummary};

use super::EntryOutput;

/// Serializable view of an [`Entry`].
#[derive(Debug, Serialize)]
pub struct EntryRecord<'a> {
    pub path: &'a str,
    pub full_path: String,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub file_type: Option<FileType>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mode: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub modified: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub link: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl<'a> From<&'a Entry> for EntryRecord<'a> {
    fn from(entry: &'a Entry) -> Self {
        Self {
            path: entry.rel_path(),
            full_path: entry.full_path().to_string_lossy().to_string(),
            file_type: entry.file_type(),
            mode: entry.mode(),
            size: entry.size(),
            modified: entry.modified().map(DateTime::<Utc>::from),
            link: entry.link(),
            error: entry.error().map(|e| e.to_string()),
        }
    }
}

/// Writes one JSON object per entry, error entries included.
pub struct JsonLinesFormatter<W: Write> {
    out: W,
}

impl JsonLinesFormatter<io::Stdout> {
    pub fn stdout() -> Self {
        Self::new(io::stdout())
    }
}

impl<W: Write> JsonLinesFormatter<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> EntryOutput for JsonLinesFormatter<W> {
    fn output_entry(&mut self, entry: &Entry) -> io::Result<()> {
        let record = EntryRecord::from(entry);
        serde_json::to_writer(&mut self.out, &record).map_err(io::Error::other)?;
        writeln!(self.out)
    }

    fn finish(&mut self, _summary: &WalkSummary) -> io::Result<()> {
        self.out.flush()
    }
}
