//! Entries produced by a walk

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::SystemTime;

use serde::{Deserialize, Serialize};

use crate::error::EntryError;

/// Kind of filesystem object, as used by the type filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FileType {
    Regular,
    Directory,
    Symlink,
    /// Devices, fifos and sockets.
    Other,
}

impl FileType {
    pub fn from_std(ft: fs::FileType) -> Self {
        if ft.is_symlink() {
            FileType::Symlink
        } else if ft.is_dir() {
            FileType::Directory
        } else if ft.is_file() {
            FileType::Regular
        } else {
            FileType::Other
        }
    }

    /// Single-letter tag used in long listings.
    pub fn letter(self) -> char {
        match self {
            FileType::Regular => '-',
            FileType::Directory => 'd',
            FileType::Symlink => 'l',
            FileType::Other => 'o',
        }
    }
}

impl fmt::Display for FileType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            FileType::Regular => "regular",
            FileType::Directory => "directory",
            FileType::Symlink => "symlink",
            FileType::Other => "other",
        };
        f.write_str(s)
    }
}

impl FromStr for FileType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "f" | "file" | "regular" => Ok(FileType::Regular),
            "d" | "dir" | "directory" => Ok(FileType::Directory),
            "l" | "link" | "symlink" => Ok(FileType::Symlink),
            "o" | "other" => Ok(FileType::Other),
            other => Err(format!("unknown file type: {}", other)),
        }
    }
}

/// One filesystem object surfaced by the walker.
///
/// Either carries metadata, or an [`EntryError`] explaining why it could not
/// be collected. Entries with an error may still have metadata (a directory
/// that could be stat'ed but not listed).
#[derive(Debug)]
pub struct Entry {
    pub(crate) rel_path: String,
    pub(crate) full_path: PathBuf,
    pub(crate) metadata: Option<fs::Metadata>,
    pub(crate) link: Option<String>,
    pub(crate) error: Option<EntryError>,
    pub(crate) depth: usize,
}

impl Entry {
    pub(crate) fn new(
        rel_path: String,
        full_path: PathBuf,
        metadata: fs::Metadata,
        depth: usize,
    ) -> Self {
        Self {
            rel_path,
            full_path,
            metadata: Some(metadata),
            link: None,
            error: None,
            depth,
        }
    }

    pub(crate) fn failed(
        rel_path: String,
        full_path: PathBuf,
        metadata: Option<fs::Metadata>,
        error: EntryError,
        depth: usize,
    ) -> Self {
        Self {
            rel_path,
            full_path,
            metadata,
            link: None,
            error: Some(error),
            depth,
        }
    }

    /// Path relative to the walk root, `/`-separated, `.` for the root itself.
    pub fn rel_path(&self) -> &str {
        &self.rel_path
    }

    pub fn full_path(&self) -> &Path {
        &self.full_path
    }

    pub fn metadata(&self) -> Option<&fs::Metadata> {
        self.metadata.as_ref()
    }

    pub fn file_type(&self) -> Option<FileType> {
        self.metadata.as_ref().map(|m| FileType::from_std(m.file_type()))
    }

    /// Raw symlink target, unresolved.
    pub fn link(&self) -> Option<&str> {
        self.link.as_deref()
    }

    pub fn error(&self) -> Option<&EntryError> {
        self.error.as_ref()
    }

    pub fn is_ok(&self) -> bool {
        self.error.is_none()
    }

    pub fn is_dir(&self) -> bool {
        self.file_type() == Some(FileType::Directory)
    }

    /// Depth below the root; the root is 0.
    pub fn depth(&self) -> usize {
        self.depth
    }

    pub fn size(&self) -> Option<u64> {
        self.metadata.as_ref().map(|m| m.len())
    }

    pub fn modified(&self) -> Option<SystemTime> {
        self.metadata.as_ref().and_then(|m| m.modified().ok())
    }

    /// Permission bits (unix only).
    #[cfg(unix)]
    pub fn mode(&self) -> Option<u32> {
        use std::os::unix::fs::PermissionsExt;
        self.metadata
            .as_ref()
            .map(|m| m.permissions().mode() & 0o7777)
    }

    #[cfg(not(unix))]
    pub fn mode(&self) -> Option<u32> {
        None
    }
}
