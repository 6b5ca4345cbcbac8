//! Root resolution and the pre-order traversal run by the producer thread.

use std::ffi::OsString;
use std::fs;
use std::io;
use std::path::{Component, Path, PathBuf};
use std::time::Instant;

use crossbeam_channel::{Receiver, Sender, at, never, select};
use log::{debug, trace};

use crate::cancel::CancelToken;
use crate::error::{EntryError, EntryOp, WalkError};

use super::config::WalkerConfig;
use super::entry::{Entry, FileType};
use super::filter::EntryFilter;

/// What the root path turned out to be after following symlinks.
#[derive(Debug)]
pub enum RootKind {
    /// Anything that is not a directory. Walked as a single entry.
    File {
        full_path: PathBuf,
        name: String,
        metadata: fs::Metadata,
    },
    Directory {
        full_path: PathBuf,
        metadata: fs::Metadata,
    },
}

/// Stat the root, following a symlink at the root only.
pub fn resolve_root(root: &Path) -> Result<RootKind, WalkError> {
    let root_error = |source: io::Error| WalkError::Root {
        path: root.to_path_buf(),
        source,
    };

    let joined = if root.is_absolute() {
        root.to_path_buf()
    } else {
        std::env::current_dir().map_err(root_error)?.join(root)
    };
    let absolute: PathBuf = joined
        .components()
        .filter(|c| !matches!(c, Component::CurDir))
        .collect();

    let metadata = fs::metadata(&absolute).map_err(root_error)?;
    let is_link = fs::symlink_metadata(&absolute)
        .map(|m| m.file_type().is_symlink())
        .unwrap_or(false);
    let full_path = if is_link {
        fs::canonicalize(&absolute).map_err(root_error)?
    } else {
        absolute
    };

    if metadata.is_dir() {
        debug!("walking directory {}", full_path.display());
        Ok(RootKind::Directory {
            full_path,
            metadata,
        })
    } else {
        // Name the entry after what the caller asked for, not the link target.
        let name = root
            .file_name()
            .or_else(|| full_path.file_name())
            .map(|s| s.to_string_lossy().to_string())
            .unwrap_or_else(|| ".".to_string());
        debug!("walking single file {}", full_path.display());
        Ok(RootKind::File {
            full_path,
            name,
            metadata,
        })
    }
}

/// Counters reported once the producer finishes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WalkSummary {
    /// Entries handed to the consumer, including error entries.
    pub emitted: usize,
    /// Entries carrying an error.
    pub errors: usize,
    /// Directories pruned by skip patterns or pseudo-filesystem rules.
    pub pruned: usize,
    /// True if the walk stopped early: cancellation, deadline, or a dropped stream.
    pub cancelled: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Flow {
    Continue,
    Stop,
}

/// Producer side of a walk. Owns everything it needs so it can move into
/// its own thread.
pub struct Traversal {
    filter: EntryFilter,
    max_depth: Option<usize>,
    skip_root: bool,
    cancel: CancelToken,
    deadline: Receiver<Instant>,
    tx: Sender<Entry>,
    summary: WalkSummary,
}

impl Traversal {
    pub fn new(
        filter: EntryFilter,
        config: &WalkerConfig,
        cancel: CancelToken,
        tx: Sender<Entry>,
    ) -> Self {
        let deadline = cancel.deadline().map(at).unwrap_or_else(never);
        Self {
            filter,
            max_depth: config.effective_max_depth(),
            skip_root: config.skip_root,
            cancel,
            deadline,
            tx,
            summary: WalkSummary::default(),
        }
    }

    /// Walk from `root` until done or cancelled. Dropping `self` at the end
    /// closes the stream.
    pub fn run(mut self, root: RootKind) -> WalkSummary {
        let flow = match root {
            RootKind::File {
                full_path,
                name,
                metadata,
            } => self.emit(Entry::new(name, full_path, metadata, 0)),
            RootKind::Directory {
                full_path,
                metadata,
            } => self.visit_dir(&full_path, ".", metadata, 0),
        };

        if flow == Flow::Stop {
            self.summary.cancelled = true;
            debug!("walk stopped early after {} entries", self.summary.emitted);
        } else {
            debug!(
                "walk finished: {} entries, {} errors, {} pruned",
                self.summary.emitted, self.summary.errors, self.summary.pruned
            );
        }
        self.summary
    }

    /// Check if children of a directory at `depth` are within the depth limit.
    fn can_descend(&self, depth: usize) -> bool {
        self.max_depth.is_none_or(|max| depth < max)
    }

    fn visit_dir(&mut self, path: &Path, rel_path: &str, metadata: fs::Metadata, depth: usize) -> Flow {
        if self.cancel.is_cancelled() {
            return Flow::Stop;
        }

        let suppressed = self.skip_root && depth == 0;
        if !suppressed && self.filter.should_emit(rel_path, FileType::Directory) {
            let entry = Entry::new(rel_path.to_string(), path.to_path_buf(), metadata.clone(), depth);
            if self.emit(entry) == Flow::Stop {
                return Flow::Stop;
            }
        }

        if !self.can_descend(depth) {
            return Flow::Continue;
        }
        if self.cancel.is_cancelled() {
            return Flow::Stop;
        }

        trace!("entering directory {}", path.display());
        let names = match read_sorted(path) {
            Ok(names) => names,
            Err(e) => {
                let error = EntryError::new(EntryOp::ReadDir, e);
                return self.emit_error(rel_path.to_string(), path.to_path_buf(), Some(metadata), error, depth);
            }
        };

        for os_name in names {
            // The lossy name is for display and matching only; the real name
            // addresses the file.
            let name = os_name.to_string_lossy().to_string();
            let child_rel = join_rel(rel_path, &name);
            let child_path = path.join(&os_name);
            let child_depth = depth + 1;

            let flow = match fs::symlink_metadata(&child_path) {
                Err(e) => {
                    let error = EntryError::new(EntryOp::Stat, e);
                    self.emit_error(child_rel, child_path, None, error, child_depth)
                }
                Ok(meta) if meta.is_dir() => {
                    if self.filter.should_prune(&child_rel, &name) {
                        trace!("pruning {}", child_rel);
                        self.summary.pruned += 1;
                        continue;
                    }
                    self.visit_dir(&child_path, &child_rel, meta, child_depth)
                }
                Ok(meta) => self.visit_leaf(child_path, child_rel, meta, child_depth),
            };

            if flow == Flow::Stop {
                return Flow::Stop;
            }
        }

        Flow::Continue
    }

    fn visit_leaf(&mut self, path: PathBuf, rel_path: String, metadata: fs::Metadata, depth: usize) -> Flow {
        let file_type = FileType::from_std(metadata.file_type());
        if !self.filter.should_emit(&rel_path, file_type) {
            return Flow::Continue;
        }

        let link = if file_type == FileType::Symlink {
            match fs::read_link(&path) {
                Ok(target) => Some(target.to_string_lossy().to_string()),
                Err(e) => {
                    let error = EntryError::new(EntryOp::ReadLink, e);
                    return self.emit_error(rel_path, path, Some(metadata), error, depth);
                }
            }
        } else {
            None
        };

        let mut entry = Entry::new(rel_path, path, metadata, depth);
        entry.link = link;
        self.emit(entry)
    }

    fn emit_error(
        &mut self,
        rel_path: String,
        path: PathBuf,
        metadata: Option<fs::Metadata>,
        error: EntryError,
        depth: usize,
    ) -> Flow {
        debug!("{}: {}", path.display(), error);
        self.summary.errors += 1;
        self.emit(Entry::failed(rel_path, path, metadata, error, depth))
    }

    /// Hand an entry to the consumer, blocking while the buffer is full.
    ///
    /// Returns `Stop` on cancellation, deadline expiry, or if the consumer
    /// dropped the stream.
    fn emit(&mut self, entry: Entry) -> Flow {
        if self.cancel.is_cancelled() {
            return Flow::Stop;
        }

        let sent = select! {
            send(self.tx, entry) -> res => {
                if res.is_err() {
                    debug!("consumer went away, stopping walk");
                }
                res.is_ok()
            }
            recv(self.cancel.signal()) -> _ => false,
            recv(self.deadline) -> _ => false,
        };

        if sent {
            self.summary.emitted += 1;
            Flow::Continue
        } else {
            Flow::Stop
        }
    }
}

/// Read, and sort by name, the entries of a directory.
fn read_sorted(path: &Path) -> io::Result<Vec<OsString>> {
    let mut names = fs::read_dir(path)?
        .map(|entry| entry.map(|e| e.file_name()))
        .collect::<io::Result<Vec<_>>>()?;
    names.sort();
    Ok(names)
}

/// Join a child name onto a relative path, without a leading "./".
fn join_rel(parent: &str, name: &str) -> String {
    if parent == "." {
        name.to_string()
    } else {
        format!("{}/{}", parent, name)
    }
}
