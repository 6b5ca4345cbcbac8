//! Walker - runs the traversal on its own thread and streams entries back

use std::path::Path;
use std::thread::{self, JoinHandle};

use crossbeam_channel::{Receiver, bounded};
use log::warn;

use crate::cancel::CancelToken;
use crate::error::WalkError;

use super::config::WalkerConfig;
use super::entry::Entry;
use super::filter::EntryFilter;
use super::traversal::{Traversal, WalkSummary, resolve_root};

/// Streaming directory walker.
///
/// The root is validated synchronously in [`walk`](Self::walk); everything
/// after that happens on a producer thread feeding a bounded channel.
#[derive(Debug, Clone, Default)]
pub struct Walker {
    config: WalkerConfig,
}

impl Walker {
    pub fn new(config: WalkerConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &WalkerConfig {
        &self.config
    }

    /// Start walking `root`.
    ///
    /// Fails only if a pattern is invalid or the root cannot be stat'ed.
    /// Every later failure is delivered on the stream as an entry error.
    pub fn walk<P: AsRef<Path>>(&self, cancel: &CancelToken, root: P) -> Result<EntryStream, WalkError> {
        let filter = EntryFilter::new(&self.config)?;
        let root = resolve_root(root.as_ref())?;

        let (tx, rx) = bounded(self.config.buffer_size.max(1));
        let traversal = Traversal::new(filter, &self.config, cancel.clone(), tx);
        let handle = thread::Builder::new()
            .name("archwalk-producer".to_string())
            .spawn(move || traversal.run(root))
            .map_err(WalkError::Spawn)?;

        Ok(EntryStream {
            rx,
            cancel: cancel.clone(),
            handle: Some(handle),
        })
    }
}

/// Start a walk with the given configuration.
pub fn walk<P: AsRef<Path>>(cancel: &CancelToken, root: P, config: WalkerConfig) -> Result<EntryStream, WalkError> {
    Walker::new(config).walk(cancel, root)
}

/// Consumer side of a walk: a finite, non-restartable sequence of entries.
///
/// Once the token is cancelled the stream yields nothing more, even if
/// entries are still buffered. Dropping the stream stops the producer at its
/// next send.
pub struct EntryStream {
    rx: Receiver<Entry>,
    cancel: CancelToken,
    handle: Option<JoinHandle<WalkSummary>>,
}

impl EntryStream {
    /// Stop consuming and wait for the producer to exit.
    pub fn finish(self) -> WalkSummary {
        let EntryStream { rx, handle, .. } = self;
        // Disconnect first so a producer blocked on a full buffer wakes up.
        drop(rx);
        match handle.map(JoinHandle::join) {
            Some(Ok(summary)) => summary,
            Some(Err(_)) => {
                warn!("walker thread panicked");
                WalkSummary::default()
            }
            None => WalkSummary::default(),
        }
    }
}

impl Iterator for EntryStream {
    type Item = Entry;

    fn next(&mut self) -> Option<Self::Item> {
        if self.cancel.is_cancelled() {
            return None;
        }
        let entry = self.rx.recv().ok()?;
        if self.cancel.is_cancelled() {
            return None;
        }
        Some(entry)
    }
}

impl std::fmt::Debug for EntryStream {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EntryStream")
            .field("buffered", &self.rx.len())
            .field("cancel", &self.cancel)
            .finish()
    }
}
