//! Cooperative cancellation for walks
//!
//! A [`CancelToken`] is cloned into the producer thread. The producer polls
//! [`CancelToken::is_cancelled`] at directory boundaries and before every
//! emission, and uses [`CancelToken::signal`] to wake up from a blocked send.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use crossbeam_channel::{Receiver, Sender, bounded};

struct Inner {
    cancelled: AtomicBool,
    deadline: Option<Instant>,
    // Dropping the sender disconnects `signal`, which wakes any select on it.
    trigger: Mutex<Option<Sender<()>>>,
    signal: Receiver<()>,
}

/// Cancellation signal, optionally carrying a deadline.
#[derive(Clone)]
pub struct CancelToken {
    inner: Arc<Inner>,
}

impl CancelToken {
    /// A token that is only cancelled by an explicit [`cancel`](Self::cancel).
    pub fn new() -> Self {
        Self::build(None)
    }

    /// A token that also counts as cancelled once `deadline` has passed.
    pub fn with_deadline(deadline: Instant) -> Self {
        Self::build(Some(deadline))
    }

    /// A token that expires `timeout` from now.
    pub fn with_timeout(timeout: Duration) -> Self {
        Self::with_deadline(Instant::now() + timeout)
    }

    fn build(deadline: Option<Instant>) -> Self {
        let (trigger, signal) = bounded(0);
        Self {
            inner: Arc::new(Inner {
                cancelled: AtomicBool::new(false),
                deadline,
                trigger: Mutex::new(Some(trigger)),
                signal,
            }),
        }
    }

    /// Cancel every walk holding a clone of this token. Idempotent.
    pub fn cancel(&self) {
        self.inner.cancelled.store(true, Ordering::SeqCst);
        let mut trigger = match self.inner.trigger.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        trigger.take();
    }

    /// True once cancelled explicitly or once the deadline has passed.
    pub fn is_cancelled(&self) -> bool {
        if self.inner.cancelled.load(Ordering::SeqCst) {
            return true;
        }
        self.inner
            .deadline
            .is_some_and(|deadline| Instant::now() >= deadline)
    }

    pub fn deadline(&self) -> Option<Instant> {
        self.inner.deadline
    }

    /// Channel that becomes ready (disconnected) when [`cancel`](Self::cancel) is called.
    ///
    /// Deadlines are not reflected here; pair it with
    /// `crossbeam_channel::at(deadline)` when selecting.
    pub fn signal(&self) -> &Receiver<()> {
        &self.inner.signal
    }
}

impl Default for CancelToken {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for CancelToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CancelToken")
            .field("cancelled", &self.is_cancelled())
            .field("deadline", &self.inner.deadline)
            .finish()
    }
}
