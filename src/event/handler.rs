//! Event dispatch: the message queue.
//!
//! [`EventDispatcher`] maintains a queue of [`Envelope`]s. The dispatcher does
//! not itself route messages — the runtime drains the queue each frame and
//! delivers option activations to the open dialog, leaving the rest for the
//! application shell.

use std::collections::VecDeque;

use super::message::Envelope;

// ---------------------------------------------------------------------------
// EventDispatcher
// ---------------------------------------------------------------------------

/// Queue-based event dispatcher.
///
/// Messages are enqueued via `push` and drained for processing via `drain`.
#[derive(Debug, Default)]
pub struct EventDispatcher {
    queue: VecDeque<Envelope>,
}

impl EventDispatcher {
    /// Create a new, empty dispatcher.
    pub fn new() -> Self {
        Self {
            queue: VecDeque::new(),
        }
    }

    /// Enqueue a message envelope for later processing.
    pub fn push(&mut self, envelope: Envelope) {
        self.queue.push_back(envelope);
    }

    /// Drain all pending messages and return them as a `Vec`.
    ///
    /// The queue is empty after this call.
    pub fn drain(&mut self) -> Vec<Envelope> {
        self.queue.drain(..).collect()
    }

    /// Number of pending messages.
    pub fn pending_count(&self) -> usize {
        self.queue.len()
    }

    /// Whether the queue is empty.
    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }
}

// ===========================================================================
// Tests
// ===========================================================================
