//! Listener layer between the host surface and the engine.
//!
//! The host raises every notification synchronously, including the ones
//! caused by the engine moving carets itself. The listener holds a clone of
//! the engine's `SuppressionGuard`; while that guard is locked, suppressible
//! notifications are counted and dropped instead of queued.

use crate::events::HostEvent;
use core_state::SuppressionGuard;
use std::collections::VecDeque;
use tracing::trace;

#[derive(Debug)]
pub struct SelectionListener {
    guard: SuppressionGuard,
    queue: VecDeque<HostEvent>,
    suppressed: usize,
}

impl SelectionListener {
    pub fn new(guard: SuppressionGuard) -> Self {
        Self {
            guard,
            queue: VecDeque::new(),
            suppressed: 0,
        }
    }

    pub fn notify(&mut self, event: HostEvent) {
        if event.is_suppressible() && self.guard.is_locked() {
            self.suppressed += 1;
            trace!(target: "model.listener", ?event, depth = self.guard.depth(), "suppressed");
            return;
        }
        trace!(target: "model.listener", ?event, "queued");
        self.queue.push_back(event);
    }

    /// Events waiting for the engine, oldest first.
    pub fn drain(&mut self) -> Vec<HostEvent> {
        self.queue.drain(..).collect()
    }

    pub fn pending(&self) -> usize {
        self.queue.len()
    }

    pub fn suppressed(&self) -> usize {
        self.suppressed
    }
}
