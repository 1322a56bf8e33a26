use core_state::CaretId;

/// Who caused a selection change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventSource {
    Mouse,
    Keyboard,
    /// Host-originated selection (refactorings, find, programmatic moves).
    Other,
}

/// Notification raised by the host surface.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HostEvent {
    SelectionChanged {
        caret: CaretId,
        start: usize,
        end: usize,
        source: EventSource,
    },
    CaretMoved {
        caret: CaretId,
        offset: usize,
    },
    MouseClicked {
        caret: CaretId,
        offset: usize,
        clicks: u8,
    },
    MouseDragStarted {
        caret: CaretId,
    },
    MouseReleased {
        caret: CaretId,
    },
    CaretAdded {
        caret: CaretId,
        offset: usize,
    },
    CaretRemoved {
        caret: CaretId,
    },
}

impl HostEvent {
    /// Selection and caret movement notifications are the ones the engine's
    /// own mutations echo back; those are gated by the suppression guard.
    /// Pointer and caret lifecycle events always pass.
    pub fn is_suppressible(&self) -> bool {
        matches!(
            self,
            HostEvent::SelectionChanged { .. } | HostEvent::CaretMoved { .. }
        )
    }

    pub fn caret(&self) -> CaretId {
        match *self {
            HostEvent::SelectionChanged { caret, .. }
            | HostEvent::CaretMoved { caret, .. }
            | HostEvent::MouseClicked { caret, .. }
            | HostEvent::MouseDragStarted { caret }
            | HostEvent::MouseReleased { caret }
            | HostEvent::CaretAdded { caret, .. }
            | HostEvent::CaretRemoved { caret } => caret,
        }
    }
}
