//! Mode state machine.
//!
//! Exactly one `Mode` is active per session. `OperatorPending` is layered on
//! top of Normal or Visual and may only be left towards the mode it was
//! entered from. Every successful change is broadcast to subscribers (cursor
//! shape, status line); rejected requests produce `ModeError` and leave the
//! machine untouched.

use std::fmt;
use tracing::debug;

/// Sub-mode shared by Visual and Select.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SelectionKind {
    Character,
    Line,
    Block,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Mode {
    /// Command/navigation mode.
    #[default]
    Normal,
    Insert,
    Replace,
    Visual(SelectionKind),
    Select(SelectionKind),
    /// An operator was typed and awaits its motion or text object.
    OperatorPending,
    CommandLine,
}

impl Mode {
    pub fn is_visual(self) -> bool {
        matches!(self, Mode::Visual(_))
    }

    pub fn is_select(self) -> bool {
        matches!(self, Mode::Select(_))
    }

    /// Modes where unmapped printable keys are text rather than an error.
    pub fn is_text_entry(self) -> bool {
        matches!(
            self,
            Mode::Insert | Mode::Replace | Mode::Select(_) | Mode::CommandLine
        )
    }

    pub fn selection_kind(self) -> Option<SelectionKind> {
        match self {
            Mode::Visual(k) | Mode::Select(k) => Some(k),
            _ => None,
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Mode::Normal => "NORMAL",
            Mode::Insert => "INSERT",
            Mode::Replace => "REPLACE",
            Mode::Visual(SelectionKind::Character) => "VISUAL",
            Mode::Visual(SelectionKind::Line) => "VISUAL LINE",
            Mode::Visual(SelectionKind::Block) => "VISUAL BLOCK",
            Mode::Select(SelectionKind::Character) => "SELECT",
            Mode::Select(SelectionKind::Line) => "SELECT LINE",
            Mode::Select(SelectionKind::Block) => "SELECT BLOCK",
            Mode::OperatorPending => "OP PENDING",
            Mode::CommandLine => "COMMAND",
        };
        f.write_str(s)
    }
}

/// Notification delivered to subscribers after every successful transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ModeChange {
    pub from: Mode,
    pub to: Mode,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum ModeError {
    #[error("illegal mode transition {from} -> {to}")]
    IllegalTransition { from: Mode, to: Mode },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

type Listener = Box<dyn FnMut(&ModeChange)>;

pub struct ModeStateMachine {
    current: Mode,
    /// Mode `OperatorPending` was entered from.
    parent: Option<Mode>,
    listeners: Vec<(SubscriptionId, Listener)>,
    next_id: u64,
}

impl Default for ModeStateMachine {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for ModeStateMachine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ModeStateMachine")
            .field("current", &self.current)
            .field("parent", &self.parent)
            .field("listeners", &self.listeners.len())
            .finish()
    }
}

/// Static legality table. Same-mode requests are handled before this is consulted.
fn is_legal(from: Mode, to: Mode, parent: Option<Mode>) -> bool {
    use Mode::*;
    match (from, to) {
        (OperatorPending, to) => parent == Some(to),
        (_, OperatorPending) => matches!(from, Normal | Visual(_)),
        (Normal, _) => true,
        (Insert, Normal | Replace | Select(_)) => true,
        (Replace, Normal | Insert) => true,
        (Visual(_), Normal | Visual(_) | Select(_) | CommandLine) => true,
        (Select(_), Normal | Select(_) | Visual(_) | Insert) => true,
        (CommandLine, Normal) => true,
        _ => false,
    }
}

impl ModeStateMachine {
    pub fn new() -> Self {
        Self {
            current: Mode::Normal,
            parent: None,
            listeners: Vec::new(),
            next_id: 0,
        }
    }

    pub fn current(&self) -> Mode {
        self.current
    }

    /// Parent of the active `OperatorPending` layer.
    pub fn parent(&self) -> Option<Mode> {
        self.parent
    }

    pub fn can_transition(&self, to: Mode) -> bool {
        to == self.current || is_legal(self.current, to, self.parent)
    }

    /// Move to `to`, notifying subscribers. Requesting the active mode is a no-op.
    pub fn transition(&mut self, to: Mode) -> Result<(), ModeError> {
        let from = self.current;
        if from == to {
            return Ok(());
        }
        if !is_legal(from, to, self.parent) {
            return Err(ModeError::IllegalTransition { from, to });
        }
        self.parent = if to == Mode::OperatorPending {
            Some(from)
        } else {
            None
        };
        self.current = to;
        debug!(target: "state.mode", %from, %to, "mode_transition");
        let change = ModeChange { from, to };
        for (_, listener) in self.listeners.iter_mut() {
            listener(&change);
        }
        Ok(())
    }

    /// Walk a legal path back to Normal (through the operator parent if needed).
    pub fn reset_to_normal(&mut self) {
        if self.current == Mode::OperatorPending
            && let Some(parent) = self.parent
        {
            let _ = self.transition(parent);
        }
        if self.current != Mode::Normal {
            // Every non-pending mode may return to Normal.
            let _ = self.transition(Mode::Normal);
        }
    }

    pub fn subscribe(&mut self, listener: impl FnMut(&ModeChange) + 'static) -> SubscriptionId {
        let id = SubscriptionId(self.next_id);
        self.next_id += 1;
        self.listeners.push((id, Box::new(listener)));
        id
    }

    pub fn unsubscribe(&mut self, id: SubscriptionId) {
        self.listeners.retain(|(sid, _)| *sid != id);
    }
}
