//! Action handlers and the registry they live in.
//!
//! Every binding in the keymap names an `ActionId`; the registry maps that id
//! to one tagged handler. Dispatch is a match on the tag, there is no handler
//! hierarchy.

use crate::command::{Command, CommandFlags, CommandKind};
use crate::dispatcher::ExecContext;
use core_keymap::ActionId;
use core_model::HostSurface;
use core_state::{CaretId, Mode, TextRange};
use core_text::TextSource;
use std::collections::HashMap;
use tracing::{debug, warn};

/// Caret context handed to motion and text-object resolvers.
pub struct MotionContext<'a> {
    pub text: &'a dyn TextSource,
    pub caret: CaretId,
    pub offset: usize,
    /// Intended visual column for vertical motions.
    pub column: usize,
    pub command: &'a Command,
    pub mode: Mode,
    /// True while resolving the argument of an operator.
    pub operator_pending: bool,
}

impl MotionContext<'_> {
    pub fn count(&self) -> usize {
        self.command.count as usize
    }

    /// Whether a destination may rest just past the last character of a line.
    pub fn allow_end(&self) -> bool {
        self.operator_pending || matches!(self.mode, Mode::Insert | Mode::Replace | Mode::Select(_))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OperatorArgs {
    pub caret: CaretId,
    pub range: TextRange,
    pub register: Option<char>,
    pub count: u32,
}

/// Where an operator left the caret and which mode it asks for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OperatorEffect {
    pub caret_offset: usize,
    pub next_mode: Mode,
}

pub type MotionFn = fn(&MotionContext<'_>) -> Option<usize>;
pub type TextObjectFn = fn(&MotionContext<'_>) -> Option<TextRange>;
pub type OperatorFn = fn(&mut dyn HostSurface, &OperatorArgs) -> OperatorEffect;
pub type OtherFn = fn(&mut ExecContext<'_>, &Command);

#[derive(Clone, Copy)]
pub enum ActionHandler {
    Motion(MotionFn),
    TextObject(TextObjectFn),
    Operator(OperatorFn),
    Other(OtherFn),
}

impl ActionHandler {
    pub fn kind(&self) -> CommandKind {
        match self {
            ActionHandler::Motion(_) => CommandKind::Motion,
            ActionHandler::TextObject(_) => CommandKind::TextObject,
            ActionHandler::Operator(_) => CommandKind::Operator,
            ActionHandler::Other(_) => CommandKind::Other,
        }
    }
}

impl std::fmt::Debug for ActionHandler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?}", self.kind())
    }
}

#[derive(Debug, Clone, Copy)]
pub struct ActionSpec {
    pub id: ActionId,
    pub handler: ActionHandler,
    pub flags: CommandFlags,
}

impl ActionSpec {
    pub const fn motion(id: ActionId, f: MotionFn, flags: CommandFlags) -> Self {
        Self {
            id,
            handler: ActionHandler::Motion(f),
            flags,
        }
    }

    pub const fn text_object(id: ActionId, f: TextObjectFn, flags: CommandFlags) -> Self {
        Self {
            id,
            handler: ActionHandler::TextObject(f),
            flags,
        }
    }

    pub const fn operator(id: ActionId, f: OperatorFn, flags: CommandFlags) -> Self {
        Self {
            id,
            handler: ActionHandler::Operator(f),
            flags,
        }
    }

    pub const fn other(id: ActionId, f: OtherFn) -> Self {
        Self {
            id,
            handler: ActionHandler::Other(f),
            flags: CommandFlags::empty(),
        }
    }

    /// Fresh command for this action, count and register not yet applied.
    pub fn command(&self) -> Command {
        Command::new(self.handler.kind(), self.id, self.flags)
    }
}

#[derive(Debug, Default)]
pub struct ActionRegistry {
    specs: HashMap<ActionId, ActionSpec>,
}

impl ActionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `spec` unless its id is already taken. Returns true when added.
    pub fn register(&mut self, spec: ActionSpec) -> bool {
        if self.specs.contains_key(&spec.id) {
            debug!(target: "actions.dispatch", id = %spec.id, "action_already_registered");
            return false;
        }
        self.specs.insert(spec.id, spec);
        true
    }

    pub fn get(&self, id: ActionId) -> Option<&ActionSpec> {
        let spec = self.specs.get(&id);
        if spec.is_none() {
            warn!(target: "actions.dispatch", %id, "unknown_action");
        }
        spec
    }

    pub fn contains(&self, id: ActionId) -> bool {
        self.specs.contains_key(&id)
    }

    pub fn len(&self) -> usize {
        self.specs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.specs.is_empty()
    }
}
