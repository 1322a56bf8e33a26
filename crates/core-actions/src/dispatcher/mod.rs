//! Dispatcher applying resolved `Command`s to the host.
//!
//! Sub-modules:
//! * `motion`   - caret movement and Visual/Select selection upkeep
//! * `operator` - the operator-motion compositor and visual operators
//! * `mode`     - mode-changing actions and the `keymodel` special keys
//! * `typed`    - typed text in Insert/Replace/Select/CommandLine
//!
//! Every function here runs while the engine holds the suppression guard, so
//! the host notifications our own caret and selection changes raise never
//! come back as input.

use crate::action::{ActionHandler, ActionRegistry};
use crate::command::Command;
use crate::span_resolver;
use core_config::Options;
use core_model::HostSurface;
use core_state::{CaretId, CaretTable, Mode, ModeStateMachine};
use core_text::TextSource;
use tracing::{debug, warn};

pub(crate) mod mode;
pub(crate) mod motion;
pub(crate) mod operator;
pub(crate) mod typed;

pub use typed::type_keys;
pub(crate) use mode::cancel;

/// Result of executing one command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dispatch {
    Executed,
    /// Nothing changed: the motion failed or the operator had no range.
    Cancelled,
}

/// Everything an action may touch while it runs.
pub struct ExecContext<'a> {
    pub host: &'a mut dyn HostSurface,
    pub modes: &'a mut ModeStateMachine,
    pub carets: &'a mut CaretTable,
    pub options: &'a Options,
    pub actions: &'a ActionRegistry,
    pub cmdline: &'a mut String,
}

impl ExecContext<'_> {
    pub fn mode(&self) -> Mode {
        self.modes.current()
    }

    /// Request a transition; illegal requests are logged and ignored.
    pub fn set_mode(&mut self, to: Mode) -> bool {
        match self.modes.transition(to) {
            Ok(()) => true,
            Err(err) => {
                warn!(target: "state.mode", %err, "illegal_transition_ignored");
                false
            }
        }
    }

    /// Enter `to`, passing through Normal when there is no direct edge.
    pub fn enter_mode(&mut self, to: Mode) -> bool {
        if !self.modes.can_transition(to) {
            self.modes.reset_to_normal();
        }
        self.set_mode(to)
    }

    /// Bring the caret table in line with the host's carets.
    pub fn sync_carets(&mut self) {
        let live: Vec<(CaretId, usize)> = self
            .host
            .caret_ids()
            .into_iter()
            .filter_map(|id| self.host.caret_offset(id).map(|o| (id, o)))
            .collect();
        self.carets.sync(&live);
    }

    /// Carets in ascending offset order, computed from current offsets.
    pub fn ordered_carets(&mut self) -> Vec<CaretId> {
        self.sync_carets();
        self.carets.ordered_by_offset()
    }

    pub fn caret_offset(&self, caret: CaretId) -> Option<usize> {
        self.host.caret_offset(caret)
    }

    pub fn move_caret(&mut self, caret: CaretId, offset: usize) {
        self.host.move_caret(caret, offset);
        let offset = self.host.caret_offset(caret).unwrap_or(offset);
        if let Some(state) = self.carets.get_mut(caret) {
            state.offset = offset;
        }
    }

    /// Mirror the Visual/Select selection of `caret` onto the host.
    pub fn update_selection(&mut self, caret: CaretId) {
        let mode = self.mode();
        let Some(kind) = mode.selection_kind() else {
            return;
        };
        let Some(state) = self.carets.get(caret).copied() else {
            return;
        };
        let anchor = state.selection_start.unwrap_or(state.offset);
        let range = span_resolver::visual_range(
            self.host.text(),
            anchor,
            state.offset,
            kind,
            mode.is_select(),
            false,
        );
        self.host.set_selection(caret, range.start, range.end);
    }

    /// Drop every selection, host side and engine side.
    pub fn clear_selections(&mut self) {
        for caret in self.host.caret_ids() {
            self.host.remove_selection(caret);
        }
        self.carets.clear_selections();
    }

    /// Leave Visual/Select (or any mode) for Normal, dropping selections and
    /// pulling carets off line ends.
    pub fn exit_to_normal(&mut self) {
        self.clear_selections();
        self.modes.reset_to_normal();
        for caret in self.ordered_carets() {
            let Some(offset) = self.caret_offset(caret) else {
                continue;
            };
            let normalized = self.host.text().normalize_offset(offset, false);
            if normalized != offset {
                self.move_caret(caret, normalized);
            }
        }
    }

    /// Remember where Insert began for every caret.
    pub fn mark_insert_start(&mut self) {
        for caret in self.ordered_carets() {
            if let Some(state) = self.carets.get_mut(caret) {
                state.insert_start = Some(state.offset);
            }
        }
    }
}

/// Execute a resolved command against the host.
pub fn execute(ctx: &mut ExecContext<'_>, cmd: &Command) -> Dispatch {
    let Some(spec) = ctx.actions.get(cmd.action).copied() else {
        ctx.host.bell();
        return Dispatch::Cancelled;
    };
    debug!(target: "actions.dispatch", action = %cmd.action, kind = ?cmd.kind, count = cmd.count, mode = %ctx.mode(), "execute");
    match spec.handler {
        ActionHandler::Motion(f) => motion::apply_motion(ctx, cmd, f),
        ActionHandler::TextObject(f) => motion::select_text_object(ctx, cmd, f),
        ActionHandler::Operator(f) => {
            let mode = ctx.mode();
            if mode.is_visual() || mode.is_select() {
                operator::apply_visual(ctx, cmd, f)
            } else {
                operator::compose(ctx, cmd, f)
            }
        }
        ActionHandler::Other(f) => {
            f(ctx, cmd);
            Dispatch::Executed
        }
    }
}
