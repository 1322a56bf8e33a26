//! Caret movement.
//!
//! A motion runs once per caret, in ascending offset order. Vertical motions
//! keep each caret's intended visual column; `$` sticks it to the line end.
//! In Visual and Select the caret is the moving end of the selection, which
//! is re-published to the host after every move.

use super::{Dispatch, ExecContext};
use crate::action::{MotionContext, MotionFn, TextObjectFn};
use crate::command::{Command, CommandFlags};
use core_text::TextSource;
use core_text::width::visual_column;
use tracing::trace;

pub(crate) fn apply_motion(ctx: &mut ExecContext<'_>, cmd: &Command, f: MotionFn) -> Dispatch {
    let mode = ctx.mode();
    let mut moved = 0usize;
    for caret in ctx.ordered_carets() {
        let Some(state) = ctx.carets.get(caret).copied() else {
            continue;
        };
        let (dest, column) = {
            let text = ctx.host.text();
            let column = match state.last_column {
                Some(c) if cmd.flags.contains(CommandFlags::VERTICAL) => c,
                _ => visual_column(text, state.offset),
            };
            let mctx = MotionContext {
                text,
                caret,
                offset: state.offset,
                column,
                command: cmd,
                mode,
                operator_pending: false,
            };
            let dest = f(&mctx).map(|d| text.normalize_offset(d, mctx.allow_end()));
            (dest, column)
        };
        let Some(dest) = dest else {
            trace!(target: "actions.dispatch", caret = caret.0, action = %cmd.action, "motion_failed");
            continue;
        };
        ctx.move_caret(caret, dest);
        if let Some(state) = ctx.carets.get_mut(caret) {
            state.last_column = if cmd.flags.contains(CommandFlags::STICKY_EOL) {
                Some(usize::MAX)
            } else if cmd.flags.contains(CommandFlags::VERTICAL) {
                Some(column)
            } else {
                None
            };
        }
        if mode.is_visual() || mode.is_select() {
            ctx.update_selection(caret);
        }
        moved += 1;
    }
    if moved == 0 {
        ctx.host.bell();
        return Dispatch::Cancelled;
    }
    Dispatch::Executed
}

/// Text object typed in Visual mode: the selection becomes the object.
pub(crate) fn select_text_object(ctx: &mut ExecContext<'_>, cmd: &Command, f: TextObjectFn) -> Dispatch {
    let mode = ctx.mode();
    if !mode.is_visual() {
        ctx.host.bell();
        return Dispatch::Cancelled;
    }
    let mut selected = 0usize;
    for caret in ctx.ordered_carets() {
        let Some(state) = ctx.carets.get(caret).copied() else {
            continue;
        };
        let range = {
            let text = ctx.host.text();
            let mctx = MotionContext {
                text,
                caret,
                offset: state.offset,
                column: visual_column(text, state.offset),
                command: cmd,
                mode,
                operator_pending: false,
            };
            f(&mctx)
        };
        let Some(range) = range.filter(|r| !r.is_empty() || cmd.is_inclusive()) else {
            continue;
        };
        let head = if cmd.is_inclusive() {
            range.end
        } else {
            range.end - 1
        };
        if let Some(state) = ctx.carets.get_mut(caret) {
            state.selection_start = Some(range.start);
            state.last_column = None;
        }
        ctx.move_caret(caret, head.max(range.start));
        ctx.update_selection(caret);
        selected += 1;
    }
    if selected == 0 {
        ctx.host.bell();
        return Dispatch::Cancelled;
    }
    Dispatch::Executed
}
