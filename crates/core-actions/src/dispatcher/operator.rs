//! Operator-motion compositor.
//!
//! Ranges for every caret are resolved first, against the pre-mutation text,
//! and parked in host marks. The operator body then runs once per caret in
//! that same ascending order, reading each range back from its marks so that
//! edits made for earlier carets are accounted for.

use super::{Dispatch, ExecContext};
use crate::action::{MotionContext, OperatorArgs, OperatorFn};
use crate::command::{Command, CommandFlags};
use crate::span_resolver;
use core_state::{CaretId, Mode, RangeKind, TextRange};
use core_text::MarkId;
use core_text::width::visual_column;
use tracing::{debug, trace};

struct Planned {
    caret: CaretId,
    start: MarkId,
    end: MarkId,
    kind: RangeKind,
}

fn plan(ctx: &mut ExecContext<'_>, caret: CaretId, range: TextRange) -> Planned {
    Planned {
        caret,
        start: ctx.host.create_mark(range.start),
        end: ctx.host.create_mark(range.end),
        kind: range.kind,
    }
}

/// Run `body` over every planned range and enter the mode it asks for.
fn run(ctx: &mut ExecContext<'_>, op: &Command, body: OperatorFn, planned: Vec<Planned>) -> Dispatch {
    let mut next_mode = Mode::Normal;
    for p in planned {
        let start = ctx.host.mark_offset(p.start);
        let end = ctx.host.mark_offset(p.end);
        ctx.host.release_mark(p.start);
        ctx.host.release_mark(p.end);
        let (Some(start), Some(end)) = (start, end) else {
            continue;
        };
        let args = OperatorArgs {
            caret: p.caret,
            range: TextRange::new(start, end, p.kind),
            register: op.register,
            count: op.count,
        };
        trace!(target: "actions.compose", caret = p.caret.0, start, end, kind = ?p.kind, "apply_operator");
        let effect = body(&mut *ctx.host, &args);
        ctx.move_caret(p.caret, effect.caret_offset);
        next_mode = effect.next_mode;
    }
    ctx.enter_mode(next_mode);
    if next_mode == Mode::Insert {
        ctx.mark_insert_start();
    }
    Dispatch::Executed
}

/// Normal-mode operator completed by a motion or text object.
pub(crate) fn compose(ctx: &mut ExecContext<'_>, op: &Command, body: OperatorFn) -> Dispatch {
    let Some(motion) = op.motion() else {
        ctx.host.bell();
        return Dispatch::Cancelled;
    };
    let Some(spec) = ctx.actions.get(motion.action).copied() else {
        ctx.host.bell();
        return Dispatch::Cancelled;
    };
    let mut planned = Vec::new();
    for caret in ctx.ordered_carets() {
        let Some(state) = ctx.carets.get(caret).copied() else {
            continue;
        };
        let range = {
            let text = ctx.host.text();
            let column = match state.last_column {
                Some(c) if motion.flags.contains(CommandFlags::VERTICAL) => c,
                _ => visual_column(text, state.offset),
            };
            let mctx = MotionContext {
                text,
                caret,
                offset: state.offset,
                column,
                command: motion,
                mode: Mode::OperatorPending,
                operator_pending: true,
            };
            span_resolver::operator_range(&mctx, op.action, &spec.handler)
        };
        match range {
            Some(range) => planned.push(plan(ctx, caret, range)),
            None => trace!(target: "actions.compose", caret = caret.0, motion = %motion.action, "caret_skipped"),
        }
    }
    if planned.is_empty() {
        debug!(target: "actions.compose", operator = %op.action, motion = %motion.action, "cancelled");
        ctx.host.bell();
        return Dispatch::Cancelled;
    }
    debug!(target: "actions.compose", operator = %op.action, motion = %motion.action, carets = planned.len(), "compose");
    run(ctx, op, body, planned)
}

/// Operator typed in Visual (or Select): acts on each caret's selection and
/// leaves Visual before the operator's own mode takes over.
pub(crate) fn apply_visual(ctx: &mut ExecContext<'_>, op: &Command, body: OperatorFn) -> Dispatch {
    let mode = ctx.mode();
    let Some(kind) = mode.selection_kind() else {
        return Dispatch::Cancelled;
    };
    let force_linewise = op.flags.contains(CommandFlags::MOT_LINEWISE);
    let mut planned = Vec::new();
    for caret in ctx.ordered_carets() {
        let Some(state) = ctx.carets.get(caret).copied() else {
            continue;
        };
        let anchor = state.selection_start.unwrap_or(state.offset);
        let range = span_resolver::visual_range(
            ctx.host.text(),
            anchor,
            state.offset,
            kind,
            mode.is_select(),
            force_linewise,
        );
        planned.push(plan(ctx, caret, range));
    }
    debug!(target: "actions.compose", operator = %op.action, %mode, carets = planned.len(), "visual_operator");
    ctx.clear_selections();
    ctx.set_mode(Mode::Normal);
    run(ctx, op, body, planned)
}
