//! Typed text: strokes no binding claimed while a text-entry mode is active.

use super::{Dispatch, ExecContext};
use crate::command::Command;
use core_events::{KeyCode, KeyStroke};
use core_state::Mode;
use core_text::TextSource;
use tracing::{debug, trace};

fn typed_text(keys: &[KeyStroke]) -> String {
    keys.iter()
        .filter_map(|k| {
            k.typed_char().or(match k.code {
                KeyCode::Tab => Some('\t'),
                KeyCode::Enter => Some('\n'),
                _ => None,
            })
        })
        .collect()
}

/// Insert `s` at every caret, leaving each caret after its insertion.
fn insert_at_carets(ctx: &mut ExecContext<'_>, s: &str) {
    let n = s.chars().count();
    for caret in ctx.ordered_carets() {
        let Some(offset) = ctx.caret_offset(caret) else {
            continue;
        };
        ctx.host.insert_text(offset, s);
        ctx.move_caret(caret, offset + n);
    }
}

fn overwrite_at_carets(ctx: &mut ExecContext<'_>, s: &str) {
    for c in s.chars() {
        for caret in ctx.ordered_carets() {
            let Some(offset) = ctx.caret_offset(caret) else {
                continue;
            };
            if c != '\n' && ctx.host.text().char_at(offset).is_some_and(|x| x != '\n') {
                ctx.host.delete_range(offset, offset + 1);
            }
            ctx.host.insert_text(offset, c.encode_utf8(&mut [0; 4]));
            ctx.move_caret(caret, offset + 1);
        }
    }
}

/// Remove every Select-mode selection and continue in Insert.
fn replace_selections(ctx: &mut ExecContext<'_>) {
    for caret in ctx.ordered_carets() {
        let Some((start, end)) = ctx.host.selection(caret) else {
            continue;
        };
        ctx.host.delete_range(start, end);
        ctx.move_caret(caret, start);
    }
    ctx.clear_selections();
    if ctx.enter_mode(Mode::Insert) {
        ctx.mark_insert_start();
    }
}

/// Apply unmapped strokes as text in the active mode.
pub fn type_keys(ctx: &mut ExecContext<'_>, keys: &[KeyStroke]) -> Dispatch {
    let mode = ctx.mode();
    let text = typed_text(keys);
    if mode.is_select()
        && keys
            .iter()
            .any(|k| matches!(k.code, KeyCode::Backspace | KeyCode::Delete))
    {
        replace_selections(ctx);
        return Dispatch::Executed;
    }
    if text.is_empty() {
        trace!(target: "actions.dispatch", %mode, keys = %core_events::format_keys(keys), "untypable_keys");
        ctx.host.bell();
        return Dispatch::Cancelled;
    }
    match mode {
        Mode::Insert => insert_at_carets(ctx, &text),
        Mode::Replace => overwrite_at_carets(ctx, &text),
        Mode::Select(_) => {
            replace_selections(ctx);
            insert_at_carets(ctx, &text);
        }
        Mode::CommandLine => ctx.cmdline.push_str(&text),
        _ => {
            ctx.host.bell();
            return Dispatch::Cancelled;
        }
    }
    Dispatch::Executed
}

pub(crate) fn backspace(ctx: &mut ExecContext<'_>, _cmd: &Command) {
    let replace = ctx.mode() == Mode::Replace;
    for caret in ctx.ordered_carets() {
        let Some(offset) = ctx.caret_offset(caret).filter(|o| *o > 0) else {
            continue;
        };
        if !replace {
            ctx.host.delete_range(offset - 1, offset);
        }
        ctx.move_caret(caret, offset - 1);
    }
}

pub(crate) fn newline(ctx: &mut ExecContext<'_>, _cmd: &Command) {
    insert_at_carets(ctx, "\n");
}

pub(crate) fn tab(ctx: &mut ExecContext<'_>, _cmd: &Command) {
    match ctx.mode() {
        Mode::Replace => overwrite_at_carets(ctx, "\t"),
        _ => insert_at_carets(ctx, "\t"),
    }
}

pub(crate) fn cmdline_cancel(ctx: &mut ExecContext<'_>, _cmd: &Command) {
    ctx.cmdline.clear();
    ctx.set_mode(Mode::Normal);
}

/// The ex command itself belongs to the host; the line is logged and dropped.
pub(crate) fn cmdline_execute(ctx: &mut ExecContext<'_>, _cmd: &Command) {
    debug!(target: "actions.dispatch", command = %ctx.cmdline, "ex_command_forwarded");
    ctx.cmdline.clear();
    ctx.set_mode(Mode::Normal);
}

pub(crate) fn cmdline_backspace(ctx: &mut ExecContext<'_>, _cmd: &Command) {
    if ctx.cmdline.pop().is_none() {
        ctx.set_mode(Mode::Normal);
    }
}
