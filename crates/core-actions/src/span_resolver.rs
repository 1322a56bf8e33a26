//! Operator range resolution.
//!
//! Turns a caret plus the motion or text object completing an operator into
//! the `TextRange` the operator body receives. All of Vim's adjustment rules
//! live here so that normal-mode operators, visual operators and extension
//! motions agree:
//! * Inclusive motions extend the end by one character, except onto a line
//!   break or past the document.
//! * Linewise motions cover whole lines, including the last line's newline.
//! * `cw`/`cW` on a non-blank stop at the end of the word under the caret,
//!   even when the caret already sits on that last character.
//! * `w`/`W` never carry an operator across a line break that only
//!   whitespace separates from the last word: the end is cut back to the end
//!   of that word's line.
//! * Exclusive promotion: an exclusive range ending on the first non-blank of
//!   a different line becomes linewise over both lines. Otherwise an end in
//!   column 0 of a later line moves back to the end of the previous line,
//!   and the range turns linewise when its start is at or before the first
//!   non-blank of its line.

use crate::action::{ActionHandler, MotionContext};
use crate::builtin::ids;
use core_keymap::ActionId;
use core_state::{RangeKind, SelectionKind, TextRange};
use core_text::{TextSource, motion};
use tracing::trace;

/// Whole lines `first..=last`, ending after the last line's newline (or at
/// the document end when the last line has none).
pub fn linewise_range(text: &dyn TextSource, first: usize, last: usize) -> TextRange {
    let (first, last) = (first.min(last), first.max(last));
    let start = text.line_start(first);
    let end = text.line_end(last);
    let end = if text.char_at(end) == Some('\n') {
        end + 1
    } else {
        end
    };
    TextRange::linewise(start, end)
}

/// End offset of an inclusive motion landing on `end`.
pub fn inclusive_end(text: &dyn TextSource, end: usize) -> usize {
    match text.char_at(end) {
        None | Some('\n') => end,
        Some(_) => end + 1,
    }
}

fn is_blank_at(text: &dyn TextSource, offset: usize) -> bool {
    text.char_at(offset).is_some_and(char::is_whitespace)
}

/// Cut a `w`/`W` range `[a, b)` back to the end of the last word's line when
/// only whitespace containing a line break separates it from `b`.
fn trim_word_motion(text: &dyn TextSource, a: usize, b: usize) -> usize {
    let mut p = b;
    while p > a && is_blank_at(text, p - 1) {
        p -= 1;
    }
    // `p` is one past the last non-blank at or after `a`, or `a` itself.
    let ws_from = p.max(a);
    let crosses = (ws_from..b).any(|o| text.char_at(o) == Some('\n'));
    if !crosses {
        return b;
    }
    let anchor = if p > a { p - 1 } else { a };
    text.line_end(text.line_of_offset(anchor)).max(a)
}

/// Exclusive-motion adjustment of `[start, end)`.
///
/// Moving the start back to column 0 when it sits at or before the first
/// non-blank only happens together with a promotion to linewise, which covers
/// the start line from column 0 anyway. A range that stays characterwise keeps
/// its start, so `dw` from the first non-blank leaves the indent alone.
pub fn adjust_exclusive(text: &dyn TextSource, start: usize, end: usize) -> TextRange {
    let (a, b) = (start.min(end), start.max(end));
    if a == b || b > text.len_chars() {
        return TextRange::characterwise(a, b.min(text.len_chars()));
    }
    let start_line = text.line_of_offset(a);
    let end_line = text.line_of_offset(b);
    if end_line == start_line || b == text.len_chars() {
        return TextRange::characterwise(a, b);
    }
    if b == text.first_non_blank(end_line) {
        trace!(target: "actions.compose", a, b, start_line, end_line, "exclusive_promoted");
        return linewise_range(text, start_line, end_line);
    }
    if b == text.line_start(end_line) {
        let prev = end_line - 1;
        let b = text.line_end(prev).max(a);
        if a <= text.first_non_blank(start_line) {
            trace!(target: "actions.compose", a, b, "exclusive_column0_linewise");
            return linewise_range(text, start_line, prev);
        }
        return TextRange::characterwise(a, b);
    }
    TextRange::characterwise(a, b)
}

fn is_word_motion(id: ActionId) -> Option<bool> {
    match id {
        ids::WORD_FORWARD => Some(false),
        ids::BIG_WORD_FORWARD => Some(true),
        _ => None,
    }
}

/// Range an operator acts on when completed by `ctx.command` (resolved by
/// `handler`). `None` cancels the operator.
pub fn operator_range(
    ctx: &MotionContext<'_>,
    operator: ActionId,
    handler: &ActionHandler,
) -> Option<TextRange> {
    let text = ctx.text;
    let cmd = ctx.command;
    match handler {
        ActionHandler::TextObject(f) => {
            let range = f(ctx)?;
            if cmd.is_linewise() {
                let first = text.line_of_offset(range.start);
                let last = text.line_of_offset(range.end.saturating_sub(1).max(range.start));
                return Some(linewise_range(text, first, last));
            }
            if cmd.is_inclusive() && range.kind == RangeKind::Characterwise {
                let end = inclusive_end(text, range.end);
                return Some(TextRange::characterwise(range.start, end));
            }
            Some(range)
        }
        ActionHandler::Motion(f) => {
            let origin = ctx.offset;
            if operator == ids::CHANGE
                && let Some(big) = is_word_motion(cmd.action)
                && text.char_at(origin).is_some_and(|c| !c.is_whitespace())
            {
                let end = motion::word_end(text, origin, ctx.count(), big, true);
                trace!(target: "actions.compose", origin, end, "change_word_as_word_end");
                return Some(TextRange::characterwise(origin, inclusive_end(text, end)));
            }
            let dest = f(ctx)?;
            let (a, b) = (origin.min(dest), origin.max(dest));
            if cmd.is_linewise() {
                return Some(linewise_range(
                    text,
                    text.line_of_offset(a),
                    text.line_of_offset(b),
                ));
            }
            if cmd.is_inclusive() {
                return Some(TextRange::characterwise(a, inclusive_end(text, b)));
            }
            let b = if is_word_motion(cmd.action).is_some() && dest > origin {
                trim_word_motion(text, a, b)
            } else {
                b
            };
            Some(adjust_exclusive(text, a, b))
        }
        ActionHandler::Operator(_) | ActionHandler::Other(_) => None,
    }
}

/// Range covered by a Visual (or Select) selection with fixed end `anchor`
/// and caret `head`. `force_linewise` turns characterwise and linewise
/// selections into whole lines (`D`, `X`, `Y`, `S`, `R`, `C`).
pub fn visual_range(
    text: &dyn TextSource,
    anchor: usize,
    head: usize,
    kind: SelectionKind,
    select_mode: bool,
    force_linewise: bool,
) -> TextRange {
    let (lo, hi) = (anchor.min(head), anchor.max(head));
    let len = text.len_chars();
    match kind {
        SelectionKind::Line => {
            linewise_range(text, text.line_of_offset(lo), text.line_of_offset(hi))
        }
        _ if force_linewise && kind == SelectionKind::Character => {
            linewise_range(text, text.line_of_offset(lo), text.line_of_offset(hi))
        }
        SelectionKind::Character if select_mode => TextRange::characterwise(lo, hi.min(len)),
        SelectionKind::Character => TextRange::characterwise(lo, (hi + 1).min(len)),
        SelectionKind::Block => TextRange::new(lo, (hi + 1).min(len).max(lo), RangeKind::Blockwise),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core_text::Buffer;

    fn buf(s: &str) -> Buffer {
        Buffer::from_str("t", s).unwrap()
    }

    #[test]
    fn linewise_includes_final_newline_when_present() {
        let b = buf("ab\ncd\nef");
        assert_eq!(linewise_range(&b, 0, 1), TextRange::linewise(0, 6));
        assert_eq!(linewise_range(&b, 2, 2), TextRange::linewise(6, 8));
    }

    #[test]
    fn word_motion_trimmed_at_line_break() {
        let b = buf("foo  \nbar\n");
        assert_eq!(trim_word_motion(&b, 0, 6), 5);
        let b = buf("foo bar\n");
        assert_eq!(trim_word_motion(&b, 0, 4), 4);
    }

    #[test]
    fn exclusive_promotion_to_linewise() {
        let b = buf("foo\n  bar\n");
        assert_eq!(adjust_exclusive(&b, 1, 6), TextRange::linewise(0, 10));
        let b = buf("  foo\n  bar\n");
        // start after the first non-blank, end in column 0: trimmed, stays characterwise
        let r = adjust_exclusive(&b, 3, 6);
        assert_eq!(r, TextRange::characterwise(3, 5));
    }

    #[test]
    fn characterwise_range_keeps_start_at_first_non_blank() {
        let b = buf("    foo bar\n");
        assert_eq!(adjust_exclusive(&b, 4, 8), TextRange::characterwise(4, 8));
        let b = buf("  foo\n  bar\n");
        assert_eq!(adjust_exclusive(&b, 2, 4), TextRange::characterwise(2, 4));
    }

    #[test]
    fn column_zero_end_with_start_at_indent_is_linewise() {
        let b = buf("  foo\n  bar\n");
        assert_eq!(adjust_exclusive(&b, 2, 6), TextRange::linewise(0, 6));
    }

    #[test]
    fn visual_ranges() {
        let b = buf("abc\ndef\n");
        use SelectionKind::*;
        assert_eq!(visual_range(&b, 1, 5, Character, false, false), TextRange::characterwise(1, 6));
        assert_eq!(visual_range(&b, 5, 1, Character, true, false), TextRange::characterwise(1, 5));
        assert_eq!(visual_range(&b, 1, 5, Line, false, false), TextRange::linewise(0, 8));
        assert_eq!(visual_range(&b, 1, 1, Character, false, true), TextRange::linewise(0, 4));
        assert_eq!(visual_range(&b, 5, 1, Block, false, false).kind, RangeKind::Blockwise);
    }
}
