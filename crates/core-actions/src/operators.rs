//! Built-in operator bodies: delete, change, yank and the case operators.
//!
//! Each body receives one caret's final range and reports where that caret
//! ends up and which mode the session should enter afterwards. Range
//! adjustment has already happened in `span_resolver`.

use crate::action::{OperatorArgs, OperatorEffect};
use core_model::HostSurface;
use core_state::{Mode, RangeKind, RegisterContent, TextRange};
use core_text::TextSource;
use core_text::width::{offset_for_visual_column, visual_column};
use tracing::debug;

/// Per-line `[start, end)` segments of a block, top line first. The block's
/// columns span the visual columns of `range.start` and `range.end - 1`; with
/// `to_eol` every segment runs to its line end.
pub fn block_segments(text: &dyn TextSource, range: TextRange, to_eol: bool) -> Vec<(usize, usize)> {
    let last = range.end.saturating_sub(1).max(range.start);
    let (c1, c2) = (visual_column(text, range.start), visual_column(text, last));
    let (lo, hi) = (c1.min(c2), c1.max(c2));
    let (first_line, last_line) = (text.line_of_offset(range.start), text.line_of_offset(last));
    (first_line..=last_line)
        .map(|line| {
            let line_end = text.line_end(line);
            let start = offset_for_visual_column(text, line, lo, true);
            if to_eol {
                return (start, line_end);
            }
            let end = offset_for_visual_column(text, line, hi, true);
            let end = if end < line_end { end + 1 } else { end };
            (start, end.max(start))
        })
        .collect()
}

fn with_newline(mut s: String) -> String {
    if !s.ends_with('\n') {
        s.push('\n');
    }
    s
}

/// Remove block segments bottom-up so earlier offsets stay valid.
fn delete_block(host: &mut dyn HostSurface, segments: &[(usize, usize)]) -> String {
    let mut pieces: Vec<String> = segments
        .iter()
        .rev()
        .map(|&(s, e)| host.delete_range(s, e))
        .collect();
    pieces.reverse();
    pieces.join("\n")
}

fn top_left(segments: &[(usize, usize)], fallback: usize) -> usize {
    segments.first().map_or(fallback, |&(s, _)| s)
}

pub fn delete(host: &mut dyn HostSurface, args: &OperatorArgs) -> OperatorEffect {
    let range = args.range;
    let caret_offset = match range.kind {
        RangeKind::Characterwise => {
            let text = host.delete_range(range.start, range.end);
            host.registers_mut().record_delete(
                args.register,
                RegisterContent {
                    text,
                    kind: RangeKind::Characterwise,
                },
            );
            host.text().normalize_offset(range.start, false)
        }
        RangeKind::Linewise => {
            let len = host.text().len_chars();
            let takes_previous_newline = range.end == len
                && range.start > 0
                && host.text().char_at(range.end.saturating_sub(1)) != Some('\n');
            let start = if takes_previous_newline {
                range.start - 1
            } else {
                range.start
            };
            let removed = host.delete_range(start, range.end);
            let lines = if takes_previous_newline {
                removed.chars().skip(1).collect()
            } else {
                removed
            };
            host.registers_mut().record_delete(
                args.register,
                RegisterContent {
                    text: with_newline(lines),
                    kind: RangeKind::Linewise,
                },
            );
            let text = host.text();
            let line = text.line_of_offset(start.min(text.len_chars()));
            text.first_non_blank(line)
        }
        RangeKind::Blockwise => {
            let segments = block_segments(host.text(), range, false);
            let text = delete_block(host, &segments);
            host.registers_mut().record_delete(
                args.register,
                RegisterContent {
                    text,
                    kind: RangeKind::Blockwise,
                },
            );
            host.text()
                .normalize_offset(top_left(&segments, range.start), false)
        }
    };
    debug!(target: "actions.dispatch", caret = args.caret.0, start = range.start, end = range.end, kind = ?range.kind, "delete");
    OperatorEffect {
        caret_offset,
        next_mode: Mode::Normal,
    }
}

fn change_impl(host: &mut dyn HostSurface, args: &OperatorArgs, block_to_eol: bool) -> OperatorEffect {
    let range = args.range;
    let (text, kind, caret_offset) = match range.kind {
        RangeKind::Characterwise => (
            host.delete_range(range.start, range.end),
            RangeKind::Characterwise,
            range.start,
        ),
        RangeKind::Linewise => {
            let keep_newline = range.end > range.start
                && host.text().char_at(range.end - 1) == Some('\n');
            let end = if keep_newline { range.end - 1 } else { range.end };
            let removed = host.delete_range(range.start, end);
            (with_newline(removed), RangeKind::Linewise, range.start)
        }
        RangeKind::Blockwise => {
            let segments = block_segments(host.text(), range, block_to_eol);
            let start = top_left(&segments, range.start);
            (delete_block(host, &segments), RangeKind::Blockwise, start)
        }
    };
    host.registers_mut()
        .record_delete(args.register, RegisterContent { text, kind });
    debug!(target: "actions.dispatch", caret = args.caret.0, start = range.start, end = range.end, kind = ?range.kind, "change");
    OperatorEffect {
        caret_offset: host.text().normalize_offset(caret_offset, true),
        next_mode: Mode::Insert,
    }
}

pub fn change(host: &mut dyn HostSurface, args: &OperatorArgs) -> OperatorEffect {
    change_impl(host, args, false)
}

/// Visual `C`: whole lines, or for a block every line from the left column
/// to its end.
pub fn change_lines_end(host: &mut dyn HostSurface, args: &OperatorArgs) -> OperatorEffect {
    change_impl(host, args, true)
}

pub fn yank(host: &mut dyn HostSurface, args: &OperatorArgs) -> OperatorEffect {
    let range = args.range;
    let current = host.caret_offset(args.caret);
    let text = host.text();
    let (content, caret_offset) = match range.kind {
        RangeKind::Characterwise => (text.slice(range.start, range.end), range.start),
        RangeKind::Linewise => {
            let first = text.line_of_offset(range.start);
            let caret = current
                .filter(|c| text.line_of_offset(*c) == first)
                .unwrap_or(range.start);
            (with_newline(text.slice(range.start, range.end)), caret)
        }
        RangeKind::Blockwise => {
            let segments = block_segments(text, range, false);
            let pieces: Vec<String> = segments.iter().map(|&(s, e)| text.slice(s, e)).collect();
            (pieces.join("\n"), top_left(&segments, range.start))
        }
    };
    let caret_offset = text.normalize_offset(caret_offset, false);
    host.registers_mut().record_yank(
        args.register,
        RegisterContent {
            text: content,
            kind: range.kind,
        },
    );
    OperatorEffect {
        caret_offset,
        next_mode: Mode::Normal,
    }
}

fn toggle(c: char) -> String {
    if c.is_uppercase() {
        c.to_lowercase().collect()
    } else if c.is_lowercase() {
        c.to_uppercase().collect()
    } else {
        c.to_string()
    }
}

fn rewrite(host: &mut dyn HostSurface, start: usize, end: usize, f: fn(char) -> String) {
    let old = host.text().slice(start, end);
    let new: String = old.chars().map(f).collect();
    if new != old {
        host.delete_range(start, end);
        host.insert_text(start, &new);
    }
}

fn case_operator(host: &mut dyn HostSurface, args: &OperatorArgs, f: fn(char) -> String) -> OperatorEffect {
    let range = args.range;
    let caret_offset = match range.kind {
        RangeKind::Blockwise => {
            let segments = block_segments(host.text(), range, false);
            for &(s, e) in segments.iter().rev() {
                rewrite(host, s, e, f);
            }
            top_left(&segments, range.start)
        }
        _ => {
            rewrite(host, range.start, range.end, f);
            range.start
        }
    };
    OperatorEffect {
        caret_offset: host.text().normalize_offset(caret_offset, false),
        next_mode: Mode::Normal,
    }
}

pub fn lowercase(host: &mut dyn HostSurface, args: &OperatorArgs) -> OperatorEffect {
    case_operator(host, args, |c| c.to_lowercase().collect())
}

pub fn uppercase(host: &mut dyn HostSurface, args: &OperatorArgs) -> OperatorEffect {
    case_operator(host, args, |c| c.to_uppercase().collect())
}

pub fn toggle_case(host: &mut dyn HostSurface, args: &OperatorArgs) -> OperatorEffect {
    case_operator(host, args, toggle)
}

#[cfg(test)]
mod tests {
    use super::*;
    use core_model::EditorModel;
    use core_state::CaretId;

    fn apply(
        input: &str,
        range: TextRange,
        f: fn(&mut dyn HostSurface, &OperatorArgs) -> OperatorEffect,
    ) -> (EditorModel, OperatorEffect) {
        let mut model = EditorModel::new(input).unwrap();
        let args = OperatorArgs {
            caret: CaretId(0),
            range,
            register: None,
            count: 1,
        };
        let effect = f(&mut model, &args);
        (model, effect)
    }

    #[test]
    fn delete_last_line_takes_preceding_newline() {
        let (m, e) = apply("foo\nbar", TextRange::linewise(4, 7), delete);
        assert_eq!(m.contents(), "foo");
        assert_eq!(e.caret_offset, 0);
        let reg = m.registers().get(None).unwrap();
        assert_eq!((reg.text.as_str(), reg.kind), ("bar\n", RangeKind::Linewise));
    }

    #[test]
    fn change_lines_keeps_final_newline() {
        let (m, e) = apply("foo\nbar\n", TextRange::linewise(4, 8), change);
        assert_eq!(m.contents(), "foo\n\n");
        assert_eq!(e, OperatorEffect { caret_offset: 4, next_mode: Mode::Insert });
    }

    #[test]
    fn block_delete_removes_column_per_line() {
        // corners at "b" (1) and "g" (7)
        let (m, e) = apply("abcd\nefgh\n", TextRange::new(1, 8, RangeKind::Blockwise), delete);
        assert_eq!(m.contents(), "ad\neh\n");
        assert_eq!(e.caret_offset, 1);
        assert_eq!(m.registers().get(None).unwrap().text, "bc\nfg");
    }

    #[test]
    fn block_change_to_eol() {
        let (m, _) = apply("abcd\nefgh\n", TextRange::new(1, 8, RangeKind::Blockwise), change_lines_end);
        assert_eq!(m.contents(), "a\ne\n");
    }

    #[test]
    fn case_operators_and_yank() {
        let (m, _) = apply("Hello World\n", TextRange::characterwise(0, 11), toggle_case);
        assert_eq!(m.contents(), "hELLO wORLD\n");
        let (m, e) = apply("abc def\n", TextRange::characterwise(4, 7), yank);
        assert_eq!(m.contents(), "abc def\n");
        assert_eq!(e.caret_offset, 4);
        assert_eq!(m.registers().get(Some('0')).unwrap().text, "def");
    }
}
