//! Built-in motion resolvers.
//!
//! Each function maps a caret context to a destination offset, or `None` when
//! the motion is undefined there (`h` in column 0, `f` without a match, `k` on
//! the first line). Inclusive/exclusive/linewise semantics are carried by the
//! action flags, not decided here. Results are normalized into the document.

use crate::action::MotionContext;
use core_text::{TextSource, motion};

fn normalized(ctx: &MotionContext<'_>, offset: usize) -> usize {
    ctx.text.normalize_offset(offset, ctx.allow_end())
}

/// `None` when the motion would leave the caret where it is.
fn moved(ctx: &MotionContext<'_>, offset: usize) -> Option<usize> {
    (offset != ctx.offset).then_some(offset)
}

pub fn left(ctx: &MotionContext<'_>) -> Option<usize> {
    moved(ctx, motion::left(ctx.text, ctx.offset, ctx.count()))
}

pub fn right(ctx: &MotionContext<'_>) -> Option<usize> {
    moved(
        ctx,
        motion::right(ctx.text, ctx.offset, ctx.count(), ctx.allow_end()),
    )
}

pub fn down(ctx: &MotionContext<'_>) -> Option<usize> {
    let delta = isize::try_from(ctx.count()).ok()?;
    motion::vertical(ctx.text, ctx.offset, delta, ctx.column, ctx.allow_end())
}

pub fn up(ctx: &MotionContext<'_>) -> Option<usize> {
    let delta = isize::try_from(ctx.count()).ok()?;
    motion::vertical(ctx.text, ctx.offset, -delta, ctx.column, ctx.allow_end())
}

pub fn line_start(ctx: &MotionContext<'_>) -> Option<usize> {
    Some(motion::line_start(ctx.text, ctx.offset))
}

pub fn first_non_blank(ctx: &MotionContext<'_>) -> Option<usize> {
    Some(motion::first_non_blank(ctx.text, ctx.offset))
}

pub fn line_end(ctx: &MotionContext<'_>) -> Option<usize> {
    Some(motion::line_end(
        ctx.text,
        ctx.offset,
        ctx.count(),
        ctx.allow_end(),
    ))
}

/// `_`: first non-blank `count - 1` lines down. Doubled operators use it.
pub fn current_line(ctx: &MotionContext<'_>) -> Option<usize> {
    let line = ctx.text.line_of_offset(ctx.offset) + ctx.count() - 1;
    if line >= ctx.text.line_count() {
        return None;
    }
    Some(ctx.text.first_non_blank(line))
}

/// `+` and `<CR>`.
pub fn next_line_start(ctx: &MotionContext<'_>) -> Option<usize> {
    let line = ctx.text.line_of_offset(ctx.offset) + ctx.count();
    (line < ctx.text.line_count()).then(|| ctx.text.first_non_blank(line))
}

/// `-`.
pub fn prev_line_start(ctx: &MotionContext<'_>) -> Option<usize> {
    let line = ctx
        .text
        .line_of_offset(ctx.offset)
        .checked_sub(ctx.count())?;
    Some(ctx.text.first_non_blank(line))
}

fn word_forward_impl(ctx: &MotionContext<'_>, big: bool) -> Option<usize> {
    if ctx.text.len_chars() == 0 {
        return None;
    }
    let dest = motion::word_forward(ctx.text, ctx.offset, ctx.count(), big);
    let dest = if ctx.operator_pending {
        dest
    } else {
        normalized(ctx, dest)
    };
    moved(ctx, dest)
}

pub fn word_forward(ctx: &MotionContext<'_>) -> Option<usize> {
    word_forward_impl(ctx, false)
}

pub fn big_word_forward(ctx: &MotionContext<'_>) -> Option<usize> {
    word_forward_impl(ctx, true)
}

pub fn word_backward(ctx: &MotionContext<'_>) -> Option<usize> {
    moved(
        ctx,
        motion::word_backward(ctx.text, ctx.offset, ctx.count(), false),
    )
}

pub fn big_word_backward(ctx: &MotionContext<'_>) -> Option<usize> {
    moved(
        ctx,
        motion::word_backward(ctx.text, ctx.offset, ctx.count(), true),
    )
}

pub fn word_end(ctx: &MotionContext<'_>) -> Option<usize> {
    moved(
        ctx,
        motion::word_end(ctx.text, ctx.offset, ctx.count(), false, false),
    )
}

pub fn big_word_end(ctx: &MotionContext<'_>) -> Option<usize> {
    moved(
        ctx,
        motion::word_end(ctx.text, ctx.offset, ctx.count(), true, false),
    )
}

pub fn word_end_backward(ctx: &MotionContext<'_>) -> Option<usize> {
    moved(
        ctx,
        motion::word_end_backward(ctx.text, ctx.offset, ctx.count(), false),
    )
}

pub fn big_word_end_backward(ctx: &MotionContext<'_>) -> Option<usize> {
    moved(
        ctx,
        motion::word_end_backward(ctx.text, ctx.offset, ctx.count(), true),
    )
}

/// `gg`: first line, or line `count` when a count was typed.
pub fn goto_first_line(ctx: &MotionContext<'_>) -> Option<usize> {
    let line = ctx.command.raw_count.map_or(0, |n| n.saturating_sub(1) as usize);
    Some(motion::goto_line(ctx.text, line))
}

/// `G`: last line, or line `count` when a count was typed.
pub fn goto_last_line(ctx: &MotionContext<'_>) -> Option<usize> {
    let line = ctx
        .command
        .raw_count
        .map_or(ctx.text.line_count() - 1, |n| n.saturating_sub(1) as usize);
    Some(motion::goto_line(ctx.text, line))
}

fn find(ctx: &MotionContext<'_>, forward: bool, till: bool) -> Option<usize> {
    let target = ctx.command.char_argument?;
    motion::find_char(ctx.text, ctx.offset, target, ctx.count(), forward, till)
}

pub fn find_forward(ctx: &MotionContext<'_>) -> Option<usize> {
    find(ctx, true, false)
}

pub fn find_backward(ctx: &MotionContext<'_>) -> Option<usize> {
    find(ctx, false, false)
}

pub fn till_forward(ctx: &MotionContext<'_>) -> Option<usize> {
    find(ctx, true, true)
}

pub fn till_backward(ctx: &MotionContext<'_>) -> Option<usize> {
    find(ctx, false, true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builtin::ids;
    use crate::command::{Command, CommandFlags, CommandKind};
    use core_state::{CaretId, Mode};
    use core_text::Buffer;

    fn run(f: fn(&MotionContext<'_>) -> Option<usize>, text: &str, offset: usize, cmd: &Command, op: bool) -> Option<usize> {
        let b = Buffer::from_str("t", text).unwrap();
        let column = core_text::width::visual_column(&b, offset);
        let ctx = MotionContext {
            text: &b,
            caret: CaretId(0),
            offset,
            column,
            command: cmd,
            mode: if op { Mode::OperatorPending } else { Mode::Normal },
            operator_pending: op,
        };
        f(&ctx)
    }

    fn cmd(count: Option<u32>) -> Command {
        Command::new(CommandKind::Motion, ids::RIGHT, CommandFlags::empty()).with_count(count)
    }

    #[test]
    fn horizontal_edges_fail() {
        assert_eq!(run(left, "abc\n", 0, &cmd(None), false), None);
        assert_eq!(run(right, "abc\n", 2, &cmd(None), false), None);
        assert_eq!(run(right, "abc\n", 2, &cmd(None), true), Some(3));
        assert_eq!(run(right, "\n", 0, &cmd(None), true), None);
    }

    #[test]
    fn word_forward_clamps_outside_operator() {
        assert_eq!(run(word_forward, "foo\n", 0, &cmd(None), false), Some(2));
        assert_eq!(run(word_forward, "foo\n", 0, &cmd(None), true), Some(4));
        assert_eq!(run(word_forward, "one two\n", 0, &cmd(Some(1)), false), Some(4));
    }

    #[test]
    fn goto_lines_honor_raw_count() {
        let text = "a\n  b\nc\n";
        assert_eq!(run(goto_first_line, text, 6, &cmd(None), false), Some(0));
        assert_eq!(run(goto_first_line, text, 6, &cmd(Some(2)), false), Some(4));
        assert_eq!(run(goto_last_line, text, 0, &cmd(None), false), Some(6));
        assert_eq!(run(goto_last_line, text, 0, &cmd(Some(9)), false), Some(6));
    }

    #[test]
    fn line_steps_fail_past_edges() {
        let text = "a\nb\n";
        assert_eq!(run(next_line_start, text, 0, &cmd(None), false), Some(2));
        assert_eq!(run(next_line_start, text, 2, &cmd(None), false), None);
        assert_eq!(run(prev_line_start, text, 0, &cmd(None), false), None);
        assert_eq!(run(current_line, text, 0, &cmd(Some(2)), false), Some(2));
        assert_eq!(run(current_line, text, 0, &cmd(Some(3)), false), None);
    }

    #[test]
    fn find_uses_char_argument() {
        let mut c = cmd(None);
        c.char_argument = Some('(');
        assert_eq!(run(till_forward, "if (x)\n", 0, &c, false), Some(2));
        assert_eq!(run(find_forward, "if (x)\n", 0, &c, false), Some(3));
        assert_eq!(run(find_backward, "if (x)\n", 0, &c, false), None);
    }
}
