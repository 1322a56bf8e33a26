//! Text object resolvers.
//!
//! Word objects (`iw aw iW aW`) work on runs of one character class within
//! the caret's line and return final half-open ranges. The camel-case word
//! object is shared with the camel-case motion extension.

use crate::action::MotionContext;
use core_state::TextRange;
use core_text::TextSource;
use core_text::camel::{find_next_camel_end, find_next_camel_start};
use core_text::classify::{CharClass, char_class, is_alpha, is_lower, is_upper, is_word};

fn class_at(text: &dyn TextSource, offset: usize, big: bool) -> CharClass {
    match text.char_at(offset) {
        None | Some('\n') => CharClass::Blank,
        Some(c) => char_class(c, big),
    }
}

/// Exclusive end of the class run beginning at or containing `pos`.
fn run_end(text: &dyn TextSource, pos: usize, big: bool, limit: usize) -> usize {
    let cls = class_at(text, pos, big);
    let mut end = pos;
    while end < limit && class_at(text, end, big) == cls {
        end += 1;
    }
    end
}

fn run_start(text: &dyn TextSource, pos: usize, big: bool, floor: usize) -> usize {
    let cls = class_at(text, pos, big);
    let mut start = pos;
    while start > floor && class_at(text, start - 1, big) == cls {
        start -= 1;
    }
    start
}

/// `iw`/`aw` (and the WORD variants with `big`) around `offset`.
pub fn word_range(
    text: &dyn TextSource,
    offset: usize,
    count: usize,
    big: bool,
    around: bool,
) -> Option<TextRange> {
    if text.len_chars() == 0 {
        return None;
    }
    let line = text.line_of_offset(offset);
    let (ls, le) = (text.line_start(line), text.line_end(line));
    if ls == le {
        return Some(TextRange::characterwise(ls, ls));
    }
    let offset = offset.clamp(ls, le - 1);
    let blank = |o: usize| class_at(text, o, big) == CharClass::Blank;
    let mut start = run_start(text, offset, big, ls);
    let mut end = offset;

    if !around {
        for _ in 0..count.max(1) {
            if end >= le {
                break;
            }
            end = run_end(text, end, big, le);
        }
        return Some(TextRange::characterwise(start, end));
    }

    if blank(offset) {
        for _ in 0..count.max(1) {
            if end < le && blank(end) {
                end = run_end(text, end, big, le);
            }
            if end < le {
                end = run_end(text, end, big, le);
            }
        }
        return Some(TextRange::characterwise(start, end));
    }

    let mut trailing = false;
    for _ in 0..count.max(1) {
        if end >= le {
            break;
        }
        end = run_end(text, end, big, le);
        trailing = end < le && blank(end);
        if trailing {
            end = run_end(text, end, big, le);
        }
    }
    if !trailing {
        while start > ls && blank(start - 1) {
            start -= 1;
        }
    }
    Some(TextRange::characterwise(start, end))
}

pub fn inner_word(ctx: &MotionContext<'_>) -> Option<TextRange> {
    word_range(ctx.text, ctx.offset, ctx.count(), false, false)
}

pub fn around_word(ctx: &MotionContext<'_>) -> Option<TextRange> {
    word_range(ctx.text, ctx.offset, ctx.count(), false, true)
}

pub fn inner_big_word(ctx: &MotionContext<'_>) -> Option<TextRange> {
    word_range(ctx.text, ctx.offset, ctx.count(), true, false)
}

pub fn around_big_word(ctx: &MotionContext<'_>) -> Option<TextRange> {
    word_range(ctx.text, ctx.offset, ctx.count(), true, true)
}

/// Camel-case sub-word around `offset`.
///
/// The caret begins a hump when it is an uppercase letter after a lowercase
/// one, or follows a non-letter; `start` is then the caret, otherwise the
/// `count`-th camel start behind it. `end` mirrors that forwards. Both
/// variants are exclusive: inner yields `[start, end)`, around yields
/// `[start, end + 1)`. A caret on a non-word character gives an empty range.
pub fn camel_word_range(
    text: &dyn TextSource,
    offset: usize,
    count: usize,
    around: bool,
) -> Option<TextRange> {
    let cur = text.char_at(offset)?;
    if !is_word(cur) {
        return Some(TextRange::characterwise(offset, offset));
    }
    let prev = offset.checked_sub(1).and_then(|p| text.char_at(p));
    let next = text.char_at(offset + 1);
    let at_beginning = match prev {
        None => true,
        Some(p) => (is_upper(cur) && is_lower(p)) || !is_alpha(p),
    };
    let at_ending = match next {
        None => true,
        Some(n) => (is_lower(cur) && is_upper(n)) || !is_alpha(n),
    };
    let count = isize::try_from(count.max(1)).ok()?;
    let start = if at_beginning {
        offset
    } else {
        find_next_camel_start(text, offset, -count)?
    };
    let end = if at_ending {
        offset
    } else {
        find_next_camel_end(text, offset, count)?
    };
    let start = text.normalize_offset(start, false);
    let end = text.normalize_offset(end, false);
    let end = if around { end + 1 } else { end };
    Some(TextRange::characterwise(start, end))
}
