//! Offset motions.
//!
//! Pure functions over a `TextSource`: they take a caret offset and return a
//! destination offset, never touching caret or mode state. Callers decide
//! inclusive/exclusive semantics and whether the destination may rest on a
//! line end (Insert / operator-pending) or must sit on a character (Normal).

use crate::TextSource;
use crate::classify::{CharClass, char_class};
use crate::width::offset_for_visual_column;

fn class_at<T: TextSource + ?Sized>(text: &T, offset: usize, big: bool) -> CharClass {
    text.char_at(offset)
        .map_or(CharClass::Blank, |c| char_class(c, big))
}

/// Move left `count` characters, stopping at the line start.
pub fn left<T: TextSource + ?Sized>(text: &T, offset: usize, count: usize) -> usize {
    let start = text.line_start(text.line_of_offset(offset));
    offset.saturating_sub(count).max(start)
}

/// Move right `count` characters, stopping on the last character (or just past it with `allow_end`).
pub fn right<T: TextSource + ?Sized>(
    text: &T,
    offset: usize,
    count: usize,
    allow_end: bool,
) -> usize {
    let line = text.line_of_offset(offset);
    let (start, end) = (text.line_start(line), text.line_end(line));
    let limit = if allow_end || end == start {
        end
    } else {
        end - 1
    };
    offset.saturating_add(count).min(limit)
}

pub fn line_start<T: TextSource + ?Sized>(text: &T, offset: usize) -> usize {
    text.line_start(text.line_of_offset(offset))
}

/// `$`: end of the line `count - 1` lines below.
pub fn line_end<T: TextSource + ?Sized>(
    text: &T,
    offset: usize,
    count: usize,
    allow_end: bool,
) -> usize {
    let line = (text.line_of_offset(offset) + count.saturating_sub(1)).min(text.line_count() - 1);
    let (start, end) = (text.line_start(line), text.line_end(line));
    if allow_end || end == start {
        end
    } else {
        end - 1
    }
}

pub fn first_non_blank<T: TextSource + ?Sized>(text: &T, offset: usize) -> usize {
    text.first_non_blank(text.line_of_offset(offset))
}

/// True when `offset` is the last character of a word (of either non-blank class).
pub fn is_word_end<T: TextSource + ?Sized>(text: &T, offset: usize, big: bool) -> bool {
    let cls = class_at(text, offset, big);
    cls != CharClass::Blank && class_at(text, offset + 1, big) != cls
}

fn is_empty_line<T: TextSource + ?Sized>(text: &T, offset: usize) -> bool {
    text.char_at(offset) == Some('\n')
        && (offset == 0 || text.char_at(offset - 1) == Some('\n'))
}

/// `w` / `W`: start of the `count`-th next word. Empty lines count as words.
/// Returns the document length when the last word is passed.
pub fn word_forward<T: TextSource + ?Sized>(
    text: &T,
    offset: usize,
    count: usize,
    big: bool,
) -> usize {
    let len = text.len_chars();
    let mut pos = offset;
    for _ in 0..count.max(1) {
        if pos >= len {
            return len;
        }
        let cls = class_at(text, pos, big);
        if cls != CharClass::Blank {
            while pos < len && class_at(text, pos, big) == cls {
                pos += 1;
            }
        }
        while pos < len {
            match text.char_at(pos) {
                Some('\n') => {
                    pos += 1;
                    if is_empty_line(text, pos) {
                        break;
                    }
                }
                Some(c) if c.is_whitespace() => pos += 1,
                _ => break,
            }
        }
    }
    pos
}

/// `b` / `B`: start of the `count`-th previous word.
pub fn word_backward<T: TextSource + ?Sized>(
    text: &T,
    offset: usize,
    count: usize,
    big: bool,
) -> usize {
    let mut pos = offset;
    for _ in 0..count.max(1) {
        if pos == 0 {
            return 0;
        }
        pos -= 1;
        while pos > 0 && class_at(text, pos, big) == CharClass::Blank {
            if is_empty_line(text, pos) {
                break;
            }
            pos -= 1;
        }
        let cls = class_at(text, pos, big);
        if cls == CharClass::Blank {
            continue;
        }
        while pos > 0 && class_at(text, pos - 1, big) == cls {
            pos -= 1;
        }
    }
    pos
}

/// `e` / `E`: end of the `count`-th next word.
///
/// With `stop_on_current`, a caret already resting on a word end consumes the
/// first count without moving (the `cw` rule).
pub fn word_end<T: TextSource + ?Sized>(
    text: &T,
    offset: usize,
    count: usize,
    big: bool,
    stop_on_current: bool,
) -> usize {
    let len = text.len_chars();
    if len == 0 {
        return 0;
    }
    let mut pos = offset.min(len - 1);
    for i in 0..count.max(1) {
        if i == 0 && stop_on_current && is_word_end(text, pos, big) {
            continue;
        }
        let mut next = pos + 1;
        while next < len && class_at(text, next, big) == CharClass::Blank {
            next += 1;
        }
        if next >= len {
            return pos;
        }
        let cls = class_at(text, next, big);
        while next + 1 < len && class_at(text, next + 1, big) == cls {
            next += 1;
        }
        pos = next;
    }
    pos
}

/// `ge` / `gE`: end of the `count`-th previous word.
pub fn word_end_backward<T: TextSource + ?Sized>(
    text: &T,
    offset: usize,
    count: usize,
    big: bool,
) -> usize {
    let mut pos = offset;
    for _ in 0..count.max(1) {
        let cls = class_at(text, pos, big);
        let mut p = pos;
        if cls != CharClass::Blank {
            while p > 0 && class_at(text, p, big) == cls {
                p -= 1;
            }
            if class_at(text, p, big) == cls {
                return 0;
            }
        }
        while p > 0 && class_at(text, p, big) == CharClass::Blank {
            if is_empty_line(text, p) && p != pos {
                break;
            }
            p -= 1;
        }
        pos = p;
    }
    pos
}

/// `f` / `F` / `t` / `T` within the current line. `None` when the char is not found.
pub fn find_char<T: TextSource + ?Sized>(
    text: &T,
    offset: usize,
    target: char,
    count: usize,
    forward: bool,
    till: bool,
) -> Option<usize> {
    let line = text.line_of_offset(offset);
    let (start, end) = (text.line_start(line), text.line_end(line));
    let mut remaining = count.max(1);
    let mut pos = offset;
    loop {
        pos = if forward {
            if pos + 1 >= end {
                return None;
            }
            pos + 1
        } else {
            if pos <= start {
                return None;
            }
            pos - 1
        };
        if text.char_at(pos) == Some(target) {
            remaining -= 1;
            if remaining == 0 {
                break;
            }
        }
    }
    Some(match (till, forward) {
        (false, _) => pos,
        (true, true) => pos - 1,
        (true, false) => pos + 1,
    })
}

/// Move `delta` lines keeping the intended visual `column`. `None` when the
/// target line does not exist (`k` on the first line, `j` on the last).
pub fn vertical<T: TextSource + ?Sized>(
    text: &T,
    offset: usize,
    delta: isize,
    column: usize,
    allow_end: bool,
) -> Option<usize> {
    let line = text.line_of_offset(offset);
    let target = line.checked_add_signed(delta)?;
    if target >= text.line_count() {
        return None;
    }
    Some(offset_for_visual_column(text, target, column, allow_end))
}

/// First non-blank of `line` (clamped to the last line).
pub fn goto_line<T: TextSource + ?Sized>(text: &T, line: usize) -> usize {
    text.first_non_blank(line.min(text.line_count() - 1))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Buffer;

    fn buf(s: &str) -> Buffer {
        Buffer::from_str("t", s).unwrap()
    }

    #[test]
    fn horizontal_and_line_boundaries() {
        let b = buf("abc\ndef\n");
        assert_eq!(left(&b, 5, 3), 4);
        assert_eq!(right(&b, 1, 5, false), 2);
        assert_eq!(right(&b, 1, 5, true), 3);
        assert_eq!(line_end(&b, 0, 2, false), 6);
        assert_eq!(line_start(&b, 6), 4);
    }

    #[test]
    fn word_forward_and_backward_basic() {
        let b = buf("foo.bar  baz\n\nqux");
        assert_eq!(word_forward(&b, 0, 1, false), 3);
        assert_eq!(word_forward(&b, 0, 2, false), 4);
        assert_eq!(word_forward(&b, 0, 1, true), 9);
        assert_eq!(word_forward(&b, 9, 1, false), 13);
        assert_eq!(word_forward(&b, 13, 1, false), 14);
        assert_eq!(word_forward(&b, 14, 1, false), 17);
        assert_eq!(word_backward(&b, 14, 1, false), 13);
        assert_eq!(word_backward(&b, 13, 1, false), 9);
        assert_eq!(word_backward(&b, 9, 2, false), 3);
        assert_eq!(word_backward(&b, 9, 1, true), 0);
    }

    #[test]
    fn word_end_variants() {
        let b = buf("one two three\n");
        assert_eq!(word_end(&b, 0, 1, false, false), 2);
        assert_eq!(word_end(&b, 2, 1, false, false), 6);
        assert_eq!(word_end(&b, 2, 1, false, true), 2);
        assert_eq!(word_end(&b, 2, 2, false, true), 6);
        assert_eq!(word_end(&b, 12, 1, false, false), 12);
        assert_eq!(word_end_backward(&b, 9, 1, false), 6);
        assert_eq!(word_end_backward(&b, 4, 1, false), 2);
    }

    #[test]
    fn find_char_forward_and_till() {
        let b = buf("if (a) (b)\n");
        assert_eq!(find_char(&b, 0, '(', 1, true, false), Some(3));
        assert_eq!(find_char(&b, 0, '(', 2, true, false), Some(7));
        assert_eq!(find_char(&b, 0, '(', 1, true, true), Some(2));
        assert_eq!(find_char(&b, 9, '(', 1, false, true), Some(8));
        assert_eq!(find_char(&b, 0, 'z', 1, true, false), None);
    }

    #[test]
    fn vertical_keeps_column_and_fails_at_edges() {
        let b = buf("abcdef\nab\nabcdef\n");
        assert_eq!(vertical(&b, 4, 1, 4, false), Some(8));
        assert_eq!(vertical(&b, 8, 1, 4, false), Some(14));
        assert_eq!(vertical(&b, 2, -1, 2, false), None);
        assert_eq!(vertical(&b, 14, 1, 4, false), None);
        assert_eq!(goto_line(&b, 99), 10);
    }
}
