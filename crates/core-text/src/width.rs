//! Display columns.
//!
//! Vertical motions remember an *intended visual column* rather than a char
//! index, so moving across lines with tabs or wide glyphs lands where the eye
//! expects. Widths come from `unicode-width`; tabs advance to the next stop.

use crate::TextSource;
use unicode_width::UnicodeWidthChar;

pub const TAB_STOP: usize = 8;

/// Terminal column width of a single char (control chars count as zero).
pub fn char_width(c: char) -> usize {
    c.width().unwrap_or(0)
}

fn advance(col: usize, c: char) -> usize {
    if c == '\t' {
        (col / TAB_STOP + 1) * TAB_STOP
    } else {
        col + char_width(c)
    }
}

/// Visual column at which `offset` is displayed within its line.
pub fn visual_column<T: TextSource + ?Sized>(text: &T, offset: usize) -> usize {
    let line = text.line_of_offset(offset);
    let start = text.line_start(line);
    let stop = offset.min(text.line_end(line));
    (start..stop)
        .filter_map(|o| text.char_at(o))
        .fold(0, advance)
}

/// Offset on `line` whose cell covers visual column `col`.
///
/// Past the end of the line the result is the last character, or the line end
/// when `allow_end` is set.
pub fn offset_for_visual_column<T: TextSource + ?Sized>(
    text: &T,
    line: usize,
    col: usize,
    allow_end: bool,
) -> usize {
    let start = text.line_start(line);
    let end = text.line_end(line);
    let mut cur = 0usize;
    let mut off = start;
    while off < end {
        let Some(c) = text.char_at(off) else { break };
        let next = advance(cur, c);
        if next > col {
            return off;
        }
        cur = next;
        off += 1;
    }
    if allow_end || end == start { end } else { end - 1 }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Buffer;

    #[test]
    fn tabs_and_wide_chars() {
        let b = Buffer::from_str("t", "a\tb\n漢字x\n").unwrap();
        assert_eq!(visual_column(&b, 1), 1);
        assert_eq!(visual_column(&b, 2), 8);
        assert_eq!(visual_column(&b, 5), 2);
        assert_eq!(visual_column(&b, 6), 4);
    }

    #[test]
    fn column_to_offset_round_trip_on_wide_glyphs() {
        let b = Buffer::from_str("t", "abcdef\n漢字x\n").unwrap();
        assert_eq!(offset_for_visual_column(&b, 1, 0, false), 7);
        assert_eq!(offset_for_visual_column(&b, 1, 3, false), 8);
        assert_eq!(offset_for_visual_column(&b, 1, 4, false), 9);
        assert_eq!(offset_for_visual_column(&b, 1, 40, false), 9);
        assert_eq!(offset_for_visual_column(&b, 1, 40, true), 10);
    }
}
