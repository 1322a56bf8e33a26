//! Rope-based text buffer and the character-addressable text surface.
//!
//! Everything in this crate speaks in *character offsets* into the whole
//! document. Lines are Vim lines: a trailing newline terminates the last line
//! rather than opening an empty one, so `"foo\n"` has exactly one line.
//!
//! `TextSource` is the read-only seam consumed by motions and text objects;
//! `Buffer` is the in-memory implementation used by the reference host and
//! the test-suite. Offset-stable marks live next to the rope so every edit
//! can translate them in one place.

use anyhow::Result;
use ropey::Rope;

pub mod camel;
pub mod classify;
pub mod marks;
pub mod motion;
pub mod width;

pub use marks::{MarkId, MarkSet};
pub use width::char_width;

/// Read-only, character-addressable view of a document.
///
/// Implementors only supply the primitive accessors; line-relative helpers are
/// provided. No method panics on an out-of-range argument: offsets are
/// clamped to the document and lines to the last line.
pub trait TextSource {
    /// Total number of characters (newlines included).
    fn len_chars(&self) -> usize;
    /// Character at `offset`, `None` past the end.
    fn char_at(&self, offset: usize) -> Option<char>;
    /// Number of Vim lines (never zero).
    fn line_count(&self) -> usize;
    /// Line containing `offset`.
    fn line_of_offset(&self, offset: usize) -> usize;
    /// Offset of the first character of `line`.
    fn line_start(&self, line: usize) -> usize;
    /// Offset just past the last character of `line`, excluding its newline.
    fn line_end(&self, line: usize) -> usize;
    /// Owned copy of `[start, end)`.
    fn slice(&self, start: usize, end: usize) -> String;

    /// Offset of the first non-blank character of `line` (or its end when the line is blank).
    fn first_non_blank(&self, line: usize) -> usize {
        let end = self.line_end(line);
        let mut off = self.line_start(line);
        while off < end {
            match self.char_at(off) {
                Some(' ') | Some('\t') => off += 1,
                _ => break,
            }
        }
        off
    }

    /// Clamp `offset` into the document and then into its line.
    ///
    /// With `allow_end` the offset may rest just past the line's last character;
    /// otherwise it is pulled back onto the last character (empty lines clamp to
    /// their start).
    fn normalize_offset(&self, offset: usize, allow_end: bool) -> usize {
        let len = self.len_chars();
        if len == 0 {
            return 0;
        }
        let off = offset.min(len);
        let line = self.line_of_offset(off);
        let start = self.line_start(line);
        let end = self.line_end(line);
        if allow_end {
            off.clamp(start, end)
        } else if end > start {
            off.clamp(start, end - 1)
        } else {
            start
        }
    }

    /// Line content without its newline.
    fn line_text(&self, line: usize) -> String {
        self.slice(self.line_start(line), self.line_end(line))
    }

    /// True when `offset` addresses an empty line.
    fn is_empty_line_at(&self, offset: usize) -> bool {
        let line = self.line_of_offset(offset);
        self.line_start(line) == self.line_end(line)
    }
}

/// A text buffer backed by a `ropey::Rope`, owning the marks that track its edits.
#[derive(Clone, Debug)]
pub struct Buffer {
    rope: Rope,
    marks: MarkSet,
    pub name: String,
}

impl Buffer {
    /// Construct a buffer from an in-memory string slice.
    pub fn from_str(name: impl Into<String>, content: &str) -> Result<Self> {
        Ok(Self {
            rope: Rope::from_str(content),
            marks: MarkSet::default(),
            name: name.into(),
        })
    }

    /// Full document text.
    pub fn text(&self) -> String {
        self.rope.to_string()
    }

    /// Insert `text` at `offset` (clamped). Marks after the insertion point shift right.
    pub fn insert(&mut self, offset: usize, text: &str) {
        if text.is_empty() {
            return;
        }
        let at = offset.min(self.rope.len_chars());
        self.rope.insert(at, text);
        self.marks.on_insert(at, text.chars().count());
    }

    /// Remove `[start, end)` (clamped, order-insensitive) and return the removed text.
    pub fn remove(&mut self, start: usize, end: usize) -> String {
        let len = self.rope.len_chars();
        let (start, end) = (start.min(end).min(len), start.max(end).min(len));
        if start == end {
            return String::new();
        }
        let removed = self.rope.slice(start..end).to_string();
        self.rope.remove(start..end);
        self.marks.on_remove(start, end);
        removed
    }

    pub fn create_mark(&mut self, offset: usize) -> MarkId {
        let at = offset.min(self.rope.len_chars());
        self.marks.create(at)
    }

    pub fn mark_offset(&self, mark: MarkId) -> Option<usize> {
        self.marks.get(mark)
    }

    pub fn set_mark(&mut self, mark: MarkId, offset: usize) {
        let at = offset.min(self.rope.len_chars());
        self.marks.set(mark, at);
    }

    pub fn release_mark(&mut self, mark: MarkId) {
        self.marks.release(mark);
    }

    pub fn live_marks(&self) -> usize {
        self.marks.live()
    }

    fn last_line_index(&self) -> usize {
        let n = self.rope.len_lines();
        if n > 1 && self.rope.line(n - 1).len_chars() == 0 {
            n - 2
        } else {
            n - 1
        }
    }
}

impl TextSource for Buffer {
    fn len_chars(&self) -> usize {
        self.rope.len_chars()
    }

    fn char_at(&self, offset: usize) -> Option<char> {
        if offset < self.rope.len_chars() {
            Some(self.rope.char(offset))
        } else {
            None
        }
    }

    fn line_count(&self) -> usize {
        self.last_line_index() + 1
    }

    fn line_of_offset(&self, offset: usize) -> usize {
        let off = offset.min(self.rope.len_chars());
        self.rope.char_to_line(off).min(self.last_line_index())
    }

    fn line_start(&self, line: usize) -> usize {
        self.rope.line_to_char(line.min(self.last_line_index()))
    }

    fn line_end(&self, line: usize) -> usize {
        let line = line.min(self.last_line_index());
        let start = self.rope.line_to_char(line);
        let slice = self.rope.line(line);
        let mut len = slice.len_chars();
        if len > 0 && slice.char(len - 1) == '\n' {
            len -= 1;
        }
        start + len
    }

    fn slice(&self, start: usize, end: usize) -> String {
        let len = self.rope.len_chars();
        let (start, end) = (start.min(end).min(len), start.max(end).min(len));
        self.rope.slice(start..end).to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trailing_newline_does_not_open_a_line() {
        let b = Buffer::from_str("t", "foo\n").unwrap();
        assert_eq!(b.line_count(), 1);
        assert_eq!(b.line_of_offset(4), 0);
        assert_eq!(b.line_end(0), 3);
        let b = Buffer::from_str("t", "foo\nbar").unwrap();
        assert_eq!(b.line_count(), 2);
        assert_eq!(b.line_start(1), 4);
        assert_eq!(b.line_end(1), 7);
    }

    #[test]
    fn empty_buffer_is_one_empty_line() {
        let b = Buffer::from_str("t", "").unwrap();
        assert_eq!(b.line_count(), 1);
        assert_eq!(b.line_start(0), 0);
        assert_eq!(b.line_end(0), 0);
        assert_eq!(b.normalize_offset(10, false), 0);
    }

    #[test]
    fn normalize_clamps_into_line() {
        let b = Buffer::from_str("t", "abc\n\nxy\n").unwrap();
        assert_eq!(b.normalize_offset(3, false), 2);
        assert_eq!(b.normalize_offset(3, true), 3);
        assert_eq!(b.normalize_offset(4, false), 4);
        assert_eq!(b.normalize_offset(99, false), 6);
        assert_eq!(b.normalize_offset(99, true), 7);
    }

    #[test]
    fn first_non_blank_skips_indent() {
        let b = Buffer::from_str("t", "foo\n  \tbar\n   \n").unwrap();
        assert_eq!(b.first_non_blank(0), 0);
        assert_eq!(b.first_non_blank(1), 7);
        assert_eq!(b.first_non_blank(2), b.line_end(2));
    }

    #[test]
    fn edits_translate_marks() {
        let mut b = Buffer::from_str("t", "one two three").unwrap();
        let before = b.create_mark(2);
        let inside = b.create_mark(5);
        let after = b.create_mark(9);
        b.remove(4, 8);
        assert_eq!(b.text(), "one three");
        assert_eq!(b.mark_offset(before), Some(2));
        assert_eq!(b.mark_offset(inside), Some(4));
        assert_eq!(b.mark_offset(after), Some(5));
        b.insert(0, "xx");
        assert_eq!(b.mark_offset(before), Some(4));
        b.release_mark(before);
        assert_eq!(b.mark_offset(before), None);
        assert_eq!(b.live_marks(), 2);
    }
}
