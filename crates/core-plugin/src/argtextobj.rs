//! `argtextobj`: `ia` / `aa` select a function argument.
//!
//! Bounds are searched inside the innermost bracket pair around the caret.
//! Brackets are ranked `[ { ( <`; a lower-ranked closing bracket inside a
//! higher-ranked pair is ignored, so `f(a < b, c)` still splits on the comma.
//! Quoted strings are skipped as a whole. When the caret sits inside a
//! parenthesised sub-expression that is not a call, the search widens until a
//! comma-delimited argument is found.

use core_actions::{ActionSpec, CommandFlags, MotionContext};
use core_keymap::{ActionId, MappingMode};
use core_state::TextRange;
use core_text::TextSource;
use tracing::trace;

use crate::{Extension, ExtensionBinding};

pub const NAME: &str = "argtextobj";

pub const INNER_ARGUMENT: ActionId = ActionId("argument.inner");
pub const AROUND_ARGUMENT: ActionId = ActionId("argument.around");

const OPEN_BRACKETS: [char; 4] = ['[', '{', '(', '<'];
const CLOSE_BRACKETS: [char; 4] = [']', '}', ')', '>'];

fn is_open(c: char) -> bool {
    OPEN_BRACKETS.contains(&c)
}

fn is_close(c: char) -> bool {
    CLOSE_BRACKETS.contains(&c)
}

fn is_quote(c: char) -> bool {
    c == '"' || c == '\''
}

fn rank(c: char) -> Option<usize> {
    OPEN_BRACKETS
        .iter()
        .position(|b| *b == c)
        .or_else(|| CLOSE_BRACKETS.iter().position(|b| *b == c))
}

fn matching(c: char) -> Option<char> {
    if let Some(i) = CLOSE_BRACKETS.iter().position(|b| *b == c) {
        return Some(OPEN_BRACKETS[i]);
    }
    OPEN_BRACKETS
        .iter()
        .position(|b| *b == c)
        .map(|i| CLOSE_BRACKETS[i])
}

fn is_ident_start(c: char) -> bool {
    c.is_alphabetic() || c == '_' || c == '$'
}

fn is_ident_part(c: char) -> bool {
    c.is_alphanumeric() || c == '_' || c == '$'
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Direction {
    Forward,
    Backward,
}

impl Direction {
    fn delta(self) -> isize {
        match self {
            Direction::Forward => 1,
            Direction::Backward => -1,
        }
    }

    /// Bracket that opens a nesting level when walking in this direction.
    fn opens(self, c: char) -> bool {
        match self {
            Direction::Forward => is_open(c),
            Direction::Backward => is_close(c),
        }
    }

    fn closes(self, c: char) -> bool {
        match self {
            Direction::Forward => is_close(c),
            Direction::Backward => is_open(c),
        }
    }

    fn before(self, i: isize, limit: isize) -> bool {
        match self {
            Direction::Forward => i < limit,
            Direction::Backward => i > limit,
        }
    }
}

/// Argument bounds search state. Positions are signed so that stepping off
/// either end of the document is representable; reads outside it yield `\0`.
struct ArgBounds<'a> {
    text: &'a dyn TextSource,
    len: isize,
    left: isize,
    right: isize,
    left_bracket: isize,
    right_bracket: isize,
}

impl<'a> ArgBounds<'a> {
    fn new(text: &'a dyn TextSource) -> Self {
        Self {
            text,
            len: isize::try_from(text.len_chars()).unwrap_or(isize::MAX),
            left: 0,
            right: 0,
            left_bracket: 0,
            right_bracket: 0,
        }
    }

    fn at(&self, i: isize) -> char {
        usize::try_from(i)
            .ok()
            .and_then(|i| self.text.char_at(i))
            .unwrap_or('\0')
    }

    /// Find the delimiters of the argument at `position`: afterwards `left`
    /// and `right` sit on the enclosing bracket or comma on each side.
    fn find_at(&mut self, position: isize) -> bool {
        self.left = position;
        self.right = position;
        self.leave_quoted_text();
        if self.left == self.right {
            if is_close(self.at(self.right)) {
                self.left -= 1;
            } else {
                self.right += 1;
            }
        }
        let mut next_left = self.left;
        let mut next_right = self.right;
        loop {
            self.left_bracket = next_left;
            self.right_bracket = next_right;
            if !self.find_outer_brackets(0, self.len - 1) {
                trace!(target: "plugin", "not_inside_argument_list");
                return false;
            }
            self.left = next_left;
            self.find_left_bound();
            next_left = self.left - 1;
            self.right = next_right;
            self.find_right_bound();
            next_right = self.right + 1;
            if next_left < 0 || next_right > self.len || self.right - self.left == 1 {
                trace!(target: "plugin", "not_an_argument");
                return false;
            }
            let both_brackets = self.at(self.left) != ',' && self.at(self.right) != ',';
            if both_brackets && self.ident_precedes() {
                // call with a single argument: `f(x)`
                break;
            }
            if !(self.left > 0 && self.right < self.len && both_brackets) {
                break;
            }
        }
        true
    }

    /// Drop the left delimiter and the whitespace after it.
    fn adjust_for_inner(&mut self) {
        self.left += 1;
        while self.left < self.right && self.at(self.left).is_whitespace() {
            self.left += 1;
        }
    }

    /// First argument: drop the bracket, take the right comma and trailing
    /// whitespace. Later arguments keep their left comma.
    fn adjust_for_outer(&mut self) {
        if self.at(self.left) == ',' {
            return;
        }
        self.left += 1;
        if self.right + 1 < self.right_bracket && self.at(self.right) == ',' {
            self.right += 1;
            while self.right + 1 < self.right_bracket && self.at(self.right).is_whitespace() {
                self.right += 1;
            }
        }
    }

    fn ident_precedes(&self) -> bool {
        let mut i = self.left - 1;
        while i > 0 && self.at(i).is_whitespace() {
            i -= 1;
        }
        let ident_end = i;
        while i > 0 && is_ident_part(self.at(i)) {
            i -= 1;
        }
        ident_end - i > 0 && is_ident_start(self.at(i + 1))
    }

    /// When the caret is inside a quoted string on its line, widen the
    /// bounds to the quotes.
    fn leave_quoted_text(&mut self) {
        let Ok(offset) = usize::try_from(self.left) else {
            return;
        };
        let line = self.text.line_of_offset(offset);
        let line_start = self.text.line_start(line) as isize;
        let line_end = self.text.line_end(line) as isize;
        let mut i = line_start;
        while i <= self.right {
            if is_quote(self.at(i)) {
                let end = self.skip_quoted_forward(i, line_end);
                if end >= self.left {
                    self.left = i - 1;
                    self.right = end + 1;
                    break;
                }
                i = end;
            }
            i += 1;
        }
    }

    fn find_right_bound(&mut self) {
        while self.right < self.right_bracket {
            let c = self.at(self.right);
            if c == ',' {
                break;
            }
            if is_open(c) {
                self.right = self.skip_sexp(self.right, self.right_bracket, Direction::Forward);
            } else {
                if is_quote(c) {
                    self.right = self.skip_quoted_forward(self.right, self.right_bracket);
                }
                self.right += 1;
            }
        }
    }

    fn find_left_bound(&mut self) {
        while self.left > self.left_bracket {
            let c = self.at(self.left);
            if c == ',' {
                break;
            }
            if is_close(c) {
                self.left = self.skip_sexp(self.left, self.left_bracket, Direction::Backward);
            } else {
                if is_quote(c) {
                    self.left = self.skip_quoted_backward(self.left, self.left_bracket);
                }
                self.left -= 1;
            }
        }
    }

    fn skip_quoted_forward(&self, start: isize, end: isize) -> isize {
        let quote = self.at(start);
        let mut escaped = false;
        let mut i = start + 1;
        while i < end {
            let c = self.at(i);
            if c == quote && !escaped {
                break;
            }
            escaped = c == '\\' && !escaped;
            i += 1;
        }
        i
    }

    fn skip_quoted_backward(&self, start: isize, end: isize) -> isize {
        let quote = self.at(start);
        let mut i = start - 1;
        while i > end {
            if self.at(i) == quote && self.at(i - 1) != '\\' {
                break;
            }
            i -= 1;
        }
        i
    }

    /// Position just past the bracketed expression starting at `start`, or
    /// one step from `start` when it is unbalanced before `end`.
    fn skip_sexp(&self, start: isize, end: isize, dir: Direction) -> isize {
        let mut stack = vec![self.at(start)];
        let mut i = start + dir.delta();
        while dir.before(i, end) {
            let Some(&top) = stack.last() else {
                break;
            };
            let c = self.at(i);
            if dir.opens(c) {
                stack.push(c);
            } else if dir.closes(c) {
                if matching(c) == Some(top) {
                    stack.pop();
                } else if rank(c) < rank(top) {
                    // `(<...)`: the unclosed `<` is not a bracket
                    stack.pop();
                    continue;
                }
            } else if is_quote(c) {
                i = match dir {
                    Direction::Forward => self.skip_quoted_forward(i, end),
                    Direction::Backward => self.skip_quoted_backward(i, end),
                };
            }
            i += dir.delta();
        }
        if stack.is_empty() {
            i
        } else {
            start + dir.delta()
        }
    }

    /// Widen `left_bracket..right_bracket` to the nearest enclosing pair of
    /// equal rank.
    fn find_outer_brackets(&mut self, start: isize, end: isize) -> bool {
        let mut found = self.find_prev_open(start) && self.find_next_close(end);
        while found {
            let left_rank = rank(self.at(self.left_bracket));
            let right_rank = rank(self.at(self.right_bracket));
            if left_rank == right_rank {
                return true;
            }
            if left_rank < right_rank {
                if self.right_bracket + 1 >= end {
                    return false;
                }
                self.right_bracket += 1;
                found = self.find_next_close(end);
            } else {
                if self.left_bracket <= 1 {
                    return false;
                }
                self.left_bracket -= 1;
                found = self.find_prev_open(start);
            }
        }
        false
    }

    fn find_prev_open(&mut self, start: isize) -> bool {
        loop {
            if self.left_bracket < start {
                return false;
            }
            let c = self.at(self.left_bracket);
            if is_open(c) {
                return true;
            }
            if is_close(c) {
                self.left_bracket = self.skip_sexp(self.left_bracket, start, Direction::Backward);
                continue;
            }
            if is_quote(c) {
                self.left_bracket = self.skip_quoted_backward(self.left_bracket, start);
            } else if self.left_bracket == start {
                return false;
            }
            self.left_bracket -= 1;
        }
    }

    fn find_next_close(&mut self, end: isize) -> bool {
        loop {
            if self.right_bracket > end {
                return false;
            }
            let c = self.at(self.right_bracket);
            if is_close(c) {
                return true;
            }
            if is_open(c) {
                self.right_bracket = self.skip_sexp(self.right_bracket, end, Direction::Forward);
                continue;
            }
            if is_quote(c) {
                self.right_bracket = self.skip_quoted_forward(self.right_bracket, end);
            } else if self.right_bracket + 1 == end {
                return false;
            }
            self.right_bracket += 1;
        }
    }
}

/// Range of the argument under `offset`, extended over `count` arguments.
/// `None` outside an argument list.
pub fn argument_range(text: &dyn TextSource, offset: usize, count: usize, inner: bool) -> Option<TextRange> {
    let mut bounds = ArgBounds::new(text);
    let mut pos = isize::try_from(offset).ok()?;
    let mut left = 0;
    let count = count.max(1);
    for i in 0..count {
        if !bounds.find_at(pos) {
            return None;
        }
        if inner && (i == 0 || i == count - 1) {
            bounds.adjust_for_inner();
        } else {
            bounds.adjust_for_outer();
        }
        if i == 0 {
            left = bounds.left;
        }
        pos = bounds.right;
    }
    let start = usize::try_from(left).ok()?;
    let end = usize::try_from(bounds.right).ok()?;
    Some(TextRange::characterwise(start, end.max(start)))
}

pub fn inner_argument(ctx: &MotionContext<'_>) -> Option<TextRange> {
    argument_range(ctx.text, ctx.offset, ctx.count(), true)
}

pub fn around_argument(ctx: &MotionContext<'_>) -> Option<TextRange> {
    argument_range(ctx.text, ctx.offset, ctx.count(), false)
}

#[derive(Debug, Clone, Copy, Default)]
pub struct ArgTextObj;

impl Extension for ArgTextObj {
    fn name(&self) -> &'static str {
        NAME
    }

    fn actions(&self) -> Vec<ActionSpec> {
        vec![
            ActionSpec::text_object(INNER_ARGUMENT, inner_argument, CommandFlags::MOT_CHARACTERWISE),
            ActionSpec::text_object(AROUND_ARGUMENT, around_argument, CommandFlags::MOT_CHARACTERWISE),
        ]
    }

    fn bindings(&self) -> Vec<ExtensionBinding> {
        vec![
            ExtensionBinding::new(MappingMode::VO, "ia", INNER_ARGUMENT),
            ExtensionBinding::new(MappingMode::VO, "aa", AROUND_ARGUMENT),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core_text::Buffer;

    fn arg(text: &str, offset: usize, count: usize, inner: bool) -> Option<String> {
        let b = Buffer::from_str("t", text).unwrap();
        let r = argument_range(&b, offset, count, inner)?;
        Some(text.chars().skip(r.start).take(r.len()).collect())
    }

    #[test]
    fn first_and_last_argument() {
        let s = "f(ab, cd)\n";
        assert_eq!(arg(s, 2, 1, true).as_deref(), Some("ab"));
        assert_eq!(arg(s, 2, 1, false).as_deref(), Some("ab, "));
        assert_eq!(arg(s, 6, 1, true).as_deref(), Some("cd"));
        assert_eq!(arg(s, 6, 1, false).as_deref(), Some(", cd"));
    }

    #[test]
    fn nested_call_is_one_argument() {
        let s = "f(a, g(b, c), d)\n";
        assert_eq!(arg(s, 5, 1, true).as_deref(), Some("g(b, c)"));
        assert_eq!(arg(s, 7, 1, true).as_deref(), Some("b"));
    }

    #[test]
    fn quoted_commas_are_skipped() {
        let s = "f(\"a,b\", c)\n";
        assert_eq!(arg(s, 3, 1, true).as_deref(), Some("\"a,b\""));
    }

    #[test]
    fn count_spans_arguments() {
        assert_eq!(arg("f(a, b, c)\n", 2, 2, true).as_deref(), Some("a, b"));
    }

    #[test]
    fn outside_brackets_or_empty_list() {
        assert_eq!(arg("foo bar\n", 1, 1, true), None);
        assert_eq!(arg("f()\n", 1, 1, true), None);
    }
}
