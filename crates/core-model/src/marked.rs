//! `{caret}` marker notation used by scenarios and the CLI.
//!
//! `"fo{caret}o\n"` is the text `"foo\n"` with a caret at offset 2. A
//! selection is written `{selection}...{/selection}`. Offsets are characters.

use thiserror::Error;

pub const CARET: &str = "{caret}";
pub const SELECTION_START: &str = "{selection}";
pub const SELECTION_END: &str = "{/selection}";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum MarkedTextError {
    #[error("unbalanced selection marker at character {0}")]
    UnbalancedSelection(usize),
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MarkedText {
    pub text: String,
    pub carets: Vec<usize>,
    /// Half-open `[start, end)` selections in order of appearance.
    pub selections: Vec<(usize, usize)>,
}

pub fn parse_marked(input: &str) -> Result<MarkedText, MarkedTextError> {
    let mut out = MarkedText::default();
    let mut open: Option<usize> = None;
    let mut chars = 0usize;
    let mut rest = input;
    while !rest.is_empty() {
        if let Some(r) = rest.strip_prefix(CARET) {
            out.carets.push(chars);
            rest = r;
        } else if let Some(r) = rest.strip_prefix(SELECTION_START) {
            if open.is_some() {
                return Err(MarkedTextError::UnbalancedSelection(chars));
            }
            open = Some(chars);
            rest = r;
        } else if let Some(r) = rest.strip_prefix(SELECTION_END) {
            let start = open
                .take()
                .ok_or(MarkedTextError::UnbalancedSelection(chars))?;
            out.selections.push((start, chars));
            rest = r;
        } else {
            let mut it = rest.chars();
            if let Some(c) = it.next() {
                out.text.push(c);
                chars += 1;
            }
            rest = it.as_str();
        }
    }
    match open {
        Some(start) => Err(MarkedTextError::UnbalancedSelection(start)),
        None => Ok(out),
    }
}

/// Inverse of [`parse_marked`]. At a shared offset the order is
/// `{/selection}`, `{selection}`, `{caret}`.
pub fn render_marked(text: &str, carets: &[usize], selections: &[(usize, usize)]) -> String {
    let mut markers: Vec<(usize, u8, &str)> = Vec::new();
    for &(start, end) in selections {
        markers.push((start, 1, SELECTION_START));
        markers.push((end, 0, SELECTION_END));
    }
    for &c in carets {
        markers.push((c, 2, CARET));
    }
    markers.sort();
    let mut out = String::with_capacity(text.len() + markers.len() * CARET.len());
    let mut pending = markers.into_iter().peekable();
    for (i, ch) in text.chars().enumerate() {
        while let Some((_, _, m)) = pending.next_if(|(at, _, _)| *at <= i) {
            out.push_str(m);
        }
        out.push(ch);
    }
    for (_, _, m) in pending {
        out.push_str(m);
    }
    out
}
