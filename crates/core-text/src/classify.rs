//! Character classification for word motions and camel-case boundaries.

/// Vim `iskeyword` default: letters, digits and underscore.
pub fn is_word(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

pub fn is_blank(c: char) -> bool {
    c.is_whitespace()
}

pub fn is_upper(c: char) -> bool {
    c.is_uppercase()
}

pub fn is_lower(c: char) -> bool {
    c.is_lowercase()
}

pub fn is_alpha(c: char) -> bool {
    c.is_alphabetic()
}

pub fn is_digit(c: char) -> bool {
    c.is_numeric()
}

/// Class used by `w`/`b`/`e`: a word is a maximal run of one non-blank class.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CharClass {
    Blank,
    Punctuation,
    Word,
}

/// Classify `c`; with `big` (WORD motions) every non-blank is `Word`.
pub fn char_class(c: char, big: bool) -> CharClass {
    if is_blank(c) {
        CharClass::Blank
    } else if big || is_word(c) {
        CharClass::Word
    } else {
        CharClass::Punctuation
    }
}
