//! Key strokes and Vim key notation.
//!
//! A `KeyStroke` is the unit the resolver consumes: a logical key plus a
//! modifier set. Sequences are written in the familiar `<...>` notation
//! (`<Esc>`, `<S-Home>`, `<C-v>`, `<lt>`) with every other character standing
//! for itself, so `"c2w"` and `"\\ge"` parse to the strokes a user would type.

use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
/// Normalized logical keys. Printable input (space included) is always `Char`.
pub enum KeyCode {
    Char(char),
    Enter,
    Esc,
    Backspace,
    Tab,
    Delete,
    Up,
    Down,
    Left,
    Right,
    Home,
    End,
}

bitflags::bitflags! {
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
    pub struct KeyModifiers: u8 {
        const CTRL = 0b0000_0001;
        const ALT  = 0b0000_0010;
        const SHIFT= 0b0000_0100;
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct KeyStroke {
    pub code: KeyCode,
    pub mods: KeyModifiers,
}

/// Ordered key strokes; the unit bound in the mapping table.
pub type KeySequence = Vec<KeyStroke>;

impl KeyStroke {
    /// Build a stroke, folding Shift into printable characters (`<S-a>` is `A`)
    /// and lower-casing Ctrl chords (`<C-V>` is `<C-v>`).
    pub fn new(code: KeyCode, mods: KeyModifiers) -> Self {
        match code {
            KeyCode::Char(c) if mods.contains(KeyModifiers::SHIFT) && c != ' ' => {
                let upper = c.to_uppercase().next().unwrap_or(c);
                Self {
                    code: KeyCode::Char(upper),
                    mods: mods - KeyModifiers::SHIFT,
                }
            }
            KeyCode::Char(c) if mods.contains(KeyModifiers::CTRL) => Self {
                code: KeyCode::Char(c.to_ascii_lowercase()),
                mods,
            },
            _ => Self { code, mods },
        }
    }

    pub const fn plain(code: KeyCode) -> Self {
        Self {
            code,
            mods: KeyModifiers::empty(),
        }
    }

    pub const fn char(c: char) -> Self {
        Self::plain(KeyCode::Char(c))
    }

    pub fn ctrl(c: char) -> Self {
        Self::new(KeyCode::Char(c), KeyModifiers::CTRL)
    }

    pub fn shift(code: KeyCode) -> Self {
        Self::new(code, KeyModifiers::SHIFT)
    }

    /// The printable character this stroke types, if any.
    pub fn typed_char(&self) -> Option<char> {
        match self.code {
            KeyCode::Char(c) if (self.mods - KeyModifiers::SHIFT).is_empty() => Some(c),
            _ => None,
        }
    }

    /// Decimal digit value for count accumulation.
    pub fn digit(&self) -> Option<u32> {
        self.typed_char().and_then(|c| c.to_digit(10))
    }

    pub fn is_esc(&self) -> bool {
        self.code == KeyCode::Esc && self.mods.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum KeyParseError {
    #[error("unknown key name `<{0}>`")]
    UnknownKey(String),
    #[error("empty key notation `<>`")]
    Empty,
}

fn named_key(name: &str) -> Option<KeyCode> {
    let lower = name.to_ascii_lowercase();
    Some(match lower.as_str() {
        "esc" => KeyCode::Esc,
        "cr" | "enter" | "return" => KeyCode::Enter,
        "bs" | "backspace" => KeyCode::Backspace,
        "tab" => KeyCode::Tab,
        "del" | "delete" => KeyCode::Delete,
        "up" => KeyCode::Up,
        "down" => KeyCode::Down,
        "left" => KeyCode::Left,
        "right" => KeyCode::Right,
        "home" => KeyCode::Home,
        "end" => KeyCode::End,
        "space" => KeyCode::Char(' '),
        "lt" => KeyCode::Char('<'),
        "bslash" => KeyCode::Char('\\'),
        "bar" => KeyCode::Char('|'),
        _ => {
            let mut chars = name.chars();
            let c = chars.next()?;
            if chars.next().is_some() {
                return None;
            }
            KeyCode::Char(c)
        }
    })
}

fn parse_bracketed(body: &str) -> Result<KeyStroke, KeyParseError> {
    if body.is_empty() {
        return Err(KeyParseError::Empty);
    }
    let mut mods = KeyModifiers::empty();
    let mut rest = body;
    // A trailing "-" is the minus key itself (`<C-->`).
    while rest.len() > 2 && rest.as_bytes()[1] == b'-' {
        let flag = match rest.as_bytes()[0].to_ascii_uppercase() {
            b'C' => KeyModifiers::CTRL,
            b'A' | b'M' => KeyModifiers::ALT,
            b'S' => KeyModifiers::SHIFT,
            _ => break,
        };
        mods |= flag;
        rest = &rest[2..];
    }
    let code = named_key(rest).ok_or_else(|| KeyParseError::UnknownKey(body.to_string()))?;
    Ok(KeyStroke::new(code, mods))
}

/// Parse Vim key notation into strokes. A `<` without a closing `>` is literal.
pub fn parse_keys(notation: &str) -> Result<KeySequence, KeyParseError> {
    let mut out = Vec::new();
    let mut rest = notation;
    while let Some(c) = rest.chars().next() {
        if c == '<'
            && let Some(close) = rest[1..].find('>')
            && !rest[1..1 + close].contains('<')
        {
            out.push(parse_bracketed(&rest[1..1 + close])?);
            rest = &rest[close + 2..];
            continue;
        }
        out.push(KeyStroke::char(c));
        rest = &rest[c.len_utf8()..];
    }
    Ok(out)
}

/// Render strokes back into notation.
pub fn format_keys(keys: &[KeyStroke]) -> String {
    keys.iter().map(ToString::to_string).collect()
}

impl fmt::Display for KeyStroke {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self.code {
            KeyCode::Char(' ') => "Space".to_string(),
            KeyCode::Char('<') => "lt".to_string(),
            KeyCode::Char(c) if self.mods.is_empty() => return write!(f, "{c}"),
            KeyCode::Char(c) => c.to_string(),
            KeyCode::Enter => "CR".to_string(),
            KeyCode::Esc => "Esc".to_string(),
            KeyCode::Backspace => "BS".to_string(),
            KeyCode::Tab => "Tab".to_string(),
            KeyCode::Delete => "Del".to_string(),
            KeyCode::Up => "Up".to_string(),
            KeyCode::Down => "Down".to_string(),
            KeyCode::Left => "Left".to_string(),
            KeyCode::Right => "Right".to_string(),
            KeyCode::Home => "Home".to_string(),
            KeyCode::End => "End".to_string(),
        };
        f.write_str("<")?;
        if self.mods.contains(KeyModifiers::CTRL) {
            f.write_str("C-")?;
        }
        if self.mods.contains(KeyModifiers::ALT) {
            f.write_str("A-")?;
        }
        if self.mods.contains(KeyModifiers::SHIFT) {
            f.write_str("S-")?;
        }
        write!(f, "{name}>")
    }
}
