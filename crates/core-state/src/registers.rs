//! Register store used by the built-in operators.
//!
//! Yanks land in the unnamed register and `"0`; deletes and changes land in
//! the unnamed register and shift the `"1`..`"9` ring. Named registers `a-z`
//! are overwritten by their lowercase name and appended to by the uppercase
//! one. `"_` (black hole) discards.

use crate::range::RangeKind;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegisterContent {
    pub text: String,
    pub kind: RangeKind,
}

#[derive(Debug, Clone, Default)]
pub struct Registers {
    unnamed: Option<RegisterContent>,
    last_yank: Option<RegisterContent>,
    numbered: Vec<RegisterContent>, // newest first, "1 at index 0
    named: [Option<RegisterContent>; 26],
}

impl Registers {
    pub const RING: usize = 9;

    pub fn new() -> Self {
        Self::default()
    }

    fn named_index(c: char) -> Option<usize> {
        c.is_ascii_alphabetic()
            .then(|| (c.to_ascii_lowercase() as u8 - b'a') as usize)
    }

    pub fn is_valid_name(c: char) -> bool {
        c.is_ascii_alphanumeric() || matches!(c, '"' | '-' | '_' | '+' | '*')
    }

    pub fn record_yank(&mut self, target: Option<char>, content: RegisterContent) {
        if target == Some('_') {
            return;
        }
        if let Some(c) = target.filter(|c| c.is_ascii_alphabetic()) {
            self.write_named(c, content);
            return;
        }
        self.unnamed = Some(content.clone());
        self.last_yank = Some(content);
    }

    pub fn record_delete(&mut self, target: Option<char>, content: RegisterContent) {
        if target == Some('_') {
            return;
        }
        if let Some(c) = target.filter(|c| c.is_ascii_alphabetic()) {
            self.write_named(c, content);
            return;
        }
        self.unnamed = Some(content.clone());
        if self.numbered.len() == Self::RING {
            self.numbered.pop();
        }
        self.numbered.insert(0, content);
    }

    fn write_named(&mut self, c: char, content: RegisterContent) {
        let Some(idx) = Self::named_index(c) else {
            return;
        };
        if c.is_ascii_uppercase()
            && let Some(existing) = self.named[idx].as_mut()
        {
            existing.text.push_str(&content.text);
        } else {
            self.named[idx] = Some(content);
        }
        self.unnamed = self.named[idx].clone();
    }

    /// Look up a register by name; `None`/`"` is the unnamed register.
    pub fn get(&self, name: Option<char>) -> Option<&RegisterContent> {
        match name {
            None | Some('"') => self.unnamed.as_ref(),
            Some('0') => self.last_yank.as_ref(),
            Some(d @ '1'..='9') => self.numbered.get(d as usize - '1' as usize),
            Some(c) => Self::named_index(c).and_then(|i| self.named[i].as_ref()),
        }
    }
}
