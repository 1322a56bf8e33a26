//! Resolved commands.
//!
//! A `Command` is what the resolver hands to the dispatcher once a key
//! sequence is complete: the bound action, its accumulated count and register,
//! and for operators the nested motion or text object that completes them.

use core_events::KeyStroke;
use core_keymap::ActionId;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CommandKind {
    Motion,
    Operator,
    TextObject,
    Other,
}

bitflags::bitflags! {
    /// Range semantics and resolution hints carried by an action.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
    pub struct CommandFlags: u16 {
        const MOT_EXCLUSIVE     = 1 << 0;
        const MOT_INCLUSIVE     = 1 << 1;
        const MOT_LINEWISE      = 1 << 2;
        const MOT_CHARACTERWISE = 1 << 3;
        /// Wait for one more stroke, stored as `char_argument` (`f`, `t`).
        const EXPECTS_CHAR      = 1 << 4;
        /// Keep the caret's intended visual column (`j`, `k`).
        const VERTICAL          = 1 << 5;
        /// Stick to the end of line for following vertical moves (`$`).
        const STICKY_EOL        = 1 << 6;
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Command {
    pub kind: CommandKind,
    pub action: ActionId,
    /// Effective count, never zero.
    pub count: u32,
    /// Count as typed; `None` when no digits were entered.
    pub raw_count: Option<u32>,
    pub register: Option<char>,
    /// Motion or text object completing an operator.
    pub argument: Option<Box<Command>>,
    pub char_argument: Option<char>,
    pub flags: CommandFlags,
    pub keys: Vec<KeyStroke>,
}

impl Command {
    pub fn new(kind: CommandKind, action: ActionId, flags: CommandFlags) -> Self {
        Self {
            kind,
            action,
            count: 1,
            raw_count: None,
            register: None,
            argument: None,
            char_argument: None,
            flags,
            keys: Vec::new(),
        }
    }

    pub fn with_count(mut self, raw: Option<u32>) -> Self {
        self.raw_count = raw;
        self.count = raw.unwrap_or(1).max(1);
        self
    }

    pub fn with_keys(mut self, keys: Vec<KeyStroke>) -> Self {
        self.keys = keys;
        self
    }

    pub fn is_linewise(&self) -> bool {
        self.flags.contains(CommandFlags::MOT_LINEWISE)
    }

    pub fn is_inclusive(&self) -> bool {
        self.flags.contains(CommandFlags::MOT_INCLUSIVE)
    }

    /// Motion or text object this operator applies to.
    pub fn motion(&self) -> Option<&Command> {
        self.argument.as_deref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn count_defaults_to_one_and_never_zero() {
        let c = Command::new(CommandKind::Motion, ActionId("m"), CommandFlags::empty());
        assert_eq!((c.count, c.raw_count), (1, None));
        let c = c.with_count(Some(0));
        assert_eq!((c.count, c.raw_count), (1, Some(0)));
        let c = c.with_count(Some(12));
        assert_eq!(c.count, 12);
    }
}
