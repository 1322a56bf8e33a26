//! Transient input state accumulated between keystrokes.
//!
//! Counts typed before an operator and counts typed between an operator and
//! its motion are tracked separately and multiplied when the command
//! completes (`2d3w` deletes six words). Values saturate at 999_999.

use core_events::KeyStroke;
use tracing::debug;

pub const MAX_COUNT: u32 = 999_999;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PendingInput {
    /// Strokes buffered while the trie still waits for a longer match.
    pub keys: Vec<KeyStroke>,
    pub count_prefix: Option<u32>,
    pub post_op_count: Option<u32>,
    pub register: Option<char>,
    pub awaiting_register: bool,
}

impl PendingInput {
    pub fn new() -> Self {
        Self::default()
    }

    /// Extend the count for the current phase with one decimal digit.
    pub fn push_digit(&mut self, digit: u32, operator_active: bool) {
        let slot = if operator_active {
            &mut self.post_op_count
        } else {
            &mut self.count_prefix
        };
        let value = slot
            .unwrap_or(0)
            .saturating_mul(10)
            .saturating_add(digit)
            .min(MAX_COUNT);
        *slot = Some(value);
        debug!(target: "input.context", value, digit, operator_active, "count_extend");
    }

    /// True when a count for the current phase has been started; a `0`
    /// stroke is then a digit instead of the line-start motion.
    pub fn has_count(&self, operator_active: bool) -> bool {
        if operator_active {
            self.post_op_count.is_some()
        } else {
            self.count_prefix.is_some()
        }
    }

    /// Consume both counts, returning their clamped product if any was typed.
    pub fn take_total_count(&mut self) -> Option<u32> {
        match (self.count_prefix.take(), self.post_op_count.take()) {
            (None, None) => None,
            (prefix, post) => {
                let total = prefix
                    .unwrap_or(1)
                    .saturating_mul(post.unwrap_or(1))
                    .min(MAX_COUNT);
                Some(total)
            }
        }
    }

    pub fn set_register(&mut self, name: char) {
        self.register = Some(name);
        self.awaiting_register = false;
        debug!(target: "input.context", register = %name, "register_set");
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
            && self.count_prefix.is_none()
            && self.post_op_count.is_none()
            && self.register.is_none()
            && !self.awaiting_register
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prefix_and_post_counts_multiply() {
        let mut p = PendingInput::new();
        p.push_digit(2, false);
        p.push_digit(3, true);
        p.push_digit(0, true);
        assert!(p.has_count(true));
        assert_eq!(p.take_total_count(), Some(60));
        assert_eq!(p.take_total_count(), None);
    }

    #[test]
    fn counts_saturate() {
        let mut p = PendingInput::new();
        for _ in 0..12 {
            p.push_digit(9, false);
        }
        assert_eq!(p.count_prefix, Some(MAX_COUNT));
        p.push_digit(9, true);
        p.push_digit(9, true);
        assert_eq!(p.take_total_count(), Some(MAX_COUNT));
    }

    #[test]
    fn reset_clears_everything() {
        let mut p = PendingInput::new();
        p.awaiting_register = true;
        p.set_register('a');
        p.keys.push(KeyStroke::char('g'));
        assert!(!p.is_empty());
        p.reset();
        assert!(p.is_empty());
    }
}
