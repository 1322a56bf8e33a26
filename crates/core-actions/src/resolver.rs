//! Command resolver: keystrokes in, `Command`s out.
//!
//! Composition order, left to right: register (`"a`), count, operator, count
//! again, then motion or text object. Counts typed on both sides of the
//! operator multiply (`2d3w` acts on six words).
//!
//! State machine:
//! * Idle: digits extend the prefix count; `"` waits for a register name.
//! * Buffering: strokes accumulate while the trie reports a longer binding
//!   is still possible. A complete binding that is also a prefix waits for the
//!   next stroke or for `flush`.
//! * Operator pending: an operator was resolved; its motion is read next and
//!   the pair is emitted as one command. The same operator again (`dd`) applies
//!   it to whole lines.
//! * Awaiting char: a motion flagged `EXPECTS_CHAR` takes the next stroke.
//!
//! Strokes left over when a shorter binding wins, and the expansion of a
//! remap, are pushed to the front of the input queue and resolved again
//! before the next external stroke.

use crate::action::ActionRegistry;
use crate::builtin::ids;
use crate::command::{Command, CommandFlags, CommandKind};
use core_events::KeyStroke;
use core_keymap::{Keymap, MappingMode, MappingTarget, PendingInput, Resolution};
use core_state::{Mode, Registers};
use std::collections::VecDeque;
use tracing::{debug, trace, warn};

/// Remap expansions allowed per external stroke (Vim's `maxmapdepth`).
pub const MAX_MAP_DEPTH: usize = 1000;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Pending,
    Resolved(Command),
    /// No binding; in text-entry modes the stroke is typed text.
    Unmapped(Vec<KeyStroke>),
    Cancelled,
}

#[derive(Debug, Default)]
pub struct CommandResolver {
    pending: PendingInput,
    operator: Option<Command>,
    awaiting_char: Option<Command>,
    input: VecDeque<KeyStroke>,
    map_depth: usize,
}

impl CommandResolver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue an external stroke; resets the remap depth budget.
    pub fn enqueue(&mut self, stroke: KeyStroke) {
        self.map_depth = 0;
        self.input.push_back(stroke);
    }

    pub fn next_input(&mut self) -> Option<KeyStroke> {
        self.input.pop_front()
    }

    fn replay_front(&mut self, strokes: &[KeyStroke]) {
        for s in strokes.iter().rev() {
            self.input.push_front(*s);
        }
    }

    pub fn operator_pending(&self) -> bool {
        self.operator.is_some()
    }

    pub fn pending(&self) -> &PendingInput {
        &self.pending
    }

    /// True when any partial state would be lost by a cancel.
    pub fn has_pending(&self) -> bool {
        !self.pending.is_empty() || self.operator.is_some() || self.awaiting_char.is_some()
    }

    pub fn reset(&mut self) {
        self.pending.reset();
        self.operator = None;
        self.awaiting_char = None;
    }

    /// Drop everything, including queued replays.
    pub fn clear(&mut self) {
        self.reset();
        self.input.clear();
    }

    pub fn feed(
        &mut self,
        stroke: KeyStroke,
        mode: Mode,
        keymap: &Keymap,
        actions: &ActionRegistry,
    ) -> Outcome {
        trace!(target: "input.resolve", key = %stroke, %mode, "feed");
        if stroke.is_esc() && self.has_pending() {
            debug!(target: "input.resolve", "cancel");
            self.reset();
            return Outcome::Cancelled;
        }

        if let Some(mut cmd) = self.awaiting_char.take() {
            let Some(c) = stroke.typed_char().or(match stroke.code {
                core_events::KeyCode::Tab => Some('\t'),
                _ => None,
            }) else {
                self.reset();
                return Outcome::Unmapped(vec![stroke]);
            };
            cmd.char_argument = Some(c);
            cmd.keys.push(stroke);
            return self.complete(cmd);
        }

        if self.pending.awaiting_register {
            return match stroke.typed_char().filter(|c| Registers::is_valid_name(*c)) {
                Some(c) => {
                    self.pending.set_register(c);
                    Outcome::Pending
                }
                None => {
                    self.reset();
                    Outcome::Unmapped(vec![stroke])
                }
            };
        }

        let operator_active = self.operator.is_some();
        let counting = matches!(
            mode,
            Mode::Normal | Mode::Visual(_) | Mode::OperatorPending
        );
        if counting && self.pending.keys.is_empty() {
            if let Some(d) = stroke.digit()
                && (d != 0 || self.pending.has_count(operator_active))
            {
                self.pending.push_digit(d, operator_active);
                return Outcome::Pending;
            }
            if stroke.typed_char() == Some('"') && !operator_active && self.pending.register.is_none() {
                self.pending.awaiting_register = true;
                debug!(target: "input.resolve", "register_prefix");
                return Outcome::Pending;
            }
        }

        self.pending.keys.push(stroke);
        match keymap.resolve(MappingMode::for_mode(mode), &self.pending.keys) {
            Resolution::NeedMore | Resolution::Matched { ambiguous: true, .. } => {
                trace!(target: "input.resolve", keys = %core_events::format_keys(&self.pending.keys), "buffered");
                Outcome::Pending
            }
            Resolution::Matched {
                consumed, target, ..
            } => self.accept(consumed, target, mode, actions),
            Resolution::Unmapped => self.unmapped(mode),
        }
    }

    /// Force resolution of an ambiguous buffer (`timeoutlen` elapsed).
    pub fn flush(&mut self, mode: Mode, keymap: &Keymap, actions: &ActionRegistry) -> Outcome {
        if self.pending.keys.is_empty() {
            return Outcome::Pending;
        }
        match keymap.resolve(MappingMode::for_mode(mode), &self.pending.keys) {
            Resolution::Matched {
                consumed, target, ..
            } => self.accept(consumed, target, mode, actions),
            Resolution::NeedMore | Resolution::Unmapped => self.unmapped(mode),
        }
    }

    fn unmapped(&mut self, mode: Mode) -> Outcome {
        let keys = std::mem::take(&mut self.pending.keys);
        debug!(target: "input.resolve", keys = %core_events::format_keys(&keys), %mode, "unmapped");
        if mode.is_text_entry() && self.operator.is_none() {
            if let Some((first, rest)) = keys.split_first() {
                self.replay_front(rest);
                return Outcome::Unmapped(vec![*first]);
            }
        }
        self.reset();
        Outcome::Unmapped(keys)
    }

    fn accept(
        &mut self,
        consumed: usize,
        target: MappingTarget,
        mode: Mode,
        actions: &ActionRegistry,
    ) -> Outcome {
        let mut keys = std::mem::take(&mut self.pending.keys);
        let leftover = keys.split_off(consumed.min(keys.len()));
        self.replay_front(&leftover);
        match target {
            MappingTarget::Remap(seq) => {
                self.map_depth += 1;
                if self.map_depth > MAX_MAP_DEPTH {
                    warn!(target: "input.map", depth = self.map_depth, keys = %core_events::format_keys(&keys), "recursive_mapping");
                    self.clear();
                    return Outcome::Unmapped(keys);
                }
                debug!(target: "input.map", from = %core_events::format_keys(&keys), to = %core_events::format_keys(&seq), "remap");
                self.replay_front(&seq);
                Outcome::Pending
            }
            MappingTarget::Action(id) => {
                let Some(spec) = actions.get(id) else {
                    self.reset();
                    return Outcome::Unmapped(keys);
                };
                let cmd = spec.command().with_keys(keys);
                match cmd.kind {
                    CommandKind::Operator => self.operator_stroke(cmd, mode, actions),
                    CommandKind::Motion | CommandKind::TextObject => {
                        let cmd = cmd.with_count(self.pending.take_total_count());
                        if cmd.flags.contains(CommandFlags::EXPECTS_CHAR) {
                            trace!(target: "input.resolve", action = %cmd.action, "awaiting_char");
                            self.awaiting_char = Some(cmd);
                            return Outcome::Pending;
                        }
                        self.complete(cmd)
                    }
                    CommandKind::Other => {
                        if self.operator.is_some() {
                            let keys = cmd.keys;
                            self.reset();
                            return Outcome::Unmapped(keys);
                        }
                        let mut cmd = cmd.with_count(self.pending.take_total_count());
                        cmd.register = self.pending.register.take();
                        self.pending.reset();
                        Outcome::Resolved(cmd)
                    }
                }
            }
        }
    }

    fn operator_stroke(&mut self, cmd: Command, mode: Mode, actions: &ActionRegistry) -> Outcome {
        if mode.is_visual() {
            let mut cmd = cmd.with_count(self.pending.take_total_count());
            cmd.register = self.pending.register.take();
            self.pending.reset();
            return Outcome::Resolved(cmd);
        }
        match self.operator.take() {
            None => {
                debug!(target: "input.resolve", operator = %cmd.action, "operator_pending");
                self.operator = Some(cmd);
                Outcome::Pending
            }
            Some(op) if op.action == cmd.action => {
                let flags = actions
                    .get(ids::CURRENT_LINE)
                    .map_or(CommandFlags::MOT_LINEWISE, |s| s.flags);
                let lines = Command::new(CommandKind::Motion, ids::CURRENT_LINE, flags)
                    .with_keys(cmd.keys)
                    .with_count(self.pending.take_total_count());
                self.operator = Some(op);
                self.complete(lines)
            }
            Some(op) => {
                debug!(target: "input.resolve", pending = %op.action, got = %cmd.action, "operator_mismatch");
                let keys = cmd.keys;
                self.reset();
                Outcome::Unmapped(keys)
            }
        }
    }

    /// Attach a finished motion to the pending operator, or emit it alone.
    fn complete(&mut self, mut cmd: Command) -> Outcome {
        let register = self.pending.register.take();
        let result = match self.operator.take() {
            Some(mut op) => {
                op.count = cmd.count;
                op.raw_count = cmd.raw_count;
                op.register = register;
                op.keys.extend(cmd.keys.iter().copied());
                op.argument = Some(Box::new(cmd));
                op
            }
            None => {
                cmd.register = register;
                cmd
            }
        };
        self.reset();
        debug!(target: "input.resolve", action = %result.action, count = result.count, register = ?result.register, "resolved");
        Outcome::Resolved(result)
    }
}
