//! Built-in actions and their default key bindings.

use crate::action::{ActionRegistry, ActionSpec};
use crate::command::CommandFlags as F;
use crate::dispatcher::{mode, typed};
use crate::{motion, operators, text_object};
use core_events::parse_keys;
use core_keymap::{ActionId, Keymap, MappingMode as M, MappingTarget};
use tracing::{debug, warn};

/// Identifiers of every built-in action.
pub mod ids {
    use core_keymap::ActionId;

    pub const LEFT: ActionId = ActionId("motion.left");
    pub const RIGHT: ActionId = ActionId("motion.right");
    pub const UP: ActionId = ActionId("motion.up");
    pub const DOWN: ActionId = ActionId("motion.down");
    pub const LINE_START: ActionId = ActionId("motion.line_start");
    pub const FIRST_NON_BLANK: ActionId = ActionId("motion.first_non_blank");
    pub const LINE_END: ActionId = ActionId("motion.line_end");
    /// `_`, also the implicit motion of doubled operators.
    pub const CURRENT_LINE: ActionId = ActionId("motion.current_line");
    pub const NEXT_LINE_START: ActionId = ActionId("motion.next_line_start");
    pub const PREV_LINE_START: ActionId = ActionId("motion.prev_line_start");
    pub const WORD_FORWARD: ActionId = ActionId("motion.word_forward");
    pub const BIG_WORD_FORWARD: ActionId = ActionId("motion.big_word_forward");
    pub const WORD_BACKWARD: ActionId = ActionId("motion.word_backward");
    pub const BIG_WORD_BACKWARD: ActionId = ActionId("motion.big_word_backward");
    pub const WORD_END: ActionId = ActionId("motion.word_end");
    pub const BIG_WORD_END: ActionId = ActionId("motion.big_word_end");
    pub const WORD_END_BACKWARD: ActionId = ActionId("motion.word_end_backward");
    pub const BIG_WORD_END_BACKWARD: ActionId = ActionId("motion.big_word_end_backward");
    pub const GOTO_FIRST_LINE: ActionId = ActionId("motion.goto_first_line");
    pub const GOTO_LAST_LINE: ActionId = ActionId("motion.goto_last_line");
    pub const FIND_FORWARD: ActionId = ActionId("motion.find_forward");
    pub const FIND_BACKWARD: ActionId = ActionId("motion.find_backward");
    pub const TILL_FORWARD: ActionId = ActionId("motion.till_forward");
    pub const TILL_BACKWARD: ActionId = ActionId("motion.till_backward");

    pub const INNER_WORD: ActionId = ActionId("object.inner_word");
    pub const AROUND_WORD: ActionId = ActionId("object.around_word");
    pub const INNER_BIG_WORD: ActionId = ActionId("object.inner_big_word");
    pub const AROUND_BIG_WORD: ActionId = ActionId("object.around_big_word");

    pub const DELETE: ActionId = ActionId("operator.delete");
    pub const CHANGE: ActionId = ActionId("operator.change");
    pub const YANK: ActionId = ActionId("operator.yank");
    pub const LOWERCASE: ActionId = ActionId("operator.lowercase");
    pub const UPPERCASE: ActionId = ActionId("operator.uppercase");
    pub const TOGGLE_CASE: ActionId = ActionId("operator.toggle_case");
    pub const DELETE_LINES: ActionId = ActionId("operator.delete_lines");
    pub const CHANGE_LINES: ActionId = ActionId("operator.change_lines");
    pub const CHANGE_LINES_END: ActionId = ActionId("operator.change_lines_end");
    pub const YANK_LINES: ActionId = ActionId("operator.yank_lines");

    pub const INSERT: ActionId = ActionId("mode.insert");
    pub const APPEND: ActionId = ActionId("mode.append");
    pub const INSERT_LINE_START: ActionId = ActionId("mode.insert_line_start");
    pub const APPEND_LINE_END: ActionId = ActionId("mode.append_line_end");
    pub const OPEN_BELOW: ActionId = ActionId("mode.open_below");
    pub const OPEN_ABOVE: ActionId = ActionId("mode.open_above");
    pub const REPLACE_MODE: ActionId = ActionId("mode.replace");
    pub const VISUAL_CHAR: ActionId = ActionId("mode.visual_char");
    pub const VISUAL_LINE: ActionId = ActionId("mode.visual_line");
    pub const VISUAL_BLOCK: ActionId = ActionId("mode.visual_block");
    pub const SELECT_CHAR: ActionId = ActionId("mode.select_char");
    pub const SELECT_LINE: ActionId = ActionId("mode.select_line");
    pub const SELECT_BLOCK: ActionId = ActionId("mode.select_block");
    pub const TOGGLE_VISUAL_SELECT: ActionId = ActionId("mode.toggle_visual_select");
    pub const COMMAND_LINE: ActionId = ActionId("mode.command_line");
    pub const ESCAPE: ActionId = ActionId("mode.escape");

    pub const INSERT_ESCAPE: ActionId = ActionId("insert.escape");
    pub const INSERT_BACKSPACE: ActionId = ActionId("insert.backspace");
    pub const INSERT_NEWLINE: ActionId = ActionId("insert.newline");
    pub const INSERT_TAB: ActionId = ActionId("insert.tab");
    pub const CMDLINE_CANCEL: ActionId = ActionId("cmdline.cancel");
    pub const CMDLINE_EXECUTE: ActionId = ActionId("cmdline.execute");
    pub const CMDLINE_BACKSPACE: ActionId = ActionId("cmdline.backspace");

    pub const KEY_LEFT: ActionId = ActionId("key.left");
    pub const KEY_RIGHT: ActionId = ActionId("key.right");
    pub const KEY_UP: ActionId = ActionId("key.up");
    pub const KEY_DOWN: ActionId = ActionId("key.down");
    pub const KEY_HOME: ActionId = ActionId("key.home");
    pub const KEY_END: ActionId = ActionId("key.end");
    pub const KEY_SHIFT_LEFT: ActionId = ActionId("key.shift_left");
    pub const KEY_SHIFT_RIGHT: ActionId = ActionId("key.shift_right");
    pub const KEY_SHIFT_UP: ActionId = ActionId("key.shift_up");
    pub const KEY_SHIFT_DOWN: ActionId = ActionId("key.shift_down");
    pub const KEY_SHIFT_HOME: ActionId = ActionId("key.shift_home");
    pub const KEY_SHIFT_END: ActionId = ActionId("key.shift_end");
}

const EXCL: F = F::MOT_EXCLUSIVE.union(F::MOT_CHARACTERWISE);
const INCL: F = F::MOT_INCLUSIVE.union(F::MOT_CHARACTERWISE);
const LINES: F = F::MOT_LINEWISE;

/// Every built-in action.
pub fn actions() -> Vec<ActionSpec> {
    use ids::*;
    vec![
        ActionSpec::motion(LEFT, motion::left, EXCL),
        ActionSpec::motion(RIGHT, motion::right, EXCL),
        ActionSpec::motion(UP, motion::up, LINES.union(F::VERTICAL)),
        ActionSpec::motion(DOWN, motion::down, LINES.union(F::VERTICAL)),
        ActionSpec::motion(LINE_START, motion::line_start, EXCL),
        ActionSpec::motion(FIRST_NON_BLANK, motion::first_non_blank, EXCL),
        ActionSpec::motion(LINE_END, motion::line_end, INCL.union(F::STICKY_EOL)),
        ActionSpec::motion(CURRENT_LINE, motion::current_line, LINES),
        ActionSpec::motion(NEXT_LINE_START, motion::next_line_start, LINES),
        ActionSpec::motion(PREV_LINE_START, motion::prev_line_start, LINES),
        ActionSpec::motion(WORD_FORWARD, motion::word_forward, EXCL),
        ActionSpec::motion(BIG_WORD_FORWARD, motion::big_word_forward, EXCL),
        ActionSpec::motion(WORD_BACKWARD, motion::word_backward, EXCL),
        ActionSpec::motion(BIG_WORD_BACKWARD, motion::big_word_backward, EXCL),
        ActionSpec::motion(WORD_END, motion::word_end, INCL),
        ActionSpec::motion(BIG_WORD_END, motion::big_word_end, INCL),
        ActionSpec::motion(WORD_END_BACKWARD, motion::word_end_backward, INCL),
        ActionSpec::motion(BIG_WORD_END_BACKWARD, motion::big_word_end_backward, INCL),
        ActionSpec::motion(GOTO_FIRST_LINE, motion::goto_first_line, LINES),
        ActionSpec::motion(GOTO_LAST_LINE, motion::goto_last_line, LINES),
        ActionSpec::motion(FIND_FORWARD, motion::find_forward, INCL.union(F::EXPECTS_CHAR)),
        ActionSpec::motion(FIND_BACKWARD, motion::find_backward, EXCL.union(F::EXPECTS_CHAR)),
        ActionSpec::motion(TILL_FORWARD, motion::till_forward, INCL.union(F::EXPECTS_CHAR)),
        ActionSpec::motion(TILL_BACKWARD, motion::till_backward, EXCL.union(F::EXPECTS_CHAR)),
        ActionSpec::text_object(INNER_WORD, text_object::inner_word, F::MOT_CHARACTERWISE),
        ActionSpec::text_object(AROUND_WORD, text_object::around_word, F::MOT_CHARACTERWISE),
        ActionSpec::text_object(INNER_BIG_WORD, text_object::inner_big_word, F::MOT_CHARACTERWISE),
        ActionSpec::text_object(AROUND_BIG_WORD, text_object::around_big_word, F::MOT_CHARACTERWISE),
        ActionSpec::operator(DELETE, operators::delete, F::empty()),
        ActionSpec::operator(CHANGE, operators::change, F::empty()),
        ActionSpec::operator(YANK, operators::yank, F::empty()),
        ActionSpec::operator(LOWERCASE, operators::lowercase, F::empty()),
        ActionSpec::operator(UPPERCASE, operators::uppercase, F::empty()),
        ActionSpec::operator(TOGGLE_CASE, operators::toggle_case, F::empty()),
        ActionSpec::operator(DELETE_LINES, operators::delete, LINES),
        ActionSpec::operator(CHANGE_LINES, operators::change, LINES),
        ActionSpec::operator(CHANGE_LINES_END, operators::change_lines_end, LINES),
        ActionSpec::operator(YANK_LINES, operators::yank, LINES),
        ActionSpec::other(INSERT, mode::insert),
        ActionSpec::other(APPEND, mode::append),
        ActionSpec::other(INSERT_LINE_START, mode::insert_line_start),
        ActionSpec::other(APPEND_LINE_END, mode::append_line_end),
        ActionSpec::other(OPEN_BELOW, mode::open_below),
        ActionSpec::other(OPEN_ABOVE, mode::open_above),
        ActionSpec::other(REPLACE_MODE, mode::replace),
        ActionSpec::other(VISUAL_CHAR, mode::toggle_visual),
        ActionSpec::other(VISUAL_LINE, mode::toggle_visual),
        ActionSpec::other(VISUAL_BLOCK, mode::toggle_visual),
        ActionSpec::other(SELECT_CHAR, mode::start_select),
        ActionSpec::other(SELECT_LINE, mode::start_select),
        ActionSpec::other(SELECT_BLOCK, mode::start_select),
        ActionSpec::other(TOGGLE_VISUAL_SELECT, mode::toggle_visual_select),
        ActionSpec::other(COMMAND_LINE, mode::command_line),
        ActionSpec::other(ESCAPE, mode::escape),
        ActionSpec::other(INSERT_ESCAPE, mode::insert_escape),
        ActionSpec::other(INSERT_BACKSPACE, typed::backspace),
        ActionSpec::other(INSERT_NEWLINE, typed::newline),
        ActionSpec::other(INSERT_TAB, typed::tab),
        ActionSpec::other(CMDLINE_CANCEL, typed::cmdline_cancel),
        ActionSpec::other(CMDLINE_EXECUTE, typed::cmdline_execute),
        ActionSpec::other(CMDLINE_BACKSPACE, typed::cmdline_backspace),
        ActionSpec::other(KEY_LEFT, mode::special_key),
        ActionSpec::other(KEY_RIGHT, mode::special_key),
        ActionSpec::other(KEY_UP, mode::special_key),
        ActionSpec::other(KEY_DOWN, mode::special_key),
        ActionSpec::other(KEY_HOME, mode::special_key),
        ActionSpec::other(KEY_END, mode::special_key),
        ActionSpec::other(KEY_SHIFT_LEFT, mode::special_key),
        ActionSpec::other(KEY_SHIFT_RIGHT, mode::special_key),
        ActionSpec::other(KEY_SHIFT_UP, mode::special_key),
        ActionSpec::other(KEY_SHIFT_DOWN, mode::special_key),
        ActionSpec::other(KEY_SHIFT_HOME, mode::special_key),
        ActionSpec::other(KEY_SHIFT_END, mode::special_key),
    ]
}

enum Bound {
    Action(ActionId),
    Keys(&'static str),
}

/// Default bindings: `(modes, keys, target)`.
fn bindings() -> Vec<(M, &'static str, Bound)> {
    use Bound::{Action as A, Keys};
    use ids::*;
    let nio = M::N | M::O | M::I;
    let vs = M::V | M::S;
    let shifted = M::N | M::I | M::V | M::S;
    vec![
        (M::NVO, "h", A(LEFT)),
        (M::NVO, "l", A(RIGHT)),
        (M::NVO, "j", A(DOWN)),
        (M::NVO, "k", A(UP)),
        (M::NVO, "0", A(LINE_START)),
        (M::NVO, "^", A(FIRST_NON_BLANK)),
        (M::NVO, "$", A(LINE_END)),
        (M::NVO, "_", A(CURRENT_LINE)),
        (M::NVO, "+", A(NEXT_LINE_START)),
        (M::NVO, "<CR>", A(NEXT_LINE_START)),
        (M::NVO, "-", A(PREV_LINE_START)),
        (M::NVO, "w", A(WORD_FORWARD)),
        (M::NVO, "W", A(BIG_WORD_FORWARD)),
        (M::NVO, "b", A(WORD_BACKWARD)),
        (M::NVO, "B", A(BIG_WORD_BACKWARD)),
        (M::NVO, "e", A(WORD_END)),
        (M::NVO, "E", A(BIG_WORD_END)),
        (M::NVO, "ge", A(WORD_END_BACKWARD)),
        (M::NVO, "gE", A(BIG_WORD_END_BACKWARD)),
        (M::NVO, "gg", A(GOTO_FIRST_LINE)),
        (M::NVO, "G", A(GOTO_LAST_LINE)),
        (M::NVO, "f", A(FIND_FORWARD)),
        (M::NVO, "F", A(FIND_BACKWARD)),
        (M::NVO, "t", A(TILL_FORWARD)),
        (M::NVO, "T", A(TILL_BACKWARD)),
        (nio, "<Left>", A(LEFT)),
        (nio, "<Right>", A(RIGHT)),
        (nio, "<Up>", A(UP)),
        (nio, "<Down>", A(DOWN)),
        (nio, "<Home>", A(LINE_START)),
        (nio, "<End>", A(LINE_END)),
        (vs, "<Left>", A(KEY_LEFT)),
        (vs, "<Right>", A(KEY_RIGHT)),
        (vs, "<Up>", A(KEY_UP)),
        (vs, "<Down>", A(KEY_DOWN)),
        (vs, "<Home>", A(KEY_HOME)),
        (vs, "<End>", A(KEY_END)),
        (shifted, "<S-Left>", A(KEY_SHIFT_LEFT)),
        (shifted, "<S-Right>", A(KEY_SHIFT_RIGHT)),
        (shifted, "<S-Up>", A(KEY_SHIFT_UP)),
        (shifted, "<S-Down>", A(KEY_SHIFT_DOWN)),
        (shifted, "<S-Home>", A(KEY_SHIFT_HOME)),
        (shifted, "<S-End>", A(KEY_SHIFT_END)),
        (M::VO, "iw", A(INNER_WORD)),
        (M::VO, "aw", A(AROUND_WORD)),
        (M::VO, "iW", A(INNER_BIG_WORD)),
        (M::VO, "aW", A(AROUND_BIG_WORD)),
        (M::NVO, "d", A(DELETE)),
        (M::NVO, "c", A(CHANGE)),
        (M::NVO, "y", A(YANK)),
        (M::NVO, "gu", A(LOWERCASE)),
        (M::NVO, "gU", A(UPPERCASE)),
        (M::NVO, "g~", A(TOGGLE_CASE)),
        // second key of `guu`, `gUU`, `g~~`
        (M::O, "u", A(LOWERCASE)),
        (M::O, "U", A(UPPERCASE)),
        (M::O, "~", A(TOGGLE_CASE)),
        (M::V, "x", A(DELETE)),
        (M::V, "X", A(DELETE_LINES)),
        (M::V, "D", A(DELETE_LINES)),
        (M::V, "s", A(CHANGE)),
        (M::V, "S", A(CHANGE_LINES)),
        (M::V, "R", A(CHANGE_LINES)),
        (M::V, "C", A(CHANGE_LINES_END)),
        (M::V, "Y", A(YANK_LINES)),
        (M::V, "u", A(LOWERCASE)),
        (M::V, "U", A(UPPERCASE)),
        (M::V, "~", A(TOGGLE_CASE)),
        (M::N, "x", Keys("dl")),
        (M::N, "X", Keys("dh")),
        (M::N, "D", Keys("d$")),
        (M::N, "C", Keys("c$")),
        (M::N, "s", Keys("cl")),
        (M::N, "Y", Keys("yy")),
        (M::N, "~", Keys("g~ll")),
        (M::N, "i", A(INSERT)),
        (M::N, "a", A(APPEND)),
        (M::N, "I", A(INSERT_LINE_START)),
        (M::N, "A", A(APPEND_LINE_END)),
        (M::N, "o", A(OPEN_BELOW)),
        (M::N, "O", A(OPEN_ABOVE)),
        (M::N, "R", A(REPLACE_MODE)),
        (M::NV, "v", A(VISUAL_CHAR)),
        (M::NV, "V", A(VISUAL_LINE)),
        (M::NV, "<C-v>", A(VISUAL_BLOCK)),
        (M::N, "gh", A(SELECT_CHAR)),
        (M::N, "gH", A(SELECT_LINE)),
        (M::N, "g<C-h>", A(SELECT_BLOCK)),
        (vs, "<C-g>", A(TOGGLE_VISUAL_SELECT)),
        (M::NV, ":", A(COMMAND_LINE)),
        (M::NVS, "<Esc>", A(ESCAPE)),
        (M::I, "<Esc>", A(INSERT_ESCAPE)),
        (M::I, "<BS>", A(INSERT_BACKSPACE)),
        (M::I, "<CR>", A(INSERT_NEWLINE)),
        (M::I, "<Tab>", A(INSERT_TAB)),
        (M::C, "<Esc>", A(CMDLINE_CANCEL)),
        (M::C, "<CR>", A(CMDLINE_EXECUTE)),
        (M::C, "<BS>", A(CMDLINE_BACKSPACE)),
    ]
}

/// Bind the default key table into `keymap`.
pub fn bind_defaults(keymap: &mut Keymap) {
    for (modes, keys, bound) in bindings() {
        let seq = match parse_keys(keys) {
            Ok(seq) => seq,
            Err(err) => {
                warn!(target: "input.map", keys, %err, "builtin_binding_unparsable");
                continue;
            }
        };
        let target = match bound {
            Bound::Action(id) => MappingTarget::Action(id),
            Bound::Keys(to) => match parse_keys(to) {
                Ok(to) => MappingTarget::Remap(to),
                Err(err) => {
                    warn!(target: "input.map", keys = to, %err, "builtin_remap_unparsable");
                    continue;
                }
            },
        };
        keymap.bind(modes, &seq, target);
    }
}

/// Keymap and registry holding every built-in binding and action.
pub fn defaults() -> (Keymap, ActionRegistry) {
    let mut registry = ActionRegistry::new();
    for spec in actions() {
        registry.register(spec);
    }
    let mut keymap = Keymap::new();
    bind_defaults(&mut keymap);
    debug!(target: "actions.dispatch", actions = registry.len(), "builtin_defaults_ready");
    (keymap, registry)
}
