//! `camelcasemotion`: motions and a text object over camelCase humps.
//!
//! | keys  | modes | kind                  |
//! |-------|-------|-----------------------|
//! | `\w`  | NVO   | next hump, exclusive  |
//! | `\b`  | NVO   | previous hump, exclusive |
//! | `\e`  | NVO   | next hump end, inclusive |
//! | `\ge` | NVO   | previous hump end, inclusive |
//! | `i\w` | VO    | hump without its last char, exclusive |
//! | `a\w` | VO    | whole hump, exclusive |

use core_actions::text_object::camel_word_range;
use core_actions::{ActionSpec, CommandFlags, MotionContext};
use core_keymap::{ActionId, MappingMode};
use core_state::TextRange;
use core_text::camel::{find_next_camel_end, find_next_camel_start};

use crate::{Extension, ExtensionBinding};

pub const NAME: &str = "camelcasemotion";

pub const CAMEL_RIGHT: ActionId = ActionId("camel.right");
pub const CAMEL_LEFT: ActionId = ActionId("camel.left");
pub const CAMEL_END_RIGHT: ActionId = ActionId("camel.end_right");
pub const CAMEL_END_LEFT: ActionId = ActionId("camel.end_left");
pub const INNER_CAMEL_WORD: ActionId = ActionId("camel.inner_word");
pub const AROUND_CAMEL_WORD: ActionId = ActionId("camel.around_word");

fn signed_count(ctx: &MotionContext<'_>, forward: bool) -> Option<isize> {
    let n = isize::try_from(ctx.count()).ok()?;
    Some(if forward { n } else { -n })
}

pub fn camel_right(ctx: &MotionContext<'_>) -> Option<usize> {
    find_next_camel_start(ctx.text, ctx.offset, signed_count(ctx, true)?)
}

pub fn camel_left(ctx: &MotionContext<'_>) -> Option<usize> {
    find_next_camel_start(ctx.text, ctx.offset, signed_count(ctx, false)?)
}

pub fn camel_end_right(ctx: &MotionContext<'_>) -> Option<usize> {
    find_next_camel_end(ctx.text, ctx.offset, signed_count(ctx, true)?)
}

pub fn camel_end_left(ctx: &MotionContext<'_>) -> Option<usize> {
    find_next_camel_end(ctx.text, ctx.offset, signed_count(ctx, false)?)
}

pub fn inner_camel_word(ctx: &MotionContext<'_>) -> Option<TextRange> {
    camel_word_range(ctx.text, ctx.offset, ctx.count(), false)
}

pub fn around_camel_word(ctx: &MotionContext<'_>) -> Option<TextRange> {
    camel_word_range(ctx.text, ctx.offset, ctx.count(), true)
}

#[derive(Debug, Clone, Copy, Default)]
pub struct CamelCaseMotion;

impl Extension for CamelCaseMotion {
    fn name(&self) -> &'static str {
        NAME
    }

    fn actions(&self) -> Vec<ActionSpec> {
        use CommandFlags as F;
        vec![
            ActionSpec::motion(CAMEL_RIGHT, camel_right, F::MOT_EXCLUSIVE),
            ActionSpec::motion(CAMEL_LEFT, camel_left, F::MOT_EXCLUSIVE),
            ActionSpec::motion(CAMEL_END_RIGHT, camel_end_right, F::MOT_INCLUSIVE),
            ActionSpec::motion(CAMEL_END_LEFT, camel_end_left, F::MOT_INCLUSIVE),
            ActionSpec::text_object(INNER_CAMEL_WORD, inner_camel_word, F::MOT_CHARACTERWISE),
            ActionSpec::text_object(AROUND_CAMEL_WORD, around_camel_word, F::MOT_CHARACTERWISE),
        ]
    }

    fn bindings(&self) -> Vec<ExtensionBinding> {
        use MappingMode as M;
        vec![
            ExtensionBinding::new(M::NVO, "\\w", CAMEL_RIGHT),
            ExtensionBinding::new(M::NVO, "\\b", CAMEL_LEFT),
            ExtensionBinding::new(M::NVO, "\\e", CAMEL_END_RIGHT),
            ExtensionBinding::new(M::NVO, "\\ge", CAMEL_END_LEFT),
            ExtensionBinding::new(M::VO, "i\\w", INNER_CAMEL_WORD),
            ExtensionBinding::new(M::VO, "a\\w", AROUND_CAMEL_WORD),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core_actions::{Command, CommandKind};
    use core_state::{CaretId, Mode};
    use core_text::Buffer;

    fn at(text: &str, offset: usize, count: u32, f: fn(&MotionContext<'_>) -> Option<usize>) -> Option<usize> {
        let buf = Buffer::from_str("t", text).unwrap();
        let cmd = Command::new(CommandKind::Motion, CAMEL_RIGHT, CommandFlags::MOT_EXCLUSIVE)
            .with_count(Some(count));
        let ctx = MotionContext {
            text: &buf,
            caret: CaretId(0),
            offset,
            column: 0,
            command: &cmd,
            mode: Mode::Normal,
            operator_pending: false,
        };
        f(&ctx)
    }

    #[test]
    fn humps_forward_and_back() {
        let s = "parseHTMLDoc\n";
        assert_eq!(at(s, 0, 1, camel_right), Some(5));
        assert_eq!(at(s, 0, 2, camel_right), Some(9));
        assert_eq!(at(s, 11, 1, camel_left), Some(9));
        assert_eq!(at(s, 0, 1, camel_end_right), Some(4));
        assert_eq!(at(s, 0, 2, camel_end_right), Some(8));
        assert_eq!(at(s, 11, 1, camel_end_left), Some(8));
    }

    #[test]
    fn no_hump_in_direction() {
        assert_eq!(at("foo\n", 0, 1, camel_left), None);
    }

    #[test]
    fn bindings_target_registered_actions() {
        let ext = CamelCaseMotion;
        let ids: Vec<ActionId> = ext.actions().iter().map(|a| a.id).collect();
        assert!(ext.bindings().iter().all(|b| ids.contains(&b.action)));
    }
}
