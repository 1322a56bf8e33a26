use core_actions::text_object::camel_word_range;
use core_text::Buffer;
use core_text::camel::{is_camel_end, is_camel_start};
use proptest::prelude::*;
use proptest::sample::Index;

fn is_word(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}

/// The caret begins a hump: uppercase after lowercase, or after a non-letter.
fn begins_hump(chars: &[char], offset: usize) -> bool {
    let cur = chars[offset];
    match offset.checked_sub(1).map(|p| chars[p]) {
        None => true,
        Some(p) => (cur.is_ascii_uppercase() && p.is_ascii_lowercase()) || !p.is_ascii_alphabetic(),
    }
}

fn ends_hump(chars: &[char], offset: usize) -> bool {
    let cur = chars[offset];
    match chars.get(offset + 1) {
        None => true,
        Some(&n) => (cur.is_ascii_lowercase() && n.is_ascii_uppercase()) || !n.is_ascii_alphabetic(),
    }
}

proptest! {
    #[test]
    fn camel_word_crosses_at_most_count_boundaries(
        line in "[a-zA-Z0-9 .]{1,24}",
        pick in any::<Index>(),
        count in 1usize..4,
    ) {
        let text = format!("{line}\n");
        let chars: Vec<char> = text.chars().collect();
        let buf = Buffer::from_str("prop", &text).unwrap();
        let offset = pick.index(line.chars().count());

        let inner = camel_word_range(&buf, offset, count, false).unwrap();
        let around = camel_word_range(&buf, offset, count, true).unwrap();

        if !is_word(chars[offset]) {
            prop_assert!(inner.is_empty());
            prop_assert_eq!(inner.start, offset);
            return Ok(());
        }

        prop_assert!(inner.start <= offset && offset <= inner.end);
        if begins_hump(&chars, offset) {
            prop_assert_eq!(inner.start, offset);
        }
        if ends_hump(&chars, offset) {
            prop_assert_eq!(inner.end, offset);
        }

        // Humps passed on the way out, not counting the one the range stops on.
        let starts_between = (inner.start + 1..offset).filter(|&o| is_camel_start(&buf, o)).count();
        let ends_between = (offset + 1..inner.end).filter(|&o| is_camel_end(&buf, o)).count();
        prop_assert!(starts_between < count);
        prop_assert!(ends_between < count);
        if count == 1 {
            prop_assert!(chars[inner.start..=inner.end].iter().all(|c| is_word(*c)));
        }

        prop_assert_eq!(around.start, inner.start);
        prop_assert_eq!(around.end, inner.end + 1);
        prop_assert_ne!(around, inner);
    }

    #[test]
    fn camel_word_past_document_end_is_none(line in "[a-zA-Z]{0,8}") {
        let buf = Buffer::from_str("prop", &line).unwrap();
        let len = line.chars().count();
        prop_assert!(camel_word_range(&buf, len, 1, false).is_none());
    }
}
