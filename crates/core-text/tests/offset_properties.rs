use core_text::{Buffer, TextSource};
use proptest::prelude::*;
use proptest::sample::Index;

proptest! {
    #[test]
    fn normalized_offset_stays_on_its_line(text in "[a-c \n]{1,30}", raw in 0usize..40, allow_end in any::<bool>()) {
        let buf = Buffer::from_str("prop", &text).unwrap();
        let off = buf.normalize_offset(raw, allow_end);
        prop_assert!(off <= buf.len_chars());
        let line = buf.line_of_offset(off);
        prop_assert!(buf.line_start(line) <= off && off <= buf.line_end(line));
        if !allow_end && buf.line_end(line) > buf.line_start(line) {
            prop_assert!(off < buf.line_end(line));
        }
    }

    #[test]
    fn mark_follows_its_character(
        text in "[a-z]{2,20}",
        mark in any::<Index>(),
        at in any::<Index>(),
        inserted in "[A-Z]{1,4}",
    ) {
        let mut buf = Buffer::from_str("prop", &text).unwrap();
        let k = mark.index(text.len());
        let at = at.index(text.len() + 1);
        prop_assume!(at != k);
        let expected = buf.char_at(k);
        let m = buf.create_mark(k);
        buf.insert(at, &inserted);
        let moved = buf.mark_offset(m).unwrap();
        prop_assert_eq!(buf.char_at(moved), expected);
        buf.remove(at, at + inserted.len());
        prop_assert_eq!(buf.mark_offset(m), Some(k));
    }
}
