use core_actions::span_resolver::{adjust_exclusive, linewise_range};
use core_state::RangeKind;
use core_text::{Buffer, TextSource};
use proptest::prelude::*;
use proptest::sample::Index;

fn document() -> impl Strategy<Value = String> {
    prop::collection::vec((0usize..3, "[a-z]{1,5}"), 2..6).prop_map(|lines| {
        lines
            .into_iter()
            .map(|(indent, word)| format!("{}{word}\n", " ".repeat(indent)))
            .collect()
    })
}

proptest! {
    /// An exclusive range ending on another line's first non-blank covers
    /// whole lines.
    #[test]
    fn end_on_first_non_blank_goes_linewise(
        text in document(),
        first in any::<Index>(),
        gap in any::<Index>(),
        column in any::<Index>(),
    ) {
        let buf = Buffer::from_str("prop", &text).unwrap();
        let lines = buf.line_count();
        let i = first.index(lines - 1);
        let j = i + 1 + gap.index(lines - 1 - i);
        let start = buf.line_start(i);
        let a = start + column.index(buf.line_end(i) - start);
        let b = buf.first_non_blank(j);

        let range = adjust_exclusive(&buf, a, b);
        prop_assert_eq!(range, linewise_range(&buf, i, j));
        prop_assert_eq!(range.kind, RangeKind::Linewise);
    }

    /// Ending at column 0 of an indented line pulls the end back to the
    /// previous line break.
    #[test]
    fn end_at_indented_column_zero_stays_characterwise(
        text in document(),
        column in any::<Index>(),
    ) {
        let buf = Buffer::from_str("prop", &text).unwrap();
        let j = 1;
        prop_assume!(buf.first_non_blank(j) > buf.line_start(j));
        let fnb = buf.first_non_blank(0);
        prop_assume!(buf.line_end(0) > fnb + 1);
        let a = fnb + 1 + column.index(buf.line_end(0) - fnb - 1);

        let range = adjust_exclusive(&buf, a, buf.line_start(j));
        prop_assert_eq!(range.kind, RangeKind::Characterwise);
        prop_assert_eq!((range.start, range.end), (a, buf.line_end(0)));
    }
}
