mod common;
use common::*;

use core_events::parse_keys;
use core_model::HostSurface;
use proptest::prelude::*;

const KEYS: &[&str] = &[
    "h", "j", "k", "l", "w", "b", "e", "W", "0", "$", "x", "dw", "cw", "yy", "p", "v", "V", "gh",
    "iw", "i", "a", "A", "o", "z", "<Esc>", "<S-Right>", "<Right>", "<C-g>", "<BS>", "2", ":",
];

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    /// Whatever the engine does to the host is never reported back to it.
    #[test]
    fn engine_edits_are_never_queued(picks in prop::collection::vec(prop::sample::select(KEYS), 0..40)) {
        let mut s = Session::new("{caret}foo bar\n  baz qux\nend\n");
        for notation in picks {
            for key in parse_keys(notation).unwrap() {
                s.engine.handle_key(&mut s.model, key);
                prop_assert!(s.model.take_events().is_empty());
                prop_assert!(!s.engine.guard().is_locked());
            }
        }
    }
}
