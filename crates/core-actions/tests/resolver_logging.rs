mod common;
use common::*;

use core_actions::builtin::ids;
use core_events::parse_keys;
use core_keymap::{BindOutcome, MappingMode, MappingTarget};
use core_state::{Mode, SelectionKind};
use std::io::Write;
use std::sync::{Arc, Mutex, MutexGuard};
use tracing::Level;
use tracing::subscriber::with_default;
use tracing_subscriber::fmt::MakeWriter;

#[derive(Clone)]
struct BufferWriter {
    inner: Arc<Mutex<Vec<u8>>>,
}

struct LockedWriter<'a> {
    guard: MutexGuard<'a, Vec<u8>>,
}

impl Write for LockedWriter<'_> {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.guard.extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}

impl<'a> MakeWriter<'a> for BufferWriter {
    type Writer = LockedWriter<'a>;

    fn make_writer(&'a self) -> Self::Writer {
        LockedWriter {
            guard: self.inner.lock().expect("log buffer poisoned"),
        }
    }
}

fn capture(level: Level, f: impl FnOnce()) -> String {
    let buffer = Arc::new(Mutex::new(Vec::new()));
    let subscriber = tracing_subscriber::fmt()
        .with_max_level(level)
        .with_target(true)
        .with_ansi(false)
        .without_time()
        .with_writer(BufferWriter {
            inner: buffer.clone(),
        })
        .finish();
    with_default(subscriber, f);
    let bytes = buffer.lock().unwrap().clone();
    String::from_utf8(bytes).unwrap()
}

#[test]
fn recursive_remap_warns() {
    let out = capture(Level::WARN, || {
        let mut s = Session::new("{caret}ab\n");
        s.engine.bind_keys(MappingMode::N, "Q", "Q").unwrap();
        s.keys("Q");
    });
    assert!(out.contains("WARN input.map:"));
    assert!(out.contains("recursive_mapping"));
}

#[test]
fn compose_is_logged_at_debug() {
    let out = capture(Level::DEBUG, || {
        let mut s = Session::new("{caret}foo bar\n");
        s.keys("dw");
    });
    assert!(out.contains("actions.compose:"));
    assert!(out.contains("operator=operator.delete"));
}

#[test]
fn operator_pending_from_select_is_logged_and_ignored() {
    let out = capture(Level::WARN, || {
        let mut s = Session::new("{caret}abc\n");
        let lhs = parse_keys("<C-d>").unwrap();
        let bound = s.engine.bind(MappingMode::S, &lhs, MappingTarget::Action(ids::DELETE));
        assert_eq!(bound, BindOutcome::Added);
        s.keys("gh");
        s.keys("<C-d>");
        assert_eq!(s.mode(), Mode::Select(SelectionKind::Character));
        s.keys("<Esc>");
        assert_eq!(s.mode(), Mode::Normal);
    });
    assert!(out.contains("WARN state.mode:"));
    assert!(out.contains("illegal_transition_ignored"));
}
