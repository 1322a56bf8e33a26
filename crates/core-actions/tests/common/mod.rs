#![allow(dead_code)] // Shared across many integration tests; each test binary uses a subset of helpers.

use core_actions::{Engine, KeyOutcome};
use core_config::{KeyModel, Options, SelectModeOption};
use core_model::{EditorModel, HostSurface};
use core_state::Mode;

/// One editing session over an in-memory host.
pub struct Session {
    pub engine: Engine,
    pub model: EditorModel,
}

impl Session {
    pub fn new(marked: &str) -> Self {
        Self::with_options(marked, Options::default())
    }

    pub fn with_options(marked: &str, options: Options) -> Self {
        let engine = Engine::new(options);
        let mut model = EditorModel::from_marked(marked).expect("valid marked text");
        model.attach_listener(engine.guard().clone());
        Self { engine, model }
    }

    /// Feed keys in `<...>` notation; returns the outcome of the last key.
    pub fn keys(&mut self, keys: &str) -> KeyOutcome {
        self.engine
            .handle_keys(&mut self.model, keys)
            .expect("valid key notation")
    }

    /// Deliver queued host notifications to the engine.
    pub fn pump(&mut self) {
        self.engine.pump(&mut self.model);
    }

    pub fn mode(&self) -> Mode {
        self.engine.mode()
    }

    pub fn text(&self) -> String {
        self.model.contents()
    }

    pub fn marked(&self) -> String {
        self.model.to_marked()
    }

    pub fn caret(&self) -> usize {
        let id = self.model.primary_caret().expect("a caret");
        self.model.caret_offset(id).expect("live caret")
    }

    pub fn bells(&self) -> usize {
        self.model.bells()
    }

    pub fn unnamed(&self) -> Option<String> {
        self.model.registers().get(None).map(|r| r.text.clone())
    }
}

/// Run `keys` over `before` and return the marked result and final mode.
pub fn run(before: &str, keys: &str) -> (String, Mode) {
    let mut s = Session::new(before);
    s.keys(keys);
    (s.marked(), s.mode())
}

pub fn options(keymodel: &[KeyModel], selectmode: &[SelectModeOption]) -> Options {
    Options {
        keymodel: keymodel.to_vec(),
        selectmode: selectmode.to_vec(),
        ..Options::default()
    }
}
