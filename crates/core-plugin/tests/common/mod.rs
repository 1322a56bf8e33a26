#![allow(dead_code)]

use core_actions::{Engine, KeyOutcome};
use core_config::Options;
use core_model::{EditorModel, HostSurface};
use core_plugin::{BUILTIN_EXTENSIONS, ExtensionHost, StaticExtensionHost};
use core_state::Mode;

/// Engine with every built-in extension loaded, over an in-memory host.
pub struct Session {
    pub engine: Engine,
    pub model: EditorModel,
}

impl Session {
    pub fn new(marked: &str) -> Self {
        let mut engine = Engine::new(Options::default());
        let mut host = StaticExtensionHost::from_names(BUILTIN_EXTENSIONS).expect("built-in names");
        host.load_all(&mut engine).expect("extensions load");
        let mut model = EditorModel::from_marked(marked).expect("valid marked text");
        model.attach_listener(engine.guard().clone());
        Self { engine, model }
    }

    pub fn keys(&mut self, keys: &str) -> KeyOutcome {
        self.engine
            .handle_keys(&mut self.model, keys)
            .expect("valid key notation")
    }

    pub fn marked(&self) -> String {
        self.model.to_marked()
    }

    pub fn mode(&self) -> Mode {
        self.engine.mode()
    }

    pub fn bells(&self) -> usize {
        self.model.bells()
    }

    pub fn selection(&self) -> Option<(usize, usize)> {
        self.model.selection(self.model.primary_caret()?)
    }
}

pub fn run(before: &str, keys: &str) -> (String, Mode) {
    let mut s = Session::new(before);
    s.keys(keys);
    (s.marked(), s.mode())
}
