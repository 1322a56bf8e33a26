//! Extension host.
//!
//! Extensions are compiled in and contribute actions and key bindings to an
//! [`Engine`]. There is no dynamic loading: a [`StaticExtensionHost`] is
//! assembled at startup from the names enabled in the configuration and
//! loads each extension at most once.

pub mod argtextobj;
pub mod camelcase;

use std::collections::BTreeSet;

use core_actions::{ActionSpec, Engine};
use core_events::parse_keys;
use core_keymap::{ActionId, BindOutcome, MappingMode, MappingTarget};
use thiserror::Error;
use tracing::{info, warn};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ExtensionError {
    #[error("unknown extension: {0}")]
    UnknownExtension(String),
}

/// A key binding contributed by an extension, in key notation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExtensionBinding {
    pub modes: MappingMode,
    pub keys: &'static str,
    pub action: ActionId,
}

impl ExtensionBinding {
    pub const fn new(modes: MappingMode, keys: &'static str, action: ActionId) -> Self {
        Self {
            modes,
            keys,
            action,
        }
    }
}

/// A bundle of actions and the keys that reach them.
pub trait Extension {
    /// Name used in configuration (`[extensions] enabled = [...]`).
    fn name(&self) -> &'static str;
    fn actions(&self) -> Vec<ActionSpec>;
    fn bindings(&self) -> Vec<ExtensionBinding>;
}

/// Collection-oriented host that installs extensions into an engine.
pub trait ExtensionHost {
    /// Stable identifier for logs.
    fn name(&self) -> &'static str;
    /// Install every extension not yet loaded. Repeated calls must not
    /// register anything twice.
    fn load_all(&mut self, engine: &mut Engine) -> anyhow::Result<()>;
}

impl<T: ExtensionHost + ?Sized> ExtensionHost for &mut T {
    fn name(&self) -> &'static str {
        (**self).name()
    }
    fn load_all(&mut self, engine: &mut Engine) -> anyhow::Result<()> {
        (**self).load_all(engine)
    }
}

/// Names accepted by [`builtin`].
pub const BUILTIN_EXTENSIONS: &[&str] = &[camelcase::NAME, argtextobj::NAME];

/// Look up a compiled-in extension by its configuration name.
pub fn builtin(name: &str) -> Result<Box<dyn Extension>, ExtensionError> {
    match name {
        camelcase::NAME => Ok(Box::new(camelcase::CamelCaseMotion)),
        argtextobj::NAME => Ok(Box::new(argtextobj::ArgTextObj)),
        other => Err(ExtensionError::UnknownExtension(other.to_string())),
    }
}

/// Extensions fixed at startup.
#[derive(Default)]
pub struct StaticExtensionHost {
    extensions: Vec<Box<dyn Extension>>,
    loaded: BTreeSet<&'static str>,
}

impl StaticExtensionHost {
    pub fn new() -> Self {
        Self::default()
    }

    /// Host for the extensions named in `names`. Duplicates are dropped.
    pub fn from_names<S: AsRef<str>>(names: &[S]) -> Result<Self, ExtensionError> {
        let mut host = Self::new();
        for name in names {
            host.add(builtin(name.as_ref())?);
        }
        Ok(host)
    }

    pub fn add(&mut self, extension: Box<dyn Extension>) {
        if self.extensions.iter().any(|e| e.name() == extension.name()) {
            return;
        }
        self.extensions.push(extension);
    }

    pub fn is_loaded(&self, name: &str) -> bool {
        self.loaded.contains(name)
    }

    pub fn len(&self) -> usize {
        self.extensions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.extensions.is_empty()
    }
}

impl std::fmt::Debug for StaticExtensionHost {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let names: Vec<&str> = self.extensions.iter().map(|e| e.name()).collect();
        f.debug_struct("StaticExtensionHost")
            .field("extensions", &names)
            .field("loaded", &self.loaded)
            .finish()
    }
}

fn install(engine: &mut Engine, extension: &dyn Extension) -> anyhow::Result<()> {
    for spec in extension.actions() {
        engine.register_action(spec);
    }
    for binding in extension.bindings() {
        let keys = parse_keys(binding.keys)?;
        match engine.bind(binding.modes, &keys, MappingTarget::Action(binding.action)) {
            BindOutcome::Conflict => {
                warn!(target: "plugin", extension = extension.name(), keys = binding.keys, "binding_conflict")
            }
            BindOutcome::Added | BindOutcome::AlreadyBound => {}
        }
    }
    Ok(())
}

impl ExtensionHost for StaticExtensionHost {
    fn name(&self) -> &'static str {
        "static-extension-host"
    }

    fn load_all(&mut self, engine: &mut Engine) -> anyhow::Result<()> {
        for extension in &self.extensions {
            let name = extension.name();
            if self.loaded.contains(name) {
                continue;
            }
            install(engine, extension.as_ref())?;
            self.loaded.insert(name);
            info!(target: "plugin", extension = name, "extension_loaded");
        }
        Ok(())
    }
}
