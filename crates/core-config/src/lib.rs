//! Configuration loading and parsing.
//!
//! Parses `vimkeys.toml` (or an override path provided by the binary) into a
//! `ConfigFile` and exposes the immutable `Options` value the engine reads.
//! Unknown fields are ignored so newer files keep loading; a file that fails
//! to parse falls back to defaults with a warning.

use anyhow::Result;
use serde::Deserialize;
use std::{fs, path::PathBuf};
use tracing::{info, warn};

/// One flag of the `keymodel` option.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum KeyModel {
    /// Shifted special keys start a selection.
    StartSel,
    /// Unshifted special keys stop Visual or Select.
    StopSel,
    StopSelect,
    StopVisual,
    ContinueSelect,
    ContinueVisual,
}

/// One flag of the `selectmode` option.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SelectModeOption {
    Mouse,
    Key,
    Cmd,
    /// Selections made by the host itself start Select mode.
    IdeaSelection,
}

#[derive(Debug, Deserialize, Clone, PartialEq, Eq)]
pub struct OptionsConfig {
    #[serde(default = "OptionsConfig::default_keymodel")]
    pub keymodel: Vec<KeyModel>,
    #[serde(default)]
    pub selectmode: Vec<SelectModeOption>,
}

impl Default for OptionsConfig {
    fn default() -> Self {
        Self {
            keymodel: Self::default_keymodel(),
            selectmode: Vec::new(),
        }
    }
}

impl OptionsConfig {
    fn default_keymodel() -> Vec<KeyModel> {
        vec![KeyModel::ContinueSelect, KeyModel::StopSelect]
    }
}

#[derive(Debug, Deserialize, Clone, PartialEq, Eq)]
pub struct InputConfig {
    #[serde(default = "InputConfig::default_timeout")] // Vim default: enabled
    pub timeout: bool,
    #[serde(default = "InputConfig::default_timeoutlen")]
    pub timeoutlen: u32,
}

impl Default for InputConfig {
    fn default() -> Self {
        Self {
            timeout: Self::default_timeout(),
            timeoutlen: Self::default_timeoutlen(),
        }
    }
}

impl InputConfig {
    const fn default_timeout() -> bool {
        true
    }
    const fn default_timeoutlen() -> u32 {
        1000
    }
}

#[derive(Debug, Deserialize, Default, Clone, PartialEq, Eq)]
pub struct ExtensionsConfig {
    #[serde(default)]
    pub enabled: Vec<String>,
}

#[derive(Debug, Deserialize, Default, Clone, PartialEq, Eq)]
pub struct ConfigFile {
    #[serde(default)]
    pub options: OptionsConfig,
    #[serde(default)]
    pub input: InputConfig,
    #[serde(default)]
    pub extensions: ExtensionsConfig,
}

/// Read-only option surface consulted by the engine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Options {
    pub keymodel: Vec<KeyModel>,
    pub selectmode: Vec<SelectModeOption>,
    pub timeout: bool,
    pub timeoutlen: u32,
    pub extensions: Vec<String>,
}

impl Default for Options {
    fn default() -> Self {
        ConfigFile::default().options()
    }
}

impl Options {
    pub fn has_keymodel(&self, flag: KeyModel) -> bool {
        self.keymodel.contains(&flag)
    }

    pub fn has_selectmode(&self, flag: SelectModeOption) -> bool {
        self.selectmode.contains(&flag)
    }
}

impl ConfigFile {
    pub fn options(&self) -> Options {
        Options {
            keymodel: self.options.keymodel.clone(),
            selectmode: self.options.selectmode.clone(),
            timeout: self.input.timeout,
            timeoutlen: self.input.timeoutlen,
            extensions: self.extensions.enabled.clone(),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct Config {
    pub raw: Option<String>, // original file string (optional)
    pub file: ConfigFile,    // parsed (or default) data
    pub path: Option<PathBuf>,
}

impl Config {
    pub fn options(&self) -> Options {
        self.file.options()
    }
}

/// Best-effort config path following platform conventions (XDG / AppData Roaming).
pub fn discover() -> PathBuf {
    let local = PathBuf::from("vimkeys.toml");
    if local.exists() {
        return local;
    }
    if let Some(dir) = dirs::config_dir() {
        return dir.join("vimkeys").join("vimkeys.toml");
    }
    PathBuf::from("vimkeys.toml")
}

pub fn load_from(path: Option<PathBuf>) -> Result<Config> {
    let path = path.unwrap_or_else(discover);
    let Ok(content) = fs::read_to_string(&path) else {
        info!(target: "config", path = %path.display(), "config_absent_using_defaults");
        return Ok(Config::default());
    };
    match toml::from_str::<ConfigFile>(&content) {
        Ok(file) => {
            info!(target: "config", path = %path.display(), "config_loaded");
            Ok(Config {
                raw: Some(content),
                file,
                path: Some(path),
            })
        }
        Err(e) => {
            warn!(target: "config", path = %path.display(), error = %e, "config_parse_failed_using_defaults");
            Ok(Config::default())
        }
    }
}
