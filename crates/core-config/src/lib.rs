//! Configuration loading and parsing.
//!
//! Parses `vix.toml` (or an override path provided by the binary):
//!
//! ```toml
//! [editor]
//! tab_width = 4        # columns inserted by <Tab> when expand_tab is set
//! expand_tab = true    # <Tab> inserts spaces instead of '\t'
//! auto_indent = true   # <Enter> copies the current line's leading whitespace
//!
//! [undo]
//! levels = 1000        # entries kept before the oldest is dropped
//! ```
//!
//! A missing file or a parse error yields defaults; parse errors are logged. Unknown
//! fields are ignored so older binaries tolerate newer files. Out-of-range values are
//! clamped by `Config::effective` and the clamp is logged.

use anyhow::Result;
use serde::Deserialize;
use std::{fs, path::PathBuf};
use tracing::{info, warn};

pub const CONFIG_FILE_NAME: &str = "vix.toml";
pub const MAX_TAB_WIDTH: usize = 16;

#[derive(Debug, Deserialize, Clone, PartialEq, Eq)]
pub struct EditorConfig {
    #[serde(default = "EditorConfig::default_tab_width")]
    pub tab_width: usize,
    #[serde(default = "EditorConfig::default_true")]
    pub expand_tab: bool,
    #[serde(default = "EditorConfig::default_true")]
    pub auto_indent: bool,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            tab_width: Self::default_tab_width(),
            expand_tab: true,
            auto_indent: true,
        }
    }
}

impl EditorConfig {
    const fn default_tab_width() -> usize {
        4
    }
    const fn default_true() -> bool {
        true
    }
}

#[derive(Debug, Deserialize, Clone, PartialEq, Eq)]
pub struct UndoConfig {
    #[serde(default = "UndoConfig::default_levels")]
    pub levels: usize,
}

impl Default for UndoConfig {
    fn default() -> Self {
        Self {
            levels: Self::default_levels(),
        }
    }
}

impl UndoConfig {
    const fn default_levels() -> usize {
        1000
    }
}

#[derive(Debug, Deserialize, Default, Clone, PartialEq, Eq)]
pub struct ConfigFile {
    #[serde(default)]
    pub editor: EditorConfig,
    #[serde(default)]
    pub undo: UndoConfig,
}

#[derive(Debug, Clone, Default)]
pub struct Config {
    pub raw: Option<String>, // original file string (optional)
    pub file: ConfigFile,    // parsed (or default) data
}

/// Options the editing core consumes, after clamping.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EditorOptions {
    pub tab_width: usize,
    pub expand_tab: bool,
    pub auto_indent: bool,
    pub undo_levels: usize,
}

impl Default for EditorOptions {
    fn default() -> Self {
        Config::default().effective()
    }
}

/// Config path following platform conventions (XDG / AppData Roaming).
pub fn discover() -> PathBuf {
    // The working directory wins over the platform config dir.
    let local = PathBuf::from(CONFIG_FILE_NAME);
    if local.exists() {
        return local;
    }
    if let Some(dir) = dirs::config_dir() {
        return dir.join("vix").join(CONFIG_FILE_NAME);
    }
    PathBuf::from(CONFIG_FILE_NAME)
}

pub fn load_from(path: Option<PathBuf>) -> Result<Config> {
    let path = path.unwrap_or_else(discover);
    let Ok(content) = fs::read_to_string(&path) else {
        info!(target: "config", path = %path.display(), "config_not_found_using_defaults");
        return Ok(Config::default());
    };
    match toml::from_str::<ConfigFile>(&content) {
        Ok(file) => {
            info!(target: "config", path = %path.display(), "config_loaded");
            Ok(Config {
                raw: Some(content),
                file,
            })
        }
        Err(e) => {
            warn!(target: "config", path = %path.display(), error = %e, "config_parse_failed_using_defaults");
            Ok(Config::default())
        }
    }
}

impl Config {
    /// Clamp parsed values into their valid ranges.
    pub fn effective(&self) -> EditorOptions {
        let editor = &self.file.editor;
        let tab_width = editor.tab_width.clamp(1, MAX_TAB_WIDTH);
        if tab_width != editor.tab_width {
            info!(target: "config", raw = editor.tab_width, clamped = tab_width, "tab_width_clamped");
        }
        let undo_levels = self.file.undo.levels.max(1);
        if undo_levels != self.file.undo.levels {
            info!(target: "config", raw = self.file.undo.levels, clamped = undo_levels, "undo_levels_clamped");
        }
        EditorOptions {
            tab_width,
            expand_tab: editor.expand_tab,
            auto_indent: editor.auto_indent,
            undo_levels,
        }
    }
}
