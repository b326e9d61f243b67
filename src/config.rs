//! Session configuration.
//!
//! The configuration is loaded from a JSON file (`--config <path>`, or
//! `$XDG_CONFIG_HOME/river-init/config.json`).  Every section is optional and
//! falls back to the compiled-in session, so `{}` reproduces the stock setup.
//!
//! # Example
//!
//! ```json
//! {
//!   "control": "riverctl",
//!   "appearance": { "background_color": "0x002b36" },
//!   "repeat": { "rate": 50, "delay": 300 },
//!   "tags": [
//!     { "name": "1:WWW", "key": "1", "mask": 1, "programs": ["firefox"] }
//!   ],
//!   "daemons": ["mako", "waybar"]
//! }
//! ```

use crate::command::Keybinding;
use crate::river::bindings::default_bindings;
use crate::river::ctl::{RiverCtl, RIVERCTL};
use crate::tags::{default_tags, TagDefinition, TagTable, TagTableError};
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Top-level configuration.
///
/// Unknown keys are ignored so the file can carry sections for newer
/// versions.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Control utility, resolved through `PATH`.
    pub control: String,

    /// Bindings registered before the tag bindings.
    pub bindings: Vec<Keybinding>,

    /// Tag table, in registration order.
    pub tags: Vec<TagDefinition>,

    pub appearance: AppearanceConfig,

    pub repeat: RepeatConfig,

    /// `rule-add` argument lists, e.g. `["-app-id", "bar", "csd"]`.
    pub rules: Vec<Vec<String>>,

    /// Background daemons, started without waiting.  Each entry is a command
    /// line; `$HOME` style variables are expanded.
    pub daemons: Vec<String>,

    pub layout: LayoutConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            control: RIVERCTL.into(),
            bindings: default_bindings(),
            tags: default_tags(),
            appearance: AppearanceConfig::default(),
            repeat: RepeatConfig::default(),
            rules: vec![
                vec![
                    "-app-id".into(),
                    "float*".into(),
                    "-title".into(),
                    "foo".into(),
                    "float".into(),
                ],
                vec!["-app-id".into(), "bar".into(), "csd".into()],
            ],
            daemons: vec!["mako".into(), "waybar".into()],
            layout: LayoutConfig::default(),
        }
    }
}

/// Background and border colours, in river's `0xRRGGBB[AA]` notation.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct AppearanceConfig {
    pub background_color: String,
    pub border_color_focused: String,
    pub border_color_unfocused: String,
}

impl Default for AppearanceConfig {
    fn default() -> Self {
        Self {
            background_color: "0x002b36".into(),
            border_color_focused: "0x93a1a1".into(),
            border_color_unfocused: "0x586e75".into(),
        }
    }
}

/// Keyboard repeat: `rate` repeats per second after `delay` milliseconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct RepeatConfig {
    pub rate: u32,
    pub delay: u32,
}

impl Default for RepeatConfig {
    fn default() -> Self {
        Self {
            rate: 50,
            delay: 300,
        }
    }
}

/// Layout generator settings.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
    /// Namespace passed to `default-layout`.
    pub generator: String,
    /// Command line that starts the generator in the background.
    pub command: String,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            generator: "rivertile".into(),
            command: "rivertile -view-padding 1 -outer-padding 0".into(),
        }
    }
}

impl Config {
    /// Load configuration from a JSON file at `path`.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path).map_err(|source| {
            if source.kind() == std::io::ErrorKind::NotFound {
                ConfigError::NotFound(path.to_path_buf())
            } else {
                ConfigError::Read {
                    path: path.to_path_buf(),
                    source,
                }
            }
        })?;
        serde_json::from_str(&contents).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Pick the configuration for this session.
    ///
    /// An `explicit` path must exist and parse.  Otherwise `default_path` is
    /// tried; only its absence selects the compiled-in defaults, a file that
    /// exists but cannot be read or parsed is still an error.
    pub fn resolve(
        explicit: Option<&Path>,
        default_path: &Path,
    ) -> Result<(Self, ConfigSource), ConfigError> {
        if let Some(path) = explicit {
            return Ok((Self::load(path)?, ConfigSource::Explicit(path.to_path_buf())));
        }
        match Self::load(default_path) {
            Ok(cfg) => Ok((cfg, ConfigSource::File(default_path.to_path_buf()))),
            Err(ConfigError::NotFound(_)) => Ok((
                Self::default(),
                ConfigSource::Defaults(default_path.to_path_buf()),
            )),
            Err(e) => Err(e),
        }
    }

    /// Validate and build the tag table.
    pub fn tag_table(&self) -> Result<TagTable, TagTableError> {
        TagTable::new(self.tags.clone())
    }

    pub fn river_ctl(&self) -> RiverCtl {
        RiverCtl::new(self.control.as_str())
    }
}

/// Where [`Config::resolve`] found the configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigSource {
    /// The file named on the command line.
    Explicit(PathBuf),
    /// The file at the default location.
    File(PathBuf),
    /// Nothing at the default location (the path that was tried).
    Defaults(PathBuf),
}

/// Error from loading or parsing a configuration file.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("config error: {} does not exist", .0.display())]
    NotFound(PathBuf),

    #[error("config error: failed to read {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("config error: failed to parse {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}
