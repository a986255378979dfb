//! Configuration management with layered loading
//!
//! Precedence (lowest to highest):
//! 1. Compiled defaults
//! 2. Global config: `$XDG_CONFIG_HOME/pathtree/pathtree.toml`
//! 3. Explicit config file passed with `--config`
//! 4. Environment variables: `PATHTREE_*` prefix

use std::path::{Path, PathBuf};

use config::{Config, ConfigError, Environment};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, instrument, warn};

use crate::tree_traits::RenderOptions;

#[derive(Error, Debug)]
pub enum SettingsError {
    #[error("read {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("parse {}: {message}", .path.display())]
    Parse { path: PathBuf, message: String },

    #[error("environment: {0}")]
    Env(#[from] config::ConfigError),

    #[error("serialize settings: {0}")]
    Serialize(#[from] toml::ser::Error),
}

pub type SettingsResult<T> = Result<T, SettingsError>;

/// Unified configuration for pathtree.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Settings {
    /// Render `name = value` instead of bare names in tree output
    pub show_values: bool,
    /// Keep running a script after a failing command
    pub keep_going: bool,
    /// Label for the root node in tree output
    pub root_label: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            show_values: true,
            keep_going: false,
            root_label: "/".into(),
        }
    }
}

/// Raw settings for intermediate parsing (`None` means "not specified").
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct RawSettings {
    pub show_values: Option<bool>,
    pub keep_going: Option<bool>,
    pub root_label: Option<String>,
}

/// Get the XDG config directory for pathtree.
pub fn global_config_dir() -> Option<PathBuf> {
    ProjectDirs::from("", "", "pathtree").map(|dirs| dirs.config_dir().to_path_buf())
}

/// Get the path to the global config file.
pub fn global_config_path() -> Option<PathBuf> {
    global_config_dir().map(|dir| dir.join("pathtree.toml"))
}

fn env_source() -> Environment {
    Environment::with_prefix("PATHTREE")
        .prefix_separator("_")
        .separator("__")
}

fn env_value<T>(key: &str, result: Result<T, ConfigError>) -> Option<T> {
    match result {
        Ok(val) => Some(val),
        Err(ConfigError::NotFound(_)) => None,
        Err(e) => {
            warn!("ignoring PATHTREE_{}: {}", key.to_uppercase(), e);
            None
        }
    }
}

/// Load a TOML file into RawSettings for manual merging.
fn load_raw_settings(path: &Path) -> SettingsResult<RawSettings> {
    let content = std::fs::read_to_string(path).map_err(|source| SettingsError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    toml::from_str(&content).map_err(|e| SettingsError::Parse {
        path: path.to_path_buf(),
        message: e.to_string(),
    })
}

impl Settings {
    /// Overlay wins for every field it specifies.
    pub fn merge_with(&self, overlay: &RawSettings) -> Self {
        Self {
            show_values: overlay.show_values.unwrap_or(self.show_values),
            keep_going: overlay.keep_going.unwrap_or(self.keep_going),
            root_label: overlay
                .root_label
                .clone()
                .unwrap_or_else(|| self.root_label.clone()),
        }
    }

    /// Load settings with layered precedence.
    ///
    /// A missing global file is skipped; a missing `explicit` file is an error.
    #[instrument(level = "debug")]
    pub fn load(explicit: Option<&Path>) -> SettingsResult<Self> {
        let mut current = Self::default();

        if let Some(global_path) = global_config_path() {
            if global_path.exists() {
                debug!("loading global config {}", global_path.display());
                current = current.merge_with(&load_raw_settings(&global_path)?);
            }
        }

        current = current.apply_file(explicit)?;
        current.apply_env_overrides(env_source())
    }

    /// Loads defaults plus an optional file, skipping global config and the
    /// environment.
    pub fn load_file_only(explicit: Option<&Path>) -> SettingsResult<Self> {
        Self::default().apply_file(explicit)
    }

    fn apply_file(self, explicit: Option<&Path>) -> SettingsResult<Self> {
        match explicit {
            Some(path) => {
                debug!("loading config {}", path.display());
                Ok(self.merge_with(&load_raw_settings(path)?))
            }
            None => Ok(self),
        }
    }

    /// Apply PATHTREE_* environment variables as explicit overrides.
    ///
    /// A variable that is set but does not parse is logged and skipped.
    fn apply_env_overrides(mut self, source: Environment) -> SettingsResult<Self> {
        let config = Config::builder().add_source(source).build()?;

        if let Some(val) = env_value("show_values", config.get_bool("show_values")) {
            self.show_values = val;
        }
        if let Some(val) = env_value("keep_going", config.get_bool("keep_going")) {
            self.keep_going = val;
        }
        if let Some(val) = env_value("root_label", config.get_string("root_label")) {
            self.root_label = val;
        }
        Ok(self)
    }

    pub fn to_toml(&self) -> SettingsResult<String> {
        Ok(toml::to_string_pretty(self)?)
    }

    pub fn render_options(&self) -> RenderOptions {
        RenderOptions {
            show_values: self.show_values,
            root_label: self.root_label.clone(),
        }
    }
}
