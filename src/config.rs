//! Configuration loading and management
//!
//! Handles parsing of `.todo.toml` configuration files.

use serde::{Deserialize, Serialize};
use std::path::{Component, Path, PathBuf};

use crate::persistence::DEFAULT_SAVE_DIR;

/// Name of the configuration file in the base directory
pub const CONFIG_FILE: &str = ".todo.toml";

/// Main configuration structure
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// Directory holding save files, relative to the base directory
    #[serde(default = "default_save_dir")]
    pub save_dir: String,

    /// Working-copy file carrying tasks between invocations
    #[serde(default = "default_session_file")]
    pub session_file: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            save_dir: default_save_dir(),
            session_file: default_session_file(),
        }
    }
}

fn default_save_dir() -> String {
    DEFAULT_SAVE_DIR.to_string()
}

fn default_session_file() -> String {
    ".todo/session.json".to_string()
}

impl Config {
    /// Load configuration from a `.todo.toml` file
    pub fn load(path: &Path) -> crate::error::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from the base directory, or return defaults
    /// when it has no `.todo.toml`.
    ///
    /// A config file that is present must parse and validate, and the
    /// resolved session file must not land in the resolved save directory.
    pub fn load_from_dir(base: &Path) -> crate::error::Result<Self> {
        let config_path = base.join(CONFIG_FILE);
        let config = if config_path.exists() {
            Self::load(&config_path)?
        } else {
            Self::default()
        };
        config.check_layout(&config.save_dir_in(base), &config.session_file_in(base))?;
        Ok(config)
    }

    /// Save configuration to a file
    pub fn save(&self, path: &Path) -> crate::error::Result<()> {
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Absolute save directory for a base directory
    pub fn save_dir_in(&self, base: &Path) -> PathBuf {
        base.join(&self.save_dir)
    }

    /// Absolute session file path for a base directory
    pub fn session_file_in(&self, base: &Path) -> PathBuf {
        base.join(&self.session_file)
    }

    fn validate(&self) -> crate::error::Result<()> {
        if self.save_dir.trim().is_empty() {
            return Err(crate::error::Error::InvalidConfig(
                "save_dir cannot be empty".to_string(),
            ));
        }
        if self.session_file.trim().is_empty() {
            return Err(crate::error::Error::InvalidConfig(
                "session_file cannot be empty".to_string(),
            ));
        }
        self.check_layout(Path::new(&self.save_dir), Path::new(&self.session_file))
    }

    /// Save files are the regular files directly in `save_dir`, so the
    /// session file must not sit there.
    fn check_layout(&self, save_dir: &Path, session_file: &Path) -> crate::error::Result<()> {
        let session_file = normalize_path(session_file);
        if session_file.parent() == Some(normalize_path(save_dir).as_path()) {
            return Err(crate::error::Error::InvalidConfig(format!(
                "session_file '{}' cannot live inside save_dir '{}'",
                self.session_file, self.save_dir
            )));
        }
        Ok(())
    }
}

/// Lexically resolve `.` and `..` components without touching the disk.
pub(crate) fn normalize_path(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => match out.components().next_back() {
                Some(Component::Normal(_)) => {
                    out.pop();
                }
                Some(Component::RootDir) | Some(Component::Prefix(_)) => {}
                _ => out.push(".."),
            },
            other => out.push(other.as_os_str()),
        }
    }
    out
}
