use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;

pub use self::highlights::Highlights;
pub use self::logs::Logs;
pub use self::notification::{Notification, Notifications};
pub use self::sound::Sound;
use crate::environment;

pub mod highlights;
pub mod logs;
pub mod notification;
pub mod sound;

const CONFIG_TEMPLATE: &[u8] = include_bytes!("../../config.toml");

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub highlights: Highlights,
    pub notifications: Notifications,
    pub sound: Sound,
    pub filters: Filters,
    pub history: History,
    pub logs: Logs,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Filters {
    /// Entries of the form `nick`, `#channel` or `#channel nick`.
    pub ignore: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct History {
    /// Messages kept per channel before the oldest are dropped.
    pub limit: usize,
}

impl Default for History {
    fn default() -> Self {
        Self {
            limit: crate::history::DEFAULT_LIMIT,
        }
    }
}

impl Config {
    pub fn config_dir() -> Result<PathBuf, Error> {
        let dir = environment::config_dir();

        if !dir.exists() {
            fs::create_dir_all(&dir)?;
        }

        Ok(dir)
    }

    pub fn path() -> Result<PathBuf, Error> {
        Ok(Self::config_dir()?.join(environment::CONFIG_FILE_NAME))
    }

    pub fn load() -> Result<Self, Error> {
        Self::load_from(&Self::path()?)
    }

    pub fn load_from(path: &Path) -> Result<Self, Error> {
        let content = fs::read_to_string(path)
            .map_err(|e| Error::Read(e.to_string()))?;

        Self::parse(&content)
    }

    pub fn parse(content: &str) -> Result<Self, Error> {
        toml::from_str(content).map_err(|e| Error::Parse(e.to_string()))
    }

    pub fn create_template_config() {
        let Ok(config_dir) = Self::config_dir() else {
            return;
        };

        // Checks if a config file is there
        if config_dir.join(environment::CONFIG_FILE_NAME).exists() {
            return;
        }

        let template = config_dir.join("config.template.toml");
        if let Err(error) = fs::write(&template, CONFIG_TEMPLATE) {
            log::warn!("failed to write {}: {error}", template.display());
        }
    }
}

#[derive(Debug, Error, Clone)]
pub enum Error {
    #[error("config could not be read: {0}")]
    Read(String),
    #[error("{0}")]
    Io(String),
    #[error("{0}")]
    Parse(String),
}

impl From<std::io::Error> for Error {
    fn from(error: std::io::Error) -> Self {
        Self::Io(error.to_string())
    }
}
