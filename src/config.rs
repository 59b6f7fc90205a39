use crate::app_dirs::AppDirs;
use crate::definition::{DEFAULT_DICTIONARY_URL, DEFAULT_LOOKUP_TIMEOUT};
use crate::error::Result;
use crate::session::{SessionConfig, DEFAULT_FLASH};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

pub const DEFAULT_LIST_FILE: &str = "spellingList.txt";

/// Persisted defaults. Command-line flags override these per run.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    pub list_file: PathBuf,
    /// Kept signed so a bad value is rejected rather than wrapped.
    pub required_repeats: i64,
    pub flash_ms: u64,
    pub lookup_timeout_ms: u64,
    pub dictionary_url: String,
    pub reveal_word: bool,
    pub definitions: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            list_file: PathBuf::from(DEFAULT_LIST_FILE),
            required_repeats: 1,
            flash_ms: DEFAULT_FLASH.as_millis() as u64,
            lookup_timeout_ms: DEFAULT_LOOKUP_TIMEOUT.as_millis() as u64,
            dictionary_url: DEFAULT_DICTIONARY_URL.to_string(),
            reveal_word: true,
            definitions: true,
        }
    }
}

impl Config {
    pub fn session_config(&self) -> Result<SessionConfig> {
        Ok(SessionConfig::new(self.required_repeats)?
            .with_flash(Duration::from_millis(self.flash_ms))
            .with_reveal(self.reveal_word))
    }

    pub fn lookup_timeout(&self) -> Duration {
        Duration::from_millis(self.lookup_timeout_ms)
    }
}

pub trait ConfigStore {
    fn load(&self) -> Config;
    fn save(&self, cfg: &Config) -> std::io::Result<()>;
}

#[derive(Debug, Clone)]
pub struct FileConfigStore {
    path: PathBuf,
}

impl FileConfigStore {
    #[allow(clippy::new_without_default)]
    pub fn new() -> Self {
        let path =
            AppDirs::config_path().unwrap_or_else(|| PathBuf::from("spelldrill_config.json"));
        Self { path }
    }

    pub fn with_path<P: AsRef<Path>>(p: P) -> Self {
        Self {
            path: p.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Default for FileConfigStore {
    fn default() -> Self {
        Self::new()
    }
}

impl ConfigStore for FileConfigStore {
    fn load(&self) -> Config {
        let Ok(bytes) = fs::read(&self.path) else {
            return Config::default();
        };
        match serde_json::from_slice::<Config>(&bytes) {
            Ok(cfg) => cfg,
            Err(e) => {
                log::warn!("ignoring unreadable config {}: {e}", self.path.display());
                Config::default()
            }
        }
    }

    fn save(&self, cfg: &Config) -> std::io::Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let data = serde_json::to_vec_pretty(cfg)?;
        fs::write(&self.path, data)
    }
}
