use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::warn;

use crate::app_dirs::AppDirs;
use crate::session::{validate_target_minutes, Mode, Session, DEFAULT_TARGET_MINUTES};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    pub mode: Mode,
    pub target_minutes: u32,
    pub history_file: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            mode: Mode::Stopwatch,
            target_minutes: DEFAULT_TARGET_MINUTES,
            history_file: None,
        }
    }
}

impl Config {
    /// Same config with the mode and timer target last used in `session`.
    pub fn remember(&self, session: &Session) -> Self {
        Self {
            mode: session.mode(),
            target_minutes: session.target_minutes(),
            history_file: self.history_file.clone(),
        }
    }

    fn sanitized(mut self) -> Self {
        if let Err(e) = validate_target_minutes(self.target_minutes) {
            warn!(error = %e, "ignoring configured timer target");
            self.target_minutes = DEFAULT_TARGET_MINUTES;
        }
        self
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
        Self {
            path: AppDirs::config_path(),
        }
    }

    pub fn with_path<P: AsRef<Path>>(p: P) -> Self {
        Self {
            path: p.as_ref().to_path_buf(),
        }
    }
}

impl Default for FileConfigStore {
    fn default() -> Self {
        Self::new()
    }
}

impl ConfigStore for FileConfigStore {
    fn load(&self) -> Config {
        if let Ok(bytes) = fs::read(&self.path) {
            match serde_json::from_slice::<Config>(&bytes) {
                Ok(cfg) => return cfg.sanitized(),
                Err(e) => warn!(path = %self.path.display(), error = %e, "config unreadable"),
            }
        }
        Config::default()
    }

    fn save(&self, cfg: &Config) -> std::io::Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let data = serde_json::to_vec_pretty(cfg).map_err(std::io::Error::other)?;
        fs::write(&self.path, data)
    }
}
