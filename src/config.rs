use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::bank::Difficulty;
use crate::game::{GameSettings, DEFAULT_FEEDBACK_DELAY, DEFAULT_QUESTION_SECS};

/// Preferences remembered between runs
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    pub muted: bool,
    pub music_enabled: bool,
    pub question_secs: u32,
    pub feedback_delay_ms: u64,
    pub player_name: String,
    pub difficulty: Difficulty,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            muted: false,
            music_enabled: true,
            question_secs: DEFAULT_QUESTION_SECS,
            feedback_delay_ms: DEFAULT_FEEDBACK_DELAY.as_millis() as u64,
            player_name: String::new(),
            difficulty: Difficulty::default(),
        }
    }
}

impl Config {
    pub fn game_settings(&self) -> GameSettings {
        GameSettings {
            question_secs: self.question_secs,
            feedback_delay: Duration::from_millis(self.feedback_delay_ms),
        }
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
        let path = if let Some(pd) = ProjectDirs::from("", "", "spookquiz") {
            pd.config_dir().join("config.json")
        } else {
            PathBuf::from("spookquiz_config.json")
        };
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
        if let Ok(bytes) = fs::read(&self.path) {
            match serde_json::from_slice::<Config>(&bytes) {
                Ok(cfg) => return cfg,
                Err(e) => log::warn!("ignoring malformed {}: {e}", self.path.display()),
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
