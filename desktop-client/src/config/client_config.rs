use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use snake_common::config::{ConfigStore, FileContentConfigProvider, Validate};
use snake_common::games::snake::GameSettings;

use super::WindowConfig;

const CONFIG_FILE_NAME: &str = "snake_client_config.yaml";

fn get_config_path() -> PathBuf {
    if let Ok(exe_path) = std::env::current_exe()
        && let Some(exe_dir) = exe_path.parent()
    {
        return exe_dir.join(CONFIG_FILE_NAME);
    }
    PathBuf::from(CONFIG_FILE_NAME)
}

/// Store for the client config; `path` overrides the file next to the executable.
pub fn get_config_store(path: Option<PathBuf>) -> ConfigStore<FileContentConfigProvider, ClientConfig> {
    ConfigStore::from_yaml_file(path.unwrap_or_else(get_config_path))
}

#[derive(Debug, PartialEq, Serialize, Deserialize, Clone)]
pub struct ClientConfig {
    pub window: WindowConfig,
    pub game: GameSettings,
    pub high_score_file: String,
    #[serde(default = "default_event_log_size")]
    pub event_log_size: usize,
}

fn default_event_log_size() -> usize {
    8
}

impl Validate for ClientConfig {
    fn validate(&self) -> Result<(), String> {
        self.window.validate()?;
        self.game.validate()?;
        if self.high_score_file.is_empty() {
            return Err("high_score_file must not be empty".to_string());
        }
        if self.event_log_size == 0 {
            return Err("event_log_size must be greater than 0".to_string());
        }
        Ok(())
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            window: WindowConfig::default(),
            game: GameSettings::default(),
            high_score_file: "snake_high_score.yaml".to_string(),
            event_log_size: default_event_log_size(),
        }
    }
}
