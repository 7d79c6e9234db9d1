use common::config::{ConfigManager, FileContentConfigProvider, Validate, YamlConfigSerializer};
use common::games::snake::SnakeSessionSettings;
use serde::{Deserialize, Serialize};

const CONFIG_FILE_NAME: &str = "snake_arcade_config.yaml";
const HIGH_SCORE_FILE_NAME: &str = "snake_arcade_high_score.yaml";

fn path_next_to_exe(file_name: &str) -> String {
    if let Ok(exe_path) = std::env::current_exe()
        && let Some(exe_dir) = exe_path.parent()
    {
        return exe_dir.join(file_name).to_string_lossy().into_owned();
    }
    file_name.to_string()
}

pub fn get_config_manager(
    path_override: Option<String>,
) -> ConfigManager<FileContentConfigProvider, Config, YamlConfigSerializer> {
    let path = path_override.unwrap_or_else(|| path_next_to_exe(CONFIG_FILE_NAME));
    ConfigManager::from_yaml_file(path)
}

#[derive(Debug, PartialEq, Serialize, Deserialize, Clone)]
pub struct Config {
    #[serde(default)]
    pub session: SnakeSessionSettings,
    #[serde(default = "default_high_score_path")]
    pub high_score_path: String,
}

fn default_high_score_path() -> String {
    path_next_to_exe(HIGH_SCORE_FILE_NAME)
}

impl Validate for Config {
    fn validate(&self) -> Result<(), String> {
        self.session.validate()?;
        if self.high_score_path.trim().is_empty() {
            return Err("high_score_path must not be empty".to_string());
        }
        Ok(())
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            session: SnakeSessionSettings::default(),
            high_score_path: default_high_score_path(),
        }
    }
}
