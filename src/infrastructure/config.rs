use crate::domain::{config::MinitermConfig, error::{MinitermError, MinitermResult}};
use std::fs;
use std::path::{Path, PathBuf};

/// Configuration manager
pub struct ConfigManager {
    global_config_path: Option<PathBuf>,
}

impl ConfigManager {
    /// Create new configuration manager
    pub fn new() -> Self {
        Self {
            global_config_path: Self::get_global_config_path(),
        }
    }

    /// Load the global configuration, or defaults if there is none
    pub fn load_config(&self) -> MinitermResult<MinitermConfig> {
        match &self.global_config_path {
            Some(path) if path.exists() => self.load_config_from_path(path),
            _ => Ok(MinitermConfig::default()),
        }
    }

    /// Load configuration from specific path
    pub fn load_config_from_path(&self, path: &Path) -> MinitermResult<MinitermConfig> {
        let content = fs::read_to_string(path).map_err(|e| MinitermError::Config {
            message: format!("Failed to read config file {}: {}", path.display(), e),
        })?;

        let config: MinitermConfig = toml::from_str(&content).map_err(|e| MinitermError::Config {
            message: format!("Failed to parse config file {}: {}", path.display(), e),
        })?;
        config.validate()?;
        Ok(config)
    }

    fn get_global_config_path() -> Option<PathBuf> {
        dirs::home_dir().map(|home| home.join(".config").join("miniterm").join("config.toml"))
    }
}

impl Default for ConfigManager {
    fn default() -> Self {
        Self::new()
    }
}
