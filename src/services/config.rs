use crate::models::config::{normalize_base_url, AppConfig};
use std::fs;
use std::path::PathBuf;

/// Environment variable overriding `api.base_url`
pub const API_URL_ENV: &str = "KIMLIK_OCR_API_URL";

/// Configuration manager for app settings
pub struct ConfigManager {
    config_dir: PathBuf,
    config_path: PathBuf,
}

impl ConfigManager {
    /// Create a new ConfigManager instance
    ///
    /// This will create the config directory if it doesn't exist.
    pub fn new() -> Result<Self, String> {
        let config_dir = dirs::config_dir()
            .ok_or("Failed to determine config directory")?
            .join("kimlik-ocr");

        fs::create_dir_all(&config_dir)
            .map_err(|e| format!("Failed to create config directory: {}", e))?;

        Ok(Self::with_dir(config_dir))
    }

    /// Manager rooted at an explicit directory (created lazily on save)
    pub fn with_dir(config_dir: PathBuf) -> Self {
        let config_path = config_dir.join("config.json");
        Self {
            config_dir,
            config_path,
        }
    }

    /// Save configuration to disk
    pub fn save(&self, config: &AppConfig) -> Result<(), String> {
        config.validate()?;

        fs::create_dir_all(&self.config_dir)
            .map_err(|e| format!("Failed to create config directory: {}", e))?;

        let mut config = config.clone();
        config.api.base_url = normalize_base_url(&config.api.base_url);

        // Pretty print for human readability
        let json = serde_json::to_string_pretty(&config)
            .map_err(|e| format!("Failed to serialize config: {}", e))?;

        fs::write(&self.config_path, json)
            .map_err(|e| format!("Failed to write config file: {}", e))?;

        tracing::info!(path = %self.config_path.display(), "Configuration saved");
        Ok(())
    }

    /// Load configuration from disk
    ///
    /// If config file doesn't exist, returns default configuration
    pub fn load(&self) -> Result<AppConfig, String> {
        if !self.config_exists() {
            return Ok(AppConfig::default());
        }

        let content = fs::read_to_string(&self.config_path)
            .map_err(|e| format!("Failed to read config file: {}", e))?;

        let config: AppConfig = serde_json::from_str(&content)
            .map_err(|e| format!("Failed to parse config file: {}", e))?;

        config
            .validate()
            .map_err(|e| format!("Invalid config file: {}", e))?;

        Ok(config)
    }

    /// Load configuration with environment overrides applied
    pub fn load_effective(&self) -> Result<AppConfig, String> {
        let mut config = self.load()?;
        apply_env_overrides(&mut config, std::env::var(API_URL_ENV).ok());
        config
            .validate()
            .map_err(|e| format!("Invalid {} override: {}", API_URL_ENV, e))?;
        Ok(config)
    }

    /// Get the config file path
    pub fn config_file_path(&self) -> &PathBuf {
        &self.config_path
    }

    /// Check if config file exists
    pub fn config_exists(&self) -> bool {
        self.config_path.exists()
    }
}

/// Apply the API URL override, normalizing the base URL either way
pub fn apply_env_overrides(config: &mut AppConfig, api_url: Option<String>) {
    if let Some(url) = api_url.filter(|u| !u.trim().is_empty()) {
        tracing::debug!(url = %url, "OCR server URL taken from environment");
        config.api.base_url = url;
    }
    config.api.base_url = normalize_base_url(&config.api.base_url);
}
