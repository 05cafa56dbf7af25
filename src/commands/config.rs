use super::ocr::OcrState;
use crate::models::config::AppConfig;
use crate::services::config::{apply_env_overrides, ConfigManager, API_URL_ENV};
use crate::services::submission::SubmissionController;
use std::sync::Mutex;
use tauri::State;

/// State wrapper for configuration manager
pub type ConfigManagerState = Mutex<ConfigManager>;

/// Initialize config manager state
pub fn init_config_manager() -> Result<ConfigManagerState, String> {
    let manager = ConfigManager::new()?;
    Ok(Mutex::new(manager))
}

/// Save entire application configuration and reconnect the OCR client
#[tauri::command]
pub fn save_config(
    state: State<ConfigManagerState>,
    ocr: State<OcrState>,
    config: AppConfig,
) -> Result<(), String> {
    let manager = state
        .lock()
        .map_err(|e| format!("Failed to lock config manager: {}", e))?;

    manager.save(&config)?;

    let mut effective = manager.load()?;
    apply_env_overrides(&mut effective, std::env::var(API_URL_ENV).ok());
    ocr.replace_controller(SubmissionController::from_config(&effective)?);

    Ok(())
}

/// Load entire application configuration
#[tauri::command]
pub fn load_config(state: State<ConfigManagerState>) -> Result<AppConfig, String> {
    let manager = state
        .lock()
        .map_err(|e| format!("Failed to lock config manager: {}", e))?;

    manager.load()
}

/// Get config file path
#[tauri::command]
pub fn get_config_path(state: State<ConfigManagerState>) -> Result<String, String> {
    let manager = state
        .lock()
        .map_err(|e| format!("Failed to lock config manager: {}", e))?;

    Ok(manager
        .config_file_path()
        .to_str()
        .unwrap_or("")
        .to_string())
}
