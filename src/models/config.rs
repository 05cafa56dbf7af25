use serde::{Deserialize, Serialize};

/// OCR server connection
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ApiConfig {
    /// Base URL, `POST {base_url}/ocr` is called on submit
    pub base_url: String,
    pub timeout_secs: u64,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8000".to_string(),
            timeout_secs: 60,
        }
    }
}

impl ApiConfig {
    /// Base URL without trailing slashes
    pub fn normalized_base_url(&self) -> String {
        normalize_base_url(&self.base_url)
    }

    /// Full URL of the OCR endpoint
    pub fn ocr_url(&self) -> String {
        format!("{}/ocr", self.normalized_base_url())
    }
}

/// Simulated upload progress
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct UploadConfig {
    pub tick_ms: u64,
    pub start: u8,
    pub step: u8,
    /// Highest value the timer may reach before the response arrives
    pub cap: u8,
    /// How long 100% stays visible before loading clears
    pub settle_ms: u64,
}

impl Default for UploadConfig {
    fn default() -> Self {
        Self {
            tick_ms: 500,
            start: 10,
            step: 10,
            cap: 90,
            settle_ms: 400,
        }
    }
}

/// PDF export
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ExportConfig {
    pub file_name: String,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            file_name: "kimlik.pdf".to_string(),
        }
    }
}

/// Complete application configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub api: ApiConfig,
    #[serde(default)]
    pub upload: UploadConfig,
    #[serde(default)]
    pub export: ExportConfig,
}

impl AppConfig {
    /// Validate values the user can edit
    pub fn validate(&self) -> Result<(), String> {
        let base_url = self.api.normalized_base_url();
        if !(base_url.starts_with("http://") || base_url.starts_with("https://")) {
            return Err(format!("Invalid OCR server URL: '{}'", self.api.base_url));
        }

        if self.api.timeout_secs == 0 {
            return Err("Request timeout must be at least 1 second".to_string());
        }

        if self.upload.step == 0 {
            return Err("Progress step must be greater than 0".to_string());
        }

        if self.upload.cap <= self.upload.start || self.upload.cap > 100 {
            return Err(format!(
                "Progress cap must be in ({}, 100], got {}",
                self.upload.start, self.upload.cap
            ));
        }

        if self.upload.tick_ms == 0 {
            return Err("Progress tick must be greater than 0 ms".to_string());
        }

        if self.export.file_name.trim().is_empty() {
            return Err("Export file name must not be empty".to_string());
        }

        Ok(())
    }
}

/// Strip trailing slashes and surrounding whitespace from a base URL
pub fn normalize_base_url(url: &str) -> String {
    url.trim().trim_end_matches('/').to_string()
}
