//! `data:<mime>;base64,<payload>` URLs.
//!
//! Camera frames travel from the webview as data URLs and the OCR server
//! returns its crops the same way.

use base64::{engine::general_purpose, Engine as _};
use regex::Regex;

/// Decoded data URL
#[derive(Debug, Clone, PartialEq)]
pub struct DataUrl {
    pub mime: String,
    pub bytes: Vec<u8>,
}

/// Decode a base64 data URL
pub fn decode(url: &str) -> Result<DataUrl, String> {
    let re = Regex::new(r"(?s)^data:([^;,]*)((?:;[^;,]*)*),(.*)$")
        .map_err(|e| format!("Regex error: {}", e))?;

    let caps = re
        .captures(url.trim())
        .ok_or_else(|| "Not a data URL".to_string())?;

    let params = caps.get(2).map(|m| m.as_str()).unwrap_or_default();
    if !params.split(';').any(|p| p.eq_ignore_ascii_case("base64")) {
        return Err("Only base64 data URLs are supported".to_string());
    }

    let mime = match caps.get(1).map(|m| m.as_str().trim()) {
        Some(m) if !m.is_empty() => m.to_string(),
        _ => "application/octet-stream".to_string(),
    };

    // Some encoders wrap long payloads
    let payload: String = caps
        .get(3)
        .map(|m| m.as_str())
        .unwrap_or_default()
        .chars()
        .filter(|c| !c.is_whitespace())
        .collect();

    let bytes = general_purpose::STANDARD
        .decode(payload.as_bytes())
        .map_err(|e| format!("Failed to decode base64: {}", e))?;

    Ok(DataUrl { mime, bytes })
}

/// Encode bytes as a base64 data URL
pub fn encode(mime: &str, bytes: &[u8]) -> String {
    format!("data:{};base64,{}", mime, general_purpose::STANDARD.encode(bytes))
}
