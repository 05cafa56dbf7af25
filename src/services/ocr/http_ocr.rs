use super::engine::OcrBackend;
use super::normalize;
use crate::error::SubmitError;
use crate::models::capture::{CardSide, ImagePayload};
use crate::models::config::ApiConfig;
use crate::models::ocr_result::OcrResult;
use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use serde_json::Value;
use std::time::Duration;

/// HTTP OCR client that posts both card sides to the OCR server
#[derive(Clone)]
pub struct HttpOcrClient {
    client: reqwest::Client,
    base_url: String,
    ocr_url: String,
}

impl HttpOcrClient {
    /// Create a new HTTP OCR client
    pub fn new(config: &ApiConfig) -> Result<Self, String> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| format!("Failed to create HTTP client: {}", e))?;

        Ok(Self {
            client,
            base_url: config.normalized_base_url(),
            ocr_url: config.ocr_url(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Check if server is healthy
    pub async fn health_check(&self) -> Result<(), String> {
        let url = format!("{}/health", self.base_url);
        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| format!("Health check failed: {}", e))?;

        if !response.status().is_success() {
            return Err(format!("Health check failed: HTTP {}", response.status()));
        }
        Ok(())
    }

    fn image_part(payload: ImagePayload) -> Result<Part, SubmitError> {
        Part::bytes(payload.bytes)
            .file_name(payload.file_name)
            .mime_str(&payload.mime)
            .map_err(|e| SubmitError::unexpected(format!("Invalid image type: {}", e)))
    }

    async fn read_body(response: reqwest::Response) -> Result<Value, SubmitError> {
        let text = response
            .text()
            .await
            .map_err(|e| SubmitError::transport(format!("Failed to read response: {}", e)))?;

        serde_json::from_str(&text).map_err(|e| {
            tracing::warn!(error = %e, body_len = text.len(), "OCR server returned a non-JSON body");
            SubmitError::transport(format!("Failed to parse response: {}", e))
        })
    }
}

fn raw_len(text: &Option<String>) -> usize {
    text.as_deref().map_or(0, str::len)
}

#[async_trait]
impl OcrBackend for HttpOcrClient {
    async fn recognize(
        &self,
        front: ImagePayload,
        back: ImagePayload,
    ) -> Result<OcrResult, SubmitError> {
        let url = &self.ocr_url;
        tracing::info!(
            url = %url,
            front_bytes = front.len(),
            back_bytes = back.len(),
            "Submitting card images"
        );

        let form = Form::new()
            .part(CardSide::Front.as_str(), Self::image_part(front)?)
            .part(CardSide::Back.as_str(), Self::image_part(back)?);

        let response = self
            .client
            .post(url)
            .multipart(form)
            .send()
            .await
            .map_err(|e| SubmitError::transport(format!("Request failed: {}", e)))?;

        let status = response.status();
        let body = Self::read_body(response).await?;

        if !status.is_success() {
            tracing::warn!(status = %status, "OCR server returned an error");
        }

        let result = normalize::interpret(status.is_success(), body);
        if let Ok(result) = &result {
            tracing::info!(
                warnings = result.warnings.len(),
                cropped = result.has_cropped_images(),
                raw_front_len = raw_len(&result.raw_front_text),
                raw_back_len = raw_len(&result.raw_back_text),
                "OCR result received"
            );
        }
        result
    }
}
