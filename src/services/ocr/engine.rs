use crate::error::SubmitError;
use crate::models::capture::ImagePayload;
use crate::models::ocr_result::OcrResult;
use async_trait::async_trait;

/// OCR backend trait - abstraction over whatever reads the card
#[async_trait]
pub trait OcrBackend: Send + Sync {
    /// Read both sides of a card and return the normalized result
    async fn recognize(
        &self,
        front: ImagePayload,
        back: ImagePayload,
    ) -> Result<OcrResult, SubmitError>;
}
