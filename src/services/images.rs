//! Where the two card images come from: the camera or picked files.

use crate::error::SubmitError;
use crate::messages;
use crate::models::capture::{CapturedPair, CardSide, ImagePayload};
use crate::utils::data_url;
use async_trait::async_trait;
use std::path::{Path, PathBuf};

/// A pair of card images waiting to be submitted
#[async_trait]
pub trait CardImageSource: Send + Sync {
    /// Whether an image is present for `side` (checked before any I/O)
    fn has(&self, side: CardSide) -> bool;

    /// Validation message when a side is missing
    fn missing_message(&self) -> &'static str;

    /// Load the image bytes for upload
    async fn payload(&self, side: CardSide) -> Result<ImagePayload, SubmitError>;

    fn is_complete(&self) -> bool {
        self.has(CardSide::Front) && self.has(CardSide::Back)
    }
}

/// Photos taken by the camera
#[derive(Debug, Clone, Default)]
pub struct CameraImages {
    pub front: Option<ImagePayload>,
    pub back: Option<ImagePayload>,
}

impl CameraImages {
    /// Build from data URLs, as kept by the window
    pub fn from_data_urls(front: Option<&str>, back: Option<&str>) -> Result<Self, SubmitError> {
        let decode = |url: Option<&str>, side: CardSide| -> Result<Option<ImagePayload>, SubmitError> {
            url.filter(|u| !u.is_empty())
                .map(|u| {
                    let decoded = data_url::decode(u).map_err(SubmitError::unexpected)?;
                    let extension = extension_for_mime(&decoded.mime);
                    Ok(ImagePayload::new(
                        decoded.bytes,
                        decoded.mime,
                        format!("{}.{}", side.as_str(), extension),
                    ))
                })
                .transpose()
        };

        Ok(Self {
            front: decode(front, CardSide::Front)?,
            back: decode(back, CardSide::Back)?,
        })
    }

    fn slot(&self, side: CardSide) -> Option<&ImagePayload> {
        match side {
            CardSide::Front => self.front.as_ref(),
            CardSide::Back => self.back.as_ref(),
        }
    }
}

impl From<CapturedPair> for CameraImages {
    fn from(pair: CapturedPair) -> Self {
        Self {
            front: Some(pair.front),
            back: Some(pair.back),
        }
    }
}

#[async_trait]
impl CardImageSource for CameraImages {
    fn has(&self, side: CardSide) -> bool {
        self.slot(side).is_some_and(|p| !p.is_empty())
    }

    fn missing_message(&self) -> &'static str {
        messages::MISSING_PHOTOS
    }

    async fn payload(&self, side: CardSide) -> Result<ImagePayload, SubmitError> {
        self.slot(side)
            .cloned()
            .ok_or_else(|| SubmitError::Validation(self.missing_message().to_string()))
    }
}

/// Image files chosen with the file picker
#[derive(Debug, Clone, Default)]
pub struct PickedFiles {
    pub front: Option<PathBuf>,
    pub back: Option<PathBuf>,
}

impl PickedFiles {
    pub fn new(front: Option<PathBuf>, back: Option<PathBuf>) -> Self {
        Self { front, back }
    }

    fn slot(&self, side: CardSide) -> Option<&Path> {
        match side {
            CardSide::Front => self.front.as_deref(),
            CardSide::Back => self.back.as_deref(),
        }
    }
}

#[async_trait]
impl CardImageSource for PickedFiles {
    fn has(&self, side: CardSide) -> bool {
        self.slot(side).is_some()
    }

    fn missing_message(&self) -> &'static str {
        messages::MISSING_FILES
    }

    async fn payload(&self, side: CardSide) -> Result<ImagePayload, SubmitError> {
        let path = self
            .slot(side)
            .ok_or_else(|| SubmitError::Validation(self.missing_message().to_string()))?;

        let bytes = tokio::fs::read(path).await.map_err(|e| {
            SubmitError::unexpected(format!("Failed to read {}: {}", path.display(), e))
        })?;

        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| side.as_str().to_string());

        Ok(ImagePayload::new(bytes, mime_for_path(path), file_name))
    }
}

/// MIME type from a file extension, `application/octet-stream` when unknown
pub fn mime_for_path(path: &Path) -> &'static str {
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase());

    match extension.as_deref() {
        Some("png") => "image/png",
        Some("jpg") | Some("jpeg") => "image/jpeg",
        Some("webp") => "image/webp",
        Some("bmp") => "image/bmp",
        Some("gif") => "image/gif",
        Some("tif") | Some("tiff") => "image/tiff",
        Some("heic") => "image/heic",
        _ => "application/octet-stream",
    }
}

fn extension_for_mime(mime: &str) -> &'static str {
    match mime {
        "image/jpeg" => "jpg",
        "image/webp" => "webp",
        "image/bmp" => "bmp",
        "image/gif" => "gif",
        "image/tiff" => "tiff",
        _ => "png",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_file(name: &str, bytes: &[u8]) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("kimlik-ocr-images-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join(name);
        std::fs::write(&path, bytes).unwrap();
        path
    }

    #[test]
    fn test_mime_for_path() {
        assert_eq!(mime_for_path(Path::new("a/front.PNG")), "image/png");
        assert_eq!(mime_for_path(Path::new("back.jpeg")), "image/jpeg");
        assert_eq!(mime_for_path(Path::new("back.jpg")), "image/jpeg");
        assert_eq!(mime_for_path(Path::new("scan")), "application/octet-stream");
    }

    #[tokio::test]
    async fn test_camera_images_from_pair() {
        let pair = CapturedPair {
            front: ImagePayload::png(vec![1], CardSide::Front),
            back: ImagePayload::png(vec![2], CardSide::Back),
        };
        let images = CameraImages::from(pair);

        assert!(images.is_complete());
        assert_eq!(images.payload(CardSide::Back).await.unwrap().bytes, vec![2]);
    }

    #[tokio::test]
    async fn test_camera_images_missing_back() {
        let images = CameraImages {
            front: Some(ImagePayload::png(vec![1], CardSide::Front)),
            back: None,
        };

        assert!(images.has(CardSide::Front));
        assert!(!images.is_complete());
        assert_eq!(
            images.payload(CardSide::Back).await,
            Err(SubmitError::Validation(messages::MISSING_PHOTOS.to_string()))
        );
    }

    #[test]
    fn test_camera_images_from_data_urls() {
        let images = CameraImages::from_data_urls(
            Some("data:image/jpeg;base64,AQID"),
            Some(""),
        )
        .unwrap();

        let front = images.front.as_ref().unwrap();
        assert_eq!(front.mime, "image/jpeg");
        assert_eq!(front.file_name, "front.jpg");
        assert_eq!(front.bytes, vec![1, 2, 3]);
        assert!(images.back.is_none());

        assert!(CameraImages::from_data_urls(Some("garbage"), None).is_err());
    }

    #[tokio::test]
    async fn test_picked_files_payload() {
        let front = temp_file("front-card.jpg", &[0xFF, 0xD8, 0xFF]);
        let back = temp_file("back-card.png", &[137, 80, 78, 71]);
        let files = PickedFiles::new(Some(front), Some(back));

        assert!(files.is_complete());
        let payload = files.payload(CardSide::Front).await.unwrap();
        assert_eq!(payload.file_name, "front-card.jpg");
        assert_eq!(payload.mime, "image/jpeg");
        assert_eq!(payload.bytes, vec![0xFF, 0xD8, 0xFF]);

        let payload = files.payload(CardSide::Back).await.unwrap();
        assert_eq!(payload.mime, "image/png");
    }

    #[tokio::test]
    async fn test_picked_files_missing() {
        let files = PickedFiles::new(None, Some(PathBuf::from("back.png")));
        assert!(!files.is_complete());
        assert_eq!(files.missing_message(), messages::MISSING_FILES);
    }

    #[tokio::test]
    async fn test_picked_file_unreadable() {
        let files = PickedFiles::new(
            Some(PathBuf::from("/nonexistent/kimlik/front.png")),
            Some(PathBuf::from("/nonexistent/kimlik/back.png")),
        );
        let result = files.payload(CardSide::Front).await;
        assert!(matches!(result, Err(SubmitError::Unexpected(_))));
    }
}
