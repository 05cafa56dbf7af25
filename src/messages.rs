//! User-facing messages shown in the window.
//!
//! The UI is Turkish; log output stays English.

/// Camera permission was refused or no camera exists.
pub const CAMERA_UNAVAILABLE: &str =
    "Kamera erişimi reddedildi veya bulunamadı. Lütfen kamera iznini verin ve tekrar deneyin.";

/// Shutter pressed before the video produced a frame.
pub const CAMERA_NOT_READY: &str = "Kamera hazır değil.";

/// Camera path submitted without both photos.
pub const MISSING_PHOTOS: &str = "Lütfen hem ön hem arka yüz fotoğraflarını çekin.";

/// File path submitted without both files.
pub const MISSING_FILES: &str = "Lütfen hem ön hem arka yüz dosyalarını seçin.";

/// Submit pressed while a submission is still running.
pub const SUBMISSION_BUSY: &str = "Gönderim devam ediyor, lütfen bekleyin.";

/// Non-2xx response without a usable `detail`/`error`.
pub const OCR_FAILED: &str = "OCR işlemi başarısız oldu.";

/// 2xx response that carried no recognizable fields.
pub const NO_DATA: &str = "Kimlikten veri okunamadı veya eksik veri döndü.";

/// Fallback when an error carries no message at all.
pub const UNKNOWN_ERROR: &str = "Bilinmeyen hata";

/// Export requested with no cropped card image in the result.
pub const NO_CROPPED_IMAGES: &str = "Dışa aktarılacak kırpılmış görsel yok.";

/// Step instruction overlaid on the camera preview.
pub const PROMPT_FRONT: &str = "Ön yüzü çekin";
pub const PROMPT_BACK: &str = "Arka yüzü çekin";
