pub mod engine;
pub mod http_ocr;
pub mod normalize;

// Re-export main types
pub use engine::OcrBackend;
pub use http_ocr::HttpOcrClient;
