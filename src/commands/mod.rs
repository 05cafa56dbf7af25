pub mod camera;
pub mod config;
pub mod export;
pub mod ocr;
