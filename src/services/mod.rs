pub mod camera;
pub mod config;
pub mod images;
pub mod inputs;
pub mod ocr;
pub mod pdf_export;
pub mod result_view;
pub mod submission;
