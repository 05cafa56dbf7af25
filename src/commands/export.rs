use super::config::ConfigManagerState;
use super::ocr::OcrState;
use crate::messages;
use crate::services::pdf_export;
use std::path::PathBuf;
use tauri::{AppHandle, State};
use tauri_plugin_opener::OpenerExt;

/// Export the cropped card images as a PDF and open it
///
/// Returns the written file's path.
#[tauri::command]
pub async fn export_pdf(
    app: AppHandle,
    ocr: State<'_, OcrState>,
    config: State<'_, ConfigManagerState>,
) -> Result<String, String> {
    let result = ocr
        .inputs
        .lock()
        .result_view()
        .map(|view| view.result().clone())
        .ok_or_else(|| messages::NO_CROPPED_IMAGES.to_string())?;

    let file_name = {
        let manager = config
            .lock()
            .map_err(|e| format!("Failed to lock config manager: {}", e))?;
        manager.load()?.export.file_name
    };

    let path = export_dir()?.join(file_name);
    let target = path.clone();
    tokio::task::spawn_blocking(move || pdf_export::export_to_file(&result, &target))
        .await
        .map_err(|e| format!("Export task failed: {}", e))?
        .map_err(|e| e.to_string())?;

    let display = path.to_string_lossy().into_owned();
    if let Err(e) = app.opener().open_path(display.clone(), None::<&str>) {
        tracing::warn!(error = %e, path = %display, "Failed to open exported PDF");
    }

    Ok(display)
}

/// Downloads folder, falling back to the home directory
fn export_dir() -> Result<PathBuf, String> {
    dirs::download_dir()
        .or_else(dirs::home_dir)
        .ok_or_else(|| "Failed to determine download directory".to_string())
}
