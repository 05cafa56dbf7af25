use super::config::ConfigManagerState;
use crate::models::capture::{CapturedPair, CardSide};
use crate::models::upload::UploadState;
use crate::services::inputs::{PendingInputs, SubmitSource};
use crate::services::ocr::HttpOcrClient;
use crate::services::result_view::{ResultSnapshot, ResultView};
use crate::services::submission::SubmissionController;
use parking_lot::Mutex;
use std::path::PathBuf;
use std::sync::Arc;
use tauri::{AppHandle, Emitter, State};
use tauri_plugin_dialog::DialogExt;
use tokio::sync::oneshot;

/// State for the OCR window (parking_lot::Mutex, never held across awaits)
pub struct OcrState {
    controller: Mutex<Arc<SubmissionController>>,
    pub inputs: Mutex<PendingInputs>,
}

impl OcrState {
    pub fn new(controller: SubmissionController) -> Self {
        Self {
            controller: Mutex::new(Arc::new(controller)),
            inputs: Mutex::new(PendingInputs::default()),
        }
    }

    pub fn controller(&self) -> Arc<SubmissionController> {
        Arc::clone(&self.controller.lock())
    }

    /// Swap in a controller built from new settings
    pub fn replace_controller(&self, controller: SubmissionController) {
        *self.controller.lock() = Arc::new(controller);
    }

    pub fn set_captured(&self, pair: Option<CapturedPair>) {
        self.inputs.lock().set_captured(pair);
    }
}

/// Pick an image file for one side of the card
#[tauri::command]
pub async fn pick_card_file(
    app: AppHandle,
    state: State<'_, OcrState>,
    side: CardSide,
) -> Result<Option<String>, String> {
    let (tx, rx) = oneshot::channel();
    app.dialog()
        .file()
        .add_filter("Görsel", &["png", "jpg", "jpeg", "webp", "bmp"])
        .pick_file(move |path| {
            let _ = tx.send(path);
        });

    let picked = rx
        .await
        .map_err(|e| format!("File dialog closed unexpectedly: {}", e))?
        .and_then(|p| p.into_path().ok());

    let Some(path) = picked else {
        return Ok(None);
    };

    let display = path.to_string_lossy().into_owned();
    state.inputs.lock().set_file(side, Some(path));
    Ok(Some(display))
}

/// Set or clear a picked file directly (drag and drop)
#[tauri::command]
pub fn set_card_file(state: State<'_, OcrState>, side: CardSide, path: Option<String>) {
    state
        .inputs
        .lock()
        .set_file(side, path.filter(|p| !p.is_empty()).map(PathBuf::from));
}

/// Forget picked files, captured photos and the last result
#[tauri::command]
pub fn clear_inputs(state: State<'_, OcrState>) {
    *state.inputs.lock() = PendingInputs::default();
}

/// Submit the chosen images to the OCR server
///
/// Upload progress is emitted as `ocr:progress` while the request runs.
#[tauri::command]
pub async fn submit_ocr(
    app: AppHandle,
    state: State<'_, OcrState>,
    source: SubmitSource,
) -> Result<ResultSnapshot, String> {
    let images = state.inputs.lock().begin_submission(source);

    let controller = state.controller();
    let mut updates = controller.subscribe();
    let progress_app = app.clone();
    let forwarder = tauri::async_runtime::spawn(async move {
        while updates.changed().await.is_ok() {
            let upload = updates.borrow_and_update().clone();
            let _ = progress_app.emit("ocr:progress", &upload);
        }
    });

    let outcome = controller.submit(images.as_ref()).await;
    forwarder.abort();
    let _ = app.emit("ocr:progress", controller.state());

    let result = outcome.map_err(|e| e.to_string())?;
    Ok(state.inputs.lock().store_result(result))
}

/// Current upload state
#[tauri::command]
pub fn get_upload_state(state: State<'_, OcrState>) -> UploadState {
    state.controller().state()
}

/// Check if OCR server is reachable
#[tauri::command]
pub async fn check_ocr_health(config: State<'_, ConfigManagerState>) -> Result<bool, String> {
    let api = {
        let manager = config
            .lock()
            .map_err(|e| format!("Failed to lock config manager: {}", e))?;
        manager.load_effective()?.api
    };

    let client = HttpOcrClient::new(&api)?;
    match client.health_check().await {
        Ok(()) => Ok(true),
        Err(e) => {
            tracing::warn!(error = %e, "OCR server health check failed");
            Ok(false)
        }
    }
}

/// Switch between the field table and the cropped images
#[tauri::command]
pub fn toggle_result_view(state: State<'_, OcrState>) -> Result<ResultSnapshot, String> {
    let mut inputs = state.inputs.lock();
    let view = inputs.result_view_mut().ok_or("No OCR result yet")?;
    view.toggle();
    Ok(view.snapshot())
}

#[tauri::command]
pub fn get_result_view(state: State<'_, OcrState>) -> Option<ResultSnapshot> {
    state.inputs.lock().result_view().map(ResultView::snapshot)
}
