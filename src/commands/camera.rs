use super::ocr::OcrState;
use crate::models::capture::CaptureSnapshot;
use crate::services::camera::{
    CameraBridge, CameraSignals, CaptureSession, Facing, StreamGrant, WebviewCamera,
};
use serde::Deserialize;
use std::sync::Arc;
use tauri::{AppHandle, Emitter, Manager, State};
use tokio::sync::Mutex;

/// Camera state (tokio Mutex: the session is held while waiting for permission)
pub struct CameraState {
    bridge: Arc<CameraBridge>,
    session: Mutex<CaptureSession>,
}

/// Frame pushed by the window when the shutter is pressed
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VideoFrame {
    pub data_url: String,
    pub width: u32,
    pub height: u32,
}

/// Emits camera requests to the main window
struct TauriCameraSignals {
    app: AppHandle,
}

impl CameraSignals for TauriCameraSignals {
    fn request_stream(&self, facing: Facing) {
        if let Err(e) = self.app.emit("camera:request", facing) {
            tracing::warn!(error = %e, "Failed to emit camera request");
        }
    }

    fn release_tracks(&self, count: usize) {
        if let Err(e) = self.app.emit("camera:release", count) {
            tracing::warn!(error = %e, "Failed to emit camera release");
        }
    }
}

/// Initialize camera state
///
/// A completed capture is stored as the pending camera input and announced
/// with `camera:captured`.
pub fn init_camera_state(app: &AppHandle) -> CameraState {
    let bridge = Arc::new(CameraBridge::new(TauriCameraSignals { app: app.clone() }));
    let device = Arc::new(WebviewCamera::new(Arc::clone(&bridge)));

    let handle = app.clone();
    let session = CaptureSession::new(device).on_capture(move |pair| {
        if let Some(ocr) = handle.try_state::<OcrState>() {
            ocr.set_captured(Some(pair));
        }
        if let Err(e) = handle.emit("camera:captured", ()) {
            tracing::warn!(error = %e, "Failed to emit capture completion");
        }
    });

    CameraState {
        bridge,
        session: Mutex::new(session),
    }
}

/// Release the camera, used when the window goes away
pub async fn release_camera(state: &CameraState) {
    state.session.lock().await.stop_camera();
}

/// Request the rear camera
#[tauri::command]
pub async fn start_camera(state: State<'_, CameraState>) -> Result<CaptureSnapshot, String> {
    let mut session = state.session.lock().await;
    // Failures are reported through the snapshot's error
    let _ = session.start_camera().await;
    Ok(session.snapshot())
}

/// Permission outcome from the window's getUserMedia call
#[tauri::command]
pub fn camera_grant(state: State<'_, CameraState>, grant: StreamGrant) -> bool {
    state.bridge.resolve(grant)
}

/// Take the current frame as the photo for the current step
#[tauri::command]
pub async fn capture_frame(
    state: State<'_, CameraState>,
    frame: VideoFrame,
) -> Result<CaptureSnapshot, String> {
    if frame.width == 0 || frame.height == 0 {
        state.bridge.clear_frame();
    } else {
        state
            .bridge
            .push_frame(&frame.data_url)
            .map_err(|e| e.to_string())?;
    }

    let mut session = state.session.lock().await;
    let _ = session.capture();
    Ok(session.snapshot())
}

#[tauri::command]
pub async fn stop_camera(state: State<'_, CameraState>) -> Result<CaptureSnapshot, String> {
    let mut session = state.session.lock().await;
    session.stop_camera();
    Ok(session.snapshot())
}

/// Discard both photos and start again from the front side
#[tauri::command]
pub async fn retake_camera(
    state: State<'_, CameraState>,
    ocr: State<'_, OcrState>,
) -> Result<CaptureSnapshot, String> {
    ocr.set_captured(None);

    let mut session = state.session.lock().await;
    let _ = session.retake().await;
    Ok(session.snapshot())
}

#[tauri::command]
pub async fn get_camera_state(state: State<'_, CameraState>) -> Result<CaptureSnapshot, String> {
    Ok(state.session.lock().await.snapshot())
}
